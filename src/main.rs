use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use habitta_api::application::auth_service::AuthService;
use habitta_api::application::listings_service::ListingsService;
use habitta_api::data::favorite_repository::InMemoryFavoriteRepository;
use habitta_api::data::property_repository::InMemoryPropertyRepository;
use habitta_api::data::user_repository::InMemoryUserRepository;
use habitta_api::infrastructure::config::Config;
use habitta_api::infrastructure::logging::init_logging;
use habitta_api::presentation::auth::{login, register};
use habitta_api::presentation::handlers::{
    AppState, add_favorite, get_property, health_check, list_favorites, list_properties,
    register_property, remove_favorite,
};
use habitta_api::presentation::middleware::RequestTracingMiddleware;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    info!("Logging initialized");

    let config = Config::from_env();

    info!("Creating in-memory repositories");
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let property_repository = Arc::new(InMemoryPropertyRepository::new());
    let favorite_repository = Arc::new(InMemoryFavoriteRepository::new());

    let auth = Arc::new(AuthService::new(user_repository));
    let listings = Arc::new(ListingsService::new(
        property_repository,
        favorite_repository,
    ));

    let state = web::Data::new(AppState { listings, auth });
    info!("Application state initialized");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(RequestTracingMiddleware)
            .route("/health", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/properties", web::get().to(list_properties))
            .route("/properties", web::post().to(register_property))
            .route("/properties/{id}", web::get().to(get_property))
            .route("/favorites/{user_id}", web::get().to(list_favorites))
            .route("/favorites", web::post().to(add_favorite))
            .route("/favorites", web::delete().to(remove_favorite))
    });

    let bind_addr = config.bind_addr();
    info!(host = %bind_addr.0, port = bind_addr.1, "Binding server");
    let server = server.bind(bind_addr)?;

    info!(
        routes = %"GET /health, POST /register, POST /login, GET /properties, POST /properties, GET /properties/{id}, GET /favorites/{userId}, POST /favorites, DELETE /favorites",
        "Starting HTTP server"
    );
    server.run().await
}
