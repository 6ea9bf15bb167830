use crate::application::auth_service::AuthService;
use crate::application::filter::{FilterCriteria, FilterParams, filter_properties};
use crate::application::listings_service::ListingsService;
use crate::data::favorite_repository::InMemoryFavoriteRepository;
use crate::data::property_repository::InMemoryPropertyRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::property::{FavoriteRequest, RegisterPropertyRequest};
use actix_web::{HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub listings: Arc<ListingsService<InMemoryPropertyRepository, InMemoryFavoriteRepository>>,
    pub auth: Arc<AuthService<InMemoryUserRepository>>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => actix_web::http::StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        match self {
            ApiError::Validation(_) => {
                warn!(error = %error_msg, status = %status, "Validation error")
            }
            ApiError::Conflict(_) => {
                warn!(error = %error_msg, status = %status, "Conflict")
            }
            ApiError::Unauthorized(_) => {
                warn!(error = %error_msg, status = %status, "Unauthorized")
            }
            ApiError::NotFound(_) => {
                warn!(error = %error_msg, status = %status, "Resource not found")
            }
            // The wire message stays generic; the detail goes to the log only.
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error")
            }
        }

        HttpResponse::build(status).json(ErrorResponse { error: error_msg })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::Conflict(msg)) => ApiError::Conflict(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Internal(err.to_string()),
        }
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument(skip(state, query))]
pub async fn list_properties(
    state: web::Data<AppState>,
    query: web::Query<FilterParams>,
) -> Result<HttpResponse, ApiError> {
    info!("Listing properties");
    let properties = state.listings.list_properties().await.map_err(|e| {
        error!(error = %e, "Failed to list properties");
        ApiError::from(e)
    })?;

    let criteria = FilterCriteria::from_params(&query);
    let narrowed = if criteria == FilterCriteria::default() {
        properties
    } else {
        filter_properties(&properties, &criteria)
    };

    info!(count = narrowed.len(), "Properties listed successfully");
    Ok(HttpResponse::Ok().json(narrowed))
}

#[instrument(skip(state), fields(property_id = %*path))]
pub async fn get_property(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let property_id = path.into_inner();
    info!(property_id = %property_id, "Getting property");
    let property = state
        .listings
        .get_property(&property_id)
        .await
        .map_err(|e| {
            warn!(property_id = %property_id, error = %e, "Failed to get property");
            ApiError::from(e)
        })?;
    info!(property_id = %property.id, "Property retrieved successfully");
    Ok(HttpResponse::Ok().json(property))
}

#[instrument(skip(state, req), fields(property_id))]
pub async fn register_property(
    state: web::Data<AppState>,
    req: web::Json<RegisterPropertyRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(title = %req.title, "Registering new property");
    let property = state
        .listings
        .register_property(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register property");
            ApiError::from(e)
        })?;
    tracing::Span::current().record("property_id", property.id.as_str());
    info!(property_id = %property.id, "Property registered successfully");
    Ok(HttpResponse::Created().json(property))
}

#[instrument(skip(state), fields(user_id = %*path))]
pub async fn list_favorites(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    info!(user_id = %user_id, "Listing favorites");
    let favorites = state.listings.list_favorites(&user_id).await.map_err(|e| {
        error!(user_id = %user_id, error = %e, "Failed to list favorites");
        ApiError::from(e)
    })?;
    info!(count = favorites.len(), "Favorites listed successfully");
    Ok(HttpResponse::Ok().json(favorites))
}

#[instrument(skip(state, req), fields(user_id = %req.user_id, property_id = %req.property_id))]
pub async fn add_favorite(
    state: web::Data<AppState>,
    req: web::Json<FavoriteRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    info!("Adding favorite");
    state
        .listings
        .add_favorite(&req.user_id, &req.property_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to add favorite");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

#[instrument(skip(state, req), fields(user_id = %req.user_id, property_id = %req.property_id))]
pub async fn remove_favorite(
    state: web::Data<AppState>,
    req: web::Json<FavoriteRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    info!("Removing favorite");
    state
        .listings
        .remove_favorite(&req.user_id, &req.property_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to remove favorite");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
