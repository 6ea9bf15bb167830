use std::env;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Accepted for parity with SQL-backed deployments; the in-memory
    /// adapters ignore it.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(port = %raw, default = DEFAULT_PORT, "PORT is not a number, using default");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let database_url = env::var("DATABASE_URL").ok();

        info!(host = %host, port = port, "Configuration loaded");
        Config {
            host,
            port,
            database_url,
        }
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
