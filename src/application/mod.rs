pub mod auth_service;
pub mod favorites_cache;
pub mod filter;
pub mod listings_service;
