pub mod favorite_repository;
pub mod property_repository;
pub mod user_repository;
