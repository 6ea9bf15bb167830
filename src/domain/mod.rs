pub mod error;
pub mod property;
pub mod repository;
pub mod user;
