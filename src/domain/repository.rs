use crate::domain::property::Property;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn save_property(&self, property: Property) -> Result<()>;
    /// All properties ordered by creation time descending.
    async fn list_properties(&self) -> Result<Vec<Property>>;
    async fn find_property_by_id(&self, id: &str) -> Result<Option<Property>>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Idempotent: inserting an existing (user, property) pair is a no-op.
    async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()>;
    /// Idempotent: removing a pair that is not there is a no-op.
    async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()>;
    async fn list_favorite_ids(&self, user_id: &str) -> Result<Vec<String>>;
}
