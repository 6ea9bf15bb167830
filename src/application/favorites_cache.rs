use crate::application::listings_service::ListingsService;
use crate::domain::error::DomainError;
use crate::domain::property::Property;
use crate::domain::repository::{FavoriteRepository, PropertyRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Remote side of the favorites mirror. `ListingsService` implements it; tests
/// swap in failing doubles to exercise the rollback path.
#[async_trait]
pub trait FavoritesBackend: Send + Sync {
    async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()>;
    async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()>;
    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Property>>;
}

#[async_trait]
impl<P: PropertyRepository, F: FavoriteRepository> FavoritesBackend for ListingsService<P, F> {
    async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        ListingsService::add_favorite(self, user_id, property_id).await
    }

    async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        ListingsService::remove_favorite(self, user_id, property_id).await
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Property>> {
        ListingsService::list_favorites(self, user_id).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    Unauthenticated,
    Loading { user_id: String },
    Ready { user_id: String },
}

/// Session-scoped mirror of the server's favorite relation for one user.
/// Non-authoritative: the server stores stay the source of truth, this just
/// keeps the ids at hand for synchronous lookups and optimistic toggles.
pub struct FavoritesCache<B: FavoritesBackend> {
    backend: Arc<B>,
    state: CacheState,
    favorited_ids: HashSet<String>,
}

impl<B: FavoritesBackend> FavoritesCache<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: CacheState::Unauthenticated,
            favorited_ids: HashSet::new(),
        }
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    /// Hydrates the mirror for a freshly logged-in user. A failed fetch leaves
    /// the session usable with an empty set; the error still reaches the
    /// caller so the UI can report it.
    #[instrument(skip(self), fields(user_id = user_id))]
    pub async fn login(&mut self, user_id: &str) -> Result<()> {
        self.state = CacheState::Loading {
            user_id: user_id.to_string(),
        };
        self.favorited_ids.clear();

        let loaded = self.backend.list_favorites(user_id).await;
        self.state = CacheState::Ready {
            user_id: user_id.to_string(),
        };
        match loaded {
            Ok(properties) => {
                self.favorited_ids = properties.into_iter().map(|p| p.id).collect();
                info!(count = self.favorited_ids.len(), "Favorites loaded");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load favorites, starting session empty");
                Err(e)
            }
        }
    }

    /// Clears the local mirror only; server data is untouched.
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        self.state = CacheState::Unauthenticated;
        self.favorited_ids.clear();
        info!("Favorites cache cleared");
    }

    pub fn is_favorite(&self, property_id: &str) -> bool {
        matches!(self.state, CacheState::Ready { .. }) && self.favorited_ids.contains(property_id)
    }

    pub fn favorited_ids(&self) -> impl Iterator<Item = &str> {
        self.favorited_ids.iter().map(String::as_str)
    }

    /// Two-phase toggle: flip locally, write through, keep the flip only when
    /// the write lands. Returns the new membership state. Repeated toggles of
    /// one property strictly alternate, a confirmed add can never stack.
    #[instrument(skip(self, property), fields(property_id = %property.id))]
    pub async fn toggle_favorite(&mut self, property: &Property) -> Result<bool> {
        let user_id = match &self.state {
            CacheState::Ready { user_id } => user_id.clone(),
            _ => {
                warn!("Toggle requested without an authenticated session");
                return Err(
                    DomainError::Unauthorized("No authenticated session".to_string()).into(),
                );
            }
        };

        let was_favorite = self.favorited_ids.contains(&property.id);

        // Tentative local flip
        if was_favorite {
            self.favorited_ids.remove(&property.id);
        } else {
            self.favorited_ids.insert(property.id.clone());
        }

        let write = if was_favorite {
            self.backend.remove_favorite(&user_id, &property.id).await
        } else {
            self.backend.add_favorite(&user_id, &property.id).await
        };

        match write {
            Ok(()) => {
                debug!(favorited = !was_favorite, "Favorite toggle committed");
                Ok(!was_favorite)
            }
            Err(e) => {
                // Roll back to the pre-toggle state
                if was_favorite {
                    self.favorited_ids.insert(property.id.clone());
                } else {
                    self.favorited_ids.remove(&property.id);
                }
                warn!(error = %e, "Favorite toggle rolled back");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::favorite_repository::InMemoryFavoriteRepository;
    use crate::data::property_repository::InMemoryPropertyRepository;
    use crate::domain::property::{Price, TransactionType};
    use chrono::Utc;

    fn property(id: &str) -> Property {
        let now = Utc::now();
        Property {
            id: id.to_string(),
            title: format!("Listing {id}"),
            description: String::new(),
            price: Price::new(200_000.0).unwrap(),
            bedrooms: 3,
            bathrooms: 2,
            garages: 1,
            address: "8 Harbor Way".to_string(),
            property_type: "house".to_string(),
            transaction_type: TransactionType::Rent,
            image_url: None,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    type TestService = ListingsService<InMemoryPropertyRepository, InMemoryFavoriteRepository>;

    fn service() -> (Arc<TestService>, Arc<InMemoryPropertyRepository>) {
        let properties = Arc::new(InMemoryPropertyRepository::new());
        let service = Arc::new(ListingsService::new(
            properties.clone(),
            Arc::new(InMemoryFavoriteRepository::new()),
        ));
        (service, properties)
    }

    struct FailingBackend;

    #[async_trait]
    impl FavoritesBackend for FailingBackend {
        async fn add_favorite(&self, _user_id: &str, _property_id: &str) -> Result<()> {
            Err(anyhow::anyhow!("connection reset"))
        }

        async fn remove_favorite(&self, _user_id: &str, _property_id: &str) -> Result<()> {
            Err(anyhow::anyhow!("connection reset"))
        }

        async fn list_favorites(&self, _user_id: &str) -> Result<Vec<Property>> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    #[tokio::test]
    async fn test_toggles_strictly_alternate_membership() {
        let (service, _) = service();
        let mut cache = FavoritesCache::new(service);
        cache.login("u-1").await.unwrap();
        let p = property("p-1");

        assert!(cache.toggle_favorite(&p).await.unwrap());
        assert!(cache.is_favorite("p-1"));
        assert!(!cache.toggle_favorite(&p).await.unwrap());
        assert!(!cache.is_favorite("p-1"));
        assert!(cache.toggle_favorite(&p).await.unwrap());
        assert!(cache.is_favorite("p-1"));
    }

    #[tokio::test]
    async fn test_toggle_writes_through_to_backend() {
        let (service, properties) = service();
        let mut cache = FavoritesCache::new(service.clone());
        cache.login("u-1").await.unwrap();
        let p = property("p-1");
        properties.save_property(p.clone()).await.unwrap();

        cache.toggle_favorite(&p).await.unwrap();
        let remote = service.list_favorites("u-1").await.unwrap();
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].id, "p-1");
    }

    #[tokio::test]
    async fn test_failed_toggle_rolls_back_local_state() {
        let mut cache = FavoritesCache::new(Arc::new(FailingBackend));
        let _ = cache.login("u-1").await;
        let p = property("p-1");

        assert!(cache.toggle_favorite(&p).await.is_err());
        assert!(!cache.is_favorite("p-1"));
    }

    #[tokio::test]
    async fn test_failed_load_degrades_to_empty_ready_session() {
        let mut cache = FavoritesCache::new(Arc::new(FailingBackend));

        assert!(cache.login("u-1").await.is_err());
        assert!(matches!(cache.state(), CacheState::Ready { .. }));
        assert!(!cache.is_favorite("anything"));
    }

    #[tokio::test]
    async fn test_toggle_without_session_is_rejected() {
        let (service, _) = service();
        let mut cache = FavoritesCache::new(service);
        let err = cache.toggle_favorite(&property("p-1")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_local_state_only() {
        let (service, properties) = service();
        let mut cache = FavoritesCache::new(service.clone());
        cache.login("u-1").await.unwrap();
        let p = property("p-1");
        properties.save_property(p.clone()).await.unwrap();
        cache.toggle_favorite(&p).await.unwrap();

        cache.logout();
        assert_eq!(*cache.state(), CacheState::Unauthenticated);
        assert!(!cache.is_favorite("p-1"));

        // Server side keeps the favorite
        let remote = service.list_favorites("u-1").await.unwrap();
        assert_eq!(remote.len(), 1);
    }

    #[tokio::test]
    async fn test_login_hydrates_from_backend() {
        let (service, properties) = service();
        let p = property("p-1");
        properties.save_property(p).await.unwrap();
        service.add_favorite("u-1", "p-1").await.unwrap();

        let mut cache = FavoritesCache::new(service);
        cache.login("u-1").await.unwrap();
        assert!(cache.is_favorite("p-1"));
        assert_eq!(cache.favorited_ids().collect::<Vec<_>>(), vec!["p-1"]);
    }
}
