use crate::domain::repository::FavoriteRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// In-memory favorite relation, one id set per user. The set makes the
/// uniqueness invariant structural: at most one entry per (user, property).
#[derive(Clone)]
pub struct InMemoryFavoriteRepository {
    storage: Arc<RwLock<HashMap<String, HashSet<String>>>>,
}

impl InMemoryFavoriteRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryFavoriteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    #[instrument(skip(self), fields(user_id = user_id, property_id = property_id))]
    async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        trace!("Acquiring write lock for favorite storage");
        let mut storage = self.storage.write().await;
        let inserted = storage
            .entry(user_id.to_string())
            .or_default()
            .insert(property_id.to_string());
        debug!(inserted = inserted, "Favorite add processed");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = user_id, property_id = property_id))]
    async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        trace!("Acquiring write lock for favorite storage");
        let mut storage = self.storage.write().await;
        let removed = storage
            .get_mut(user_id)
            .map(|ids| ids.remove(property_id))
            .unwrap_or(false);
        debug!(removed = removed, "Favorite remove processed");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    async fn list_favorite_ids(&self, user_id: &str) -> Result<Vec<String>> {
        trace!("Acquiring read lock for favorite storage");
        let storage = self.storage.read().await;
        let ids: Vec<String> = storage
            .get(user_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();
        debug!(count = ids.len(), "Listed favorite ids");
        Ok(ids)
    }
}
