use crate::domain::property::Property;
use crate::domain::repository::PropertyRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryPropertyRepository {
    storage: Arc<RwLock<HashMap<String, Property>>>,
}

impl InMemoryPropertyRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryPropertyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    #[instrument(skip(self, property), fields(property_id = %property.id))]
    async fn save_property(&self, property: Property) -> Result<()> {
        trace!("Acquiring write lock for property storage");
        let mut storage = self.storage.write().await;
        storage.insert(property.id.clone(), property.clone());
        debug!(
            property_id = %property.id,
            title = %property.title,
            "Property saved to memory storage"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_properties(&self) -> Result<Vec<Property>> {
        trace!("Acquiring read lock for property storage");
        let storage = self.storage.read().await;
        let mut properties: Vec<Property> = storage.values().cloned().collect();
        // Newest first; id as tie-breaker so equal timestamps stay stable.
        properties.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!(count = properties.len(), "Listed properties");
        Ok(properties)
    }

    #[instrument(skip(self), fields(property_id = id))]
    async fn find_property_by_id(&self, id: &str) -> Result<Option<Property>> {
        trace!("Acquiring read lock for property storage");
        let storage = self.storage.read().await;
        let property = storage.get(id).cloned();
        match &property {
            Some(p) => debug!(property_id = %p.id, "Property found"),
            None => trace!(property_id = id, "Property not found"),
        }
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::{Price, TransactionType};
    use chrono::{Duration, Utc};

    fn property(id: &str, minutes_ago: i64) -> Property {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Property {
            id: id.to_string(),
            title: format!("Listing {id}"),
            description: String::new(),
            price: Price::new(100_000.0).unwrap(),
            bedrooms: 2,
            bathrooms: 1,
            garages: 1,
            address: "123 Main St".to_string(),
            property_type: "house".to_string(),
            transaction_type: TransactionType::Sale,
            image_url: None,
            images: Vec::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_list_properties_orders_newest_first() {
        let repo = InMemoryPropertyRepository::new();
        repo.save_property(property("old", 60)).await.unwrap();
        repo.save_property(property("newest", 0)).await.unwrap();
        repo.save_property(property("middle", 30)).await.unwrap();

        let listed = repo.list_properties().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_list_properties_empty_store_returns_empty_list() {
        let repo = InMemoryPropertyRepository::new();
        assert!(repo.list_properties().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_property_by_id() {
        let repo = InMemoryPropertyRepository::new();
        repo.save_property(property("p-1", 0)).await.unwrap();

        let found = repo.find_property_by_id("p-1").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, "p-1");

        let missing = repo.find_property_by_id("p-404").await.unwrap();
        assert!(missing.is_none());
    }
}
