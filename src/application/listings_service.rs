use crate::domain::error::DomainError;
use crate::domain::property::{Property, RegisterPropertyRequest};
use crate::domain::repository::{FavoriteRepository, PropertyRepository};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

pub struct ListingsService<P: PropertyRepository, F: FavoriteRepository> {
    properties: Arc<P>,
    favorites: Arc<F>,
}

impl<P: PropertyRepository, F: FavoriteRepository> ListingsService<P, F> {
    pub fn new(properties: Arc<P>, favorites: Arc<F>) -> Self {
        Self {
            properties,
            favorites,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_properties(&self) -> Result<Vec<Property>> {
        let properties = self.properties.list_properties().await?;
        debug!(count = properties.len(), "Properties listed");
        Ok(properties)
    }

    #[instrument(skip(self), fields(property_id = id))]
    pub async fn get_property(&self, id: &str) -> Result<Property> {
        self.properties
            .find_property_by_id(id)
            .await?
            .ok_or_else(|| {
                warn!(property_id = id, "Property not found");
                DomainError::NotFound(format!("Property not found: {id}")).into()
            })
    }

    #[instrument(skip(self, req), fields(title = %req.title))]
    pub async fn register_property(&self, req: RegisterPropertyRequest) -> Result<Property> {
        trace!("Starting property registration");

        for (field, value) in [
            ("title", &req.title),
            ("address", &req.address),
            ("type", &req.property_type),
        ] {
            if value.trim().is_empty() {
                warn!(field = field, "Missing required property field");
                return Err(
                    DomainError::Validation(format!("Missing required field: {field}")).into(),
                );
            }
        }

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            price: req.price,
            bedrooms: req.bedrooms.unwrap_or(0),
            bathrooms: req.bathrooms.unwrap_or(0),
            garages: req.garages.unwrap_or(0),
            address: req.address,
            property_type: req.property_type,
            transaction_type: req.transaction_type,
            image_url: req.image_url,
            images: req.images,
            created_at: now,
            updated_at: now,
        };

        self.properties.save_property(property.clone()).await?;

        info!(
            property_id = %property.id,
            title = %property.title,
            price = property.price.inner(),
            "Property registered successfully"
        );

        Ok(property)
    }

    #[instrument(skip(self), fields(user_id = user_id, property_id = property_id))]
    pub async fn add_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        self.favorites.add_favorite(user_id, property_id).await?;
        info!("Favorite added");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = user_id, property_id = property_id))]
    pub async fn remove_favorite(&self, user_id: &str, property_id: &str) -> Result<()> {
        self.favorites.remove_favorite(user_id, property_id).await?;
        info!("Favorite removed");
        Ok(())
    }

    /// Full property records for the user's favorites, newest first. Ids whose
    /// property has disappeared from the store are skipped, not errors.
    #[instrument(skip(self), fields(user_id = user_id))]
    pub async fn list_favorites(&self, user_id: &str) -> Result<Vec<Property>> {
        let ids = self.favorites.list_favorite_ids(user_id).await?;
        let mut properties = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(property) = self.properties.find_property_by_id(id).await? {
                properties.push(property);
            } else {
                trace!(property_id = %id, "Favorited property no longer in store");
            }
        }
        properties.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!(count = properties.len(), "Favorites listed");
        Ok(properties)
    }
}
