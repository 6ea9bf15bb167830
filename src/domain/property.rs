use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub garages: u32,
    pub address: String,
    /// Free-text category ("house", "apartment", ...). Not an enum: the data
    /// carries arbitrary categories and the filter matches them verbatim.
    #[serde(rename = "type")]
    pub property_type: String,
    pub transaction_type: TransactionType,
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing price. The source data carries prices both as JSON numbers and as
/// numeric strings; this newtype coerces both at the boundary and rejects
/// anything negative or non-finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "PriceRepr")]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::Validation(format!("Invalid price: {value}")));
        }
        Ok(Price(value))
    }

    pub fn inner(&self) -> f64 {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<PriceRepr> for Price {
    type Error = String;

    fn try_from(repr: PriceRepr) -> Result<Self, Self::Error> {
        let value = match repr {
            PriceRepr::Number(n) => n,
            PriceRepr::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("Price is not numeric: {s:?}"))?,
        };
        Price::new(value).map_err(|e| e.to_string())
    }
}

/// Canonical sale-or-rental marker. Replaces the original data's ad hoc
/// guessing across several possible field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sale,
    Rent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPropertyRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub garages: Option<u32>,
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub user_id: String,
    pub property_id: String,
}
