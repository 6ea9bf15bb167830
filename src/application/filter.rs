use crate::domain::property::Property;
use serde::Deserialize;

/// Category value that disables category filtering.
pub const CATEGORY_ALL: &str = "all";

/// Optional, independent predicates over a listing set. All active predicates
/// must pass (a conjunction), so the order criteria are applied in can never
/// change the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub text: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub min_garages: Option<u32>,
}

/// Raw form/query inputs. Everything arrives as optional text; blank or
/// non-numeric values mean "no filter on this field", never an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub text: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_bedrooms: Option<String>,
    pub min_bathrooms: Option<String>,
    pub min_garages: Option<String>,
}

impl FilterCriteria {
    pub fn from_params(params: &FilterParams) -> Self {
        FilterCriteria {
            text: params
                .text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            category: params
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            min_price: parse_lenient(params.min_price.as_deref()),
            max_price: parse_lenient(params.max_price.as_deref()),
            min_bedrooms: parse_lenient(params.min_bedrooms.as_deref()),
            min_bathrooms: parse_lenient(params.min_bathrooms.as_deref()),
            min_garages: parse_lenient(params.min_garages.as_deref()),
        }
    }
}

fn parse_lenient<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Narrows `properties` to those matching every active criterion. Pure: no
/// I/O, the input slice is left untouched, equal inputs give equal outputs.
pub fn filter_properties(properties: &[Property], criteria: &FilterCriteria) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| matches(p, criteria))
        .cloned()
        .collect()
}

fn matches(property: &Property, criteria: &FilterCriteria) -> bool {
    if let Some(category) = criteria.category.as_deref()
        && category != CATEGORY_ALL
        && property.property_type != category
    {
        return false;
    }

    if let Some(text) = criteria.text.as_deref() {
        let needle = text.to_lowercase();
        let hit = property.title.to_lowercase().contains(&needle)
            || property.description.to_lowercase().contains(&needle)
            || property.address.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }

    if let Some(min) = criteria.min_price
        && property.price.inner() < min
    {
        return false;
    }
    if let Some(max) = criteria.max_price
        && property.price.inner() > max
    {
        return false;
    }

    // A zero bound is always satisfied, so Some(0) and None behave the same.
    if let Some(min) = criteria.min_bedrooms
        && property.bedrooms < min
    {
        return false;
    }
    if let Some(min) = criteria.min_bathrooms
        && property.bathrooms < min
    {
        return false;
    }
    if let Some(min) = criteria.min_garages
        && property.garages < min
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::{Price, TransactionType};
    use chrono::Utc;

    fn property(id: &str, price: f64) -> Property {
        let now = Utc::now();
        Property {
            id: id.to_string(),
            title: format!("Listing {id}"),
            description: "Bright two-bedroom".to_string(),
            price: Price::new(price).unwrap(),
            bedrooms: 2,
            bathrooms: 1,
            garages: 1,
            address: "123 Main St".to_string(),
            property_type: "house".to_string(),
            transaction_type: TransactionType::Sale,
            image_url: None,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<Property> {
        vec![
            property("a", 350.0),
            property("b", 250.0),
            property("c", 1200.0),
        ]
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let properties = sample();
        let filtered = filter_properties(&properties, &FilterCriteria::default());

        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        // Input list untouched
        assert_eq!(properties.len(), 3);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let properties = sample();
        let criteria = FilterCriteria {
            min_price: Some(300.0),
            max_price: Some(1000.0),
            ..Default::default()
        };

        let filtered = filter_properties(&properties, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].price.inner(), 350.0);

        let exact = FilterCriteria {
            min_price: Some(350.0),
            max_price: Some(350.0),
            ..Default::default()
        };
        assert_eq!(filter_properties(&properties, &exact).len(), 1);
    }

    #[test]
    fn test_criteria_order_does_not_matter() {
        let mut properties = sample();
        properties[0].bedrooms = 4;

        let price_only = FilterCriteria {
            min_price: Some(300.0),
            ..Default::default()
        };
        let bedrooms_only = FilterCriteria {
            min_bedrooms: Some(3),
            ..Default::default()
        };
        let both = FilterCriteria {
            min_price: Some(300.0),
            min_bedrooms: Some(3),
            ..Default::default()
        };

        let price_then_bedrooms =
            filter_properties(&filter_properties(&properties, &price_only), &bedrooms_only);
        let bedrooms_then_price =
            filter_properties(&filter_properties(&properties, &bedrooms_only), &price_only);
        let combined = filter_properties(&properties, &both);

        let ids = |ps: &[Property]| ps.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&price_then_bedrooms), ids(&bedrooms_then_price));
        assert_eq!(ids(&price_then_bedrooms), ids(&combined));
    }

    #[test]
    fn test_text_matches_title_description_or_address_case_insensitive() {
        let mut properties = sample();
        properties[1].address = "45 OCEAN Drive".to_string();

        let criteria = FilterCriteria {
            text: Some("ocean".to_string()),
            ..Default::default()
        };
        let filtered = filter_properties(&properties, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");

        let by_description = FilterCriteria {
            text: Some("BRIGHT".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_properties(&properties, &by_description).len(), 3);
    }

    #[test]
    fn test_category_all_sentinel_disables_category_filter() {
        let mut properties = sample();
        properties[2].property_type = "apartment".to_string();

        let all = FilterCriteria {
            category: Some(CATEGORY_ALL.to_string()),
            ..Default::default()
        };
        assert_eq!(filter_properties(&properties, &all).len(), 3);

        let houses = FilterCriteria {
            category: Some("house".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_properties(&properties, &houses).len(), 2);
    }

    #[test]
    fn test_zero_room_bound_is_ignored() {
        let properties = sample();
        let criteria = FilterCriteria {
            min_garages: Some(0),
            ..Default::default()
        };
        assert_eq!(filter_properties(&properties, &criteria).len(), 3);
    }

    #[test]
    fn test_from_params_ignores_blank_and_non_numeric_input() {
        let params = FilterParams {
            text: Some("  ".to_string()),
            category: None,
            min_price: Some("abc".to_string()),
            max_price: Some(" 1000 ".to_string()),
            min_bedrooms: Some(String::new()),
            min_bathrooms: Some("2".to_string()),
            min_garages: None,
        };

        let criteria = FilterCriteria::from_params(&params);
        assert_eq!(criteria.text, None);
        assert_eq!(criteria.min_price, None);
        assert_eq!(criteria.max_price, Some(1000.0));
        assert_eq!(criteria.min_bedrooms, None);
        assert_eq!(criteria.min_bathrooms, Some(2));
    }
}
