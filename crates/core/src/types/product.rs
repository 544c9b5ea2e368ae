//! Catalog product type.

use serde::{Deserialize, Serialize};

use crate::types::MealId;

/// A meal as listed by the remote catalog.
///
/// Field names follow the catalog's wire format (`idMeal`, `strMeal`,
/// `strMealThumb`); any other fields the catalog sends are ignored.
/// Products are immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    #[serde(rename = "idMeal")]
    pub id: MealId,
    /// Name shown on the product card.
    #[serde(rename = "strMeal")]
    pub display_name: String,
    /// Thumbnail image URL.
    #[serde(rename = "strMealThumb")]
    pub thumbnail_url: String,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(
        id: impl Into<MealId>,
        display_name: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            thumbnail_url: thumbnail_url.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let json = serde_json::json!({
            "idMeal": "52819",
            "strMeal": "Cajun spiced fish tacos",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/uvuyxu1503067369.jpg",
            "strTags": null
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.id, MealId::new("52819"));
        assert_eq!(product.display_name, "Cajun spiced fish tacos");
    }

    #[test]
    fn test_deserialize_requires_id() {
        let json = serde_json::json!({ "strMeal": "Kedgeree", "strMealThumb": "" });
        assert!(serde_json::from_value::<Product>(json).is_err());
    }
}
