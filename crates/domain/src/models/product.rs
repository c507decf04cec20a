use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::Record;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductCategory {
    Eggs,
    Birds,
    Feed,
    Manure,
    Equipment,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: f64,
    pub discount: f64, // percentage, applied server-side
    pub quantity_in_stock: i64,
    pub unit: String, // crate, bird, bag...
    pub image: Option<String>,
    pub published: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.quantity_in_stock > 0
    }
}

impl Record for Product {
    const RESOURCE: &'static str = "/products";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_server_payload() {
        let product: Product = serde_json::from_value(json!({
            "_id": "65f1c",
            "name": "Jumbo eggs",
            "category": "eggs",
            "price": 4500,
            "quantityInStock": 12,
            "unit": "crate",
            "createdAt": "2026-10-01T09:00:00Z",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(product.id, "65f1c");
        assert_eq!(product.category, ProductCategory::Eggs);
        assert_eq!(product.price, 4500.0);
        assert!(product.in_stock());
        assert!(product.created_at.is_some());
        assert_eq!(product.path(), "/products/65f1c");
    }

    #[test]
    fn test_empty_template_is_new() {
        let product = Product::default();
        assert!(product.is_new());
        assert_eq!(product.category, ProductCategory::Other);

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["_id"], "");
        assert!(value.get("quantityInStock").is_some());
    }
}
