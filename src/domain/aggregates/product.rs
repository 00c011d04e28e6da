//! Catalog records: products, categories and customizations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Remote URLs or data URIs, first one is the primary image.
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub category_id: String,
    #[serde(default)]
    pub sub_category_id: Option<String>,
    pub stock_level: u32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization_ids: Option<Vec<String>>,
}

impl Product {
    pub fn is_in_stock(&self) -> bool { self.stock_level > 0 }

    /// The product's customizations in configured order. Ids with no matching
    /// customization are skipped.
    pub fn customizations<'a>(&self, all: &'a [Customization]) -> Vec<&'a Customization> {
        self.customization_ids
            .iter()
            .flatten()
            .filter_map(|id| all.iter().find(|c| &c.id == id))
            .collect()
    }

    pub fn detach_customization(&mut self, customization_id: &str) -> bool {
        match self.customization_ids.as_mut() {
            Some(ids) => {
                let before = ids.len();
                ids.retain(|id| id != customization_id);
                ids.len() != before
            }
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationOption {
    pub value: String,
    pub price_modifier: Decimal,
}

/// A named variation dimension (finish, engraving, ...) with its option menu.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub options: Vec<CustomizationOption>,
}

impl Customization {
    pub fn option(&self, value: &str) -> Option<&CustomizationOption> { self.options.iter().find(|o| o.value == value) }
    pub fn default_option(&self) -> Option<&CustomizationOption> { self.options.first() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        Product {
            id: "prod-1".into(), slug: "lampe".into(), name: "Lampe".into(), description: String::new(),
            price: Decimal::new(200, 0), image_urls: vec![], category_id: "luminaires".into(),
            sub_category_id: None, stock_level: 0, is_featured: false,
            customization_ids: Some(vec!["finish".into(), "missing".into(), "engraving".into()]),
        }
    }

    fn custom(id: &str) -> Customization {
        Customization { id: id.into(), name: id.to_uppercase(), options: vec![] }
    }

    #[test]
    fn test_customizations_follow_product_order() {
        let all = vec![custom("engraving"), custom("finish")];
        let ids: Vec<_> = lamp().customizations(&all).iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["finish", "engraving"]);
    }

    #[test]
    fn test_detach_customization() {
        let mut p = lamp();
        assert!(p.detach_customization("finish"));
        assert_eq!(p.customization_ids, Some(vec!["missing".to_string(), "engraving".to_string()]));
        assert!(!p.detach_customization("finish"));
        assert!(!p.is_in_stock());
    }

    #[test]
    fn test_product_json_layout() {
        let json = serde_json::json!({
            "id": "prod-1", "slug": "lampe", "name": "Lampe", "description": "",
            "price": 200, "imageUrls": ["https://img/1.jpg"], "categoryId": "luminaires",
            "subCategoryId": null, "stockLevel": 3, "isFeatured": true
        });
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.price, Decimal::new(200, 0));
        assert_eq!(p.image_urls, vec!["https://img/1.jpg"]);
        assert!(p.customization_ids.is_none());
    }
}
