//! Menu records and the drafts used to create or change them.
//!
//! Records are always fully resolved: optional columns from the data store
//! have already been replaced by their defaults (placeholder image, default
//! icon, default language) when a record is loaded, so rendering code never
//! needs a fallback of its own.

mod draft;

pub use draft::{CategoryDraft, DraftError, ImageUpload, ProductDraft, RestaurantUpdate};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    AdminId, AdminRole, CategoryId, Email, Lang, LocalizedText, Price, ProductId, RestaurantId,
};

/// Icon used for categories saved without one.
pub const DEFAULT_CATEGORY_ICON: &str = "📂";

/// Image shown for products without an uploaded photo.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1541167760496-162955ed8a9f?q=80&w=1000";

/// A restaurant and its branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: LocalizedText,
    /// Language the public menu opens in.
    pub default_language: Lang,
    /// Public URL of the uploaded logo, if any.
    pub logo: Option<String>,
    pub admin_email: Option<Email>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One email's membership in a restaurant's admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantAdmin {
    pub id: AdminId,
    pub restaurant_id: RestaurantId,
    pub email: Email,
    pub role: AdminRole,
    pub created_at: Option<DateTime<Utc>>,
}

/// A menu section such as "Drinks".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub restaurant_id: RestaurantId,
    pub name: LocalizedText,
    /// Short symbol, usually an emoji.
    pub icon: String,
    /// Sort key; lower values are shown first.
    pub display_order: i32,
    /// Hidden from the public menu when false.
    pub is_active: bool,
}

/// A dish or drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub restaurant_id: RestaurantId,
    pub category_id: CategoryId,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: Price,
    /// Uploaded photo, or the placeholder when none was uploaded.
    pub image_url: String,
    /// False when `image_url` is the placeholder.
    pub has_custom_image: bool,
    pub is_available: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product belongs to `category`.
    #[must_use]
    pub fn in_category(&self, category: &CategoryId) -> bool {
        &self.category_id == category
    }
}

/// Count the products that belong to `category`.
#[must_use]
pub fn product_count(products: &[Product], category: &CategoryId) -> usize {
    products.iter().filter(|p| p.in_category(category)).count()
}

/// Public menu link for a restaurant: `{base}/menu?r={id}`.
#[must_use]
pub fn menu_url(base_url: &str, restaurant: &RestaurantId) -> String {
    format!("{}/menu?r={restaurant}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            restaurant_id: RestaurantId::new("r1"),
            category_id: CategoryId::new(category),
            name: LocalizedText::new(id, None),
            description: LocalizedText::default(),
            price: Price::from(10),
            image_url: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            has_custom_image: false,
            is_available: true,
            created_at: None,
        }
    }

    #[test]
    fn test_product_count_per_category() {
        let products = vec![product("p1", "c1"), product("p2", "c2"), product("p3", "c1")];
        assert_eq!(product_count(&products, &CategoryId::new("c1")), 2);
        assert_eq!(product_count(&products, &CategoryId::new("c2")), 1);
        assert_eq!(product_count(&products, &CategoryId::new("c3")), 0);
    }

    #[test]
    fn test_menu_url_trims_trailing_slash() {
        let id = RestaurantId::new("r1");
        assert_eq!(menu_url("https://menu.example/", &id), "https://menu.example/menu?r=r1");
        assert_eq!(menu_url("https://menu.example", &id), "https://menu.example/menu?r=r1");
    }
}
