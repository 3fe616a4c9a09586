//! Raw table rows and their conversion to domain records.
//!
//! Optional columns are resolved here, once: a missing English name stays
//! `None`, a missing product image becomes the placeholder, a missing icon
//! becomes the default icon, unknown languages become Arabic. Nothing past
//! this module sees a raw row.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use qr_menu_core::{
    AdminId, AdminRole, Category, CategoryDraft, CategoryId, DEFAULT_CATEGORY_ICON, Email, Lang,
    LocalizedText, Price, Product, ProductDraft, ProductId, Restaurant, RestaurantAdmin,
    RestaurantId, RestaurantUpdate,
};

/// Errors converting rows into records.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// Row shape did not match the expected columns.
    #[error("row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Row decoded but holds a value the domain rejects.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Decode every value as `R` and convert it with `convert`.
///
/// A row that does not decode or convert is logged and skipped; the rest
/// of the list is kept.
pub fn decode_list<R, T>(
    table: &str,
    values: Vec<Value>,
    convert: impl Fn(R) -> Result<T, RowError>,
) -> Vec<T>
where
    R: DeserializeOwned,
{
    values
        .into_iter()
        .filter_map(|value| {
            let id = value.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(value).map_err(RowError::from).and_then(&convert) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(table, id = %id, error = %e, "skipping malformed row");
                    None
                }
            }
        })
        .collect()
}

/// Decode one value as `R` and convert it with `convert`.
///
/// # Errors
///
/// Fails if the value does not decode or convert.
pub fn decode_one<R, T>(
    value: Value,
    convert: impl Fn(R) -> Result<T, RowError>,
) -> Result<T, RowError>
where
    R: DeserializeOwned,
{
    convert(serde_json::from_value(value)?)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// `restaurants` row.
#[derive(Debug, Deserialize)]
pub struct RestaurantRow {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub default_language: Option<String>,
    pub logo: Option<String>,
    pub admin_email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<RestaurantRow> for Restaurant {
    type Error = RowError;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        let admin_email = non_blank(row.admin_email)
            .map(|raw| Email::parse(&raw))
            .transpose()
            .map_err(|e| RowError::DataCorruption(format!("invalid restaurant email: {e}")))?;

        Ok(Self {
            id: RestaurantId::new(row.id),
            name: LocalizedText::new(row.name, row.name_en),
            default_language: Lang::from_code_or_default(row.default_language.as_deref()),
            logo: non_blank(row.logo),
            admin_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// `restaurant_admins` row.
#[derive(Debug, Deserialize)]
pub struct AdminRow {
    pub id: String,
    pub restaurant_id: String,
    pub email: String,
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<AdminRow> for RestaurantAdmin {
    type Error = RowError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email)
            .map_err(|e| RowError::DataCorruption(format!("invalid admin email: {e}")))?;
        // Unknown or missing roles get the least-privileged role
        let role = row
            .role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or_default();

        Ok(Self {
            id: AdminId::new(row.id),
            restaurant_id: RestaurantId::new(row.restaurant_id),
            email,
            role,
            created_at: row.created_at,
        })
    }
}

/// `categories` row.
#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RowError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(row.id),
            restaurant_id: RestaurantId::new(row.restaurant_id),
            name: LocalizedText::new(row.name, row.name_en),
            icon: non_blank(row.icon).unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string()),
            display_order: row.display_order.unwrap_or_default(),
            is_active: row.is_active.unwrap_or(true),
        })
    }
}

/// `products` row.
#[derive(Debug, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub restaurant_id: String,
    pub category_id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRow {
    /// Convert to a [`Product`], substituting `placeholder_image` when the
    /// row has no image.
    #[must_use]
    pub fn into_product(self, placeholder_image: &str) -> Product {
        let image = non_blank(self.image);
        let has_custom_image = image.is_some();

        Product {
            id: ProductId::new(self.id),
            restaurant_id: RestaurantId::new(self.restaurant_id),
            category_id: CategoryId::new(self.category_id),
            name: LocalizedText::new(self.name, self.name_en),
            description: LocalizedText::new(self.description.unwrap_or_default(), self.description_en),
            price: self.price.unwrap_or_default(),
            image_url: image.unwrap_or_else(|| placeholder_image.to_string()),
            has_custom_image,
            is_available: self.is_available.unwrap_or(true),
            created_at: self.created_at,
        }
    }
}

// =============================================================================
// Write payloads
// =============================================================================

/// Column values for a category insert or update.
#[must_use]
pub fn category_payload(draft: &CategoryDraft) -> Value {
    let mut payload = json!({
        "name": draft.name.ar,
        "name_en": draft.name.en,
        "icon": draft.icon,
        "display_order": draft.display_order,
        "is_active": draft.is_active,
    });
    if draft.id.is_none() {
        payload["restaurant_id"] = json!(draft.restaurant_id);
    }
    payload
}

/// Column values for a product insert or update.
///
/// `image` is only written when a new image was uploaded; an update without
/// one keeps the stored image.
#[must_use]
pub fn product_payload(draft: &ProductDraft, image: Option<&str>) -> Value {
    let mut payload = json!({
        "category_id": draft.category_id,
        "name": draft.name.ar,
        "name_en": draft.name.en,
        "description": draft.description.ar,
        "description_en": draft.description.en,
        "price": draft.price,
        "is_available": draft.is_available,
    });
    if let Some(image) = image {
        payload["image"] = json!(image);
    }
    if draft.id.is_none() {
        payload["restaurant_id"] = json!(draft.restaurant_id);
    }
    payload
}

/// Column values for the restaurant settings form.
#[must_use]
pub fn restaurant_payload(update: &RestaurantUpdate, updated_at: DateTime<Utc>) -> Value {
    json!({
        "name": update.name.ar,
        "name_en": update.name.en,
        "default_language": update.default_language,
        "updated_at": updated_at,
    })
}

/// New `restaurant_admins` row.
#[must_use]
pub fn admin_payload(restaurant_id: &RestaurantId, email: &Email, role: AdminRole) -> Value {
    json!({
        "restaurant_id": restaurant_id,
        "email": email,
        "role": role,
    })
}
