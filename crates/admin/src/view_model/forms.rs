//! Raw form input, kept in the modal so a rejected submit shows what was typed.

use serde::{Deserialize, Serialize};

use qr_menu_core::{
    AdminRole, Category, CategoryDraft, CategoryId, DraftError, Lang, Product, ProductDraft,
    ProductId, Restaurant, RestaurantId, RestaurantUpdate,
};

/// HTML checkbox: present (any value) when ticked, absent otherwise.
fn checked(value: Option<&String>) -> bool {
    value.is_some()
}

fn parse_id<T: From<String>>(raw: Option<&String>) -> Option<T> {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| T::from(s.to_string()))
}

/// Category modal fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub display_order: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl CategoryForm {
    /// Empty form for a new category; active by default.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            is_active: Some("on".to_string()),
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing category.
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        Self {
            id: Some(category.id.to_string()),
            name: category.name.ar.clone(),
            name_en: category.name.en_or_empty().to_string(),
            icon: category.icon.clone(),
            display_order: category.display_order.to_string(),
            is_active: category.is_active.then(|| "on".to_string()),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        checked(self.is_active.as_ref())
    }

    /// Validate into a draft for `restaurant_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`DraftError`] describing the first invalid field.
    pub fn to_draft(&self, restaurant_id: &RestaurantId) -> Result<CategoryDraft, DraftError> {
        CategoryDraft::from_form(
            parse_id::<CategoryId>(self.id.as_ref()),
            restaurant_id.clone(),
            &self.name,
            &self.name_en,
            &self.icon,
            &self.display_order,
            self.is_active(),
        )
    }
}

/// Product modal fields. The image travels separately as an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub is_available: Option<String>,
    /// Current image, shown as a preview while editing.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductForm {
    /// Empty form; preselects `category` (the active filter) when given.
    #[must_use]
    pub fn blank(category: Option<&CategoryId>) -> Self {
        Self {
            category_id: category.map(ToString::to_string).unwrap_or_default(),
            is_available: Some("on".to_string()),
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.to_string()),
            category_id: product.category_id.to_string(),
            name: product.name.ar.clone(),
            name_en: product.name.en_or_empty().to_string(),
            description: product.description.ar.clone(),
            description_en: product.description.en_or_empty().to_string(),
            price: product.price.to_string(),
            is_available: product.is_available.then(|| "on".to_string()),
            image_url: product.has_custom_image.then(|| product.image_url.clone()),
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        checked(self.is_available.as_ref())
    }

    /// Validate into a draft for `restaurant_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`DraftError`] describing the first invalid field.
    pub fn to_draft(&self, restaurant_id: &RestaurantId) -> Result<ProductDraft, DraftError> {
        ProductDraft::from_form(
            parse_id::<ProductId>(self.id.as_ref()),
            restaurant_id.clone(),
            &self.category_id,
            &self.name,
            &self.name_en,
            &self.description,
            &self.description_en,
            &self.price,
            self.is_available(),
        )
    }
}

/// Admin invite modal fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: AdminRole,
}

/// Restaurant settings panel fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub default_language: Lang,
}

impl SettingsForm {
    #[must_use]
    pub fn from_restaurant(restaurant: &Restaurant) -> Self {
        Self {
            name: restaurant.name.ar.clone(),
            name_en: restaurant.name.en_or_empty().to_string(),
            default_language: restaurant.default_language,
        }
    }

    /// # Errors
    ///
    /// Returns [`DraftError::MissingName`] if the Arabic name is blank.
    pub fn to_update(&self) -> Result<RestaurantUpdate, DraftError> {
        RestaurantUpdate::from_form(&self.name, &self.name_en, self.default_language)
    }
}
