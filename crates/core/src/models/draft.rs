//! Drafts: validated input for create/update operations.
//!
//! A draft with an `id` updates that record; a draft without one inserts a
//! new record under `restaurant_id`.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Lang, LocalizedText, Price, PriceError, ProductId, RestaurantId};

use super::DEFAULT_CATEGORY_ICON;

/// Validation failures for drafts built from form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// The Arabic name is blank.
    #[error("name is required")]
    MissingName,
    /// No category was selected for a product.
    #[error("category is required")]
    MissingCategory,
    /// The price field is not a non-negative number.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
    /// The display order is not an integer.
    #[error("display order must be a whole number")]
    InvalidOrder,
}

impl DraftError {
    /// Message shown inside the form.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MissingName => "يرجى إدخال الاسم بالعربية",
            Self::MissingCategory => "يرجى اختيار القسم",
            Self::InvalidPrice(_) => "يرجى إدخال سعر صحيح",
            Self::InvalidOrder => "ترتيب العرض يجب أن يكون رقماً صحيحاً",
        }
    }
}

/// Create or update a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub id: Option<CategoryId>,
    pub restaurant_id: RestaurantId,
    pub name: LocalizedText,
    pub icon: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl CategoryDraft {
    /// Build a draft from raw form fields.
    ///
    /// A blank icon becomes the default icon; a blank display order becomes 0.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::MissingName`] or [`DraftError::InvalidOrder`].
    pub fn from_form(
        id: Option<CategoryId>,
        restaurant_id: RestaurantId,
        name_ar: &str,
        name_en: &str,
        icon: &str,
        display_order: &str,
        is_active: bool,
    ) -> Result<Self, DraftError> {
        let name_ar = name_ar.trim();
        if name_ar.is_empty() {
            return Err(DraftError::MissingName);
        }

        let display_order = match display_order.trim() {
            "" => 0,
            raw => raw.parse::<i32>().map_err(|_| DraftError::InvalidOrder)?,
        };

        let icon = match icon.trim() {
            "" => DEFAULT_CATEGORY_ICON.to_string(),
            icon => icon.to_string(),
        };

        Ok(Self {
            id,
            restaurant_id,
            name: LocalizedText::new(name_ar, Some(name_en.trim().to_string())),
            icon,
            display_order,
            is_active,
        })
    }
}

/// Create or update a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub restaurant_id: RestaurantId,
    pub category_id: CategoryId,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: Price,
    pub is_available: bool,
}

impl ProductDraft {
    /// Build a draft from raw form fields.
    ///
    /// # Errors
    ///
    /// Returns a [`DraftError`] for a blank name, missing category or bad price.
    #[allow(clippy::too_many_arguments)]
    pub fn from_form(
        id: Option<ProductId>,
        restaurant_id: RestaurantId,
        category_id: &str,
        name_ar: &str,
        name_en: &str,
        description_ar: &str,
        description_en: &str,
        price: &str,
        is_available: bool,
    ) -> Result<Self, DraftError> {
        let name_ar = name_ar.trim();
        if name_ar.is_empty() {
            return Err(DraftError::MissingName);
        }
        let category_id = category_id.trim();
        if category_id.is_empty() {
            return Err(DraftError::MissingCategory);
        }
        let price = Price::parse(price)?;

        Ok(Self {
            id,
            restaurant_id,
            category_id: CategoryId::new(category_id),
            name: LocalizedText::new(name_ar, Some(name_en.trim().to_string())),
            description: LocalizedText::new(
                description_ar.trim(),
                Some(description_en.trim().to_string()),
            ),
            price,
            is_available,
        })
    }
}

/// Restaurant settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: LocalizedText,
    pub default_language: Lang,
}

impl RestaurantUpdate {
    /// Build from raw form fields.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::MissingName`] if the Arabic name is blank.
    pub fn from_form(name_ar: &str, name_en: &str, default_language: Lang) -> Result<Self, DraftError> {
        let name_ar = name_ar.trim();
        if name_ar.is_empty() {
            return Err(DraftError::MissingName);
        }
        Ok(Self {
            name: LocalizedText::new(name_ar, Some(name_en.trim().to_string())),
            default_language,
        })
    }
}

/// An image file chosen in a form, held in memory until uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name as sent by the browser.
    pub file_name: String,
    /// MIME type as sent by the browser.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Extension used when deriving the storage key.
    ///
    /// Lowercased text after the last dot; `bin` when the name has none.
    #[must_use]
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string())
    }

    /// MIME type to send with the upload.
    #[must_use]
    pub fn mime(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
