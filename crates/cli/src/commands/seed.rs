//! Seed a restaurant's menu from a YAML file.
//!
//! ```yaml
//! categories:
//!   - name: مشروبات
//!     name_en: Drinks
//!     icon: "☕"
//!     display_order: 0
//!     products:
//!       - name: قهوة
//!         name_en: Coffee
//!         price: 12.5
//! ```
//!
//! The whole file is validated before anything is written. Categories whose
//! Arabic name already exists in the restaurant are reused, not duplicated.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use qr_menu_core::{CategoryDraft, CategoryId, ProductDraft, RestaurantId};
use qr_menu_data::{Gateway, Services};

use super::CliError;

/// Category id used while validating, before the real id exists.
const PENDING_CATEGORY: &str = "pending";

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub icon: String,
    pub display_order: Option<i32>,
    #[serde(default = "enabled")]
    pub is_active: bool,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_en: String,
    pub price: SeedPrice,
    #[serde(default = "enabled")]
    pub is_available: bool,
}

/// Price written either as a YAML number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedPrice {
    Number(serde_yaml::Number),
    Text(String),
}

impl SeedPrice {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

const fn enabled() -> bool {
    true
}

/// A validated category and the products that go under it.
#[derive(Debug, Clone)]
pub struct PlannedCategory {
    pub draft: CategoryDraft,
    pub products: Vec<ProductDraft>,
}

/// What [`apply`] wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub categories_reused: usize,
    pub products_created: usize,
}

impl SeedFile {
    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid YAML.
    pub async fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Err(CliError::Seed(format!(
                "file not found: {}",
                path.display()
            )));
        }
        info!(path = %path.display(), "Loading seed file");
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse seed YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid seed document.
    pub fn parse(content: &str) -> Result<Self, CliError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validate every entry into drafts for `restaurant`.
    ///
    /// Product drafts carry a placeholder category id until their category
    /// has been saved.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry, or a duplicated category name.
    pub fn plan(&self, restaurant: &RestaurantId) -> Result<Vec<PlannedCategory>, CliError> {
        let mut seen = HashSet::new();
        let mut planned = Vec::with_capacity(self.categories.len());

        for (index, category) in self.categories.iter().enumerate() {
            let order = category
                .display_order
                .map_or_else(|| index.to_string(), |o| o.to_string());
            let draft = CategoryDraft::from_form(
                None,
                restaurant.clone(),
                &category.name,
                &category.name_en,
                &category.icon,
                &order,
                category.is_active,
            )
            .map_err(|source| CliError::Draft {
                entry: format!("category #{}", index + 1),
                source,
            })?;

            if !seen.insert(draft.name.ar.clone()) {
                return Err(CliError::Seed(format!(
                    "category {} appears twice",
                    draft.name.ar
                )));
            }

            let products = category
                .products
                .iter()
                .map(|product| {
                    ProductDraft::from_form(
                        None,
                        restaurant.clone(),
                        PENDING_CATEGORY,
                        &product.name,
                        &product.name_en,
                        &product.description,
                        &product.description_en,
                        &product.price.as_text(),
                        product.is_available,
                    )
                    .map_err(|source| CliError::Draft {
                        entry: format!("{} / {}", draft.name.ar, product.name.trim()),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            planned.push(PlannedCategory { draft, products });
        }

        Ok(planned)
    }
}

/// Write the seed file's categories and products into `restaurant`.
///
/// # Errors
///
/// Returns an error if the file is invalid, the restaurant does not exist,
/// or a write fails. Writes made before a failure are kept.
pub async fn apply<G: Gateway>(
    services: &Services<G>,
    restaurant: &RestaurantId,
    seed: &SeedFile,
) -> Result<SeedSummary, CliError> {
    let plan = seed.plan(restaurant)?;

    let found = services.restaurants().get_by_id(restaurant).await?;
    info!(restaurant = %found.name.ar, categories = plan.len(), "Seeding menu");

    let mut summary = SeedSummary::default();
    for PlannedCategory { draft, products } in plan {
        let category_id = match find_category(services, restaurant, &draft).await? {
            Some(id) => {
                warn!(category = %draft.name.ar, "Category exists, adding products to it");
                summary.categories_reused += 1;
                id
            }
            None => {
                services.categories().save(&draft).await?;
                summary.categories_created += 1;
                find_category(services, restaurant, &draft)
                    .await?
                    .ok_or_else(|| {
                        CliError::Seed(format!("category {} not found after save", draft.name.ar))
                    })?
            }
        };

        for mut product in products {
            product.category_id = category_id.clone();
            services.products().save(&product, None).await?;
            summary.products_created += 1;
        }
    }

    info!(
        created = summary.categories_created,
        reused = summary.categories_reused,
        products = summary.products_created,
        "Seed complete"
    );
    Ok(summary)
}

async fn find_category<G: Gateway>(
    services: &Services<G>,
    restaurant: &RestaurantId,
    draft: &CategoryDraft,
) -> Result<Option<CategoryId>, CliError> {
    let categories = services.categories().list(restaurant, false).await?;
    Ok(categories
        .into_iter()
        .find(|c| c.name.ar == draft.name.ar)
        .map(|c| c.id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use qr_menu_core::{DraftError, Price};
    use qr_menu_data::ServiceSettings;
    use qr_menu_data::gateway::{MemoryGateway, Table};

    use super::*;

    const MENU: &str = r#"
categories:
  - name: مشروبات
    name_en: Drinks
    icon: "☕"
    products:
      - name: قهوة
        name_en: Coffee
        price: 12.5
      - name: شاي
        price: "8"
        is_available: false
  - name: حلويات
    display_order: 5
    is_active: false
"#;

    fn setup() -> (Services<MemoryGateway>, RestaurantId) {
        let gateway = MemoryGateway::new();
        let id = gateway
            .insert_row(
                Table::Restaurants,
                json!({"name": "مقهى الريش", "default_language": "ar"}),
            )
            .unwrap();
        (
            Services::new(gateway, ServiceSettings::default()),
            RestaurantId::new(id),
        )
    }

    #[test]
    fn test_plan_applies_defaults() {
        let seed = SeedFile::parse(MENU).unwrap();
        let plan = seed.plan(&RestaurantId::new("r1")).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].draft.display_order, 0);
        assert!(plan[0].draft.is_active);
        assert_eq!(plan[0].products.len(), 2);
        assert!(!plan[0].products[1].is_available);
        assert_eq!(plan[0].products[1].price, Price::from(8));

        assert_eq!(plan[1].draft.display_order, 5);
        assert!(!plan[1].draft.is_active);
        assert_eq!(plan[1].draft.icon, qr_menu_core::DEFAULT_CATEGORY_ICON);
    }

    #[test]
    fn test_plan_rejects_bad_entries() {
        let bad_price = SeedFile::parse(
            "categories:\n  - name: مشروبات\n    products:\n      - name: قهوة\n        price: -3\n",
        )
        .unwrap();
        assert!(matches!(
            bad_price.plan(&RestaurantId::new("r1")),
            Err(CliError::Draft {
                source: DraftError::InvalidPrice(_),
                ..
            })
        ));

        let twice =
            SeedFile::parse("categories:\n  - name: مشروبات\n  - name: \" مشروبات \"\n").unwrap();
        assert!(matches!(
            twice.plan(&RestaurantId::new("r1")),
            Err(CliError::Seed(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_creates_categories_and_products() {
        let (services, restaurant) = setup();
        let seed = SeedFile::parse(MENU).unwrap();

        let summary = apply(&services, &restaurant, &seed).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                categories_created: 2,
                categories_reused: 0,
                products_created: 2,
            }
        );
        let categories = services.categories().list(&restaurant, false).await.unwrap();
        let drinks = categories.iter().find(|c| c.name.ar == "مشروبات").unwrap();
        let products = services.products().list(&restaurant).await.unwrap();
        assert!(products.iter().all(|p| p.category_id == drinks.id));
    }

    #[tokio::test]
    async fn test_apply_twice_reuses_categories() {
        let (services, restaurant) = setup();
        let seed = SeedFile::parse(MENU).unwrap();
        apply(&services, &restaurant, &seed).await.unwrap();

        let summary = apply(&services, &restaurant, &seed).await.unwrap();

        assert_eq!(summary.categories_created, 0);
        assert_eq!(summary.categories_reused, 2);
        assert_eq!(services.gateway().rows(Table::Categories).len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_file_writes_nothing() {
        let (services, restaurant) = setup();
        let seed = SeedFile::parse("categories:\n  - name: \"  \"\n").unwrap();

        assert!(apply(&services, &restaurant, &seed).await.is_err());
        assert!(services.gateway().rows(Table::Categories).is_empty());
    }
}
