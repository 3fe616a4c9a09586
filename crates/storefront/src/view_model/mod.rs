//! Customer menu state.
//!
//! One [`CustomerViewModel`] is built when a visitor opens `/menu?r=...`
//! and kept in their session. Category switching, the product overlay and
//! the language toggle only change this snapshot; none of them call the
//! data store again.

mod labels;
mod view;

pub use labels::{INVALID_LINK, MenuLabels};
pub use view::{CategoryHeader, MenuView, NavItem, ProductCardView, ProductDetailView};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use qr_menu_core::{Category, CategoryId, Lang, Product, ProductId, Restaurant, RestaurantId};
use qr_menu_data::{ApiError, Gateway, Services};

/// Where the menu page is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MenuPhase {
    #[default]
    Loading,
    Ready,
    /// The link names a restaurant the store does not know, or it could not
    /// be loaded.
    Empty,
    /// The link carries no restaurant id. Terminal.
    InvalidLink,
}

/// The public menu of one restaurant as seen by one visitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerViewModel {
    pub phase: MenuPhase,
    pub restaurant: Option<Restaurant>,
    /// Active categories in display order.
    pub categories: Vec<Category>,
    /// All products, newest first.
    pub products: Vec<Product>,
    pub lang: Lang,
    pub selected_category: Option<CategoryId>,
    pub open_product: Option<ProductId>,
    /// Set when the restaurant exists but could not be loaded.
    pub load_error: Option<String>,
}

impl CustomerViewModel {
    /// View for a link without a restaurant id.
    #[must_use]
    pub fn invalid_link() -> Self {
        Self {
            phase: MenuPhase::InvalidLink,
            ..Self::default()
        }
    }

    /// Load the menu named by the `r` query parameter.
    ///
    /// A missing or blank id makes no calls. Categories and products are
    /// fetched together once the restaurant is known; either may fail
    /// without hiding the other.
    #[instrument(skip(services))]
    pub async fn enter<G: Gateway>(services: &Services<G>, restaurant: Option<&str>) -> Self {
        let Some(id) = restaurant.map(str::trim).filter(|id| !id.is_empty()) else {
            return Self::invalid_link();
        };
        let id = RestaurantId::new(id);

        let restaurant = match services.restaurants().get_by_id(&id).await {
            Ok(restaurant) => restaurant,
            Err(e) => return Self::empty(&e),
        };

        let category_service = services.categories();
        let product_service = services.products();
        let (categories, products) = tokio::join!(
            category_service.list(&id, true),
            product_service.list(&id),
        );

        let mut vm = Self {
            lang: restaurant.default_language,
            restaurant: Some(restaurant),
            ..Self::default()
        };
        match categories {
            Ok(categories) => vm.categories = categories,
            Err(e) => tracing::warn!(error = %e, "menu categories unavailable"),
        }
        match products {
            Ok(products) => vm.products = products,
            Err(e) => tracing::warn!(error = %e, "menu products unavailable"),
        }
        vm.selected_category = vm.categories.first().map(|c| c.id.clone());
        vm.phase = MenuPhase::Ready;
        vm
    }

    fn empty(error: &ApiError) -> Self {
        let load_error = if error.is_not_found() {
            None
        } else {
            tracing::warn!(error = %error, "menu restaurant unavailable");
            Some(error.message.clone())
        };
        Self {
            phase: MenuPhase::Empty,
            load_error,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn restaurant_id(&self) -> Option<&RestaurantId> {
        self.restaurant.as_ref().map(|r| &r.id)
    }

    #[must_use]
    pub fn labels(&self) -> MenuLabels {
        MenuLabels::for_lang(self.lang)
    }

    /// The highlighted category.
    #[must_use]
    pub fn active_category(&self) -> Option<&Category> {
        let id = self.selected_category.as_ref()?;
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Products of the highlighted category, newest first.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        match &self.selected_category {
            Some(id) => self.products.iter().filter(|p| p.in_category(id)).collect(),
            None => Vec::new(),
        }
    }

    /// Highlight `id`. Reselecting the active category or naming an
    /// unknown one changes nothing and returns `false`.
    pub fn select_category(&mut self, id: &CategoryId) -> bool {
        if self.selected_category.as_ref() == Some(id) {
            return false;
        }
        if !self.categories.iter().any(|c| &c.id == id) {
            return false;
        }
        self.selected_category = Some(id.clone());
        self.open_product = None;
        true
    }

    /// Open the detail overlay for `id`.
    pub fn open_product(&mut self, id: &ProductId) -> bool {
        if !self.products.iter().any(|p| &p.id == id) {
            return false;
        }
        self.open_product = Some(id.clone());
        true
    }

    pub fn close_product(&mut self) {
        self.open_product = None;
    }

    /// Switch between Arabic and English. Display only.
    pub fn toggle_language(&mut self) {
        self.lang = self.lang.toggled();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use qr_menu_data::ServiceSettings;
    use qr_menu_data::gateway::{MemoryGateway, Operation, Table};
    use serde_json::json;

    struct Fixture {
        gateway: MemoryGateway,
        restaurant: String,
        drinks: String,
        sweets: String,
        hidden: String,
    }

    fn fixture() -> Fixture {
        let gateway = MemoryGateway::new();
        let restaurant = gateway
            .insert_row(
                Table::Restaurants,
                json!({"name": "ريتش كافيه", "name_en": "Rich Cafe", "default_language": "en"}),
            )
            .unwrap();
        let sweets = gateway
            .insert_row(
                Table::Categories,
                json!({"restaurant_id": restaurant, "name": "حلويات", "name_en": "Sweets", "icon": "🍰", "display_order": 1, "is_active": true}),
            )
            .unwrap();
        let drinks = gateway
            .insert_row(
                Table::Categories,
                json!({"restaurant_id": restaurant, "name": "مشروبات", "name_en": "Drinks", "icon": "☕", "display_order": 0, "is_active": true}),
            )
            .unwrap();
        let hidden = gateway
            .insert_row(
                Table::Categories,
                json!({"restaurant_id": restaurant, "name": "موسمي", "display_order": 2, "is_active": false}),
            )
            .unwrap();
        gateway
            .insert_row(
                Table::Products,
                json!({"restaurant_id": restaurant, "category_id": drinks, "name": "قهوة", "name_en": "Coffee", "price": "10", "is_available": true}),
            )
            .unwrap();
        gateway
            .insert_row(
                Table::Products,
                json!({"restaurant_id": restaurant, "category_id": sweets, "name": "كعكة", "price": "20", "is_available": false}),
            )
            .unwrap();
        Fixture {
            gateway,
            restaurant,
            drinks,
            sweets,
            hidden,
        }
    }

    fn services(gateway: &MemoryGateway) -> Services<MemoryGateway> {
        Services::new(gateway.clone(), ServiceSettings::default())
    }

    #[tokio::test]
    async fn test_missing_id_is_invalid_link_without_calls() {
        let f = fixture();
        let vm = CustomerViewModel::enter(&services(&f.gateway), None).await;
        assert_eq!(vm.phase, MenuPhase::InvalidLink);

        let vm = CustomerViewModel::enter(&services(&f.gateway), Some("  ")).await;
        assert_eq!(vm.phase, MenuPhase::InvalidLink);
        assert_eq!(f.gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_restaurant_is_empty() {
        let f = fixture();
        let vm = CustomerViewModel::enter(&services(&f.gateway), Some("nope")).await;
        assert_eq!(vm.phase, MenuPhase::Empty);
        assert!(vm.load_error.is_none());
    }

    #[tokio::test]
    async fn test_restaurant_failure_is_empty_with_message() {
        let f = fixture();
        f.gateway
            .fail(Operation::Select, Some(Table::Restaurants), "timeout");
        let vm = CustomerViewModel::enter(&services(&f.gateway), Some(&f.restaurant)).await;
        assert_eq!(vm.phase, MenuPhase::Empty);
        assert!(vm.load_error.is_some());
    }

    #[tokio::test]
    async fn test_enter_uses_default_language_and_first_active_category() {
        let f = fixture();
        let vm = CustomerViewModel::enter(&services(&f.gateway), Some(&f.restaurant)).await;

        assert_eq!(vm.phase, MenuPhase::Ready);
        assert_eq!(vm.lang, Lang::En);
        let ids: Vec<&str> = vm.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![f.drinks.as_str(), f.sweets.as_str()]);
        assert!(!ids.contains(&f.hidden.as_str()));
        assert_eq!(vm.selected_category.as_ref().map(CategoryId::as_str), Some(f.drinks.as_str()));
    }

    #[tokio::test]
    async fn test_products_failure_keeps_categories() {
        let f = fixture();
        f.gateway
            .fail(Operation::Select, Some(Table::Products), "boom");
        let vm = CustomerViewModel::enter(&services(&f.gateway), Some(&f.restaurant)).await;

        assert_eq!(vm.phase, MenuPhase::Ready);
        assert_eq!(vm.categories.len(), 2);
        assert!(vm.products.is_empty());
    }

    #[tokio::test]
    async fn test_switching_category_shows_only_its_products() {
        let f = fixture();
        let mut vm = CustomerViewModel::enter(&services(&f.gateway), Some(&f.restaurant)).await;

        let names: Vec<&str> = vm.visible_products().iter().map(|p| p.name.ar.as_str()).collect();
        assert_eq!(names, vec!["قهوة"]);

        assert!(vm.select_category(&CategoryId::new(f.sweets.as_str())));
        let names: Vec<&str> = vm.visible_products().iter().map(|p| p.name.ar.as_str()).collect();
        assert_eq!(names, vec!["كعكة"]);
    }

    #[tokio::test]
    async fn test_reselecting_category_is_noop() {
        let f = fixture();
        let mut vm = CustomerViewModel::enter(&services(&f.gateway), Some(&f.restaurant)).await;
        let product = vm.products[0].id.clone();
        assert!(vm.open_product(&product));

        assert!(!vm.select_category(&CategoryId::new(f.drinks.as_str())));
        assert_eq!(vm.open_product.as_ref(), Some(&product));
        assert!(!vm.select_category(&CategoryId::new(f.hidden.as_str())));
    }

    #[tokio::test]
    async fn test_toggle_language_twice_makes_no_calls() {
        let f = fixture();
        let mut vm = CustomerViewModel::enter(&services(&f.gateway), Some(&f.restaurant)).await;
        let calls = f.gateway.calls();
        let before = vm.view();

        vm.toggle_language();
        assert_eq!(vm.lang, Lang::Ar);
        assert_ne!(vm.view(), before);
        vm.toggle_language();

        assert_eq!(vm.view(), before);
        assert_eq!(f.gateway.calls(), calls);
    }

    #[test]
    fn test_open_unknown_product_is_refused() {
        let mut vm = CustomerViewModel::default();
        assert!(!vm.open_product(&ProductId::new("p9")));
        vm.close_product();
        assert!(vm.open_product.is_none());
    }
}
