//! Render-ready projection of [`CustomerViewModel`].

use qr_menu_core::{Category, Lang, Product};

use super::{CustomerViewModel, MenuLabels, MenuPhase};

/// One entry of the category strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryHeader {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub currency: &'static str,
    pub image_url: String,
    pub is_available: bool,
    /// CSS modifier, `available` or `unavailable`.
    pub state_class: &'static str,
}

/// The product overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetailView {
    pub image_url: String,
    pub name: String,
    pub category_name: String,
    pub description: String,
    pub price: String,
    pub currency: &'static str,
    pub order_button: &'static str,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub lang: &'static str,
    pub dir: &'static str,
    pub restaurant_name: String,
    pub logo: Option<String>,
    pub labels: MenuLabels,
    pub nav: Vec<NavItem>,
    pub header: Option<CategoryHeader>,
    pub products: Vec<ProductCardView>,
    pub detail: Option<ProductDetailView>,
    /// Set when the page shows the not-found notice instead of the menu.
    pub empty_message: Option<String>,
}

fn card(product: &Product, lang: Lang, labels: &MenuLabels) -> ProductCardView {
    ProductCardView {
        id: product.id.to_string(),
        name: product.name.get(lang).to_string(),
        description: product.description.get(lang).to_string(),
        price: product.price.to_string(),
        currency: labels.currency,
        image_url: product.image_url.clone(),
        is_available: product.is_available,
        state_class: if product.is_available {
            "available"
        } else {
            "unavailable"
        },
    }
}

impl CustomerViewModel {
    fn category(&self, product: &Product) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == product.category_id)
    }

    /// Project the snapshot in the current language.
    #[must_use]
    pub fn view(&self) -> MenuView {
        let lang = self.lang;
        let labels = self.labels();

        let nav = self
            .categories
            .iter()
            .map(|c| NavItem {
                id: c.id.to_string(),
                label: c.name.get(lang).to_string(),
                icon: c.icon.clone(),
                active: self.selected_category.as_ref() == Some(&c.id),
            })
            .collect();

        let header = self.active_category().map(|c| CategoryHeader {
            name: c.name.get(lang).to_string(),
            icon: c.icon.clone(),
        });

        let products = self
            .visible_products()
            .into_iter()
            .map(|p| card(p, lang, &labels))
            .collect();

        let detail = self
            .open_product
            .as_ref()
            .and_then(|id| self.products.iter().find(|p| &p.id == id))
            .map(|p| ProductDetailView {
                image_url: p.image_url.clone(),
                name: p.name.get(lang).to_string(),
                category_name: self
                    .category(p)
                    .map(|c| c.name.get(lang).to_string())
                    .unwrap_or_default(),
                description: p.description.get(lang).to_string(),
                price: p.price.to_string(),
                currency: labels.currency,
                order_button: labels.order_button,
                is_available: p.is_available,
            });

        let empty_message = (self.phase == MenuPhase::Empty).then(|| {
            self.load_error
                .clone()
                .unwrap_or_else(|| labels.not_found.to_string())
        });

        MenuView {
            lang: lang.code(),
            dir: lang.dir(),
            restaurant_name: self
                .restaurant
                .as_ref()
                .map(|r| r.name.get(lang).to_string())
                .unwrap_or_default(),
            logo: self.restaurant.as_ref().and_then(|r| r.logo.clone()),
            labels,
            nav,
            header,
            products,
            detail,
            empty_message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use qr_menu_core::{CategoryId, LocalizedText, Price, ProductId, RestaurantId};

    fn category(id: &str, order: i32, ar: &str, en: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            restaurant_id: RestaurantId::new("r1"),
            name: LocalizedText::new(ar, Some(en.to_string())),
            icon: "☕".to_string(),
            display_order: order,
            is_active: true,
        }
    }

    fn product(id: &str, category: &str, price: u32, available: bool) -> Product {
        Product {
            id: ProductId::new(id),
            restaurant_id: RestaurantId::new("r1"),
            category_id: CategoryId::new(category),
            name: LocalizedText::new(format!("منتج {id}"), Some(format!("Item {id}"))),
            description: LocalizedText::new("وصف", None),
            price: Price::from(price),
            image_url: "https://img.example/p.jpg".to_string(),
            has_custom_image: true,
            is_available: available,
            created_at: None,
        }
    }

    fn ready() -> CustomerViewModel {
        CustomerViewModel {
            phase: MenuPhase::Ready,
            categories: vec![
                category("c1", 0, "مشروبات", "Drinks"),
                category("c2", 1, "حلويات", "Sweets"),
            ],
            products: vec![product("p1", "c1", 10, true), product("p2", "c2", 20, false)],
            selected_category: Some(CategoryId::new("c1")),
            ..CustomerViewModel::default()
        }
    }

    #[test]
    fn test_nav_in_display_order_with_active_highlight() {
        let view = ready().view();
        let labels: Vec<&str> = view.nav.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["مشروبات", "حلويات"]);
        assert!(view.nav[0].active);
        assert!(!view.nav[1].active);
        assert_eq!(view.header.unwrap().name, "مشروبات");
    }

    #[test]
    fn test_switch_renders_only_new_category() {
        let mut vm = ready();
        vm.select_category(&CategoryId::new("c2"));
        let view = vm.view();
        let ids: Vec<&str> = view.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2"]);
    }

    #[test]
    fn test_unavailable_product_has_distinct_state() {
        let mut vm = ready();
        assert_eq!(vm.view().products[0].state_class, "available");
        vm.select_category(&CategoryId::new("c2"));
        let card = &vm.view().products[0];
        assert!(!card.is_available);
        assert_eq!(card.state_class, "unavailable");
    }

    #[test]
    fn test_detail_uses_language_and_falls_back_to_arabic() {
        let mut vm = ready();
        vm.open_product(&ProductId::new("p1"));
        vm.toggle_language();

        let detail = vm.view().detail.unwrap();
        assert_eq!(detail.name, "Item p1");
        assert_eq!(detail.category_name, "Drinks");
        assert_eq!(detail.description, "وصف");
        assert_eq!(detail.currency, "SAR");
        assert_eq!(detail.order_button, "Add to Order");
        assert_eq!(vm.view().dir, "ltr");
    }

    #[test]
    fn test_empty_phase_shows_not_found() {
        let vm = CustomerViewModel {
            phase: MenuPhase::Empty,
            ..CustomerViewModel::default()
        };
        assert_eq!(
            vm.view().empty_message.as_deref(),
            Some(MenuLabels::for_lang(Lang::Ar).not_found)
        );
    }
}
