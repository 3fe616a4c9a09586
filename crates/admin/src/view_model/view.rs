//! Render-ready projection of [`AdminViewModel`] for the dashboard template.
//!
//! Everything the template prints is computed here so the template itself
//! only loops and branches on plain strings and flags.

use qr_menu_core::{AdminRole, Lang, product_count};

use super::{AdminViewModel, CategoryForm, InviteForm, Modal, ModalKind, PendingAction, ProductForm};

/// File name offered by the QR download link.
pub const QR_FILE_NAME: &str = "menu-qr-code.png";

const ALL_CATEGORIES: &str = "جميع الأقسام";
const AVAILABLE: &str = "متوفر";
const UNAVAILABLE: &str = "غير متوفر";
const ACTIVE: &str = "ظاهر";
const HIDDEN: &str = "مخفي";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub id: String,
    pub name: String,
    pub name_en: String,
    pub icon: String,
    pub product_count: usize,
    pub is_active: bool,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub name_en: String,
    pub category_name: String,
    pub price: String,
    pub image_url: String,
    pub is_available: bool,
    pub availability_label: &'static str,
    /// CSS modifier, `available` or `unavailable`.
    pub availability_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRowView {
    pub id: String,
    pub email: String,
    pub role_label: &'static str,
    pub removable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub name: String,
    pub name_en: String,
    pub logo: Option<String>,
    pub default_ar: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmView {
    pub question: String,
    pub warning: Option<String>,
}

/// The open modal. Exactly one of the form fields is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: &'static str,
    pub error: Option<String>,
    pub submitting: bool,
    pub category: Option<CategoryForm>,
    pub product: Option<ProductForm>,
    pub category_options: Vec<SelectOption>,
    pub invite: Option<InviteForm>,
    pub role_options: Vec<SelectOption>,
    pub confirm: Option<ConfirmView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub restaurant_name: String,
    pub user_email: String,
    pub role_label: &'static str,
    pub is_owner: bool,
    pub categories: Vec<CategoryCard>,
    pub filter_options: Vec<SelectOption>,
    pub search: String,
    pub products: Vec<ProductRowView>,
    pub admins: Vec<AdminRowView>,
    pub settings: SettingsView,
    pub menu_url: String,
    pub qr_file_name: &'static str,
    pub notices: Vec<String>,
    pub modal: Option<ModalView>,
}

impl AdminViewModel {
    /// Public menu link for this restaurant.
    #[must_use]
    pub fn menu_url(&self, menu_base_url: &str) -> String {
        let id = self
            .restaurant_id()
            .cloned()
            .unwrap_or_else(|| qr_menu_core::RestaurantId::new(""));
        qr_menu_core::menu_url(menu_base_url, &id)
    }

    /// Project the current state for the dashboard template.
    #[must_use]
    pub fn view(&self, menu_base_url: &str) -> DashboardView {
        let restaurant = self.restaurant.as_ref();

        let categories = self
            .categories
            .iter()
            .map(|c| CategoryCard {
                id: c.id.to_string(),
                name: c.name.ar.clone(),
                name_en: c.name.en_or_empty().to_string(),
                icon: c.icon.clone(),
                product_count: product_count(&self.products, &c.id),
                is_active: c.is_active,
                status_label: if c.is_active { ACTIVE } else { HIDDEN },
            })
            .collect();

        let products = self
            .filtered_products()
            .into_iter()
            .map(|p| ProductRowView {
                id: p.id.to_string(),
                name: p.name.ar.clone(),
                name_en: p.name.en_or_empty().to_string(),
                category_name: self
                    .categories
                    .iter()
                    .find(|c| c.id == p.category_id)
                    .map(|c| c.name.ar.clone())
                    .unwrap_or_default(),
                price: format!("{} {}", p.price, Lang::Ar.currency_label()),
                image_url: p.image_url.clone(),
                is_available: p.is_available,
                availability_label: if p.is_available { AVAILABLE } else { UNAVAILABLE },
                availability_class: if p.is_available { "available" } else { "unavailable" },
            })
            .collect();

        let admins = if self.is_owner() {
            self.admins
                .iter()
                .map(|a| AdminRowView {
                    id: a.id.to_string(),
                    email: a.email.to_string(),
                    role_label: a.role.label(Lang::Ar),
                    removable: a.role.is_removable(),
                })
                .collect()
        } else {
            Vec::new()
        };

        DashboardView {
            restaurant_name: restaurant.map(|r| r.name.ar.clone()).unwrap_or_default(),
            user_email: self.user_email.as_ref().map(ToString::to_string).unwrap_or_default(),
            role_label: self.role.label(Lang::Ar),
            is_owner: self.is_owner(),
            categories,
            filter_options: self.category_options(
                self.filter.category.as_ref().map(|c| c.as_str()),
                true,
            ),
            search: self.filter.search.clone(),
            products,
            admins,
            settings: SettingsView {
                name: restaurant.map(|r| r.name.ar.clone()).unwrap_or_default(),
                name_en: restaurant
                    .map(|r| r.name.en_or_empty().to_string())
                    .unwrap_or_default(),
                logo: restaurant.and_then(|r| r.logo.clone()),
                default_ar: restaurant.is_none_or(|r| r.default_language == Lang::Ar),
                error: self.settings_error.clone(),
            },
            menu_url: self.menu_url(menu_base_url),
            qr_file_name: QR_FILE_NAME,
            notices: self.notices.clone(),
            modal: self.modal.as_ref().map(|m| self.modal_view(m)),
        }
    }

    /// Category `<option>`s, optionally led by "all categories".
    fn category_options(&self, selected: Option<&str>, with_all: bool) -> Vec<SelectOption> {
        let all = with_all.then(|| SelectOption {
            value: String::new(),
            label: ALL_CATEGORIES.to_string(),
            selected: selected.is_none(),
        });
        all.into_iter()
            .chain(self.categories.iter().map(|c| SelectOption {
                value: c.id.to_string(),
                label: format!("{} {}", c.icon, c.name.ar),
                selected: selected == Some(c.id.as_str()),
            }))
            .collect()
    }

    fn modal_view(&self, modal: &Modal) -> ModalView {
        let mut view = ModalView {
            title: "",
            error: modal.error.clone(),
            submitting: modal.submitting,
            category: None,
            product: None,
            category_options: Vec::new(),
            invite: None,
            role_options: Vec::new(),
            confirm: None,
        };

        match &modal.kind {
            ModalKind::Category(form) => {
                view.title = if form.id.is_some() { "تعديل القسم" } else { "إضافة قسم" };
                view.category = Some(form.clone());
            }
            ModalKind::Product(form) => {
                view.title = if form.id.is_some() { "تعديل المنتج" } else { "إضافة منتج" };
                let selected = Some(form.category_id.as_str()).filter(|id| !id.is_empty());
                view.category_options = self.category_options(selected, false);
                view.product = Some(form.clone());
            }
            ModalKind::AdminInvite(form) => {
                view.title = "إضافة مسؤول";
                view.role_options = AdminRole::INVITABLE
                    .iter()
                    .map(|role| SelectOption {
                        value: role.as_str().to_string(),
                        label: role.label(Lang::Ar).to_string(),
                        selected: *role == form.role,
                    })
                    .collect();
                view.invite = Some(form.clone());
            }
            ModalKind::Confirm(action) => {
                view.title = match action {
                    PendingAction::DeleteCategory { .. } => "حذف القسم",
                    PendingAction::DeleteProduct { .. } => "حذف المنتج",
                    PendingAction::RemoveAdmin { .. } => "حذف المسؤول",
                };
                view.confirm = Some(ConfirmView {
                    question: action.question(),
                    warning: action.warning(),
                });
            }
        }
        view
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use qr_menu_core::{
        Category, CategoryId, LocalizedText, Price, Product, ProductId, Restaurant, RestaurantId,
    };

    use crate::view_model::Phase;

    fn vm() -> AdminViewModel {
        let restaurant = RestaurantId::new("r1");
        let category = |id: &str, name: &str, order| Category {
            id: CategoryId::new(id),
            restaurant_id: restaurant.clone(),
            name: LocalizedText::new(name, None),
            icon: "☕".to_string(),
            display_order: order,
            is_active: true,
        };
        let product = |id: &str, category: &str, available| Product {
            id: ProductId::new(id),
            restaurant_id: restaurant.clone(),
            category_id: CategoryId::new(category),
            name: LocalizedText::new(id, None),
            description: LocalizedText::default(),
            price: Price::from(10),
            image_url: "placeholder".to_string(),
            has_custom_image: false,
            is_available: available,
            created_at: None,
        };

        AdminViewModel {
            phase: Phase::Ready,
            restaurant: Some(Restaurant {
                id: restaurant.clone(),
                name: LocalizedText::new("مقهى", None),
                default_language: Lang::Ar,
                logo: None,
                admin_email: None,
                created_at: None,
                updated_at: None,
            }),
            categories: vec![category("c1", "مشروبات", 0), category("c2", "حلويات", 1)],
            products: vec![
                product("p1", "c1", true),
                product("p2", "c2", false),
                product("p3", "c1", true),
            ],
            ..AdminViewModel::default()
        }
    }

    #[test]
    fn test_cards_count_products() {
        let view = vm().view("https://menu.example");
        let counts: Vec<_> = view.categories.iter().map(|c| c.product_count).collect();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn test_availability_states_are_distinct() {
        let view = vm().view("https://menu.example");
        let p1 = view.products.iter().find(|p| p.id == "p1").unwrap();
        let p2 = view.products.iter().find(|p| p.id == "p2").unwrap();
        assert_ne!(p1.availability_class, p2.availability_class);
        assert_ne!(p1.availability_label, p2.availability_label);
        assert_eq!(p2.availability_class, "unavailable");
    }

    #[test]
    fn test_filter_options_lead_with_all() {
        let mut model = vm();
        let view = model.view("https://menu.example");
        assert_eq!(view.filter_options.len(), 3);
        assert_eq!(view.filter_options[0].label, ALL_CATEGORIES);
        assert!(view.filter_options[0].selected);

        model.set_filter(Some("c2"), "");
        let view = model.view("https://menu.example");
        assert!(!view.filter_options[0].selected);
        assert!(view.filter_options[2].selected);
        assert_eq!(view.products.len(), 1);
    }

    #[test]
    fn test_menu_url_and_qr_name() {
        let view = vm().view("https://menu.example/");
        assert_eq!(view.menu_url, "https://menu.example/menu?r=r1");
        assert_eq!(view.qr_file_name, "menu-qr-code.png");
    }

    #[test]
    fn test_admins_hidden_for_editors() {
        let mut model = vm();
        model.admins = vec![qr_menu_core::RestaurantAdmin {
            id: qr_menu_core::AdminId::new("a1"),
            restaurant_id: RestaurantId::new("r1"),
            email: qr_menu_core::Email::parse("owner@cafe.sa").unwrap(),
            role: AdminRole::Owner,
            created_at: None,
        }];
        assert!(model.view("x").admins.is_empty());

        model.role = AdminRole::Owner;
        let view = model.view("x");
        assert_eq!(view.admins.len(), 1);
        assert!(!view.admins[0].removable);
    }

    #[test]
    fn test_product_modal_preselects_category() {
        let mut model = vm();
        model.set_filter(Some("c2"), "");
        model.open_product_form(None);
        let modal = model.view("x").modal.unwrap();
        assert_eq!(modal.title, "إضافة منتج");
        let selected: Vec<_> = modal
            .category_options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, vec!["c2"]);
    }
}
