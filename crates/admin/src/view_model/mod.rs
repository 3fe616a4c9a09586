//! Dashboard state for one signed-in admin.
//!
//! The view-model is built when the dashboard is entered, kept in the
//! admin's session between requests and discarded on logout. Every mutating
//! action calls a service and, on success, reloads the lists in full.

mod forms;
mod modal;
mod view;

pub use forms::{CategoryForm, InviteForm, ProductForm, SettingsForm};
pub use modal::{Modal, ModalKind, PendingAction};
pub use view::{
    AdminRowView, CategoryCard, ConfirmView, DashboardView, ModalView, ProductRowView,
    QR_FILE_NAME, SelectOption, SettingsView,
};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use qr_menu_core::{
    AdminId, AdminRole, Category, CategoryId, Email, ImageUpload, Product, ProductId, Restaurant,
    RestaurantAdmin, RestaurantId, product_count,
};
use qr_menu_data::api::{fetch, messages};
use qr_menu_data::{ApiResult, Gateway, Services};

/// Shown when an invite carries an address that does not parse.
pub const INVALID_EMAIL: &str = "يرجى إدخال بريد إلكتروني صحيح";
/// Shown when a non-owner reaches an admin-management action.
pub const OWNERS_ONLY: &str = "هذا الإجراء متاح لمالك المطعم فقط";
/// Shown after the settings form is saved.
pub const SETTINGS_SAVED: &str = "تم حفظ الإعدادات";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No valid session; the visitor belongs on the login page.
    Unauthenticated,
    Loading,
    Ready,
    /// The dashboard cannot be shown, e.g. the email has no restaurant.
    Error(String),
}

/// Product list filter: category and search text, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    pub search: String,
}

impl ProductFilter {
    /// Whether `product` passes both the category and the search predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let in_category = self
            .category
            .as_ref()
            .is_none_or(|category| product.in_category(category));
        let needle = self.search.trim();
        in_category && (needle.is_empty() || product.name.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminViewModel {
    pub phase: Phase,
    pub user_email: Option<Email>,
    pub restaurant: Option<Restaurant>,
    pub role: AdminRole,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub admins: Vec<RestaurantAdmin>,
    pub filter: ProductFilter,
    pub modal: Option<Modal>,
    /// Load failures and confirmations shown above the lists.
    pub notices: Vec<String>,
    pub settings_error: Option<String>,
}

impl Default for AdminViewModel {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            user_email: None,
            restaurant: None,
            role: AdminRole::Editor,
            categories: Vec::new(),
            products: Vec::new(),
            admins: Vec::new(),
            filter: ProductFilter::default(),
            modal: None,
            notices: Vec::new(),
            settings_error: None,
        }
    }
}

impl AdminViewModel {
    /// Build the dashboard for whoever the gateway's session belongs to.
    ///
    /// Resolves the restaurant from the user's email, the role from the
    /// admin list, then loads categories, products and (for owners) admins
    /// concurrently. A failed list does not stop the others.
    #[instrument(skip(services))]
    pub async fn enter<G: Gateway>(services: &Services<G>) -> Self {
        let mut vm = Self::default();

        let user = match fetch("current_user", messages::UNEXPECTED, services.gateway().current_user()).await {
            Ok(Some(user)) => user,
            Ok(None) | Err(_) => {
                vm.phase = Phase::Unauthenticated;
                return vm;
            }
        };

        let restaurant = match services.restaurants().get_by_email(&user.email).await {
            Ok(restaurant) => restaurant,
            Err(e) => {
                tracing::warn!(email = %user.email, error = %e, "dashboard lookup failed");
                vm.user_email = Some(user.email);
                vm.phase = Phase::Error(e.user_message().to_string());
                return vm;
            }
        };

        vm.role = match services.restaurants().list_admins(&restaurant.id).await {
            Ok(admins) => resolve_role(&admins, &user.email),
            Err(e) => {
                vm.notices.push(e.message);
                AdminRole::Editor
            }
        };
        vm.user_email = Some(user.email);
        vm.restaurant = Some(restaurant);
        vm.reload(services).await;
        vm.phase = Phase::Ready;
        vm
    }

    #[must_use]
    pub fn restaurant_id(&self) -> Option<&RestaurantId> {
        self.restaurant.as_ref().map(|r| &r.id)
    }

    #[must_use]
    pub const fn is_owner(&self) -> bool {
        self.role.can_manage_admins()
    }

    /// Reload categories, products and (for owners) admins in full.
    ///
    /// Each list is replaced only when its own load succeeds; failures
    /// become notices.
    pub async fn reload<G: Gateway>(&mut self, services: &Services<G>) {
        let Some(restaurant_id) = self.restaurant_id().cloned() else {
            return;
        };
        let owner = self.is_owner();

        let restaurants = services.restaurants();
        let category_service = services.categories();
        let product_service = services.products();
        let (categories, products, admins) = tokio::join!(
            category_service.list(&restaurant_id, false),
            product_service.list(&restaurant_id),
            async {
                if owner {
                    Some(restaurants.list_admins(&restaurant_id).await)
                } else {
                    None
                }
            }
        );

        self.apply(categories, |vm, list| vm.categories = list);
        self.apply(products, |vm, list| vm.products = list);
        if let Some(admins) = admins {
            self.apply(admins, |vm, list| vm.admins = list);
        }

        let filtered_away = self
            .filter
            .category
            .as_ref()
            .is_some_and(|category| self.category(category).is_none());
        if filtered_away {
            self.filter.category = None;
        }
    }

    fn apply<T>(&mut self, result: ApiResult<T>, set: impl FnOnce(&mut Self, T)) {
        match result {
            Ok(value) => set(self, value),
            Err(e) => self.notices.push(e.message),
        }
    }

    /// Products passing the current filter, in list order.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| self.filter.matches(p)).collect()
    }

    /// Replace the filter. An unknown category id means "all categories".
    pub fn set_filter(&mut self, category: Option<&str>, search: &str) {
        self.filter.category = category
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(CategoryId::new)
            .filter(|id| self.categories.iter().any(|c| &c.id == id));
        self.filter.search = search.trim().to_string();
    }

    /// Clear notices once they have been shown.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    fn open(&mut self, kind: ModalKind) {
        self.modal = Some(Modal::new(kind));
    }

    /// Open the category form, blank or for `id`. Returns `false` for an
    /// unknown id.
    pub fn open_category_form(&mut self, id: Option<&CategoryId>) -> bool {
        let form = match id {
            None => CategoryForm::blank(),
            Some(id) => match self.category(id) {
                Some(category) => CategoryForm::from_category(category),
                None => return false,
            },
        };
        self.open(ModalKind::Category(form));
        true
    }

    /// Open the product form, blank (preselecting the filtered category) or
    /// for `id`. Returns `false` for an unknown id.
    pub fn open_product_form(&mut self, id: Option<&ProductId>) -> bool {
        let form = match id {
            None => ProductForm::blank(self.filter.category.as_ref()),
            Some(id) => match self.product(id) {
                Some(product) => ProductForm::from_product(product),
                None => return false,
            },
        };
        self.open(ModalKind::Product(form));
        true
    }

    /// Open the invite form. Owners only.
    pub fn open_invite_form(&mut self) -> bool {
        if !self.is_owner() {
            self.notices.push(OWNERS_ONLY.to_string());
            return false;
        }
        self.open(ModalKind::AdminInvite(InviteForm::default()));
        true
    }

    /// Ask to confirm deleting a category and its products.
    pub fn request_delete_category(&mut self, id: &CategoryId) -> bool {
        let Some(category) = self.category(id) else {
            return false;
        };
        let action = PendingAction::DeleteCategory {
            id: category.id.clone(),
            name: category.name.ar.clone(),
            product_count: product_count(&self.products, id),
        };
        self.open(ModalKind::Confirm(action));
        true
    }

    pub fn request_delete_product(&mut self, id: &ProductId) -> bool {
        let Some(product) = self.product(id) else {
            return false;
        };
        let action = PendingAction::DeleteProduct {
            id: product.id.clone(),
            name: product.name.ar.clone(),
        };
        self.open(ModalKind::Confirm(action));
        true
    }

    /// Ask to confirm removing an admin. Owners only; owner rows are refused.
    pub fn request_remove_admin(&mut self, id: &AdminId) -> bool {
        if !self.is_owner() {
            self.notices.push(OWNERS_ONLY.to_string());
            return false;
        }
        let Some(admin) = self.admins.iter().find(|a| &a.id == id) else {
            return false;
        };
        if !admin.role.is_removable() {
            self.notices.push(messages::OWNER_NOT_REMOVABLE.to_string());
            return false;
        }
        let action = PendingAction::RemoveAdmin {
            id: admin.id.clone(),
            email: admin.email.clone(),
        };
        self.open(ModalKind::Confirm(action));
        true
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Mark the open modal as submitting. Returns `false` when there is no
    /// modal or a submit is already in flight.
    pub fn begin_submit(&mut self) -> bool {
        self.modal.as_mut().is_some_and(Modal::begin_submit)
    }

    /// Put `kind` back in the modal with `message`, submit re-enabled.
    fn fail_modal(&mut self, kind: ModalKind, message: impl Into<String>) {
        let mut modal = Modal::new(kind);
        modal.fail(message);
        self.modal = Some(modal);
    }

    async fn finish<G: Gateway>(&mut self, services: &Services<G>, kind: ModalKind, result: ApiResult<()>) {
        match result {
            Ok(()) => {
                self.modal = None;
                self.reload(services).await;
            }
            Err(e) => self.fail_modal(kind, e.message),
        }
    }

    /// Validate and save the category form.
    #[instrument(skip(self, services, form))]
    pub async fn save_category<G: Gateway>(&mut self, services: &Services<G>, form: CategoryForm) {
        let Some(restaurant_id) = self.restaurant_id().cloned() else {
            return;
        };
        let result = match form.to_draft(&restaurant_id) {
            Ok(draft) => services.categories().save(&draft).await,
            Err(e) => {
                self.fail_modal(ModalKind::Category(form), e.user_message());
                return;
            }
        };
        self.finish(services, ModalKind::Category(form), result).await;
    }

    /// Validate and save the product form, uploading `image` first if given.
    #[instrument(skip(self, services, form, image))]
    pub async fn save_product<G: Gateway>(
        &mut self,
        services: &Services<G>,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) {
        let Some(restaurant_id) = self.restaurant_id().cloned() else {
            return;
        };
        let result = match form.to_draft(&restaurant_id) {
            Ok(draft) => services.products().save(&draft, image.as_ref()).await,
            Err(e) => {
                self.fail_modal(ModalKind::Product(form), e.user_message());
                return;
            }
        };
        self.finish(services, ModalKind::Product(form), result).await;
    }

    /// Add an admin from the invite form. Owners only.
    #[instrument(skip(self, services, form))]
    pub async fn invite_admin<G: Gateway>(&mut self, services: &Services<G>, form: InviteForm) {
        let Some(restaurant_id) = self.restaurant_id().cloned() else {
            return;
        };
        if !self.is_owner() {
            self.fail_modal(ModalKind::AdminInvite(form), OWNERS_ONLY);
            return;
        }
        let Ok(email) = Email::parse(&form.email) else {
            self.fail_modal(ModalKind::AdminInvite(form), INVALID_EMAIL);
            return;
        };
        let result = services
            .restaurants()
            .add_admin(&restaurant_id, &email, form.role)
            .await;
        self.finish(services, ModalKind::AdminInvite(form), result).await;
    }

    /// Run the pending destructive action of the open confirm modal.
    ///
    /// Returns `false` when no confirmation is pending.
    #[instrument(skip(self, services))]
    pub async fn confirm<G: Gateway>(&mut self, services: &Services<G>) -> bool {
        let Some(Modal {
            kind: ModalKind::Confirm(action),
            ..
        }) = self.modal.clone()
        else {
            return false;
        };

        let result = match &action {
            PendingAction::DeleteCategory { id, .. } => services.categories().delete(id).await,
            PendingAction::DeleteProduct { id, .. } => services.products().delete(id).await,
            PendingAction::RemoveAdmin { id, .. } if self.is_owner() => {
                services.restaurants().remove_admin(id).await
            }
            PendingAction::RemoveAdmin { .. } => {
                self.fail_modal(ModalKind::Confirm(action.clone()), OWNERS_ONLY);
                return true;
            }
        };
        self.finish(services, ModalKind::Confirm(action), result).await;
        true
    }

    /// Save the settings panel and reload the restaurant.
    #[instrument(skip(self, services, form))]
    pub async fn save_settings<G: Gateway>(&mut self, services: &Services<G>, form: &SettingsForm) {
        let Some(restaurant_id) = self.restaurant_id().cloned() else {
            return;
        };
        let update = match form.to_update() {
            Ok(update) => update,
            Err(e) => {
                self.settings_error = Some(e.user_message().to_string());
                return;
            }
        };
        match services.restaurants().update(&restaurant_id, &update).await {
            Ok(()) => {
                self.settings_error = None;
                self.reload_restaurant(services, &restaurant_id).await;
                self.notices.push(SETTINGS_SAVED.to_string());
            }
            Err(e) => self.settings_error = Some(e.message),
        }
    }

    /// Upload a new logo and reload the restaurant.
    #[instrument(skip(self, services, file))]
    pub async fn upload_logo<G: Gateway>(&mut self, services: &Services<G>, file: &ImageUpload) {
        let Some(restaurant_id) = self.restaurant_id().cloned() else {
            return;
        };
        match services.restaurants().upload_logo(&restaurant_id, file).await {
            Ok(_) => {
                self.settings_error = None;
                self.reload_restaurant(services, &restaurant_id).await;
            }
            Err(e) => self.settings_error = Some(e.message),
        }
    }

    async fn reload_restaurant<G: Gateway>(&mut self, services: &Services<G>, id: &RestaurantId) {
        match services.restaurants().get_by_id(id).await {
            Ok(restaurant) => self.restaurant = Some(restaurant),
            Err(e) => self.notices.push(e.message),
        }
    }
}

/// Role of `email` in `admins`; `Editor` when the email is not listed.
#[must_use]
pub fn resolve_role(admins: &[RestaurantAdmin], email: &Email) -> AdminRole {
    admins
        .iter()
        .find(|admin| email.matches(admin.email.as_str()))
        .map_or(AdminRole::Editor, |admin| admin.role)
}
