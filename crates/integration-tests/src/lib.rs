//! Cross-crate scenario tests for the QR menu.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p qr-menu-integration-tests
//! ```
//!
//! Every scenario runs against one in-memory gateway: the admin dashboard
//! writes through it and the public menu reads from it, so a test can check
//! what a customer sees after an admin action. No network or hosted project
//! is needed.
//!
//! # Test Files
//!
//! - `menu_publishing` - admin edits as seen by the public menu
//! - `product_images` - image upload and record write ordering
//! - `product_filter` - dashboard category filter and search
//! - `customer_menu` - category switching and the language toggle

#![allow(clippy::missing_panics_doc)]

use secrecy::SecretString;
use serde_json::{Value, json};

use qr_menu_admin::view_model::AdminViewModel;
use qr_menu_core::{Email, RestaurantId};
use qr_menu_data::gateway::{MemoryGateway, Table};
use qr_menu_data::{Gateway, ServiceSettings, Services};
use qr_menu_storefront::view_model::CustomerViewModel;

pub const RESTAURANT_ID: &str = "r1";
pub const OWNER_EMAIL: &str = "owner@cafe.sa";
pub const PASSWORD: &str = "secret-password";

/// One restaurant on a shared in-memory gateway.
///
/// Seeded with categories `c1` (مشروبات, order 0) and `c2` (حلويات,
/// order 1), products `p1` (c1, 10) and `p2` (c2, 20), and an owner
/// account that can sign in.
pub struct Cafe {
    pub gateway: MemoryGateway,
    pub restaurant: RestaurantId,
}

impl Default for Cafe {
    fn default() -> Self {
        Self::new()
    }
}

impl Cafe {
    #[must_use]
    pub fn new() -> Self {
        let gateway = MemoryGateway::new();
        let cafe = Self {
            gateway,
            restaurant: RestaurantId::new(RESTAURANT_ID),
        };

        cafe.insert(
            Table::Restaurants,
            json!({"id": RESTAURANT_ID, "name": "مقهى الريش", "name_en": "Rich Cafe", "default_language": "ar"}),
        );
        cafe.insert(
            Table::RestaurantAdmins,
            json!({"restaurant_id": RESTAURANT_ID, "email": OWNER_EMAIL, "role": "owner"}),
        );
        cafe.insert(
            Table::Categories,
            json!({"id": "c1", "restaurant_id": RESTAURANT_ID, "name": "مشروبات", "name_en": "Drinks", "icon": "☕", "display_order": 0, "is_active": true}),
        );
        cafe.insert(
            Table::Categories,
            json!({"id": "c2", "restaurant_id": RESTAURANT_ID, "name": "حلويات", "name_en": "Sweets", "icon": "🍰", "display_order": 1, "is_active": true}),
        );
        cafe.insert(
            Table::Products,
            json!({"id": "p1", "restaurant_id": RESTAURANT_ID, "category_id": "c1", "name": "قهوة", "name_en": "Coffee", "description": "قهوة مختصة", "description_en": "Specialty coffee", "price": "10", "is_available": true}),
        );
        cafe.insert(
            Table::Products,
            json!({"id": "p2", "restaurant_id": RESTAURANT_ID, "category_id": "c2", "name": "كعكة", "name_en": "Cake", "price": "20", "is_available": true}),
        );

        let email = Email::parse(OWNER_EMAIL).expect("owner email parses");
        let owner = cafe.gateway.register_user(&email, PASSWORD);
        assert_eq!(owner.email, email, "owner account registered");
        cafe
    }

    /// Insert a raw row, returning its id.
    pub fn insert(&self, table: Table, row: Value) -> String {
        self.gateway
            .insert_row(table, row)
            .expect("fixture row is an object")
    }

    /// Services for an anonymous menu visitor.
    #[must_use]
    pub fn customer(&self) -> Services<MemoryGateway> {
        Services::new(self.gateway.clone(), ServiceSettings::default())
    }

    /// Services acting as the signed-in owner.
    pub async fn owner(&self) -> Services<MemoryGateway> {
        let email = Email::parse(OWNER_EMAIL).expect("owner email parses");
        let session = self
            .gateway
            .sign_in_with_password(&email, &SecretString::from(PASSWORD))
            .await
            .expect("owner can sign in");
        Services::new(
            self.gateway.with_access_token(&session.access_token),
            ServiceSettings::default(),
        )
    }

    /// The owner's dashboard, entered fresh.
    pub async fn dashboard(&self) -> (Services<MemoryGateway>, AdminViewModel) {
        let services = self.owner().await;
        let vm = AdminViewModel::enter(&services).await;
        (services, vm)
    }

    /// The public menu, entered fresh through the restaurant link.
    pub async fn menu(&self) -> CustomerViewModel {
        CustomerViewModel::enter(&self.customer(), Some(RESTAURANT_ID)).await
    }
}
