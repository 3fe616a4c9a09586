//! Admin edits as seen by the public menu.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;

use qr_menu_admin::view_model::{AdminViewModel, CategoryForm, ModalKind, Phase, ProductForm};
use qr_menu_core::{CategoryId, ProductId};
use qr_menu_data::gateway::{Operation, Table};
use qr_menu_integration_tests::{Cafe, RESTAURANT_ID};

fn category_form(vm: &AdminViewModel) -> CategoryForm {
    match &vm.modal.as_ref().unwrap().kind {
        ModalKind::Category(form) => form.clone(),
        other => panic!("expected category form, got {other:?}"),
    }
}

fn product_form(vm: &AdminViewModel) -> ProductForm {
    match &vm.modal.as_ref().unwrap().kind {
        ModalKind::Product(form) => form.clone(),
        other => panic!("expected product form, got {other:?}"),
    }
}

#[tokio::test]
async fn test_owner_enters_dashboard() {
    let cafe = Cafe::new();
    let (_, vm) = cafe.dashboard().await;

    assert_eq!(vm.phase, Phase::Ready);
    assert!(vm.is_owner());
    assert_eq!(vm.categories.len(), 2);
    assert_eq!(vm.products.len(), 2);
}

#[tokio::test]
async fn test_navigation_follows_display_order() {
    let cafe = Cafe::new();
    let (services, mut vm) = cafe.dashboard().await;

    assert!(vm.open_category_form(Some(&CategoryId::new("c2"))));
    let mut form = category_form(&vm);
    form.display_order = "-1".to_string();
    vm.save_category(&services, form).await;
    assert!(vm.modal.is_none());

    let mut form = CategoryForm::blank();
    form.name = "مقبلات".to_string();
    form.display_order = "7".to_string();
    vm.save_category(&services, form).await;

    let menu = cafe.menu().await;
    let nav: Vec<String> = menu.view().nav.into_iter().map(|item| item.label).collect();
    assert_eq!(nav, ["حلويات", "مشروبات", "مقبلات"]);

    let orders: Vec<i32> = menu.categories.iter().map(|c| c.display_order).collect();
    assert!(orders.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn test_hidden_category_leaves_public_menu() {
    let cafe = Cafe::new();
    let (services, mut vm) = cafe.dashboard().await;

    assert!(vm.open_category_form(Some(&CategoryId::new("c1"))));
    let mut form = category_form(&vm);
    form.is_active = None;
    vm.save_category(&services, form).await;

    assert_eq!(vm.categories.len(), 2);
    let menu = cafe.menu().await;
    let ids: Vec<&str> = menu.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c2"]);
}

#[tokio::test]
async fn test_unavailable_product_has_distinct_state() {
    let cafe = Cafe::new();
    let (services, mut vm) = cafe.dashboard().await;

    assert!(vm.open_product_form(Some(&ProductId::new("p1"))));
    let mut form = product_form(&vm);
    form.is_available = None;
    vm.save_product(&services, form, None).await;
    assert!(vm.modal.is_none());

    let rows = vm.view("https://menu.example").products;
    let p1 = rows.iter().find(|r| r.id == "p1").unwrap();
    let p2 = rows.iter().find(|r| r.id == "p2").unwrap();
    assert_ne!(p1.availability_class, p2.availability_class);

    let mut menu = cafe.menu().await;
    let card = menu.view().products.into_iter().find(|c| c.id == "p1").unwrap();
    assert!(!card.is_available);
    assert_eq!(card.state_class, "unavailable");

    assert!(menu.select_category(&CategoryId::new("c2")));
    let card = menu.view().products.into_iter().find(|c| c.id == "p2").unwrap();
    assert!(card.is_available);
    assert_eq!(card.state_class, "available");
}

#[tokio::test]
async fn test_deleting_category_removes_its_products_everywhere() {
    let cafe = Cafe::new();
    cafe.insert(
        Table::Products,
        json!({"id": "p3", "restaurant_id": "r1", "category_id": "c1", "name": "شاي", "price": "8"}),
    );
    let (services, mut vm) = cafe.dashboard().await;
    assert_eq!(vm.products.len(), 3);

    assert!(vm.request_delete_category(&CategoryId::new("c1")));
    assert!(vm.begin_submit());
    assert!(vm.confirm(&services).await);

    assert!(vm.modal.is_none());
    assert!(vm.products.iter().all(|p| p.category_id.as_str() != "c1"));
    assert_eq!(cafe.gateway.calls_of(Operation::Delete), 1);

    let fetched = services.products().list(&cafe.restaurant).await.unwrap();
    let ids: Vec<&str> = fetched.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2"]);

    let menu = cafe.menu().await;
    assert_eq!(menu.products.len(), 1);
    assert!(menu.products.iter().all(|p| p.id.as_str() == "p2"));
}

#[tokio::test]
async fn test_failed_delete_keeps_everything() {
    let cafe = Cafe::new();
    let (services, mut vm) = cafe.dashboard().await;
    cafe.gateway
        .fail(Operation::Delete, Some(Table::Categories), "permission denied");

    assert!(vm.request_delete_category(&CategoryId::new("c1")));
    assert!(vm.begin_submit());
    vm.confirm(&services).await;

    let modal = vm.modal.as_ref().unwrap();
    assert!(modal.error.is_some());
    assert!(!modal.submitting);
    assert_eq!(vm.products.len(), 2);
    assert_eq!(cafe.gateway.rows(Table::Categories).len(), 2);
}

#[tokio::test]
async fn test_malformed_admin_row_keeps_owner_role() {
    let cafe = Cafe::new();
    cafe.insert(
        Table::RestaurantAdmins,
        json!({"restaurant_id": RESTAURANT_ID, "email": "chef@localhost", "role": "editor"}),
    );

    let (_, vm) = cafe.dashboard().await;

    assert_eq!(vm.phase, Phase::Ready);
    assert!(vm.is_owner());
    assert_eq!(vm.admins.len(), 1);
    assert!(vm.notices.is_empty());
}
