//! Public menu: category switching, product detail and the language toggle.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;

use qr_menu_core::{CategoryId, Lang, ProductId};
use qr_menu_data::gateway::{Operation, Table};
use qr_menu_integration_tests::{Cafe, RESTAURANT_ID};
use qr_menu_storefront::view_model::{CustomerViewModel, MenuPhase};

fn product_ids(vm: &CustomerViewModel) -> Vec<String> {
    vm.view().products.into_iter().map(|card| card.id).collect()
}

#[tokio::test]
async fn test_switching_from_drinks_to_sweets_shows_only_sweets() {
    let cafe = Cafe::new();
    let mut menu = cafe.menu().await;
    assert_eq!(menu.phase, MenuPhase::Ready);

    assert!(!menu.select_category(&CategoryId::new("c1")));
    assert_eq!(product_ids(&menu), ["p1"]);

    assert!(menu.select_category(&CategoryId::new("c2")));
    let view = menu.view();
    let ids: Vec<&str> = view.products.iter().map(|card| card.id.as_str()).collect();
    assert_eq!(ids, ["p2"]);
    assert_eq!(view.products[0].price, "20");
    assert!(view.nav.iter().any(|item| item.id == "c2" && item.active));
    assert!(view.nav.iter().any(|item| item.id == "c1" && !item.active));
}

#[tokio::test]
async fn test_switching_categories_makes_no_calls() {
    let cafe = Cafe::new();
    let mut menu = cafe.menu().await;
    let calls = cafe.gateway.calls();

    menu.select_category(&CategoryId::new("c2"));
    menu.select_category(&CategoryId::new("c1"));
    assert!(menu.open_product(&ProductId::new("p1")));
    menu.close_product();

    assert_eq!(cafe.gateway.calls(), calls);
}

#[tokio::test]
async fn test_language_round_trip_restores_every_field() {
    let cafe = Cafe::new();
    let mut menu = cafe.menu().await;
    assert!(menu.open_product(&ProductId::new("p1")));
    let before = menu.view();
    let calls = cafe.gateway.calls();

    menu.toggle_language();
    let english = menu.view();
    assert_eq!(menu.lang, Lang::En);
    assert_eq!(english.restaurant_name, "Rich Cafe");
    assert_eq!(english.products[0].name, "Coffee");
    assert_eq!(english.products[0].currency, "SAR");
    let detail = english.detail.as_ref().unwrap();
    assert_eq!(detail.description, "Specialty coffee");
    assert_eq!(detail.order_button, "Add to Order");

    menu.toggle_language();
    assert_eq!(menu.view(), before);
    assert_eq!(cafe.gateway.calls(), calls);
}

#[tokio::test]
async fn test_menu_opens_in_restaurant_default_language() {
    let cafe = Cafe::new();
    let services = cafe.owner().await;
    let update = qr_menu_core::RestaurantUpdate::from_form("مقهى الريش", "Rich Cafe", Lang::En)
        .unwrap();
    services
        .restaurants()
        .update(&cafe.restaurant, &update)
        .await
        .unwrap();

    let menu = cafe.menu().await;
    assert_eq!(menu.lang, Lang::En);
    assert_eq!(menu.view().dir, "ltr");
}

#[tokio::test]
async fn test_invalid_and_unknown_links() {
    let cafe = Cafe::new();
    let services = cafe.customer();

    let missing = CustomerViewModel::enter(&services, None).await;
    assert_eq!(missing.phase, MenuPhase::InvalidLink);
    assert_eq!(cafe.gateway.calls(), 0);

    let unknown = CustomerViewModel::enter(&services, Some("no-such-place")).await;
    assert_eq!(unknown.phase, MenuPhase::Empty);
    assert!(unknown.load_error.is_none());

    let known = CustomerViewModel::enter(&services, Some(RESTAURANT_ID)).await;
    assert_eq!(known.phase, MenuPhase::Ready);
}

#[tokio::test]
async fn test_failed_product_load_keeps_categories() {
    let cafe = Cafe::new();
    cafe.gateway
        .fail(Operation::Select, Some(Table::Products), "timeout");

    let menu = cafe.menu().await;

    assert_eq!(menu.phase, MenuPhase::Ready);
    assert_eq!(menu.categories.len(), 2);
    assert!(menu.products.is_empty());
    assert!(menu.view().products.is_empty());
}

#[tokio::test]
async fn test_product_without_category_does_not_blank_menu() {
    let cafe = Cafe::new();
    cafe.insert(
        Table::Products,
        json!({"id": "p3", "restaurant_id": RESTAURANT_ID, "category_id": null, "name": "يتيم", "price": "5"}),
    );

    let menu = cafe.menu().await;

    assert_eq!(menu.phase, MenuPhase::Ready);
    assert_eq!(menu.products.len(), 2);
    assert_eq!(product_ids(&menu), ["p1"]);
}
