//! Dashboard product filter: category and search combine as an intersection.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use serde_json::json;

use qr_menu_admin::view_model::AdminViewModel;
use qr_menu_data::gateway::Table;
use qr_menu_integration_tests::Cafe;

const CATEGORIES: [Option<&str>; 4] = [None, Some("c1"), Some("c2"), Some("")];
const SEARCHES: [&str; 6] = ["", "  ", "قهوة", "co", "كعك", "zzz"];

fn shown(vm: &mut AdminViewModel, category: Option<&str>, search: &str) -> BTreeSet<String> {
    vm.set_filter(category, search);
    vm.filtered_products()
        .into_iter()
        .map(|p| p.id.to_string())
        .collect()
}

async fn larger_cafe() -> AdminViewModel {
    let cafe = Cafe::new();
    for (id, category, name, name_en) in [
        ("p3", "c1", "قهوة باردة", "Cold Brew"),
        ("p4", "c1", "شاي", "Tea"),
        ("p5", "c2", "كعكة الشوكولاتة", "Chocolate Cake"),
        ("p6", "c2", "قهوة بالكعك", "Coffee Cake"),
    ] {
        cafe.insert(
            Table::Products,
            json!({"id": id, "restaurant_id": "r1", "category_id": category, "name": name, "name_en": name_en, "price": "12"}),
        );
    }
    let (_, vm) = cafe.dashboard().await;
    vm
}

#[tokio::test]
async fn test_filter_is_intersection_of_category_and_search() {
    let mut vm = larger_cafe().await;

    for category in CATEGORIES {
        for search in SEARCHES {
            let both = shown(&mut vm, category, search);
            let by_category = shown(&mut vm, category, "");
            let by_search = shown(&mut vm, None, search);
            let expected: BTreeSet<String> =
                by_category.intersection(&by_search).cloned().collect();
            assert_eq!(both, expected, "category {category:?}, search {search:?}");
        }
    }
}

#[tokio::test]
async fn test_empty_filter_shows_everything() {
    let mut vm = larger_cafe().await;

    let all: BTreeSet<String> = vm.products.iter().map(|p| p.id.to_string()).collect();
    assert_eq!(all.len(), 6);
    assert_eq!(shown(&mut vm, None, ""), all);
    assert_eq!(shown(&mut vm, Some(""), "   "), all);
}

#[tokio::test]
async fn test_concrete_matches() {
    let mut vm = larger_cafe().await;

    let coffee_in_sweets = shown(&mut vm, Some("c2"), "قهوة");
    assert_eq!(coffee_in_sweets, BTreeSet::from(["p6".to_string()]));

    let english_any_case = shown(&mut vm, None, "CAKE");
    assert_eq!(
        english_any_case,
        BTreeSet::from(["p2".to_string(), "p5".to_string(), "p6".to_string()])
    );

    assert!(shown(&mut vm, Some("c1"), "zzz").is_empty());
}

#[tokio::test]
async fn test_unknown_category_means_all() {
    let mut vm = larger_cafe().await;

    let unknown = shown(&mut vm, Some("gone"), "");
    assert_eq!(unknown.len(), 6);
    assert!(vm.filter.category.is_none());
}
