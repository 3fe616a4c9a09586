//! Menu sections.

use tracing::instrument;

use qr_menu_core::{Category, CategoryDraft, CategoryId, RestaurantId};

use crate::api::{ApiResult, fetch, messages};
use crate::gateway::{Filter, Gateway, Order, SelectQuery, Table};
use crate::rows::{CategoryRow, category_payload, decode_list};

/// Category operations.
pub struct CategoryService<'a, G> {
    gateway: &'a G,
}

impl<'a, G: Gateway> CategoryService<'a, G> {
    #[must_use]
    pub const fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Categories of a restaurant by display order.
    ///
    /// `active_only` hides inactive categories (public menu).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::api::ApiError) if the list cannot be loaded.
    #[instrument(skip(self))]
    pub async fn list(&self, restaurant_id: &RestaurantId, active_only: bool) -> ApiResult<Vec<Category>> {
        let mut query = SelectQuery::from(Table::Categories)
            .eq("restaurant_id", restaurant_id)
            .order(Order::asc("display_order"));
        if active_only {
            query = query.eq("is_active", true);
        }

        let rows = fetch("list_categories", messages::LOAD_CATEGORIES, self.gateway.select(query)).await?;
        Ok(decode_list::<CategoryRow, _>("categories", rows, Category::try_from))
    }

    /// Update the draft's category, or insert it when it has no id.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::api::ApiError) if the write fails.
    #[instrument(skip(self, draft), fields(id = ?draft.id))]
    pub async fn save(&self, draft: &CategoryDraft) -> ApiResult<()> {
        let payload = category_payload(draft);
        match &draft.id {
            Some(id) => {
                fetch(
                    "update_category",
                    messages::UPDATE_CATEGORY,
                    self.gateway
                        .update(Table::Categories, vec![Filter::eq("id", id)], payload),
                )
                .await
            }
            None => {
                fetch(
                    "add_category",
                    messages::ADD_CATEGORY,
                    self.gateway.insert(Table::Categories, payload),
                )
                .await
            }
        }
    }

    /// Delete a category. The data store removes its products with it.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::api::ApiError) if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &CategoryId) -> ApiResult<()> {
        fetch(
            "delete_category",
            messages::DELETE_CATEGORY,
            self.gateway
                .delete(Table::Categories, vec![Filter::eq("id", id)]),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::gateway::MemoryGateway;

    fn draft(id: Option<&str>, name: &str, order: &str, active: bool) -> CategoryDraft {
        CategoryDraft::from_form(
            id.map(CategoryId::new),
            RestaurantId::new("r1"),
            name,
            "",
            "",
            order,
            active,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_orders_by_display_order() {
        let gateway = MemoryGateway::new();
        let categories = CategoryService::new(&gateway);
        categories.save(&draft(None, "حلويات", "2", true)).await.unwrap();
        categories.save(&draft(None, "مشروبات", "1", true)).await.unwrap();
        categories.save(&draft(None, "مخفي", "0", false)).await.unwrap();

        let all = categories.list(&RestaurantId::new("r1"), false).await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.ar.as_str()).collect();
        assert_eq!(names, vec!["مخفي", "مشروبات", "حلويات"]);

        let active = categories.list(&RestaurantId::new("r1"), true).await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|c| c.is_active));
    }

    #[tokio::test]
    async fn test_save_with_id_updates_in_place() {
        let gateway = MemoryGateway::new();
        let id = gateway
            .insert_row(
                Table::Categories,
                json!({"restaurant_id": "r1", "name": "قديم", "display_order": 0}),
            )
            .unwrap();
        let categories = CategoryService::new(&gateway);

        categories.save(&draft(Some(id.as_str()), "جديد", "3", true)).await.unwrap();

        let rows = gateway.rows(Table::Categories);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("جديد"));
        assert_eq!(rows[0]["restaurant_id"], json!("r1"));
        assert_eq!(rows[0]["display_order"], json!(3));
    }

    #[tokio::test]
    async fn test_delete_failure_carries_message() {
        let gateway = MemoryGateway::new();
        gateway.fail(crate::gateway::Operation::Delete, Some(Table::Categories), "rls");
        let err = CategoryService::new(&gateway)
            .delete(&CategoryId::new("c1"))
            .await
            .unwrap_err();
        assert_eq!(err.message, messages::DELETE_CATEGORY);
    }
}
