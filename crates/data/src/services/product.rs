//! Dishes and drinks.

use tracing::instrument;

use qr_menu_core::{ImageUpload, Product, ProductDraft, ProductId, RestaurantId};

use super::{ServiceSettings, storage_key};
use crate::api::{ApiResult, fetch, messages};
use crate::gateway::{Filter, Gateway, Order, SelectQuery, Table};
use crate::rows::{ProductRow, RowError, decode_list, product_payload};

/// Product operations.
pub struct ProductService<'a, G> {
    gateway: &'a G,
    settings: &'a ServiceSettings,
}

impl<'a, G: Gateway> ProductService<'a, G> {
    #[must_use]
    pub const fn new(gateway: &'a G, settings: &'a ServiceSettings) -> Self {
        Self { gateway, settings }
    }

    /// Products of a restaurant, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::api::ApiError) if the list cannot be loaded.
    #[instrument(skip(self))]
    pub async fn list(&self, restaurant_id: &RestaurantId) -> ApiResult<Vec<Product>> {
        let rows = fetch(
            "list_products",
            messages::LOAD_PRODUCTS,
            self.gateway.select(
                SelectQuery::from(Table::Products)
                    .eq("restaurant_id", restaurant_id)
                    .order(Order::desc("created_at")),
            ),
        )
        .await?;

        let placeholder = self.settings.placeholder_image.as_str();
        Ok(decode_list::<ProductRow, _>("products", rows, |row| {
            Ok::<_, RowError>(row.into_product(placeholder))
        }))
    }

    /// Save a product, uploading `image` first when one was chosen.
    ///
    /// The image is stored under `{restaurant}/prod_{millis}.{ext}` and its
    /// public URL written with the record. If the upload fails nothing is
    /// written. If the write fails after a successful upload the stored
    /// object is left in place.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::api::ApiError) if the upload or the write fails.
    #[instrument(skip(self, draft, image), fields(id = ?draft.id, has_image = image.is_some()))]
    pub async fn save(&self, draft: &ProductDraft, image: Option<&ImageUpload>) -> ApiResult<()> {
        let image_url = match image {
            Some(file) => Some(self.upload_image(&draft.restaurant_id, file).await?),
            None => None,
        };
        let payload = product_payload(draft, image_url.as_deref());

        match &draft.id {
            Some(id) => {
                fetch(
                    "update_product",
                    messages::UPDATE_PRODUCT,
                    self.gateway
                        .update(Table::Products, vec![Filter::eq("id", id)], payload),
                )
                .await
            }
            None => {
                fetch(
                    "add_product",
                    messages::ADD_PRODUCT,
                    self.gateway.insert(Table::Products, payload),
                )
                .await
            }
        }
    }

    async fn upload_image(&self, restaurant_id: &RestaurantId, file: &ImageUpload) -> ApiResult<String> {
        let key = storage_key(restaurant_id.as_str(), "prod", file);
        let bucket = &self.settings.storage_bucket;

        fetch(
            "upload_product_image",
            messages::UPLOAD_PRODUCT_IMAGE,
            self.gateway.upload(bucket, &key, file),
        )
        .await?;

        Ok(self.gateway.public_url(bucket, &key))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::api::ApiError) if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> ApiResult<()> {
        fetch(
            "delete_product",
            messages::DELETE_PRODUCT,
            self.gateway
                .delete(Table::Products, vec![Filter::eq("id", id)]),
        )
        .await
    }
}
