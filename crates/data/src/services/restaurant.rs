//! Restaurant lookup, settings and admin membership.

use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use qr_menu_core::{
    AdminId, AdminRole, Email, ImageUpload, Restaurant, RestaurantAdmin, RestaurantId,
    RestaurantUpdate,
};

use super::{ServiceSettings, storage_key};
use crate::api::{ApiError, ApiResult, fetch, messages};
use crate::gateway::{Filter, Gateway, Order, SelectQuery, Table};
use crate::rows::{AdminRow, RestaurantRow, admin_payload, decode_list, decode_one, restaurant_payload};

/// Failure of [`RestaurantService::get_by_email`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    /// The email is not on any restaurant's admin list.
    #[error("no restaurant for this email")]
    NoRestaurantForEmail,
    /// The admin row was found but the restaurant could not be loaded.
    #[error("{0}")]
    Fetch(ApiError),
}

impl LookupError {
    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::NoRestaurantForEmail => messages::NO_RESTAURANT_FOR_EMAIL,
            Self::Fetch(e) => &e.message,
        }
    }
}

/// Restaurant operations.
pub struct RestaurantService<'a, G> {
    gateway: &'a G,
    settings: &'a ServiceSettings,
}

impl<'a, G: Gateway> RestaurantService<'a, G> {
    #[must_use]
    pub const fn new(gateway: &'a G, settings: &'a ServiceSettings) -> Self {
        Self { gateway, settings }
    }

    /// Load one restaurant.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] of kind `NotFound` if no restaurant has this id.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &RestaurantId) -> ApiResult<Restaurant> {
        let row = fetch(
            "get_restaurant",
            messages::LOAD_RESTAURANT,
            self.gateway
                .select_single(SelectQuery::from(Table::Restaurants).eq("id", id)),
        )
        .await?;

        decode_one::<RestaurantRow, _>(row, Restaurant::try_from)
            .map_err(|e| ApiError::from_row(messages::LOAD_RESTAURANT, &e))
    }

    /// Find the restaurant an admin email belongs to.
    ///
    /// Two steps: the admin row gives the restaurant id, then the restaurant
    /// is loaded. An email on several lists resolves to its oldest membership.
    ///
    /// # Errors
    ///
    /// [`LookupError::NoRestaurantForEmail`] if the first step fails or finds
    /// nothing; [`LookupError::Fetch`] if the restaurant itself cannot be loaded.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get_by_email(&self, email: &Email) -> Result<Restaurant, LookupError> {
        let memberships = fetch(
            "find_admin_membership",
            messages::NO_RESTAURANT_FOR_EMAIL,
            self.gateway.select(
                SelectQuery::from(Table::RestaurantAdmins)
                    .eq("email", email)
                    .order(Order::asc("created_at")),
            ),
        )
        .await
        .map_err(|_| LookupError::NoRestaurantForEmail)?;

        let restaurant_id = memberships
            .first()
            .and_then(|row| row.get("restaurant_id"))
            .and_then(serde_json::Value::as_str)
            .map(RestaurantId::new)
            .ok_or(LookupError::NoRestaurantForEmail)?;

        self.get_by_id(&restaurant_id)
            .await
            .map_err(LookupError::Fetch)
    }

    /// Save the settings form.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the update fails.
    #[instrument(skip(self))]
    pub async fn update(&self, id: &RestaurantId, update: &RestaurantUpdate) -> ApiResult<()> {
        fetch(
            "update_restaurant",
            messages::UPDATE_RESTAURANT,
            self.gateway.update(
                Table::Restaurants,
                vec![Filter::eq("id", id)],
                restaurant_payload(update, Utc::now()),
            ),
        )
        .await
    }

    /// Upload a new logo and point the restaurant at it.
    ///
    /// Returns the logo's public URL.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the upload or the update fails. A failed
    /// upload leaves the restaurant untouched.
    #[instrument(skip(self, file), fields(file = %file.file_name))]
    pub async fn upload_logo(&self, id: &RestaurantId, file: &ImageUpload) -> ApiResult<String> {
        let key = storage_key(id.as_str(), "logo", file);
        let bucket = &self.settings.storage_bucket;

        fetch(
            "upload_logo",
            messages::UPLOAD_LOGO,
            self.gateway.upload(bucket, &key, file),
        )
        .await?;

        let url = self.gateway.public_url(bucket, &key);
        fetch(
            "update_restaurant_logo",
            messages::UPLOAD_LOGO,
            self.gateway.update(
                Table::Restaurants,
                vec![Filter::eq("id", id)],
                json!({ "logo": url, "updated_at": Utc::now() }),
            ),
        )
        .await?;

        Ok(url)
    }

    /// Admin list, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the list cannot be loaded.
    #[instrument(skip(self))]
    pub async fn list_admins(&self, restaurant_id: &RestaurantId) -> ApiResult<Vec<RestaurantAdmin>> {
        let rows = fetch(
            "list_admins",
            messages::LOAD_ADMINS,
            self.gateway.select(
                SelectQuery::from(Table::RestaurantAdmins)
                    .eq("restaurant_id", restaurant_id)
                    .order(Order::asc("created_at")),
            ),
        )
        .await?;

        Ok(decode_list::<AdminRow, _>("restaurant_admins", rows, RestaurantAdmin::try_from))
    }

    /// Invite an email as editor or manager.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for the owner role or if the insert fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn add_admin(
        &self,
        restaurant_id: &RestaurantId,
        email: &Email,
        role: AdminRole,
    ) -> ApiResult<()> {
        if role == AdminRole::Owner {
            return Err(ApiError::new(
                messages::OWNER_NOT_INVITABLE,
                "owner role cannot be granted",
            ));
        }

        fetch(
            "add_admin",
            messages::ADD_ADMIN,
            self.gateway.insert(
                Table::RestaurantAdmins,
                admin_payload(restaurant_id, email, role),
            ),
        )
        .await
    }

    /// Remove an admin. Owner rows are excluded by the filter itself.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn remove_admin(&self, admin_id: &AdminId) -> ApiResult<()> {
        fetch(
            "remove_admin",
            messages::REMOVE_ADMIN,
            self.gateway.delete(
                Table::RestaurantAdmins,
                vec![
                    Filter::eq("id", admin_id),
                    Filter::neq("role", AdminRole::Owner),
                ],
            ),
        )
        .await
    }
}
