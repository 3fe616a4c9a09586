//! Public menu link and QR image link for a restaurant.

use url::Url;

use qr_menu_core::RestaurantId;
use qr_menu_data::{Gateway, Services};

use super::CliError;

/// Hosted QR generator also linked from the dashboard.
pub const QR_IMAGE_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLinks {
    pub restaurant_name: String,
    pub menu_url: String,
    pub qr_image_url: String,
}

/// Links for `restaurant`, after checking that it exists.
///
/// # Errors
///
/// Returns an error if the restaurant cannot be loaded or `base_url` is not
/// a valid URL.
pub async fn links<G: Gateway>(
    services: &Services<G>,
    base_url: &str,
    restaurant: &RestaurantId,
) -> Result<MenuLinks, CliError> {
    Url::parse(base_url).map_err(|e| CliError::Invalid(format!("invalid base URL: {e}")))?;
    let found = services.restaurants().get_by_id(restaurant).await?;

    let menu_url = qr_menu_core::menu_url(base_url, restaurant);
    let qr_image_url = Url::parse_with_params(
        QR_IMAGE_ENDPOINT,
        &[("size", "300x300"), ("data", menu_url.as_str())],
    )
    .map_err(|e| CliError::Invalid(e.to_string()))?;

    Ok(MenuLinks {
        restaurant_name: found.name.ar,
        menu_url,
        qr_image_url: qr_image_url.into(),
    })
}
