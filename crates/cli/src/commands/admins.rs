//! Admin list management.

use tracing::info;

use qr_menu_core::{AdminId, AdminRole, Email, Lang, RestaurantAdmin, RestaurantId};
use qr_menu_data::{Gateway, Services};

use super::CliError;

/// Admins of `restaurant`, oldest first.
///
/// # Errors
///
/// Returns an error if the list cannot be loaded.
pub async fn list<G: Gateway>(
    services: &Services<G>,
    restaurant: &RestaurantId,
) -> Result<Vec<RestaurantAdmin>, CliError> {
    Ok(services.restaurants().list_admins(restaurant).await?)
}

/// Print admins as `id  role  email` lines.
#[allow(clippy::print_stdout)]
pub fn print(admins: &[RestaurantAdmin]) {
    for admin in admins {
        println!(
            "{}\t{}\t{}",
            admin.id,
            admin.role.label(Lang::En),
            admin.email
        );
    }
    println!("{} admin(s)", admins.len());
}

/// Invite `email` with `role`.
///
/// # Errors
///
/// Returns an error for a malformed email, an unknown role, the owner role,
/// or a failed insert.
pub async fn add<G: Gateway>(
    services: &Services<G>,
    restaurant: &RestaurantId,
    email: &str,
    role: &str,
) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let role: AdminRole = role.parse().map_err(CliError::Invalid)?;

    services
        .restaurants()
        .add_admin(restaurant, &email, role)
        .await?;

    info!(email = %email, role = %role, restaurant = %restaurant, "Admin added");
    Ok(())
}

/// Remove a non-owner admin of `restaurant`.
///
/// # Errors
///
/// Returns an error if the admin is not in the restaurant's list, is the
/// owner, or the delete fails.
pub async fn remove<G: Gateway>(
    services: &Services<G>,
    restaurant: &RestaurantId,
    id: &AdminId,
) -> Result<(), CliError> {
    let admins = list(services, restaurant).await?;
    let Some(admin) = admins.iter().find(|a| &a.id == id) else {
        return Err(CliError::Invalid(format!(
            "no admin {id} in restaurant {restaurant}"
        )));
    };
    if !admin.role.is_removable() {
        return Err(CliError::Invalid(format!(
            "{} is the owner and cannot be removed",
            admin.email
        )));
    }

    services.restaurants().remove_admin(id).await?;

    info!(email = %admin.email, "Admin removed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use qr_menu_data::ServiceSettings;
    use qr_menu_data::gateway::{MemoryGateway, Table};

    use super::*;

    fn setup() -> (Services<MemoryGateway>, RestaurantId, AdminId) {
        let gateway = MemoryGateway::new();
        let restaurant = gateway
            .insert_row(
                Table::Restaurants,
                json!({"name": "مقهى الريش", "default_language": "ar"}),
            )
            .unwrap();
        let owner = gateway
            .insert_row(
                Table::RestaurantAdmins,
                json!({"restaurant_id": restaurant, "email": "owner@cafe.sa", "role": "owner"}),
            )
            .unwrap();
        (
            Services::new(gateway, ServiceSettings::default()),
            RestaurantId::new(restaurant),
            AdminId::new(owner),
        )
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let (services, restaurant, _) = setup();

        add(&services, &restaurant, "Editor@Cafe.sa", "manager")
            .await
            .unwrap();

        let admins = list(&services, &restaurant).await.unwrap();
        assert_eq!(admins.len(), 2);
        assert!(
            admins
                .iter()
                .any(|a| a.role == AdminRole::Manager && a.email.as_str() == "editor@cafe.sa")
        );
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let (services, restaurant, _) = setup();

        assert!(matches!(
            add(&services, &restaurant, "not-an-email", "editor").await,
            Err(CliError::Email(_))
        ));
        assert!(matches!(
            add(&services, &restaurant, "a@cafe.sa", "chef").await,
            Err(CliError::Invalid(_))
        ));
        assert!(matches!(
            add(&services, &restaurant, "a@cafe.sa", "owner").await,
            Err(CliError::Api(_))
        ));
        assert_eq!(services.gateway().rows(Table::RestaurantAdmins).len(), 1);
    }

    #[tokio::test]
    async fn test_remove_refuses_owner_and_unknown() {
        let (services, restaurant, owner) = setup();

        assert!(remove(&services, &restaurant, &owner).await.is_err());
        assert!(
            remove(&services, &restaurant, &AdminId::new("missing"))
                .await
                .is_err()
        );
        assert_eq!(services.gateway().rows(Table::RestaurantAdmins).len(), 1);
    }

    #[tokio::test]
    async fn test_remove_editor() {
        let (services, restaurant, _) = setup();
        add(&services, &restaurant, "editor@cafe.sa", "editor")
            .await
            .unwrap();
        let editor = list(&services, &restaurant)
            .await
            .unwrap()
            .into_iter()
            .find(|a| a.role == AdminRole::Editor)
            .unwrap();

        remove(&services, &restaurant, &editor.id).await.unwrap();

        let admins = list(&services, &restaurant).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].role, AdminRole::Owner);
    }
}
