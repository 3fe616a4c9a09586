//! QR Menu CLI - operator tools for restaurants on the hosted data store.
//!
//! # Usage
//!
//! ```bash
//! # List a restaurant's admins
//! qr-menu admins list -r <restaurant-id>
//!
//! # Invite an editor
//! qr-menu admins add -r <restaurant-id> -e editor@cafe.sa --role editor
//!
//! # Remove an admin (never the owner)
//! qr-menu admins remove -r <restaurant-id> --id <admin-id>
//!
//! # Load categories and products from YAML
//! qr-menu seed -r <restaurant-id> menu.yaml
//!
//! # Print the public menu link and its QR image link
//! qr-menu menu-url -r <restaurant-id>
//! ```
//!
//! Every command reads `SUPABASE_URL` and `SUPABASE_SERVICE_KEY` from the
//! environment (or `.env`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qr_menu_core::{AdminId, RestaurantId};

mod commands;

#[derive(Parser)]
#[command(name = "qr-menu")]
#[command(author, version, about = "QR menu operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage a restaurant's admin list
    Admins {
        #[command(subcommand)]
        action: AdminsAction,
    },
    /// Create categories and products from a YAML file
    Seed {
        /// Restaurant to seed
        #[arg(short, long)]
        restaurant: String,

        /// YAML file with categories and their products
        file: PathBuf,

        /// Validate the file without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the public menu link and QR image link
    MenuUrl {
        /// Restaurant to link to
        #[arg(short, long)]
        restaurant: String,

        /// Public storefront base URL
        #[arg(long, env = "MENU_BASE_URL", default_value = "http://localhost:3000")]
        base_url: String,
    },
}

#[derive(Subcommand)]
enum AdminsAction {
    /// List admins, oldest first
    List {
        #[arg(short, long)]
        restaurant: String,
    },
    /// Invite an email as editor or manager
    Add {
        #[arg(short, long)]
        restaurant: String,

        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin role (`editor`, `manager`)
        #[arg(long, default_value = "editor")]
        role: String,
    },
    /// Remove a non-owner admin
    Remove {
        #[arg(short, long)]
        restaurant: String,

        /// Admin row id
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Admins { action } => {
            let services = commands::connect()?;
            match action {
                AdminsAction::List { restaurant } => {
                    let admins =
                        commands::admins::list(&services, &RestaurantId::new(restaurant)).await?;
                    commands::admins::print(&admins);
                }
                AdminsAction::Add {
                    restaurant,
                    email,
                    role,
                } => {
                    commands::admins::add(&services, &RestaurantId::new(restaurant), &email, &role)
                        .await?;
                }
                AdminsAction::Remove { restaurant, id } => {
                    commands::admins::remove(
                        &services,
                        &RestaurantId::new(restaurant),
                        &AdminId::new(id),
                    )
                    .await?;
                }
            }
        }
        Commands::Seed {
            restaurant,
            file,
            dry_run,
        } => {
            let seed = commands::seed::SeedFile::load(&file).await?;
            let restaurant = RestaurantId::new(restaurant);
            if dry_run {
                let plan = seed.plan(&restaurant)?;
                tracing::info!(categories = plan.len(), "Seed file is valid");
            } else {
                let services = commands::connect()?;
                commands::seed::apply(&services, &restaurant, &seed).await?;
            }
        }
        Commands::MenuUrl {
            restaurant,
            base_url,
        } => {
            let services = commands::connect()?;
            let links =
                commands::menu_url::links(&services, &base_url, &RestaurantId::new(restaurant))
                    .await?;
            println!("{}", links.restaurant_name);
            println!("menu: {}", links.menu_url);
            println!("qr:   {}", links.qr_image_url);
        }
    }
    Ok(())
}
