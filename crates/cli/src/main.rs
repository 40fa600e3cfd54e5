//! Wonderland Toy Store command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session is kept between runs)
//! wonderland login -e ali@example.pk
//!
//! # Browse
//! wonderland products list --category plush
//! wonderland products search robot
//!
//! # Shop
//! wonderland cart add 1 -q 2
//! wonderland cart show
//! wonderland checkout --address "123 Main Street, Karachi"
//!
//! # Admin
//! wonderland admin dashboard
//! wonderland admin seed catalog.yaml
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami`, `profile` - Account
//! - `products` - Browse the catalog
//! - `cart`, `checkout` - Shopping cart and ordering
//! - `orders` - Order history and cancellation
//! - `admin` - Product, order and dashboard management (admin accounts)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wonderland_client::{ClientConfig, Storefront, stores::CartStore};
use wonderland_core::{Category, OrderStatus};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "wonderland")]
#[command(author, version, about = "Wonderland Toy Store storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from stdin if omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Read from stdin if omitted
        #[arg(short, long)]
        password: Option<String>,

        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update your name or email
    Profile {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart contents
    Checkout {
        /// Street address (at least 5 characters)
        #[arg(short, long)]
        address: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        postal_code: Option<String>,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Store administration (admin accounts only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

impl Commands {
    /// Whether the command acts as the signed-in user. Only these revalidate
    /// the stored session first; catalog and cart commands work offline.
    const fn needs_session(&self) -> bool {
        matches!(
            self,
            Self::Whoami
                | Self::Profile { .. }
                | Self::Checkout { .. }
                | Self::Orders { .. }
                | Self::Admin { .. }
        )
    }
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Electronic, Plush or BoardGame
        #[arg(short, long)]
        category: Option<Category>,

        /// Ignore the freshness window
        #[arg(long)]
        refresh: bool,
    },
    /// Show one product
    Show { id: String },
    /// Search name, brand and description
    Search {
        query: String,

        /// Ask the server instead of filtering locally
        #[arg(long)]
        remote: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { product_id: String },
    /// Set a product's quantity (0 or less removes it)
    Set {
        product_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Show the cart and its total
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: String },
    /// Cancel an order that has not shipped yet
    Cancel { id: String },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Store-wide totals
    Dashboard {
        /// Compute from the catalog and order list instead of the summary endpoint
        #[arg(long)]
        local: bool,
    },
    /// All orders
    Orders {
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Move an order to a new status
    SetStatus { id: String, status: OrderStatus },
    /// Create a product
    Create(commands::admin::ProductArgs),
    /// Update product fields
    Update {
        id: String,

        #[command(flatten)]
        fields: commands::admin::ProductPatchArgs,
    },
    /// Set a product's stock level
    Stock {
        id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Delete a product
    Delete { id: String },
    /// Create products from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(with_sentry: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wonderland_client=info,wonderland_cli=info".into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if with_sentry {
        registry
            .with(sentry_tracing::layer().event_filter(sentry_event_filter))
            .init();
    } else {
        registry.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing(sentry_guard.is_some());

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("{e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = Storefront::open(config)?;
    shop.cart = CartStore::load(&config.cart_file())?;

    // Pick up the session from an earlier run, if any
    if cli.command.needs_session()
        && let Err(e) = shop.auth.refresh_session().await
    {
        tracing::warn!("Signed out for now: {}", e.user_message());
    }

    match cli.command {
        Commands::Login { email, password } => {
            commands::account::login(&mut shop, &email, password).await?;
        }
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            commands::account::register(&mut shop, &name, &email, password, confirm_password)
                .await?;
        }
        Commands::Logout => commands::account::logout(&mut shop),
        Commands::Whoami => commands::account::whoami(&shop)?,
        Commands::Profile { name, email } => {
            commands::account::update_profile(&mut shop, name, email).await?;
        }
        Commands::Products { action } => match action {
            ProductsAction::List { category, refresh } => {
                commands::products::list(&mut shop, category, refresh).await?;
            }
            ProductsAction::Show { id } => commands::products::show(&mut shop, &id).await?,
            ProductsAction::Search { query, remote } => {
                commands::products::search(&mut shop, &query, remote).await?;
            }
        },
        Commands::Cart { action } => {
            match action {
                CartAction::Add {
                    product_id,
                    quantity,
                } => commands::cart::add(&mut shop, &product_id, quantity).await?,
                CartAction::Remove { product_id } => commands::cart::remove(&mut shop, &product_id),
                CartAction::Set {
                    product_id,
                    quantity,
                } => commands::cart::set(&mut shop, &product_id, quantity),
                CartAction::Show => commands::cart::show(&shop),
                CartAction::Clear => commands::cart::clear(&mut shop),
            }
            shop.cart.save(&config.cart_file())?;
        }
        Commands::Checkout {
            address,
            city,
            postal_code,
        } => {
            let result = commands::orders::checkout(&mut shop, address, city, postal_code).await;
            // The cart is only cleared on success; save either way
            shop.cart.save(&config.cart_file())?;
            result?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&mut shop).await?,
            OrdersAction::Show { id } => commands::orders::show(&mut shop, &id).await?,
            OrdersAction::Cancel { id } => commands::orders::cancel(&mut shop, &id).await?,
        },
        Commands::Admin { action } => {
            commands::admin::require_admin(&shop)?;
            match action {
                AdminAction::Dashboard { local } => {
                    commands::admin::dashboard(&mut shop, local).await?;
                }
                AdminAction::Orders { status } => commands::admin::orders(&shop, status).await?,
                AdminAction::SetStatus { id, status } => {
                    commands::admin::set_status(&shop, &id, status).await?;
                }
                AdminAction::Create(args) => commands::admin::create(&mut shop, args).await?,
                AdminAction::Update { id, fields } => {
                    commands::admin::update(&mut shop, &id, fields).await?;
                }
                AdminAction::Stock { id, quantity } => {
                    commands::admin::set_stock(&mut shop, &id, quantity).await?;
                }
                AdminAction::Delete { id } => commands::admin::delete(&mut shop, &id).await?,
                AdminAction::Seed { file } => commands::seed::products(&mut shop, &file).await?,
            }
        }
    }
    Ok(())
}
