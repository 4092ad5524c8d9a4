//! StyleHub CLI - storefront API from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session is kept in STYLEHUB_STATE_FILE)
//! stylehub login -e shopper@stylehub.kr -p '********'
//!
//! # Like state of a product, then flip it
//! stylehub like status 42
//! stylehub like toggle 42
//!
//! # Best available coupon for a 100,000 won order
//! stylehub discount --price 100000
//!
//! # Any GET endpoint, envelope unwrapped
//! stylehub get /categories
//! ```
//!
//! # Commands
//!
//! - `login`, `logout`, `whoami` - Session management
//! - `like status`, `like toggle`, `likes` - Product likes
//! - `coupons`, `discount` - Coupons and discount preview
//! - `get` - Raw GET passthrough

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use stylehub_client::{ApiClient, ClientConfig, FileStore, SessionStore};
use stylehub_core::{Email, ProductId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "stylehub")]
#[command(author, version, about = "StyleHub storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: Email,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in shopper
    Whoami,
    /// Inspect or change a product like
    Like {
        #[command(subcommand)]
        action: LikeAction,
    },
    /// List liked products
    Likes,
    /// List coupons
    Coupons {
        /// Only coupons that can still be used
        #[arg(long)]
        available: bool,
    },
    /// Preview the best coupon discount for an order amount
    Discount {
        /// Order amount in won
        #[arg(long)]
        price: Decimal,
    },
    /// GET any API path and print its data
    Get {
        /// Path below the API base URL, e.g. /categories
        path: String,
    },
}

#[derive(Subcommand)]
enum LikeAction {
    /// Show liked state and like count
    Status {
        /// Product ID
        id: ProductId,
    },
    /// Like or unlike a product
    Toggle {
        /// Product ID
        id: ProductId,

        /// Like count to assume if the current state cannot be fetched
        #[arg(long, default_value_t = 0)]
        count: u64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stylehub_client=info,stylehub_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = ClientConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = SessionStore::open(Arc::new(FileStore::new(&config.state_file)));
    let api = ApiClient::new(config, session, Arc::new(commands::HintRedirect))?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&api, &email, password).await?;
        }
        Commands::Logout => commands::session::logout(&api).await?,
        Commands::Whoami => commands::session::whoami(&api),
        Commands::Like { action } => match action {
            LikeAction::Status { id } => commands::likes::status(&api, id).await?,
            LikeAction::Toggle { id, count } => commands::likes::toggle(&api, id, count).await,
        },
        Commands::Likes => commands::likes::list(&api).await?,
        Commands::Coupons { available } => commands::coupons::list(&api, available).await?,
        Commands::Discount { price } => commands::coupons::discount(&api, price).await?,
        Commands::Get { path } => commands::raw::get(&api, &path).await?,
    }
    Ok(())
}
