//! Headless invoicing client.
//!
//! Drives the same store the app uses and prints the resulting slice as
//! JSON. Notifications go to the log.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use invoicing_core::common::PageQuery;
use invoicing_core::domains::auth::AuthAction;
use invoicing_core::domains::company::CompanyAction;
use invoicing_core::domains::customers::CustomerAction;
use invoicing_core::domains::customize::{CustomizeAction, CustomizeKind};
use invoicing_core::domains::payments::PaymentAction;
use invoicing_core::kernel::{AppDeps, HttpInvoiceApi};
use invoicing_core::{build_store, AppAction, AppStore, Config};
use serde::Serialize;
use statesync::Action;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "invoicing")]
#[command(about = "Fetch invoicing data through the client store")]
struct Cli {
    /// API base URL (overrides INVOICING_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List payments
    Payments {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
    },

    /// List customers
    Customers {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show company preferences and the reference datasets
    Preferences,

    /// List companies
    Companies,

    /// Show the invoice customization settings
    CustomizeInvoice,

    /// Mail a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,invoicing_core=debug,statesync=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env_or(cli.api_url)?;

    let api = HttpInvoiceApi::new(&config).context("Failed to build HTTP client")?;
    let store = build_store(AppDeps::headless(Arc::new(api))).context("Failed to build store")?;

    match cli.command {
        Commands::Payments { page, search } => {
            let mut query = PageQuery::new(page, config.page_size);
            if let Some(search) = search {
                query = query.with_search(search);
            }
            expect_success(&store, PaymentAction::fetch(query), "payment.fetch.success").await?;
            print_json(&store.state().payments)
        }
        Commands::Customers { page } => {
            let query = PageQuery::new(page, config.page_size);
            expect_success(&store, CustomerAction::fetch(query), "customer.fetch.success").await?;
            print_json(&store.state().customers)
        }
        Commands::Preferences => {
            expect_success(
                &store,
                CompanyAction::FetchPreferences,
                "company.preferences.fetched",
            )
            .await?;
            print_json(&store.state().company)
        }
        Commands::Companies => {
            expect_success(
                &store,
                CompanyAction::FetchCompanies,
                "company.companies.fetch.success",
            )
            .await?;
            print_json(&store.state().company.companies)
        }
        Commands::CustomizeInvoice => {
            let kind = CustomizeKind::Invoice;
            expect_success(&store, CustomizeAction::Fetch { kind }, "customize.fetch.success")
                .await?;
            print_json(&store.state().customize.get(kind))
        }
        Commands::ForgotPassword { email } => {
            expect_success(
                &store,
                AuthAction::SendForgotPasswordMail { email },
                "auth.forgot_password.send.success",
            )
            .await?;
            print_json(&store.state().auth)
        }
    }
}

/// Dispatch and wait for the correlated success action.
///
/// A failed effect never dispatches it, so the request ends with
/// `NoResponse` after the error handler has logged the failure.
async fn expect_success(
    store: &AppStore,
    action: impl Into<AppAction>,
    success_tag: &'static str,
) -> Result<()> {
    store
        .request(action, |response| (response.tag() == success_tag).then_some(()))
        .await
        .with_context(|| format!("{} was not dispatched", success_tag))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize state")?;
    println!("{}", json);
    Ok(())
}
