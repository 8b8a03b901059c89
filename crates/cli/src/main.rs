//! Salon CRM CLI - customer management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List customers, optionally filtered
//! crm-cli customers list --search hanako --plan プレミアム
//!
//! # Show one customer as JSON
//! crm-cli customers show <id> --json
//!
//! # Delete a customer
//! crm-cli customers delete <id>
//!
//! # Insert the five sample customers
//! crm-cli seed
//! ```
//!
//! The store is chosen by `CRM_STORE` (`firestore` or `memory`); see
//! `salon_crm_admin::config` for the full list of variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use thiserror::Error;

use salon_crm_admin::config::{ConfigError, CrmConfig};
use salon_crm_admin::{AppError, AppState, telemetry};
use salon_crm_core::{Plan, Status};

mod commands;

#[derive(Parser)]
#[command(name = "crm-cli")]
#[command(author, version, about = "Salon CRM customer tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Insert the sample customers
    Seed,
}

#[derive(Subcommand)]
enum CustomerAction {
    /// List customers, newest first
    List {
        /// Case-insensitive match on name or email, substring of phone
        #[arg(short, long)]
        search: Option<String>,

        /// Only this plan (ベーシック, スタンダード, プレミアム)
        #[arg(short, long)]
        plan: Option<Plan>,

        /// Only this status
        #[arg(long)]
        status: Option<Status>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Customers per page (1-100)
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one customer
    Show {
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Delete a customer
    Delete { id: String },
}

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CrmConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "configuration error: {e}");
            std::process::exit(1);
        }
    };
    let _sentry_guard = telemetry::init(&config);

    let json = cli.command.json_output();
    if let Err(e) = run(cli, &config).await {
        report(&e, json);
        std::process::exit(1);
    }
}

impl Commands {
    /// Whether the command asked for JSON output.
    const fn json_output(&self) -> bool {
        match self {
            Self::Customers {
                action: CustomerAction::List { json, .. } | CustomerAction::Show { json, .. },
            } => *json,
            _ => false,
        }
    }
}

fn report(err: &CliError, json: bool) {
    let mut stderr = std::io::stderr().lock();
    match err {
        CliError::App(app) => {
            app.report();
            if json {
                let envelope = serde_json::to_string(&app.to_api_error()).unwrap_or_default();
                let _ = writeln!(stderr, "{envelope}");
            } else {
                let _ = writeln!(stderr, "{}", app.user_message());
                if app.is_retryable() {
                    let _ = writeln!(stderr, "しばらくしてから再度お試しください");
                }
            }
        }
        other => {
            tracing::error!("Command failed: {other}");
            let _ = writeln!(stderr, "{other}");
        }
    }
}

async fn run(cli: Cli, config: &CrmConfig) -> Result<(), CliError> {
    let state = AppState::from_config(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Customers { action } => match action {
            CustomerAction::List {
                search,
                plan,
                status,
                page,
                limit,
                json,
            } => {
                let query = commands::customers::ListQuery {
                    search,
                    plan,
                    status,
                    page,
                    limit,
                };
                commands::customers::list(&state, query, json, &mut out).await?;
            }
            CustomerAction::Show { id, json } => {
                commands::customers::show(&state, &id, json, &mut out).await?;
            }
            CustomerAction::Delete { id } => {
                commands::customers::delete(&state, &id, &mut out).await?;
            }
        },
        Commands::Seed => commands::seed::customers(&state, &mut out).await?,
    }
    Ok(())
}
