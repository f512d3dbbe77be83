//! Brewdesk CLI - database migrations, seeding and reports.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! brewdesk-cli migrate
//!
//! # Insert the menu and sample customers (no-op if already seeded)
//! brewdesk-cli seed reference
//!
//! # Add demo customers and 50 random orders over the past month
//! brewdesk-cli seed demo --orders 50
//!
//! # Print reports
//! brewdesk-cli report sales --start 2026-03-01 --end 2026-03-31
//! brewdesk-cli report products
//! brewdesk-cli report customers
//! ```
//!
//! The database is taken from `BREWDESK_DATABASE_URL` (or `DATABASE_URL`),
//! the same variable the server reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "brewdesk-cli")]
#[command(author, version, about = "Brewdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Print a report
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Categories, products and sample customers
    Reference,
    /// Demo customers and random historical orders
    Demo {
        /// Number of orders to generate
        #[arg(short, long, default_value_t = 50)]
        orders: usize,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Daily sales
    Sales {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Sales per product
    Products,
    /// Spend per customer
    Customers,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Reference => commands::seed::reference().await?,
            SeedTarget::Demo { orders } => commands::seed::demo(orders).await?,
        },
        Commands::Report { kind } => match kind {
            ReportKind::Sales { start, end } => commands::report::sales(start, end).await?,
            ReportKind::Products => commands::report::products().await?,
            ReportKind::Customers => commands::report::customers().await?,
        },
    }
    Ok(())
}
