//! CLI administration tool for library-lending.
//!
//! Provides commands for loading seed data, viewing statistics, and
//! performing database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Load users, publications and memberships from a JSON file
//! cargo run --bin library-admin -- seed seed.json
//!
//! # View statistics
//! cargo run --bin library-admin -- stats
//!
//! # Check database connection
//! cargo run --bin library-admin -- db check
//! ```
//!
//! # Seed File
//!
//! ```json
//! {
//!   "users": [
//!     { "name": "Ada", "age": 36, "email": "ada@example.com", "password": "s3cret-pw" }
//!   ],
//!   "publications": [
//!     { "type": "book", "title": "Dune", "author": "Frank Herbert",
//!       "isbn": "9780441172719", "publication_year": 1965, "available_copies": 3 },
//!     { "type": "magazine", "title": "Wired", "editor": "Condé Nast",
//!       "issn": "1059-1028", "publication_year": 2023, "available_copies": 5 }
//!   ],
//!   "memberships": [
//!     { "email": "ada@example.com", "start_date": "2030-01-01",
//!       "membership_type": "GOLD", "free_loans": 12 }
//!   ]
//! }
//! ```
//!
//! Records are created through the same services as the HTTP API, so every
//! lending rule applies. Failing records are reported and skipped.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use library_lending::config::mask_connection_string;
use library_lending::domain::clock::{Clock, SystemClock};
use library_lending::domain::entities::MembershipType;
use library_lending::state::{AppState, Repositories};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use serde::Deserialize;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing library-lending.
#[derive(Parser)]
#[command(name = "library-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Load seed data from a JSON file
    Seed {
        /// Path to the seed file
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    publications: Vec<SeedPublication>,
    #[serde(default)]
    memberships: Vec<SeedMembership>,
}

#[derive(Debug, Deserialize)]
struct SeedUser {
    name: String,
    age: i32,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SeedPublication {
    Book {
        title: String,
        author: String,
        isbn: String,
        publication_year: i32,
        available_copies: i32,
    },
    Magazine {
        title: String,
        editor: String,
        issn: String,
        publication_year: i32,
        available_copies: i32,
    },
}

#[derive(Debug, Deserialize)]
struct SeedMembership {
    email: String,
    start_date: NaiveDate,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    membership_type: String,
    free_loans: i32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Seed { file, yes } => handle_seed(&pool, file, yes).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Loads a seed file after applying pending migrations.
///
/// # Flow
///
/// 1. Parse the file
/// 2. Show what will be created
/// 3. Confirm (unless `--yes` flag)
/// 4. Create users, then publications, then memberships
async fn handle_seed(pool: &PgPool, file: PathBuf, skip_confirm: bool) -> Result<()> {
    println!("{}", "🌱 Load Seed Data".bright_blue().bold());
    println!();

    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let seed: SeedFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    println!("  File:         {}", file.display().to_string().cyan());
    println!("  Users:        {}", seed.users.len().to_string().bright_white());
    println!(
        "  Publications: {}",
        seed.publications.len().to_string().bright_white()
    );
    println!(
        "  Memberships:  {}",
        seed.memberships.len().to_string().bright_white()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Load this data?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::new(
        Repositories::postgres(Arc::new(pool.clone())),
        clock,
        "postgres",
    );

    let mut created = 0usize;
    let mut skipped = 0usize;

    for user in seed.users {
        let label = user.email.clone();
        match state
            .user_service
            .create_user(user.name, user.age, user.email, &user.password)
            .await
        {
            Ok(_) => report_ok("user", &label, &mut created),
            Err(e) => report_skip("user", &label, &e, &mut skipped),
        }
    }

    for publication in seed.publications {
        let result = match publication {
            SeedPublication::Book {
                title,
                author,
                isbn,
                publication_year,
                available_copies,
            } => {
                state
                    .publication_service
                    .create_book(title, author, isbn, publication_year, available_copies)
                    .await
            }
            SeedPublication::Magazine {
                title,
                editor,
                issn,
                publication_year,
                available_copies,
            } => {
                state
                    .publication_service
                    .create_magazine(title, editor, issn, publication_year, available_copies)
                    .await
            }
        };
        match result {
            Ok(p) => report_ok(p.kind().tag(), p.title(), &mut created),
            Err(e) => report_skip("publication", "-", &e, &mut skipped),
        }
    }

    for membership in seed.memberships {
        let result = match membership.membership_type.parse::<MembershipType>() {
            Ok(membership_type) => {
                state
                    .membership_service
                    .create_membership(
                        &membership.email,
                        membership.start_date,
                        membership.end_date,
                        membership_type,
                        membership.free_loans,
                    )
                    .await
            }
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(_) => report_ok("membership", &membership.email, &mut created),
            Err(e) => report_skip("membership", &membership.email, &e, &mut skipped),
        }
    }

    println!();
    println!(
        "  Created: {}  Skipped: {}",
        created.to_string().bright_green().bold(),
        skipped.to_string().yellow().bold()
    );
    println!();

    Ok(())
}

fn report_ok(what: &str, label: &str, created: &mut usize) {
    *created += 1;
    println!("  {} {} {}", "✔".green(), what.bright_black(), label.cyan());
}

fn report_skip(what: &str, label: &str, error: &impl std::fmt::Display, skipped: &mut usize) {
    *skipped += 1;
    println!(
        "  {} {} {} {}",
        "✘".red(),
        what.bright_black(),
        label.cyan(),
        error.to_string().yellow()
    );
}

/// Displays lending statistics.
///
/// Shows:
/// - Number of users
/// - Number of publications and copies on the shelf
/// - Active and total loans
/// - Memberships active today
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let (publications, copies): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(available_copies), 0)::BIGINT FROM publications",
    )
    .fetch_one(pool)
    .await?;

    let (loans, active_loans): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE return_date IS NULL) FROM loans",
    )
    .fetch_one(pool)
    .await?;

    let memberships: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM memberships WHERE start_date <= CURRENT_DATE AND CURRENT_DATE < end_date",
    )
    .fetch_one(pool)
    .await?;

    println!("  Users:              {}", users.to_string().bright_green().bold());
    println!(
        "  Publications:       {}",
        publications.to_string().bright_green().bold()
    );
    println!("  Copies on shelf:    {}", copies.to_string().bright_green().bold());
    println!(
        "  Loans (active):     {} ({})",
        loans.to_string().bright_green().bold(),
        active_loans.to_string().bright_yellow()
    );
    println!(
        "  Active memberships: {}",
        memberships.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_file_parses_both_publication_kinds() {
        let raw = r#"{
            "users": [{ "name": "Ada", "age": 36, "email": "ada@example.com", "password": "s3cret-pw" }],
            "publications": [
                { "type": "book", "title": "Dune", "author": "Frank Herbert",
                  "isbn": "9780441172719", "publication_year": 1965, "available_copies": 3 },
                { "type": "magazine", "title": "Wired", "editor": "Condé Nast",
                  "issn": "1059-1028", "publication_year": 2023, "available_copies": 5 }
            ]
        }"#;

        let seed: SeedFile = serde_json::from_str(raw).unwrap();

        assert_eq!(seed.users.len(), 1);
        assert!(matches!(seed.publications[0], SeedPublication::Book { .. }));
        assert!(matches!(seed.publications[1], SeedPublication::Magazine { .. }));
        assert!(seed.memberships.is_empty());
    }

    #[test]
    fn test_cli_parses_seed_command() {
        let cli = Cli::try_parse_from(["library-admin", "seed", "data.json", "--yes"]).unwrap();

        assert!(matches!(cli.command, Commands::Seed { yes: true, .. }));
    }
}
