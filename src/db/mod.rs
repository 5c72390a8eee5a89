//! Database module: pool setup, embedded migrations and per-demo repositories.
//!
//! - `pets`: SQL-only functions behind the pet shop routes.
//! - `employees`: phone directory strategies and relationship navigation.
//!
//! Every demo owns its own SQLite file; [`run_migrations`] applies the
//! migrator that belongs to the demo being served.

pub mod employees;
pub mod pets;

use crate::model::Demo;
use anyhow::Result;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub type Pool = SqlitePool;

static PETS_MIGRATOR: Migrator = sqlx::migrate!("./migrations/pets");
static EMPLOYEES_MIGRATOR: Migrator = sqlx::migrate!("./migrations/employees");

/// Open a pool for a SQLite URL. With `echo` off, statement logging is disabled.
pub async fn init_pool(database_url: &str, echo: bool) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let mut opts = SqliteConnectOptions::from_str(&normalized)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    if !echo {
        opts = opts.disable_statement_logging();
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;
    info!(url = %normalized, echo, "database pool ready");
    Ok(pool)
}

/// Single-connection in-memory pool with the demo's migrations applied.
///
/// The connection is never recycled, so the database lives as long as the pool.
pub async fn connect_in_memory(demo: Demo) -> Result<Pool> {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(opts)
        .await?;
    run_migrations(&pool, demo).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &Pool, demo: Demo) -> Result<()> {
    match demo {
        Demo::Intro => debug!("intro demo has no tables"),
        Demo::Pets => PETS_MIGRATOR.run(pool).await?,
        Demo::Employees => EMPLOYEES_MIGRATOR.run(pool).await?,
    }
    Ok(())
}

/// Expand a leading `~/` in file-backed SQLite URLs and make sure the parent
/// directory exists. In-memory and non-sqlite URLs pass through untouched.
fn prepare_sqlite_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    if rest.starts_with(":memory") {
        return url.to_string();
    }

    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path.is_empty() {
        return url.to_string();
    }

    let path = match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(tail), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), tail),
        _ => path.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    match query {
        Some(q) => format!("sqlite://{}?{}", path, q),
        None => format!("sqlite://{}", path),
    }
}
