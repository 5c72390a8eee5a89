use anyhow::Result;
use clap::Parser;
use orm_demos::{config, db, seed, Demo};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reset a demo database and fill it with the sample rows"
)]
struct Args {
    /// Which demo database to seed
    #[arg(value_enum)]
    demo: Demo,

    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load_or_default(&args.config)?;
    cfg.ensure_dirs()?;

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url(args.demo));
    let pool = db::init_pool(&database_url, cfg.database.echo).await?;
    db::run_migrations(&pool, args.demo).await?;

    seed::seed(&pool, args.demo).await?;
    info!(demo = %args.demo, url = %database_url, "database reset");
    Ok(())
}
