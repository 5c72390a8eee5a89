use anyhow::Result;
use clap::Parser;
use orm_demos::{config, db, web, Demo};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about = "Serve one of the ORM demo apps")]
struct Args {
    /// Which demo to serve
    #[arg(value_enum)]
    demo: Demo,

    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut cfg = config::load_or_default(&args.config)?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    cfg.ensure_dirs()?;

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url(args.demo));
    let pool = db::init_pool(&database_url, cfg.database.echo).await?;
    db::run_migrations(&pool, args.demo).await?;

    info!(demo = %args.demo, "starting demo server");
    web::serve(args.demo, &cfg, pool).await
}
