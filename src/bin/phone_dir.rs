use anyhow::Result;
use clap::Parser;
use orm_demos::db::employees::phone_directory;
use orm_demos::model::PhoneDirStrategy;
use orm_demos::{config, db, Demo};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Print the employee phone directory and how many queries it took"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// How to load employees and their departments
    #[arg(long, value_enum, default_value = "outer-join")]
    strategy: PhoneDirStrategy,

    /// Run every strategy one after another
    #[arg(long, conflicts_with = "strategy")]
    all: bool,

    /// Print JSON instead of text lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = config::load_or_default(&args.config)?;

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url(Demo::Employees));
    let pool = db::init_pool(&database_url, cfg.database.echo).await?;
    db::run_migrations(&pool, Demo::Employees).await?;

    let strategies: Vec<PhoneDirStrategy> = if args.all {
        PhoneDirStrategy::ALL.to_vec()
    } else {
        vec![args.strategy]
    };

    for strategy in strategies {
        let directory = phone_directory(&pool, strategy).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&directory)?);
            continue;
        }
        println!("# {} ({} queries)", directory.strategy, directory.queries);
        for entry in &directory.entries {
            println!(
                "{} {} {}",
                entry.name,
                entry
                    .dept_name
                    .as_deref()
                    .or(entry.dept_code.as_deref())
                    .unwrap_or("-"),
                entry.phone.as_deref().unwrap_or("-"),
            );
        }
    }
    Ok(())
}
