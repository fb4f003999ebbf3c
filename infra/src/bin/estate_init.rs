//! Operational bootstrap for the estate data store.
//!
//! ```text
//! estate-init indexes       create the index catalogue
//! estate-init collections   list collections with document counts
//! estate-init seed          insert sample data, then print analytics
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use estate_core::{DocumentStore, Repositories};
use estate_infra::{indexes, initialize, load_config, logging, seed};

#[derive(Parser, Debug)]
#[command(name = "estate-init")]
#[command(version, about = "Bootstrap and inspect the estate marketplace store", long_about = None)]
struct Cli {
    /// Database name, overriding DB_NAME
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the index catalogue
    Indexes,

    /// List collections with their document counts
    Collections,

    /// Insert the sample users, properties and listings
    Seed {
        /// Create the index catalogue first
        #[arg(long)]
        with_indexes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config();
    if let Some(database) = cli.database {
        config.database.name = database;
    }
    logging::init(&config.logging).context("installing tracing subscriber")?;

    let infra = initialize(&config).await.context("connecting to the document store")?;
    let store: Arc<dyn DocumentStore> = infra.store;

    match cli.command {
        Command::Indexes => {
            let count = indexes::ensure_indexes(store.as_ref()).await?;
            println!("Ensured {} indexes on {}", count, config.database.name);
        }
        Command::Collections => {
            let counts = indexes::collection_counts(store.as_ref()).await?;
            println!("Collections in {}:", config.database.name);
            for (name, count) in counts {
                println!("  {:<24} {:>8}", name, count);
            }
        }
        Command::Seed { with_indexes } => {
            if with_indexes {
                indexes::ensure_indexes(store.as_ref()).await?;
            }
            let repos = Repositories::new(Arc::clone(&store));
            let report = seed::seed(&repos).await.context("seeding sample data")?;
            println!(
                "Created {} users, {} properties, {} listings ({} already present)",
                report.users_created, report.properties_created, report.listings_created, report.skipped
            );

            let analytics = repos.analytics.snapshot().await?;
            println!("Total users:           {}", analytics.total_users);
            println!("Total properties:      {}", analytics.total_properties);
            println!("Total listings:        {}", analytics.total_listings);
            println!("Active listings:       {}", analytics.active_listings);
            println!("Pending verifications: {}", analytics.pending_verifications);
        }
    }

    Ok(())
}
