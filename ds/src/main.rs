use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use docstore::DocStore;
use docstore::cli::{Cli, Command};

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weekplan")
        .join(docstore::DEFAULT_DB_FILE)
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(default_db_path);
    info!(db = %db_path.display(), "docstore starting");

    let store = DocStore::open(&db_path).context("Failed to open store")?;

    match cli.command {
        Command::Get { collection, key } => match store.get(&collection, &key)? {
            Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
            None => println!("No document: {}/{}", collection, key),
        },
        Command::List { collection } => {
            let keys = store.list(&collection)?;
            if keys.is_empty() {
                println!("No documents in {}", collection);
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        Command::Tail { collection, limit } => {
            for record in store.tail(&collection, limit)? {
                println!("{} {}", record.created_at, serde_json::to_string(&record.body)?);
            }
        }
    }

    Ok(())
}
