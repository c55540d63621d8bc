//! CLI argument parsing for docstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ds")]
#[command(author, version, about = "Inspect a docstore database", long_about = None)]
pub struct Cli {
    /// Path to the database file
    #[arg(short, long, env = "WEEKPLAN_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a document as JSON
    Get {
        /// Collection name (e.g. weekly_plans)
        #[arg(required = true)]
        collection: String,

        /// Document key (e.g. default__2026-W08)
        #[arg(required = true)]
        key: String,
    },

    /// List all document keys in a collection
    List {
        /// Collection name
        #[arg(required = true)]
        collection: String,
    },

    /// Print the most recent records of an event collection
    Tail {
        /// Event collection name (e.g. events_log)
        #[arg(required = true)]
        collection: String,

        /// Number of records to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}
