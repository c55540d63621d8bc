//! CLI argument parsing for the weekplan service

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wp")]
#[command(author, version, about = "LLM-assisted weekly task planner", long_about = None)]
pub struct Cli {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Listen address, e.g. 0.0.0.0:8080
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Print the current week's stored document as JSON (no oracle call)
    Week {
        /// User id to look up
        #[arg(short, long)]
        user: Option<String>,
    },
}
