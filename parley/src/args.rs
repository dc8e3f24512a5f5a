use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Parley protocol bridge
#[derive(Debug, Parser)]
#[command(name = "parley", about = "Convert conversations between canonical and vendor LLM formats")]
pub struct Args {
    /// Path to configuration file; built-in providers are used when absent
    #[arg(short, long, env = "PARLEY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive, overriding the configured one
    #[arg(long, env = "PARLEY_LOG", global = true)]
    pub log: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the vendor request body for a canonical request
    Request {
        /// Provider name; defaults to the configured default provider
        #[arg(short, long, env = "PARLEY_PROVIDER")]
        provider: Option<String>,

        /// Canonical request JSON file (`-` for stdin)
        request: PathBuf,

        /// JSON file holding prior session items, oldest first
        #[arg(long)]
        history: Option<PathBuf>,

        /// Session id
        #[arg(long, default_value = "cli")]
        session: String,
    },

    /// Normalize a raw vendor reply into a canonical response
    Response {
        /// Provider name; defaults to the configured default provider
        #[arg(short, long, env = "PARLEY_PROVIDER")]
        provider: Option<String>,

        /// Vendor reply file (`-` for stdin)
        payload: PathBuf,

        /// Session id the reply belongs to
        #[arg(long, default_value = "cli")]
        session: String,
    },
}
