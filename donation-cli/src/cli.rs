//! Command line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "opnet-donate", version, about = "Donate BTC through your wallet and keep a local history")]
pub struct Cli {
    /// Directory holding config.json and the donation ledger
    #[arg(long, env = "DONATION_DATA_DIR", default_value = "./donation-data", global = true)]
    pub data_dir: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Also write daily rotating log files here
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the connected wallet and the total raised
    Status,
    /// Send a donation
    Donate {
        /// Amount in BTC, e.g. 0.001
        #[arg(long)]
        amount: String,
        /// Display name (defaults to Anonymous)
        #[arg(long, default_value = "")]
        name: String,
        /// Optional message
        #[arg(long, default_value = "")]
        message: String,
    },
    /// List donations made from this device, newest first
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the total raised
    Total,
}
