//! opnet-donate — terminal front-end for wallet donations
//!
//! Connects the configured wallet, submits donations to the fixed donation
//! address, and shows the history kept on this device.

mod cli;
mod commands;
mod logger;

use clap::Parser;
use donation_client::DonationForm;

use cli::{Cli, Command};
use commands::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logger::init_logger(&cli.log_level, cli.log_json, cli.log_dir.as_deref())?;

    let app = App::open(&cli.data_dir)?;
    tracing::info!(command = ?cli.command, "Running command");

    match cli.command {
        Command::Status => commands::status(&app).await,
        Command::Donate {
            amount,
            name,
            message,
        } => {
            let form = DonationForm::new(amount)
                .with_name(name)
                .with_message(message);
            commands::donate(&app, form).await
        }
        Command::History { json } => commands::history(&app, json).await,
        Command::Total => commands::total(&app).await,
    }
}
