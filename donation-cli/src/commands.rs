//! Subcommand handlers

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use donation_client::view::{DonationRow, explorer_tx_url, format_btc};
use donation_client::{
    DonationConfig, DonationCoordinator, DonationForm, FileStore, KeyValueStore, RpcWallet,
    SubmitOutcome, WalletSession,
};

/// Everything a command needs
pub struct App {
    pub config: DonationConfig,
    pub coordinator: Arc<DonationCoordinator>,
}

impl App {
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        // first run: leave an editable config.json behind
        let config_path = data_dir.join("config.json");
        if !config_path.exists() {
            DonationConfig::default().save(&config_path)?;
            tracing::info!(path = %config_path.display(), "Default configuration written");
        }

        let config = DonationConfig::load_with_env(&config_path)?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(data_dir.join("storage")));
        let coordinator = DonationCoordinator::new(config.clone(), store)?;

        tracing::debug!(data_dir = %data_dir.display(), "Donation client ready");
        Ok(Self { config, coordinator })
    }

    /// Connect the configured wallet; a session without one stays disconnected
    async fn session(&self) -> anyhow::Result<WalletSession> {
        let mut session = WalletSession::disconnected();
        if let Some(rpc) = self.config.rpc_wallet_config() {
            let url = rpc.url.clone();
            let wallet = RpcWallet::new(rpc)?;
            session
                .connect(Arc::new(wallet))
                .await
                .with_context(|| format!("Failed to connect wallet at {}", url))?;
        }
        Ok(session)
    }
}

pub async fn status(app: &App) -> anyhow::Result<()> {
    let session = app.session().await?;
    match session.short_address() {
        Some(address) => println!("Wallet:      {}", address),
        None => println!("Wallet:      not connected"),
    }
    println!("Total Raised {}", format_btc(app.coordinator.total_donated().await));
    Ok(())
}

pub async fn donate(app: &App, form: DonationForm) -> anyhow::Result<()> {
    // form-level validation happens before anything reaches the coordinator
    form.validate()?;

    let session = app.session().await?;
    app.coordinator.open_modal(&session).await;
    app.coordinator.set_form(form).await;

    match app.coordinator.submit(&session).await {
        SubmitOutcome::Sent { record, persisted } => {
            println!("Transaction Sent!");
            if let Some(tx_id) = &record.tx_id {
                println!("  txid: {}", tx_id);
                println!("  {}", explorer_tx_url(&app.config.explorer_host, tx_id));
            }
            if !persisted {
                eprintln!("warning: donation was sent but could not be saved to the local history");
            }
            Ok(())
        }
        SubmitOutcome::Failed { error } => bail!(error),
        SubmitOutcome::Ignored => bail!("A donation is already in progress"),
    }
}

pub async fn history(app: &App, json: bool) -> anyhow::Result<()> {
    let view = app.coordinator.view().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&view.rows)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No donations yet on this device.");
        return Ok(());
    }
    for row in &view.rows {
        print_row(row);
    }
    Ok(())
}

pub async fn total(app: &App) -> anyhow::Result<()> {
    println!("{}", format_btc(app.coordinator.total_donated().await));
    Ok(())
}

fn print_row(row: &DonationRow) {
    println!("{}  {}", row.name, row.amount);
    if let Some(message) = &row.message {
        println!("  \"{}\"", message);
    }
    match &row.explorer_url {
        Some(url) => println!("  {}  {}", row.time, url),
        None => println!("  {}", row.time),
    }
}
