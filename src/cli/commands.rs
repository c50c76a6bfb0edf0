//! CLI command implementations

use anyhow::{Context, Result};
use dialoguer::{Confirm, Select};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::TipperApp;
use crate::config::Config;
use crate::frame::{embed_meta_tags, FrameContext, FrameManifest, CACHE_CONTROL};
use crate::network::NetworkCheck;
use crate::onboarding::{FileFlagStore, OnboardingFlow, OnboardingState, STEP_COUNT};
use crate::profile::{format_address_long, ProfilePresenter};
use crate::tip::TransactionState;
use crate::wallet::{Eip1193Wallet, WalletBackend, WalletSession};

/// Build the wallet backend from configuration
fn build_wallet(config: &Config) -> Result<Arc<Eip1193Wallet>> {
    let wallet = Eip1193Wallet::new(&config.wallet).context("Failed to create wallet backend")?;
    Ok(Arc::new(wallet))
}

/// Connect through `connector`, or the configured default
async fn connect_wallet(
    wallet: &Eip1193Wallet,
    config: &Config,
    connector: Option<&str>,
    chain_id: Option<u64>,
) -> Result<WalletSession> {
    let connector = connector.unwrap_or(&config.wallet.default_connector);
    wallet
        .connect(connector, chain_id)
        .await
        .with_context(|| format!("Failed to connect through {}", connector))
}

fn print_session(session: &WalletSession, config: &Config) {
    println!(
        "Connector: {}",
        session.connector_id.as_deref().unwrap_or("(none)")
    );
    println!(
        "Address: {}",
        session.address_string().as_deref().unwrap_or("(none)")
    );
    match session.connected_network_id {
        Some(id) if id == config.chain.chain_id => {
            println!("Network: {} ({})", config.chain.name, id)
        }
        Some(id) => println!(
            "Network: chain {} (expected {} / {})",
            id, config.chain.name, config.chain.chain_id
        ),
        None => println!("Network: (unknown)"),
    }
}

fn parse_context(context: Option<&str>) -> Result<FrameContext> {
    match context {
        Some(json) => FrameContext::from_json(json).context("Invalid frame context JSON"),
        None => Ok(FrameContext::default()),
    }
}

/// List the wallet connectors offered to the user
pub fn connectors(config: &Config) -> Result<()> {
    let wallet = build_wallet(config)?;

    println!("\n=== WALLET CONNECTORS ===\n");
    println!("{:<12} {:<20} {}", "ID", "NAME", "RPC URL");
    println!("{}", "-".repeat(60));

    for connector in wallet.connectors() {
        let marker = if connector.id == config.wallet.default_connector {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<12} {:<20} {}{}",
            connector.id, connector.name, connector.rpc_url, marker
        );
    }

    println!();
    Ok(())
}

/// Connect a wallet, switch to the target network, and show who is connected
pub async fn connect(
    config: &Config,
    connector: Option<&str>,
    context: Option<&str>,
) -> Result<()> {
    let wallet = build_wallet(config)?;
    let session = connect_wallet(&wallet, config, connector, Some(config.chain.chain_id)).await?;

    let flags = Arc::new(FileFlagStore::new(&config.onboarding.state_file));
    let mut app = TipperApp::new(config, wallet.clone(), flags)?;
    app.set_frame_context(parse_context(context)?);

    println!("\n=== WALLET CONNECTED ===\n");
    print_session(&session, config);

    if let Some(profile) = app.profile() {
        println!("\n=== PROFILE ===\n");
        println!("Name: {}", profile.display_name);
        if let Some(line) = app.address_line() {
            println!("Address: {}", line);
        }
        println!("Avatar: {}", profile.avatar_url);
    }

    println!();
    Ok(())
}

/// Show the session, network check, and what the send button would say
pub async fn status(config: &Config, connector: Option<&str>) -> Result<()> {
    let wallet = build_wallet(config)?;
    let session = connect_wallet(&wallet, config, connector, None).await?;

    let flags = Arc::new(FileFlagStore::new(&config.onboarding.state_file));
    let app = TipperApp::new(config, wallet.clone(), flags)?;

    println!("\n=== WALLET STATUS ===\n");
    print_session(&session, config);

    // Status only reports; it never asks the wallet to switch
    match session.connected_network_id {
        Some(id) if id == config.chain.chain_id => println!("Network check: OK"),
        Some(id) => println!(
            "Network check: on {}, needs {} (run `tipper switch`)",
            id, config.chain.chain_id
        ),
        None => println!("Network check: not connected"),
    }

    println!("Onboarding completed: {}", app.onboarding().is_completed());
    println!("Send button: {}", app.tip_button());
    println!();
    Ok(())
}

/// Connect, then drop the session again
pub async fn disconnect(config: &Config, connector: Option<&str>) -> Result<()> {
    let wallet = build_wallet(config)?;
    connect_wallet(&wallet, config, connector, None).await?;

    let flags = Arc::new(FileFlagStore::new(&config.onboarding.state_file));
    let app = TipperApp::new(config, wallet.clone(), flags)?;
    app.disconnect().await.context("Failed to disconnect")?;

    println!("\n=== WALLET DISCONNECTED ===\n");
    print_session(&wallet.session(), config);
    println!("Send button: {}", app.tip_button());
    println!();
    Ok(())
}

/// Ask the wallet to move to the target network and wait for it
pub async fn switch(config: &Config, connector: Option<&str>) -> Result<()> {
    let wallet = build_wallet(config)?;
    let session = connect_wallet(&wallet, config, connector, None).await?;

    if session.is_on_network(config.chain.chain_id) {
        println!("Already on {} ({})", config.chain.name, config.chain.chain_id);
        return Ok(());
    }

    info!(target_chain = config.chain.chain_id, "Switching network");
    wallet
        .switch_network(config.chain.chain_id)
        .await
        .context("Network switch failed")?;

    println!("Switched to {} ({})", config.chain.name, config.chain.chain_id);
    Ok(())
}

/// Send a tip
#[allow(clippy::too_many_arguments)]
pub async fn tip(
    config: &Config,
    recipient: &str,
    amount: Option<&str>,
    preset: Option<u64>,
    connector: Option<&str>,
    context: Option<&str>,
    force: bool,
) -> Result<()> {
    let wallet = build_wallet(config)?;
    let flags = Arc::new(FileFlagStore::new(&config.onboarding.state_file));
    let mut app = TipperApp::new(config, wallet.clone(), flags)?;
    app.set_frame_context(parse_context(context)?);

    app.set_recipient(recipient);
    match (amount, preset) {
        (Some(amount), _) => app.set_amount(amount),
        (None, Some(preset)) => app.select_preset(preset)?,
        (None, None) => {}
    }

    connect_wallet(&wallet, config, connector, None).await?;

    // Same as the app reacting to a fresh session
    if let NetworkCheck::SwitchRequested { current, target } = app.on_session_changed() {
        warn!(current, target, "Wallet on the wrong network, waiting for switch");
        let mut session = wallet.subscribe_session();
        let wait = Duration::from_millis(config.wallet.request_timeout_ms);
        tokio::time::timeout(wait, session.wait_for(|s| s.is_on_network(target)))
            .await
            .context("Timed out waiting for the network switch")?
            .context("Wallet session closed")?;
    }

    if config.token.verify_decimals {
        let decimals = app
            .controller()
            .verify_token_decimals()
            .await
            .context("Token decimals check failed")?;
        info!(decimals, "Token decimals verified");
    }

    let request_amount = app.form().amount.clone();
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Send {} ${} to {}? This cannot be undone.",
                request_amount, config.token.symbol, recipient
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            info!("Tip cancelled by user");
            return Ok(());
        }
    }

    // Print every transition as it happens
    let mut states = Box::pin(app.controller().states());
    let printer = tokio::spawn(async move {
        while let Some(event) = states.next().await {
            println!("  [{}] {}", event.at.format("%H:%M:%S"), event.state);
            if event.state.is_terminal() {
                break;
            }
        }
    });

    let result = app.handle_tip().await;
    match &result {
        Ok(_) => {
            let _ = printer.await;
        }
        Err(e) => {
            printer.abort();
            if e.is_session_error() {
                warn!("Wallet session not ready, run `tipper connect` or `tipper switch` first");
            }
        }
    }
    let state = result.context("Tip not sent")?;

    println!();
    match &state {
        TransactionState::Confirmed { block_number, .. } => {
            println!("Tip sent: {} ${}", request_amount, config.token.symbol);
            if let Some(block) = block_number {
                println!("Block: {}", block);
            }
        }
        TransactionState::Failed(reason) => {
            println!("{}", reason.user_message());
        }
        other => println!("{}", other),
    }
    if let Some(link) = app.explorer_link() {
        println!("View on explorer: {}", link);
    }

    if let TransactionState::Failed(reason) = state {
        anyhow::bail!("Tip failed ({})", reason.kind);
    }
    Ok(())
}

/// Walk through the onboarding carousel
pub fn onboarding(config: &Config, replay: bool) -> Result<()> {
    let store = Arc::new(FileFlagStore::new(&config.onboarding.state_file));
    let mut flow = OnboardingFlow::start(store)?;

    if flow.is_completed() {
        if !replay {
            println!("Onboarding already completed. Use --replay to view the tutorial again.");
            return Ok(());
        }
        flow.replay();
    }

    while let Some(step) = flow.current_step() {
        println!(
            "\n=== {} ===\n",
            flow.progress_label().unwrap_or_default().to_uppercase()
        );
        println!("{}  {}", step.emoji, step.title);
        println!("{}", step.description);
        println!("{}\n", step.details);

        let mut choices = vec![flow.primary_label().unwrap_or("Next")];
        if flow.can_go_back() {
            choices.push("Back");
        }
        choices.push("Skip");

        let choice = Select::new().items(&choices).default(0).interact()?;
        match choices[choice] {
            "Back" => {
                flow.back()?;
            }
            "Skip" => {
                flow.skip()?;
            }
            _ => {
                flow.next()?;
            }
        }
    }

    if flow.state() == OnboardingState::Completed {
        println!("\nAll {} steps done. Ready to tip!", STEP_COUNT);
    }
    Ok(())
}

/// Show how a user would be presented
pub fn profile(config: &Config, address: &str, username: Option<&str>) -> Result<()> {
    let presenter = ProfilePresenter::new(&config.profile.avatar_service_url)?;
    let profile = presenter.derive(address, username);

    println!("\n=== PROFILE ===\n");
    println!("Name: {}", profile.display_name);
    if profile.username.is_none() {
        println!("Address: {}", format_address_long(&profile.address));
    }
    println!("Avatar: {}", profile.avatar_url);
    println!();
    Ok(())
}

/// Print the frame manifest
pub fn manifest(config: &Config) -> Result<()> {
    let manifest = FrameManifest::from_config(&config.frame);
    let header = manifest
        .account_association
        .decode_header()
        .context("Account association header is not valid")?;

    println!("Cache-Control: {}", CACHE_CONTROL);
    println!("{}", manifest.to_json()?);
    info!(fid = header.fid, key = %header.key, "Manifest signed by {} key", header.kind);
    Ok(())
}

/// Print the embed meta tags
pub fn embed(config: &Config) -> Result<()> {
    for (name, content) in embed_meta_tags(&config.frame)? {
        println!("<meta name=\"{}\" content='{}' />", name, content);
    }
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}
