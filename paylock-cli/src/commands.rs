//! Subcommand implementations.

use crate::config::LoadedConfig;
use crate::sim::{ConsoleBridge, ConsoleBrowser, PaymentScript, SimHost, SimOptions};
use anyhow::{Context, bail};
use paylock_core::access::AccessCache;
use paylock_core::error::FlowError;
use paylock_core::events::StatusSignalBus;
use paylock_core::host::Surface;
use paylock_core::processors::{
    FlowHandle, FlowHost, FlowObserver, FlowSnapshot, FlowState, PaymentFlowController,
    build_checkout_config,
};
use paylock_sdk::config::StorefrontConfig;
use paylock_sdk::links::{checkout_link, contact_link, contact_prompt, explorer_link};
use paylock_sdk::objects::{CustomAmount, PaymentMethod, Quote};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

pub fn validate(config: &LoadedConfig) {
    let storefront = &config.storefront;
    println!(
        "{} item(s), contact {}",
        storefront.items.len(),
        storefront.contact.display_handle()
    );
    for item in &storefront.items {
        println!(
            "  {:<16} {:<28} {:>10} {} on {} -> {}",
            item.id,
            item.display_name,
            item.display_price(),
            item.stablecoin,
            item.network,
            item.recipient_address
        );
    }
}

fn quote_for(
    storefront: &StorefrontConfig,
    item_id: &str,
    amount: Option<&str>,
) -> anyhow::Result<Quote> {
    let item = storefront
        .item(item_id)
        .with_context(|| format!("unknown item `{item_id}`"))?;
    let custom = amount.map(CustomAmount::parse).transpose()?;
    Ok(Quote::new(item, custom))
}

pub fn checkout(
    config: &LoadedConfig,
    item_id: &str,
    method: PaymentMethod,
    amount: Option<&str>,
) -> anyhow::Result<()> {
    let storefront = &config.storefront;
    let quote = quote_for(storefront, item_id, amount)?;

    let modal = build_checkout_config(&storefront.checkout, &quote, method);
    println!("{}", serde_json::to_string_pretty(&modal)?);
    println!("Hosted checkout: {}", checkout_link(&storefront.checkout, &quote)?);
    println!("Recipient: {}", explorer_link(&quote)?);
    Ok(())
}

pub fn contact(config: &LoadedConfig, item_id: &str, amount: Option<&str>) -> anyhow::Result<()> {
    let storefront = &config.storefront;
    let quote = quote_for(storefront, item_id, amount)?;

    println!("{}", contact_prompt(&storefront.contact, &quote));
    println!("{}", contact_link(&storefront.contact, &quote)?);
    Ok(())
}

/// What `simulate` should do.
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub item: String,
    pub method: PaymentMethod,
    pub amount: Option<String>,
    pub options: SimOptions,
    pub embedded: bool,
}

struct LoggingObserver;

impl FlowObserver for LoggingObserver {
    fn on_state_changed(&self, snapshot: &FlowSnapshot) {
        info!(
            state = %snapshot.state,
            access = ?snapshot.access,
            listening = snapshot.listening,
            "Flow state changed"
        );
    }

    fn on_success(&self, snapshot: &FlowSnapshot) {
        if let Some(quote) = &snapshot.quote {
            info!(item_id = %quote.item.id, price = %quote.display_price(), "Access granted");
        }
    }

    fn on_error(&self, error: &FlowError) {
        warn!(%error, "{}", error.user_message());
    }
}

pub async fn simulate(
    config: LoadedConfig,
    request: SimulationRequest,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let snapshot = run_simulation(config, request, shutdown_rx).await?;

    let Some(quote) = snapshot.quote.as_ref() else {
        println!("Session closed without payment");
        return Ok(());
    };
    match snapshot.state {
        FlowState::Succeeded => {
            println!("Unlocked {} ({})", quote.name, quote.display_price());
            Ok(())
        }
        FlowState::Failed => {
            if let Some(link) = &snapshot.contact_link {
                println!("Contact: {link}");
            }
            match &snapshot.last_error {
                Some(error) => bail!(error.user_message()),
                None => bail!("payment flow failed"),
            }
        }
        state => {
            println!("Session ended in state {state} without payment");
            Ok(())
        }
    }
}

/// Build a controller over the simulated host and drive one purchase.
///
/// Returns the last snapshot seen before the controller stopped.
async fn run_simulation(
    config: LoadedConfig,
    request: SimulationRequest,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<FlowSnapshot> {
    let bus = StatusSignalBus::new();
    let script = PaymentScript::new(bus.clone(), request.options.unlock_after);

    let mut surface = Surface::new(Arc::new(ConsoleBrowser::new(script.clone())));
    if request.embedded {
        surface = surface.with_bridge(Arc::new(ConsoleBridge::new(script.clone())));
    }
    if let Some(viewer) = surface.viewer() {
        info!(viewer = %viewer.name, "Running inside the chat client");
    }

    let host = FlowHost {
        env: Arc::new(SimHost::new(request.options, script)),
        surface,
        bus,
        access: AccessCache::new(),
    };
    // Covers the whole readiness ceiling plus the completion window.
    let patience = config
        .orchestrator
        .readiness
        .ceiling()
        .saturating_add(config.orchestrator.completion_window);

    let (controller_shutdown_tx, controller_shutdown_rx) = watch::channel(false);
    let (controller, handle) = PaymentFlowController::new(
        Arc::new(config.storefront),
        config.orchestrator,
        host,
        Arc::new(LoggingObserver),
        controller_shutdown_rx,
    );
    let task = tokio::spawn(controller.run());

    let outcome = drive(&handle, &request, patience, shutdown_rx).await;

    let _ = controller_shutdown_tx.send(true);
    task.await.context("payment flow controller panicked")?;
    outcome
}

async fn drive(
    handle: &FlowHandle,
    request: &SimulationRequest,
    patience: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<FlowSnapshot> {
    let opened = handle.open(&request.item).await?;
    if opened.state == FlowState::Idle {
        bail!("unknown item `{}`", request.item);
    }

    if opened.state != FlowState::Succeeded {
        let chosen = match request.amount.as_deref() {
            Some(input) => handle.choose_method_with_input(request.method, input).await?,
            None => handle.choose_method(request.method, None).await?,
        };
        if chosen.state == FlowState::SelectingMethod {
            if let Some(error) = &chosen.last_error {
                bail!(error.user_message());
            }
        }
    }

    let mut snapshots = handle.watch();
    let deadline = tokio::time::sleep(patience);
    tokio::pin!(deadline);

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        if matches!(
            snapshot.state,
            FlowState::Succeeded | FlowState::Failed | FlowState::Idle
        ) {
            return Ok(snapshot);
        }

        tokio::select! {
            changed = snapshots.changed() => {
                changed.context("payment flow stopped")?;
            }
            _ = shutdown_rx.changed() => {
                info!("Closing the payment surface");
                handle.close().await?;
                return Ok(snapshot);
            }
            _ = &mut deadline => {
                warn!(state = %snapshot.state, "No outcome within the completion window");
                handle.close().await?;
                return Ok(snapshot);
            }
        }
    }
}
