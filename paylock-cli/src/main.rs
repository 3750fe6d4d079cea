//! paylock
//!
//! Payment authorization orchestrator for stablecoin storefronts embedded in
//! chat mini-apps. The binary inspects a storefront configuration and drives
//! the payment flow against a simulated host page.

mod commands;
mod config;
mod shutdown;
mod sim;

use clap::{Parser, Subcommand, ValueEnum};
use config::ConfigLoader;
use paylock_sdk::objects::PaymentMethod;
use shutdown::spawn_shutdown_handler;
use sim::SimOptions;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Paylock - stablecoin paywall orchestrator
#[derive(Parser, Debug)]
#[command(name = "paylock")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the storefront configuration file
    #[arg(short, long, env = "PAYLOCK_CONFIG", default_value = "./paylock.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and list the catalog
    Validate,

    /// Print the checkout modal configuration and hosted checkout link of an item
    Checkout {
        item: String,

        #[arg(short, long, value_enum, default_value_t = Method::Wallet)]
        method: Method,

        /// Custom amount replacing the item price
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Print the chat link and prompt used to pay through the contact
    Contact {
        item: String,

        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Run a full payment flow against a simulated host page
    Simulate(SimulateArgs),
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    item: String,

    #[arg(short, long, value_enum, default_value_t = Method::Wallet)]
    method: Method,

    #[arg(short, long)]
    amount: Option<String>,

    /// Delay before the payment capability appears
    #[arg(long, default_value = "300")]
    capability_delay_ms: u64,

    /// Never install the payment capability
    #[arg(long, default_value = "false")]
    no_capability: bool,

    /// Capability without the checkout modal entry point
    #[arg(long, default_value = "false")]
    no_modal: bool,

    /// Delay between starting the checkout and the unlock signal
    #[arg(long, default_value = "1500")]
    unlock_after_ms: u64,

    /// The viewer never completes the payment
    #[arg(long, default_value = "false")]
    never_pay: bool,

    /// Run inside the chat client instead of a plain browser page
    #[arg(long, default_value = "false")]
    embedded: bool,
}

impl SimulateArgs {
    fn options(&self) -> SimOptions {
        SimOptions {
            capability_delay: (!self.no_capability)
                .then(|| Duration::from_millis(self.capability_delay_ms)),
            checkout_modal: !self.no_modal,
            unlock_after: (!self.never_pay).then(|| Duration::from_millis(self.unlock_after_ms)),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Wallet,
    Card,
}

impl From<Method> for PaymentMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Wallet => PaymentMethod::Wallet,
            Method::Card => PaymentMethod::Card,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let loaded_config = ConfigLoader::new(&args.config).load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    match args.command {
        Command::Validate => {
            commands::validate(&loaded_config);
            Ok(())
        }
        Command::Checkout {
            item,
            method,
            amount,
        } => commands::checkout(&loaded_config, &item, method.into(), amount.as_deref()),
        Command::Contact { item, amount } => {
            commands::contact(&loaded_config, &item, amount.as_deref())
        }
        Command::Simulate(sim_args) => {
            let shutdown_rx = spawn_shutdown_handler();
            let request = commands::SimulationRequest {
                item: sim_args.item.clone(),
                method: sim_args.method.into(),
                amount: sim_args.amount.clone(),
                options: sim_args.options(),
                embedded: sim_args.embedded,
            };
            commands::simulate(loaded_config, request, shutdown_rx).await
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,paylock_core=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
