//! Configuration module for paylock-cli.
//!
//! Reads the storefront TOML file, validates it and converts it into the
//! runtime types used by the orchestrator.

pub mod file;

use crate::config::file::{FileConfig, ItemConfig, RecipientConfig};
use compact_str::CompactString;
use paylock_core::config::{ListenerMode, OrchestratorConfig};
use paylock_core::utils::retry::RetryPolicy;
use paylock_sdk::config::{CheckoutSettings, ContactConfig, StorefrontConfig};
use paylock_sdk::objects::PayableItem;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Upper bound of the delay between two capability probes.
const MAX_READINESS_INTERVAL_MS: u64 = 60_000;

/// Upper bound of a completion subscription's lifetime (one day).
const MAX_COMPLETION_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub storefront: StorefrontConfig,
    pub orchestrator: OrchestratorConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Read, validate and convert the configuration file.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        Self::parse(&config_content)
    }

    /// Validate and convert configuration text.
    pub fn parse(content: &str) -> Result<LoadedConfig, ConfigError> {
        let file_config: FileConfig = toml::from_str(content)?;
        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.contact.handle.trim_start_matches('@').trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "contact handle must not be empty".to_string(),
        ));
    }
    if config.recipient.address.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "recipient address must not be empty".to_string(),
        ));
    }
    if config.items.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one item must be configured".to_string(),
        ));
    }
    if config.orchestrator.readiness_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "readiness_attempts must be at least 1".to_string(),
        ));
    }

    if config.orchestrator.readiness_interval_ms > MAX_READINESS_INTERVAL_MS {
        return Err(ConfigError::ValidationError(format!(
            "readiness_interval_ms must be at most {MAX_READINESS_INTERVAL_MS}"
        )));
    }
    if config.orchestrator.completion_window_secs == 0
        || config.orchestrator.completion_window_secs > MAX_COMPLETION_WINDOW_SECS
    {
        return Err(ConfigError::ValidationError(format!(
            "completion_window_secs must be between 1 and {MAX_COMPLETION_WINDOW_SECS}"
        )));
    }

    let mut seen = HashSet::new();
    for item in &config.items {
        if item.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "item `{}` has an empty id",
                item.name
            )));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "item id `{}` is configured twice",
                item.id
            )));
        }
        if item.price <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "item `{}` must have a positive price",
                item.id
            )));
        }
        if item
            .recipient
            .as_deref()
            .is_some_and(|address| address.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(format!(
                "item `{}` has an empty recipient address",
                item.id
            )));
        }
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let recipient = file_config.recipient;
    let items = file_config
        .items
        .into_iter()
        .map(|item| convert_item(item, &recipient))
        .collect();

    let storefront = StorefrontConfig {
        checkout: CheckoutSettings {
            host: file_config.checkout.host,
            icon: file_config.checkout.icon,
            call_to_action: file_config.checkout.call_to_action,
            theme: file_config.checkout.theme,
        },
        contact: ContactConfig {
            handle: file_config.contact.handle.trim_start_matches('@').to_string(),
            chat_host: file_config.contact.chat_host,
        },
        items,
    };

    let tuning = file_config.orchestrator;
    let orchestrator = OrchestratorConfig {
        readiness: RetryPolicy::new(
            tuning.readiness_attempts,
            Duration::from_millis(tuning.readiness_interval_ms),
        ),
        completion_window: Duration::from_secs(tuning.completion_window_secs),
        listener_mode: if tuning.keep_listening {
            ListenerMode::KeepListening
        } else {
            ListenerMode::Once
        },
    };

    LoadedConfig {
        storefront,
        orchestrator,
    }
}

fn convert_item(item: ItemConfig, recipient: &RecipientConfig) -> PayableItem {
    PayableItem {
        id: CompactString::from(item.id),
        display_name: item.name,
        price: item.price,
        currency: item.currency.unwrap_or(recipient.currency),
        stablecoin: item.stablecoin.unwrap_or(recipient.stablecoin),
        network: item.network.unwrap_or(recipient.network),
        recipient_address: item
            .recipient
            .unwrap_or_else(|| recipient.address.clone()),
        duration_seconds: item.duration_seconds,
    }
}
