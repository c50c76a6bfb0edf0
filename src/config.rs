//! Configuration loading and validation

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::chain::{
    TokenAmount, BASESCAN_URL, BASE_CHAIN_ID, DEFAULT_TOKEN_DECIMALS, DEGEN_TOKEN_ADDRESS,
    MAX_DECIMALS,
};
use crate::profile::DEFAULT_AVATAR_SERVICE;
use crate::wallet::ConnectorInfo;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub tip: TipConfig,
    #[serde(default)]
    pub onboarding: OnboardingConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub frame: FrameConfig,
}

/// Target network
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_chain_name")]
    pub name: String,
    /// Block explorer; transaction links are `{explorer_url}/tx/{hash}`
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

/// The token being tipped
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_address")]
    pub address: String,
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    #[serde(default = "default_token_decimals")]
    pub decimals: u8,
    /// Cross-check `decimals` against the contract before sending
    #[serde(default = "default_true")]
    pub verify_decimals: bool,
}

/// Wallet connectors and request timing
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    #[serde(default = "default_connectors")]
    pub connectors: Vec<ConnectorInfo>,
    /// Connector names offered to the user; empty allows all
    #[serde(default)]
    pub allowed_connectors: Vec<String>,
    #[serde(default = "default_connector")]
    pub default_connector: String,
    /// Transport timeout per JSON-RPC request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
}

/// Tip form behavior
#[derive(Debug, Clone, Deserialize)]
pub struct TipConfig {
    /// Amount pre-filled in the form, in whole tokens
    #[serde(default = "default_tip_amount")]
    pub default_amount: String,
    #[serde(default = "default_preset_amounts")]
    pub preset_amounts: Vec<u64>,
    /// Allow a new tip while another is awaiting approval or confirming
    #[serde(default)]
    pub allow_concurrent_tips: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingConfig {
    /// JSON file holding the "has seen onboarding" flag
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_avatar_service_url")]
    pub avatar_service_url: String,
}

/// Frame host manifest and embed settings
#[derive(Debug, Clone, Deserialize)]
pub struct FrameConfig {
    /// Public URL the app is served from
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_button_title")]
    pub button_title: String,
    #[serde(default = "default_splash_background_color")]
    pub splash_background_color: String,
    #[serde(default)]
    pub account_association: AccountAssociationConfig,
}

/// Signed domain ownership proof issued by the frame host
#[derive(Debug, Clone, Deserialize)]
pub struct AccountAssociationConfig {
    #[serde(default = "default_association_header")]
    pub header: String,
    #[serde(default = "default_association_payload")]
    pub payload: String,
    #[serde(default = "default_association_signature")]
    pub signature: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_chain_id() -> u64 {
    BASE_CHAIN_ID
}

fn default_chain_name() -> String {
    "Base".to_string()
}

fn default_explorer_url() -> String {
    BASESCAN_URL.to_string()
}

fn default_token_address() -> String {
    DEGEN_TOKEN_ADDRESS.to_string()
}

fn default_token_symbol() -> String {
    "DEGEN".to_string()
}

fn default_token_decimals() -> u8 {
    DEFAULT_TOKEN_DECIMALS
}

fn default_connectors() -> Vec<ConnectorInfo> {
    vec![
        ConnectorInfo {
            id: "frame".to_string(),
            name: "Frame".to_string(),
            rpc_url: "http://127.0.0.1:1248".to_string(),
        },
        ConnectorInfo {
            id: "local".to_string(),
            name: "Local Node".to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
        },
    ]
}

fn default_connector() -> String {
    "frame".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_receipt_poll_interval_ms() -> u64 {
    2_000
}

fn default_tip_amount() -> String {
    "100".to_string()
}

fn default_preset_amounts() -> Vec<u64> {
    vec![100, 250, 500]
}

fn default_state_file() -> String {
    ".tipper/state.json".to_string()
}

fn default_avatar_service_url() -> String {
    DEFAULT_AVATAR_SERVICE.to_string()
}

fn default_base_url() -> String {
    "https://karma-tipper.vercel.app".to_string()
}

fn default_app_name() -> String {
    "Karma Tipper".to_string()
}

fn default_button_title() -> String {
    "Open Karma Tipper".to_string()
}

fn default_splash_background_color() -> String {
    "#9333ea".to_string()
}

fn default_association_header() -> String {
    "eyJmaWQiOjczMTM5NCwidHlwZSI6ImN1c3RvZHkiLCJrZXkiOiIweGJhYUZDNDg5RTc5YjgzQjNiMzg2Y2EzNDM1ZmNBMDQ1NkUwMGNBRWQifQ".to_string()
}

fn default_association_payload() -> String {
    "eyJkb21haW4iOiJrYXJtYS10aXBwZXIudmVyY2VsLmFwcCJ9".to_string()
}

fn default_association_signature() -> String {
    "pDRJhgkCNzlSGo/b0uroixniT10/ncYAKv8DAND+zj8AFYfqtKIk6phGsIHiCAjpQtJBGrjg85HSYmpPpYqdgBs="
        .to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            name: default_chain_name(),
            explorer_url: default_explorer_url(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            address: default_token_address(),
            symbol: default_token_symbol(),
            decimals: default_token_decimals(),
            verify_decimals: true,
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            connectors: default_connectors(),
            allowed_connectors: Vec::new(),
            default_connector: default_connector(),
            request_timeout_ms: default_request_timeout_ms(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
        }
    }
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            default_amount: default_tip_amount(),
            preset_amounts: default_preset_amounts(),
            allow_concurrent_tips: false,
        }
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            avatar_service_url: default_avatar_service_url(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_name: default_app_name(),
            button_title: default_button_title(),
            splash_background_color: default_splash_background_color(),
            account_association: AccountAssociationConfig::default(),
        }
    }
}

impl Default for AccountAssociationConfig {
    fn default() -> Self {
        Self {
            header: default_association_header(),
            payload: default_association_payload(),
            signature: default_association_signature(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Start with defaults
            .set_default("chain.chain_id", default_chain_id() as i64)?
            .set_default("token.address", default_token_address())?
            .set_default("token.decimals", default_token_decimals() as i64)?
            .set_default("frame.base_url", default_base_url())?
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix TIPPER_)
            .add_source(
                config::Environment::with_prefix("TIPPER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chain.chain_id == 0 {
            anyhow::bail!("chain_id must be positive");
        }

        url::Url::parse(&self.chain.explorer_url)
            .with_context(|| format!("Invalid explorer_url: {}", self.chain.explorer_url))?;

        let address_pattern = Regex::new(r"^0x[0-9a-fA-F]{40}$")?;
        if !address_pattern.is_match(&self.token.address) {
            anyhow::bail!("Invalid token address: {}", self.token.address);
        }

        if self.token.decimals > MAX_DECIMALS {
            anyhow::bail!(
                "token decimals cannot exceed {}, got {}",
                MAX_DECIMALS,
                self.token.decimals
            );
        }

        if self.tip.preset_amounts.iter().any(|amount| *amount == 0) {
            anyhow::bail!("preset_amounts must all be positive");
        }

        TokenAmount::parse(&self.tip.default_amount, self.token.decimals)
            .with_context(|| format!("Invalid default tip amount: {}", self.tip.default_amount))?;

        if self.wallet.receipt_poll_interval_ms == 0 {
            anyhow::bail!("receipt_poll_interval_ms must be positive");
        }

        if self.wallet.request_timeout_ms == 0 {
            anyhow::bail!("request_timeout_ms must be positive");
        }

        for connector in &self.wallet.connectors {
            url::Url::parse(&connector.rpc_url).with_context(|| {
                format!("Invalid rpc_url for connector {}: {}", connector.id, connector.rpc_url)
            })?;
        }

        let allowed = &self.wallet.allowed_connectors;
        if !allowed.is_empty()
            && !self
                .wallet
                .connectors
                .iter()
                .any(|c| allowed.contains(&c.name))
        {
            anyhow::bail!(
                "allowed_connectors {:?} matches none of the configured connectors",
                allowed
            );
        }

        if !self.wallet.default_connector.is_empty()
            && !self
                .wallet
                .connectors
                .iter()
                .any(|c| c.id == self.wallet.default_connector)
        {
            tracing::warn!(
                connector = %self.wallet.default_connector,
                "default_connector does not match any configured connector"
            );
        }

        url::Url::parse(&self.frame.base_url)
            .with_context(|| format!("Invalid frame base_url: {}", self.frame.base_url))?;

        Ok(())
    }

    /// Get masked configuration for display (hide secrets)
    pub fn masked_display(&self) -> String {
        let connectors: Vec<String> = self
            .wallet
            .connectors
            .iter()
            .map(|c| format!("{} ({})", c.name, mask_url(&c.rpc_url)))
            .collect();

        format!(
            r#"Configuration:
  Chain:
    name: {}
    chain_id: {}
    explorer: {}
  Token:
    symbol: {}
    address: {}
    decimals: {}
    verify_decimals: {}
  Wallet:
    connectors: {:?}
    allowed: {:?}
    default: {}
    request_timeout: {}ms
    receipt_poll_interval: {}ms
  Tip:
    default_amount: {}
    presets: {:?}
    allow_concurrent: {}
  Onboarding:
    state_file: {}
  Frame:
    base_url: {}
    app_name: {}
    signature: {}
"#,
            self.chain.name,
            self.chain.chain_id,
            self.chain.explorer_url,
            self.token.symbol,
            self.token.address,
            self.token.decimals,
            self.token.verify_decimals,
            connectors,
            self.wallet.allowed_connectors,
            self.wallet.default_connector,
            self.wallet.request_timeout_ms,
            self.wallet.receipt_poll_interval_ms,
            self.tip.default_amount,
            self.tip.preset_amounts,
            self.tip.allow_concurrent_tips,
            self.onboarding.state_file,
            self.frame.base_url,
            self.frame.app_name,
            if self.frame.account_association.signature.is_empty() {
                "(not set)"
            } else {
                "***"
            },
        )
    }
}

/// Mask URL for display (hide API keys in query params)
fn mask_url(url: &str) -> String {
    if let Some(idx) = url.find('?') {
        format!("{}?***", &url[..idx])
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chain.chain_id, 8453);
        assert_eq!(config.token.decimals, 18);
        assert_eq!(config.tip.preset_amounts, vec![100, 250, 500]);
        assert_eq!(config.tip.default_amount, "100");
        assert!(!config.tip.allow_concurrent_tips);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tipper.toml");
        std::fs::write(
            &path,
            r#"
[token]
decimals = 6
verify_decimals = false

[tip]
preset_amounts = [5, 10]
allow_concurrent_tips = true

[[wallet.connectors]]
id = "dev"
name = "Dev"
rpc_url = "http://localhost:9545"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.token.decimals, 6);
        assert!(!config.token.verify_decimals);
        assert_eq!(config.tip.preset_amounts, vec![5, 10]);
        assert!(config.tip.allow_concurrent_tips);
        assert_eq!(config.wallet.connectors.len(), 1);
        assert_eq!(config.wallet.connectors[0].rpc_url, "http://localhost:9545");
        // A custom connector is usable without touching the allow-list
        let wallet = crate::wallet::Eip1193Wallet::new(&config.wallet).unwrap();
        assert_eq!(crate::wallet::WalletBackend::connectors(&wallet).len(), 1);
        // Untouched sections keep their defaults
        assert_eq!(config.token.address, DEGEN_TOKEN_ADDRESS);
        assert_eq!(config.chain.chain_id, BASE_CHAIN_ID);
    }

    #[test]
    fn test_allow_list_must_match_a_connector() {
        let mut config = Config::default();
        assert!(config.wallet.allowed_connectors.is_empty());

        config.wallet.allowed_connectors = vec!["Frame".to_string()];
        assert!(config.validate().is_ok());

        config.wallet.allowed_connectors = vec!["Rabby".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.frame.base_url, "https://karma-tipper.vercel.app");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.token.address = "0x1234".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.token.decimals = 78;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chain.chain_id = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tip.preset_amounts = vec![100, 0];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.wallet.receipt_poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.frame.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tip.default_amount = "0".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_masked_display_hides_secrets() {
        let mut config = Config::default();
        config.wallet.connectors[0].rpc_url = "https://rpc.example.com?key=secret".to_string();

        let display = config.masked_display();
        assert!(!display.contains("secret"));
        assert!(!display.contains(&config.frame.account_association.signature));
        assert!(display.contains("https://rpc.example.com?***"));
    }

    #[test]
    fn test_mask_url() {
        assert_eq!(
            mask_url("https://api.example.com?key=secret"),
            "https://api.example.com?***"
        );
        assert_eq!(
            mask_url("https://api.example.com"),
            "https://api.example.com"
        );
    }
}
