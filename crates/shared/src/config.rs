//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// External collaborator endpoints.
    #[serde(default)]
    pub services: ServicesConfig,
    /// Settlement engine tuning.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Contract lookup cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Base URLs of the collaborators the engine consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Contract registry base URL.
    #[serde(default = "default_registry_url")]
    pub contract_registry_url: String,
    /// Periodic calculation service base URL.
    #[serde(default = "default_periodic_url")]
    pub periodic_calculation_url: String,
    /// Settlement persistence base URL.
    #[serde(default = "default_store_url")]
    pub settlement_store_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            contract_registry_url: default_registry_url(),
            periodic_calculation_url: default_periodic_url(),
            settlement_store_url: default_store_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_registry_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_periodic_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_store_url() -> String {
    "http://localhost:8083".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Settlement engine configuration.
///
/// Rates are fractions (`0.30` = 30%).
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Debounce window before asking the periodic calculation service.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Currency used when a contract does not carry one.
    #[serde(default)]
    pub currency: Currency,
    /// Early-termination penalty rate over remaining contracted rents.
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate: Decimal,
    /// Termination service fee rate over the penalty.
    #[serde(default = "default_service_fee_rate")]
    pub service_fee_rate: Decimal,
    /// Anticipation surcharge rate over the monthly installment.
    #[serde(default = "default_anticipation_rate")]
    pub anticipation_rate: Decimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            currency: Currency::default(),
            penalty_rate: default_penalty_rate(),
            service_fee_rate: default_service_fee_rate(),
            anticipation_rate: default_anticipation_rate(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_penalty_rate() -> Decimal {
    Decimal::new(30, 2)
}

fn default_service_fee_rate() -> Decimal {
    Decimal::new(20, 2)
}

fn default_anticipation_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// Contract lookup cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached contracts in seconds.
    #[serde(default = "default_contract_ttl_secs")]
    pub contract_ttl_secs: u64,
    /// Maximum number of cached contracts.
    #[serde(default = "default_max_contracts")]
    pub max_contracts: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            contract_ttl_secs: default_contract_ttl_secs(),
            max_contracts: default_max_contracts(),
        }
    }
}

fn default_contract_ttl_secs() -> u64 {
    60
}

fn default_max_contracts() -> u64 {
    500
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("REPASSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
