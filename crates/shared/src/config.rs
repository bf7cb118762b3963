//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Financial statement configuration.
    #[serde(default)]
    pub statements: StatementsConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Financial statement configuration: report cache behavior and the
/// account-code thresholds used to classify balance-sheet and
/// income-statement sections.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementsConfig {
    /// Time-to-live for cached statements, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Maximum number of cached statements.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Asset accounts with codes at or below this are current assets.
    #[serde(default = "default_current_asset_code_max")]
    pub current_asset_code_max: u32,
    /// Liability accounts with codes at or below this are current liabilities.
    #[serde(default = "default_current_liability_code_max")]
    pub current_liability_code_max: u32,
    /// Revenue accounts with codes at or below this are operating revenue.
    #[serde(default = "default_operating_revenue_code_max")]
    pub operating_revenue_code_max: u32,
    /// Start of the cost-of-goods-sold expense code range (inclusive).
    #[serde(default = "default_cogs_code_min")]
    pub cogs_code_min: u32,
    /// End of the cost-of-goods-sold expense code range (inclusive).
    #[serde(default = "default_cogs_code_max")]
    pub cogs_code_max: u32,
    /// Expense accounts above the COGS range and at or below this are
    /// operating expenses; anything higher is non-operating.
    #[serde(default = "default_operating_expense_code_max")]
    pub operating_expense_code_max: u32,
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_cache_capacity() -> u64 {
    256
}

fn default_current_asset_code_max() -> u32 {
    1499
}

fn default_current_liability_code_max() -> u32 {
    2499
}

fn default_operating_revenue_code_max() -> u32 {
    4899
}

fn default_cogs_code_min() -> u32 {
    5000
}

fn default_cogs_code_max() -> u32 {
    5099
}

fn default_operating_expense_code_max() -> u32 {
    5899
}

impl Default for StatementsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            current_asset_code_max: default_current_asset_code_max(),
            current_liability_code_max: default_current_liability_code_max(),
            operating_revenue_code_max: default_operating_revenue_code_max(),
            cogs_code_min: default_cogs_code_min(),
            cogs_code_max: default_cogs_code_max(),
            operating_expense_code_max: default_operating_expense_code_max(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Layering, later sources overriding earlier ones:
    /// `config/default.toml`, `config/{RUN_MODE}.toml`, then environment
    /// variables prefixed with `FOLIO` (e.g. `FOLIO__DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
