use config::{Config, ConfigError, File};
use filter_engine::{FilterDomainConfig, RateTable};
use serde::{Deserialize, Serialize};
use shared_types::{AmountRange, ConversionError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub amount_defaults: AmountDefaultsConfig,
    #[serde(default)]
    pub filters: FilterDomainConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            currency: CurrencyConfig::default(),
            amount_defaults: AmountDefaultsConfig::default(),
            filters: FilterDomainConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CurrencyConfig {
    pub base_currency: String,
    pub display_currency: String,
    /// Units of each currency per one unit of `base_currency`
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            display_currency: "VND".to_string(),
            rates: HashMap::from([("VND".to_string(), 25_000.0)]),
        }
    }
}

impl CurrencyConfig {
    pub fn rate_table(&self) -> Result<RateTable, ConversionError> {
        RateTable::from_rates(&self.base_currency, &self.rates)
    }
}

/// Amount bounds shown when a filter tree carries none, in display currency
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct AmountDefaultsConfig {
    pub min: f64,
    pub max: f64,
}

impl Default for AmountDefaultsConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1_000_000_000.0,
        }
    }
}

impl From<AmountDefaultsConfig> for AmountRange {
    fn from(value: AmountDefaultsConfig) -> Self {
        AmountRange::new(value.min, value.max)
    }
}

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 8080

[currency]
base_currency = "USD"
display_currency = "VND"

# Units of each currency per one unit of base_currency
[currency.rates]
VND = 25000.0

[amount_defaults]
min = 0.0
max = 1000000000.0

[filters]
# type_field = "type"
# amount_field = "amount"
# base_amount_field = "baseAmount"
# date_field = "date"
# currency_field = "currency"
# Empty string drops the currency condition
fixed_currency = "FX"
"#;

impl ApiConfig {
    /// Loads the config file, writing the default one first if it is missing
    pub fn load(path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        config
            .currency
            .rate_table()
            .and_then(|rates| rates.rate(&config.currency.display_currency))
            .map_err(|e| ConfigError::Message(format!("Invalid currency settings: {e}")))?;

        Ok((config, config_path))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("saving-filters").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
