use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub amazon: AmazonConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/app.db".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Параметры расчёта прибыли (JPY, если не указано иное)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricingConfig {
    pub usd_to_jpy_rate: f64,
    pub transfer_fee: f64,
    pub customs_clearance_fee: f64,
    pub amazon_referral_fee_rate: f64,
    pub amazon_closing_fee: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            usd_to_jpy_rate: 150.0,
            transfer_fee: 500.0,
            customs_clearance_fee: 2000.0,
            amazon_referral_fee_rate: 0.15,
            amazon_closing_fee: 0.0,
        }
    }
}

/// Начальные настройки мониторинга. После первого сохранения из UI
/// действуют значения из sys_monitor_settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub check_interval_hours: u32,
    pub auto_stop_on_out_of_stock: bool,
    pub auto_update_prices: bool,
    pub auto_stop_low_profit: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_hours: 24,
            auto_stop_on_out_of_stock: true,
            auto_update_prices: true,
            auto_stop_low_profit: true,
        }
    }
}

/// Доступ к Amazon Product Advertising API
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AmazonConfig {
    pub access_key: String,
    pub secret_key: String,
    pub partner_tag: String,
}

impl AmazonConfig {
    pub fn is_configured(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty() && !self.partner_tag.is_empty()
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000

[pricing]
usd_to_jpy_rate = 150.0
transfer_fee = 500.0
customs_clearance_fee = 2000.0
amazon_referral_fee_rate = 0.15
amazon_closing_fee = 0.0

[monitor]
enabled = true
check_interval_hours = 24
auto_stop_on_out_of_stock = true
auto_update_prices = true
auto_stop_low_profit = true

[amazon]
access_key = ""
secret_key = ""
partner_tag = ""
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Сохранить загруженную конфигурацию для всего процесса
pub fn set_config(config: Config) -> anyhow::Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration is already initialized"))
}

/// Текущая конфигурация (значения по умолчанию, если `set_config` не вызывался)
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

impl Config {
    /// Переменные окружения имеют приоритет над config.toml
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AMAZON_ACCESS_KEY") {
            self.amazon.access_key = v;
        }
        if let Some(v) = lookup("AMAZON_SECRET_KEY") {
            self.amazon.secret_key = v;
        }
        if let Some(v) = lookup("AMAZON_PARTNER_TAG") {
            self.amazon.partner_tag = v;
        }
        if let Some(v) = lookup("USD_TO_JPY_RATE") {
            match v.trim().parse::<f64>() {
                Ok(rate) if rate > 0.0 => self.pricing.usd_to_jpy_rate = rate,
                _ => tracing::warn!("Ignoring invalid USD_TO_JPY_RATE: {}", v),
            }
        }
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment overrides are applied on top of either source.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    config.apply_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.pricing.usd_to_jpy_rate, 150.0);
        assert_eq!(config.monitor.check_interval_hours, 24);
        assert!(!config.amazon.is_configured());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[database]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.pricing.transfer_fee, 500.0);
        assert_eq!(config.pricing.customs_clearance_fee, 2000.0);
        assert!(config.monitor.auto_update_prices);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AMAZON_ACCESS_KEY", "AKIA"),
            ("AMAZON_SECRET_KEY", "secret"),
            ("AMAZON_PARTNER_TAG", "tag-22"),
            ("USD_TO_JPY_RATE", "148.5"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert!(config.amazon.is_configured());
        assert_eq!(config.pricing.usd_to_jpy_rate, 148.5);

        config.apply_overrides(|k| (k == "USD_TO_JPY_RATE").then(|| "abc".to_string()));
        assert_eq!(config.pricing.usd_to_jpy_rate, 148.5);
    }
}
