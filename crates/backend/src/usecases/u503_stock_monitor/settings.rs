use chrono::{DateTime, Utc};
use contracts::usecases::u503_stock_monitor::{CheckAllSummary, MonitorSettings};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::shared::config::config;
use crate::shared::data::db::get_connection;

const SETTINGS_KEY: &str = "settings";
const LAST_RUN_KEY: &str = "last_run";

/// Последний прогон проверки всех листингов
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastRun {
    pub at: DateTime<Utc>,
    pub summary: CheckAllSummary,
}

/// Настройки по умолчанию берутся из секции [monitor] конфигурации
pub fn default_settings() -> MonitorSettings {
    let monitor = &config().monitor;
    MonitorSettings {
        monitoring: monitor.enabled,
        check_interval_hours: f64::from(monitor.check_interval_hours),
        auto_stop_on_out_of_stock: monitor.auto_stop_on_out_of_stock,
        auto_update_prices: monitor.auto_update_prices,
        auto_stop_low_profit: monitor.auto_stop_low_profit,
    }
}

pub async fn load_settings() -> anyhow::Result<MonitorSettings> {
    Ok(read_value(SETTINGS_KEY)
        .await?
        .unwrap_or_else(default_settings))
}

pub async fn save_settings(settings: &MonitorSettings) -> anyhow::Result<()> {
    write_value(SETTINGS_KEY, settings).await
}

pub async fn load_last_run() -> anyhow::Result<Option<LastRun>> {
    read_value(LAST_RUN_KEY).await
}

pub async fn save_last_run(run: &LastRun) -> anyhow::Result<()> {
    write_value(LAST_RUN_KEY, run).await
}

async fn read_value<T: DeserializeOwned>(key: &str) -> anyhow::Result<Option<T>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value_json FROM sys_monitor_settings WHERE key = ?;",
            vec![key.into()],
        ))
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let json: String = row.try_get("", "value_json")?;
    match serde_json::from_str(&json) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Ignoring malformed monitor value '{}': {}", key, e);
            Ok(None)
        }
    }
}

async fn write_value<T: Serialize>(key: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)?;
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_monitor_settings (key, value_json, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json, updated_at = excluded.updated_at;",
            vec![key.into(), json.into(), Utc::now().to_rfc3339().into()],
        ))
        .await?;
    Ok(())
}
