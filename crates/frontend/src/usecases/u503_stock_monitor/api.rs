use crate::shared::api_utils::{get_json, post_empty, put_json};
use contracts::usecases::u503_stock_monitor::{
    CheckAllResponse, CheckAllSummary, MonitorSettings, MonitorStatus,
};

pub async fn fetch_status() -> Result<MonitorStatus, String> {
    get_json("/api/monitor/status").await
}

/// Сохранить настройки; сервер возвращает обновлённое состояние
pub async fn save_settings(settings: &MonitorSettings) -> Result<MonitorStatus, String> {
    put_json("/api/monitor/settings", settings).await
}

pub async fn check_all() -> Result<CheckAllSummary, String> {
    let response: CheckAllResponse = post_empty("/api/monitor/check-all").await?;
    Ok(response.result)
}
