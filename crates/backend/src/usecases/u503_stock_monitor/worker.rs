use chrono::{DateTime, Duration, Utc};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use super::{executor, settings};

/// Фоновая проверка наличия. Интервал читается из настроек на каждом тике.
pub struct MonitorWorker {
    tick_seconds: u64,
}

impl MonitorWorker {
    pub fn new(tick_seconds: u64) -> Self {
        Self { tick_seconds }
    }

    pub async fn run_loop(&self) {
        info!("Stock monitor worker started, tick every {} seconds", self.tick_seconds);
        let mut interval = time::interval(time::Duration::from_secs(self.tick_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.run_if_due().await {
                error!("Stock monitor run failed: {:?}", e);
            }
        }
    }

    async fn run_if_due(&self) -> anyhow::Result<()> {
        let settings = settings::load_settings().await?;
        if !settings.monitoring {
            return Ok(());
        }
        let last_run = settings::load_last_run().await?;
        if is_due(last_run.map(|r| r.at), settings.interval_hours(), Utc::now()) {
            info!("Scheduled stock check is due");
            executor::check_all().await?;
        }
        Ok(())
    }
}

/// Без предыдущего прогона проверка выполняется сразу
pub fn is_due(last_check_at: Option<DateTime<Utc>>, interval_hours: i64, now: DateTime<Utc>) -> bool {
    match last_check_at {
        Some(at) => at + Duration::hours(interval_hours) <= now,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_due() {
        let now = Utc::now();
        assert!(is_due(None, 24, now));
        assert!(!is_due(Some(now - Duration::hours(23)), 24, now));
        assert!(is_due(Some(now - Duration::hours(24)), 24, now));
        assert!(is_due(Some(now - Duration::hours(2)), 1, now));
    }
}
