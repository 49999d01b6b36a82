use super::api;
use crate::shared::components::{ErrorBanner, StatCard, StatTone, SuccessBanner};
use crate::shared::format::format_optional_timestamp;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::usecases::u503_stock_monitor::request::{
    MAX_CHECK_INTERVAL_HOURS, MIN_CHECK_INTERVAL_HOURS,
};
use contracts::usecases::u503_stock_monitor::{CheckAllSummary, MonitorSettings, MonitorStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

pub fn summary_text(summary: &CheckAllSummary) -> String {
    format!(
        "Проверено {} из {}, обновлено {}, остановлено {}, ошибок {}",
        summary.checked, summary.total, summary.updated, summary.auto_stopped, summary.errors
    )
}

fn summary_tone(summary: Option<&CheckAllSummary>) -> StatTone {
    match summary {
        Some(s) if s.errors > 0 => StatTone::Bad,
        Some(s) if s.auto_stopped > 0 => StatTone::Warning,
        Some(_) => StatTone::Good,
        None => StatTone::Neutral,
    }
}

/// Поля формы настроек; для чекбоксов thaw нужен отдельный сигнал на каждое поле
#[derive(Clone, Copy)]
struct SettingsForm {
    monitoring: RwSignal<bool>,
    interval: RwSignal<String>,
    auto_stop_on_out_of_stock: RwSignal<bool>,
    auto_update_prices: RwSignal<bool>,
    auto_stop_low_profit: RwSignal<bool>,
}

impl SettingsForm {
    fn new() -> Self {
        let defaults = MonitorSettings::default();
        Self {
            monitoring: RwSignal::new(defaults.monitoring),
            interval: RwSignal::new(defaults.check_interval_hours.to_string()),
            auto_stop_on_out_of_stock: RwSignal::new(defaults.auto_stop_on_out_of_stock),
            auto_update_prices: RwSignal::new(defaults.auto_update_prices),
            auto_stop_low_profit: RwSignal::new(defaults.auto_stop_low_profit),
        }
    }

    fn apply(&self, settings: &MonitorSettings) {
        self.monitoring.set(settings.monitoring);
        self.interval.set(settings.check_interval_hours.to_string());
        self.auto_stop_on_out_of_stock.set(settings.auto_stop_on_out_of_stock);
        self.auto_update_prices.set(settings.auto_update_prices);
        self.auto_stop_low_profit.set(settings.auto_stop_low_profit);
    }

    fn collect(&self) -> Result<MonitorSettings, String> {
        let check_interval_hours = self
            .interval
            .get()
            .trim()
            .parse::<f64>()
            .map_err(|_| "Интервал должен быть целым числом часов".to_string())?;
        let settings = MonitorSettings {
            monitoring: self.monitoring.get(),
            check_interval_hours,
            auto_stop_on_out_of_stock: self.auto_stop_on_out_of_stock.get(),
            auto_update_prices: self.auto_update_prices.get(),
            auto_stop_low_profit: self.auto_stop_low_profit.get(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[component]
pub fn StockMonitorView() -> impl IntoView {
    let (status, set_status) = signal::<Option<MonitorStatus>>(None);
    let form = SettingsForm::new();
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (is_checking, set_is_checking) = signal(false);

    let apply_status = move |s: MonitorStatus| {
        form.apply(&s.settings);
        set_status.set(Some(s));
    };

    let load_status = move || {
        spawn_local(async move {
            match api::fetch_status().await {
                Ok(s) => {
                    apply_status(s);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(format!("Ошибка загрузки состояния: {}", e))),
            }
        });
    };

    let save = move |_| {
        let current = match untrack(|| form.collect()) {
            Ok(settings) => settings,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        spawn_local(async move {
            match api::save_settings(&current).await {
                Ok(s) => {
                    apply_status(s);
                    set_error.set(None);
                    set_notice.set(Some("Настройки сохранены".to_string()));
                }
                Err(e) => set_error.set(Some(format!("Ошибка сохранения: {}", e))),
            }
        });
    };

    let run_check_all = move |_| {
        set_is_checking.set(true);
        set_notice.set(None);
        spawn_local(async move {
            match api::check_all().await {
                Ok(summary) => {
                    set_notice.set(Some(summary_text(&summary)));
                    load_status();
                }
                Err(e) => set_error.set(Some(format!("Ошибка проверки: {}", e))),
            }
            set_is_checking.set(false);
        });
    };

    load_status();

    view! {
        <PageFrame page_id="u503_stock_monitor--usecase" category=PAGE_CAT_USECASE>
            <div class="page__header">
                <div class="page__header-left">
                    <h2>{"Мониторинг наличия"}</h2>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load_status()>
                        {icon("refresh")}
                        " Обновить"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=run_check_all
                        disabled=Signal::derive(move || is_checking.get())
                    >
                        {icon("activity")}
                        {move || if is_checking.get() { " Проверка..." } else { " Проверить все" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ErrorBanner message=error />
                <SuccessBanner message=notice />

                <Show when=move || is_checking.get()>
                    <Space gap=SpaceGap::Small>
                        <Spinner />
                        <span>{"Проверяем листинги на Amazon..."}</span>
                    </Space>
                </Show>

                <div class="stat-grid">
                    <StatCard
                        label="Мониторинг"
                        icon_name="activity"
                        value=Signal::derive(move || {
                            match status.get().map(|s| s.monitoring) {
                                Some(true) => "Включён".to_string(),
                                Some(false) => "Выключен".to_string(),
                                None => "-".to_string(),
                            }
                        })
                        tone=Signal::derive(move || match status.get().map(|s| s.monitoring) {
                            Some(true) => StatTone::Good,
                            Some(false) => StatTone::Warning,
                            None => StatTone::Neutral,
                        })
                    />
                    <StatCard
                        label="Активных листингов"
                        icon_name="package"
                        value=Signal::derive(move || {
                            status.get().map(|s| s.monitored_count.to_string()).unwrap_or_else(|| "-".to_string())
                        })
                    />
                    <StatCard
                        label="Последняя проверка"
                        icon_name="refresh"
                        value=Signal::derive(move || {
                            status.with(|s| format_optional_timestamp(s.as_ref().and_then(|s| s.last_check_at.as_ref())))
                        })
                        subtitle=Signal::derive(move || {
                            status.with(|s| s.as_ref().and_then(|s| s.last_summary.as_ref()).map(summary_text))
                        })
                        tone=Signal::derive(move || {
                            status.with(|s| summary_tone(s.as_ref().and_then(|s| s.last_summary.as_ref())))
                        })
                    />
                </div>

                <Card>
                    <h3 class="card__title">{"Настройки"}</h3>
                    <Flex vertical=true gap=FlexGap::Medium>
                        <Checkbox checked=form.monitoring label="Фоновая проверка включена" />
                        <Flex align=FlexAlign::Center>
                            <Label>
                                {format!("Интервал проверки, ч ({}-{})", MIN_CHECK_INTERVAL_HOURS, MAX_CHECK_INTERVAL_HOURS)}
                            </Label>
                            <Input value=form.interval placeholder="24" />
                        </Flex>
                        <Checkbox
                            checked=form.auto_stop_on_out_of_stock
                            label="Останавливать листинг, если товара нет в наличии"
                        />
                        <Checkbox checked=form.auto_update_prices label="Обновлять цены и пересчитывать прибыль" />
                        <Checkbox
                            checked=form.auto_stop_low_profit
                            label="Останавливать листинг при прибыли ниже порога"
                        />
                        <div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=save
                                disabled=Signal::derive(move || form.collect().is_err())
                            >
                                {icon("save")}
                                " Сохранить"
                            </Button>
                        </div>
                    </Flex>
                </Card>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(errors: usize, auto_stopped: usize) -> CheckAllSummary {
        CheckAllSummary {
            total: 5,
            checked: 5,
            updated: 2,
            auto_stopped,
            errors,
        }
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(
            summary_text(&summary(0, 1)),
            "Проверено 5 из 5, обновлено 2, остановлено 1, ошибок 0"
        );
    }

    #[test]
    fn test_summary_tone() {
        assert_eq!(summary_tone(None), StatTone::Neutral);
        assert_eq!(summary_tone(Some(&summary(1, 1))), StatTone::Bad);
        assert_eq!(summary_tone(Some(&summary(0, 2))), StatTone::Warning);
        assert_eq!(summary_tone(Some(&summary(0, 0))), StatTone::Good);
    }
}
