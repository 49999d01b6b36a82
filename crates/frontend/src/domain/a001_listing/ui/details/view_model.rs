use super::model::{self, ListingForm};
use crate::usecases::u502_profit_calculation::api::calculate_profit;
use contracts::domain::a001_listing::{Listing, ListingDto};
use contracts::usecases::u502_profit_calculation::ProfitResult;
use leptos::prelude::*;
use std::rc::Rc;

/// ViewModel карточки листинга
#[derive(Clone, Copy)]
pub struct ListingDetailsVm {
    pub form: RwSignal<ListingForm>,
    /// Состояние после последней загрузки или сохранения
    pub baseline: RwSignal<ListingForm>,
    pub error: RwSignal<Option<String>>,
    pub notice: RwSignal<Option<String>>,
    pub is_loading: RwSignal<bool>,
    pub is_saving: RwSignal<bool>,
    pub profit_preview: RwSignal<Option<ProfitResult>>,
}

impl ListingDetailsVm {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(ListingForm::default()),
            baseline: RwSignal::new(ListingForm::default()),
            error: RwSignal::new(None),
            notice: RwSignal::new(None),
            is_loading: RwSignal::new(false),
            is_saving: RwSignal::new(false),
            profit_preview: RwSignal::new(None),
        }
    }

    pub fn is_edit_mode(&self) -> impl Fn() -> bool + Copy + 'static {
        let form = self.form;
        move || form.with(|f| f.id.is_some())
    }

    pub fn is_form_valid(&self) -> impl Fn() -> bool + Copy + 'static {
        let form = self.form;
        move || form.with(|f| Self::validate_form(f).is_ok())
    }

    pub fn is_dirty(&self) -> impl Fn() -> bool + Copy + 'static {
        let form = self.form;
        let baseline = self.baseline;
        move || form.with(|f| baseline.with(|b| f != b))
    }

    pub fn validate_form(form: &ListingForm) -> Result<(), &'static str> {
        if form.asin.trim().is_empty() {
            return Err("ASIN обязателен для заполнения");
        }
        let prices = [form.jp_price, form.us_price, form.listing_price];
        if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err("Цены должны быть неотрицательными числами");
        }
        let costs = [
            form.international_shipping_cost,
            form.domestic_shipping_cost,
            form.customs_fee,
            form.transfer_fee,
            form.amazon_fee,
            form.minimum_profit_threshold,
        ];
        if costs.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err("Издержки не могут быть отрицательными");
        }
        if form.weight.is_some_and(|w| w < 0.0) {
            return Err("Вес не может быть отрицательным");
        }
        Ok(())
    }

    /// Загружает листинг по ID либо применяет черновик, переданный другой страницей
    pub fn load_if_needed(&self, id: Option<String>, draft: Option<serde_json::Value>) {
        match id {
            Some(id) => self.load(id),
            None => {
                let Some(value) = draft else {
                    return;
                };
                match serde_json::from_value::<ListingDto>(value) {
                    Ok(dto) => self.form.set(dto.into()),
                    Err(e) => log::warn!("listing draft ignored: {}", e),
                }
            }
        }
    }

    fn load(&self, id: String) {
        let vm = *self;
        vm.is_loading.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match model::fetch_by_id(&id).await {
                Ok(listing) => vm.apply_saved(listing),
                Err(e) => vm.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
            vm.is_loading.set(false);
        });
    }

    fn apply_saved(&self, listing: Listing) {
        let form: ListingForm = listing.into();
        self.baseline.set(form.clone());
        self.form.set(form);
    }

    pub fn update_form(&self, f: impl FnOnce(&mut ListingForm)) {
        self.form.update(f);
        self.profit_preview.set(None);
    }

    /// Создаёт или обновляет листинг; `on_saved` получает ответ сервера
    pub fn save_command(&self, on_saved: Rc<dyn Fn(Listing)>) {
        let current = self.form.get_untracked();
        if let Err(msg) = Self::validate_form(&current) {
            self.error.set(Some(msg.to_string()));
            return;
        }

        let vm = *self;
        vm.error.set(None);
        vm.notice.set(None);
        vm.is_saving.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            let saved = match current.id.as_deref() {
                Some(id) => model::update(id, &current.to_patch()).await,
                None => model::create(&current.to_dto()).await,
            };
            match saved {
                Ok(listing) => {
                    vm.apply_saved(listing.clone());
                    vm.notice.set(Some("Сохранено".to_string()));
                    (on_saved)(listing);
                }
                Err(e) => vm.error.set(Some(e)),
            }
            vm.is_saving.set(false);
        });
    }

    /// Предварительный расчёт прибыли по текущим значениям формы
    pub fn preview_profit_command(&self) {
        let request = self.form.with_untracked(|f| f.to_profit_request());
        if request.us_price <= 0.0 || request.jp_listing_price <= 0.0 {
            self.error
                .set(Some("Для расчёта укажите цену US и цену продажи".to_string()));
            return;
        }
        let vm = *self;
        wasm_bindgen_futures::spawn_local(async move {
            match calculate_profit(&request).await {
                Ok(result) => {
                    vm.error.set(None);
                    vm.profit_preview.set(Some(result));
                }
                Err(e) => vm.error.set(Some(format!("Ошибка расчёта: {}", e))),
            }
        });
    }
}

impl Default for ListingDetailsVm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_form() {
        let mut form = ListingForm::default();
        assert_eq!(
            ListingDetailsVm::validate_form(&form),
            Err("ASIN обязателен для заполнения")
        );

        form.asin = "B000000001".to_string();
        assert!(ListingDetailsVm::validate_form(&form).is_ok());

        form.us_price = -1.0;
        assert!(ListingDetailsVm::validate_form(&form).is_err());

        form.us_price = 20.0;
        form.weight = Some(-5.0);
        assert_eq!(
            ListingDetailsVm::validate_form(&form),
            Err("Вес не может быть отрицательным")
        );
    }
}
