use super::error::ListingError;
use super::{duplicates, repository};
use crate::domain::a002_blacklist;
use contracts::domain::a001_listing::aggregate::{
    normalize_asin, DuplicatePair, ImportRequest, ImportResult, Listing, ListingDto,
    ListingPatch, RejectedRow,
};
use contracts::domain::a002_blacklist::aggregate::BlacklistCheckRequest;
use contracts::domain::common::AggregateRoot;
use contracts::enums::listing_status::ListingStatus;
use uuid::Uuid;

fn parse_status(code: &str) -> Result<ListingStatus, ListingError> {
    ListingStatus::from_code(code).ok_or_else(|| ListingError::InvalidStatus(ListingStatus::codes_joined()))
}

/// Список листингов с фильтрами по статусу и категории
pub async fn list(status: Option<&str>, category: Option<&str>) -> anyhow::Result<Vec<Listing>> {
    let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(code) => Some(parse_status(code)?),
        None => None,
    };
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    repository::list(status, category).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Listing>> {
    repository::get_by_id(id).await
}

/// Проверки перед созданием: поля формы, черный список, дубликаты.
/// Ошибки накапливаются, чтобы показать пользователю все причины сразу.
async fn creation_errors(dto: &ListingDto) -> anyhow::Result<Vec<String>> {
    let mut errors = dto.field_errors();
    if !dto.validate || dto.asin.trim().is_empty() {
        return Ok(errors);
    }

    let check = a002_blacklist::service::check_product(&BlacklistCheckRequest {
        asin: Some(normalize_asin(&dto.asin)),
        title: Some(dto.title.clone()),
        manufacturer: dto.manufacturer.clone(),
        category: dto.category.clone(),
        brand: None,
    })
    .await?;
    if check.is_blocked {
        errors.push(format!("Product blocked: {}", check.reasons.join(", ")));
    }

    let existing = repository::list_all().await?;
    let duplicate = duplicates::check_duplicate(
        &dto.asin,
        dto.source_url.as_deref(),
        Some(&dto.title),
        &existing,
    );
    if duplicate.is_duplicate {
        errors.push(format!(
            "Duplicate detected: {}",
            duplicate.reason.unwrap_or_default()
        ));
    }
    Ok(errors)
}

/// Создание нового листинга
pub async fn create(dto: ListingDto) -> anyhow::Result<Listing> {
    let errors = creation_errors(&dto).await?;
    if !errors.is_empty() {
        return Err(ListingError::Validation(errors).into());
    }

    let mut aggregate = Listing::new_for_insert(&dto);
    aggregate
        .validate()
        .map_err(|e| ListingError::Validation(vec![e]))?;
    aggregate.before_write();

    repository::insert(&aggregate).await?;
    tracing::info!("Listing created: {} ({})", aggregate.asin, aggregate.id.value());
    Ok(aggregate)
}

/// Частичное обновление листинга
pub async fn update(id: Uuid, patch: ListingPatch) -> anyhow::Result<Listing> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ListingError::NotFound)?;

    aggregate.apply_patch(&patch);
    aggregate
        .validate()
        .map_err(|e| ListingError::Validation(vec![e]))?;
    aggregate.before_write();

    repository::update(&aggregate).await?;
    Ok(aggregate)
}

/// Сохранение листинга после проверки монитором
pub async fn save(aggregate: &mut Listing) -> anyhow::Result<()> {
    aggregate.before_write();
    repository::update(aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<()> {
    if repository::delete(id).await? {
        Ok(())
    } else {
        Err(ListingError::NotFound.into())
    }
}

/// Массовая смена статуса. Возвращает число изменённых записей.
pub async fn bulk_update_status(ids: &[String], status: &str) -> anyhow::Result<u64> {
    let status = parse_status(status)?;
    let updated = repository::set_status_many(ids, status).await?;
    tracing::info!("Bulk status update to '{}': {} listings", status, updated);
    Ok(updated)
}

pub async fn bulk_delete(ids: &[String]) -> anyhow::Result<u64> {
    let deleted = repository::delete_many(ids).await?;
    tracing::info!("Bulk delete: {} listings", deleted);
    Ok(deleted)
}

/// Импорт пакета листингов. Каждая строка проходит тот же путь, что и
/// `create`, поэтому дубликаты внутри пакета тоже отсекаются.
pub async fn import(request: ImportRequest) -> anyhow::Result<ImportResult> {
    let mut result = ImportResult {
        total: request.items.len(),
        ..Default::default()
    };

    for (index, mut dto) in request.items.into_iter().enumerate() {
        dto.validate = request.validate;
        let asin = normalize_asin(&dto.asin);
        let row = dto.source_row.unwrap_or(index + 1);
        match create(dto).await {
            Ok(_) => result.created += 1,
            Err(e) => {
                let errors = match e.downcast_ref::<ListingError>() {
                    Some(ListingError::Validation(errors)) => errors.clone(),
                    _ => {
                        tracing::error!("Import row {} failed: {}", row, e);
                        vec![e.to_string()]
                    }
                };
                result.rejected.push(RejectedRow { row, asin, errors });
            }
        }
    }

    tracing::info!(
        "Import finished: {} of {} created, {} rejected",
        result.created,
        result.total,
        result.rejected.len()
    );
    Ok(result)
}

/// Пары дубликатов среди всех сохранённых листингов
pub async fn find_duplicates() -> anyhow::Result<Vec<DuplicatePair>> {
    let listings = repository::list_all().await?;
    Ok(duplicates::find_duplicates(&listings))
}

pub async fn list_active() -> anyhow::Result<Vec<Listing>> {
    repository::list(Some(ListingStatus::Active), None).await
}

pub async fn count_active() -> anyhow::Result<u64> {
    repository::count_by_status(ListingStatus::Active).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::with_test_database;
    use contracts::domain::a002_blacklist::aggregate::BlacklistEntryDto;

    fn dto(asin: &str, title: &str) -> ListingDto {
        ListingDto {
            asin: asin.to_string(),
            title: title.to_string(),
            jp_price: 5000.0,
            us_price: 20.0,
            listing_price: 9800.0,
            ..Default::default()
        }
    }

    fn validation_errors(e: anyhow::Error) -> Vec<String> {
        match e.downcast::<ListingError>() {
            Ok(ListingError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    async fn block_keyword(value: &str, reason: &str) {
        a002_blacklist::service::create(BlacklistEntryDto {
            entry_type: Some("keyword".to_string()),
            value: Some(value.to_string()),
            reason: Some(reason.to_string()),
            severity: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_collects_field_blacklist_and_duplicate_errors_in_order() {
        with_test_database(async {
            block_keyword("battery", "Dangerous goods keyword").await;
            let first = create(dto("B0ABC12345", "Desk lamp")).await.unwrap();
            assert_eq!(first.status, ListingStatus::Draft);

            let mut again = dto(" b0abc12345 ", "Spare battery pack");
            again.us_price = -1.0;
            let errors = validation_errors(create(again).await.unwrap_err());
            assert_eq!(
                errors,
                vec![
                    "us_price must be a non-negative number".to_string(),
                    "Product blocked: Prohibited keyword found: Dangerous goods keyword".to_string(),
                    "Duplicate detected: ASIN already exists: B0ABC12345".to_string(),
                ]
            );
            assert_eq!(list(None, None).await.unwrap().len(), 1);
        })
        .await;
    }

    #[tokio::test]
    async fn test_create_without_validation_skips_blacklist_and_duplicates() {
        with_test_database(async {
            block_keyword("battery", "").await;
            create(dto("B0ABC12345", "Battery charger")).await.unwrap_err();

            let mut unchecked = dto("B0ABC12345", "Battery charger");
            unchecked.validate = false;
            create(unchecked.clone()).await.unwrap();
            create(unchecked).await.unwrap();
            assert_eq!(list(None, None).await.unwrap().len(), 2);
        })
        .await;
    }

    #[tokio::test]
    async fn test_import_rejects_duplicates_within_batch() {
        with_test_database(async {
            let mut lamp = dto("B0ABC12345", "Desk lamp");
            lamp.source_row = Some(2);
            let hose = dto("B0XYZ99999", "Garden hose");
            let mut lamp_again = dto("b0abc12345", "Desk lamp");
            lamp_again.source_row = Some(5);

            let result = import(ImportRequest {
                items: vec![lamp, hose, lamp_again],
                validate: true,
            })
            .await
            .unwrap();

            assert_eq!(result.total, 3);
            assert_eq!(result.created, 2);
            assert_eq!(
                result.rejected,
                vec![RejectedRow {
                    row: 5,
                    asin: "B0ABC12345".to_string(),
                    errors: vec!["Duplicate detected: ASIN already exists: B0ABC12345".to_string()],
                }]
            );
        })
        .await;
    }

    #[tokio::test]
    async fn test_import_row_defaults_to_position_in_batch() {
        with_test_database(async {
            let result = import(ImportRequest {
                items: vec![dto("B0ABC12345", "Desk lamp"), dto("", "No asin")],
                validate: false,
            })
            .await
            .unwrap();
            assert_eq!(result.created, 1);
            assert_eq!(result.rejected[0].row, 2);
            assert_eq!(result.rejected[0].errors, vec!["ASIN is required".to_string()]);
        })
        .await;
    }

    #[tokio::test]
    async fn test_bulk_update_status() {
        with_test_database(async {
            let a = create(dto("B0ABC12345", "Desk lamp")).await.unwrap();
            let b = create(dto("B0XYZ99999", "Garden hose")).await.unwrap();
            let ids = vec![a.id.value().to_string(), b.id.value().to_string()];

            let e = bulk_update_status(&ids, "archived").await.unwrap_err();
            assert_eq!(
                e.to_string(),
                "Invalid status. Must be one of: draft, active, paused, stopped, error"
            );

            assert_eq!(bulk_update_status(&ids, "active").await.unwrap(), 2);
            assert_eq!(count_active().await.unwrap(), 2);
            let stored = get_by_id(a.id.value()).await.unwrap().unwrap();
            assert_eq!(stored.status, ListingStatus::Active);
        })
        .await;
    }
}
