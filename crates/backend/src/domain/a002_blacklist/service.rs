use super::defaults::DEFAULT_GROUPS;
use super::error::BlacklistError;
use super::{matcher, repository};
use contracts::domain::a002_blacklist::aggregate::{
    normalize_value, BlacklistCheckRequest, BlacklistCheckResult, BlacklistEntry,
    BlacklistEntryDto,
};
use contracts::enums::blacklist_type::BlacklistType;
use contracts::enums::severity::Severity;
use uuid::Uuid;

/// Получение всех записей
pub async fn list_all() -> anyhow::Result<Vec<BlacklistEntry>> {
    repository::list_all().await
}

/// Добавление записи вручную
pub async fn create(dto: BlacklistEntryDto) -> anyhow::Result<BlacklistEntry> {
    let type_code = dto.entry_type.as_deref().map(str::trim).unwrap_or("");
    let value = dto.value.as_deref().map(normalize_value).unwrap_or_default();
    if type_code.is_empty() || value.is_empty() {
        return Err(BlacklistError::MissingField.into());
    }

    let entry_type = BlacklistType::from_code(type_code)
        .ok_or_else(|| BlacklistError::InvalidType(type_code.to_string()))?;

    let severity = match dto.severity.as_deref().map(str::trim) {
        None | Some("") => Severity::default(),
        Some(code) => {
            Severity::from_code(code).ok_or_else(|| BlacklistError::InvalidSeverity(code.to_string()))?
        }
    };

    if repository::exists(entry_type, &value).await? {
        return Err(BlacklistError::AlreadyExists(format!("{} '{}'", entry_type.code(), value)).into());
    }

    let entry = BlacklistEntry::new_for_insert(
        entry_type,
        &value,
        dto.reason.as_deref().unwrap_or(""),
        severity,
        false,
    );
    repository::insert(&entry).await?;
    tracing::info!("Blacklist entry added: {} '{}'", entry_type.code(), entry.value);
    Ok(entry)
}

/// Удаление записи
pub async fn delete(id: Uuid) -> anyhow::Result<()> {
    if repository::delete(id).await? {
        Ok(())
    } else {
        Err(BlacklistError::NotFound.into())
    }
}

/// Проверка товара по текущему черному списку
pub async fn check_product(req: &BlacklistCheckRequest) -> anyhow::Result<BlacklistCheckResult> {
    let entries = repository::list_all().await?;
    Ok(matcher::check_product(req, &entries))
}

/// Заполнение пустой таблицы записями по умолчанию. Возвращает число добавленных записей.
pub async fn seed_defaults() -> anyhow::Result<usize> {
    if repository::count().await? > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for group in DEFAULT_GROUPS {
        for value in group.values {
            let entry = BlacklistEntry::new_for_insert(
                group.entry_type,
                value,
                group.reason,
                group.severity,
                true,
            );
            repository::insert(&entry).await?;
            inserted += 1;
        }
    }
    tracing::info!("Seeded {} default blacklist entries", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::with_test_database;

    fn entry(entry_type: &str, value: &str) -> BlacklistEntryDto {
        BlacklistEntryDto {
            entry_type: Some(entry_type.to_string()),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn default_count() -> usize {
        DEFAULT_GROUPS.iter().map(|g| g.values.len()).sum()
    }

    #[tokio::test]
    async fn test_same_type_and_value_is_rejected() {
        with_test_database(async {
            let created = create(entry("brand", " Acme ")).await.unwrap();
            assert_eq!(created.value, "acme");
            assert_eq!(created.severity, Severity::High);
            assert!(!created.auto_detected);

            let e = create(entry("brand", "ACME")).await.unwrap_err();
            assert!(matches!(
                e.downcast_ref::<BlacklistError>(),
                Some(BlacklistError::AlreadyExists(_))
            ));
            assert_eq!(e.to_string(), "Entry already exists: brand 'acme'");

            // другой тип с тем же значением допустим
            create(entry("manufacturer", "acme")).await.unwrap();
            assert_eq!(list_all().await.unwrap().len(), 2);
        })
        .await;
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        with_test_database(async {
            let e = create(entry("brand", "  ")).await.unwrap_err();
            assert_eq!(e.to_string(), "type and value are required");
            let e = create(entry("colour", "red")).await.unwrap_err();
            assert_eq!(e.to_string(), "Invalid blacklist type: colour");
            let e = create(BlacklistEntryDto {
                severity: Some("urgent".to_string()),
                ..entry("brand", "acme")
            })
            .await
            .unwrap_err();
            assert_eq!(e.to_string(), "Invalid severity: urgent");
        })
        .await;
    }

    #[tokio::test]
    async fn test_seed_defaults_only_fills_empty_table() {
        with_test_database(async {
            assert_eq!(seed_defaults().await.unwrap(), default_count());
            assert_eq!(seed_defaults().await.unwrap(), 0);

            let entries = list_all().await.unwrap();
            assert_eq!(entries.len(), default_count());
            assert!(entries.iter().all(|e| e.auto_detected));
        })
        .await;
    }

    #[tokio::test]
    async fn test_seed_defaults_skips_table_with_manual_entries() {
        with_test_database(async {
            create(entry("keyword", "replica")).await.unwrap();
            assert_eq!(seed_defaults().await.unwrap(), 0);
            assert_eq!(list_all().await.unwrap().len(), 1);
        })
        .await;
    }
}
