use chrono::Utc;
use contracts::domain::a002_blacklist::aggregate::{BlacklistEntry, BlacklistEntryId};
use contracts::enums::blacklist_type::BlacklistType;
use contracts::enums::severity::Severity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_blacklist_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub entry_type: String,
    pub value: String,
    pub reason: String,
    pub severity: String,
    pub auto_detected: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BlacklistEntry {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let entry_type = BlacklistType::from_code(&m.entry_type)
            .ok_or_else(|| anyhow::anyhow!("Unknown blacklist type in row {}: {}", m.id, m.entry_type))?;
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        Ok(BlacklistEntry {
            id: BlacklistEntryId(uuid),
            entry_type,
            value: m.value,
            reason: m.reason,
            severity: Severity::from_code(&m.severity).unwrap_or_default(),
            auto_detected: m.auto_detected,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Все записи, новые первыми. Строки с неизвестным типом пропускаются.
pub async fn list_all() -> anyhow::Result<Vec<BlacklistEntry>> {
    let rows = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?;
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        match BlacklistEntry::try_from(row) {
            Ok(entry) => items.push(entry),
            Err(e) => tracing::warn!("Skipping blacklist row: {}", e),
        }
    }
    Ok(items)
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn exists(entry_type: BlacklistType, value: &str) -> anyhow::Result<bool> {
    let found = Entity::find()
        .filter(Column::EntryType.eq(entry_type.code()))
        .filter(Column::Value.eq(value))
        .one(conn())
        .await?;
    Ok(found.is_some())
}

pub async fn insert(entry: &BlacklistEntry) -> anyhow::Result<Uuid> {
    let uuid = entry.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        entry_type: Set(entry.entry_type.code().to_string()),
        value: Set(entry.value.clone()),
        reason: Set(entry.reason.clone()),
        severity: Set(entry.severity.code().to_string()),
        auto_detected: Set(entry.auto_detected),
        created_at: Set(Some(entry.created_at)),
    };
    active.insert(conn()).await?;
    Ok(uuid)
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
