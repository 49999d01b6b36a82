use chrono::Utc;
use contracts::domain::a001_listing::aggregate::{Listing, ListingId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::listing_status::ListingStatus;
use contracts::enums::stock_status::StockStatus;
use contracts::shared::Dimensions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub asin: String,
    pub jp_asin: Option<String>,
    pub us_asin: Option<String>,
    pub title: String,
    pub jp_price: f64,
    pub us_price: f64,
    pub listing_price: f64,
    pub profit_amount: f64,
    pub profit_rate: f64,
    pub status: String,
    pub stock_status: String,
    pub shipping_available: bool,
    pub last_checked: Option<chrono::DateTime<chrono::Utc>>,
    pub risk_score: f64,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub international_shipping_cost: f64,
    pub domestic_shipping_cost: f64,
    pub customs_fee: f64,
    pub transfer_fee: f64,
    pub amazon_fee: f64,
    pub minimum_profit_threshold: f64,
    pub source_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Listing {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let dimensions = match (m.length, m.width, m.height) {
            (Some(length), Some(width), Some(height)) => Some(Dimensions {
                length,
                width,
                height,
            }),
            _ => None,
        };

        Listing {
            id: ListingId(uuid),
            asin: m.asin,
            jp_asin: m.jp_asin,
            us_asin: m.us_asin,
            title: m.title,
            jp_price: m.jp_price,
            us_price: m.us_price,
            listing_price: m.listing_price,
            profit_amount: m.profit_amount,
            profit_rate: m.profit_rate,
            status: ListingStatus::from_code(&m.status).unwrap_or_default(),
            stock_status: StockStatus::from_code(&m.stock_status).unwrap_or_default(),
            shipping_available: m.shipping_available,
            last_checked: m.last_checked,
            risk_score: m.risk_score,
            category: m.category,
            manufacturer: m.manufacturer,
            weight: m.weight,
            dimensions,
            international_shipping_cost: m.international_shipping_cost,
            domestic_shipping_cost: m.domestic_shipping_cost,
            customs_fee: m.customs_fee,
            transfer_fee: m.transfer_fee,
            amazon_fee: m.amazon_fee,
            minimum_profit_threshold: m.minimum_profit_threshold,
            source_url: m.source_url,
            notes: m.notes,
            metadata,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Listing) -> ActiveModel {
    let dims = aggregate.dimensions;
    ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        asin: Set(aggregate.asin.clone()),
        jp_asin: Set(aggregate.jp_asin.clone()),
        us_asin: Set(aggregate.us_asin.clone()),
        title: Set(aggregate.title.clone()),
        jp_price: Set(aggregate.jp_price),
        us_price: Set(aggregate.us_price),
        listing_price: Set(aggregate.listing_price),
        profit_amount: Set(aggregate.profit_amount),
        profit_rate: Set(aggregate.profit_rate),
        status: Set(aggregate.status.code().to_string()),
        stock_status: Set(aggregate.stock_status.code().to_string()),
        shipping_available: Set(aggregate.shipping_available),
        last_checked: Set(aggregate.last_checked),
        risk_score: Set(aggregate.risk_score),
        category: Set(aggregate.category.clone()),
        manufacturer: Set(aggregate.manufacturer.clone()),
        weight: Set(aggregate.weight),
        length: Set(dims.map(|d| d.length)),
        width: Set(dims.map(|d| d.width)),
        height: Set(dims.map(|d| d.height)),
        international_shipping_cost: Set(aggregate.international_shipping_cost),
        domestic_shipping_cost: Set(aggregate.domestic_shipping_cost),
        customs_fee: Set(aggregate.customs_fee),
        transfer_fee: Set(aggregate.transfer_fee),
        amazon_fee: Set(aggregate.amazon_fee),
        minimum_profit_threshold: Set(aggregate.minimum_profit_threshold),
        source_url: Set(aggregate.source_url.clone()),
        notes: Set(aggregate.notes.clone()),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
        version: Set(aggregate.metadata.version),
    }
}

/// Список листингов, новые первыми
pub async fn list(
    status: Option<ListingStatus>,
    category: Option<&str>,
) -> anyhow::Result<Vec<Listing>> {
    let mut query = Entity::find();
    if let Some(status) = status {
        query = query.filter(Column::Status.eq(status.code()));
    }
    if let Some(category) = category {
        query = query.filter(Column::Category.eq(category));
    }
    let items = query
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_all() -> anyhow::Result<Vec<Listing>> {
    list(None, None).await
}

pub async fn count_by_status(status: ListingStatus) -> anyhow::Result<u64> {
    let count = Entity::find()
        .filter(Column::Status.eq(status.code()))
        .count(conn())
        .await?;
    Ok(count)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Listing>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Listing) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Listing) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_many(ids: &[String]) -> anyhow::Result<u64> {
    let result = Entity::delete_many()
        .filter(Column::Id.is_in(ids.iter().cloned()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_status_many(ids: &[String], status: ListingStatus) -> anyhow::Result<u64> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status.code()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.is_in(ids.iter().cloned()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected)
}
