use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{PendingOrder, PendingOrderCreate, PendingOrderQuery, PendingOrderStatus};
use sqlx::PgPool;
use uuid::Uuid;

use super::decode_err;
use crate::db::StoreError;

#[derive(sqlx::FromRow)]
pub(super) struct PendingOrderRow {
    pub id: Uuid,
    pub user_key: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub recommendation: Option<String>,
    pub source: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PendingOrderRow> for PendingOrder {
    type Error = StoreError;

    fn try_from(row: PendingOrderRow) -> Result<Self, Self::Error> {
        Ok(PendingOrder {
            status: row.status.parse::<PendingOrderStatus>().map_err(decode_err)?,
            id: row.id,
            user_key: row.user_key,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: u32::try_from(row.quantity).unwrap_or(1),
            unit_price: row.unit_price,
            total: row.total,
            recommendation: row.recommendation,
            source: row.source,
            created_at: row.created_at,
        })
    }
}

pub(super) async fn insert(
    pool: &PgPool,
    user_key: &str,
    order: &PendingOrderCreate,
) -> Result<PendingOrderRow, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO pending_orders
            (id, user_key, product_id, product_name, quantity, unit_price, total, recommendation, source, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_key)
    .bind(&order.product_id)
    .bind(&order.product_name)
    .bind(i32::try_from(order.quantity).unwrap_or(i32::MAX))
    .bind(order.unit_price)
    .bind(order.total)
    .bind(&order.recommendation)
    .bind(&order.source)
    .bind(PendingOrderStatus::Pending.as_str())
    .fetch_one(pool)
    .await
}

pub(super) async fn list(
    pool: &PgPool,
    user_key: &str,
    query: &PendingOrderQuery,
) -> Result<Vec<PendingOrderRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM pending_orders
         WHERE user_key = $1 AND ($2::text IS NULL OR status = $2)
         ORDER BY created_at DESC",
    )
    .bind(user_key)
    .bind(query.status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
}

pub(super) async fn set_status(
    pool: &PgPool,
    user_key: &str,
    id: Uuid,
    status: PendingOrderStatus,
) -> Result<Option<PendingOrderRow>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE pending_orders SET status = $3
         WHERE user_key = $1 AND id = $2
         RETURNING *",
    )
    .bind(user_key)
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}

pub(super) async fn delete(pool: &PgPool, user_key: &str, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pending_orders WHERE user_key = $1 AND id = $2")
        .bind(user_key)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
