use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{Order, OrderCreate, OrderItem, OrderQuery, OrderStatus, OrderUpdate};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{decode_err, like_pattern};
use crate::db::StoreError;

#[derive(sqlx::FromRow)]
pub(super) struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub tracking_number: String,
    pub user_key: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Json<Vec<OrderItem>>,
    pub total_amount: Decimal,
    pub status: String,
    pub shipping_address: String,
    pub delivery_type: String,
    pub assigned_vehicle_id: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            status: row.status.parse::<OrderStatus>().map_err(decode_err)?,
            id: row.id,
            order_number: row.order_number,
            tracking_number: row.tracking_number,
            user_key: row.user_key,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            items: row.items.0,
            total_amount: row.total_amount,
            shipping_address: row.shipping_address,
            delivery_type: row.delivery_type,
            assigned_vehicle_id: row.assigned_vehicle_id,
            vehicle_number: row.vehicle_number,
            driver_name: row.driver_name,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Matches a row by UUID or order number within one owner's orders
const KEY_FILTER: &str = "user_key = $1 AND (order_number = $2 OR id::text = $2)";

pub(super) async fn insert<'e>(
    exec: impl PgExecutor<'e>,
    order: &OrderCreate,
) -> Result<OrderRow, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO orders (
            id, order_number, tracking_number, user_key, customer_id, customer_name,
            items, total_amount, status, shipping_address, delivery_type,
            assigned_vehicle_id, vehicle_number, driver_name, notes
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&order.order_number)
    .bind(&order.tracking_number)
    .bind(&order.user_key)
    .bind(&order.customer_id)
    .bind(&order.customer_name)
    .bind(Json(&order.items))
    .bind(order.total_amount)
    .bind(order.status.as_str())
    .bind(&order.shipping_address)
    .bind(&order.delivery_type)
    .bind(&order.assigned_vehicle_id)
    .bind(&order.vehicle_number)
    .bind(&order.driver_name)
    .bind(&order.notes)
    .fetch_one(exec)
    .await
}

pub(super) async fn remove(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(super) async fn list(
    pool: &PgPool,
    user_key: &str,
    query: &OrderQuery,
    limit: u32,
    offset: u32,
) -> Result<Vec<OrderRow>, sqlx::Error> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);
    sqlx::query_as(
        "SELECT * FROM orders
         WHERE user_key = $1
           AND ($2::text IS NULL OR status = $2)
           AND ($3::text IS NULL
                OR order_number ILIKE $3
                OR tracking_number ILIKE $3
                OR customer_name ILIKE $3)
         ORDER BY created_at DESC
         LIMIT $4 OFFSET $5",
    )
    .bind(user_key)
    .bind(query.status.map(|s| s.as_str()))
    .bind(search)
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(pool)
    .await
}

pub(super) async fn find(
    pool: &PgPool,
    user_key: &str,
    key: &str,
) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT * FROM orders WHERE {KEY_FILTER}"))
        .bind(user_key)
        .bind(key)
        .fetch_optional(pool)
        .await
}

pub(super) async fn update(
    pool: &PgPool,
    user_key: &str,
    key: &str,
    update: &OrderUpdate,
) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE orders SET
            status = COALESCE($3, status),
            shipping_address = COALESCE($4, shipping_address),
            delivery_type = COALESCE($5, delivery_type),
            assigned_vehicle_id = COALESCE($6, assigned_vehicle_id),
            vehicle_number = COALESCE($7, vehicle_number),
            driver_name = COALESCE($8, driver_name),
            notes = COALESCE($9, notes),
            updated_at = now()
         WHERE {KEY_FILTER}
         RETURNING *"
    ))
    .bind(user_key)
    .bind(key)
    .bind(update.status.map(|s| s.as_str()))
    .bind(&update.shipping_address)
    .bind(&update.delivery_type)
    .bind(&update.assigned_vehicle_id)
    .bind(&update.vehicle_number)
    .bind(&update.driver_name)
    .bind(&update.notes)
    .fetch_optional(pool)
    .await
}

/// Shipments go with the order via `ON DELETE CASCADE`
pub(super) async fn delete(
    pool: &PgPool,
    user_key: &str,
    key: &str,
) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as(&format!("DELETE FROM orders WHERE {KEY_FILTER} RETURNING *"))
        .bind(user_key)
        .bind(key)
        .fetch_optional(pool)
        .await
}

pub(super) async fn set_status(
    pool: &PgPool,
    order_id: Uuid,
    status: OrderStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET status = $1, updated_at = now() WHERE id = $2")
        .bind(status.as_str())
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(())
}
