use chrono::{DateTime, Utc};
use shared::models::{
    LatLng, Location, RouteInfo, Shipment, ShipmentCreate, ShipmentQuery, ShipmentStatus,
    ShipmentUpdate,
};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::decode_err;
use crate::db::StoreError;

#[derive(sqlx::FromRow)]
pub(super) struct ShipmentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub order_number: String,
    pub user_key: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub vehicle_type: String,
    pub status: String,
    pub origin_name: String,
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_name: String,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub current_lat: f64,
    pub current_lng: f64,
    pub route: Json<RouteInfo>,
    pub eta: String,
    pub progress: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ShipmentRow> for Shipment {
    type Error = StoreError;

    fn try_from(row: ShipmentRow) -> Result<Self, Self::Error> {
        Ok(Shipment {
            status: row.status.parse::<ShipmentStatus>().map_err(decode_err)?,
            id: row.id,
            order_id: row.order_id,
            order_number: row.order_number,
            user_key: row.user_key,
            vehicle_id: row.vehicle_id,
            vehicle_number: row.vehicle_number,
            driver_name: row.driver_name,
            vehicle_type: row.vehicle_type,
            origin: Location::new(row.origin_name, row.origin_lat, row.origin_lng),
            destination: Location::new(
                row.destination_name,
                row.destination_lat,
                row.destination_lng,
            ),
            current_location: LatLng::new(row.current_lat, row.current_lng),
            route: row.route.0,
            eta: row.eta,
            progress: row.progress.clamp(0, 100) as u8,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(super) async fn insert<'e>(
    exec: impl PgExecutor<'e>,
    order_id: Uuid,
    shipment: &ShipmentCreate,
) -> Result<ShipmentRow, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO shipments (
            id, order_id, order_number, user_key, vehicle_id, vehicle_number, driver_name,
            vehicle_type, status, origin_name, origin_lat, origin_lng, destination_name,
            destination_lat, destination_lng, current_lat, current_lng, route, eta, progress
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                 $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(&shipment.order_number)
    .bind(&shipment.user_key)
    .bind(&shipment.vehicle_id)
    .bind(&shipment.vehicle_number)
    .bind(&shipment.driver_name)
    .bind(&shipment.vehicle_type)
    .bind(shipment.status.as_str())
    .bind(&shipment.origin.name)
    .bind(shipment.origin.lat)
    .bind(shipment.origin.lng)
    .bind(&shipment.destination.name)
    .bind(shipment.destination.lat)
    .bind(shipment.destination.lng)
    .bind(shipment.current_location.lat)
    .bind(shipment.current_location.lng)
    .bind(Json(&shipment.route))
    .bind(&shipment.eta)
    .bind(i16::from(shipment.progress))
    .fetch_one(exec)
    .await
}

pub(super) async fn list(
    pool: &PgPool,
    user_key: &str,
    query: &ShipmentQuery,
) -> Result<Vec<ShipmentRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM shipments
         WHERE user_key = $1
           AND ($2::text IS NULL OR status = $2)
           AND (NOT $3 OR status <> 'delivered')
         ORDER BY created_at DESC",
    )
    .bind(user_key)
    .bind(query.status.map(|s| s.as_str()))
    .bind(query.active == Some(true))
    .fetch_all(pool)
    .await
}

pub(super) async fn find(
    pool: &PgPool,
    user_key: &str,
    key: &str,
) -> Result<Option<ShipmentRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM shipments
         WHERE user_key = $1 AND (order_number = $2 OR id::text = $2)",
    )
    .bind(user_key)
    .bind(key)
    .fetch_optional(pool)
    .await
}

pub(super) async fn find_by_order(
    pool: &PgPool,
    order_id: Uuid,
) -> Result<Option<ShipmentRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM shipments WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await
}

pub(super) async fn update(
    pool: &PgPool,
    user_key: &str,
    id: Uuid,
    update: &ShipmentUpdate,
) -> Result<Option<ShipmentRow>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE shipments SET
            status = COALESCE($3, status),
            progress = COALESCE($4, progress),
            current_lat = COALESCE($5, current_lat),
            current_lng = COALESCE($6, current_lng),
            eta = COALESCE($7, eta),
            updated_at = now()
         WHERE user_key = $1 AND id = $2
         RETURNING *",
    )
    .bind(user_key)
    .bind(id)
    .bind(update.status.map(|s| s.as_str()))
    .bind(update.progress.map(i16::from))
    .bind(update.current_lat)
    .bind(update.current_lng)
    .bind(&update.eta)
    .fetch_optional(pool)
    .await
}

pub(super) async fn delete(pool: &PgPool, user_key: &str, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM shipments WHERE user_key = $1 AND id = $2")
        .bind(user_key)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
