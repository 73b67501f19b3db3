use shared::models::{LatLng, Vehicle, VehicleStatus};
use sqlx::{PgExecutor, PgPool};

use super::decode_err;
use crate::db::StoreError;

#[derive(sqlx::FromRow)]
pub(super) struct VehicleRow {
    pub id: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub vehicle_type: String,
    pub capacity_kg: i32,
    pub status: String,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = StoreError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let current_location = match (row.current_lat, row.current_lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        };
        Ok(Vehicle {
            status: row.status.parse::<VehicleStatus>().map_err(decode_err)?,
            id: row.id,
            vehicle_number: row.vehicle_number,
            driver_name: row.driver_name,
            vehicle_type: row.vehicle_type,
            capacity_kg: u32::try_from(row.capacity_kg).unwrap_or_default(),
            current_location,
        })
    }
}

pub(super) async fn list(
    pool: &PgPool,
    status: Option<VehicleStatus>,
) -> Result<Vec<VehicleRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM trucks WHERE ($1::text IS NULL OR status = $1) ORDER BY id")
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await
}

pub(super) async fn insert(pool: &PgPool, vehicle: &Vehicle) -> Result<VehicleRow, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO trucks
            (id, vehicle_number, driver_name, vehicle_type, capacity_kg, status, current_lat, current_lng)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(&vehicle.id)
    .bind(&vehicle.vehicle_number)
    .bind(&vehicle.driver_name)
    .bind(&vehicle.vehicle_type)
    .bind(i32::try_from(vehicle.capacity_kg).unwrap_or(i32::MAX))
    .bind(vehicle.status.as_str())
    .bind(vehicle.current_location.map(|p| p.lat))
    .bind(vehicle.current_location.map(|p| p.lng))
    .fetch_one(pool)
    .await
}

pub(super) async fn insert_if_absent<'e>(
    exec: impl PgExecutor<'e>,
    vehicle: &Vehicle,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO trucks
            (id, vehicle_number, driver_name, vehicle_type, capacity_kg, status, current_lat, current_lng)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT DO NOTHING",
    )
    .bind(&vehicle.id)
    .bind(&vehicle.vehicle_number)
    .bind(&vehicle.driver_name)
    .bind(&vehicle.vehicle_type)
    .bind(i32::try_from(vehicle.capacity_kg).unwrap_or(i32::MAX))
    .bind(vehicle.status.as_str())
    .bind(vehicle.current_location.map(|p| p.lat))
    .bind(vehicle.current_location.map(|p| p.lng))
    .execute(exec)
    .await?;
    Ok(())
}

pub(super) async fn set_status(
    pool: &PgPool,
    id: &str,
    status: VehicleStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE trucks SET status = $1 WHERE id = $2")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
