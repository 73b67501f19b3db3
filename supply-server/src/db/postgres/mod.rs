//! PostgreSQL store adapter
//!
//! Row types and statements live in the per-table modules; this module owns
//! the pool, the per-call timeout and the mapping of driver errors onto
//! [`StoreError`].

mod notifications;
mod orders;
mod pending_orders;
mod shipments;
mod vehicles;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use shared::models::{
    DataSource, MarkRead, Notification, NotificationCreate, Order, OrderCreate, OrderDetail,
    OrderQuery, OrderStatus, OrderUpdate, PendingOrder, PendingOrderCreate, PendingOrderQuery,
    PendingOrderStatus, Shipment, ShipmentCreate, ShipmentQuery, ShipmentUpdate, Vehicle,
    VehicleStatus,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, page_bounds};
use crate::BoxError;
use crate::config::Config;
use crate::dispatch::fleet::default_fleet;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(db.constraint().unwrap_or("unique key").to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Backend(Box::new(other)),
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    /// Build a lazy pool; no connection is attempted until first use.
    pub fn connect(config: &Config) -> Result<Self, BoxError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or("DATABASE_URL is required for relational persistence")?;
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.store_timeout)
            .connect_lazy(url)?;
        Ok(Self {
            pool,
            timeout: config.store_timeout,
        })
    }

    /// Run migrations and seed the default fleet.
    ///
    /// An unreachable database is not fatal: requests degrade to demo data
    /// until it comes back.
    pub async fn prepare(&self) -> StoreResult<()> {
        match tokio::time::timeout(self.timeout, sqlx::migrate!("./migrations").run(&self.pool))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(sqlx::migrate::MigrateError::Execute(e))) => return Err(e.into()),
            Ok(Err(e)) => return Err(StoreError::Backend(Box::new(e))),
            Err(_) => return Err(StoreError::Unavailable("migration timed out".into())),
        }
        self.seed_vehicles(&default_fleet()).await?;
        tracing::info!("Database schema ready");
        Ok(())
    }

    async fn timed<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Unavailable(format!(
                "store call exceeded {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    fn source(&self) -> DataSource {
        DataSource::Database
    }

    async fn insert_order(&self, order: &OrderCreate) -> StoreResult<Order> {
        self.timed(orders::insert(&self.pool, order)).await?.try_into()
    }

    async fn remove_order(&self, id: Uuid) -> StoreResult<bool> {
        self.timed(orders::remove(&self.pool, id)).await
    }

    async fn insert_shipment(
        &self,
        order: &Order,
        shipment: &ShipmentCreate,
    ) -> StoreResult<Shipment> {
        self.timed(shipments::insert(&self.pool, order.id, shipment))
            .await?
            .try_into()
    }

    async fn place_order(
        &self,
        order: &OrderCreate,
        shipment: &ShipmentCreate,
    ) -> StoreResult<(Order, Shipment)> {
        let (order_row, shipment_row) = self
            .timed(async {
                let mut tx = self.pool.begin().await?;
                let order_row = orders::insert(&mut *tx, order).await?;
                let shipment_row = shipments::insert(&mut *tx, order_row.id, shipment).await?;
                tx.commit().await?;
                Ok::<_, sqlx::Error>((order_row, shipment_row))
            })
            .await?;
        Ok((order_row.try_into()?, shipment_row.try_into()?))
    }

    async fn list_orders(&self, user_key: &str, query: &OrderQuery) -> StoreResult<Vec<Order>> {
        let (limit, offset) = page_bounds(query);
        let rows = self
            .timed(orders::list(&self.pool, user_key, query, limit, offset))
            .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_order(&self, user_key: &str, key: &str) -> StoreResult<Option<OrderDetail>> {
        let Some(row) = self.timed(orders::find(&self.pool, user_key, key)).await? else {
            return Ok(None);
        };
        let order = Order::try_from(row)?;
        let shipment = self
            .timed(shipments::find_by_order(&self.pool, order.id))
            .await?
            .map(Shipment::try_from)
            .transpose()?;
        Ok(Some(OrderDetail {
            order,
            shipment: shipment.as_ref().map(Shipment::summary),
        }))
    }

    async fn update_order(
        &self,
        user_key: &str,
        key: &str,
        update: &OrderUpdate,
    ) -> StoreResult<Option<Order>> {
        self.timed(orders::update(&self.pool, user_key, key, update))
            .await?
            .map(Order::try_from)
            .transpose()
    }

    async fn delete_order(&self, user_key: &str, key: &str) -> StoreResult<Option<Order>> {
        self.timed(orders::delete(&self.pool, user_key, key))
            .await?
            .map(Order::try_from)
            .transpose()
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<()> {
        self.timed(orders::set_status(&self.pool, order_id, status))
            .await
    }

    async fn list_shipments(
        &self,
        user_key: &str,
        query: &ShipmentQuery,
    ) -> StoreResult<Vec<Shipment>> {
        let rows = self
            .timed(shipments::list(&self.pool, user_key, query))
            .await?;
        rows.into_iter().map(Shipment::try_from).collect()
    }

    async fn find_shipment(&self, user_key: &str, key: &str) -> StoreResult<Option<Shipment>> {
        self.timed(shipments::find(&self.pool, user_key, key))
            .await?
            .map(Shipment::try_from)
            .transpose()
    }

    async fn update_shipment(
        &self,
        user_key: &str,
        id: Uuid,
        update: &ShipmentUpdate,
    ) -> StoreResult<Option<Shipment>> {
        self.timed(shipments::update(&self.pool, user_key, id, update))
            .await?
            .map(Shipment::try_from)
            .transpose()
    }

    async fn delete_shipment(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        self.timed(shipments::delete(&self.pool, user_key, id))
            .await
    }

    async fn insert_notification(
        &self,
        user_key: &str,
        notification: &NotificationCreate,
    ) -> StoreResult<Notification> {
        self.timed(notifications::insert(&self.pool, user_key, notification))
            .await
            .map(Notification::from)
    }

    async fn list_notifications(
        &self,
        user_key: &str,
        unread_only: bool,
        limit: usize,
    ) -> StoreResult<Vec<Notification>> {
        let rows = self
            .timed(notifications::list(&self.pool, user_key, unread_only, limit))
            .await?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn mark_notifications_read(
        &self,
        user_key: &str,
        target: &MarkRead,
    ) -> StoreResult<u64> {
        self.timed(notifications::mark_read(&self.pool, user_key, target))
            .await
    }

    async fn delete_notification(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        self.timed(notifications::delete(&self.pool, user_key, id))
            .await
    }

    async fn insert_pending_order(
        &self,
        user_key: &str,
        order: &PendingOrderCreate,
    ) -> StoreResult<PendingOrder> {
        self.timed(pending_orders::insert(&self.pool, user_key, order))
            .await?
            .try_into()
    }

    async fn list_pending_orders(
        &self,
        user_key: &str,
        query: &PendingOrderQuery,
    ) -> StoreResult<Vec<PendingOrder>> {
        let rows = self
            .timed(pending_orders::list(&self.pool, user_key, query))
            .await?;
        rows.into_iter().map(PendingOrder::try_from).collect()
    }

    async fn set_pending_order_status(
        &self,
        user_key: &str,
        id: Uuid,
        status: PendingOrderStatus,
    ) -> StoreResult<Option<PendingOrder>> {
        self.timed(pending_orders::set_status(&self.pool, user_key, id, status))
            .await?
            .map(PendingOrder::try_from)
            .transpose()
    }

    async fn delete_pending_order(&self, user_key: &str, id: Uuid) -> StoreResult<bool> {
        self.timed(pending_orders::delete(&self.pool, user_key, id))
            .await
    }

    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> StoreResult<Vec<Vehicle>> {
        let rows = self.timed(vehicles::list(&self.pool, status)).await?;
        rows.into_iter().map(Vehicle::try_from).collect()
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> StoreResult<Vehicle> {
        self.timed(vehicles::insert(&self.pool, vehicle))
            .await?
            .try_into()
    }

    async fn seed_vehicles(&self, seed: &[Vehicle]) -> StoreResult<()> {
        self.timed(async {
            let mut tx = self.pool.begin().await?;
            for vehicle in seed {
                vehicles::insert_if_absent(&mut *tx, vehicle).await?;
            }
            tx.commit().await
        })
        .await
    }

    async fn set_vehicle_status(&self, id: &str, status: VehicleStatus) -> StoreResult<()> {
        self.timed(vehicles::set_status(&self.pool, id, status))
            .await
    }
}

/// `%needle%` for ILIKE with the pattern metacharacters escaped
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Decode failures for TEXT-backed enums surface as backend errors
fn decode_err(err: impl std::error::Error + Send + Sync + 'static) -> StoreError {
    StoreError::Backend(Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ord"), "%ord%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(StoreError::from(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(StoreError::from(sqlx::Error::PoolClosed).is_unavailable());
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Backend(_)
        ));
    }

    #[tokio::test]
    async fn test_connect_is_lazy() {
        let config = Config {
            database_url: Some("postgres://nobody@127.0.0.1:1/none".into()),
            store_timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let store = PgStore::connect(&config).unwrap();
        let err = store.list_vehicles(None).await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {err}");
    }
}
