//! Shipment tracking updates and the order status cascade

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{DataSource, Shipment, ShipmentQuery, ShipmentStatus, ShipmentUpdate};

use crate::db::{Store, StoreError, demo};
use crate::dispatch::FleetRegistry;
use crate::error::ServiceResult;
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_optional_text};

fn shipment_not_found(key: &str) -> AppError {
    AppError::with_message(ErrorCode::ShipmentNotFound, format!("Shipment {key} not found"))
}

fn out_of_range(field: &str, bounds: &str) -> AppError {
    AppError::with_message(ErrorCode::ValueOutOfRange, format!("{field} must be within {bounds}"))
}

#[derive(Clone)]
pub struct ShipmentService {
    store: Arc<dyn Store>,
    fleet: FleetRegistry,
}

impl ShipmentService {
    pub fn new(store: Arc<dyn Store>, fleet: FleetRegistry) -> Self {
        Self { store, fleet }
    }

    pub async fn list(
        &self,
        user_key: &str,
        query: &ShipmentQuery,
    ) -> ServiceResult<(Vec<Shipment>, DataSource)> {
        match self.store.list_shipments(user_key, query).await {
            Ok(rows) => Ok((rows, self.store.source())),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Shipment listing failed, serving demo shipments");
                Ok((demo::shipments(user_key, query), DataSource::Demo))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, user_key: &str, key: &str) -> ServiceResult<(Shipment, DataSource)> {
        let (found, source) = match self.store.find_shipment(user_key, key).await {
            Ok(found) => (found, self.store.source()),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, %key, "Shipment lookup failed, checking demo shipments");
                (demo::shipment(user_key, key), DataSource::Demo)
            }
            Err(e) => return Err(e.into()),
        };
        found
            .map(|s| (s, source))
            .ok_or_else(|| shipment_not_found(key).into())
    }

    /// Apply a tracking update, then move the owning order along with it.
    ///
    /// Reaching `delivered` without an explicit progress sets progress to 100.
    /// A failed order write after the shipment commit is logged, not returned.
    pub async fn update(
        &self,
        user_key: &str,
        key: &str,
        mut update: ShipmentUpdate,
    ) -> ServiceResult<Shipment> {
        if update.is_empty() {
            return Err(AppError::new(ErrorCode::NothingToUpdate).into());
        }
        if update.progress.is_some_and(|p| p > 100) {
            return Err(out_of_range("progress", "0..=100").into());
        }
        if update.current_lat.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
            return Err(out_of_range("currentLat", "-90..=90").into());
        }
        if update.current_lng.is_some_and(|lng| !(-180.0..=180.0).contains(&lng)) {
            return Err(out_of_range("currentLng", "-180..=180").into());
        }
        validate_optional_text(&update.eta, "eta", MAX_SHORT_TEXT_LEN)?;

        let current = self
            .store
            .find_shipment(user_key, key)
            .await?
            .ok_or_else(|| shipment_not_found(key))?;

        if let Some(next) = update.status {
            if !current.status.can_transition_to(next) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidShipmentTransition,
                    format!("Cannot move shipment from {} to {next}", current.status),
                )
                .with_detail("from", current.status.as_str())
                .with_detail("to", next.as_str())
                .into());
            }
            if next == ShipmentStatus::Delivered && update.progress.is_none() {
                update.progress = Some(100);
            }
        }

        let updated = self
            .store
            .update_shipment(user_key, current.id, &update)
            .await?
            .ok_or_else(|| shipment_not_found(key))?;

        if let Some(status) = update.status {
            // Re-asserting a status re-syncs a drifted order; the write is idempotent.
            if let Some(order_status) = status.cascaded_order_status() {
                match self.store.set_order_status(updated.order_id, order_status).await {
                    Ok(()) => tracing::info!(
                        order_number = %updated.order_number,
                        order_status = %order_status,
                        "Order status follows shipment"
                    ),
                    Err(e) => tracing::warn!(
                        order_number = %updated.order_number,
                        order_status = %order_status,
                        shipment_status = %status,
                        error = %e,
                        "Shipment saved but order status lags; resend the status to retry"
                    ),
                }
            }
            if status == ShipmentStatus::Delivered && current.status != status {
                self.fleet.release(&updated.vehicle_id).await;
            }
        }

        Ok(updated)
    }

    pub async fn delete(&self, user_key: &str, key: &str) -> ServiceResult<()> {
        let current = self
            .store
            .find_shipment(user_key, key)
            .await?
            .ok_or_else(|| shipment_not_found(key))?;
        if !self.store.delete_shipment(user_key, current.id).await? {
            return Err(shipment_not_found(key).into());
        }
        tracing::info!(shipment_id = %current.id, order_number = %current.order_number, "Shipment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DEFAULT_USER_KEY;
    use crate::db::MemoryStore;
    use crate::db::testing::FaultyStore;
    use shared::models::{OrderStatus, VehicleStatus};

    fn service(exclusive: bool) -> (Arc<MemoryStore>, ShipmentService) {
        let store = Arc::new(MemoryStore::new(100));
        let fleet = FleetRegistry::new(store.clone(), exclusive);
        (store.clone(), ShipmentService::new(store, fleet))
    }

    fn status(s: ShipmentStatus) -> ShipmentUpdate {
        ShipmentUpdate {
            status: Some(s),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_delivery_cascades_to_order() {
        let (store, svc) = service(false);
        let shipment = svc
            .update(DEFAULT_USER_KEY, "ORD-DEMO01", status(ShipmentStatus::Delivered))
            .await
            .unwrap();
        assert_eq!(shipment.progress, 100);
        let order = store.find_order(DEFAULT_USER_KEY, "ORD-DEMO01").await.unwrap().unwrap();
        assert_eq!(order.order.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_backwards_transition_rejected() {
        let (_, svc) = service(false);
        let err = svc
            .update(DEFAULT_USER_KEY, "ORD-DEMO02", status(ShipmentStatus::InTransit))
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::InvalidShipmentTransition);
    }

    #[tokio::test]
    async fn test_progress_bounds_and_location() {
        let (_, svc) = service(false);
        let err = svc
            .update(
                DEFAULT_USER_KEY,
                "ORD-DEMO01",
                ShipmentUpdate {
                    progress: Some(101),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::ValueOutOfRange);

        let moved = svc
            .update(
                DEFAULT_USER_KEY,
                "ORD-DEMO01",
                ShipmentUpdate {
                    progress: Some(80),
                    current_lat: Some(18.7),
                    current_lng: Some(73.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.progress, 80);
        assert_eq!(moved.status, ShipmentStatus::InTransit);
        assert!((moved.current_location.lat - 18.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_delivery_releases_vehicle_when_exclusive() {
        let (store, svc) = service(true);
        store.set_vehicle_status("TRK-001", VehicleStatus::InUse).await.unwrap();
        svc.update(DEFAULT_USER_KEY, "ORD-DEMO01", status(ShipmentStatus::Delivered))
            .await
            .unwrap();
        let available = store.list_vehicles(Some(VehicleStatus::Available)).await.unwrap();
        assert!(available.iter().any(|v| v.id == "TRK-001"));
    }

    #[tokio::test]
    async fn test_resent_status_resyncs_cancelled_order() {
        let (store, svc) = service(false);
        let orders = crate::services::OrderService::new(store.clone());
        orders
            .update(
                DEFAULT_USER_KEY,
                "ORD-DEMO01",
                shared::models::OrderUpdate {
                    status: Some(OrderStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let shipment = svc
            .update(
                DEFAULT_USER_KEY,
                "ORD-DEMO01",
                ShipmentUpdate {
                    status: Some(ShipmentStatus::InTransit),
                    progress: Some(70),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(shipment.status, ShipmentStatus::InTransit);
        assert_eq!(shipment.progress, 70);

        let order = store.find_order(DEFAULT_USER_KEY, "ORD-DEMO01").await.unwrap().unwrap();
        assert_eq!(order.order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_order_write_failure_keeps_shipment_update() {
        let store = Arc::new(FaultyStore::new().with_failing_order_status());
        let fleet = FleetRegistry::new(store.clone(), false);
        let svc = ShipmentService::new(store.clone(), fleet);

        let shipment = svc
            .update(DEFAULT_USER_KEY, "ORD-DEMO01", status(ShipmentStatus::Delivered))
            .await
            .unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Delivered);
        let order = store.inner().find_order(DEFAULT_USER_KEY, "ORD-DEMO01").await.unwrap().unwrap();
        assert_eq!(order.order.status, OrderStatus::Shipped);

        // Resending the same status once the store recovers catches the order up.
        store.recover_order_status();
        svc.update(DEFAULT_USER_KEY, "ORD-DEMO01", status(ShipmentStatus::Delivered))
            .await
            .unwrap();
        let order = store.inner().find_order(DEFAULT_USER_KEY, "ORD-DEMO01").await.unwrap().unwrap();
        assert_eq!(order.order.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let (_, svc) = service(false);
        svc.delete(DEFAULT_USER_KEY, "ORD-DEMO02").await.unwrap();
        let err = svc.get(DEFAULT_USER_KEY, "ORD-DEMO02").await.unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::ShipmentNotFound);
    }
}
