//! Fleet registry
//!
//! Reads vehicles through the store and picks one for each new shipment.
//! The five seeded trucks double as the fallback fleet when the store is
//! unreachable.

use std::sync::Arc;

use rand::seq::SliceRandom;
use shared::error::{AppError, ErrorCode};
use shared::models::{DataSource, LatLng, Vehicle, VehicleCreate, VehicleStatus};

use crate::db::{Store, StoreError};
use crate::error::{ServiceError, ServiceResult};
use crate::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};

pub const DEFAULT_CAPACITY_KG: u32 = 10_000;

fn seeded(
    id: &str,
    number: &str,
    driver: &str,
    vehicle_type: &str,
    capacity_kg: u32,
    at: LatLng,
) -> Vehicle {
    Vehicle {
        id: id.into(),
        vehicle_number: number.into(),
        driver_name: driver.into(),
        vehicle_type: vehicle_type.into(),
        capacity_kg,
        status: VehicleStatus::Available,
        current_location: Some(at),
    }
}

/// Trucks present on first start
pub fn default_fleet() -> Vec<Vehicle> {
    vec![
        seeded("TRK-001", "MH-01-AB-1234", "Rajesh Kumar", "Heavy Truck", 15_000, LatLng::new(19.0760, 72.8777)),
        seeded("TRK-002", "DL-02-CD-5678", "Amit Singh", "Medium Truck", 8_000, LatLng::new(28.7041, 77.1025)),
        seeded("TRK-003", "KA-03-EF-9012", "Suresh Patel", "Heavy Truck", 15_000, LatLng::new(12.9716, 77.5946)),
        seeded("TRK-004", "TN-04-GH-3456", "Vikram Rao", "Delivery Van", 3_000, LatLng::new(13.0827, 80.2707)),
        seeded("TRK-005", "WB-05-IJ-7890", "Manoj Verma", "Heavy Truck", 15_000, LatLng::new(22.5726, 88.3639)),
    ]
}

/// `TRK-` plus the last six digits of the current millisecond clock
fn generated_vehicle_id() -> String {
    let millis = shared::util::now_millis().unsigned_abs();
    format!("TRK-{:06}", millis % 1_000_000)
}

#[derive(Clone)]
pub struct FleetRegistry {
    store: Arc<dyn Store>,
    exclusive_dispatch: bool,
}

impl FleetRegistry {
    pub fn new(store: Arc<dyn Store>, exclusive_dispatch: bool) -> Self {
        Self {
            store,
            exclusive_dispatch,
        }
    }

    pub fn exclusive_dispatch(&self) -> bool {
        self.exclusive_dispatch
    }

    /// List vehicles, falling back to the seeded fleet when the store is down.
    pub async fn list(&self, status: Option<VehicleStatus>) -> ServiceResult<(Vec<Vehicle>, DataSource)> {
        match self.store.list_vehicles(status).await {
            Ok(vehicles) => Ok((vehicles, self.store.source())),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Fleet read failed, serving seeded trucks");
                let vehicles = default_fleet()
                    .into_iter()
                    .filter(|v| status.is_none_or(|s| v.status == s))
                    .collect();
                Ok((vehicles, DataSource::Demo))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Uniform choice among vehicles whose status is `available`.
    pub async fn pick_available(&self) -> ServiceResult<Vehicle> {
        let (candidates, _) = self.list(Some(VehicleStatus::Available)).await?;
        candidates
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(ServiceError::NoVehicleAvailable)
    }

    pub async fn register(&self, payload: VehicleCreate) -> ServiceResult<Vehicle> {
        validate_required_text(&payload.vehicle_number, "vehicleNumber", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.driver_name, "driverName", MAX_NAME_LEN)?;
        validate_required_text(&payload.vehicle_type, "vehicleType", MAX_SHORT_TEXT_LEN)?;
        if let Some(at) = payload.current_location
            && !at.is_valid()
        {
            return Err(AppError::validation("currentLocation is out of range").into());
        }

        let vehicle = Vehicle {
            id: payload
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(generated_vehicle_id),
            vehicle_number: payload.vehicle_number.trim().to_string(),
            driver_name: payload.driver_name.trim().to_string(),
            vehicle_type: payload.vehicle_type.trim().to_string(),
            capacity_kg: payload.capacity_kg.unwrap_or(DEFAULT_CAPACITY_KG),
            status: payload.status.unwrap_or(VehicleStatus::Available),
            current_location: payload.current_location,
        };

        match self.store.insert_vehicle(&vehicle).await {
            Ok(saved) => {
                tracing::info!(vehicle_id = %saved.id, number = %saved.vehicle_number, "Vehicle registered");
                Ok(saved)
            }
            Err(StoreError::Duplicate(_)) => Err(AppError::with_message(
                ErrorCode::VehicleAlreadyExists,
                format!("Vehicle {} already exists", vehicle.vehicle_number),
            )
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort: mark a freshly dispatched vehicle busy.
    pub async fn mark_dispatched(&self, vehicle_id: &str) {
        if !self.exclusive_dispatch {
            return;
        }
        if let Err(e) = self.store.set_vehicle_status(vehicle_id, VehicleStatus::InUse).await {
            tracing::warn!(%vehicle_id, error = %e, "Failed to mark vehicle in use");
        }
    }

    /// Best-effort: return a vehicle to the pool after delivery.
    pub async fn release(&self, vehicle_id: &str) {
        if !self.exclusive_dispatch {
            return;
        }
        if let Err(e) = self.store.set_vehicle_status(vehicle_id, VehicleStatus::Available).await {
            tracing::warn!(%vehicle_id, error = %e, "Failed to release vehicle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn registry(exclusive: bool) -> (Arc<MemoryStore>, FleetRegistry) {
        let store = Arc::new(MemoryStore::new(100));
        (store.clone(), FleetRegistry::new(store, exclusive))
    }

    #[test]
    fn test_default_fleet() {
        let fleet = default_fleet();
        assert_eq!(fleet.len(), 5);
        assert!(fleet.iter().all(|v| v.status == VehicleStatus::Available));
        let capacities: Vec<u32> = fleet.iter().map(|v| v.capacity_kg).collect();
        assert_eq!(capacities, vec![15_000, 8_000, 15_000, 3_000, 15_000]);
    }

    #[test]
    fn test_generated_vehicle_id_shape() {
        let id = generated_vehicle_id();
        assert_eq!(id.len(), 10);
        assert!(id[4..].bytes().all(|b| b.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_pick_only_available() {
        let (store, fleet) = registry(false);
        for id in ["TRK-001", "TRK-002", "TRK-003", "TRK-005"] {
            store.set_vehicle_status(id, VehicleStatus::Maintenance).await.unwrap();
        }
        for _ in 0..20 {
            assert_eq!(fleet.pick_available().await.unwrap().id, "TRK-004");
        }
    }

    #[tokio::test]
    async fn test_no_vehicle_available() {
        let (store, fleet) = registry(false);
        for v in default_fleet() {
            store.set_vehicle_status(&v.id, VehicleStatus::InUse).await.unwrap();
        }
        assert!(matches!(
            fleet.pick_available().await,
            Err(ServiceError::NoVehicleAvailable)
        ));
    }

    #[tokio::test]
    async fn test_register_defaults_and_duplicates() {
        let (_, fleet) = registry(false);
        let created = fleet
            .register(VehicleCreate {
                vehicle_number: "GJ-06-KL-1111".into(),
                driver_name: "Kiran Shah".into(),
                vehicle_type: "Pickup".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(created.id.starts_with("TRK-"));
        assert_eq!(created.capacity_kg, DEFAULT_CAPACITY_KG);
        assert_eq!(created.status, VehicleStatus::Available);

        let dup = fleet
            .register(VehicleCreate {
                id: Some("TRK-001".into()),
                vehicle_number: "XX-00-YY-0000".into(),
                driver_name: "Someone".into(),
                vehicle_type: "Van".into(),
                ..Default::default()
            })
            .await;
        match dup {
            Err(ServiceError::App(e)) => assert_eq!(e.code, ErrorCode::VehicleAlreadyExists),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let (_, fleet) = registry(false);
        let err = fleet.register(VehicleCreate::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::App(ref e) if e.code == ErrorCode::ValidationFailed));
    }

    #[tokio::test]
    async fn test_exclusive_dispatch_marks_and_releases() {
        let (store, fleet) = registry(true);
        fleet.mark_dispatched("TRK-002").await;
        let busy = store.list_vehicles(Some(VehicleStatus::InUse)).await.unwrap();
        assert_eq!(busy.len(), 1);
        fleet.release("TRK-002").await;
        assert!(store.list_vehicles(Some(VehicleStatus::InUse)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shared_dispatch_leaves_status_alone() {
        let (store, fleet) = registry(false);
        fleet.mark_dispatched("TRK-002").await;
        assert!(store.list_vehicles(Some(VehicleStatus::InUse)).await.unwrap().is_empty());
    }
}
