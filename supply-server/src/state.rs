//! Application state shared by every handler

use std::sync::Arc;

use crate::BoxError;
use crate::analytics::{BaselineForecaster, ForecastService, Forecaster, RemoteForecaster};
use crate::auth::{AuthVerifier, HeaderVerifier, JwtVerifier};
use crate::config::{Config, Persistence};
use crate::db::{MemoryStore, PgStore, Store};
use crate::dispatch::{Dispatcher, FleetRegistry};
use crate::services::{NotificationLog, OrderService, PendingOrderQueue, ShipmentService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub fleet: FleetRegistry,
    pub dispatcher: Dispatcher,
    pub orders: OrderService,
    pub shipments: ShipmentService,
    pub notifications: NotificationLog,
    pub pending_orders: PendingOrderQueue,
    pub forecaster: ForecastService,
    pub verifier: Arc<dyn AuthVerifier>,
}

impl AppState {
    /// Pick the store adapter once and wire the services around it.
    ///
    /// A database that cannot be migrated at startup does not stop the
    /// process; reads fall back to demo data until it comes back.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn Store> = match config.persistence {
            Persistence::Relational => {
                let pg = PgStore::connect(config)?;
                if let Err(e) = pg.prepare().await {
                    tracing::warn!(error = %e, "Database not ready, continuing in degraded mode");
                }
                Arc::new(pg)
            }
            Persistence::Memory => {
                tracing::info!("No database configured, using in-memory store");
                Arc::new(MemoryStore::new(config.notification_cache_capacity))
            }
        };
        Self::with_store(config.clone(), store)
    }

    /// In-memory state with the seeded fleet and demo records
    pub fn in_memory(config: Config) -> Result<Self, BoxError> {
        let store = Arc::new(MemoryStore::new(config.notification_cache_capacity));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Result<Self, BoxError> {
        let fleet = FleetRegistry::new(store.clone(), config.fleet_exclusive_dispatch);
        let notifications = NotificationLog::new(
            store.clone(),
            config.notification_cache_capacity,
            config.notification_list_limit,
        );
        let dispatcher = Dispatcher::new(
            store.clone(),
            fleet.clone(),
            notifications.clone(),
            config.route_steps,
            config.order_number_max_attempts,
        );

        let remote: Option<Arc<dyn Forecaster>> = match &config.forecast_service_url {
            Some(url) => Some(Arc::new(RemoteForecaster::new(
                url.clone(),
                config.forecast_timeout,
            )?)),
            None => None,
        };
        let forecaster = ForecastService::new(remote, Arc::new(BaselineForecaster::new()));

        let verifier: Arc<dyn AuthVerifier> = match &config.auth_jwt_secret {
            Some(secret) => Arc::new(JwtVerifier::new(secret)),
            None => Arc::new(HeaderVerifier),
        };
        tracing::info!(verifier = verifier.name(), "Authentication configured");

        Ok(Self {
            orders: OrderService::new(store.clone()),
            shipments: ShipmentService::new(store.clone(), fleet.clone()),
            pending_orders: PendingOrderQueue::new(store.clone()),
            config: Arc::new(config),
            store,
            fleet,
            dispatcher,
            notifications,
            forecaster,
            verifier,
        })
    }
}
