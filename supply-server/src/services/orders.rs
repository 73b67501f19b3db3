//! Order queries and lifecycle updates

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{DataSource, Order, OrderDetail, OrderQuery, OrderUpdate};

use crate::db::{Store, StoreError, demo};
use crate::error::ServiceResult;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};

fn order_not_found(key: &str) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {key} not found"))
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        user_key: &str,
        query: &OrderQuery,
    ) -> ServiceResult<(Vec<Order>, DataSource)> {
        match self.store.list_orders(user_key, query).await {
            Ok(orders) => Ok((orders, self.store.source())),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Order listing failed, serving demo orders");
                Ok((demo::orders(user_key, query), DataSource::Demo))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, user_key: &str, key: &str) -> ServiceResult<(OrderDetail, DataSource)> {
        let (found, source) = match self.store.find_order(user_key, key).await {
            Ok(found) => (found, self.store.source()),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, %key, "Order lookup failed, checking demo orders");
                (demo::order_detail(user_key, key), DataSource::Demo)
            }
            Err(e) => return Err(e.into()),
        };
        found
            .map(|detail| (detail, source))
            .ok_or_else(|| order_not_found(key).into())
    }

    /// Status changes must follow the order lifecycle; re-asserting the
    /// current status is a no-op for that field.
    pub async fn update(&self, user_key: &str, key: &str, update: OrderUpdate) -> ServiceResult<Order> {
        if update.is_empty() {
            return Err(AppError::new(ErrorCode::NothingToUpdate).into());
        }
        validate_optional_text(&update.shipping_address, "shippingAddress", MAX_ADDRESS_LEN)?;
        validate_optional_text(&update.delivery_type, "deliveryType", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&update.assigned_vehicle_id, "assignedVehicleId", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&update.vehicle_number, "vehicleNumber", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&update.driver_name, "driverName", MAX_NAME_LEN)?;
        validate_optional_text(&update.notes, "notes", MAX_NOTE_LEN)?;

        if let Some(next) = update.status {
            let current = self
                .store
                .find_order(user_key, key)
                .await?
                .ok_or_else(|| order_not_found(key))?
                .order
                .status;
            if current != next && !current.can_transition_to(next) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidOrderTransition,
                    format!("Cannot move order from {current} to {next}"),
                )
                .with_detail("from", current.as_str())
                .with_detail("to", next.as_str())
                .into());
            }
        }

        let updated = self
            .store
            .update_order(user_key, key, &update)
            .await?
            .ok_or_else(|| order_not_found(key))?;
        tracing::info!(order_number = %updated.order_number, status = %updated.status, "Order updated");
        Ok(updated)
    }

    /// The order's shipment is removed with it
    pub async fn delete(&self, user_key: &str, key: &str) -> ServiceResult<Order> {
        let removed = self
            .store
            .delete_order(user_key, key)
            .await?
            .ok_or_else(|| order_not_found(key))?;
        tracing::info!(order_number = %removed.order_number, "Order deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DEFAULT_USER_KEY;
    use crate::db::MemoryStore;
    use crate::db::testing::FaultyStore;
    use shared::models::OrderStatus;

    fn service() -> OrderService {
        OrderService::new(Arc::new(MemoryStore::new(100)))
    }

    fn code(err: crate::error::ServiceError) -> ErrorCode {
        AppError::from(err).code
    }

    #[tokio::test]
    async fn test_get_by_number_and_missing() {
        let svc = service();
        let (detail, source) = svc.get(DEFAULT_USER_KEY, "ORD-DEMO01").await.unwrap();
        assert_eq!(detail.order.status, OrderStatus::Shipped);
        assert!(detail.shipment.is_some());
        assert_eq!(source, DataSource::Demo);
        assert_eq!(code(svc.get(DEFAULT_USER_KEY, "ORD-ZZZZZZ").await.unwrap_err()), ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn test_update_enforces_lifecycle() {
        let svc = service();
        let ok = svc
            .update(
                DEFAULT_USER_KEY,
                "ORD-DEMO01",
                OrderUpdate {
                    status: Some(OrderStatus::Delivered),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(ok.status, OrderStatus::Delivered);

        let err = svc
            .update(
                DEFAULT_USER_KEY,
                "ORD-DEMO02",
                OrderUpdate {
                    status: Some(OrderStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::InvalidOrderTransition);
    }

    #[tokio::test]
    async fn test_empty_update_rejected() {
        let err = service()
            .update(DEFAULT_USER_KEY, "ORD-DEMO01", OrderUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::NothingToUpdate);
    }

    #[tokio::test]
    async fn test_field_update_and_delete() {
        let svc = service();
        let updated = svc
            .update(
                DEFAULT_USER_KEY,
                "ORD-DEMO01",
                OrderUpdate {
                    notes: Some("Dock 4".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Dock 4"));

        svc.delete(DEFAULT_USER_KEY, "ORD-DEMO01").await.unwrap();
        let err = svc.delete(DEFAULT_USER_KEY, "ORD-DEMO01").await.unwrap_err();
        assert_eq!(code(err), ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn test_reads_fall_back_to_demo_and_are_stable() {
        let svc = OrderService::new(Arc::new(FaultyStore::unavailable()));
        let (first, source) = svc.list("a@x", &OrderQuery::default()).await.unwrap();
        let (second, _) = svc.list("a@x", &OrderQuery::default()).await.unwrap();
        assert_eq!(source, DataSource::Demo);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let err = svc.delete("a@x", "ORD-DEMO01").await.unwrap_err();
        assert_eq!(code(err), ErrorCode::StoreUnavailable);
    }
}
