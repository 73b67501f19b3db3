//! Pending-order queue
//!
//! Forecast recommendations land here before anyone places them. While the
//! store is unreachable a process-local cache of the newest entries takes
//! over and responses are marked as demo data.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    DataSource, PendingOrder, PendingOrderInput, PendingOrderQuery, PendingOrderUpdate,
};
use uuid::Uuid;

use crate::db::memory::build_pending_order;
use crate::db::ring::{PENDING_ORDER_CAPACITY, PendingOrderRing};
use crate::db::{Store, StoreError};
use crate::error::ServiceResult;
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};

fn pending_not_found(id: Uuid) -> AppError {
    AppError::with_message(
        ErrorCode::PendingOrderNotFound,
        format!("Pending order {id} not found"),
    )
}

fn required(field: &str) -> AppError {
    AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
        .with_detail("field", field)
}

#[derive(Clone)]
pub struct PendingOrderQueue {
    store: Arc<dyn Store>,
    cache: Arc<PendingOrderRing>,
}

impl PendingOrderQueue {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            cache: Arc::new(PendingOrderRing::new(PENDING_ORDER_CAPACITY)),
        }
    }

    pub async fn list(
        &self,
        user_key: &str,
        query: &PendingOrderQuery,
    ) -> ServiceResult<(Vec<PendingOrder>, DataSource)> {
        match self.store.list_pending_orders(user_key, query).await {
            Ok(rows) => Ok((rows, self.store.source())),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Pending order read failed, serving cached entries");
                Ok((self.cache.list(user_key, query), DataSource::Demo))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Queue a line item; missing fields take forecast defaults.
    pub async fn create(
        &self,
        user_key: &str,
        input: PendingOrderInput,
    ) -> ServiceResult<(PendingOrder, DataSource)> {
        validate_optional_text(&input.product_id, "productId", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&input.product_name, "productName", MAX_NAME_LEN)?;
        validate_optional_text(&input.recommendation, "recommendation", MAX_NOTE_LEN)?;
        validate_optional_text(&input.source, "source", MAX_SHORT_TEXT_LEN)?;
        if input.unit_price.is_some_and(|p| p.is_sign_negative())
            || input.total.is_some_and(|t| t.is_sign_negative())
        {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "unitPrice and total must not be negative",
            )
            .into());
        }

        let create = input.into_create(shared::util::now_millis());
        match self.store.insert_pending_order(user_key, &create).await {
            Ok(saved) => {
                tracing::info!(pending_id = %saved.id, product = %saved.product_name, "Pending order queued");
                Ok((saved, self.store.source()))
            }
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Pending order write failed, keeping it in memory");
                let cached = build_pending_order(user_key, &create);
                self.cache.push(cached.clone());
                Ok((cached, DataSource::Demo))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn set_status(
        &self,
        user_key: &str,
        update: PendingOrderUpdate,
    ) -> ServiceResult<(PendingOrder, DataSource)> {
        let id = update.order_id.ok_or_else(|| required("orderId"))?;
        let status = update.status.ok_or_else(|| required("status"))?;

        let (updated, source) = match self
            .store
            .set_pending_order_status(user_key, id, status)
            .await
        {
            Ok(updated) => (updated, self.store.source()),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Pending order update failed, updating cached entry");
                (self.cache.set_status(user_key, id, status), DataSource::Demo)
            }
            Err(e) => return Err(e.into()),
        };
        let updated = updated.ok_or_else(|| pending_not_found(id))?;
        tracing::info!(pending_id = %id, status = %status, "Pending order status changed");
        Ok((updated, source))
    }

    pub async fn delete(&self, user_key: &str, id: Uuid) -> ServiceResult<DataSource> {
        let (removed, source) = match self.store.delete_pending_order(user_key, id).await {
            Ok(removed) => (removed, self.store.source()),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Pending order delete failed, deleting cached entry");
                (self.cache.remove(user_key, id), DataSource::Demo)
            }
            Err(e) => return Err(e.into()),
        };
        if !removed {
            return Err(pending_not_found(id).into());
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::db::testing::FaultyStore;
    use rust_decimal::Decimal;
    use shared::models::PendingOrderStatus;

    fn input(product: &str, quantity: u32, unit_price: i64) -> PendingOrderInput {
        PendingOrderInput {
            product_name: Some(product.into()),
            quantity: Some(quantity),
            unit_price: Some(Decimal::from(unit_price)),
            ..Default::default()
        }
    }

    fn to(id: Uuid, status: PendingOrderStatus) -> PendingOrderUpdate {
        PendingOrderUpdate {
            order_id: Some(id),
            status: Some(status),
        }
    }

    #[tokio::test]
    async fn test_queue_filter_update_delete() {
        let queue = PendingOrderQueue::new(Arc::new(MemoryStore::empty(10)));
        let (first, source) = queue.create("a@x", input("Monitors", 3, 120)).await.unwrap();
        assert_eq!(source, DataSource::Demo);
        assert_eq!(first.status, PendingOrderStatus::Pending);
        assert_eq!(first.total, Decimal::from(360));
        assert_eq!(first.source, "demand_forecasting");
        queue.create("a@x", input("Keyboards", 1, 40)).await.unwrap();

        let (all, _) = queue.list("a@x", &PendingOrderQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].product_name, "Keyboards");

        let (ready, _) = queue
            .set_status("a@x", to(first.id, PendingOrderStatus::ReadyForShipment))
            .await
            .unwrap();
        assert_eq!(ready.status, PendingOrderStatus::ReadyForShipment);
        let filter = PendingOrderQuery {
            status: Some(PendingOrderStatus::ReadyForShipment),
        };
        let (filtered, _) = queue.list("a@x", &filter).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, first.id);

        queue.delete("a@x", first.id).await.unwrap();
        let err: AppError = queue.delete("a@x", first.id).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PendingOrderNotFound);
    }

    #[tokio::test]
    async fn test_update_requires_id_and_status() {
        let queue = PendingOrderQueue::new(Arc::new(MemoryStore::empty(10)));
        let err: AppError = queue
            .set_status("a@x", PendingOrderUpdate::default())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err: AppError = queue
            .set_status(
                "a@x",
                PendingOrderUpdate {
                    order_id: Some(Uuid::new_v4()),
                    status: None,
                },
            )
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err: AppError = queue
            .set_status("a@x", to(Uuid::new_v4(), PendingOrderStatus::Completed))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::PendingOrderNotFound);
    }

    #[tokio::test]
    async fn test_other_users_entries_are_invisible() {
        let queue = PendingOrderQueue::new(Arc::new(MemoryStore::empty(10)));
        let (mine, _) = queue.create("a@x", input("Monitors", 1, 100)).await.unwrap();
        assert!(queue.list("b@x", &PendingOrderQuery::default()).await.unwrap().0.is_empty());
        let err: AppError = queue
            .set_status("b@x", to(mine.id, PendingOrderStatus::Completed))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::PendingOrderNotFound);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let queue = PendingOrderQueue::new(Arc::new(MemoryStore::empty(10)));
        let err: AppError = queue
            .create("a@x", input("Monitors", 1, -5))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[tokio::test]
    async fn test_falls_back_to_cache_when_store_down() {
        let queue = PendingOrderQueue::new(Arc::new(FaultyStore::unavailable()));
        let (saved, source) = queue.create("a@x", PendingOrderInput::default()).await.unwrap();
        assert_eq!(source, DataSource::Demo);
        assert_eq!(saved.product_name, "Product");
        assert!(saved.product_id.starts_with("PROD-"));

        let (listed, source) = queue.list("a@x", &PendingOrderQuery::default()).await.unwrap();
        assert_eq!(source, DataSource::Demo);
        assert_eq!(listed.len(), 1);

        let (done, _) = queue
            .set_status("a@x", to(saved.id, PendingOrderStatus::Completed))
            .await
            .unwrap();
        assert_eq!(done.status, PendingOrderStatus::Completed);
        assert_eq!(queue.delete("a@x", saved.id).await.unwrap(), DataSource::Demo);
    }
}
