//! Notification log
//!
//! Reads and writes go to the store. While the store is unreachable the
//! process-local ring takes over and responses are marked as demo data.

use std::sync::Arc;

use chrono::Utc;
use shared::error::{AppError, ErrorCode};
use shared::models::{DataSource, MarkReadRequest, Notification, NotificationCreate};
use uuid::Uuid;

use crate::db::ring::NotificationRing;
use crate::db::{Store, StoreError};
use crate::error::ServiceResult;
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text};

#[derive(Clone)]
pub struct NotificationLog {
    store: Arc<dyn Store>,
    ring: Arc<NotificationRing>,
    list_limit: usize,
}

impl NotificationLog {
    pub fn new(store: Arc<dyn Store>, ring_capacity: usize, list_limit: usize) -> Self {
        Self {
            store,
            ring: Arc::new(NotificationRing::new(ring_capacity)),
            list_limit: list_limit.max(1),
        }
    }

    pub async fn list(
        &self,
        user_key: &str,
        unread_only: bool,
    ) -> ServiceResult<(Vec<Notification>, DataSource)> {
        match self
            .store
            .list_notifications(user_key, unread_only, self.list_limit)
            .await
        {
            Ok(rows) => Ok((rows, self.store.source())),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Notification read failed, serving cached entries");
                Ok((
                    self.ring.list(user_key, unread_only, self.list_limit),
                    DataSource::Demo,
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn create(
        &self,
        user_key: &str,
        payload: NotificationCreate,
    ) -> ServiceResult<(Notification, DataSource)> {
        validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&payload.message, "message", MAX_NOTE_LEN)?;

        match self.store.insert_notification(user_key, &payload).await {
            Ok(saved) => Ok((saved, self.store.source())),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Notification write failed, keeping it in memory");
                let cached = Notification {
                    id: Uuid::new_v4(),
                    user_key: user_key.to_string(),
                    kind: payload.kind,
                    title: payload.title,
                    message: payload.message,
                    order_id: payload.order_id,
                    order_number: payload.order_number,
                    tracking_number: payload.tracking_number,
                    read: false,
                    created_at: Utc::now(),
                };
                self.ring.push(cached.clone());
                Ok((cached, DataSource::Demo))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns how many notifications flipped to read
    pub async fn mark_read(
        &self,
        user_key: &str,
        request: MarkReadRequest,
    ) -> ServiceResult<(u64, DataSource)> {
        let target = request.target().ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RequiredField,
                "notificationIds or markAllRead is required",
            )
        })?;
        match self.store.mark_notifications_read(user_key, &target).await {
            Ok(count) => Ok((count, self.store.source())),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Notification update failed, updating cached entries");
                Ok((self.ring.mark_read(user_key, &target), DataSource::Demo))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, user_key: &str, id: Uuid) -> ServiceResult<DataSource> {
        let (removed, source) = match self.store.delete_notification(user_key, id).await {
            Ok(removed) => (removed, self.store.source()),
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Notification delete failed, deleting cached entry");
                (self.ring.remove(user_key, id), DataSource::Demo)
            }
            Err(e) => return Err(e.into()),
        };
        if !removed {
            return Err(AppError::new(ErrorCode::NotificationNotFound).into());
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::db::testing::FaultyStore;
    use shared::models::NotificationType;

    fn create(title: &str) -> NotificationCreate {
        NotificationCreate {
            kind: NotificationType::Alert,
            title: title.into(),
            message: "Truck delayed at toll".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_list_mark_delete() {
        let log = NotificationLog::new(Arc::new(MemoryStore::empty(100)), 100, 50);
        let (first, source) = log.create("a@x", create("Delay")).await.unwrap();
        assert_eq!(source, DataSource::Demo);
        log.create("a@x", create("Second")).await.unwrap();

        let (listed, _) = log.list("a@x", false).await.unwrap();
        assert_eq!(listed[0].title, "Second");

        let (count, _) = log
            .mark_read(
                "a@x",
                MarkReadRequest {
                    notification_ids: Some(vec![first.id]),
                    mark_all_read: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(log.list("a@x", true).await.unwrap().0.len(), 1);

        log.delete("a@x", first.id).await.unwrap();
        let err = log.delete("a@x", first.id).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::NotificationNotFound);
    }

    #[tokio::test]
    async fn test_create_requires_title_and_message() {
        let log = NotificationLog::new(Arc::new(MemoryStore::empty(10)), 10, 50);
        assert!(log.create("a@x", NotificationCreate::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_mark_read_requires_target() {
        let log = NotificationLog::new(Arc::new(MemoryStore::empty(10)), 10, 50);
        let err: AppError = log
            .mark_read("a@x", MarkReadRequest::default())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[tokio::test]
    async fn test_list_limit() {
        let log = NotificationLog::new(Arc::new(MemoryStore::empty(100)), 100, 3);
        for i in 0..5 {
            log.create("a@x", create(&format!("n{i}"))).await.unwrap();
        }
        assert_eq!(log.list("a@x", false).await.unwrap().0.len(), 3);
    }

    #[tokio::test]
    async fn test_falls_back_to_ring_when_store_down() {
        let store = Arc::new(FaultyStore::unavailable());
        let log = NotificationLog::new(store, 100, 50);
        let (saved, source) = log.create("a@x", create("Offline")).await.unwrap();
        assert_eq!(source, DataSource::Demo);

        let (listed, source) = log.list("a@x", false).await.unwrap();
        assert_eq!(source, DataSource::Demo);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);
    }
}
