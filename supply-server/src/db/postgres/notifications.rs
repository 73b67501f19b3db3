use chrono::{DateTime, Utc};
use shared::models::{MarkRead, Notification, NotificationCreate, NotificationType};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(super) struct NotificationRow {
    pub id: Uuid,
    pub user_key: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub order_id: Option<Uuid>,
    pub order_number: Option<String>,
    pub tracking_number: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            user_key: row.user_key,
            kind: NotificationType::from_db(&row.kind),
            title: row.title,
            message: row.message,
            order_id: row.order_id,
            order_number: row.order_number,
            tracking_number: row.tracking_number,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn insert(
    pool: &PgPool,
    user_key: &str,
    notification: &NotificationCreate,
) -> Result<NotificationRow, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO notifications
            (id, user_key, kind, title, message, order_id, order_number, tracking_number)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_key)
    .bind(notification.kind.as_str())
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.order_id)
    .bind(&notification.order_number)
    .bind(&notification.tracking_number)
    .fetch_one(pool)
    .await
}

pub(super) async fn list(
    pool: &PgPool,
    user_key: &str,
    unread_only: bool,
    limit: usize,
) -> Result<Vec<NotificationRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM notifications
         WHERE user_key = $1 AND (NOT $2 OR read = FALSE)
         ORDER BY created_at DESC
         LIMIT $3",
    )
    .bind(user_key)
    .bind(unread_only)
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await
}

pub(super) async fn mark_read(
    pool: &PgPool,
    user_key: &str,
    target: &MarkRead,
) -> Result<u64, sqlx::Error> {
    let result = match target {
        MarkRead::All => {
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_key = $1 AND read = FALSE")
                .bind(user_key)
                .execute(pool)
                .await?
        }
        MarkRead::Ids(ids) => {
            sqlx::query(
                "UPDATE notifications SET read = TRUE
                 WHERE user_key = $1 AND read = FALSE AND id = ANY($2)",
            )
            .bind(user_key)
            .bind(ids.as_slice())
            .execute(pool)
            .await?
        }
    };
    Ok(result.rows_affected())
}

pub(super) async fn delete(pool: &PgPool, user_key: &str, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE user_key = $1 AND id = $2")
        .bind(user_key)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
