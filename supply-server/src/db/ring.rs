//! Bounded newest-first buffers
//!
//! Process-lifetime only. They back the memory adapter and stand in for the
//! notifications and pending-order tables while the database is unreachable.

use std::collections::VecDeque;

use parking_lot::Mutex;
use shared::models::{MarkRead, Notification, PendingOrder, PendingOrderQuery, PendingOrderStatus};
use uuid::Uuid;

/// Pending-order entries kept while the database is unreachable
pub const PENDING_ORDER_CAPACITY: usize = 50;

pub type NotificationRing = Ring<Notification>;
pub type PendingOrderRing = Ring<PendingOrder>;

pub struct Ring<T> {
    capacity: usize,
    entries: Mutex<VecDeque<T>>,
}

impl<T: Clone> Ring<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Insert at the front; the oldest entry is evicted once full.
    pub fn push(&self, entry: T) {
        let mut entries = self.entries.lock();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    fn select(&self, keep: impl Fn(&T) -> bool, limit: usize) -> Vec<T> {
        self.entries
            .lock()
            .iter()
            .filter(|e| keep(*e))
            .take(limit)
            .cloned()
            .collect()
    }

    fn remove_where(&self, hit: impl Fn(&T) -> bool) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| !hit(e));
        entries.len() != before
    }
}

impl Ring<Notification> {
    pub fn list(&self, user_key: &str, unread_only: bool, limit: usize) -> Vec<Notification> {
        self.select(|n| n.user_key == user_key && (!unread_only || !n.read), limit)
    }

    pub fn mark_read(&self, user_key: &str, target: &MarkRead) -> u64 {
        let mut count = 0;
        for n in self.entries.lock().iter_mut() {
            if n.user_key != user_key || n.read {
                continue;
            }
            let hit = match target {
                MarkRead::All => true,
                MarkRead::Ids(ids) => ids.contains(&n.id),
            };
            if hit {
                n.read = true;
                count += 1;
            }
        }
        count
    }

    pub fn remove(&self, user_key: &str, id: Uuid) -> bool {
        self.remove_where(|n| n.id == id && n.user_key == user_key)
    }
}

impl Ring<PendingOrder> {
    pub fn list(&self, user_key: &str, query: &PendingOrderQuery) -> Vec<PendingOrder> {
        self.select(|o| o.user_key == user_key && query.matches(o), self.capacity)
    }

    pub fn set_status(
        &self,
        user_key: &str,
        id: Uuid,
        status: PendingOrderStatus,
    ) -> Option<PendingOrder> {
        let mut entries = self.entries.lock();
        let order = entries
            .iter_mut()
            .find(|o| o.id == id && o.user_key == user_key)?;
        order.status = status;
        Some(order.clone())
    }

    pub fn remove(&self, user_key: &str, id: Uuid) -> bool {
        self.remove_where(|o| o.id == id && o.user_key == user_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::models::NotificationType;

    fn note(user: &str, title: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_key: user.into(),
            kind: NotificationType::System,
            title: title.into(),
            message: String::new(),
            order_id: None,
            order_number: None,
            tracking_number: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let ring = NotificationRing::new(100);
        for i in 0..101 {
            ring.push(note("a@x", &format!("n{i}")));
        }
        assert_eq!(ring.len(), 100);
        let all = ring.list("a@x", false, 200);
        assert_eq!(all.first().unwrap().title, "n100");
        assert_eq!(all.last().unwrap().title, "n1");
        assert!(all.iter().all(|n| n.title != "n0"));
    }

    #[test]
    fn test_list_scopes_by_user_and_unread() {
        let ring = NotificationRing::new(10);
        ring.push(note("a@x", "first"));
        ring.push(note("b@x", "other"));
        ring.push(note("a@x", "second"));

        let listed = ring.list("a@x", false, 10);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "second");

        let read_id = listed[0].id;
        assert_eq!(ring.mark_read("a@x", &MarkRead::Ids(vec![read_id])), 1);
        let unread = ring.list("a@x", true, 10);
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "first");
    }

    #[test]
    fn test_mark_all_and_remove() {
        let ring = NotificationRing::new(10);
        ring.push(note("a@x", "one"));
        ring.push(note("a@x", "two"));
        ring.push(note("b@x", "three"));
        assert_eq!(ring.mark_read("a@x", &MarkRead::All), 2);
        assert_eq!(ring.mark_read("a@x", &MarkRead::All), 0);

        let id = ring.list("b@x", false, 10)[0].id;
        assert!(!ring.remove("a@x", id));
        assert!(ring.remove("b@x", id));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_limit() {
        let ring = NotificationRing::new(10);
        for i in 0..5 {
            ring.push(note("a@x", &i.to_string()));
        }
        assert_eq!(ring.list("a@x", false, 3).len(), 3);
    }

    fn pending(user: &str, product: &str) -> PendingOrder {
        PendingOrder {
            id: Uuid::new_v4(),
            user_key: user.into(),
            product_id: format!("P-{product}"),
            product_name: product.into(),
            quantity: 1,
            unit_price: Decimal::ONE,
            total: Decimal::ONE,
            recommendation: None,
            source: "demand_forecasting".into(),
            status: PendingOrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_orders_capped_at_fifty() {
        let ring = PendingOrderRing::new(PENDING_ORDER_CAPACITY);
        for i in 0..60 {
            ring.push(pending("a@x", &format!("p{i}")));
        }
        let all = ring.list("a@x", &PendingOrderQuery::default());
        assert_eq!(all.len(), 50);
        assert_eq!(all[0].product_name, "p59");
        assert_eq!(all[49].product_name, "p10");
    }

    #[test]
    fn test_pending_status_filter_and_owner_scope() {
        let ring = PendingOrderRing::new(10);
        let mine = pending("a@x", "Monitors");
        ring.push(mine.clone());
        ring.push(pending("a@x", "Keyboards"));
        ring.push(pending("b@x", "Cables"));

        assert!(ring.set_status("b@x", mine.id, PendingOrderStatus::Completed).is_none());
        let updated = ring.set_status("a@x", mine.id, PendingOrderStatus::Completed).unwrap();
        assert_eq!(updated.status, PendingOrderStatus::Completed);

        let done = PendingOrderQuery {
            status: Some(PendingOrderStatus::Completed),
        };
        let listed = ring.list("a@x", &done);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);

        assert!(!ring.remove("b@x", mine.id));
        assert!(ring.remove("a@x", mine.id));
        assert_eq!(ring.list("a@x", &PendingOrderQuery::default()).len(), 1);
    }
}
