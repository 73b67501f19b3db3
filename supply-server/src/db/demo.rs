//! Fixed demo records
//!
//! Served when the store is unreachable and used to seed the memory
//! adapter. Ids and timestamps are constants so repeated reads return
//! identical payloads.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use shared::models::{
    Location, Notification, NotificationType, Order, OrderDetail, OrderItem, OrderQuery,
    OrderStatus, RouteInfo, Shipment, ShipmentQuery, ShipmentStatus,
};
use uuid::Uuid;

use crate::dispatch::route::synthesize_route;

/// 2025-01-15T09:00:00Z
const BASE_TIMESTAMP: i64 = 1_736_931_600;

const ORDER_IDS: [u128; 2] = [
    0x0000_0000_0000_4000_8000_0000_0000_0001,
    0x0000_0000_0000_4000_8000_0000_0000_0002,
];
const SHIPMENT_IDS: [u128; 2] = [
    0x0000_0000_0000_4000_8000_0000_0000_0101,
    0x0000_0000_0000_4000_8000_0000_0000_0102,
];
const NOTIFICATION_IDS: [u128; 2] = [
    0x0000_0000_0000_4000_8000_0000_0000_0201,
    0x0000_0000_0000_4000_8000_0000_0000_0202,
];

fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(BASE_TIMESTAMP, 0).unwrap_or_default()
}

fn at(hours: i64) -> DateTime<Utc> {
    base_time() + Duration::hours(hours)
}

fn item(id: &str, name: &str, quantity: u32, unit_price: i64) -> OrderItem {
    let unit_price = Decimal::from(unit_price);
    OrderItem {
        product_id: id.into(),
        product_name: name.into(),
        quantity,
        unit_price,
        total: unit_price * Decimal::from(quantity),
    }
}

struct Fixture {
    order_number: &'static str,
    tracking_number: &'static str,
    customer: &'static str,
    items: Vec<OrderItem>,
    order_status: OrderStatus,
    shipment_status: ShipmentStatus,
    progress: u8,
    vehicle: (&'static str, &'static str, &'static str, &'static str),
    origin: Location,
    destination: Location,
    created_hour: i64,
}

fn fixtures() -> [Fixture; 2] {
    [
        Fixture {
            order_number: "ORD-DEMO01",
            tracking_number: "TRK-DEMO0001",
            customer: "Acme Retail",
            items: vec![item("P-100", "Monitors", 4, 180), item("P-200", "Keyboards", 10, 25)],
            order_status: OrderStatus::Shipped,
            shipment_status: ShipmentStatus::InTransit,
            progress: 60,
            vehicle: ("TRK-001", "MH-01-AB-1234", "Rajesh Kumar", "Heavy Truck"),
            origin: Location::new("Mumbai Warehouse", 19.0760, 72.8777),
            destination: Location::new("Pune Distribution", 18.5204, 73.8567),
            created_hour: 2,
        },
        Fixture {
            order_number: "ORD-DEMO02",
            tracking_number: "TRK-DEMO0002",
            customer: "Self",
            items: vec![item("P-300", "Laptops", 2, 650)],
            order_status: OrderStatus::Delivered,
            shipment_status: ShipmentStatus::Delivered,
            progress: 100,
            vehicle: ("TRK-004", "TN-04-GH-3456", "Vikram Rao", "Delivery Van"),
            origin: Location::new("Chennai Hub", 13.0827, 80.2707),
            destination: Location::new("Bengaluru Store", 12.9716, 77.5946),
            created_hour: 0,
        },
    ]
}

/// Orders with their shipments, newest first
pub fn records(user_key: &str) -> Vec<(Order, Shipment)> {
    fixtures()
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            let created = at(f.created_hour);
            let updated = created + Duration::minutes(45);
            let order_id = Uuid::from_u128(ORDER_IDS[i]);
            let total_amount: Decimal = f.items.iter().map(|line| line.total).sum();
            let coordinates = synthesize_route(f.origin.point(), f.destination.point(), 20);
            let current_location = if f.shipment_status == ShipmentStatus::Delivered {
                f.destination.point()
            } else {
                let idx = (coordinates.len() - 1) * usize::from(f.progress) / 100;
                coordinates.get(idx).copied().unwrap_or(f.destination.point())
            };
            let order = Order {
                id: order_id,
                order_number: f.order_number.into(),
                tracking_number: f.tracking_number.into(),
                user_key: user_key.into(),
                customer_id: format!("CUST-DEMO{:02}", i + 1),
                customer_name: f.customer.into(),
                items: f.items,
                total_amount,
                status: f.order_status,
                shipping_address: f.destination.name.clone(),
                delivery_type: f.vehicle.3.into(),
                assigned_vehicle_id: Some(f.vehicle.0.into()),
                vehicle_number: Some(f.vehicle.1.into()),
                driver_name: Some(f.vehicle.2.into()),
                notes: None,
                created_at: created,
                updated_at: updated,
            };
            let shipment = Shipment {
                id: Uuid::from_u128(SHIPMENT_IDS[i]),
                order_id,
                order_number: f.order_number.into(),
                user_key: user_key.into(),
                vehicle_id: f.vehicle.0.into(),
                vehicle_number: f.vehicle.1.into(),
                driver_name: f.vehicle.2.into(),
                vehicle_type: f.vehicle.3.into(),
                status: f.shipment_status,
                current_location,
                route: RouteInfo {
                    from: f.origin.name.clone(),
                    to: f.destination.name.clone(),
                    distance: "150 km".into(),
                    time: "3h".into(),
                    savings: "12%".into(),
                    fuel_cost: Some(2500.0),
                    coordinates,
                },
                origin: f.origin,
                destination: f.destination,
                eta: "3h".into(),
                progress: f.progress,
                created_at: created,
                updated_at: updated,
            };
            (order, shipment)
        })
        .collect()
}

pub fn orders(user_key: &str, query: &OrderQuery) -> Vec<Order> {
    records(user_key)
        .into_iter()
        .map(|(order, _)| order)
        .filter(|o| query.status.is_none_or(|s| o.status == s))
        .collect()
}

pub fn order_detail(user_key: &str, key: &str) -> Option<OrderDetail> {
    records(user_key)
        .into_iter()
        .find(|(o, _)| o.order_number == key || o.id.to_string() == key)
        .map(|(order, shipment)| OrderDetail {
            order,
            shipment: Some(shipment.summary()),
        })
}

pub fn shipments(user_key: &str, query: &ShipmentQuery) -> Vec<Shipment> {
    records(user_key)
        .into_iter()
        .map(|(_, shipment)| shipment)
        .filter(|s| query.matches(s))
        .collect()
}

pub fn shipment(user_key: &str, key: &str) -> Option<Shipment> {
    records(user_key)
        .into_iter()
        .map(|(_, s)| s)
        .find(|s| s.order_number == key || s.id.to_string() == key)
}

/// Newest first
pub fn notifications(user_key: &str) -> Vec<Notification> {
    records(user_key)
        .into_iter()
        .enumerate()
        .map(|(i, (order, _))| {
            let (kind, title, message) = match order.status {
                OrderStatus::Delivered => (
                    NotificationType::Delivery,
                    "Order Delivered",
                    format!("Your order {} has been delivered", order.order_number),
                ),
                _ => (
                    NotificationType::Order,
                    "Order Shipped",
                    format!(
                        "Your order {} is on the way. Track it with {}",
                        order.order_number, order.tracking_number
                    ),
                ),
            };
            Notification {
                id: Uuid::from_u128(NOTIFICATION_IDS[i]),
                user_key: user_key.into(),
                kind,
                title: title.into(),
                message,
                order_id: Some(order.id),
                order_number: Some(order.order_number),
                tracking_number: Some(order.tracking_number),
                read: order.status == OrderStatus::Delivered,
                created_at: order.updated_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_stable() {
        let a = serde_json::to_string(&records("demo@example.com")).unwrap();
        let b = serde_json::to_string(&records("demo@example.com")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixture_totals_match_items() {
        for (order, shipment) in records("u@x") {
            let sum: Decimal = order.items.iter().map(|i| i.total).sum();
            assert_eq!(order.total_amount, sum);
            assert_eq!(shipment.order_id, order.id);
            assert_eq!(shipment.route.coordinates.len(), 21);
        }
    }

    #[test]
    fn test_newest_first() {
        let orders = orders("u@x", &OrderQuery::default());
        assert!(orders[0].created_at > orders[1].created_at);
    }

    #[test]
    fn test_lookup_and_filters() {
        assert!(order_detail("u@x", "ORD-DEMO02").is_some());
        assert!(order_detail("u@x", "ORD-NOPE00").is_none());
        let active = shipments(
            "u@x",
            &ShipmentQuery {
                active: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status, ShipmentStatus::InTransit);
    }
}
