//! Route coordinate synthesis
//!
//! Produces a visual polyline between two points: a straight interpolation
//! with a sine bulge on latitude so the line reads as a road on the map.
//! It carries no distance or travel-time meaning.

use std::f64::consts::PI;

use shared::models::{LatLng, Location, RouteInfo, RouteSelection};

/// Latitude bulge at the midpoint, in degrees
const BULGE_DEGREES: f64 = 0.3;

pub const DEFAULT_DISTANCE: &str = "150 km";
pub const DEFAULT_TIME: &str = "3h";
pub const DEFAULT_SAVINGS: &str = "12%";
pub const DEFAULT_FUEL_COST: f64 = 2500.0;
/// Used when a caller's route selection omits distance
pub const SELECTION_DISTANCE: &str = "24.5 km";
/// Used when a caller's route selection omits savings
pub const SELECTION_SAVINGS: &str = "15%";
/// ETA shown when the route carries no travel time
pub const FALLBACK_ETA: &str = "4-6 hours";

/// `steps + 1` points from `origin` to `destination`. `steps == 0` yields the origin only.
pub fn synthesize_route(origin: LatLng, destination: LatLng, steps: u32) -> Vec<LatLng> {
    if steps == 0 {
        return vec![origin];
    }
    (0..=steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            LatLng {
                lat: origin.lat + (destination.lat - origin.lat) * t + (t * PI).sin() * BULGE_DEGREES,
                lng: origin.lng + (destination.lng - origin.lng) * t,
            }
        })
        .collect()
}

/// Merge a caller's route selection with defaults. Coordinates are
/// synthesized only when the selection carries none.
///
/// Without a selection the standard route metadata applies. A partial
/// selection keeps its own gaps: no time means the ETA falls back to
/// [`FALLBACK_ETA`].
pub fn resolve_route(
    selection: Option<&RouteSelection>,
    origin: &Location,
    destination: &Location,
    steps: u32,
) -> RouteInfo {
    let defaulted = selection.is_none();
    let selection = selection.cloned().unwrap_or_default();
    let coordinates = match selection.coordinates {
        Some(coords) if !coords.is_empty() => coords,
        _ => synthesize_route(origin.point(), destination.point(), steps),
    };
    let from = selection.from.unwrap_or_else(|| origin.name.clone());
    let to = selection.to.unwrap_or_else(|| destination.name.clone());
    if defaulted {
        return RouteInfo {
            from,
            to,
            distance: DEFAULT_DISTANCE.into(),
            time: DEFAULT_TIME.into(),
            savings: DEFAULT_SAVINGS.into(),
            fuel_cost: Some(DEFAULT_FUEL_COST),
            coordinates,
        };
    }
    RouteInfo {
        from,
        to,
        distance: selection.distance.unwrap_or_else(|| SELECTION_DISTANCE.into()),
        time: selection.time.unwrap_or_default(),
        savings: selection.savings.unwrap_or_else(|| SELECTION_SAVINGS.into()),
        fuel_cost: selection.fuel_cost,
        coordinates,
    }
}

/// Shipment ETA for a resolved route
pub fn eta_for(route: &RouteInfo) -> String {
    if route.time.trim().is_empty() {
        FALLBACK_ETA.to_string()
    } else {
        route.time.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUMBAI: LatLng = LatLng::new(19.0760, 72.8777);
    const PUNE: LatLng = LatLng::new(18.5204, 73.8567);

    #[test]
    fn test_point_count_and_endpoints() {
        let coords = synthesize_route(MUMBAI, PUNE, 20);
        assert_eq!(coords.len(), 21);
        // sin(0) and sin(pi) contribute (almost) nothing at the endpoints
        assert!((coords[0].lat - MUMBAI.lat).abs() < 1e-9);
        assert!((coords[20].lat - PUNE.lat).abs() < 1e-9);
        assert!((coords[20].lng - PUNE.lng).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_bulge() {
        let coords = synthesize_route(MUMBAI, PUNE, 20);
        let straight = (MUMBAI.lat + PUNE.lat) / 2.0;
        assert!((coords[10].lat - (straight + BULGE_DEGREES)).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            synthesize_route(MUMBAI, PUNE, 20),
            synthesize_route(MUMBAI, PUNE, 20)
        );
    }

    #[test]
    fn test_zero_steps() {
        assert_eq!(synthesize_route(MUMBAI, PUNE, 0), vec![MUMBAI]);
    }

    #[test]
    fn test_resolve_route_defaults() {
        let origin = Location::new("Mumbai Warehouse", MUMBAI.lat, MUMBAI.lng);
        let destination = Location::new("Pune Distribution", PUNE.lat, PUNE.lng);
        let route = resolve_route(None, &origin, &destination, 20);
        assert_eq!(route.from, "Mumbai Warehouse");
        assert_eq!(route.distance, "150 km");
        assert_eq!(route.time, "3h");
        assert_eq!(route.fuel_cost, Some(2500.0));
        assert_eq!(route.coordinates.len(), 21);
        assert_eq!(eta_for(&route), "3h");
    }

    #[test]
    fn test_resolve_route_keeps_caller_coordinates() {
        let origin = Location::new("A", 10.0, 10.0);
        let destination = Location::new("B", 11.0, 11.0);
        let selection = RouteSelection {
            time: Some("5h".into()),
            coordinates: Some(vec![LatLng::new(10.0, 10.0), LatLng::new(11.0, 11.0)]),
            ..Default::default()
        };
        let route = resolve_route(Some(&selection), &origin, &destination, 20);
        assert_eq!(route.coordinates.len(), 2);
        assert_eq!(route.fuel_cost, None);
        assert_eq!(eta_for(&route), "5h");
    }

    #[test]
    fn test_partial_selection_fills_gaps() {
        let origin = Location::new("A", 10.0, 10.0);
        let selection = RouteSelection {
            from: Some("Dock 4".into()),
            ..Default::default()
        };
        let route = resolve_route(Some(&selection), &origin, &origin, 4);
        assert_eq!(route.from, "Dock 4");
        assert_eq!(route.distance, SELECTION_DISTANCE);
        assert_eq!(route.savings, SELECTION_SAVINGS);
        assert_eq!(route.coordinates.len(), 5);
        assert_eq!(eta_for(&route), FALLBACK_ETA);
    }
}
