//! Vehicle (truck) Model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geo::LatLng;
use super::UnknownStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
}

impl VehicleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "in_use" => Ok(Self::InUse),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(UnknownStatus {
                kind: "vehicle",
                value: other.to_string(),
            }),
        }
    }
}

/// Vehicle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub vehicle_type: String,
    pub capacity_kg: u32,
    pub status: VehicleStatus,
    pub current_location: Option<LatLng>,
}

/// Register vehicle payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCreate {
    pub id: Option<String>,
    #[serde(default)]
    pub vehicle_number: String,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub vehicle_type: String,
    pub capacity_kg: Option<u32>,
    pub status: Option<VehicleStatus>,
    pub current_location: Option<LatLng>,
}

/// Query parameters for fleet listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleQuery {
    pub status: Option<VehicleStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_serialize() {
        let v = Vehicle {
            id: "TRK-001".into(),
            vehicle_number: "MH-01-AB-1234".into(),
            driver_name: "Rajesh Kumar".into(),
            vehicle_type: "Heavy Truck".into(),
            capacity_kg: 15000,
            status: VehicleStatus::InUse,
            current_location: None,
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["vehicleNumber"], "MH-01-AB-1234");
        assert_eq!(json["capacityKg"], 15000);
        assert_eq!(json["status"], "in_use");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("maintenance".parse::<VehicleStatus>().unwrap(), VehicleStatus::Maintenance);
        assert!("parked".parse::<VehicleStatus>().is_err());
    }
}
