pub mod map;
pub mod polyline;
pub mod present;
pub mod request;
pub mod route_view;
pub mod session;
pub mod wire;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    Car,
    Truck,
    Van,
    Electric,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Car,
        VehicleType::Truck,
        VehicleType::Van,
        VehicleType::Electric,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Truck => "truck",
            VehicleType::Van => "van",
            VehicleType::Electric => "electric",
        }
    }

    /// Human readable name used in form controls.
    pub fn label(self) -> &'static str {
        match self {
            VehicleType::Car => "Car",
            VehicleType::Truck => "Truck",
            VehicleType::Van => "Van",
            VehicleType::Electric => "Electric Vehicle",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle type `{0}` (expected car, truck, van or electric)")]
pub struct UnknownVehicleType(pub String);

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        VehicleType::ALL
            .into_iter()
            .find(|vehicle| vehicle.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownVehicleType(value.to_string()))
    }
}

/// What the user asked for. Locations are free text; the optimizer geocodes them.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub start: String,
    pub end: String,
    pub vehicle_type: VehicleType,
    pub package_weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub distance_m: f64,
    pub duration_s: f64,
    pub encoded_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_percent: u8,
    pub wind_speed_kmh: f64,
    pub precipitation_mm: Option<f64>,
}

/// A non-primary candidate together with its own emissions estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeRoute {
    pub route: RouteGeometry,
    pub emissions_g_co2: f64,
    pub reason: Option<String>,
}

/// Recorded when the optimizer sent fewer emissions figures than alternative geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingMismatch {
    pub routes: usize,
    pub emissions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub best_route: RouteGeometry,
    pub best_emissions: f64,
    pub alternatives: Vec<AlternativeRoute>,
    pub weather: WeatherSnapshot,
    pub air_quality_index: i32,
    pub pairing_mismatch: Option<PairingMismatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RouteBounds {
    /// Smallest box containing every coordinate, `None` for an empty path.
    pub fn covering(path: &[Coordinate]) -> Option<Self> {
        let (first, rest) = path.split_first()?;
        let seed = RouteBounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(rest.iter().fold(seed, |bounds, coord| RouteBounds {
            min_lat: bounds.min_lat.min(coord.lat),
            max_lat: bounds.max_lat.max(coord.lat),
            min_lon: bounds.min_lon.min(coord.lon),
            max_lon: bounds.max_lon.max(coord.lon),
        }))
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }
}
