//! JSON contract of the `/optimize_route` endpoint.
//!
//! The response repeats each alternative twice: the geometry under
//! `route.other_routes` and the emissions under `alternative_routes`, matched by
//! position only. [`OptimizeRouteResponse::into_result`] zips them into one list of
//! [`AlternativeRoute`]s so nothing downstream indexes two sequences in lockstep.

use serde::{Deserialize, Serialize};

use crate::request::RequestError;
use crate::{
    AlternativeRoute, OptimizationResult, PairingMismatch, RouteGeometry, RouteQuery,
    VehicleType, WeatherSnapshot,
};

pub const OPTIMIZE_ROUTE_PATH: &str = "/optimize_route";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRouteRequest {
    pub start: String,
    pub end: String,
    pub vehicle_type: VehicleType,
    pub package_weight: f64,
}

impl From<&RouteQuery> for OptimizeRouteRequest {
    fn from(query: &RouteQuery) -> Self {
        Self {
            start: query.start.clone(),
            end: query.end.clone(),
            vehicle_type: query.vehicle_type,
            package_weight: query.package_weight_kg,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRouteResponse {
    pub route: ComparedRoutes,
    pub emissions: f64,
    #[serde(default)]
    pub alternative_routes: Option<Vec<AlternativeEmissions>>,
    pub weather: WireWeather,
    pub air_quality: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparedRoutes {
    pub best_route: WireRoute,
    #[serde(default)]
    pub other_routes: Vec<OtherRoute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherRoute {
    pub route: WireRoute,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeEmissions {
    pub emissions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRoute {
    pub distance: f64,
    pub duration: f64,
    pub polyline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
}

impl OptimizeRouteResponse {
    pub fn into_result(self) -> OptimizationResult {
        let emissions = self.alternative_routes.unwrap_or_default();
        let routes = self.route.other_routes;

        let pairing_mismatch = (emissions.len() != routes.len()).then(|| PairingMismatch {
            routes: routes.len(),
            emissions: emissions.len(),
        });
        if let Some(mismatch) = pairing_mismatch {
            tracing::warn!(
                "optimizer sent {} alternative routes but {} emissions figures",
                mismatch.routes,
                mismatch.emissions
            );
        }

        let mut emissions = emissions.into_iter();
        let alternatives = routes
            .into_iter()
            .map(|other| AlternativeRoute {
                route: other.route.into_geometry(),
                emissions_g_co2: emissions
                    .next()
                    .map_or(0.0, |alt| non_negative("alternative emissions", alt.emissions)),
                reason: other.reason,
            })
            .collect();

        OptimizationResult {
            best_route: self.route.best_route.into_geometry(),
            best_emissions: non_negative("emissions", self.emissions),
            alternatives,
            weather: self.weather.into_snapshot(),
            air_quality_index: self.air_quality,
            pairing_mismatch,
        }
    }
}

impl WireRoute {
    fn into_geometry(self) -> RouteGeometry {
        RouteGeometry {
            distance_m: non_negative("distance", self.distance),
            duration_s: non_negative("duration", self.duration),
            encoded_path: self.polyline,
        }
    }
}

impl WireWeather {
    fn into_snapshot(self) -> WeatherSnapshot {
        let humidity = if self.humidity.is_finite() {
            self.humidity.round().clamp(0.0, 100.0)
        } else {
            0.0
        };
        if humidity != self.humidity {
            tracing::warn!("humidity {} adjusted to {humidity}", self.humidity);
        }

        WeatherSnapshot {
            temperature_c: self.temperature,
            humidity_percent: humidity as u8,
            wind_speed_kmh: non_negative("wind speed", self.wind_speed),
            precipitation_mm: self.precipitation,
        }
    }
}

fn non_negative(field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!("clamping out-of-range {field} {value} to 0");
        0.0
    }
}

/// Interprets a raw HTTP response from the optimizer.
pub fn parse_response(status: u16, body: &str) -> Result<OptimizationResult, RequestError> {
    if !(200..300).contains(&status) {
        return Err(error_from_payload(status, body));
    }

    serde_json::from_str::<OptimizeRouteResponse>(body)
        .map(OptimizeRouteResponse::into_result)
        .map_err(|err| RequestError::Malformed(err.to_string()))
}

/// Non-2xx bodies carry `{"error": "..."}` when the optimizer rejected the query.
pub fn error_from_payload(status: u16, body: &str) -> RequestError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(payload) if !payload.error.trim().is_empty() => RequestError::Api(payload.error),
        _ => RequestError::Transport(format!("Request failed with status code {status}")),
    }
}
