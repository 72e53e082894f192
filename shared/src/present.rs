use crate::{RouteGeometry, WeatherSnapshot};

/// Display-ready text for one route card.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub distance: String,
    pub duration: String,
    pub emissions: String,
    pub weather: String,
    pub air_quality: String,
    pub package_weight: String,
}

impl DisplayFields {
    /// Label/value pairs in the order the cards list them.
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        [
            ("Distance", self.distance.as_str()),
            ("Duration", self.duration.as_str()),
            ("Emissions", self.emissions.as_str()),
            ("Weather", self.weather.as_str()),
            ("Air Quality Index", self.air_quality.as_str()),
            ("Package Weight", self.package_weight.as_str()),
        ]
    }
}

pub fn format_route(
    route: &RouteGeometry,
    emissions: f64,
    weather: &WeatherSnapshot,
    air_quality: i32,
    package_weight_kg: f64,
) -> DisplayFields {
    DisplayFields {
        distance: format!("{:.2} km", route.distance_m / 1000.0),
        duration: format!("{:.2} minutes", route.duration_s / 60.0),
        emissions: format!("{emissions:.2} g CO2"),
        weather: format!(
            "{:.2}°C, Wind: {:.2} km/h, Humidity: {}%",
            weather.temperature_c, weather.wind_speed_kmh, weather.humidity_percent
        ),
        air_quality: air_quality.to_string(),
        package_weight: format!("{package_weight_kg} kg"),
    }
}

/// "Best Route" for `None`, "Alternative Route {i + 1}" otherwise.
pub fn route_title(display_index: Option<usize>) -> String {
    match display_index {
        None => "Best Route".to_string(),
        Some(index) => format!("Alternative Route {}", index + 1),
    }
}

pub fn route_heading(display_index: Option<usize>, start: &str, end: &str) -> String {
    format!("{} from {start} to {end}", route_title(display_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: 31.456,
            humidity_percent: 48,
            wind_speed_kmh: 3.1,
            precipitation_mm: None,
        }
    }

    #[test]
    fn formats_delhi_mumbai_example() {
        let route = RouteGeometry {
            distance_m: 1_400_000.0,
            duration_s: 50_400.0,
            encoded_path: "_p~iF~ps|U".into(),
        };
        let fields = format_route(&route, 196_543.219, &weather(), 152, 10.0);

        assert_eq!(fields.distance, "1400.00 km");
        assert_eq!(fields.duration, "840.00 minutes");
        assert_eq!(fields.emissions, "196543.22 g CO2");
        assert_eq!(fields.weather, "31.46°C, Wind: 3.10 km/h, Humidity: 48%");
        assert_eq!(fields.air_quality, "152");
        assert_eq!(fields.package_weight, "10 kg");
    }

    #[test]
    fn package_weight_is_not_rounded() {
        let route = RouteGeometry {
            distance_m: 0.0,
            duration_s: 0.0,
            encoded_path: String::new(),
        };
        let fields = format_route(&route, 0.0, &weather(), 0, 12.345);
        assert_eq!(fields.package_weight, "12.345 kg");
        assert_eq!(fields.distance, "0.00 km");
    }

    #[test]
    fn rows_keep_card_order() {
        let route = RouteGeometry {
            distance_m: 1500.0,
            duration_s: 90.0,
            encoded_path: String::new(),
        };
        let fields = format_route(&route, 1.0, &weather(), 42, 1.0);
        let labels: Vec<_> = fields.rows().iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            [
                "Distance",
                "Duration",
                "Emissions",
                "Weather",
                "Air Quality Index",
                "Package Weight"
            ]
        );
        assert_eq!(fields.rows()[1].1, "1.50 minutes");
    }

    #[test]
    fn headings_are_one_based() {
        assert_eq!(route_heading(None, "Delhi", "Mumbai"), "Best Route from Delhi to Mumbai");
        assert_eq!(route_title(Some(0)), "Alternative Route 1");
        assert_eq!(route_title(Some(2)), "Alternative Route 3");
    }
}
