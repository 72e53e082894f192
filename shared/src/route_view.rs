use crate::map::RouteStyling;
use crate::present::route_title;
use crate::{OptimizationResult, RouteGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    BestRoute,
    AlternativeRoutes,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::BestRoute => ViewMode::AlternativeRoutes,
            ViewMode::AlternativeRoutes => ViewMode::BestRoute,
        }
    }

    /// Label of the button that switches away from this mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ViewMode::BestRoute => "Show Alternative Routes",
            ViewMode::AlternativeRoutes => "Show Best Route",
        }
    }
}

/// One route to draw and describe, borrowed from the current result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableRoute<'a> {
    pub geometry: &'a RouteGeometry,
    pub emissions: f64,
    /// `None` for the best route, `Some(i)` for alternative `i`.
    pub display_index: Option<usize>,
    pub reason: Option<&'a str>,
}

/// What was drawn into a container; equal keys mean the drawing is still current.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub container: String,
    pub encoded_path: String,
    pub styling: RouteStyling,
}

impl RenderableRoute<'_> {
    pub fn styling(&self) -> RouteStyling {
        match self.display_index {
            None => RouteStyling::Best,
            Some(_) => RouteStyling::Alternative,
        }
    }

    pub fn title(&self) -> String {
        route_title(self.display_index)
    }

    pub fn container_id(&self) -> String {
        match self.display_index {
            None => "route-map-best".to_string(),
            Some(index) => format!("route-map-alt-{index}"),
        }
    }

    pub fn render_key(&self) -> RenderKey {
        RenderKey {
            container: self.container_id(),
            encoded_path: self.geometry.encoded_path.clone(),
            styling: self.styling(),
        }
    }
}

/// The routes shown for `mode`, in the order the optimizer returned them.
pub fn current_view(result: &OptimizationResult, mode: ViewMode) -> Vec<RenderableRoute<'_>> {
    match mode {
        ViewMode::BestRoute => vec![RenderableRoute {
            geometry: &result.best_route,
            emissions: result.best_emissions,
            display_index: None,
            reason: None,
        }],
        ViewMode::AlternativeRoutes => result
            .alternatives
            .iter()
            .enumerate()
            .map(|(index, alternative)| RenderableRoute {
                geometry: &alternative.route,
                emissions: alternative.emissions_g_co2,
                display_index: Some(index),
                reason: alternative.reason.as_deref(),
            })
            .collect(),
    }
}

#[derive(Debug, Default)]
pub struct RouteViewController {
    mode: ViewMode,
}

impl RouteViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn toggle(&mut self) -> ViewMode {
        self.mode = self.mode.toggled();
        tracing::debug!("view mode switched to {:?}", self.mode);
        self.mode
    }

    pub fn reset(&mut self) {
        self.mode = ViewMode::BestRoute;
    }

    pub fn current_view<'a>(&self, result: &'a OptimizationResult) -> Vec<RenderableRoute<'a>> {
        current_view(result, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlternativeRoute, WeatherSnapshot};

    fn geometry(encoded_path: &str, distance_m: f64) -> RouteGeometry {
        RouteGeometry {
            distance_m,
            duration_s: distance_m / 25.0,
            encoded_path: encoded_path.into(),
        }
    }

    fn result_with(alternatives: Vec<AlternativeRoute>) -> OptimizationResult {
        OptimizationResult {
            best_route: geometry("best", 1_400_000.0),
            best_emissions: 100.0,
            alternatives,
            weather: WeatherSnapshot {
                temperature_c: 25.0,
                humidity_percent: 50,
                wind_speed_kmh: 4.0,
                precipitation_mm: None,
            },
            air_quality_index: 80,
            pairing_mismatch: None,
        }
    }

    #[test]
    fn toggle_flips_between_two_modes() {
        let mut controller = RouteViewController::new();
        assert_eq!(controller.mode(), ViewMode::BestRoute);
        assert_eq!(controller.toggle(), ViewMode::AlternativeRoutes);
        assert_eq!(controller.toggle(), ViewMode::BestRoute);
    }

    #[test]
    fn toggle_labels_name_the_other_mode() {
        assert_eq!(ViewMode::BestRoute.toggle_label(), "Show Alternative Routes");
        assert_eq!(ViewMode::AlternativeRoutes.toggle_label(), "Show Best Route");
    }

    #[test]
    fn best_route_view_has_single_entry() {
        let result = result_with(Vec::new());
        let view = current_view(&result, ViewMode::BestRoute);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].geometry, &result.best_route);
        assert_eq!(view[0].emissions, 100.0);
        assert_eq!(view[0].display_index, None);
        assert_eq!(view[0].styling(), RouteStyling::Best);
        assert_eq!(view[0].title(), "Best Route");
    }

    #[test]
    fn alternatives_keep_positional_order() {
        // Emissions deliberately descending so any sorting would show.
        let result = result_with(vec![
            AlternativeRoute {
                route: geometry("a", 3.0),
                emissions_g_co2: 30.0,
                reason: Some("Score: 3".into()),
            },
            AlternativeRoute {
                route: geometry("b", 1.0),
                emissions_g_co2: 10.0,
                reason: None,
            },
        ]);
        let view = current_view(&result, ViewMode::AlternativeRoutes);

        let paths: Vec<_> = view.iter().map(|r| r.geometry.encoded_path.as_str()).collect();
        assert_eq!(paths, ["a", "b"]);
        assert_eq!(view[1].title(), "Alternative Route 2");
        assert_eq!(view[0].reason, Some("Score: 3"));
        assert_eq!(view[1].container_id(), "route-map-alt-1");
        assert!(view.iter().all(|r| r.styling() == RouteStyling::Alternative));
    }

    #[test]
    fn no_alternatives_is_an_empty_view() {
        let result = result_with(Vec::new());
        assert!(current_view(&result, ViewMode::AlternativeRoutes).is_empty());
    }

    #[test]
    fn render_key_changes_with_geometry() {
        let first = result_with(Vec::new());
        let mut second = result_with(Vec::new());
        second.best_route.encoded_path = "other".into();

        let a = current_view(&first, ViewMode::BestRoute)[0].render_key();
        let b = current_view(&second, ViewMode::BestRoute)[0].render_key();
        assert_ne!(a, b);
        assert_eq!(a, current_view(&first, ViewMode::BestRoute)[0].render_key());
    }

    mod proptests {
        use super::*;
        use crate::wire::parse_response;
        use proptest::prelude::*;
        use serde_json::json;

        fn wire_body(distances: &[f64], emissions: &[f64]) -> String {
            let route = |i: usize, distance: f64| {
                json!({"distance": distance, "duration": distance / 25.0, "polyline": format!("path-{i}")})
            };
            json!({
                "route": {
                    "best_route": route(99, 1_400_000.0),
                    "other_routes": distances
                        .iter()
                        .enumerate()
                        .map(|(i, d)| json!({"route": route(i, *d)}))
                        .collect::<Vec<_>>(),
                },
                "emissions": 100.0,
                "alternative_routes": emissions
                    .iter()
                    .enumerate()
                    .map(|(i, e)| json!({"route": route(i, 0.0), "emissions": e}))
                    .collect::<Vec<_>>(),
                "weather": {"temperature": 25.0, "humidity": 50, "wind_speed": 4.0},
                "air_quality": 80
            })
            .to_string()
        }

        fn whole_numbers(max: u32) -> impl Strategy<Value = Vec<f64>> {
            prop::collection::vec((0..max).prop_map(f64::from), 0..10)
        }

        proptest! {
            #[test]
            fn prop_other_routes_pair_with_emissions_by_position(
                distances in whole_numbers(10_000_000),
                emissions in whole_numbers(1_000_000),
            ) {
                let result = parse_response(200, &wire_body(&distances, &emissions)).unwrap();
                let view = current_view(&result, ViewMode::AlternativeRoutes);

                prop_assert_eq!(view.len(), distances.len());
                for (i, route) in view.iter().enumerate() {
                    prop_assert_eq!(route.geometry.encoded_path.clone(), format!("path-{i}"));
                    prop_assert_eq!(route.geometry.distance_m, distances[i]);
                    prop_assert_eq!(route.emissions, emissions.get(i).copied().unwrap_or(0.0));
                    prop_assert_eq!(route.display_index, Some(i));
                }
                prop_assert_eq!(
                    result.pairing_mismatch.is_some(),
                    distances.len() != emissions.len()
                );
            }
        }
    }
}
