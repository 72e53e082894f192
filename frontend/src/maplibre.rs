//! MapLibre GL JS behind the core `MapProvider` seam.
//!
//! The JS side keeps one map per container id and recreates it when seed swaps the
//! container element out.

use serde::Serialize;
use serde_wasm_bindgen::to_value;
use shared::map::{MapProvider, MapSurface};
use shared::{Coordinate, RouteBounds};
use wasm_bindgen::prelude::{wasm_bindgen, JsValue};

#[wasm_bindgen(module = "/maplibre_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = loadMapLibrary)]
    fn load_map_library();
    #[wasm_bindgen(js_name = isMapLibraryLoaded)]
    fn is_map_library_loaded() -> bool;
    #[wasm_bindgen(js_name = hasContainer)]
    fn has_container(container: &str) -> bool;
    #[wasm_bindgen(js_name = clearOverlays)]
    fn clear_overlays_js(container: &str);
    #[wasm_bindgen(js_name = drawRouteLine)]
    fn draw_route_line_js(container: &str, coords: JsValue, style: JsValue);
    #[wasm_bindgen(js_name = placeMarker)]
    fn place_marker_js(container: &str, coord: JsValue, label: &str);
    #[wasm_bindgen(js_name = fitRouteBounds)]
    fn fit_route_bounds_js(container: &str, bounds: JsValue, padding: u32);
}

/// Dispatched on `window` once the MapLibre script has loaded.
pub const MAP_READY_EVENT: &str = "map-library-ready";

const LINE_WEIGHT_PX: u32 = 2;
const LINE_OPACITY: f64 = 1.0;

#[derive(Serialize)]
struct LineStyle<'a> {
    color: &'a str,
    weight: u32,
    opacity: f64,
}

pub struct MapLibreProvider {
    _loaded: (),
}

impl MapLibreProvider {
    /// Injects the MapLibre script the first time it is called; later calls are no-ops.
    pub fn load() -> Self {
        load_map_library();
        Self { _loaded: () }
    }
}

impl MapProvider for MapLibreProvider {
    type Surface = MapLibreSurface;

    fn is_ready(&self) -> bool {
        is_map_library_loaded()
    }

    fn surface(&self, container: &str) -> Option<MapLibreSurface> {
        has_container(container).then(|| MapLibreSurface {
            container: container.to_string(),
        })
    }
}

pub struct MapLibreSurface {
    container: String,
}

impl MapSurface for MapLibreSurface {
    fn clear_overlays(&mut self) {
        clear_overlays_js(&self.container);
    }

    fn draw_line(&mut self, path: &[Coordinate], color: &str) {
        let style = LineStyle {
            color,
            weight: LINE_WEIGHT_PX,
            opacity: LINE_OPACITY,
        };
        match (to_value(path), to_value(&style)) {
            (Ok(coords), Ok(style)) => draw_route_line_js(&self.container, coords, style),
            _ => crate::log_warn(&format!("could not convert route line for {}", self.container)),
        }
    }

    fn place_marker(&mut self, at: Coordinate, label: &str) {
        if let Ok(coord) = to_value(&at) {
            place_marker_js(&self.container, coord, label);
        }
    }

    fn fit_bounds(&mut self, bounds: RouteBounds, padding_px: u32) {
        if let Ok(bounds) = to_value(&bounds) {
            fit_route_bounds_js(&self.container, bounds, padding_px);
        }
    }
}
