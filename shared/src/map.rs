//! Route overlay rendering on top of an injected map capability.
//!
//! Drawing is split in two: [`plan`] turns a path into draw commands without touching
//! anything, and [`MapRenderer::render`] replays those commands on a surface obtained
//! from the [`MapProvider`]. Every plan starts by clearing the surface, so rendering
//! the same route twice leaves the same overlay behind.

use crate::polyline::decode_lossy;
use crate::{Coordinate, RouteBounds, RouteGeometry};

pub const BEST_ROUTE_COLOR: &str = "#FF0000";
pub const ALTERNATIVE_ROUTE_COLOR: &str = "#0000FF";
pub const START_LABEL: &str = "Start";
pub const END_LABEL: &str = "End";
/// Margin kept around the route when fitting the viewport.
pub const DEFAULT_FIT_PADDING_PX: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteStyling {
    Best,
    Alternative,
}

impl RouteStyling {
    pub fn color(self) -> &'static str {
        match self {
            RouteStyling::Best => BEST_ROUTE_COLOR,
            RouteStyling::Alternative => ALTERNATIVE_ROUTE_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearOverlays,
    Line {
        path: Vec<Coordinate>,
        color: &'static str,
    },
    Marker {
        at: Coordinate,
        label: &'static str,
    },
    FitBounds {
        bounds: RouteBounds,
        padding_px: u32,
    },
}

/// One map instance bound to a container.
pub trait MapSurface {
    fn clear_overlays(&mut self);
    fn draw_line(&mut self, path: &[Coordinate], color: &str);
    fn place_marker(&mut self, at: Coordinate, label: &str);
    fn fit_bounds(&mut self, bounds: RouteBounds, padding_px: u32);
}

/// The mapping library, loaded once and then asked for surfaces by container id.
pub trait MapProvider {
    type Surface: MapSurface;

    fn is_ready(&self) -> bool;

    /// `None` when the container does not exist (yet).
    fn surface(&self, container: &str) -> Option<Self::Surface>;
}

/// Draw commands for one route.
///
/// Paths shorter than two points get their markers but no line. A single point
/// only gets the start marker.
pub fn plan(path: &[Coordinate], styling: RouteStyling, padding_px: u32) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::ClearOverlays];

    if path.len() >= 2 {
        commands.push(DrawCommand::Line {
            path: path.to_vec(),
            color: styling.color(),
        });
    }

    match path {
        [] => {}
        [only] => commands.push(DrawCommand::Marker {
            at: *only,
            label: START_LABEL,
        }),
        [first, .., last] => {
            commands.push(DrawCommand::Marker {
                at: *first,
                label: START_LABEL,
            });
            commands.push(DrawCommand::Marker {
                at: *last,
                label: END_LABEL,
            });
        }
    }

    if let Some(bounds) = RouteBounds::covering(path) {
        commands.push(DrawCommand::FitBounds { bounds, padding_px });
    }

    commands
}

pub fn apply<S: MapSurface>(surface: &mut S, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::ClearOverlays => surface.clear_overlays(),
            DrawCommand::Line { path, color } => surface.draw_line(path, color),
            DrawCommand::Marker { at, label } => surface.place_marker(*at, label),
            DrawCommand::FitBounds { bounds, padding_px } => {
                surface.fit_bounds(*bounds, *padding_px)
            }
        }
    }
}

pub struct MapRenderer<P> {
    provider: P,
    padding_px: u32,
}

impl<P: MapProvider> MapRenderer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            padding_px: DEFAULT_FIT_PADDING_PX,
        }
    }

    pub fn with_padding(mut self, padding_px: u32) -> Self {
        self.padding_px = padding_px;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_ready(&self) -> bool {
        self.provider.is_ready()
    }

    /// Replaces whatever `container` currently shows with `path`.
    ///
    /// An unavailable map library or a missing container turns this into a no-op.
    pub fn render(&self, container: &str, path: &[Coordinate], styling: RouteStyling) {
        if !self.provider.is_ready() {
            tracing::debug!("map provider not ready, skipping render of {container}");
            return;
        }
        let Some(mut surface) = self.provider.surface(container) else {
            tracing::debug!("no map surface for {container}, skipping render");
            return;
        };

        let commands = plan(path, styling, self.padding_px);
        tracing::debug!(
            "drawing {} points on {container} ({} commands)",
            path.len(),
            commands.len()
        );
        apply(&mut surface, &commands);
    }

    /// Decodes the geometry's path on every call; nothing is cached between renders.
    pub fn render_geometry(&self, container: &str, geometry: &RouteGeometry, styling: RouteStyling) {
        let path = decode_lossy(&geometry.encoded_path);
        self.render(container, &path, styling);
    }
}
