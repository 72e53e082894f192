//! Plain-text route cards, one per route in the current view.

use std::io::{self, Write};

use shared::polyline::decode_lossy;
use shared::present::{format_route, route_heading};
use shared::route_view::{RenderableRoute, ViewMode};
use shared::session::RouteSession;
use shared::{OptimizationResult, RouteBounds, RouteQuery};

pub fn write_session<W: Write>(out: &mut W, session: &RouteSession) -> io::Result<()> {
    let (Some(result), Some(query)) = (session.state().result(), session.query()) else {
        return writeln!(out, "No route available.");
    };

    if session.view_mode() == ViewMode::AlternativeRoutes {
        if result.alternatives.is_empty() {
            writeln!(out, "The optimizer returned no alternative routes.")?;
        }
        if let Some(mismatch) = result.pairing_mismatch {
            if mismatch.emissions < mismatch.routes {
                writeln!(
                    out,
                    "Note: emissions were reported for {} of {} alternative routes; the rest show 0.00 g CO2.",
                    mismatch.emissions, mismatch.routes
                )?;
            }
        }
    }

    for (i, route) in session.current_view().iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_route(out, route, result, query)?;
    }
    Ok(())
}

fn write_route<W: Write>(
    out: &mut W,
    route: &RenderableRoute,
    result: &OptimizationResult,
    query: &RouteQuery,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        route_heading(route.display_index, &query.start, &query.end)
    )?;
    if let Some(reason) = route.reason {
        writeln!(out, "  {reason}")?;
    }

    let fields = format_route(
        route.geometry,
        route.emissions,
        &result.weather,
        result.air_quality_index,
        query.package_weight_kg,
    );
    for (label, value) in fields.rows() {
        writeln!(out, "  {label}: {value}")?;
    }

    let path = decode_lossy(&route.geometry.encoded_path);
    match RouteBounds::covering(&path) {
        Some(bounds) => writeln!(
            out,
            "  Path: {} points within ({:.5}, {:.5}) - ({:.5}, {:.5})",
            path.len(),
            bounds.min_lat,
            bounds.min_lon,
            bounds.max_lat,
            bounds.max_lon
        ),
        None => writeln!(out, "  Path: unavailable"),
    }
}
