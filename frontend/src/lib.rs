mod maplibre;

use seed::browser::fetch::FetchError;
use seed::{prelude::*, virtual_dom::AtValue, *};
use shared::map::MapRenderer;
use shared::present::{format_route, route_heading};
use shared::request::{PendingRequest, RequestError, RequestTicket};
use shared::route_view::{RenderKey, RenderableRoute, ViewMode};
use shared::session::RouteSession;
use shared::wire::{parse_response, OPTIMIZE_ROUTE_PATH};
use shared::{OptimizationResult, RouteQuery, VehicleType};

use crate::maplibre::{MapLibreProvider, MAP_READY_EVENT};

const MAP_HEIGHT_PX: i32 = 300;

fn api_root() -> String {
    if let Some(url) = option_env!("FRONTEND_API_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    format!("http://localhost:5000{OPTIMIZE_ROUTE_PATH}")
}

pub struct Model {
    form: RouteForm,
    session: RouteSession,
    renderer: MapRenderer<MapLibreProvider>,
    drawn: DrawnMaps,
}

#[derive(Clone)]
struct RouteForm {
    start: String,
    end: String,
    vehicle_type: VehicleType,
    package_weight: String,
}

impl Default for RouteForm {
    fn default() -> Self {
        Self {
            start: String::new(),
            end: String::new(),
            vehicle_type: VehicleType::Car,
            package_weight: "0".into(),
        }
    }
}

impl RouteForm {
    fn to_query(&self) -> RouteQuery {
        RouteQuery {
            start: self.start.clone(),
            end: self.end.clone(),
            vehicle_type: self.vehicle_type,
            package_weight_kg: parse_weight(&self.package_weight),
        }
    }
}

/// Blank or unreadable weights count as zero, as the number input reports them.
fn parse_weight(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
        .unwrap_or(0.0)
}

pub enum Msg {
    StartChanged(String),
    EndChanged(String),
    VehicleTypeChanged(String),
    PackageWeightChanged(String),
    Submit,
    OptimizationFetched(RequestTicket, Result<OptimizationResult, RequestError>),
    ToggleView,
    MapLibraryReady,
    DrawMaps,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from(MAP_READY_EVENT), |_| {
        Msg::MapLibraryReady
    }));

    Model {
        form: RouteForm::default(),
        session: RouteSession::new(),
        renderer: MapRenderer::new(MapLibreProvider::load()),
        drawn: DrawnMaps::default(),
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::StartChanged(val) => model.form.start = val,
        Msg::EndChanged(val) => model.form.end = val,
        Msg::VehicleTypeChanged(val) => match val.parse() {
            Ok(vehicle_type) => model.form.vehicle_type = vehicle_type,
            Err(err) => log_warn(&err.to_string()),
        },
        Msg::PackageWeightChanged(val) => model.form.package_weight = val,
        Msg::Submit => {
            let query = model.form.to_query();
            match submit_query(&mut model.session, &mut model.drawn, query) {
                Some(pending) => {
                    orders.perform_cmd(send_optimize_request(pending));
                }
                None => log_debug("submit ignored while a request is in flight"),
            }
        }
        Msg::OptimizationFetched(ticket, outcome) => {
            if model.session.complete(ticket, outcome) {
                orders.after_next_render(|_| Msg::DrawMaps);
            }
        }
        Msg::ToggleView => {
            model.session.toggle_view();
            orders.after_next_render(|_| Msg::DrawMaps);
        }
        Msg::MapLibraryReady => {
            log_debug("map library ready");
            model.drawn.forget();
            orders.after_next_render(|_| Msg::DrawMaps);
        }
        Msg::DrawMaps => draw_maps(model),
    }
}

/// Draws every visible route whose container does not already show it.
fn draw_maps(model: &mut Model) {
    if !model.renderer.is_ready() {
        return;
    }

    let routes = model.session.current_view();
    let keys: Vec<RenderKey> = routes.iter().map(RenderableRoute::render_key).collect();
    for (route, key) in routes.iter().zip(&keys) {
        if model.drawn.needs_redraw(key) {
            model
                .renderer
                .render_geometry(&key.container, route.geometry, route.styling());
        }
    }
    model.drawn.replace(keys);
}

/// Maps currently drawn, by the key they were drawn with.
#[derive(Default)]
struct DrawnMaps(Vec<RenderKey>);

impl DrawnMaps {
    fn needs_redraw(&self, key: &RenderKey) -> bool {
        !self.0.contains(key)
    }

    fn replace(&mut self, keys: Vec<RenderKey>) {
        self.0 = keys;
    }

    /// Called when the map containers leave the DOM, so fresh ones get drawn.
    fn forget(&mut self) {
        self.0.clear();
    }
}

/// While loading no route card is rendered, so every container drawn so far is gone.
fn submit_query(
    session: &mut RouteSession,
    drawn: &mut DrawnMaps,
    query: RouteQuery,
) -> Option<PendingRequest> {
    let pending = session.submit(query)?;
    drawn.forget();
    Some(pending)
}

async fn send_optimize_request(pending: PendingRequest) -> Msg {
    let PendingRequest { ticket, body } = pending;
    log_debug(&format!(
        "sending optimize request start={:?} end={:?} vehicle={} weight={}",
        body.start, body.end, body.vehicle_type, body.package_weight
    ));

    let outcome = match Request::new(api_root()).method(Method::Post).json(&body) {
        Err(err) => {
            log_warn(&format!("could not build optimize request: {err:?}"));
            Err(RequestError::Unexpected)
        }
        Ok(request) => match request.fetch().await {
            Err(err) => Err(RequestError::Transport(transport_message(&err))),
            Ok(response) => {
                let status = response.status().code;
                match response.text().await {
                    Ok(text) => parse_response(status, &text),
                    Err(err) => Err(RequestError::Transport(transport_message(&err))),
                }
            }
        },
    };

    Msg::OptimizationFetched(ticket, outcome)
}

fn transport_message(err: &FetchError) -> String {
    match err {
        FetchError::NetworkError(_) => "Network Error".to_string(),
        other => format!("{other:?}"),
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    let header = h1!["Smart Route Optimizer"];
    let form = view_form(model);
    let status = view_error(model);
    let routes = view_routes(model);

    div![C!["app-container"], header, form, status, routes]
}

fn view_form(model: &Model) -> Node<Msg> {
    let loading = model.session.state().is_loading();
    let input_field = |label: &str, value: &str, placeholder: &str, msg: fn(String) -> Msg| {
        div![
            C!["input-field"],
            label![label],
            input![
                attrs! {
                    At::Type => "text",
                    At::Value => value,
                    At::Placeholder => placeholder,
                    At::AutoComplete => "off",
                },
                input_ev(Ev::Input, msg),
            ]
        ]
    };

    form![
        C!["controls"],
        fieldset![
            legend!["Locations"],
            input_field(
                "Start Location",
                &model.form.start,
                "Enter start location",
                Msg::StartChanged
            ),
            input_field(
                "End Location",
                &model.form.end,
                "Enter end location",
                Msg::EndChanged
            ),
        ],
        fieldset![
            legend!["Shipment"],
            div![
                C!["input-field"],
                label!["Vehicle Type"],
                select![
                    VehicleType::ALL.iter().map(|vehicle| {
                        option![
                            attrs! {
                                At::Value => vehicle.as_str(),
                                At::Selected => bool_attr(*vehicle == model.form.vehicle_type),
                            },
                            vehicle.label(),
                        ]
                    }),
                    input_ev(Ev::Change, Msg::VehicleTypeChanged),
                ]
            ],
            div![
                C!["input-field"],
                label!["Package Weight (kg)"],
                input![
                    attrs! {
                        At::Type => "number",
                        At::Min => "0",
                        At::Step => "any",
                        At::Value => &model.form.package_weight,
                        At::Placeholder => "Enter package weight in kg",
                    },
                    input_ev(Ev::Input, Msg::PackageWeightChanged),
                ]
            ],
        ],
        button![
            if loading {
                "Optimizing..."
            } else {
                "Optimize Route"
            },
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Submit
            }),
            attrs! { At::Disabled => bool_attr(loading) },
            C!["submit-btn"],
        ],
    ]
}

fn view_error(model: &Model) -> Node<Msg> {
    match model.session.state().error() {
        Some(error) => div![C!["error"], p![strong!["Error:"]], p![error]],
        None => empty![],
    }
}

fn view_routes(model: &Model) -> Node<Msg> {
    let (Some(result), Some(query)) = (model.session.state().result(), model.session.query())
    else {
        return empty![];
    };
    let mode = model.session.view_mode();

    let no_alternatives = if mode == ViewMode::AlternativeRoutes && result.alternatives.is_empty() {
        p![C!["notice"], "The optimizer returned no alternative routes."]
    } else {
        empty![]
    };

    let pairing_notice = match result.pairing_mismatch {
        Some(mismatch)
            if mode == ViewMode::AlternativeRoutes && mismatch.emissions < mismatch.routes =>
        {
            p![
                C!["notice"],
                format!(
                    "Emissions were reported for {} of {} alternative routes; the rest show 0.00 g CO2.",
                    mismatch.emissions, mismatch.routes
                )
            ]
        }
        _ => empty![],
    };

    let cards = model
        .session
        .current_view()
        .into_iter()
        .map(|route| view_route_card(&route, result, query));

    div![
        C!["routes"],
        button![
            mode.toggle_label(),
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::ToggleView
            }),
            C!["view-toggle"],
        ],
        no_alternatives,
        pairing_notice,
        cards,
    ]
}

fn view_route_card(
    route: &RenderableRoute,
    result: &OptimizationResult,
    query: &RouteQuery,
) -> Node<Msg> {
    let container = route.container_id();
    let fields = format_route(
        route.geometry,
        route.emissions,
        &result.weather,
        result.air_quality_index,
        query.package_weight_kg,
    );

    div![
        el_key(&container),
        C!["route-card"],
        h3![route.title()],
        div![
            C!["route-map"],
            attrs! { At::Id => container },
            style! {
                St::Height => px(MAP_HEIGHT_PX),
                St::Width => percent(100),
            },
        ],
        div![
            C!["route-info"],
            h2![route_heading(route.display_index, &query.start, &query.end)],
            route
                .reason
                .map(|reason| small![C!["reason"], reason])
                .unwrap_or_else(|| empty![]),
            fields
                .rows()
                .into_iter()
                .map(|(label, value)| p![strong![format!("{label}:")], " ", value]),
        ],
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

fn log_debug(message: &str) {
    web_sys::console::debug_1(&format!("[frontend] {message}").into());
}

pub(crate) fn log_warn(message: &str) {
    web_sys::console::warn_1(&format!("[frontend] {message}").into());
}
