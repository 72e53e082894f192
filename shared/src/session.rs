use crate::request::{
    OptimizationRequestController, OptimizeTransport, PendingRequest, RequestError,
    RequestState, RequestTicket,
};
use crate::route_view::{RenderableRoute, RouteViewController, ViewMode};
use crate::{OptimizationResult, RouteQuery};

/// Request lifecycle plus view toggle, as one screen uses them.
///
/// A freshly arrived result always opens on the best route, so alternatives from
/// the previous result never stay selected against a new route list.
#[derive(Debug, Default)]
pub struct RouteSession {
    requests: OptimizationRequestController,
    view: RouteViewController,
}

impl RouteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        self.requests.state()
    }

    pub fn query(&self) -> Option<&RouteQuery> {
        self.requests.query()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view.mode()
    }

    pub fn submit(&mut self, query: RouteQuery) -> Option<PendingRequest> {
        self.requests.submit(query)
    }

    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<OptimizationResult, RequestError>,
    ) -> bool {
        let applied = self.requests.complete(ticket, outcome);
        if applied && self.requests.state().result().is_some() {
            self.view.reset();
        }
        applied
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.view.toggle()
    }

    /// Routes to show right now; empty unless the last request succeeded.
    pub fn current_view(&self) -> Vec<RenderableRoute<'_>> {
        self.requests
            .state()
            .result()
            .map(|result| self.view.current_view(result))
            .unwrap_or_default()
    }

    /// Submits `query` and awaits its outcome on `transport` in one go.
    pub async fn run<T: OptimizeTransport>(
        &mut self,
        transport: &T,
        query: RouteQuery,
    ) -> &RequestState {
        if let Some(pending) = self.submit(query) {
            let outcome = transport.optimize(&pending.body).await;
            self.complete(pending.ticket, outcome);
        }
        self.state()
    }
}
