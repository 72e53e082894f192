//! Lifecycle of the outbound optimization request.
//!
//! ```text
//! Idle --submit--> Loading --ok--> Success
//!                     \----err--> Failure
//! Success | Failure --submit--> Loading
//! ```
//!
//! The controller does no I/O itself: [`OptimizationRequestController::submit`] hands
//! back the body to send and a ticket, and the caller reports the outcome through
//! [`OptimizationRequestController::complete`]. Submits while loading are ignored,
//! and an outcome whose ticket is not the newest one is dropped.

use std::future::Future;

use thiserror::Error;

use crate::wire::OptimizeRouteRequest;
use crate::{OptimizationResult, RouteQuery};

pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred while optimizing the route.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";
pub const MALFORMED_ERROR_MESSAGE: &str = "The route optimizer sent a response that could not be read.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Message from the optimizer's `{"error": ...}` payload.
    #[error("{0}")]
    Api(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("{}", UNEXPECTED_ERROR_MESSAGE)]
    Unexpected,
}

impl RequestError {
    /// Text shown to the user in place of the route.
    pub fn user_message(&self) -> String {
        match self {
            RequestError::Api(message) if !message.trim().is_empty() => message.clone(),
            RequestError::Transport(message) if !message.trim().is_empty() => message.clone(),
            RequestError::Api(_) | RequestError::Transport(_) => FALLBACK_ERROR_MESSAGE.to_string(),
            RequestError::Malformed(_) => MALFORMED_ERROR_MESSAGE.to_string(),
            RequestError::Unexpected => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(OptimizationResult),
    Failure(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            RequestState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Identifies one submission. Only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub body: OptimizeRouteRequest,
}

/// Something that can carry an optimization request to the optimizer and back.
pub trait OptimizeTransport {
    fn optimize(
        &self,
        body: &OptimizeRouteRequest,
    ) -> impl Future<Output = Result<OptimizationResult, RequestError>>;
}

#[derive(Debug, Default)]
pub struct OptimizationRequestController {
    state: RequestState,
    query: Option<RouteQuery>,
    generation: u64,
}

impl OptimizationRequestController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// The most recently submitted query.
    pub fn query(&self) -> Option<&RouteQuery> {
        self.query.as_ref()
    }

    /// Starts a request unless one is already in flight.
    ///
    /// Locations are not checked here: the optimizer decides what an empty start
    /// or end means.
    pub fn submit(&mut self, query: RouteQuery) -> Option<PendingRequest> {
        if self.state.is_loading() {
            tracing::debug!("ignoring submit while a request is in flight");
            return None;
        }

        self.generation += 1;
        let body = OptimizeRouteRequest::from(&query);
        tracing::info!(
            "optimizing route {:?} -> {:?} ({}, {} kg)",
            body.start,
            body.end,
            body.vehicle_type,
            body.package_weight
        );

        self.query = Some(query);
        self.state = RequestState::Loading;
        Some(PendingRequest {
            ticket: RequestTicket(self.generation),
            body,
        })
    }

    /// Records the outcome of a request. Returns `false` when the outcome was
    /// discarded because its ticket is stale or was already completed.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<OptimizationResult, RequestError>,
    ) -> bool {
        if ticket.0 != self.generation || !self.state.is_loading() {
            tracing::warn!(
                "discarding outcome of request #{} (current #{}, loading: {})",
                ticket.0,
                self.generation,
                self.state.is_loading()
            );
            return false;
        }

        self.state = match outcome {
            Ok(result) => {
                tracing::info!(
                    "request #{} succeeded with {} alternative routes",
                    ticket.0,
                    result.alternatives.len()
                );
                RequestState::Success(result)
            }
            Err(err) => {
                tracing::warn!("request #{} failed: {err}", ticket.0);
                RequestState::Failure(err.user_message())
            }
        };
        true
    }
}
