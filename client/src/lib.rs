pub mod report;

use std::io::Write;

use shared::request::{OptimizeTransport, RequestError, RequestState};
use shared::route_view::ViewMode;
use shared::session::RouteSession;
use shared::wire::{parse_response, OptimizeRouteRequest, OPTIMIZE_ROUTE_PATH};
use shared::{OptimizationResult, RouteQuery};
use thiserror::Error;

pub const DEFAULT_OPTIMIZER_URL: &str = "http://localhost:5000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Optimization(String),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP transport to the optimizer's `/optimize_route` endpoint.
#[derive(Clone)]
pub struct OptimizerClient {
    endpoint: String,
    http: reqwest::Client,
}

impl OptimizerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}{OPTIMIZE_ROUTE_PATH}", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl OptimizeTransport for OptimizerClient {
    async fn optimize(
        &self,
        body: &OptimizeRouteRequest,
    ) -> Result<OptimizationResult, RequestError> {
        tracing::debug!("POST {}", self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        tracing::debug!("optimizer answered {status} with {} bytes", text.len());
        parse_response(status, &text)
    }
}

fn transport_error(err: reqwest::Error) -> RequestError {
    if err.is_builder() {
        tracing::error!("could not build optimizer request: {err}");
        RequestError::Unexpected
    } else {
        RequestError::Transport(err.to_string())
    }
}

/// Runs one query through a fresh session and writes the chosen view to `out`.
pub async fn run<W: Write>(
    client: &OptimizerClient,
    query: RouteQuery,
    view: ViewMode,
    out: &mut W,
) -> Result<(), ClientError> {
    let mut session = RouteSession::new();
    if let RequestState::Failure(message) = session.run(client, query).await {
        return Err(ClientError::Optimization(message.clone()));
    }

    if view != session.view_mode() {
        session.toggle_view();
    }
    report::write_session(out, &session)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            OptimizerClient::new("http://localhost:5000/").endpoint(),
            "http://localhost:5000/optimize_route"
        );
        assert_eq!(
            OptimizerClient::new(DEFAULT_OPTIMIZER_URL).endpoint(),
            "http://localhost:5000/optimize_route"
        );
    }
}
