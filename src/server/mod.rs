//! HTTP service surface
//!
//! Exposes the analyzer over HTTP:
//! - `POST /analyze` with a JSON body `{"url": "..."}` returns an
//!   [`AnalyzeResult`] as JSON
//! - `GET /health` returns `{"status": "ok"}`
//!
//! Caller mistakes map to `400 Bad Request`, an expired analysis budget to
//! `504 Gateway Timeout` and every other failure to `502 Bad Gateway`.
//!
//! # Example
//!
//! ```no_run
//! use page_lens::config::Config;
//! use page_lens::server::{router, AppState};
//!
//! # async fn run() -> page_lens::Result<()> {
//! let config = Config::default();
//! let state = AppState::new(config.clone())?;
//! let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

use crate::analyzer::{
    analyze_page_with, build_http_client, AnalyzeResult, HttpProber, LinkProber,
};
use crate::config::Config;
use crate::{AnalyzerError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    client: Client,
    prober: Arc<dyn LinkProber>,
}

impl AppState {
    /// Builds the state with the HTTP client and prober described by `config`
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.fetcher)?;
        let prober = Arc::new(HttpProber::new(client.clone(), config.prober.timeout()));
        Ok(Self::with_prober(config, client, prober))
    }

    /// Builds the state around an existing client and prober
    pub fn with_prober(config: Config, client: Client, prober: Arc<dyn LinkProber>) -> Self {
        Self {
            config: Arc::new(config),
            client,
            prober,
        }
    }
}

/// Request body of `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

/// An error on its way to becoming an HTTP response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<AnalyzerError> for ApiError {
    fn from(error: AnalyzerError) -> Self {
        Self {
            status: status_for(&error),
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            status_code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Maps an analysis failure to the status reported to the caller
pub fn status_for(error: &AnalyzerError) -> StatusCode {
    if error.is_client_error() {
        return StatusCode::BAD_REQUEST;
    }
    match error {
        AnalyzerError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Builds the service routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .with_state(state)
}

/// Binds `config.server.bind` and serves until `shutdown` resolves
pub async fn serve<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "server.listening");

    let state = AppState::new(config)?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("server.stopped");
    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn analyze(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> std::result::Result<Json<AnalyzeResult>, ApiError> {
    let Ok(Json(request)) = body else {
        tracing::info!("request.invalid_body");
        return Err(ApiError::bad_request("Invalid request body"));
    };
    if request.url.trim().is_empty() {
        tracing::info!("request.missing_url");
        return Err(ApiError::bad_request("Invalid request body"));
    }

    let result = analyze_page_with(
        &request.url,
        &state.config,
        &state.client,
        Arc::clone(&state.prober),
    )
    .await
    .map_err(|e| {
        let error = ApiError::from(e);
        let status = error.status.as_u16();
        if error.status.is_server_error() {
            tracing::error!(url = %request.url, status, error = %error.message, "request.failed");
        } else {
            tracing::warn!(url = %request.url, status, error = %error.message, "request.rejected");
        }
        error
    })?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_client_errors() {
        let error = AnalyzerError::InvalidUrl("ftp://x".to_string());
        assert_eq!(status_for(&error), StatusCode::BAD_REQUEST);

        let wrapped = AnalyzerError::Strategy {
            strategy: "links".to_string(),
            source: Box::new(AnalyzerError::InvalidUrl("x".to_string())),
        };
        assert_eq!(status_for(&wrapped), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_for_upstream_errors() {
        let cases = [
            AnalyzerError::Upstream {
                url: "https://example.com".to_string(),
                status: 503,
            },
            AnalyzerError::Unreachable {
                url: "https://example.com".to_string(),
                message: "refused".to_string(),
            },
            AnalyzerError::HtmlParse("bad".to_string()),
            AnalyzerError::Cancelled,
        ];
        for error in cases {
            assert_eq!(status_for(&error), StatusCode::BAD_GATEWAY, "{}", error);
        }

        let timeout = AnalyzerError::Timeout {
            url: "https://example.com".to_string(),
        };
        assert_eq!(status_for(&timeout), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_error_response_shape() {
        let response = ApiError::bad_request("Invalid request body").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
