//! HTTP front for the generated site.
//!
//! Serves the output directory and accepts quote requests from the contact
//! page at `relay.endpoint`:
//!
//! | Outcome              | Status | Body                                          |
//! |----------------------|--------|-----------------------------------------------|
//! | sent                 | 200    | `{"success": true, "message": …, "notice": …}`|
//! | malformed / invalid  | 400    | `{"success": false, "error": …, "notice": …}` |
//! | provider failure     | 502    | `{"success": false, "error": …, "notice": …}` |
//!
//! CORS is open to any origin so the form also works when the static site is
//! hosted elsewhere.

use crate::notice::Notice;
use crate::relay::{Mailer, QuoteRelay, QuoteRequest};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Site directory not found: {0} (run `build` first)")]
    MissingSite(String),
}

/// JSON answer of the relay endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// What the contact page should show.
    pub notice: Notice,
}

/// Build the router: relay endpoint, optional static site fallback.
pub fn router<M: Mailer + 'static>(
    relay: QuoteRelay<M>,
    endpoint: &str,
    site_dir: Option<&Path>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    let mut app = Router::new()
        .route(endpoint, post(send_quote_request::<M>))
        .with_state(Arc::new(relay));
    if let Some(dir) = site_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(cors).layer(TraceLayer::new_for_http())
}

async fn send_quote_request<M: Mailer + 'static>(
    State(relay): State<Arc<QuoteRelay<M>>>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> (StatusCode, Json<RelayResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected quote request body");
            return failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match relay.relay(&request).await {
        Ok(_) => (
            StatusCode::OK,
            Json(RelayResponse {
                success: true,
                message: Some("Quote request sent successfully".to_string()),
                error: None,
                notice: Notice::quote_sent(),
            }),
        ),
        Err(e) if e.is_invalid_request() => {
            tracing::warn!(error = %e, "invalid quote request");
            failure(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "error sending quote request");
            failure(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

fn failure(status: StatusCode, error: String) -> (StatusCode, Json<RelayResponse>) {
    (
        status,
        Json(RelayResponse {
            success: false,
            message: None,
            error: Some(error),
            notice: Notice::quote_failed(),
        }),
    )
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}

/// Resolves once `signal` fires or fails to install.
async fn shutdown_signal(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal, shutting down"),
    }
}
