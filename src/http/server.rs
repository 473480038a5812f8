//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all front controller
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind server to listener with graceful shutdown
//! - Snapshot each request into RequestFacts and hand it to the App
//!
//! # Design Decisions
//! - Handlers are synchronous and may do file I/O (page cache, views), so
//!   `App::respond` runs on tokio's blocking pool, never on a worker thread

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::App;
use crate::http::request::RequestFacts;
use crate::observability::metrics;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// HTTP server fronting an [`App`].
pub struct HttpServer {
    router: Router,
    app: Arc<App>,
}

impl HttpServer {
    /// Create a new HTTP server. The app's routes are frozen from here on.
    pub fn new(app: App) -> Self {
        let app = Arc::new(app);
        let router = Self::build_router(app.clone());
        Self { router, app }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(app: Arc<App>) -> Router {
        let max_body_size = app.config().limits.max_body_size;
        let request_timeout = Duration::from_secs(app.config().timeouts.request_secs);

        Router::new()
            .fallback(front_controller)
            .with_state(app)
            .layer(RequestBodyLimitLayer::new(max_body_size))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A clone of the fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            app = %self.app.settings().name,
            routes = self.app.routes().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: buffer the body, snapshot the request, dispatch.
async fn front_controller(State(app): State<Arc<App>>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();

    let request_id = parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = parts.method.to_string();

    let body = match axum::body::to_bytes(body, app.config().limits.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            metrics::record_request(&method, 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let facts = RequestFacts::from_parts(&parts, &body);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %facts.path(),
        "Dispatching request"
    );

    let response = match tokio::task::spawn_blocking(move || app.respond(facts)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Handler panicked or was cancelled"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "500 Error").into_response()
        }
    };
    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}
