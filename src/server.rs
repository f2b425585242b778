//! Scrape endpoint
//!
//! A minimal axum server exposing `GET /metrics` in the Prometheus
//! text exposition format. Binding happens before the sampling loops
//! start so that an unusable address is a startup error, not a silent
//! background failure. Shutdown is graceful under the shared token and
//! time-bounded by the supervisor.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{MonitorError, MonitorResult};
use crate::metrics::TemperatureMetrics;

/// How long the supervisor waits for in-flight scrapes after
/// cancellation before exiting anyway.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct MetricsServer {
    listener: TcpListener,
    router: Router,
}

impl MetricsServer {
    pub async fn bind(addr: SocketAddr, metrics: Arc<TemperatureMetrics>) -> io::Result<Self> {
        let router = Router::new()
            .route("/metrics", get(render_metrics))
            .with_state(metrics)
            .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr).await?;

        Ok(Self { listener, router })
    }

    /// Address actually bound, for logs and for tests binding port 0
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the token fires, then finish in-flight requests.
    pub async fn run(self, shutdown: CancellationToken) -> MonitorResult<()> {
        if let Ok(addr) = self.listener.local_addr() {
            info!("metrics endpoint listening on {addr}");
        }

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|source| MonitorError::Endpoint { source })
    }
}

async fn render_metrics(State(metrics): State<Arc<TemperatureMetrics>>) -> Response {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("failed to encode metrics: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
