// Server metrics
//
// Counts requests served by the static file server under /app.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

#[derive(Debug, Clone, Default)]
pub struct ServerMetrics {
    fileserver_hits: Arc<AtomicU64>,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fileserver_hit(&self) {
        self.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fileserver_hits(&self) -> u64 {
        self.fileserver_hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.fileserver_hits.store(0, Ordering::Relaxed);
    }
}

/// Middleware counting every request that reaches the file server,
/// whether or not the file exists
pub async fn track_fileserver_hits(
    State(metrics): State<ServerMetrics>,
    request: Request,
    next: Next,
) -> Response {
    metrics.record_fileserver_hit();
    next.run(request).await
}
