// Admin endpoints: file server metrics and the development reset

use axum::{extract::State, response::Html};

use crate::{auth::RefreshTokenStore, config::Platform, error::ApiError, AppState};

fn metrics_page(hits: u64) -> String {
    format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        hits
    )
}

/// GET /admin/metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Html<String> {
    Html(metrics_page(state.metrics.fileserver_hits()))
}

/// POST /admin/reset
///
/// Development only: zeroes the hit counter and wipes users, chirps and
/// refresh tokens.
pub async fn reset_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    if state.config.platform != Platform::Dev {
        return Err(ApiError::Forbidden(
            "Reset is only allowed in the dev environment".to_string(),
        ));
    }

    state.metrics.reset();
    let tokens = state.refresh_tokens.purge().await?;
    let users = state.users.delete_all().await?;

    tracing::info!(
        "Reset: cleared hit counter, {} refresh tokens and {} users",
        tokens,
        users
    );
    Ok(format!(
        "Hits: {}\nDeleted {} users.\n",
        state.metrics.fileserver_hits(),
        users
    ))
}
