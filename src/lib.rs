pub mod admin;
pub mod auth;
pub mod chirps;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod users;
pub mod webhooks;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, RefreshTokenRepository, TokenSecret};
use chirps::ChirpRepository;
use config::Config;
use metrics::ServerMetrics;
use users::UserRepository;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        users::handlers::create_user_handler,
        users::handlers::update_user_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
        auth::handlers::revoke_handler,
        chirps::handlers::create_chirp_handler,
        chirps::handlers::list_chirps_handler,
        chirps::handlers::get_chirp_handler,
        chirps::handlers::delete_chirp_handler,
        webhooks::polka_webhook_handler,
    ),
    components(
        schemas(
            users::UserCredentials,
            users::UserResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::TokenResponse,
            chirps::Chirp,
            chirps::CreateChirpRequest,
            webhooks::PolkaEvent,
            webhooks::PolkaEventData,
        )
    ),
    tags(
        (name = "users", description = "Account registration and updates"),
        (name = "auth", description = "Login, token refresh and revocation"),
        (name = "chirps", description = "Posting and reading chirps"),
        (name = "webhooks", description = "Payment provider callbacks")
    ),
    info(
        title = "Chirpy API",
        version = "0.1.0",
        description = "Microblogging backend with access and refresh token authentication"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthService>,
    pub users: UserRepository,
    pub chirps: ChirpRepository,
    pub refresh_tokens: RefreshTokenRepository,
    pub metrics: ServerMetrics,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, auth: AuthService) -> Self {
        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            users: UserRepository::new(db.clone()),
            chirps: ChirpRepository::new(db.clone()),
            refresh_tokens: RefreshTokenRepository::new(db),
            metrics: ServerMetrics::new(),
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for TokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.config.jwt_secret.clone()
    }
}

async fn healthz() -> &'static str {
    "OK\n"
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let fileserver = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.fileserver_root))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            metrics::track_fileserver_hits,
        ));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(fileserver)
        .route("/api/healthz", get(healthz))
        .route(
            "/api/users",
            post(users::create_user_handler).put(users::update_user_handler),
        )
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler))
        .route(
            "/api/chirps",
            post(chirps::create_chirp_handler).get(chirps::list_chirps_handler),
        )
        .route(
            "/api/chirps/:chirp_id",
            get(chirps::get_chirp_handler).delete(chirps::delete_chirp_handler),
        )
        .route("/api/polka/webhooks", post(webhooks::polka_webhook_handler))
        .route("/admin/metrics", get(admin::metrics_handler))
        .route("/admin/reset", post(admin::reset_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
