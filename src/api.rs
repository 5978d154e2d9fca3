use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    clients::{database::DatabaseClient, health::HealthChecker, llm::LlmClient},
    config::Config,
    handlers::{generation, health, landing_page, metadata},
    models::response::ApiResponse,
};

pub struct AppState {
    pub config: Config,
    pub database_client: Arc<DatabaseClient>,
    pub llm_client: LlmClient,
    pub health_checker: HealthChecker,
}

impl AppState {
    pub fn new(
        config: Config,
        database_client: Arc<DatabaseClient>,
        llm_client: LlmClient,
    ) -> Self {
        let health_checker = HealthChecker::new(database_client.clone(), llm_client.clone());

        Self {
            config,
            database_client,
            llm_client,
            health_checker,
        }
    }
}

/// Error returned by handlers, rendered as a failed `ApiResponse`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = %e, "Request failed");
        Self::internal("Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reason = self
            .status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();

        let body = ApiResponse::<()>::error(self.message, reason);

        (self.status, Json(body)).into_response()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api", post(generation::generate_story))
        .route("/api/generate-metadata", post(metadata::generate_metadata))
        .route("/api/templates", get(landing_page::list_templates))
        .route(
            "/lp/generate/{id}",
            get(landing_page::get_page_builder).post(landing_page::create_landing_page),
        )
        .route("/lp/dashboard", get(landing_page::get_dashboard))
        .route("/lp/share/{share_id}", get(landing_page::view_shared_page))
        .route("/lp/{id}", get(landing_page::get_landing_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", state.config.server_port);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "HTTP server started");

    axum::serve(listener, app).await?;

    Ok(())
}
