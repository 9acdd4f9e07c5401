//! Axum router and handlers for the solver service.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use dcsim_core::{solve_dc, DcReport, Error as SolveError, Netlist};

use crate::schema::HealthResponse;

pub struct HttpServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

/// Error envelope shared by every non-2xx response.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(
    status: StatusCode,
    code: &str,
    message: &str,
    details: Option<Vec<String>>,
) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                details,
            },
        },
    }
}

/// Map solver failures onto the HTTP surface. Structural netlist problems
/// are client errors; a failed factorization is unprocessable input.
fn solve_error(err: SolveError) -> ApiError {
    let (status, code) = match &err {
        SolveError::UnsolvableNetwork => (StatusCode::BAD_REQUEST, "UNSOLVABLE_NETWORK"),
        SolveError::InvalidComponent { .. } => (StatusCode::BAD_REQUEST, "INVALID_COMPONENT"),
        SolveError::SingularSystem { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "SINGULAR_SYSTEM"),
    };
    api_error(status, code, &err.to_string(), None)
}

pub fn build_router() -> Router {
    Router::new()
        .route("/simulate", post(simulate))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Liveness probe. Answers from the handler alone; the solver is never
/// invoked here.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn simulate(Json(netlist): Json<Netlist>) -> Result<Json<DcReport>, ApiError> {
    let report = solve_dc(&netlist).map_err(solve_error)?;
    Ok(Json(report))
}

pub async fn run(config: HttpServerConfig) -> Result<(), String> {
    let app = build_router();
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|err| format!("failed to bind {}: {err}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {err}"))
}
