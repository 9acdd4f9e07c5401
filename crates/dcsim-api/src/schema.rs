//! Response payloads owned by the HTTP layer.

use serde::Serialize;

/// Liveness payload. Reporting it must never touch the solver.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
