//! DTOs for health and liveness endpoints.

use serde::{Deserialize, Serialize};

/// Health check response with component status.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub store: CheckStatus,
    pub allocator: CheckStatus,
    pub cache: CheckStatus,
    pub hit_queue: CheckStatus,
}

/// Individual component health status.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn from_probe(healthy: bool, ok: impl Into<String>, failed: impl Into<String>) -> Self {
        if healthy {
            Self {
                status: "ok".to_string(),
                message: Some(ok.into()),
            }
        } else {
            Self {
                status: "error".to_string(),
                message: Some(failed.into()),
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Liveness response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}
