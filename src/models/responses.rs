use serde::{Deserialize, Serialize};

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the store does not answer
    pub status: String,
    #[serde(rename = "storeReachable")]
    pub store_reachable: bool,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// JSON body shared by every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
