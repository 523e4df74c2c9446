//! Response types shared by the JSON handlers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Failed login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginErrorResponse {
    #[schema(example = "Login failed")]
    pub error: String,
    /// Failure category
    #[schema(example = "invalid_credentials")]
    pub code: String,
}

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out")]
    pub message: String,
}
