//! OpenAPI document for the Portico JSON API

use axum::response::Json;
use utoipa::OpenApi;

use crate::handlers::{HealthResponse, LoginErrorResponse, MessageResponse};
use portico_core::{LoginRequest, Session, User, UserId};

/// OpenAPI document for the Portico JSON API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portico API",
        version = "0.1.0",
        description = "Session proxy for the upstream authentication API",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Health endpoints
        crate::handlers::health_check,

        // Session proxy
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::current_user,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            Session,
            User,
            UserId,
            LoginErrorResponse,
            MessageResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Login, logout and session inspection"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Get the OpenAPI document as pretty-printed JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}
