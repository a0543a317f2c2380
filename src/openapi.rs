use axum::Json;
use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::lead_models::{HealthResponse, InboundLead, LeadCreatedResponse};

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::submit_lead, crate::handlers::health),
    components(schemas(InboundLead, LeadCreatedResponse, HealthResponse, ErrorResponse)),
    tags(
        (name = "leads", description = "Lead intake and Salesforce submission"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn serve_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
