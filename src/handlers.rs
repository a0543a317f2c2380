use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::errors::{AppError, ResultExt};
use crate::lead_models::{HealthResponse, InboundLead, LeadCreatedResponse, SalesforceLead};
use crate::salesforce_client::SalesforceClient;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the Salesforce REST API.
    pub salesforce: SalesforceClient,
    /// Cached Salesforce access token.
    pub credentials: CredentialProvider,
}

impl AppState {
    pub fn new(config: Config, salesforce: SalesforceClient) -> Self {
        Self {
            credentials: CredentialProvider::new(salesforce.clone()),
            config,
            salesforce,
        }
    }
}

/// Health check endpoint.
///
/// `salesforceConnected` reports whether a token is cached, not whether
/// Salesforce still accepts it.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            salesforce_connected: state.credentials.has_token().await,
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// POST /lead
///
/// Flow:
/// 1. Reject bodies that are not JSON (or too large) with the usual error body.
/// 2. Make sure an access token is cached (refresh if not).
/// 3. Resolve field aliases from the raw body.
/// 4. Normalize name, lead source and project type.
/// 5. Create the lead in Salesforce with assignment rules enabled.
///
/// Each request is a single attempt. A 401 from Salesforce drops the cached
/// token so the next request refreshes it.
#[utoipa::path(
    post,
    path = "/lead",
    tag = "leads",
    request_body = InboundLead,
    params(("x-api-key" = String, Header, description = "Shared API key")),
    responses(
        (status = 201, description = "Lead created and submitted for assignment",
            body = LeadCreatedResponse),
        (status = 400, description = "Body is not a JSON object or not sent as JSON",
            body = crate::errors::ErrorResponse),
        (status = 403, description = "Missing or invalid API key",
            body = crate::errors::ErrorResponse),
        (status = 413, description = "Body larger than 1 MiB",
            body = crate::errors::ErrorResponse),
        (status = 429, description = "Per-IP rate limit exceeded"),
        (status = 500, description = "Salesforce rejected the lead or was unreachable",
            body = crate::errors::ErrorResponse)
    )
)]
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<LeadCreatedResponse>), AppError> {
    tracing::info!("📨 Received lead submission");

    // Step 1: Decode
    let Json(body) = payload?;

    // Step 2: Access token
    let credentials = state.credentials.ensure_token().await.ok_or_else(|| {
        AppError::Authorization("Salesforce access token unavailable".to_string())
    })?;

    // Step 3-4: Parse and normalize
    let inbound = InboundLead::from_json(&body)?;
    let (lead, source) = SalesforceLead::from_inbound(&inbound);

    // Step 5: Create in Salesforce
    let start = std::time::Instant::now();
    let result = state
        .salesforce
        .create_lead(&credentials, &lead)
        .await
        .with_context(|| {
            format!(
                "Salesforce lead creation for {} {}",
                lead.first_name, lead.last_name
            )
        });

    let lead_id = match result {
        Ok(id) => id,
        Err(e) => {
            if e.is_session_expired() {
                state.credentials.invalidate(&credentials.access_token).await;
            }
            return Err(e);
        }
    };

    tracing::info!(
        "✅ Lead created in Salesforce: {} (source: {}{}, project: {}, {}ms)",
        lead_id,
        lead.lead_source,
        if source.unrecognized { " [fallback]" } else { "" },
        lead.project_type.as_deref().unwrap_or("unset"),
        start.elapsed().as_millis()
    );

    Ok((
        StatusCode::CREATED,
        Json(LeadCreatedResponse {
            success: true,
            lead_id,
            assigned_source: lead.lead_source,
            detected_project: lead.project_type,
        }),
    ))
}
