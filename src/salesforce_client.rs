use crate::config::SalesforceConfig;
use crate::errors::AppError;
use crate::lead_models::SalesforceLead;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Header that makes Salesforce run the active lead assignment rule on insert.
pub const AUTO_ASSIGN_HEADER: &str = "Sforce-Auto-Assign";

/// Access token plus the org-specific REST host it is valid for.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredentials {
    pub access_token: String,
    pub instance_url: String,
}

impl std::fmt::Debug for AccessCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCredentials")
            .field("access_token", &"<redacted>")
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    instance_url: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateRecordResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SalesforceApiError {
    message: String,
}

/// Client for the Salesforce OAuth and REST endpoints.
#[derive(Clone)]
pub struct SalesforceClient {
    client: reqwest::Client,
    login_url: Url,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    api_version: String,
}

impl SalesforceClient {
    /// Creates a new `SalesforceClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - Org connection settings.
    /// * `timeout` - Upper bound for every request made by this client.
    pub fn new(config: &SalesforceConfig, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create Salesforce client: {}", e))
            })?;

        Ok(Self {
            client,
            login_url: config.login_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// # Returns
    ///
    /// * `Result<AccessCredentials, AppError>` - The token and instance URL.
    pub async fn refresh_access_token(&self) -> Result<AccessCredentials, AppError> {
        let url = self
            .login_url
            .join("/services/oauth2/token")
            .map_err(|e| AppError::InternalError(format!("Invalid token URL: {}", e)))?;
        tracing::info!("Refreshing Salesforce access token: {}", url);

        let response = self
            .client
            .post(url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Authorization(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Authorization(format!("Failed to read token response: {}", e)))?;

        let token: TokenResponse = serde_json::from_str(&body).map_err(|_| {
            AppError::Authorization(format!("Token endpoint returned {}: {}", status, body))
        })?;

        if !status.is_success() {
            let reason = token
                .error_description
                .or(token.error)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(AppError::Authorization(format!(
                "Token refresh failed {}: {}",
                status, reason
            )));
        }

        let access_token = token.access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            AppError::Authorization("Token response missing access_token".to_string())
        })?;
        let instance_url = token.instance_url.filter(|u| !u.is_empty()).ok_or_else(|| {
            AppError::Authorization("Token response missing instance_url".to_string())
        })?;

        Ok(AccessCredentials {
            access_token,
            instance_url,
        })
    }

    /// Creates a `Lead` record with assignment rules enabled.
    ///
    /// # Returns
    ///
    /// * `Result<String, AppError>` - The Salesforce id of the created lead.
    pub async fn create_lead(
        &self,
        credentials: &AccessCredentials,
        lead: &SalesforceLead,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/services/data/{}/sobjects/Lead",
            credentials.instance_url.trim_end_matches('/'),
            self.api_version
        );
        tracing::info!(
            "Creating lead in Salesforce: {} {} ({})",
            lead.first_name,
            lead.last_name,
            lead.lead_source
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&credentials.access_token)
            .header(AUTO_ASSIGN_HEADER, "TRUE")
            .json(lead)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Failed to create lead: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = describe_api_error(&error_text);
            return Err(if status == StatusCode::UNAUTHORIZED {
                AppError::SessionExpired(message)
            } else {
                AppError::ExternalApiError(message)
            });
        }

        let created: CreateRecordResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse lead creation response: {}", e))
        })?;

        let lead_id = created.id.ok_or_else(|| {
            AppError::ExternalApiError("Lead creation response missing 'id' field".to_string())
        })?;

        tracing::info!("✓ Lead created successfully: {}", lead_id);
        Ok(lead_id)
    }
}

/// Reduces a Salesforce error body to its messages.
///
/// REST errors arrive as `[{"message": ..., "errorCode": ...}]`; anything else
/// is returned as-is.
pub fn describe_api_error(body: &str) -> String {
    match serde_json::from_str::<Vec<SalesforceApiError>>(body) {
        Ok(errors) if !errors.is_empty() => errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.trim().to_string(),
    }
}
