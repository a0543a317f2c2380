use std::time::Duration;
use url::Url;

const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";
const DEFAULT_API_VERSION: &str = "v59.0";

/// Connection settings for the Salesforce org.
#[derive(Debug, Clone)]
pub struct SalesforceConfig {
    pub login_url: Url,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub api_version: String,
}

/// Per-IP rate limit applied to the lead endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_key: String,
    pub http_timeout_secs: u64,
    pub rate_limit: Option<RateLimit>,
    pub salesforce: SalesforceConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let login_url = std::env::var("SALESFORCE_LOGIN_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string());

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            api_key: required_var("API_KEY")?,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a whole number"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
            rate_limit: rate_limit_from_env()?,
            salesforce: SalesforceConfig {
                login_url: parse_http_url("SALESFORCE_LOGIN_URL", &login_url)?,
                client_id: required_var("SALESFORCE_CLIENT_ID")?,
                client_secret: required_var("SALESFORCE_CLIENT_SECRET")?,
                refresh_token: required_var("SALESFORCE_REFRESH_TOKEN")?,
                api_version: std::env::var("SALESFORCE_API_VERSION")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            },
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Salesforce login URL: {}", config.salesforce.login_url);
        tracing::debug!("Salesforce API version: {}", config.salesforce.api_version);
        tracing::debug!("HTTP timeout: {}s", config.http_timeout_secs);
        match config.rate_limit {
            Some(limit) => tracing::debug!(
                "Rate limit: {}/s, burst {}",
                limit.per_second,
                limit.burst_size
            ),
            None => tracing::warn!("⚠️  Rate limiting disabled (RATE_LIMIT_PER_SECOND=0)"),
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Timeout applied to every outbound Salesforce call.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn required_var(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    Ok(value)
}

fn rate_limit_from_env() -> anyhow::Result<Option<RateLimit>> {
    let per_second: u64 = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a whole number"))?;
    let burst_size: u32 = std::env::var("RATE_LIMIT_BURST")
        .unwrap_or_else(|_| "20".to_string())
        .parse()
        .map_err(|_| anyhow::anyhow!("RATE_LIMIT_BURST must be a whole number"))?;

    if per_second == 0 {
        return Ok(None);
    }
    if burst_size == 0 {
        anyhow::bail!("RATE_LIMIT_BURST must be greater than zero");
    }

    Ok(Some(RateLimit {
        per_second,
        burst_size,
    }))
}

/// Parses `raw` as an absolute http(s) URL.
pub fn parse_http_url(name: &str, raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url_accepts_https() {
        let url = parse_http_url("SALESFORCE_LOGIN_URL", " https://test.salesforce.com ").unwrap();
        assert_eq!(url.host_str(), Some("test.salesforce.com"));
    }

    #[test]
    fn test_parse_http_url_rejects_other_schemes() {
        assert!(parse_http_url("SALESFORCE_LOGIN_URL", "ftp://login.salesforce.com").is_err());
        assert!(parse_http_url("SALESFORCE_LOGIN_URL", "login.salesforce.com").is_err());
    }
}
