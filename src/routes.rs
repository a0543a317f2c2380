use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::auth::require_api_key;
use crate::handlers::{self, AppState};
use crate::openapi::serve_openapi_spec;

/// Largest lead payload accepted, in bytes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the application router.
///
/// `/lead` sits behind the API key check, the body size limit and, when
/// configured, per-IP rate limiting. `/health` and the OpenAPI document are
/// public.
pub fn router(state: Arc<AppState>) -> Router {
    let mut lead_routes = Router::new()
        .route("/lead", post(handlers::submit_lead))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    if let Some(limit) = state.config.rate_limit {
        match GovernorConfigBuilder::default()
            .per_second(limit.per_second)
            .burst_size(limit.burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
        {
            Some(config) => {
                lead_routes = lead_routes.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => tracing::warn!("⚠️  Invalid rate limit settings, rate limiting disabled"),
        }
    }

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(serve_openapi_spec))
        .merge(lead_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
