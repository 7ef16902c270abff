use crate::{
    config::Config,
    container::ServiceProvider,
    db::DbClient,
    errors::ApiError,
    Result,
};
use axum::{
    error_handling::HandleErrorLayer,
    http::{Method, StatusCode},
    routing::get,
    BoxError, Json, Router,
};
use std::{sync::Arc, time::Duration};
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use super::{handlers::health_check, index::index_document, minimal::map_minimal_endpoints};

/// Builds the application router: every registered minimal endpoint behind the
/// rate limiting stack, plus the index and health routes.
pub fn initialize_router(
    db: DbClient,
    provider: &ServiceProvider<DbClient>,
    config: &Config,
) -> Result<Router> {
    let error_handler = || {
        ServiceBuilder::new().layer(HandleErrorLayer::new(|err: BoxError| async move {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unhandled error: {}", err),
            )
        }))
    };

    let global_rate_limit = |req_per_sec: u64| {
        ServiceBuilder::new()
            .layer(error_handler())
            .layer(BufferLayer::new(1024))
            .layer(RateLimitLayer::new(req_per_sec, Duration::from_secs(1)))
    };

    let rate_limit_per_ip = |timeout: u64, limit: u32| -> Result<_> {
        let config = Box::new(
            GovernorConfigBuilder::default()
                .per_second(timeout)
                .burst_size(limit)
                .use_headers()
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| {
                    ApiError::Config(envy::Error::Custom(format!(
                        "invalid per-IP rate limit: {} request(s) per {}s",
                        limit, timeout
                    )))
                })?,
        );

        Ok(ServiceBuilder::new()
            .layer(error_handler())
            .layer(GovernorLayer {
                config: Box::leak(config),
            }))
    };

    let cors = || {
        ServiceBuilder::new().layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(Any),
        )
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let mapped = map_minimal_endpoints(provider, &db);
    info!(
        "Mapped {} versioned API(s) from {} endpoint(s)",
        mapped.apis().len(),
        provider.endpoint_count()
    );
    let index = Arc::new(index_document(mapped.apis()));

    let router = mapped
        .into_router()
        .layer(
            global_rate_limit(config.rate_limit_per_second)
                .layer(rate_limit_per_ip(1, config.rate_limit_per_ip_burst)?)
                .layer(cors())
                .layer(CompressionLayer::new().zstd(true)),
        )
        // Base routes
        .route(
            "/",
            get(move || {
                let index = Arc::clone(&index);
                async move { Json((*index).clone()) }
            }),
        )
        .route("/health", get(health_check))
        // Apply common middleware
        .layer(trace_layer)
        .with_state(db);

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::application_part, catalogs::products::features::test_support::unreachable_client,
        container::ServiceCollection,
    };
    use axum::{
        body::{Body, HttpBody},
        http::Request,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_config() -> Config {
        envy::from_iter::<_, Config>(vec![
            (
                "DATABASE_URL".to_string(),
                "postgres://127.0.0.1:1/catalogs".to_string(),
            ),
            ("REDIS_URL".to_string(), "redis://127.0.0.1:1".to_string()),
        ])
        .unwrap()
    }

    fn provider() -> ServiceProvider<DbClient> {
        let part = application_part();
        let mut services = ServiceCollection::new();
        services.add_minimal_endpoints(&part, &[]);
        services.build()
    }

    #[tokio::test]
    async fn test_index_lists_mapped_apis() {
        let router = initialize_router(unreachable_client(), &provider(), &test_config()).unwrap();

        let mut response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut bytes = Vec::new();
        while let Some(chunk) = response.body_mut().data().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        let index: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(index["apis"][0]["name"], "products");
        assert_eq!(
            index["apis"][0]["sub_routes"][0]["base_path"],
            "/api/v1/catalogs/products"
        );
    }

    #[tokio::test]
    async fn test_zero_ip_burst_is_rejected() {
        let mut config = test_config();
        config.rate_limit_per_ip_burst = 0;

        let result = initialize_router(unreachable_client(), &provider(), &config);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
