//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context and configuration.

use std::sync::Arc;

use vidshare_common::AppConfig;
use vidshare_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("config", &"AppConfig")
            .finish()
    }
}

#[cfg(any(test, feature = "testing"))]
impl AppState {
    /// State over the in-memory stores, with a development configuration
    pub fn memory(backend: &vidshare_core::testing::MemoryBackend, jwt_secret: &str) -> Self {
        use vidshare_common::JwtService;
        use vidshare_service::ServiceContextBuilder;

        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "app": { "env": "development" },
            "api": { "port": 0 },
            "database": { "url": "postgresql://unused" },
            "redis": { "url": "redis://unused" },
            "jwt": { "secret": jwt_secret },
            "engagement": { "reconcile_timeout_ms": 500 },
            "rate_limit": { "requests_per_second": 1000, "burst": 1000 },
            "cors": {},
            "snowflake": { "worker_id": 1 },
        }))
        .expect("static test configuration");

        let context = ServiceContextBuilder::memory(backend)
            .jwt_service(Arc::new(JwtService::new(
                jwt_secret,
                config.jwt.access_token_expiry,
            )))
            .reconcile_timeout(config.engagement.reconcile_timeout())
            .build()
            .expect("memory context has every dependency");

        Self::new(context, config)
    }
}
