//! Health check endpoints for Kubernetes liveness and readiness probes

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::service::{AnalysisService, LookupCache};

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    /// `healthy`, `unhealthy` or `disabled`
    pub cache: String,
    /// Which source lookup backend answers corroboration queries
    pub lookup_backend: String,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// The cache is optional: an unreachable Redis is reported but does not make the
/// service unready, since lookups fall through to the backend.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(
    service: web::Data<AnalysisService>,
    cache: web::Data<Option<LookupCache>>,
) -> impl Responder {
    let cache_status = match cache.as_ref() {
        Some(cache) => match cache.ping().await {
            Ok(()) => "healthy",
            Err(e) => {
                tracing::warn!(error = %e, "Cache health check failed");
                "unhealthy"
            }
        },
        None => "disabled",
    };

    HttpResponse::Ok().json(ReadinessStatus {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            cache: cache_status.to_string(),
            lookup_backend: service.corroboration().backend().to_string(),
        },
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::{App, test};

    use super::*;
    use crate::model::SourceFilterConfig;
    use crate::service::corroboration::default_registry;
    use crate::service::{ClaimRuleSet, CorroborationEngine, ViolationRuleSet};
    use crate::sources::NoLookup;

    #[actix_web::test]
    async fn test_liveness() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/health/live").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_readiness_without_cache() {
        let engine = CorroborationEngine::new(
            Arc::new(NoLookup),
            default_registry(),
            SourceFilterConfig::default(),
            Duration::from_secs(1),
        );
        let service = web::Data::new(AnalysisService::new(
            engine,
            ClaimRuleSet::default(),
            ViolationRuleSet::default(),
            Duration::from_secs(10),
        ));
        let cache: web::Data<Option<LookupCache>> = web::Data::new(None);
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(cache)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["dependencies"]["cache"], "disabled");
        assert_eq!(body["dependencies"]["lookup_backend"], "none");
    }
}
