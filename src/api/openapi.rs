//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::{analysis, error, health, sources, violations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Evidence Intel",
        description = "Evidence analysis for accountability research: entities, claims, corroboration, risk and rights-impact classification"
    ),
    paths(
        analysis::analyze,
        analysis::analyze_batch,
        violations::classify,
        violations::report,
        sources::list_sources,
        health::liveness,
        health::readiness,
    ),
    components(schemas(error::ErrorResponse)),
    tags(
        (name = "analysis", description = "Document analysis pipeline"),
        (name = "violations", description = "Rights-impact classification"),
        (name = "sources", description = "Corroboration source registry"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok().content_type("text/yaml").body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI YAML");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
