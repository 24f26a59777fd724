//! REST API endpoint exposing the corroboration source registry

use actix_web::{HttpResponse, Responder, get, web};

use crate::model::SourceRegistry;
use crate::service::AnalysisService;

/// List the authoritative sources consulted during corroboration
#[utoipa::path(
    get,
    path = "/v1/sources",
    responses(
        (status = 200, description = "Registry version and entries", body = SourceRegistry)
    ),
    tag = "sources"
)]
#[get("/v1/sources")]
pub async fn list_sources(service: web::Data<AnalysisService>) -> impl Responder {
    HttpResponse::Ok().json(service.corroboration().registry())
}

/// Configure source registry routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_sources);
}
