//! REST API endpoints for rights-impact classification

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{PolicyItem, ViolationAssessment, ViolationSummary};
use crate::service::AnalysisService;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ViolationReportRequest {
    pub items: Vec<PolicyItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ViolationReportResponse {
    /// One assessment per item, in request order
    pub assessments: Vec<ViolationAssessment>,
    pub summary: ViolationSummary,
}

/// Classify one dataset, bill or policy description
#[utoipa::path(
    post,
    path = "/v1/violations/classify",
    request_body = PolicyItem,
    responses(
        (status = 200, description = "Rights-impact assessment", body = ViolationAssessment),
        (status = 400, description = "Empty title", body = ErrorResponse)
    ),
    tag = "violations"
)]
#[post("/v1/violations/classify")]
pub async fn classify(
    service: web::Data<AnalysisService>,
    body: web::Json<PolicyItem>,
) -> Result<HttpResponse, ApiError> {
    let item = body.into_inner();
    if item.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }
    Ok(HttpResponse::Ok().json(service.classify_policy(&item)))
}

/// Classify many items and aggregate the results for a periodic report
#[utoipa::path(
    post,
    path = "/v1/violations/report",
    request_body = ViolationReportRequest,
    responses(
        (status = 200, description = "Assessments and aggregate counts", body = ViolationReportResponse)
    ),
    tag = "violations"
)]
#[post("/v1/violations/report")]
pub async fn report(
    service: web::Data<AnalysisService>,
    body: web::Json<ViolationReportRequest>,
) -> Result<HttpResponse, ApiError> {
    let (assessments, summary) = service.violation_report(&body.items);
    Ok(HttpResponse::Ok().json(ViolationReportResponse {
        assessments,
        summary,
    }))
}

/// Configure violation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(classify).service(report);
}
