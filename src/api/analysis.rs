//! REST API endpoints for document analysis

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{AnalysisReport, DocumentInput};
use crate::service::AnalysisService;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchAnalyzeRequest {
    pub documents: Vec<DocumentInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchAnalyzeResponse {
    /// One report per submitted document, in submission order
    pub reports: Vec<AnalysisReport>,
}

/// Analyse a single document
#[utoipa::path(
    post,
    path = "/v1/analyze",
    request_body = DocumentInput,
    responses(
        (status = 200, description = "Analysis report", body = AnalysisReport),
        (status = 400, description = "Invalid document input", body = ErrorResponse),
        (status = 504, description = "Analysis deadline exceeded", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/v1/analyze")]
pub async fn analyze(
    service: web::Data<AnalysisService>,
    body: web::Json<DocumentInput>,
) -> Result<HttpResponse, ApiError> {
    let report = service.analyze(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Analyse several documents concurrently
///
/// All documents are validated before any analysis starts; one invalid document
/// rejects the whole batch.
#[utoipa::path(
    post,
    path = "/v1/analyze/batch",
    request_body = BatchAnalyzeRequest,
    responses(
        (status = 200, description = "Reports in submission order", body = BatchAnalyzeResponse),
        (status = 400, description = "A document in the batch is invalid", body = ErrorResponse),
        (status = 504, description = "Analysis deadline exceeded", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/v1/analyze/batch")]
pub async fn analyze_batch(
    service: web::Data<AnalysisService>,
    body: web::Json<BatchAnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    let documents = body.into_inner().documents;
    tracing::info!(documents = documents.len(), "Batch analysis requested");

    let reports = service.analyze_batch(documents).await?;
    Ok(HttpResponse::Ok().json(BatchAnalyzeResponse { reports }))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze).service(analyze_batch);
}
