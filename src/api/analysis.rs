//! REST API endpoint for statement contradiction analysis

use actix_web::{HttpResponse, post, web};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{AnalysisRequest, AnalysisResponse};
use crate::service::AnalyzeTextUseCase;

/// Classify statements and detect contradictions within each category
#[utoipa::path(
    post,
    path = "/v1/analyze",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis completed", body = AnalysisResponse),
        (status = 422, description = "Request body is not a list of sentences", body = ErrorResponse),
        (status = 500, description = "Analysis failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/v1/analyze")]
pub async fn analyze(
    use_case: web::Data<AnalyzeTextUseCase>,
    request: web::Json<AnalysisRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    tracing::debug!(sentences = request.sentences.len(), "Received analysis request");

    let response = use_case.execute(request).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// JSON extractor configuration rendering body errors in the API error format
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ApiError::from(err).into())
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(analyze);
}
