//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::error::{ApiError, ErrorBody, ErrorResponse};
use crate::api::health::HealthStatus;
use crate::model::{
    AnalysisRequest, AnalysisResponse, CategoryContradictionDto, ContradictionDto, Severity,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Statement Contradictions API",
        description = "Groups statements into semantic categories and reports contradictions within each category"
    ),
    paths(crate::api::analysis::analyze, crate::api::health::health),
    components(schemas(
        AnalysisRequest,
        AnalysisResponse,
        CategoryContradictionDto,
        ContradictionDto,
        Severity,
        ErrorResponse,
        ErrorBody,
        HealthStatus
    )),
    tags(
        (name = "analysis", description = "Statement classification and contradiction detection"),
        (name = "health", description = "Service health")
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
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(format!("Failed to render OpenAPI YAML: {}", e)))?;

    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
