use axum::{
    Json, Router,
    extract::{rejection::JsonRejection, FromRequest, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    catalog::CatalogClient,
    export::ExportBundle,
    imaging::{ImageError, ImageFetcher},
    models::{ApiResponse, ExportRequest, GenerateDescriptionRequest, GeneratedContent, OptimizeSeoRequest},
    pipeline::{ContentPipeline, PipelineError},
    seo,
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub pipeline: ContentPipeline,
    pub images: Arc<ImageFetcher>,
}

/// Failure envelope: `{"success": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => ApiError::new(StatusCode::BAD_REQUEST, msg),
            PipelineError::Model(e) => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::new(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"success": false, "error": self.message}))).into_response()
    }
}

/// `Json` whose rejections use the failure envelope instead of axum's plain-text body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .route("/api/products/:id/image", get(product_image))
        .route("/api/generate-description", post(generate_description))
        .route("/api/optimize-seo", post(optimize_seo))
        .route("/api/seo-metrics", post(seo_metrics))
        .route("/api/export", post(export_content))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy", "service": "E-commerce Product Generator"}))
}

pub async fn list_products(State(state): State<AppState>) -> Response {
    let products = state.catalog.fetch_products().await;
    Json(ApiResponse::ok(products)).into_response()
}

pub async fn get_product(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Response, ApiError> {
    let product = state.catalog
        .fetch_product_by_id(id)
        .await
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Product {} not found", id)))?;
    Ok(Json(ApiResponse::ok(product)).into_response())
}

pub async fn product_image(Path(id): Path<i64>, State(state): State<AppState>) -> Result<Response, ApiError> {
    let product = state.catalog
        .fetch_product_by_id(id)
        .await
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Product {} not found", id)))?;
    let url = product.image
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Product {} has no image", id)))?;
    let processed = state.images.fetch(&url).await?;
    Ok(Json(ApiResponse::ok(processed)).into_response())
}

pub async fn generate_description(
    State(state): State<AppState>,
    AppJson(body): AppJson<GenerateDescriptionRequest>,
) -> Result<Response, ApiError> {
    let product = body.product_data.unwrap_or_default();
    let options = body.options.unwrap_or_default();
    tracing::info!("🚀 Generating description (category: {})", body.category);

    let extraction = state.pipeline.generate_description(&product, &body.category, &options).await?;
    let degraded = extraction.is_degraded();
    Ok(Json(ApiResponse::generated(extraction.value, degraded)).into_response())
}

pub async fn optimize_seo(
    State(state): State<AppState>,
    AppJson(body): AppJson<OptimizeSeoRequest>,
) -> Result<Response, ApiError> {
    let content = body.content.unwrap_or_default();
    tracing::info!("🚀 Optimizing content for SEO ({} keywords)", body.keywords.len());

    let extraction = state.pipeline.optimize_seo(&content, &body.keywords).await?;
    let degraded = extraction.is_degraded();
    Ok(Json(ApiResponse::generated(extraction.value, degraded)).into_response())
}

pub async fn seo_metrics(AppJson(content): AppJson<GeneratedContent>) -> Response {
    Json(ApiResponse::ok(seo::analyze(&content))).into_response()
}

pub async fn export_content(AppJson(body): AppJson<ExportRequest>) -> Result<Response, ApiError> {
    let bundle = ExportBundle::from(body);
    let document = bundle.to_json()
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let disposition = format!("attachment; filename=\"{}\"", bundle.file_name());
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json".to_string()), (header::CONTENT_DISPOSITION, disposition)],
        document,
    )
        .into_response())
}
