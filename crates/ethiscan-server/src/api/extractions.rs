use axum::{extract::State, Extension, Json};
use ethiscan_core::{CachedExtraction, ProductRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{run_extraction, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzePageRequest {
    url: String,
    html: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzePageData {
    product: ProductRecord,
    analysis: Value,
}

pub(super) async fn last_extraction(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<CachedExtraction>>, ApiError> {
    let entry = state
        .orchestrator
        .cache()
        .last()
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "no extraction yet"))?;

    Ok(Json(ApiResponse {
        data: entry,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Extracts the posted page and forwards the record to the configured
/// analysis endpoint.
pub(super) async fn analyze_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzePageRequest>,
) -> Result<Json<ApiResponse<AnalyzePageData>>, ApiError> {
    let report = run_extraction(&state, body.url, body.html).await;
    if !report.success {
        return Err(ApiError::new(
            req_id.0,
            "extraction_failed",
            "product data could not be extracted from the page",
        ));
    }

    let analysis = state
        .client
        .analyze(&state.config.analyze_endpoint, &report.record)
        .await
        .map_err(|e| {
            tracing::warn!(
                endpoint = %state.config.analyze_endpoint,
                error = %e,
                "analysis request failed"
            );
            ApiError::new(req_id.0.clone(), "upstream_error", e.to_string())
        })?;

    Ok(Json(ApiResponse {
        data: AnalyzePageData {
            product: report.record,
            analysis,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
