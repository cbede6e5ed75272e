//! Inbound message endpoint: one JSON message per request, dispatched on its
//! `action` tag.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use ethiscan_extractor::MessageReply;
use serde::Deserialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{run_extraction, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub(super) enum InboundMessage {
    ExtractProductData { url: String, html: String },
    GetLastExtraction,
}

pub(super) async fn handle_message(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageReply>, ApiError> {
    let Json(payload) = payload
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let message = serde_json::from_value::<InboundMessage>(payload).map_err(|e| {
        tracing::debug!(error = %e, "rejecting inbound message");
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("unsupported message: {e}"),
        )
    })?;

    let reply = match message {
        InboundMessage::ExtractProductData { url, html } => {
            run_extraction(&state, url, html).await.into_reply()
        }
        InboundMessage::GetLastExtraction => {
            let last = state.orchestrator.cache().last();
            MessageReply {
                success: last.is_some(),
                data: last.map(|entry| entry.record),
            }
        }
    };

    Ok(Json(reply))
}
