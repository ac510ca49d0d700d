use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::links::{link_to_response, LinkResponse};
use crate::api::response::{ApiError, AppJson, JSend};
use crate::storage::models::{link_id_from_subdomain, MessageRecord};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub content: String,
    pub id: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitMessageResponse {
    pub delivered: bool,
    pub message_id: String,
}

#[derive(Debug, Serialize)]
pub struct InboxResponse {
    pub link: LinkResponse,
    pub messages: Vec<MessageResponse>,
    pub poll_interval_seconds: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// Public submission form. The route carries the subdomain token, not the id.
/// Route: POST /message/:subdomain
pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    Path(subdomain): Path<String>,
    AppJson(req): AppJson<SubmitMessageRequest>,
) -> Result<Json<JSend<SubmitMessageResponse>>, ApiError> {
    let link_id = link_id_from_subdomain(&subdomain);
    let message = state.messages.append_message(link_id, &req.content)?;

    Ok(JSend::success(SubmitMessageResponse {
        delivered: true,
        message_id: message.id,
    }))
}

/// Owner's inbox: the link and its messages, newest first.
/// Route: GET /messages/:link_id
pub async fn get_inbox(
    State(state): State<Arc<AppState>>,
    Path(link_id): Path<String>,
) -> Result<Json<JSend<InboxResponse>>, ApiError> {
    let link = state
        .links
        .find_link(&link_id)?
        .ok_or_else(|| ApiError::not_found("Link not found"))?;

    let messages = state
        .messages
        .list_messages(&link.id)?
        .iter()
        .map(message_to_response)
        .collect();

    Ok(JSend::success(InboxResponse {
        link: link_to_response(&state, &link),
        messages,
        poll_interval_seconds: state.config.inbox.poll_interval_seconds,
    }))
}

// ============================================================================
// Helpers
// ============================================================================

fn message_to_response(message: &MessageRecord) -> MessageResponse {
    MessageResponse {
        content: message.content.clone(),
        id: message.id.clone(),
        timestamp: message.timestamp.to_rfc3339(),
    }
}
