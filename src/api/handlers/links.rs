use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppQuery, JSend};
use crate::storage::models::LinkRecord;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub created_at: String,
    pub id: String,
    pub message_count: u64,
    pub owner_email: Option<String>,
    pub share_url: String,
    pub subdomain: String,
}

/// One page of the registry, in creation order.
#[derive(Debug, Serialize)]
pub struct LinksPage {
    pub items: Vec<LinkResponse>,
    pub pagination: Pagination,
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub links: Vec<LinkResponse>,
    pub poll_interval_seconds: u64,
    pub signed_in_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListLinksParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

// ============================================================================
// Handlers
// ============================================================================

/// Everything the generator screen shows: session, links and share URLs.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<DashboardResponse>>, ApiError> {
    let signed_in_email = state.session.current_email()?;
    let links = state
        .links
        .list_links()?
        .iter()
        .map(|link| link_to_response(&state, link))
        .collect();

    Ok(JSend::success(DashboardResponse {
        links,
        poll_interval_seconds: state.config.inbox.poll_interval_seconds,
        signed_in_email,
    }))
}

pub async fn list_links(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListLinksParams>,
) -> Result<Json<JSend<LinksPage>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }

    let links = state.links.list_links()?;
    let total = links.len() as u64;
    let items = links
        .iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .map(|link| link_to_response(&state, link))
        .collect();

    Ok(JSend::success(LinksPage {
        items,
        pagination: Pagination {
            limit: params.limit,
            offset: params.offset,
            total,
        },
        poll_interval_seconds: state.config.inbox.poll_interval_seconds,
    }))
}

/// Generate a new link, owned by the signed-in email if there is one.
pub async fn create_link(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<LinkResponse>>, ApiError> {
    let owner = state.session.current_email()?;
    let link = state.links.create_link(owner.as_deref())?;

    Ok(JSend::success(link_to_response(&state, &link)))
}

pub async fn get_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<LinkResponse>>, ApiError> {
    let link = state
        .links
        .find_link(&id)?
        .ok_or_else(|| ApiError::not_found("Link not found"))?;

    Ok(JSend::success(link_to_response(&state, &link)))
}

// ============================================================================
// Helpers
// ============================================================================

pub(super) fn link_to_response(state: &AppState, link: &LinkRecord) -> LinkResponse {
    LinkResponse {
        created_at: link.created_at.to_rfc3339(),
        id: link.id.clone(),
        message_count: link.message_count,
        owner_email: link.owner_email.clone(),
        share_url: link.share_url(&state.config.server.public_origin),
        subdomain: link.subdomain.clone(),
    }
}
