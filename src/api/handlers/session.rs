use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, JSend};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub email: Option<String>,
    pub signed_in: bool,
}

impl SessionResponse {
    fn from_email(email: Option<String>) -> Self {
        Self {
            signed_in: email.is_some(),
            email,
        }
    }
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<SessionResponse>>, ApiError> {
    let email = state.session.current_email()?;
    Ok(JSend::success(SessionResponse::from_email(email)))
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SignInRequest>,
) -> Result<Json<JSend<SessionResponse>>, ApiError> {
    let email = state.session.sign_in(&req.email)?;
    Ok(JSend::success(SessionResponse::from_email(Some(email))))
}

pub async fn sign_out(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<SessionResponse>>, ApiError> {
    state.session.sign_out()?;
    Ok(JSend::success(SessionResponse::from_email(None)))
}
