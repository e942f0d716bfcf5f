use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::Session;
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub signed_in: bool,
    pub selected_company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SelectCompanyRequest {
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub access_token: String,
    pub user_id: Option<String>,
}

fn snapshot(state: &AppState) -> ContextResponse {
    ContextResponse {
        signed_in: state.context.is_signed_in(),
        selected_company_id: state.context.selected_company(),
    }
}

pub async fn get_context(State(state): State<AppState>) -> Json<ContextResponse> {
    Json(snapshot(&state))
}

pub async fn select_company(
    State(state): State<AppState>,
    Json(payload): Json<SelectCompanyRequest>,
) -> Json<ContextResponse> {
    state.context.select_company(payload.company_id);
    Json(snapshot(&state))
}

/// Store an opaque access token obtained elsewhere
pub async fn set_session(
    State(state): State<AppState>,
    Json(payload): Json<SessionRequest>,
) -> AppResult<Json<ContextResponse>> {
    if payload.access_token.trim().is_empty() {
        return Err(AppError::BadRequest("access_token must not be empty".to_string()));
    }

    let mut session = Session::new(payload.access_token);
    if let Some(user_id) = payload.user_id {
        session = session.with_user_id(user_id);
    }
    state.context.set_session(Some(session));

    Ok(Json(snapshot(&state)))
}

pub async fn clear_session(State(state): State<AppState>) -> StatusCode {
    state.context.set_session(None);
    StatusCode::NO_CONTENT
}
