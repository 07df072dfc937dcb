//! Vote submission endpoint
//!
//! Validation order, first failure wins:
//! 1. body deserializes with integer ids (400)
//! 2. session id non-empty, <= 128 chars (400)
//! 3. pair exists (404)
//! 4. selected phrase belongs to the pair (400)
//! 5. insert - duplicate (pair, session) surfaces as 409
//!
//! The pre-insert pair lookup only shapes the 404/400 responses; the
//! unique constraint on the insert is the arbiter under concurrency.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;

use crate::db::repos::{PairRepo, VoteRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{SessionId, ValidationError};

/// Vote submission request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub phrase_pair_id: i64,
    pub selected_phrase_id: i64,
    pub session_id: String,
}

/// POST /vote - record one session's choice for a pair
async fn submit_vote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    // Malformed bodies (bad JSON, missing fields, non-integer ids) are 400,
    // not axum's default 422.
    let Json(req) = payload.map_err(|rejection| {
        ValidationError::Malformed {
            field: "body",
            reason: rejection.body_text(),
        }
    })?;

    let session = SessionId::new(&req.session_id)?;

    let pair = PairRepo::new(&state.pool).get(req.phrase_pair_id).await?;

    if !pair.contains(req.selected_phrase_id) {
        return Err(ValidationError::PhraseNotInPair {
            phrase_id: req.selected_phrase_id,
            pair_id: pair.id,
        }
        .into());
    }

    VoteRepo::new(&state.pool)
        .record(pair.id, req.selected_phrase_id, &session)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Vote routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/vote", post(submit_vote))
}
