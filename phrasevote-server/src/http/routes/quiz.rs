//! Quiz listing endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::repos::{ActivePair, PairRepo, PhraseTotals};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Quiz listing response
#[derive(Serialize)]
pub struct QuizResponse {
    pub pairs: Vec<PairResponse>,
}

/// One active pair with both phrases and the combined total
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairResponse {
    pub id: i64,
    pub phrase_a: PhraseResponse,
    pub phrase_b: PhraseResponse,
    pub total_votes: i64,
}

/// One phrase with its live vote total
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseResponse {
    pub id: i64,
    pub text: String,
    pub total_votes: i64,
}

impl From<PhraseTotals> for PhraseResponse {
    fn from(p: PhraseTotals) -> Self {
        Self {
            id: p.id,
            text: p.text,
            total_votes: p.total_votes,
        }
    }
}

impl From<ActivePair> for PairResponse {
    fn from(pair: ActivePair) -> Self {
        let total_votes = pair.phrase_a.total_votes + pair.phrase_b.total_votes;
        Self {
            id: pair.id,
            phrase_a: pair.phrase_a.into(),
            phrase_b: pair.phrase_b.into(),
            total_votes,
        }
    }
}

/// GET /quiz - all active pairs with vote totals (no pagination)
async fn list_quiz(State(state): State<Arc<AppState>>) -> Result<Json<QuizResponse>, ApiError> {
    let pairs = PairRepo::new(&state.pool).list_active().await?;

    Ok(Json(QuizResponse {
        pairs: pairs.into_iter().map(PairResponse::from).collect(),
    }))
}

/// Quiz routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/quiz", get(list_quiz))
}
