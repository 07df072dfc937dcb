//! Phrase pair repository
//!
//! Handles the quiz read path:
//! - list_active: active pairs with per-phrase vote totals (single query)
//! - get: pair lookup for vote validation

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};

use super::DbError;

/// Phrase pair record from database
#[derive(Debug, Clone, FromRow)]
pub struct PhrasePair {
    pub id: i64,
    pub phrase_a_id: i64,
    pub phrase_b_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PhrasePair {
    /// Whether the given phrase is one of the pair's two options.
    pub fn contains(&self, phrase_id: i64) -> bool {
        phrase_id == self.phrase_a_id || phrase_id == self.phrase_b_id
    }
}

/// One side of an active pair with its live vote total
#[derive(Debug, Clone)]
pub struct PhraseTotals {
    pub id: i64,
    pub text: String,
    pub total_votes: i64,
}

/// Active pair with both phrases resolved, for the quiz listing
#[derive(Debug, Clone)]
pub struct ActivePair {
    pub id: i64,
    pub phrase_a: PhraseTotals,
    pub phrase_b: PhraseTotals,
}

/// Phrase pair repository
pub struct PairRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PairRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active pairs with both phrase texts and live vote totals.
    ///
    /// Single query: pairs joined to both phrases, totals via a grouped
    /// LEFT JOIN over votes (no N+1). Totals are recomputed from `votes`
    /// on every call rather than read from the materialized view.
    pub async fn list_active(&self) -> Result<Vec<ActivePair>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                pp.id AS pair_id,
                pa.id AS phrase_a_id,
                pa.text AS phrase_a_text,
                COALESCE(ca.total, 0) AS phrase_a_votes,
                pb.id AS phrase_b_id,
                pb.text AS phrase_b_text,
                COALESCE(cb.total, 0) AS phrase_b_votes
            FROM phrase_pairs pp
            JOIN phrases pa ON pa.id = pp.phrase_a_id
            JOIN phrases pb ON pb.id = pp.phrase_b_id
            LEFT JOIN (
                SELECT selected_phrase_id, COUNT(*) AS total
                FROM votes
                GROUP BY selected_phrase_id
            ) ca ON ca.selected_phrase_id = pp.phrase_a_id
            LEFT JOIN (
                SELECT selected_phrase_id, COUNT(*) AS total
                FROM votes
                GROUP BY selected_phrase_id
            ) cb ON cb.selected_phrase_id = pp.phrase_b_id
            WHERE pp.is_active
            ORDER BY pp.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let pairs = rows
            .into_iter()
            .map(|row| ActivePair {
                id: row.get("pair_id"),
                phrase_a: PhraseTotals {
                    id: row.get("phrase_a_id"),
                    text: row.get("phrase_a_text"),
                    total_votes: row.get("phrase_a_votes"),
                },
                phrase_b: PhraseTotals {
                    id: row.get("phrase_b_id"),
                    text: row.get("phrase_b_text"),
                    total_votes: row.get("phrase_b_votes"),
                },
            })
            .collect();

        Ok(pairs)
    }

    /// Get a single pair by id.
    pub async fn get(&self, id: i64) -> Result<PhrasePair, DbError> {
        sqlx::query_as::<_, PhrasePair>(
            r#"
            SELECT id, phrase_a_id, phrase_b_id, is_active, created_at
            FROM phrase_pairs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "phrase pair",
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_matches_both_sides() {
        let pair = PhrasePair {
            id: 1,
            phrase_a_id: 10,
            phrase_b_id: 20,
            is_active: true,
            created_at: Utc::now(),
        };
        assert!(pair.contains(10));
        assert!(pair.contains(20));
        assert!(!pair.contains(30));
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p phrasevote-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_active_returns_only_active_pairs() {
        let pool = crate::db::test_support::pool().await;
        let (active, inactive) = crate::db::test_support::seed_two_pairs(&pool).await;

        let listed = PairRepo::new(&pool).list_active().await.expect("list failed");
        let ids: Vec<i64> = listed.iter().map(|p| p.id).collect();

        assert!(ids.contains(&active));
        assert!(!ids.contains(&inactive));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn totals_count_votes_per_phrase() {
        let pool = crate::db::test_support::pool().await;
        let (active, _) = crate::db::test_support::seed_two_pairs(&pool).await;

        let pair = PairRepo::new(&pool).get(active).await.expect("get failed");
        for session in ["s1", "s2", "s3"] {
            sqlx::query(
                "INSERT INTO votes (phrase_pair_id, selected_phrase_id, session_id) \
                 VALUES ($1, $2, $3)",
            )
            .bind(pair.id)
            .bind(pair.phrase_a_id)
            .bind(session)
            .execute(&pool)
            .await
            .expect("vote insert failed");
        }

        let listed = PairRepo::new(&pool).list_active().await.expect("list failed");
        let entry = listed.iter().find(|p| p.id == active).expect("pair missing");

        assert_eq!(entry.phrase_a.total_votes, 3);
        assert_eq!(entry.phrase_b.total_votes, 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_missing_pair_is_not_found() {
        let pool = crate::db::test_support::pool().await;

        let err = PairRepo::new(&pool).get(i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
