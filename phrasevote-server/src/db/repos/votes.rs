//! Vote repository
//!
//! Records one vote per session per pair. The `uq_vote_pair_session`
//! constraint is the arbiter for concurrent duplicate submissions: the
//! insert either commits or surfaces a classified unique violation.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::SessionId;

use super::{classify, DbError};

/// Vote record from database
#[derive(Debug, Clone, FromRow)]
pub struct Vote {
    pub id: i64,
    pub phrase_pair_id: i64,
    pub selected_phrase_id: i64,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// Vote repository
pub struct VoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a vote inside a transaction.
    ///
    /// Commits on success; on any error the transaction guard drops and
    /// rolls back. A duplicate (pair, session) surfaces as
    /// `DbError::UniqueViolation` carrying the constraint name.
    pub async fn record(
        &self,
        phrase_pair_id: i64,
        selected_phrase_id: i64,
        session: &SessionId,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO votes (phrase_pair_id, selected_phrase_id, session_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(phrase_pair_id)
        .bind(selected_phrase_id)
        .bind(session.as_str())
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

        tx.commit().await?;
        Ok(())
    }

    /// Look up the vote a session cast for a pair, if any.
    pub async fn find_for_session(
        &self,
        phrase_pair_id: i64,
        session: &SessionId,
    ) -> Result<Option<Vote>, DbError> {
        let vote = sqlx::query_as::<_, Vote>(
            r#"
            SELECT id, phrase_pair_id, selected_phrase_id, session_id, created_at
            FROM votes
            WHERE phrase_pair_id = $1 AND session_id = $2
            "#,
        )
        .bind(phrase_pair_id)
        .bind(session.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(vote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::PairRepo;
    use crate::db::test_support;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p phrasevote-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn vote_round_trip() {
        let pool = test_support::pool().await;
        let (active, _) = test_support::seed_two_pairs(&pool).await;
        let pair = PairRepo::new(&pool).get(active).await.expect("get failed");

        let session = SessionId::new(&format!("rt-{}", test_support::unique_token())).unwrap();
        VoteRepo::new(&pool)
            .record(pair.id, pair.phrase_a_id, &session)
            .await
            .expect("record failed");

        let vote = VoteRepo::new(&pool)
            .find_for_session(pair.id, &session)
            .await
            .expect("lookup failed")
            .expect("vote missing");

        assert_eq!(vote.selected_phrase_id, pair.phrase_a_id);
        assert_eq!(vote.session_id, session.as_str());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_session_vote_is_unique_violation() {
        let pool = test_support::pool().await;
        let (active, _) = test_support::seed_two_pairs(&pool).await;
        let pair = PairRepo::new(&pool).get(active).await.expect("get failed");

        let session = SessionId::new(&format!("dup-{}", test_support::unique_token())).unwrap();
        let repo = VoteRepo::new(&pool);

        repo.record(pair.id, pair.phrase_b_id, &session)
            .await
            .expect("first vote failed");

        let err = repo
            .record(pair.id, pair.phrase_b_id, &session)
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { constraint } => {
                assert_eq!(constraint, "uq_vote_pair_session");
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn dangling_pair_is_constraint_violation() {
        let pool = test_support::pool().await;

        let session = SessionId::new("dangling").unwrap();
        let err = VoteRepo::new(&pool)
            .record(i64::MAX, i64::MAX, &session)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }
}
