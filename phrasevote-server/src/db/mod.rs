//! Database layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - Connection pool injected through handler state - no process-global engine
//! - List operations use JOINs - no N+1 queries
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Writes run on explicit transactions

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::create_pool;
pub use repos::*;

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for the DATABASE_URL-gated integration tests.

    use sqlx::PgPool;

    /// Pool against DATABASE_URL with migrations applied.
    pub async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = super::create_pool(&url).await.expect("pool creation failed");
        super::migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    /// Unique token so repeated runs never collide on `phrases.text`.
    pub fn unique_token() -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        format!("{nanos:x}")
    }

    async fn insert_phrase(pool: &PgPool, text: &str) -> i64 {
        let (id,): (i64,) = sqlx::query_as("INSERT INTO phrases (text) VALUES ($1) RETURNING id")
            .bind(text)
            .fetch_one(pool)
            .await
            .expect("phrase insert failed");
        id
    }

    async fn insert_pair(pool: &PgPool, a: i64, b: i64, active: bool) -> i64 {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO phrase_pairs (phrase_a_id, phrase_b_id, is_active) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(a)
        .bind(b)
        .bind(active)
        .fetch_one(pool)
        .await
        .expect("pair insert failed");
        id
    }

    /// Insert four fresh phrases and two pairs over them.
    /// Returns (active_pair_id, inactive_pair_id).
    pub async fn seed_two_pairs(pool: &PgPool) -> (i64, i64) {
        let token = unique_token();
        let a = insert_phrase(pool, &format!("phrase-a-{token}")).await;
        let b = insert_phrase(pool, &format!("phrase-b-{token}")).await;
        let c = insert_phrase(pool, &format!("phrase-c-{token}")).await;
        let d = insert_phrase(pool, &format!("phrase-d-{token}")).await;

        let active = insert_pair(pool, a, b, true).await;
        let inactive = insert_pair(pool, c, d, false).await;
        (active, inactive)
    }
}
