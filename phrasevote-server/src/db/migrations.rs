//! Database migrations for the phrase voting schema
//!
//! All statements are idempotent so the runner can execute on every startup.
//! Constraints carry explicit names: the vote insert path classifies
//! violations by constraint name, never by error message text.

use sqlx::PgPool;

use super::repos::DbError;

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    // Create phrases table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS phrases (
            id BIGSERIAL PRIMARY KEY,
            text TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create phrase_pairs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS phrase_pairs (
            id BIGSERIAL PRIMARY KEY,
            phrase_a_id BIGINT NOT NULL REFERENCES phrases(id) ON DELETE RESTRICT,
            phrase_b_id BIGINT NOT NULL REFERENCES phrases(id) ON DELETE RESTRICT,
            is_active BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT ck_phrase_pair_distinct CHECK (phrase_a_id <> phrase_b_id),
            CONSTRAINT uq_phrase_pair_unique_combination UNIQUE (phrase_a_id, phrase_b_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create votes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id BIGSERIAL PRIMARY KEY,
            phrase_pair_id BIGINT NOT NULL REFERENCES phrase_pairs(id) ON DELETE CASCADE,
            selected_phrase_id BIGINT NOT NULL REFERENCES phrases(id) ON DELETE RESTRICT,
            session_id TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT uq_vote_pair_session UNIQUE (phrase_pair_id, session_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;
    create_vote_count_view(pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_phrase_pairs_is_active ON phrase_pairs(is_active)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_selected_phrase ON votes(selected_phrase_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_phrase_pair ON votes(phrase_pair_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Aggregate vote counts per phrase, refreshed by a statement trigger on
/// `votes`. Request handlers never read or write this view - it exists for
/// external consumers (dashboards, exports). The refresh runs inside the
/// firing statement's transaction, so it cannot use CONCURRENTLY.
async fn create_vote_count_view(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE MATERIALIZED VIEW IF NOT EXISTS phrase_vote_counts AS
        SELECT
            v.selected_phrase_id AS phrase_id,
            COUNT(*) AS total_votes,
            MIN(v.created_at) AS created_at,
            MAX(v.created_at) AS updated_at
        FROM votes v
        GROUP BY v.selected_phrase_id
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_phrase_vote_counts_phrase \
         ON phrase_vote_counts(phrase_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION refresh_phrase_vote_counts() RETURNS trigger
        LANGUAGE plpgsql AS $$
        BEGIN
            REFRESH MATERIALIZED VIEW phrase_vote_counts;
            RETURN NULL;
        END;
        $$
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("DROP TRIGGER IF EXISTS trg_refresh_phrase_vote_counts ON votes")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER trg_refresh_phrase_vote_counts
        AFTER INSERT OR UPDATE OR DELETE ON votes
        FOR EACH STATEMENT EXECUTE FUNCTION refresh_phrase_vote_counts()
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
