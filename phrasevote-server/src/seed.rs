//! Seed loader for sample phrases, pairs, and votes
//!
//! Reads three CSV files and inserts rows keyed by primary id with
//! `ON CONFLICT (id) DO NOTHING`, so re-running against a seeded database
//! is a no-op. All inserts for one run share a single transaction.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

/// Seed file error type
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Rows inserted per entity by one loader run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub phrases: u64,
    pub phrase_pairs: u64,
    pub votes: u64,
}

#[derive(Debug, Deserialize)]
struct PhraseRecord {
    id: i64,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct PairRecord {
    id: i64,
    phrase_a_id: i64,
    phrase_b_id: i64,
    #[serde(deserialize_with = "bool_case_insensitive")]
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct VoteRecord {
    id: i64,
    phrase_pair_id: i64,
    selected_phrase_id: i64,
    session_id: String,
    created_at: DateTime<Utc>,
}

/// `is_active` comes from hand-edited CSVs; accept any casing of true/false.
fn bool_case_insensitive<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean '{other}', expected true or false"
        ))),
    }
}

fn read_records<T>(path: &Path) -> Result<Vec<T>, SeedError>
where
    T: for<'de> Deserialize<'de>,
{
    let reader = csv::Reader::from_path(path).map_err(|source| SeedError::Csv {
        path: path.to_owned(),
        source,
    })?;

    reader
        .into_deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| SeedError::Csv {
            path: path.to_owned(),
            source,
        })
}

/// Load `phrases.csv`, `phrase_pairs.csv`, and `votes.csv` from `dir`.
///
/// All three files are parsed before the transaction opens, so a malformed
/// file leaves the database untouched. After loading, each table's id
/// sequence is bumped past the seeded maximum so live inserts don't collide
/// with seeded ids.
pub async fn load_dir(pool: &PgPool, dir: &Path) -> Result<SeedSummary, SeedError> {
    let phrases: Vec<PhraseRecord> = read_records(&dir.join("phrases.csv"))?;
    let pairs: Vec<PairRecord> = read_records(&dir.join("phrase_pairs.csv"))?;
    let votes: Vec<VoteRecord> = read_records(&dir.join("votes.csv"))?;

    let mut summary = SeedSummary::default();
    let mut tx = pool.begin().await?;

    for record in &phrases {
        let result = sqlx::query(
            "INSERT INTO phrases (id, text, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(record.id)
        .bind(&record.text)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;
        summary.phrases += result.rows_affected();
    }

    for record in &pairs {
        let result = sqlx::query(
            "INSERT INTO phrase_pairs (id, phrase_a_id, phrase_b_id, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
        )
        .bind(record.id)
        .bind(record.phrase_a_id)
        .bind(record.phrase_b_id)
        .bind(record.is_active)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;
        summary.phrase_pairs += result.rows_affected();
    }

    for record in &votes {
        let result = sqlx::query(
            "INSERT INTO votes (id, phrase_pair_id, selected_phrase_id, session_id, created_at) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
        )
        .bind(record.id)
        .bind(record.phrase_pair_id)
        .bind(record.selected_phrase_id)
        .bind(&record.session_id)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;
        summary.votes += result.rows_affected();
    }

    for table in ["phrases", "phrase_pairs", "votes"] {
        bump_sequence(&mut tx, table).await?;
    }

    tx.commit().await?;
    Ok(summary)
}

/// Move the table's id sequence past the highest seeded id.
async fn bump_sequence(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    table: &str,
) -> Result<(), sqlx::Error> {
    let query = format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
    );
    sqlx::query(&query).execute(&mut **tx).await?;
    Ok(())
}
