//! Storage collaborator: sqlite rows with the full record as JSON
//!
//! The engine never owns persistence; it shapes complete replacement
//! values and this layer writes them. A recheck merge lands as a single
//! row UPDATE, which keeps it atomic with respect to readers of the same
//! id.

use sqlx::{Row, SqlitePool};

use shared_types::{Analysis, Profile};

use crate::error::ApiError;

const PROFILE_ROW_ID: &str = "default";

pub async fn insert_analysis(pool: &SqlitePool, analysis: &Analysis) -> Result<(), ApiError> {
    let record_json =
        serde_json::to_string(analysis).map_err(|e| ApiError::Internal(e.into()))?;

    sqlx::query(
        r#"
        INSERT INTO analyses (id, created_at, jurisdiction, work_type, record_json)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&analysis.id)
    .bind(analysis.created_at.to_rfc3339())
    .bind(&analysis.jurisdiction)
    .bind(&analysis.work_type)
    .bind(&record_json)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_analysis(pool: &SqlitePool, id: &str) -> Result<Option<Analysis>, ApiError> {
    let row = sqlx::query(r#"SELECT record_json FROM analyses WHERE id = ?"#)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let record_json: String = row.get("record_json");
            let analysis =
                serde_json::from_str(&record_json).map_err(|e| ApiError::Internal(e.into()))?;
            Ok(Some(analysis))
        }
        None => Ok(None),
    }
}

/// Replace the stored record wholesale (recheck merges land here)
pub async fn update_analysis(pool: &SqlitePool, analysis: &Analysis) -> Result<(), ApiError> {
    let record_json =
        serde_json::to_string(analysis).map_err(|e| ApiError::Internal(e.into()))?;

    let result = sqlx::query(r#"UPDATE analyses SET record_json = ? WHERE id = ?"#)
        .bind(&record_json)
        .bind(&analysis.id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("analysis {}", analysis.id)));
    }
    Ok(())
}

/// Full history, newest first
pub async fn list_analyses(pool: &SqlitePool) -> Result<Vec<Analysis>, ApiError> {
    let rows = sqlx::query(r#"SELECT record_json FROM analyses ORDER BY created_at DESC"#)
        .fetch_all(pool)
        .await?;

    let mut analyses = Vec::with_capacity(rows.len());
    for row in rows {
        let record_json: String = row.get("record_json");
        let analysis =
            serde_json::from_str(&record_json).map_err(|e| ApiError::Internal(e.into()))?;
        analyses.push(analysis);
    }
    Ok(analyses)
}

pub async fn get_profile(pool: &SqlitePool) -> Result<Option<Profile>, ApiError> {
    let row = sqlx::query(r#"SELECT record_json FROM profile WHERE id = ?"#)
        .bind(PROFILE_ROW_ID)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let record_json: String = row.get("record_json");
            let profile =
                serde_json::from_str(&record_json).map_err(|e| ApiError::Internal(e.into()))?;
            Ok(Some(profile))
        }
        None => Ok(None),
    }
}

pub async fn put_profile(pool: &SqlitePool, profile: &Profile) -> Result<(), ApiError> {
    let record_json =
        serde_json::to_string(profile).map_err(|e| ApiError::Internal(e.into()))?;

    sqlx::query(
        r#"
        INSERT INTO profile (id, record_json) VALUES (?, ?)
        ON CONFLICT(id) DO UPDATE SET record_json = excluded.record_json
        "#,
    )
    .bind(PROFILE_ROW_ID)
    .bind(&record_json)
    .execute(pool)
    .await?;

    Ok(())
}
