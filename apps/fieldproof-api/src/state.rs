//! Application state for the FieldProof API

use anyhow::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::sync::Arc;

use crate::inference::InferenceClient;

pub struct AppState {
    pub db: SqlitePool,
    pub inference: Arc<dyn InferenceClient>,
}

impl AppState {
    pub async fn new(database_url: Option<String>, inference: Arc<dyn InferenceClient>) -> Result<Self> {
        let db_path = database_url.unwrap_or_else(|| {
            let data_dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fieldproof-api");
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/fieldproof.db?mode=rwc", data_dir.display())
        });

        tracing::info!("Connecting to database: {}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_path)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { db: pool, inference })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analyses (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                jurisdiction TEXT NOT NULL,
                work_type TEXT NOT NULL,
                record_json TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // History reads are always newest-first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses(created_at DESC)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profile (
                id TEXT PRIMARY KEY,
                record_json TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}

/// Get platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}
