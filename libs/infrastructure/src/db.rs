//! # DB — SQLite 接続とスキーマ初期化
//!
//! WAL モードでマルチスレッドの同時アクセスを許容し、busy_timeout で
//! ロック競合によるエラーを防ぐ。スキーマは冪等に作成する。

use foundry_core::error::FoundryError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::time::Duration;

/// SQLite へ接続し、WAL モードとスキーマを初期化する
pub async fn connect(db_path: &str) -> Result<SqlitePool, FoundryError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to connect to SQLite: {}", e),
        })?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// 学習データは再起動を跨いで生き残る前提なので DROP はしない
async fn init_schema(pool: &SqlitePool) -> Result<(), FoundryError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS brand_profiles (
            brand_id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            brand_name TEXT NOT NULL,
            brand_description TEXT,
            industry TEXT,
            tone_keywords TEXT NOT NULL DEFAULT '[]',
            visual_rules TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
    .execute(pool)
    .await
    .map_err(|e| FoundryError::Infrastructure {
        reason: format!("Failed to create brand_profiles table: {}", e),
    })?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS brand_intelligence (
            intelligence_id INTEGER PRIMARY KEY AUTOINCREMENT,
            brand_id TEXT NOT NULL,
            pattern_type TEXT NOT NULL,
            pattern_value TEXT NOT NULL,
            confidence REAL NOT NULL,
            occurrences INTEGER NOT NULL DEFAULT 1,
            last_seen TEXT NOT NULL,
            UNIQUE(brand_id, pattern_type, pattern_value)
        );",
    )
    .execute(pool)
    .await
    .map_err(|e| FoundryError::Infrastructure {
        reason: format!("Failed to create brand_intelligence table: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_intelligence_brand_confidence
            ON brand_intelligence (brand_id, confidence DESC);",
    )
    .execute(pool)
    .await
    .map_err(|e| FoundryError::Infrastructure {
        reason: format!("Failed to create brand_intelligence index: {}", e),
    })?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS prompts (
            prompt_id TEXT PRIMARY KEY,
            brand_id TEXT NOT NULL,
            session_id TEXT,
            user_input TEXT NOT NULL,
            prompt_text TEXT NOT NULL,
            platform TEXT NOT NULL,
            shot_type TEXT NOT NULL,
            duration_secs INTEGER NOT NULL,
            output TEXT NOT NULL,
            policy_translated INTEGER NOT NULL DEFAULT 0,
            phrase_detected TEXT,
            rating TEXT,
            feedback_notes TEXT,
            feedback_at TEXT,
            metadata TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL
        );",
    )
    .execute(pool)
    .await
    .map_err(|e| FoundryError::Infrastructure {
        reason: format!("Failed to create prompts table: {}", e),
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_prompts_brand_created
            ON prompts (brand_id, created_at DESC);",
    )
    .execute(pool)
    .await
    .map_err(|e| FoundryError::Infrastructure {
        reason: format!("Failed to create prompts index: {}", e),
    })?;

    Ok(())
}
