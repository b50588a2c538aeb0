//! # Prompt Ledger — 生成プロンプト台帳
//!
//! 生成された全プロンプトと、その後のフィードバックを1行で保持する。
//! id と時刻の採番は台帳側の責務。

use async_trait::async_trait;
use chrono::Utc;
use foundry_core::contracts::{FeedbackRating, NewPromptRecord, OutputKind, PromptMetadata, PromptRecord};
use foundry_core::error::FoundryError;
use foundry_core::traits::PromptLedger;
use sqlx::{Row, SqlitePool};
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct SqlitePromptLedger {
    pool: SqlitePool,
}

impl SqlitePromptLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const PROMPT_COLUMNS: &str = "prompt_id, brand_id, session_id, user_input, prompt_text, \
    platform, shot_type, duration_secs, output, policy_translated, phrase_detected, \
    rating, feedback_notes, feedback_at, metadata, created_at";

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> PromptRecord {
    let duration: i64 = row.get("duration_secs");
    let output_text: String = row.get("output");
    let rating_text: Option<String> = row.try_get("rating").ok();
    let metadata_text: String = row.get("metadata");
    let metadata: PromptMetadata = serde_json::from_str(&metadata_text).unwrap_or_else(|e| {
        warn!("⚠️ プロンプトメタデータの復元に失敗、空で継続: {}", e);
        PromptMetadata::default()
    });

    PromptRecord {
        prompt_id: row.get("prompt_id"),
        brand_id: row.get("brand_id"),
        session_id: row.try_get("session_id").ok(),
        user_input: row.get("user_input"),
        prompt_text: row.get("prompt_text"),
        platform: row.get("platform"),
        shot_type: row.get("shot_type"),
        duration_secs: duration as u32,
        output: if output_text == "still" {
            OutputKind::Still
        } else {
            OutputKind::Video
        },
        policy_translated: row.get("policy_translated"),
        phrase_detected: row.try_get("phrase_detected").ok(),
        rating: rating_text.as_deref().and_then(FeedbackRating::parse),
        feedback_notes: row.try_get("feedback_notes").ok(),
        feedback_at: row.try_get("feedback_at").ok(),
        metadata,
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl PromptLedger for SqlitePromptLedger {
    async fn record_prompt(&self, record: &NewPromptRecord) -> Result<String, FoundryError> {
        let prompt_id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let metadata_json =
            serde_json::to_string(&record.metadata).map_err(|e| FoundryError::Infrastructure {
                reason: format!("Failed to serialize prompt metadata: {}", e),
            })?;

        sqlx::query(
            "INSERT INTO prompts \
                (prompt_id, brand_id, session_id, user_input, prompt_text, platform, \
                 shot_type, duration_secs, output, policy_translated, phrase_detected, \
                 metadata, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&prompt_id)
        .bind(&record.brand_id)
        .bind(&record.session_id)
        .bind(&record.user_input)
        .bind(&record.prompt_text)
        .bind(&record.platform)
        .bind(&record.shot_type)
        .bind(record.duration_secs as i64)
        .bind(record.output.as_str())
        .bind(record.policy_translated)
        .bind(&record.phrase_detected)
        .bind(&metadata_json)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to record prompt: {}", e),
        })?;

        Ok(prompt_id)
    }

    async fn fetch_prompt(&self, prompt_id: &str) -> Result<Option<PromptRecord>, FoundryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM prompts WHERE prompt_id = ?",
            PROMPT_COLUMNS
        ))
        .bind(prompt_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to fetch prompt {}: {}", prompt_id, e),
        })?;

        Ok(row.map(|r| row_to_record(&r)))
    }

    async fn record_feedback(
        &self,
        prompt_id: &str,
        rating: FeedbackRating,
        notes: Option<&str>,
        issues: &[String],
    ) -> Result<(), FoundryError> {
        let now = Utc::now().to_rfc3339();

        // 既存メタデータに問題タグを積み増す
        let existing = self.fetch_prompt(prompt_id).await?;
        let Some(existing) = existing else {
            return Err(FoundryError::NotFound {
                resource: "prompt".to_string(),
                id: prompt_id.to_string(),
            });
        };
        let mut metadata = existing.metadata;
        for issue in issues {
            if !metadata.issues_reported.contains(issue) {
                metadata.issues_reported.push(issue.clone());
            }
        }
        let metadata_json =
            serde_json::to_string(&metadata).map_err(|e| FoundryError::Infrastructure {
                reason: format!("Failed to serialize prompt metadata: {}", e),
            })?;

        let result = sqlx::query(
            "UPDATE prompts \
             SET rating = ?, feedback_notes = ?, feedback_at = ?, metadata = ? \
             WHERE prompt_id = ?",
        )
        .bind(rating.as_str())
        .bind(notes)
        .bind(&now)
        .bind(&metadata_json)
        .bind(prompt_id)
        .execute(&self.pool)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to record feedback for prompt {}: {}", prompt_id, e),
        })?;

        if result.rows_affected() == 0 {
            return Err(FoundryError::NotFound {
                resource: "prompt".to_string(),
                id: prompt_id.to_string(),
            });
        }

        Ok(())
    }

    async fn fetch_recent(
        &self,
        brand_id: &str,
        limit: i64,
    ) -> Result<Vec<PromptRecord>, FoundryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM prompts WHERE brand_id = ? ORDER BY created_at DESC LIMIT ?",
            PROMPT_COLUMNS
        ))
        .bind(brand_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to fetch recent prompts for brand {}: {}", brand_id, e),
        })?;

        Ok(rows.iter().map(row_to_record).collect())
    }
}
