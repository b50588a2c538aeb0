//! # Intelligence Store — ブランド学習メモリ永続化
//!
//! (brand_id, pattern_type, pattern_value) を一意キーとして、確信度と
//! 出現回数を単一の UPSERT で原子的に更新する。読んでから書く方式だと
//! 並行フィードバックで加算を取りこぼす。

use async_trait::async_trait;
use chrono::Utc;
use foundry_core::contracts::BrandIntelligenceRecord;
use foundry_core::error::FoundryError;
use foundry_core::traits::IntelligenceStore;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct SqliteIntelligenceStore {
    pool: SqlitePool,
    /// 否定フィードバックで下げても割り込まない確信度の床
    confidence_floor: f64,
}

impl SqliteIntelligenceStore {
    pub fn new(pool: SqlitePool, confidence_floor: f64) -> Self {
        Self {
            pool,
            confidence_floor,
        }
    }
}

#[async_trait]
impl IntelligenceStore for SqliteIntelligenceStore {
    async fn upsert_pattern(
        &self,
        brand_id: &str,
        pattern_type: &str,
        pattern_value: &str,
        start_confidence: f64,
        delta: f64,
        occurrence_step: i64,
    ) -> Result<(), FoundryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO brand_intelligence \
                (brand_id, pattern_type, pattern_value, confidence, occurrences, last_seen) \
             VALUES (?, ?, ?, MAX(?, MIN(1.0, ?)), ?, ?) \
             ON CONFLICT(brand_id, pattern_type, pattern_value) DO UPDATE SET \
                occurrences = occurrences + ?, \
                confidence = MAX(?, MIN(1.0, confidence + ?)), \
                last_seen = excluded.last_seen",
        )
        .bind(brand_id)
        .bind(pattern_type)
        .bind(pattern_value)
        .bind(self.confidence_floor)
        .bind(start_confidence)
        .bind(occurrence_step)
        .bind(&now)
        .bind(occurrence_step)
        .bind(self.confidence_floor)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!(
                "Failed to upsert pattern {}/{} for brand {}: {}",
                pattern_type, pattern_value, brand_id, e
            ),
        })?;

        Ok(())
    }

    async fn fetch_patterns(
        &self,
        brand_id: &str,
        min_confidence: f64,
        limit: i64,
    ) -> Result<Vec<BrandIntelligenceRecord>, FoundryError> {
        let rows = sqlx::query(
            "SELECT brand_id, pattern_type, pattern_value, confidence, occurrences, last_seen \
             FROM brand_intelligence \
             WHERE brand_id = ? AND confidence >= ? \
             ORDER BY confidence DESC, occurrences DESC \
             LIMIT ?",
        )
        .bind(brand_id)
        .bind(min_confidence)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to fetch patterns for brand {}: {}", brand_id, e),
        })?;

        let records = rows
            .iter()
            .map(|r| BrandIntelligenceRecord {
                brand_id: r.get("brand_id"),
                pattern_type: r.get("pattern_type"),
                pattern_value: r.get("pattern_value"),
                confidence: r.get("confidence"),
                occurrences: r.get("occurrences"),
                last_seen: r.get("last_seen"),
            })
            .collect();

        Ok(records)
    }
}
