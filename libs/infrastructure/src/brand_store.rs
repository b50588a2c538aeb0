//! # Brand Store — ブランドプロファイル永続化
//!
//! テナント境界はここで守る。owner が指定された読み出しは
//! owner_id の一致も要求し、他テナントの行は存在しない扱いになる。

use async_trait::async_trait;
use chrono::Utc;
use foundry_core::contracts::BrandProfile;
use foundry_core::error::FoundryError;
use foundry_core::traits::BrandStore;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct SqliteBrandStore {
    pool: SqlitePool,
}

impl SqliteBrandStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> BrandProfile {
    let tone_json: String = row.get("tone_keywords");
    let rules_json: String = row.get("visual_rules");
    BrandProfile {
        brand_id: row.get("brand_id"),
        owner_id: row.get("owner_id"),
        brand_name: row.get("brand_name"),
        brand_description: row.try_get("brand_description").ok(),
        industry: row.try_get("industry").ok(),
        tone_keywords: serde_json::from_str(&tone_json).unwrap_or_default(),
        visual_rules: serde_json::from_str(&rules_json).unwrap_or_default(),
    }
}

#[async_trait]
impl BrandStore for SqliteBrandStore {
    async fn fetch_profile(
        &self,
        brand_id: &str,
        owner: Option<&str>,
    ) -> Result<Option<BrandProfile>, FoundryError> {
        let row = match owner {
            Some(owner_id) => {
                sqlx::query(
                    "SELECT brand_id, owner_id, brand_name, brand_description, industry, \
                         tone_keywords, visual_rules \
                     FROM brand_profiles WHERE brand_id = ? AND owner_id = ?",
                )
                .bind(brand_id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT brand_id, owner_id, brand_name, brand_description, industry, \
                         tone_keywords, visual_rules \
                     FROM brand_profiles WHERE brand_id = ?",
                )
                .bind(brand_id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to fetch brand profile {}: {}", brand_id, e),
        })?;

        Ok(row.map(|r| row_to_profile(&r)))
    }

    async fn upsert_profile(&self, profile: &BrandProfile) -> Result<(), FoundryError> {
        let now = Utc::now().to_rfc3339();
        let tone_json =
            serde_json::to_string(&profile.tone_keywords).map_err(|e| {
                FoundryError::Infrastructure {
                    reason: format!("Failed to serialize tone keywords: {}", e),
                }
            })?;
        let rules_json =
            serde_json::to_string(&profile.visual_rules).map_err(|e| {
                FoundryError::Infrastructure {
                    reason: format!("Failed to serialize visual rules: {}", e),
                }
            })?;

        // owner_id は作成時に固定し、更新では書き換えない
        sqlx::query(
            "INSERT INTO brand_profiles \
                (brand_id, owner_id, brand_name, brand_description, industry, \
                 tone_keywords, visual_rules, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(brand_id) DO UPDATE SET \
                brand_name = excluded.brand_name, \
                brand_description = excluded.brand_description, \
                industry = excluded.industry, \
                tone_keywords = excluded.tone_keywords, \
                visual_rules = excluded.visual_rules, \
                updated_at = excluded.updated_at",
        )
        .bind(&profile.brand_id)
        .bind(&profile.owner_id)
        .bind(&profile.brand_name)
        .bind(&profile.brand_description)
        .bind(&profile.industry)
        .bind(&tone_json)
        .bind(&rules_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| FoundryError::Infrastructure {
            reason: format!("Failed to upsert brand profile {}: {}", profile.brand_id, e),
        })?;

        Ok(())
    }
}
