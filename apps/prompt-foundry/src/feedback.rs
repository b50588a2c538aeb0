//! # Feedback Learner — 評価の記録と能動学習
//!
//! 人間の評価を台帳へ刻み、高評価なら語彙パターンを強化、低評価なら
//! プラットフォーム信頼度を下げて問題タグを記録する。学習側の書き込み
//! 失敗は評価の受理を妨げない。

use foundry_core::contracts::{FeedbackRating, FeedbackRequest, PromptRecord};
use foundry_core::error::FoundryError;
use foundry_core::patterns::{scan_vocabulary, VocabularyEntry};
use foundry_core::traits::{IntelligenceStore, PromptLedger};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// 直接評価による信頼度ステップ
const POSITIVE_STEP: f64 = 0.10;
const NEGATIVE_STEP: f64 = -0.15;

/// 新規パターンの初期信頼度
const NEW_PATTERN_CONFIDENCE: f64 = 0.5;

/// 問題タグレコードの初期信頼度。再報告では出現回数だけ増える
const ISSUE_PATTERN_CONFIDENCE: f64 = 0.6;

/// フリーテキストのノートから拾う問題タグとトリガー語
const ISSUE_KEYWORDS: [(&str, &[&str]); 5] = [
    ("motion", &["motion", "moving", "speed"]),
    ("lighting", &["light", "dark", "bright"]),
    ("color", &["color", "muddy", "saturate"]),
    ("consistency", &["consistent", "flicker", "jump"]),
    ("physics", &["physics", "realistic", "fake"]),
];

#[derive(Debug, Serialize)]
pub struct FeedbackOutcome {
    pub prompt_id: String,
    pub rating: String,
    pub issues_detected: Vec<String>,
    pub message: String,
}

pub struct FeedbackLearner {
    ledger: Arc<dyn PromptLedger>,
    intelligence: Arc<dyn IntelligenceStore>,
    vocabulary: Vec<VocabularyEntry>,
}

impl FeedbackLearner {
    pub fn new(
        ledger: Arc<dyn PromptLedger>,
        intelligence: Arc<dyn IntelligenceStore>,
        vocabulary: Vec<VocabularyEntry>,
    ) -> Self {
        Self {
            ledger,
            intelligence,
            vocabulary,
        }
    }

    pub async fn record(&self, request: FeedbackRequest) -> Result<FeedbackOutcome, FoundryError> {
        let rating =
            FeedbackRating::parse(&request.rating).ok_or_else(|| FoundryError::Validation {
                reason: "Invalid rating. Valid values: failed, poor, okay, good, perfect"
                    .to_string(),
            })?;

        let prompt = self
            .ledger
            .fetch_prompt(&request.prompt_id)
            .await?
            .ok_or_else(|| FoundryError::NotFound {
                resource: "prompt".to_string(),
                id: request.prompt_id.clone(),
            })?;
        if prompt.brand_id != request.brand_id {
            return Err(FoundryError::AccessDenied {
                reason: "prompt belongs to a different brand".to_string(),
            });
        }

        // 明示タグ優先、なければ低評価ノートから抽出
        let issues: Vec<String> = if !request.issues.is_empty() {
            request.issues.clone()
        } else if rating.is_negative() {
            request
                .notes
                .as_deref()
                .map(extract_issue_tags)
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        self.ledger
            .record_feedback(&request.prompt_id, rating, request.notes.as_deref(), &issues)
            .await?;

        if rating.is_positive() {
            self.learn_from_positive(&prompt).await;
        } else if rating.is_negative() {
            self.learn_from_negative(&prompt, &issues).await;
        }

        info!(
            "🧠 Feedback recorded: prompt={} rating={} issues={}",
            request.prompt_id,
            rating.as_str(),
            issues.len()
        );

        Ok(FeedbackOutcome {
            prompt_id: request.prompt_id,
            rating: rating.as_str().to_string(),
            issues_detected: issues,
            message: acknowledgement(rating).to_string(),
        })
    }

    /// 高評価: プロンプト本文の語彙ヒットとプラットフォーム信頼度を強化
    async fn learn_from_positive(&self, prompt: &PromptRecord) {
        for (pattern_type, value) in scan_vocabulary(&prompt.prompt_text, &self.vocabulary) {
            if let Err(e) = self
                .intelligence
                .upsert_pattern(
                    &prompt.brand_id,
                    &pattern_type,
                    &value,
                    NEW_PATTERN_CONFIDENCE,
                    POSITIVE_STEP,
                    1,
                )
                .await
            {
                warn!("⚠️ 語彙パターンの強化に失敗 ({}): {}", pattern_type, e);
            }
        }
        if let Err(e) = self
            .intelligence
            .upsert_pattern(
                &prompt.brand_id,
                "platform_preference",
                &prompt.platform,
                NEW_PATTERN_CONFIDENCE,
                POSITIVE_STEP,
                1,
            )
            .await
        {
            warn!("⚠️ プラットフォーム信頼度の強化に失敗: {}", e);
        }
    }

    /// 低評価: プラットフォーム信頼度を下げ、問題タグを刻む
    async fn learn_from_negative(&self, prompt: &PromptRecord, issues: &[String]) {
        if let Err(e) = self
            .intelligence
            .upsert_pattern(
                &prompt.brand_id,
                "platform_preference",
                &prompt.platform,
                NEW_PATTERN_CONFIDENCE,
                NEGATIVE_STEP,
                1,
            )
            .await
        {
            warn!("⚠️ プラットフォーム信頼度の減衰に失敗: {}", e);
        }

        let issue_type = format!("platform_issue_{}", prompt.platform);
        for issue in issues {
            if let Err(e) = self
                .intelligence
                .upsert_pattern(
                    &prompt.brand_id,
                    &issue_type,
                    issue,
                    ISSUE_PATTERN_CONFIDENCE,
                    0.0,
                    1,
                )
                .await
            {
                warn!("⚠️ 問題タグの記録に失敗 ({}): {}", issue, e);
            }
        }
    }
}

fn extract_issue_tags(notes: &str) -> Vec<String> {
    let lower = notes.to_lowercase();
    ISSUE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

fn acknowledgement(rating: FeedbackRating) -> &'static str {
    match rating {
        FeedbackRating::Perfect => {
            "🧠 Recording... This pattern will be remembered for future prompts."
        }
        FeedbackRating::Good => "👍 Thanks! This helps calibrate future generations.",
        FeedbackRating::Okay => "📝 Noted.",
        FeedbackRating::Poor | FeedbackRating::Failed => {
            "📝 Noted. I'll adjust my approach for this brand."
        }
    }
}
