//! # ドメイントレイト定義
//!
//! PromptFoundry の外部依存 (LLM・永続化) のインターフェースを定義する。
//! 具体実装は `libs/infrastructure` に配置する（依存性逆転の原則）。

use crate::contracts::{BrandIntelligenceRecord, BrandProfile, FeedbackRating, NewPromptRecord, PromptRecord};
use crate::error::FoundryError;
use async_trait::async_trait;

/// プロンプト合成の外部 LLM サービス
///
/// instruction (システム指示) と user_text を渡し、完成プロンプト本文を受け取る。
#[async_trait]
pub trait CompletionEngine: Send + Sync {
    /// 1回の補完呼び出し。タイムアウトは実装側で適用する
    async fn complete(&self, instruction: &str, user_text: &str) -> Result<String, FoundryError>;
}

/// ブランドプロファイルストア
///
/// テナントの読み取り専用コンテキスト。owner を渡すと所有権で絞り込む。
#[async_trait]
pub trait BrandStore: Send + Sync {
    /// ブランドを1件取得。owner 指定時は owner_id が一致する行のみ返す
    async fn fetch_profile(
        &self,
        brand_id: &str,
        owner: Option<&str>,
    ) -> Result<Option<BrandProfile>, FoundryError>;

    /// プロファイルを登録・更新 (シード/管理用)
    async fn upsert_profile(&self, profile: &BrandProfile) -> Result<(), FoundryError>;
}

/// ブランドインテリジェンスストア (The Learning Ledger)
///
/// (brand_id, pattern_type, pattern_value) をユニークキーとする学習台帳。
#[async_trait]
pub trait IntelligenceStore: Send + Sync {
    /// find-or-create 更新。既存行は occurrences += step, confidence += delta、
    /// 新規行は start_confidence で作成する。
    /// confidence は常に [floor, 1.0] にクランプされる。
    /// 単一のアトミック UPSERT 文で実行し、並行フィードバック下でも行の重複や
    /// 信頼度の境界逸脱を起こさない。
    async fn upsert_pattern(
        &self,
        brand_id: &str,
        pattern_type: &str,
        pattern_value: &str,
        start_confidence: f64,
        delta: f64,
        occurrence_step: i64,
    ) -> Result<(), FoundryError>;

    /// 信頼度 min_confidence 以上の行を信頼度降順で取得
    async fn fetch_patterns(
        &self,
        brand_id: &str,
        min_confidence: f64,
        limit: i64,
    ) -> Result<Vec<BrandIntelligenceRecord>, FoundryError>;
}

/// プロンプト台帳 (合成結果とフィードバックの永続記録)
#[async_trait]
pub trait PromptLedger: Send + Sync {
    /// 新規レコードを挿入し、採番した prompt_id を返す
    async fn record_prompt(&self, record: &NewPromptRecord) -> Result<String, FoundryError>;

    /// 指定IDのレコードを取得
    async fn fetch_prompt(&self, prompt_id: &str) -> Result<Option<PromptRecord>, FoundryError>;

    /// 評価・ノート・問題タグを1回の更新で記録する。対象が無ければ NotFound
    async fn record_feedback(
        &self,
        prompt_id: &str,
        rating: FeedbackRating,
        notes: Option<&str>,
        issues: &[String],
    ) -> Result<(), FoundryError>;

    /// テナントの直近レコードをN件取得 (作成時刻降順)
    async fn fetch_recent(
        &self,
        brand_id: &str,
        limit: i64,
    ) -> Result<Vec<PromptRecord>, FoundryError>;
}
