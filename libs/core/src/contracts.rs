//! # The Contract — パイプライン間通信契約
//!
//! 生成リクエストから予測・学習までのやり取りを型安全に定義する。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- 生成リクエスト クラスター ---

/// 出力種別 (動画 or 静止画)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Video,
    Still,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Video => "video",
            OutputKind::Still => "still",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub brand_id: String,
    /// リクエスト発行者のテナントID (省略時は所有権チェックをスキップ)
    #[serde(default)]
    pub owner_id: Option<String>,
    /// ショット内容の自由記述
    pub description: String,
    pub platform: String,
    #[serde(default)]
    pub output: OutputKind,
    /// 秒数。省略時: video=7, still=0
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub shot_type: Option<String>,
    /// "left-to-right" | "right-to-left"
    #[serde(default)]
    pub screen_direction: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// 合成パイプラインの最終成果物
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisOutcome {
    pub prompt_id: String,
    pub prompt_text: String,
    pub platform: String,
    pub shot_type: String,
    pub duration_secs: u32,
    pub output: OutputKind,
    /// LLM が `[APPLYING: ...]` で申告した学習パターン
    pub patterns_applied: Vec<String>,
    /// LLM が `[SUGGESTION: ...]` で提案した新パターン候補
    pub suggestions: Vec<String>,
    pub policy_translated: bool,
    pub phrase_detected: Option<String>,
    pub applied_defaults: Vec<String>,
    pub prediction: PlatformPrediction,
    pub warnings: Vec<String>,
    pub technical_notes: String,
}

// --- 予測 クラスター ---

/// 予測の4因子 (すべて 0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionFactors {
    pub shot_type_match: u32,
    pub duration_fit: u32,
    pub camera_requirement: u32,
    pub platform_strength: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformScore {
    pub platform: String,
    /// 加重合成スコア (0-100)
    pub score: u32,
    pub factors: PredictionFactors,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativePlatform {
    pub platform: String,
    pub score: u32,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPrediction {
    pub recommended_platform: String,
    /// 推奨プラットフォームの合成スコア (0-100)
    pub confidence: u32,
    pub rationale: String,
    pub alternatives: Vec<AlternativePlatform>,
    pub warnings: Vec<String>,
    pub factors: PredictionFactors,
}

// --- カタログ クラスター ---

/// 尺に応じた複雑度上限
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityBudget {
    pub max_actions: u8,
    pub max_camera_changes: u8,
    pub max_reveals: u8,
    pub pacing_guidance: String,
    pub warning: Option<String>,
}

/// ショットテンプレート (カメラ言語の雛形)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotTemplate {
    pub id: String,
    pub name: String,
    pub camera_instruction: String,
    pub framing_guidance: String,
    pub motion_guidance: String,
    pub default_occupancy: String,
    pub default_screen_direction: String,
    pub negative_constraints: Vec<String>,
    /// プラットフォーム固有の挙動メモ
    #[serde(default)]
    pub platform_notes: HashMap<String, String>,
}

/// プラットフォーム能力モデル (評価はすべて 0-10)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformCapability {
    pub id: String,
    pub vehicle_consistency: u8,
    pub camera_lock: u8,
    pub instruction_compliance: u8,
    pub best_for: Vec<String>,
    pub weaknesses: Vec<String>,
    pub notes: String,
    pub outputs: Vec<OutputKind>,
    /// 完成プロンプトの文字数上限
    pub char_limit: usize,
    /// 指示文に注入するプラットフォーム別ガイダンス
    pub guidance: String,
}

impl PlatformCapability {
    pub fn supports(&self, output: OutputKind) -> bool {
        self.outputs.contains(&output)
    }
}

/// ショット種別ごとの要求プロファイル
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotRequirements {
    pub shot_type: String,
    pub camera_lock_importance: u8,
    pub consistency_importance: u8,
    pub compliance_importance: u8,
    pub motion_complexity: u8,
    pub optimal_duration_min: u32,
    pub optimal_duration_max: u32,
    pub prefers_dynamic_background: bool,
    pub prefers_static_camera: bool,
}

// --- ブランド クラスター ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    pub brand_id: String,
    pub owner_id: String,
    pub brand_name: String,
    pub brand_description: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    pub tone_keywords: Vec<String>,
    #[serde(default)]
    pub visual_rules: Vec<String>,
}

/// 学習済みパターン1件分 (tenant, pattern_type, pattern_value でユニーク)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandIntelligenceRecord {
    pub brand_id: String,
    pub pattern_type: String,
    pub pattern_value: String,
    /// [floor, 1.0] に常にクランプされる
    pub confidence: f64,
    pub occurrences: i64,
    pub last_seen: String,
}

/// 履歴スキャンで検出されたパターン
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub pattern_type: String,
    pub pattern_value: String,
    /// 出現頻度 (0.0-1.0)
    pub frequency: f64,
}

// --- 履歴・フィードバック クラスター ---

/// 合成結果に付随する構造化メタデータ (JSON格納)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptMetadata {
    #[serde(default)]
    pub patterns_applied: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub issues_reported: Vec<String>,
}

/// 評価語彙 (5段階固定)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackRating {
    Failed,
    Poor,
    Okay,
    Good,
    Perfect,
}

impl FeedbackRating {
    /// 語彙または "1"-"5" の数値表記を受理する
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "failed" | "1" => Some(FeedbackRating::Failed),
            "poor" | "2" => Some(FeedbackRating::Poor),
            "okay" | "3" => Some(FeedbackRating::Okay),
            "good" | "4" => Some(FeedbackRating::Good),
            "perfect" | "5" => Some(FeedbackRating::Perfect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackRating::Failed => "failed",
            FeedbackRating::Poor => "poor",
            FeedbackRating::Okay => "okay",
            FeedbackRating::Good => "good",
            FeedbackRating::Perfect => "perfect",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, FeedbackRating::Good | FeedbackRating::Perfect)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, FeedbackRating::Failed | FeedbackRating::Poor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub brand_id: String,
    pub prompt_id: String,
    /// 語彙 (failed/poor/okay/good/perfect) または "1"-"5"
    pub rating: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// 構造化された問題タグ (motion, lighting, color, consistency, physics)
    #[serde(default)]
    pub issues: Vec<String>,
}

/// 台帳へ新規挿入する際の入力 (id と時刻は台帳側で採番する)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPromptRecord {
    pub brand_id: String,
    pub session_id: Option<String>,
    pub user_input: String,
    pub prompt_text: String,
    pub platform: String,
    pub shot_type: String,
    pub duration_secs: u32,
    pub output: OutputKind,
    pub policy_translated: bool,
    pub phrase_detected: Option<String>,
    pub metadata: PromptMetadata,
}

/// 永続化されるプロンプト台帳の1行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRecord {
    pub prompt_id: String,
    pub brand_id: String,
    pub session_id: Option<String>,
    pub user_input: String,
    pub prompt_text: String,
    pub platform: String,
    pub shot_type: String,
    pub duration_secs: u32,
    pub output: OutputKind,
    pub policy_translated: bool,
    pub phrase_detected: Option<String>,
    pub rating: Option<FeedbackRating>,
    pub feedback_notes: Option<String>,
    pub feedback_at: Option<String>,
    pub metadata: PromptMetadata,
    pub created_at: String,
}

// --- 規約変換 クラスター ---

/// Content Policy Translator の変換結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub text: String,
    pub phrase_detected: Option<String>,
    pub translated: bool,
}
