//! # ドメインエラー型
//!
//! `thiserror` を使い、すべてのドメインエラーに明確な型を付与する。
//! Iron Principles: `unwrap()` / `expect()` は禁止。

use thiserror::Error;

/// PromptFoundry のドメインエラー
#[derive(Debug, Error)]
pub enum FoundryError {
    // === 入力検証 ===
    #[error("入力検証エラー: {reason}")]
    Validation { reason: String },

    #[error("未対応プラットフォーム: {platform} (対応: {supported})")]
    UnsupportedPlatform { platform: String, supported: String },

    // === ブランド・履歴 ===
    #[error("リソースが見つからない: {resource} (id: {id})")]
    NotFound { resource: String, id: String },

    #[error("アクセス拒否: {reason}")]
    AccessDenied { reason: String },

    // === LLM ===
    #[error("LLM 応答エラー: {source}")]
    CompletionResponse {
        #[source]
        source: anyhow::Error,
    },

    #[error("LLM 応答タイムアウト ({timeout_secs}秒)")]
    CompletionTimeout { timeout_secs: u64 },

    // === 設定・カタログ ===
    #[error("設定ファイル読み込みエラー: {source}")]
    ConfigLoad {
        #[source]
        source: anyhow::Error,
    },

    #[error("カタログ読み込みエラー: {source}")]
    CatalogLoad {
        #[source]
        source: anyhow::Error,
    },

    // === 永続化 ===
    #[error("インフラ構造エラー: {reason}")]
    Infrastructure { reason: String },
}
