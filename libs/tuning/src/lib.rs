//! # Tuning — 検証済みカタログ層
//!
//! ショットテンプレート・プラットフォーム能力・ポリシー語彙・学習語彙の
//! 組み込み定義と、TOML ファイルによる上書きロードを提供する。

pub mod catalog;
pub mod lexicon;
pub mod platforms;
pub mod templates;
pub mod vocabulary;

pub use catalog::TuningCatalog;
