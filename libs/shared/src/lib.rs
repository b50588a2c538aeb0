//! # Shared — 横断ユーティリティ層
//!
//! 設定・プロセス監視・入力無害化。どの層からも依存されるため
//! ドメインロジックには依存しない。

pub mod config;
pub mod health;
pub mod text;

pub use config::FoundryConfig;
pub use health::{HealthMonitor, HealthReport};
pub use text::InputScrubber;
