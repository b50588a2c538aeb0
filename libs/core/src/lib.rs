//! # Core — ドメインロジック層
//!
//! PromptFoundry のビジネスロジックを定義する。
//! 具体的なI/O実装は `infrastructure` クレートに委譲する（依存性逆転の原則）。

pub mod error;
pub mod traits;
pub mod contracts;
pub mod budget;
pub mod policy;
pub mod prediction;
pub mod patterns;
pub mod synthesis;
