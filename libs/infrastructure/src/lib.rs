//! # Infrastructure — I/O実装層
//!
//! `core` で定義されたトレイトの具体実装を提供する。
//! Anthropic (rig 経由) と SQLite への通信を担当。

pub mod brand_store;
pub mod completion;
pub mod db;
pub mod intelligence_store;
pub mod prompt_ledger;

#[cfg(test)]
mod intelligence_store_tests;
