//! # Server — HTTP API サーバーモジュール

pub mod router;
