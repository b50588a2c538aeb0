//! # Completion — Anthropic 補完クライアント
//!
//! 合成済みの指示文とユーザーメッセージを Claude に渡し、
//! プロンプト本文を生成する。タイムアウトはここで強制する。

use async_trait::async_trait;
use foundry_core::error::FoundryError;
use foundry_core::traits::CompletionEngine;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::anthropic;
use std::time::Duration;
use tracing::{error, info};

/// プロンプト本文生成機 (Claude)
pub struct AnthropicCompletion {
    api_key: String,
    model: String,
    max_tokens: u64,
    temperature: f64,
    timeout_secs: u64,
}

impl AnthropicCompletion {
    pub fn new(
        api_key: &str,
        model: &str,
        max_tokens: u64,
        temperature: f64,
        timeout_secs: u64,
    ) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            temperature,
            timeout_secs,
        }
    }

    fn get_client(&self) -> Result<anthropic::Client, FoundryError> {
        anthropic::Client::new(&self.api_key).map_err(|e| FoundryError::Infrastructure {
            reason: format!("Anthropic Client error: {}", e),
        })
    }
}

#[async_trait]
impl CompletionEngine for AnthropicCompletion {
    async fn complete(&self, instruction: &str, user_text: &str) -> Result<String, FoundryError> {
        info!("🎬 Completion: Generating prompt with {} ...", self.model);

        let client = self.get_client()?;
        let agent = client
            .agent(&self.model)
            .preamble(instruction)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build();

        let request = agent.prompt(user_text.to_string());
        let response: String =
            match tokio::time::timeout(Duration::from_secs(self.timeout_secs), request).await {
                Ok(result) => result.map_err(|e| {
                    error!("Anthropic Error: {}", e);
                    FoundryError::CompletionResponse {
                        source: anyhow::anyhow!("Anthropic Prompt Error: {}", e),
                    }
                })?,
                Err(_) => {
                    error!("Anthropic request timed out after {}s", self.timeout_secs);
                    return Err(FoundryError::CompletionTimeout {
                        timeout_secs: self.timeout_secs,
                    });
                }
            };

        info!("✅ Completion: {} chars generated", response.chars().count());
        Ok(response)
    }
}
