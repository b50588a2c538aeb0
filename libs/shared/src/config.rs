use serde::{Deserialize, Serialize};

/// PromptFoundry 全体の設定
#[derive(Clone, Serialize, Deserialize)]
pub struct FoundryConfig {
    /// SQLite データベースファイルのパス
    pub database_path: String,
    /// Anthropic API Key
    pub anthropic_api_key: String,
    /// プロンプト合成用モデル名
    pub model_name: String,
    /// 補完1回あたりの最大トークン数
    pub max_tokens: u32,
    /// 補完のサンプリング温度
    pub temperature: f64,
    /// LLM 補完のタイムアウト（秒）
    pub completion_timeout_secs: u64,
    /// 履歴分析で遡るプロンプト件数
    pub history_limit: i64,
    /// 指示文に載せる学習済みパターンの最大件数
    pub intelligence_limit: i64,
    /// 学習済みパターンを指示文に載せる確信度の下限
    pub min_surfaced_confidence: f64,
    /// 否定フィードバックで下げても割り込まない確信度の床
    pub confidence_floor: f64,
    /// HTTP サーバーの待ち受けポート
    pub server_port: u16,
    /// カタログ上書き TOML のパス（空なら組み込みのみ）
    pub catalog_path: String,
}

impl std::fmt::Debug for FoundryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoundryConfig")
            .field("database_path", &self.database_path)
            .field(
                "anthropic_api_key",
                if self.anthropic_api_key.is_empty() { &"" } else { &"***" },
            )
            .field("model_name", &self.model_name)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("completion_timeout_secs", &self.completion_timeout_secs)
            .field("history_limit", &self.history_limit)
            .field("intelligence_limit", &self.intelligence_limit)
            .field("min_surfaced_confidence", &self.min_surfaced_confidence)
            .field("confidence_floor", &self.confidence_floor)
            .field("server_port", &self.server_port)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

impl FoundryConfig {
    /// 設定をファイルまたは環境変数から読み込む
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            // デフォルト値の設定
            .set_default("database_path", "./data/prompt_foundry.db")?
            .set_default(
                "anthropic_api_key",
                std::env::var("ANTHROPIC_API_KEY").unwrap_or_else(|_| "".to_string()),
            )?
            .set_default("model_name", "claude-sonnet-4-20250514")?
            .set_default("max_tokens", 1024)?
            .set_default("temperature", 1.0)?
            .set_default("completion_timeout_secs", 60)?
            .set_default("history_limit", 20)?
            .set_default("intelligence_limit", 20)?
            .set_default("min_surfaced_confidence", 0.5)?
            .set_default("confidence_floor", 0.1)?
            .set_default("server_port", 8080)?
            .set_default("catalog_path", "")?
            // config.toml があれば読み込む
            .add_source(config::File::with_name("config").required(false))
            // 環境変数 (PROMPT_FOUNDRY_*) があれば上書き
            .add_source(config::Environment::with_prefix("PROMPT_FOUNDRY"))
            .build()?;

        settings.try_deserialize()
    }
}

impl Default for FoundryConfig {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("⚙️ 設定の読み込みに失敗、組み込み既定値で継続: {}", e);
            Self {
                database_path: "./data/prompt_foundry.db".to_string(),
                anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                    .unwrap_or_else(|_| "".to_string()),
                model_name: "claude-sonnet-4-20250514".to_string(),
                max_tokens: 1024,
                temperature: 1.0,
                completion_timeout_secs: 60,
                history_limit: 20,
                intelligence_limit: 20,
                min_surfaced_confidence: 0.5,
                confidence_floor: 0.1,
                server_port: 8080,
                catalog_path: "".to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_load_defaults() {
        let config = FoundryConfig::default();
        assert_eq!(config.model_name, "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.history_limit, 20);
        assert!(config.catalog_path.is_empty());
    }

    #[test]
    fn test_config_load_from_file() {
        // 一時的な config.toml を作成 (toml 拡張子を付加してフォーマットを認識させる)
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "database_path = \"/tmp/foundry-test.db\"").unwrap();
        writeln!(file, "anthropic_api_key = \"\"").unwrap();
        writeln!(file, "model_name = \"custom-model\"").unwrap();
        writeln!(file, "max_tokens = 512").unwrap();
        writeln!(file, "temperature = 0.7").unwrap();
        writeln!(file, "completion_timeout_secs = 30").unwrap();
        writeln!(file, "history_limit = 10").unwrap();
        writeln!(file, "intelligence_limit = 5").unwrap();
        writeln!(file, "min_surfaced_confidence = 0.7").unwrap();
        writeln!(file, "confidence_floor = 0.2").unwrap();
        writeln!(file, "server_port = 9000").unwrap();
        writeln!(file, "catalog_path = \"\"").unwrap();

        let settings = config::Config::builder()
            .add_source(config::File::from(file.path()))
            .build()
            .unwrap();

        let config: FoundryConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.database_path, "/tmp/foundry-test.db");
        assert_eq!(config.model_name, "custom-model");
        assert_eq!(config.max_tokens, 512);
        assert!((config.temperature - 0.7).abs() < 1e-9);
        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn test_debug_masks_api_key() {
        let mut config = FoundryConfig::default();
        config.anthropic_api_key = "sk-ant-secret".to_string();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-ant-secret"));
        assert!(printed.contains("***"));
    }
}
