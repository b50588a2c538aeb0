//! # Tuning Catalog — 組み込みカタログと TOML 上書き
//!
//! 既定では検証済みの組み込みカタログを使い、運用チューニング時は
//! tuning.toml でセクション単位の置き換えができる。

use crate::{lexicon, platforms, templates, vocabulary};
use foundry_core::contracts::{PlatformCapability, ShotRequirements, ShotTemplate};
use foundry_core::error::FoundryError;
use foundry_core::patterns::VocabularyEntry;
use foundry_core::policy::{GenericPhrase, SpecificPhrase};
use serde::Deserialize;
use std::path::Path;

/// 合成・予測・ポリシー変換が参照するカタログ一式
#[derive(Debug, Clone)]
pub struct TuningCatalog {
    pub templates: Vec<ShotTemplate>,
    pub capabilities: Vec<PlatformCapability>,
    pub requirements: Vec<ShotRequirements>,
    pub specific_phrases: Vec<SpecificPhrase>,
    pub generic_phrases: Vec<GenericPhrase>,
    pub vocabulary: Vec<VocabularyEntry>,
    pub video_roster: Vec<String>,
    pub still_roster: Vec<String>,
}

/// tuning.toml のスキーマ。省略されたセクションは組み込みのまま
#[derive(Debug, Default, Deserialize)]
struct CatalogOverrides {
    templates: Option<Vec<ShotTemplate>>,
    capabilities: Option<Vec<PlatformCapability>>,
    requirements: Option<Vec<ShotRequirements>>,
    specific_phrases: Option<Vec<SpecificPhrase>>,
    generic_phrases: Option<Vec<GenericPhrase>>,
    vocabulary: Option<Vec<VocabularyEntry>>,
    video_roster: Option<Vec<String>>,
    still_roster: Option<Vec<String>>,
}

impl TuningCatalog {
    /// 検証済みの組み込みカタログのみで構成する
    pub fn builtin() -> Self {
        Self {
            templates: templates::builtin_templates(),
            capabilities: platforms::builtin_capabilities(),
            requirements: platforms::builtin_requirements(),
            specific_phrases: lexicon::builtin_specific_phrases(),
            generic_phrases: lexicon::builtin_generic_phrases(),
            vocabulary: vocabulary::builtin_vocabulary(),
            video_roster: platforms::video_roster(),
            still_roster: platforms::still_roster(),
        }
    }

    /// tuning.toml を読み、記載されたセクションだけ組み込みを置き換える
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FoundryError> {
        let content = std::fs::read_to_string(&path).map_err(|e| FoundryError::CatalogLoad {
            source: anyhow::anyhow!("Failed to read tuning catalog: {}", e),
        })?;

        let overrides: CatalogOverrides =
            toml::from_str(&content).map_err(|e| FoundryError::CatalogLoad {
                source: anyhow::anyhow!("Failed to parse tuning catalog: {}", e),
            })?;

        let mut catalog = Self::builtin();
        let mut replaced = Vec::new();
        if let Some(v) = overrides.templates {
            catalog.templates = v;
            replaced.push("templates");
        }
        if let Some(v) = overrides.capabilities {
            catalog.capabilities = v;
            replaced.push("capabilities");
        }
        if let Some(v) = overrides.requirements {
            catalog.requirements = v;
            replaced.push("requirements");
        }
        if let Some(v) = overrides.specific_phrases {
            catalog.specific_phrases = v;
            replaced.push("specific_phrases");
        }
        if let Some(v) = overrides.generic_phrases {
            catalog.generic_phrases = v;
            replaced.push("generic_phrases");
        }
        if let Some(v) = overrides.vocabulary {
            catalog.vocabulary = v;
            replaced.push("vocabulary");
        }
        if let Some(v) = overrides.video_roster {
            catalog.video_roster = v;
            replaced.push("video_roster");
        }
        if let Some(v) = overrides.still_roster {
            catalog.still_roster = v;
            replaced.push("still_roster");
        }
        if !replaced.is_empty() {
            tracing::info!("🎛️ カタログ上書きを適用: {}", replaced.join(", "));
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_builtin_catalog_is_complete() {
        let catalog = TuningCatalog::builtin();
        assert!(catalog.templates.iter().any(|t| t.id == "auto"));
        assert!(!catalog.capabilities.is_empty());
        assert!(!catalog.specific_phrases.is_empty());
        assert!(!catalog.vocabulary.is_empty());
        assert_eq!(catalog.video_roster.len(), 5);
        assert_eq!(catalog.still_roster.len(), 2);
    }

    #[test]
    fn test_override_replaces_only_named_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
video_roster = ["veo3", "kling"]

[[generic_phrases]]
phrase = "acme"
replacement = "generic vehicle"
"#
        )
        .unwrap();

        let catalog = TuningCatalog::load_from_file(file.path()).unwrap();
        assert_eq!(catalog.video_roster, vec!["veo3", "kling"]);
        assert_eq!(catalog.generic_phrases.len(), 1);
        assert_eq!(catalog.generic_phrases[0].phrase, "acme");
        // 記載のないセクションは組み込みのまま
        assert_eq!(catalog.templates.len(), TuningCatalog::builtin().templates.len());
        assert!(!catalog.specific_phrases.is_empty());
    }

    #[test]
    fn test_malformed_file_is_catalog_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "video_roster = not-a-list").unwrap();
        let result = TuningCatalog::load_from_file(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_catalog_error() {
        let result = TuningCatalog::load_from_file("/nonexistent/tuning.toml");
        assert!(result.is_err());
    }
}
