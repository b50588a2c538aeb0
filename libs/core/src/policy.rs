//! # Content Policy Translator — 規約安全変換
//!
//! ブランド名そのものはコンテンツブロックを誘発する。モデル番号+視覚記述子は通過する。
//! 辞書は「specific (ブランド+モデル) → generic (ブランド単独)」の2段階で、
//! 最初にヒットした1エントリだけを全置換して打ち切る。

use crate::contracts::TranslationOutcome;
use crate::error::FoundryError;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// ブランド+モデルの特定変換エントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecificPhrase {
    /// 小文字トリガー (例: "porsche 911")
    pub phrase: String,
    /// モデル識別子 (例: "911")
    pub identifier: String,
    /// 視覚記述子 (例: "sports coupe with rear-engine silhouette")
    pub descriptors: String,
}

/// 単独ブランド名の汎化エントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericPhrase {
    pub phrase: String,
    pub replacement: String,
}

struct CompiledSpecific {
    entry: SpecificPhrase,
    matcher: Regex,
}

struct CompiledGeneric {
    entry: GenericPhrase,
    matcher: Regex,
}

/// 規約安全変換エンジン。辞書は構築時に注入する
pub struct PolicyTranslator {
    specific: Vec<CompiledSpecific>,
    generic: Vec<CompiledGeneric>,
}

impl PolicyTranslator {
    pub fn new(
        specific: Vec<SpecificPhrase>,
        generic: Vec<GenericPhrase>,
    ) -> Result<Self, FoundryError> {
        let specific = specific
            .into_iter()
            .map(|entry| {
                let matcher = Regex::new(&format!("(?i){}", regex::escape(&entry.phrase)))
                    .map_err(|e| FoundryError::CatalogLoad {
                        source: anyhow::anyhow!(e),
                    })?;
                Ok(CompiledSpecific { entry, matcher })
            })
            .collect::<Result<Vec<_>, FoundryError>>()?;

        let generic = generic
            .into_iter()
            .map(|entry| {
                let matcher = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&entry.phrase)))
                    .map_err(|e| FoundryError::CatalogLoad {
                        source: anyhow::anyhow!(e),
                    })?;
                Ok(CompiledGeneric { entry, matcher })
            })
            .collect::<Result<Vec<_>, FoundryError>>()?;

        Ok(Self { specific, generic })
    }

    /// specific エントリを辞書順に走査し、最初のヒットを全置換する。
    /// ヒットが無ければ generic エントリを単語境界マッチで走査する。
    /// 決定的・副作用なし。置換結果にトリガー語は含まれないため冪等
    pub fn translate(&self, text: &str) -> TranslationOutcome {
        for item in &self.specific {
            if item.matcher.is_match(text) {
                let replacement =
                    format!("{} {}", item.entry.identifier, item.entry.descriptors);
                let translated = item
                    .matcher
                    .replace_all(text, NoExpand(&replacement))
                    .into_owned();
                return TranslationOutcome {
                    text: translated,
                    phrase_detected: Some(item.entry.phrase.clone()),
                    translated: true,
                };
            }
        }

        for item in &self.generic {
            if item.matcher.is_match(text) {
                let translated = item
                    .matcher
                    .replace_all(text, NoExpand(&item.entry.replacement))
                    .into_owned();
                return TranslationOutcome {
                    text: translated,
                    phrase_detected: Some(item.entry.phrase.clone()),
                    translated: true,
                };
            }
        }

        TranslationOutcome {
            text: text.to_string(),
            phrase_detected: None,
            translated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> PolicyTranslator {
        let specific = vec![SpecificPhrase {
            phrase: "porsche 911".to_string(),
            identifier: "911".to_string(),
            descriptors: "sports coupe with rear-engine silhouette".to_string(),
        }];
        let generic = vec![GenericPhrase {
            phrase: "porsche".to_string(),
            replacement: "German sports car".to_string(),
        }];
        PolicyTranslator::new(specific, generic).unwrap()
    }

    #[test]
    fn test_specific_phrase_wins_over_generic() {
        let outcome = translator().translate("A Porsche 911 on a coastal road");
        assert!(outcome.translated);
        assert_eq!(outcome.phrase_detected.as_deref(), Some("porsche 911"));
        assert!(outcome.text.contains("911 sports coupe with rear-engine silhouette"));
        assert!(!outcome.text.to_lowercase().contains("porsche"));
    }

    #[test]
    fn test_generic_fallback_uses_word_boundary() {
        let outcome = translator().translate("a porsche drifting at dusk");
        assert!(outcome.translated);
        assert_eq!(outcome.phrase_detected.as_deref(), Some("porsche"));
        assert_eq!(outcome.text, "a German sports car drifting at dusk");
    }

    #[test]
    fn test_clean_input_passes_through() {
        let outcome = translator().translate("a red coupe on a mountain pass");
        assert!(!outcome.translated);
        assert!(outcome.phrase_detected.is_none());
        assert_eq!(outcome.text, "a red coupe on a mountain pass");
    }

    #[test]
    fn test_translation_is_idempotent() {
        let tr = translator();
        let once = tr.translate("Porsche 911 hero shot");
        let twice = tr.translate(&once.text);
        assert!(!twice.translated);
        assert_eq!(once.text, twice.text);
    }

    #[test]
    fn test_case_insensitive_replacement_of_all_occurrences() {
        let outcome = translator().translate("PORSCHE next to another porsche");
        assert_eq!(outcome.text, "German sports car next to another German sports car");
    }
}
