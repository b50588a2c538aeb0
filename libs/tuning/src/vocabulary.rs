//! # Learning Vocabulary — 学習対象の語彙カタログ
//!
//! 高評価プロンプト本文からこの語彙を拾い、ブランド別の傾向として蓄積する。

use foundry_core::patterns::VocabularyEntry;

fn entry(pattern_type: &str, phrase: &str, value: &str) -> VocabularyEntry {
    VocabularyEntry {
        pattern_type: pattern_type.to_string(),
        phrase: phrase.to_string(),
        value: value.to_string(),
    }
}

/// 組み込み学習語彙。phrase は小文字照合、value が蓄積される正規形
pub fn builtin_vocabulary() -> Vec<VocabularyEntry> {
    let mut entries = Vec::new();

    for camera in [
        "lateral tracking",
        "follow behind",
        "wide establishing",
        "static hero",
        "interior",
        "detail",
        "macro",
        "aerial",
        "drone",
        "mounted on left",
        "mounted on right",
    ] {
        entries.push(entry("camera_type", camera, camera));
    }

    for light in [
        "golden hour",
        "blue hour",
        "studio lighting",
        "natural light",
        "dramatic lighting",
        "sunset",
        "overcast",
        "night",
    ] {
        entries.push(entry("lighting", light, light));
    }

    for motion in [
        "steady", "smooth", "fast", "slow", "accelerating", "cruising", "drifting", "cornering",
    ] {
        entries.push(entry("motion_style", motion, motion));
    }

    // 表記ゆれは正規形に寄せる
    entries.push(entry("screen_direction", "left to right", "left-to-right"));
    entries.push(entry("screen_direction", "left-to-right", "left-to-right"));
    entries.push(entry("screen_direction", "right to left", "right-to-left"));
    entries.push(entry("screen_direction", "right-to-left", "right-to-left"));

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_core::patterns::scan_vocabulary;

    #[test]
    fn test_vocabulary_scan_extracts_normalized_direction() {
        let hits = scan_vocabulary(
            "Smooth lateral tracking at golden hour, traveling left to right.",
            &builtin_vocabulary(),
        );
        assert!(hits.contains(&("camera_type".to_string(), "lateral tracking".to_string())));
        assert!(hits.contains(&("lighting".to_string(), "golden hour".to_string())));
        assert!(hits.contains(&("motion_style".to_string(), "smooth".to_string())));
        assert!(hits.contains(&("screen_direction".to_string(), "left-to-right".to_string())));
    }

    #[test]
    fn test_direction_variants_deduplicate() {
        let hits = scan_vocabulary(
            "traveling left-to-right, then left to right again",
            &builtin_vocabulary(),
        );
        let directions: Vec<_> = hits
            .iter()
            .filter(|(t, _)| t == "screen_direction")
            .collect();
        assert_eq!(directions.len(), 1);
    }
}
