//! # Pattern Analysis — 履歴からの受動学習
//!
//! 直近のプロンプト履歴を走査して反復傾向 (fps・カメラ・プラットフォーム・
//! 高評価フレーズ) を検出する純ロジックと、評価済みプロンプト本文を
//! 学習語彙と突き合わせるスキャナを提供する。語彙は注入制。

use crate::contracts::{DetectedPattern, PromptRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 学習語彙の1エントリ。トリガー語にヒットしたら (pattern_type, value) を学習する
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub pattern_type: String,
    /// 小文字トリガー (部分一致)
    pub phrase: String,
    /// 格納する正規値 (通常はトリガーと同一)
    pub value: String,
}

/// 履歴走査の結果
#[derive(Debug, Clone, Default)]
pub struct HistoryAnalysis {
    /// 指示文に差し込む人間可読の検出サマリ
    pub detected: Vec<String>,
    pub fps: Option<DetectedPattern>,
    pub camera_movement: Option<DetectedPattern>,
    pub preferred_platform: Option<DetectedPattern>,
    pub high_rated_phrases: Vec<String>,
}

impl HistoryAnalysis {
    /// ストアへ受動強化すべきパターンの一覧
    pub fn reinforceable(&self) -> Vec<&DetectedPattern> {
        [&self.fps, &self.camera_movement, &self.preferred_platform]
            .into_iter()
            .flatten()
            .collect()
    }
}

const CAMERA_MOVEMENTS: [&str; 9] = [
    "tracking",
    "dolly",
    "pan",
    "tilt",
    "static",
    "handheld",
    "crane",
    "steadicam",
    "locked",
];

static FPS_PATTERN: OnceLock<Regex> = OnceLock::new();

fn fps_pattern() -> &'static Regex {
    FPS_PATTERN.get_or_init(|| Regex::new(r"(?i)(\d+)\s*fps").unwrap())
}

/// 直近履歴からパターンを検出する。3件未満の履歴は信号として扱わない
pub fn analyze_history(records: &[PromptRecord]) -> HistoryAnalysis {
    let mut analysis = HistoryAnalysis::default();
    if records.len() < 3 {
        return analysis;
    }

    // fps 指定の多数派 (50%以上)
    let fps_hits: Vec<String> = records
        .iter()
        .filter_map(|r| {
            fps_pattern()
                .captures(&r.prompt_text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .collect();
    if let Some((value, frequency)) = top_occurrence(&fps_hits) {
        if frequency >= 0.5 {
            analysis.detected.push(format!(
                "{value}fps ({}% of prompts)",
                (frequency * 100.0).round() as u32
            ));
            analysis.fps = Some(DetectedPattern {
                pattern_type: "fps_preference".to_string(),
                pattern_value: value,
                frequency,
            });
        }
    }

    // カメラ動作語彙の多数派 (40%以上)
    let movement_hits: Vec<String> = records
        .iter()
        .filter_map(|r| {
            let text = r.prompt_text.to_lowercase();
            CAMERA_MOVEMENTS
                .iter()
                .find(|m| text.contains(**m))
                .map(|m| m.to_string())
        })
        .collect();
    if let Some((value, frequency)) = top_occurrence(&movement_hits) {
        if frequency >= 0.4 {
            analysis.detected.push(format!(
                "{value} camera ({}% of prompts)",
                (frequency * 100.0).round() as u32
            ));
            analysis.camera_movement = Some(DetectedPattern {
                pattern_type: "camera_preference".to_string(),
                pattern_value: value,
                frequency,
            });
        }
    }

    // プラットフォーム偏好 (50%以上)
    let platforms: Vec<String> = records.iter().map(|r| r.platform.clone()).collect();
    if let Some((value, frequency)) = top_occurrence(&platforms) {
        if frequency >= 0.5 {
            analysis.detected.push(format!(
                "Prefers {value} ({}%)",
                (frequency * 100.0).round() as u32
            ));
            analysis.preferred_platform = Some(DetectedPattern {
                pattern_type: "platform_preference".to_string(),
                pattern_value: value,
                frequency,
            });
        }
    }

    // 高評価プロンプトに共通する3語フレーズ
    let high_rated: Vec<&PromptRecord> = records
        .iter()
        .filter(|r| r.rating.map(|f| f.is_positive()).unwrap_or(false))
        .collect();
    if high_rated.len() >= 2 {
        let texts: Vec<&str> = high_rated.iter().map(|r| r.prompt_text.as_str()).collect();
        analysis.high_rated_phrases = common_phrases(&texts);
    }

    analysis
}

/// 語彙スキャン。本文にトリガーが含まれる全エントリの (type, value) を
/// 重複排除して返す。未知語は黙ってスキップ
pub fn scan_vocabulary(prompt_text: &str, vocabulary: &[VocabularyEntry]) -> Vec<(String, String)> {
    let text = prompt_text.to_lowercase();
    let mut hits: Vec<(String, String)> = Vec::new();
    for entry in vocabulary {
        if text.contains(&entry.phrase) {
            let pair = (entry.pattern_type.clone(), entry.value.clone());
            if !hits.contains(&pair) {
                hits.push(pair);
            }
        }
    }
    hits
}

/// 出現頻度が最大の値を返す。頻度の分母はヒット総数。同率は先着優先
fn top_occurrence(items: &[String]) -> Option<(String, f64)> {
    if items.is_empty() {
        return None;
    }
    let mut counts: Vec<(&String, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(v, _)| *v == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    let total = items.len() as f64;
    let mut top: Option<(&String, f64)> = None;
    for (value, count) in &counts {
        let frequency = *count as f64 / total;
        if top.map(|(_, f)| frequency > f).unwrap_or(true) {
            top = Some((value, frequency));
        }
    }
    top.map(|(v, f)| (v.clone(), f))
}

/// 2回以上出現した3語フレーズを出現数降順で最大3件返す
fn common_phrases(texts: &[&str]) -> Vec<String> {
    let mut phrases: Vec<(String, usize)> = Vec::new();
    for text in texts {
        let words: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.to_string())
            .collect();
        for window in words.windows(3) {
            let phrase = window.join(" ");
            match phrases.iter_mut().find(|(p, _)| *p == phrase) {
                Some((_, n)) => *n += 1,
                None => phrases.push((phrase, 1)),
            }
        }
    }
    let mut repeated: Vec<(String, usize)> = phrases
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1));
    repeated.into_iter().take(3).map(|(p, _)| p).collect()
}
