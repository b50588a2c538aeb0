//! # text (Input Scrubber)
//!
//! リクエスト本文の正規化と無害化。Unicode 正規化 (NFC)、制御文字と
//! Bidi 制御文字の除去、文字数上限での切り詰めを行う。

use unicode_normalization::UnicodeNormalization;

/// 入力テキストを無害化する構造体
pub struct InputScrubber {
    max_chars: usize,
}

impl Default for InputScrubber {
    fn default() -> Self {
        Self { max_chars: 4000 }
    }
}

impl InputScrubber {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最大文字数を設定する
    pub fn max_chars(mut self, len: usize) -> Self {
        self.max_chars = len;
        self
    }

    /// 文字列を無害化する
    pub fn scrub(&self, input: &str) -> String {
        // 1. Unicode正規化 (NFC)
        let normalized: String = input.nfc().collect();

        // 2. 制御文字と Bidi 制御文字の除去
        let cleaned: String = normalized
            .chars()
            .filter(|&c| !is_forbidden_char(c))
            .collect();

        // 3. DoS対策: 文字数で切り詰め
        let capped: String = cleaned.chars().take(self.max_chars).collect();

        capped.trim().to_string()
    }
}

fn is_forbidden_char(c: char) -> bool {
    if c.is_control() {
        // 改行とタブは許可する
        return c != '\n' && c != '\t';
    }
    matches!(
        c,
        '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}
