//! # Prompt Synthesizer — 合成パイプライン・オーケストレーター
//!
//! 1リクエスト = 1パイプライン。テナント状態の読み取り、規約安全変換、
//! 指示文合成、補完呼び出し、台帳記録、予測、受動強化までを直列に実行する。
//! 補完以外の二次I/O失敗は応答を壊さない。

use foundry_core::contracts::{
    GenerationRequest, NewPromptRecord, OutputKind, PlatformPrediction, PromptMetadata,
    SynthesisOutcome,
};
use foundry_core::error::FoundryError;
use foundry_core::patterns::analyze_history;
use foundry_core::policy::PolicyTranslator;
use foundry_core::prediction::PredictionEngine;
use foundry_core::synthesis::{self, InstructionContext, SynthesisEngine};
use foundry_core::traits::{BrandStore, CompletionEngine, IntelligenceStore, PromptLedger};
use shared::text::InputScrubber;
use std::sync::Arc;
use tracing::{info, warn};
use tuning::TuningCatalog;

/// 記述文の上限。超過は検証エラーにする
const MAX_DESCRIPTION_CHARS: usize = 4000;

/// 履歴から検出したパターンの受動強化ステップ
const PASSIVE_REINFORCEMENT_STEP: f64 = 0.05;

/// テナント状態の読み取り量とサーフェス閾値
#[derive(Debug, Clone, Copy)]
pub struct SynthesisLimits {
    pub history_limit: i64,
    pub intelligence_limit: i64,
    pub min_surfaced_confidence: f64,
}

pub struct PromptSynthesizer {
    brand_store: Arc<dyn BrandStore>,
    intelligence: Arc<dyn IntelligenceStore>,
    ledger: Arc<dyn PromptLedger>,
    completion: Arc<dyn CompletionEngine>,
    translator: PolicyTranslator,
    engine: SynthesisEngine,
    prediction: PredictionEngine,
    scrubber: InputScrubber,
    supported_platforms: Vec<String>,
    limits: SynthesisLimits,
}

fn default_duration(output: OutputKind) -> u32 {
    match output {
        OutputKind::Video => 7,
        OutputKind::Still => 0,
    }
}

impl PromptSynthesizer {
    pub fn new(
        catalog: &TuningCatalog,
        brand_store: Arc<dyn BrandStore>,
        intelligence: Arc<dyn IntelligenceStore>,
        ledger: Arc<dyn PromptLedger>,
        completion: Arc<dyn CompletionEngine>,
        limits: SynthesisLimits,
    ) -> Result<Self, FoundryError> {
        let translator = PolicyTranslator::new(
            catalog.specific_phrases.clone(),
            catalog.generic_phrases.clone(),
        )?;
        let engine =
            SynthesisEngine::new(catalog.templates.clone(), catalog.capabilities.clone())?;
        let prediction = PredictionEngine::new(
            catalog.capabilities.clone(),
            catalog.requirements.clone(),
            catalog.video_roster.clone(),
            catalog.still_roster.clone(),
        );
        let supported_platforms = catalog.capabilities.iter().map(|c| c.id.clone()).collect();

        Ok(Self {
            brand_store,
            intelligence,
            ledger,
            completion,
            translator,
            engine,
            prediction,
            scrubber: InputScrubber::new().max_chars(MAX_DESCRIPTION_CHARS),
            supported_platforms,
            limits,
        })
    }

    pub async fn synthesize(
        &self,
        request: GenerationRequest,
    ) -> Result<SynthesisOutcome, FoundryError> {
        // 1. 入力検証
        let platform = request.platform.to_lowercase();
        if !self.supported_platforms.iter().any(|p| p == &platform) {
            return Err(FoundryError::UnsupportedPlatform {
                platform,
                supported: self.supported_platforms.join(", "),
            });
        }
        if request.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(FoundryError::Validation {
                reason: format!("shot description exceeds {MAX_DESCRIPTION_CHARS} characters"),
            });
        }
        let description = self.scrubber.scrub(&request.description);
        if description.is_empty() {
            return Err(FoundryError::Validation {
                reason: "shot description is required".to_string(),
            });
        }

        let output = request.output;
        let duration_secs = request
            .duration_secs
            .unwrap_or_else(|| default_duration(output));
        let shot_type = request.shot_type.as_deref().unwrap_or("auto").to_string();

        info!(
            "🏭 Synthesis pipeline start: brand={} platform={} output={}",
            request.brand_id,
            platform,
            output.as_str()
        );

        // 2. ブランド取得 (owner 指定時は所有権も同時に検査される)
        let brand = self
            .brand_store
            .fetch_profile(&request.brand_id, request.owner_id.as_deref())
            .await?
            .ok_or_else(|| FoundryError::NotFound {
                resource: "brand".to_string(),
                id: request.brand_id.clone(),
            })?;

        // 3. 履歴と学習済みパターン。読み取り失敗は生成を止めない
        let history = match self
            .ledger
            .fetch_recent(&request.brand_id, self.limits.history_limit)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!("⚠️ 履歴の取得に失敗、空履歴で継続: {}", e);
                Vec::new()
            }
        };
        let analysis = analyze_history(&history);
        let learned = match self
            .intelligence
            .fetch_patterns(
                &request.brand_id,
                self.limits.min_surfaced_confidence,
                self.limits.intelligence_limit,
            )
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!("⚠️ 学習パターンの取得に失敗、空で継続: {}", e);
                Vec::new()
            }
        };

        // 4. 規約安全変換と検証済み既定値
        let translation = self.translator.translate(&description);
        if let Some(phrase) = &translation.phrase_detected {
            info!("🛡️ Restricted phrase rewritten: {}", phrase);
        }
        let defaults = self.engine.apply_defaults(
            &translation.text,
            &shot_type,
            request.screen_direction.as_deref(),
        );

        // 5. 指示文を組み立てて補完を1回だけ呼ぶ
        let ctx = InstructionContext {
            platform: &platform,
            output,
            duration_secs,
            shot_type: &shot_type,
            brand: &brand,
            learned: &learned,
            history: &analysis,
        };
        let instruction = self.engine.build_instruction(&ctx);
        let user_message = synthesis::build_user_message(&translation.text, &defaults);
        let raw_response = self.completion.complete(&instruction, &user_message).await?;

        // 6. 応答解析とプラットフォーム文字数上限
        let parsed = synthesis::parse_completion(&raw_response);
        let char_limit = self.engine.capability_for(&platform).char_limit;
        let (prompt_text, truncation_warning) =
            synthesis::enforce_char_limit(&parsed.prompt_text, char_limit, &platform);
        let mut warnings = Vec::new();
        if let Some(w) = truncation_warning {
            warn!("⚠️ {}", w);
            warnings.push(w);
        }

        // 7. 台帳へ記録。二次書き込みの失敗は応答を壊さない
        let record = NewPromptRecord {
            brand_id: request.brand_id.clone(),
            session_id: request.session_id.clone(),
            user_input: description.clone(),
            prompt_text: prompt_text.clone(),
            platform: platform.clone(),
            shot_type: shot_type.clone(),
            duration_secs,
            output,
            policy_translated: translation.translated,
            phrase_detected: translation.phrase_detected.clone(),
            metadata: PromptMetadata {
                patterns_applied: parsed.patterns_applied.clone(),
                suggestions: parsed.suggestions.clone(),
                issues_reported: Vec::new(),
            },
        };
        let prompt_id = match self.ledger.record_prompt(&record).await {
            Ok(id) => id,
            Err(e) => {
                warn!("⚠️ プロンプト台帳への記録に失敗: {}", e);
                String::new()
            }
        };

        // 8. 予測は変換前の記述で行う (キーワード信号を保つ)
        let prediction = self.prediction.predict(
            &shot_type,
            duration_secs,
            output,
            &description,
            Some(&platform),
        );

        // 9. 履歴から検出したパターンの受動強化
        for pattern in analysis.reinforceable() {
            if let Err(e) = self
                .intelligence
                .upsert_pattern(
                    &request.brand_id,
                    &pattern.pattern_type,
                    &pattern.pattern_value,
                    pattern.frequency,
                    PASSIVE_REINFORCEMENT_STEP,
                    1,
                )
                .await
            {
                warn!("⚠️ 受動強化の書き込みに失敗 ({}): {}", pattern.pattern_type, e);
            }
        }

        info!(
            "🏆 Synthesis complete: {} chars, prediction {}% for {}",
            prompt_text.chars().count(),
            prediction.confidence,
            prediction.recommended_platform
        );

        let technical_notes = format!(
            "Duration: {}s | Shot: {} | Platform: {} | Confidence: {}%",
            duration_secs, shot_type, platform, prediction.confidence
        );

        Ok(SynthesisOutcome {
            prompt_id,
            prompt_text,
            platform,
            shot_type,
            duration_secs,
            output,
            patterns_applied: parsed.patterns_applied,
            suggestions: parsed.suggestions,
            policy_translated: translation.translated,
            phrase_detected: translation.phrase_detected,
            applied_defaults: defaults.modifications,
            prediction,
            warnings,
            technical_notes,
        })
    }

    /// 補完を呼ばずにプラットフォーム予測だけを返す
    pub fn predict(
        &self,
        description: &str,
        platform: Option<&str>,
        output: OutputKind,
        duration_secs: Option<u32>,
        shot_type: Option<&str>,
    ) -> Result<PlatformPrediction, FoundryError> {
        let description = self.scrubber.scrub(description);
        if description.is_empty() {
            return Err(FoundryError::Validation {
                reason: "shot description is required".to_string(),
            });
        }
        let duration = duration_secs.unwrap_or_else(|| default_duration(output));
        let shot = shot_type.unwrap_or("auto");
        let platform = platform.map(|p| p.to_lowercase());
        Ok(self
            .prediction
            .predict(shot, duration, output, &description, platform.as_deref()))
    }
}
