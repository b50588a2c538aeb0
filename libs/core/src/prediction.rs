//! # Prediction Engine — プラットフォーム成功予測
//!
//! ショット種別・尺・出力種別・記述文から、各プラットフォームの
//! 4因子スコア (カメラ要求 30% / ショット適合 25% / 尺適合 20% / 固有強度 25%)
//! を合成し、推奨プラットフォームと代替案を導出する。
//! カタログは構築時に注入する。テーブル参照のみで外部I/Oなし。

use crate::contracts::{
    AlternativePlatform, OutputKind, PlatformCapability, PlatformPrediction, PlatformScore,
    PredictionFactors, ShotRequirements,
};
use std::collections::HashMap;

pub struct PredictionEngine {
    capabilities: HashMap<String, PlatformCapability>,
    requirements: HashMap<String, ShotRequirements>,
    /// 候補順がタイブレーク順を兼ねる
    video_roster: Vec<String>,
    still_roster: Vec<String>,
}

impl PredictionEngine {
    pub fn new(
        capabilities: Vec<PlatformCapability>,
        requirements: Vec<ShotRequirements>,
        video_roster: Vec<String>,
        still_roster: Vec<String>,
    ) -> Self {
        let capabilities = capabilities
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let requirements = requirements
            .into_iter()
            .map(|r| (r.shot_type.clone(), r))
            .collect();
        Self {
            capabilities,
            requirements,
            video_roster,
            still_roster,
        }
    }

    /// 1プラットフォームの4因子スコアを算出する。
    /// 未知のプラットフォーム/ショット種別は中立値 (全因子50) に退避する
    pub fn score_platform(
        &self,
        platform: &str,
        shot_type: &str,
        duration_secs: u32,
        output: OutputKind,
        description: &str,
    ) -> PlatformScore {
        let (caps, reqs) = match (
            self.capabilities.get(platform),
            self.requirements.get(shot_type),
        ) {
            (Some(c), Some(r)) => (c, r),
            _ => {
                return PlatformScore {
                    platform: platform.to_string(),
                    score: 50,
                    factors: PredictionFactors {
                        shot_type_match: 50,
                        duration_fit: 50,
                        camera_requirement: 50,
                        platform_strength: 50,
                    },
                    warnings: vec!["Unknown platform or shot type".to_string()],
                };
            }
        };

        let mut warnings = Vec::new();

        // 因子1: カメラ要求適合 (30%)
        let camera_score = (f64::from(caps.camera_lock) / 10.0 * 100.0).min(100.0);
        let camera_weight = f64::from(reqs.camera_lock_importance) / 10.0;
        let camera_requirement = camera_score * camera_weight + 100.0 * (1.0 - camera_weight);
        if reqs.camera_lock_importance >= 9 && caps.camera_lock < 8 {
            warnings.push(format!("{platform} may drift on camera-critical shots"));
        }

        // 因子2: ショット種別適合 (25%)
        let consistency_score = (f64::from(caps.vehicle_consistency) / 10.0 * 100.0).min(100.0);
        let consistency_weight = f64::from(reqs.consistency_importance) / 10.0;
        let shot_type_match =
            consistency_score * consistency_weight + 100.0 * (1.0 - consistency_weight);
        if reqs.consistency_importance >= 9 && caps.vehicle_consistency < 8 {
            warnings.push(format!("{platform} may show vehicle inconsistency"));
        }

        // 因子3: 尺適合 (20%)
        let mut duration_fit = 100.0;
        if duration_secs < reqs.optimal_duration_min {
            duration_fit = 70.0;
            warnings.push("Duration may be too short for this shot type".to_string());
        } else if duration_secs > reqs.optimal_duration_max {
            duration_fit = 60.0;
            warnings.push(
                "Duration exceeds optimal range - consistency may degrade".to_string(),
            );
        }
        // 実測に基づくスイートスポット補正
        if platform == "kling" && (8..=10).contains(&duration_secs) {
            duration_fit = (duration_fit + 15.0).min(100.0);
        }
        if platform == "veo3" && duration_secs <= 8 {
            duration_fit = (duration_fit + 10.0).min(100.0);
        }
        if platform == "sora" && duration_secs > 10 {
            duration_fit = (duration_fit + 5.0).min(100.0);
        }

        // 因子4: プラットフォーム固有強度 (25%)
        let mut platform_strength = f64::from(caps.instruction_compliance) / 10.0 * 100.0;
        let lower_input = description.to_lowercase();
        match platform {
            "veo3" => {
                if reqs.prefers_static_camera {
                    platform_strength += 10.0;
                }
                if shot_type == "lateral_track" || shot_type == "lateral_track_wide" {
                    platform_strength += 10.0;
                }
                if shot_type == "static_hero" {
                    platform_strength += 5.0;
                }
            }
            "kling" => {
                if reqs.prefers_dynamic_background {
                    platform_strength += 15.0;
                }
                if shot_type == "follow_behind" {
                    platform_strength += 10.0;
                }
                if lower_input.contains("ocean")
                    || lower_input.contains("waves")
                    || lower_input.contains("weather")
                {
                    platform_strength += 10.0;
                }
            }
            "sora" => {
                if lower_input.contains("cinematic") || lower_input.contains("mood") {
                    platform_strength += 10.0;
                }
                if lower_input.contains("person")
                    || lower_input.contains("human")
                    || lower_input.contains("people")
                {
                    platform_strength += 15.0;
                }
                if reqs.camera_lock_importance >= 9 {
                    platform_strength -= 15.0;
                }
            }
            "minimax" => {
                if shot_type == "lateral_track" || shot_type == "lateral_track_wide" {
                    platform_strength += 10.0;
                }
            }
            _ => {}
        }
        if output == OutputKind::Still {
            platform_strength = if caps.supports(OutputKind::Still) {
                90.0
            } else {
                30.0
            };
        } else if !caps.supports(OutputKind::Video) {
            platform_strength = 0.0;
        }
        platform_strength = platform_strength.clamp(0.0, 100.0);

        let weighted = camera_requirement * 0.30
            + shot_type_match * 0.25
            + duration_fit * 0.20
            + platform_strength * 0.25;
        let mut score = (weighted.round() as i64).clamp(0, 100) as u32;

        // 出力種別の不一致は合成不能。総合スコアを0に落とし明示的に警告する
        if !caps.supports(output) {
            score = 0;
            warnings.push(match output {
                OutputKind::Video => format!("{platform} does not generate video"),
                OutputKind::Still => format!("{platform} does not generate stills"),
            });
        }

        PlatformScore {
            platform: platform.to_string(),
            score,
            factors: PredictionFactors {
                shot_type_match: shot_type_match.round() as u32,
                duration_fit: duration_fit.round() as u32,
                camera_requirement: camera_requirement.round() as u32,
                platform_strength: platform_strength.round() as u32,
            },
            warnings,
        }
    }

    /// 出力種別に応じた候補一覧を全評価し、降順ランキングから推奨を導く。
    /// 指名プラットフォームが候補外でも必ず追加評価して比較可能にする
    pub fn predict(
        &self,
        shot_type: &str,
        duration_secs: u32,
        output: OutputKind,
        description: &str,
        requested_platform: Option<&str>,
    ) -> PlatformPrediction {
        let mut candidates: Vec<String> = match output {
            OutputKind::Still => self.still_roster.clone(),
            OutputKind::Video => self.video_roster.clone(),
        };
        if let Some(requested) = requested_platform {
            if !candidates.iter().any(|c| c == requested) {
                candidates.push(requested.to_string());
            }
        }

        let mut scores: Vec<PlatformScore> = candidates
            .iter()
            .map(|p| self.score_platform(p, shot_type, duration_secs, output, description))
            .collect();
        // 安定ソート: 同点は候補順を維持する
        scores.sort_by(|a, b| b.score.cmp(&a.score));

        let best = &scores[0];
        let alternatives: Vec<AlternativePlatform> = scores
            .iter()
            .skip(1)
            .take(2)
            .map(|s| AlternativePlatform {
                platform: s.platform.clone(),
                score: s.score,
                note: alternative_note(&s.platform).to_string(),
            })
            .collect();

        let rationale = self.rationale(&best.platform, shot_type, duration_secs);
        let mut warnings = best.warnings.clone();
        if let Some(requested) = requested_platform {
            if requested != best.platform {
                if let Some(entry) = scores.iter().find(|s| s.platform == requested) {
                    if entry.score + 10 < best.score {
                        warnings.push(format!(
                            "{} scores {}% vs {} at {}%. Consider switching.",
                            requested, entry.score, best.platform, best.score
                        ));
                    }
                }
            }
        }

        PlatformPrediction {
            recommended_platform: best.platform.clone(),
            confidence: best.score,
            rationale,
            alternatives,
            warnings,
            factors: best.factors,
        }
    }

    fn rationale(&self, platform: &str, shot_type: &str, duration_secs: u32) -> String {
        let mut strengths: Vec<&str> = Vec::new();
        if let Some(caps) = self.capabilities.get(platform) {
            if caps.camera_lock >= 9 {
                strengths.push("excellent camera lock");
            }
            if caps.vehicle_consistency >= 9 {
                strengths.push("high vehicle consistency");
            }
            match platform {
                "veo3" => strengths.push("broadcast-grade literal execution"),
                "kling" => {
                    strengths.push("dynamic backgrounds");
                    if (8..=10).contains(&duration_secs) {
                        strengths.push("optimal 10s duration range");
                    }
                }
                "sora" => strengths.push("cinematic interpretation"),
                "minimax" => strengths.push("clinical precision"),
                _ => {}
            }
        }

        let shot_name = shot_display_name(shot_type);
        if strengths.is_empty() {
            format!("{platform} is a reasonable choice for {shot_name}.")
        } else {
            format!("{platform} excels at {shot_name} with {}.", strengths.join(", "))
        }
    }
}

fn shot_display_name(shot_type: &str) -> &str {
    match shot_type {
        "lateral_track" => "lateral tracking shots",
        "lateral_track_wide" => "wide tracking shots",
        "wide_establish" => "establishing shots",
        "follow_behind" => "follow shots",
        "static_hero" => "static hero shots",
        "interior" => "interior shots",
        "detail" => "detail shots",
        "auto" => "general shots",
        other => other,
    }
}

fn alternative_note(platform: &str) -> &'static str {
    match platform {
        "kling" => "Better for dynamic backgrounds (waves, weather)",
        "veo3" => "More literal execution, stricter camera lock",
        "sora" => "Better for mood pieces and human motion",
        "minimax" => "Clinical precision via Freepik aggregator",
        "runway" => "Better for image-to-video workflows",
        "midjourney" => "Best for hero stills with seed consistency",
        "flux" => "Photorealistic stills alternative",
        _ => "Alternative option",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(id: &str, vc: u8, cl: u8, ic: u8, outputs: Vec<OutputKind>) -> PlatformCapability {
        PlatformCapability {
            id: id.to_string(),
            vehicle_consistency: vc,
            camera_lock: cl,
            instruction_compliance: ic,
            best_for: vec![],
            weaknesses: vec![],
            notes: String::new(),
            outputs,
            char_limit: 4000,
            guidance: String::new(),
        }
    }

    fn req(shot: &str, cam: u8, cons: u8, comp: u8, min: u32, max: u32) -> ShotRequirements {
        ShotRequirements {
            shot_type: shot.to_string(),
            camera_lock_importance: cam,
            consistency_importance: cons,
            compliance_importance: comp,
            motion_complexity: 5,
            optimal_duration_min: min,
            optimal_duration_max: max,
            prefers_dynamic_background: false,
            prefers_static_camera: false,
        }
    }

    fn engine() -> PredictionEngine {
        PredictionEngine::new(
            vec![
                cap("alpha", 9, 10, 9, vec![OutputKind::Video]),
                cap("beta", 7, 5, 6, vec![OutputKind::Video]),
                cap("stillco", 8, 3, 4, vec![OutputKind::Still]),
            ],
            vec![req("tracking", 10, 9, 9, 5, 10), req("auto", 7, 8, 7, 5, 10)],
            vec!["alpha".to_string(), "beta".to_string()],
            vec!["stillco".to_string()],
        )
    }

    #[test]
    fn test_all_scores_within_bounds_and_winner_is_max() {
        let e = engine();
        let prediction = e.predict("tracking", 7, OutputKind::Video, "coastal road", None);
        assert!(prediction.confidence <= 100);
        for alt in &prediction.alternatives {
            assert!(alt.score <= 100);
            assert!(alt.score <= prediction.confidence);
        }
        assert_eq!(prediction.recommended_platform, "alpha");
    }

    #[test]
    fn test_unknown_platform_scores_neutral_with_warning() {
        let e = engine();
        let score = e.score_platform("nonexistent", "tracking", 7, OutputKind::Video, "x");
        assert_eq!(score.score, 50);
        assert_eq!(score.factors.camera_requirement, 50);
        assert!(score.warnings.iter().any(|w| w.contains("Unknown")));
    }

    #[test]
    fn test_unknown_shot_type_scores_neutral() {
        let e = engine();
        let score = e.score_platform("alpha", "freestyle", 7, OutputKind::Video, "x");
        assert_eq!(score.score, 50);
    }

    #[test]
    fn test_still_request_on_video_platform_is_zero_with_warning() {
        let e = engine();
        let score = e.score_platform("alpha", "tracking", 0, OutputKind::Still, "hero shot");
        assert_eq!(score.score, 0);
        assert!(score.warnings.iter().any(|w| w.contains("does not generate stills")));
    }

    #[test]
    fn test_video_request_on_still_platform_is_zero_with_warning() {
        let e = engine();
        let score = e.score_platform("stillco", "tracking", 7, OutputKind::Video, "x");
        assert_eq!(score.score, 0);
        assert_eq!(score.factors.platform_strength, 0);
        assert!(score.warnings.iter().any(|w| w.contains("does not generate video")));
    }

    #[test]
    fn test_duration_outside_window_penalized_with_warning() {
        let e = engine();
        let short = e.score_platform("beta", "tracking", 3, OutputKind::Video, "x");
        assert_eq!(short.factors.duration_fit, 70);
        assert!(short.warnings.iter().any(|w| w.contains("too short")));

        let long = e.score_platform("beta", "tracking", 14, OutputKind::Video, "x");
        assert_eq!(long.factors.duration_fit, 60);
        assert!(long.warnings.iter().any(|w| w.contains("exceeds optimal range")));
    }

    #[test]
    fn test_drift_warning_on_weak_camera_lock() {
        let e = engine();
        let score = e.score_platform("beta", "tracking", 7, OutputKind::Video, "x");
        assert!(score.warnings.iter().any(|w| w.contains("may drift")));
        assert!(score.warnings.iter().any(|w| w.contains("vehicle inconsistency")));
    }

    #[test]
    fn test_requested_platform_appended_and_switch_warning() {
        let e = engine();
        let prediction =
            e.predict("tracking", 7, OutputKind::Video, "coastal road", Some("stillco"));
        assert_eq!(prediction.recommended_platform, "alpha");
        assert!(prediction
            .warnings
            .iter()
            .any(|w| w.contains("Consider switching")));
    }

    #[test]
    fn test_no_switch_warning_when_requested_wins() {
        let e = engine();
        let prediction = e.predict("auto", 7, OutputKind::Video, "x", Some("alpha"));
        assert_eq!(prediction.recommended_platform, "alpha");
        assert!(!prediction
            .warnings
            .iter()
            .any(|w| w.contains("Consider switching")));
    }

    #[test]
    fn test_alternatives_capped_at_two() {
        let e = engine();
        let prediction = e.predict("tracking", 7, OutputKind::Video, "x", Some("zeta"));
        assert!(prediction.alternatives.len() <= 2);
    }
}
