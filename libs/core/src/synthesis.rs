//! # Prompt Synthesizer — 指示文の組み立てと応答解析
//!
//! Motion-First 方式の指示文を固定順セクションで合成する。
//! LLM 応答からのマーカー抽出 (`[APPLYING: ...]` / `[SUGGESTION: ...]`) と
//! プラットフォーム別文字数上限の強制もここに置く。

use crate::budget::complexity_budget;
use crate::contracts::{
    BrandIntelligenceRecord, BrandProfile, OutputKind, PlatformCapability, ShotTemplate,
};
use crate::error::FoundryError;
use crate::patterns::HistoryAnalysis;
use regex::Regex;
use std::sync::OnceLock;

/// ユーザーが明示指定した項目を示す番兵値。user message には出力しない
const USER_SPECIFIED: &str = "(user specified)";
const USER_SPECIFIED_ROAD: &str = "(user specified winding road)";

/// 既定値適用の結果
#[derive(Debug, Clone)]
pub struct AppliedDefaults {
    pub occupancy: String,
    pub screen_direction: String,
    pub road_character: String,
    pub lighting: String,
    /// "Applied default: ..." 形式の注記
    pub modifications: Vec<String>,
}

/// LLM 応答の解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCompletion {
    pub prompt_text: String,
    pub patterns_applied: Vec<String>,
    pub suggestions: Vec<String>,
}

/// 指示文合成に必要な文脈一式
pub struct InstructionContext<'a> {
    pub platform: &'a str,
    pub output: OutputKind,
    pub duration_secs: u32,
    pub shot_type: &'a str,
    pub brand: &'a BrandProfile,
    pub learned: &'a [BrandIntelligenceRecord],
    pub history: &'a HistoryAnalysis,
}

/// 指示文合成エンジン。カタログは構築時に注入する
pub struct SynthesisEngine {
    templates: Vec<ShotTemplate>,
    capabilities: Vec<PlatformCapability>,
    auto_index: usize,
}

impl SynthesisEngine {
    /// カタログの健全性 (auto テンプレート存在・能力カタログ非空) を構築時に検証する
    pub fn new(
        templates: Vec<ShotTemplate>,
        capabilities: Vec<PlatformCapability>,
    ) -> Result<Self, FoundryError> {
        let auto_index = templates
            .iter()
            .position(|t| t.id == "auto")
            .ok_or_else(|| FoundryError::CatalogLoad {
                source: anyhow::anyhow!("ショットテンプレートカタログに auto がない"),
            })?;
        if capabilities.is_empty() {
            return Err(FoundryError::CatalogLoad {
                source: anyhow::anyhow!("プラットフォーム能力カタログが空"),
            });
        }
        Ok(Self {
            templates,
            capabilities,
            auto_index,
        })
    }

    /// ショット種別でテンプレートを引く。未知IDは auto に必ずフォールバックする
    pub fn template_for(&self, shot_type: &str) -> &ShotTemplate {
        if let Some(template) = self.templates.iter().find(|t| t.id == shot_type) {
            return template;
        }
        if shot_type != "auto" {
            tracing::warn!("🎞️ 未定義のショット種別 '{shot_type}'。auto テンプレートを適用");
        }
        &self.templates[self.auto_index]
    }

    /// プラットフォーム能力を引く。未知IDはカタログ先頭の能力にフォールバックする
    pub fn capability_for(&self, platform: &str) -> &PlatformCapability {
        if let Some(caps) = self.capabilities.iter().find(|c| c.id == platform) {
            return caps;
        }
        tracing::warn!("🛰️ 未定義のプラットフォーム '{platform}'。既定能力を適用");
        &self.capabilities[0]
    }

    /// 検証済みの既定値 (単独ドライバー・左→右・直線路・ゴールデンアワー) を、
    /// ユーザーが明示しなかった項目にだけ適用する
    pub fn apply_defaults(
        &self,
        user_input: &str,
        shot_type: &str,
        screen_direction: Option<&str>,
    ) -> AppliedDefaults {
        let template = self.template_for(shot_type);
        let lower_input = user_input.to_lowercase();
        let mut modifications = Vec::new();

        let mut occupancy = template.default_occupancy.clone();
        let occupancy_keywords = [
            "passenger",
            "passengers",
            "empty",
            "no driver",
            "family",
            "couple",
            "two people",
        ];
        let has_occupancy = occupancy_keywords.iter().any(|k| lower_input.contains(k));
        if !has_occupancy && !lower_input.contains("driver") {
            modifications.push("Applied default: single driver with sunglasses".to_string());
        } else if has_occupancy {
            occupancy = USER_SPECIFIED.to_string();
        }

        let final_direction = if screen_direction == Some("right-to-left") {
            "traveling screen-right to screen-left".to_string()
        } else {
            template.default_screen_direction.clone()
        };
        let direction_keywords = [
            "left to right",
            "right to left",
            "left-to-right",
            "right-to-left",
        ];
        let has_direction = direction_keywords.iter().any(|k| lower_input.contains(k));
        if !has_direction && screen_direction.is_none() {
            modifications.push("Applied default: screen-left to screen-right".to_string());
        }

        let mut road_character = "Straight road section, gentle curves only.".to_string();
        let curve_keywords = ["winding", "curves", "mountain road", "switchback", "serpentine"];
        if curve_keywords.iter().any(|k| lower_input.contains(k)) {
            road_character = USER_SPECIFIED_ROAD.to_string();
        } else if !lower_input.contains("road") && !lower_input.contains("highway") {
            modifications.push("Applied default: straight road, gentle curves".to_string());
        }

        let mut lighting = "Golden hour sunlight, warm tones.".to_string();
        let lighting_keywords = [
            "night", "noon", "midday", "overcast", "rain", "sunset", "sunrise", "blue hour",
            "studio",
        ];
        let has_lighting = lighting_keywords.iter().any(|k| lower_input.contains(k));
        if !has_lighting && !lower_input.contains("golden hour") {
            modifications.push("Applied default: golden hour lighting".to_string());
        } else if has_lighting {
            lighting = USER_SPECIFIED.to_string();
        }

        AppliedDefaults {
            occupancy,
            screen_direction: final_direction,
            road_character,
            lighting,
            modifications,
        }
    }

    /// 指示文を固定順セクションで合成する
    pub fn build_instruction(&self, ctx: &InstructionContext<'_>) -> String {
        let budget = complexity_budget(ctx.duration_secs);
        let template = self.template_for(ctx.shot_type);
        let caps = self.capability_for(ctx.platform);

        let warning_line = budget
            .warning
            .as_ref()
            .map(|w| format!("⚠️ WARNING: {w}\n"))
            .unwrap_or_default();
        let negative_constraints = template
            .negative_constraints
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");
        let weaknesses_line = if caps.weaknesses.is_empty() {
            String::new()
        } else {
            format!("Watch for: {}\n", caps.weaknesses.join(", "))
        };
        let guidance_line = if caps.guidance.is_empty() {
            String::new()
        } else {
            format!("{}\n", caps.guidance)
        };

        let brand_section = format_brand_context(ctx.brand);
        let learned_section = format_learned_patterns(&ctx.brand.brand_name, ctx.learned);
        let detected_section = format_detected_patterns(ctx.history);

        format!(
            "You are PromptFoundry, a professional broadcast production AI. You generate {output} prompts optimized for {platform}.

## CRITICAL: Motion-First Methodology
For video prompts, structure is MANDATORY:
1. FIRST SENTENCE: Primary motion/movement directive
2. SECOND: Camera behavior/mounting specification
3. THIRD: Subject description
4. FOURTH: Environment and lighting
5. FIFTH: Technical specifications
6. FINAL SENTENCE: Reinforce primary motion (prevents end-of-clip freeze)

This ordering is validated to produce 85%+ first-generation success rate.

## DURATION-COMPLEXITY RULES (Validated Dec 2024)
Duration: {duration} seconds
Maximum Actions: {max_actions}
Maximum Camera Changes: {max_camera_changes}
Maximum Reveals: {max_reveals}
Pacing: {pacing}
{warning_line}
EXCEEDING THIS BUDGET CAUSES TELEPORTATION/SCENE DRIFT. DO NOT EXCEED.

## SHOT TEMPLATE: {template_name}
Camera: {camera}
Framing: {framing}
Motion: {motion}
Default Occupancy: {default_occupancy}
Default Direction: {default_direction}

NEGATIVE CONSTRAINTS (include these):
{negative_constraints}

## PLATFORM: {platform_upper}
{notes}
{guidance_line}Best for: {best_for}
{weaknesses_line}
## CAMERA LANGUAGE (Validated Dec 2024)
USE: \"Camera mounted on tracking vehicle's left side\"
NOT: \"parallel tracking shot\" or \"lateral tracking\"
Mounting language produces better camera lock than behavioral descriptions.

## TECHNICAL SPECIFICATIONS
Always include:
- Shallow depth of field
- Motion blur on background (not subject)
- Frame rate: 24fps for cinematic
- Specific time of day lighting

## BRAND CONTEXT: {brand_name}
{brand_section}{learned_section}{detected_section}
## OUTPUT FORMAT
Generate a single prompt paragraph. No headers, no bullet points, no formatting.
The prompt should flow naturally as continuous prose.
Include all technical specifications inline.
If you applied learned patterns, start with [APPLYING: pattern1, pattern2].
If you notice a new pattern worth saving, end with [SUGGESTION: description].
End with motion reinforcement to prevent freeze.",
            output = ctx.output.as_str(),
            platform = ctx.platform,
            duration = ctx.duration_secs,
            max_actions = budget.max_actions,
            max_camera_changes = budget.max_camera_changes,
            max_reveals = budget.max_reveals,
            pacing = budget.pacing_guidance,
            warning_line = warning_line,
            template_name = template.name,
            camera = template.camera_instruction,
            framing = template.framing_guidance,
            motion = template.motion_guidance,
            default_occupancy = template.default_occupancy,
            default_direction = template.default_screen_direction,
            negative_constraints = negative_constraints,
            platform_upper = ctx.platform.to_uppercase(),
            notes = caps.notes,
            guidance_line = guidance_line,
            best_for = caps.best_for.join(", "),
            weaknesses_line = weaknesses_line,
            brand_name = ctx.brand.brand_name,
            brand_section = brand_section,
            learned_section = learned_section,
            detected_section = detected_section,
        )
    }
}

/// 変換済み入力 + 既定値注記から user message を組み立てる
pub fn build_user_message(translated_input: &str, defaults: &AppliedDefaults) -> String {
    let mut message = translated_input.to_string();
    if !defaults.modifications.is_empty() {
        message.push_str(&format!(
            "\n\n[Defaults applied: {}]",
            defaults.modifications.join("; ")
        ));
    }
    if defaults.occupancy != USER_SPECIFIED {
        message.push_str(&format!("\nOccupancy: {}", defaults.occupancy));
    }
    message.push_str(&format!("\nDirection: {}", defaults.screen_direction));
    if defaults.road_character != USER_SPECIFIED_ROAD {
        message.push_str(&format!("\nRoad: {}", defaults.road_character));
    }
    if defaults.lighting != USER_SPECIFIED {
        message.push_str(&format!("\nLighting: {}", defaults.lighting));
    }
    message
}

static APPLYING_PATTERN: OnceLock<Regex> = OnceLock::new();
static SUGGESTION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn applying_pattern() -> &'static Regex {
    APPLYING_PATTERN.get_or_init(|| Regex::new(r"(?i)\[APPLYING:\s*([^\]]+)\]").unwrap())
}

fn suggestion_pattern() -> &'static Regex {
    SUGGESTION_PATTERN.get_or_init(|| Regex::new(r"(?i)\[SUGGESTION:\s*([^\]]+)\]").unwrap())
}

/// 応答から `[APPLYING: ...]` (先頭1件) と `[SUGGESTION: ...]` (全件) を
/// 抽出し、両マーカーを本文から除去してトリムする
pub fn parse_completion(response: &str) -> ParsedCompletion {
    let mut patterns_applied = Vec::new();
    let mut prompt = response.to_string();

    if let Some(captures) = applying_pattern().captures(response) {
        if let (Some(whole), Some(list)) = (captures.get(0), captures.get(1)) {
            patterns_applied = list
                .as_str()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            prompt = prompt.replacen(whole.as_str(), "", 1).trim().to_string();
        }
    }

    let suggestions: Vec<String> = suggestion_pattern()
        .captures_iter(response)
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .collect();
    prompt = suggestion_pattern()
        .replace_all(&prompt, "")
        .trim()
        .to_string();

    ParsedCompletion {
        prompt_text: prompt,
        patterns_applied,
        suggestions,
    }
}

/// 上限超過時は上限内の最後の文末 (ピリオド) で切り、警告を返す。
/// 文末が見つからない場合はハードカット
pub fn enforce_char_limit(text: &str, limit: usize, platform: &str) -> (String, Option<String>) {
    if text.chars().count() <= limit {
        return (text.to_string(), None);
    }
    let truncated: String = text.chars().take(limit).collect();
    let cut = match truncated.rfind('.') {
        Some(i) if i > 0 => truncated[..=i].to_string(),
        _ => truncated,
    };
    let warning = format!("Prompt truncated to {limit} characters for {platform}");
    (cut, Some(warning))
}

fn format_brand_context(brand: &BrandProfile) -> String {
    let mut section = String::new();
    if let Some(description) = brand.brand_description.as_deref() {
        if !description.is_empty() {
            section.push_str(description);
            section.push('\n');
        }
    }
    if let Some(industry) = brand.industry.as_deref() {
        if !industry.is_empty() {
            section.push_str(&format!("Industry: {industry}\n"));
        }
    }
    if !brand.tone_keywords.is_empty() {
        section.push_str(&format!(
            "BRAND TONE: {}\n(Ensure generated content reflects this brand voice)\n",
            brand.tone_keywords.join(", ")
        ));
    }
    if !brand.visual_rules.is_empty() {
        section.push_str("VISUAL RULES (MUST follow):\n");
        for rule in &brand.visual_rules {
            section.push_str(&format!("- {rule}\n"));
        }
    }
    section
}

fn format_learned_patterns(brand_name: &str, learned: &[BrandIntelligenceRecord]) -> String {
    let lines: Vec<String> = learned
        .iter()
        .filter(|p| p.confidence > 0.6)
        .take(5)
        .map(|p| format!("- {}: {} (used {}x)", p.pattern_type, p.pattern_value, p.occurrences))
        .collect();
    if lines.is_empty() {
        return String::new();
    }
    format!(
        "\n## Learned Preferences for {}\n{}\nApply these learned preferences when relevant.\n",
        brand_name,
        lines.join("\n")
    )
}

fn format_detected_patterns(history: &HistoryAnalysis) -> String {
    let mut section = String::new();
    if !history.detected.is_empty() {
        section.push_str("\n## DETECTED PATTERNS (from recent history)\n");
        for line in &history.detected {
            section.push_str(&format!("- {line}\n"));
        }
        section.push_str("Apply these patterns unless the request explicitly contradicts them.\n");
    }
    if !history.high_rated_phrases.is_empty() {
        section.push_str("\nHIGH-RATED PHRASES (appeared in successful prompts):\n");
        for phrase in &history.high_rated_phrases {
            section.push_str(&format!("- \"{phrase}\"\n"));
        }
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn template(id: &str) -> ShotTemplate {
        ShotTemplate {
            id: id.to_string(),
            name: format!("{id} template"),
            camera_instruction: "Camera mounted on tracking vehicle's left side.".to_string(),
            framing_guidance: "Subject fills 70% of frame.".to_string(),
            motion_guidance: "Constant speed.".to_string(),
            default_occupancy: "Single driver with sunglasses unless otherwise specified."
                .to_string(),
            default_screen_direction: "screen-left to screen-right".to_string(),
            negative_constraints: vec!["No zoom".to_string(), "No Dutch angle".to_string()],
            platform_notes: HashMap::new(),
        }
    }

    fn capability(id: &str) -> PlatformCapability {
        PlatformCapability {
            id: id.to_string(),
            vehicle_consistency: 9,
            camera_lock: 10,
            instruction_compliance: 9,
            best_for: vec!["tracking shots".to_string()],
            weaknesses: vec!["requires explicit instructions".to_string()],
            notes: "Test platform notes.".to_string(),
            outputs: vec![OutputKind::Video],
            char_limit: 5000,
            guidance: "Use precise speed directives.".to_string(),
        }
    }

    fn engine() -> SynthesisEngine {
        SynthesisEngine::new(
            vec![template("lateral_track"), template("auto")],
            vec![capability("veo3")],
        )
        .unwrap()
    }

    fn brand() -> BrandProfile {
        BrandProfile {
            brand_id: "b-1".to_string(),
            owner_id: "o-1".to_string(),
            brand_name: "Coastal Motors".to_string(),
            brand_description: Some("Premium automotive film brand".to_string()),
            industry: Some("Automotive".to_string()),
            tone_keywords: vec!["precise".to_string(), "warm".to_string()],
            visual_rules: vec!["Never show license plates".to_string()],
        }
    }

    #[test]
    fn test_new_requires_auto_template() {
        let result = SynthesisEngine::new(vec![template("lateral_track")], vec![capability("veo3")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_shot_type_falls_back_to_auto() {
        let e = engine();
        assert_eq!(e.template_for("freestyle").id, "auto");
        assert_eq!(e.template_for("lateral_track").id, "lateral_track");
    }

    #[test]
    fn test_defaults_applied_for_plain_input() {
        let e = engine();
        let defaults = e.apply_defaults("a red coupe", "auto", None);
        assert_eq!(defaults.modifications.len(), 4);
        assert!(defaults.modifications.iter().any(|m| m.contains("single driver")));
        assert!(defaults.modifications.iter().any(|m| m.contains("screen-left to screen-right")));
        assert!(defaults.modifications.iter().any(|m| m.contains("straight road")));
        assert!(defaults.modifications.iter().any(|m| m.contains("golden hour")));
    }

    #[test]
    fn test_user_specified_fields_not_defaulted() {
        let e = engine();
        let defaults = e.apply_defaults(
            "a couple driving a winding mountain road at night, left to right",
            "auto",
            None,
        );
        assert!(defaults.modifications.is_empty());
        assert_eq!(defaults.occupancy, USER_SPECIFIED);
        assert_eq!(defaults.road_character, USER_SPECIFIED_ROAD);
        assert_eq!(defaults.lighting, USER_SPECIFIED);
    }

    #[test]
    fn test_screen_direction_override() {
        let e = engine();
        let defaults = e.apply_defaults("a red coupe", "auto", Some("right-to-left"));
        assert_eq!(defaults.screen_direction, "traveling screen-right to screen-left");
        assert!(!defaults
            .modifications
            .iter()
            .any(|m| m.contains("screen-left to screen-right")));
    }

    #[test]
    fn test_user_message_skips_user_specified_sentinels() {
        let e = engine();
        let defaults = e.apply_defaults("a couple at night on a winding road", "auto", None);
        let message = build_user_message("translated input", &defaults);
        assert!(message.starts_with("translated input"));
        assert!(!message.contains("Occupancy:"));
        assert!(!message.contains("Road:"));
        assert!(!message.contains("Lighting:"));
        assert!(message.contains("Direction:"));
    }

    #[test]
    fn test_user_message_carries_default_notes() {
        let e = engine();
        let defaults = e.apply_defaults("a red coupe", "auto", None);
        let message = build_user_message("a red coupe", &defaults);
        assert!(message.contains("[Defaults applied:"));
        assert!(message.contains("Occupancy: Single driver"));
        assert!(message.contains("Lighting: Golden hour"));
    }

    #[test]
    fn test_instruction_contains_budget_and_template() {
        let e = engine();
        let history = HistoryAnalysis::default();
        let ctx = InstructionContext {
            platform: "veo3",
            output: OutputKind::Video,
            duration_secs: 7,
            shot_type: "lateral_track",
            brand: &brand(),
            learned: &[],
            history: &history,
        };
        let instruction = e.build_instruction(&ctx);
        assert!(instruction.contains("Maximum Actions: 1"));
        assert!(instruction.contains("Maximum Camera Changes: 1"));
        assert!(instruction.contains("## SHOT TEMPLATE: lateral_track template"));
        assert!(instruction.contains("## PLATFORM: VEO3"));
        assert!(instruction.contains("- No zoom"));
        assert!(instruction.contains("BRAND TONE: precise, warm"));
        assert!(instruction.contains("[APPLYING: pattern1, pattern2]"));
    }

    #[test]
    fn test_instruction_learned_patterns_filtered_and_capped() {
        let e = engine();
        let learned: Vec<BrandIntelligenceRecord> = (0..8)
            .map(|i| BrandIntelligenceRecord {
                brand_id: "b-1".to_string(),
                pattern_type: "lighting".to_string(),
                pattern_value: format!("value-{i}"),
                confidence: if i < 6 { 0.9 } else { 0.4 },
                occurrences: i + 1,
                last_seen: "2025-01-01T00:00:00Z".to_string(),
            })
            .collect();
        let history = HistoryAnalysis::default();
        let ctx = InstructionContext {
            platform: "veo3",
            output: OutputKind::Video,
            duration_secs: 7,
            shot_type: "auto",
            brand: &brand(),
            learned: &learned,
            history: &history,
        };
        let instruction = e.build_instruction(&ctx);
        assert!(instruction.contains("Learned Preferences for Coastal Motors"));
        assert!(instruction.contains("value-0"));
        assert!(instruction.contains("value-4"));
        assert!(!instruction.contains("value-5"));
        assert!(!instruction.contains("value-6"));
    }

    #[test]
    fn test_parse_completion_extracts_markers() {
        let response = "[APPLYING: golden hour, tracking camera]\nThe car glides along the coast. \
             [SUGGESTION: brand prefers wet asphalt]";
        let parsed = parse_completion(response);
        assert_eq!(
            parsed.patterns_applied,
            vec!["golden hour".to_string(), "tracking camera".to_string()]
        );
        assert_eq!(parsed.suggestions, vec!["brand prefers wet asphalt".to_string()]);
        assert_eq!(parsed.prompt_text, "The car glides along the coast.");
    }

    #[test]
    fn test_parse_completion_without_markers() {
        let parsed = parse_completion("Plain prompt text.");
        assert!(parsed.patterns_applied.is_empty());
        assert!(parsed.suggestions.is_empty());
        assert_eq!(parsed.prompt_text, "Plain prompt text.");
    }

    #[test]
    fn test_parse_completion_case_insensitive() {
        let parsed = parse_completion("[applying: one] body [suggestion: two]");
        assert_eq!(parsed.patterns_applied, vec!["one".to_string()]);
        assert_eq!(parsed.suggestions, vec!["two".to_string()]);
        assert_eq!(parsed.prompt_text, "body");
    }

    #[test]
    fn test_char_limit_cuts_at_sentence_boundary() {
        let text = "First sentence. Second sentence that runs long.";
        let (cut, warning) = enforce_char_limit(text, 20, "veo3");
        assert_eq!(cut, "First sentence.");
        assert_eq!(
            warning.as_deref(),
            Some("Prompt truncated to 20 characters for veo3")
        );
    }

    #[test]
    fn test_char_limit_hard_cut_without_period() {
        let text = "no sentence boundary here at all just words";
        let (cut, warning) = enforce_char_limit(text, 10, "kling");
        assert_eq!(cut, "no sentenc");
        assert!(warning.is_some());
    }

    #[test]
    fn test_char_limit_under_limit_untouched() {
        let (cut, warning) = enforce_char_limit("short.", 100, "veo3");
        assert_eq!(cut, "short.");
        assert!(warning.is_none());
    }
}
