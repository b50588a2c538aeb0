//! # Platform Capabilities — 生成プラットフォーム能力カタログ
//!
//! 各プラットフォームには固有の得意分野があり「万能の最良」は存在しない。
//! 評価値 (0-10) とショット要件の重み付けで予測スコアを算出する。

use foundry_core::contracts::{OutputKind, PlatformCapability, ShotRequirements};

/// 組み込みプラットフォーム能力一覧。先頭行が未知ID時の既定
pub fn builtin_capabilities() -> Vec<PlatformCapability> {
    vec![
        PlatformCapability {
            id: "veo3".to_string(),
            vehicle_consistency: 9,
            camera_lock: 10,
            instruction_compliance: 9,
            best_for: vec![
                "Broadcast production".to_string(),
                "Literal execution".to_string(),
                "Product hero shots".to_string(),
                "Camera lock critical shots".to_string(),
                "Single occupant precision".to_string(),
            ],
            weaknesses: vec![
                "May freeze on static subjects without explicit background motion".to_string(),
                "10-minute cooldown between renders".to_string(),
            ],
            notes: "Primary recommendation for broadcast. Respects camera mounting language and \
                screen direction."
                .to_string(),
            outputs: vec![OutputKind::Video],
            char_limit: 5000,
            guidance: "PLATFORM: Google Veo 3 (5000 char limit)\n\
                • Exceptional motion consistency and literal execution\n\
                • Precise speed directives work well (mph/kph)\n\
                • Camera mount language executes perfectly\n\
                • Best for: Automotive, tracking shots, product motion"
                .to_string(),
        },
        PlatformCapability {
            id: "sora".to_string(),
            vehicle_consistency: 7,
            camera_lock: 5,
            instruction_compliance: 6,
            best_for: vec![
                "Cinematic mood pieces".to_string(),
                "Social content (variance is a feature)".to_string(),
                "Human motion".to_string(),
                "Creative exploration".to_string(),
                "When interpretation is welcome".to_string(),
            ],
            weaknesses: vec![
                "Adds passengers despite instructions".to_string(),
                "Camera drifts from locked position".to_string(),
                "Interprets classic versions of vehicles".to_string(),
                "Not production-reliable".to_string(),
            ],
            notes: "Better for mood/social. Variance makes it unreliable for broadcast but \
                creative for exploration."
                .to_string(),
            outputs: vec![OutputKind::Video],
            char_limit: 4000,
            guidance: "PLATFORM: Sora (4000 char limit)\n\
                • Outstanding cinematic lighting and atmosphere\n\
                • Struggles with complex coordinated motion\n\
                • Best for: Atmospheric, mood-focused content\n\
                • Simplify motion, emphasize lighting"
                .to_string(),
        },
        PlatformCapability {
            id: "kling".to_string(),
            vehicle_consistency: 9,
            camera_lock: 9,
            instruction_compliance: 8,
            best_for: vec![
                "Automotive tracking".to_string(),
                "Dynamic environments (waves, weather)".to_string(),
                "10-second sweet spot".to_string(),
                "Modern vehicle accuracy".to_string(),
            ],
            weaknesses: vec![
                "May not parse lane positioning language".to_string(),
                "Needs explicit road position instructions".to_string(),
            ],
            notes: "Excellent for automotive. 10s is optimal duration. Dynamic backgrounds are \
                its strength."
                .to_string(),
            outputs: vec![OutputKind::Video],
            char_limit: 3500,
            guidance: "PLATFORM: Kling (3500 char limit)\n\
                • Strong architectural and product detail\n\
                • Excellent frame-to-frame consistency\n\
                • Best for: Interiors, products, static beauty"
                .to_string(),
        },
        PlatformCapability {
            id: "minimax".to_string(),
            vehicle_consistency: 9,
            camera_lock: 9,
            instruction_compliance: 7,
            best_for: vec![
                "Clean clinical execution".to_string(),
                "Modern vehicle accuracy".to_string(),
                "Consistent tracking".to_string(),
            ],
            weaknesses: vec![
                "Does not parse lane positioning".to_string(),
                "Variance in background interpretation between renders".to_string(),
            ],
            notes: "Clinical precision. Good via Freepik aggregator.".to_string(),
            outputs: vec![OutputKind::Video],
            char_limit: 3000,
            guidance: "PLATFORM: MiniMax Hailuo (3000 char limit)\n\
                • Reliable general-purpose generation\n\
                • Good for standard commercial shots"
                .to_string(),
        },
        PlatformCapability {
            id: "midjourney".to_string(),
            vehicle_consistency: 8,
            camera_lock: 3,
            instruction_compliance: 4,
            best_for: vec![
                "Hero stills".to_string(),
                "Dramatic compositions".to_string(),
                "Reference images for video workflows".to_string(),
            ],
            weaknesses: vec![
                "Ignores camera position instructions".to_string(),
                "Chooses \"dramatic\" over specified angles".to_string(),
                "Screen direction unreliable".to_string(),
                "Stills only".to_string(),
            ],
            notes: "Best for stills. Use with seed for consistency, then animate in Kling/Veo."
                .to_string(),
            outputs: vec![OutputKind::Still],
            char_limit: 2000,
            guidance: "PLATFORM: Midjourney (2000 char limit)\n\
                • Exceptional artistic/stylized output\n\
                • Use --ar for aspect ratio, --v for version\n\
                • Best for: Hero images, concept art"
                .to_string(),
        },
        PlatformCapability {
            id: "runway".to_string(),
            vehicle_consistency: 7,
            camera_lock: 7,
            instruction_compliance: 7,
            best_for: vec![
                "Image-to-video workflows".to_string(),
                "Character reference".to_string(),
                "Extending existing footage".to_string(),
            ],
            weaknesses: vec![
                "Lower vehicle accuracy than dedicated platforms".to_string(),
            ],
            notes: "Solid for image-to-video. Character reference features emerging.".to_string(),
            outputs: vec![OutputKind::Video],
            char_limit: 3500,
            guidance: "PLATFORM: Runway Gen-3 (3500 char limit)\n\
                • Strong motion understanding\n\
                • Good for creative/experimental content"
                .to_string(),
        },
        PlatformCapability {
            id: "flux".to_string(),
            vehicle_consistency: 8,
            camera_lock: 6,
            instruction_compliance: 7,
            best_for: vec![
                "Still images".to_string(),
                "Photorealistic renders".to_string(),
            ],
            weaknesses: vec!["Stills only".to_string()],
            notes: "Quality stills, alternative to Midjourney.".to_string(),
            outputs: vec![OutputKind::Still],
            char_limit: 2500,
            guidance: "PLATFORM: Flux (2500 char limit)\n\
                • Excellent fine detail and accuracy\n\
                • Strong text rendering"
                .to_string(),
        },
    ]
}

/// ショット種別ごとのプラットフォーム要件一覧
pub fn builtin_requirements() -> Vec<ShotRequirements> {
    vec![
        ShotRequirements {
            shot_type: "lateral_track".to_string(),
            camera_lock_importance: 10,
            consistency_importance: 9,
            compliance_importance: 9,
            motion_complexity: 6,
            optimal_duration_min: 5,
            optimal_duration_max: 10,
            prefers_dynamic_background: true,
            prefers_static_camera: false,
        },
        ShotRequirements {
            shot_type: "lateral_track_wide".to_string(),
            camera_lock_importance: 9,
            consistency_importance: 8,
            compliance_importance: 8,
            motion_complexity: 5,
            optimal_duration_min: 5,
            optimal_duration_max: 12,
            prefers_dynamic_background: true,
            prefers_static_camera: false,
        },
        ShotRequirements {
            shot_type: "wide_establish".to_string(),
            camera_lock_importance: 10,
            consistency_importance: 6,
            compliance_importance: 8,
            motion_complexity: 4,
            optimal_duration_min: 5,
            optimal_duration_max: 15,
            prefers_dynamic_background: false,
            prefers_static_camera: true,
        },
        ShotRequirements {
            shot_type: "follow_behind".to_string(),
            camera_lock_importance: 8,
            consistency_importance: 9,
            compliance_importance: 8,
            motion_complexity: 5,
            optimal_duration_min: 5,
            optimal_duration_max: 10,
            prefers_dynamic_background: true,
            prefers_static_camera: false,
        },
        ShotRequirements {
            shot_type: "static_hero".to_string(),
            camera_lock_importance: 10,
            consistency_importance: 10,
            compliance_importance: 9,
            motion_complexity: 2,
            optimal_duration_min: 5,
            optimal_duration_max: 10,
            prefers_dynamic_background: false,
            prefers_static_camera: true,
        },
        ShotRequirements {
            shot_type: "interior".to_string(),
            camera_lock_importance: 8,
            consistency_importance: 7,
            compliance_importance: 8,
            motion_complexity: 4,
            optimal_duration_min: 5,
            optimal_duration_max: 10,
            prefers_dynamic_background: false,
            prefers_static_camera: false,
        },
        ShotRequirements {
            shot_type: "detail".to_string(),
            camera_lock_importance: 9,
            consistency_importance: 10,
            compliance_importance: 9,
            motion_complexity: 2,
            optimal_duration_min: 3,
            optimal_duration_max: 7,
            prefers_dynamic_background: false,
            prefers_static_camera: true,
        },
        ShotRequirements {
            shot_type: "auto".to_string(),
            camera_lock_importance: 7,
            consistency_importance: 8,
            compliance_importance: 7,
            motion_complexity: 5,
            optimal_duration_min: 5,
            optimal_duration_max: 10,
            prefers_dynamic_background: false,
            prefers_static_camera: false,
        },
    ]
}

/// 動画予測で常に比較候補に入れるプラットフォーム (この順でタイブレーク)
pub fn video_roster() -> Vec<String> {
    ["veo3", "kling", "sora", "minimax", "runway"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// 静止画予測の比較候補
pub fn still_roster() -> Vec<String> {
    ["midjourney", "flux"].iter().map(|s| s.to_string()).collect()
}
