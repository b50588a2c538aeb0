//! # Shot Templates — 検証済みショット構図カタログ
//!
//! カメラは挙動記述ではなくマウント位置の言葉で指定する。
//! "Camera mounted on tracking vehicle's left side" の方が
//! "parallel tracking shot" より確実にカメラが固定される。

use foundry_core::contracts::ShotTemplate;
use std::collections::HashMap;

fn notes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// 組み込みショットテンプレート一覧。auto を必ず含む
pub fn builtin_templates() -> Vec<ShotTemplate> {
    vec![
        ShotTemplate {
            id: "lateral_track".to_string(),
            name: "Lateral Tracking (Tight)".to_string(),
            camera_instruction: "Camera mounted on tracking vehicle's left side maintains fixed \
                lateral position, capturing full driver's side profile."
                .to_string(),
            framing_guidance: "Subject fills 70% of frame. Shallow depth of field, sharp focus on \
                subject."
                .to_string(),
            motion_guidance: "Subject drives steadily. Camera maintains consistent distance and \
                angle throughout."
                .to_string(),
            default_occupancy: "Single male driver with sunglasses, hands on steering wheel."
                .to_string(),
            default_screen_direction: "traveling screen-left to screen-right".to_string(),
            negative_constraints: vec![
                "Camera does not rotate or orbit around vehicle".to_string(),
                "No zoom or focal length changes".to_string(),
                "No Dutch angle".to_string(),
                "Camera maintaining consistent side angle throughout".to_string(),
            ],
            platform_notes: notes(&[
                ("veo3", "Excellent. Respects camera lock."),
                ("sora", "May drift to front 3/4 view. May add passengers."),
                ("kling", "Excellent consistency. Dynamic backgrounds."),
                (
                    "midjourney",
                    "Ignores camera position for \"dramatic\" angles. Stills only.",
                ),
            ]),
        },
        ShotTemplate {
            id: "lateral_track_wide".to_string(),
            name: "Lateral Tracking (Wide)".to_string(),
            camera_instruction: "Camera mounted on tracking vehicle's left side at moderate \
                distance, capturing full vehicle in frame with environmental context."
                .to_string(),
            framing_guidance: "Full vehicle visible with road and environment. Subject at 40-50% \
                of frame."
                .to_string(),
            motion_guidance: "Subject drives steadily. Camera maintains consistent distance \
                showing full vehicle plus surroundings."
                .to_string(),
            default_occupancy: "Single driver visible through windows.".to_string(),
            default_screen_direction: "traveling screen-left to screen-right".to_string(),
            negative_constraints: vec![
                "Camera does not close in or pull back".to_string(),
                "No rotation around vehicle".to_string(),
                "Maintain wide framing throughout".to_string(),
            ],
            platform_notes: HashMap::new(),
        },
        ShotTemplate {
            id: "wide_establish".to_string(),
            name: "Wide Establishing Shot".to_string(),
            camera_instruction: "Static camera on tripod, wide focal length. Subject enters from \
                screen edge."
                .to_string(),
            framing_guidance: "Environment-forward composition. Subject at 20-30% of frame. \
                Emphasize location."
                .to_string(),
            motion_guidance: "Subject enters frame and travels across. Camera remains locked."
                .to_string(),
            default_occupancy: "Driver visible as silhouette.".to_string(),
            default_screen_direction: "entering from screen-left, traveling right".to_string(),
            negative_constraints: vec![
                "Camera locked on tripod".to_string(),
                "No pan, no tilt, no zoom".to_string(),
                "No camera movement of any kind".to_string(),
            ],
            platform_notes: HashMap::new(),
        },
        ShotTemplate {
            id: "follow_behind".to_string(),
            name: "Follow Behind".to_string(),
            camera_instruction: "Camera mounted on trailing vehicle, centered behind subject. \
                Slight elevation to see over subject roof."
                .to_string(),
            framing_guidance: "Subject centered in frame. Road extends ahead. Horizon visible \
                above roofline."
                .to_string(),
            motion_guidance: "Subject drives away from camera at consistent pace. Camera follows \
                at fixed distance."
                .to_string(),
            default_occupancy: "Single driver, seen from behind through rear window.".to_string(),
            default_screen_direction: "traveling away from camera toward horizon".to_string(),
            negative_constraints: vec![
                "Camera does not pass or overtake subject".to_string(),
                "Maintain fixed following distance".to_string(),
                "No side-to-side movement".to_string(),
            ],
            platform_notes: HashMap::new(),
        },
        ShotTemplate {
            id: "static_hero".to_string(),
            name: "Static Hero".to_string(),
            camera_instruction: "Camera on tripod at eye level or slightly below. Subject \
                stationary, camera locked."
                .to_string(),
            framing_guidance: "Subject positioned using rule of thirds. Clean background, no \
                distractions."
                .to_string(),
            motion_guidance: "Subject is stationary. Background has subtle motion: clouds moving, \
                dust particles, leaves, light changes."
                .to_string(),
            default_occupancy: "Empty vehicle, no occupants.".to_string(),
            default_screen_direction: "facing screen-right (3/4 front view) or screen-left (3/4 \
                rear view)"
                .to_string(),
            negative_constraints: vec![
                "Vehicle does not move".to_string(),
                "Camera locked, no movement".to_string(),
                "No zoom, no rack focus".to_string(),
            ],
            platform_notes: notes(&[
                ("veo3", "May need explicit background motion or will freeze."),
                ("sora", "Better lighting on static subjects."),
                ("kling", "Include explicit background elements for motion."),
            ]),
        },
        ShotTemplate {
            id: "interior".to_string(),
            name: "Interior POV".to_string(),
            camera_instruction: "Camera mounted on dashboard or passenger seat, facing driver or \
                through windshield."
                .to_string(),
            framing_guidance: "Interior fills frame. Windshield view shows road ahead. Steering \
                wheel and hands visible."
                .to_string(),
            motion_guidance: "View through windshield shows forward movement. Driver makes subtle \
                steering adjustments."
                .to_string(),
            default_occupancy: "Driver in profile, hands at 9-and-3 on wheel.".to_string(),
            default_screen_direction: "forward motion visible through windshield".to_string(),
            negative_constraints: vec![
                "Camera stays inside vehicle".to_string(),
                "No exterior shots".to_string(),
                "Consistent interior lighting".to_string(),
            ],
            platform_notes: HashMap::new(),
        },
        ShotTemplate {
            id: "detail".to_string(),
            name: "Detail/Macro".to_string(),
            camera_instruction: "Close-up camera, shallow depth of field, focused on specific \
                element."
                .to_string(),
            framing_guidance: "Detail element fills frame. Extreme shallow DOF, background \
                abstract."
                .to_string(),
            motion_guidance: "Very subtle dolly or rack focus. Light movement preferred over \
                camera movement."
                .to_string(),
            default_occupancy: "N/A - detail shots focus on vehicle elements, not occupants."
                .to_string(),
            default_screen_direction: "N/A".to_string(),
            negative_constraints: vec![
                "Maintain extreme close-up framing".to_string(),
                "No pull-back to reveal".to_string(),
                "Focus stays locked on detail".to_string(),
            ],
            platform_notes: HashMap::new(),
        },
        ShotTemplate {
            id: "auto".to_string(),
            name: "Auto-Select".to_string(),
            camera_instruction: "Camera position determined by scene requirements.".to_string(),
            framing_guidance: "Appropriate framing for the action described.".to_string(),
            motion_guidance: "Motion appropriate to duration and complexity budget.".to_string(),
            default_occupancy: "Single driver with sunglasses unless otherwise specified."
                .to_string(),
            default_screen_direction: "screen-left to screen-right".to_string(),
            negative_constraints: vec![],
            platform_notes: HashMap::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_auto_fallback() {
        let templates = builtin_templates();
        assert!(templates.iter().any(|t| t.id == "auto"));
        assert_eq!(templates.len(), 8);
    }

    #[test]
    fn test_ids_unique() {
        let templates = builtin_templates();
        let mut ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_mounting_language_in_tracking_shots() {
        let templates = builtin_templates();
        let lateral = templates.iter().find(|t| t.id == "lateral_track").unwrap();
        assert!(lateral.camera_instruction.contains("mounted on tracking vehicle"));
        assert!(!lateral.negative_constraints.is_empty());
    }
}
