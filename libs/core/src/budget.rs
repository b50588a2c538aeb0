//! # Complexity Budget Planner — 尺・複雑度規則
//!
//! 検証済みの知見: 7秒クリップは「1アクション・1カメラ挙動」が上限。
//! 超過するとテレポーテーションやシーン崩壊が発生する。

use crate::contracts::ComplexityBudget;

/// 尺 (秒) から複雑度上限を導出する。全域で定義された純関数
pub fn complexity_budget(duration_secs: u32) -> ComplexityBudget {
    if duration_secs <= 3 {
        ComplexityBudget {
            max_actions: 1,
            max_camera_changes: 0,
            max_reveals: 0,
            pacing_guidance: "Single quick action, static or simple camera. No transitions."
                .to_string(),
            warning: Some(
                "Very short duration - keep extremely simple. One motion only.".to_string(),
            ),
        }
    } else if duration_secs <= 5 {
        ComplexityBudget {
            max_actions: 1,
            max_camera_changes: 0,
            max_reveals: 0,
            pacing_guidance: "ONE action, locked camera. No reveals or transitions.".to_string(),
            warning: Some(
                "Short duration - single continuous action, no complexity.".to_string(),
            ),
        }
    } else if duration_secs <= 7 {
        ComplexityBudget {
            max_actions: 1,
            max_camera_changes: 1,
            max_reveals: 0,
            pacing_guidance: "ONE primary action, ONE camera behavior. No reveals. Moderate pacing."
                .to_string(),
            warning: None,
        }
    } else if duration_secs <= 10 {
        ComplexityBudget {
            max_actions: 1,
            max_camera_changes: 1,
            max_reveals: 0,
            pacing_guidance: "ONE action with development, ONE camera move. Deliberate pacing. \
                 Can include subtle secondary motion (background elements)."
                .to_string(),
            warning: None,
        }
    } else if duration_secs <= 15 {
        ComplexityBudget {
            max_actions: 2,
            max_camera_changes: 1,
            max_reveals: 1,
            pacing_guidance: "Can introduce ONE transition or reveal. Slow, deliberate pacing. \
                 Primary action can develop over time. Secondary action allowed in final third."
                .to_string(),
            warning: None,
        }
    } else {
        ComplexityBudget {
            max_actions: 2,
            max_camera_changes: 2,
            max_reveals: 1,
            pacing_guidance: "Extended duration allows for scene development. Keep pacing slow. \
                 Maximum two distinct actions. One major reveal allowed."
                .to_string(),
            warning: Some(
                "Long duration - maintain consistency is harder. Consider breaking into multiple clips."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_second_budget_is_one_action_one_camera() {
        let budget = complexity_budget(7);
        assert_eq!(budget.max_actions, 1);
        assert_eq!(budget.max_camera_changes, 1);
        assert_eq!(budget.max_reveals, 0);
        assert!(budget.warning.is_none());
    }

    #[test]
    fn test_very_short_budget_warns() {
        let budget = complexity_budget(2);
        assert_eq!(budget.max_actions, 1);
        assert_eq!(budget.max_camera_changes, 0);
        assert!(budget.warning.is_some());
    }

    #[test]
    fn test_long_budget_allows_two_actions_and_warns() {
        let budget = complexity_budget(30);
        assert_eq!(budget.max_actions, 2);
        assert_eq!(budget.max_camera_changes, 2);
        assert_eq!(budget.max_reveals, 1);
        assert!(budget.warning.is_some());
    }

    #[test]
    fn test_ceilings_monotonic_and_actions_at_least_one() {
        let mut prev = complexity_budget(0);
        assert!(prev.max_actions >= 1);
        for d in 1..=40 {
            let next = complexity_budget(d);
            assert!(next.max_actions >= 1, "d={d}");
            assert!(next.max_actions >= prev.max_actions, "d={d}");
            assert!(next.max_camera_changes >= prev.max_camera_changes, "d={d}");
            assert!(next.max_reveals >= prev.max_reveals, "d={d}");
            prev = next;
        }
    }

    #[test]
    fn test_still_output_zero_duration() {
        let budget = complexity_budget(0);
        assert_eq!(budget.max_actions, 1);
        assert_eq!(budget.max_camera_changes, 0);
    }
}
