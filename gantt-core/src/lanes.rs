//! Lane packing for mini activities
//!
//! Mini activities sharing a row are assigned to vertical lanes with a greedy
//! interval-scheduling pass: activities are visited in order of their
//! normalized start and placed into the lowest lane that is already free.

use crate::calendar::normalize;
use crate::model::{Activity, ViewMode};
use chrono::NaiveDate;
use serde::Serialize;

/// Lane assignment of a single mini activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniLane<'a> {
    pub activity: &'a Activity,
    /// Position of the activity in the row's activity list
    pub activity_index: usize,
    pub lane_index: usize,
}

/// Lane layout of one row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniLanes<'a> {
    pub lanes: Vec<MiniLane<'a>>,
    /// Number of lanes in use; never zero
    pub lane_count: usize,
}

impl<'a> MiniLanes<'a> {
    /// Lane of the activity at `activity_index` in the row, if it is a mini
    pub fn lane_of(&self, activity_index: usize) -> Option<usize> {
        self.lanes
            .iter()
            .find(|lane| lane.activity_index == activity_index)
            .map(|lane| lane.lane_index)
    }
}

/// Assign the mini activities of a row to lanes.
///
/// With `stack` disabled every mini shares lane 0. Rows without minis still
/// report a single lane.
pub fn compute_mini_lanes(activities: &[Activity], stack: bool, view_mode: ViewMode) -> MiniLanes<'_> {
    let minis: Vec<(usize, &Activity)> = activities
        .iter()
        .enumerate()
        .filter(|(_, activity)| activity.is_mini())
        .collect();

    if minis.is_empty() {
        return MiniLanes {
            lanes: Vec::new(),
            lane_count: 1,
        };
    }

    if !stack {
        return MiniLanes {
            lanes: minis
                .into_iter()
                .map(|(activity_index, activity)| MiniLane {
                    activity,
                    activity_index,
                    lane_index: 0,
                })
                .collect(),
            lane_count: 1,
        };
    }

    let mut sorted: Vec<_> = minis
        .into_iter()
        .map(|(index, activity)| {
            let start = normalize(activity.start_date, view_mode);
            let end = normalize(activity.end_date, view_mode);
            (index, activity, start, end)
        })
        .collect();
    // Stable: equal starts keep input order
    sorted.sort_by_key(|(_, _, start, _)| *start);

    let mut lane_ends: Vec<NaiveDate> = Vec::new();
    let mut lanes = Vec::with_capacity(sorted.len());

    for (activity_index, activity, start, end) in sorted {
        let lane_index = match lane_ends.iter().position(|lane_end| start > *lane_end) {
            Some(free) => {
                lane_ends[free] = end;
                free
            }
            None => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
        };

        lanes.push(MiniLane {
            activity,
            activity_index,
            lane_index,
        });
    }

    MiniLanes {
        lane_count: lane_ends.len(),
        lanes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VisualType;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn mini(start: NaiveDate, end: NaiveDate) -> Activity {
        Activity::new(start, end).with_visual_type(VisualType::Mini)
    }

    #[test]
    fn test_no_minis_reports_one_lane() {
        let activities = vec![Activity::new(day(1, 1), day(1, 5))];
        let layout = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert!(layout.lanes.is_empty());
        assert_eq!(layout.lane_count, 1);
        assert_eq!(compute_mini_lanes(&[], true, ViewMode::Day).lane_count, 1);
    }

    #[test]
    fn test_disjoint_minis_share_lane() {
        let activities = vec![mini(day(1, 1), day(1, 2)), mini(day(1, 3), day(1, 4))];
        let layout = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert_eq!(layout.lane_count, 1);
        assert!(layout.lanes.iter().all(|lane| lane.lane_index == 0));
    }

    #[test]
    fn test_abutting_minis_overlap_on_shared_day() {
        let activities = vec![mini(day(1, 1), day(1, 2)), mini(day(1, 2), day(1, 3))];
        let layout = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert_eq!(layout.lane_count, 2);
    }

    #[test]
    fn test_week_mode_merges_same_week() {
        let activities = vec![mini(day(1, 1), day(1, 2)), mini(day(1, 3), day(1, 4))];
        let layout = compute_mini_lanes(&activities, true, ViewMode::Week);
        assert_eq!(layout.lane_count, 2);
        assert_eq!(layout.lane_of(0), Some(0));
        assert_eq!(layout.lane_of(1), Some(1));
    }

    #[test]
    fn test_mutually_overlapping_need_one_lane_each() {
        let activities: Vec<_> = (0..5).map(|i| mini(day(1, 1 + i), day(1, 10))).collect();
        let layout = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert_eq!(layout.lane_count, 5);
        let mut seen: Vec<_> = layout.lanes.iter().map(|lane| lane.lane_index).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_reuses_lowest_free_lane() {
        let activities = vec![
            mini(day(1, 1), day(1, 3)),
            mini(day(1, 2), day(1, 6)),
            mini(day(1, 4), day(1, 5)),
        ];
        let layout = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert_eq!(layout.lane_count, 2);
        assert_eq!(layout.lane_of(2), Some(0));
    }

    #[test]
    fn test_sorts_by_start_keeping_input_order_on_ties() {
        let activities = vec![
            mini(day(1, 5), day(1, 6)),
            mini(day(1, 1), day(1, 2)),
            mini(day(1, 1), day(1, 3)),
        ];
        let layout = compute_mini_lanes(&activities, true, ViewMode::Day);
        let order: Vec<_> = layout.lanes.iter().map(|lane| lane.activity_index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(layout.lane_of(1), Some(0));
        assert_eq!(layout.lane_of(2), Some(1));
        assert_eq!(layout.lane_of(0), Some(0));
    }

    #[test]
    fn test_stacking_disabled_forces_lane_zero() {
        let activities = vec![mini(day(1, 1), day(1, 5)), mini(day(1, 2), day(1, 6))];
        let layout = compute_mini_lanes(&activities, false, ViewMode::Day);
        assert_eq!(layout.lane_count, 1);
        assert!(layout.lanes.iter().all(|lane| lane.lane_index == 0));
        assert_eq!(layout.lanes.len(), 2);
    }

    #[test]
    fn test_ignores_bars_and_stripes() {
        let activities = vec![
            Activity::new(day(1, 1), day(1, 9)),
            Activity::new(day(1, 1), day(1, 9)).with_visual_type(VisualType::Stripe),
            mini(day(1, 2), day(1, 3)),
        ];
        let layout = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert_eq!(layout.lanes.len(), 1);
        assert_eq!(layout.lanes[0].activity_index, 2);
        assert_eq!(layout.lane_of(0), None);
    }

    #[test]
    fn test_does_not_mutate_input_order() {
        let activities = vec![mini(day(1, 5), day(1, 6)), mini(day(1, 1), day(1, 2))];
        let before = activities.clone();
        let _ = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert_eq!(activities, before);
    }
}
