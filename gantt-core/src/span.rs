//! Projection of activities onto the horizontal axis and row lanes

use crate::calendar::{build_week_columns, days_between, start_of_week, WeekColumn};
use crate::layout::LayoutConfig;
use crate::model::{Activity, ViewMode};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Horizontal extent of an activity in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Span {
    pub left: f64,
    pub width: f64,
}

impl Span {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Pixel span of `activity` on the axis described by the arguments.
///
/// Day view counts whole days from the first date of `date_range`; week view
/// looks up the columns holding both endpoints. A start outside the axis
/// resolves to the first column and an end outside it to the last, so an
/// activity entirely off the axis spans all of it. An empty `date_range`
/// yields a zero span.
pub fn activity_span(
    activity: &Activity,
    date_range: &[NaiveDate],
    view_mode: ViewMode,
    column_width: f64,
    weeks: &[WeekColumn],
) -> Span {
    let Some(range_start) = date_range.first() else {
        return Span::default();
    };

    match view_mode {
        ViewMode::Day => day_span(activity, *range_start, column_width),
        ViewMode::Week => {
            let index: HashMap<NaiveDate, usize> = weeks
                .iter()
                .enumerate()
                .map(|(i, week)| (week.start, i))
                .collect();
            week_span(activity, weeks, &index, column_width)
        }
    }
}

fn day_span(activity: &Activity, range_start: NaiveDate, column_width: f64) -> Span {
    let offset_days = days_between(range_start, activity.start_date).max(0);
    let span_days = (days_between(activity.start_date, activity.end_date) + 1).max(1);
    Span {
        left: offset_days as f64 * column_width,
        width: span_days as f64 * column_width,
    }
}

fn week_span(
    activity: &Activity,
    weeks: &[WeekColumn],
    index: &HashMap<NaiveDate, usize>,
    column_width: f64,
) -> Span {
    let max_index = weeks.len().saturating_sub(1);
    // Off-axis weeks: a start falls back to the first column, an end to the last
    let start_index = week_index(activity.start_date, index).unwrap_or(0).min(max_index);
    let end_index = week_index(activity.end_date, index)
        .unwrap_or(max_index)
        .clamp(start_index, max_index);

    Span {
        left: start_index as f64 * column_width,
        width: (end_index - start_index + 1) as f64 * column_width,
    }
}

fn week_index(date: NaiveDate, index: &HashMap<NaiveDate, usize>) -> Option<usize> {
    index.get(&start_of_week(date)).copied()
}

/// Horizontal axis of a chart: its columns and how activities map onto them
#[derive(Debug, Clone)]
pub struct Axis {
    date_range: Vec<NaiveDate>,
    view_mode: ViewMode,
    weeks: Vec<WeekColumn>,
    week_index: HashMap<NaiveDate, usize>,
    column_width: f64,
}

impl Axis {
    pub fn new(date_range: &[NaiveDate], view_mode: ViewMode, config: &LayoutConfig) -> Self {
        let weeks = match (date_range.first(), date_range.last()) {
            (Some(first), Some(last)) => build_week_columns(*first, *last),
            _ => Vec::new(),
        };
        let week_index = weeks
            .iter()
            .enumerate()
            .map(|(i, week)| (week.start, i))
            .collect();
        let column_width = match view_mode {
            ViewMode::Day => config.day_cell_width,
            ViewMode::Week => config.week_cell_width,
        };

        Self {
            date_range: date_range.to_vec(),
            view_mode,
            weeks,
            week_index,
            column_width,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.date_range
    }

    pub fn weeks(&self) -> &[WeekColumn] {
        &self.weeks
    }

    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    /// Number of day or week columns, depending on the view mode
    pub fn column_count(&self) -> usize {
        match self.view_mode {
            ViewMode::Day => self.date_range.len(),
            ViewMode::Week => self.weeks.len(),
        }
    }

    /// Total width of the axis in pixels
    pub fn width(&self) -> f64 {
        self.column_count() as f64 * self.column_width
    }

    pub fn span(&self, activity: &Activity) -> Span {
        let Some(range_start) = self.date_range.first() else {
            return Span::default();
        };
        match self.view_mode {
            ViewMode::Day => day_span(activity, *range_start, self.column_width),
            ViewMode::Week => week_span(activity, &self.weeks, &self.week_index, self.column_width),
        }
    }
}

/// Total height of a stack of `lane_count` mini lanes
pub fn stack_height(lane_count: usize, config: &LayoutConfig) -> f64 {
    let lanes = lane_count as f64;
    lanes * config.mini_height + (lanes - 1.0).max(0.0) * config.mini_gap
}

/// Top edge of a mini lane, relative to `row_top`
pub fn mini_lane_top(row_top: f64, row_height: f64, lane_index: usize, lane_count: usize, config: &LayoutConfig) -> f64 {
    let first_lane = config
        .bar_vertical_padding
        .max((row_height - stack_height(lane_count, config)) / 2.0);
    row_top + first_lane + lane_index as f64 * (config.mini_height + config.mini_gap)
}

/// Vertical center of a mini activity in its lane
pub fn mini_center_y(row_top: f64, row_height: f64, lane_index: usize, lane_count: usize, config: &LayoutConfig) -> f64 {
    mini_lane_top(row_top, row_height, lane_index, lane_count, config) + config.mini_height / 2.0
}

/// Vertical center of a bar or stripe
pub fn center_y(row_top: f64, row_height: f64) -> f64 {
    row_top + row_height / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::date_range;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn range() -> Vec<NaiveDate> {
        date_range(day(1, 1), day(1, 31))
    }

    #[test]
    fn test_single_day_width() {
        let span = activity_span(&Activity::new(day(1, 3), day(1, 3)), &range(), ViewMode::Day, 40.0, &[]);
        assert_eq!(span, Span { left: 80.0, width: 40.0 });
    }

    #[test]
    fn test_three_day_width() {
        let span = activity_span(&Activity::new(day(1, 3), day(1, 5)), &range(), ViewMode::Day, 40.0, &[]);
        assert_eq!(span.width, 120.0);
        assert_eq!(span.right(), 200.0);
    }

    #[test]
    fn test_day_span_clamps_before_range() {
        let span = activity_span(&Activity::new(day(1, 1), day(1, 2)), &date_range(day(1, 10), day(1, 20)), ViewMode::Day, 40.0, &[]);
        assert_eq!(span.left, 0.0);
        assert_eq!(span.width, 80.0);
    }

    #[test]
    fn test_inverted_activity_keeps_one_day() {
        let span = activity_span(&Activity::new(day(1, 5), day(1, 2)), &range(), ViewMode::Day, 40.0, &[]);
        assert_eq!(span.width, 40.0);
    }

    #[test]
    fn test_empty_range_zero_span() {
        let activity = Activity::new(day(1, 5), day(1, 6));
        assert_eq!(activity_span(&activity, &[], ViewMode::Day, 40.0, &[]), Span::default());
        assert_eq!(activity_span(&activity, &[], ViewMode::Week, 40.0, &[]), Span::default());
    }

    #[test]
    fn test_week_span_single_column() {
        let weeks = build_week_columns(day(1, 1), day(1, 31));
        // Jan 6 (Tue) and Jan 9 (Fri) share the week of Jan 5
        let span = activity_span(&Activity::new(day(1, 6), day(1, 9)), &range(), ViewMode::Week, 40.0, &weeks);
        assert_eq!(span, Span { left: 40.0, width: 40.0 });
    }

    #[test]
    fn test_week_span_two_columns() {
        let weeks = build_week_columns(day(1, 1), day(1, 31));
        let span = activity_span(&Activity::new(day(1, 9), day(1, 13)), &range(), ViewMode::Week, 40.0, &weeks);
        assert_eq!(span, Span { left: 40.0, width: 80.0 });
    }

    #[test]
    fn test_week_span_clamps_outside_axis() {
        let weeks = build_week_columns(day(1, 1), day(1, 31));
        let last = (weeks.len() - 1) as f64;

        let early = activity_span(&Activity::new(day(1, 1) - chrono::Days::new(60), day(1, 7)), &range(), ViewMode::Week, 40.0, &weeks);
        assert_eq!(early, Span { left: 0.0, width: 80.0 });

        let late = activity_span(&Activity::new(day(1, 28), day(3, 1)), &range(), ViewMode::Week, 40.0, &weeks);
        assert_eq!(late.left, last * 40.0);
        assert_eq!(late.right(), weeks.len() as f64 * 40.0);
    }

    #[test]
    fn test_week_span_entirely_after_axis_covers_axis() {
        let weeks = build_week_columns(day(1, 1), day(1, 31));
        let span = activity_span(&Activity::new(day(3, 1), day(3, 9)), &range(), ViewMode::Week, 40.0, &weeks);
        assert_eq!(span, Span { left: 0.0, width: 200.0 });
    }

    #[test]
    fn test_week_span_entirely_before_axis_covers_axis() {
        let march = date_range(day(3, 1), day(3, 31));
        let weeks = build_week_columns(day(3, 1), day(3, 31));
        assert_eq!(weeks.len(), 6);
        let span = activity_span(&Activity::new(day(1, 5), day(1, 9)), &march, ViewMode::Week, 40.0, &weeks);
        assert_eq!(span, Span { left: 0.0, width: 240.0 });
    }

    #[test]
    fn test_axis_matches_free_function() {
        let config = LayoutConfig::default();
        let dates = range();
        let axis = Axis::new(&dates, ViewMode::Week, &config);
        let activity = Activity::new(day(1, 9), day(1, 20));
        assert_eq!(
            axis.span(&activity),
            activity_span(&activity, &dates, ViewMode::Week, 40.0, axis.weeks())
        );
        assert_eq!(axis.column_count(), 5);
        assert_eq!(axis.width(), 200.0);
    }

    #[test]
    fn test_day_axis_width() {
        let config = LayoutConfig::default().with_day_cell_width(24.0);
        let axis = Axis::new(&range(), ViewMode::Day, &config);
        assert_eq!(axis.column_count(), 31);
        assert_eq!(axis.width(), 31.0 * 24.0);
        assert_eq!(Axis::new(&[], ViewMode::Week, &config).width(), 0.0);
    }

    #[test]
    fn test_mini_center_single_lane() {
        let config = LayoutConfig::default();
        // (30 - 12) / 2 = 9 from the top, plus half a mini
        assert_eq!(mini_center_y(100.0, 30.0, 0, 1, &config), 115.0);
    }

    #[test]
    fn test_mini_center_stacked_lanes() {
        let config = LayoutConfig::default();
        let height = 44.0;
        // stack of 2 = 26px, so the first lane starts at max(4, 9) = 9
        assert_eq!(mini_center_y(0.0, height, 0, 2, &config), 15.0);
        assert_eq!(mini_center_y(0.0, height, 1, 2, &config), 29.0);
    }

    #[test]
    fn test_mini_top_respects_padding() {
        let config = LayoutConfig::default();
        // Five lanes forced into a base-height row overflow; padding wins
        assert_eq!(mini_lane_top(0.0, 30.0, 0, 5, &config), 4.0);
    }

    #[test]
    fn test_bar_center() {
        assert_eq!(center_y(30.0, 44.0), 52.0);
    }
}
