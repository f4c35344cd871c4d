//! End-to-end layout scenarios

use chrono::NaiveDate;
use gantt_core::calendar::build_week_columns;
use gantt_core::links::route_points;
use gantt_core::{
    compute_mini_lanes, parse, render, Activity, Chart, ChartLayout, FullWindow, Identifier, LayoutConfig, LayoutEngine,
    LinkLayer, LinkType, Row, ViewMode, VisibleRows, VisualType, WindowLayout,
};
use pretty_assertions::assert_eq;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

fn mini(id: &str, start: NaiveDate, end: NaiveDate) -> Activity {
    Activity::new(start, end).with_id(id).with_visual_type(VisualType::Mini)
}

#[test]
fn test_view_mode_changes_stacking() {
    let chart = Chart::new(day(1, 1), day(1, 7))
        .with_stacking(true)
        .with_row(
            Row::new()
                .with_id(1)
                .with_activity(mini("a", day(1, 1), day(1, 2)))
                .with_activity(mini("b", day(1, 3), day(1, 4))),
        );
    let mut engine = LayoutEngine::default();

    let day_layout = engine.layout(&chart);
    let row = &day_layout.rows[0];
    assert_eq!(row.lane_count, 1);
    assert_eq!(row.height, 30.0);
    assert_eq!(row.activities[0].lane_index, Some(0));
    assert_eq!(row.activities[1].lane_index, Some(0));

    let week_layout = engine.layout(&chart.clone().with_view_mode(ViewMode::Week));
    let row = &week_layout.rows[0];
    // Both minis normalize to the week of Dec 29 and now overlap
    assert_eq!(row.lane_count, 2);
    assert_eq!(row.height, 30.0 + (12.0 + 2.0));
}

#[test]
fn test_mutually_overlapping_minis_get_own_lanes() {
    for n in 1..=6u32 {
        let activities: Vec<Activity> = (0..n)
            .map(|i| mini(&format!("m-{i}"), day(1, 1 + i), day(1, 10)))
            .collect();
        let lanes = compute_mini_lanes(&activities, true, ViewMode::Day);
        assert_eq!(lanes.lane_count, n as usize);

        let mut seen: Vec<usize> = lanes.lanes.iter().map(|lane| lane.lane_index).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), n as usize);
    }
}

#[test]
fn test_row_height_ignores_bars_and_stripes() {
    let base = Row::new()
        .with_activity(mini("a", day(1, 2), day(1, 5)))
        .with_activity(mini("b", day(1, 4), day(1, 6)));
    let busy = base
        .clone()
        .with_activity(Activity::new(day(1, 1), day(1, 9)))
        .with_activity(Activity::new(day(1, 2), day(1, 3)))
        .with_activity(Activity::new(day(1, 1), day(1, 14)).with_visual_type(VisualType::Stripe));

    let chart = Chart::new(day(1, 1), day(1, 14))
        .with_stacking(true)
        .with_row(base)
        .with_row(busy)
        .with_row(Row::new());
    let layout = ChartLayout::compute(&chart, &LayoutConfig::default());

    assert_eq!(layout.row_heights(), vec![44.0, 44.0, 30.0]);
}

#[test]
fn test_month_spans_cover_weeks_in_order() {
    let weeks = build_week_columns(day(1, 1), day(4, 30));
    let chart = Chart::new(day(1, 1), day(4, 30)).with_view_mode(ViewMode::Week);
    let layout = ChartLayout::compute(&chart, &LayoutConfig::default());

    assert_eq!(layout.week_columns, weeks);
    for index in 0..weeks.len() {
        assert!(
            layout
                .month_spans
                .iter()
                .any(|span| span.start_index <= index && index <= span.end_index),
            "week {index} not covered"
        );
    }
    for span in &layout.month_spans {
        assert!(span.start_index <= span.end_index);
    }
    for pair in layout.month_spans.windows(2) {
        assert!((pair[0].year, pair[0].month) < (pair[1].year, pair[1].month));
    }
}

#[test]
fn test_backward_link_turns_right_first() {
    let config = LayoutConfig::default().with_day_cell_width(20.0);
    let chart = Chart::new(day(1, 1), day(1, 14))
        .with_row(Row::new().with_activity(Activity::new(day(1, 1), day(1, 5)).with_id("from")))
        .with_row(Row::new().with_activity(Activity::new(day(1, 5), day(1, 6)).with_id("to")));
    let layout = ChartLayout::compute(&chart, &config);
    let window = WindowLayout::compute(&layout, &FullWindow::new(&chart.rows).visible_items(), &chart.links);

    let from = window.endpoints[&Identifier::from("from")];
    let to = window.endpoints[&Identifier::from("to")];
    assert_eq!((from.end_x, to.start_x), (100.0, 80.0));

    let points = route_points(&from, &to, LinkType::FinishStart);
    assert_eq!(points[0].y, from.y);
    assert_eq!(points[1].y, from.y);
    assert!(points[1].x > points[0].x);
    assert_eq!(points[5].x, 80.0);
    assert!(points[4].x < points[1].x);
}

#[test]
fn test_mini_links_stay_in_mini_layer_both_ways() {
    let input = r#"
range 2026-01-01 2026-01-14
row 1
  bar bar-1 2026-01-02..2026-01-04
row 2
  mini m-1 2026-01-06
link bar-1 -> m-1
link m-1 -> bar-1
"#;
    let chart = parse(input).unwrap();
    let mut engine = LayoutEngine::default();
    let window = engine.window(&chart, &FullWindow::new(&chart.rows));

    assert!(window.links.base.is_empty());
    let layers: Vec<_> = window.links.mini.iter().map(|link| (link.id.as_str(), link.layer)).collect();
    assert_eq!(layers, vec![("bar-1-m-1", LinkLayer::Mini), ("m-1-bar-1", LinkLayer::Mini)]);
}

#[test]
fn test_parse_and_render_week_view() {
    let input = r#"
header Line
range 2026-01-19 2026-02-15
view week
row 1 "Line A"
  bar bar-1 2026-01-20..2026-01-23: Setup
row 2 "Line B"
  bar bar-2 2026-02-03..2026-02-12: Run
link bar-1 -> bar-2
"#;
    let svg = render(&parse(input).unwrap());
    assert!(svg.contains(r#"data-link-id="bar-1-bar-2""#));
    assert!(svg.contains("Jan 2026"));
    assert!(svg.contains("Feb 2026"));
    assert!(svg.contains("Line A"));
    assert!(svg.contains(">W4<"));
}
