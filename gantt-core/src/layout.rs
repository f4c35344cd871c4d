//! Layout composition and memoization
//!
//! [`ChartLayout`] holds everything that depends only on the chart contents
//! (axis, row heights and offsets, activity placement). [`WindowLayout`] adds
//! what depends on the set of rendered rows: the virtual offset, resolved
//! link endpoints and routed links. [`LayoutEngine`] caches both between
//! passes and recomputes only when their inputs change.

use crate::calendar::{build_day_month_spans, build_month_spans, MonthSpan, WeekColumn};
use crate::geometry::{height_for_lanes, row_offsets, virtual_offset, VisibleRow, VisibleRows};
use crate::lanes::compute_mini_lanes;
use crate::links::{link_layers, resolve_endpoints, route_links, Endpoint, LinkLayers};
use crate::model::{Chart, Identifier, Link, Row, ViewMode, VisualType};
use crate::span::{center_y, mini_lane_top, Axis, Span};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Width of a day column in day view
pub const DAY_CELL_WIDTH_PX: f64 = 40.0;
/// Width of a week column in week view
pub const WEEK_CELL_WIDTH_PX: f64 = 40.0;
/// Row height before mini stacking adds lanes
pub const BASE_ROW_HEIGHT_PX: f64 = 30.0;
/// Keeps bars and the first mini lane off the row edges
pub const BAR_VERTICAL_PADDING_PX: f64 = 4.0;
/// Height of a mini activity lane
pub const MINI_HEIGHT_PX: f64 = 12.0;
/// Gap between stacked mini lanes
pub const MINI_GAP_PX: f64 = 2.0;
/// Stripe thickness of the hatched stripe pattern
pub const STRIPE_SIZE_PX: f64 = 8.0;

/// Pixel metrics of the chart grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub day_cell_width: f64,
    pub week_cell_width: f64,
    pub base_row_height: f64,
    pub bar_vertical_padding: f64,
    pub mini_height: f64,
    pub mini_gap: f64,
    pub stripe_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            day_cell_width: DAY_CELL_WIDTH_PX,
            week_cell_width: WEEK_CELL_WIDTH_PX,
            base_row_height: BASE_ROW_HEIGHT_PX,
            bar_vertical_padding: BAR_VERTICAL_PADDING_PX,
            mini_height: MINI_HEIGHT_PX,
            mini_gap: MINI_GAP_PX,
            stripe_size: STRIPE_SIZE_PX,
        }
    }
}

impl LayoutConfig {
    pub fn with_day_cell_width(mut self, width: f64) -> Self {
        self.day_cell_width = width;
        self
    }

    pub fn with_week_cell_width(mut self, width: f64) -> Self {
        self.week_cell_width = width;
        self
    }

    pub fn with_base_row_height(mut self, height: f64) -> Self {
        self.base_row_height = height;
        self
    }

    pub fn with_mini_metrics(mut self, height: f64, gap: f64) -> Self {
        self.mini_height = height;
        self.mini_gap = gap;
        self
    }

    /// Height of a regular bar
    pub fn bar_height(&self) -> f64 {
        (self.base_row_height - 2.0 * self.bar_vertical_padding).max(1.0)
    }
}

/// Placement of one activity inside its row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLayout {
    /// Position of the activity in the row's activity list
    pub activity_index: usize,
    pub visual_type: VisualType,
    pub span: Span,
    /// Lane of a mini activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lane_index: Option<usize>,
    /// Top edge, relative to the row top
    pub top: f64,
    pub height: f64,
    /// Vertical center used to anchor links, relative to the row top
    pub center_y: f64,
}

/// Geometry of one row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLayout {
    pub index: usize,
    /// Top of the row in the full, non-windowed list
    pub offset: f64,
    pub height: f64,
    pub lane_count: usize,
    pub activities: Vec<ActivityLayout>,
}

/// Layout of a whole chart, independent of which rows are rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub view_mode: ViewMode,
    pub column_width: f64,
    pub column_count: usize,
    pub width: f64,
    pub total_height: f64,
    pub dates: Vec<NaiveDate>,
    pub week_columns: Vec<WeekColumn>,
    /// Month headers over day or week column indices, depending on the view
    pub month_spans: Vec<MonthSpan>,
    pub rows: Vec<RowLayout>,
}

impl ChartLayout {
    pub fn compute(chart: &Chart, config: &LayoutConfig) -> Self {
        let axis = Axis::new(&chart.date_range, chart.view_mode, config);
        let stack = chart.stack_mini_activities;

        let mut rows = Vec::with_capacity(chart.rows.len());
        let mut heights = Vec::with_capacity(chart.rows.len());
        for (index, row) in chart.rows.iter().enumerate() {
            let row_layout = layout_row(index, row, &axis, stack, config);
            heights.push(row_layout.height);
            rows.push(row_layout);
        }
        for (row, offset) in rows.iter_mut().zip(row_offsets(&heights)) {
            row.offset = offset;
        }

        let month_spans = match chart.view_mode {
            ViewMode::Day => build_day_month_spans(axis.dates()),
            ViewMode::Week => build_month_spans(axis.weeks()),
        };

        debug!(
            rows = rows.len(),
            columns = axis.column_count(),
            view_mode = ?chart.view_mode,
            "computed chart layout"
        );

        Self {
            view_mode: chart.view_mode,
            column_width: axis.column_width(),
            column_count: axis.column_count(),
            width: axis.width(),
            total_height: heights.iter().sum(),
            dates: axis.dates().to_vec(),
            week_columns: axis.weeks().to_vec(),
            month_spans,
            rows,
        }
    }

    /// Row heights in list order
    pub fn row_heights(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.height).collect()
    }

    /// Row offsets in list order
    pub fn row_offsets(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.offset).collect()
    }

    /// Offset of the first row in `items`
    pub fn virtual_offset(&self, items: &[VisibleRow<'_>]) -> f64 {
        virtual_offset(items, &self.row_offsets())
    }
}

fn layout_row(index: usize, row: &Row, axis: &Axis, stack: bool, config: &LayoutConfig) -> RowLayout {
    let lanes = compute_mini_lanes(&row.activities, stack, axis.view_mode());
    let height = height_for_lanes(lanes.lane_count, config);

    let activities = row
        .activities
        .iter()
        .enumerate()
        .map(|(activity_index, activity)| {
            let span = axis.span(activity);
            match activity.visual_type {
                VisualType::Mini => {
                    let lane = lanes.lane_of(activity_index).unwrap_or(0);
                    let top = mini_lane_top(0.0, height, lane, lanes.lane_count, config);
                    ActivityLayout {
                        activity_index,
                        visual_type: activity.visual_type,
                        span,
                        lane_index: Some(lane),
                        top,
                        height: config.mini_height,
                        center_y: top + config.mini_height / 2.0,
                    }
                }
                VisualType::Bar => {
                    let bar_height = config.bar_height();
                    ActivityLayout {
                        activity_index,
                        visual_type: activity.visual_type,
                        span,
                        lane_index: None,
                        top: (height - bar_height) / 2.0,
                        height: bar_height,
                        center_y: center_y(0.0, height),
                    }
                }
                VisualType::Stripe => ActivityLayout {
                    activity_index,
                    visual_type: activity.visual_type,
                    span,
                    lane_index: None,
                    top: 0.0,
                    height,
                    center_y: center_y(0.0, height),
                },
            }
        })
        .collect();

    RowLayout {
        index,
        offset: 0.0,
        height,
        lane_count: lanes.lane_count,
        activities,
    }
}

/// Layout of the currently rendered rows and the links between them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowLayout {
    /// Indices of the rendered rows
    pub visible: Vec<usize>,
    /// Offset of the first rendered row in the full list
    pub virtual_offset: f64,
    #[serde(skip)]
    pub endpoints: HashMap<Identifier, Endpoint>,
    pub links: LinkLayers,
}

impl WindowLayout {
    pub fn compute(layout: &ChartLayout, items: &[VisibleRow<'_>], links: &[Link]) -> Self {
        let endpoints = resolve_endpoints(layout, items);
        let routed = route_links(links, &endpoints);
        trace!(
            visible = items.len(),
            links = routed.len(),
            skipped = links.len() - routed.len(),
            "routed links"
        );

        Self {
            visible: items.iter().map(|item| item.index).collect(),
            virtual_offset: layout.virtual_offset(items),
            endpoints,
            links: link_layers(routed),
        }
    }

    /// Top of a rendered row relative to the first rendered row
    pub fn row_top(&self, row: &RowLayout) -> f64 {
        row.offset - self.virtual_offset
    }
}

/// Memoized chart layout: recomputed only when its inputs change
#[derive(Debug, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    generation: u64,
    chart: Option<(ChartKey, Arc<ChartLayout>)>,
    window: Option<(WindowKey, Arc<WindowLayout>)>,
}

#[derive(Debug)]
struct ChartKey {
    date_range: Vec<NaiveDate>,
    view_mode: ViewMode,
    stack: bool,
    rows: Vec<Row>,
}

impl ChartKey {
    fn new(chart: &Chart) -> Self {
        Self {
            date_range: chart.date_range.clone(),
            view_mode: chart.view_mode,
            stack: chart.stack_mini_activities,
            rows: chart.rows.clone(),
        }
    }

    fn matches(&self, chart: &Chart) -> bool {
        self.view_mode == chart.view_mode
            && self.stack == chart.stack_mini_activities
            && self.date_range == chart.date_range
            && self.rows == chart.rows
    }
}

#[derive(Debug)]
struct WindowKey {
    generation: u64,
    visible: Vec<usize>,
    links: Vec<Link>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the metrics, dropping cached layouts if they changed
    pub fn set_config(&mut self, config: LayoutConfig) {
        if self.config != config {
            self.config = config;
            self.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        self.chart = None;
        self.window = None;
    }

    /// Layout of `chart`, reusing the previous result when nothing changed
    pub fn layout(&mut self, chart: &Chart) -> Arc<ChartLayout> {
        if let Some((key, layout)) = &self.chart {
            if key.matches(chart) {
                trace!("chart layout cache hit");
                return Arc::clone(layout);
            }
        }

        let layout = Arc::new(ChartLayout::compute(chart, &self.config));
        self.generation += 1;
        self.chart = Some((ChartKey::new(chart), Arc::clone(&layout)));
        layout
    }

    /// Window layout for the rows yielded by `window`.
    ///
    /// `window` must hand out rows of `chart`.
    pub fn window<W: VisibleRows + ?Sized>(&mut self, chart: &Chart, window: &W) -> Arc<WindowLayout> {
        let layout = self.layout(chart);
        let items = window.visible_items();
        let visible: Vec<usize> = items.iter().map(|item| item.index).collect();

        if let Some((key, cached)) = &self.window {
            if key.generation == self.generation && key.visible == visible && key.links == chart.links {
                trace!("window layout cache hit");
                return Arc::clone(cached);
            }
        }

        let computed = Arc::new(WindowLayout::compute(&layout, &items, &chart.links));
        self.window = Some((
            WindowKey {
                generation: self.generation,
                visible,
                links: chart.links.clone(),
            },
            Arc::clone(&computed),
        ));
        computed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FullWindow, ScrollWindow};
    use crate::model::{Activity, LinkType};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn mini(id: &str, start: u32, end: u32) -> Activity {
        Activity::new(day(start), day(end))
            .with_id(id)
            .with_visual_type(VisualType::Mini)
    }

    fn chart() -> Chart {
        Chart::new(day(1), day(14))
            .with_stacking(true)
            .with_row(Row::new().with_id(1).with_activity(Activity::new(day(3), day(5)).with_id("bar-1")))
            .with_row(
                Row::new()
                    .with_id(2)
                    .with_activity(mini("m-1", 2, 6))
                    .with_activity(mini("m-2", 4, 8))
                    .with_activity(Activity::new(day(1), day(14)).with_visual_type(VisualType::Stripe)),
            )
            .with_row(Row::new().with_id(3).with_activity(Activity::new(day(9), day(10)).with_id("bar-2")))
            .with_link(Link::new("bar-1", "m-2"))
            .with_link(Link::new("bar-1", "bar-2").with_type(LinkType::StartStart))
    }

    #[test]
    fn test_row_geometry() {
        let layout = ChartLayout::compute(&chart(), &LayoutConfig::default());
        assert_eq!(layout.row_heights(), vec![30.0, 44.0, 30.0]);
        assert_eq!(layout.row_offsets(), vec![0.0, 30.0, 74.0]);
        assert_eq!(layout.total_height, 104.0);
        assert_eq!(layout.rows[1].lane_count, 2);
        assert_eq!(layout.column_count, 14);
        assert_eq!(layout.width, 560.0);
    }

    #[test]
    fn test_activity_placement() {
        let layout = ChartLayout::compute(&chart(), &LayoutConfig::default());
        let bar = layout.rows[0].activities[0];
        assert_eq!(bar.span, Span { left: 80.0, width: 120.0 });
        assert_eq!((bar.top, bar.height, bar.center_y), (4.0, 22.0, 15.0));

        let row = &layout.rows[1];
        assert_eq!(row.activities[0].lane_index, Some(0));
        assert_eq!(row.activities[1].lane_index, Some(1));
        assert_eq!(row.activities[1].center_y, 29.0);
        let stripe = row.activities[2];
        assert_eq!((stripe.top, stripe.height), (0.0, 44.0));
        assert_eq!(stripe.lane_index, None);
    }

    #[test]
    fn test_custom_metrics() {
        let config = LayoutConfig::default()
            .with_base_row_height(40.0)
            .with_mini_metrics(10.0, 4.0)
            .with_week_cell_width(100.0);
        assert_eq!(config.bar_height(), 32.0);

        let layout = ChartLayout::compute(&chart(), &config);
        // Second row stacks two minis: one extra lane of 10 + 4
        assert_eq!(layout.row_heights(), vec![40.0, 54.0, 40.0]);
        assert_eq!(layout.rows[1].activities[1].height, 10.0);
        // Day view ignores the week width
        assert_eq!(layout.column_width, 40.0);

        let weekly = ChartLayout::compute(&chart().with_view_mode(ViewMode::Week), &config);
        assert_eq!(weekly.column_width, 100.0);
        assert_eq!(weekly.width, weekly.column_count as f64 * 100.0);
    }

    #[test]
    fn test_empty_chart() {
        let layout = ChartLayout::compute(&Chart::default(), &LayoutConfig::default());
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.total_height, 0.0);
        assert!(layout.month_spans.is_empty());
        let window = WindowLayout::compute(&layout, &[], &[Link::new("a", "b")]);
        assert!(window.links.is_empty());
        assert_eq!(window.virtual_offset, 0.0);
    }

    #[test]
    fn test_week_layout_month_spans() {
        let chart = Chart::new(day(1), day(31)).with_view_mode(ViewMode::Week);
        let layout = ChartLayout::compute(&chart, &LayoutConfig::default());
        assert_eq!(layout.column_count, 5);
        let labels: Vec<_> = layout.month_spans.iter().map(|span| span.label.as_str()).collect();
        // The first week starts in December and the last one ends in February
        assert_eq!(labels, vec!["Dec 2025", "Jan 2026", "Feb 2026"]);
        assert_eq!((layout.month_spans[1].start_index, layout.month_spans[1].end_index), (0, 4));
    }

    #[test]
    fn test_window_routes_visible_links() {
        let chart = chart();
        let layout = ChartLayout::compute(&chart, &LayoutConfig::default());
        let window = FullWindow::new(&chart.rows);
        let routed = WindowLayout::compute(&layout, &window.visible_items(), &chart.links);

        assert_eq!(routed.links.mini.len(), 1);
        assert_eq!(routed.links.base.len(), 1);
        assert_eq!(routed.links.mini[0].id, "bar-1-m-2");
        assert_eq!(routed.endpoints[&Identifier::from("m-2")].y, 30.0 + 29.0);
        assert_eq!(routed.endpoints[&Identifier::from("bar-2")].y, 74.0 + 15.0);
    }

    #[test]
    fn test_window_positions_relative_to_first_visible_row() {
        let chart = chart();
        let layout = ChartLayout::compute(&chart, &LayoutConfig::default());
        let heights = layout.row_heights();
        let window = ScrollWindow::new(&chart.rows, &heights).with_viewport(40.0, 60.0);
        let routed = WindowLayout::compute(&layout, &window.visible_items(), &chart.links);

        assert_eq!(routed.visible, vec![1, 2]);
        assert_eq!(routed.virtual_offset, 30.0);
        assert_eq!(routed.endpoints[&Identifier::from("m-2")].y, 29.0);
        assert_eq!(routed.endpoints[&Identifier::from("bar-2")].y, 44.0 + 15.0);
        // bar-1 scrolled out, so neither of its links is drawn
        assert!(routed.links.is_empty());
    }

    #[test]
    fn test_engine_memoizes_layout() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        let chart = chart();
        let first = engine.layout(&chart);
        let second = engine.layout(&chart);
        assert!(Arc::ptr_eq(&first, &second));

        let changed = chart.clone().with_view_mode(ViewMode::Week);
        let third = engine.layout(&changed);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.view_mode, ViewMode::Week);
    }

    #[test]
    fn test_engine_memoizes_window() {
        let mut engine = LayoutEngine::default();
        let chart = chart();
        let window = FullWindow::new(&chart.rows);
        let first = engine.window(&chart, &window);
        let second = engine.window(&chart, &window);
        assert!(Arc::ptr_eq(&first, &second));

        let relinked = chart.clone().with_link(Link::new("m-1", "bar-2"));
        let third = engine.window(&relinked, &FullWindow::new(&relinked.rows));
        assert_eq!(third.links.len(), 3);

        engine.set_config(LayoutConfig::default().with_day_cell_width(20.0));
        let fourth = engine.window(&relinked, &FullWindow::new(&relinked.rows));
        assert!(!Arc::ptr_eq(&third, &fourth));
    }

    #[test]
    fn test_engine_invalidates_on_row_change() {
        let mut engine = LayoutEngine::default();
        let chart = chart();
        let first = engine.layout(&chart);
        let mut edited = chart.clone();
        edited.rows[0].activities[0].end_date = day(12);
        let second = engine.layout(&edited);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.rows[0].activities[0].span.width, 400.0);
    }
}
