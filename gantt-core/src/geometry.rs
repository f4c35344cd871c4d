//! Row geometry and row windowing
//!
//! Row heights grow with the number of stacked mini lanes. Offsets are the
//! running sum of heights over the full row list; positions handed to the
//! link router are expressed relative to the first rendered row.

use crate::lanes::compute_mini_lanes;
use crate::layout::LayoutConfig;
use crate::model::{Activity, Row, ViewMode};
use std::ops::Range;

/// Height of a row holding `lane_count` mini lanes
pub fn height_for_lanes(lane_count: usize, config: &LayoutConfig) -> f64 {
    let extra_lanes = lane_count.saturating_sub(1) as f64;
    config.base_row_height + extra_lanes * (config.mini_height + config.mini_gap)
}

/// Height of a row, driven only by its mini lane count
pub fn row_height(activities: &[Activity], stack: bool, view_mode: ViewMode, config: &LayoutConfig) -> f64 {
    let lanes = compute_mini_lanes(activities, stack, view_mode);
    height_for_lanes(lanes.lane_count, config)
}

/// Top offset of every row in the full (non-windowed) list
pub fn row_offsets(heights: &[f64]) -> Vec<f64> {
    let mut top = 0.0;
    heights
        .iter()
        .map(|height| {
            let offset = top;
            top += height;
            offset
        })
        .collect()
}

/// Available height for rows once the header is subtracted
pub fn body_height(container_height: f64, header_height: f64) -> f64 {
    (container_height - header_height).max(0.0)
}

/// A row currently handed out by a window, with its index in the full list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRow<'a> {
    pub data: &'a Row,
    pub index: usize,
}

/// A windowing strategy deciding which rows are rendered
pub trait VisibleRows {
    /// Visible rows in ascending index order
    fn visible_items(&self) -> Vec<VisibleRow<'_>>;
}

/// Offset of the first rendered row; subtract it to get window-relative positions
pub fn virtual_offset(items: &[VisibleRow<'_>], offsets: &[f64]) -> f64 {
    items
        .first()
        .and_then(|item| offsets.get(item.index))
        .copied()
        .unwrap_or(0.0)
}

/// Window over every row (no virtualization)
#[derive(Debug, Clone, Copy)]
pub struct FullWindow<'a> {
    rows: &'a [Row],
}

impl<'a> FullWindow<'a> {
    pub fn new(rows: &'a [Row]) -> Self {
        Self { rows }
    }
}

impl VisibleRows for FullWindow<'_> {
    fn visible_items(&self) -> Vec<VisibleRow<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, data)| VisibleRow { data, index })
            .collect()
    }
}

/// Window over the rows intersecting a scrolled viewport
#[derive(Debug, Clone)]
pub struct ScrollWindow<'a> {
    rows: &'a [Row],
    offsets: Vec<f64>,
    heights: Vec<f64>,
    scroll_top: f64,
    viewport_height: f64,
    overscan: usize,
}

impl<'a> ScrollWindow<'a> {
    pub fn new(rows: &'a [Row], heights: &[f64]) -> Self {
        Self {
            rows,
            offsets: row_offsets(heights),
            heights: heights.to_vec(),
            scroll_top: 0.0,
            viewport_height: 0.0,
            overscan: 0,
        }
    }

    /// Scroll position and viewport height in pixels
    pub fn with_viewport(mut self, scroll_top: f64, viewport_height: f64) -> Self {
        self.scroll_top = scroll_top.max(0.0);
        self.viewport_height = viewport_height.max(0.0);
        self
    }

    /// Extra rows rendered on each side of the viewport
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Index range of rows to render
    pub fn range(&self) -> Range<usize> {
        let count = self.rows.len().min(self.offsets.len());
        if count == 0 {
            return 0..0;
        }

        let bottom = self.scroll_top + self.viewport_height;
        // First row whose bottom edge lies below the scroll position
        let first = self.offsets[..count]
            .partition_point(|offset| *offset <= self.scroll_top)
            .saturating_sub(1);
        let first = if self.offsets[first] + self.heights[first] <= self.scroll_top {
            (first + 1).min(count - 1)
        } else {
            first
        };
        let end = self.offsets[..count]
            .partition_point(|offset| *offset < bottom)
            .max(first + 1);

        first.saturating_sub(self.overscan)..(end + self.overscan).min(count)
    }
}

impl VisibleRows for ScrollWindow<'_> {
    fn visible_items(&self) -> Vec<VisibleRow<'_>> {
        let range = self.range();
        self.rows[range.clone()]
            .iter()
            .zip(range)
            .map(|(data, index)| VisibleRow { data, index })
            .collect()
    }
}
