//! Hit testing and activity callbacks
//!
//! The engine does not own an event loop. Hosts translate pointer positions
//! into chart coordinates and hand them here; the resolved activity and its
//! row are passed to an [`ActivityEvents`] implementation.

use crate::layout::ChartLayout;
use crate::model::{Activity, Chart, Row, VisualType};

/// Callbacks receiving the activity under the pointer together with its row
pub trait ActivityEvents {
    fn on_activity_click(&mut self, _activity: &Activity, _row: &Row) {}

    fn on_activity_tooltip(&mut self, _activity: &Activity, _row: &Row) {}
}

/// An activity located under a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    pub activity: &'a Activity,
    pub row: &'a Row,
    pub row_index: usize,
    pub activity_index: usize,
}

fn paint_order(visual_type: VisualType) -> u8 {
    match visual_type {
        VisualType::Mini => 0,
        VisualType::Bar => 1,
        VisualType::Stripe => 2,
    }
}

/// Topmost activity at `(x, y)`, in full-list coordinates of the chart body.
///
/// Minis are drawn above bars and bars above stripes, so they win in that
/// order. `layout` must have been computed from `chart`.
pub fn hit_test<'a>(chart: &'a Chart, layout: &ChartLayout, x: f64, y: f64) -> Option<Hit<'a>> {
    let row_index = layout
        .rows
        .iter()
        .position(|row| y >= row.offset && y < row.offset + row.height)?;
    let row_layout = &layout.rows[row_index];
    let row = chart.rows.get(row_index)?;
    let local_y = y - row_layout.offset;

    row_layout
        .activities
        .iter()
        .filter(|placed| {
            x >= placed.span.left
                && x < placed.span.right()
                && local_y >= placed.top
                && local_y < placed.top + placed.height
        })
        .min_by_key(|placed| paint_order(placed.visual_type))
        .and_then(|placed| {
            Some(Hit {
                activity: row.activities.get(placed.activity_index)?,
                row,
                row_index,
                activity_index: placed.activity_index,
            })
        })
}

/// Invoke the click callback for the activity at `(x, y)`. Returns whether one was hit.
pub fn dispatch_click<E: ActivityEvents + ?Sized>(
    chart: &Chart,
    layout: &ChartLayout,
    x: f64,
    y: f64,
    events: &mut E,
) -> bool {
    match hit_test(chart, layout, x, y) {
        Some(hit) => {
            events.on_activity_click(hit.activity, hit.row);
            true
        }
        None => false,
    }
}

/// Invoke the tooltip callback for the activity at `(x, y)`. Returns whether one was hit.
pub fn dispatch_tooltip<E: ActivityEvents + ?Sized>(
    chart: &Chart,
    layout: &ChartLayout,
    x: f64,
    y: f64,
    events: &mut E,
) -> bool {
    match hit_test(chart, layout, x, y) {
        Some(hit) => {
            events.on_activity_tooltip(hit.activity, hit.row);
            true
        }
        None => false,
    }
}
