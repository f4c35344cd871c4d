//! Link routing between activities
//!
//! Links are drawn as orthogonal paths with two vertical turns meeting at the
//! midpoint between the source and target rows. Corners are rounded with
//! quadratic curves. Paths are split into a `base` layer (drawn below bars)
//! and a `mini` layer (drawn above mini activities).

use crate::geometry::VisibleRow;
use crate::layout::ChartLayout;
use crate::model::{Identifier, Link, LinkType, VisualType};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;
use tracing::trace;

/// Fallback stroke color for links without their own color
pub const DEFAULT_LINK_COLOR: &str = "rgba(100, 116, 139, 0.8)";
/// Corner radius of link paths
pub const LINK_CORNER_RADIUS: f64 = 6.0;
const MIN_BEND: f64 = 10.0;
const MAX_BEND: f64 = 28.0;
/// Extra horizontal run before a backward link turns around
const BACKWARD_LOOP_MARGIN: f64 = 16.0;

/// Resolved anchor coordinates of a visible activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub start_x: f64,
    pub end_x: f64,
    /// Vertical center, relative to the first rendered row
    pub y: f64,
    pub visual_type: VisualType,
}

/// A waypoint of a link path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendering layer of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkLayer {
    Base,
    Mini,
}

/// A routed, drawable link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkPath {
    pub id: String,
    /// SVG path data
    pub path: String,
    pub color: String,
    pub layer: LinkLayer,
}

/// Routed links split by layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkLayers {
    pub base: Vec<LinkPath>,
    pub mini: Vec<LinkPath>,
}

impl LinkLayers {
    pub fn len(&self) -> usize {
        self.base.len() + self.mini.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.mini.is_empty()
    }

    /// Iterate base links first, then mini links
    pub fn iter(&self) -> impl Iterator<Item = &LinkPath> {
        self.base.iter().chain(self.mini.iter())
    }
}

/// Anchor coordinates of every identified activity in the visible rows.
///
/// Positions are relative to the first visible row. When two activities
/// share an id, the one listed last wins.
pub fn resolve_endpoints(layout: &ChartLayout, items: &[VisibleRow<'_>]) -> HashMap<Identifier, Endpoint> {
    let offset = layout.virtual_offset(items);
    let mut endpoints = HashMap::new();

    for item in items {
        let Some(row_layout) = layout.rows.get(item.index) else {
            continue;
        };
        let row_top = row_layout.offset - offset;

        for placed in &row_layout.activities {
            let Some(activity) = item.data.activities.get(placed.activity_index) else {
                continue;
            };
            let Some(id) = &activity.id else {
                continue;
            };
            endpoints.insert(
                id.clone(),
                Endpoint {
                    start_x: placed.span.left,
                    end_x: placed.span.right(),
                    y: row_top + placed.center_y,
                    visual_type: activity.visual_type,
                },
            );
        }
    }

    endpoints
}

/// Six waypoints of the orthogonal route from `from` to `to`
pub fn route_points(from: &Endpoint, to: &Endpoint, link_type: LinkType) -> [Point; 6] {
    let start_x = match link_type {
        LinkType::StartStart => from.start_x,
        LinkType::FinishStart => from.end_x,
    };
    let end_x = to.start_x;
    let gap = (end_x - start_x).abs();
    let bend = (gap / 2.0).clamp(MIN_BEND, MAX_BEND);
    let mid_y = from.y + (to.y - from.y) / 2.0;

    let out_x = if end_x < start_x {
        start_x + bend + BACKWARD_LOOP_MARGIN
    } else {
        start_x + bend
    };
    let in_x = end_x - bend;

    [
        Point::new(start_x, from.y),
        Point::new(out_x, from.y),
        Point::new(out_x, mid_y),
        Point::new(in_x, mid_y),
        Point::new(in_x, to.y),
        Point::new(end_x, to.y),
    ]
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Avoid printing `-0`
fn coord(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// SVG path through `points`, rounding each right-angle turn.
///
/// The radius shrinks to half of the shorter adjacent segment so that
/// neighbouring curves never overlap.
pub fn rounded_path(points: &[Point], radius: f64) -> String {
    if points.len() < 2 {
        return String::new();
    }

    let first = points[0];
    let mut d = String::new();
    write!(d, "M {} {}", coord(first.x), coord(first.y)).unwrap();

    for i in 1..points.len() {
        let prev = points[i - 1];
        let curr = points[i];
        let Some(next) = points.get(i + 1) else {
            write!(d, " L {} {}", coord(curr.x), coord(curr.y)).unwrap();
            continue;
        };

        let (v1x, v1y) = (curr.x - prev.x, curr.y - prev.y);
        let (v2x, v2y) = (next.x - curr.x, next.y - curr.y);
        let is_corner = (v1x != 0.0 && v2y != 0.0) || (v1y != 0.0 && v2x != 0.0);

        if !is_corner {
            write!(d, " L {} {}", coord(curr.x), coord(curr.y)).unwrap();
            continue;
        }

        let len1 = v1x.abs() + v1y.abs();
        let len2 = v2x.abs() + v2y.abs();
        let r = radius.min(len1 / 2.0).min(len2 / 2.0);
        write!(
            d,
            " L {} {} Q {} {} {} {}",
            coord(curr.x - sign(v1x) * r),
            coord(curr.y - sign(v1y) * r),
            coord(curr.x),
            coord(curr.y),
            coord(curr.x + sign(v2x) * r),
            coord(curr.y + sign(v2y) * r),
        )
        .unwrap();
    }

    d
}

/// Layer of a link given the visual types of its endpoints
pub fn link_layer(from: VisualType, to: VisualType) -> LinkLayer {
    if from == VisualType::Mini || to == VisualType::Mini {
        LinkLayer::Mini
    } else {
        LinkLayer::Base
    }
}

/// Route every link whose endpoints are both resolvable, in input order
pub fn route_links(links: &[Link], endpoints: &HashMap<Identifier, Endpoint>) -> Vec<LinkPath> {
    links
        .iter()
        .filter_map(|link| {
            let (Some(from), Some(to)) = (endpoints.get(&link.from_id), endpoints.get(&link.to_id)) else {
                trace!(link = %link.key(), "link endpoint not visible, skipping");
                return None;
            };
            let points = route_points(from, to, link.link_type);
            Some(LinkPath {
                id: link.key(),
                path: rounded_path(&points, LINK_CORNER_RADIUS),
                color: link.color.clone().unwrap_or_else(|| DEFAULT_LINK_COLOR.to_string()),
                layer: link_layer(from.visual_type, to.visual_type),
            })
        })
        .collect()
}

/// Split routed links into their rendering layers, keeping order within each
pub fn link_layers(paths: Vec<LinkPath>) -> LinkLayers {
    let (mini, base): (Vec<_>, Vec<_>) = paths
        .into_iter()
        .partition(|path| path.layer == LinkLayer::Mini);
    LinkLayers { base, mini }
}
