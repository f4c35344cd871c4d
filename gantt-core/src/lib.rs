//! gantt-core: timeline chart layout engine - calendar axis, mini lane packing,
//! row geometry, link routing and an SVG renderer
//!
//! # Example
//!
//! ```
//! use gantt_core::{parse, render};
//!
//! let input = r#"
//! range 2026-01-01 2026-01-14
//! row 1: Line A
//!   bar bar-1 2026-01-03..2026-01-05: Optimized
//! row 2: Line B
//!   bar bar-2 2026-01-08..2026-01-09
//! link bar-1 -> bar-2
//! "#;
//!
//! let chart = parse(input).unwrap();
//! let svg = render(&chart);
//! assert!(svg.contains(r#"data-link-id="bar-1-bar-2""#));
//! ```
//!
//! # Layout without rendering
//!
//! ```
//! use gantt_core::{Activity, Chart, FullWindow, LayoutEngine, Row, VisualType};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
//! let mini = |s, e| Activity::new(day(s), day(e)).with_visual_type(VisualType::Mini);
//! let chart = Chart::new(day(1), day(7))
//!     .with_stacking(true)
//!     .with_row(Row::new().with_activity(mini(2, 5)).with_activity(mini(4, 6)));
//!
//! let mut engine = LayoutEngine::default();
//! let layout = engine.layout(&chart);
//! assert_eq!(layout.rows[0].lane_count, 2);
//! assert_eq!(layout.rows[0].height, 44.0);
//!
//! let window = engine.window(&chart, &FullWindow::new(&chart.rows));
//! assert!(window.links.is_empty());
//! ```

pub mod calendar;
pub mod events;
pub mod geometry;
pub mod lanes;
pub mod layout;
pub mod links;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod span;
pub mod theme;

pub use calendar::{MonthSpan, WeekColumn};
pub use events::{dispatch_click, dispatch_tooltip, hit_test, ActivityEvents, Hit};
pub use geometry::{body_height, FullWindow, ScrollWindow, VisibleRow, VisibleRows};
pub use lanes::{compute_mini_lanes, MiniLane, MiniLanes};
pub use layout::{ActivityLayout, ChartLayout, LayoutConfig, LayoutEngine, RowLayout, WindowLayout};
pub use links::{LinkLayer, LinkLayers, LinkPath};
pub use model::*;
pub use parser::{parse, ParseError};
pub use renderer::{render, render_window, render_with_config, Config};
pub use span::Span;
pub use theme::Theme;
