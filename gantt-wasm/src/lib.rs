//! WebAssembly bindings for the gantt timeline engine

use gantt_core::{ChartLayout, Config, FullWindow, LayoutEngine, ScrollWindow, Theme, WindowLayout};
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    // Reused across calls so unchanged charts skip relayout
    static ENGINE: RefCell<LayoutEngine> = RefCell::new(LayoutEngine::default());
}

#[derive(Serialize)]
struct LayoutSnapshot<'a> {
    layout: &'a ChartLayout,
    window: &'a WindowLayout,
}

/// Parse timeline chart text and draw every row as one SVG document.
///
/// Parse failures come back as the error's display text, which names the
/// offending line.
#[wasm_bindgen]
pub fn render(input: &str) -> Result<String, String> {
    let chart = gantt_core::parse(input).map_err(|e| e.to_string())?;
    Ok(gantt_core::render(&chart))
}

/// Like [`render`], with the header, bar and link colors taken from a named
/// theme. An unknown `theme_name` draws with the default palette.
#[wasm_bindgen]
pub fn render_with_theme(input: &str, theme_name: &str) -> Result<String, String> {
    let chart = gantt_core::parse(input).map_err(|e| e.to_string())?;
    let theme = Theme::by_name(theme_name).unwrap_or_default();
    Ok(gantt_core::render_with_config(&chart, Config::default().with_theme(theme)))
}

/// Theme names accepted by [`render_with_theme`], default palette first
#[wasm_bindgen]
pub fn available_themes() -> Vec<String> {
    Theme::available_themes().into_iter().map(String::from).collect()
}

/// Lay out every row of a chart and return the geometry as JSON
#[wasm_bindgen]
pub fn layout_to_json(input: &str) -> Result<String, String> {
    let chart = gantt_core::parse(input).map_err(|e| e.to_string())?;
    ENGINE.with(|engine| {
        let mut engine = engine.borrow_mut();
        let layout = engine.layout(&chart);
        let window = engine.window(&chart, &FullWindow::new(&chart.rows));
        snapshot_json(&layout, &window)
    })
}

/// Lay out a chart and route links for the rows inside a scrolled viewport
///
/// # Arguments
/// * `input` - The chart source text
/// * `scroll_top` - Scroll position of the chart body in pixels
/// * `viewport_height` - Height of the visible body in pixels
/// * `overscan` - Extra rows rendered above and below the viewport
#[wasm_bindgen]
pub fn visible_layout_to_json(
    input: &str,
    scroll_top: f64,
    viewport_height: f64,
    overscan: usize,
) -> Result<String, String> {
    let chart = gantt_core::parse(input).map_err(|e| e.to_string())?;
    ENGINE.with(|engine| {
        let mut engine = engine.borrow_mut();
        let layout = engine.layout(&chart);
        let heights = layout.row_heights();
        let visible = ScrollWindow::new(&chart.rows, &heights)
            .with_viewport(scroll_top, viewport_height)
            .with_overscan(overscan);
        let window = engine.window(&chart, &visible);
        snapshot_json(&layout, &window)
    })
}

/// Parse a chart and return its JSON representation
#[wasm_bindgen]
pub fn parse_to_json(input: &str) -> Result<String, String> {
    let chart = gantt_core::parse(input).map_err(|e| e.to_string())?;
    serde_json::to_string(&chart).map_err(|e| e.to_string())
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn snapshot_json(layout: &ChartLayout, window: &WindowLayout) -> Result<String, String> {
    serde_json::to_string(&LayoutSnapshot { layout, window }).map_err(|e| e.to_string())
}
