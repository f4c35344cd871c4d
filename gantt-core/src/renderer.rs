//! SVG renderer for timeline charts

use crate::geometry::{FullWindow, VisibleRows};
use crate::layout::{ChartLayout, LayoutConfig, RowLayout, WindowLayout};
use crate::links::LinkPath;
use crate::model::{Activity, Chart, Row, ViewMode, VisualType};
use crate::theme::Theme;
use chrono::Datelike;
use std::fmt::Write;
use tracing::debug;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Grid metrics shared with the layout engine
    pub layout: LayoutConfig,
    /// Width of the row header column
    pub row_header_width: f64,
    /// Height of the month band
    pub month_header_height: f64,
    /// Height of the day or week label band
    pub column_header_height: f64,
    /// Font size
    pub font_size: f64,
    /// Corner radius of bars
    pub bar_corner_radius: f64,
    /// Theme for styling
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            row_header_width: 160.0,
            month_header_height: 24.0,
            column_header_height: 24.0,
            font_size: 12.0,
            bar_corner_radius: 4.0,
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Set the theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the grid metrics
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Combined height of both header bands
    pub fn header_height(&self) -> f64 {
        self.month_header_height + self.column_header_height
    }
}

/// Render a chart to SVG with default config
pub fn render(chart: &Chart) -> String {
    render_with_config(chart, Config::default())
}

/// Render every row of a chart to SVG with custom config
pub fn render_with_config(chart: &Chart, config: Config) -> String {
    render_window(chart, &config, &FullWindow::new(&chart.rows))
}

/// Render only the rows yielded by `window`.
///
/// The body is as tall as the rendered rows; links whose endpoints are not
/// both rendered are left out.
pub fn render_window<W: VisibleRows + ?Sized>(chart: &Chart, config: &Config, window: &W) -> String {
    let layout = ChartLayout::compute(chart, &config.layout);
    let items = window.visible_items();
    let window_layout = WindowLayout::compute(&layout, &items, &chart.links);

    let body_height: f64 = items
        .iter()
        .filter_map(|item| layout.rows.get(item.index))
        .map(|row| row.height)
        .sum();
    let header_height = config.header_height();
    let total_width = config.row_header_width + layout.width;
    let total_height = header_height + body_height;

    debug!(
        rows = items.len(),
        links = window_layout.links.len(),
        width = total_width,
        height = total_height,
        "rendering chart"
    );

    let mut svg = String::new();
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = total_width,
        h = total_height
    )
    .unwrap();

    write_defs(&mut svg, config);

    writeln!(
        &mut svg,
        r#"<rect width="100%" height="100%" fill="{bg}"/>"#,
        bg = config.theme.background
    )
    .unwrap();

    write_header(&mut svg, chart, &layout, config);

    // Everything below the header is drawn in body coordinates
    writeln!(
        &mut svg,
        r#"<g class="body" transform="translate(0,{y})">"#,
        y = header_height
    )
    .unwrap();

    write_grid(&mut svg, &layout, &window_layout, config, body_height);

    let rows: Vec<(&Row, &RowLayout)> = items
        .iter()
        .filter_map(|item| Some((item.data, layout.rows.get(item.index)?)))
        .collect();

    for (row, row_layout) in &rows {
        write_row_header(&mut svg, row, window_layout.row_top(row_layout), row_layout.height, config);
    }

    writeln!(
        &mut svg,
        r#"<g class="timeline" transform="translate({x},0)">"#,
        x = config.row_header_width
    )
    .unwrap();

    for layer in [VisualType::Stripe, VisualType::Bar, VisualType::Mini] {
        if layer == VisualType::Bar {
            write_links(&mut svg, &window_layout.links.base);
        }
        for (row, row_layout) in &rows {
            let row_top = window_layout.row_top(row_layout);
            for placed in row_layout.activities.iter().filter(|placed| placed.visual_type == layer) {
                let Some(activity) = row.activities.get(placed.activity_index) else {
                    continue;
                };
                let y = row_top + placed.top;
                match layer {
                    VisualType::Stripe => write_stripe(&mut svg, activity, placed.span.left, y, placed.span.width, placed.height, config),
                    VisualType::Bar => write_bar(&mut svg, activity, placed.span.left, y, placed.span.width, placed.height, config),
                    VisualType::Mini => write_mini(&mut svg, activity, placed.span.left, y, placed.span.width, placed.height, config),
                }
            }
        }
    }
    write_links(&mut svg, &window_layout.links.mini);

    svg.push_str("</g>\n");
    svg.push_str("</g>\n");
    svg.push_str("</svg>\n");
    svg
}

fn write_defs(svg: &mut String, config: &Config) {
    let theme = &config.theme;
    let stripe = config.layout.stripe_size;

    svg.push_str("<defs>\n");
    svg.push_str("<style>\n");
    writeln!(
        svg,
        ".header {{ fill: {fill}; stroke: {stroke}; stroke-width: 1; }}",
        fill = theme.header_fill,
        stroke = theme.grid_color
    )
    .unwrap();
    writeln!(
        svg,
        ".header-text {{ font-family: {f}; font-size: {s}px; text-anchor: middle; dominant-baseline: middle; fill: {c}; }}",
        f = theme.font_family,
        s = config.font_size,
        c = theme.header_text
    )
    .unwrap();
    writeln!(
        svg,
        ".grid {{ stroke: {c}; stroke-width: 1; }}",
        c = theme.grid_color
    )
    .unwrap();
    writeln!(
        svg,
        ".row-header {{ fill: {fill}; stroke: {stroke}; stroke-width: 1; }}",
        fill = theme.row_header_fill,
        stroke = theme.grid_color
    )
    .unwrap();
    writeln!(
        svg,
        ".row-header-text {{ font-family: {f}; font-size: {s}px; dominant-baseline: middle; fill: {c}; }}",
        f = theme.font_family,
        s = config.font_size,
        c = theme.row_header_text
    )
    .unwrap();
    writeln!(
        svg,
        ".bar-text {{ font-family: {f}; font-size: {s}px; dominant-baseline: middle; fill: {c}; }}",
        f = theme.font_family,
        s = config.font_size - 1.0,
        c = theme.bar_text
    )
    .unwrap();
    svg.push_str(".link { fill: none; stroke-width: 1.5; }\n");
    svg.push_str("</style>\n");

    writeln!(
        svg,
        r#"<pattern id="stripe-hatch" width="{s}" height="{s}" patternUnits="userSpaceOnUse" patternTransform="rotate(45)">"#,
        s = stripe
    )
    .unwrap();
    writeln!(
        svg,
        r#"<line x1="0" y1="0" x2="0" y2="{s}" stroke="{c}" stroke-width="{w}"/>"#,
        s = stripe,
        c = theme.stripe_line,
        w = stripe / 2.0
    )
    .unwrap();
    svg.push_str("</pattern>\n");

    writeln!(
        svg,
        r#"<marker id="link-arrow" markerWidth="8" markerHeight="6" refX="7" refY="3" orient="auto">"#
    )
    .unwrap();
    writeln!(
        svg,
        r#"<polygon points="0 0, 8 3, 0 6" fill="{c}"/>"#,
        c = theme.link_color
    )
    .unwrap();
    svg.push_str("</marker>\n");
    svg.push_str("</defs>\n");
}

fn write_header(svg: &mut String, chart: &Chart, layout: &ChartLayout, config: &Config) {
    let month_h = config.month_header_height;
    let column_h = config.column_header_height;
    let left = config.row_header_width;
    let cw = layout.column_width;

    svg.push_str("<g class=\"header-band\">\n");

    // Top-left corner cell
    writeln!(
        svg,
        r#"<rect class="header" x="0" y="0" width="{w}" height="{h}"/>"#,
        w = left,
        h = month_h + column_h
    )
    .unwrap();
    if let Some(label) = &chart.header_label {
        writeln!(
            svg,
            r#"<text class="header-text" x="{x}" y="{y}">{t}</text>"#,
            x = left / 2.0,
            y = (month_h + column_h) / 2.0,
            t = escape_xml(label)
        )
        .unwrap();
    }

    // Week spans share their edge column with the next month; its cell goes to the earlier month
    let mut next_free = 0;
    for span in &layout.month_spans {
        let cell_start = span.start_index.max(next_free);
        if cell_start <= span.end_index {
            writeln!(
                svg,
                r#"<rect class="header month" x="{x}" y="0" width="{w}" height="{h}"/>"#,
                x = left + cell_start as f64 * cw,
                w = (span.end_index + 1 - cell_start) as f64 * cw,
                h = month_h
            )
            .unwrap();
            next_free = span.end_index + 1;
        }
        writeln!(
            svg,
            r#"<text class="header-text" x="{cx}" y="{cy}">{t}</text>"#,
            cx = left + (span.start_index as f64 + span.column_count() as f64 / 2.0) * cw,
            cy = month_h / 2.0,
            t = escape_xml(&span.label)
        )
        .unwrap();
    }

    let labels: Vec<String> = match layout.view_mode {
        ViewMode::Day => layout.dates.iter().map(|date| date.day().to_string()).collect(),
        ViewMode::Week => layout
            .week_columns
            .iter()
            .map(|week| format!("W{}", week.week_number))
            .collect(),
    };
    for (i, label) in labels.iter().enumerate() {
        let x = left + i as f64 * cw;
        writeln!(
            svg,
            r#"<rect class="header column" x="{x}" y="{y}" width="{w}" height="{h}"/>"#,
            y = month_h,
            w = cw,
            h = column_h
        )
        .unwrap();
        writeln!(
            svg,
            r#"<text class="header-text" x="{cx}" y="{cy}">{t}</text>"#,
            cx = x + cw / 2.0,
            cy = month_h + column_h / 2.0,
            t = label
        )
        .unwrap();
    }

    svg.push_str("</g>\n");
}

fn write_grid(svg: &mut String, layout: &ChartLayout, window: &WindowLayout, config: &Config, body_height: f64) {
    let left = config.row_header_width;
    let right = left + layout.width;

    svg.push_str("<g class=\"grid-lines\">\n");
    for i in 0..=layout.column_count {
        let x = left + i as f64 * layout.column_width;
        writeln!(
            svg,
            r#"<line class="grid" x1="{x}" y1="0" x2="{x}" y2="{h}"/>"#,
            h = body_height
        )
        .unwrap();
    }
    for index in &window.visible {
        let Some(row) = layout.rows.get(*index) else {
            continue;
        };
        let y = window.row_top(row) + row.height;
        writeln!(
            svg,
            r#"<line class="grid" x1="0" y1="{y}" x2="{x}" y2="{y}"/>"#,
            x = right
        )
        .unwrap();
    }
    svg.push_str("</g>\n");
}

fn write_row_header(svg: &mut String, row: &Row, y: f64, height: f64, config: &Config) {
    writeln!(
        svg,
        r#"<rect class="row-header" x="0" y="{y}" width="{w}" height="{h}"/>"#,
        w = config.row_header_width,
        h = height
    )
    .unwrap();

    let text = row
        .header
        .clone()
        .or_else(|| row.label.clone())
        .or_else(|| row.id.as_ref().map(|id| id.to_string()));
    if let Some(text) = text {
        writeln!(
            svg,
            r#"<text class="row-header-text" x="8" y="{cy}">{t}</text>"#,
            cy = y + height / 2.0,
            t = escape_xml(&text)
        )
        .unwrap();
    }
}

/// `class` attribute for an activity: its kind plus any caller-supplied class
fn activity_class(kind: &str, activity: &Activity) -> String {
    match &activity.color_class {
        Some(class) => format!("{} {}", kind, escape_xml(class)),
        None => kind.to_string(),
    }
}

fn id_attr(activity: &Activity) -> String {
    match &activity.id {
        Some(id) => format!(r#" data-activity-id="{}""#, escape_xml(&id.to_string())),
        None => String::new(),
    }
}

fn write_stripe(svg: &mut String, activity: &Activity, x: f64, y: f64, w: f64, h: f64, config: &Config) {
    let fill = activity.color.as_deref().unwrap_or(config.theme.stripe_fill.as_str());
    writeln!(
        svg,
        r#"<rect class="{c}"{id} x="{x}" y="{y}" width="{w}" height="{h}" fill="{f}"/>"#,
        c = activity_class("stripe", activity),
        id = id_attr(activity),
        f = escape_xml(fill)
    )
    .unwrap();
    writeln!(
        svg,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="url(#stripe-hatch)"/>"#
    )
    .unwrap();
}

fn write_bar(svg: &mut String, activity: &Activity, x: f64, y: f64, w: f64, h: f64, config: &Config) {
    let fill = activity.color.as_deref().unwrap_or(config.theme.bar_fill.as_str());
    writeln!(
        svg,
        r#"<rect class="{c}"{id} x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" fill="{f}"/>"#,
        c = activity_class("bar", activity),
        id = id_attr(activity),
        r = config.bar_corner_radius,
        f = escape_xml(fill)
    )
    .unwrap();
    if let Some(label) = &activity.label {
        writeln!(
            svg,
            r#"<text class="bar-text" x="{tx}" y="{ty}">{t}</text>"#,
            tx = x + 6.0,
            ty = y + h / 2.0,
            t = escape_xml(label)
        )
        .unwrap();
    }
}

fn write_mini(svg: &mut String, activity: &Activity, x: f64, y: f64, w: f64, h: f64, config: &Config) {
    let fill = activity.color.as_deref().unwrap_or(config.theme.mini_fill.as_str());
    writeln!(
        svg,
        r#"<rect class="{c}"{id} x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" fill="{f}"/>"#,
        c = activity_class("mini", activity),
        id = id_attr(activity),
        r = h / 2.0,
        f = escape_xml(fill)
    )
    .unwrap();
}

fn write_links(svg: &mut String, links: &[LinkPath]) {
    for link in links {
        writeln!(
            svg,
            r#"<path class="link" data-link-id="{id}" d="{d}" stroke="{c}" marker-end="url(#link-arrow)"/>"#,
            id = escape_xml(&link.id),
            d = link.path,
            c = escape_xml(&link.color)
        )
        .unwrap();
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
