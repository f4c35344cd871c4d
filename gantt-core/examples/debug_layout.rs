use gantt_core::{parse, LayoutEngine, ScrollWindow};
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env::var("RUST_LOG").unwrap_or_else(|_| "gantt_core=trace".into())))
        .init();

    let args: Vec<String> = env::args().collect();
    let input_file = args.get(1).expect("Usage: debug_layout <input.gantt> [scroll_top] [viewport_height]");
    let scroll_top: f64 = args.get(2).and_then(|v| v.parse().ok()).unwrap_or(0.0);
    let viewport: f64 = args.get(3).and_then(|v| v.parse().ok()).unwrap_or(f64::MAX);

    let input = fs::read_to_string(input_file).expect("Failed to read input file");
    let chart = parse(&input).expect("Failed to parse chart");

    let mut engine = LayoutEngine::default();
    let layout = engine.layout(&chart);
    println!("=== Axis ===");
    println!(
        "{:?} view, {} columns of {}px, {} month spans",
        layout.view_mode,
        layout.column_count,
        layout.column_width,
        layout.month_spans.len()
    );
    for span in &layout.month_spans {
        println!("  {} -> columns {}..={}", span.label, span.start_index, span.end_index);
    }

    println!("\n=== Rows ===");
    for row in &layout.rows {
        println!(
            "  row {}: offset={} height={} lanes={}",
            row.index, row.offset, row.height, row.lane_count
        );
        for placed in &row.activities {
            println!(
                "    #{} {:?} left={} width={} lane={:?}",
                placed.activity_index, placed.visual_type, placed.span.left, placed.span.width, placed.lane_index
            );
        }
    }

    let heights = layout.row_heights();
    let window = ScrollWindow::new(&chart.rows, &heights).with_viewport(scroll_top, viewport);
    let routed = engine.window(&chart, &window);

    println!("\n=== Window (scroll_top={}) ===", scroll_top);
    println!("  visible rows: {:?}, virtual offset: {}", routed.visible, routed.virtual_offset);
    for link in routed.links.iter() {
        println!("  {:?} {} {}", link.layer, link.id, link.path);
    }

    // Same chart again: served from the cache
    engine.layout(&chart);
}
