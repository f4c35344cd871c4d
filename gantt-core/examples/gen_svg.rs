use gantt_core::{parse, render_with_config, Config, Theme};
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let input_file = args.get(1).expect("Usage: gen_svg <input.gantt> [theme]");
    let theme = args
        .get(2)
        .and_then(|name| Theme::by_name(name))
        .unwrap_or_default();

    let input = fs::read_to_string(input_file).expect("Failed to read input file");
    let chart = match parse(&input) {
        Ok(chart) => chart,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    println!("{}", render_with_config(&chart, Config::default().with_theme(theme)));
}
