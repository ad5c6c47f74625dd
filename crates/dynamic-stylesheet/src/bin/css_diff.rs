//! `css-diff`: print the diff batch between two literal-content documents.
//!
//! Usage:
//!   css-diff <before.json> <after.json>

use std::path::Path;

use dynamic_stylesheet::cli::{diff_documents, read_file, CliError};
use tracing_subscriber::fmt::SubscriberBuilder;

fn run(before: &str, after: &str) -> Result<String, CliError> {
    let before = read_file(Path::new(before))?;
    let after = read_file(Path::new(after))?;
    diff_documents(&before, &after)
}

fn main() {
    let _ = SubscriberBuilder::default()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    let (Some(before), Some(after)) = (args.get(1), args.get(2)) else {
        eprintln!("Usage: css-diff <before.json> <after.json>");
        std::process::exit(1);
    };

    match run(before, after) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
