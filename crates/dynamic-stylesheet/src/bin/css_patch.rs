//! `css-patch`: replay a diff batch onto stylesheet text.
//!
//! Usage:
//!   css-patch '<diff-json>'
//!
//! The stylesheet is read from stdin; the resulting CSS goes to stdout.

use std::io::{self, Read};

use dynamic_stylesheet::cli::patch_stylesheet;
use tracing_subscriber::fmt::SubscriberBuilder;

fn main() {
    let _ = SubscriberBuilder::default()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::WARN)
        .try_init();

    let Some(diff) = std::env::args().nth(1) else {
        eprintln!("First argument must be a JSON diff array.");
        std::process::exit(1);
    };

    let mut css = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut css) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match patch_stylesheet(&css, &diff) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
