#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate slog;

mod cache;
mod cat_parser;
mod categories;
mod domain;
mod error;
mod fire_parser;
mod kml;
mod parser;
mod plot;
mod prob_parser;
mod products;
mod render;
mod reports;
mod tiers;
mod util;

#[cfg(test)]
mod test_util;

use self::categories::StyleTable;
use self::plot::Plotter;
use self::render::BitmapRenderer;
use self::util::{Config, Fetcher};
use reqwest::blocking::Client;
use slog::Logger;
use std::time::Instant;

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = match Config::new(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("unable to load {}: {}", path, e);
            std::process::exit(2);
        }
    };
    let logger = util::get_logger(&config.log_level);

    info!(logger, "initializing"; "config" => serde_json::to_string(&config).unwrap_or_default());

    let failures = run(&config, &logger);

    // Flush the async drain before exiting.
    drop(logger);
    if failures > 0 {
        std::process::exit(1);
    }
}

/// Runs every configured plot job in order and returns how many failed.
fn run(config: &Config, logger: &Logger) -> usize {
    let styles = match StyleTable::with_overrides(&config.styles) {
        Ok(styles) => styles,
        Err(e) => {
            crit!(logger, "invalid style overrides"; "error" => e.to_string());
            return 1;
        }
    };

    let client = Client::new();
    let fetcher = Fetcher::new(&client, logger, &config.user_agent);
    let renderer = match BitmapRenderer::new(config.image_width, config.image_height) {
        Ok(renderer) => renderer,
        Err(e) => {
            crit!(logger, "unable to initialize renderer"; "error" => e.to_string());
            return 1;
        }
    };
    let plotter = match Plotter::new(config, &fetcher, &renderer, &styles, logger) {
        Ok(plotter) => plotter,
        Err(e) => {
            crit!(logger, "unable to initialize plotter"; "error" => e.to_string());
            return 1;
        }
    };

    if config.plots.is_empty() {
        warn!(logger, "no plots configured");
    }

    let mut failures = 0;
    for request in &config.plots {
        let start = Instant::now();
        let result = plotter.plot(request);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(path) => {
                debug!(logger, "plot complete"; "file" => path.display().to_string(), "elapsed_ms" => elapsed_ms);
            }
            Err(e) => {
                error!(logger, "plot failed"; "kind" => request.kind.to_string(), "day" => request.day,
                    "date" => request.date.to_string(), "error" => e.to_string(), "elapsed_ms" => elapsed_ms);
                failures += 1;
            }
        }
    }

    failures
}
