//! # Inventory Report
//!
//! Fetches the catalog, applies a search term and field filters, and prints
//! the resulting dashboard (summary, charts, top sellers, trend) as JSON.
//!
//! ## Usage
//! ```bash
//! # Whole catalog from the default backend
//! cargo run -p wardrobe-client --bin wardrobe-report
//!
//! # Black shirts, from another backend
//! cargo run -p wardrobe-client --bin wardrobe-report -- \
//!     --url http://10.0.0.5:5000 --search preto --filter tipo=Camiseta
//! ```

use std::env;
use std::path::PathBuf;

use tracing::info;
use wardrobe_client::{init_tracing, Dashboard, HttpBackend, WardrobeConfig};
use wardrobe_core::{Constraint, Field};

fn print_help() {
    println!("Wardrobe Inventory Report");
    println!();
    println!("Usage: wardrobe-report [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -u, --url <URL>            Backend base URL (overrides config)");
    println!("  -c, --config <PATH>        Config file (default: platform config dir)");
    println!("  -s, --search <TERM>        Free-text search term");
    println!("  -f, --filter <FIELD=VALUE> Field constraint, repeatable (e.g. cor=Preto)");
    println!("  -t, --top <N>              Length of the top sellers list");
    println!("  -h, --help                 Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut url: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut search = String::new();
    let mut filters: Vec<(Field, Constraint)> = Vec::new();
    let mut top: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--url" | "-u" => {
                if i + 1 < args.len() {
                    url = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--search" | "-s" => {
                if i + 1 < args.len() {
                    search = args[i + 1].clone();
                    i += 1;
                }
            }
            "--filter" | "-f" => {
                if i + 1 < args.len() {
                    let (field, value) = args[i + 1]
                        .split_once('=')
                        .ok_or_else(|| format!("--filter expects FIELD=VALUE, got '{}'", args[i + 1]))?;
                    filters.push((field.parse::<Field>()?, Constraint::parse(value)));
                    i += 1;
                }
            }
            "--top" | "-t" => {
                if i + 1 < args.len() {
                    top = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                return Err(format!("Unknown argument '{}'. Try --help.", other).into());
            }
        }
        i += 1;
    }

    let mut config = WardrobeConfig::load(config_path)?;
    if let Some(url) = url {
        config.backend.base_url = url;
    }
    if let Some(top) = top {
        config.report.top_sellers = top;
    }
    config.validate()?;

    info!(backend = %config.backend.base_url, "Building inventory report");

    let dashboard = Dashboard::new(HttpBackend::new(config.backend.clone())?);
    dashboard.load().await?;
    dashboard.load_trend().await?;

    dashboard.set_search(search).await?;
    for (field, constraint) in filters {
        dashboard.set_constraint(field, constraint).await?;
    }

    let report = dashboard.report(config.report.top_sellers).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
