use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use std::path::Path;
use streamlens::{dataset, report};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let csv_path = env::var("CATALOG_CSV").unwrap_or_else(|_| "netflix_titles.csv".to_string());
    let records = dataset::load_catalog(&csv_path)?;
    report::write_report(&records, Path::new(report::REPORT_FILE))
}
