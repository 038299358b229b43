//! Print dataset shape, missing values per column, the content type
//! distribution, and a preview of the first cleaned rows.
//! Reads CATALOG_CSV from the environment (.env supported).

use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use streamlens::aggregate::type_counts;
use streamlens::dataset::{clean_row, missing_value_report, read_raw};

fn main() -> Result<()> {
    // Load .env if present for local runs.
    dotenv().ok();

    let csv_path = env::var("CATALOG_CSV").unwrap_or_else(|_| "netflix_titles.csv".to_string());
    let rows = read_raw(&csv_path)?;
    println!("Dataset shape: {} rows", rows.len());

    println!("\nMissing values per column:");
    for (column, missing) in missing_value_report(&rows) {
        println!("{:<14} {}", column, missing);
    }

    let records: Vec<_> = rows.into_iter().filter_map(clean_row).collect();
    println!("\nCleaned rows: {}", records.len());

    println!("\nContent type distribution:");
    for (label, count) in type_counts(&records) {
        println!("{:<10} {}", label, count);
    }

    println!("\nCleaned data preview:");
    for record in records.iter().take(5) {
        println!(
            "{} | {} | {} | {} | {} | genres: {}",
            record.title_type.label(),
            record.title,
            record.country,
            record.rating,
            record.duration,
            record.genres.join(", ")
        );
    }

    Ok(())
}
