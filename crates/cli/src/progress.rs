//! Console output: loading message and summary report

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use rowcast_core::loader::LoadStats;

/// A static "Loading…" spinner message.
///
/// Rendered once and cleared when the work finishes; the load itself
/// runs synchronously on the calling thread.
pub fn loading_message(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap(),
    );
    bar.set_message(message.to_string());
    bar.tick();
    bar
}

/// Print a formatted load summary
pub fn print_summary_report(
    input: &Path,
    stats: Option<&LoadStats>,
    record_count: usize,
    field_count: usize,
) {
    println!("\n{}", "═".repeat(60));
    println!("Dataset Load Complete");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());
    println!("Records:            {}", format_with_commas(record_count));
    println!("Fields per record:  {}", field_count);

    match stats {
        Some(stats) => {
            if stats.duplicates_dropped > 0 {
                println!(
                    "Duplicates removed: {} ({:.1}%)",
                    format_with_commas(stats.duplicates_dropped),
                    (stats.duplicates_dropped as f64 / stats.data_rows.max(1) as f64) * 100.0
                );
            }
            if stats.filtered > 0 {
                println!(
                    "Noise rows dropped: {} ({:.1}%)",
                    format_with_commas(stats.filtered),
                    (stats.filtered as f64 / stats.data_rows.max(1) as f64) * 100.0
                );
            }
            println!(
                "Source rows:        {}",
                format_with_commas(stats.data_rows)
            );
        }
        None => println!("Source:             (restored from cache)"),
    }

    println!("{}", "═".repeat(60));
}

/// Format number with thousand separators
pub fn format_with_commas(n: usize) -> String {
    n.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(std::str::from_utf8)
        .collect::<Result<Vec<&str>, _>>()
        .unwrap()
        .join(",")
}
