//! Display utilities for the MirrorSync CLI

use crate::modes::MirrorPlan;
use console::style;
use mirrorsync_config::DirectoryConfig;
use mirrorsync_types::SyncReport;
use std::path::Path;
use std::time::Duration;

/// Show where files come from and go to
pub fn display_plan(plan: &MirrorPlan) {
    let (from, to) = plan.mode.labels();
    println!();
    println!("{}", style("Sync Confirmation").bold().underlined());
    println!("  From ({}): {}", from, style(plan.source.display()).cyan());
    println!("  To ({}): {}", to, style(plan.destination.display()).cyan());
    println!();
    display_info(plan.mode.direction_message());
}

/// Display mirror statistics
pub fn display_report(report: &SyncReport) {
    println!();
    println!("{}", style("Sync Statistics:").bold().underlined());
    println!("  Files found: {}", style(report.files_total).cyan());
    println!("  Files copied: {}", style(report.files_copied).green());
    println!("  Files unchanged: {}", style(report.files_skipped).yellow());
    println!(
        "  Directories created: {}",
        style(report.directories_created).green()
    );
    println!(
        "  Bytes copied: {}",
        style(format_bytes(report.bytes_copied)).green()
    );
    println!(
        "  Duration: {}",
        style(format_duration(report.duration)).blue()
    );
    println!(
        "  Transfer rate: {}",
        style(format!("{:.2} MB/s", report.transfer_rate() / 1024.0 / 1024.0)).blue()
    );
}

/// Display the remembered directories
pub fn display_directories(store_path: &Path, dirs: &DirectoryConfig) {
    println!("{} {}", style("⚙").blue().bold(), store_path.display());
    println!("  Work directory: {}", describe(dirs.work_dir()));
    println!("  Home directory: {}", describe(dirs.home_dir()));
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(
        || style("(not set)").dim().to_string(),
        |p| style(p.display()).cyan().to_string(),
    )
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Display a warning message with proper formatting
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Display an error message with proper formatting
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Display a success message with proper formatting
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), style(message).green());
}

/// Display an info message with proper formatting
pub fn display_info(message: &str) {
    println!("{} {}", style("ℹ").blue().bold(), style(message).blue());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0.00 B")]
    #[case(1536, "1.50 KB")]
    #[case(5 * 1024 * 1024, "5.00 MB")]
    fn test_format_bytes(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_bytes(bytes), expected);
    }

    #[rstest]
    #[case(Duration::from_millis(1500), "1.50s")]
    #[case(Duration::from_secs(125), "2m 5s")]
    #[case(Duration::from_secs(3725), "1h 2m 5s")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(duration), expected);
    }
}
