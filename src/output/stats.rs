//! Statistics reporting.

use console::style;

use crate::download::{CourseSummary, RunStats};

/// Print the summary for one processed course.
pub fn print_course_summary(summary: &CourseSummary) {
    println!();
    println!(
        "{}",
        style(format!("Summary for {}:", summary.course_name)).bold()
    );
    println!("  Downloaded: {}", summary.success_count);
    if summary.failed_count > 0 {
        println!("  Failed:     {}", style(summary.failed_count).red());
    }
    println!("  Skipped:    {} (already present)", summary.skipped_count);
}

/// Print run-level statistics across all courses.
pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run statistics:").bold());
    println!("  Courses processed: {}", stats.courses_processed);
    if stats.courses_failed > 0 {
        println!(
            "  Courses failed:    {}",
            style(stats.courses_failed).red()
        );
    }
    println!("  Downloaded: {}", stats.success_count);
    if stats.failed_count > 0 {
        println!("  Failed:     {}", style(stats.failed_count).red());
    }
    println!("  Skipped:    {} (already present)", stats.skipped_count);
    println!("{}", style("═".repeat(50)).dim());
}
