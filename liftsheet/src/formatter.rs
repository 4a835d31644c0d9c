//! Console report formatting

use colored::*;
use liftsheet_core::inspect::SheetOverview;
use liftsheet_core::{Layout, Program, SheetSelector};
use std::path::Path;

pub fn print_header(input: &Path, output: &Path, sheet: &SheetSelector, layout: &Layout) {
    println!("{}", "Extracting workout program".bold());
    println!("  {} {} (sheet {})", "Input:".bold(), input.display(), sheet);
    println!("  {} {}", "Output:".bold(), output.display());
    println!("  {} {}", "Layout:".bold(), layout.name.cyan());
    println!();
}

/// Per-week day/exercise counts followed by totals
pub fn print_summary(program: &Program, output: &Path) {
    let summary = program.summary();

    println!("{} {}", "Program:".bold(), program.program.cyan().bold());
    if summary.weeks == 0 {
        println!("  {}", "No weeks found (empty sheet?)".yellow());
    }

    for week in &summary.per_week {
        println!("  {} {}", "Week".bold(), week.week.to_string().bold());
        for (day, name, count) in &week.days {
            let label = if name.is_empty() {
                format!("Day {}", day)
            } else {
                format!("Day {} ({})", day, name)
            };
            println!("    {}: {} exercises", label, count);
        }
        println!("    {} {}", "Week total:".bright_black(), week.exercises());
    }

    println!();
    println!("{}", "Summary:".bold().underline());
    println!("  {} {}", "Weeks:".bold(), summary.weeks);
    println!("  {} {}", "Days:".bold(), summary.days);
    if summary.blocks > 0 {
        println!("  {} {}", "Blocks:".bold(), summary.blocks);
    }
    println!("  {} {}", "Exercises:".bold(), summary.exercises);
    println!();
    println!(
        "{} {}",
        "✓ Saved to".green().bold(),
        output.display().to_string().green()
    );
}

pub fn print_inspection(input: &Path, layout: &Layout, sheets: &[SheetOverview]) {
    println!("{}", format!("Inspecting: {}", input.display()).bold());
    println!("  {} {}", "Layout:".bold(), layout.name.cyan());
    println!("  {} {}", "Sheets:".bold(), sheets.len());
    println!();

    for (index, sheet) in sheets.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("[{}]", index).bright_black(),
            sheet.name.cyan().bold(),
            format!("{} rows x {} columns", sheet.rows, sheet.columns).bright_black()
        );
        if sheet.markers.is_empty() {
            println!("  {}", "no markers detected".yellow());
        }
        for marker in &sheet.markers {
            let kind = match marker.kind {
                "week" => "WEEK ".magenta().bold(),
                "day" => "DAY  ".blue().bold(),
                _ => "BLOCK".green().bold(),
            };
            println!("  {} {} {}", kind, marker.cell.yellow(), marker.label);
        }
        println!("  {} {}", "Exercise rows:".bold(), sheet.exercise_rows);
        println!();
    }
}
