// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::builder::BuildReport;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished mesh build
    pub fn report_build(input: &str, output: &str, report: &BuildReport, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {} {} {}", "Built:".bold(), input.cyan(), "->".bright_black(), output.cyan());
        println!("{}", "━".repeat(80).bright_black());

        if report.is_clean() {
            println!("{} {}", "✅".green(), "All entities meshed".green().bold());
        } else {
            println!(
                "{} {}",
                "⚠️ ".yellow(),
                format!("{} entities skipped", report.failures.len()).yellow().bold()
            );
        }

        println!("\n{}", "Meshes:".bold());
        Self::print_count("Lanes", report.lanes);
        Self::print_count("Intersections", report.intersections);
        Self::print_count("Lines", report.lines);
        Self::print_count("Vertices", report.vertices);
        Self::print_count("Triangles", report.triangles);

        println!("\n{}", "Preprocessing:".bold());
        Self::print_count("Boundary lines", report.cached_lines);
        Self::print_count("Weld groups", report.welded_groups);
        Self::print_count("Road edges", report.outward_lines);

        Self::report_failures(report);

        println!("\n{}", "Performance:".bold());
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// List skipped entities
    pub fn report_failures(report: &BuildReport) {
        if report.failures.is_empty() {
            return;
        }
        println!("\n{}", "Skipped:".bold());
        for failure in &report.failures {
            println!(
                "  {} {} {}",
                format!("[{}]", failure.kind).bright_black(),
                failure.entity.yellow(),
                failure.error.bright_black()
            );
        }
    }

    /// Report a map summary for `check`
    pub fn report_map(file: &str, lanes: usize, lines: usize, intersections: usize) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Map:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_count("Lanes", lanes);
        Self::print_count("Lines", lines);
        Self::print_count("Intersections", intersections);
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().cyan()
        );
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
