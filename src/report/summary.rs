//! Console summaries printed after each run

use colored::Colorize;

use super::types::{AnalysisReport, HoverReport, WhiteFlashReport};
use crate::analysis::flash::FlashIssue;

/// Occurrences listed per issue type in the hover summary
const HOVER_EXAMPLES: usize = 5;

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title.bold());
    println!("{}", "=".repeat(60));
}

pub fn print_white_flash(report: &WhiteFlashReport) {
    banner("WHITE FLASH TEST SUMMARY");
    println!("Total issues found: {}", report.summary.total_issues);

    if report.summary.by_type.is_empty() {
        println!("\n{} No white flash issues detected!", "✓".green());
        return;
    }

    println!("\nIssues by type:");
    for (kind, issues) in &report.summary.by_type {
        println!("\n  {}: {} occurrences", kind.yellow(), issues.len());
        for paged in issues {
            println!("    - {}: {}", paged.page, paged.issue.description());
            if let FlashIssue::WhiteBgFlash {
                initial,
                during,
                settled,
                ..
            }
            | FlashIssue::WhiteTextFlash {
                initial,
                during,
                settled,
                ..
            } = &paged.issue
            {
                println!("      Initial: {}", initial);
                println!("      During:  {}", during);
                println!("      Final:   {}", settled);
            }
        }
    }
}

pub fn print_hover(report: &HoverReport) {
    banner("HOVER ANIMATION TEST SUMMARY");
    println!("Total elements tested: {}", report.summary.total_elements);
    println!("Total issues found: {}", report.summary.total_issues);

    if report.summary.issues_by_type.is_empty() {
        println!("\n{} No issues detected!", "✓".green());
        return;
    }

    println!("\nIssues by type:");
    for (kind, issues) in &report.summary.issues_by_type {
        println!("\n  {}: {} occurrences", kind.yellow(), issues.len());
        for issue in issues.iter().take(HOVER_EXAMPLES) {
            println!(
                "    - {}/{}[{}]: {}",
                issue.page, issue.name, issue.index, issue.description
            );
        }
        if issues.len() > HOVER_EXAMPLES {
            println!("    ... and {} more", issues.len() - HOVER_EXAMPLES);
        }
    }
}

pub fn print_analysis(report: &AnalysisReport) {
    println!("\n========================================");
    println!("{}", "SUMMARY OF ISSUES".bold());
    println!("========================================\n");

    for (page, issues) in report.iter() {
        let (overflow, spacing, fonts) = issues.totals();
        if overflow + spacing + fonts == 0 {
            continue;
        }
        println!("{}:", page.cyan());
        if overflow > 0 {
            println!("  - Overflow issues: {}", overflow);
        }
        if spacing > 0 {
            println!("  - Spacing issues: {}", spacing);
        }
        if fonts > 0 {
            println!("  - Font issues: {}", fonts);
        }
    }
}
