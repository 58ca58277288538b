//! Layout audit: every route at every viewport
//!
//! Each pass saves a full-page screenshot and classifies overflow, edge
//! spacing and font-size problems from one in-page metrics snapshot.

use anyhow::{Context, Result};
use colored::Colorize;

use super::{close_page, open_route, pause};
use crate::analysis::layout::{
    font_issues, overflow_issues, spacing_issues, FontIssue, OverflowIssue, SpacingIssue,
};
use crate::driver::probe;
use crate::driver::traits::{CaptureArea, QaBrowser, QaPage};
use crate::driver::web::WebDriver;
use crate::report::types::{AnalysisReport, PageLayoutIssues, ViewportIssues};
use crate::report::{json, summary, ANALYSIS_REPORT};
use crate::utils::{Config, PageTarget, Viewport};

pub async fn execute(config: &Config) -> Result<()> {
    println!("{} Starting page analysis...\n", "▶".green().bold());

    let browser = WebDriver::launch(config.into()).await?;
    let report = run(&browser, config).await;
    browser.close().await?;
    let report = report?;

    let path = config.output.analysis.join(ANALYSIS_REPORT);
    json::write(&report, &path)?;
    summary::print_analysis(&report);
    Ok(())
}

pub async fn run<B: QaBrowser>(browser: &B, config: &Config) -> Result<AnalysisReport> {
    std::fs::create_dir_all(&config.output.analysis).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output.analysis.display()
        )
    })?;

    let mut report = AnalysisReport::default();
    for target in &config.pages {
        println!("\n{} Analyzing {}...", "→".cyan(), target.name.bold());
        let mut issues = PageLayoutIssues::default();
        for viewport in &config.viewports {
            println!("  Viewport: {} ({}x{})", viewport.name, viewport.width, viewport.height);

            let page = browser.open_page(viewport).await?;
            let outcome = audit(&page, config, target, viewport).await;
            close_page(&page).await;

            match outcome {
                Ok(Some(found)) => record(&mut issues, &viewport.name, found),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("    {} Error: {:#}", "✗".red(), e);
                    log::warn!("{} at {} skipped: {:#}", target.name, viewport.name, e);
                }
            }
        }
        report.insert(target.name.clone(), issues);
    }
    Ok(report)
}

/// Issues found on one route at one viewport
struct Findings {
    overflow: Vec<OverflowIssue>,
    spacing: Vec<SpacingIssue>,
    fonts: Vec<FontIssue>,
}

/// `Ok(None)` when the route could not be opened
async fn audit<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    viewport: &Viewport,
) -> Result<Option<Findings>> {
    if open_route(page, config, target).await.is_err() {
        return Ok(None);
    }
    pause(config.timings.loading_screen_ms).await;

    let shot = config
        .output
        .analysis
        .join(format!("{}-{}.png", target.name, viewport.name));
    page.screenshot(&shot, CaptureArea::FullPage).await?;
    println!("    Screenshot saved: {}", shot.display());

    let snapshot = probe::layout_snapshot(page).await?;
    let findings = Findings {
        overflow: overflow_issues(&snapshot),
        spacing: spacing_issues(&snapshot),
        fonts: font_issues(&snapshot),
    };

    if !findings.overflow.is_empty() {
        println!("    {} Overflow issues: {}", "⚠".yellow(), findings.overflow.len());
    }
    if !findings.spacing.is_empty() {
        println!("    {} Spacing issues: {}", "⚠".yellow(), findings.spacing.len());
    }
    if !findings.fonts.is_empty() {
        println!("    {} Font issues: {}", "⚠".yellow(), findings.fonts.len());
    }
    Ok(Some(findings))
}

/// Only categories that produced issues get a viewport entry
fn record(entry: &mut PageLayoutIssues, viewport: &str, found: Findings) {
    if !found.overflow.is_empty() {
        entry.overflow.push(ViewportIssues {
            viewport: viewport.to_string(),
            issues: found.overflow,
        });
    }
    if !found.spacing.is_empty() {
        entry.spacing.push(ViewportIssues {
            viewport: viewport.to_string(),
            issues: found.spacing,
        });
    }
    if !found.fonts.is_empty() {
        entry.fonts.push(ViewportIssues {
            viewport: viewport.to_string(),
            issues: found.fonts,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::probe::LAYOUT_SCRIPT;
    use crate::driver::testing::{ScriptedBrowser, ScriptedPage};
    use crate::utils::config::{OutputDirs, Timings};
    use serde_json::json;

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.output = OutputDirs::under(dir);
        config.timings = Timings {
            loading_screen_ms: 0,
            ..Timings::default()
        };
        config.pages = vec![PageTarget::new("home", "/"), PageTarget::new("about", "/about")];
        config.viewports = vec![
            Viewport::new("mobile", 375, 812),
            Viewport::new("desktop", 1440, 900),
        ];
        config
    }

    fn small_print_snapshot() -> serde_json::Value {
        json!({
            "viewportWidth": 375,
            "boxes": [],
            "texts": [{
                "tag": "p",
                "className": "legal text-xs",
                "text": "Terms apply",
                "fontSize": 8,
                "rect": { "top": 700, "left": 24, "right": 180, "width": 156, "height": 12 }
            }]
        })
    }

    #[tokio::test]
    async fn test_only_viewports_with_issues_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let page = ScriptedPage::new()
            .on(LAYOUT_SCRIPT, small_print_snapshot())
            .unreachable("/about");
        let browser = ScriptedBrowser::new(page);

        let report = run(&browser, &config).await.unwrap();

        let pages: Vec<_> = report.keys().map(String::as_str).collect();
        assert_eq!(pages, vec!["home", "about"]);
        assert_eq!(report["about"].totals(), (0, 0, 0));
        let home = &report["home"];
        assert_eq!(home.totals(), (0, 0, 2));
        let viewports: Vec<_> = home.fonts.iter().map(|g| g.viewport.as_str()).collect();
        assert_eq!(viewports, vec!["mobile", "desktop"]);
        assert!(home.overflow.is_empty());

        let log = browser.page.log();
        let shots: Vec<_> = log
            .screenshots
            .iter()
            .map(|(path, area)| (path.file_name().unwrap().to_owned(), *area))
            .collect();
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].0, "home-mobile.png");
        assert_eq!(shots[0].1, CaptureArea::FullPage);
        assert_eq!(log.closed, 4);
        drop(log);

        let opened = browser.opened.lock().unwrap();
        assert_eq!(opened.iter().map(|v| v.width).collect::<Vec<_>>(), vec![375, 1440, 375, 1440]);
    }

    #[tokio::test]
    async fn test_clean_page_keeps_empty_categories() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let page = ScriptedPage::new().on(
            LAYOUT_SCRIPT,
            json!({ "viewportWidth": 1440, "boxes": [], "texts": [] }),
        );
        let browser = ScriptedBrowser::new(page);

        let report = run(&browser, &config).await.unwrap();

        let json = serde_json::to_value(&report).unwrap();
        let empty = json!({ "overflow": [], "spacing": [], "fonts": [] });
        assert_eq!(json, json!({ "home": empty.clone(), "about": empty }));
    }

    #[tokio::test]
    async fn test_snapshot_failure_skips_viewport() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let page = ScriptedPage::new().on(LAYOUT_SCRIPT, json!("not a snapshot"));
        let browser = ScriptedBrowser::new(page);

        let report = run(&browser, &config).await.unwrap();

        assert_eq!(report.len(), 2);
        assert!(report.values().all(|p| p.totals() == (0, 0, 0)));
        assert_eq!(browser.page.log().closed, 4);
    }
}
