//! Hover animation audit
//!
//! For each selector group, hovers the first few matches and records
//! computed styles plus a crop before, during and after the transition.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use super::{close_page, open_route, page_banner, pause};
use crate::analysis::hover::{detect_hover_issues, HoverIssue, HoverStyles};
use crate::driver::probe;
use crate::driver::traits::{BoundingBox, CaptureArea, QaBrowser, QaPage};
use crate::driver::web::WebDriver;
use crate::report::types::{HoverElement, HoverPageResult, HoverReport, HoverShot};
use crate::report::{json, summary, HOVER_REPORT};
use crate::utils::{Config, HoverTarget, PageTarget};

const CROP_PAD: f64 = 20.0;
const CROP_MAX_WIDTH: f64 = 800.0;
const CROP_MAX_HEIGHT: f64 = 400.0;

pub async fn execute(config: &Config) -> Result<()> {
    println!("{} Starting hover animation tests...\n", "▶".green().bold());
    println!("This will test hover states on interactive elements across all pages.");

    let browser = WebDriver::launch(config.into()).await?;
    let report = run(&browser, config).await;
    browser.close().await?;
    let report = report?;

    json::write(&report, &config.output.hover.join(HOVER_REPORT))?;
    summary::print_hover(&report);
    Ok(())
}

pub async fn run<B: QaBrowser>(browser: &B, config: &Config) -> Result<HoverReport> {
    std::fs::create_dir_all(&config.output.hover)?;

    let mut report = HoverReport::new();
    for target in &config.pages {
        page_banner(target);
        let page = browser.open_page(&config.desktop).await?;
        let result = test_page(&page, config, target).await;
        close_page(&page).await;
        report.push_page(result);
    }
    Ok(report)
}

async fn test_page<P: QaPage>(page: &P, config: &Config, target: &PageTarget) -> HoverPageResult {
    let mut result = HoverPageResult {
        page: target.name.clone(),
        path: target.path.clone(),
        ..Default::default()
    };

    if let Err(e) = open_route(page, config, target).await {
        result.error = Some(e);
        return result;
    }

    if let Err(e) = wake_lazy_content(page, config).await {
        eprintln!("  {} Page error: {:#}", "✗".red(), e);
        result.error = Some(e.to_string());
        return result;
    }

    for hover_target in &config.hover_targets {
        if let Err(e) = sweep_target(page, config, target, hover_target, &mut result).await {
            println!("  Error testing {}: {:#}", hover_target.name, e);
        }
    }
    result
}

/// Let load animations finish and nudge scroll-triggered content into view
async fn wake_lazy_content<P: QaPage>(page: &P, config: &Config) -> Result<()> {
    let t = &config.timings;
    pause(t.settle_ms).await;
    probe::scroll_to(page, t.lazy_scroll_offset).await?;
    pause(t.lazy_scroll_ms).await;
    probe::scroll_to(page, 0).await?;
    pause(t.lazy_scroll_ms).await;
    Ok(())
}

async fn sweep_target<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    hover_target: &HoverTarget,
    result: &mut HoverPageResult,
) -> Result<()> {
    let count = probe::tag_matches(
        page,
        &hover_target.selector,
        Some(config.limits.max_per_hover_target),
    )
    .await?;
    if count.total == 0 {
        return Ok(());
    }
    println!(
        "\n  Testing {}: {} elements found",
        hover_target.name.cyan(),
        count.total
    );

    for index in 0..count.tagged {
        let Some(element) = capture_hover(page, config, target, hover_target, index).await else {
            continue;
        };
        if !element.issues.is_empty() {
            result.issue_count += element.issues.len();
            println!(
                "    Element {}: {} issue(s) found",
                index,
                element.issues.len()
            );
            for issue in &element.issues {
                println!("      - {}: {}", issue.kind().yellow(), issue.description());
            }
        }
        result.elements.push(element);
    }
    Ok(())
}

fn shot_path(config: &Config, page: &str, name: &str, index: usize, state: &str) -> PathBuf {
    config
        .output
        .hover
        .join(format!("{}-{}-{}-{}.png", page, name, index, state))
}

/// Hover one element. `None` when it has no rendered box.
async fn capture_hover<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    hover_target: &HoverTarget,
    index: usize,
) -> Option<HoverElement> {
    let mut element = HoverElement {
        selector: hover_target.selector.clone(),
        name: hover_target.name.clone(),
        index,
        screenshots: Vec::new(),
        issues: Vec::new(),
        computed_styles: None,
    };

    match try_capture(page, config, target, index, &mut element).await {
        Ok(true) => Some(element),
        Ok(false) => None,
        Err(e) => {
            element.issues.push(HoverIssue::Error {
                description: format!("{:#}", e),
            });
            Some(element)
        }
    }
}

async fn try_capture<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    index: usize,
    element: &mut HoverElement,
) -> Result<bool> {
    let bbox = match probe::bounding_box(page, index).await? {
        Some(b) if !b.is_empty() => b,
        _ => return Ok(false),
    };
    let clip = bbox.crop(CROP_PAD, CROP_MAX_WIDTH, CROP_MAX_HEIGHT);

    let initial = probe::computed_styles(page, index).await?;
    snap(page, config, target, element, clip, "before").await?;

    let (cx, cy) = bbox.center();
    page.move_pointer(cx, cy).await?;
    pause(config.timings.hover_during_ms).await;

    snap(page, config, target, element, clip, "during").await?;
    let mut during = probe::computed_styles(page, index).await?;
    during.transition = None;

    pause(config.timings.hover_after_ms).await;

    snap(page, config, target, element, clip, "after").await?;
    let mut after = probe::computed_styles(page, index).await?;
    after.transition = None;

    let styles = HoverStyles {
        initial,
        during,
        after,
    };
    element.issues = detect_hover_issues(&styles);
    element.computed_styles = Some(styles);

    page.move_pointer(0.0, 0.0).await?;
    pause(config.timings.pointer_reset_ms).await;
    Ok(true)
}

async fn snap<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    element: &mut HoverElement,
    clip: BoundingBox,
    state: &'static str,
) -> Result<()> {
    let path = shot_path(config, &target.name, &element.name, element.index, state);
    page.screenshot(&path, CaptureArea::Clip(clip)).await?;
    element.screenshots.push(HoverShot {
        state,
        path: path.display().to_string(),
    });
    Ok(())
}
