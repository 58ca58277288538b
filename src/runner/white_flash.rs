//! Hover-transition flash detector
//!
//! Hovers every visible element with a color hover utility and samples its
//! colors while the transition runs. Elements with findings get an evidence
//! crop next to the report.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::{close_page, open_route, page_banner, pause};
use crate::analysis::flash::{
    detect_flashes, has_color_hover, sample_delays, ColorState, FlashIssue, Phase,
    TransitionTrace, FINAL_SAMPLE_DELAY_MS, SAMPLE_OFFSETS_MS,
};
use crate::driver::probe::{self, ColorSample};
use crate::driver::traits::{CaptureArea, QaBrowser, QaPage};
use crate::driver::web::WebDriver;
use crate::report::types::{FlashElement, FlashPageResult, WhiteFlashReport};
use crate::report::{json, summary, WHITE_FLASH_REPORT};
use crate::utils::{Config, PageTarget};

const ELEMENT_NAME: &str = "hover-element";
const CROP_PAD: f64 = 30.0;
const CROP_MAX_WIDTH: f64 = 600.0;
const CROP_MAX_HEIGHT: f64 = 300.0;

/// Launch a browser, run the detector, write and summarize the report
pub async fn execute(config: &Config) -> Result<()> {
    println!("{} Starting white flash animation tests...\n", "▶".green().bold());
    println!("Looking for elements where colors flash white during hover transitions.");

    let browser = WebDriver::launch(config.into()).await?;
    let report = run(&browser, config).await;
    browser.close().await?;
    let report = report?;

    json::write(&report, &config.output.white_flash.join(WHITE_FLASH_REPORT))?;
    summary::print_white_flash(&report);
    Ok(())
}

/// Visit every configured route in turn
pub async fn run<B: QaBrowser>(browser: &B, config: &Config) -> Result<WhiteFlashReport> {
    std::fs::create_dir_all(&config.output.white_flash)?;

    let mut report = WhiteFlashReport::new();
    for target in &config.pages {
        page_banner(target);
        let page = browser.open_page(&config.desktop).await?;
        let result = test_page(&page, config, target).await;
        close_page(&page).await;
        report.push_page(result);
    }
    Ok(report)
}

async fn test_page<P: QaPage>(page: &P, config: &Config, target: &PageTarget) -> FlashPageResult {
    let mut result = FlashPageResult {
        page: target.name.clone(),
        ..Default::default()
    };

    if let Err(e) = open_route(page, config, target).await {
        result.error = Some(e);
        return result;
    }

    if let Err(e) = sweep(page, config, target, &mut result).await {
        eprintln!("  {} Error: {:#}", "✗".red(), e);
        result.error = Some(e.to_string());
    }
    result
}

async fn sweep<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    result: &mut FlashPageResult,
) -> Result<()> {
    pause(config.timings.settle_ms).await;

    let count = probe::tag_matches(
        page,
        &config.flash_candidates,
        Some(config.limits.max_flash_elements),
    )
    .await?;
    println!(
        "  Found {} elements with hover/transition classes",
        count.total
    );

    let mut tested = 0;
    let mut issue_count = 0;

    for index in 0..count.tagged {
        let element = match candidate(page, index).await {
            Ok(Some(class_name)) => {
                tested += 1;
                capture_transition(page, config, target, index, class_name).await
            }
            Ok(None) => continue,
            Err(e) => Some(failed_element(index, &e)),
        };

        let Some(element) = element else { continue };
        if element.issues.is_empty() {
            continue;
        }

        issue_count += element.issues.len();
        println!(
            "  [{}] Found {} issue(s):",
            index,
            element.issues.len()
        );
        for issue in &element.issues {
            match issue.phase() {
                Some(phase) => println!(
                    "      - {} at {}: {}",
                    issue.kind().yellow(),
                    phase,
                    issue.description()
                ),
                None => println!("      - {}: {}", issue.kind().red(), issue.description()),
            }
        }
        result.issues.extend(element.issues.iter().cloned());
        result.elements.push(element);
    }

    println!("\n  Tested {} interactive elements", tested);
    println!("  Found {} issues", issue_count);
    Ok(())
}

/// Class list of a visible element with a color hover utility
async fn candidate<P: QaPage>(page: &P, index: usize) -> Result<Option<String>> {
    let info = probe::element_info(page, index).await?;
    if !info.is_visible() || !has_color_hover(&info.class_name) {
        return Ok(None);
    }
    Ok(Some(info.class_name))
}

fn failed_element(index: usize, error: &anyhow::Error) -> FlashElement {
    FlashElement {
        name: ELEMENT_NAME.to_string(),
        index,
        element: None,
        states: Vec::new(),
        issues: vec![FlashIssue::Error {
            description: format!("{:#}", error),
        }],
        screenshot: None,
    }
}

/// Sample one element through its hover transition.
/// Returns `None` for elements too small to hover meaningfully.
async fn capture_transition<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    index: usize,
    class_name: String,
) -> Option<FlashElement> {
    match try_capture(page, config, target, index, class_name).await {
        Ok(element) => element,
        Err(e) => {
            log::debug!("capture failed for {}[{}]: {:#}", target.name, index, e);
            Some(failed_element(index, &e))
        }
    }
}

fn state(phase: Phase, sample: ColorSample) -> ColorState {
    ColorState {
        phase,
        bg: sample.bg,
        color: sample.color,
        own_bg: None,
        border_color: None,
    }
}

async fn try_capture<P: QaPage>(
    page: &P,
    config: &Config,
    target: &PageTarget,
    index: usize,
    class_name: String,
) -> Result<Option<FlashElement>> {
    let min = config.limits.min_flash_box;
    let bbox = match probe::bounding_box(page, index).await? {
        Some(b) if b.width >= min && b.height >= min => b,
        _ => return Ok(None),
    };

    let first = probe::sample_colors(page, index).await?;
    let mut initial = state(Phase::Initial, first.clone());
    initial.own_bg = first.own_bg;
    initial.border_color = first.border_color;

    let (cx, cy) = bbox.center();
    page.move_pointer(cx, cy).await?;

    let mut samples = Vec::with_capacity(SAMPLE_OFFSETS_MS.len());
    for (delay, offset) in sample_delays().into_iter().zip(SAMPLE_OFFSETS_MS) {
        pause(delay).await;
        let sample = probe::sample_colors(page, index).await?;
        samples.push(state(Phase::After(offset), sample));
    }

    pause(FINAL_SAMPLE_DELAY_MS).await;
    let settled = state(Phase::Final, probe::sample_colors(page, index).await?);

    let trace = TransitionTrace {
        initial,
        samples,
        settled,
    };
    let issues = detect_flashes(&trace);

    page.move_pointer(0.0, 0.0).await?;
    pause(config.timings.pointer_reset_ms).await;

    let screenshot = if issues.is_empty() {
        None
    } else {
        let path = evidence_path(&config.output.white_flash, &target.name, index);
        let clip = bbox.crop(CROP_PAD, CROP_MAX_WIDTH, CROP_MAX_HEIGHT);
        page.screenshot(&path, CaptureArea::Clip(clip)).await?;
        Some(path.display().to_string())
    };

    Ok(Some(FlashElement {
        name: ELEMENT_NAME.to_string(),
        index,
        element: Some(class_name.chars().take(100).collect()),
        states: trace.states(),
        issues,
        screenshot,
    }))
}

fn evidence_path(dir: &Path, page: &str, index: usize) -> std::path::PathBuf {
    dir.join(format!("{}-{}-{}.png", page, ELEMENT_NAME, index))
}
