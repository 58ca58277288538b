//! Section screenshotter: viewport-sized captures down one long page

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;

use super::{close_page, open_route, pause};
use crate::driver::probe;
use crate::driver::traits::{CaptureArea, QaBrowser, QaPage};
use crate::driver::web::WebDriver;
use crate::utils::{Config, PageTarget};

pub async fn execute(config: &Config) -> Result<()> {
    println!("{} Capturing page sections...\n", "▶".green().bold());

    let browser = WebDriver::launch(config.into()).await?;
    let shots = run(&browser, config).await;
    browser.close().await?;
    let shots = shots?;

    println!(
        "\n{} Captured {} section(s) in {}",
        "✓".green(),
        shots.len(),
        config.output.sections.display().to_string().cyan()
    );
    Ok(())
}

/// Scroll offsets covering a document of `scroll_height` in `viewport_height` steps
pub fn section_offsets(scroll_height: u32, viewport_height: u32) -> Vec<u32> {
    if viewport_height == 0 {
        return Vec::new();
    }
    let count = scroll_height.div_ceil(viewport_height);
    (0..count).map(|i| i * viewport_height).collect()
}

pub fn section_file_name(index: usize, offset: u32) -> String {
    format!("section-{:02}-y{}.png", index, offset)
}

/// Capture every section of the configured route. Returns the files written.
pub async fn run<B: QaBrowser>(browser: &B, config: &Config) -> Result<Vec<PathBuf>> {
    let dir = &config.output.sections;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let target = PageTarget::new("sections", &config.sections_path);
    let page = browser.open_page(&config.desktop).await?;
    let shots = capture(&page, config, &target).await;
    close_page(&page).await;
    shots
}

async fn capture<P: QaPage>(page: &P, config: &Config, target: &PageTarget) -> Result<Vec<PathBuf>> {
    if let Err(e) = open_route(page, config, target).await {
        anyhow::bail!("Could not open {}: {}", target.path, e);
    }
    pause(config.timings.loading_screen_ms).await;

    let height = probe::scroll_height(page).await?;
    let offsets = section_offsets(height, config.desktop.height);
    log::info!("page height {}px, {} section(s)", height, offsets.len());

    let bar = progress_bar(offsets.len() as u64);
    let mut shots = Vec::with_capacity(offsets.len());
    let mut previous = None;
    for (index, offset) in offsets.into_iter().enumerate() {
        // Named by where the browser actually scrolled, not the requested offset
        let actual = probe::scroll_to(page, offset).await?;
        bar.inc(1);
        if previous.is_some_and(|p| actual <= p) {
            log::debug!("section {} clamped to y={}, already captured", index, actual);
            continue;
        }
        previous = Some(actual);
        pause(config.timings.section_scroll_ms).await;

        let path = config.output.sections.join(section_file_name(index, actual));
        page.screenshot(&path, CaptureArea::Viewport).await?;
        bar.set_message(format!("y={}", actual));
        shots.push(path);
    }
    bar.finish_and_clear();
    Ok(shots)
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = if std::io::stdout().is_terminal() {
        ProgressBar::new(len)
    } else {
        ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden())
    };
    if let Ok(style) = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::probe::{SCROLL_HEIGHT_SCRIPT, SCROLL_SCRIPT};
    use crate::driver::testing::{ScriptedBrowser, ScriptedPage};
    use crate::utils::config::{OutputDirs, Timings};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.output = OutputDirs::under(dir);
        config.timings = Timings {
            loading_screen_ms: 0,
            section_scroll_ms: 0,
            ..Timings::default()
        };
        config
    }

    #[test]
    fn test_offsets_cover_partial_last_section() {
        assert_eq!(section_offsets(2000, 900), vec![0, 900, 1800]);
        assert_eq!(section_offsets(1800, 900), vec![0, 900]);
        assert_eq!(section_offsets(0, 900), Vec::<u32>::new());
        assert!(section_offsets(500, 0).is_empty());
    }

    #[test]
    fn test_file_names_are_zero_padded() {
        assert_eq!(section_file_name(3, 2700), "section-03-y2700.png");
        assert_eq!(section_file_name(12, 10800), "section-12-y10800.png");
    }

    #[tokio::test]
    async fn test_sections_named_by_actual_scroll_offset() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let scrolls = Arc::new(Mutex::new(Vec::new()));
        let scroll_log = scrolls.clone();
        let page = ScriptedPage::new()
            .on(SCROLL_HEIGHT_SCRIPT, json!(2000))
            .on_fn(SCROLL_SCRIPT, move |y| {
                scroll_log.lock().unwrap().push(y.clone());
                // 2000px document in a 900px viewport
                json!(y.as_u64().unwrap_or_default().min(1100))
            });
        let browser = ScriptedBrowser::new(page);

        let shots = run(&browser, &config).await.unwrap();

        let names: Vec<_> = shots
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["section-00-y0.png", "section-01-y900.png", "section-02-y1100.png"]
        );
        assert_eq!(*scrolls.lock().unwrap(), vec![json!(0), json!(900), json!(1800)]);

        let log = browser.page.log();
        assert_eq!(log.visited, vec!["http://localhost:3000/"]);
        assert!(log.screenshots.iter().all(|(_, area)| *area == CaptureArea::Viewport));
        assert_eq!(log.closed, 1);
    }

    #[tokio::test]
    async fn test_unreachable_route_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.sections_path = "/conference".to_string();
        let browser = ScriptedBrowser::new(ScriptedPage::new().unreachable("/conference"));

        let err = run(&browser, &config).await.unwrap_err();

        assert!(err.to_string().contains("/conference"));
        assert_eq!(browser.page.log().closed, 1);
    }
}
