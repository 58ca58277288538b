//! Sequential run loops: one browser per run, one tab per route at a time

pub mod hover;
pub mod layout;
pub mod sections;
pub mod white_flash;

use anyhow::Result;
use colored::Colorize;
use std::time::Duration;

use crate::driver::traits::QaPage;
use crate::utils::{Config, PageTarget};

/// Which tool to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    WhiteFlash,
    Hover,
    Analyze,
    Sections,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Analyze, Tool::Sections, Tool::Hover, Tool::WhiteFlash];
}

/// Run one tool against a freshly launched browser
pub async fn run_tool(tool: Tool, config: &Config) -> Result<()> {
    match tool {
        Tool::WhiteFlash => white_flash::execute(config).await,
        Tool::Hover => hover::execute(config).await,
        Tool::Analyze => layout::execute(config).await,
        Tool::Sections => sections::execute(config).await,
    }
}

/// Fixed wait letting CSS transitions and animations settle
pub(crate) async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

pub(crate) fn page_banner(target: &PageTarget) {
    println!("\n{}", "=".repeat(60));
    println!("Testing: {} ({})", target.name.cyan(), target.path);
    println!("{}", "=".repeat(60));
}

/// Navigate to `target`; a failure is logged and returned as its message
pub(crate) async fn open_route<P: QaPage + ?Sized>(
    page: &P,
    config: &Config,
    target: &PageTarget,
) -> std::result::Result<(), String> {
    let url = target.url(&config.base_url);
    match page.goto(&url, config.timings.navigation_timeout_ms).await {
        Ok(()) => {
            log::debug!("loaded {}", url);
            Ok(())
        }
        Err(e) => {
            let message = e.to_string();
            eprintln!("  {} Error: {}", "✗".red(), message);
            log::warn!("skipping {}: {:#}", target.name, e);
            Err(message)
        }
    }
}

/// Close a tab, logging instead of failing the run
pub(crate) async fn close_page<P: QaPage + ?Sized>(page: &P) {
    if let Err(e) = page.close().await {
        log::warn!("failed to close page: {:#}", e);
    }
}
