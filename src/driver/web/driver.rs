//! Web Driver implementation using Playwright
//!
//! Launches a headless Chromium and exposes each tab as a [`QaPage`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use playwright::api::{Browser, BrowserContext, DocumentLoadState, FloatRect, Page, Viewport};
use playwright::Playwright;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::driver::traits::{CaptureArea, QaBrowser, QaPage};
use crate::error::QaError;
use crate::utils::{self, Config};

/// Web Driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub headless: bool,
    /// Browser executable; discovered from common install paths when unset
    pub executable: Option<PathBuf>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
        }
    }
}

impl From<&Config> for WebDriverConfig {
    fn from(config: &Config) -> Self {
        Self {
            headless: config.headless,
            executable: config.chromium_path.clone(),
        }
    }
}

/// Chromium session driven through Playwright
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
}

impl WebDriver {
    /// Start Playwright and launch Chromium
    pub async fn launch(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let chromium = playwright.chromium();
        let mut launcher = chromium.launcher().headless(config.headless);

        let executable = config.executable.clone().or_else(find_system_browser);
        if let Some(ref path) = executable {
            println!("{} Using browser: {}", "🌐".blue(), path.display());
            launcher = launcher.executable(path);
        } else {
            println!(
                "{} No browser executable found, installing Playwright's Chromium...",
                "ℹ".blue()
            );
            playwright
                .prepare()
                .context("Failed to install Playwright browsers")?;
        }

        let args: Vec<String> = ["--no-sandbox", "--disable-setuid-sandbox"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        launcher = launcher.args(&args);

        let browser = launcher
            .launch()
            .await
            .map_err(|e| QaError::Browser(e.to_string()))?;
        let context = browser.context_builder().build().await?;

        log::debug!("browser launched (headless: {})", config.headless);

        Ok(Self {
            playwright,
            browser,
            context,
        })
    }
}

#[async_trait]
impl QaBrowser for WebDriver {
    type Page = WebPage;

    async fn open_page(&self, viewport: &utils::Viewport) -> Result<WebPage> {
        let page = self.context.new_page().await?;
        page.set_viewport_size(Viewport {
            width: viewport.width as i32,
            height: viewport.height as i32,
        })
        .await?;
        Ok(WebPage {
            page: Mutex::new(page),
        })
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// One Playwright tab
pub struct WebPage {
    page: Mutex<Page>,
}

#[async_trait]
impl QaPage for WebPage {
    async fn goto(&self, url: &str, timeout_ms: u64) -> Result<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .timeout(timeout_ms as f64)
            .wait_until(DocumentLoadState::NetworkIdle)
            .goto()
            .await
            .map_err(|e| QaError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn evaluate(&self, script: &str, arg: Value) -> Result<Value> {
        let page = self.page.lock().await;
        let value: Value = page.evaluate(script, arg).await?;
        Ok(value)
    }

    async fn move_pointer(&self, x: f64, y: f64) -> Result<()> {
        let page = self.page.lock().await;
        page.mouse.r#move(x, y, None).await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path, area: CaptureArea) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let page = self.page.lock().await;
        let builder = page.screenshot_builder().path(path.to_path_buf());
        let builder = match area {
            CaptureArea::Viewport => builder,
            CaptureArea::FullPage => builder.full_page(true),
            CaptureArea::Clip(b) => builder.clip(FloatRect {
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
            }),
        };
        builder.screenshot().await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let page = self.page.lock().await;
        page.close(None).await?;
        Ok(())
    }
}

fn find_system_browser() -> Option<PathBuf> {
    let common_paths = [
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
    ];

    common_paths
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}
