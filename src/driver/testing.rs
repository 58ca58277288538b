//! Scripted in-memory browser for exercising runners without Chromium

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::traits::{CaptureArea, QaBrowser, QaPage};
use crate::error::QaError;
use crate::utils::Viewport;

type Handler = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Everything a scripted page was asked to do
#[derive(Debug, Default)]
pub struct PageLog {
    pub visited: Vec<String>,
    pub pointer: Vec<(f64, f64)>,
    pub screenshots: Vec<(PathBuf, CaptureArea)>,
    pub closed: usize,
}

/// Page answering each known script with a canned or computed value.
/// Unknown scripts evaluate to `null`.
#[derive(Clone, Default)]
pub struct ScriptedPage {
    handlers: HashMap<String, Handler>,
    unreachable: Vec<String>,
    log: Arc<Mutex<PageLog>>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, script: &str, value: Value) -> Self {
        self.on_fn(script, move |_| value.clone())
    }

    pub fn on_fn<F>(mut self, script: &str, handler: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.handlers.insert(script.to_string(), Arc::new(handler));
        self
    }

    /// Navigation to any URL ending with `suffix` fails
    pub fn unreachable(mut self, suffix: &str) -> Self {
        self.unreachable.push(suffix.to_string());
        self
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, PageLog> {
        self.log.lock().expect("page log poisoned")
    }
}

#[async_trait]
impl QaPage for ScriptedPage {
    async fn goto(&self, url: &str, _timeout_ms: u64) -> Result<()> {
        if self.unreachable.iter().any(|s| url.ends_with(s.as_str())) {
            return Err(QaError::Navigation {
                url: url.to_string(),
                reason: "Timeout 30000ms exceeded".to_string(),
            }
            .into());
        }
        self.log().visited.push(url.to_string());
        Ok(())
    }

    async fn evaluate(&self, script: &str, arg: Value) -> Result<Value> {
        Ok(self
            .handlers
            .get(script)
            .map(|handler| handler(&arg))
            .unwrap_or(Value::Null))
    }

    async fn move_pointer(&self, x: f64, y: f64) -> Result<()> {
        self.log().pointer.push((x, y));
        Ok(())
    }

    async fn screenshot(&self, path: &Path, area: CaptureArea) -> Result<()> {
        self.log().screenshots.push((path.to_path_buf(), area));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.log().closed += 1;
        Ok(())
    }
}

/// Browser handing out clones of one scripted page
#[derive(Clone, Default)]
pub struct ScriptedBrowser {
    pub page: ScriptedPage,
    pub opened: Arc<Mutex<Vec<Viewport>>>,
}

impl ScriptedBrowser {
    pub fn new(page: ScriptedPage) -> Self {
        Self {
            page,
            opened: Arc::default(),
        }
    }
}

#[async_trait]
impl QaBrowser for ScriptedBrowser {
    type Page = ScriptedPage;

    async fn open_page(&self, viewport: &Viewport) -> Result<ScriptedPage> {
        self.opened
            .lock()
            .expect("viewport log poisoned")
            .push(viewport.clone());
        Ok(self.page.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
