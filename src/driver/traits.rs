use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::utils::Viewport;

/// Element rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Padded crop around the box, clamped at the page origin and capped in size
    pub fn crop(&self, pad: f64, max_width: f64, max_height: f64) -> BoundingBox {
        BoundingBox {
            x: (self.x - pad).max(0.0),
            y: (self.y - pad).max(0.0),
            width: (self.width + pad * 2.0).min(max_width),
            height: (self.height + pad * 2.0).min(max_height),
        }
    }
}

/// What a screenshot covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureArea {
    /// The current viewport
    Viewport,
    /// The whole scrollable document
    FullPage,
    /// A region of the viewport
    Clip(BoundingBox),
}

/// A single browser tab
#[async_trait]
pub trait QaPage: Send + Sync {
    /// Navigate and wait for the network to go idle
    async fn goto(&self, url: &str, timeout_ms: u64) -> Result<()>;

    /// Run `script` (a JS function expression) with `arg` and return its JSON result
    async fn evaluate(&self, script: &str, arg: Value) -> Result<Value>;

    /// Move the pointer, firing enter/leave events on the way
    async fn move_pointer(&self, x: f64, y: f64) -> Result<()>;

    async fn screenshot(&self, path: &Path, area: CaptureArea) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// A browser able to open tabs at a given viewport
#[async_trait]
pub trait QaBrowser: Send + Sync {
    type Page: QaPage;

    async fn open_page(&self, viewport: &Viewport) -> Result<Self::Page>;

    async fn close(&self) -> Result<()>;
}
