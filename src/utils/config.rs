use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::QaError;

/// A route of the website under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTarget {
    pub name: String,
    pub path: String,
}

impl PageTarget {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }

    /// Absolute URL of this route under `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// Browser window dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }
}

/// Selector group swept by the hover animation audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverTarget {
    pub selector: String,
    pub name: String,
}

impl HoverTarget {
    fn new(selector: &str, name: &str) -> Self {
        Self {
            selector: selector.to_string(),
            name: name.to_string(),
        }
    }
}

/// Where each tool writes its report and screenshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputDirs {
    pub analysis: PathBuf,
    pub hover: PathBuf,
    pub white_flash: PathBuf,
    pub sections: PathBuf,
}

impl OutputDirs {
    /// Standard layout below `root`
    pub fn under(root: &Path) -> Self {
        Self {
            analysis: root.to_path_buf(),
            hover: root.join("hover-tests"),
            white_flash: root.join("white-flash-tests"),
            sections: root.join("sections"),
        }
    }
}

impl Default for OutputDirs {
    fn default() -> Self {
        Self::under(Path::new("./screenshots"))
    }
}

/// Fixed waits (ms) that let navigation, animations and transitions settle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    pub navigation_timeout_ms: u64,
    /// Wait after navigation for the hover and flash tools
    pub settle_ms: u64,
    /// Wait after navigation for the loading screen (layout audit, sections)
    pub loading_screen_ms: u64,
    pub lazy_scroll_offset: u32,
    pub lazy_scroll_ms: u64,
    pub hover_during_ms: u64,
    pub hover_after_ms: u64,
    pub pointer_reset_ms: u64,
    pub section_scroll_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 30_000,
            settle_ms: 3000,
            loading_screen_ms: 5000,
            lazy_scroll_offset: 500,
            lazy_scroll_ms: 500,
            hover_during_ms: 50,
            hover_after_ms: 400,
            pointer_reset_ms: 100,
            section_scroll_ms: 300,
        }
    }
}

/// Caps on how many elements each tool inspects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Limits {
    pub max_flash_elements: usize,
    pub max_per_hover_target: usize,
    /// Minimum width and height of a flash candidate's bounding box
    pub min_flash_box: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_flash_elements: 100,
            max_per_hover_target: 5,
            min_flash_box: 10.0,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Origin of the already-running website
    pub base_url: String,

    pub headless: bool,

    /// Explicit Chromium/Chrome executable
    pub chromium_path: Option<PathBuf>,

    pub output: OutputDirs,

    pub pages: Vec<PageTarget>,

    /// Viewport matrix of the layout audit
    pub viewports: Vec<Viewport>,

    /// Single viewport used by the hover, flash and section tools
    pub desktop: Viewport,

    pub hover_targets: Vec<HoverTarget>,

    /// Candidate query of the flash detector
    pub flash_candidates: String,

    /// Route captured by the section screenshotter
    pub sections_path: String,

    pub timings: Timings,

    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            headless: true,
            chromium_path: None,
            output: OutputDirs::default(),
            pages: vec![
                PageTarget::new("home", "/"),
                PageTarget::new("about", "/about"),
                PageTarget::new("conference", "/conference"),
                PageTarget::new("get-involved", "/get-involved"),
                PageTarget::new("sponsors", "/sponsors"),
                PageTarget::new("contact", "/contact"),
            ],
            viewports: vec![
                Viewport::new("mobile", 375, 812),
                Viewport::new("tablet", 768, 1024),
                Viewport::new("desktop", 1440, 900),
                Viewport::new("wide", 1920, 1080),
            ],
            desktop: Viewport::new("desktop", 1440, 900),
            hover_targets: default_hover_targets(),
            flash_candidates: r#"[class*="hover:"], [class*="transition"]"#.to_string(),
            sections_path: "/".to_string(),
            timings: Timings::default(),
            limits: Limits::default(),
        }
    }
}

fn default_hover_targets() -> Vec<HoverTarget> {
    vec![
        // Buttons
        HoverTarget::new(r#"a[href*="get-involved"]"#, "cta-button"),
        HoverTarget::new("button", "button"),
        HoverTarget::new(".btn-pill", "btn-pill"),
        HoverTarget::new(".btn-square", "btn-square"),
        HoverTarget::new(".btn-ghost", "btn-ghost"),
        HoverTarget::new(".btn-arrow", "btn-arrow"),
        // Links
        HoverTarget::new(".link", "link"),
        HoverTarget::new(".link-fill", "link-fill"),
        HoverTarget::new(".link-black", "link-black"),
        HoverTarget::new(".link-underline", "link-underline"),
        HoverTarget::new(".link-nav", "link-nav"),
        // Cards
        HoverTarget::new(".card-bordered", "card-bordered"),
        HoverTarget::new(".card-invert", "card-invert"),
        HoverTarget::new(".card-lift", "card-lift"),
        // Navigation
        HoverTarget::new("nav a", "nav-link"),
        HoverTarget::new("header a", "header-link"),
        // Generic hover containers
        HoverTarget::new(r#"[class*="hover:bg-"]"#, "hover-bg"),
        HoverTarget::new(r#"[class*="hover:text-"]"#, "hover-text"),
        HoverTarget::new(r#"[class*="group"]"#, "group-hover"),
        HoverTarget::new(".group", "group-container"),
        HoverTarget::new(r#"[class*="transition"]"#, "transition-element"),
    ]
}

impl Config {
    /// Defaults, then the optional YAML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, QaError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, QaError> {
        let content = std::fs::read_to_string(path).map_err(|source| QaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| QaError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Apply `URC_QA_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("URC_QA_BASE_URL").filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(v) = lookup("URC_QA_HEADLESS") {
            self.headless = v == "true" || v == "1";
        }
        let chromium = lookup("URC_QA_CHROMIUM_PATH")
            .or_else(|| lookup("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH"))
            .filter(|v| !v.is_empty());
        if let Some(path) = chromium {
            self.chromium_path = Some(PathBuf::from(path));
        }
    }
}
