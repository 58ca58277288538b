//! Playwright-backed Chromium driver

pub mod driver;

pub use driver::{WebDriver, WebDriverConfig, WebPage};
