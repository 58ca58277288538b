pub mod json;
pub mod summary;
pub mod types;

pub use types::{AnalysisReport, HoverReport, WhiteFlashReport};

/// Report file names, fixed per tool
pub const ANALYSIS_REPORT: &str = "analysis-report.json";
pub const HOVER_REPORT: &str = "hover-test-report.json";
pub const WHITE_FLASH_REPORT: &str = "white-flash-report.json";
