use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::flash::{ColorState, FlashIssue};
use crate::analysis::hover::{HoverIssue, HoverStyles};
use crate::analysis::layout::{FontIssue, OverflowIssue, SpacingIssue};

/// ISO-8601 timestamp stamped on each report
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// white-flash-report.json
// ---------------------------------------------------------------------------

/// One hovered element that produced at least one issue
#[derive(Debug, Clone, Serialize)]
pub struct FlashElement {
    pub name: String,
    pub index: usize,
    /// First 100 characters of the class list
    pub element: Option<String>,
    pub states: Vec<ColorState>,
    pub issues: Vec<FlashIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlashPageResult {
    pub page: String,
    pub elements: Vec<FlashElement>,
    pub issues: Vec<FlashIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Issue annotated with the page it came from
#[derive(Debug, Clone, Serialize)]
pub struct PagedFlashIssue {
    pub page: String,
    #[serde(flatten)]
    pub issue: FlashIssue,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashSummary {
    pub total_issues: usize,
    pub by_type: BTreeMap<String, Vec<PagedFlashIssue>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhiteFlashReport {
    pub timestamp: String,
    pub pages: Vec<FlashPageResult>,
    pub summary: FlashSummary,
}

impl WhiteFlashReport {
    pub fn new() -> Self {
        Self {
            timestamp: timestamp(),
            pages: Vec::new(),
            summary: FlashSummary::default(),
        }
    }

    /// Append a page and fold its issues into the summary
    pub fn push_page(&mut self, result: FlashPageResult) {
        self.summary.total_issues += result.issues.len();
        for issue in &result.issues {
            self.summary
                .by_type
                .entry(issue.kind().to_string())
                .or_default()
                .push(PagedFlashIssue {
                    page: result.page.clone(),
                    issue: issue.clone(),
                });
        }
        self.pages.push(result);
    }
}

impl Default for WhiteFlashReport {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// hover-test-report.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HoverShot {
    pub state: &'static str,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverElement {
    pub selector: String,
    pub name: String,
    pub index: usize,
    pub screenshots: Vec<HoverShot>,
    pub issues: Vec<HoverIssue>,
    pub computed_styles: Option<HoverStyles>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverPageResult {
    pub page: String,
    pub path: String,
    pub elements: Vec<HoverElement>,
    pub issue_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoverIssueRef {
    pub page: String,
    pub selector: String,
    pub name: String,
    pub index: usize,
    pub description: String,
    pub details: HoverIssue,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverSummary {
    pub total_elements: usize,
    pub total_issues: usize,
    pub issues_by_type: BTreeMap<String, Vec<HoverIssueRef>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoverReport {
    pub timestamp: String,
    pub pages: Vec<HoverPageResult>,
    pub summary: HoverSummary,
}

impl HoverReport {
    pub fn new() -> Self {
        Self {
            timestamp: timestamp(),
            pages: Vec::new(),
            summary: HoverSummary::default(),
        }
    }

    pub fn push_page(&mut self, result: HoverPageResult) {
        self.summary.total_elements += result.elements.len();
        self.summary.total_issues += result.issue_count;
        for element in &result.elements {
            for issue in &element.issues {
                self.summary
                    .issues_by_type
                    .entry(issue.kind().to_string())
                    .or_default()
                    .push(HoverIssueRef {
                        page: result.page.clone(),
                        selector: element.selector.clone(),
                        name: element.name.clone(),
                        index: element.index,
                        description: issue.description().to_string(),
                        details: issue.clone(),
                    });
            }
        }
        self.pages.push(result);
    }
}

impl Default for HoverReport {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// analysis-report.json
// ---------------------------------------------------------------------------

/// Issues of one category found at one viewport
#[derive(Debug, Clone, Serialize)]
pub struct ViewportIssues<T> {
    pub viewport: String,
    pub issues: Vec<T>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageLayoutIssues {
    pub overflow: Vec<ViewportIssues<OverflowIssue>>,
    pub spacing: Vec<ViewportIssues<SpacingIssue>>,
    pub fonts: Vec<ViewportIssues<FontIssue>>,
}

impl PageLayoutIssues {
    pub fn totals(&self) -> (usize, usize, usize) {
        fn count<T>(groups: &[ViewportIssues<T>]) -> usize {
            groups.iter().map(|g| g.issues.len()).sum()
        }
        (
            count(&self.overflow),
            count(&self.spacing),
            count(&self.fonts),
        )
    }
}

/// Page name → issue categories, in page order
pub type AnalysisReport = IndexMap<String, PageLayoutIssues>;
