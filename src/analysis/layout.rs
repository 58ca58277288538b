//! Overflow, spacing and font-size classification
//!
//! The browser only reports raw element metrics ([`LayoutSnapshot`]); every
//! threshold lives here so the rules can be tested without a page.

use serde::{Deserialize, Serialize};

const EDGE_MARGIN: f64 = 10.0;
const EDGE_MIN_WIDTH: f64 = 100.0;
const BEYOND_MIN_WIDTH: f64 = 50.0;
const MIN_FONT_SIZE: f64 = 10.0;
const LARGE_FONT_SIZE: f64 = 100.0;
const LARGE_TEXT_VIEWPORT_SHARE: f64 = 0.9;

/// Tags checked for edge spacing
const SPACING_TAGS: [&str; 11] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "a", "button", "li",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub width: f64,
    pub height: f64,
}

/// Metrics of any element carrying visible text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxMetrics {
    pub tag: String,
    pub id: String,
    pub class_name: String,
    pub text: String,
    pub scroll_width: f64,
    pub client_width: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub overflow: String,
    pub overflow_x: String,
    pub text_overflow: String,
    pub rect: Rect,
}

/// Metrics of a typographic element (headings, paragraphs, links, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextMetrics {
    pub tag: String,
    pub class_name: String,
    pub text: String,
    pub font_size: f64,
    pub rect: Rect,
}

/// Everything the auditor reads from one rendered page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSnapshot {
    pub viewport_width: f64,
    pub boxes: Vec<BoxMetrics>,
    pub texts: Vec<TextMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalExtent {
    pub left: f64,
    pub right: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OverflowIssue {
    #[serde(rename_all = "camelCase")]
    HorizontalOverflow {
        selector: String,
        text: String,
        scroll_width: f64,
        client_width: f64,
        overflow: String,
        position: Position,
    },
    TextClipped {
        selector: String,
        text: String,
        position: Position,
    },
    #[serde(rename_all = "camelCase")]
    BeyondViewport {
        selector: String,
        text: String,
        rect: HorizontalExtent,
        viewport_width: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SpacingIssue {
    TooCloseToLeftEdge {
        text: String,
        left: f64,
    },
    #[serde(rename_all = "camelCase")]
    TooCloseToRightEdge {
        text: String,
        right: f64,
        viewport_width: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FontIssue {
    #[serde(rename_all = "camelCase")]
    FontTooSmall {
        text: String,
        font_size: f64,
        selector: String,
    },
    #[serde(rename_all = "camelCase")]
    LargeTextMayOverflow {
        text: String,
        font_size: f64,
        element_width: f64,
        viewport_width: f64,
    },
}

/// First `max` characters, on char boundaries
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Short human-readable selector: `#id`, else `tag.c1.c2.c3`, else `tag`.
/// Framework-generated classes starting with `_` are dropped.
pub fn short_selector(tag: &str, id: &str, class_name: &str) -> String {
    let tag = tag.to_lowercase();
    if !id.is_empty() {
        return format!("#{}", id);
    }
    let classes: Vec<&str> = class_name
        .split(' ')
        .filter(|c| !c.is_empty() && !c.starts_with('_'))
        .take(3)
        .collect();
    if classes.is_empty() {
        tag
    } else {
        format!("{}.{}", tag, classes.join("."))
    }
}

pub fn overflow_issues(snapshot: &LayoutSnapshot) -> Vec<OverflowIssue> {
    let mut issues = Vec::new();

    for el in &snapshot.boxes {
        if el.text.trim().is_empty() {
            continue;
        }
        let selector = short_selector(&el.tag, &el.id, &el.class_name);
        let position = Position {
            top: el.rect.top,
            left: el.rect.left,
        };

        let scrolls = el.overflow_x == "scroll" || el.overflow_x == "auto";
        if el.scroll_width > el.client_width && !scrolls {
            issues.push(OverflowIssue::HorizontalOverflow {
                selector: selector.clone(),
                text: truncate(&el.text, 100),
                scroll_width: el.scroll_width,
                client_width: el.client_width,
                overflow: el.overflow.clone(),
                position,
            });
        }

        let clips = el.text_overflow == "ellipsis" || el.overflow == "hidden";
        let exceeds =
            el.scroll_width > el.client_width || el.scroll_height > el.client_height;
        if clips && exceeds {
            issues.push(OverflowIssue::TextClipped {
                selector: selector.clone(),
                text: truncate(&el.text, 100),
                position,
            });
        }

        let outside = el.rect.right > snapshot.viewport_width || el.rect.left < 0.0;
        if outside && el.rect.width > BEYOND_MIN_WIDTH {
            issues.push(OverflowIssue::BeyondViewport {
                selector,
                text: truncate(&el.text, 50),
                rect: HorizontalExtent {
                    left: el.rect.left,
                    right: el.rect.right,
                    width: el.rect.width,
                },
                viewport_width: snapshot.viewport_width,
            });
        }
    }

    issues
}

pub fn spacing_issues(snapshot: &LayoutSnapshot) -> Vec<SpacingIssue> {
    let mut issues = Vec::new();

    for el in &snapshot.texts {
        let text = el.text.trim();
        let laid_out = el.rect.width > 0.0 && el.rect.height > 0.0;
        if text.is_empty() || !laid_out || !SPACING_TAGS.contains(&el.tag.as_str()) {
            continue;
        }
        if el.rect.width <= EDGE_MIN_WIDTH {
            continue;
        }
        if el.rect.left < EDGE_MARGIN {
            issues.push(SpacingIssue::TooCloseToLeftEdge {
                text: truncate(text, 50),
                left: el.rect.left,
            });
        }
        if el.rect.right > snapshot.viewport_width - EDGE_MARGIN {
            issues.push(SpacingIssue::TooCloseToRightEdge {
                text: truncate(text, 50),
                right: el.rect.right,
                viewport_width: snapshot.viewport_width,
            });
        }
    }

    issues
}

pub fn font_issues(snapshot: &LayoutSnapshot) -> Vec<FontIssue> {
    let mut issues = Vec::new();

    for el in &snapshot.texts {
        let text = el.text.trim();
        if text.is_empty() {
            continue;
        }
        if el.font_size > 0.0 && el.font_size < MIN_FONT_SIZE {
            let first_class = el.class_name.split(' ').next().unwrap_or_default();
            let selector = if el.class_name.is_empty() {
                el.tag.clone()
            } else {
                format!("{}.{}", el.tag, first_class)
            };
            issues.push(FontIssue::FontTooSmall {
                text: truncate(text, 50),
                font_size: el.font_size,
                selector,
            });
        }
        if el.font_size > LARGE_FONT_SIZE
            && el.rect.width > snapshot.viewport_width * LARGE_TEXT_VIEWPORT_SHARE
        {
            issues.push(FontIssue::LargeTextMayOverflow {
                text: truncate(text, 50),
                font_size: el.font_size,
                element_width: el.rect.width,
                viewport_width: snapshot.viewport_width,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(tag: &str, content: &str, font_size: f64, left: f64, width: f64) -> TextMetrics {
        TextMetrics {
            tag: tag.to_string(),
            class_name: "font-display text-xs".to_string(),
            text: content.to_string(),
            font_size,
            rect: Rect {
                top: 0.0,
                left,
                right: left + width,
                width,
                height: 20.0,
            },
        }
    }

    #[test]
    fn test_short_selector() {
        assert_eq!(short_selector("DIV", "hero", "a b"), "#hero");
        assert_eq!(
            short_selector("DIV", "", "_next flex  gap-4 px-2 py-2"),
            "div.flex.gap-4.px-2"
        );
        assert_eq!(short_selector("SECTION", "", ""), "section");
    }

    #[test]
    fn test_horizontal_overflow_and_clip() {
        let snapshot = LayoutSnapshot {
            viewport_width: 375.0,
            boxes: vec![BoxMetrics {
                tag: "H1".into(),
                class_name: "title".into(),
                text: "Undergraduate Research Conference".into(),
                scroll_width: 420.0,
                client_width: 360.0,
                scroll_height: 40.0,
                client_height: 40.0,
                overflow: "hidden".into(),
                overflow_x: "hidden".into(),
                rect: Rect {
                    top: 10.0,
                    left: 8.0,
                    right: 368.0,
                    width: 360.0,
                    height: 40.0,
                },
                ..Default::default()
            }],
            texts: vec![],
        };
        let kinds: Vec<_> = overflow_issues(&snapshot)
            .into_iter()
            .map(|i| match i {
                OverflowIssue::HorizontalOverflow { selector, .. } => {
                    assert_eq!(selector, "h1.title");
                    "horizontal-overflow"
                }
                OverflowIssue::TextClipped { .. } => "text-clipped",
                OverflowIssue::BeyondViewport { .. } => "beyond-viewport",
            })
            .collect();
        assert_eq!(kinds, vec!["horizontal-overflow", "text-clipped"]);
    }

    #[test]
    fn test_scrollable_and_textless_boxes_are_ignored() {
        let snapshot = LayoutSnapshot {
            viewport_width: 1440.0,
            boxes: vec![
                BoxMetrics {
                    text: "carousel".into(),
                    scroll_width: 3000.0,
                    client_width: 1440.0,
                    overflow_x: "auto".into(),
                    ..Default::default()
                },
                BoxMetrics {
                    text: "   ".into(),
                    scroll_width: 3000.0,
                    client_width: 1440.0,
                    ..Default::default()
                },
            ],
            texts: vec![],
        };
        assert!(overflow_issues(&snapshot).is_empty());
    }

    #[test]
    fn test_beyond_viewport() {
        let snapshot = LayoutSnapshot {
            viewport_width: 768.0,
            boxes: vec![BoxMetrics {
                tag: "p".into(),
                text: "Sponsors".into(),
                rect: Rect {
                    left: 700.0,
                    right: 900.0,
                    width: 200.0,
                    ..Default::default()
                },
                ..Default::default()
            }],
            texts: vec![],
        };
        let issues = overflow_issues(&snapshot);
        assert_eq!(issues.len(), 1);
        let json = serde_json::to_value(&issues[0]).unwrap();
        assert_eq!(json["type"], "beyond-viewport");
        assert_eq!(json["viewportWidth"], 768.0);
    }

    #[test]
    fn test_edge_spacing() {
        let snapshot = LayoutSnapshot {
            viewport_width: 375.0,
            boxes: vec![],
            texts: vec![
                text("p", "Left hugging paragraph", 16.0, 4.0, 200.0),
                text("p", "Right hugging paragraph", 16.0, 170.0, 200.0),
                text("label", "Labels are not spacing-checked", 16.0, 0.0, 375.0),
                text("span", "narrow", 16.0, 0.0, 60.0),
            ],
        };
        let issues = spacing_issues(&snapshot);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], SpacingIssue::TooCloseToLeftEdge { left, .. } if left == 4.0));
        assert!(matches!(issues[1], SpacingIssue::TooCloseToRightEdge { .. }));
    }

    #[test]
    fn test_font_sizes() {
        let snapshot = LayoutSnapshot {
            viewport_width: 1440.0,
            boxes: vec![],
            texts: vec![
                text("label", "tiny", 9.0, 20.0, 40.0),
                text("h1", "HUGE", 140.0, 0.0, 1400.0),
                text("h2", "big but narrow", 140.0, 0.0, 600.0),
                text("p", "hidden", 0.0, 0.0, 0.0),
            ],
        };
        let issues = font_issues(&snapshot);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0],
            FontIssue::FontTooSmall {
                text: "tiny".into(),
                font_size: 9.0,
                selector: "label.font-display".into(),
            }
        );
        assert!(matches!(issues[1], FontIssue::LargeTextMayOverflow { .. }));
    }
}
