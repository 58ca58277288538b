//! Before/during/after style comparison for the hover animation audit

use serde::{Deserialize, Serialize};

use super::color::is_transparent;

/// Literal spellings of white a computed style may report
const WHITE_SPELLINGS: [&str; 5] = [
    "rgb(255, 255, 255)",
    "rgba(255, 255, 255, 1)",
    "#ffffff",
    "#fff",
    "white",
];

fn is_white(value: &str) -> bool {
    WHITE_SPELLINGS.contains(&value)
}

/// Subset of `getComputedStyle` captured at each hover phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSnapshot {
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub border_color: String,
    #[serde(default)]
    pub opacity: String,
    #[serde(default)]
    pub transform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
}

/// Styles at the three hover phases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoverStyles {
    pub initial: StyleSnapshot,
    pub during: StyleSnapshot,
    pub after: StyleSnapshot,
}

/// Opacity/background pair used as evidence for `invisible-flash`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    pub opacity: String,
    pub bg: String,
}

impl From<&StyleSnapshot> for Visibility {
    fn from(style: &StyleSnapshot) -> Self {
        Self {
            opacity: style.opacity.clone(),
            bg: style.background_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HoverIssue {
    WhiteFlashBg {
        description: String,
        initial: String,
        during: String,
        #[serde(rename = "final")]
        after: String,
    },
    WhiteFlashText {
        description: String,
        initial: String,
        during: String,
        #[serde(rename = "final")]
        after: String,
    },
    InvisibleFlash {
        description: String,
        initial: Visibility,
        during: Visibility,
        #[serde(rename = "final")]
        after: Visibility,
    },
    SameColorFlash {
        description: String,
        color: String,
        #[serde(rename = "backgroundColor")]
        background_color: String,
    },
    Error {
        description: String,
    },
}

impl HoverIssue {
    pub fn kind(&self) -> &'static str {
        match self {
            HoverIssue::WhiteFlashBg { .. } => "white-flash-bg",
            HoverIssue::WhiteFlashText { .. } => "white-flash-text",
            HoverIssue::InvisibleFlash { .. } => "invisible-flash",
            HoverIssue::SameColorFlash { .. } => "same-color-flash",
            HoverIssue::Error { .. } => "error",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            HoverIssue::WhiteFlashBg { description, .. }
            | HoverIssue::WhiteFlashText { description, .. }
            | HoverIssue::InvisibleFlash { description, .. }
            | HoverIssue::SameColorFlash { description, .. }
            | HoverIssue::Error { description } => description,
        }
    }
}

/// Compare the three hover phases of one element
pub fn detect_hover_issues(styles: &HoverStyles) -> Vec<HoverIssue> {
    let HoverStyles {
        initial,
        during,
        after,
    } = styles;
    let mut issues = Vec::new();

    if is_white(&during.background_color)
        && !is_white(&initial.background_color)
        && !is_white(&after.background_color)
    {
        issues.push(HoverIssue::WhiteFlashBg {
            description: "Background flashes white during transition".to_string(),
            initial: initial.background_color.clone(),
            during: during.background_color.clone(),
            after: after.background_color.clone(),
        });
    }

    if is_white(&during.color) && !is_white(&initial.color) && !is_white(&after.color) {
        issues.push(HoverIssue::WhiteFlashText {
            description: "Text flashes white during transition".to_string(),
            initial: initial.color.clone(),
            during: during.color.clone(),
            after: after.color.clone(),
        });
    }

    let vanishes = during.opacity == "0" || is_transparent(&during.background_color);
    if vanishes && initial.opacity != "0" && after.opacity != "0" {
        issues.push(HoverIssue::InvisibleFlash {
            description: "Element becomes invisible during transition".to_string(),
            initial: initial.into(),
            during: during.into(),
            after: after.into(),
        });
    }

    if during.color == during.background_color && initial.color != initial.background_color {
        issues.push(HoverIssue::SameColorFlash {
            description: "Text and background become same color during transition".to_string(),
            color: during.color.clone(),
            background_color: during.background_color.clone(),
        });
    }

    issues
}
