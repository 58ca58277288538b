//! Hover-transition flash heuristics
//!
//! A [`TransitionTrace`] records the effective background and text color of
//! one element before hover, at fixed offsets after the pointer enters, and
//! once the transition has settled. [`detect_flashes`] flags colors that show
//! up only mid-transition.

use serde::{Deserialize, Serialize, Serializer};

use super::color::{is_transparent, is_whiteish, parse_rgb};

/// Cumulative sample offsets (ms) after pointer-enter
pub const SAMPLE_OFFSETS_MS: [u64; 6] = [20, 50, 100, 150, 200, 300];

/// Extra wait (ms) after the last offset before the steady-state sample
pub const FINAL_SAMPLE_DELAY_MS: u64 = 200;

/// Channel-sum distance under which text blends into its background
const INVISIBLE_DIFF: u32 = 30;

/// Channel-sum distance the pair must have had before hover to count
const DISTINCT_DIFF: u32 = 50;

/// Stand-in for the initial distance when either color failed to parse
const UNKNOWN_INITIAL_DIFF: u32 = 100;

/// Class fragments that mark an element as having a color hover effect
pub const COLOR_HOVER_MARKERS: [&str; 7] = [
    "hover:bg-",
    "hover:text-",
    "group-hover:",
    "transition-colors",
    "card-invert",
    "link-fill",
    "link-black",
];

/// Delays between consecutive samples, derived from the cumulative offsets
pub fn sample_delays() -> Vec<u64> {
    let mut previous = 0;
    SAMPLE_OFFSETS_MS
        .iter()
        .map(|&ms| {
            let delay = ms - previous;
            previous = ms;
            delay
        })
        .collect()
}

/// Does the class list carry a color-related hover utility
pub fn has_color_hover(class_name: &str) -> bool {
    COLOR_HOVER_MARKERS
        .iter()
        .any(|marker| class_name.contains(marker))
}

/// When a color sample was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    /// Milliseconds after pointer-enter
    After(u64),
    Final,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Initial => write!(f, "initial"),
            Phase::After(ms) => write!(f, "{}ms", ms),
            Phase::Final => write!(f, "final"),
        }
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Colors observed at one phase
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorState {
    pub phase: Phase,
    /// Effective (nearest opaque ancestor) background
    pub bg: String,
    /// Text color
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_bg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

impl ColorState {
    pub fn new(phase: Phase, bg: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            phase,
            bg: bg.into(),
            color: color.into(),
            own_bg: None,
            border_color: None,
        }
    }
}

/// Full sample sequence for one hovered element
#[derive(Debug, Clone)]
pub struct TransitionTrace {
    pub initial: ColorState,
    pub samples: Vec<ColorState>,
    pub settled: ColorState,
}

impl TransitionTrace {
    /// All states in capture order
    pub fn states(&self) -> Vec<ColorState> {
        let mut states = Vec::with_capacity(self.samples.len() + 2);
        states.push(self.initial.clone());
        states.extend(self.samples.iter().cloned());
        states.push(self.settled.clone());
        states
    }
}

/// One detected transition defect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FlashIssue {
    WhiteBgFlash {
        phase: String,
        description: String,
        initial: String,
        during: String,
        #[serde(rename = "final")]
        settled: String,
    },
    WhiteTextFlash {
        phase: String,
        description: String,
        initial: String,
        during: String,
        #[serde(rename = "final")]
        settled: String,
    },
    InvisibleText {
        phase: String,
        description: String,
        bg: String,
        color: String,
    },
    Error {
        description: String,
    },
}

impl FlashIssue {
    pub fn kind(&self) -> &'static str {
        match self {
            FlashIssue::WhiteBgFlash { .. } => "white-bg-flash",
            FlashIssue::WhiteTextFlash { .. } => "white-text-flash",
            FlashIssue::InvisibleText { .. } => "invisible-text",
            FlashIssue::Error { .. } => "error",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            FlashIssue::WhiteBgFlash { description, .. }
            | FlashIssue::WhiteTextFlash { description, .. }
            | FlashIssue::InvisibleText { description, .. }
            | FlashIssue::Error { description } => description,
        }
    }

    pub fn phase(&self) -> Option<&str> {
        match self {
            FlashIssue::WhiteBgFlash { phase, .. }
            | FlashIssue::WhiteTextFlash { phase, .. }
            | FlashIssue::InvisibleText { phase, .. } => Some(phase),
            FlashIssue::Error { .. } => None,
        }
    }
}

/// Classify every mid-transition sample of `trace`
pub fn detect_flashes(trace: &TransitionTrace) -> Vec<FlashIssue> {
    let initial = &trace.initial;
    let settled = &trace.settled;

    let initial_bg = parse_rgb(&initial.bg);
    let settled_bg = parse_rgb(&settled.bg);
    let initial_text = parse_rgb(&initial.color);
    let settled_text = parse_rgb(&settled.color);

    let ends_transparent = is_transparent(&initial.bg) && is_transparent(&settled.bg);
    let initial_diff = match (initial_bg, initial_text) {
        (Some(bg), Some(text)) => bg.channel_diff(&text),
        _ => UNKNOWN_INITIAL_DIFF,
    };

    let mut issues = Vec::new();

    for state in &trace.samples {
        let bg = parse_rgb(&state.bg);
        let text = parse_rgb(&state.color);
        let phase = state.phase.to_string();

        if is_whiteish(bg) && !is_whiteish(initial_bg) && !is_whiteish(settled_bg) {
            issues.push(FlashIssue::WhiteBgFlash {
                phase: phase.clone(),
                description: format!("Background becomes white ({}) during transition", state.bg),
                initial: initial.bg.clone(),
                during: state.bg.clone(),
                settled: settled.bg.clone(),
            });
        }

        if is_whiteish(text) && !is_whiteish(initial_text) && !is_whiteish(settled_text) {
            issues.push(FlashIssue::WhiteTextFlash {
                phase: phase.clone(),
                description: format!("Text becomes white ({}) during transition", state.color),
                initial: initial.color.clone(),
                during: state.color.clone(),
                settled: settled.color.clone(),
            });
        }

        // No background of its own at any point: nothing hover-related to judge
        if ends_transparent && is_transparent(&state.bg) {
            continue;
        }

        if let (Some(bg), Some(text)) = (bg, text) {
            if bg.channel_diff(&text) < INVISIBLE_DIFF && initial_diff > DISTINCT_DIFF {
                issues.push(FlashIssue::InvisibleText {
                    phase,
                    description: "Text and background become same color".to_string(),
                    bg: state.bg.clone(),
                    color: state.color.clone(),
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(initial: (&str, &str), during: (&str, &str), settled: (&str, &str)) -> TransitionTrace {
        TransitionTrace {
            initial: ColorState::new(Phase::Initial, initial.0, initial.1),
            samples: vec![ColorState::new(Phase::After(100), during.0, during.1)],
            settled: ColorState::new(Phase::Final, settled.0, settled.1),
        }
    }

    #[test]
    fn test_white_element_is_not_a_flash() {
        let white = "rgb(255, 255, 255)";
        let t = trace(
            (white, "rgb(0, 0, 0)"),
            (white, "rgb(0, 0, 0)"),
            (white, "rgb(0, 0, 0)"),
        );
        for state in t.states() {
            assert!(is_whiteish(parse_rgb(&state.bg)));
        }
        assert!(detect_flashes(&t)
            .iter()
            .all(|i| !matches!(i, FlashIssue::WhiteBgFlash { .. })));
    }

    #[test]
    fn test_black_to_blue_through_white_flags_once() {
        let t = trace(
            ("rgb(0, 0, 0)", "rgb(255, 255, 0)"),
            ("rgb(255, 255, 255)", "rgb(255, 255, 0)"),
            ("rgb(75, 156, 211)", "rgb(255, 255, 0)"),
        );
        let issues = detect_flashes(&t);
        let flashes: Vec<_> = issues
            .iter()
            .filter(|i| matches!(i, FlashIssue::WhiteBgFlash { .. }))
            .collect();
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].phase(), Some("100ms"));
        match flashes[0] {
            FlashIssue::WhiteBgFlash {
                initial,
                during,
                settled,
                ..
            } => {
                assert_eq!(initial, "rgb(0, 0, 0)");
                assert_eq!(during, "rgb(255, 255, 255)");
                assert_eq!(settled, "rgb(75, 156, 211)");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_transparent_throughout_is_skipped() {
        let clear = "rgba(0, 0, 0, 0)";
        let t = trace((clear, clear), (clear, clear), (clear, clear));
        assert!(detect_flashes(&t).is_empty());
    }

    #[test]
    fn test_transparent_bg_with_dark_text_is_skipped() {
        // Would read as black-on-black without the skip
        let clear = "rgba(0, 0, 0, 0)";
        let t = TransitionTrace {
            initial: ColorState::new(Phase::Initial, clear, "rgb(200, 200, 200)"),
            samples: vec![ColorState::new(Phase::After(50), clear, "rgb(5, 5, 5)")],
            settled: ColorState::new(Phase::Final, clear, "rgb(200, 200, 200)"),
        };
        assert!(detect_flashes(&t).is_empty());
    }

    #[test]
    fn test_invisible_text_mid_transition() {
        let t = trace(
            ("rgb(0, 0, 0)", "rgb(255, 255, 255)"),
            ("rgb(75, 156, 211)", "rgb(80, 150, 210)"),
            ("rgb(75, 156, 211)", "rgb(0, 0, 0)"),
        );
        let issues = detect_flashes(&t);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind(), "invisible-text");
    }

    #[test]
    fn test_unparsed_initial_text_counts_as_distinct() {
        let t = trace(
            ("rgb(0, 0, 0)", "currentcolor"),
            ("rgb(10, 10, 10)", "rgb(12, 12, 12)"),
            ("rgb(0, 0, 0)", "currentcolor"),
        );
        let kinds: Vec<_> = detect_flashes(&t).iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, vec!["invisible-text"]);
    }

    #[test]
    fn test_text_flash() {
        let t = trace(
            ("rgb(19, 41, 75)", "rgb(0, 0, 0)"),
            ("rgb(19, 41, 75)", "rgb(250, 250, 250)"),
            ("rgb(19, 41, 75)", "rgb(75, 156, 211)"),
        );
        let kinds: Vec<_> = detect_flashes(&t).iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, vec!["white-text-flash"]);
    }

    #[test]
    fn test_sample_delays() {
        assert_eq!(sample_delays(), vec![20, 30, 50, 50, 50, 100]);
    }

    #[test]
    fn test_color_hover_markers() {
        assert!(has_color_hover("px-4 transition-colors hover:bg-black"));
        assert!(has_color_hover("card-invert"));
        assert!(!has_color_hover("transition-transform hover:scale-105"));
    }

    #[test]
    fn test_issue_serializes_with_type_tag() {
        let issue = FlashIssue::WhiteBgFlash {
            phase: Phase::After(20).to_string(),
            description: "x".into(),
            initial: "a".into(),
            during: "b".into(),
            settled: "c".into(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "white-bg-flash");
        assert_eq!(json["phase"], "20ms");
        assert_eq!(json["final"], "c");
    }
}
