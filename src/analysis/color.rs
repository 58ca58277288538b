//! CSS color parsing and comparison helpers
//!
//! Browsers report computed colors as `rgb(r, g, b)` or `rgba(r, g, b, a)`,
//! so a single regex covers everything `getComputedStyle` hands back.
//! Keywords such as `currentcolor` are treated as absent.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Channel value at or above which a color counts as white-ish
pub const WHITE_THRESHOLD: u8 = 240;

/// Minimum alpha for a background to count as opaque
pub const OPAQUE_ALPHA: f64 = 0.1;

/// Fallback when neither an ancestor nor the body has a background
pub const DEFAULT_BACKGROUND: &str = "rgb(255, 255, 255)";

const TRANSPARENT_RGBA: &str = "rgba(0, 0, 0, 0)";

fn rgba_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)(?:,\s*([\d.]+))?\)?").expect("valid regex")
    })
}

/// An opaque RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// An RGB triple with alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// All three channels meet `threshold`
    pub fn is_whiteish_at(&self, threshold: u8) -> bool {
        self.r >= threshold && self.g >= threshold && self.b >= threshold
    }

    pub fn is_whiteish(&self) -> bool {
        self.is_whiteish_at(WHITE_THRESHOLD)
    }

    /// Sum of absolute per-channel differences
    pub fn channel_diff(&self, other: &Rgb) -> u32 {
        let d = |a: u8, b: u8| (a as i32 - b as i32).unsigned_abs();
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Parse a CSS `rgb()`/`rgba()` string, ignoring alpha
pub fn parse_rgb(value: &str) -> Option<Rgb> {
    parse_rgba(value).map(|c| c.rgb)
}

/// Parse a CSS `rgb()`/`rgba()` string, alpha defaults to 1
pub fn parse_rgba(value: &str) -> Option<Rgba> {
    let caps = rgba_regex().captures(value)?;
    let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
    let rgb = Rgb::new(channel(1)?, channel(2)?, channel(3)?);
    let alpha = match caps.get(4) {
        Some(a) => a.as_str().parse::<f64>().ok()?,
        None => 1.0,
    };
    Some(Rgba { rgb, alpha })
}

/// White-ish check over an optional parse result; absent is never white
pub fn is_whiteish(color: Option<Rgb>) -> bool {
    color.map_or(false, |c| c.is_whiteish())
}

/// Computed value of a fully transparent color
pub fn is_transparent(value: &str) -> bool {
    value == TRANSPARENT_RGBA || value == "transparent"
}

/// Resolve the background a user actually sees behind an element.
///
/// `chain` holds the computed `background-color` of the element and each
/// ancestor in order, stopping before `<body>`. The first entry with
/// alpha above [`OPAQUE_ALPHA`] wins. Otherwise the body's background is
/// used as-is, and white when the body reports nothing.
pub fn effective_background<S: AsRef<str>>(chain: &[S], body_background: Option<&str>) -> String {
    for bg in chain {
        let bg = bg.as_ref();
        if bg.is_empty() || is_transparent(bg) {
            continue;
        }
        if let Some(rgba) = parse_rgba(bg) {
            if rgba.alpha > OPAQUE_ALPHA {
                return bg.to_string();
            }
        }
    }

    match body_background {
        Some(body) if !body.is_empty() => body.to_string(),
        _ => DEFAULT_BACKGROUND.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba_string() {
        assert_eq!(
            parse_rgb("rgba(75, 156, 211, 1)"),
            Some(Rgb::new(75, 156, 211))
        );
        assert_eq!(parse_rgb("rgb(19, 41, 75)"), Some(Rgb::new(19, 41, 75)));
    }

    #[test]
    fn test_unparseable_is_absent() {
        assert_eq!(parse_rgb("currentcolor"), None);
        assert_eq!(parse_rgb(""), None);
        assert_eq!(parse_rgb("rgb(300, 0, 0)"), None);
    }

    #[test]
    fn test_alpha() {
        let c = parse_rgba("rgba(0, 0, 0, 0.05)").unwrap();
        assert!((c.alpha - 0.05).abs() < f64::EPSILON);
        assert_eq!(parse_rgba("rgb(1, 2, 3)").unwrap().alpha, 1.0);
    }

    #[test]
    fn test_whiteish() {
        assert!(is_whiteish(parse_rgb("rgb(255, 255, 255)")));
        assert!(is_whiteish(parse_rgb("rgb(240, 241, 250)")));
        assert!(!is_whiteish(parse_rgb("rgb(239, 255, 255)")));
        assert!(!is_whiteish(None));
    }

    #[test]
    fn test_channel_diff() {
        let black = Rgb::new(0, 0, 0);
        assert_eq!(black.channel_diff(&Rgb::new(19, 41, 75)), 135);
        assert_eq!(Rgb::new(10, 10, 10).channel_diff(&black), 30);
    }

    #[test]
    fn test_effective_background_skips_transparent_target() {
        let chain = ["rgba(0, 0, 0, 0)", "rgb(19, 41, 75)", "rgb(255, 255, 255)"];
        assert_eq!(
            effective_background(&chain, Some("rgba(0, 0, 0, 0)")),
            "rgb(19, 41, 75)"
        );
    }

    #[test]
    fn test_effective_background_ignores_faint_alpha() {
        let chain = ["transparent", "rgba(75, 156, 211, 0.05)"];
        assert_eq!(
            effective_background(&chain, Some("rgb(250, 250, 250)")),
            "rgb(250, 250, 250)"
        );
    }

    #[test]
    fn test_effective_background_fallbacks() {
        let chain: [&str; 0] = [];
        assert_eq!(
            effective_background(&chain, Some("rgba(0, 0, 0, 0)")),
            "rgba(0, 0, 0, 0)"
        );
        assert_eq!(effective_background(&chain, Some("")), DEFAULT_BACKGROUND);
        assert_eq!(effective_background(&chain, None), DEFAULT_BACKGROUND);
    }
}
