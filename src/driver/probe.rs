//! In-page probing scripts and typed wrappers around them
//!
//! Elements are never held as browser handles. [`tag_matches`] stamps every
//! match of a selector with a `data-urc-qa-probe` index and later calls
//! address the element by that index, so any [`QaPage`] that can evaluate a
//! script can be probed.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::traits::{BoundingBox, QaPage};
use crate::analysis::color::effective_background;
use crate::analysis::hover::StyleSnapshot;
use crate::analysis::layout::LayoutSnapshot;
use crate::error::QaError;

pub const TAG_SCRIPT: &str = r#"({ selector, limit }) => {
    document.querySelectorAll('[data-urc-qa-probe]')
        .forEach(el => el.removeAttribute('data-urc-qa-probe'));
    const all = Array.from(document.querySelectorAll(selector));
    const tagged = limit === null ? all : all.slice(0, limit);
    tagged.forEach((el, i) => el.setAttribute('data-urc-qa-probe', String(i)));
    return { total: all.length, tagged: tagged.length };
}"#;

pub const BOX_SCRIPT: &str = r#"(index) => {
    const el = document.querySelector(`[data-urc-qa-probe="${index}"]`);
    if (!el) return null;
    const r = el.getBoundingClientRect();
    return { x: r.x, y: r.y, width: r.width, height: r.height };
}"#;

pub const INFO_SCRIPT: &str = r#"(index) => {
    const el = document.querySelector(`[data-urc-qa-probe="${index}"]`);
    if (!el) return null;
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    return {
        className: el.getAttribute('class') || '',
        width: rect.width,
        height: rect.height,
        display: style.display,
        visibility: style.visibility,
        opacity: parseFloat(style.opacity),
    };
}"#;

pub const COLORS_SCRIPT: &str = r#"(index) => {
    const el = document.querySelector(`[data-urc-qa-probe="${index}"]`);
    if (!el) return null;
    const chain = [];
    for (let cur = el; cur && cur !== document.body; cur = cur.parentElement) {
        chain.push(window.getComputedStyle(cur).backgroundColor);
    }
    const style = window.getComputedStyle(el);
    const textEl = el.querySelector('span, p') || el;
    return {
        chain,
        bodyBg: window.getComputedStyle(document.body).backgroundColor,
        color: window.getComputedStyle(textEl).color,
        ownBg: style.backgroundColor,
        borderColor: style.borderColor,
    };
}"#;

pub const STYLES_SCRIPT: &str = r#"(index) => {
    const el = document.querySelector(`[data-urc-qa-probe="${index}"]`);
    if (!el) return null;
    const style = window.getComputedStyle(el);
    return {
        backgroundColor: style.backgroundColor,
        color: style.color,
        borderColor: style.borderColor,
        opacity: style.opacity,
        transform: style.transform,
        transition: style.transition,
    };
}"#;

pub const SCROLL_SCRIPT: &str = "(y) => { window.scrollTo(0, y); return window.scrollY; }";

pub const SCROLL_HEIGHT_SCRIPT: &str = "() => document.body.scrollHeight";

pub const LAYOUT_SCRIPT: &str = r#"() => {
    const textOf = (el) => (el.innerText || '').trim();
    const rectOf = (el) => {
        const r = el.getBoundingClientRect();
        return { top: r.top, left: r.left, right: r.right, width: r.width, height: r.height };
    };
    const boxes = [];
    document.querySelectorAll('*').forEach((el) => {
        const text = textOf(el);
        if (!text) return;
        const style = window.getComputedStyle(el);
        boxes.push({
            tag: el.tagName,
            id: el.id || '',
            className: typeof el.className === 'string' ? el.className : '',
            text: text.substring(0, 100),
            scrollWidth: el.scrollWidth,
            clientWidth: el.clientWidth,
            scrollHeight: el.scrollHeight,
            clientHeight: el.clientHeight,
            overflow: style.overflow,
            overflowX: style.overflowX,
            textOverflow: style.textOverflow,
            rect: rectOf(el),
        });
    });
    const texts = [];
    document.querySelectorAll('h1, h2, h3, h4, h5, h6, p, span, a, button, li, label')
        .forEach((el) => {
            const text = textOf(el);
            if (!text) return;
            texts.push({
                tag: el.tagName.toLowerCase(),
                className: typeof el.className === 'string' ? el.className : '',
                text: text.substring(0, 50),
                fontSize: parseFloat(window.getComputedStyle(el).fontSize) || 0,
                rect: rectOf(el),
            });
        });
    return { viewportWidth: window.innerWidth, boxes, texts };
}"#;

/// Result of [`tag_matches`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ProbeCount {
    /// Elements matching the selector
    pub total: usize,
    /// Elements stamped with an index, `0..tagged`
    pub tagged: usize,
}

/// Layout and visibility facts used to filter flash candidates
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementInfo {
    pub class_name: String,
    pub width: f64,
    pub height: f64,
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
}

impl ElementInfo {
    /// Rendered, not hidden, and large enough to hover meaningfully
    pub fn is_visible(&self) -> bool {
        self.width > 20.0
            && self.height > 10.0
            && self.display != "none"
            && self.visibility != "hidden"
            && self.opacity > 0.0
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColors {
    chain: Vec<String>,
    body_bg: Option<String>,
    color: String,
    own_bg: Option<String>,
    border_color: Option<String>,
}

/// Colors sampled from one element
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSample {
    /// Nearest opaque ancestor background
    pub bg: String,
    pub color: String,
    pub own_bg: Option<String>,
    pub border_color: Option<String>,
}

fn decode<T: DeserializeOwned>(script: &'static str, value: Value) -> Result<T, QaError> {
    serde_json::from_value(value).map_err(|source| QaError::ScriptResult { script, source })
}

/// Decode a per-element result, mapping `null` to a detached element
fn decode_element<T: DeserializeOwned>(
    script: &'static str,
    index: usize,
    value: Value,
) -> Result<T, QaError> {
    if value.is_null() {
        return Err(QaError::Detached(index));
    }
    decode(script, value)
}

/// Stamp matches of `selector`, at most `limit` of them when given
pub async fn tag_matches<P: QaPage + ?Sized>(
    page: &P,
    selector: &str,
    limit: Option<usize>,
) -> Result<ProbeCount> {
    let value = page
        .evaluate(TAG_SCRIPT, json!({ "selector": selector, "limit": limit }))
        .await?;
    Ok(decode("tag", value)?)
}

pub async fn bounding_box<P: QaPage + ?Sized>(page: &P, index: usize) -> Result<Option<BoundingBox>> {
    let value = page.evaluate(BOX_SCRIPT, json!(index)).await?;
    Ok(decode("box", value)?)
}

pub async fn element_info<P: QaPage + ?Sized>(page: &P, index: usize) -> Result<ElementInfo> {
    let value = page.evaluate(INFO_SCRIPT, json!(index)).await?;
    Ok(decode_element("info", index, value)?)
}

/// Effective background and text color of a tagged element
pub async fn sample_colors<P: QaPage + ?Sized>(page: &P, index: usize) -> Result<ColorSample> {
    let value = page.evaluate(COLORS_SCRIPT, json!(index)).await?;
    let raw: RawColors = decode_element("colors", index, value)?;
    Ok(ColorSample {
        bg: effective_background(&raw.chain, raw.body_bg.as_deref()),
        color: raw.color,
        own_bg: raw.own_bg,
        border_color: raw.border_color,
    })
}

pub async fn computed_styles<P: QaPage + ?Sized>(page: &P, index: usize) -> Result<StyleSnapshot> {
    let value = page.evaluate(STYLES_SCRIPT, json!(index)).await?;
    Ok(decode_element("styles", index, value)?)
}

/// Scroll to `y` and return the offset the browser settled on, which is
/// clamped near the bottom of the document. Falls back to `y` when the page
/// reports nothing.
pub async fn scroll_to<P: QaPage + ?Sized>(page: &P, y: u32) -> Result<u32> {
    let value = page.evaluate(SCROLL_SCRIPT, json!(y)).await?;
    let actual: Option<f64> = decode("scroll", value)?;
    Ok(actual.map_or(y, |v| v.max(0.0).round() as u32))
}

pub async fn scroll_height<P: QaPage + ?Sized>(page: &P) -> Result<u32> {
    let value = page.evaluate(SCROLL_HEIGHT_SCRIPT, Value::Null).await?;
    Ok(decode("scrollHeight", value)?)
}

pub async fn layout_snapshot<P: QaPage + ?Sized>(page: &P) -> Result<LayoutSnapshot> {
    let value = page.evaluate(LAYOUT_SCRIPT, Value::Null).await?;
    Ok(decode("layout", value)?)
}
