// Element discovery: closed tag allow-list, then opt-out, visibility, and page-wrapper filters.
// See DESIGN.md: discovery

use rand::Rng;
use tracing::{debug, trace};

use crate::host::{PageElement, PageHost};
use crate::record::ElementRecord;
use crate::types::*;

/// Tags eligible for animation. Closed list, never derived from the page.
pub const TARGET_TAGS: &[&str] = &[
    "div", "section", "article", "aside", "header", "footer", "main", "nav",
    "p", "h1", "h2", "h3", "h4", "h5", "h6",
    "span", "a", "button", "label", "li", "ul", "ol",
    "img", "figure", "video", "input", "textarea", "select",
    "table", "tr", "td", "th",
    "form", "blockquote", "pre", "code",
];

/// Page wrappers wider than this share of the viewport (and taller than
/// `WRAPPER_HEIGHT_RATIO`) are left alone; drifting them causes scrollbars.
pub const WRAPPER_WIDTH_RATIO: f64 = 0.96;
pub const WRAPPER_HEIGHT_RATIO: f64 = 0.8;

pub fn target_selector() -> String {
    TARGET_TAGS.join(", ")
}

/// Reserved self-exclusion marker. Nothing sets it today.
pub fn is_opted_out<E: PageElement>(element: &E, skip_attribute: &str) -> bool {
    element
        .attribute(skip_attribute)
        .is_some_and(|value| !value.is_empty())
}

pub fn is_visible<E: PageElement>(element: &E) -> bool {
    if element.bounding_rect().is_empty() {
        return false;
    }
    element.computed_visibility().is_rendered()
}

pub fn is_page_wrapper(rect: &Rect, viewport: &Viewport) -> bool {
    rect.width > viewport.width * WRAPPER_WIDTH_RATIO
        && rect.height > viewport.height * WRAPPER_HEIGHT_RATIO
}

/// True when a direct child text node holds something other than whitespace.
pub fn has_direct_text<E: PageElement>(element: &E) -> bool {
    element
        .direct_text()
        .iter()
        .any(|text| !text.trim().is_empty())
}

/// Build a fresh working set from the page as it is now.
pub fn discover<H, R>(host: &H, config: &EngineConfig, rng: &mut R) -> Vec<ElementRecord<H::Element>>
where
    H: PageHost,
    R: Rng + ?Sized,
{
    let viewport = host.viewport();
    let candidates = host.query_candidates(&target_selector());
    let total = candidates.len();

    let records: Vec<_> = candidates
        .into_iter()
        .filter(|el| !is_opted_out(el, &config.skip_attribute))
        .filter(|el| is_visible(el))
        .filter(|el| {
            let wrapper = is_page_wrapper(&el.bounding_rect(), &viewport);
            if wrapper {
                trace!("skipping page-level wrapper");
            }
            !wrapper
        })
        .map(|el| {
            let has_text = has_direct_text(&el);
            ElementRecord::new(el, has_text, rng)
        })
        .collect();

    debug!(candidates = total, selected = records.len(), "discovery finished");
    records
}

/// Hint the compositor and switch off CSS transitions that would fight the frame loop.
pub fn prepare<E: PageElement>(records: &[ElementRecord<E>]) {
    for record in records {
        for (property, value) in [
            (StyleProperty::WillChange, "transform"),
            (StyleProperty::Transition, "none"),
        ] {
            if let Err(err) = record.target.set_inline_style(property, value) {
                debug!(%err, property = property.css_name(), "prepare write dropped");
            }
        }
    }
}
