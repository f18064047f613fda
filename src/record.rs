// Working-set entries: the element handle, its saved inline presentation, and its drawn parameters.

use rand::Rng;

use crate::host::PageElement;
use crate::params::{MotionParams, TextEffectParams};
use crate::types::StyleProperty;

/// Inline values captured before the engine writes anything. Empty string means unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedPresentation {
    pub transform: String,
    pub text_shadow: String,
    pub transition: String,
    pub will_change: String,
}

impl SavedPresentation {
    pub fn capture<E: PageElement>(element: &E) -> Self {
        SavedPresentation {
            transform: element.inline_style(StyleProperty::Transform),
            text_shadow: element.inline_style(StyleProperty::TextShadow),
            transition: element.inline_style(StyleProperty::Transition),
            will_change: element.inline_style(StyleProperty::WillChange),
        }
    }
}

/// One animated element. Owned by the running engine, dropped on restoration.
#[derive(Debug, Clone)]
pub struct ElementRecord<E> {
    pub target: E,
    pub saved: SavedPresentation,
    pub motion: MotionParams,
    pub text_effect: TextEffectParams,
    pub has_text_effect: bool,
}

impl<E: PageElement> ElementRecord<E> {
    /// Snapshot `target` and draw fresh parameters. Must run before any write to `target`.
    pub fn new<R: Rng + ?Sized>(target: E, has_text_effect: bool, rng: &mut R) -> Self {
        let saved = SavedPresentation::capture(&target);
        ElementRecord {
            target,
            saved,
            motion: MotionParams::random(rng),
            text_effect: TextEffectParams::random(rng),
            has_text_effect,
        }
    }
}
