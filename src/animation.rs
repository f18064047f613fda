// Per-frame update: closed-form drift and chromatic aberration, written as inline styles.
// Offsets are bounded sinusoids, so elements always swing back toward their origin.

use tracing::trace;

use crate::host::PageElement;
use crate::params::{MotionParams, TextEffectParams};
use crate::record::ElementRecord;
use crate::types::StyleProperty;

/// Cyan / magenta channel colors for the aberration glows.
const CYAN_GLOW: &str = "rgba(0,255,255,0.6)";
const MAGENTA_GLOW: &str = "rgba(255,0,200,0.6)";

/// Translation (px) and rotation (degrees) for one element at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftOffset {
    pub dx: f64,
    pub dy: f64,
    pub dr: f64,
}

impl DriftOffset {
    pub fn at(motion: &MotionParams, elapsed_secs: f64) -> Self {
        DriftOffset {
            dx: motion.x.sin_at(elapsed_secs),
            dy: motion.y.cos_at(elapsed_secs),
            dr: motion.rotation.sin_at(elapsed_secs),
        }
    }

    /// Translate first, then rotate.
    pub fn to_css(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) rotate({:.3}deg)",
            self.dx, self.dy, self.dr
        )
    }
}

/// Offset of the cyan glow; the magenta glow sits at the mirrored offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AberrationOffset {
    pub ox: f64,
    pub oy: f64,
}

impl AberrationOffset {
    pub fn at(effect: &TextEffectParams, elapsed_secs: f64) -> Self {
        AberrationOffset {
            ox: effect.x().sin_at(elapsed_secs),
            oy: effect.y().cos_at(elapsed_secs),
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "{:.2}px {:.2}px 0 {}, {:.2}px {:.2}px 0 {}",
            self.ox, self.oy, CYAN_GLOW, -self.ox, -self.oy, MAGENTA_GLOW
        )
    }
}

/// Write one frame for every record. Text shadow is only touched on records with the text effect.
pub fn apply_frame<E: PageElement>(records: &[ElementRecord<E>], elapsed_secs: f64) {
    for record in records {
        let drift = DriftOffset::at(&record.motion, elapsed_secs);
        write(&record.target, StyleProperty::Transform, &drift.to_css());

        if record.has_text_effect {
            let aberration = AberrationOffset::at(&record.text_effect, elapsed_secs);
            write(&record.target, StyleProperty::TextShadow, &aberration.to_css());
        }
    }
}

fn write<E: PageElement>(target: &E, property: StyleProperty, value: &str) {
    if let Err(err) = target.set_inline_style(property, value) {
        trace!(%err, property = property.css_name(), "frame write dropped");
    }
}
