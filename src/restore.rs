// Restoration: smooth snap-back to the saved inline presentation, then a
// deferred pass that removes the temporary transition again.
// See DESIGN.md: restore

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::EngineError;
use crate::host::{PageElement, PageHost};
use crate::record::ElementRecord;
use crate::types::{CleanupHandle, StyleProperty};

/// Transition installed for the snap-back. Transform is the longest at 0.6s.
pub const RESTORE_TRANSITION: &str =
    "transform 0.6s cubic-bezier(0.25, 0.46, 0.45, 0.94), text-shadow 0.4s ease";

/// Puts back each element's original `transition` once the snap-back is over.
/// Holds its own copies, independent of the engine's working set.
#[derive(Debug)]
pub struct DeferredCleanup<E> {
    entries: Vec<(E, String)>,
}

impl<E: PageElement> DeferredCleanup<E> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn run(self) {
        for (target, transition) in self.entries {
            if let Err(err) = target.set_inline_style(StyleProperty::Transition, &transition) {
                debug!(%err, "cleanup write dropped");
            }
        }
    }
}

impl<E> Default for DeferredCleanup<E> {
    fn default() -> Self {
        DeferredCleanup {
            entries: Vec::new(),
        }
    }
}

/// A host that cannot arm a timer hands the cleanup back.
#[derive(Debug)]
pub struct CleanupRejected<E> {
    pub error: EngineError,
    pub cleanup: DeferredCleanup<E>,
}

/// Undo every engine write on `records`. A no-op on an empty set.
/// Returns the armed cleanup timer, if any.
pub fn restore<H: PageHost>(
    host: &mut H,
    records: Vec<ElementRecord<H::Element>>,
    delay: Duration,
) -> Option<CleanupHandle> {
    if records.is_empty() {
        return None;
    }

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let saved = &record.saved;
        for (property, value) in [
            (StyleProperty::Transition, RESTORE_TRANSITION),
            (StyleProperty::Transform, saved.transform.as_str()),
            (StyleProperty::TextShadow, saved.text_shadow.as_str()),
            (StyleProperty::WillChange, saved.will_change.as_str()),
        ] {
            if let Err(err) = record.target.set_inline_style(property, value) {
                debug!(%err, property = property.css_name(), "restore write dropped");
            }
        }
        entries.push((record.target, record.saved.transition));
    }

    match host.schedule_cleanup(delay, DeferredCleanup { entries }) {
        Ok(handle) => Some(handle),
        Err(rejected) => {
            // Snap without the transition rather than leave it on the page.
            warn!(err = %rejected.error, elements = rejected.cleanup.len(), "cleanup timer unavailable, restoring transitions now");
            rejected.cleanup.run();
            None
        }
    }
}
