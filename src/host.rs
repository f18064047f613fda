// Host seam: the page element tree, the frame scheduler, and deferred timers.
// The engine never allocates or frees page elements. It only reads and writes
// the inline style properties listed in `StyleProperty`.

use std::time::Duration;

use crate::error::EngineError;
use crate::restore::{CleanupRejected, DeferredCleanup};
use crate::types::*;

/// Non-owning handle to a page element.
pub trait PageElement: Clone + 'static {
    /// Attribute value, `None` when absent.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Rendered bounding box.
    fn bounding_rect(&self) -> Rect;

    fn computed_visibility(&self) -> ComputedVisibility;

    /// Contents of the element's direct child text nodes. Descendant elements are not included.
    fn direct_text(&self) -> Vec<String>;

    /// Inline (not computed) value, empty when unset.
    fn inline_style(&self, property: StyleProperty) -> String;

    /// Write an inline value. Writing an empty string removes the property.
    fn set_inline_style(&self, property: StyleProperty, value: &str) -> Result<(), EngineError>;
}

/// The environment an engine runs in.
pub trait PageHost {
    type Element: PageElement;

    /// Elements matching a CSS selector list, each at most once, in document order.
    fn query_candidates(&self, selector: &str) -> Vec<Self::Element>;

    fn viewport(&self) -> Viewport;

    /// Ask for exactly one call to the engine's `on_frame` on the next rendered frame.
    fn request_frame(&mut self) -> Result<FrameHandle, EngineError>;

    /// Drop a pending frame request. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Run `cleanup` once after `delay`. On failure the cleanup is handed back unrun.
    fn schedule_cleanup(
        &mut self,
        delay: Duration,
        cleanup: DeferredCleanup<Self::Element>,
    ) -> Result<CleanupHandle, CleanupRejected<Self::Element>>;

    /// Disarm a cleanup timer. Returns the cleanup if it has not run yet.
    fn cancel_cleanup(&mut self, handle: CleanupHandle) -> Option<DeferredCleanup<Self::Element>>;
}
