// Browser host: web-sys implementation of the page seam.
// requestAnimationFrame drives the loop; setTimeout runs the transition cleanup.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Node, Window};

use crate::error::EngineError;
use crate::host::{PageElement, PageHost};
use crate::restore::{CleanupRejected, DeferredCleanup};
use crate::types::*;

/// The frame closure is installed after the engine exists, since it needs a handle to it.
pub type FrameCallbackSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Emptied by whichever comes first: the timer firing or a cancel.
type PendingCleanup = Rc<RefCell<Option<DeferredCleanup<DomElement>>>>;

fn js_error(err: JsValue) -> EngineError {
    EngineError::Host(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// An element of the live document.
#[derive(Debug, Clone)]
pub struct DomElement {
    element: HtmlElement,
    window: Window,
}

impl DomElement {
    pub fn new(element: HtmlElement, window: Window) -> Self {
        DomElement { element, window }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl PageElement for DomElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.element.get_bounding_client_rect();
        Rect::new(r.x(), r.y(), r.width(), r.height())
    }

    fn computed_visibility(&self) -> ComputedVisibility {
        let style = match self.window.get_computed_style(&self.element) {
            Ok(Some(style)) => style,
            _ => return ComputedVisibility::default(),
        };
        let read = |name: &str| style.get_property_value(name).unwrap_or_default();
        ComputedVisibility {
            visibility: read("visibility"),
            display: read("display"),
            opacity: read("opacity"),
        }
    }

    fn direct_text(&self) -> Vec<String> {
        let children = self.element.child_nodes();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|node| node.node_type() == Node::TEXT_NODE)
            .filter_map(|node| node.text_content())
            .collect()
    }

    fn inline_style(&self, property: StyleProperty) -> String {
        self.element
            .style()
            .get_property_value(property.css_name())
            .unwrap_or_default()
    }

    fn set_inline_style(&self, property: StyleProperty, value: &str) -> Result<(), EngineError> {
        let style = self.element.style();
        if value.is_empty() {
            style
                .remove_property(property.css_name())
                .map(|_| ())
                .map_err(js_error)
        } else {
            style
                .set_property(property.css_name(), value)
                .map_err(js_error)
        }
    }
}

/// The page the content script runs in.
pub struct DomHost {
    window: Window,
    frame_callback: FrameCallbackSlot,
    cleanups: HashMap<i32, PendingCleanup>,
}

impl DomHost {
    pub fn new(frame_callback: FrameCallbackSlot) -> Result<Self, EngineError> {
        let window =
            web_sys::window().ok_or_else(|| EngineError::Host("no window".to_string()))?;
        Ok(DomHost {
            window,
            frame_callback,
            cleanups: HashMap::new(),
        })
    }
}

impl PageHost for DomHost {
    type Element = DomElement;

    fn query_candidates(&self, selector: &str) -> Vec<DomElement> {
        let Some(document) = self.window.document() else {
            return Vec::new();
        };
        let Ok(list) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(|element| DomElement::new(element, self.window.clone()))
            .collect()
    }

    fn viewport(&self) -> Viewport {
        let read = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or_default()
        };
        Viewport::new(read(self.window.inner_width()), read(self.window.inner_height()))
    }

    fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
        let slot = self.frame_callback.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| EngineError::Host("frame callback not installed".to_string()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle::new)
            .map_err(js_error)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.as_i32());
    }

    fn schedule_cleanup(
        &mut self,
        delay: Duration,
        cleanup: DeferredCleanup<DomElement>,
    ) -> Result<CleanupHandle, CleanupRejected<DomElement>> {
        // setTimeout needs a JS function; keep the cleanup on the Rust side
        // so it can be handed back if the timer cannot be armed or is cancelled.
        let pending: PendingCleanup = Rc::new(RefCell::new(Some(cleanup)));
        let task = {
            let pending = Rc::clone(&pending);
            Closure::once_into_js(move || {
                let cleanup = pending.borrow_mut().take();
                if let Some(cleanup) = cleanup {
                    cleanup.run();
                }
            })
        };
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        // Fired timers leave empty entries behind.
        self.cleanups.retain(|_, entry| entry.borrow().is_some());

        let armed = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                task.unchecked_ref::<js_sys::Function>(),
                delay_ms,
            );
        match armed {
            Ok(id) => {
                self.cleanups.insert(id, pending);
                Ok(CleanupHandle::new(id))
            }
            Err(err) => {
                let cleanup = pending.borrow_mut().take().unwrap_or_default();
                Err(CleanupRejected {
                    error: js_error(err),
                    cleanup,
                })
            }
        }
    }

    fn cancel_cleanup(&mut self, handle: CleanupHandle) -> Option<DeferredCleanup<DomElement>> {
        let pending = self.cleanups.remove(&handle.as_i32())?;
        self.window.clear_timeout_with_handle(handle.as_i32());
        let cleanup = pending.borrow_mut().take();
        cleanup
    }
}
