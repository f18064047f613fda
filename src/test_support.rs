// In-memory page host for native tests. Frames and deferred cleanups are
// queued, and tests fire them explicitly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::error::EngineError;
use crate::host::{PageElement, PageHost};
use crate::restore::{CleanupRejected, DeferredCleanup};
use crate::types::*;

#[derive(Debug)]
struct FakeNode {
    tag: String,
    attributes: HashMap<String, String>,
    rect: Rect,
    computed: ComputedVisibility,
    text: Vec<String>,
    style: HashMap<StyleProperty, String>,
    detached: bool,
    writes: usize,
}

/// Shared handle, so clones observe the same node like DOM references do.
#[derive(Debug, Clone)]
pub struct FakeElement(Rc<RefCell<FakeNode>>);

impl FakeElement {
    pub fn new(tag: &str, width: f64, height: f64) -> Self {
        FakeElement(Rc::new(RefCell::new(FakeNode {
            tag: tag.to_string(),
            attributes: HashMap::new(),
            rect: Rect::new(0.0, 0.0, width, height),
            computed: ComputedVisibility::default(),
            text: Vec::new(),
            style: HashMap::new(),
            detached: false,
            writes: 0,
        })))
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text.push(text.to_string());
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_style(self, property: StyleProperty, value: &str) -> Self {
        self.0
            .borrow_mut()
            .style
            .insert(property, value.to_string());
        self
    }

    pub fn with_computed(self, visibility: &str, display: &str, opacity: &str) -> Self {
        self.0.borrow_mut().computed = ComputedVisibility {
            visibility: visibility.to_string(),
            display: display.to_string(),
            opacity: opacity.to_string(),
        };
        self
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn detach(&self) {
        self.0.borrow_mut().detached = true;
    }

    pub fn writes(&self) -> usize {
        self.0.borrow().writes
    }

    pub fn style(&self, property: StyleProperty) -> String {
        self.inline_style(property)
    }

    pub fn snapshot(&self) -> Vec<String> {
        StyleProperty::ALL
            .iter()
            .map(|p| self.inline_style(*p))
            .collect()
    }

    pub fn same_node(&self, other: &FakeElement) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PageElement for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn bounding_rect(&self) -> Rect {
        self.0.borrow().rect
    }

    fn computed_visibility(&self) -> ComputedVisibility {
        self.0.borrow().computed.clone()
    }

    fn direct_text(&self) -> Vec<String> {
        self.0.borrow().text.clone()
    }

    fn inline_style(&self, property: StyleProperty) -> String {
        self.0
            .borrow()
            .style
            .get(&property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_inline_style(&self, property: StyleProperty, value: &str) -> Result<(), EngineError> {
        let mut node = self.0.borrow_mut();
        if node.detached {
            return Err(EngineError::Host("element detached".to_string()));
        }
        node.writes += 1;
        if value.is_empty() {
            node.style.remove(&property);
        } else {
            node.style.insert(property, value.to_string());
        }
        Ok(())
    }
}

pub struct FakePage {
    pub elements: Vec<FakeElement>,
    pub viewport: Viewport,
    pub pending_frame: Option<FrameHandle>,
    pub frame_requests: usize,
    pub cancelled: Vec<FrameHandle>,
    pub cleanups: Vec<(CleanupHandle, Duration, DeferredCleanup<FakeElement>)>,
    pub refuse_timers: bool,
    next_frame_id: i32,
    next_timer_id: i32,
}

impl FakePage {
    pub fn new(elements: Vec<FakeElement>) -> Self {
        FakePage {
            elements,
            viewport: Viewport::new(1280.0, 800.0),
            pending_frame: None,
            frame_requests: 0,
            cancelled: Vec::new(),
            cleanups: Vec::new(),
            refuse_timers: false,
            next_frame_id: 1,
            next_timer_id: 1,
        }
    }

    /// Fire every queued cleanup, as if the timers elapsed.
    pub fn run_cleanups(&mut self) {
        for (_, _, cleanup) in self.cleanups.drain(..) {
            cleanup.run();
        }
    }
}

impl PageHost for FakePage {
    type Element = FakeElement;

    fn query_candidates(&self, selector: &str) -> Vec<FakeElement> {
        let tags: Vec<&str> = selector.split(',').map(str::trim).collect();
        self.elements
            .iter()
            .filter(|el| tags.contains(&el.tag().as_str()))
            .cloned()
            .collect()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
        let handle = FrameHandle::new(self.next_frame_id);
        self.next_frame_id += 1;
        self.frame_requests += 1;
        self.pending_frame = Some(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
        self.cancelled.push(handle);
    }

    fn schedule_cleanup(
        &mut self,
        delay: Duration,
        cleanup: DeferredCleanup<FakeElement>,
    ) -> Result<CleanupHandle, CleanupRejected<FakeElement>> {
        if self.refuse_timers {
            return Err(CleanupRejected {
                error: EngineError::Host("setTimeout unavailable".to_string()),
                cleanup,
            });
        }
        let handle = CleanupHandle::new(self.next_timer_id);
        self.next_timer_id += 1;
        self.cleanups.push((handle, delay, cleanup));
        Ok(handle)
    }

    fn cancel_cleanup(&mut self, handle: CleanupHandle) -> Option<DeferredCleanup<FakeElement>> {
        let index = self.cleanups.iter().position(|(h, _, _)| *h == handle)?;
        Some(self.cleanups.remove(index).2)
    }
}
