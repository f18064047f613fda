// hallucinate_core: Hallucinate Rust/WASM page-effects engine
// All of the effect lives here; the extension's JS only relays START/STOP messages.

mod animation;
mod command;
mod discovery;
mod dom;
mod engine;
mod error;
mod host;
pub mod logging;
mod params;
mod record;
mod restore;
mod types;

#[cfg(test)]
mod test_support;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub use animation::{apply_frame, AberrationOffset, DriftOffset};
pub use command::Command;
pub use discovery::{
    discover, has_direct_text, is_page_wrapper, is_visible, prepare, target_selector, TARGET_TAGS,
};
pub use dom::{DomElement, DomHost, FrameCallbackSlot};
pub use engine::{ActiveRun, Engine, EngineState};
pub use error::EngineError;
pub use host::{PageElement, PageHost};
pub use params::{MotionParams, Oscillator, TextEffectParams};
pub use record::{ElementRecord, SavedPresentation};
pub use restore::{restore, CleanupRejected, DeferredCleanup, RESTORE_TRANSITION};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

type SharedEngine = Rc<RefCell<Engine<DomHost>>>;

thread_local! {
    /// The engine of this page context. The content script may be injected
    /// more than once; every injection must reach the same engine.
    static INSTANCE: RefCell<Option<SharedEngine>> = const { RefCell::new(None) };
}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn build_engine(config: EngineConfig) -> Result<SharedEngine, EngineError> {
    let slot: FrameCallbackSlot = Rc::new(RefCell::new(None));
    let host = DomHost::new(Rc::clone(&slot))?;
    let engine = Rc::new(RefCell::new(Engine::new(host, config)));

    let weak = Rc::downgrade(&engine);
    let callback = Closure::wrap(Box::new(move |timestamp: f64| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        // A command handler holding the engine means this frame is stale.
        let Ok(mut engine) = shared.try_borrow_mut() else {
            return;
        };
        engine.on_frame(FrameTime::from_millis(timestamp));
    }) as Box<dyn FnMut(f64)>);
    *slot.borrow_mut() = Some(callback);

    Ok(engine)
}

/// Main engine interface exposed to the content script.
#[wasm_bindgen]
pub struct HallucinationEngine {
    inner: SharedEngine,
}

#[wasm_bindgen]
impl HallucinationEngine {
    /// A standalone engine. Content scripts should prefer `install`.
    /// Freeing a running standalone engine restores the page.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<HallucinationEngine, JsValue> {
        let config = EngineConfig::from_json(config_json).map_err(to_js)?;
        logging::init(config.level_filter().map_err(to_js)?);
        let inner = build_engine(config).map_err(to_js)?;
        Ok(HallucinationEngine { inner })
    }

    /// Start animating the page. Ignored while running.
    pub fn begin(&self) -> bool {
        self.inner.borrow_mut().begin()
    }

    /// Stop and restore the page. Ignored while idle.
    pub fn end(&self) -> bool {
        self.inner.borrow_mut().end()
    }

    /// Handle a relay message: `{"action":"START"}` or `{"action":"STOP"}`.
    pub fn handle_message(&self, message_json: &str) -> Result<bool, JsValue> {
        let command = Command::from_message_json(message_json).map_err(to_js)?;
        Ok(self.inner.borrow_mut().dispatch(command))
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().is_running()
    }

    pub fn element_count(&self) -> usize {
        self.inner.borrow().working_set().len()
    }
}

/// Get the page's engine, creating it on first call. Re-injection returns a
/// handle to the existing engine; its config is validated but not applied.
#[wasm_bindgen]
pub fn install(config_json: &str) -> Result<HallucinationEngine, JsValue> {
    let config = EngineConfig::from_json(config_json).map_err(to_js)?;

    if let Some(inner) = INSTANCE.with(|slot| slot.borrow().clone()) {
        tracing::debug!("engine already installed in this page");
        return Ok(HallucinationEngine { inner });
    }

    logging::init(config.level_filter().map_err(to_js)?);
    let inner = build_engine(config).map_err(to_js)?;
    INSTANCE.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&inner)));
    Ok(HallucinationEngine { inner })
}
