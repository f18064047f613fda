// Strong typing over strings. Newtypes for frame timestamps, frame handles, and style properties.
// See DESIGN.md: types

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::EngineError;

/// Frame callback timestamp in milliseconds (`DOMHighResTimeStamp`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct FrameTime(f64);

impl FrameTime {
    pub fn from_millis(ms: f64) -> Self {
        FrameTime(ms)
    }

    pub fn as_millis(&self) -> f64 {
        self.0
    }

    /// Seconds elapsed since `origin`. Never negative, even if the host
    /// reports a timestamp older than the origin.
    pub fn secs_since(&self, origin: FrameTime) -> f64 {
        ((self.0 - origin.0) / 1000.0).max(0.0)
    }
}

/// Opaque id of a pending animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(i32);

impl FrameHandle {
    pub fn new(id: i32) -> Self {
        FrameHandle(id)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

/// Opaque id of an armed cleanup timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CleanupHandle(i32);

impl CleanupHandle {
    pub fn new(id: i32) -> Self {
        CleanupHandle(id)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

/// Rendered bounding box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Layout viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

/// The computed-style values that decide whether an element is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedVisibility {
    pub visibility: String,
    pub display: String,
    pub opacity: String,
}

impl ComputedVisibility {
    pub fn is_rendered(&self) -> bool {
        self.visibility != "hidden" && self.display != "none" && self.opacity != "0"
    }
}

impl Default for ComputedVisibility {
    fn default() -> Self {
        ComputedVisibility {
            visibility: "visible".to_string(),
            display: "block".to_string(),
            opacity: "1".to_string(),
        }
    }
}

/// Inline style properties the engine reads and writes. Nothing else is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Transform,
    TextShadow,
    Transition,
    WillChange,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 4] = [
        StyleProperty::Transform,
        StyleProperty::TextShadow,
        StyleProperty::Transition,
        StyleProperty::WillChange,
    ];

    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::Transform => "transform",
            StyleProperty::TextShadow => "text-shadow",
            StyleProperty::Transition => "transition",
            StyleProperty::WillChange => "will-change",
        }
    }
}

/// Public view of the engine state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    Idle,
    Running,
}

/// Longest transition installed during restoration (transform, 0.6s).
pub const LONGEST_RESTORE_TRANSITION_MS: u32 = 600;

/// Engine configuration passed from JS. Effect parameters are fixed, not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Elements carrying this attribute with a non-empty value are never animated.
    #[serde(default = "default_skip_attribute")]
    pub skip_attribute: String,
    /// Delay before the restore transition is removed again (milliseconds).
    #[serde(default = "default_cleanup_delay_ms")]
    pub cleanup_delay_ms: u32,
    /// `tracing` level filter: off, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_skip_attribute() -> String {
    "data-hallucinate-skip".to_string()
}

fn default_cleanup_delay_ms() -> u32 {
    700
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            skip_attribute: default_skip_attribute(),
            cleanup_delay_ms: default_cleanup_delay_ms(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config = if json.trim().is_empty() {
            EngineConfig::default()
        } else {
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.cleanup_delay_ms <= LONGEST_RESTORE_TRANSITION_MS {
            return Err(EngineError::InvalidConfig(format!(
                "cleanup_delay_ms must exceed {}ms, got {}ms",
                LONGEST_RESTORE_TRANSITION_MS, self.cleanup_delay_ms
            )));
        }
        if self.skip_attribute.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "skip_attribute must not be empty".to_string(),
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.cleanup_delay_ms))
    }

    pub fn level_filter(&self) -> Result<LevelFilter, EngineError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|e| EngineError::InvalidConfig(format!("log_level: {}", e)))
    }
}
