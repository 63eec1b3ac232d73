//! Scene and router configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all) is enough.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::MouseButton;
use crate::primitives::Rect;

/// Configuration for the event router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Window after a click during which a second click on the same target
    /// becomes a double click.
    pub double_click_time_ms: u64,

    /// Button that stages and commits keyboard focus.
    pub primary_button: MouseButton,

    /// Pixel height of one scroll line, for `ScrollDelta::Lines`.
    pub scroll_line_height: f32,
}

impl RouterConfig {
    pub fn double_click_time(&self) -> Duration {
        Duration::from_millis(self.double_click_time_ms)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            double_click_time_ms: 500,
            primary_button: MouseButton::Left,
            scroll_line_height: 18.0,
        }
    }
}

/// Configuration for a [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Initial viewport handed to the root on every frame.
    pub viewport: Rect,

    /// Whether the root clips its children to the viewport.
    pub clip_root: bool,

    pub router: RouterConfig,
}

impl SceneConfig {
    /// Load a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.viewport;
        if [v.x, v.y, v.width, v.height].iter().any(|c| !c.is_finite()) || v.width < 0.0 || v.height < 0.0 {
            return Err(ConfigError::Invalid(format!("viewport {v:?} is not a finite, non-negative rectangle")));
        }
        if !(self.router.scroll_line_height.is_finite() && self.router.scroll_line_height > 0.0) {
            return Err(ConfigError::Invalid("scroll_line_height must be positive".into()));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Rect::new(0.0, 0.0, 1200.0, 800.0),
            clip_root: true,
            router: RouterConfig::default(),
        }
    }
}
