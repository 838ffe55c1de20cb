use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorSettings;
use crate::geometry::EyeLayout;
use crate::timeline;
use crate::{Emotion, EmotionWeights, EyesError, Result};

/// One `{name, weight}` entry of the `emotions` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionWeight {
    pub name: String,
    pub weight: f32,
}

impl EmotionWeight {
    pub fn new(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Startup configuration of the eyes component. Never changes once the
/// component is initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyesConfig {
    /// Identifier of the display the eyes are drawn on.
    #[serde(default)]
    pub display_id: Option<String>,
    #[serde(default = "default_screen_width")]
    pub screen_width: u16,
    #[serde(default = "default_screen_height")]
    pub screen_height: u16,
    #[serde(default = "default_eye_size")]
    pub eye_size: u16,
    #[serde(default = "default_eye_distance")]
    pub eye_distance: u16,
    /// Milliseconds between ticks.
    #[serde(default = "default_update_interval")]
    pub update_interval: u32,
    #[serde(default = "enabled")]
    pub random_behavior: bool,
    #[serde(default = "enabled")]
    pub random_blink: bool,
    #[serde(default = "enabled")]
    pub random_look: bool,
    #[serde(default = "default_blink_interval")]
    pub blink_interval: u32,
    #[serde(default = "default_look_interval")]
    pub look_interval: u32,
    #[serde(default = "default_behavior_interval")]
    pub behavior_interval: u32,
    #[serde(default)]
    pub emotions: Vec<EmotionWeight>,
}

fn default_screen_width() -> u16 {
    128
}

fn default_screen_height() -> u16 {
    64
}

fn default_eye_size() -> u16 {
    20
}

fn default_eye_distance() -> u16 {
    4
}

fn default_update_interval() -> u32 {
    50
}

fn default_blink_interval() -> u32 {
    3000
}

fn default_look_interval() -> u32 {
    2000
}

fn default_behavior_interval() -> u32 {
    5000
}

fn enabled() -> bool {
    true
}

impl Default for EyesConfig {
    fn default() -> Self {
        Self {
            display_id: None,
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            eye_size: default_eye_size(),
            eye_distance: default_eye_distance(),
            update_interval: default_update_interval(),
            random_behavior: true,
            random_blink: true,
            random_look: true,
            blink_interval: default_blink_interval(),
            look_interval: default_look_interval(),
            behavior_interval: default_behavior_interval(),
            emotions: Vec::new(),
        }
    }
}

impl EyesConfig {
    /// Defaults bound to the given display.
    pub fn for_display(display_id: impl Into<String>) -> Self {
        Self {
            display_id: Some(display_id.into()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every field and returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        match self.display_id.as_deref() {
            Some(id) if !id.trim().is_empty() => {}
            _ => return Err(EyesError::config("display_id is required")),
        }
        if self.update_interval == 0 {
            return Err(EyesError::config("update_interval must be positive"));
        }
        self.layout()?;
        self.emotion_weights()?;
        Ok(())
    }

    /// Eye placement for the configured screen size.
    pub fn layout(&self) -> Result<EyeLayout> {
        EyeLayout::compute(
            self.screen_width,
            self.screen_height,
            self.eye_size,
            self.eye_distance,
        )
    }

    /// Builds the weight table. Unknown emotion names are skipped before
    /// their weight is looked at; invalid weights of known emotions are
    /// rejected.
    pub fn emotion_weights(&self) -> Result<EmotionWeights> {
        let mut weights = EmotionWeights::new();
        for entry in &self.emotions {
            let Some(emotion) = Emotion::from_name(&entry.name) else {
                tracing::debug!(
                    name = %entry.name,
                    weight = entry.weight,
                    "ignoring unknown emotion"
                );
                continue;
            };
            weights.set(emotion, entry.weight)?;
        }
        Ok(weights)
    }

    pub fn behavior_settings(&self) -> Result<BehaviorSettings> {
        Ok(BehaviorSettings {
            random_behavior: self.random_behavior,
            random_blink: self.random_blink,
            random_look: self.random_look,
            blink_interval_ms: self.blink_interval,
            look_interval_ms: self.look_interval,
            behavior_interval_ms: self.behavior_interval,
            blink_duration_ms: timeline::blink_duration_for(self.update_interval),
            weights: self.emotion_weights()?,
        })
    }
}
