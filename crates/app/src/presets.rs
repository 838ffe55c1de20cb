use esp_eyes_core::{EyesConfig, EyesError, Result};

/// Bundled example configurations, by name.
pub const PRESETS: &[(&str, &str)] = &[
    ("basic", include_str!("../presets/basic.json")),
    ("home-assistant", include_str!("../presets/home-assistant.json")),
    ("high-performance", include_str!("../presets/high-performance.json")),
    ("low-power", include_str!("../presets/low-power.json")),
];

pub fn load(name: &str) -> Result<EyesConfig> {
    let (_, json) = PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            let known: Vec<&str> = PRESETS.iter().map(|(preset, _)| *preset).collect();
            EyesError::config(format!(
                "unknown preset `{name}`, expected one of: {}",
                known.join(", ")
            ))
        })?;
    EyesConfig::from_json_str(json)
}
