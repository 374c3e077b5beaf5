use crate::color::is_hex_color;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// Per-request options, shaped like the plugin's `settings` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SankeySettings {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_padding: f64,
    pub colors: Vec<String>,
    // Opaque to the layout engine; consumed by renderers only.
    pub enable_gradients: bool,
    pub flow_opacity: f64,
}

impl Default for SankeySettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            node_width: 20.0,
            node_padding: 20.0,
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            enable_gradients: false,
            flow_opacity: 0.6,
        }
    }
}

/// Engine constants. Defaults reproduce the reference plugin exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub min_node_height: f64,
    pub max_height_ratio: f64,
    pub margin: f64,
    pub min_level_width: f64,
    pub thickness_scale: f64,
    pub min_thickness: f64,
    pub max_thickness: f64,
    pub band_gap: f64,
    pub control_ratio_start: f64,
    pub control_ratio_end: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_node_height: 30.0,
            max_height_ratio: 0.7,
            margin: 40.0,
            min_level_width: 100.0,
            thickness_scale: 25.0,
            min_thickness: 2.0,
            max_thickness: 30.0,
            band_gap: 2.0,
            control_ratio_start: 0.4,
            control_ratio_end: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    // Ribbon control-point offset cap used by the SVG sink.
    pub ribbon_curve_cap: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            ribbon_curve_cap: 150.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub settings: SankeySettings,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    width: Option<f64>,
    height: Option<f64>,
    node_width: Option<f64>,
    node_padding: Option<f64>,
    colors: Option<Vec<String>>,
    enable_gradients: Option<bool>,
    flow_opacity: Option<f64>,
}

impl SettingsFile {
    fn apply(self, settings: &mut SankeySettings) {
        if let Some(v) = self.width {
            settings.width = v;
        }
        if let Some(v) = self.height {
            settings.height = v;
        }
        if let Some(v) = self.node_width {
            settings.node_width = v;
        }
        if let Some(v) = self.node_padding {
            settings.node_padding = v;
        }
        if let Some(v) = self.colors {
            settings.colors = v;
        }
        if let Some(v) = self.enable_gradients {
            settings.enable_gradients = v;
        }
        if let Some(v) = self.flow_opacity {
            settings.flow_opacity = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariablesFile {
    font_family: Option<String>,
    font_size: Option<f64>,
    font_weight: Option<String>,
    label_color: Option<String>,
    label_offset: Option<f64>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    settings: Option<SettingsFile>,
    layout: Option<LayoutConfig>,
    render: Option<RenderConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(&contents).map_err(|json5_err| {
            anyhow::anyhow!(
                "invalid config file {}: {json_err} (json5: {json5_err})",
                path.display()
            )
        })?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "figma" | "default" => config.theme = Theme::figma_default(),
            other => log::warn!(theme = other; "Unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.font_weight {
            config.theme.font_weight = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.label_offset {
            config.theme.label_offset = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(settings) = parsed.settings {
        settings.apply(&mut config.settings);
    }
    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }

    validate_palette(&config.settings.colors)?;
    log::debug!(path:? = path, palette_len = config.settings.colors.len(); "Loaded config");
    Ok(config)
}

/// Overlays a loose settings object (plugin message or init directive) onto
/// `settings`. Unknown keys are ignored.
pub fn apply_settings_overrides(
    settings: &mut SankeySettings,
    overrides: &serde_json::Value,
) -> anyhow::Result<()> {
    let file: SettingsFile = serde_json::from_value(overrides.clone())?;
    file.apply(settings);
    validate_palette(&settings.colors)
}

pub fn validate_palette(colors: &[String]) -> anyhow::Result<()> {
    if colors.is_empty() {
        anyhow::bail!("palette must contain at least one color");
    }
    if let Some(bad) = colors.iter().find(|c| !is_hex_color(c)) {
        anyhow::bail!("palette color {bad:?} is not a #rrggbb hex color");
    }
    Ok(())
}
