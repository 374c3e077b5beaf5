use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub label_color: String,
    pub label_offset: f64,
    pub background: String,
}

impl Theme {
    pub fn figma_default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 14.0,
            font_weight: "500".to_string(),
            label_color: "#333333".to_string(),
            label_offset: 16.0,
            background: "#FAFAFA".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            font_weight: "500".to_string(),
            label_color: "#1C2430".to_string(),
            label_offset: 12.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::figma_default()
    }
}
