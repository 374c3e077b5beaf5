use sankey_rs_renderer::config::apply_settings_overrides;
use sankey_rs_renderer::layout::compute_layout_with;
use sankey_rs_renderer::layout_dump::LayoutDump;
use sankey_rs_renderer::{RenderOptions, parse_flows, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SankeyRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f64>,
    settings: Option<serde_json::Value>,
}

fn build_render_options(options: SankeyRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::figma_default()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(settings) = &options.settings {
        apply_settings_overrides(&mut render_options.settings, settings)
            .map_err(|error| error.to_string())?;
    }

    Ok(render_options)
}

fn parse_options(options_json: Option<String>) -> Result<RenderOptions, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<SankeyRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        SankeyRenderOptions::default()
    };
    build_render_options(options).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_sankey_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = parse_options(options_json)?;
    render_with_options(input, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Layout only, as the same camelCase JSON the CLI writes with `--dumpLayout`.
#[wasm_bindgen]
pub fn compute_sankey_layout(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let mut render_options = parse_options(options_json)?;
    layout_json(input, &mut render_options).map_err(|error| JsValue::from_str(&error))
}

fn layout_json(input: &str, options: &mut RenderOptions) -> Result<String, String> {
    let parsed = parse_flows(input).map_err(|error| error.to_string())?;
    if let Some(overrides) = &parsed.settings {
        apply_settings_overrides(&mut options.settings, overrides)
            .map_err(|error| error.to_string())?;
    }
    let layout = compute_layout_with(&parsed.edges, &options.settings, &options.layout)
        .map_err(|error| error.to_string())?;
    serde_json::to_string(&LayoutDump::from_layout(&layout)).map_err(|error| error.to_string())
}
