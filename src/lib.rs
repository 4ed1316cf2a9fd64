pub mod config;
pub mod error;
pub mod flowchart;
pub mod html;
pub mod join;
pub mod manifest;
pub mod model;
pub mod rows;
pub mod schema;
pub mod sql;
pub mod state;
pub mod style;
pub mod view;

use wasm_bindgen::prelude::*;

pub use config::{ContainerStyle, RenderConfig, ViewConfiguration};
pub use error::{ConfigError, DataIntegrityError, Error, Result};
pub use model::{EdgeRecord, NodeId, NodeRef};
pub use view::{render_edges, render_field_view, render_rows, LinkView};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn js_to_json(value: &JsValue) -> std::result::Result<String, String> {
    js_sys::JSON::stringify(value)
        .map(String::from)
        .map_err(|e| format!("{:?}", e))
}

/// Render joined link rows (objects with `sid`, `src`, `did`, `dst`) using a
/// stored view configuration.
#[wasm_bindgen(js_name = "renderLinkView")]
pub fn render_link_view(
    rows: JsValue,
    config: JsValue,
    table: Option<String>,
) -> std::result::Result<String, String> {
    let config = ViewConfiguration::from_json_str(&js_to_json(&config)?).map_err(|e| e.to_string())?;
    let render = config
        .render_config(table.as_deref())
        .map_err(|e| e.to_string())?;
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&js_to_json(&rows)?).map_err(|e| e.to_string())?;

    render_rows(&rows, &render).map_err(|e| e.to_string())
}

/// Wrap a Mermaid string stored in a field.
#[wasm_bindgen(js_name = "renderFieldView")]
pub fn render_field_view_js(
    value: &str,
    parent_style: Option<String>,
    mermaid_style: Option<String>,
) -> String {
    let style = ContainerStyle {
        parent_style: parent_style.filter(|s| !s.trim().is_empty()),
        mermaid_style: mermaid_style.filter(|s| !s.trim().is_empty()),
    };
    render_field_view(value, &style)
}

/// `<script>` tags the host page needs.
#[wasm_bindgen(js_name = "mermaidHeaders")]
pub fn mermaid_headers() -> String {
    manifest::default_headers()
        .iter()
        .map(manifest::ScriptHeader::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}
