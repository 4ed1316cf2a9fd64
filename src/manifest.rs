//! Script dependencies the host injects into pages using the view.

use htmlize::escape_attribute;
use serde::Serialize;

pub const PLUGIN_NAME: &str = "mermaid-links";
pub const PLUGIN_API_VERSION: u32 = 1;

/// Bundled mermaid 10.2.0.
const MERMAID_SCRIPT: &str = "mermaid.min.js";
const MERMAID_INTEGRITY: &str =
    "sha512-dXrRCacKAgxLUx/PjTiWYTzshYHJZEqa8VVIBruyJAPa2t2bzzkCfRSclVWBN2pls6w+wTsfbWKpbKd3KBwUaA==";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptHeader {
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl ScriptHeader {
    pub fn to_html(&self) -> String {
        match &self.integrity {
            Some(integrity) => format!(
                "<script src=\"{}\" integrity=\"{}\" crossorigin=\"anonymous\"></script>",
                escape_attribute(self.script.as_str()),
                escape_attribute(integrity.as_str())
            ),
            None => format!(
                "<script src=\"{}\"></script>",
                escape_attribute(self.script.as_str())
            ),
        }
    }
}

/// Public asset path of this plugin version.
pub fn base_path(version: &str) -> String {
    format!("/plugins/public/{}@{}", PLUGIN_NAME, version)
}

pub fn headers(version: &str) -> Vec<ScriptHeader> {
    vec![ScriptHeader {
        script: format!("{}/{}", base_path(version), MERMAID_SCRIPT),
        integrity: Some(MERMAID_INTEGRITY.to_string()),
    }]
}

/// Headers for the crate's own version.
pub fn default_headers() -> Vec<ScriptHeader> {
    headers(env!("CARGO_PKG_VERSION"))
}
