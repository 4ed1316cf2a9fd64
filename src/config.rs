//! View configuration.
//!
//! [`ViewConfiguration`] is the configuration as the host stores it: plain
//! strings keyed the way the configuration form names them. It is validated
//! twice before anything is rendered:
//!
//! 1. [`ViewConfiguration::render_config`] turns the style tokens into a typed
//!    [`RenderConfig`], failing on anything outside the palettes.
//! 2. [`ViewConfiguration::validate`] checks every table and field reference
//!    against the schema metadata.

use crate::error::ConfigError;
use crate::join::JoinSpec;
use crate::schema::{Catalog, TableMeta};
use crate::style::{LinkStyle, NodeShape, Orientation};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stored configuration of one link view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfiguration {
    pub graph_orientation: Option<String>,
    pub links_style: String,
    pub links_name_field: Option<String>,
    pub nodes_table: String,
    pub nodes_style: String,
    pub nodes_name_field: String,
    pub src_node_field: String,
    pub dst_node_field: String,
    pub nodes_view: Option<String>,
    pub parent_style: Option<String>,
    pub mermaid_style: Option<String>,
    pub title: Option<String>,
}

/// Inline `style=""` overrides for the fragment's two elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStyle {
    pub parent_style: Option<String>,
    pub mermaid_style: Option<String>,
}

/// Validated rendering parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub orientation: Orientation,
    pub link_style: LinkStyle,
    pub node_shape: NodeShape,
    pub label_field: Option<String>,
    pub node_click_view: Option<String>,
    pub container: ContainerStyle,
    pub title: Option<String>,
    /// Named in the message shown when there are no rows
    pub source_table: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ViewConfiguration {
    /// Load from a `.toml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Ok(toml::from_str(&content)?),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn container_style(&self) -> ContainerStyle {
        ContainerStyle {
            parent_style: non_blank(&self.parent_style),
            mermaid_style: non_blank(&self.mermaid_style),
        }
    }

    pub fn render_config(&self, source_table: Option<&str>) -> Result<RenderConfig, ConfigError> {
        let orientation = match non_blank(&self.graph_orientation) {
            Some(token) => Orientation::parse(&token)?,
            None => Orientation::default(),
        };

        Ok(RenderConfig {
            orientation,
            link_style: LinkStyle::parse(&self.links_style)?,
            node_shape: NodeShape::parse(&self.nodes_style)?,
            label_field: non_blank(&self.links_name_field),
            node_click_view: non_blank(&self.nodes_view),
            container: self.container_style(),
            title: non_blank(&self.title),
            source_table: source_table.map(str::to_string),
        })
    }

    /// Check every table and field reference against the schema.
    pub fn validate(&self, links: &TableMeta, catalog: &Catalog) -> Result<JoinSpec, ConfigError> {
        let nodes_table = required("nodes_table", &self.nodes_table)?;
        let nodes = catalog
            .table(nodes_table)
            .ok_or_else(|| ConfigError::MissingTable(nodes_table.to_string()))?;

        let src = required("src_node_field", &self.src_node_field)?;
        let dst = required("dst_node_field", &self.dst_node_field)?;
        for field in [src, dst] {
            let meta = links.field(field).ok_or_else(|| missing(links, field))?;
            if meta.kind.reftable() != Some(nodes.name.as_str()) {
                return Err(ConfigError::FieldKind {
                    table: links.name.clone(),
                    field: field.to_string(),
                    expected: "a key into the nodes table",
                });
            }
        }
        if src == dst {
            return Err(ConfigError::SameEndpoints(src.to_string()));
        }

        let name_field = required("nodes_name_field", &self.nodes_name_field)?;
        expect_text(nodes, name_field)?;

        let label_field = non_blank(&self.links_name_field);
        if let Some(label) = &label_field {
            expect_text(links, label)?;
        }

        Ok(JoinSpec {
            links_table: links.name.clone(),
            links_key: links.primary_key.clone(),
            source_field: src.to_string(),
            dest_field: dst.to_string(),
            nodes_table: nodes.name.clone(),
            node_key: nodes.primary_key.clone(),
            node_name_field: name_field.to_string(),
            label_field,
        })
    }
}

fn required<'a>(setting: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingSetting(setting));
    }
    Ok(value)
}

fn missing(table: &TableMeta, field: &str) -> ConfigError {
    ConfigError::MissingField {
        table: table.name.clone(),
        field: field.to_string(),
    }
}

fn expect_text(table: &TableMeta, field: &str) -> Result<(), ConfigError> {
    let meta = table.field(field).ok_or_else(|| missing(table, field))?;
    if !meta.kind.is_text() {
        return Err(ConfigError::FieldKind {
            table: table.name.clone(),
            field: field.to_string(),
            expected: "a text field",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldMeta};
    use std::io::Write;

    fn catalog() -> Catalog {
        Catalog {
            tables: vec![
                TableMeta::new(
                    "links",
                    vec![
                        FieldMeta::key("from_node", "nodes"),
                        FieldMeta::key("to_node", "nodes"),
                        FieldMeta::key("owner", "users"),
                        FieldMeta::new("protocol", FieldKind::Text),
                        FieldMeta::new("weight", FieldKind::Integer),
                    ],
                ),
                TableMeta::new(
                    "nodes",
                    vec![
                        FieldMeta::new("name", FieldKind::Text),
                        FieldMeta::new("rank", FieldKind::Integer),
                    ],
                ),
            ],
        }
    }

    fn config() -> ViewConfiguration {
        ViewConfiguration {
            graph_orientation: Some("LR".to_string()),
            links_style: "-->".to_string(),
            links_name_field: Some("protocol".to_string()),
            nodes_table: "nodes".to_string(),
            nodes_style: "[]".to_string(),
            nodes_name_field: "name".to_string(),
            src_node_field: "from_node".to_string(),
            dst_node_field: "to_node".to_string(),
            nodes_view: Some("NodeDetail".to_string()),
            ..ViewConfiguration::default()
        }
    }

    fn validate(config: &ViewConfiguration) -> Result<JoinSpec, ConfigError> {
        let catalog = catalog();
        let links = catalog.table("links").unwrap().clone();
        config.validate(&links, &catalog)
    }

    #[test]
    fn test_render_config() {
        let render = config().render_config(Some("links")).unwrap();
        assert_eq!(render.orientation, Orientation::LeftRight);
        assert_eq!(render.link_style, LinkStyle::Arrow);
        assert_eq!(render.node_shape, NodeShape::Box);
        assert_eq!(render.node_click_view.as_deref(), Some("NodeDetail"));
        assert_eq!(render.source_table.as_deref(), Some("links"));
    }

    #[test]
    fn test_orientation_defaults_to_tb() {
        let mut config = config();
        config.graph_orientation = None;
        let render = config.render_config(None).unwrap();
        assert_eq!(render.orientation, Orientation::TopBottom);
    }

    #[test]
    fn test_unknown_style_fails() {
        let mut config = config();
        config.nodes_style = "<>".to_string();
        assert!(matches!(
            config.render_config(None),
            Err(ConfigError::UnknownStyle { .. })
        ));
    }

    #[test]
    fn test_blank_styles_are_cleared() {
        let mut config = config();
        config.parent_style = Some("  ".to_string());
        config.mermaid_style = Some("height: 400px".to_string());
        let style = config.container_style();
        assert_eq!(style.parent_style, None);
        assert_eq!(style.mermaid_style.as_deref(), Some("height: 400px"));
    }

    #[test]
    fn test_validate_builds_join_spec() {
        let spec = validate(&config()).unwrap();
        assert_eq!(spec.source_field, "from_node");
        assert_eq!(spec.node_key, "id");
        assert_eq!(spec.label_field.as_deref(), Some("protocol"));
    }

    #[test]
    fn test_validate_missing_table() {
        let mut config = config();
        config.nodes_table = "vertices".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::MissingTable(t)) if t == "vertices"));
    }

    #[test]
    fn test_validate_wrong_endpoint() {
        let mut config = config();
        config.dst_node_field = "owner".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::FieldKind { .. })));

        config.dst_node_field = "gone".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::MissingField { .. })));

        config.dst_node_field = "from_node".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::SameEndpoints(_))));
    }

    #[test]
    fn test_validate_name_and_label_kinds() {
        let mut config = config();
        config.nodes_name_field = "rank".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::FieldKind { .. })));

        let mut config = self::config();
        config.links_name_field = Some("weight".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::FieldKind { .. })));
    }

    #[test]
    fn test_missing_setting() {
        let mut config = config();
        config.src_node_field = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::MissingSetting("src_node_field"))
        ));
    }

    #[test]
    fn test_load_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("view.toml");
        let mut file = std::fs::File::create(&toml_path).unwrap();
        writeln!(
            file,
            r#"
graph_orientation = "RL"
links_style = "==>"
nodes_table = "nodes"
nodes_style = "(())"
nodes_name_field = "name"
src_node_field = "from_node"
dst_node_field = "to_node"
"#
        )
        .unwrap();
        let config = ViewConfiguration::from_file(&toml_path).unwrap();
        assert_eq!(config.nodes_style, "(())");

        let json_path = dir.path().join("view.json");
        std::fs::write(
            &json_path,
            r#"{"links_style": "-.->", "nodes_style": "{}", "links_view": "ignored"}"#,
        )
        .unwrap();
        let config = ViewConfiguration::from_file(&json_path).unwrap();
        assert_eq!(config.links_style, "-.->");
        assert!(config.nodes_table.is_empty());
    }
}
