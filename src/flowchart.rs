//! Flowchart text generation for link records.

use crate::config::RenderConfig;
use crate::model::{EdgeRecord, NodeId, NodeRef, NodeSet};
use std::borrow::Cow;
use std::sync::OnceLock;
use url::{Position, Url};

/// Prefix turning a raw id into a Mermaid node token (`12` -> `a12`).
pub const NODE_PREFIX: &str = "a";

/// Characters that end an unquoted node name or label.
const SYNTAX_CHARS: &[char] = &['[', ']', '{', '}', '(', ')', '<', '>', '|', '"'];

pub struct Flowchart<'a> {
    config: &'a RenderConfig,
}

impl<'a> Flowchart<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Diagram text for `edges`, or `None` when there is nothing to draw.
    pub fn render(&self, edges: &[EdgeRecord]) -> Option<String> {
        if edges.is_empty() {
            return None;
        }

        let mut output = String::new();
        self.write_header(&mut output);

        for edge in edges {
            self.write_edge(&mut output, edge);
        }

        if let Some(view) = self.config.node_click_view.as_deref() {
            let nodes = NodeSet::from_edges(edges);
            tracing::debug!(nodes = nodes.len(), view, "emitting click directives");
            for (id, name) in nodes.iter() {
                write_click(&mut output, view, id, name);
            }
        }

        tracing::debug!(edges = edges.len(), "rendered flowchart");
        Some(output)
    }

    fn write_header(&self, output: &mut String) {
        if let Some(title) = self.config.title.as_deref() {
            let title = serde_json::Value::String(single_line(title).into_owned());
            output.push_str(&format!("---\ntitle: {}\n---\n", title));
        }
        output.push_str(&format!(
            "flowchart {}\n",
            self.config.orientation.token()
        ));
    }

    fn write_edge(&self, output: &mut String, edge: &EdgeRecord) {
        self.write_node(output, &edge.source);
        output.push_str(self.config.link_style.connector());
        if let Some(label) = edge.label() {
            output.push('|');
            output.push_str(&markup_text(label).replace('|', "#124;"));
            output.push('|');
        }
        self.write_node(output, &edge.dest);
        output.push('\n');
    }

    fn write_node(&self, output: &mut String, node: &NodeRef) {
        let (open, close) = self.config.node_shape.brackets();
        output.push_str(&node_token(&node.id));
        output.push_str(open);
        output.push_str(&markup_text(&node.name));
        output.push_str(close);
    }
}

pub fn node_token(id: &NodeId) -> String {
    format!("{}{}", NODE_PREFIX, id)
}

/// `/view/<view>?id=<id>` with both parts percent-encoded.
pub fn view_path(view: &str, id: &NodeId) -> String {
    static BASE: OnceLock<Url> = OnceLock::new();
    let mut url = BASE
        .get_or_init(|| Url::parse("http://localhost/").expect("valid base url"))
        .clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push("view").push(view);
    }
    url.query_pairs_mut().append_pair("id", id.as_str());
    url[Position::BeforePath..].to_string()
}

fn write_click(output: &mut String, view: &str, id: &NodeId, name: &str) {
    output.push_str(&format!(
        "click {} \"{}\" \"{}\"\n",
        node_token(id),
        view_path(view, id),
        single_line(name).replace('"', "'")
    ));
}

fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            text.split(['\n', '\r', '\t'])
                .filter(|part| !part.trim().is_empty())
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" "),
        )
    } else {
        Cow::Borrowed(text.trim())
    }
}

/// Node names and labels; quoted when they contain syntax characters.
fn markup_text(text: &str) -> Cow<'_, str> {
    let text = single_line(text);
    if text.contains(SYNTAX_CHARS) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "#quot;")))
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{LinkStyle, NodeShape, Orientation};

    fn config() -> RenderConfig {
        RenderConfig {
            orientation: Orientation::LeftRight,
            link_style: LinkStyle::Arrow,
            node_shape: NodeShape::Box,
            ..RenderConfig::default()
        }
    }

    fn edge(src: i64, src_name: &str, dst: i64, dst_name: &str) -> EdgeRecord {
        EdgeRecord::new(NodeRef::new(src, src_name), NodeRef::new(dst, dst_name))
    }

    #[test]
    fn test_single_edge() {
        let config = config();
        let text = Flowchart::new(&config)
            .render(&[edge(1, "Client", 2, "LB")])
            .unwrap();
        assert_eq!(text, "flowchart LR\na1[Client]-->a2[LB]\n");
    }

    #[test]
    fn test_label_segment() {
        let config = config();
        let text = Flowchart::new(&config)
            .render(&[edge(1, "Client", 2, "LB").with_label("http")])
            .unwrap();
        assert!(text.contains("a1[Client]-->|http|a2[LB]\n"));
    }

    #[test]
    fn test_empty_label_is_omitted() {
        let config = config();
        let text = Flowchart::new(&config)
            .render(&[edge(1, "Client", 2, "LB").with_label("")])
            .unwrap();
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_empty_input() {
        let config = config();
        assert_eq!(Flowchart::new(&config).render(&[]), None);
    }

    #[test]
    fn test_one_line_per_edge_in_order() {
        let config = config();
        let edges = vec![
            edge(3, "C", 1, "A"),
            edge(1, "A", 2, "B"),
            edge(2, "B", 3, "C"),
        ];
        let text = Flowchart::new(&config).render(&edges).unwrap();
        let lines: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(lines, vec!["a3[C]-->a1[A]", "a1[A]-->a2[B]", "a2[B]-->a3[C]"]);
    }

    #[test]
    fn test_every_shape_wraps_names() {
        for (_, shape) in NodeShape::PALETTE {
            let config = RenderConfig {
                node_shape: shape,
                ..config()
            };
            let (open, close) = shape.brackets();
            let text = Flowchart::new(&config)
                .render(&[edge(1, "Client", 2, "LB")])
                .unwrap();
            assert!(text.contains(&format!("a1{}Client{}", open, close)));
            assert!(text.contains(&format!("a2{}LB{}", open, close)));
        }
    }

    #[test]
    fn test_every_connector_is_verbatim() {
        for (token, style) in LinkStyle::PALETTE {
            let config = RenderConfig {
                link_style: style,
                ..config()
            };
            let text = Flowchart::new(&config)
                .render(&[edge(1, "Client", 2, "LB").with_label("http")])
                .unwrap();
            assert_eq!(
                text,
                format!("flowchart LR\na1[Client]{}|http|a2[LB]\n", token)
            );
        }
    }

    #[test]
    fn test_click_directives_dedup() {
        let config = RenderConfig {
            node_click_view: Some("NodeDetail".to_string()),
            ..config()
        };
        let edges = vec![edge(1, "A", 2, "B"), edge(2, "B", 1, "A")];
        let text = Flowchart::new(&config).render(&edges).unwrap();
        let clicks: Vec<&str> = text.lines().filter(|l| l.starts_with("click")).collect();
        assert_eq!(
            clicks,
            vec![
                "click a1 \"/view/NodeDetail?id=1\" \"A\"",
                "click a2 \"/view/NodeDetail?id=2\" \"B\"",
            ]
        );
    }

    #[test]
    fn test_click_example() {
        let config = RenderConfig {
            node_click_view: Some("NodeDetail".to_string()),
            ..config()
        };
        let text = Flowchart::new(&config)
            .render(&[edge(1, "Client", 2, "LB")])
            .unwrap();
        assert!(text.ends_with(
            "click a1 \"/view/NodeDetail?id=1\" \"Client\"\nclick a2 \"/view/NodeDetail?id=2\" \"LB\"\n"
        ));
    }

    #[test]
    fn test_deterministic_output() {
        let config = RenderConfig {
            node_click_view: Some("Detail".to_string()),
            ..config()
        };
        let edges: Vec<_> = (0..20).map(|i| edge(i, "n", (i * 7) % 20, "m")).collect();
        let first = Flowchart::new(&config).render(&edges);
        let second = Flowchart::new(&config).render(&edges);
        assert_eq!(first, second);
    }

    #[test]
    fn test_view_path_encoding() {
        let id = NodeId::from(5);
        assert_eq!(view_path("Node Detail", &id), "/view/Node%20Detail?id=5");
        assert_eq!(view_path("plain", &id), "/view/plain?id=5");
    }

    #[test]
    fn test_syntax_chars_are_quoted() {
        let config = config();
        let text = Flowchart::new(&config)
            .render(&[edge(1, "Load [primary]", 2, "say \"hi\"").with_label("a|b")])
            .unwrap();
        assert!(text.contains("a1[\"Load [primary]\"]"));
        assert!(text.contains("-->|\"a#124;b\"|a2"));
        assert!(text.contains("a2[\"say #quot;hi#quot;\"]"));
    }

    #[test]
    fn test_multiline_names_collapse() {
        let config = config();
        let text = Flowchart::new(&config)
            .render(&[edge(1, "two\nlines", 2, "B")])
            .unwrap();
        assert!(text.contains("a1[two lines]"));
    }

    #[test]
    fn test_title_front_matter() {
        let config = RenderConfig {
            title: Some("Network: core".to_string()),
            ..config()
        };
        let text = Flowchart::new(&config)
            .render(&[edge(1, "A", 2, "B")])
            .unwrap();
        assert!(text.starts_with("---\ntitle: \"Network: core\"\n---\nflowchart LR\n"));
    }
}
