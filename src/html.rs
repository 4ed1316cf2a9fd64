//! HTML fragment wrapping diagram text.
//!
//! The host page runs the Mermaid script over every element with the
//! `mermaid` class, so the fragment is two nested `div`s with the diagram
//! text as the inner element's only content.

use crate::config::ContainerStyle;
use htmlize::{escape_attribute, escape_text};

pub const DIAGRAM_ID: &str = "mermaid_id";
pub const DIAGRAM_CLASS: &str = "mermaid";

fn open_div(html: &mut String, attrs: &[(&str, Option<&str>)]) {
    html.push_str("<div");
    for (name, value) in attrs {
        if let Some(value) = value {
            html.push_str(&format!(" {}=\"{}\"", name, escape_attribute(*value)));
        }
    }
    html.push('>');
}

fn wrap(text: &str, id: Option<&str>, style: &ContainerStyle) -> String {
    let mut html = String::new();
    open_div(&mut html, &[("style", style.parent_style.as_deref())]);
    open_div(
        &mut html,
        &[
            ("id", id),
            ("class", Some(DIAGRAM_CLASS)),
            ("style", style.mermaid_style.as_deref()),
        ],
    );
    html.push_str(&escape_text(text));
    html.push_str("</div></div>");
    html
}

/// Fragment for generated diagram text.
pub fn diagram_fragment(text: &str, style: &ContainerStyle) -> String {
    wrap(text, Some(DIAGRAM_ID), style)
}

/// Fragment for a stored Mermaid string; no `id`, since a page may hold many.
pub fn field_fragment(text: &str, style: &ContainerStyle) -> String {
    wrap(text, None, style)
}

pub fn no_rows_message(table: Option<&str>) -> String {
    let message = match table {
        Some(table) => format!("No rows found in {}.", table),
        None => "No rows found.".to_string(),
    };
    format!("<div>{}</div>", escape_text(message.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_without_styles() {
        let html = diagram_fragment("flowchart TB\na1[A]-->a2[B]\n", &ContainerStyle::default());
        assert_eq!(
            html,
            "<div><div id=\"mermaid_id\" class=\"mermaid\">flowchart TB\na1[A]--&gt;a2[B]\n</div></div>"
        );
    }

    #[test]
    fn test_fragment_with_styles() {
        let style = ContainerStyle {
            parent_style: Some("width: 100%".to_string()),
            mermaid_style: Some("font-family: \"x\"".to_string()),
        };
        let html = diagram_fragment("flowchart TB\n", &style);
        assert!(html.starts_with("<div style=\"width: 100%\"><div id=\"mermaid_id\" class=\"mermaid\" style=\"font-family: &quot;x&quot;\">"));
    }

    #[test]
    fn test_field_fragment_has_no_id() {
        let html = field_fragment("graph TD; A-->B", &ContainerStyle::default());
        assert_eq!(html, "<div><div class=\"mermaid\">graph TD; A--&gt;B</div></div>");
    }

    #[test]
    fn test_no_rows_message() {
        assert_eq!(no_rows_message(Some("links")), "<div>No rows found in links.</div>");
        assert_eq!(no_rows_message(None), "<div>No rows found.</div>");
        assert_eq!(no_rows_message(Some("<b>")), "<div>No rows found in &lt;b&gt;.</div>");
    }
}
