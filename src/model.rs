use indexmap::IndexMap;
use std::fmt;

/// Node identifier as it appears in node tokens and navigation URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Accepts `[A-Za-z0-9_-]+` only. A `-` may not be doubled or end the
    /// id: in a node token Mermaid would read it as part of a connector.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !raw.contains("--")
            && !raw.ends_with('-');
        valid.then_some(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: NodeId,
    pub name: String,
}

impl NodeRef {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One link row: two endpoints and an optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub source: NodeRef,
    pub dest: NodeRef,
    pub label: Option<String>,
}

impl EdgeRecord {
    pub fn new(source: NodeRef, dest: NodeRef) -> Self {
        Self {
            source,
            dest,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label text, if any non-blank label is present.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// Nodes deduplicated by id, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: IndexMap<NodeId, String>,
}

impl NodeSet {
    pub fn from_edges(edges: &[EdgeRecord]) -> Self {
        let mut set = Self::default();
        for edge in edges {
            set.insert(&edge.source);
            set.insert(&edge.dest);
        }
        set
    }

    /// Returns false if the id was already present; the first name is kept.
    pub fn insert(&mut self, node: &NodeRef) -> bool {
        if self.contains(&node.id) {
            return false;
        }
        self.nodes.insert(node.id.clone(), node.name.clone());
        true
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &str)> {
        self.nodes.iter().map(|(id, name)| (id, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_validation() {
        assert!(NodeId::new("12").is_some());
        assert!(NodeId::new("ab_c-3").is_some());
        assert!(NodeId::new("").is_none());
        assert!(NodeId::new("1 OR 1").is_none());
        assert!(NodeId::new("a\"b").is_none());
        assert!(NodeId::new("0b1e-4f2a").is_some());
        assert!(NodeId::new("x--o").is_none());
        assert!(NodeId::new("a-.b").is_none());
        assert!(NodeId::new("flag-").is_none());
        assert_eq!(NodeId::from(7).as_str(), "7");
    }

    #[test]
    fn test_node_set_dedup_first_seen() {
        let edges = vec![
            EdgeRecord::new(NodeRef::new(1, "A"), NodeRef::new(2, "B")),
            EdgeRecord::new(NodeRef::new(2, "Bee"), NodeRef::new(1, "A")),
            EdgeRecord::new(NodeRef::new(3, "C"), NodeRef::new(2, "B")),
        ];
        let set = NodeSet::from_edges(&edges);
        let ids: Vec<_> = set.iter().map(|(id, name)| (id.as_str(), name)).collect();
        assert_eq!(ids, vec![("1", "A"), ("2", "B"), ("3", "C")]);
        assert!(set.contains(&NodeId::from(3)));
        assert!(!set.contains(&NodeId::from(4)));
    }

    #[test]
    fn test_blank_label_is_none() {
        let edge = EdgeRecord::new(NodeRef::new(1, "A"), NodeRef::new(2, "B")).with_label("  ");
        assert_eq!(edge.label(), None);
    }
}
