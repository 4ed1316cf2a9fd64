//! Closed style palettes for flowchart output.
//!
//! Each palette maps a configuration token to the literal Mermaid syntax it
//! stands for. The tables are `const` data; there is no way to register new
//! entries at runtime.

use crate::error::ConfigError;

/// Flowchart direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Top to bottom
    #[default]
    TopBottom,
    /// Bottom to top
    BottomTop,
    /// Left to right
    LeftRight,
    /// Right to left
    RightLeft,
}

impl Orientation {
    pub const PALETTE: [(&'static str, Self); 4] = [
        ("TB", Self::TopBottom),
        ("BT", Self::BottomTop),
        ("LR", Self::LeftRight),
        ("RL", Self::RightLeft),
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            // Mermaid treats TD as an alias of TB
            "TB" | "TD" => Some(Self::TopBottom),
            "BT" => Some(Self::BottomTop),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| unknown("orientation", s))
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

/// Connector drawn between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    Plain,
    #[default]
    Arrow,
    DottedArrow,
    Dotted,
    ThickArrow,
    CircleArrow,
    CrossArrow,
    BidirectionalArrow,
    CircleCircle,
    CrossCross,
}

impl LinkStyle {
    /// Connector tokens in the order a configuration form lists them.
    pub const PALETTE: [(&'static str, Self); 10] = [
        ("---", Self::Plain),
        ("-->", Self::Arrow),
        ("-.->", Self::DottedArrow),
        ("-.-", Self::Dotted),
        ("==>", Self::ThickArrow),
        ("--o", Self::CircleArrow),
        ("--x", Self::CrossArrow),
        ("<-->", Self::BidirectionalArrow),
        ("o--o", Self::CircleCircle),
        ("x--x", Self::CrossCross),
    ];

    /// Accepts either the connector itself or its descriptive name.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some((_, style)) = Self::PALETTE.iter().find(|(token, _)| *token == s) {
            return Some(*style);
        }
        match s.to_lowercase().as_str() {
            "plain" => Some(Self::Plain),
            "arrow" => Some(Self::Arrow),
            "dotted-arrow" => Some(Self::DottedArrow),
            "dotted" => Some(Self::Dotted),
            "thick-arrow" => Some(Self::ThickArrow),
            "circle-arrow" | "open-circle-arrow" => Some(Self::CircleArrow),
            "cross-arrow" => Some(Self::CrossArrow),
            "bidirectional-arrow" => Some(Self::BidirectionalArrow),
            "circle-circle" => Some(Self::CircleCircle),
            "cross-cross" => Some(Self::CrossCross),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| unknown("link style", s))
    }

    pub fn connector(self) -> &'static str {
        match self {
            Self::Plain => "---",
            Self::Arrow => "-->",
            Self::DottedArrow => "-.->",
            Self::Dotted => "-.-",
            Self::ThickArrow => "==>",
            Self::CircleArrow => "--o",
            Self::CrossArrow => "--x",
            Self::BidirectionalArrow => "<-->",
            Self::CircleCircle => "o--o",
            Self::CrossCross => "x--x",
        }
    }
}

/// Bracket pair wrapped around a node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    #[default]
    Box,
    Round,
    Database,
    Subroutine,
    Stadium,
    Circle,
    Flag,
    Rhombus,
}

impl NodeShape {
    pub const PALETTE: [(&'static str, Self); 8] = [
        ("[]", Self::Box),
        ("()", Self::Round),
        ("[()]", Self::Database),
        ("[[]]", Self::Subroutine),
        ("([])", Self::Stadium),
        ("(())", Self::Circle),
        (">]", Self::Flag),
        ("{}", Self::Rhombus),
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some((_, shape)) = Self::PALETTE.iter().find(|(token, _)| *token == s) {
            return Some(*shape);
        }
        match s.to_lowercase().as_str() {
            "box" => Some(Self::Box),
            "round" => Some(Self::Round),
            "database" | "cylinder" => Some(Self::Database),
            "subroutine" => Some(Self::Subroutine),
            "stadium" => Some(Self::Stadium),
            "circle" => Some(Self::Circle),
            "flag" | "asymmetric" => Some(Self::Flag),
            "rhombus" => Some(Self::Rhombus),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| unknown("node style", s))
    }

    /// `(open, close)` literals.
    pub fn brackets(self) -> (&'static str, &'static str) {
        match self {
            Self::Box => ("[", "]"),
            Self::Round => ("(", ")"),
            Self::Database => ("[(", ")]"),
            Self::Subroutine => ("[[", "]]"),
            Self::Stadium => ("([", "])"),
            Self::Circle => ("((", "))"),
            Self::Flag => (">", "]"),
            Self::Rhombus => ("{", "}"),
        }
    }
}

fn unknown(kind: &'static str, token: &str) -> ConfigError {
    ConfigError::UnknownStyle {
        kind,
        token: token.to_string(),
    }
}
