use crate::config::{Margin, Size};
use crate::palette::Rgb;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Input,
    Output,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Input => "input",
            Column::Output => "output",
        }
    }
}

/// Ordered set of CSS class names built from `(name, enabled)` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassList(Vec<&'static str>);

impl ClassList {
    pub fn from_flags(flags: &[(&'static str, bool)]) -> Self {
        Self(
            flags
                .iter()
                .filter(|(_, on)| *on)
                .map(|(name, _)| *name)
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| *c == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One token rectangle. Keyed by `(column, position)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeElement {
    pub column: Column,
    pub position: usize,
    /// Dataset token index
    pub index: usize,
    pub rect: Rect,
    pub fill: Rgb,
    pub classes: ClassList,
}

impl NodeElement {
    pub fn key(&self) -> (Column, usize) {
        (self.column, self.position)
    }
}

/// One attention curve. Keyed by the edge's position in the
/// threshold-filtered edge array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeElement {
    pub key: usize,
    pub input_index: usize,
    pub output_index: usize,
    pub path: String,
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub classes: ClassList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelElement {
    pub column: Column,
    pub index: usize,
    pub x: f64,
    pub y: i64,
    pub text: String,
    pub pos_tag: String,
    pub anchor: TextAnchor,
    pub classes: ClassList,
}

/// Range selector beside the input column. `track` spans the whole input
/// domain, `selection` the currently chosen sub-range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomSelectorElement {
    pub track: Rect,
    pub selection: Rect,
    pub dragging: bool,
}

/// Everything one frame draws, in chart coordinates (margins excluded).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub size: Size,
    pub margin: Margin,
    pub input_nodes: Vec<NodeElement>,
    pub output_nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
    pub labels: Vec<LabelElement>,
    pub zoom_selector: Option<ZoomSelectorElement>,
}

impl Scene {
    pub fn nodes(&self) -> impl Iterator<Item = &NodeElement> {
        self.input_nodes.iter().chain(self.output_nodes.iter())
    }

    pub fn edge_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().map(|e| e.key)
    }

    pub fn node(&self, column: Column, position: usize) -> Option<&NodeElement> {
        match column {
            Column::Input => self.input_nodes.get(position),
            Column::Output => self.output_nodes.get(position),
        }
    }

    /// Node under chart-space point `(x, y)`, if any.
    pub fn node_at(&self, x: f64, y: f64) -> Option<&NodeElement> {
        self.nodes().find(|n| {
            x >= n.rect.x
                && x < n.rect.x + n.rect.width
                && y >= n.rect.y
                && y < n.rect.y + n.rect.height
        })
    }
}
