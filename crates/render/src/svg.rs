use crate::commit::{Effect, Surface};
use crate::config::{Margin, Size};
use crate::scene::{
    Column, EdgeElement, LabelElement, NodeElement, TextAnchor, ZoomSelectorElement,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Counters for what the surface has been asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceStats {
    pub clears: usize,
    pub created: usize,
    pub restyled: usize,
}

/// Retained SVG element store. Effects mutate the store; [`SvgSurface::to_svg`]
/// serialises its current contents.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    size: Option<Size>,
    margin: Margin,
    nodes: BTreeMap<(Column, usize), NodeElement>,
    edges: BTreeMap<usize, EdgeElement>,
    labels: Vec<LabelElement>,
    zoom_selector: Option<ZoomSelectorElement>,
    stats: SurfaceStats,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, key: usize) -> Option<&EdgeElement> {
        self.edges.get(&key)
    }

    pub fn node(&self, column: Column, position: usize) -> Option<&NodeElement> {
        self.nodes.get(&(column, position))
    }

    pub fn labels(&self) -> &[LabelElement] {
        &self.labels
    }

    pub fn to_svg(&self) -> String {
        let size = self.size.unwrap_or_default();
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="Flowmap" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            size.width, size.height, size.width, size.height
        );
        let _ = writeln!(
            out,
            r#"<g transform="translate({}, {})">"#,
            self.margin.left, self.margin.top
        );

        out.push_str("<g class=\"edges\">\n");
        for edge in self.edges.values() {
            let _ = writeln!(
                out,
                r#"<path class="{}" d="{}" style="stroke: {}; stroke-width: {:.2}; fill: none"/>"#,
                edge.classes, edge.path, edge.stroke, edge.stroke_width
            );
        }
        out.push_str("</g>\n");

        for column in [Column::Input, Column::Output] {
            let _ = writeln!(out, r#"<g class="nodes {}">"#, column.as_str());
            for node in self.nodes.values().filter(|n| n.column == column) {
                let _ = writeln!(
                    out,
                    r#"<rect class="{}" data-index="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                    node.classes,
                    node.index,
                    node.rect.x,
                    node.rect.y,
                    node.rect.width,
                    node.rect.height,
                    node.fill
                );
            }
            out.push_str("</g>\n");
        }

        if let Some(zoom) = &self.zoom_selector {
            let _ = writeln!(
                out,
                r#"<g class="zoom{}"><rect class="track" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/><rect class="selection" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></g>"#,
                if zoom.dragging { " dragging" } else { "" },
                zoom.track.x,
                zoom.track.y,
                zoom.track.width,
                zoom.track.height,
                zoom.selection.x,
                zoom.selection.y,
                zoom.selection.width,
                zoom.selection.height
            );
        }

        out.push_str("<g class=\"labels\">\n");
        for label in &self.labels {
            let anchor = match label.anchor {
                TextAnchor::Start => "start",
                TextAnchor::End => "end",
            };
            let _ = writeln!(
                out,
                r#"<text class="{}" alignment-baseline="middle" text-anchor="{}" x="{:.2}" y="{}">{} <tspan class="pos">{}</tspan></text>"#,
                label.classes,
                anchor,
                label.x,
                label.y,
                escape(&label.text),
                escape(&label.pos_tag)
            );
        }
        out.push_str("</g>\n</g>\n</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Clear { size, margin } => {
                self.size = Some(size);
                self.margin = margin;
                self.nodes.clear();
                self.edges.clear();
                self.labels.clear();
                self.zoom_selector = None;
                self.stats.clears += 1;
            }
            Effect::CreateNode(node) => {
                self.nodes.insert(node.key(), node);
                self.stats.created += 1;
            }
            Effect::CreateEdge(edge) => {
                self.edges.insert(edge.key, edge);
                self.stats.created += 1;
            }
            Effect::StyleNode {
                column,
                position,
                fill,
                classes,
            } => {
                if let Some(node) = self.nodes.get_mut(&(column, position)) {
                    node.fill = fill;
                    node.classes = classes;
                    self.stats.restyled += 1;
                } else {
                    log::warn!("restyle of missing {} node {position}", column.as_str());
                }
            }
            Effect::StyleEdge {
                key,
                stroke,
                classes,
            } => {
                if let Some(edge) = self.edges.get_mut(&key) {
                    edge.stroke = stroke;
                    edge.classes = classes;
                    self.stats.restyled += 1;
                } else {
                    log::warn!("restyle of missing edge {key}");
                }
            }
            Effect::ReplaceLabels(labels) => self.labels = labels,
            Effect::SetZoomSelector(zoom) => self.zoom_selector = zoom,
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_tokens() {
        assert_eq!(escape("<unk> & \"x\""), "&lt;unk&gt; &amp; &quot;x&quot;");
    }

    #[test]
    fn empty_surface_serialises() {
        let svg = SvgSurface::new().to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
