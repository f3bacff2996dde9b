use crate::config::{FlowmapConfig, Size};
use crate::palette::Palette;
use crate::scale::{BandScale, LinearScale, SequentialScale};
use crate::scene::{
    ClassList, Column, EdgeElement, LabelElement, NodeElement, Rect, Scene, TextAnchor,
    ZoomSelectorElement,
};
use crate::zoom::ZoomSelector;
use flowmap_index::{weight_domain_max, FlowmapData};
use flowmap_selection::{SelectionController, SelectionState};
use std::collections::{BTreeMap, HashSet};

/// What one flowmap frame is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub data: &'a FlowmapData,
    pub state: SelectionState,
    /// Changes whenever node or edge membership may have changed.
    pub structure_revision: u64,
    /// Full input index domain of the loaded dataset (before zoom).
    pub input_domain: Option<(usize, usize)>,
}

impl<'a> RenderInput<'a> {
    pub fn from_controller(controller: &'a SelectionController) -> Self {
        Self {
            data: controller.data(),
            state: controller.state(),
            structure_revision: controller.structure_revision(),
            input_domain: controller.source().input_index_bounds(),
        }
    }

    pub fn output_bounds(&self) -> Option<(usize, usize)> {
        let indices = self.data.output_records.iter().map(|r| r.index);
        Some((indices.clone().min()?, indices.max()?))
    }
}

/// Pure layout: turn one frame's records into positioned, styled elements.
pub(crate) fn compute_scene(
    input: &RenderInput<'_>,
    config: &FlowmapConfig,
    size: Size,
    brushing: bool,
    zoom: &ZoomSelector,
) -> Scene {
    let data = input.data;
    let state = input.state;
    let inner = config.inner_size(size);

    let input_x = 0.0;
    let output_x = (inner.width - config.output_node_width).max(0.0);
    let input_band = BandScale::new(data.input_records.len(), (0.0, inner.height));
    let output_band = BandScale::new(data.output_records.len(), (0.0, inner.height));

    let factor = config.weight_color_factor;
    let input_color = SequentialScale::new(
        Palette::Blues,
        weight_domain_max(data.input_records.iter().map(|r| r.weight), factor),
    );
    let output_color = SequentialScale::new(
        Palette::Purples,
        weight_domain_max(data.output_records.iter().map(|r| r.weight), factor),
    );
    let edge_color = SequentialScale::new(Palette::RdPu, factor);
    let edge_color_copy = SequentialScale::new(Palette::Blues, factor);
    let edge_width = LinearScale::new((0.0, 1.0), (0.0, config.max_edge_width));

    let input_nodes = data
        .input_records
        .iter()
        .enumerate()
        .map(|(position, record)| NodeElement {
            column: Column::Input,
            position,
            index: record.index,
            rect: Rect {
                x: input_x,
                y: input_band.position(position),
                width: config.input_node_width,
                height: input_band.bandwidth(),
            },
            fill: input_color.color(record.weight),
            classes: ClassList::from_flags(&[
                ("node", true),
                ("input", true),
                ("clickable", !state.locked && !brushing),
                ("selected", state.filtered && record.selected),
            ]),
        })
        .collect();

    let output_nodes = data
        .output_records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let selected = state.filtered && record.selected;
            NodeElement {
                column: Column::Output,
                position,
                index: record.index,
                rect: Rect {
                    x: output_x,
                    y: output_band.position(position),
                    width: config.output_node_width,
                    height: output_band.bandwidth(),
                },
                fill: output_color.color(record.weight),
                classes: ClassList::from_flags(&[
                    ("node", true),
                    ("output", true),
                    ("novel", record.novel),
                    ("clickable", !state.locked && !brushing),
                    ("selected", selected),
                    ("grabbable", selected && state.locked && !brushing),
                    ("grabbed", selected && state.locked && brushing),
                    ("extendable", brushing && !state.locked),
                ]),
            }
        })
        .collect();

    let mut edges = Vec::new();
    for record in &data.attention_records {
        let width = edge_width.map(record.weight);
        if width < config.min_rendered_edge_width {
            continue;
        }
        let (Some(ipos), Some(opos)) = (
            data.input_position(record.input_index),
            data.output_position(record.output_index),
        ) else {
            log::warn!(
                "edge {} references a token outside the frame, skipping",
                record.index
            );
            continue;
        };
        let copy = data.is_copy_edge(record);
        let x0 = input_x + config.input_node_width;
        let y0 = input_band.center(ipos);
        let x1 = output_x;
        let y1 = output_band.center(opos);
        edges.push(EdgeElement {
            key: record.index,
            input_index: record.input_index,
            output_index: record.output_index,
            path: curve(x0, y0, x1, y1),
            stroke: if copy {
                edge_color_copy.color(record.weight)
            } else {
                edge_color.color(record.weight)
            },
            stroke_width: width,
            classes: ClassList::from_flags(&[
                ("edge", true),
                ("copy", copy),
                ("selected", state.filtered && record.selected),
                ("muted", state.filtered && !record.selected),
            ]),
        });
    }

    let labels = if config.show_text {
        layout_labels(data, &edges, config, input_x, output_x, &input_band, &output_band)
    } else {
        Vec::new()
    };

    let zoom_selector = zoom.range().and_then(|(start, end)| {
        let (y0, y1) = zoom.pixel_span(start, end, inner.height)?;
        let x = input_x - config.zoom_selector_gap - config.zoom_selector_width;
        Some(ZoomSelectorElement {
            track: Rect {
                x,
                y: 0.0,
                width: config.zoom_selector_width,
                height: inner.height,
            },
            selection: Rect {
                x,
                y: y0,
                width: config.zoom_selector_width,
                height: y1 - y0,
            },
            dragging: zoom.dragging(),
        })
    });

    Scene {
        size,
        margin: config.margin,
        input_nodes,
        output_nodes,
        edges,
        labels,
        zoom_selector,
    }
}

/// Horizontal S-curve from `(x0, y0)` to `(x1, y1)`.
fn curve(x0: f64, y0: f64, x1: f64, y1: f64) -> String {
    let mx = (x0 + x1) / 2.0;
    format!("M{x0:.2},{y0:.2}C{mx:.2},{y0:.2} {mx:.2},{y1:.2} {x1:.2},{y1:.2}")
}

/// Labels for tokens touching a drawn, selected edge. Each label claims
/// `label_spacing` pixels either side of its baseline; later labels slide
/// down until they find free space.
fn layout_labels(
    data: &FlowmapData,
    edges: &[EdgeElement],
    config: &FlowmapConfig,
    input_x: f64,
    output_x: f64,
    input_band: &BandScale,
    output_band: &BandScale,
) -> Vec<LabelElement> {
    // input index -> has a copy edge
    let mut inputs: BTreeMap<usize, bool> = BTreeMap::new();
    let mut outputs: HashSet<usize> = HashSet::new();
    for edge in edges.iter().filter(|e| !e.classes.contains("muted")) {
        let copy = inputs.entry(edge.input_index).or_insert(false);
        *copy |= edge.classes.contains("copy");
        outputs.insert(edge.output_index);
    }

    let mut labels = Vec::new();
    let mut used = HashSet::new();
    let label_x = input_x - config.zoom_selector_gap * 2.0 - config.zoom_selector_width;
    for (position, record) in data.input_records.iter().enumerate() {
        let Some(&copy) = inputs.get(&record.index) else {
            continue;
        };
        labels.push(LabelElement {
            column: Column::Input,
            index: record.index,
            x: label_x - config.label_offset,
            y: claim_row(&mut used, input_band, position, config.label_spacing),
            text: record.token.clone(),
            pos_tag: record.pos.clone(),
            anchor: TextAnchor::End,
            classes: ClassList::from_flags(&[("text", true), ("input-text", true), ("copy", copy)]),
        });
    }

    let mut used = HashSet::new();
    for (position, record) in data.output_records.iter().enumerate() {
        if !outputs.contains(&record.index) {
            continue;
        }
        labels.push(LabelElement {
            column: Column::Output,
            index: record.index,
            x: output_x + config.output_node_width + config.label_offset,
            y: claim_row(&mut used, output_band, position, config.label_spacing),
            text: record.token.clone(),
            pos_tag: record.pos.clone(),
            anchor: TextAnchor::Start,
            classes: ClassList::from_flags(&[
                ("text", true),
                ("output-text", true),
                ("novel", record.novel),
            ]),
        });
    }
    labels
}

fn claim_row(used: &mut HashSet<i64>, band: &BandScale, position: usize, spacing: i64) -> i64 {
    let mut y = band.position(position).round() as i64 + (band.bandwidth() / 2.0).round() as i64;
    while used.contains(&y) {
        y += 1;
    }
    for row in (y - spacing)..(y + spacing) {
        used.insert(row);
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_starts_and_ends_on_node_edges() {
        let d = curve(10.0, 5.0, 110.0, 45.0);
        assert_eq!(d, "M10.00,5.00C60.00,5.00 60.00,45.00 110.00,45.00");
    }

    #[test]
    fn crowded_labels_are_pushed_apart() {
        let band = BandScale::new(100, (0.0, 100.0));
        let mut used = HashSet::new();
        let first = claim_row(&mut used, &band, 10, 10);
        let second = claim_row(&mut used, &band, 11, 10);
        assert_eq!(first, 11);
        assert!(second >= first + 10);
    }
}
