use crate::palette::{Palette, Rgb};
use crate::scale::SequentialScale;
use crate::scene::ClassList;
use flowmap_index::{weight_domain_max, FlowmapData, IndexFilter};
use flowmap_selection::{SelectionSink, SelectionState};
use std::collections::HashSet;

/// Pointer events on a token panel. Indices are dataset token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEvent {
    Enter(usize),
    Down(usize),
    Up(usize),
    Click(usize),
    LeavePanel,
    /// Click on panel whitespace.
    PanelClick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub index: usize,
    pub text: String,
    pub background: Rgb,
    pub classes: ClassList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPanelView {
    pub tokens: Vec<TokenSpan>,
    /// The minimap is skipped while a resize drag is in flight.
    pub show_minimap: bool,
}

/// Source tokens coloured by received attention.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTextPanel;

impl InputTextPanel {
    pub fn view(data: &FlowmapData, state: &SelectionState, weight_factor: f64) -> TextPanelView {
        let scale = SequentialScale::new(
            Palette::Blues,
            weight_domain_max(data.input_records.iter().map(|r| r.weight), weight_factor),
        );
        let on_flowmap: HashSet<usize> = data
            .attention_records
            .iter()
            .map(|e| e.input_index)
            .collect();
        let tokens = data
            .input_records
            .iter()
            .map(|record| TokenSpan {
                index: record.index,
                text: format!("{} ", record.token),
                background: scale.color(record.weight),
                classes: ClassList::from_flags(&[
                    ("token", true),
                    ("selected", state.filtered && record.selected),
                    ("on-flowmap", on_flowmap.contains(&record.index)),
                ]),
            })
            .collect();
        TextPanelView {
            tokens,
            show_minimap: !state.text_resizing,
        }
    }

    pub fn handle(&self, event: TextEvent, sink: &mut dyn SelectionSink) {
        match event {
            TextEvent::Enter(index) => {
                if !sink.locked() {
                    sink.filter_by_input_index(Some(IndexFilter::single(index)));
                }
            }
            TextEvent::Click(_) => {
                let locked = sink.locked();
                sink.lock(!locked);
            }
            TextEvent::LeavePanel => {
                if !sink.locked() {
                    sink.filter_by_input_index(None);
                }
            }
            TextEvent::PanelClick => {
                sink.filter_by_input_index(None);
                sink.lock(false);
            }
            TextEvent::Down(_) | TextEvent::Up(_) => {}
        }
    }
}

/// Generated tokens; supports drag-brushing a contiguous range.
///
/// Keeps its own anchor, independent of the flowmap's gesture tracker, but
/// builds the same [`IndexFilter`] for the same range.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputTextPanel {
    anchor: Option<usize>,
    brushing: bool,
}

impl OutputTextPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brushing(&self) -> bool {
        self.brushing
    }

    pub fn view(
        &self,
        data: &FlowmapData,
        state: &SelectionState,
        weight_factor: f64,
    ) -> TextPanelView {
        let scale = SequentialScale::new(
            Palette::Purples,
            weight_domain_max(data.output_records.iter().map(|r| r.weight), weight_factor),
        );
        let tokens = data
            .output_records
            .iter()
            .map(|record| TokenSpan {
                index: record.index,
                text: format!("{} ", record.token),
                background: scale.color(record.weight),
                classes: ClassList::from_flags(&[
                    ("token", true),
                    ("selected", record.selected),
                    ("novel", record.novel),
                    ("extendable", self.brushing && !state.locked),
                ]),
            })
            .collect();
        TextPanelView {
            tokens,
            show_minimap: !state.text_resizing,
        }
    }

    pub fn handle(&mut self, event: TextEvent, sink: &mut dyn SelectionSink) {
        match event {
            TextEvent::Enter(index) => {
                if sink.locked() {
                    return;
                }
                let filter = match (self.brushing, self.anchor) {
                    (true, Some(anchor)) => IndexFilter::range(anchor, index),
                    _ => IndexFilter::single(index),
                };
                sink.filter_by_output_index(Some(filter));
            }
            TextEvent::Down(index) => {
                if sink.locked() {
                    return;
                }
                self.anchor = Some(index);
                self.brushing = true;
                sink.filter_by_output_index(Some(IndexFilter::single(index)));
            }
            TextEvent::Up(index) => {
                let dragged = self.brushing && self.anchor.is_some_and(|a| a != index);
                self.brushing = false;
                if dragged && !sink.locked() {
                    sink.lock(true);
                }
            }
            TextEvent::Click(_) => {
                let locked = sink.locked();
                sink.lock(!locked);
            }
            TextEvent::LeavePanel => {
                self.brushing = false;
                if !sink.locked() {
                    sink.filter_by_output_index(None);
                }
            }
            TextEvent::PanelClick => {
                sink.filter_by_output_index(None);
                sink.lock(false);
            }
        }
    }
}
