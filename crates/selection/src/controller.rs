use crate::sink::SelectionSink;
use flowmap_index::{
    slice_by_input_range, EdgePredicate, FlowmapData, IndexFilter, Result, TokenLookup,
};
use flowmap_protocol::AttentionDataset;
use serde::Serialize;

pub const DEFAULT_WEIGHT_THRESHOLD: f64 = 0.05;
pub const MIN_WEIGHT_THRESHOLD: f64 = 1e-6;

/// Snapshot of everything the views need besides the derived records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionState {
    pub filtered: bool,
    pub locked: bool,
    pub weight_threshold: f64,
    pub text_resizing: bool,
    /// Inclusive input index range currently shown, `None` when unzoomed.
    pub zoom: Option<(usize, usize)>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            filtered: false,
            locked: false,
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
            text_resizing: false,
            zoom: None,
        }
    }
}

/// Owns the loaded dataset, its zoomed working copy and the selection
/// state, and re-derives every record set after each change.
///
/// Two counters let renderers pick a redraw mode: `revision` moves on any
/// change, `structure_revision` only when edge or node membership can
/// change (threshold, zoom, new dataset).
#[derive(Debug, Clone)]
pub struct SelectionController {
    source: AttentionDataset,
    working: AttentionDataset,
    predicate: EdgePredicate,
    state: SelectionState,
    data: FlowmapData,
    revision: u64,
    structure_revision: u64,
}

impl SelectionController {
    pub fn new(dataset: AttentionDataset) -> Result<Self> {
        Self::with_threshold(dataset, DEFAULT_WEIGHT_THRESHOLD)
    }

    pub fn with_threshold(dataset: AttentionDataset, weight_threshold: f64) -> Result<Self> {
        let state = SelectionState {
            weight_threshold: clamp_threshold(weight_threshold).unwrap_or(DEFAULT_WEIGHT_THRESHOLD),
            ..SelectionState::default()
        };
        let data = derive(&dataset, &EdgePredicate::All, state.weight_threshold)?;
        log::info!(
            "loaded dataset: {} input tokens, {} output tokens, {} attention records",
            dataset.input_tokens.len(),
            dataset.output_tokens.len(),
            dataset.attention_records.len()
        );
        Ok(Self {
            working: dataset.clone(),
            source: dataset,
            predicate: EdgePredicate::All,
            state,
            data,
            revision: 0,
            structure_revision: 0,
        })
    }

    /// Swap in a freshly loaded dataset. Filter, lock and zoom reset; the
    /// weight threshold is kept.
    pub fn replace_dataset(&mut self, dataset: AttentionDataset) -> Result<()> {
        let data = derive(&dataset, &EdgePredicate::All, self.state.weight_threshold)?;
        self.working = dataset.clone();
        self.source = dataset;
        self.predicate = EdgePredicate::All;
        self.state = SelectionState {
            weight_threshold: self.state.weight_threshold,
            ..SelectionState::default()
        };
        self.data = data;
        self.bump_structure();
        Ok(())
    }

    pub fn data(&self) -> &FlowmapData {
        &self.data
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn predicate(&self) -> EdgePredicate {
        self.predicate
    }

    /// Working dataset, restricted to the zoom range if one is applied.
    pub fn dataset(&self) -> &AttentionDataset {
        &self.working
    }

    pub fn source(&self) -> &AttentionDataset {
        &self.source
    }

    pub fn filtered(&self) -> bool {
        self.state.filtered
    }

    pub fn weight_threshold(&self) -> f64 {
        self.state.weight_threshold
    }

    pub fn text_resizing(&self) -> bool {
        self.state.text_resizing
    }

    pub fn zoom_range(&self) -> Option<(usize, usize)> {
        self.state.zoom
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn structure_revision(&self) -> u64 {
        self.structure_revision
    }

    pub fn reset_zoom(&mut self) {
        if self.state.zoom.is_none() {
            return;
        }
        self.working = self.source.clone();
        self.state.zoom = None;
        log::info!("zoom cleared");
        self.rederive();
        self.bump_structure();
    }

    fn install(&mut self, predicate: EdgePredicate, filtered: bool) {
        self.predicate = predicate;
        self.state.filtered = filtered;
        self.rederive();
        self.bump();
    }

    fn rederive(&mut self) {
        match derive(&self.working, &self.predicate, self.state.weight_threshold) {
            Ok(data) => {
                log::debug!(
                    "re-derived {:?}: {} edges over threshold {}",
                    self.predicate,
                    data.attention_records.len(),
                    self.state.weight_threshold
                );
                self.data = data;
            }
            // The working copy is always a slice of a validated source, so
            // this only fires if that invariant is broken.
            Err(err) => log::error!("derivation failed, keeping previous records: {err}"),
        }
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn bump_structure(&mut self) {
        self.revision += 1;
        self.structure_revision += 1;
    }
}

impl SelectionSink for SelectionController {
    fn filter_by_output_index(&mut self, filter: Option<IndexFilter>) {
        match filter {
            Some(filter) => self.install(EdgePredicate::Output { filter }, true),
            None => self.install(EdgePredicate::All, false),
        }
    }

    fn filter_by_input_index(&mut self, filter: Option<IndexFilter>) {
        match filter {
            Some(filter) => self.install(EdgePredicate::Input { filter }, true),
            None => self.install(EdgePredicate::All, false),
        }
    }

    fn filter_by_edge_token_match(&mut self, same: bool) {
        self.install(EdgePredicate::TokenMatch { same }, true);
    }

    fn lock(&mut self, locked: bool) {
        if self.state.locked != locked {
            log::debug!("lock -> {locked}");
            self.state.locked = locked;
            self.bump();
        }
    }

    fn set_weight_threshold(&mut self, threshold: f64) {
        let Some(threshold) = clamp_threshold(threshold) else {
            log::warn!("ignoring non-finite weight threshold");
            return;
        };
        if threshold == self.state.weight_threshold {
            return;
        }
        self.state.weight_threshold = threshold;
        self.rederive();
        self.bump_structure();
    }

    fn set_text_resizing(&mut self, resizing: bool) {
        if self.state.text_resizing != resizing {
            self.state.text_resizing = resizing;
            self.bump();
        }
    }

    fn zoom_by_input_index(&mut self, start: usize, end: usize) {
        let Some((min, max)) = self.source.input_index_bounds() else {
            log::warn!("zoom rejected: no input tokens");
            return;
        };
        let (lo, hi) = (start.min(end).max(min), start.max(end).min(max));
        if lo > hi {
            log::warn!("zoom rejected: [{start}, {end}] is outside [{min}, {max}]");
            return;
        }
        let (start, end) = (lo, hi);
        if (start, end) == (min, max) {
            self.reset_zoom();
            return;
        }
        match slice_by_input_range(&self.source, start, end) {
            Ok(working) => {
                log::info!(
                    "zoomed to input range [{start}, {end}] ({} tokens)",
                    working.input_tokens.len()
                );
                self.working = working;
                self.state.zoom = Some((start, end));
                self.rederive();
                self.bump_structure();
            }
            Err(err) => log::warn!("zoom rejected: {err}"),
        }
    }

    fn locked(&self) -> bool {
        self.state.locked
    }

    fn output_selected(&self, index: usize) -> bool {
        self.data.output_record(index).is_some_and(|r| r.selected)
    }

    fn input_selected(&self, index: usize) -> bool {
        self.data.input_record(index).is_some_and(|r| r.selected)
    }

    fn output_filter(&self) -> Option<IndexFilter> {
        match self.predicate {
            EdgePredicate::Output { filter } => Some(filter),
            _ => None,
        }
    }
}

fn clamp_threshold(threshold: f64) -> Option<f64> {
    if threshold.is_nan() {
        return None;
    }
    Some(threshold.clamp(MIN_WEIGHT_THRESHOLD, 1.0))
}

/// Build the frame records for `(dataset, predicate, threshold)`.
///
/// The filtered column keeps its unfiltered weights so its colouring does
/// not collapse onto the selection; the opposite column sums only admitted
/// edges. Aggregates count edges at or above the threshold only.
fn derive(
    dataset: &AttentionDataset,
    predicate: &EdgePredicate,
    weight_threshold: f64,
) -> Result<FlowmapData> {
    let lookup = TokenLookup::new(dataset)?;
    let active = (!predicate.is_all()).then_some(predicate);

    let (mut inputs, mut outputs) = match predicate {
        EdgePredicate::Output { .. } => (
            lookup.input_records(active, weight_threshold),
            lookup.output_records(None, weight_threshold),
        ),
        EdgePredicate::Input { .. } => (
            lookup.input_records(None, weight_threshold),
            lookup.output_records(active, weight_threshold),
        ),
        EdgePredicate::All | EdgePredicate::TokenMatch { .. } => (
            lookup.input_records(active, weight_threshold),
            lookup.output_records(active, weight_threshold),
        ),
    };

    match predicate {
        EdgePredicate::Output { filter } => {
            for record in &mut outputs {
                record.selected = filter.contains(record.index);
            }
        }
        EdgePredicate::Input { filter } => {
            for record in &mut inputs {
                record.selected = filter.contains(record.index);
            }
        }
        EdgePredicate::All | EdgePredicate::TokenMatch { .. } => {}
    }

    let edges = lookup.flow_edges(weight_threshold, active);
    let mut data = FlowmapData::new(inputs, outputs, edges);

    if active.is_some() {
        let touched: Vec<(Option<usize>, Option<usize>)> = data
            .attention_records
            .iter()
            .filter(|e| e.selected)
            .map(|e| {
                (
                    data.input_position(e.input_index),
                    data.output_position(e.output_index),
                )
            })
            .collect();
        for (input, output) in touched {
            if let Some(pos) = input {
                data.input_records[pos].selected = true;
            }
            if let Some(pos) = output {
                data.output_records[pos].selected = true;
            }
        }
    }

    Ok(data)
}
