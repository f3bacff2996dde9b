use flowmap_protocol::TextRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Selects token indices of one column.
///
/// Every brushing surface builds its filter through [`IndexFilter::range`],
/// so the same anchor/end pair yields the same filter no matter which
/// panel produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IndexFilter {
    Single { index: usize },
    Range { start: usize, end: usize },
}

impl IndexFilter {
    pub fn single(index: usize) -> Self {
        Self::Single { index }
    }

    /// Inclusive range between two indices in either order. A degenerate
    /// range collapses to [`IndexFilter::Single`].
    pub fn range(anchor: usize, other: usize) -> Self {
        if anchor == other {
            return Self::single(anchor);
        }
        Self::Range {
            start: anchor.min(other),
            end: anchor.max(other),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        match *self {
            Self::Single { index: selected } => selected == index,
            Self::Range { start, end } => (start..=end).contains(&index),
        }
    }

    /// Inclusive `(start, end)` covered by the filter.
    pub fn bounds(&self) -> (usize, usize) {
        match *self {
            Self::Single { index } => (index, index),
            Self::Range { start, end } => (start, end),
        }
    }
}

/// Which attention records are admitted by the active selection.
///
/// Only one predicate is active at a time; filters never compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EdgePredicate {
    #[default]
    All,
    Output { filter: IndexFilter },
    Input { filter: IndexFilter },
    /// `(input token == output token) == same`
    TokenMatch { same: bool },
}

impl EdgePredicate {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub index: usize,
    pub token: String,
    pub pos: String,
    pub weight: f64,
    pub selected: bool,
}

impl InputRecord {
    pub(crate) fn from_text(text: &TextRecord, weight: f64) -> Self {
        Self {
            index: text.index,
            token: text.token.clone(),
            pos: text.pos.clone(),
            weight,
            selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub index: usize,
    pub token: String,
    pub pos: String,
    pub weight: f64,
    pub selected: bool,
    /// The token does not occur anywhere in the input sequence.
    pub novel: bool,
}

impl OutputRecord {
    pub(crate) fn from_text(text: &TextRecord, weight: f64, novel: bool) -> Self {
        Self {
            index: text.index,
            token: text.token.clone(),
            pos: text.pos.clone(),
            weight,
            selected: false,
            novel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowmapAttentionRecord {
    pub input_index: usize,
    pub output_index: usize,
    pub weight: f64,
    /// Position in the threshold-filtered edge array; stable render key.
    pub index: usize,
    pub selected: bool,
}

/// Render-ready records for one frame, with position lookups from dataset
/// token index to array position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowmapData {
    pub input_records: Vec<InputRecord>,
    pub output_records: Vec<OutputRecord>,
    pub attention_records: Vec<FlowmapAttentionRecord>,
    input_positions: HashMap<usize, usize>,
    output_positions: HashMap<usize, usize>,
}

impl FlowmapData {
    pub fn new(
        input_records: Vec<InputRecord>,
        output_records: Vec<OutputRecord>,
        attention_records: Vec<FlowmapAttentionRecord>,
    ) -> Self {
        let input_positions = input_records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.index, pos))
            .collect();
        let output_positions = output_records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.index, pos))
            .collect();
        Self {
            input_records,
            output_records,
            attention_records,
            input_positions,
            output_positions,
        }
    }

    pub fn input_position(&self, index: usize) -> Option<usize> {
        self.input_positions.get(&index).copied()
    }

    pub fn output_position(&self, index: usize) -> Option<usize> {
        self.output_positions.get(&index).copied()
    }

    pub fn input_record(&self, index: usize) -> Option<&InputRecord> {
        self.input_position(index).map(|pos| &self.input_records[pos])
    }

    pub fn output_record(&self, index: usize) -> Option<&OutputRecord> {
        self.output_position(index)
            .map(|pos| &self.output_records[pos])
    }

    /// The edge joins two tokens with the same surface form.
    pub fn is_copy_edge(&self, edge: &FlowmapAttentionRecord) -> bool {
        match (
            self.input_record(edge.input_index),
            self.output_record(edge.output_index),
        ) {
            (Some(input), Some(output)) => input.token == output.token,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input_records.is_empty() && self.output_records.is_empty()
    }
}
