use crate::error::{IndexError, Result};
use crate::types::{EdgePredicate, FlowmapAttentionRecord, InputRecord, OutputRecord};
use flowmap_protocol::{AttentionDataset, AttentionRecord};
use std::collections::{HashMap, HashSet};

/// Position lookups for one dataset.
///
/// Construction resolves every attention record against the token arrays
/// and fails on the first dangling reference.
pub struct TokenLookup<'a> {
    dataset: &'a AttentionDataset,
    input_positions: HashMap<usize, usize>,
    output_positions: HashMap<usize, usize>,
}

impl<'a> TokenLookup<'a> {
    pub fn new(dataset: &'a AttentionDataset) -> Result<Self> {
        let input_positions: HashMap<usize, usize> = dataset
            .input_tokens
            .iter()
            .enumerate()
            .map(|(pos, t)| (t.index, pos))
            .collect();
        let output_positions: HashMap<usize, usize> = dataset
            .output_tokens
            .iter()
            .enumerate()
            .map(|(pos, t)| (t.index, pos))
            .collect();

        for (record, edge) in dataset.attention_records.iter().enumerate() {
            if !input_positions.contains_key(&edge.input_index) {
                return Err(IndexError::DanglingInputIndex {
                    record,
                    index: edge.input_index,
                });
            }
            if !output_positions.contains_key(&edge.output_index) {
                return Err(IndexError::DanglingOutputIndex {
                    record,
                    index: edge.output_index,
                });
            }
        }

        Ok(Self {
            dataset,
            input_positions,
            output_positions,
        })
    }

    pub fn dataset(&self) -> &'a AttentionDataset {
        self.dataset
    }

    pub fn input_token(&self, index: usize) -> Option<&'a str> {
        self.input_positions
            .get(&index)
            .map(|&pos| self.dataset.input_tokens[pos].token.as_str())
    }

    pub fn output_token(&self, index: usize) -> Option<&'a str> {
        self.output_positions
            .get(&index)
            .map(|&pos| self.dataset.output_tokens[pos].token.as_str())
    }

    pub fn is_copy(&self, edge: &AttentionRecord) -> bool {
        match (
            self.input_token(edge.input_index),
            self.output_token(edge.output_index),
        ) {
            (Some(input), Some(output)) => input == output,
            _ => false,
        }
    }

    pub fn admits(&self, predicate: &EdgePredicate, edge: &AttentionRecord) -> bool {
        match predicate {
            EdgePredicate::All => true,
            EdgePredicate::Output { filter } => filter.contains(edge.output_index),
            EdgePredicate::Input { filter } => filter.contains(edge.input_index),
            EdgePredicate::TokenMatch { same } => self.is_copy(edge) == *same,
        }
    }

    /// Per-input-token weight sums over admitted edges, aligned with
    /// `inputTokens`. Tokens without admitted edges get 0.
    pub fn input_records(
        &self,
        predicate: Option<&EdgePredicate>,
        min_weight: f64,
    ) -> Vec<InputRecord> {
        let sums = self.sum_weights(predicate, min_weight, |e| e.input_index);
        self.dataset
            .input_tokens
            .iter()
            .map(|t| InputRecord::from_text(t, sums.get(&t.index).copied().unwrap_or(0.0)))
            .collect()
    }

    pub fn output_records(
        &self,
        predicate: Option<&EdgePredicate>,
        min_weight: f64,
    ) -> Vec<OutputRecord> {
        let sums = self.sum_weights(predicate, min_weight, |e| e.output_index);
        let input_vocab: HashSet<&str> = self
            .dataset
            .input_tokens
            .iter()
            .map(|t| t.token.as_str())
            .collect();
        self.dataset
            .output_tokens
            .iter()
            .map(|t| {
                OutputRecord::from_text(
                    t,
                    sums.get(&t.index).copied().unwrap_or(0.0),
                    !input_vocab.contains(t.token.as_str()),
                )
            })
            .collect()
    }

    pub fn flow_edges(
        &self,
        weight_threshold: f64,
        select: Option<&EdgePredicate>,
    ) -> Vec<FlowmapAttentionRecord> {
        self.dataset
            .attention_records
            .iter()
            .filter(|e| e.weight >= weight_threshold)
            .enumerate()
            .map(|(index, e)| FlowmapAttentionRecord {
                input_index: e.input_index,
                output_index: e.output_index,
                weight: e.weight,
                index,
                selected: select.map_or(true, |p| self.admits(p, e)),
            })
            .collect()
    }

    fn sum_weights(
        &self,
        predicate: Option<&EdgePredicate>,
        min_weight: f64,
        key: impl Fn(&AttentionRecord) -> usize,
    ) -> HashMap<usize, f64> {
        let mut sums: HashMap<usize, f64> = HashMap::new();
        for edge in &self.dataset.attention_records {
            if edge.weight < min_weight {
                continue;
            }
            if predicate.map_or(true, |p| self.admits(p, edge)) {
                *sums.entry(key(edge)).or_insert(0.0) += edge.weight;
            }
        }
        sums
    }
}

/// Input tokens with the summed weight of every admitted edge.
pub fn compute_input_records(
    dataset: &AttentionDataset,
    predicate: Option<&EdgePredicate>,
) -> Result<Vec<InputRecord>> {
    Ok(TokenLookup::new(dataset)?.input_records(predicate, 0.0))
}

pub fn compute_output_records(
    dataset: &AttentionDataset,
    predicate: Option<&EdgePredicate>,
) -> Result<Vec<OutputRecord>> {
    Ok(TokenLookup::new(dataset)?.output_records(predicate, 0.0))
}

/// Edges at or above `weight_threshold`, keyed by their position in the
/// kept array. Without a predicate every edge is marked selected.
pub fn compute_flow_edges(
    dataset: &AttentionDataset,
    weight_threshold: f64,
    select: Option<&EdgePredicate>,
) -> Result<Vec<FlowmapAttentionRecord>> {
    Ok(TokenLookup::new(dataset)?.flow_edges(weight_threshold, select))
}

/// Upper bound for a sequential colour domain. A zero (or empty) maximum
/// is clamped to 1.
pub fn weight_domain_max<I>(weights: I, factor: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let max = weights
        .into_iter()
        .filter(|w| w.is_finite())
        .fold(0.0_f64, f64::max)
        * factor;
    if max > 0.0 {
        max
    } else {
        1.0
    }
}
