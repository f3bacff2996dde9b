use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod sources;

pub use sources::{DataSourceRecord, DEMO_SOURCE_NAME, DEMO_SOURCE_URL};

/// One attention link between an input token and an output token.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttentionRecord {
    pub input_index: usize,
    pub output_index: usize,
    pub weight: f64,
}

impl AttentionRecord {
    pub fn new(input_index: usize, output_index: usize, weight: f64) -> Self {
        Self {
            input_index,
            output_index,
            weight,
        }
    }
}

/// A token as delivered by the dataset. `index` is dataset-assigned and
/// need not be contiguous.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct TextRecord {
    pub index: usize,
    pub token: String,
    #[serde(default)]
    pub pos: String,
}

impl TextRecord {
    pub fn new(index: usize, token: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            index,
            token: token.into(),
            pos: pos.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttentionDataset {
    #[serde(default)]
    pub attention_records: Vec<AttentionRecord>,
    #[serde(default)]
    pub input_tokens: Vec<TextRecord>,
    #[serde(default)]
    pub output_tokens: Vec<TextRecord>,
}

impl AttentionDataset {
    pub fn new(
        attention_records: Vec<AttentionRecord>,
        input_tokens: Vec<TextRecord>,
        output_tokens: Vec<TextRecord>,
    ) -> Self {
        Self {
            attention_records,
            input_tokens,
            output_tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input_tokens.is_empty() && self.output_tokens.is_empty()
    }

    /// Inclusive `(min, max)` of the input token indices, if any.
    pub fn input_index_bounds(&self) -> Option<(usize, usize)> {
        index_bounds(&self.input_tokens)
    }

    pub fn output_index_bounds(&self) -> Option<(usize, usize)> {
        index_bounds(&self.output_tokens)
    }

    /// Structural checks that hold for any well-formed payload: unique
    /// token indices per column and weights that are finite and inside
    /// `[0, 1]`. Edge endpoint resolution is checked during derivation.
    pub fn validate(&self) -> Result<()> {
        ensure_unique_indices("inputTokens", &self.input_tokens)?;
        ensure_unique_indices("outputTokens", &self.output_tokens)?;
        for (pos, record) in self.attention_records.iter().enumerate() {
            if !record.weight.is_finite() || !(0.0..=1.0).contains(&record.weight) {
                anyhow::bail!(
                    "attentionRecords[{pos}] has weight {} outside [0, 1]",
                    record.weight
                );
            }
        }
        Ok(())
    }
}

fn index_bounds(tokens: &[TextRecord]) -> Option<(usize, usize)> {
    let min = tokens.iter().map(|t| t.index).min()?;
    let max = tokens.iter().map(|t| t.index).max()?;
    Some((min, max))
}

fn ensure_unique_indices(field: &str, tokens: &[TextRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(tokens.len());
    for token in tokens {
        if !seen.insert(token.index) {
            anyhow::bail!("{field} contains duplicate index {}", token.index);
        }
    }
    Ok(())
}

/// Parse and validate an attention payload.
pub fn parse_dataset(raw: &str) -> Result<AttentionDataset> {
    let dataset: AttentionDataset =
        serde_json::from_str(raw).context("attention payload is not valid JSON")?;
    dataset.validate()?;
    Ok(dataset)
}

pub fn parse_dataset_slice(raw: &[u8]) -> Result<AttentionDataset> {
    let dataset: AttentionDataset =
        serde_json::from_slice(raw).context("attention payload is not valid JSON")?;
    dataset.validate()?;
    Ok(dataset)
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn dataset_schema() -> schemars::Schema {
    schemars::schema_for!(AttentionDataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "attentionRecords": [
            { "inputIndex": 0, "outputIndex": 0, "weight": 0.8 },
            { "inputIndex": 1, "outputIndex": 1, "weight": 0.9 }
        ],
        "inputTokens": [
            { "index": 0, "token": "the", "pos": "DT" },
            { "index": 1, "token": "cat", "pos": "NN" }
        ],
        "outputTokens": [
            { "index": 0, "token": "le", "pos": "DT" },
            { "index": 1, "token": "chat", "pos": "NN" }
        ]
    }"#;

    #[test]
    fn parses_camel_case_payload() {
        let dataset = parse_dataset(PAYLOAD).unwrap();
        assert_eq!(dataset.attention_records.len(), 2);
        assert_eq!(dataset.attention_records[1].input_index, 1);
        assert_eq!(dataset.input_tokens[1].token, "cat");
        assert_eq!(dataset.output_index_bounds(), Some((0, 1)));
    }

    #[test]
    fn missing_pos_defaults_to_empty() {
        let raw = r#"{ "inputTokens": [{ "index": 4, "token": "x" }] }"#;
        let dataset = parse_dataset(raw).unwrap();
        assert_eq!(dataset.input_tokens[0].pos, "");
        assert_eq!(dataset.input_index_bounds(), Some((4, 4)));
        assert!(dataset.attention_records.is_empty());
    }

    #[test]
    fn rejects_duplicate_indices() {
        let raw = r#"{ "inputTokens": [
            { "index": 2, "token": "a", "pos": "" },
            { "index": 2, "token": "b", "pos": "" }
        ] }"#;
        let err = parse_dataset(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate index 2"));
    }

    #[test]
    fn rejects_out_of_range_weight() {
        let raw = r#"{ "attentionRecords": [{ "inputIndex": 0, "outputIndex": 0, "weight": 1.5 }] }"#;
        assert!(parse_dataset(raw).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_dataset("{ not json").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn serializes_back_to_camel_case() {
        let dataset = parse_dataset(PAYLOAD).unwrap();
        let raw = serialize_json(&dataset).unwrap();
        assert!(raw.contains("\"attentionRecords\""));
        assert!(raw.contains("\"outputIndex\":1"));
    }
}
