use crate::error::{IndexError, Result};
use flowmap_protocol::AttentionDataset;

/// Working copy restricted to input tokens whose dataset index lies in
/// `[start, end]`. Edges leaving the range are dropped, output tokens are
/// kept as they are.
pub fn slice_by_input_range(
    dataset: &AttentionDataset,
    start: usize,
    end: usize,
) -> Result<AttentionDataset> {
    if start > end {
        return Err(IndexError::InvalidRange { start, end });
    }
    let in_range = |index: usize| (start..=end).contains(&index);

    let input_tokens: Vec<_> = dataset
        .input_tokens
        .iter()
        .filter(|t| in_range(t.index))
        .cloned()
        .collect();
    let attention_records: Vec<_> = dataset
        .attention_records
        .iter()
        .filter(|e| in_range(e.input_index))
        .copied()
        .collect();

    log::debug!(
        "sliced input range [{start}, {end}]: {} of {} tokens, {} of {} edges",
        input_tokens.len(),
        dataset.input_tokens.len(),
        attention_records.len(),
        dataset.attention_records.len()
    );

    Ok(AttentionDataset {
        attention_records,
        input_tokens,
        output_tokens: dataset.output_tokens.clone(),
    })
}
