//! # Flowmap Index
//!
//! Pure derivation of render-ready records from an attention payload.
//!
//! ```text
//! AttentionDataset
//!     │
//!     ├──> TokenLookup (resolve every edge endpoint, fail on dangling refs)
//!     │
//!     ├──> InputRecord[]   (per-token weight sums over admitted edges)
//!     ├──> OutputRecord[]  (same, plus novelty against the input vocabulary)
//!     └──> FlowmapAttentionRecord[] (threshold-filtered, position-keyed)
//! ```
//!
//! Nothing here holds state: the same `(dataset, predicate, threshold)`
//! always yields the same records.

mod derive;
mod error;
mod types;
mod zoom;

pub use derive::{
    compute_flow_edges, compute_input_records, compute_output_records, weight_domain_max,
    TokenLookup,
};
pub use error::{IndexError, Result};
pub use types::{
    EdgePredicate, FlowmapAttentionRecord, FlowmapData, IndexFilter, InputRecord, OutputRecord,
};
pub use zoom::slice_by_input_range;
