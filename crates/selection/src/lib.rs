//! Selection state machine for the attention flowmap.
//!
//! `{unfiltered, filtered} × {unlocked, locked}` plus a continuous weight
//! threshold and an optional input zoom range. Every operation re-derives
//! the record sets synchronously through `flowmap-index`.

mod controller;
mod sink;

pub use controller::{
    SelectionController, SelectionState, DEFAULT_WEIGHT_THRESHOLD, MIN_WEIGHT_THRESHOLD,
};
pub use sink::SelectionSink;
