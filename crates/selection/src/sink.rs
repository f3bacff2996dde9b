use flowmap_index::IndexFilter;

/// Callback surface exposed to every view that can change the selection.
///
/// Views never mutate each other; they only read through and call back
/// into this trait. Every method is total over a loaded dataset.
pub trait SelectionSink {
    fn filter_by_output_index(&mut self, filter: Option<IndexFilter>);

    fn filter_by_input_index(&mut self, filter: Option<IndexFilter>);

    fn filter_by_edge_token_match(&mut self, same: bool);

    fn lock(&mut self, locked: bool);

    fn set_weight_threshold(&mut self, threshold: f64);

    /// Raised while a panel or zoom handle is being dragged so expensive
    /// side renders can be skipped.
    fn set_text_resizing(&mut self, resizing: bool);

    fn zoom_by_input_index(&mut self, start: usize, end: usize);

    fn locked(&self) -> bool;

    fn output_selected(&self, index: usize) -> bool;

    fn input_selected(&self, index: usize) -> bool;

    /// Output filter of the active selection, if it is an output selection.
    fn output_filter(&self) -> Option<IndexFilter>;
}
