use flowmap_selection::SelectionSink;

/// Legend and whitespace actions of the control panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlPanel;

impl ControlPanel {
    /// Select and lock every copy (or non-copy) edge.
    pub fn legend_click(same: bool, sink: &mut dyn SelectionSink) {
        sink.lock(false);
        sink.filter_by_edge_token_match(same);
        sink.lock(true);
    }

    /// Clicking the panel itself releases a locked selection.
    pub fn panel_click(sink: &mut dyn SelectionSink) {
        if sink.locked() {
            sink.lock(false);
            sink.filter_by_output_index(None);
        }
    }
}
