//! Pointer gesture tracking for the flowmap node columns.
//!
//! The tracker only remembers where a brush started and where the pointer
//! was last seen; the selection itself always lives in the controller and
//! is read back through [`SelectionSink`].

use crate::scene::Column;
use flowmap_index::IndexFilter;
use flowmap_selection::SelectionSink;

/// Pointer events the flowmap reacts to, already resolved to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter { column: Column, index: usize },
    Down { column: Column, index: usize },
    Up { column: Column, index: usize },
    Click { column: Column, index: usize },
    /// The pointer left the group of nodes of one column.
    LeaveNodes { column: Column },
    /// Click on empty chart space.
    BackgroundClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Hovering {
        index: usize,
    },
    Brushing,
}

/// `anchor`/`end` bound the output brush; `prev` is the last node entered
/// while dragging a locked brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureTracker {
    phase: GesturePhase,
    anchor: usize,
    end: usize,
    prev: usize,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn brushing(&self) -> bool {
        matches!(self.phase, GesturePhase::Brushing)
    }

    /// Current brush as an output filter.
    pub fn brush(&self) -> IndexFilter {
        IndexFilter::range(self.anchor, self.end)
    }

    /// Cancel any gesture, e.g. after the node set was rebuilt.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply one event. `output_bounds` is the inclusive output index
    /// domain used to clamp a translated brush.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        sink: &mut dyn SelectionSink,
        output_bounds: Option<(usize, usize)>,
    ) {
        match event {
            PointerEvent::Enter { column: Column::Output, index } => {
                self.enter_output(index, sink, output_bounds)
            }
            PointerEvent::Down { column: Column::Output, index } => self.down_output(index, sink),
            PointerEvent::Up { column: Column::Output, index } => self.up_output(index, sink),
            PointerEvent::Click { column: Column::Output, .. } => {}

            PointerEvent::Enter { column: Column::Input, index } => {
                if !sink.locked() && !self.brushing() {
                    self.phase = GesturePhase::Hovering { index };
                    sink.filter_by_input_index(Some(IndexFilter::single(index)));
                }
            }
            PointerEvent::Down { column: Column::Input, .. } => {}
            PointerEvent::Up { column: Column::Input, index } => {
                if self.brushing() {
                    self.phase = GesturePhase::Hovering { index };
                }
            }
            PointerEvent::Click { column: Column::Input, .. } => {
                let locked = sink.locked();
                sink.lock(!locked);
            }

            PointerEvent::LeaveNodes { column } => {
                if sink.locked() || self.brushing() {
                    return;
                }
                self.phase = GesturePhase::Idle;
                match column {
                    Column::Output => sink.filter_by_output_index(None),
                    Column::Input => sink.filter_by_input_index(None),
                }
            }
            PointerEvent::BackgroundClick => {
                self.phase = GesturePhase::Idle;
                sink.filter_by_output_index(None);
                sink.lock(false);
            }
        }
    }

    fn enter_output(
        &mut self,
        index: usize,
        sink: &mut dyn SelectionSink,
        bounds: Option<(usize, usize)>,
    ) {
        if sink.locked() {
            if !self.brushing() {
                return;
            }
            // drag the locked brush without resizing it
            let delta = clamp_shift(
                index as i64 - self.prev as i64,
                self.anchor.min(self.end),
                self.anchor.max(self.end),
                bounds,
            );
            self.anchor = shift(self.anchor, delta);
            self.end = shift(self.end, delta);
            self.prev = index;
            sink.filter_by_output_index(Some(self.brush()));
        } else if self.brushing() {
            self.end = index;
            sink.filter_by_output_index(Some(self.brush()));
        } else {
            self.anchor = index;
            self.end = index;
            self.prev = index;
            self.phase = GesturePhase::Hovering { index };
            sink.filter_by_output_index(Some(IndexFilter::single(index)));
        }
    }

    fn down_output(&mut self, index: usize, sink: &mut dyn SelectionSink) {
        let locked = sink.locked();
        if locked {
            self.prev = index;
        }
        if sink.output_selected(index) {
            if locked {
                // the locked range may come from another view
                let (start, end) = sink.output_filter().map_or((index, index), |f| f.bounds());
                self.anchor = start;
                self.end = end;
            }
            // grab a locked brush, or start extending the hovered one
            self.phase = GesturePhase::Brushing;
            return;
        }
        self.anchor = index;
        self.end = index;
        self.prev = index;
        self.phase = if locked {
            GesturePhase::Hovering { index }
        } else {
            GesturePhase::Brushing
        };
        sink.lock(false);
        sink.filter_by_output_index(Some(IndexFilter::single(index)));
    }

    fn up_output(&mut self, index: usize, sink: &mut dyn SelectionSink) {
        let was_brushing = self.brushing();
        self.phase = GesturePhase::Hovering { index };
        if !sink.locked() {
            self.end = index;
        }
        if was_brushing && sink.output_selected(index) {
            sink.lock(true);
        }
    }
}

/// Largest part of `delta` that keeps `[lo, hi]` inside `bounds`
/// (or above zero when no bounds are known).
fn clamp_shift(delta: i64, lo: usize, hi: usize, bounds: Option<(usize, usize)>) -> i64 {
    let (min, max) = bounds.map_or((0, i64::MAX), |(a, b)| (a as i64, b as i64));
    let lowest = min - lo as i64;
    let highest = max - hi as i64;
    if lowest > highest {
        return 0;
    }
    delta.clamp(lowest, highest)
}

fn shift(index: usize, delta: i64) -> usize {
    (index as i64 + delta).max(0) as usize
}
