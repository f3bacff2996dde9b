use flowmap_selection::SelectionSink;

/// Which part of the range selector is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomHandle {
    Start,
    End,
    /// The whole selection, grabbed at `origin` with the range it had then.
    Body {
        origin: usize,
        start: usize,
        end: usize,
    },
}

/// Draggable input-range selector. Works in dataset index units; the
/// caller maps pointer positions through [`ZoomSelector::index_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomSelector {
    domain: Option<(usize, usize)>,
    range: Option<(usize, usize)>,
    drag: Option<ZoomHandle>,
}

impl ZoomSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self) -> Option<(usize, usize)> {
        self.domain
    }

    /// Selected range, defaulting to the whole domain.
    pub fn range(&self) -> Option<(usize, usize)> {
        self.range.or(self.domain)
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Adopt the controller's domain and zoom unless a drag is in flight.
    pub fn sync(&mut self, domain: Option<(usize, usize)>, zoom: Option<(usize, usize)>) {
        if self.dragging() {
            return;
        }
        self.domain = domain;
        self.range = match (domain, zoom) {
            (Some((min, max)), Some((start, end))) if start.max(min) <= end.min(max) => {
                Some((start.max(min), end.min(max)))
            }
            _ => None,
        };
    }

    /// Index under pixel `y` of a track `height` pixels tall.
    pub fn index_at(&self, y: f64, height: f64) -> Option<usize> {
        let (min, max) = self.domain?;
        if height <= 0.0 {
            return Some(min);
        }
        let span = (max - min + 1) as f64;
        let offset = ((y / height).clamp(0.0, 1.0) * span).floor() as usize;
        Some((min + offset).min(max))
    }

    /// Pixel span `(y0, y1)` of `[start, end]` on a track `height` tall.
    pub fn pixel_span(&self, start: usize, end: usize, height: f64) -> Option<(f64, f64)> {
        let (min, max) = self.domain?;
        let span = (max - min + 1) as f64;
        let y0 = (start.saturating_sub(min)) as f64 / span * height;
        let y1 = (end.saturating_sub(min) + 1) as f64 / span * height;
        Some((y0, y1.min(height)))
    }

    pub fn begin_drag(&mut self, handle: ZoomHandle, sink: &mut dyn SelectionSink) {
        if self.domain.is_none() {
            return;
        }
        log::debug!("zoom drag started on {handle:?}");
        self.drag = Some(handle);
        sink.set_text_resizing(true);
    }

    pub fn drag_to(&mut self, index: usize) {
        let (Some(handle), Some((min, max)), Some((start, end))) =
            (self.drag, self.domain, self.range())
        else {
            return;
        };
        let index = index.clamp(min, max);
        self.range = Some(match handle {
            ZoomHandle::Start => (index.min(end), end),
            ZoomHandle::End => (start, index.max(start)),
            ZoomHandle::Body { origin, start, end } => {
                let width = end.saturating_sub(start).min(max - min);
                let shifted = start as i64 + index as i64 - origin as i64;
                let new_start = shifted.clamp(min as i64, (max - width) as i64) as usize;
                (new_start, new_start + width)
            }
        });
    }

    /// Finish the drag and apply the selected range.
    pub fn end_drag(&mut self, sink: &mut dyn SelectionSink) {
        if self.drag.take().is_none() {
            return;
        }
        sink.set_text_resizing(false);
        if let Some((start, end)) = self.range() {
            sink.zoom_by_input_index(start, end);
        }
    }
}
