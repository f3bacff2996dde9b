use crate::commit::{plan, RedrawMode, Surface};
use crate::config::{FlowmapConfig, Size};
use crate::gesture::{GestureTracker, PointerEvent};
use crate::layout::{compute_scene, RenderInput};
use crate::scene::{Column, Scene};
use crate::zoom::{ZoomHandle, ZoomSelector};
use flowmap_selection::SelectionSink;

/// The flow map view: node columns, edges, gestures and the zoom selector.
///
/// `render` derives a [`Scene`] and commits the difference to a
/// [`Surface`]. A change of structure revision or surface size redraws
/// everything; anything else only restyles existing elements.
#[derive(Debug, Clone)]
pub struct Flowmap {
    config: FlowmapConfig,
    size: Size,
    tracker: GestureTracker,
    zoom: ZoomSelector,
    scene: Option<Scene>,
    rendered_structure: Option<u64>,
    output_bounds: Option<(usize, usize)>,
}

impl Flowmap {
    pub fn new(config: FlowmapConfig, size: Size) -> Self {
        Self {
            config,
            size,
            tracker: GestureTracker::new(),
            zoom: ZoomSelector::new(),
            scene: None,
            rendered_structure: None,
            output_bounds: None,
        }
    }

    pub fn config(&self) -> &FlowmapConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn zoom(&self) -> &ZoomSelector {
        &self.zoom
    }

    /// Last committed scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Forget the committed scene so the next render rebuilds everything.
    pub fn invalidate(&mut self) {
        self.scene = None;
        self.rendered_structure = None;
    }

    pub fn render(&mut self, input: &RenderInput<'_>, surface: &mut dyn Surface) -> RedrawMode {
        let structure_changed = self.rendered_structure != Some(input.structure_revision);
        if structure_changed {
            // node identities may have moved under an in-flight gesture
            self.tracker.reset();
        }
        self.zoom.sync(input.input_domain, input.state.zoom);
        self.output_bounds = input.output_bounds();

        let next = compute_scene(
            input,
            &self.config,
            self.size,
            self.tracker.brushing(),
            &self.zoom,
        );
        let wanted = if structure_changed {
            RedrawMode::Full
        } else {
            RedrawMode::Incremental
        };
        let (mode, effects) = plan(self.scene.as_ref(), &next, wanted);
        log::debug!(
            "flowmap {:?} redraw: {} effects, {} edges, {} nodes",
            mode,
            effects.len(),
            next.edges.len(),
            next.input_nodes.len() + next.output_nodes.len()
        );
        surface.commit(effects);

        self.scene = Some(next);
        self.rendered_structure = Some(input.structure_revision);
        mode
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, sink: &mut dyn SelectionSink) {
        self.tracker.handle(event, sink, self.output_bounds);
    }

    /// Map a chart-space point to the node under it, if any.
    pub fn hit(&self, x: f64, y: f64) -> Option<(Column, usize)> {
        self.scene
            .as_ref()?
            .node_at(x, y)
            .map(|node| (node.column, node.index))
    }

    pub fn begin_zoom_drag(&mut self, handle: ZoomHandle, sink: &mut dyn SelectionSink) {
        self.zoom.begin_drag(handle, sink);
    }

    /// Move the active zoom handle to the track pixel `y`.
    pub fn drag_zoom_to(&mut self, y: f64) {
        let height = self.config.inner_size(self.size).height;
        if let Some(index) = self.zoom.index_at(y, height) {
            self.zoom.drag_to(index);
        }
    }

    pub fn drag_zoom_to_index(&mut self, index: usize) {
        self.zoom.drag_to(index);
    }

    pub fn end_zoom_drag(&mut self, sink: &mut dyn SelectionSink) {
        self.zoom.end_drag(sink);
    }
}
