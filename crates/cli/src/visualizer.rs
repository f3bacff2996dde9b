//! The application shell: one loaded dataset at a time, the flowmap and
//! the two text panels, all talking to the same selection controller.

use flowmap_protocol::{AttentionDataset, DataSourceRecord};
use flowmap_render::{
    ControlPanel, Flowmap, FlowmapConfig, InputTextPanel, OutputTextPanel, PointerEvent,
    RedrawMode, RenderInput, Size, Surface, SvgSurface, TextEvent, TextPanelView,
};
use flowmap_selection::{SelectionController, SelectionSink};
use flowmap_source::{DatasetLoader, LoadCoordinator, LoadTicket, SourceError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading { source: DataSourceRecord },
    Ready { source: DataSourceRecord },
    Failed {
        source: DataSourceRecord,
        message: String,
    },
}

pub struct Visualizer {
    load_state: LoadState,
    coordinator: LoadCoordinator,
    controller: Option<SelectionController>,
    flowmap: Flowmap,
    input_panel: InputTextPanel,
    output_panel: OutputTextPanel,
    weight_threshold: f64,
}

impl Visualizer {
    pub fn new(config: FlowmapConfig, size: Size, weight_threshold: f64) -> Self {
        Self {
            load_state: LoadState::Idle,
            coordinator: LoadCoordinator::new(),
            controller: None,
            flowmap: Flowmap::new(config, size),
            input_panel: InputTextPanel,
            output_panel: OutputTextPanel::new(),
            weight_threshold,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn controller(&self) -> Option<&SelectionController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut SelectionController> {
        self.controller.as_mut()
    }

    pub fn flowmap(&self) -> &Flowmap {
        &self.flowmap
    }

    /// Start loading `source`; any load still in flight becomes stale.
    pub fn begin_load(&mut self, source: DataSourceRecord) -> LoadTicket {
        log::info!("loading data source '{}'", source.name);
        self.load_state = LoadState::Loading { source };
        self.coordinator.begin()
    }

    /// Apply a finished load. Returns `false` if `ticket` was superseded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<AttentionDataset, SourceError>,
    ) -> bool {
        let Some(result) = self.coordinator.complete(ticket, result) else {
            return false;
        };
        let source = match &self.load_state {
            LoadState::Loading { source } => source.clone(),
            _ => DataSourceRecord::new("unknown", ""),
        };
        let installed = result.map_err(|err| err.to_string()).and_then(|dataset| {
            self.install(dataset).map_err(|err| err.to_string())
        });
        self.load_state = match installed {
            Ok(()) => LoadState::Ready { source },
            Err(message) => {
                log::warn!("failed to load '{}': {message}", source.name);
                LoadState::Failed { source, message }
            }
        };
        true
    }

    pub async fn load_with(&mut self, loader: &dyn DatasetLoader, source: DataSourceRecord) {
        let ticket = self.begin_load(source.clone());
        let result = loader.load(&source).await;
        self.finish_load(ticket, result);
    }

    fn install(&mut self, dataset: AttentionDataset) -> flowmap_index::Result<()> {
        match self.controller.as_mut() {
            Some(controller) => controller.replace_dataset(dataset),
            None => {
                self.controller = Some(SelectionController::with_threshold(
                    dataset,
                    self.weight_threshold,
                )?);
                Ok(())
            }
        }
    }

    pub fn set_weight_threshold(&mut self, threshold: f64) {
        self.weight_threshold = threshold;
        if let Some(controller) = self.controller.as_mut() {
            controller.set_weight_threshold(threshold);
        }
    }

    /// Text shown instead of the flowmap when no dataset is ready.
    pub fn placeholder(&self) -> Option<String> {
        match &self.load_state {
            LoadState::Ready { .. } => None,
            LoadState::Idle => Some("No data source selected".into()),
            LoadState::Loading { source } => Some(format!("Loading {}...", source.name)),
            LoadState::Failed { source, message } => {
                Some(format!("Failed to load {}: {message}", source.name))
            }
        }
    }

    pub fn render(&mut self, surface: &mut dyn Surface) -> Option<RedrawMode> {
        if !matches!(self.load_state, LoadState::Ready { .. }) {
            return None;
        }
        let controller = self.controller.as_ref()?;
        Some(
            self.flowmap
                .render(&RenderInput::from_controller(controller), surface),
        )
    }

    /// Draw the current frame to a standalone SVG document.
    pub fn render_svg(&mut self) -> String {
        if let Some(text) = self.placeholder() {
            let size = self.flowmap.size();
            return placeholder_svg(size, &text);
        }
        let mut surface = SvgSurface::new();
        self.flowmap.invalidate();
        self.render(&mut surface);
        surface.to_svg()
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        if let Some(controller) = self.controller.as_mut() {
            self.flowmap.handle_pointer(event, controller);
        }
    }

    pub fn input_text(&mut self, event: TextEvent) {
        if let Some(controller) = self.controller.as_mut() {
            self.input_panel.handle(event, controller);
        }
    }

    pub fn output_text(&mut self, event: TextEvent) {
        if let Some(controller) = self.controller.as_mut() {
            self.output_panel.handle(event, controller);
        }
    }

    pub fn legend_click(&mut self, same: bool) {
        if let Some(controller) = self.controller.as_mut() {
            ControlPanel::legend_click(same, controller);
        }
    }

    pub fn panel_click(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            ControlPanel::panel_click(controller);
        }
    }

    pub fn input_panel_view(&self) -> Option<TextPanelView> {
        let controller = self.controller.as_ref()?;
        Some(InputTextPanel::view(
            controller.data(),
            &controller.state(),
            self.flowmap.config().weight_color_factor,
        ))
    }

    pub fn output_panel_view(&self) -> Option<TextPanelView> {
        let controller = self.controller.as_ref()?;
        Some(self.output_panel.view(
            controller.data(),
            &controller.state(),
            self.flowmap.config().weight_color_factor,
        ))
    }
}

fn placeholder_svg(size: Size, text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"Flowmap\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n<text class=\"placeholder\" x=\"{x}\" y=\"{y}\" text-anchor=\"middle\">{escaped}</text>\n</svg>\n",
        w = size.width,
        h = size.height,
        x = size.width / 2.0,
        y = size.height / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowmap_protocol::{AttentionRecord, TextRecord};
    use flowmap_render::Column;

    fn dataset() -> AttentionDataset {
        AttentionDataset::new(
            vec![
                AttentionRecord::new(0, 0, 0.8),
                AttentionRecord::new(1, 1, 0.9),
            ],
            vec![TextRecord::new(0, "the", "DT"), TextRecord::new(1, "cat", "NN")],
            vec![TextRecord::new(0, "le", "DT"), TextRecord::new(1, "cat", "NN")],
        )
    }

    fn visualizer() -> Visualizer {
        Visualizer::new(FlowmapConfig::default(), Size::default(), 0.05)
    }

    #[test]
    fn shows_placeholder_until_ready() {
        let mut vis = visualizer();
        assert_eq!(vis.placeholder().as_deref(), Some("No data source selected"));

        let ticket = vis.begin_load(DataSourceRecord::new("m", "m.json"));
        assert_eq!(vis.placeholder().as_deref(), Some("Loading m..."));
        assert!(vis.render_svg().contains("Loading m..."));
        assert_eq!(vis.render(&mut SvgSurface::new()), None);

        assert!(vis.finish_load(ticket, Ok(dataset())));
        assert_eq!(vis.placeholder(), None);
        assert!(vis.render_svg().contains("class=\"edge"));
    }

    #[test]
    fn stale_load_does_not_replace_newer_one() {
        let mut vis = visualizer();
        let old = vis.begin_load(DataSourceRecord::new("old", "old.json"));
        let new = vis.begin_load(DataSourceRecord::new("new", "new.json"));

        assert!(vis.finish_load(new, Ok(dataset())));
        assert!(!vis.finish_load(old, Ok(AttentionDataset::default())));
        assert_eq!(
            vis.load_state(),
            &LoadState::Ready {
                source: DataSourceRecord::new("new", "new.json"),
            }
        );
        assert_eq!(vis.controller().map(|c| c.data().input_records.len()), Some(2));
    }

    #[test]
    fn dangling_dataset_fails_without_panicking() {
        let mut vis = visualizer();
        let ticket = vis.begin_load(DataSourceRecord::new("bad", "bad.json"));
        let mut bad = dataset();
        bad.attention_records[0].output_index = 7;
        vis.finish_load(ticket, Ok(bad));
        assert!(matches!(vis.load_state(), LoadState::Failed { .. }));
        assert!(vis.render_svg().contains("Failed to load bad"));
    }

    #[test]
    fn reload_resets_selection_but_keeps_threshold() {
        let mut vis = visualizer();
        let ticket = vis.begin_load(DataSourceRecord::new("m", "m.json"));
        vis.finish_load(ticket, Ok(dataset()));
        vis.set_weight_threshold(0.5);
        vis.render(&mut SvgSurface::new());
        vis.pointer(PointerEvent::Enter {
            column: Column::Output,
            index: 1,
        });
        vis.pointer(PointerEvent::Click {
            column: Column::Input,
            index: 0,
        });
        assert!(vis.controller().is_some_and(|c| c.state().locked));

        let ticket = vis.begin_load(DataSourceRecord::new("m", "m.json"));
        vis.finish_load(ticket, Ok(dataset()));
        let state = vis.controller().map(|c| c.state()).unwrap();
        assert!(!state.locked && !state.filtered);
        assert_eq!(state.weight_threshold, 0.5);
    }

    #[test]
    fn panels_reflect_selection() {
        let mut vis = visualizer();
        let ticket = vis.begin_load(DataSourceRecord::new("m", "m.json"));
        vis.finish_load(ticket, Ok(dataset()));

        vis.output_text(TextEvent::Enter(1));
        let inputs = vis.input_panel_view().unwrap();
        assert!(inputs.tokens[1].classes.contains("selected"));
        assert!(!inputs.tokens[0].classes.contains("selected"));

        vis.legend_click(true);
        let outputs = vis.output_panel_view().unwrap();
        assert!(outputs.tokens[1].classes.contains("selected"));
        vis.panel_click();
        assert!(vis.controller().is_some_and(|c| !c.filtered()));
    }
}
