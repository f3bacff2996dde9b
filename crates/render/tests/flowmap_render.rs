use flowmap_index::IndexFilter;
use flowmap_protocol::{AttentionDataset, AttentionRecord, TextRecord};
use flowmap_render::{
    Column, Flowmap, FlowmapConfig, RedrawMode, RenderInput, Size, SvgSurface, ZoomHandle,
};
use flowmap_selection::{SelectionController, SelectionSink};
use pretty_assertions::assert_eq;

fn the_cat() -> AttentionDataset {
    AttentionDataset::new(
        vec![
            AttentionRecord::new(0, 0, 0.8),
            AttentionRecord::new(0, 1, 0.1),
            AttentionRecord::new(1, 1, 0.9),
        ],
        vec![TextRecord::new(0, "the", "DT"), TextRecord::new(1, "cat", "NN")],
        vec![TextRecord::new(0, "le", "DT"), TextRecord::new(1, "chat", "NN")],
    )
}

fn setup() -> (SelectionController, Flowmap, SvgSurface) {
    (
        SelectionController::new(the_cat()).unwrap(),
        Flowmap::new(FlowmapConfig::default(), Size::new(640.0, 400.0)),
        SvgSurface::new(),
    )
}

fn render(map: &mut Flowmap, c: &SelectionController, surface: &mut SvgSurface) -> RedrawMode {
    map.render(&RenderInput::from_controller(c), surface)
}

#[test]
fn first_render_draws_nodes_and_visible_edges() {
    let (c, mut map, mut surface) = setup();
    assert_eq!(render(&mut map, &c, &mut surface), RedrawMode::Full);

    // the 0.1 edge is eligible but thinner than the visibility cutoff
    assert_eq!(c.data().attention_records.len(), 3);
    assert_eq!(surface.edge_count(), 2);
    assert_eq!(surface.node_count(), 4);
    assert!(surface.edge(1).is_none());
}

#[test]
fn columns_sit_at_chart_edges() {
    let (c, mut map, mut surface) = setup();
    render(&mut map, &c, &mut surface);
    let config = FlowmapConfig::default();
    let inner_width = 640.0 - config.margin.left - config.margin.right;

    let input = surface.node(Column::Input, 0).unwrap();
    let output = surface.node(Column::Output, 1).unwrap();
    assert_eq!(input.rect.x, 0.0);
    assert_eq!(output.rect.x, inner_width - config.output_node_width);
    assert_eq!(output.rect.height, (400.0 - config.margin.top - config.margin.bottom) / 2.0);

    let edge = surface.edge(2).unwrap();
    assert!(edge.path.starts_with(&format!("M{:.2},", config.input_node_width)));
    let target = format!(
        "{:.2},{:.2}",
        output.rect.x,
        output.rect.y + output.rect.height / 2.0
    );
    assert!(edge.path.ends_with(&target));
    assert_eq!(edge.stroke_width, 0.9 * config.max_edge_width);
}

#[test]
fn hover_selection_only_restyles() {
    let (mut c, mut map, mut surface) = setup();
    render(&mut map, &c, &mut surface);
    let created = surface.stats().created;

    c.filter_by_output_index(Some(IndexFilter::single(1)));
    assert_eq!(render(&mut map, &c, &mut surface), RedrawMode::Incremental);

    let stats = surface.stats();
    assert_eq!(stats.created, created);
    assert_eq!(stats.clears, 1);
    assert!(stats.restyled > 0);
    assert!(surface.edge(2).unwrap().classes.contains("selected"));
    assert!(surface.edge(0).unwrap().classes.contains("muted"));
    assert!(surface.node(Column::Output, 1).unwrap().classes.contains("selected"));
    assert!(!surface.node(Column::Output, 0).unwrap().classes.contains("selected"));
}

#[test]
fn unchanged_state_commits_nothing() {
    let (c, mut map, mut surface) = setup();
    render(&mut map, &c, &mut surface);
    let before = surface.stats();
    assert_eq!(render(&mut map, &c, &mut surface), RedrawMode::Incremental);
    assert_eq!(surface.stats(), before);
}

#[test]
fn threshold_change_rebuilds_everything() {
    let (mut c, mut map, mut surface) = setup();
    render(&mut map, &c, &mut surface);

    c.set_weight_threshold(0.85);
    assert_eq!(render(&mut map, &c, &mut surface), RedrawMode::Full);
    assert_eq!(surface.stats().clears, 2);
    assert_eq!(surface.edge_count(), 1);
    let edge = surface.edge(0).unwrap();
    assert_eq!((edge.input_index, edge.output_index), (1, 1));

    c.set_weight_threshold(0.99);
    assert_eq!(render(&mut map, &c, &mut surface), RedrawMode::Full);
    assert_eq!(surface.edge_count(), 0);
    assert_eq!(surface.node_count(), 4);
}

#[test]
fn resize_forces_full_redraw() {
    let (c, mut map, mut surface) = setup();
    render(&mut map, &c, &mut surface);
    map.resize(Size::new(800.0, 500.0));
    assert_eq!(render(&mut map, &c, &mut surface), RedrawMode::Full);
    assert_eq!(surface.stats().clears, 2);
}

#[test]
fn zoom_drag_signals_resizing_then_rebuilds() {
    let (mut c, mut map, mut surface) = setup();
    render(&mut map, &c, &mut surface);
    assert_eq!(map.zoom().range(), Some((0, 1)));

    map.begin_zoom_drag(ZoomHandle::Start, &mut c);
    assert!(c.text_resizing());
    map.drag_zoom_to_index(1);
    map.end_zoom_drag(&mut c);
    assert!(!c.text_resizing());
    assert_eq!(c.zoom_range(), Some((1, 1)));

    assert_eq!(render(&mut map, &c, &mut surface), RedrawMode::Full);
    assert_eq!(surface.node_count(), 3);
    assert!(surface.node(Column::Input, 0).is_some_and(|n| n.index == 1));
    assert_eq!(surface.edge_count(), 1);
}

#[test]
fn zoom_drag_by_track_pixels() {
    let (mut c, mut map, mut surface) = setup();
    render(&mut map, &c, &mut surface);
    let track = map.config().inner_size(map.size()).height;

    // two input tokens: the lower half of the track is index 1
    map.begin_zoom_drag(ZoomHandle::Start, &mut c);
    map.drag_zoom_to(track * 0.75);
    map.end_zoom_drag(&mut c);
    assert_eq!(c.zoom_range(), Some((1, 1)));
    render(&mut map, &c, &mut surface);

    // pointer above the track clamps to the first token
    map.begin_zoom_drag(ZoomHandle::Start, &mut c);
    map.drag_zoom_to(-40.0);
    map.end_zoom_drag(&mut c);
    assert_eq!(c.zoom_range(), None);
    assert_eq!(map.zoom().range(), Some((0, 1)));
}

#[test]
fn hit_resolves_nodes_under_a_point() {
    let (c, mut map, mut surface) = setup();
    assert_eq!(map.hit(1.0, 1.0), None);
    render(&mut map, &c, &mut surface);

    let node = surface.node(Column::Output, 1).unwrap();
    let (x, y) = (node.rect.x + 1.0, node.rect.y + 1.0);
    assert_eq!(map.hit(x, y), Some((Column::Output, 1)));
    assert_eq!(map.hit(1.0, 1.0), Some((Column::Input, 0)));
    assert_eq!(map.hit(-5.0, -5.0), None);
}

#[test]
fn labels_follow_selected_edges() {
    let mut c = SelectionController::new(the_cat()).unwrap();
    let config = FlowmapConfig {
        show_text: true,
        ..Default::default()
    };
    let mut map = Flowmap::new(config, Size::new(640.0, 400.0));
    let mut surface = SvgSurface::new();
    render(&mut map, &c, &mut surface);
    assert_eq!(surface.labels().len(), 4);

    c.filter_by_output_index(Some(IndexFilter::single(0)));
    render(&mut map, &c, &mut surface);
    let shown: Vec<(Column, usize)> = surface
        .labels()
        .iter()
        .map(|l| (l.column, l.index))
        .collect();
    assert_eq!(shown, vec![(Column::Input, 0), (Column::Output, 0)]);

    let svg = surface.to_svg();
    assert!(svg.contains(">the <tspan class=\"pos\">DT</tspan>"));
}
