use flowmap_index::{EdgePredicate, IndexFilter};
use flowmap_protocol::{AttentionDataset, AttentionRecord, TextRecord};
use flowmap_render::{
    Column, ControlPanel, Flowmap, FlowmapConfig, GesturePhase, OutputTextPanel, PointerEvent,
    RenderInput, Size, SvgSurface, TextEvent,
};
use flowmap_selection::{SelectionController, SelectionSink};
use pretty_assertions::assert_eq;

/// Four source tokens, five generated ones; output `o` attends to input `o % 4`.
fn dataset() -> AttentionDataset {
    let inputs = ["a", "b", "c", "d"];
    let outputs = ["a", "x", "b", "y", "c"];
    let mut edges: Vec<AttentionRecord> = (0..outputs.len())
        .map(|o| AttentionRecord::new(o % inputs.len(), o, 0.5))
        .collect();
    edges.push(AttentionRecord::new(3, 4, 0.3));
    AttentionDataset::new(
        edges,
        inputs.iter().enumerate().map(|(i, t)| TextRecord::new(i, *t, "")).collect(),
        outputs.iter().enumerate().map(|(i, t)| TextRecord::new(i, *t, "")).collect(),
    )
}

fn setup() -> (SelectionController, Flowmap) {
    let controller = SelectionController::new(dataset()).unwrap();
    let mut map = Flowmap::new(FlowmapConfig::default(), Size::new(640.0, 480.0));
    map.render(&RenderInput::from_controller(&controller), &mut SvgSurface::new());
    (controller, map)
}

fn output(event: fn(Column, usize) -> PointerEvent, index: usize) -> PointerEvent {
    event(Column::Output, index)
}

fn enter(column: Column, index: usize) -> PointerEvent {
    PointerEvent::Enter { column, index }
}

fn down(column: Column, index: usize) -> PointerEvent {
    PointerEvent::Down { column, index }
}

fn up(column: Column, index: usize) -> PointerEvent {
    PointerEvent::Up { column, index }
}

fn click(column: Column, index: usize) -> PointerEvent {
    PointerEvent::Click { column, index }
}

/// Hover 2, press, drag to 4, release: a locked [2, 4] brush.
fn locked_brush(c: &mut SelectionController, map: &mut Flowmap) {
    map.handle_pointer(output(enter, 2), c);
    map.handle_pointer(output(down, 2), c);
    map.handle_pointer(output(enter, 4), c);
    map.handle_pointer(output(up, 4), c);
}

#[test]
fn hover_selects_single_output() {
    let (mut c, mut map) = setup();
    map.handle_pointer(output(enter, 2), &mut c);

    assert_eq!(map.tracker().phase(), GesturePhase::Hovering { index: 2 });
    assert_eq!(c.output_filter(), Some(IndexFilter::single(2)));
    assert!(c.output_selected(2));
    assert!(c.input_selected(2));
    assert!(!c.input_selected(0));
}

#[test]
fn drag_brushes_then_locks_on_release() {
    let (mut c, mut map) = setup();
    map.handle_pointer(output(enter, 2), &mut c);
    map.handle_pointer(output(down, 2), &mut c);
    assert!(map.tracker().brushing());

    map.handle_pointer(output(enter, 4), &mut c);
    assert_eq!(c.output_filter(), Some(IndexFilter::Range { start: 2, end: 4 }));
    assert!(!c.locked());

    map.handle_pointer(output(up, 4), &mut c);
    assert!(c.locked());
    assert!(!map.tracker().brushing());

    // hovering elsewhere leaves a locked selection alone
    map.handle_pointer(output(enter, 0), &mut c);
    map.handle_pointer(
        PointerEvent::LeaveNodes {
            column: Column::Output,
        },
        &mut c,
    );
    assert_eq!(c.output_filter(), Some(IndexFilter::Range { start: 2, end: 4 }));
}

#[test]
fn locked_brush_translates_within_bounds() {
    let (mut c, mut map) = setup();
    locked_brush(&mut c, &mut map);

    map.handle_pointer(output(down, 3), &mut c);
    assert!(map.tracker().brushing());
    map.handle_pointer(output(enter, 1), &mut c);
    assert_eq!(c.output_filter(), Some(IndexFilter::Range { start: 0, end: 2 }));

    // already at the lower edge
    map.handle_pointer(output(enter, 0), &mut c);
    assert_eq!(c.output_filter(), Some(IndexFilter::Range { start: 0, end: 2 }));

    map.handle_pointer(output(up, 0), &mut c);
    assert!(c.locked());
}

#[test]
fn locked_panel_brush_translates_in_flowmap() {
    let (mut c, mut map) = setup();
    let mut panel = OutputTextPanel::new();
    panel.handle(TextEvent::Down(1), &mut c);
    panel.handle(TextEvent::Enter(3), &mut c);
    panel.handle(TextEvent::Up(3), &mut c);
    assert!(c.locked());
    assert_eq!(c.output_filter(), Some(IndexFilter::Range { start: 1, end: 3 }));

    map.handle_pointer(output(down, 2), &mut c);
    map.handle_pointer(output(enter, 3), &mut c);
    assert_eq!(c.output_filter(), Some(IndexFilter::Range { start: 2, end: 4 }));

    map.handle_pointer(output(up, 3), &mut c);
    assert!(c.locked());
}

#[test]
fn locked_input_selection_is_grabbed_at_the_pressed_node() {
    let (mut c, mut map) = setup();
    map.handle_pointer(enter(Column::Input, 0), &mut c);
    map.handle_pointer(click(Column::Input, 0), &mut c);
    assert!(c.locked());
    assert!(c.output_selected(4));

    map.handle_pointer(output(down, 4), &mut c);
    map.handle_pointer(output(enter, 3), &mut c);
    assert_eq!(c.output_filter(), Some(IndexFilter::single(3)));
    assert!(c.locked());
}

#[test]
fn click_on_hovered_output_pins_it() {
    let (mut c, mut map) = setup();
    map.handle_pointer(output(enter, 1), &mut c);
    map.handle_pointer(output(down, 1), &mut c);
    map.handle_pointer(output(up, 1), &mut c);
    assert!(c.locked());
    assert_eq!(c.output_filter(), Some(IndexFilter::single(1)));
}

#[test]
fn pressing_outside_a_locked_brush_starts_over() {
    let (mut c, mut map) = setup();
    locked_brush(&mut c, &mut map);

    map.handle_pointer(output(down, 0), &mut c);
    assert!(!c.locked());
    assert_eq!(c.output_filter(), Some(IndexFilter::single(0)));
    assert_eq!(map.tracker().phase(), GesturePhase::Hovering { index: 0 });
}

#[test]
fn background_click_clears_and_unlocks() {
    let (mut c, mut map) = setup();
    locked_brush(&mut c, &mut map);

    map.handle_pointer(PointerEvent::BackgroundClick, &mut c);
    assert!(!c.locked());
    assert!(!c.filtered());
    assert_eq!(map.tracker().phase(), GesturePhase::Idle);
}

#[test]
fn leaving_the_column_clears_a_hover() {
    let (mut c, mut map) = setup();
    map.handle_pointer(output(enter, 1), &mut c);
    map.handle_pointer(
        PointerEvent::LeaveNodes {
            column: Column::Output,
        },
        &mut c,
    );
    assert!(!c.filtered());
}

#[test]
fn input_hover_and_click_lock() {
    let (mut c, mut map) = setup();
    map.handle_pointer(enter(Column::Input, 2), &mut c);
    assert_eq!(
        c.predicate(),
        EdgePredicate::Input {
            filter: IndexFilter::single(2),
        }
    );
    assert!(c.output_selected(2));
    assert!(!c.output_selected(1));

    map.handle_pointer(click(Column::Input, 2), &mut c);
    assert!(c.locked());
    map.handle_pointer(
        PointerEvent::LeaveNodes {
            column: Column::Input,
        },
        &mut c,
    );
    assert!(c.filtered());

    map.handle_pointer(click(Column::Input, 2), &mut c);
    assert!(!c.locked());
}

#[test]
fn text_panel_and_flowmap_brush_agree() {
    let mut from_text = SelectionController::new(dataset()).unwrap();
    let mut panel = OutputTextPanel::new();
    panel.handle(TextEvent::Down(3), &mut from_text);
    panel.handle(TextEvent::Enter(1), &mut from_text);

    let (mut from_map, mut map) = setup();
    map.handle_pointer(output(enter, 1), &mut from_map);
    map.handle_pointer(output(down, 1), &mut from_map);
    map.handle_pointer(output(enter, 3), &mut from_map);

    assert_eq!(from_text.predicate(), from_map.predicate());
    assert_eq!(from_text.data(), from_map.data());

    panel.handle(TextEvent::Up(1), &mut from_text);
    assert!(from_text.locked());
}

#[test]
fn text_panel_click_without_drag_does_not_lock() {
    let mut c = SelectionController::new(dataset()).unwrap();
    let mut panel = OutputTextPanel::new();
    panel.handle(TextEvent::Down(2), &mut c);
    panel.handle(TextEvent::Up(2), &mut c);
    assert!(!c.locked());
    assert!(!panel.brushing());

    panel.handle(TextEvent::PanelClick, &mut c);
    assert!(!c.filtered());
}

#[test]
fn legend_selects_copy_edges() {
    let mut c = SelectionController::new(dataset()).unwrap();
    ControlPanel::legend_click(true, &mut c);
    assert!(c.locked());
    assert_eq!(c.predicate(), EdgePredicate::TokenMatch { same: true });
    // only output 0 copies its source token
    assert!(c.output_selected(0));
    assert!(!c.output_selected(1));

    ControlPanel::panel_click(&mut c);
    assert!(!c.locked());
    assert!(!c.filtered());
}
