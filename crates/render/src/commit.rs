use crate::config::{Margin, Size};
use crate::palette::Rgb;
use crate::scene::{
    ClassList, Column, EdgeElement, LabelElement, NodeElement, Scene, ZoomSelectorElement,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawMode {
    /// Drop every element and rebuild from scratch.
    Full,
    /// Restyle existing elements in place.
    Incremental,
}

/// One change to a retained drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Clear { size: Size, margin: Margin },
    CreateNode(NodeElement),
    CreateEdge(EdgeElement),
    StyleNode {
        column: Column,
        position: usize,
        fill: Rgb,
        classes: ClassList,
    },
    StyleEdge {
        key: usize,
        stroke: Rgb,
        classes: ClassList,
    },
    /// Labels are cheap and always rebuilt as a layer.
    ReplaceLabels(Vec<LabelElement>),
    SetZoomSelector(Option<ZoomSelectorElement>),
}

/// Something effects can be committed to.
pub trait Surface {
    fn apply(&mut self, effect: Effect);

    fn commit(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply(effect);
        }
    }
}

/// Effects turning `prev` into `next`.
///
/// An incremental plan only restyles; if the element sets of the two
/// scenes differ it falls back to a full plan, which is reported back.
pub fn plan(prev: Option<&Scene>, next: &Scene, mode: RedrawMode) -> (RedrawMode, Vec<Effect>) {
    match (mode, prev) {
        (RedrawMode::Incremental, Some(prev)) if same_structure(prev, next) => {
            (RedrawMode::Incremental, plan_incremental(prev, next))
        }
        (RedrawMode::Incremental, Some(_)) => {
            log::debug!("element sets diverged, falling back to full redraw");
            (RedrawMode::Full, plan_full(next))
        }
        _ => (RedrawMode::Full, plan_full(next)),
    }
}

fn same_structure(prev: &Scene, next: &Scene) -> bool {
    prev.size == next.size
        && prev.input_nodes.len() == next.input_nodes.len()
        && prev.output_nodes.len() == next.output_nodes.len()
        && prev.edge_keys().eq(next.edge_keys())
}

fn plan_full(next: &Scene) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(
        next.edges.len() + next.input_nodes.len() + next.output_nodes.len() + 3,
    );
    effects.push(Effect::Clear {
        size: next.size,
        margin: next.margin,
    });
    effects.extend(next.edges.iter().cloned().map(Effect::CreateEdge));
    effects.extend(next.nodes().cloned().map(Effect::CreateNode));
    effects.push(Effect::ReplaceLabels(next.labels.clone()));
    effects.push(Effect::SetZoomSelector(next.zoom_selector));
    effects
}

fn plan_incremental(prev: &Scene, next: &Scene) -> Vec<Effect> {
    let mut effects = Vec::new();
    for (old, new) in prev.edges.iter().zip(&next.edges) {
        if old.stroke != new.stroke || old.classes != new.classes {
            effects.push(Effect::StyleEdge {
                key: new.key,
                stroke: new.stroke,
                classes: new.classes.clone(),
            });
        }
    }
    for (old, new) in prev.nodes().zip(next.nodes()) {
        if old.fill != new.fill || old.classes != new.classes {
            effects.push(Effect::StyleNode {
                column: new.column,
                position: new.position,
                fill: new.fill,
                classes: new.classes.clone(),
            });
        }
    }
    if prev.labels != next.labels {
        effects.push(Effect::ReplaceLabels(next.labels.clone()));
    }
    if prev.zoom_selector != next.zoom_selector {
        effects.push(Effect::SetZoomSelector(next.zoom_selector));
    }
    effects
}
