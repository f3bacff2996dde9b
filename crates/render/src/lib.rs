//! # Flowmap Render
//!
//! Views over a [`flowmap_selection::SelectionController`].
//!
//! ## Architecture
//!
//! ```text
//! RenderInput (records + selection state + structure revision)
//!     │
//!     ├──> layout   pure: scales, palettes, node/edge/label geometry ──> Scene
//!     │
//!     ├──> commit   Scene diff ──> Effect[] (full rebuild or restyle only)
//!     │
//!     └──> Surface  retained element store (SvgSurface)
//!
//! PointerEvent ──> GestureTracker ──> SelectionSink
//! zoom drag    ──> ZoomSelector   ──> SelectionSink
//! TextEvent    ──> Input/OutputTextPanel ──> SelectionSink
//! ```

mod commit;
mod config;
mod control_panel;
mod flowmap;
mod gesture;
mod layout;
mod palette;
mod scale;
mod scene;
mod svg;
mod text_panel;
mod zoom;

pub use commit::{plan, Effect, RedrawMode, Surface};
pub use config::{FlowmapConfig, Margin, Size};
pub use control_panel::ControlPanel;
pub use flowmap::Flowmap;
pub use gesture::{GesturePhase, GestureTracker, PointerEvent};
pub use layout::RenderInput;
pub use palette::{Palette, Rgb};
pub use scale::{BandScale, LinearScale, SequentialScale};
pub use scene::{
    ClassList, Column, EdgeElement, LabelElement, NodeElement, Rect, Scene, TextAnchor,
    ZoomSelectorElement,
};
pub use svg::{SurfaceStats, SvgSurface};
pub use text_panel::{InputTextPanel, OutputTextPanel, TextEvent, TextPanelView, TokenSpan};
pub use zoom::{ZoomHandle, ZoomSelector};
