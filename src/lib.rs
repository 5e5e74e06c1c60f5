#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod errors;
pub mod format;
pub mod geometry;
pub mod model;
pub mod overlay;
pub mod primitives;
pub mod recording;
pub mod render;
pub mod show;
pub mod units;
pub mod view;
pub mod viewer;

pub use config::RenderConfig;
pub use errors::{ConfigError, FrameEditError, QueryError, RenderError};
pub use format::format_value;
pub use geometry::{point, screen, Bounds, Point, ScreenPoint};
pub use model::{
    Bond, Component, ElemType, Element, Frame, Node, Section, Support, YieldState, LONG_TERM,
};
pub use overlay::{NoOverlay, Overlay, StandardOverlay};
pub use primitives::{Canvas, Color, Font, Pen, TextStyle};
pub use recording::{MonospaceFont, RecordingCanvas, RecordingDriver};
pub use render::{render_frame, render_nodes, Caption, DrawContext, Renderer};
pub use show::{ElemCaption, NodeCaption, Show, StressFlag};
pub use units::{ForceUnit, LengthUnit, UnitScale};
pub use view::View;
pub use viewer::{Button, Driver, Modifiers, Viewer};
