//! grapheme-rs: coordinate transforms and adaptive gridlines for 2-D plots.
//!
//! `core` holds the pure pieces (viewport/canvas snapshot transforms, tick
//! spacing solver, gridline engine, label formatting). `api` composes them
//! into drawable plot elements owned by a `PlotContext`, and `render` defines
//! the backend-agnostic frame handed to a `Renderer`.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{GridlineConfig, Gridlines, PlotContext};
pub use error::{PlotError, PlotResult};
