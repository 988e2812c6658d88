mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, TextHAlign, TextPrimitive, TextVAlign};

use crate::error::PlotResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from plot geometry and gridline logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}
