pub mod gridlines;
pub mod label_format;
pub mod subdivision;
pub mod tick_spacing;
pub mod transform;
pub mod types;

pub use gridlines::{
    AxisGridSet, DEFAULT_GRIDLINE_LIMIT, GridVisibility, GridlineEngine, GridlineEngineConfig,
    GridlineSet, TierVisibility,
};
pub use label_format::{LabelFormatter, format_label};
pub use subdivision::{Subdivision, SubdivisionSpec, ThinDenominators};
pub use tick_spacing::{
    AxisSpacing, DEFAULT_IDEAL_NORMAL_PIXEL_DIST, DEFAULT_IDEAL_THIN_PIXEL_DIST, GridSpacing,
    TickSpacingSolver, nearest_index,
};
pub use transform::CoordinateTransform;
pub use types::{AxisDirection, CanvasSize, ScissorRect, TickLevel, Viewport};
