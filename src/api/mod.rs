mod gridline_config;
mod gridline_style;
mod gridlines_element;
mod plot_context;

pub use gridline_config::{GridlineConfig, GridlineConfigBuilder};
pub use gridline_style::{AxisTierStyles, LabelAnchor, LabelPosition, ScissorBoxStyle, TierStyle};
pub use gridlines_element::Gridlines;
pub use plot_context::{ElementId, PlotContext, PlotElement};
