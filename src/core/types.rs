use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Visible window into data space, stored as center plus full extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport, rejecting non-finite values and non-positive extents.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> PlotResult<Self> {
        let viewport = Self {
            x,
            y,
            width,
            height,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn validate(self) -> PlotResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(PlotError::InvalidViewport {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Canvas size in device pixels, already scaled by the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> PlotResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(self) -> PlotResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(PlotError::InvalidCanvas {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Pixel-space clip rectangle applied when gridlines are turned into draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScissorRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl ScissorRect {
    #[must_use]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::INFINITY,
        )
    }

    #[must_use]
    pub fn contains_x(self, px: f64) -> bool {
        px >= self.x0 && px <= self.x1
    }

    #[must_use]
    pub fn contains_y(self, py: f64) -> bool {
        py >= self.y0 && py <= self.y1
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    pub fn validate(self) -> PlotResult<()> {
        if self.x0.is_nan() || self.y0.is_nan() || self.x1.is_nan() || self.y1.is_nan() {
            return Err(PlotError::InvalidConfiguration(
                "scissor bounds must not be NaN".to_owned(),
            ));
        }
        if self.x0 > self.x1 || self.y0 > self.y1 {
            return Err(PlotError::InvalidConfiguration(
                "scissor bounds must satisfy x0 <= x1 and y0 <= y1".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for ScissorRect {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Axis along which a family of gridlines is measured.
///
/// X gridlines are vertical lines placed at data-space X coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    X,
    Y,
}

impl AxisDirection {
    pub const ALL: [AxisDirection; 2] = [AxisDirection::X, AxisDirection::Y];

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Gridline tier, ordered by decreasing visual weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickLevel {
    /// Bold line through the origin.
    Axis,
    Normal,
    Thin,
}

impl TickLevel {
    pub const ALL: [TickLevel; 3] = [TickLevel::Axis, TickLevel::Normal, TickLevel::Thin];
}
