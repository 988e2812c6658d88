#[cfg(feature = "parallel-transform")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{CanvasSize, Viewport};
use crate::error::{PlotError, PlotResult};

/// Snapshot mapping between pixel space, data space and clip space.
///
/// Pixel space has its origin at the top-left corner with Y growing downward.
/// Data space has Y growing upward. Clip space spans `[-1, 1]` across the
/// viewport and follows the pixel orientation on Y.
///
/// The transform is built from an already validated [`Viewport`] and
/// [`CanvasSize`], so every conversion is total: divisors are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransform {
    viewport: Viewport,
    canvas: CanvasSize,
}

impl CoordinateTransform {
    pub fn new(viewport: Viewport, canvas: CanvasSize) -> PlotResult<Self> {
        viewport.validate()?;
        canvas.validate()?;
        Ok(Self { viewport, canvas })
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn canvas(self) -> CanvasSize {
        self.canvas
    }

    #[must_use]
    pub fn pixel_to_data_x(self, px: f64) -> f64 {
        (px / self.canvas.width - 0.5) * self.viewport.width + self.viewport.x
    }

    #[must_use]
    pub fn pixel_to_data_y(self, py: f64) -> f64 {
        -(py / self.canvas.height - 0.5) * self.viewport.height + self.viewport.y
    }

    #[must_use]
    pub fn pixel_to_data(self, px: f64, py: f64) -> (f64, f64) {
        (self.pixel_to_data_x(px), self.pixel_to_data_y(py))
    }

    #[must_use]
    pub fn data_to_pixel_x(self, x: f64) -> f64 {
        self.canvas.width * ((x - self.viewport.x) / self.viewport.width + 0.5)
    }

    #[must_use]
    pub fn data_to_pixel_y(self, y: f64) -> f64 {
        self.canvas.height * (-(y - self.viewport.y) / self.viewport.height + 0.5)
    }

    #[must_use]
    pub fn data_to_pixel(self, x: f64, y: f64) -> (f64, f64) {
        (self.data_to_pixel_x(x), self.data_to_pixel_y(y))
    }

    #[must_use]
    pub fn pixel_vector_to_data_vector_x(self, dx: f64) -> f64 {
        self.viewport.width * dx / self.canvas.width
    }

    #[must_use]
    pub fn pixel_vector_to_data_vector_y(self, dy: f64) -> f64 {
        -self.viewport.height * dy / self.canvas.height
    }

    /// Maps a pixel-space difference to a data-space difference (no translation).
    #[must_use]
    pub fn pixel_vector_to_data_vector(self, dx: f64, dy: f64) -> (f64, f64) {
        (
            self.pixel_vector_to_data_vector_x(dx),
            self.pixel_vector_to_data_vector_y(dy),
        )
    }

    #[must_use]
    pub fn data_vector_to_pixel_vector_x(self, dx: f64) -> f64 {
        self.canvas.width * dx / self.viewport.width
    }

    #[must_use]
    pub fn data_vector_to_pixel_vector_y(self, dy: f64) -> f64 {
        -self.canvas.height * dy / self.viewport.height
    }

    #[must_use]
    pub fn data_vector_to_pixel_vector(self, dx: f64, dy: f64) -> (f64, f64) {
        (
            self.data_vector_to_pixel_vector_x(dx),
            self.data_vector_to_pixel_vector_y(dy),
        )
    }

    #[must_use]
    pub fn data_to_clip_x(self, x: f64) -> f64 {
        2.0 * (x - self.viewport.x) / self.viewport.width
    }

    #[must_use]
    pub fn data_to_clip_y(self, y: f64) -> f64 {
        2.0 * (self.viewport.y - y) / self.viewport.height
    }

    #[must_use]
    pub fn data_to_clip(self, x: f64, y: f64) -> (f64, f64) {
        (self.data_to_clip_x(x), self.data_to_clip_y(y))
    }

    #[must_use]
    pub fn data_vector_to_clip_vector(self, dx: f64, dy: f64) -> (f64, f64) {
        (
            2.0 * dx / self.viewport.width,
            -2.0 * dy / self.viewport.height,
        )
    }

    #[must_use]
    pub fn clip_vector_to_data_vector(self, dx: f64, dy: f64) -> (f64, f64) {
        (
            self.viewport.width * dx / 2.0,
            -self.viewport.height * dy / 2.0,
        )
    }

    #[must_use]
    pub fn pixel_vector_to_clip_vector(self, dx: f64, dy: f64) -> (f64, f64) {
        (2.0 * dx / self.canvas.width, 2.0 * dy / self.canvas.height)
    }

    #[must_use]
    pub fn bounds_min_x(self) -> f64 {
        self.viewport.x - self.viewport.width / 2.0
    }

    #[must_use]
    pub fn bounds_max_x(self) -> f64 {
        self.viewport.x + self.viewport.width / 2.0
    }

    #[must_use]
    pub fn bounds_min_y(self) -> f64 {
        self.viewport.y - self.viewport.height / 2.0
    }

    #[must_use]
    pub fn bounds_max_y(self) -> f64 {
        self.viewport.y + self.viewport.height / 2.0
    }

    /// Inclusive on both viewport edges.
    #[must_use]
    pub fn is_x_in_view(self, x: f64) -> bool {
        (x - self.viewport.x).abs() <= self.viewport.width / 2.0
    }

    #[must_use]
    pub fn is_y_in_view(self, y: f64) -> bool {
        (y - self.viewport.y).abs() <= self.viewport.height / 2.0
    }

    /// Converts an interleaved `[x0, y0, x1, y1, ...]` pixel buffer to data space.
    pub fn pixel_to_data_in_place(self, buffer: &mut [f64]) -> PlotResult<()> {
        map_pairs_in_place(buffer, |px, py| self.pixel_to_data(px, py))
    }

    pub fn data_to_pixel_in_place(self, buffer: &mut [f64]) -> PlotResult<()> {
        map_pairs_in_place(buffer, |x, y| self.data_to_pixel(x, y))
    }

    pub fn pixel_vector_to_data_vector_in_place(self, buffer: &mut [f64]) -> PlotResult<()> {
        map_pairs_in_place(buffer, |dx, dy| self.pixel_vector_to_data_vector(dx, dy))
    }

    pub fn data_vector_to_pixel_vector_in_place(self, buffer: &mut [f64]) -> PlotResult<()> {
        map_pairs_in_place(buffer, |dx, dy| self.data_vector_to_pixel_vector(dx, dy))
    }

    pub fn data_to_clip_in_place(self, buffer: &mut [f64]) -> PlotResult<()> {
        map_pairs_in_place(buffer, |x, y| self.data_to_clip(x, y))
    }
}

fn map_pairs_in_place<F>(buffer: &mut [f64], map: F) -> PlotResult<()>
where
    F: Fn(f64, f64) -> (f64, f64) + Send + Sync,
{
    if buffer.len() % 2 != 0 {
        return Err(PlotError::InvalidData(format!(
            "interleaved coordinate buffer must have even length, got {}",
            buffer.len()
        )));
    }

    #[cfg(feature = "parallel-transform")]
    {
        buffer.par_chunks_exact_mut(2).for_each(|pair| {
            let (a, b) = map(pair[0], pair[1]);
            pair[0] = a;
            pair[1] = b;
        });
    }

    #[cfg(not(feature = "parallel-transform"))]
    {
        for pair in buffer.chunks_exact_mut(2) {
            let (a, b) = map(pair[0], pair[1]);
            pair[0] = a;
            pair[1] = b;
        }
    }

    Ok(())
}
