use std::any::Any;

use tracing::{trace, warn};

use crate::core::{AxisDirection, CoordinateTransform, GridlineEngine, GridlineSet, TickLevel};
use crate::error::PlotResult;
use crate::render::{LinePrimitive, RenderFrame, TextPrimitive};

use super::{GridlineConfig, LabelPosition, PlotElement, TierStyle};

/// Plot element drawing axis, normal and thin gridlines with ticks and labels.
///
/// The last successfully computed [`GridlineSet`] is kept; a failed recompute
/// leaves it untouched so the previous frame can still be drawn.
#[derive(Debug, Clone)]
pub struct Gridlines {
    config: GridlineConfig,
    engine: GridlineEngine,
    precedence: i32,
    display: bool,
    current: Option<GridlineSet>,
}

impl Gridlines {
    pub fn new(config: GridlineConfig) -> PlotResult<Self> {
        let engine = GridlineEngine::new(config.engine())?;
        Ok(Self {
            config,
            engine,
            precedence: 0,
            display: true,
            current: None,
        })
    }

    #[must_use]
    pub fn with_precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    #[must_use]
    pub fn config(&self) -> &GridlineConfig {
        &self.config
    }

    pub fn set_display(&mut self, display: bool) {
        self.display = display;
    }

    /// Last successfully computed gridlines, if any.
    #[must_use]
    pub fn gridline_set(&self) -> Option<&GridlineSet> {
        self.current.as_ref()
    }

    /// Recomputes gridlines for `transform`, replacing the stored set on success.
    pub fn recompute(&mut self, transform: CoordinateTransform) -> PlotResult<&GridlineSet> {
        match self.engine.compute(transform, self.config.visibility()) {
            Ok(set) => Ok(&*self.current.insert(set)),
            Err(err) => {
                warn!(
                    error = %err,
                    has_previous = self.current.is_some(),
                    "gridline recompute failed; keeping previous gridlines"
                );
                Err(err)
            }
        }
    }

    /// Appends line, tick and label primitives for the stored gridlines.
    ///
    /// Coordinates whose pixel position falls outside the scissor rectangle are
    /// skipped here; the stored set is not modified.
    pub fn build_primitives(
        &self,
        transform: CoordinateTransform,
        frame: &mut RenderFrame,
    ) -> PlotResult<()> {
        let Some(set) = &self.current else {
            return Ok(());
        };

        let lines_before = frame.lines.len();
        let texts_before = frame.texts.len();
        // Thin first so heavier tiers are painted on top.
        for level in [TickLevel::Thin, TickLevel::Normal, TickLevel::Axis] {
            for axis in AxisDirection::ALL {
                let style = self.config.style(axis, level);
                if !style.display {
                    continue;
                }
                for &coord in set.coords(axis, level) {
                    self.push_gridline(transform, axis, style, coord, frame);
                }
            }
        }
        self.push_scissor_box(frame);

        trace!(
            lines = frame.lines.len() - lines_before,
            texts = frame.texts.len() - texts_before,
            "built gridline primitives"
        );
        Ok(())
    }

    fn push_gridline(
        &self,
        transform: CoordinateTransform,
        axis: AxisDirection,
        style: &TierStyle,
        coord: f64,
        frame: &mut RenderFrame,
    ) {
        let canvas = transform.canvas();
        let scissor = self.config.scissor();
        let margin = style.label_padding + style.label_font_size;

        match axis {
            AxisDirection::X => {
                let px = transform.data_to_pixel_x(coord);
                if !scissor.contains_x(px) {
                    return;
                }
                frame.push_line(LinePrimitive::new(
                    px,
                    0.0,
                    px,
                    canvas.height,
                    style.line_thickness,
                    style.line_color,
                ));

                let row = match style.label_position {
                    LabelPosition::Dynamic => clamp_to_canvas(
                        transform.data_to_pixel_y(0.0),
                        margin,
                        canvas.height - margin,
                    ),
                    LabelPosition::Edge => canvas.height - margin,
                };
                if style.display_ticks && style.tick_length > 0.0 {
                    let half = style.tick_length / 2.0;
                    frame.push_line(LinePrimitive::new(
                        px,
                        row - half,
                        px,
                        row + half,
                        style.tick_thickness,
                        style.tick_color,
                    ));
                }
                if style.display_labels {
                    push_label(frame, style, coord, px, row);
                }
            }
            AxisDirection::Y => {
                let py = transform.data_to_pixel_y(coord);
                if !scissor.contains_y(py) {
                    return;
                }
                frame.push_line(LinePrimitive::new(
                    0.0,
                    py,
                    canvas.width,
                    py,
                    style.line_thickness,
                    style.line_color,
                ));

                let column = match style.label_position {
                    LabelPosition::Dynamic => clamp_to_canvas(
                        transform.data_to_pixel_x(0.0),
                        margin,
                        canvas.width - margin,
                    ),
                    LabelPosition::Edge => margin,
                };
                if style.display_ticks && style.tick_length > 0.0 {
                    let half = style.tick_length / 2.0;
                    frame.push_line(LinePrimitive::new(
                        column - half,
                        py,
                        column + half,
                        py,
                        style.tick_thickness,
                        style.tick_color,
                    ));
                }
                if style.display_labels {
                    push_label(frame, style, coord, column, py);
                }
            }
        }
    }

    fn push_scissor_box(&self, frame: &mut RenderFrame) {
        let scissor = self.config.scissor();
        let style = self.config.scissor_box();
        if !style.display || !scissor.is_finite() {
            return;
        }

        let corners = [
            (scissor.x0, scissor.y0),
            (scissor.x1, scissor.y0),
            (scissor.x1, scissor.y1),
            (scissor.x0, scissor.y1),
        ];
        for (index, &(x1, y1)) in corners.iter().enumerate() {
            let (x2, y2) = corners[(index + 1) % corners.len()];
            frame.push_line(LinePrimitive::new(
                x1,
                y1,
                x2,
                y2,
                style.line_thickness,
                style.color,
            ));
        }
    }
}

fn push_label(frame: &mut RenderFrame, style: &TierStyle, coord: f64, x: f64, y: f64) {
    let text = (style.label_formatter)(coord);
    if text.is_empty() {
        return;
    }
    let (dx, dy) = style.label_anchor.offset(style.label_padding);
    frame.push_text(TextPrimitive::new(
        text,
        x + dx,
        y + dy,
        style.label_font_size,
        style.label_color,
        style.label_anchor.h_align(),
        style.label_anchor.v_align(),
    ));
}

/// Clamps into `[low, high]`, falling back to the midpoint when the canvas is
/// too small for the margins.
fn clamp_to_canvas(value: f64, low: f64, high: f64) -> f64 {
    if low > high {
        return (low + high) / 2.0;
    }
    value.clamp(low, high)
}

impl PlotElement for Gridlines {
    fn precedence(&self) -> i32 {
        self.precedence
    }

    fn is_displayed(&self) -> bool {
        self.display
    }

    fn update(&mut self, transform: CoordinateTransform) -> PlotResult<()> {
        self.recompute(transform).map(|_| ())
    }

    fn draw(&self, transform: CoordinateTransform, frame: &mut RenderFrame) -> PlotResult<()> {
        self.build_primitives(transform, frame)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
