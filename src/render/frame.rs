use crate::core::CanvasSize;
use crate::error::PlotResult;
use crate::render::{Color, LinePrimitive, TextPrimitive};

/// Backend-agnostic scene for one plot draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub canvas: CanvasSize,
    pub background: Color,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            background: Color::WHITE,
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.lines.push(line);
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.texts.push(text);
    }

    pub fn validate(&self) -> PlotResult<()> {
        self.canvas.validate()?;
        self.background.validate()?;

        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.texts.is_empty()
    }
}
