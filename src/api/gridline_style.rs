use serde::{Deserialize, Serialize};

use crate::core::{AxisDirection, LabelFormatter, TickLevel, format_label};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, TextHAlign, TextVAlign};

/// Compass anchor of a label relative to the point it annotates.
///
/// `S` places the text below the point, `E` to its right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelAnchor {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    Center,
}

impl LabelAnchor {
    #[must_use]
    pub fn v_align(self) -> TextVAlign {
        match self {
            Self::N | Self::NE | Self::NW => TextVAlign::Bottom,
            Self::S | Self::SE | Self::SW => TextVAlign::Top,
            Self::E | Self::W | Self::Center => TextVAlign::Middle,
        }
    }

    #[must_use]
    pub fn h_align(self) -> TextHAlign {
        match self {
            Self::E | Self::NE | Self::SE => TextHAlign::Left,
            Self::W | Self::NW | Self::SW => TextHAlign::Right,
            Self::N | Self::S | Self::Center => TextHAlign::Center,
        }
    }

    /// Pixel offset that moves a label `padding` away from its point.
    #[must_use]
    pub fn offset(self, padding: f64) -> (f64, f64) {
        let dx = match self.h_align() {
            TextHAlign::Left => padding,
            TextHAlign::Right => -padding,
            TextHAlign::Center => 0.0,
        };
        let dy = match self.v_align() {
            TextVAlign::Top => padding,
            TextVAlign::Bottom => -padding,
            TextVAlign::Middle => 0.0,
        };
        (dx, dy)
    }
}

/// Where labels sit along the direction perpendicular to their gridlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LabelPosition {
    /// Follow the perpendicular axis line, clamped inside the canvas.
    #[default]
    Dynamic,
    /// Pin to the bottom canvas edge (X labels) or left edge (Y labels).
    Edge,
}

/// Visual style of one gridline tier on one axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierStyle {
    pub display: bool,
    pub line_color: Color,
    pub line_thickness: f64,
    pub display_ticks: bool,
    pub tick_length: f64,
    pub tick_thickness: f64,
    pub tick_color: Color,
    pub display_labels: bool,
    pub label_anchor: LabelAnchor,
    #[serde(default)]
    pub label_position: LabelPosition,
    pub label_padding: f64,
    pub label_font_size: f64,
    pub label_color: Color,
    #[serde(skip, default = "default_label_formatter")]
    pub label_formatter: LabelFormatter,
}

fn default_label_formatter() -> LabelFormatter {
    format_label
}

impl TierStyle {
    /// Default style for a tier: bold axis, regular normal lines, hairline thin
    /// lines without labels.
    #[must_use]
    pub fn default_for(axis: AxisDirection, level: TickLevel) -> Self {
        let (line_thickness, display_labels) = match level {
            TickLevel::Axis => (2.0, true),
            TickLevel::Normal => (1.0, true),
            TickLevel::Thin => (0.5, false),
        };
        let label_anchor = match axis {
            AxisDirection::X => LabelAnchor::S,
            AxisDirection::Y => LabelAnchor::E,
        };

        Self {
            display: true,
            line_color: Color::BLACK,
            line_thickness,
            display_ticks: true,
            tick_length: 10.0,
            tick_thickness: 2.0,
            tick_color: Color::BLACK,
            display_labels,
            label_anchor,
            label_position: LabelPosition::Dynamic,
            label_padding: 2.0,
            label_font_size: 10.0,
            label_color: Color::BLACK,
            label_formatter: format_label,
        }
    }

    pub fn validate(&self) -> PlotResult<()> {
        for (name, value) in [
            ("line thickness", self.line_thickness),
            ("tick thickness", self.tick_thickness),
            ("label font size", self.label_font_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlotError::InvalidConfiguration(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("tick length", self.tick_length),
            ("label padding", self.label_padding),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::InvalidConfiguration(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for color in [self.line_color, self.tick_color, self.label_color] {
            color
                .validate()
                .map_err(|e| PlotError::InvalidConfiguration(e.to_string()))?;
        }
        Ok(())
    }
}

/// Styles of the three tiers of one axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisTierStyles {
    pub axis: TierStyle,
    pub normal: TierStyle,
    pub thin: TierStyle,
}

impl AxisTierStyles {
    #[must_use]
    pub fn default_for(axis: AxisDirection) -> Self {
        Self {
            axis: TierStyle::default_for(axis, TickLevel::Axis),
            normal: TierStyle::default_for(axis, TickLevel::Normal),
            thin: TierStyle::default_for(axis, TickLevel::Thin),
        }
    }

    #[must_use]
    pub fn tier(&self, level: TickLevel) -> &TierStyle {
        match level {
            TickLevel::Axis => &self.axis,
            TickLevel::Normal => &self.normal,
            TickLevel::Thin => &self.thin,
        }
    }

    pub fn tier_mut(&mut self, level: TickLevel) -> &mut TierStyle {
        match level {
            TickLevel::Axis => &mut self.axis,
            TickLevel::Normal => &mut self.normal,
            TickLevel::Thin => &mut self.thin,
        }
    }
}

/// Outline drawn around a finite scissor rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScissorBoxStyle {
    pub display: bool,
    pub line_thickness: f64,
    pub color: Color,
}

impl Default for ScissorBoxStyle {
    fn default() -> Self {
        Self {
            display: false,
            line_thickness: 2.0,
            color: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LabelAnchor, TierStyle};
    use crate::core::{AxisDirection, TickLevel};
    use crate::render::{TextHAlign, TextVAlign};

    #[test]
    fn south_anchor_hangs_text_below_point() {
        assert_eq!(LabelAnchor::S.v_align(), TextVAlign::Top);
        assert_eq!(LabelAnchor::S.h_align(), TextHAlign::Center);
        assert_eq!(LabelAnchor::S.offset(2.0), (0.0, 2.0));
    }

    #[test]
    fn east_anchor_puts_text_right_of_point() {
        assert_eq!(LabelAnchor::E.v_align(), TextVAlign::Middle);
        assert_eq!(LabelAnchor::E.h_align(), TextHAlign::Left);
        assert_eq!(LabelAnchor::NW.offset(3.0), (-3.0, -3.0));
    }

    #[test]
    fn thin_tier_hides_labels_by_default() {
        let thin = TierStyle::default_for(AxisDirection::X, TickLevel::Thin);
        assert!(!thin.display_labels);
        assert_eq!(thin.line_thickness, 0.5);
        let axis = TierStyle::default_for(AxisDirection::Y, TickLevel::Axis);
        assert_eq!(axis.label_anchor, LabelAnchor::E);
        assert_eq!(axis.line_thickness, 2.0);
    }

    #[test]
    fn negative_padding_is_rejected() {
        let mut style = TierStyle::default_for(AxisDirection::X, TickLevel::Normal);
        style.label_padding = -1.0;
        assert!(style.validate().is_err());
    }
}
