use crate::core::{
    AxisDirection, GridVisibility, GridlineEngineConfig, LabelFormatter, ScissorRect,
    SubdivisionSpec, TickLevel, TierVisibility,
};
use crate::error::{PlotError, PlotResult};

use super::{AxisTierStyles, ScissorBoxStyle, TierStyle};

/// Immutable gridlines setup: engine tuning, per-tier styles and clipping.
///
/// Built once through [`GridlineConfigBuilder`], which validates everything.
#[derive(Debug, Clone)]
pub struct GridlineConfig {
    engine: GridlineEngineConfig,
    x_styles: AxisTierStyles,
    y_styles: AxisTierStyles,
    scissor: ScissorRect,
    scissor_box: ScissorBoxStyle,
}

impl Default for GridlineConfig {
    fn default() -> Self {
        Self {
            engine: GridlineEngineConfig::default(),
            x_styles: AxisTierStyles::default_for(AxisDirection::X),
            y_styles: AxisTierStyles::default_for(AxisDirection::Y),
            scissor: ScissorRect::unbounded(),
            scissor_box: ScissorBoxStyle::default(),
        }
    }
}

impl GridlineConfig {
    #[must_use]
    pub fn builder() -> GridlineConfigBuilder {
        GridlineConfigBuilder::default()
    }

    #[must_use]
    pub fn engine(&self) -> &GridlineEngineConfig {
        &self.engine
    }

    #[must_use]
    pub fn styles(&self, axis: AxisDirection) -> &AxisTierStyles {
        match axis {
            AxisDirection::X => &self.x_styles,
            AxisDirection::Y => &self.y_styles,
        }
    }

    #[must_use]
    pub fn style(&self, axis: AxisDirection, level: TickLevel) -> &TierStyle {
        self.styles(axis).tier(level)
    }

    /// Per-axis tier visibility handed to the engine.
    #[must_use]
    pub fn visibility(&self) -> GridVisibility {
        let axis_visibility = |styles: &AxisTierStyles| TierVisibility {
            axis: styles.axis.display,
            normal: styles.normal.display,
            thin: styles.thin.display,
        };
        GridVisibility {
            x: axis_visibility(&self.x_styles),
            y: axis_visibility(&self.y_styles),
        }
    }

    #[must_use]
    pub fn scissor(&self) -> ScissorRect {
        self.scissor
    }

    #[must_use]
    pub fn scissor_box(&self) -> ScissorBoxStyle {
        self.scissor_box
    }

    fn validate(&self) -> PlotResult<()> {
        self.engine.validate()?;
        for axis in AxisDirection::ALL {
            for level in TickLevel::ALL {
                self.style(axis, level).validate()?;
            }
        }
        self.scissor.validate()?;
        if !self.scissor_box.line_thickness.is_finite() || self.scissor_box.line_thickness <= 0.0
        {
            return Err(PlotError::InvalidConfiguration(
                "scissor box thickness must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`GridlineConfig`].
#[derive(Debug, Clone, Default)]
pub struct GridlineConfigBuilder {
    config: GridlineConfig,
}

impl GridlineConfigBuilder {
    #[must_use]
    pub fn engine_config(mut self, engine: GridlineEngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    #[must_use]
    pub fn subdivisions(mut self, subdivisions: SubdivisionSpec) -> Self {
        self.config.engine.subdivisions = subdivisions;
        self
    }

    #[must_use]
    pub fn ideal_pixel_dists(mut self, normal: f64, thin: f64) -> Self {
        self.config.engine.ideal_normal_pixel_dist = normal;
        self.config.engine.ideal_thin_pixel_dist = thin;
        self
    }

    #[must_use]
    pub fn force_equal_thin_division(mut self, enabled: bool) -> Self {
        self.config.engine.force_equal_thin_division = enabled;
        self
    }

    #[must_use]
    pub fn gridline_limit(mut self, limit: usize) -> Self {
        self.config.engine.gridline_limit = limit;
        self
    }

    #[must_use]
    pub fn tier_style(mut self, axis: AxisDirection, level: TickLevel, style: TierStyle) -> Self {
        *self.styles_mut(axis).tier_mut(level) = style;
        self
    }

    /// Edits one tier's style in place, starting from its current value.
    #[must_use]
    pub fn update_tier_style(
        mut self,
        axis: AxisDirection,
        level: TickLevel,
        update: impl FnOnce(&mut TierStyle),
    ) -> Self {
        update(self.styles_mut(axis).tier_mut(level));
        self
    }

    /// Shows or hides one tier on both axes.
    #[must_use]
    pub fn tier_display(mut self, level: TickLevel, display: bool) -> Self {
        for axis in AxisDirection::ALL {
            self.styles_mut(axis).tier_mut(level).display = display;
        }
        self
    }

    /// Uses `formatter` for every tier label.
    #[must_use]
    pub fn label_formatter(mut self, formatter: LabelFormatter) -> Self {
        for axis in AxisDirection::ALL {
            for level in TickLevel::ALL {
                self.styles_mut(axis).tier_mut(level).label_formatter = formatter;
            }
        }
        self
    }

    #[must_use]
    pub fn scissor(mut self, scissor: ScissorRect) -> Self {
        self.config.scissor = scissor;
        self
    }

    #[must_use]
    pub fn scissor_box(mut self, style: ScissorBoxStyle) -> Self {
        self.config.scissor_box = style;
        self
    }

    pub fn build(self) -> PlotResult<GridlineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    fn styles_mut(&mut self, axis: AxisDirection) -> &mut AxisTierStyles {
        match axis {
            AxisDirection::X => &mut self.config.x_styles,
            AxisDirection::Y => &mut self.config.y_styles,
        }
    }
}
