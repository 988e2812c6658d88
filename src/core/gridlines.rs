use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::tick_spacing::{
    AxisSpacing, DEFAULT_IDEAL_NORMAL_PIXEL_DIST, DEFAULT_IDEAL_THIN_PIXEL_DIST, GridSpacing,
    TickSpacingSolver,
};
use crate::core::{AxisDirection, CoordinateTransform, SubdivisionSpec, TickLevel};
use crate::error::{PlotError, PlotResult};

pub const DEFAULT_GRIDLINE_LIMIT: usize = 500;

/// Upper bound on widening rounds before the gridline limit is given up on.
const MAX_WIDEN_STEPS: usize = 64;

/// Largest index magnitude whose product with a spacing is still exact in f64.
const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

/// Tuning for the adaptive gridline engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridlineEngineConfig {
    #[serde(default)]
    pub subdivisions: SubdivisionSpec,
    #[serde(default = "default_ideal_normal_pixel_dist")]
    pub ideal_normal_pixel_dist: f64,
    #[serde(default = "default_ideal_thin_pixel_dist")]
    pub ideal_thin_pixel_dist: f64,
    #[serde(default = "default_force_equal_thin_division")]
    pub force_equal_thin_division: bool,
    #[serde(default = "default_gridline_limit")]
    pub gridline_limit: usize,
}

impl Default for GridlineEngineConfig {
    fn default() -> Self {
        Self {
            subdivisions: SubdivisionSpec::default(),
            ideal_normal_pixel_dist: default_ideal_normal_pixel_dist(),
            ideal_thin_pixel_dist: default_ideal_thin_pixel_dist(),
            force_equal_thin_division: default_force_equal_thin_division(),
            gridline_limit: default_gridline_limit(),
        }
    }
}

impl GridlineEngineConfig {
    #[must_use]
    pub fn with_subdivisions(mut self, subdivisions: SubdivisionSpec) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    #[must_use]
    pub fn with_ideal_pixel_dists(mut self, normal: f64, thin: f64) -> Self {
        self.ideal_normal_pixel_dist = normal;
        self.ideal_thin_pixel_dist = thin;
        self
    }

    #[must_use]
    pub fn with_force_equal_thin_division(mut self, enabled: bool) -> Self {
        self.force_equal_thin_division = enabled;
        self
    }

    #[must_use]
    pub fn with_gridline_limit(mut self, limit: usize) -> Self {
        self.gridline_limit = limit;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        GridlineEngine::new(self).map(|_| ())
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PlotError::InvalidData(format!("failed to serialize gridline config: {e}"))
        })
    }

    /// Parses and validates a config; missing fields fall back to defaults.
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            PlotError::InvalidData(format!("failed to parse gridline config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn default_ideal_normal_pixel_dist() -> f64 {
    DEFAULT_IDEAL_NORMAL_PIXEL_DIST
}

fn default_ideal_thin_pixel_dist() -> f64 {
    DEFAULT_IDEAL_THIN_PIXEL_DIST
}

fn default_force_equal_thin_division() -> bool {
    true
}

fn default_gridline_limit() -> usize {
    DEFAULT_GRIDLINE_LIMIT
}

/// Which tiers are displayed; hidden tiers produce empty lists and do not
/// suppress coordinates in the other tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierVisibility {
    pub axis: bool,
    pub normal: bool,
    pub thin: bool,
}

impl Default for TierVisibility {
    fn default() -> Self {
        Self {
            axis: true,
            normal: true,
            thin: true,
        }
    }
}

impl TierVisibility {
    #[must_use]
    pub fn is_visible(self, level: TickLevel) -> bool {
        match level {
            TickLevel::Axis => self.axis,
            TickLevel::Normal => self.normal,
            TickLevel::Thin => self.thin,
        }
    }
}

/// Tier visibility for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridVisibility {
    pub x: TierVisibility,
    pub y: TierVisibility,
}

impl GridVisibility {
    #[must_use]
    pub fn uniform(visibility: TierVisibility) -> Self {
        Self {
            x: visibility,
            y: visibility,
        }
    }

    #[must_use]
    pub fn axis(self, axis: AxisDirection) -> TierVisibility {
        match axis {
            AxisDirection::X => self.x,
            AxisDirection::Y => self.y,
        }
    }
}

/// Ascending data-space coordinates of one axis, per tier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisGridSet {
    pub axis: Vec<f64>,
    pub normal: Vec<f64>,
    pub thin: Vec<f64>,
}

impl AxisGridSet {
    #[must_use]
    pub fn coords(&self, level: TickLevel) -> &[f64] {
        match level {
            TickLevel::Axis => &self.axis,
            TickLevel::Normal => &self.normal,
            TickLevel::Thin => &self.thin,
        }
    }

    #[must_use]
    pub fn total_len(&self) -> usize {
        self.axis.len() + self.normal.len() + self.thin.len()
    }
}

/// Result of one recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridlineSet {
    pub x: AxisGridSet,
    pub y: AxisGridSet,
    pub spacing: GridSpacing,
}

impl GridlineSet {
    #[must_use]
    pub fn axis(&self, axis: AxisDirection) -> &AxisGridSet {
        match axis {
            AxisDirection::X => &self.x,
            AxisDirection::Y => &self.y,
        }
    }

    #[must_use]
    pub fn coords(&self, axis: AxisDirection, level: TickLevel) -> &[f64] {
        self.axis(axis).coords(level)
    }
}

/// Inclusive integer index range `start..=end` for multiples of a spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexRange {
    start: i64,
    end: i64,
}

impl IndexRange {
    fn new(start: f64, end: f64) -> PlotResult<Self> {
        for bound in [start, end] {
            if !bound.is_finite() || bound.abs() > MAX_EXACT_INDEX {
                return Err(PlotError::NumericDegeneracy(format!(
                    "gridline index bound {bound} is not representable"
                )));
            }
        }
        Ok(Self {
            start: start as i64,
            end: end as i64,
        })
    }

    /// Tier range: multiples strictly inside the bounds.
    fn inward(min: f64, max: f64, spacing: f64) -> PlotResult<Self> {
        Self::new((min / spacing).ceil(), (max / spacing).floor())
    }

    /// Tier range widened by one boundary line on each side when the bounds
    /// are not exact multiples.
    fn outward(min: f64, max: f64, spacing: f64) -> PlotResult<Self> {
        Self::new((min / spacing).floor(), (max / spacing).ceil())
    }

    fn len(self) -> usize {
        if self.end < self.start {
            0
        } else {
            usize::try_from(self.end - self.start).map_or(usize::MAX, |n| n.saturating_add(1))
        }
    }
}

/// Adaptive gridline engine: solve spacings, then enumerate coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GridlineEngine {
    solver: TickSpacingSolver,
    gridline_limit: usize,
}

impl Default for GridlineEngine {
    fn default() -> Self {
        Self {
            solver: TickSpacingSolver::default(),
            gridline_limit: DEFAULT_GRIDLINE_LIMIT,
        }
    }
}

impl GridlineEngine {
    pub fn new(config: &GridlineEngineConfig) -> PlotResult<Self> {
        if config.gridline_limit == 0 {
            return Err(PlotError::InvalidConfiguration(
                "gridline limit must be > 0".to_owned(),
            ));
        }
        let solver = TickSpacingSolver::new(
            config.subdivisions.clone(),
            config.ideal_normal_pixel_dist,
            config.ideal_thin_pixel_dist,
            config.force_equal_thin_division,
        )?;
        Ok(Self {
            solver,
            gridline_limit: config.gridline_limit,
        })
    }

    #[must_use]
    pub fn solver(&self) -> &TickSpacingSolver {
        &self.solver
    }

    #[must_use]
    pub fn gridline_limit(&self) -> usize {
        self.gridline_limit
    }

    /// Runs the solve and enumerate phases against one transform snapshot.
    ///
    /// Nothing is kept between calls. On error no partial set is returned.
    pub fn compute(
        &self,
        transform: CoordinateTransform,
        visibility: GridVisibility,
    ) -> PlotResult<GridlineSet> {
        let mut spacing = self.solver.solve(transform)?;
        self.enforce_gridline_limit(transform, &mut spacing, visibility)?;
        let set = self.enumerate(transform, spacing, visibility)?;

        debug!(
            x_axis = set.x.axis.len(),
            x_normal = set.x.normal.len(),
            x_thin = set.x.thin.len(),
            y_axis = set.y.axis.len(),
            y_normal = set.y.normal.len(),
            y_thin = set.y.thin.len(),
            "recomputed gridlines"
        );
        Ok(set)
    }

    /// Enumerates tier coordinates for already solved spacings.
    pub fn enumerate(
        &self,
        transform: CoordinateTransform,
        spacing: GridSpacing,
        visibility: GridVisibility,
    ) -> PlotResult<GridlineSet> {
        let x = enumerate_axis(
            transform.bounds_min_x(),
            transform.bounds_max_x(),
            spacing.x,
            transform.is_x_in_view(0.0),
            visibility.x,
        )?;
        let y = enumerate_axis(
            transform.bounds_min_y(),
            transform.bounds_max_y(),
            spacing.y,
            transform.is_y_in_view(0.0),
            visibility.y,
        )?;
        Ok(GridlineSet { x, y, spacing })
    }

    fn enforce_gridline_limit(
        &self,
        transform: CoordinateTransform,
        spacing: &mut GridSpacing,
        visibility: GridVisibility,
    ) -> PlotResult<()> {
        for _ in 0..MAX_WIDEN_STEPS {
            let Some((axis, level)) = self.first_overflow(transform, spacing, visibility)? else {
                return Ok(());
            };
            trace!(?axis, ?level, limit = self.gridline_limit, "widening gridline spacing");
            match level {
                TickLevel::Thin => self.solver.widen_thin(spacing, axis)?,
                TickLevel::Axis | TickLevel::Normal => self.solver.widen_normal(spacing, axis)?,
            }
        }

        if let Some((axis, level)) = self.first_overflow(transform, spacing, visibility)? {
            warn!(
                ?axis,
                ?level,
                limit = self.gridline_limit,
                "gridline limit still exceeded after widening; emitting anyway"
            );
        }
        Ok(())
    }

    fn first_overflow(
        &self,
        transform: CoordinateTransform,
        spacing: &GridSpacing,
        visibility: GridVisibility,
    ) -> PlotResult<Option<(AxisDirection, TickLevel)>> {
        for axis in AxisDirection::ALL {
            let (min, max) = axis_bounds(transform, axis);
            let axis_spacing = spacing.axis(axis);
            let visibility = visibility.axis(axis);
            if visibility.normal
                && IndexRange::inward(min, max, axis_spacing.normal_spacing)?.len()
                    > self.gridline_limit
            {
                return Ok(Some((axis, TickLevel::Normal)));
            }
            if visibility.thin
                && IndexRange::outward(min, max, axis_spacing.thin_spacing)?.len()
                    > self.gridline_limit
            {
                return Ok(Some((axis, TickLevel::Thin)));
            }
        }
        Ok(None)
    }
}

fn axis_bounds(transform: CoordinateTransform, axis: AxisDirection) -> (f64, f64) {
    match axis {
        AxisDirection::X => (transform.bounds_min_x(), transform.bounds_max_x()),
        AxisDirection::Y => (transform.bounds_min_y(), transform.bounds_max_y()),
    }
}

fn enumerate_axis(
    min: f64,
    max: f64,
    spacing: AxisSpacing,
    origin_in_view: bool,
    visibility: TierVisibility,
) -> PlotResult<AxisGridSet> {
    let mut set = AxisGridSet::default();

    if visibility.thin {
        let range = IndexRange::outward(min, max, spacing.thin_spacing)?;
        let denominator = i64::from(spacing.thin_denominator);
        set.thin.reserve(range.len());
        for i in range.start..=range.end {
            // Normal and axis tiers already draw these positions.
            if visibility.normal && i % denominator == 0 {
                continue;
            }
            if visibility.axis && origin_in_view && i == 0 {
                continue;
            }
            set.thin.push(i as f64 * spacing.thin_spacing);
        }
    }

    if visibility.normal {
        let range = IndexRange::inward(min, max, spacing.normal_spacing)?;
        set.normal.reserve(range.len());
        for i in range.start..=range.end {
            if visibility.axis && origin_in_view && i == 0 {
                continue;
            }
            set.normal.push(i as f64 * spacing.normal_spacing);
        }
    }

    if visibility.axis && origin_in_view {
        set.axis.push(0.0);
    }

    for value in set.thin.iter().chain(&set.normal) {
        if !value.is_finite() {
            return Err(PlotError::NumericDegeneracy(format!(
                "gridline coordinate {value} is not finite"
            )));
        }
    }

    Ok(set)
}
