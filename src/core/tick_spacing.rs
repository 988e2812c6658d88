use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{AxisDirection, CoordinateTransform, SubdivisionSpec};
use crate::error::{PlotError, PlotResult};

pub const DEFAULT_IDEAL_NORMAL_PIXEL_DIST: f64 = 140.0;
pub const DEFAULT_IDEAL_THIN_PIXEL_DIST: f64 = 50.0;

/// Relative slack used when looking for a spacing strictly wider than the current one.
const WIDEN_EPSILON: f64 = 1e-9;

/// Solved spacing for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpacing {
    pub normal_spacing: f64,
    pub thin_spacing: f64,
    pub thin_denominator: u32,
    /// Index into the palette entry that produced `normal_spacing`.
    pub subdivision_index: usize,
    pub ideal_thin_denominator: f64,
    /// Absolute pixel length of one data unit along this axis.
    pub pixels_per_unit: f64,
}

impl AxisSpacing {
    fn thin_error(self) -> f64 {
        (f64::from(self.thin_denominator) - self.ideal_thin_denominator).abs()
    }

    fn set_thin_denominator(&mut self, denominator: u32) {
        self.thin_denominator = denominator;
        self.thin_spacing = self.normal_spacing / f64::from(denominator);
    }
}

/// Solved spacings for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpacing {
    pub x: AxisSpacing,
    pub y: AxisSpacing,
}

impl GridSpacing {
    #[must_use]
    pub fn axis(&self, axis: AxisDirection) -> &AxisSpacing {
        match axis {
            AxisDirection::X => &self.x,
            AxisDirection::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: AxisDirection) -> &mut AxisSpacing {
        match axis {
            AxisDirection::X => &mut self.x,
            AxisDirection::Y => &mut self.y,
        }
    }
}

/// Picks "nice" normal and thin spacings from a subdivision palette.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSpacingSolver {
    subdivisions: SubdivisionSpec,
    ideal_normal_pixel_dist: f64,
    ideal_thin_pixel_dist: f64,
    force_equal_thin_division: bool,
}

impl Default for TickSpacingSolver {
    fn default() -> Self {
        Self {
            subdivisions: SubdivisionSpec::default(),
            ideal_normal_pixel_dist: DEFAULT_IDEAL_NORMAL_PIXEL_DIST,
            ideal_thin_pixel_dist: DEFAULT_IDEAL_THIN_PIXEL_DIST,
            force_equal_thin_division: true,
        }
    }
}

impl TickSpacingSolver {
    pub fn new(
        subdivisions: SubdivisionSpec,
        ideal_normal_pixel_dist: f64,
        ideal_thin_pixel_dist: f64,
        force_equal_thin_division: bool,
    ) -> PlotResult<Self> {
        if subdivisions.is_empty() {
            return Err(PlotError::InvalidConfiguration(
                "subdivision palette must not be empty".to_owned(),
            ));
        }
        for (name, value) in [
            ("ideal normal pixel distance", ideal_normal_pixel_dist),
            ("ideal thin pixel distance", ideal_thin_pixel_dist),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlotError::InvalidConfiguration(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }

        Ok(Self {
            subdivisions,
            ideal_normal_pixel_dist,
            ideal_thin_pixel_dist,
            force_equal_thin_division,
        })
    }

    #[must_use]
    pub fn subdivisions(&self) -> &SubdivisionSpec {
        &self.subdivisions
    }

    #[must_use]
    pub fn ideal_normal_pixel_dist(&self) -> f64 {
        self.ideal_normal_pixel_dist
    }

    #[must_use]
    pub fn ideal_thin_pixel_dist(&self) -> f64 {
        self.ideal_thin_pixel_dist
    }

    #[must_use]
    pub fn force_equal_thin_division(&self) -> bool {
        self.force_equal_thin_division
    }

    /// Solves normal and thin spacings for both axes of `transform`.
    pub fn solve(&self, transform: CoordinateTransform) -> PlotResult<GridSpacing> {
        let (ideal_x, ideal_y) = transform
            .pixel_vector_to_data_vector(self.ideal_normal_pixel_dist, self.ideal_normal_pixel_dist);
        let ideal_x = ideal_x.abs();
        let ideal_y = ideal_y.abs();

        for ideal in [ideal_x, ideal_y] {
            if !ideal.is_finite() || ideal <= 0.0 {
                let viewport = transform.viewport();
                return Err(PlotError::InvalidViewport {
                    x: viewport.x,
                    y: viewport.y,
                    width: viewport.width,
                    height: viewport.height,
                });
            }
        }

        let x = self.solve_axis(ideal_x, transform.data_vector_to_pixel_vector_x(1.0).abs())?;
        let y = self.solve_axis(ideal_y, transform.data_vector_to_pixel_vector_y(1.0).abs())?;
        let mut spacing = GridSpacing { x, y };
        if self.force_equal_thin_division {
            force_equal_thin_denominators(&mut spacing);
        }
        check_spacing(&spacing)?;

        trace!(
            x_normal = spacing.x.normal_spacing,
            x_thin = spacing.x.thin_spacing,
            y_normal = spacing.y.normal_spacing,
            y_thin = spacing.y.thin_spacing,
            "solved tick spacing"
        );
        Ok(spacing)
    }

    /// Solves one axis from its ideal data-space normal spacing.
    ///
    /// `pixels_per_unit` converts the chosen normal spacing back to pixels so
    /// the thin denominator can be matched against the thin pixel target.
    pub fn solve_axis(&self, ideal_spacing: f64, pixels_per_unit: f64) -> PlotResult<AxisSpacing> {
        if !ideal_spacing.is_finite() || ideal_spacing <= 0.0 {
            return Err(PlotError::NumericDegeneracy(format!(
                "ideal spacing must be finite and > 0, got {ideal_spacing}"
            )));
        }
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(PlotError::NumericDegeneracy(format!(
                "pixel scale must be finite and > 0, got {pixels_per_unit}"
            )));
        }

        let base = 10f64.powf(ideal_spacing.log10().floor());
        let entries = self.subdivisions.entries();
        let subdivision_index = nearest_index(
            entries.iter().map(|entry| normal_multiplier(entry.normal) * base),
            ideal_spacing,
        )
        .ok_or_else(|| {
            PlotError::InvalidConfiguration("subdivision palette must not be empty".to_owned())
        })?;

        let normal_spacing = normal_multiplier(entries[subdivision_index].normal) * base;
        self.axis_spacing_for(normal_spacing, subdivision_index, pixels_per_unit)
    }

    fn axis_spacing_for(
        &self,
        normal_spacing: f64,
        subdivision_index: usize,
        pixels_per_unit: f64,
    ) -> PlotResult<AxisSpacing> {
        let subdivision = self.subdivisions.get(subdivision_index).ok_or_else(|| {
            PlotError::NumericDegeneracy(format!(
                "subdivision index {subdivision_index} is out of range"
            ))
        })?;

        let ideal_thin_denominator =
            normal_spacing * pixels_per_unit / self.ideal_thin_pixel_dist;
        let thin_index = nearest_index(
            subdivision.thin.iter().map(|&d| f64::from(d)),
            ideal_thin_denominator,
        )
        .ok_or_else(|| {
            PlotError::InvalidConfiguration(format!(
                "subdivision with normal ratio {} has no thin denominators",
                subdivision.normal
            ))
        })?;
        let thin_denominator = subdivision.thin[thin_index];

        let spacing = AxisSpacing {
            normal_spacing,
            thin_spacing: normal_spacing / f64::from(thin_denominator),
            thin_denominator,
            subdivision_index,
            ideal_thin_denominator,
            pixels_per_unit,
        };
        check_axis_spacing(spacing)?;
        Ok(spacing)
    }

    /// Moves `axis` to the next nice normal spacing strictly wider than the current one.
    pub fn widen_normal(&self, spacing: &mut GridSpacing, axis: AxisDirection) -> PlotResult<()> {
        let current = *spacing.axis(axis);
        let base = 10f64.powf(current.normal_spacing.log10().floor());
        let threshold = current.normal_spacing * (1.0 + WIDEN_EPSILON);

        let mut best: Option<(usize, f64)> = None;
        for magnitude in [base, base * 10.0] {
            for (index, entry) in self.subdivisions.entries().iter().enumerate() {
                let candidate = normal_multiplier(entry.normal) * magnitude;
                if candidate <= threshold {
                    continue;
                }
                if best.is_none_or(|(_, value)| candidate < value) {
                    best = Some((index, candidate));
                }
            }
        }

        let (subdivision_index, normal_spacing) = best.ok_or_else(|| {
            PlotError::NumericDegeneracy(format!(
                "no wider spacing than {} in subdivision palette",
                current.normal_spacing
            ))
        })?;

        *spacing.axis_mut(axis) =
            self.axis_spacing_for(normal_spacing, subdivision_index, current.pixels_per_unit)?;
        if self.force_equal_thin_division {
            force_equal_thin_denominators(spacing);
        }
        check_spacing(spacing)
    }

    /// Coarsens the thin tier of `axis` by stepping to the next smaller
    /// denominator, widening the normal spacing when none is left.
    pub fn widen_thin(&self, spacing: &mut GridSpacing, axis: AxisDirection) -> PlotResult<()> {
        let current = *spacing.axis(axis);
        let subdivision = self
            .subdivisions
            .get(current.subdivision_index)
            .ok_or_else(|| {
                PlotError::NumericDegeneracy(format!(
                    "subdivision index {} is out of range",
                    current.subdivision_index
                ))
            })?;

        let smaller = subdivision
            .thin
            .iter()
            .copied()
            .filter(|&d| d < current.thin_denominator)
            .fold(None, |best: Option<u32>, d| match best {
                Some(b) if b >= d => Some(b),
                _ => Some(d),
            });

        match smaller {
            Some(denominator) => {
                spacing.axis_mut(axis).set_thin_denominator(denominator);
                if self.force_equal_thin_division {
                    spacing.axis_mut(axis.other()).set_thin_denominator(denominator);
                }
                check_spacing(spacing)
            }
            None => self.widen_normal(spacing, axis),
        }
    }
}

/// Multiple of the decade base a palette ratio stands for; ratio 1 is the next decade.
fn normal_multiplier(ratio: u32) -> f64 {
    if ratio <= 1 {
        10.0
    } else {
        f64::from(ratio)
    }
}

/// Returns the index of the candidate nearest to `target`.
///
/// The first candidate is the default; a later one replaces it only when
/// strictly closer, so ties resolve to the earliest candidate.
#[must_use]
pub fn nearest_index<I>(candidates: I, target: f64) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let distance = (candidate - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/// Imposes the better-fitting axis' thin denominator on both axes.
///
/// Y wins only when strictly better; ties keep X.
fn force_equal_thin_denominators(spacing: &mut GridSpacing) {
    if spacing.y.thin_error() < spacing.x.thin_error() {
        let denominator = spacing.y.thin_denominator;
        spacing.x.set_thin_denominator(denominator);
    } else {
        let denominator = spacing.x.thin_denominator;
        spacing.y.set_thin_denominator(denominator);
    }
}

fn check_axis_spacing(spacing: AxisSpacing) -> PlotResult<()> {
    if !spacing.normal_spacing.is_finite() || spacing.normal_spacing <= 0.0 {
        return Err(PlotError::NumericDegeneracy(format!(
            "normal spacing must be finite and > 0, got {}",
            spacing.normal_spacing
        )));
    }
    if !spacing.thin_spacing.is_finite() || spacing.thin_spacing <= 0.0 {
        return Err(PlotError::NumericDegeneracy(format!(
            "thin spacing must be finite and > 0, got {}",
            spacing.thin_spacing
        )));
    }
    if !spacing.ideal_thin_denominator.is_finite() {
        return Err(PlotError::NumericDegeneracy(
            "ideal thin denominator must be finite".to_owned(),
        ));
    }
    Ok(())
}

fn check_spacing(spacing: &GridSpacing) -> PlotResult<()> {
    check_axis_spacing(spacing.x)?;
    check_axis_spacing(spacing.y)
}
