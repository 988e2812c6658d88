use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::error::{PlotError, PlotResult};

/// Candidate thin denominators attached to one normal ratio.
pub type ThinDenominators = SmallVec<[u32; 4]>;

/// One "nice number" option: normal spacing is `normal * 10^k`, thin spacing
/// divides it by one of `thin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    pub normal: u32,
    pub thin: ThinDenominators,
}

impl Subdivision {
    #[must_use]
    pub fn new(normal: u32, thin: impl IntoIterator<Item = u32>) -> Self {
        Self {
            normal,
            thin: thin.into_iter().collect(),
        }
    }
}

/// Ordered palette of allowed subdivisions.
///
/// Order matters: nearest-value searches keep the earliest candidate on ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Subdivision>", into = "Vec<Subdivision>")]
pub struct SubdivisionSpec {
    entries: Vec<Subdivision>,
}

impl SubdivisionSpec {
    pub fn new(entries: Vec<Subdivision>) -> PlotResult<Self> {
        if entries.is_empty() {
            return Err(PlotError::InvalidConfiguration(
                "subdivision palette must not be empty".to_owned(),
            ));
        }
        for entry in &entries {
            if entry.normal == 0 {
                return Err(PlotError::InvalidConfiguration(
                    "subdivision normal ratio must be > 0".to_owned(),
                ));
            }
            if entry.thin.is_empty() {
                return Err(PlotError::InvalidConfiguration(format!(
                    "subdivision with normal ratio {} has no thin denominators",
                    entry.normal
                )));
            }
            if entry.thin.contains(&0) {
                return Err(PlotError::InvalidConfiguration(format!(
                    "subdivision with normal ratio {} has a zero thin denominator",
                    entry.normal
                )));
            }
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[Subdivision] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Subdivision> {
        self.entries.get(index)
    }
}

impl Default for SubdivisionSpec {
    fn default() -> Self {
        Self {
            entries: vec![
                Subdivision {
                    normal: 2,
                    thin: smallvec![4],
                },
                Subdivision {
                    normal: 5,
                    thin: smallvec![5, 10],
                },
                Subdivision {
                    normal: 1,
                    thin: smallvec![5],
                },
            ],
        }
    }
}

impl TryFrom<Vec<Subdivision>> for SubdivisionSpec {
    type Error = PlotError;

    fn try_from(entries: Vec<Subdivision>) -> PlotResult<Self> {
        Self::new(entries)
    }
}

impl From<SubdivisionSpec> for Vec<Subdivision> {
    fn from(spec: SubdivisionSpec) -> Self {
        spec.entries
    }
}
