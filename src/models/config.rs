//! Run configuration.
//!
//! Every constant the assignment model depends on lives here as an
//! explicit value: the activity catalog, the number of periods, the
//! default capacity bounds, the objective weight per preference rank,
//! and how many preferences each student must receive.
//!
//! # Reference scenario
//!
//! [`AssignmentConfig::science_fair`] reproduces the configuration the
//! model was designed for: 11 math-game stations, 3 periods, 5 to 9
//! students per station, weights 1000/100/10/1, 3 of 4 choices honored.

use serde::{Deserialize, Serialize};

use super::{ActivityCatalog, CapacityBounds};

/// Activity names of the reference scenario, in catalog order.
pub const SCIENCE_FAIR_ACTIVITIES: [&str; 11] = [
    "100ChartPicture",
    "BubbleMania",
    "Closeto20",
    "Measuring",
    "MysteryNumber",
    "PicoPhonyZilch",
    "PuzzleinaBag",
    "RacetoaFlat",
    "Salute",
    "ShapeCodes",
    "SteppingStones",
];

/// Default objective weights by rank (rank 1 first).
pub const DEFAULT_RANK_WEIGHTS: [i64; 4] = [1000, 100, 10, 1];

/// Default number of preferences every student must receive.
pub const DEFAULT_REQUIRED_MATCHES: usize = 3;

/// Default number of periods.
pub const DEFAULT_PERIODS: usize = 3;

/// Immutable configuration for one assignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentConfig {
    /// Activities, in id order.
    pub catalog: ActivityCatalog,
    /// Number of periods (P).
    pub periods: usize,
    /// Capacity bounds for activities without an override.
    pub capacity: CapacityBounds,
    /// Objective weight per rank; its length is the number of ranked
    /// choices each student submits.
    pub rank_weights: Vec<i64>,
    /// Exact number of a student's ranked choices that must be assigned.
    pub required_matches: usize,
}

impl AssignmentConfig {
    /// Creates a configuration with default periods, weights, and
    /// required matches, and unbounded-above capacity.
    pub fn new(catalog: ActivityCatalog) -> Self {
        Self {
            catalog,
            periods: DEFAULT_PERIODS,
            capacity: CapacityBounds::new(0, u32::MAX),
            rank_weights: DEFAULT_RANK_WEIGHTS.to_vec(),
            required_matches: DEFAULT_REQUIRED_MATCHES,
        }
    }

    /// The reference science-fair configuration.
    pub fn science_fair() -> Self {
        Self::new(ActivityCatalog::from_names(SCIENCE_FAIR_ACTIVITIES)).with_capacity(5, 9)
    }

    /// Sets the number of periods.
    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods;
        self
    }

    /// Sets the default capacity bounds.
    pub fn with_capacity(mut self, min: u32, max: u32) -> Self {
        self.capacity = CapacityBounds::new(min, max);
        self
    }

    /// Sets the objective weights, rank 1 first.
    pub fn with_rank_weights(mut self, weights: Vec<i64>) -> Self {
        self.rank_weights = weights;
        self
    }

    /// Sets how many ranked choices each student must receive.
    pub fn with_required_matches(mut self, required: usize) -> Self {
        self.required_matches = required;
        self
    }

    /// Replaces the activity catalog.
    pub fn with_catalog(mut self, catalog: ActivityCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Number of ranked choices per student (R).
    #[inline]
    pub fn ranks(&self) -> usize {
        self.rank_weights.len()
    }

    /// Objective weight of a 1-based rank (0 outside the ranked range).
    pub fn weight_of_rank(&self, rank: usize) -> i64 {
        rank.checked_sub(1)
            .and_then(|i| self.rank_weights.get(i).copied())
            .unwrap_or(0)
    }

    /// Effective capacity bounds of an activity.
    pub fn capacity_of(&self, activity: usize) -> CapacityBounds {
        self.catalog
            .get(activity)
            .map(|a| a.capacity_or(self.capacity))
            .unwrap_or(self.capacity)
    }
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self::science_fair()
    }
}
