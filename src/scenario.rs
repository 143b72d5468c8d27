//! Synthetic ranked-choice data.
//!
//! Generates reproducible student records for demos and tests. Each
//! student ranks `ranks` distinct activities. With a popularity skew,
//! activities earlier in the catalog are ranked higher more often, which
//! mimics the lopsided demand of real sign-up sheets.
//!
//! # Sampling
//! Weighted sampling without replacement by exponential keys: activity
//! `i` gets weight `1 / (i + 1)^skew` and key `u^(1 / weight)` for
//! uniform `u`; choices are the keys in descending order. A skew of 0
//! is a uniform random permutation.
//!
//! # Reference
//! Efraimidis & Spirakis (2006), "Weighted random sampling with a reservoir"

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{ActivityCatalog, StudentRecord, DEFAULT_RANK_WEIGHTS};

const FIRST_NAMES: [&str; 12] = [
    "Ada", "Alan", "Barbara", "Claude", "Donald", "Edsger", "Frances", "Grace", "John", "Katherine",
    "Leslie", "Margaret",
];

const LAST_NAMES: [&str; 10] = [
    "Allen", "Dijkstra", "Hopper", "Johnson", "Knuth", "Lamport", "Liskov", "Lovelace", "Shannon",
    "Turing",
];

/// Seeded generator of student records.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    seed: u64,
    students: usize,
    ranks: usize,
    skew: f64,
}

impl ScenarioGenerator {
    /// Creates a generator with 30 students, 4 ranks and no skew.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            students: 30,
            ranks: DEFAULT_RANK_WEIGHTS.len(),
            skew: 0.0,
        }
    }

    /// Sets the number of students.
    pub fn with_students(mut self, students: usize) -> Self {
        self.students = students;
        self
    }

    /// Sets the number of ranked choices per student.
    pub fn with_ranks(mut self, ranks: usize) -> Self {
        self.ranks = ranks;
        self
    }

    /// Sets the popularity skew (0 = uniform; negative values act as 0).
    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = skew.max(0.0);
        self
    }

    /// Generates the records.
    ///
    /// The same seed and settings always give the same records. Each
    /// student gets `min(ranks, catalog.len())` distinct choices.
    pub fn generate(&self, catalog: &ActivityCatalog) -> Vec<StudentRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let names = catalog.names();
        let ranks = self.ranks.min(names.len());

        (0..self.students)
            .map(|i| {
                let order = self.ranked_order(names.len(), &mut rng);
                let first = FIRST_NAMES[i % FIRST_NAMES.len()];
                let last = LAST_NAMES[(i / FIRST_NAMES.len() + i) % LAST_NAMES.len()];
                StudentRecord::new(first, format!("{last}{}", i + 1))
                    .with_choices(order.into_iter().take(ranks).map(|a| names[a]))
            })
            .collect()
    }

    fn ranked_order<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        if self.skew == 0.0 {
            order.shuffle(rng);
            return order;
        }

        let keys: Vec<f64> = (0..n)
            .map(|i| {
                let weight = 1.0 / ((i + 1) as f64).powf(self.skew);
                let u: f64 = rng.random();
                u.powf(1.0 / weight)
            })
            .collect();
        order.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PreferenceIndex;
    use crate::models::AssignmentConfig;

    #[test]
    fn test_reproducible() {
        let catalog = AssignmentConfig::science_fair().catalog;
        let a = ScenarioGenerator::new(9).with_students(20).generate(&catalog);
        let b = ScenarioGenerator::new(9).with_students(20).generate(&catalog);
        let c = ScenarioGenerator::new(10).with_students(20).generate(&catalog);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_distinct_catalog_choices() {
        let config = AssignmentConfig::science_fair();
        let records = ScenarioGenerator::new(1)
            .with_students(40)
            .with_skew(1.5)
            .generate(&config.catalog);

        assert_eq!(records.len(), 40);
        let index = PreferenceIndex::build(&records, &config.catalog, 4).unwrap();
        for student in index.students() {
            assert!(!student.has_duplicate_choices());
        }
    }

    #[test]
    fn test_ranks_capped_by_catalog() {
        let catalog = ActivityCatalog::from_names(["A", "B"]);
        let records = ScenarioGenerator::new(3)
            .with_students(5)
            .with_ranks(4)
            .generate(&catalog);

        assert!(records.iter().all(|r| r.choices.len() == 2));
    }

    #[test]
    fn test_skew_favors_early_activities() {
        let catalog = ActivityCatalog::from_names(["A", "B", "C", "D", "E", "F"]);
        let records = ScenarioGenerator::new(5)
            .with_students(300)
            .with_skew(2.0)
            .generate(&catalog);

        let firsts_a = records.iter().filter(|r| r.choices[0] == "A").count();
        let firsts_f = records.iter().filter(|r| r.choices[0] == "F").count();
        assert!(firsts_a > firsts_f * 3);
    }
}
