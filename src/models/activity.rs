//! Activity catalog model.
//!
//! An activity is something a student attends for one period: a station,
//! a workshop, a game table. Activities are identified by their position
//! in an ordered catalog, which is fixed before any model is built.
//!
//! # Capacity
//!
//! Each activity accepts between `min` and `max` students in every period.
//! The bounds normally come from the configuration default; an activity
//! may carry its own override.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable activity identifier (position in the catalog).
pub type ActivityId = usize;

/// Inclusive head-count bounds for one activity in one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityBounds {
    /// Minimum number of students attending.
    pub min: u32,
    /// Maximum number of students attending.
    pub max: u32,
}

impl CapacityBounds {
    /// Creates capacity bounds.
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether a head count lies within the bounds.
    #[inline]
    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && count <= self.max
    }

    /// Whether the bounds admit any head count at all.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.min <= self.max
    }
}

/// An activity that students can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Catalog position.
    pub id: ActivityId,
    /// Display name; also the name used in input and output records.
    pub name: String,
    /// Per-activity capacity override. `None` = use the configured default.
    pub capacity: Option<CapacityBounds>,
}

impl Activity {
    /// Creates an activity without a capacity override.
    pub fn new(id: ActivityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            capacity: None,
        }
    }

    /// Overrides the capacity bounds for this activity.
    pub fn with_capacity(mut self, min: u32, max: u32) -> Self {
        self.capacity = Some(CapacityBounds::new(min, max));
        self
    }

    /// Effective capacity given the configured default.
    pub fn capacity_or(&self, default: CapacityBounds) -> CapacityBounds {
        self.capacity.unwrap_or(default)
    }
}

/// Ordered, immutable list of activities.
///
/// Ids are assigned by position, so `catalog.get(id).id == id` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Activity>", into = "Vec<Activity>")]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
    by_name: HashMap<String, ActivityId>,
}

impl ActivityCatalog {
    /// Creates a catalog from activity names, in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let activities = names
            .into_iter()
            .enumerate()
            .map(|(id, name)| Activity::new(id, name))
            .collect();
        Self::from_activities(activities)
    }

    /// Creates a catalog from prepared activities.
    ///
    /// Ids are renumbered to match positions. When two activities share a
    /// name, lookups resolve to the first one; `validate_config` reports
    /// the duplicate.
    pub fn from_activities(activities: Vec<Activity>) -> Self {
        let activities: Vec<Activity> = activities
            .into_iter()
            .enumerate()
            .map(|(id, mut activity)| {
                activity.id = id;
                activity
            })
            .collect();

        let mut by_name = HashMap::with_capacity(activities.len());
        for activity in &activities {
            by_name.entry(activity.name.clone()).or_insert(activity.id);
        }

        Self {
            activities,
            by_name,
        }
    }

    /// Sets a capacity override on the named activity.
    ///
    /// Unknown names are ignored.
    pub fn with_capacity_override(mut self, name: &str, min: u32, max: u32) -> Self {
        if let Some(&id) = self.by_name.get(name) {
            self.activities[id].capacity = Some(CapacityBounds::new(min, max));
        }
        self
    }

    /// Number of activities (A).
    #[inline]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the catalog is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Looks up an activity by id.
    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get(id)
    }

    /// Resolves an activity name to its id.
    pub fn id_of(&self, name: &str) -> Option<ActivityId> {
        self.by_name.get(name).copied()
    }

    /// Display name of an activity (empty for unknown ids).
    pub fn name_of(&self, id: ActivityId) -> &str {
        self.activities
            .get(id)
            .map(|activity| activity.name.as_str())
            .unwrap_or("")
    }

    /// Iterates over activities in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    /// All activity names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.activities.iter().map(|a| a.name.as_str()).collect()
    }
}

impl From<Vec<Activity>> for ActivityCatalog {
    fn from(activities: Vec<Activity>) -> Self {
        Self::from_activities(activities)
    }
}

impl From<ActivityCatalog> for Vec<Activity> {
    fn from(catalog: ActivityCatalog) -> Self {
        catalog.activities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_names() {
        let catalog = ActivityCatalog::from_names(["Salute", "Measuring", "ShapeCodes"]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.id_of("Measuring"), Some(1));
        assert_eq!(catalog.id_of("Unknown"), None);
        assert_eq!(catalog.name_of(2), "ShapeCodes");
        assert_eq!(catalog.name_of(9), "");
        assert_eq!(catalog.names(), vec!["Salute", "Measuring", "ShapeCodes"]);
    }

    #[test]
    fn test_ids_follow_positions() {
        let catalog = ActivityCatalog::from_activities(vec![
            Activity::new(7, "A"),
            Activity::new(3, "B").with_capacity(1, 2),
        ]);

        assert_eq!(catalog.get(0).map(|a| a.id), Some(0));
        assert_eq!(catalog.get(1).map(|a| a.id), Some(1));
        assert_eq!(
            catalog.get(1).and_then(|a| a.capacity),
            Some(CapacityBounds::new(1, 2))
        );
    }

    #[test]
    fn test_capacity_override() {
        let default = CapacityBounds::new(5, 9);
        let catalog = ActivityCatalog::from_names(["A", "B"]).with_capacity_override("B", 2, 4);

        let a = catalog.get(0).map(|a| a.capacity_or(default));
        let b = catalog.get(1).map(|a| a.capacity_or(default));
        assert_eq!(a, Some(CapacityBounds::new(5, 9)));
        assert_eq!(b, Some(CapacityBounds::new(2, 4)));
    }

    #[test]
    fn test_capacity_bounds() {
        let bounds = CapacityBounds::new(5, 9);
        assert!(bounds.contains(5));
        assert!(bounds.contains(9));
        assert!(!bounds.contains(4));
        assert!(!bounds.contains(10));
        assert!(bounds.is_consistent());
        assert!(!CapacityBounds::new(3, 2).is_consistent());
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let catalog = ActivityCatalog::from_names(["A", "B", "A"]);
        assert_eq!(catalog.id_of("A"), Some(0));
        assert_eq!(catalog.len(), 3);
    }
}
