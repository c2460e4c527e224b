//! Lifecycle Tracking
//!
//! Classifies alerts across two consecutive snapshots into new, resolved, and
//! still active (unresolved) sets.

use crate::record::{AlertKey, AlertRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Lifecycle classification of an alert between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    /// Present now, absent before
    New,
    /// Present before, absent now
    Resolved,
    /// Present in both snapshots
    Unresolved,
}

impl PartitionKind {
    /// All kinds, in reporting order
    pub const ALL: [PartitionKind; 3] = [Self::Resolved, Self::Unresolved, Self::New];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Resolved => "resolved",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing a previous and a current snapshot
///
/// The three members are disjoint. `new ∪ unresolved` is the current snapshot
/// and `resolved ∪ unresolved` is the previous one, both taken as sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LifecyclePartition {
    pub new: Vec<AlertRecord>,
    pub resolved: Vec<AlertRecord>,
    pub unresolved: Vec<AlertRecord>,
}

impl LifecyclePartition {
    /// Compare two snapshots by alert content.
    ///
    /// Duplicates within either snapshot collapse to their first occurrence.
    /// Unresolved records are taken from `current` so they carry the latest
    /// metadata. Output order follows input order.
    pub fn compare(previous: &[AlertRecord], current: &[AlertRecord]) -> Self {
        let previous_keys: HashSet<AlertKey<'_>> = previous.iter().map(AlertRecord::key).collect();
        let current_keys: HashSet<AlertKey<'_>> = current.iter().map(AlertRecord::key).collect();

        let mut partition = Self::default();

        let mut seen = HashSet::with_capacity(previous.len());
        for record in previous {
            let key = record.key();
            if seen.insert(key) && !current_keys.contains(&key) {
                partition.resolved.push(record.clone());
            }
        }

        let mut seen = HashSet::with_capacity(current.len());
        for record in current {
            let key = record.key();
            if !seen.insert(key) {
                continue;
            }
            if previous_keys.contains(&key) {
                partition.unresolved.push(record.clone());
            } else {
                partition.new.push(record.clone());
            }
        }

        partition
    }

    /// Records of one kind
    pub fn get(&self, kind: PartitionKind) -> &[AlertRecord] {
        match kind {
            PartitionKind::New => &self.new,
            PartitionKind::Resolved => &self.resolved,
            PartitionKind::Unresolved => &self.unresolved,
        }
    }

    /// True when no alert was present in either snapshot
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.resolved.is_empty() && self.unresolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn alert(name: &str) -> AlertRecord {
        AlertRecord::new(name, format!("{} description", name))
    }

    fn keys(records: &[AlertRecord]) -> HashSet<AlertRecord> {
        records.iter().cloned().collect()
    }

    #[test]
    fn test_first_cycle_everything_new() {
        let partition = LifecyclePartition::compare(&[], &[alert("A")]);
        assert_eq!(partition.new, vec![alert("A")]);
        assert!(partition.resolved.is_empty());
        assert!(partition.unresolved.is_empty());
    }

    #[test]
    fn test_mixed_transitions() {
        let partition =
            LifecyclePartition::compare(&[alert("A"), alert("B")], &[alert("B"), alert("C")]);
        assert_eq!(partition.new, vec![alert("C")]);
        assert_eq!(partition.resolved, vec![alert("A")]);
        assert_eq!(partition.unresolved, vec![alert("B")]);
    }

    #[test]
    fn test_everything_resolved() {
        let partition = LifecyclePartition::compare(&[alert("A")], &[]);
        assert_eq!(partition.get(PartitionKind::Resolved), &[alert("A")]);
        assert!(partition.get(PartitionKind::New).is_empty());
    }

    #[test]
    fn test_no_change() {
        let partition = LifecyclePartition::compare(&[alert("A")], &[alert("A")]);
        assert!(partition.new.is_empty());
        assert!(partition.resolved.is_empty());
        assert_eq!(partition.unresolved, vec![alert("A")]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let partition = LifecyclePartition::compare(
            &[alert("A"), alert("A")],
            &[alert("B"), alert("B"), alert("A")],
        );
        assert_eq!(partition.new, vec![alert("B")]);
        assert_eq!(partition.unresolved, vec![alert("A")]);
        assert!(partition.resolved.is_empty());
    }

    #[test]
    fn test_unresolved_carries_current_metadata() {
        let before = AlertRecord::new("Line 1", "Delays");
        let after = AlertRecord::with_metadata(
            "Line 1",
            "Delays",
            crate::AlertMetadata {
                id: "fresh".to_string(),
                ..Default::default()
            },
        );

        let partition = LifecyclePartition::compare(&[before], &[after]);
        assert_eq!(partition.unresolved[0].metadata().id, "fresh");
    }

    #[test]
    fn test_both_empty() {
        assert!(LifecyclePartition::compare(&[], &[]).is_empty());
    }

    fn snapshot() -> impl Strategy<Value = Vec<AlertRecord>> {
        prop::collection::vec(("[abc]{1,2}", "[xy]{0,2}"), 0..8).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(header, description)| AlertRecord::new(header, description))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_partition_is_complete_and_disjoint(previous in snapshot(), current in snapshot()) {
            let partition = LifecyclePartition::compare(&previous, &current);
            let new = keys(&partition.new);
            let resolved = keys(&partition.resolved);
            let unresolved = keys(&partition.unresolved);

            prop_assert_eq!(new.len(), partition.new.len());
            prop_assert_eq!(resolved.len(), partition.resolved.len());
            prop_assert_eq!(unresolved.len(), partition.unresolved.len());

            prop_assert!(new.is_disjoint(&resolved));
            prop_assert!(new.is_disjoint(&unresolved));
            prop_assert!(resolved.is_disjoint(&unresolved));

            let current_set: HashSet<_> = new.union(&unresolved).cloned().collect();
            let previous_set: HashSet<_> = resolved.union(&unresolved).cloned().collect();
            prop_assert_eq!(current_set, keys(&current));
            prop_assert_eq!(previous_set, keys(&previous));
        }
    }
}
