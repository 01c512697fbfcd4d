//! Classified diff between two dependency snapshots.

use crate::registry::PackageRef;

/// The classified difference between two manifest dependency lists.
///
/// Produced by one reconciliation run and consumed immediately by the
/// changelog composer. An addition and a removal sharing the same package
/// name have already been folded into a single update entry.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Packages present now but not before.
    pub additions: Vec<PackageRef>,

    /// Packages whose version changed; the ref carries the new version.
    pub updates: Vec<PackageRef>,

    /// Packages present before but not now; the ref carries the old version.
    pub removals: Vec<PackageRef>,

    /// Whether the tracked config folder's content hash changed.
    pub config_updated: bool,
}

impl ChangeSet {
    /// Whether this change set records no changes at all.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
            && self.updates.is_empty()
            && self.removals.is_empty()
            && !self.config_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(ChangeSet::default().is_empty());
    }

    #[test]
    fn test_config_update_counts_as_change() {
        let changes = ChangeSet {
            config_updated: true,
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_addition_counts_as_change() {
        let changes = ChangeSet {
            additions: vec![PackageRef::parse("alice-ExampleMod-1.0.0").unwrap()],
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
