use std::sync::Arc;

use crumbscope_types::{Breadcrumb, BreadcrumbLevel};

/// Read-only, cheaply clonable breadcrumb sequence for one event.
///
/// Records are supplied once and never mutated; every view over the store
/// (filtering, rendering) borrows from it.
#[derive(Clone, Debug, Default)]
pub struct BreadcrumbStore {
    crumbs: Arc<[Breadcrumb]>,
}

impl BreadcrumbStore {
    pub fn new(crumbs: Vec<Breadcrumb>) -> Self {
        Self {
            crumbs: crumbs.into(),
        }
    }

    /// Whether both handles share the same records
    pub fn same_as(&self, other: &BreadcrumbStore) -> bool {
        Arc::ptr_eq(&self.crumbs, &other.crumbs)
    }

    /// All breadcrumbs in original order
    pub fn all(&self) -> &[Breadcrumb] {
        &self.crumbs
    }

    pub fn get(&self, index: usize) -> Option<&Breadcrumb> {
        self.crumbs.get(index)
    }

    /// Get breadcrumbs matching a predicate, in order
    pub fn filtered<F>(&self, predicate: F) -> Vec<&Breadcrumb>
    where
        F: Fn(&Breadcrumb) -> bool,
    {
        self.crumbs.iter().filter(|c| predicate(c)).collect()
    }

    /// Get breadcrumbs at or above a severity
    pub fn by_level(&self, min_level: BreadcrumbLevel) -> Vec<&Breadcrumb> {
        let min = min_level.severity();
        self.filtered(|c| c.level.severity() >= min)
    }

    /// Get breadcrumb count per level
    pub fn level_counts(&self) -> LevelCounts {
        let mut counts = LevelCounts::default();

        for crumb in self.crumbs.iter() {
            match crumb.level {
                BreadcrumbLevel::Fatal => counts.fatal += 1,
                BreadcrumbLevel::Error => counts.error += 1,
                BreadcrumbLevel::Warning => counts.warning += 1,
                BreadcrumbLevel::Info => counts.info += 1,
                BreadcrumbLevel::Debug => counts.debug += 1,
                BreadcrumbLevel::Undefined => counts.undefined += 1,
            }
        }

        counts
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }
}

/// Counts per breadcrumb level
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub fatal: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub debug: usize,
    pub undefined: usize,
}

impl LevelCounts {
    pub fn total(&self) -> usize {
        self.fatal + self.error + self.warning + self.info + self.debug + self.undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BreadcrumbStore {
        BreadcrumbStore::new(vec![
            Breadcrumb::new("a", BreadcrumbLevel::Info),
            Breadcrumb::new("b", BreadcrumbLevel::Error),
            Breadcrumb::new("c", BreadcrumbLevel::Warning),
            Breadcrumb::new("d", BreadcrumbLevel::Info),
        ])
    }

    #[test]
    fn test_level_counts() {
        let counts = store().level_counts();
        assert_eq!(counts.info, 2);
        assert_eq!(counts.error, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_by_level_keeps_order() {
        let store = store();
        let messages: Vec<_> = store
            .by_level(BreadcrumbLevel::Warning)
            .iter()
            .filter_map(|c| c.message.as_deref())
            .collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn test_clones_share_records() {
        let store = store();
        let copy = store.clone();
        assert!(std::ptr::eq(store.all(), copy.all()));
        assert!(store.same_as(&copy));
        assert!(!store.same_as(&BreadcrumbStore::new(store.all().to_vec())));
    }
}
