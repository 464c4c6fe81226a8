use std::collections::HashMap;

use crate::analysis::{AnalysisResult, TaskDigest};

/// In-memory result cache, keyed by analyzer class and task-argument
/// digest.
///
/// The cache memoizes the materialized result list of successful tasks:
/// a lookup hit replaces the `analyze` call entirely, with the cached list
/// delivered as if freshly produced. Entries are only ever added - the
/// core neither evicts nor persists, the caller owns the value and its
/// lifetime.
///
/// ```ignore
/// let mut cache = TaskCache::new();
/// run(bears, sink, Some(&mut cache), None).await?;
/// // a second run with equal tasks now skips analyze()
/// run(bears, sink, Some(&mut cache), None).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    classes: HashMap<&'static str, HashMap<TaskDigest, Vec<AnalysisResult>>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, class: &str, digest: &TaskDigest) -> Option<&Vec<AnalysisResult>> {
        self.classes.get(class)?.get(digest)
    }

    /// Store the materialized results of one task. Inserting never touches
    /// unrelated entries under the same class.
    pub fn insert(
        &mut self,
        class: &'static str,
        digest: TaskDigest,
        results: Vec<AnalysisResult>,
    ) {
        self.classes.entry(class).or_default().insert(digest, results);
    }

    pub fn contains_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Entries cached for one class.
    pub fn class_entries(&self, class: &str) -> Option<&HashMap<TaskDigest, Vec<AnalysisResult>>> {
        self.classes.get(class)
    }

    /// Number of classes with at least one cached task.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_miss_then_hit() {
        let mut cache = TaskCache::new();
        let digest = TaskDigest::from_bytes(vec![1, 2, 3]);

        assert!(cache.lookup("LintBear", &digest).is_none());

        cache.insert("LintBear", digest.clone(), vec![json!(1), json!(2)]);

        assert_eq!(
            cache.lookup("LintBear", &digest),
            Some(&vec![json!(1), json!(2)])
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_classes_are_isolated() {
        let mut cache = TaskCache::new();
        let digest = TaskDigest::from_bytes(vec![9]);

        cache.insert("LintBear", digest.clone(), vec![json!("a")]);

        assert!(cache.lookup("OtherBear", &digest).is_none());
        assert!(cache.contains_class("LintBear"));
        assert!(!cache.contains_class("OtherBear"));
    }

    #[test]
    fn test_insert_preserves_unrelated_entries() {
        let mut cache = TaskCache::new();
        let seeded = TaskDigest::from_bytes(b"123456".to_vec());
        cache.insert("LintBear", seeded.clone(), vec![json!(100), json!(101)]);

        cache.insert(
            "LintBear",
            TaskDigest::from_bytes(vec![7, 7]),
            vec![json!(-1)],
        );

        let entries = cache.class_entries("LintBear").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get(&seeded), Some(&vec![json!(100), json!(101)]));
    }
}
