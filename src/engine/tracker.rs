use std::collections::{HashMap, HashSet, VecDeque};

use crate::errors::GraphError;
use crate::traits::bear::BearId;

/// Bidirectional edge store between analyzer instances.
///
/// Edges run from dependant to dependency. Both directions are kept as
/// adjacency maps so that "what is this bear waiting for" and "who is
/// waiting for this bear" are both O(1) lookups, the same forward/reverse
/// split used for dependency counting in classic work-queue DAG execution.
///
/// No ordering exists among siblings; every returned collection is an
/// unordered set and callers must treat it as such.
#[derive(Debug, Default)]
pub struct DependencyTracker {
    /// dependant -> the dependencies it still waits for
    dependencies: HashMap<BearId, HashSet<BearId>>,
    /// dependency -> the dependants waiting for it
    dependants: HashMap<BearId, HashSet<BearId>>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an edge. Both directions are updated; duplicate edges
    /// collapse through set semantics.
    pub fn add(&mut self, dependant: BearId, dependency: BearId) {
        self.dependencies
            .entry(dependant)
            .or_default()
            .insert(dependency);
        self.dependants
            .entry(dependency)
            .or_default()
            .insert(dependant);
    }

    /// Mark `dependency` as completed and return the dependants that have
    /// no remaining dependencies afterwards.
    pub fn resolve(&mut self, dependency: BearId) -> HashSet<BearId> {
        let mut newly_ready = HashSet::new();

        let waiting = self.dependants.remove(&dependency).unwrap_or_default();
        for dependant in waiting {
            if let Some(remaining) = self.dependencies.get_mut(&dependant) {
                remaining.remove(&dependency);
                if remaining.is_empty() {
                    self.dependencies.remove(&dependant);
                    newly_ready.insert(dependant);
                }
            }
        }

        newly_ready
    }

    /// Remove `failed` and the transitive closure of its dependants from
    /// the graph. Returns the closure (without `failed` itself); every
    /// returned bear must never be scheduled.
    pub fn remove_subtree(&mut self, failed: BearId) -> HashSet<BearId> {
        let removed = self.get_all_dependants(failed);

        self.dependants.remove(&failed);
        self.dependencies.remove(&failed);

        for bear in &removed {
            self.dependants.remove(bear);
            if let Some(dependencies) = self.dependencies.remove(bear) {
                // Detach the back-edges so completing a healthy sibling
                // dependency cannot resurrect an unscheduled bear.
                for dependency in dependencies {
                    if let Some(waiting) = self.dependants.get_mut(&dependency) {
                        waiting.remove(bear);
                        if waiting.is_empty() {
                            self.dependants.remove(&dependency);
                        }
                    }
                }
            }
        }

        removed
    }

    /// Direct dependencies of `dependant` as a snapshot.
    pub fn get_dependencies(&self, dependant: BearId) -> HashSet<BearId> {
        self.dependencies.get(&dependant).cloned().unwrap_or_default()
    }

    /// Direct dependants of `dependency` as a snapshot.
    pub fn get_dependants(&self, dependency: BearId) -> HashSet<BearId> {
        self.dependants.get(&dependency).cloned().unwrap_or_default()
    }

    /// Transitive closure of dependants of `dependency`.
    pub fn get_all_dependants(&self, dependency: BearId) -> HashSet<BearId> {
        let mut closure = HashSet::new();
        let mut queue: VecDeque<BearId> = VecDeque::new();
        queue.push_back(dependency);

        while let Some(current) = queue.pop_front() {
            if let Some(waiting) = self.dependants.get(&current) {
                for dependant in waiting {
                    if closure.insert(*dependant) {
                        queue.push_back(*dependant);
                    }
                }
            }
        }

        closure
    }

    pub fn has_dependencies(&self, dependant: BearId) -> bool {
        self.dependencies.contains_key(&dependant)
    }

    /// All bears currently waiting on at least one dependency.
    pub fn dependants(&self) -> HashSet<BearId> {
        self.dependencies.keys().copied().collect()
    }

    /// All bears at least one other bear waits for.
    pub fn dependencies(&self) -> HashSet<BearId> {
        self.dependants.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// True iff no edges remain.
    pub fn are_dependencies_resolved(&self) -> bool {
        self.is_empty()
    }

    /// DFS cycle check over the dependency edges. Returns the offending
    /// cycle path (class names, closed at the starting class) on failure.
    pub fn check_acyclic(&self) -> Result<(), GraphError> {
        const UNVISITED: u8 = 0;
        const VISITING: u8 = 1;
        const VISITED: u8 = 2;

        fn dfs(
            edges: &HashMap<BearId, HashSet<BearId>>,
            node: BearId,
            state: &mut HashMap<BearId, u8>,
            stack: &mut Vec<BearId>,
        ) -> Option<Vec<BearId>> {
            match state.get(&node).copied().unwrap_or(UNVISITED) {
                VISITING => {
                    // Back edge: the cycle is the stack suffix from the
                    // first occurrence of `node`.
                    let start = stack.iter().position(|id| *id == node).unwrap_or(0);
                    let mut cycle: Vec<BearId> = stack[start..].to_vec();
                    cycle.push(node);
                    return Some(cycle);
                }
                VISITED => return None,
                _ => {}
            }

            state.insert(node, VISITING);
            stack.push(node);
            if let Some(neighbors) = edges.get(&node) {
                for dependency in neighbors {
                    if let Some(cycle) = dfs(edges, *dependency, state, stack) {
                        return Some(cycle);
                    }
                }
            }
            stack.pop();
            state.insert(node, VISITED);
            None
        }

        let mut state: HashMap<BearId, u8> = HashMap::new();
        let mut stack: Vec<BearId> = Vec::new();

        for node in self.dependencies.keys() {
            if state.get(node).copied().unwrap_or(UNVISITED) == UNVISITED {
                if let Some(cycle) = dfs(&self.dependencies, *node, &mut state, &mut stack) {
                    return Err(GraphError::CyclicDependency {
                        cycle: cycle.iter().map(|id| id.class_name()).collect(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FileDict, Section};
    use std::sync::Arc;

    fn ids(names: &[&'static str]) -> (Vec<BearId>, Arc<Section>, Arc<FileDict>) {
        let section = Arc::new(Section::new("test-section"));
        let files = Arc::new(FileDict::new());
        let ids = names
            .iter()
            .map(|name| BearId::for_context(name, &section, &files))
            .collect();
        (ids, section, files)
    }

    #[test]
    fn test_add_and_views() {
        let (ids, _s, _f) = ids(&["A", "B", "C"]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        let mut tracker = DependencyTracker::new();
        tracker.add(a, b);
        tracker.add(a, c);

        assert_eq!(tracker.get_dependencies(a), HashSet::from([b, c]));
        assert_eq!(tracker.get_dependants(b), HashSet::from([a]));
        assert_eq!(tracker.dependants(), HashSet::from([a]));
        assert_eq!(tracker.dependencies(), HashSet::from([b, c]));
        assert!(!tracker.are_dependencies_resolved());
    }

    #[test]
    fn test_resolve_reports_newly_ready() {
        let (ids, _s, _f) = ids(&["A", "B", "C"]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        let mut tracker = DependencyTracker::new();
        tracker.add(a, b);
        tracker.add(a, c);

        // A still waits for C after B resolves.
        assert_eq!(tracker.resolve(b), HashSet::new());
        assert_eq!(tracker.resolve(c), HashSet::from([a]));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let (ids, _s, _f) = ids(&["A", "B"]);
        let (a, b) = (ids[0], ids[1]);

        let mut tracker = DependencyTracker::new();
        tracker.add(a, b);
        tracker.add(a, b);

        assert_eq!(tracker.resolve(b), HashSet::from([a]));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_get_all_dependants_is_transitive() {
        let (ids, _s, _f) = ids(&["A", "B", "C", "D"]);
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);

        let mut tracker = DependencyTracker::new();
        // d -> c -> b, and a -> b directly.
        tracker.add(c, b);
        tracker.add(d, c);
        tracker.add(a, b);

        assert_eq!(tracker.get_all_dependants(b), HashSet::from([a, c, d]));
        assert_eq!(tracker.get_all_dependants(c), HashSet::from([d]));
        assert_eq!(tracker.get_all_dependants(a), HashSet::new());
    }

    #[test]
    fn test_remove_subtree_purges_closure() {
        let (ids, _s, _f) = ids(&["Failing", "F", "G", "H", "Healthy", "X"]);
        let (failing, f, g, h, healthy, x) = (ids[0], ids[1], ids[2], ids[3], ids[4], ids[5]);

        let mut tracker = DependencyTracker::new();
        tracker.add(f, failing);
        tracker.add(g, f);
        tracker.add(h, g);
        // X depends on both a doomed bear and a healthy one.
        tracker.add(x, f);
        tracker.add(x, healthy);

        let removed = tracker.remove_subtree(failing);
        assert_eq!(removed, HashSet::from([f, g, h, x]));

        // Resolving the healthy dependency must not resurrect X.
        assert_eq!(tracker.resolve(healthy), HashSet::new());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_check_acyclic_accepts_diamond() {
        let (ids, _s, _f) = ids(&["Top", "Left", "Right", "Bottom"]);
        let (top, left, right, bottom) = (ids[0], ids[1], ids[2], ids[3]);

        let mut tracker = DependencyTracker::new();
        tracker.add(top, left);
        tracker.add(top, right);
        tracker.add(left, bottom);
        tracker.add(right, bottom);

        assert!(tracker.check_acyclic().is_ok());
    }

    #[test]
    fn test_check_acyclic_reports_cycle() {
        let (ids, _s, _f) = ids(&["A", "B", "C"]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        let mut tracker = DependencyTracker::new();
        tracker.add(a, b);
        tracker.add(b, c);
        tracker.add(c, a);

        let err = tracker.check_acyclic().unwrap_err();
        match err {
            GraphError::CyclicDependency { cycle } => {
                assert_eq!(cycle.len(), 4);
                assert_eq!(cycle.first(), cycle.last());
            }
        }
    }
}
