use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::engine::tracker::DependencyTracker;
use crate::errors::GraphError;
use crate::traits::bear::{Bear, BearId};

/// Canonical index of analyzer instances, keyed by scheduling identity.
///
/// One instance exists per `(class, section, file_dict)` triple; the pool
/// is what keeps the context `Arc`s alive, making the pointer-based
/// identity stable for the whole run.
#[derive(Clone, Default)]
pub struct BearPool(HashMap<BearId, Arc<dyn Bear>>);

impl BearPool {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert unless the identity is already taken. Returns whether the
    /// instance was inserted; on collision the existing instance wins.
    pub fn insert_if_absent(&mut self, id: BearId, bear: Arc<dyn Bear>) -> bool {
        match self.0.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(bear);
                true
            }
        }
    }

    pub fn get(&self, id: &BearId) -> Option<&Arc<dyn Bear>> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &BearId) -> bool {
        self.0.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = BearId> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for BearPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearPool")
            .field("bear_count", &self.0.len())
            .field("classes", &self.0.keys().map(|id| id.class_name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Output of [`initialize_dependencies`]: the populated edge store, the
/// canonical instance pool, and the set of bears ready to run.
#[derive(Debug)]
pub struct DependencyPlan {
    pub tracker: DependencyTracker,
    pub bears: BearPool,
    pub ready: HashSet<BearId>,
}

/// Walk the declared dependency classes of the seed analyzers, materialize
/// missing dependency instances, and register every edge.
///
/// Dependency instances are shared: a dependency class resolves to the
/// pooled instance for `(class, seed section, seed file_dict)` when one
/// exists, regardless of the order instances were discovered in, and is
/// constructed under the dependant's context otherwise. Seeds with equal
/// identity collapse to a single scheduled instance.
///
/// The effective dependency set of every instance is snapshotted exactly
/// once, after construction, so constructors extending their class-level
/// declaration are honored.
///
/// A cycle among the declared classes is a fatal configuration error,
/// reported before any task is generated.
pub fn initialize_dependencies(
    seeds: Vec<Arc<dyn Bear>>,
) -> Result<DependencyPlan, GraphError> {
    let mut bears = BearPool::new();
    let mut tracker = DependencyTracker::new();
    let mut worklist: Vec<Arc<dyn Bear>> = Vec::new();

    for seed in seeds {
        let id = BearId::of(seed.as_ref());
        if bears.insert_if_absent(id, seed.clone()) {
            worklist.push(seed);
        }
    }

    while let Some(bear) = worklist.pop() {
        let id = BearId::of(bear.as_ref());

        for class in bear.dependencies() {
            let dependency_id =
                BearId::for_context(class.name, bear.section(), bear.file_dict());

            if !bears.contains(&dependency_id) {
                let dependency =
                    (class.construct)(class, bear.section().clone(), bear.file_dict().clone());
                debug_assert_eq!(BearId::of(dependency.as_ref()), dependency_id);
                bears.insert_if_absent(dependency_id, dependency.clone());
                worklist.push(dependency);
            }

            tracker.add(id, dependency_id);
        }
    }

    tracker.check_acyclic()?;

    let ready = bears
        .ids()
        .filter(|id| !tracker.has_dependencies(*id))
        .collect();

    tracing::debug!(
        bear_count = bears.len(),
        "dependency graph initialized"
    );

    Ok(DependencyPlan {
        tracker,
        bears,
        ready,
    })
}
