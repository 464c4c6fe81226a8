use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::analysis::{AnalysisResult, FileDict, Section, TaskCall};
use crate::errors::BearError;

/// Results an analyzer's dependencies produced, keyed by dependency class
/// name. A dependency that yielded no results contributes no entry.
pub type DependencyResults = HashMap<&'static str, Vec<AnalysisResult>>;

/// The class object of an analyzer: the identity used for dependency
/// declarations and cache bucketing, plus the constructor the dependency
/// initializer invokes to materialize missing dependency instances.
///
/// Declared as `static` items, one per analyzer type. Class names must be
/// unique within a process; the name is the identity.
pub struct BearClass {
    pub name: &'static str,
    pub construct: fn(&'static BearClass, Arc<Section>, Arc<FileDict>) -> Arc<dyn Bear>,
}

impl fmt::Debug for BearClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearClass").field("name", &self.name).finish()
    }
}

/// Scheduling identity of an analyzer instance: the class name plus the
/// `Arc` allocation addresses of its section and file dict.
///
/// Pointer identity stands in for the instance identity the scheduling
/// model is defined over. The addresses stay valid for the whole run
/// because the canonical instance pool keeps every `Arc` alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BearId {
    class: &'static str,
    section: usize,
    file_dict: usize,
}

impl BearId {
    /// Identity of an existing instance.
    pub fn of<B>(bear: &B) -> Self
    where
        B: Bear + ?Sized,
    {
        Self::for_context(bear.class().name, bear.section(), bear.file_dict())
    }

    /// Identity an instance of `class` would have under the given context.
    pub fn for_context(
        class: &'static str,
        section: &Arc<Section>,
        file_dict: &Arc<FileDict>,
    ) -> Self {
        Self {
            class,
            section: Arc::as_ptr(section) as usize,
            file_dict: Arc::as_ptr(file_dict) as usize,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class
    }
}

/// The analyzer contract.
///
/// A bear declares dependencies on other bear *classes*, turns its
/// workload into a finite sequence of tasks once those dependencies have
/// completed, and analyzes each task into a finite list of opaque results.
///
/// The effective dependency set is read through [`Bear::dependencies`]
/// exactly once per instance, after construction - a constructor may
/// therefore extend what the class declares.
#[async_trait]
pub trait Bear: Send + Sync {
    fn class(&self) -> &'static BearClass;

    fn section(&self) -> &Arc<Section>;

    fn file_dict(&self) -> &Arc<FileDict>;

    /// Effective dependency classes of this instance.
    fn dependencies(&self) -> Vec<&'static BearClass> {
        Vec::new()
    }

    /// Produce the task sequence. Called exactly once, after every
    /// dependency has completed all its tasks; `dependency_results` holds
    /// the complete result lists so the task count may be derived from
    /// dependency output.
    fn generate_tasks(
        &self,
        dependency_results: &DependencyResults,
    ) -> Result<Vec<TaskCall>, BearError>;

    /// The pure work function for one task.
    async fn analyze(&self, task: TaskCall) -> Result<Vec<AnalysisResult>, BearError>;

    fn name(&self) -> &'static str {
        self.class().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ProbeBear {
        section: Arc<Section>,
        file_dict: Arc<FileDict>,
    }

    impl ProbeBear {
        fn construct(
            _class: &'static BearClass,
            section: Arc<Section>,
            file_dict: Arc<FileDict>,
        ) -> Arc<dyn Bear> {
            Arc::new(Self { section, file_dict })
        }
    }

    static PROBE_BEAR: BearClass = BearClass {
        name: "ProbeBear",
        construct: ProbeBear::construct,
    };

    #[async_trait]
    impl Bear for ProbeBear {
        fn class(&self) -> &'static BearClass {
            &PROBE_BEAR
        }

        fn section(&self) -> &Arc<Section> {
            &self.section
        }

        fn file_dict(&self) -> &Arc<FileDict> {
            &self.file_dict
        }

        fn generate_tasks(&self, _: &DependencyResults) -> Result<Vec<TaskCall>, BearError> {
            Ok(Vec::new())
        }

        async fn analyze(&self, _task: TaskCall) -> Result<Vec<AnalysisResult>, BearError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_identity_follows_context_handles() {
        let section1 = Arc::new(Section::new("one"));
        let section2 = Arc::new(Section::new("one"));
        let files = Arc::new(FileDict::new());

        let first = (PROBE_BEAR.construct)(&PROBE_BEAR, section1.clone(), files.clone());
        let second = (PROBE_BEAR.construct)(&PROBE_BEAR, section1.clone(), files.clone());
        let other_section = (PROBE_BEAR.construct)(&PROBE_BEAR, section2.clone(), files.clone());

        // Equal context handles collapse; an equal-by-value but distinct
        // section handle does not.
        assert_eq!(BearId::of(first.as_ref()), BearId::of(second.as_ref()));
        assert_ne!(BearId::of(first.as_ref()), BearId::of(other_section.as_ref()));
        assert_eq!(BearId::of(first.as_ref()).class_name(), "ProbeBear");
    }
}
