//! Dependency Linker
//!
//! Resolves the `dependency` attribute of a relation declaration to an
//! activity compiled earlier in the same document.

use log::{debug, warn};

use super::model::{ActivityId, Workflow};

/// Why a dependency tag did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// No activity with this tag exists (yet)
    Unknown,
    /// The activity is the current one or was declared after it
    NotYetCompiled,
}

/// Looks up a dependency tag among the activities declared before `current`.
///
/// Only activities with a smaller id are visible, even if a later one is
/// already present in the workflow.
pub fn resolve_dependency(
    workflow: &Workflow,
    current: ActivityId,
    tag: &str,
) -> Result<ActivityId, Unresolved> {
    match workflow.id_of(tag) {
        Some(id) if id < current => Ok(id),
        Some(_) => Err(Unresolved::NotYetCompiled),
        None => Err(Unresolved::Unknown),
    }
}

/// Links a relation's dependency, leaving it unset when the tag does not
/// resolve.
pub fn link_dependency(workflow: &Workflow, current: ActivityId, tag: &str) -> Option<ActivityId> {
    match resolve_dependency(workflow, current, tag) {
        Ok(id) => {
            debug!("Dependency '{}' resolved to activity #{}", tag, id.index());
            Some(id)
        }
        Err(Unresolved::Unknown) => {
            warn!(
                "Activity '{}': dependency '{}' does not name any activity, leaving it unset",
                workflow[current].tag, tag
            );
            None
        }
        Err(Unresolved::NotYetCompiled) => {
            warn!(
                "Activity '{}': dependency '{}' is not declared before it, leaving it unset",
                workflow[current].tag, tag
            );
            None
        }
    }
}
