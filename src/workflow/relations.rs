//! Relation Registry
//!
//! Per-activity index from relation name to the relation's slot in the
//! activity, built while the activity's declaration is walked. Fields can
//! only join relations this registry already knows about.

use indexmap::IndexMap;
use log::debug;

use crate::error::CompileError;

use super::linker::link_dependency;
use super::model::{ActivityId, Field, Relation, RelationType, Workflow};

/// Location of a relation inside its activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationRef {
    pub kind: RelationType,
    pub index: usize,
}

/// Relations declared so far on one activity.
#[derive(Debug)]
pub struct RelationRegistry {
    activity: ActivityId,
    relations: IndexMap<String, RelationRef>,
}

impl RelationRegistry {
    /// Creates an empty registry for an activity already in the workflow.
    pub fn new(activity: ActivityId) -> Self {
        Self {
            activity,
            relations: IndexMap::new(),
        }
    }

    /// Declares a relation on the activity.
    ///
    /// A `dependency` tag is linked against activities declared earlier in
    /// the document; an unresolved tag leaves the dependency unset.
    pub fn declare(
        &mut self,
        workflow: &mut Workflow,
        name: &str,
        kind: RelationType,
        dependency: Option<&str>,
    ) -> Result<RelationRef, CompileError> {
        if self.relations.contains_key(name) {
            return Err(CompileError::DuplicateRelation {
                activity: workflow[self.activity].tag.clone(),
                relation: name.to_string(),
            });
        }

        let mut relation = Relation::new(name, kind);
        if let Some(tag) = dependency {
            relation.dependency =
                link_dependency(workflow, self.activity, tag).map(|id| workflow[id].tag.clone());
        }

        let index = workflow[self.activity].add_relation(relation);
        let relation_ref = RelationRef { kind, index };
        self.relations.insert(name.to_string(), relation_ref);

        debug!(
            "Activity '{}': declared {} relation '{}'",
            workflow[self.activity].tag, kind, name
        );

        Ok(relation_ref)
    }

    /// Looks up a relation by name for the field `field`.
    ///
    /// The error lists every relation known on the activity.
    pub fn resolve(
        &self,
        workflow: &Workflow,
        field: &str,
        name: &str,
    ) -> Result<RelationRef, CompileError> {
        self.relations
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnknownRelation {
                activity: workflow[self.activity].tag.clone(),
                field: field.to_string(),
                relation: name.to_string(),
                known: self.names().map(str::to_string).collect(),
            })
    }

    /// Appends a field to a relation of this activity.
    pub fn attach(&self, workflow: &mut Workflow, relation: RelationRef, field: Field) {
        workflow[self.activity].relations_mut(relation.kind)[relation.index].add_field(field);
    }

    /// Activity this registry belongs to.
    pub fn activity(&self) -> ActivityId {
        self.activity
    }

    /// Relation names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
