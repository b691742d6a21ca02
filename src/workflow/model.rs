//! Workflow Data Model
//!
//! Core data structures of a compiled workflow topology: activities, the
//! relations that connect them and the typed fields each relation carries.
//!
//! # Example XML Format
//!
//! ```xml
//! <Setup>
//!   <database server="localhost" port="5432" name="prov" username="u" password="p"/>
//!   <Workflow tag="montage" description="Image mosaic">
//!     <Activity tag="load" type="LOAD" template="./load" activation="run.sh">
//!       <Relation name="iload" reltype="Input"/>
//!       <Relation name="oload" reltype="Output"/>
//!       <Field name="img" type="file" input="iload" operation="COPY"/>
//!       <Field name="img" type="file" output="oload"/>
//!     </Activity>
//!     <Activity tag="sum" type="REDUCE" operand="total">
//!       <Relation name="isum" reltype="Input" dependency="load"/>
//!       <Relation name="osum" reltype="Output"/>
//!       <Field name="img" type="file" input="isum"/>
//!       <Field name="total" type="float" decimalplaces="2" output="osum"/>
//!     </Activity>
//!   </Workflow>
//! </Setup>
//! ```

use std::collections::HashSet;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Error returned when a kind string matches no enumeration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

/// Kind of processing an activity performs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Map,
    SplitMap,
    Reduce,
    Filter,
    SrQuery,
    MrQuery,
    Evaluate,
    Load,
}

impl ActivityType {
    /// Every activity type, in declaration order.
    pub const ALL: [ActivityType; 8] = [
        ActivityType::Map,
        ActivityType::SplitMap,
        ActivityType::Reduce,
        ActivityType::Filter,
        ActivityType::SrQuery,
        ActivityType::MrQuery,
        ActivityType::Evaluate,
        ActivityType::Load,
    ];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Map => "MAP",
            Self::SplitMap => "SPLIT_MAP",
            Self::Reduce => "REDUCE",
            Self::Filter => "FILTER",
            Self::SrQuery => "SR_QUERY",
            Self::MrQuery => "MR_QUERY",
            Self::Evaluate => "EVALUATE",
            Self::Load => "LOAD",
        }
    }
}

impl FromStr for ActivityType {
    type Err = UnknownKind;

    /// Case-insensitive match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a relation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Input,
    Output,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Output => "OUTPUT",
        }
    }
}

impl FromStr for RelationType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("INPUT") {
            Ok(Self::Input)
        } else if value.eq_ignore_ascii_case("OUTPUT") {
            Ok(Self::Output)
        } else {
            Err(UnknownKind(s.to_string()))
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific auxiliary parameter label.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// Field a REDUCE activity aggregates on
    #[serde(rename = "AGREG_FIELD")]
    AggregationField,
    /// Boolean term an EVALUATE activity checks
    #[serde(rename = "MINTERM")]
    Minterm,
}

impl OperandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AggregationField => "AGREG_FIELD",
            Self::Minterm => "MINTERM",
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to an activity inside its workflow.
///
/// Ids follow insertion order, so an id smaller than another was declared
/// earlier in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityId(pub(crate) usize);

impl ActivityId {
    /// Position of the activity in document order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A typed data attribute carried by a relation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,

    /// Declared type (e.g. "float", "string", "file")
    #[serde(rename = "type")]
    pub ftype: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,

    /// File operation label (e.g. "COPY", "MOVE")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_operation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumented: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ftype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ftype: ftype.into(),
            decimal_places: None,
            file_operation: None,
            instrumented: None,
        }
    }

    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = Some(places);
        self
    }

    pub fn with_file_operation(mut self, operation: impl Into<String>) -> Self {
        self.file_operation = Some(operation.into());
        self
    }

    pub fn with_instrumented(mut self, marker: impl Into<String>) -> Self {
        self.instrumented = Some(marker.into());
        self
    }
}

/// A named, directional channel on an activity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: String,

    #[serde(rename = "reltype")]
    pub kind: RelationType,

    /// Tag of the earlier activity this relation reads from (non-owning)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,

    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Relation {
    pub fn new(name: impl Into<String>, kind: RelationType) -> Self {
        Self {
            name: name.into(),
            kind,
            dependency: None,
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One processing step of the workflow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub tag: String,

    #[serde(rename = "type")]
    pub kind: ActivityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Template directory copied into each activation's workspace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<String>,

    /// Command that starts an activation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,

    /// Relative workload weight, kept verbatim as declared
    #[serde(default = "default_workload")]
    pub workload: String,

    #[serde(default)]
    pub input_relations: Vec<Relation>,

    #[serde(default)]
    pub output_relations: Vec<Relation>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub operands: IndexMap<OperandKind, Vec<String>>,
}

/// Workload used when a declaration omits one
pub fn default_workload() -> String {
    "0.0".to_string()
}

impl Activity {
    pub fn new(tag: impl Into<String>, kind: ActivityType) -> Self {
        Self {
            tag: tag.into(),
            kind,
            description: None,
            template_dir: None,
            activation: None,
            extractor: None,
            workload: default_workload(),
            input_relations: Vec::new(),
            output_relations: Vec::new(),
            operands: IndexMap::new(),
        }
    }

    pub fn with_workload(mut self, workload: impl Into<String>) -> Self {
        self.workload = workload.into();
        self
    }

    /// Appends a relation to the sequence matching its direction and
    /// returns its position there.
    pub fn add_relation(&mut self, relation: Relation) -> usize {
        let relations = match relation.kind {
            RelationType::Input => &mut self.input_relations,
            RelationType::Output => &mut self.output_relations,
        };
        relations.push(relation);
        relations.len() - 1
    }

    /// Relations of one direction.
    pub fn relations(&self, kind: RelationType) -> &[Relation] {
        match kind {
            RelationType::Input => &self.input_relations,
            RelationType::Output => &self.output_relations,
        }
    }

    pub(crate) fn relations_mut(&mut self, kind: RelationType) -> &mut Vec<Relation> {
        match kind {
            RelationType::Input => &mut self.input_relations,
            RelationType::Output => &mut self.output_relations,
        }
    }

    pub fn add_operand(&mut self, kind: OperandKind, value: impl Into<String>) {
        self.operands.entry(kind).or_default().push(value.into());
    }

    /// Operand values recorded under a kind, in declaration order.
    pub fn operands(&self, kind: OperandKind) -> &[String] {
        self.operands.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if any output relation carries a field with this name.
    pub fn has_output_field(&self, name: &str) -> bool {
        self.output_relations.iter().any(|r| r.field(name).is_some())
    }

    /// Checks that an aggregation operand names one of the output fields.
    pub fn check_aggregation_field(&self, name: &str) -> Result<(), CompileError> {
        if self.has_output_field(name) {
            Ok(())
        } else {
            Err(CompileError::MissingAggregationField {
                activity: self.tag.clone(),
                field: name.to_string(),
            })
        }
    }

    /// Total number of fields across both directions.
    pub fn field_count(&self) -> usize {
        self.input_relations
            .iter()
            .chain(self.output_relations.iter())
            .map(|r| r.fields.len())
            .sum()
    }
}

/// A compiled workflow: activities in document order, keyed by tag.
///
/// Deserialization rebuilds the table through [`Workflow::insert_activity`]
/// and only accepts dependencies on activities listed before their owner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawWorkflow")]
pub struct Workflow {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    activities: IndexMap<String, Activity>,
}

impl Workflow {
    /// Creates an empty workflow.
    pub fn new(tag: impl Into<String>, description: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            description,
            activities: IndexMap::new(),
        }
    }

    /// Inserts an activity and returns its handle.
    ///
    /// Tags are unique within a workflow.
    pub fn insert_activity(&mut self, activity: Activity) -> Result<ActivityId, CompileError> {
        if self.activities.contains_key(&activity.tag) {
            return Err(CompileError::DuplicateActivity(activity.tag));
        }
        let (index, _) = self.activities.insert_full(activity.tag.clone(), activity);
        Ok(ActivityId(index))
    }

    /// Gets an activity by handle.
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get_index(id.0).map(|(_, a)| a)
    }

    /// Gets an activity by tag.
    pub fn get(&self, tag: &str) -> Option<&Activity> {
        self.activities.get(tag)
    }

    /// Handle of the activity with this tag.
    pub fn id_of(&self, tag: &str) -> Option<ActivityId> {
        self.activities.get_index_of(tag).map(ActivityId)
    }

    /// Activities in document order.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    /// Activity a relation depends on, if any.
    pub fn dependency_of(&self, relation: &Relation) -> Option<&Activity> {
        relation.dependency.as_deref().and_then(|tag| self.get(tag))
    }

    /// Returns the number of activities in the workflow.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Returns true if the workflow has no activities.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Workflow as read from JSON or YAML, before its invariants are checked.
#[derive(Deserialize)]
struct RawWorkflow {
    tag: String,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    activities: IndexMap<String, Activity>,
}

impl TryFrom<RawWorkflow> for Workflow {
    type Error = CompileError;

    fn try_from(raw: RawWorkflow) -> Result<Self, Self::Error> {
        let mut workflow = Workflow::new(raw.tag, raw.description);

        for (key, activity) in raw.activities {
            if key != activity.tag {
                return Err(CompileError::MismatchedActivityKey {
                    key,
                    tag: activity.tag,
                });
            }

            let mut names = HashSet::new();
            for kind in [RelationType::Input, RelationType::Output] {
                for relation in activity.relations(kind) {
                    if relation.kind != kind {
                        return Err(CompileError::MisplacedRelation {
                            activity: activity.tag.clone(),
                            relation: relation.name.clone(),
                        });
                    }
                    if !names.insert(relation.name.clone()) {
                        return Err(CompileError::DuplicateRelation {
                            activity: activity.tag.clone(),
                            relation: relation.name.clone(),
                        });
                    }
                    if let Some(dependency) = &relation.dependency {
                        // Only activities already inserted are visible.
                        if workflow.get(dependency).is_none() {
                            return Err(CompileError::InvalidDependency {
                                activity: activity.tag.clone(),
                                relation: relation.name.clone(),
                                dependency: dependency.clone(),
                            });
                        }
                    }
                }
            }

            workflow.insert_activity(activity)?;
        }

        Ok(workflow)
    }
}

/// `ActivityId` has no public constructor and is never deserialized, so an
/// id indexes within the workflow that issued it.
impl Index<ActivityId> for Workflow {
    type Output = Activity;

    fn index(&self, id: ActivityId) -> &Activity {
        &self.activities[id.0]
    }
}

impl IndexMut<ActivityId> for Workflow {
    fn index_mut(&mut self, id: ActivityId) -> &mut Activity {
        &mut self.activities[id.0]
    }
}
