//! Workflow Compiler
//!
//! Walks a parsed document once, top to bottom, and builds the workflow
//! graph:
//!
//! 1. Locate `<Workflow>` and the sibling `<database>` section
//! 2. For each activity declaration, in document order:
//!    - insert the activity shell into the workflow
//!    - declare its relations and attach its fields
//!    - apply kind-specific operands
//!
//! Any error aborts the compile; no partial workflow is returned.

use log::{debug, info, warn};

use crate::document::Element;
use crate::error::CompileError;

use super::database::DatabaseConfig;
use super::field::classify_field;
use super::model::{
    default_workload, Activity, ActivityId, ActivityType, OperandKind, RelationType, Workflow,
};
use super::relations::RelationRegistry;

/// Element holding the activity declarations.
pub const WORKFLOW_ELEMENT: &str = "Workflow";

/// Element holding the database connection attributes.
pub const DATABASE_ELEMENT: &str = "database";

/// Nested element declaring a relation; every other nested element is a field.
pub const RELATION_ELEMENT: &str = "Relation";

/// Result of a successful compile.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDocument {
    pub workflow: Workflow,

    /// Attributes of the `<database>` section, if the document has one
    pub database: Option<DatabaseConfig>,
}

/// Compiles a document root into a workflow.
///
/// # Example
///
/// ```
/// use wfsetup::document::parse_document;
/// use wfsetup::workflow::compile;
///
/// let root = parse_document(r#"
///     <Setup>
///       <database server="localhost"/>
///       <Workflow tag="wf" description="demo">
///         <Activity tag="a1" type="MAP">
///           <Relation name="out" reltype="Output"/>
///           <Field name="x" type="int" output="out"/>
///         </Activity>
///       </Workflow>
///     </Setup>"#).unwrap();
///
/// let compiled = compile(&root).unwrap();
/// assert_eq!(compiled.workflow.len(), 1);
/// assert_eq!(compiled.database.unwrap().server(), Some("localhost"));
/// ```
pub fn compile(root: &Element) -> Result<CompiledDocument, CompileError> {
    let workflow_element = root.required_child(WORKFLOW_ELEMENT)?;

    let tag = workflow_element.required_attribute("tag")?;
    let description = workflow_element.attribute("description").map(str::to_string);
    let mut workflow = Workflow::new(tag, description);

    let database = root
        .first_child(DATABASE_ELEMENT)
        .map(DatabaseConfig::from_element);
    if database.is_none() {
        warn!("Document has no <{}> section", DATABASE_ELEMENT);
    }

    info!(
        "Compiling workflow '{}' ({} activity declarations)",
        tag,
        workflow_element.children().len()
    );

    for declaration in workflow_element.children() {
        compile_activity(&mut workflow, declaration)?;
    }

    info!(
        "Workflow '{}' compiled: {} activities",
        workflow.tag,
        workflow.len()
    );

    Ok(CompiledDocument { workflow, database })
}

/// Compiles one activity declaration into the workflow.
///
/// The activity is inserted before its relations are processed and filled in
/// place afterwards; it cannot see itself or later activities as
/// dependencies.
pub fn compile_activity(
    workflow: &mut Workflow,
    declaration: &Element,
) -> Result<ActivityId, CompileError> {
    let id = workflow.insert_activity(activity_shell(declaration)?)?;
    let mut registry = RelationRegistry::new(id);

    for element in declaration.children() {
        if element.name() == RELATION_ELEMENT {
            declare_relation(workflow, &mut registry, element)?;
        } else {
            attach_field(workflow, &registry, element)?;
        }
    }

    if let Some(operand) = declaration.attribute("operand") {
        apply_operands(&mut workflow[id], operand)?;
    }

    let activity = &workflow[id];
    debug!(
        "Activity '{}' ({}): {} input / {} output relations, {} fields",
        activity.tag,
        activity.kind,
        activity.input_relations.len(),
        activity.output_relations.len(),
        activity.field_count()
    );

    Ok(id)
}

/// Builds an activity from its declaration attributes, without relations.
fn activity_shell(declaration: &Element) -> Result<Activity, CompileError> {
    let tag = declaration.required_attribute("tag")?;
    let kind_value = declaration.required_attribute("type")?;
    let kind: ActivityType =
        kind_value
            .parse()
            .map_err(|_| CompileError::InvalidActivityType {
                activity: tag.to_string(),
                value: kind_value.to_string(),
            })?;

    let optional = |name: &str| declaration.attribute(name).map(str::to_string);

    let mut activity = Activity::new(tag, kind);
    activity.description = optional("description");
    activity.template_dir = optional("template");
    activity.activation = optional("activation");
    activity.extractor = optional("extractor");
    activity.workload = optional("workload").unwrap_or_else(default_workload);

    Ok(activity)
}

fn declare_relation(
    workflow: &mut Workflow,
    registry: &mut RelationRegistry,
    element: &Element,
) -> Result<(), CompileError> {
    let name = element.required_attribute("name")?;
    let kind_value = element.required_attribute("reltype")?;
    let kind: RelationType =
        kind_value
            .parse()
            .map_err(|_| CompileError::InvalidRelationType {
                relation: name.to_string(),
                value: kind_value.to_string(),
            })?;

    registry.declare(workflow, name, kind, element.attribute("dependency"))?;
    Ok(())
}

/// Classifies a field and attaches it to the relation it names.
///
/// Exactly one of `input` or `output` must be given.
fn attach_field(
    workflow: &mut Workflow,
    registry: &RelationRegistry,
    element: &Element,
) -> Result<(), CompileError> {
    let field = classify_field(element)?;

    let (target, expected) = match (element.attribute("input"), element.attribute("output")) {
        (Some(input), None) => (input, RelationType::Input),
        (None, Some(output)) => (output, RelationType::Output),
        (Some(input), Some(output)) => {
            return Err(CompileError::AmbiguousFieldRelation {
                activity: activity_tag(workflow, registry),
                field: field.name,
                input: input.to_string(),
                output: output.to_string(),
            })
        }
        (None, None) => {
            return Err(CompileError::UnboundField {
                activity: activity_tag(workflow, registry),
                field: field.name,
            })
        }
    };

    let relation = registry.resolve(workflow, &field.name, target)?;
    if relation.kind != expected {
        warn!(
            "Activity '{}': field '{}' is declared as {} of relation '{}', which is an {} relation",
            activity_tag(workflow, registry),
            field.name,
            expected.as_str().to_lowercase(),
            target,
            relation.kind
        );
    }

    registry.attach(workflow, relation, field);
    Ok(())
}

fn activity_tag(workflow: &Workflow, registry: &RelationRegistry) -> String {
    workflow[registry.activity()].tag.clone()
}

/// Records the comma-separated operands of an activity.
///
/// REDUCE activities aggregate on output fields, EVALUATE activities take
/// minterms. Other kinds ignore operands.
fn apply_operands(activity: &mut Activity, operand: &str) -> Result<(), CompileError> {
    let tokens: Vec<&str> = operand
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let kind = match activity.kind {
        ActivityType::Reduce => OperandKind::AggregationField,
        ActivityType::Evaluate => OperandKind::Minterm,
        other => {
            warn!(
                "Activity '{}': {} activities take no operands, ignoring '{}'",
                activity.tag, other, operand
            );
            return Ok(());
        }
    };

    for token in tokens {
        activity.add_operand(kind, token);
        if kind == OperandKind::AggregationField {
            activity.check_aggregation_field(token)?;
        }
    }

    Ok(())
}
