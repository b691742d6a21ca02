//! Workflow Validation
//!
//! Structural checks on a compiled workflow that do not stop the compile:
//! - Activities without inputs or outputs
//! - Relations that carry no fields
//! - REDUCE activities without an aggregation field
//! - Workload weights that are not numbers

use log::debug;

use super::model::{ActivityType, OperandKind, RelationType, Workflow};

/// Validation findings for user-friendly messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    EmptyWorkflow,
    NoInputRelations(String),
    NoOutputRelations(String),
    EmptyRelation { activity: String, relation: String },
    NoAggregationField(String),
    InvalidWorkload { activity: String, workload: String },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWorkflow => write!(f, "Workflow has no activities"),
            Self::NoInputRelations(activity) => {
                write!(f, "Activity '{}' has no input relation", activity)
            }
            Self::NoOutputRelations(activity) => {
                write!(f, "Activity '{}' has no output relation", activity)
            }
            Self::EmptyRelation { activity, relation } => {
                write!(f, "Activity '{}': relation '{}' has no fields", activity, relation)
            }
            Self::NoAggregationField(activity) => {
                write!(f, "REDUCE activity '{}' declares no aggregation field", activity)
            }
            Self::InvalidWorkload { activity, workload } => {
                write!(
                    f,
                    "Activity '{}': workload '{}' is not a non-negative number",
                    activity, workload
                )
            }
        }
    }
}

/// Collects structural warnings for a compiled workflow.
pub fn lint_workflow(workflow: &Workflow) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if workflow.is_empty() {
        warnings.push(ValidationWarning::EmptyWorkflow);
        return warnings;
    }

    for activity in workflow.activities() {
        for kind in [RelationType::Input, RelationType::Output] {
            let relations = activity.relations(kind);
            if relations.is_empty() {
                warnings.push(match kind {
                    RelationType::Input => ValidationWarning::NoInputRelations(activity.tag.clone()),
                    RelationType::Output => ValidationWarning::NoOutputRelations(activity.tag.clone()),
                });
            }

            for relation in relations.iter().filter(|r| r.fields.is_empty()) {
                warnings.push(ValidationWarning::EmptyRelation {
                    activity: activity.tag.clone(),
                    relation: relation.name.clone(),
                });
            }
        }

        if activity.kind == ActivityType::Reduce
            && activity.operands(OperandKind::AggregationField).is_empty()
        {
            warnings.push(ValidationWarning::NoAggregationField(activity.tag.clone()));
        }

        let valid_workload = activity
            .workload
            .trim()
            .parse::<f64>()
            .is_ok_and(|w| w.is_finite() && w >= 0.0);
        if !valid_workload {
            warnings.push(ValidationWarning::InvalidWorkload {
                activity: activity.tag.clone(),
                workload: activity.workload.clone(),
            });
        }
    }

    debug!("Lint found {} warnings", warnings.len());
    warnings
}

/// Quick validation that returns a list of warning messages.
pub fn quick_validate(workflow: &Workflow) -> Vec<String> {
    lint_workflow(workflow)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::model::{Activity, Field, Relation};

    fn connected(tag: &str, kind: ActivityType) -> Activity {
        let mut activity = Activity::new(tag, kind);
        let mut input = Relation::new(format!("i{}", tag), RelationType::Input);
        input.add_field(Field::new("x", "int"));
        let mut output = Relation::new(format!("o{}", tag), RelationType::Output);
        output.add_field(Field::new("y", "int"));
        activity.add_relation(input);
        activity.add_relation(output);
        activity
    }

    #[test]
    fn test_clean_workflow() {
        let mut workflow = Workflow::new("wf", None);
        workflow
            .insert_activity(connected("a", ActivityType::Map))
            .unwrap();

        assert!(lint_workflow(&workflow).is_empty());
    }

    #[test]
    fn test_empty_workflow() {
        let workflow = Workflow::new("wf", None);
        let warnings = quick_validate(&workflow);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("no activities"));
    }

    #[test]
    fn test_missing_relations() {
        let mut workflow = Workflow::new("wf", None);
        workflow
            .insert_activity(Activity::new("bare", ActivityType::Load))
            .unwrap();

        let warnings = lint_workflow(&workflow);
        assert!(warnings.contains(&ValidationWarning::NoInputRelations("bare".to_string())));
        assert!(warnings.contains(&ValidationWarning::NoOutputRelations("bare".to_string())));
    }

    #[test]
    fn test_empty_relation() {
        let mut activity = connected("a", ActivityType::Map);
        activity.add_relation(Relation::new("spare", RelationType::Output));
        let mut workflow = Workflow::new("wf", None);
        workflow.insert_activity(activity).unwrap();

        assert_eq!(
            lint_workflow(&workflow),
            vec![ValidationWarning::EmptyRelation {
                activity: "a".to_string(),
                relation: "spare".to_string(),
            }]
        );
    }

    #[test]
    fn test_reduce_without_aggregation() {
        let mut workflow = Workflow::new("wf", None);
        workflow
            .insert_activity(connected("r", ActivityType::Reduce))
            .unwrap();

        let warnings = quick_validate(&workflow);
        assert!(warnings.iter().any(|w| w.contains("no aggregation field")));
    }

    #[test]
    fn test_invalid_workload() {
        let mut workflow = Workflow::new("wf", None);
        workflow
            .insert_activity(connected("a", ActivityType::Map).with_workload("heavy"))
            .unwrap();
        workflow
            .insert_activity(connected("b", ActivityType::Map).with_workload("-1"))
            .unwrap();
        workflow
            .insert_activity(connected("c", ActivityType::Map).with_workload("3.5"))
            .unwrap();

        let warnings = lint_workflow(&workflow);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| matches!(w, ValidationWarning::InvalidWorkload { .. })));
    }

    #[test]
    fn test_validation_warning_display() {
        let warning = ValidationWarning::NoInputRelations("load".to_string());
        assert!(warning.to_string().contains("load"));

        let warning = ValidationWarning::EmptyRelation {
            activity: "a".to_string(),
            relation: "r".to_string(),
        };
        assert!(warning.to_string().contains("'r'"));
    }
}
