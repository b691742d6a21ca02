//! Error Types
//!
//! Every compile failure is fatal: the first error aborts the whole
//! document and no partial workflow is handed back.

use thiserror::Error;

/// Errors raised while compiling a workflow document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Document has no <{element}> element under <{parent}>")]
    MissingElement { parent: String, element: String },

    #[error("Element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Activity '{activity}' has unknown type '{value}'")]
    InvalidActivityType { activity: String, value: String },

    #[error("Relation '{relation}' has unknown reltype '{value}' (expected INPUT or OUTPUT)")]
    InvalidRelationType { relation: String, value: String },

    #[error("Field '{field}' has invalid decimalplaces '{value}': expected a non-negative integer")]
    InvalidDecimalPlaces { field: String, value: String },

    #[error("Activity '{0}' is declared more than once")]
    DuplicateActivity(String),

    #[error("Activity '{activity}' declares relation '{relation}' more than once")]
    DuplicateRelation { activity: String, relation: String },

    #[error(
        "The activity {activity} has the following relations: [{}]. However, the field {field} says it belongs to relation {relation}. Please check your XML.",
        .known.join(", ")
    )]
    UnknownRelation {
        activity: String,
        field: String,
        relation: String,
        known: Vec<String>,
    },

    #[error("Field '{field}' in activity '{activity}' names both input '{input}' and output '{output}'")]
    AmbiguousFieldRelation {
        activity: String,
        field: String,
        input: String,
        output: String,
    },

    #[error("Field '{field}' in activity '{activity}' names neither an input nor an output relation")]
    UnboundField { activity: String, field: String },

    #[error("Activity '{activity}' aggregates on '{field}', which is not a field of any of its output relations")]
    MissingAggregationField { activity: String, field: String },

    #[error("Activity stored under key '{key}' has tag '{tag}'")]
    MismatchedActivityKey { key: String, tag: String },

    #[error("Activity '{activity}': relation '{relation}' names dependency '{dependency}', which is not an activity listed before it")]
    InvalidDependency {
        activity: String,
        relation: String,
        dependency: String,
    },

    #[error("Activity '{activity}': relation '{relation}' is listed under the wrong direction")]
    MisplacedRelation { activity: String, relation: String },

    #[error("Database attributes are only available after a workflow has been compiled")]
    NotCompiled,
}

/// Top-level errors for the file-based entry points.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Failed to serialize workflow to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to serialize workflow to JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_relation_message_lists_known_relations() {
        let err = CompileError::UnknownRelation {
            activity: "A1".to_string(),
            field: "x".to_string(),
            relation: "R9".to_string(),
            known: vec!["R1".to_string(), "R2".to_string()],
        };

        let message = err.to_string();
        assert!(message.contains("A1"));
        assert!(message.contains("[R1, R2]"));
        assert!(message.contains("field x"));
        assert!(message.contains("relation R9"));
    }

    #[test]
    fn test_compile_error_converts_into_setup_error() {
        let err: SetupError = CompileError::NotCompiled.into();
        assert!(matches!(err, SetupError::Compile(CompileError::NotCompiled)));
        assert!(err.to_string().contains("compiled"));
    }
}
