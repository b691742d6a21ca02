//! Workflow Loading and Saving
//!
//! Reads workflow XML files into compiled workflows and writes compiled
//! workflows out as YAML or JSON for downstream persistence.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::document::load_document;
use crate::error::SetupError;

use super::compiler::{compile, CompiledDocument};
use super::model::Workflow;
use super::validator::quick_validate;

/// Loads and compiles a workflow from an XML file.
///
/// This function:
/// 1. Reads and parses the XML file
/// 2. Compiles the workflow graph
/// 3. Logs structural warnings
///
/// # Example
///
/// ```rust,no_run
/// use wfsetup::workflow::load_workflow;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let compiled = load_workflow("montage.xml")?;
///     println!("Loaded {} activities", compiled.workflow.len());
///     Ok(())
/// }
/// ```
pub fn load_workflow(path: &str) -> Result<CompiledDocument, SetupError> {
    info!("Loading workflow from: {}", path);

    let root = load_document(path)?;
    let compiled = compile(&root)?;

    for warning in quick_validate(&compiled.workflow) {
        warn!("{}", warning);
    }

    Ok(compiled)
}

/// Renders a workflow as YAML.
pub fn to_yaml(workflow: &Workflow) -> Result<String, SetupError> {
    Ok(serde_yaml::to_string(workflow)?)
}

/// Renders a workflow as pretty-printed JSON.
pub fn to_json(workflow: &Workflow) -> Result<String, SetupError> {
    Ok(serde_json::to_string_pretty(workflow)?)
}

/// Saves a workflow to a file.
///
/// `.yaml` and `.yml` paths get YAML, anything else gets JSON.
pub fn save_workflow(workflow: &Workflow, path: &str) -> Result<(), SetupError> {
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let content = if is_yaml {
        to_yaml(workflow)?
    } else {
        to_json(workflow)?
    };

    fs::write(path, content).map_err(|source| SetupError::Io {
        path: path.to_string(),
        source,
    })?;

    info!("Workflow saved to: {}", path);
    Ok(())
}
