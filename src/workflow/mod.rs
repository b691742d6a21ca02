//! Workflow Definition Module
//!
//! Compiles workflow topology documents into an in-memory graph and
//! checks them.
//!
//! # Structure
//!
//! - [`model`]: Core data structures (Workflow, Activity, Relation, Field)
//! - [`field`]: Field classification from declarations
//! - [`relations`]: Per-activity relation registry
//! - [`linker`]: Dependency resolution between activities
//! - [`compiler`]: Document to workflow compilation
//! - [`parser`]: File loading and YAML/JSON output
//! - [`reader`]: Stateful reader with database attribute lookup
//! - [`sites`]: Replica site list
//! - [`validator`]: Non-fatal structural warnings

pub mod compiler;
pub mod database;
pub mod field;
pub mod linker;
pub mod model;
pub mod parser;
pub mod reader;
pub mod relations;
pub mod sites;
pub mod validator;

pub use compiler::{compile, compile_activity, CompiledDocument};
pub use database::DatabaseConfig;
pub use field::classify_field;
pub use model::{
    Activity, ActivityId, ActivityType, Field, OperandKind, Relation, RelationType, Workflow,
};
pub use parser::{load_workflow, save_workflow};
pub use reader::Reader;
pub use relations::{RelationRef, RelationRegistry};
pub use sites::{load_sites, read_sites, Site};
pub use validator::{lint_workflow, quick_validate, ValidationWarning};
