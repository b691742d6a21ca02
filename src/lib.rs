//! wfsetup - Workflow Topology Compiler
//!
//! Reads the declarative description of a scientific workflow (activities,
//! the relations between them and the typed fields those relations carry)
//! and compiles it into a validated graph model ready to be stored in a
//! provenance database.
//!
//! # Architecture
//!
//! The library is organized into three main modules:
//!
//! - [`document`]: Parsed element tree and XML adapter
//! - [`workflow`]: Data model, compiler, validation and site list
//! - [`error`]: Compile and I/O error types
//!
//! # Example
//!
//! ```rust,no_run
//! use wfsetup::load_workflow;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Compile a workflow from XML
//!     let compiled = load_workflow("montage.xml")?;
//!
//!     for activity in compiled.workflow.activities() {
//!         println!("{} ({})", activity.tag, activity.kind);
//!     }
//!
//!     if let Some(db) = &compiled.database {
//!         println!("Provenance database: {:?}", db.server());
//!     }
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod workflow;

// Re-export commonly used types
pub use document::{parse_document, Element};
pub use error::{CompileError, SetupError};
pub use workflow::compiler::{compile, CompiledDocument};
pub use workflow::model::{Activity, Field, Relation, Workflow};
pub use workflow::parser::load_workflow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "wfsetup";
