//! Reader
//!
//! Stateful convenience over [`compile`] for callers that read a workflow
//! first and query its database attributes later.

use log::info;

use crate::document::{load_document, Element};
use crate::error::{CompileError, SetupError};

use super::compiler::compile;
use super::database::DatabaseConfig;
use super::model::Workflow;

/// Compiles workflows and remembers the database section of the last
/// successful compile.
#[derive(Debug, Default)]
pub struct Reader {
    database: Option<DatabaseConfig>,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and compiles a workflow XML file.
    pub fn read_workflow(&mut self, path: &str) -> Result<Workflow, SetupError> {
        info!("Reading workflow from: {}", path);
        let root = load_document(path)?;
        Ok(self.compile(&root)?)
    }

    /// Compiles an already parsed document.
    ///
    /// A failed compile forgets any previously captured database section.
    pub fn compile(&mut self, root: &Element) -> Result<Workflow, CompileError> {
        self.database = None;
        let compiled = compile(root)?;
        self.database = Some(compiled.database.unwrap_or_default());
        Ok(compiled.workflow)
    }

    /// Looks up a database attribute of the last compiled document.
    pub fn db_attribute(&self, name: &str) -> Result<Option<&str>, CompileError> {
        self.database
            .as_ref()
            .map(|db| db.attribute(name))
            .ok_or(CompileError::NotCompiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    const DOC: &str = r#"
<Setup>
  <database server="db.local" port="5432"/>
  <Workflow tag="wf"><Activity tag="a" type="MAP"/></Workflow>
</Setup>"#;

    #[test]
    fn test_db_attribute_before_compile() {
        let reader = Reader::new();
        assert_eq!(reader.db_attribute("server"), Err(CompileError::NotCompiled));
    }

    #[test]
    fn test_db_attribute_after_compile() {
        let mut reader = Reader::new();
        let workflow = reader.compile(&parse_document(DOC).unwrap()).unwrap();

        assert_eq!(workflow.len(), 1);
        assert_eq!(reader.db_attribute("server"), Ok(Some("db.local")));
        assert_eq!(reader.db_attribute("password"), Ok(None));
    }

    #[test]
    fn test_db_attribute_without_database_section() {
        let mut reader = Reader::new();
        reader
            .compile(&parse_document(r#"<Setup><Workflow tag="wf"/></Setup>"#).unwrap())
            .unwrap();

        assert_eq!(reader.db_attribute("server"), Ok(None));
    }

    #[test]
    fn test_failed_compile_resets_database() {
        let mut reader = Reader::new();
        reader.compile(&parse_document(DOC).unwrap()).unwrap();

        let bad = parse_document(r#"<Setup><Workflow tag="wf"><Activity tag="a" type="NOPE"/></Workflow></Setup>"#)
            .unwrap();
        assert!(reader.compile(&bad).is_err());
        assert_eq!(reader.db_attribute("server"), Err(CompileError::NotCompiled));
    }

    #[test]
    fn test_read_workflow_from_file() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("wf.xml");
        std::fs::write(&path, DOC).unwrap();

        let mut reader = Reader::new();
        let workflow = reader.read_workflow(path.to_str().unwrap()).unwrap();

        assert_eq!(workflow.tag, "wf");
        assert_eq!(reader.db_attribute("port"), Ok(Some("5432")));
    }
}
