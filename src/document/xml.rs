//! XML Adapter
//!
//! Converts XML text into an owned [`Element`] tree. Only element nodes are
//! kept; text, comments and processing instructions are dropped, and names
//! are reduced to their local part.

use std::fs;

use log::debug;

use super::element::Element;
use crate::error::SetupError;

/// Parses XML text and returns its root element.
///
/// Parser errors are returned as-is.
pub fn parse_document(text: &str) -> Result<Element, roxmltree::Error> {
    let doc = roxmltree::Document::parse(text)?;
    Ok(convert(doc.root_element()))
}

/// Reads and parses an XML file.
pub fn load_document(path: &str) -> Result<Element, SetupError> {
    let text = fs::read_to_string(path).map_err(|source| SetupError::Io {
        path: path.to_string(),
        source,
    })?;

    debug!("Document loaded from {} ({} bytes)", path, text.len());

    Ok(parse_document(&text)?)
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());

    for attr in node.attributes() {
        element.set_attribute(attr.name(), attr.value());
    }

    for child in node.children().filter(|n| n.is_element()) {
        element.push_child(convert(child));
    }

    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_elements_and_attributes() {
        let xml = r#"<?xml version="1.0"?>
<Setup>
  <!-- comment -->
  <database server="localhost" port="5432"/>
  <Workflow tag="wf" description="demo">
    text is ignored
    <Activity tag="a1" type="MAP"/>
  </Workflow>
</Setup>"#;

        let root = parse_document(xml).unwrap();
        assert_eq!(root.name(), "Setup");
        assert_eq!(root.children().len(), 2);

        let db = root.first_child("database").unwrap();
        assert_eq!(db.attribute("port"), Some("5432"));

        let wf = root.first_child("Workflow").unwrap();
        assert_eq!(wf.children().len(), 1);
        assert_eq!(wf.children()[0].attribute("type"), Some("MAP"));
    }

    #[test]
    fn test_parse_uses_local_names() {
        let xml = r#"<c:Setup xmlns:c="urn:wf"><c:Workflow tag="wf"/></c:Setup>"#;

        let root = parse_document(xml).unwrap();
        assert_eq!(root.name(), "Setup");
        assert!(root.first_child("Workflow").is_some());
    }

    #[test]
    fn test_parse_malformed_document() {
        assert!(parse_document("<Setup><Workflow></Setup>").is_err());
    }

    #[test]
    fn test_load_document_not_found() {
        let result = load_document("/nonexistent/path/workflow.xml");
        assert!(matches!(result, Err(SetupError::Io { .. })));
    }

    #[test]
    fn test_load_document_surfaces_parse_error() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bad.xml");
        std::fs::write(&path, "<Setup><unclosed></Setup>").unwrap();

        let result = load_document(path.to_str().unwrap());
        assert!(matches!(result, Err(SetupError::Xml(_))));
    }
}
