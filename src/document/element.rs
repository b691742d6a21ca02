//! Element Tree
//!
//! A minimal, owned view of a parsed markup document: a local name, an
//! ordered attribute list and the child elements in document order.
//!
//! # Example
//!
//! ```
//! use wfsetup::document::Element;
//!
//! let relation = Element::new("Relation")
//!     .with_attribute("name", "R1")
//!     .with_attribute("reltype", "Output");
//!
//! assert_eq!(relation.attribute("reltype"), Some("Output"));
//! ```

use crate::error::CompileError;

/// A single element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Creates an element with no attributes and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing any previous value with the same name.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an attribute in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Appends a child element in place.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Local name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Looks up an attribute that must be present.
    pub fn required_attribute(&self, name: &str) -> Result<&str, CompileError> {
        self.attribute(name)
            .ok_or_else(|| CompileError::MissingAttribute {
                element: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child element with the given local name.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First child element with the given local name, or a `MissingElement` error.
    pub fn required_child(&self, name: &str) -> Result<&Element, CompileError> {
        self.first_child(name)
            .ok_or_else(|| CompileError::MissingElement {
                parent: self.name.clone(),
                element: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let el = Element::new("Field")
            .with_attribute("name", "x")
            .with_attribute("type", "int");

        assert_eq!(el.name(), "Field");
        assert_eq!(el.attribute("name"), Some("x"));
        assert_eq!(el.attribute("missing"), None);
    }

    #[test]
    fn test_set_attribute_replaces_value() {
        let el = Element::new("Field")
            .with_attribute("type", "int")
            .with_attribute("type", "float");

        assert_eq!(el.attribute("type"), Some("float"));
        assert_eq!(el.attributes().count(), 1);
    }

    #[test]
    fn test_required_attribute_missing() {
        let el = Element::new("Activity");
        let err = el.required_attribute("tag").unwrap_err();

        assert_eq!(
            err,
            CompileError::MissingAttribute {
                element: "Activity".to_string(),
                attribute: "tag".to_string(),
            }
        );
    }

    #[test]
    fn test_children_in_document_order() {
        let el = Element::new("Workflow")
            .with_child(Element::new("Activity").with_attribute("tag", "a"))
            .with_child(Element::new("Other"))
            .with_child(Element::new("Activity").with_attribute("tag", "b"));

        let tags: Vec<_> = el
            .children()
            .iter()
            .filter_map(|c| c.attribute("tag"))
            .collect();

        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(el.children().len(), 3);
        assert_eq!(el.first_child("Other").map(|c| c.name()), Some("Other"));
    }

    #[test]
    fn test_required_child_missing() {
        let el = Element::new("root");
        let err = el.required_child("Workflow").unwrap_err();
        assert!(err.to_string().contains("<Workflow>"));
    }
}
