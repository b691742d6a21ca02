//! Database Connection Descriptor
//!
//! Attributes of a `<database>` section, kept verbatim for whoever persists
//! the compiled workflow.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::Element;

/// Connection attributes of a provenance database.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct DatabaseConfig {
    attributes: IndexMap<String, String>,
}

impl DatabaseConfig {
    /// Captures every attribute of a `<database>` element.
    pub fn from_element(element: &Element) -> Self {
        let attributes = element
            .attributes()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { attributes }
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn server(&self) -> Option<&str> {
        self.attribute("server")
    }

    pub fn port(&self) -> Option<&str> {
        self.attribute("port")
    }

    /// Database name.
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn username(&self) -> Option<&str> {
        self.attribute("username")
    }

    pub fn password(&self) -> Option<&str> {
        self.attribute("password")
    }
}
