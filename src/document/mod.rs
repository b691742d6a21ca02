//! Document Tree Module
//!
//! The compiler never touches raw markup. It walks an owned element tree
//! produced by the XML adapter (or built directly in code).
//!
//! - [`element`]: The element tree and attribute accessors
//! - [`xml`]: XML text to element tree conversion

pub mod element;
pub mod xml;

pub use element::Element;
pub use xml::{load_document, parse_document};
