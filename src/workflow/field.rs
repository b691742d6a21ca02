//! Field Classifier
//!
//! Turns a field declaration into a [`Field`] value. Attaching the field to
//! a relation is the caller's job.

use crate::document::Element;
use crate::error::CompileError;

use super::model::Field;

/// Builds a field from its declaration attributes.
///
/// `name` and `type` are required; `decimalplaces` must be a non-negative
/// integer when present. `operation` and `instrumented` are copied through.
pub fn classify_field(element: &Element) -> Result<Field, CompileError> {
    let name = element.required_attribute("name")?;
    let ftype = element.required_attribute("type")?;

    let mut field = Field::new(name, ftype);

    if let Some(places) = element.attribute("decimalplaces") {
        let places = places
            .trim()
            .parse::<u32>()
            .map_err(|_| CompileError::InvalidDecimalPlaces {
                field: name.to_string(),
                value: places.to_string(),
            })?;
        field.decimal_places = Some(places);
    }

    if let Some(operation) = element.attribute("operation") {
        field.file_operation = Some(operation.to_string());
    }

    if let Some(instrumented) = element.attribute("instrumented") {
        field.instrumented = Some(instrumented.to_string());
    }

    Ok(field)
}
