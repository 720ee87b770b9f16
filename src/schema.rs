//! The embedded draft-07 JSON Schema, derived from the report types, and the
//! runtime validator every assembled document must pass.

use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use schemars::schema_for;

use crate::error::{RlcoachError, RlcoachResult};
use crate::report::Report;

/// The schema as a JSON value, suitable for embedding or printing.
pub fn report_schema_json() -> serde_json::Value {
    let schema = schema_for!(Report);
    serde_json::to_value(schema).expect("schema serialization is infallible")
}

static VALIDATOR: Lazy<JSONSchema> = Lazy::new(|| {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&report_schema_json())
        .expect("embedded schema compiles")
});

/// Validate an assembled document. The first violation is returned with its
/// instance path.
pub fn validate_report(document: &serde_json::Value) -> RlcoachResult<()> {
    let result = VALIDATOR.validate(document);
    if let Err(mut errors) = result {
        if let Some(error) = errors.next() {
            return Err(RlcoachError::ReportSchemaViolation {
                path: error.instance_path.to_string(),
                reason: error.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_draft_07() {
        let schema = report_schema_json();
        let declared = schema["$schema"].as_str().unwrap_or_default();
        assert!(declared.contains("draft-07"), "got {}", declared);
    }

    #[test]
    fn schema_pins_the_version_pattern() {
        let schema = report_schema_json();
        let pattern = schema["properties"]["schema_version"]["pattern"]
            .as_str()
            .unwrap_or_default();
        assert_eq!(pattern, r"^1\.0\.\d+$");
    }

    #[test]
    fn obviously_invalid_documents_fail() {
        let err = validate_report(&serde_json::json!({"schema_version": 3})).unwrap_err();
        assert_eq!(err.kind(), "report_schema_violation");
    }
}
