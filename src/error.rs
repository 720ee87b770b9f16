//! The closed error taxonomy of the analysis pipeline. Fatal conditions
//! short-circuit into one of these variants; every recoverable condition is
//! a [`crate::quality::QualityWarning`] instead.

use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RlcoachError {
    /// Ingest failed: missing file, I/O error, or implausible size.
    #[error("{details}")]
    UnreadableReplayFile { details: String },

    /// Header CRC failed and the body was not parseable either. A CRC
    /// mismatch with a parseable body is downgraded to a warning.
    #[error("header CRC mismatch: {details}")]
    CrcMismatch { details: String },

    /// The full decoder is absent or was disabled without a fallback.
    #[error("full replay decoder unavailable: {details}")]
    ParserUnavailable { details: String },

    /// The decoder is present but produced no usable network frames.
    #[error("network data unavailable: {details}")]
    NetworkDataUnavailable { details: String },

    /// The resolved primary account matches a configured exclusion.
    #[error("account {name:?} is excluded from analysis")]
    ExcludedAccount { name: String },

    /// The assembled document failed schema validation; it is never written.
    #[error("report schema violation at {path}: {reason}")]
    ReportSchemaViolation { path: String, reason: String },
}

impl RlcoachError {
    /// Stable snake_case kind used as the `error` field of the error
    /// document and matched on by external consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            RlcoachError::UnreadableReplayFile { .. } => "unreadable_replay_file",
            RlcoachError::CrcMismatch { .. } => "crc_mismatch",
            RlcoachError::ParserUnavailable { .. } => "parser_unavailable",
            RlcoachError::NetworkDataUnavailable { .. } => "network_data_unavailable",
            RlcoachError::ExcludedAccount { .. } => "excluded_account",
            RlcoachError::ReportSchemaViolation { .. } => "report_schema_violation",
        }
    }

    /// The two-key error document. This is the only JSON the pipeline emits
    /// on a fatal condition.
    pub fn to_document(&self) -> serde_json::Value {
        json!({
            "error": self.kind(),
            "details": self.to_string(),
        })
    }

    pub fn unreadable(details: impl Into<String>) -> Self {
        RlcoachError::UnreadableReplayFile {
            details: details.into(),
        }
    }
}

pub type RlcoachResult<T> = Result<T, RlcoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_document_has_exactly_two_keys() {
        let err = RlcoachError::ExcludedAccount {
            name: "EmpressOlive".into(),
        };
        let doc = err.to_document();
        let obj = doc.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["error"], "excluded_account");
        assert!(obj["details"].as_str().unwrap().contains("EmpressOlive"));
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            RlcoachError::unreadable("x").kind(),
            "unreadable_replay_file"
        );
        assert_eq!(
            RlcoachError::ReportSchemaViolation {
                path: "/players".into(),
                reason: "not an array".into()
            }
            .kind(),
            "report_schema_violation"
        );
    }
}
