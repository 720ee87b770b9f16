//! Warning vocabulary and quality metadata. Every degradation path in the
//! pipeline contributes exactly one of these codes; the assembler dedupes
//! and sorts them into `quality.warnings`.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityWarning {
    ParsedWithFullDecoder,
    ParserFallbackHeaderOnly,
    NetworkDataUnparsedFallbackHeaderOnly,
    AnalysisDownsampled { every: u32 },
    PlayerRotationApproximated,
    PadCoverageIncomplete,
    MissingInstigatorCount { count: u64 },
    CrcNotVerified,
}

impl QualityWarning {
    /// The stable string surfaced in `quality.warnings`.
    pub fn code(&self) -> String {
        match self {
            QualityWarning::ParsedWithFullDecoder => "parsed_with_full_decoder".into(),
            QualityWarning::ParserFallbackHeaderOnly => "parser_fallback_header_only".into(),
            QualityWarning::NetworkDataUnparsedFallbackHeaderOnly => {
                "network_data_unparsed_fallback_header_only".into()
            }
            QualityWarning::AnalysisDownsampled { every } => {
                format!("analysis_downsampled_n={}", every)
            }
            QualityWarning::PlayerRotationApproximated => "player_rotation_approximated".into(),
            QualityWarning::PadCoverageIncomplete => "pad_coverage_incomplete".into(),
            QualityWarning::MissingInstigatorCount { count } => {
                format!("missing_instigator_count={}", count)
            }
            QualityWarning::CrcNotVerified => "crc_not_verified".into(),
        }
    }
}

/// Collects warnings across the pipeline. Deduplication happens on the
/// rendered code, so two `MissingInstigatorCount` entries with different
/// counts are distinct strings and the caller must merge them first.
#[derive(Debug, Default, Clone)]
pub struct WarningSet {
    codes: BTreeSet<String>,
}

impl WarningSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: QualityWarning) {
        self.codes.insert(warning.code());
    }

    pub fn push_all(&mut self, warnings: impl IntoIterator<Item = QualityWarning>) {
        for w in warnings {
            self.push(w);
        }
    }

    pub fn extend_raw(&mut self, codes: impl IntoIterator<Item = String>) {
        self.codes.extend(codes);
    }

    /// Sorted, unique warning strings for the report.
    pub fn into_sorted(self) -> Vec<String> {
        self.codes.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Parser provenance surfaced under `quality.parser`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParserQuality {
    pub name: String,
    pub version: String,
    pub parsed_header_data: bool,
    pub parsed_network_data: bool,
    pub crc_checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Quality {
    pub parser: ParserQuality,
    pub warnings: Vec<String>,
}

/// Structured diagnostics carried out of the parser adapter (C3) and lowered
/// into warnings by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParserStatus {
    Ok,
    Degraded,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub status: ParserStatus,
    /// Attribute name -> number of frames where it was absent.
    pub missing_attribute_counts: std::collections::BTreeMap<String, u64>,
    /// Fraction of observed pad actors that resolved to a canonical pad.
    pub pad_coverage_ratio: f64,
    /// Fraction of collected pad events with a resolved instigator.
    pub instigator_resolution_ratio: f64,
    pub missing_instigator_count: u64,
    /// Fraction of player samples whose rotation had to be approximated.
    pub rotation_approximated_ratio: f64,
    /// Player velocity samples clamped to the physical cap.
    pub clamped_velocity_count: u64,
    /// Out-of-bounds positions clamped during normalization.
    pub clamped_position_count: u64,
    pub warnings: Vec<String>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            status: ParserStatus::Ok,
            missing_attribute_counts: Default::default(),
            pad_coverage_ratio: 1.0,
            instigator_resolution_ratio: 1.0,
            missing_instigator_count: 0,
            rotation_approximated_ratio: 0.0,
            clamped_velocity_count: 0,
            clamped_position_count: 0,
            warnings: Vec::new(),
        }
    }
}

impl Diagnostics {
    pub fn count_missing(&mut self, attribute: &str) {
        *self
            .missing_attribute_counts
            .entry(attribute.to_string())
            .or_insert(0) += 1;
    }

    /// Lower the adapter diagnostics into report warnings.
    pub fn contribute_warnings(&self, warnings: &mut WarningSet) {
        if self.rotation_approximated_ratio > ROTATION_APPROXIMATED_WARN_RATIO {
            warnings.push(QualityWarning::PlayerRotationApproximated);
        }
        if self.pad_coverage_ratio < PAD_COVERAGE_WARN_RATIO {
            warnings.push(QualityWarning::PadCoverageIncomplete);
        }
        if self.missing_instigator_count > 0 {
            warnings.push(QualityWarning::MissingInstigatorCount {
                count: self.missing_instigator_count,
            });
        }
        warnings.extend_raw(self.warnings.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_dedupe_and_sort() {
        let mut set = WarningSet::new();
        set.push(QualityWarning::PadCoverageIncomplete);
        set.push(QualityWarning::CrcNotVerified);
        set.push(QualityWarning::PadCoverageIncomplete);
        set.push(QualityWarning::AnalysisDownsampled { every: 4 });
        let rendered = set.into_sorted();
        assert_eq!(
            rendered,
            vec![
                "analysis_downsampled_n=4",
                "crc_not_verified",
                "pad_coverage_incomplete",
            ]
        );
    }

    #[test]
    fn diagnostics_lower_into_warning_codes() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.pad_coverage_ratio = 0.5;
        diagnostics.missing_instigator_count = 3;
        diagnostics.rotation_approximated_ratio = 0.8;

        let mut set = WarningSet::new();
        diagnostics.contribute_warnings(&mut set);
        let rendered = set.into_sorted();
        assert!(rendered.contains(&"pad_coverage_incomplete".to_string()));
        assert!(rendered.contains(&"missing_instigator_count=3".to_string()));
        assert!(rendered.contains(&"player_rotation_approximated".to_string()));
    }
}
