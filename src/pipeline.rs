//! The end-to-end pipeline: ingest -> parser adapter -> normalization ->
//! event detection -> analyzers -> report assembly. Each stage owns its data
//! and passes it forward; recoverable conditions degrade into warnings.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;

use crate::adapter::{NetworkData, ParserAdapter};
use crate::analysis::{self, AnalysisContext};
use crate::config::Config;
use crate::constants::*;
use crate::error::{RlcoachError, RlcoachResult};
use crate::events;
use crate::identity;
use crate::ingest;
use crate::normalize;
use crate::quality::{ParserQuality, Quality, QualityWarning, WarningSet};
use crate::report::{self, Report, ReportParts};

/// Analyze one replay file into a validated report. This is the only entry
/// point external consumers call; writing is a separate concern.
pub fn process_replay(path: &Path, config: &Config) -> RlcoachResult<Report> {
    process_replay_at(path, config, Utc::now())
}

/// Same as [`process_replay`] with an injected generation timestamp, which
/// keeps repeated runs byte-identical for determinism checks.
pub fn process_replay_at(
    path: &Path,
    config: &Config,
    generated_at_utc: DateTime<Utc>,
) -> RlcoachResult<Report> {
    let record = ingest::ingest(path, &config.limits)?;
    let mut warnings = WarningSet::new();
    if !record.crc_ok {
        warnings.push(QualityWarning::CrcNotVerified);
    }

    let adapter = ParserAdapter::select(config.parser);
    let header = adapter.parse_header(&record.bytes, record.crc_ok)?;

    // Network decode with graceful degradation to header-only.
    let network: Option<NetworkData> = match adapter.parse_network(&record.bytes) {
        Ok(data) => {
            warnings.push(QualityWarning::ParsedWithFullDecoder);
            data.diagnostics.contribute_warnings(&mut warnings);
            Some(data)
        }
        Err(RlcoachError::ParserUnavailable { .. }) => {
            warnings.push(QualityWarning::ParserFallbackHeaderOnly);
            None
        }
        Err(RlcoachError::NetworkDataUnavailable { details }) => {
            info!("network decode unavailable, continuing header-only: {}", details);
            warnings.push(QualityWarning::NetworkDataUnparsedFallbackHeaderOnly);
            None
        }
        Err(other) => return Err(other),
    };
    let parsed_network_data = network.is_some();
    let (raw_frames, pad_events, roster) = match network {
        Some(data) => (data.frames, data.pad_events, data.roster),
        None => (Vec::new(), Vec::new(), Vec::new()),
    };

    let index = normalize::normalize_players(&header, &roster);

    // Identity gate: refuse excluded accounts before any analysis.
    let me = identity::resolve_me(
        &config.identity,
        &index
            .players()
            .iter()
            .map(|e| e.info.clone())
            .collect::<Vec<_>>(),
    )
    .map(|p| p.canonical_id.clone());
    if let Some(me_id) = &me {
        let me_entry = index.by_canonical(me_id);
        if let Some(entry) = me_entry {
            if identity::is_excluded(&entry.info, &config.excluded_names) {
                return Err(RlcoachError::ExcludedAccount {
                    name: entry.info.display_name.clone(),
                });
            }
        }
    }

    let (mut timeline, _stats) = normalize::build_timeline(raw_frames);
    if let Some(every) = normalize::sample_every_from_env() {
        timeline = normalize::downsample(timeline, every);
        warnings.push(QualityWarning::AnalysisDownsampled { every });
    }

    let measured_hz = if timeline.len() >= 2 {
        normalize::measure_frame_rate(&timeline)
    } else {
        header.record_fps.unwrap_or(DEFAULT_HZ)
    };

    let detected = events::detect_all(&timeline, &pad_events, &index);

    let duration_seconds = match (timeline.first(), timeline.last()) {
        (Some(first), Some(last)) if last.timestamp_s > first.timestamp_s => {
            last.timestamp_s - first.timestamp_s
        }
        _ => header.match_length_s,
    };

    let ctx = AnalysisContext {
        timeline: &timeline,
        events: &detected,
        index: &index,
        duration_s: duration_seconds,
    };
    let analysis = analysis::analyze(&ctx);

    let quality = Quality {
        parser: ParserQuality {
            name: adapter.name().to_string(),
            version: adapter.version().to_string(),
            parsed_header_data: true,
            parsed_network_data,
            crc_checked: record.crc_ok,
        },
        warnings: warnings.into_sorted(),
    };

    report::assemble(ReportParts {
        header: &header,
        index: &index,
        analysis,
        events: detected,
        quality,
        replay_id: record.sha256,
        source_file: path.display().to_string(),
        duration_seconds,
        recorded_frame_hz: measured_hz,
        total_frames: timeline.len() as u64,
        me_canonical_id: me,
        generated_at_utc,
    })
}
