//! The report document: root structure, assembly from the pipeline stages,
//! schema validation, and the atomic writer.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::config::Config;
use crate::error::{RlcoachError, RlcoachResult};
use crate::events::Events;
use crate::header::{CameraSettings, Header, LoadoutSummary, PlatformIds};
use crate::normalize::PlayerIndex;
use crate::quality::Quality;
use crate::schema;

pub static SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoordinateReference {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Default for CoordinateReference {
    fn default() -> Self {
        Self {
            x: "side walls at x = ±4096".to_string(),
            y: "back walls at y = ±5120, orange net at +y".to_string(),
            z: "floor at z = 0, ceiling at z = 2044".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Metadata {
    pub playlist: Option<String>,
    pub map: String,
    pub team_size: u32,
    pub overtime: bool,
    pub mutators: Vec<String>,
    pub match_guid: Option<String>,
    pub duration_seconds: f32,
    pub recorded_frame_hz: f32,
    pub total_frames: u64,
    pub engine_build: Option<String>,
    pub started_at_utc: Option<String>,
    pub coordinate_reference: CoordinateReference,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TeamBlock {
    pub name: String,
    pub score: u32,
    /// Canonical player ids.
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Teams {
    pub blue: TeamBlock,
    pub orange: TeamBlock,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportPlayer {
    pub player_id: String,
    pub display_name: String,
    pub team: u8,
    pub platform_ids: PlatformIds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loadout: Option<LoadoutSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_me: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    #[schemars(regex(pattern = r"^1\.0\.\d+$"))]
    pub schema_version: String,
    /// SHA-256 of the source file.
    pub replay_id: String,
    pub source_file: String,
    pub generated_at_utc: DateTime<Utc>,
    pub metadata: Metadata,
    pub quality: Quality,
    pub teams: Teams,
    pub players: Vec<ReportPlayer>,
    pub analysis: Analysis,
    pub events: Events,
}

impl Report {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Everything the assembler needs from the upstream stages.
pub struct ReportParts<'a> {
    pub header: &'a Header,
    pub index: &'a PlayerIndex,
    pub analysis: Analysis,
    pub events: Events,
    pub quality: Quality,
    pub replay_id: String,
    pub source_file: String,
    pub duration_seconds: f32,
    pub recorded_frame_hz: f32,
    pub total_frames: u64,
    pub me_canonical_id: Option<String>,
    pub generated_at_utc: DateTime<Utc>,
}

/// Build the root document and validate it against the embedded schema. A
/// schema violation is fatal; the document is never returned, let alone
/// written.
pub fn assemble(parts: ReportParts) -> RlcoachResult<Report> {
    let mut players = Vec::new();
    let mut by_team: BTreeMap<u8, Vec<String>> = BTreeMap::new();
    for entry in parts.index.players() {
        let id = entry.info.canonical_id.clone();
        by_team.entry(entry.info.team).or_default().push(id.clone());
        players.push(ReportPlayer {
            player_id: id.clone(),
            display_name: entry.info.display_name.clone(),
            team: entry.info.team,
            platform_ids: entry.info.platform_ids.clone(),
            camera: entry.info.camera,
            loadout: entry.info.loadout,
            is_me: match &parts.me_canonical_id {
                Some(me) if *me == id => Some(true),
                _ => None,
            },
        });
    }

    let report = Report {
        schema_version: SCHEMA_VERSION.to_string(),
        replay_id: parts.replay_id,
        source_file: parts.source_file,
        generated_at_utc: parts.generated_at_utc,
        metadata: Metadata {
            playlist: parts.header.playlist.clone(),
            map: parts.header.map_name.clone(),
            team_size: parts.header.team_size,
            overtime: parts.header.overtime,
            mutators: parts.header.mutators.clone(),
            match_guid: parts.header.match_guid.clone(),
            duration_seconds: parts.duration_seconds,
            recorded_frame_hz: parts.recorded_frame_hz,
            total_frames: parts.total_frames,
            engine_build: parts.header.engine_build.clone(),
            started_at_utc: parts
                .header
                .started_at
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            coordinate_reference: CoordinateReference::default(),
        },
        quality: parts.quality,
        teams: Teams {
            blue: TeamBlock {
                name: "BLUE".to_string(),
                score: parts.header.team0_score,
                players: by_team.remove(&0).unwrap_or_default(),
            },
            orange: TeamBlock {
                name: "ORANGE".to_string(),
                score: parts.header.team1_score,
                players: by_team.remove(&1).unwrap_or_default(),
            },
        },
        players,
        analysis: parts.analysis,
        events: parts.events,
    };

    let value = serde_json::to_value(&report).map_err(|e| RlcoachError::ReportSchemaViolation {
        path: "/".to_string(),
        reason: format!("serialization failed: {}", e),
    })?;
    schema::validate_report(&value)?;
    Ok(report)
}

/// Deterministic output path: `<reports_dir>/<play-date>/<replay_id>.json`.
/// The date is the local play date in the configured timezone, falling back
/// to the generation date in UTC.
pub fn output_path(report: &Report, config: &Config) -> PathBuf {
    let date = play_date(report, config)
        .unwrap_or_else(|| report.generated_at_utc.date_naive().to_string());
    config
        .paths
        .reports_dir
        .join(date)
        .join(format!("{}.json", report.replay_id))
}

fn play_date(report: &Report, config: &Config) -> Option<String> {
    let started = report.metadata.started_at_utc.as_deref()?;
    let naive = NaiveDateTime::parse_from_str(started, "%Y-%m-%dT%H:%M:%SZ").ok()?;
    let utc = naive.and_utc();
    match config
        .preferences
        .timezone
        .as_deref()
        .and_then(|name| name.parse::<chrono_tz::Tz>().ok())
    {
        Some(tz) => Some(utc.with_timezone(&tz).date_naive().to_string()),
        None => Some(utc.date_naive().to_string()),
    }
}

/// Atomic write: temp file beside the target, fsync, rename into place. A
/// failed run never leaves a partial report.
pub fn write_report(report: &Report, config: &Config, pretty: bool) -> RlcoachResult<PathBuf> {
    let path = output_path(report, config);
    let json = report
        .to_json(pretty)
        .map_err(|e| RlcoachError::ReportSchemaViolation {
            path: "/".to_string(),
            reason: format!("serialization failed: {}", e),
        })?;
    write_atomically(&path, json.as_bytes())
        .map_err(|e| RlcoachError::unreadable(format!("cannot write report: {}", e)))?;
    Ok(path)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let tmp = dir.join(format!(
        "{}.tmp-{}",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.json".to_string()),
        std::process::id()
    ));
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    match std::fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            std::fs::remove_file(&tmp).ok();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_leaves_no_tmp_files() {
        let dir = std::env::temp_dir().join(format!("rlcoach-report-{}", std::process::id()));
        let path = dir.join("2026-03-01").join("abc.json");
        write_atomically(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        let siblings: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(siblings.len(), 1);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn play_date_uses_configured_timezone() {
        let mut config = Config::default();
        config.preferences.timezone = Some("America/New_York".to_string());
        let report_meta_started = "2026-03-01T02:30:00Z";
        let naive =
            NaiveDateTime::parse_from_str(report_meta_started, "%Y-%m-%dT%H:%M:%SZ").unwrap();
        let tz: chrono_tz::Tz = "America/New_York".parse().unwrap();
        // 02:30 UTC is the previous evening on the US east coast.
        assert_eq!(
            naive.and_utc().with_timezone(&tz).date_naive().to_string(),
            "2026-02-28"
        );
    }
}
