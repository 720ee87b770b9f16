//! Header-level view of a replay: match metadata, the roster, and the goal
//! list, extracted from the boxcars property table. The header is the source
//! of truth for player display names and teams.

use boxcars::HeaderProp;
use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::identity::slugify;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlatformIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xbox: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch: Option<String>,
}

impl PlatformIds {
    /// The canonical `<platform>:<id>` string, preferring the platforms in
    /// declaration order. `None` when no platform id is known.
    pub fn canonical(&self) -> Option<String> {
        if let Some(id) = &self.steam {
            Some(format!("steam:{}", id))
        } else if let Some(id) = &self.epic {
            Some(format!("epic:{}", id))
        } else if let Some(id) = &self.psn {
            Some(format!("psn:{}", id))
        } else if let Some(id) = &self.xbox {
            Some(format!("xbox:{}", id))
        } else {
            self.switch.as_ref().map(|id| format!("switch:{}", id))
        }
    }
}

/// Camera profile replicated for a player, when the stream carries one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CameraSettings {
    pub fov: f32,
    pub height: f32,
    pub angle: f32,
    pub distance: f32,
    pub stiffness: f32,
    pub swivel: f32,
    pub transition: f32,
}

/// Product ids of the visible loadout, when replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadoutSummary {
    pub body: u32,
    pub wheels: u32,
    pub boost: u32,
    pub antenna: u32,
    pub topper: u32,
}

/// Scoreboard numbers from the header's `PlayerStats` rows. The header is
/// the only source for `score`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeaderPlayerStats {
    pub score: u32,
    pub goals: u32,
    pub assists: u32,
    pub saves: u32,
    pub shots: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerInfo {
    /// `<platform>:<id>` when a platform id exists, else `slug:<name>`.
    pub canonical_id: String,
    pub display_name: String,
    pub team: u8,
    pub platform_ids: PlatformIds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loadout: Option<LoadoutSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<HeaderPlayerStats>,
}

impl PlayerInfo {
    pub fn from_name_and_platform(display_name: String, team: u8, platform_ids: PlatformIds) -> Self {
        let canonical_id = platform_ids
            .canonical()
            .unwrap_or_else(|| format!("slug:{}", slugify(&display_name)));
        Self {
            canonical_id,
            display_name,
            team,
            platform_ids,
            camera: None,
            loadout: None,
            stats: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeaderGoal {
    pub frame: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorer_index: Option<usize>,
    pub team: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub playlist_id: Option<i32>,
    pub playlist: Option<String>,
    pub map_name: String,
    pub team_size: u32,
    pub team0_score: u32,
    pub team1_score: u32,
    pub match_length_s: f32,
    pub num_frames: Option<i32>,
    pub record_fps: Option<f32>,
    pub match_guid: Option<String>,
    pub engine_build: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub overtime: bool,
    pub mutators: Vec<String>,
    pub players: Vec<PlayerInfo>,
    pub goals: Vec<HeaderGoal>,
    pub warnings: Vec<String>,
}

impl Header {
    /// Extract the header view from a parsed replay. Missing properties are
    /// tolerated; the result records what could not be read in `warnings`.
    pub fn from_replay(replay: &boxcars::Replay) -> Self {
        let props = &replay.properties;
        let mut warnings = Vec::new();

        let num_frames = prop_int(props, "NumFrames");
        let record_fps = prop_f32(props, "RecordFPS");
        let match_length_s = match (num_frames, record_fps) {
            (Some(frames), Some(fps)) if fps > 0.0 => frames as f32 / fps,
            _ => {
                warnings.push("match_length_unavailable".to_string());
                0.0
            }
        };

        let players = extract_players(props, &mut warnings);
        let goals = extract_goals(props, &players);

        Header {
            playlist_id: prop_int(props, "PlaylistID"),
            playlist: prop_str(props, "MatchType"),
            map_name: prop_str(props, "MapName").unwrap_or_else(|| {
                warnings.push("map_name_unavailable".to_string());
                "unknown".to_string()
            }),
            team_size: prop_int(props, "TeamSize").unwrap_or(0).max(0) as u32,
            team0_score: prop_int(props, "Team0Score").unwrap_or(0).max(0) as u32,
            team1_score: prop_int(props, "Team1Score").unwrap_or(0).max(0) as u32,
            match_length_s,
            num_frames,
            record_fps,
            match_guid: prop_str(props, "MatchGuid"),
            engine_build: prop_str(props, "BuildVersion")
                .or_else(|| prop_int(props, "BuildID").map(|id| id.to_string())),
            started_at: prop_str(props, "Date")
                .and_then(|d| NaiveDateTime::parse_from_str(&d, "%Y-%m-%d %H-%M-%S").ok()),
            overtime: prop_bool(props, "bOverTime").unwrap_or(false),
            mutators: prop_str(props, "MutatorSettings")
                .map(|m| m.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            players,
            goals,
            warnings,
        }
    }
}

fn extract_players(props: &[(String, HeaderProp)], warnings: &mut Vec<String>) -> Vec<PlayerInfo> {
    let Some(rows) = prop_array(props, "PlayerStats") else {
        warnings.push("player_stats_header_missing".to_string());
        return Vec::new();
    };

    let mut players = Vec::new();
    for row in rows {
        let Some(name) = prop_str(row, "Name") else {
            continue;
        };
        let team = prop_int(row, "Team").unwrap_or(0).clamp(0, 1) as u8;
        let online_id = prop_qword(row, "OnlineID").unwrap_or(0);
        let platform = prop_byte_value(row, "Platform");

        let mut platform_ids = PlatformIds::default();
        if online_id != 0 {
            match platform.as_deref() {
                Some("OnlinePlatform_Steam") => platform_ids.steam = Some(online_id.to_string()),
                Some("OnlinePlatform_PS4") => platform_ids.psn = Some(online_id.to_string()),
                Some("OnlinePlatform_Dingo") => platform_ids.xbox = Some(online_id.to_string()),
                Some("OnlinePlatform_Switch") => platform_ids.switch = Some(online_id.to_string()),
                Some("OnlinePlatform_Epic") => platform_ids.epic = Some(online_id.to_string()),
                _ => {}
            }
        }

        let mut player = PlayerInfo::from_name_and_platform(name, team, platform_ids);
        player.stats = Some(HeaderPlayerStats {
            score: prop_int(row, "Score").unwrap_or(0).max(0) as u32,
            goals: prop_int(row, "Goals").unwrap_or(0).max(0) as u32,
            assists: prop_int(row, "Assists").unwrap_or(0).max(0) as u32,
            saves: prop_int(row, "Saves").unwrap_or(0).max(0) as u32,
            shots: prop_int(row, "Shots").unwrap_or(0).max(0) as u32,
        });
        players.push(player);
    }
    players
}

fn extract_goals(props: &[(String, HeaderProp)], players: &[PlayerInfo]) -> Vec<HeaderGoal> {
    let Some(rows) = prop_array(props, "Goals") else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let frame = prop_int(row, "frame")?;
            let team = prop_int(row, "PlayerTeam").unwrap_or(0).clamp(0, 1) as u8;
            let scorer_index = prop_str(row, "PlayerName")
                .and_then(|name| players.iter().position(|p| p.display_name == name));
            Some(HeaderGoal {
                frame,
                scorer_index,
                team,
            })
        })
        .collect()
}

// Property accessors. The header property table is an association list, not
// a map; names repeat only in malformed replays, where first-wins applies.

fn prop<'a>(props: &'a [(String, HeaderProp)], name: &str) -> Option<&'a HeaderProp> {
    props.iter().find(|(key, _)| key == name).map(|(_, v)| v)
}

fn prop_array<'a>(
    props: &'a [(String, HeaderProp)],
    name: &str,
) -> Option<&'a Vec<Vec<(String, HeaderProp)>>> {
    match prop(props, name)? {
        HeaderProp::Array(rows) => Some(rows),
        _ => None,
    }
}

fn prop_int(props: &[(String, HeaderProp)], name: &str) -> Option<i32> {
    match prop(props, name)? {
        HeaderProp::Int(v) => Some(*v),
        _ => None,
    }
}

fn prop_f32(props: &[(String, HeaderProp)], name: &str) -> Option<f32> {
    match prop(props, name)? {
        HeaderProp::Float(v) => Some(*v),
        HeaderProp::Int(v) => Some(*v as f32),
        _ => None,
    }
}

fn prop_bool(props: &[(String, HeaderProp)], name: &str) -> Option<bool> {
    match prop(props, name)? {
        HeaderProp::Bool(v) => Some(*v),
        _ => None,
    }
}

fn prop_qword(props: &[(String, HeaderProp)], name: &str) -> Option<u64> {
    match prop(props, name)? {
        HeaderProp::QWord(v) => Some(*v),
        HeaderProp::Int(v) => Some(*v as u64),
        _ => None,
    }
}

fn prop_str(props: &[(String, HeaderProp)], name: &str) -> Option<String> {
    match prop(props, name)? {
        HeaderProp::Str(v) => Some(v.clone()),
        HeaderProp::Name(v) => Some(v.clone()),
        _ => None,
    }
}

fn prop_byte_value(props: &[(String, HeaderProp)], name: &str) -> Option<String> {
    match prop(props, name)? {
        HeaderProp::Byte {
            kind: _,
            value: Some(v),
        } => Some(v.clone()),
        _ => None,
    }
}
