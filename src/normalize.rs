//! Normalization: measure the sampling rate, unify player identity across
//! header and frames, and assemble the canonical timeline shared by the
//! detectors and analyzers.

use std::collections::BTreeMap;

use float_ord::FloatOrd;
use log::warn;

use crate::adapter::SlotMeta;
use crate::constants::*;
use crate::field::ARENA;
use crate::frame::{Frame, PlayerSlot, Vec3};
use crate::header::{Header, PlayerInfo};

/// Median of successive frame deltas, clamped to the plausible band. Falls
/// back to the nominal 30 Hz on insufficient data.
pub fn measure_frame_rate(frames: &[Frame]) -> f32 {
    let mut deltas: Vec<f32> = frames
        .windows(2)
        .map(|w| w[1].timestamp_s - w[0].timestamp_s)
        .filter(|d| *d > 0.0 && d.is_finite())
        .collect();
    if deltas.is_empty() {
        return DEFAULT_HZ;
    }
    deltas.sort_by_key(|d| FloatOrd(*d));
    let median = deltas[deltas.len() / 2];
    if median <= 0.0 {
        return DEFAULT_HZ;
    }
    (1.0 / median).clamp(MIN_PLAUSIBLE_HZ, MAX_PLAUSIBLE_HZ)
}

/// Clamp a raw position into the arena box (plus tolerance). Returns the
/// adjusted position and whether clamping occurred.
pub fn to_field_coords(raw: Vec3) -> (Vec3, bool) {
    let max_x = ARENA.side_wall_x * (1.0 + OUT_OF_BOUNDS_TOLERANCE);
    // The goal volume extends past the back wall.
    let max_y = (ARENA.back_wall_y + crate::field::GOAL_DEPTH) * (1.0 + OUT_OF_BOUNDS_TOLERANCE);
    let max_z = ARENA.ceiling_z * (1.0 + OUT_OF_BOUNDS_TOLERANCE);

    let clamped = Vec3::new(
        raw.x.clamp(-max_x, max_x),
        raw.y.clamp(-max_y, max_y),
        raw.z.clamp(0.0, max_z),
    );
    (clamped, clamped != raw)
}

#[derive(Debug, Clone)]
pub struct PlayerIndexEntry {
    pub slot: PlayerSlot,
    pub info: PlayerInfo,
    /// True when the slot appeared in network frames (false for header-only
    /// players).
    pub seen_in_frames: bool,
    /// True when rotation was approximated often enough that the
    /// rotation-sensitive mechanics counters must be withheld.
    pub rotation_gated: bool,
}

/// Uniform player identity: one entry per player, indexed by frame slot,
/// with frame-provided ids aliased onto canonical header identities.
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    entries: Vec<PlayerIndexEntry>,
    /// Frame-side identity string -> canonical id.
    pub aliases: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

impl PlayerIndex {
    pub fn players(&self) -> &[PlayerIndexEntry] {
        &self.entries
    }

    pub fn entry(&self, slot: PlayerSlot) -> Option<&PlayerIndexEntry> {
        self.entries.iter().find(|e| e.slot == slot)
    }

    pub fn canonical_id(&self, slot: PlayerSlot) -> Option<&str> {
        self.entry(slot).map(|e| e.info.canonical_id.as_str())
    }

    pub fn by_canonical(&self, canonical_id: &str) -> Option<&PlayerIndexEntry> {
        self.entries
            .iter()
            .find(|e| e.info.canonical_id == canonical_id)
    }

    pub fn team_of(&self, slot: PlayerSlot) -> Option<u8> {
        self.entry(slot).map(|e| e.info.team)
    }

    pub fn teammates_of(&self, slot: PlayerSlot) -> Vec<PlayerSlot> {
        let Some(team) = self.team_of(slot) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|e| e.info.team == team && e.slot != slot)
            .map(|e| e.slot)
            .collect()
    }
}

/// Merge the header roster (source of truth for names and teams) with the
/// slots observed in the network stream. Slots with no header counterpart
/// get positional fallback ids.
pub fn normalize_players(header: &Header, roster: &[SlotMeta]) -> PlayerIndex {
    let mut index = PlayerIndex::default();
    let mut matched_header: Vec<bool> = vec![false; header.players.len()];

    for (slot_index, meta) in roster.iter().enumerate() {
        let slot = PlayerSlot(slot_index);
        let header_match = find_header_player(header, meta, &matched_header);

        let entry = match header_match {
            Some(header_index) => {
                matched_header[header_index] = true;
                let mut info = header.players[header_index].clone();
                // Network ids are richer than header OnlineIDs; prefer the
                // canonical id derived from the wire when available.
                if let Some(platform_id) = &meta.platform_id {
                    index
                        .aliases
                        .insert(platform_id.clone(), info.canonical_id.clone());
                    if info.platform_ids.canonical().is_none() {
                        info.canonical_id = platform_id.clone();
                    }
                }
                if let Some(name) = &meta.display_name {
                    index
                        .aliases
                        .insert(name.clone(), info.canonical_id.clone());
                }
                info.camera = meta.camera;
                info.loadout = meta.loadout;
                PlayerIndexEntry {
                    slot,
                    info,
                    seen_in_frames: true,
                    rotation_gated: meta.rotation_approximated_ratio()
                        > ROTATION_APPROXIMATED_WARN_RATIO,
                }
            }
            None => {
                let fallback_id = format!("slug:frame-player-{}", slot_index);
                warn!(
                    "frame slot {} has no header counterpart, using {}",
                    slot_index, fallback_id
                );
                index
                    .warnings
                    .push(format!("unmatched_frame_player_{}", slot_index));
                let display_name = meta
                    .display_name
                    .clone()
                    .unwrap_or_else(|| format!("Player {}", slot_index + 1));
                let mut info = PlayerInfo::from_name_and_platform(
                    display_name,
                    meta.team.unwrap_or(0),
                    Default::default(),
                );
                info.canonical_id = meta.platform_id.clone().unwrap_or(fallback_id);
                info.camera = meta.camera;
                info.loadout = meta.loadout;
                PlayerIndexEntry {
                    slot,
                    info,
                    seen_in_frames: true,
                    rotation_gated: meta.rotation_approximated_ratio()
                        > ROTATION_APPROXIMATED_WARN_RATIO,
                }
            }
        };
        index.entries.push(entry);
    }

    // Header players never observed in frames (header-only parses, or
    // spectating oddities) still get entries so every report block is keyed
    // by the full roster.
    for (header_index, info) in header.players.iter().enumerate() {
        if !matched_header[header_index] {
            let slot = PlayerSlot(index.entries.len());
            index.entries.push(PlayerIndexEntry {
                slot,
                info: info.clone(),
                seen_in_frames: false,
                rotation_gated: false,
            });
        }
    }

    index
}

fn find_header_player(header: &Header, meta: &SlotMeta, taken: &[bool]) -> Option<usize> {
    // Platform id match first, then casefolded display name; never guess
    // beyond that.
    if let Some(platform_id) = &meta.platform_id {
        if let Some(found) = header.players.iter().enumerate().position(|(i, p)| {
            !taken[i]
                && p.platform_ids
                    .canonical()
                    .map_or(false, |c| c.eq_ignore_ascii_case(platform_id))
        }) {
            return Some(found);
        }
    }
    if let Some(name) = &meta.display_name {
        let folded = name.trim().to_lowercase();
        if let Some(found) = header
            .players
            .iter()
            .enumerate()
            .position(|(i, p)| !taken[i] && p.display_name.trim().to_lowercase() == folded)
        {
            return Some(found);
        }
    }
    None
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TimelineStats {
    pub skipped_frames: u64,
    pub clamped_positions: u64,
}

/// Chronologically sorted, cleaned timeline. Malformed frames are skipped
/// with a counter; a single bad frame never fails the pipeline.
pub fn build_timeline(mut frames: Vec<Frame>) -> (Vec<Frame>, TimelineStats) {
    let mut stats = TimelineStats::default();

    frames.retain(|f| {
        if f.is_well_formed() {
            true
        } else {
            stats.skipped_frames += 1;
            false
        }
    });
    frames.sort_by_key(|f| FloatOrd(f.timestamp_s));

    for frame in frames.iter_mut() {
        let (position, clamped) = to_field_coords(frame.ball.position);
        frame.ball.position = position;
        if clamped {
            stats.clamped_positions += 1;
        }
        for player in frame.players.iter_mut() {
            let (position, clamped) = to_field_coords(player.position);
            player.position = position;
            if clamped {
                stats.clamped_positions += 1;
            }
        }
    }

    (frames, stats)
}

/// Keep every Nth frame. Expressed as a data transform so the downsampling
/// is visible in the report tag, never hidden in control flow.
pub fn downsample(frames: Vec<Frame>, every: u32) -> Vec<Frame> {
    if every <= 1 {
        return frames;
    }
    frames
        .into_iter()
        .step_by(every as usize)
        .collect()
}

/// Read the `SAMPLE_EVERY` directive. Invalid values are ignored.
pub fn sample_every_from_env() -> Option<u32> {
    std::env::var(SAMPLE_EVERY_ENV)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|n| *n > 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::BallFrame;

    fn frame_at(t: f32) -> Frame {
        Frame {
            timestamp_s: t,
            ball: BallFrame::default(),
            players: vec![],
        }
    }

    #[test]
    fn frame_rate_is_median_of_deltas() {
        let frames: Vec<Frame> = (0..100).map(|i| frame_at(i as f32 / 30.0)).collect();
        let hz = measure_frame_rate(&frames);
        assert!((hz - 30.0).abs() < 0.5, "got {}", hz);
    }

    #[test]
    fn frame_rate_defaults_on_insufficient_data() {
        assert_eq!(measure_frame_rate(&[]), DEFAULT_HZ);
        assert_eq!(measure_frame_rate(&[frame_at(0.0)]), DEFAULT_HZ);
    }

    #[test]
    fn frame_rate_is_clamped() {
        let frames: Vec<Frame> = (0..10).map(|i| frame_at(i as f32 * 100.0)).collect();
        assert_eq!(measure_frame_rate(&frames), MIN_PLAUSIBLE_HZ);
    }

    #[test]
    fn out_of_bounds_positions_clamp() {
        let (v, clamped) = to_field_coords(Vec3::new(9000.0, 0.0, 100.0));
        assert!(clamped);
        assert!(v.x <= ARENA.side_wall_x * 1.02 + 1.0);

        let (_, clamped) = to_field_coords(Vec3::new(0.0, -5900.0, 100.0));
        assert!(!clamped, "goal depth must stay in bounds");
    }

    #[test]
    fn timeline_sorts_and_skips_malformed() {
        let mut bad = frame_at(1.0);
        bad.ball.position.x = f32::NAN;
        let frames = vec![frame_at(2.0), bad, frame_at(0.5)];
        let (timeline, stats) = build_timeline(frames);
        assert_eq!(timeline.len(), 2);
        assert_eq!(stats.skipped_frames, 1);
        assert!(timeline[0].timestamp_s < timeline[1].timestamp_s);
    }

    #[test]
    fn downsample_keeps_every_nth() {
        let frames: Vec<Frame> = (0..10).map(|i| frame_at(i as f32)).collect();
        let kept = downsample(frames, 3);
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[1].timestamp_s, 3.0);
    }
}
