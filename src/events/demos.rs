//! Demolition detection: a player's demolished flag rising edge, with the
//! attacker attributed to the closest hostile car at high relative speed
//! over the preceding frames.

use std::collections::HashMap;

use crate::constants::*;
use crate::frame::{Frame, PlayerSlot};
use crate::normalize::PlayerIndex;

use super::DemoEvent;

pub fn detect_demos(timeline: &[Frame], index: &PlayerIndex) -> Vec<DemoEvent> {
    let mut demos = Vec::new();
    let mut was_demolished: HashMap<PlayerSlot, bool> = HashMap::new();

    for (frame_index, frame) in timeline.iter().enumerate() {
        for victim in frame.players.iter() {
            let before = was_demolished
                .insert(victim.slot, victim.is_demolished)
                .unwrap_or(false);
            if !victim.is_demolished || before {
                continue;
            }

            let Some(victim_id) = index.canonical_id(victim.slot) else {
                continue;
            };
            let attacker =
                attribute_attacker(timeline, frame_index, victim.slot, victim.team)
                    .and_then(|slot| index.canonical_id(slot))
                    .map(|id| id.to_string());

            demos.push(DemoEvent {
                t: frame.timestamp_s,
                frame: frame_index,
                attacker,
                victim: victim_id.to_string(),
                location: victim.position,
            });
        }
    }
    demos
}

/// Best hostile candidate over the preceding frames: closest approach to
/// the victim while moving fast relative to it.
fn attribute_attacker(
    timeline: &[Frame],
    frame_index: usize,
    victim: PlayerSlot,
    victim_team: u8,
) -> Option<PlayerSlot> {
    let start = frame_index.saturating_sub(DEMO_ATTACKER_LOOKBACK_FRAMES);
    let mut best: Option<(PlayerSlot, f32)> = None;

    for frame in &timeline[start..=frame_index] {
        let Some(victim_frame) = frame.player(victim) else {
            continue;
        };
        for candidate in frame.players.iter() {
            if candidate.team == victim_team || candidate.is_demolished {
                continue;
            }
            let relative_speed = candidate
                .velocity
                .to_glam()
                .distance(victim_frame.velocity.to_glam());
            if relative_speed < DEMO_ATTACKER_MIN_REL_SPEED_UU {
                continue;
            }
            let distance = candidate.position.distance(victim_frame.position);
            if best
                .map(|(_, best_distance)| distance < best_distance)
                .unwrap_or(true)
            {
                best = Some((candidate.slot, distance));
            }
        }
    }
    best.map(|(slot, _)| slot)
}
