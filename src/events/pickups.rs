//! Boost pickup events. The primary source is the adapter's pad event
//! stream; the boost-delta heuristic only runs when that stream is empty,
//! which is the signature of a degraded or header-only parse.

use std::collections::HashMap;

use crate::adapter::{BoostPadEvent, PadEventStatus};
use crate::constants::*;
use crate::field::{self, PadSide};
use crate::frame::{Frame, PlayerSlot};
use crate::normalize::PlayerIndex;

use super::PickupEvent;

pub fn detect_pickups(
    timeline: &[Frame],
    pad_events: &[BoostPadEvent],
    index: &PlayerIndex,
) -> Vec<PickupEvent> {
    if pad_events.is_empty() {
        detect_pickups_from_boost_deltas(timeline, index)
    } else {
        pad_events
            .iter()
            .filter(|event| event.status == PadEventStatus::Collected)
            .map(|event| {
                let team = event.slot.and_then(|slot| index.team_of(slot));
                PickupEvent {
                    t: event.timestamp_s,
                    frame: event.frame,
                    player_id: event
                        .slot
                        .and_then(|slot| index.canonical_id(slot))
                        .map(|id| id.to_string()),
                    team,
                    pad_id: event.pad_id,
                    is_big: event.is_big,
                    stolen: team.map_or(false, |team| is_stolen(event.pad_side, team)),
                }
            })
            .collect()
    }
}

/// Midfield pads are never stolen; otherwise a pad on the opposing half is.
pub fn is_stolen(pad_side: PadSide, team: u8) -> bool {
    match pad_side {
        PadSide::Mid => false,
        PadSide::Blue => team == 1,
        PadSide::Orange => team == 0,
    }
}

/// Legacy fallback: a boost reading rising by at least ten points while the
/// player sits on a canonical pad.
fn detect_pickups_from_boost_deltas(timeline: &[Frame], index: &PlayerIndex) -> Vec<PickupEvent> {
    let mut pickups = Vec::new();
    let mut last_boost: HashMap<PlayerSlot, f32> = HashMap::new();
    let mut cooldown_until: HashMap<PlayerSlot, f32> = HashMap::new();

    for (frame_index, frame) in timeline.iter().enumerate() {
        for player in frame.players.iter() {
            let previous = last_boost.insert(player.slot, player.boost_amount);
            let Some(previous) = previous else {
                continue;
            };
            if player.boost_amount - previous < BOOST_DELTA_FALLBACK_MIN_RISE {
                continue;
            }
            if cooldown_until
                .get(&player.slot)
                .map_or(false, |until| frame.timestamp_s < *until)
            {
                continue;
            }

            // Attribute to the nearest canonical pad, with slack on top of
            // the snap tolerance for sampling skew.
            let Some(pad) = nearest_pad_within_slack(player.position) else {
                continue;
            };

            cooldown_until.insert(player.slot, frame.timestamp_s + TOUCH_DEBOUNCE_WINDOW_S);
            pickups.push(PickupEvent {
                t: frame.timestamp_s,
                frame: frame_index,
                player_id: index.canonical_id(player.slot).map(|id| id.to_string()),
                team: Some(player.team),
                pad_id: pad.pad_id,
                is_big: pad.is_big,
                stolen: is_stolen(pad.side, player.team),
            });
        }
    }
    pickups
}

fn nearest_pad_within_slack(
    position: crate::frame::Vec3,
) -> Option<&'static field::BoostPad> {
    field::PAD_TABLE
        .iter()
        .filter(|pad| {
            let tolerance = if pad.is_big {
                field::SNAP_TOLERANCE_BIG_UU
            } else {
                field::SNAP_TOLERANCE_SMALL_UU
            } + BOOST_DELTA_FALLBACK_SLACK_UU;
            position.distance_2d(pad.position) <= tolerance
        })
        .min_by(|a, b| {
            float_ord::FloatOrd(position.distance_2d(a.position))
                .cmp(&float_ord::FloatOrd(position.distance_2d(b.position)))
        })
}
