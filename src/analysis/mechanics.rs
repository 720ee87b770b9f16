//! Mechanics counters inferred from kinematics. Counters that depend on
//! true orientation are withheld (`null`) for players whose rotation was
//! approximated.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::constants::*;
use crate::frame::Frame;
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MechanicsMetrics {
    pub jump: u32,
    pub double_jump: u32,
    pub flip: u32,
    /// Flip counts by direction tag (`forward`, `diagonal`, `sideways`).
    pub flip_directions: BTreeMap<String, u32>,
    pub flip_cancel: Option<u32>,
    pub wavedash: u32,
    pub half_flip: Option<u32>,
    pub speedflip: Option<u32>,
    pub aerial: u32,
}

struct Sample {
    t: f32,
    z: f32,
    speed: f32,
    vertical_speed: f32,
    on_ground: bool,
    pitch: f32,
    yaw: f32,
    lateral_ratio: f32,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> MechanicsMetrics {
    let samples = collect_samples(ctx.timeline, entry);
    let mut metrics = MechanicsMetrics::default();

    let mut flip_cancels = 0u32;
    let mut half_flips = 0u32;
    let mut speedflips = 0u32;

    let mut airborne_since: Option<f32> = None;
    let mut reached_high_air = false;
    let mut last_flip: Option<(f32, f32, f32)> = None; // (t, lateral, yaw_at_flip)

    for window in samples.windows(2) {
        let (prev, cur) = (&window[0], &window[1]);
        let dt = cur.t - prev.t;
        if dt <= 0.0 {
            continue;
        }

        // Jump: leaving the ground under vertical impulse.
        if prev.on_ground && !cur.on_ground && cur.vertical_speed > 200.0 {
            metrics.jump += 1;
        }

        // Dodge/double-jump impulses while airborne.
        let gain = cur.speed - prev.speed;
        if !cur.on_ground && !prev.on_ground {
            if gain >= DODGE_IMPULSE_MIN_GAIN_UU {
                metrics.flip += 1;
                let direction = flip_direction(cur.lateral_ratio);
                *metrics
                    .flip_directions
                    .entry(direction.to_string())
                    .or_insert(0) += 1;
                last_flip = Some((cur.t, cur.lateral_ratio, prev.yaw));
            } else if cur.vertical_speed - prev.vertical_speed > 250.0 {
                metrics.double_jump += 1;
            }
        }

        // Flip cancel: pitch back to level right after a flip.
        if let Some((flip_t, lateral, yaw_at_flip)) = last_flip {
            let since = cur.t - flip_t;
            if since > 0.0 && since <= KICKOFF_FLIP_CANCEL_WINDOW_S && cur.pitch.abs() < 0.3 {
                flip_cancels += 1;
                if (SPEEDFLIP_DIAGONAL_MIN_RATIO..=0.8).contains(&lateral) {
                    speedflips += 1;
                }
                // Half flip: a backflip cancelled into a ~180 yaw turn.
                let yaw_turn = wrap_angle(cur.yaw - yaw_at_flip).abs();
                if lateral < SPEEDFLIP_DIAGONAL_MIN_RATIO
                    && since <= HALF_FLIP_REVERSE_WINDOW_S
                    && yaw_turn > std::f32::consts::FRAC_PI_2
                {
                    half_flips += 1;
                }
                last_flip = None;
            } else if since > KICKOFF_FLIP_CANCEL_WINDOW_S {
                last_flip = None;
            }
        }

        // Wavedash: a short hop landed with a speed gain. An aerial is an
        // airborne segment that reached real altitude, not a dribble hop.
        if prev.on_ground && !cur.on_ground {
            airborne_since = Some(cur.t);
            reached_high_air = false;
        }
        if !cur.on_ground {
            reached_high_air = reached_high_air || cur.z >= LOW_AIR_BAND_MAX_Z;
        }
        if !prev.on_ground && cur.on_ground {
            if let Some(since) = airborne_since.take() {
                let air_time = cur.t - since;
                if air_time <= WAVEDASH_LANDING_WINDOW_S && gain >= WAVEDASH_MIN_SPEED_GAIN_UU {
                    metrics.wavedash += 1;
                }
                if reached_high_air && air_time >= AERIAL_MIN_DURATION_S {
                    metrics.aerial += 1;
                }
            }
        }
    }

    metrics.flip_cancel = gated(entry, flip_cancels);
    metrics.half_flip = gated(entry, half_flips);
    metrics.speedflip = gated(entry, speedflips);
    metrics
}

fn gated(entry: &PlayerIndexEntry, value: u32) -> Option<u32> {
    if entry.rotation_gated {
        None
    } else {
        Some(value)
    }
}

fn flip_direction(lateral_ratio: f32) -> &'static str {
    if lateral_ratio < SPEEDFLIP_DIAGONAL_MIN_RATIO {
        "forward"
    } else if lateral_ratio <= 0.8 {
        "diagonal"
    } else {
        "sideways"
    }
}

fn collect_samples(timeline: &[Frame], entry: &PlayerIndexEntry) -> Vec<Sample> {
    timeline
        .iter()
        .filter_map(|frame| {
            frame.player(entry.slot).map(|p| Sample {
                t: frame.timestamp_s,
                z: p.position.z,
                speed: p.speed(),
                vertical_speed: p.velocity.z,
                on_ground: p.is_on_ground,
                pitch: p.rotation.x,
                yaw: p.rotation.y,
                lateral_ratio: {
                    let speed = p.speed();
                    if speed <= f32::EPSILON {
                        0.0
                    } else {
                        p.velocity.x.abs() / speed
                    }
                },
            })
        })
        .collect()
}

pub fn for_team(members: &[&super::PerPlayerMetrics]) -> MechanicsMetrics {
    let mut total = MechanicsMetrics::default();
    let mut flip_cancel: Option<u32> = Some(0);
    let mut half_flip: Option<u32> = Some(0);
    let mut speedflip: Option<u32> = Some(0);
    for m in members {
        let mech = &m.mechanics;
        total.jump += mech.jump;
        total.double_jump += mech.double_jump;
        total.flip += mech.flip;
        total.wavedash += mech.wavedash;
        total.aerial += mech.aerial;
        for (direction, count) in &mech.flip_directions {
            *total
                .flip_directions
                .entry(direction.clone())
                .or_insert(0) += count;
        }
        flip_cancel = sum_gated(flip_cancel, mech.flip_cancel);
        half_flip = sum_gated(half_flip, mech.half_flip);
        speedflip = sum_gated(speedflip, mech.speedflip);
    }
    total.flip_cancel = flip_cancel;
    total.half_flip = half_flip;
    total.speedflip = speedflip;
    total
}

fn sum_gated(total: Option<u32>, value: Option<u32>) -> Option<u32> {
    match (total, value) {
        (Some(t), Some(v)) => Some(t + v),
        _ => None,
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle;
    while a > std::f32::consts::PI {
        a -= std::f32::consts::TAU;
    }
    while a < -std::f32::consts::PI {
        a += std::f32::consts::TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Events;
    use crate::frame::{BallFrame, PlayerFrame, PlayerSlot, Vec3};
    use crate::normalize::normalize_players;

    fn entry_ctx() -> (Vec<Frame>, crate::normalize::PlayerIndex) {
        let header = crate::Header {
            players: vec![crate::header::PlayerInfo::from_name_and_platform(
                "Alpha".into(),
                0,
                Default::default(),
            )],
            ..Default::default()
        };
        let roster = vec![crate::adapter::SlotMeta {
            display_name: Some("Alpha".into()),
            team: Some(0),
            ..Default::default()
        }];
        (Vec::new(), normalize_players(&header, &roster))
    }

    fn sample_frame(t: f32, z: f32, velocity: Vec3, on_ground: bool) -> Frame {
        Frame {
            timestamp_s: t,
            ball: BallFrame::default(),
            players: vec![PlayerFrame {
                slot: PlayerSlot(0),
                team: 0,
                position: Vec3::new(0.0, 0.0, z),
                velocity,
                rotation: Vec3::ZERO,
                rotation_approximated: false,
                boost_amount: 50.0,
                is_supersonic: false,
                is_on_ground: on_ground,
                is_demolished: false,
            }],
        }
    }

    #[test]
    fn jump_counts_on_liftoff_with_vertical_impulse() {
        let (_, index) = entry_ctx();
        let timeline = vec![
            sample_frame(0.0, 17.0, Vec3::new(500.0, 0.0, 0.0), true),
            sample_frame(0.1, 60.0, Vec3::new(500.0, 0.0, 300.0), false),
            sample_frame(0.2, 120.0, Vec3::new(500.0, 0.0, 250.0), false),
        ];
        let events = Events::default();
        let ctx = AnalysisContext {
            timeline: &timeline,
            events: &events,
            index: &index,
            duration_s: 0.2,
        };
        let metrics = for_player(&ctx, index.players().first().unwrap());
        assert_eq!(metrics.jump, 1);
        assert_eq!(metrics.flip_cancel, Some(0));
    }

    #[test]
    fn gated_rotation_nulls_sensitive_counters() {
        let header = crate::Header {
            players: vec![crate::header::PlayerInfo::from_name_and_platform(
                "Alpha".into(),
                0,
                Default::default(),
            )],
            ..Default::default()
        };
        let roster = vec![crate::adapter::SlotMeta {
            display_name: Some("Alpha".into()),
            team: Some(0),
            rotation_samples: 100,
            rotation_approximated: 80,
            ..Default::default()
        }];
        let index = normalize_players(&header, &roster);
        let events = Events::default();
        let ctx = AnalysisContext {
            timeline: &[],
            events: &events,
            index: &index,
            duration_s: 0.0,
        };
        let metrics = for_player(&ctx, index.players().first().unwrap());
        assert_eq!(metrics.flip_cancel, None);
        assert_eq!(metrics.speedflip, None);
        assert_eq!(metrics.half_flip, None);
    }
}
