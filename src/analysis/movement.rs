//! Movement profile: speed bands, altitude bands, distance, aerials, and
//! powerslides (the latter withheld when rotation was approximated).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::constants::*;
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MovementMetrics {
    pub avg_speed_kph: f32,
    pub max_speed_kph: f32,
    pub distance_km: f32,
    pub time_slow_s: f32,
    pub time_boost_speed_s: f32,
    pub time_supersonic_s: f32,
    pub time_ground_s: f32,
    pub time_low_air_s: f32,
    pub time_high_air_s: f32,
    /// `null` when rotation was approximated for too many samples.
    pub powerslide_count: Option<u32>,
    pub aerial_count: u32,
    pub aerial_time_s: f32,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> MovementMetrics {
    let mut metrics = MovementMetrics::default();
    let deltas = ctx.frame_deltas();

    let mut weighted_speed = 0.0;
    let mut observed_s = 0.0;
    let mut max_speed = 0.0f32;
    let mut airborne_since: Option<f32> = None;
    let mut powerslides = 0u32;
    let mut previous_yaw: Option<(f32, f32)> = None; // (t, yaw)

    for (frame, dt) in ctx.timeline.iter().zip(deltas.iter()) {
        let Some(player) = frame.player(entry.slot) else {
            previous_yaw = None;
            continue;
        };
        let speed = player.speed();
        max_speed = max_speed.max(speed);
        weighted_speed += speed * dt;
        observed_s += dt;
        metrics.distance_km += speed * dt / UU_PER_METER / 1000.0;

        if speed < SLOW_SPEED_MAX_UU {
            metrics.time_slow_s += dt;
        } else if speed < SUPERSONIC_SPEED_UU {
            metrics.time_boost_speed_s += dt;
        } else {
            metrics.time_supersonic_s += dt;
        }

        let z = player.position.z;
        if z < GROUND_BAND_MAX_Z {
            metrics.time_ground_s += dt;
        } else if z < LOW_AIR_BAND_MAX_Z {
            metrics.time_low_air_s += dt;
        } else {
            metrics.time_high_air_s += dt;
        }

        // Aerial segments: consecutive airborne samples long enough to be
        // deliberate.
        if !player.is_on_ground {
            if airborne_since.is_none() {
                airborne_since = Some(frame.timestamp_s);
            }
        } else if let Some(since) = airborne_since.take() {
            let air_time = frame.timestamp_s - since;
            if air_time >= AERIAL_MIN_DURATION_S {
                metrics.aerial_count += 1;
                metrics.aerial_time_s += air_time;
            }
        }

        // Powerslide: grounded, fast, yawing hard.
        if let Some((prev_t, prev_yaw)) = previous_yaw {
            let yaw_dt = frame.timestamp_s - prev_t;
            if yaw_dt > 0.0 && player.is_on_ground && speed > SLOW_SPEED_MAX_UU {
                let yaw_rate = (wrap_angle(player.rotation.y - prev_yaw) / yaw_dt).abs();
                if yaw_rate >= POWERSLIDE_MIN_YAW_RATE {
                    powerslides += 1;
                }
            }
        }
        previous_yaw = Some((frame.timestamp_s, player.rotation.y));
    }

    if let Some(since) = airborne_since {
        if let Some(last) = ctx.timeline.last() {
            let air_time = last.timestamp_s - since;
            if air_time >= AERIAL_MIN_DURATION_S {
                metrics.aerial_count += 1;
                metrics.aerial_time_s += air_time;
            }
        }
    }

    if observed_s > 0.0 {
        metrics.avg_speed_kph = weighted_speed / observed_s * KPH_PER_UU_S;
    }
    metrics.max_speed_kph = max_speed * KPH_PER_UU_S;
    metrics.powerslide_count = if entry.rotation_gated {
        None
    } else {
        Some(powerslides)
    };
    metrics
}

pub fn for_team(members: &[&super::PerPlayerMetrics]) -> MovementMetrics {
    let mut total = MovementMetrics::default();
    let mut powerslides: Option<u32> = Some(0);
    for m in members {
        let mv = &m.movement;
        total.avg_speed_kph += mv.avg_speed_kph;
        total.max_speed_kph = total.max_speed_kph.max(mv.max_speed_kph);
        total.distance_km += mv.distance_km;
        total.time_slow_s += mv.time_slow_s;
        total.time_boost_speed_s += mv.time_boost_speed_s;
        total.time_supersonic_s += mv.time_supersonic_s;
        total.time_ground_s += mv.time_ground_s;
        total.time_low_air_s += mv.time_low_air_s;
        total.time_high_air_s += mv.time_high_air_s;
        total.aerial_count += mv.aerial_count;
        total.aerial_time_s += mv.aerial_time_s;
        powerslides = match (powerslides, mv.powerslide_count) {
            (Some(acc), Some(count)) => Some(acc + count),
            _ => None,
        };
    }
    if !members.is_empty() {
        total.avg_speed_kph /= members.len() as f32;
    }
    total.powerslide_count = powerslides;
    total
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
