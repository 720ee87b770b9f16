//! Boost economy. Collection comes from the pickup events, consumption from
//! the frame-to-frame boost readings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::constants::*;
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BoostMetrics {
    /// Boost collected per minute.
    pub bcpm: f32,
    /// Boost spent per minute.
    pub bpm: f32,
    /// Time-weighted mean boost. Team value is the sum of its players'
    /// means, preserving the convention external tools use.
    pub avg_boost: f32,
    pub time_zero_boost_s: f32,
    pub time_hundred_boost_s: f32,
    pub amount_collected: f32,
    pub amount_stolen: f32,
    pub big_pads: u32,
    pub small_pads: u32,
    /// Collected amount that exceeded the 100 cap.
    pub overfill: f32,
    /// Boost spent while supersonic.
    pub waste: f32,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> BoostMetrics {
    let id = entry.info.canonical_id.as_str();
    let mut metrics = BoostMetrics::default();

    for pickup in ctx
        .events
        .boost_pickups
        .iter()
        .filter(|p| p.player_id.as_deref() == Some(id))
    {
        let amount = if pickup.is_big {
            BIG_PAD_AMOUNT
        } else {
            SMALL_PAD_AMOUNT
        };
        metrics.amount_collected += amount;
        if pickup.stolen {
            metrics.amount_stolen += amount;
        }
        if pickup.is_big {
            metrics.big_pads += 1;
        } else {
            metrics.small_pads += 1;
        }
        // Overfill needs the boost level going into the pickup. Pad events
        // carry raw stream indices, so look the frame up by timestamp.
        if let Some(frame) = frame_at_or_before(ctx.timeline, pickup.t) {
            if let Some(player) = frame.player(entry.slot) {
                let headroom = 100.0 - player.boost_amount.min(100.0);
                metrics.overfill += (amount - headroom).max(0.0);
            }
        }
    }

    let deltas = ctx.frame_deltas();
    let mut weighted_boost = 0.0;
    let mut observed_s = 0.0;
    let mut previous: Option<f32> = None;
    for (frame, dt) in ctx.timeline.iter().zip(deltas.iter()) {
        let Some(player) = frame.player(entry.slot) else {
            previous = None;
            continue;
        };
        weighted_boost += player.boost_amount * dt;
        observed_s += dt;
        if player.boost_amount <= 0.5 {
            metrics.time_zero_boost_s += dt;
        }
        if player.boost_amount >= 99.5 {
            metrics.time_hundred_boost_s += dt;
        }
        if let Some(previous) = previous {
            let spent = (previous - player.boost_amount).max(0.0);
            metrics.bpm += spent;
            if player.is_supersonic {
                metrics.waste += spent;
            }
        }
        previous = Some(player.boost_amount);
    }

    if observed_s > 0.0 {
        metrics.avg_boost = weighted_boost / observed_s;
    }
    let minutes = ctx.duration_s / 60.0;
    if minutes > 0.0 {
        metrics.bcpm = metrics.amount_collected / minutes;
        metrics.bpm /= minutes;
    } else {
        metrics.bpm = 0.0;
    }
    metrics
}

fn frame_at_or_before(timeline: &[crate::frame::Frame], t: f32) -> Option<&crate::frame::Frame> {
    match timeline.partition_point(|f| f.timestamp_s <= t) {
        0 => None,
        n => Some(&timeline[n - 1]),
    }
}

pub fn for_team(members: &[&super::PerPlayerMetrics]) -> BoostMetrics {
    let mut total = BoostMetrics::default();
    for m in members {
        let b = &m.boost;
        total.bcpm += b.bcpm;
        total.bpm += b.bpm;
        // Deliberately a sum, not a mean.
        total.avg_boost += b.avg_boost;
        total.time_zero_boost_s += b.time_zero_boost_s;
        total.time_hundred_boost_s += b.time_hundred_boost_s;
        total.amount_collected += b.amount_collected;
        total.amount_stolen += b.amount_stolen;
        total.big_pads += b.big_pads;
        total.small_pads += b.small_pads;
        total.overfill += b.overfill;
        total.waste += b.waste;
    }
    total
}
