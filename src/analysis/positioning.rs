//! Positioning: field thirds, ball-relative side, rotation order, and the
//! rotation-compliance flags.

use float_ord::FloatOrd;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::constants::*;
use crate::field::{self, FieldThird};
use crate::frame::PlayerSlot;
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PositioningMetrics {
    pub time_offensive_third_s: f32,
    pub time_middle_third_s: f32,
    pub time_defensive_third_s: f32,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub behind_ball_pct: f32,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub ahead_ball_pct: f32,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub first_man_pct: f32,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub second_man_pct: f32,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub third_man_pct: f32,
    pub avg_distance_to_ball_m: f32,
    /// `null` in a 1v1, where there is no teammate.
    pub avg_distance_to_teammate_m: Option<f32>,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub rotation_compliance: f32,
    pub rotation_flags: Vec<String>,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> PositioningMetrics {
    let mut metrics = PositioningMetrics::default();
    let deltas = ctx.frame_deltas();
    let team = entry.info.team;

    let mut sampled_frames = 0u64;
    let mut behind_frames = 0u64;
    let mut rank_counts = [0u64; 3];
    let mut ball_distance_sum = 0.0f64;
    let mut teammate_distance_sum = 0.0f64;
    let mut teammate_samples = 0u64;

    let mut double_commit_frames = 0u64;
    let mut overcommit_frames = 0u64;
    let mut low_boost_contest_frames = 0u64;

    for (frame, dt) in ctx.timeline.iter().zip(deltas.iter()) {
        let Some(player) = frame.player(entry.slot) else {
            continue;
        };
        sampled_frames += 1;

        match field::third_of(player.position, team) {
            FieldThird::Offensive => metrics.time_offensive_third_s += dt,
            FieldThird::Middle => metrics.time_middle_third_s += dt,
            FieldThird::Defensive => metrics.time_defensive_third_s += dt,
        }

        let behind = field::is_behind_ball(player.position, frame.ball.position, team);
        if behind {
            behind_frames += 1;
        }

        let ball_distance = player.position.distance(frame.ball.position);
        ball_distance_sum += ball_distance as f64;

        // Rank among the player's own team by distance to ball.
        let mut team_distances: Vec<(PlayerSlot, f32)> = frame
            .players
            .iter()
            .filter(|p| p.team == team)
            .map(|p| (p.slot, p.position.distance(frame.ball.position)))
            .collect();
        team_distances.sort_by_key(|(_, d)| FloatOrd(*d));
        if let Some(rank) = team_distances.iter().position(|(s, _)| *s == entry.slot) {
            rank_counts[rank.min(2)] += 1;

            let is_last_man = rank == team_distances.len().saturating_sub(1);
            if is_last_man && !behind {
                overcommit_frames += 1;
            }
            // Two teammates committed on the ball at once.
            if rank == 0
                && team_distances
                    .get(1)
                    .map_or(false, |(_, d)| *d < 800.0 && ball_distance < 800.0)
            {
                double_commit_frames += 1;
            }
            if ball_distance < 800.0 && player.boost_amount < CHALLENGE_LOW_BOOST {
                low_boost_contest_frames += 1;
            }
        }

        let mut nearest_teammate: Option<f32> = None;
        for mate in frame.players.iter() {
            if mate.team == team && mate.slot != entry.slot {
                let d = player.position.distance(mate.position);
                nearest_teammate = Some(nearest_teammate.map_or(d, |n: f32| n.min(d)));
            }
        }
        if let Some(d) = nearest_teammate {
            teammate_distance_sum += d as f64;
            teammate_samples += 1;
        }
    }

    if sampled_frames > 0 {
        let n = sampled_frames as f32;
        metrics.behind_ball_pct = behind_frames as f32 / n * 100.0;
        metrics.ahead_ball_pct = 100.0 - metrics.behind_ball_pct;
        metrics.first_man_pct = rank_counts[0] as f32 / n * 100.0;
        metrics.second_man_pct = rank_counts[1] as f32 / n * 100.0;
        metrics.third_man_pct = rank_counts[2] as f32 / n * 100.0;
        metrics.avg_distance_to_ball_m =
            (ball_distance_sum / sampled_frames as f64) as f32 / UU_PER_METER;
    }
    if teammate_samples > 0 {
        metrics.avg_distance_to_teammate_m =
            Some((teammate_distance_sum / teammate_samples as f64) as f32 / UU_PER_METER);
    }

    let (compliance, flags) = compliance_score(
        sampled_frames,
        double_commit_frames,
        overcommit_frames,
        low_boost_contest_frames,
        metrics.first_man_pct,
        metrics.behind_ball_pct,
    );
    metrics.rotation_compliance = compliance;
    metrics.rotation_flags = flags;
    metrics
}

/// Flags fire on sustained patterns, not single frames; each one costs a
/// fixed slice of the compliance score.
fn compliance_score(
    sampled_frames: u64,
    double_commit_frames: u64,
    overcommit_frames: u64,
    low_boost_contest_frames: u64,
    first_man_pct: f32,
    behind_ball_pct: f32,
) -> (f32, Vec<String>) {
    let mut flags = Vec::new();
    if sampled_frames == 0 {
        return (100.0, flags);
    }
    let n = sampled_frames as f32;
    if double_commit_frames as f32 / n > 0.05 {
        flags.push("double_commit".to_string());
    }
    if overcommit_frames as f32 / n > 0.10 {
        flags.push("last_man_overcommit".to_string());
    }
    if first_man_pct > 60.0 && behind_ball_pct < 45.0 {
        flags.push("ball_chase".to_string());
    }
    if low_boost_contest_frames as f32 / n > 0.05 {
        flags.push("low_boost_contest".to_string());
    }
    let score = (100.0 - 25.0 * flags.len() as f32).max(0.0);
    (score, flags)
}

pub fn for_team(members: &[&super::PerPlayerMetrics]) -> PositioningMetrics {
    let mut total = PositioningMetrics::default();
    let mut teammate_sum = 0.0f32;
    let mut teammate_count = 0u32;
    for m in members {
        let p = &m.positioning;
        total.time_offensive_third_s += p.time_offensive_third_s;
        total.time_middle_third_s += p.time_middle_third_s;
        total.time_defensive_third_s += p.time_defensive_third_s;
        total.behind_ball_pct += p.behind_ball_pct;
        total.ahead_ball_pct += p.ahead_ball_pct;
        total.first_man_pct += p.first_man_pct;
        total.second_man_pct += p.second_man_pct;
        total.third_man_pct += p.third_man_pct;
        total.avg_distance_to_ball_m += p.avg_distance_to_ball_m;
        total.rotation_compliance += p.rotation_compliance;
        if let Some(d) = p.avg_distance_to_teammate_m {
            teammate_sum += d;
            teammate_count += 1;
        }
        for flag in &p.rotation_flags {
            if !total.rotation_flags.contains(flag) {
                total.rotation_flags.push(flag.clone());
            }
        }
    }
    let count = members.len().max(1) as f32;
    total.behind_ball_pct /= count;
    total.ahead_ball_pct /= count;
    total.first_man_pct /= count;
    total.second_man_pct /= count;
    total.third_man_pct /= count;
    total.avg_distance_to_ball_m /= count;
    total.rotation_compliance /= count;
    total.avg_distance_to_teammate_m = if teammate_count > 0 {
        Some(teammate_sum / teammate_count as f32)
    } else {
        None
    };
    total.rotation_flags.sort();
    total
}
