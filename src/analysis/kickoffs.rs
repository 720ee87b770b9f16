//! Kickoff aggregates: participation, outcomes, time to first touch, and
//! the approach-type histogram.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::events::{ApproachType, KickoffOutcome};
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct KickoffMetrics {
    pub count: u32,
    pub first_possession: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub avg_time_to_first_touch_s: Option<f32>,
    pub approach_types: BTreeMap<ApproachType, u32>,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> KickoffMetrics {
    let id = entry.info.canonical_id.as_str();
    let team = entry.info.team;
    let mut metrics = KickoffMetrics::default();
    let mut touch_time_sum = 0.0f32;
    let mut touch_time_count = 0u32;

    for kickoff in ctx
        .events
        .kickoffs
        .iter()
        .filter(|k| k.approach_types.contains_key(id) || k.roles.contains_key(id))
    {
        metrics.count += 1;
        accumulate_outcome(&mut metrics, kickoff.outcome, team);

        if let Some(approach) = kickoff.approach_types.get(id) {
            *metrics.approach_types.entry(*approach).or_insert(0) += 1;
        }

        if let Some(t_touch) = kickoff.t_first_touch {
            touch_time_sum += t_touch - kickoff.t_start;
            touch_time_count += 1;
        }
    }

    if touch_time_count > 0 {
        metrics.avg_time_to_first_touch_s = Some(touch_time_sum / touch_time_count as f32);
    }
    metrics
}

pub fn for_team(
    ctx: &AnalysisContext,
    team: u8,
    members: &[&super::PerPlayerMetrics],
) -> KickoffMetrics {
    let mut total = KickoffMetrics::default();
    // Team counts come from the events themselves; summing per-player
    // blocks would multiply every kickoff by the roster size.
    let mut touch_time_sum = 0.0f32;
    let mut touch_time_count = 0u32;
    for kickoff in ctx.events.kickoffs.iter() {
        total.count += 1;
        accumulate_outcome(&mut total, kickoff.outcome, team);
        if let Some(t_touch) = kickoff.t_first_touch {
            touch_time_sum += t_touch - kickoff.t_start;
            touch_time_count += 1;
        }
    }
    if touch_time_count > 0 {
        total.avg_time_to_first_touch_s = Some(touch_time_sum / touch_time_count as f32);
    }
    for m in members {
        for (approach, count) in &m.kickoffs.approach_types {
            *total.approach_types.entry(*approach).or_insert(0) += count;
        }
    }
    total
}

fn accumulate_outcome(metrics: &mut KickoffMetrics, outcome: KickoffOutcome, team: u8) {
    match outcome {
        KickoffOutcome::FirstPossessionBlue if team == 0 => metrics.first_possession += 1,
        KickoffOutcome::FirstPossessionOrange if team == 1 => metrics.first_possession += 1,
        KickoffOutcome::GoalForBlue => {
            if team == 0 {
                metrics.goals_for += 1;
                metrics.first_possession += 1;
            } else {
                metrics.goals_against += 1;
            }
        }
        KickoffOutcome::GoalForOrange => {
            if team == 1 {
                metrics.goals_for += 1;
                metrics.first_possession += 1;
            } else {
                metrics.goals_against += 1;
            }
        }
        _ => {}
    }
}
