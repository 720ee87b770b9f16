//! Possession and passing. Possession follows the last touch with a short
//! TTL, cancelled early when the ball is screaming back toward the touching
//! team's own half. Pass completion requires forward progress along the
//! attack axis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::constants::*;
use crate::field;
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PassingMetrics {
    pub possession_time_s: f32,
    pub passes_attempted: u32,
    pub passes_completed: u32,
    pub passes_received: u32,
    pub turnovers: u32,
    pub give_and_go_count: u32,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> PassingMetrics {
    let id = entry.info.canonical_id.as_str();
    let mut metrics = PassingMetrics::default();
    let touches = &ctx.events.touches;

    metrics.possession_time_s = possession_time(ctx, |touch| touch.player_id == id);

    for (i, touch) in touches.iter().enumerate() {
        if touch.player_id != id {
            continue;
        }
        let next = touches.get(i + 1);

        if touch.outcome == crate::events::TouchOutcome::Pass {
            metrics.passes_attempted += 1;
            if let Some(next) = next {
                let completed = next.team == touch.team
                    && next.player_id != touch.player_id
                    && forward_progress(touch, next) >= PASS_MIN_FORWARD_PROGRESS_UU;
                if completed {
                    metrics.passes_completed += 1;
                }
            }
        }

        // Turnover: the opponent gets the next touch off this player's.
        if let Some(next) = next {
            if next.team != touch.team {
                metrics.turnovers += 1;
            }
        }

        // Give-and-go: this player's touch, a completed teammate touch, and
        // the return all inside the window.
        if let (Some(second), Some(third)) = (touches.get(i + 1), touches.get(i + 2)) {
            if second.team == touch.team
                && second.player_id != id
                && third.player_id == id
                && third.t - touch.t <= GIVE_AND_GO_WINDOW_S
                && forward_progress(touch, third) >= PASS_MIN_FORWARD_PROGRESS_UU
            {
                metrics.give_and_go_count += 1;
            }
        }
    }

    // Passes received: a completed pass whose receiver is this player.
    for window in touches.windows(2) {
        let (from, to) = (&window[0], &window[1]);
        if from.outcome == crate::events::TouchOutcome::Pass
            && from.team == to.team
            && from.player_id != to.player_id
            && to.player_id == id
            && forward_progress(from, to) >= PASS_MIN_FORWARD_PROGRESS_UU
        {
            metrics.passes_received += 1;
        }
    }

    metrics
}

pub fn for_team(
    ctx: &AnalysisContext,
    team: u8,
    members: &[&super::PerPlayerMetrics],
) -> PassingMetrics {
    let mut total = PassingMetrics::default();
    for m in members {
        let p = &m.passing;
        total.passes_attempted += p.passes_attempted;
        total.passes_completed += p.passes_completed;
        total.passes_received += p.passes_received;
        total.turnovers += p.turnovers;
        total.give_and_go_count += p.give_and_go_count;
    }
    // Team possession is measured over team touches as a whole, not the sum
    // of player slices, so overlapping chains are not double counted.
    total.possession_time_s = possession_time(ctx, |touch| touch.team == team);
    total
}

/// Time the selected side is considered in control: within the touch TTL of
/// one of its touches, unless the ball is moving hard toward its own half.
fn possession_time(
    ctx: &AnalysisContext,
    is_ours: impl Fn(&crate::events::TouchEvent) -> bool,
) -> f32 {
    let deltas = ctx.frame_deltas();
    let touches = &ctx.events.touches;
    let mut possession = 0.0;
    let mut cursor = 0usize;
    let mut last_touch: Option<&crate::events::TouchEvent> = None;

    for (frame, dt) in ctx.timeline.iter().zip(deltas.iter()) {
        while cursor < touches.len() && touches[cursor].t <= frame.timestamp_s {
            last_touch = Some(&touches[cursor]);
            cursor += 1;
        }
        let Some(touch) = last_touch else {
            continue;
        };
        if !is_ours(touch) {
            continue;
        }
        if frame.timestamp_s - touch.t > POSSESSION_TOUCH_TTL_S {
            continue;
        }
        // Control is forfeited while the ball races back toward the
        // touching team's half.
        let retreat = -field::attack_axis_projection(
            crate::frame::Vec3::new(frame.ball.velocity.x, frame.ball.velocity.y, 0.0),
            touch.team,
        );
        if retreat > POSSESSION_FAST_RETREAT_UU {
            continue;
        }
        possession += dt;
    }
    possession
}

fn forward_progress(
    from: &crate::events::TouchEvent,
    to: &crate::events::TouchEvent,
) -> f32 {
    field::attack_axis_projection(to.location, from.team)
        - field::attack_axis_projection(from.location, from.team)
}
