//! Scoreboard fundamentals. Header stats are authoritative when present;
//! detected events fill the gaps (and are the only source for demos).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Fundamentals {
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub saves: u32,
    pub demos_inflicted: u32,
    pub demos_taken: u32,
    pub score: u32,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub shooting_pct: f32,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> Fundamentals {
    let id = entry.info.canonical_id.as_str();

    let event_goals = ctx
        .events
        .goals
        .iter()
        .filter(|g| g.scorer_id.as_deref() == Some(id) && g.team == entry.info.team)
        .count() as u32;
    let event_assists = ctx
        .events
        .goals
        .iter()
        .filter(|g| g.assist_id.as_deref() == Some(id))
        .count() as u32;
    let event_shots = ctx
        .events
        .touches
        .iter()
        .filter(|t| {
            t.player_id == id && matches!(t.outcome, crate::events::TouchOutcome::Shot)
        })
        .count() as u32;

    let header = entry.info.stats;
    let goals = header.map(|s| s.goals).unwrap_or(event_goals);
    let shots = header.map(|s| s.shots).unwrap_or(event_shots).max(goals);

    Fundamentals {
        goals,
        assists: header.map(|s| s.assists).unwrap_or(event_assists),
        shots,
        saves: header.map(|s| s.saves).unwrap_or(0),
        demos_inflicted: ctx
            .events
            .demos
            .iter()
            .filter(|d| d.attacker.as_deref() == Some(id))
            .count() as u32,
        demos_taken: ctx.events.demos.iter().filter(|d| d.victim == id).count() as u32,
        score: header.map(|s| s.score).unwrap_or(0),
        shooting_pct: shooting_pct(goals, shots),
    }
}

pub fn for_team(members: &[&super::PerPlayerMetrics]) -> Fundamentals {
    let mut total = Fundamentals::default();
    for m in members {
        total.goals += m.fundamentals.goals;
        total.assists += m.fundamentals.assists;
        total.shots += m.fundamentals.shots;
        total.saves += m.fundamentals.saves;
        total.demos_inflicted += m.fundamentals.demos_inflicted;
        total.demos_taken += m.fundamentals.demos_taken;
        total.score += m.fundamentals.score;
    }
    total.shooting_pct = shooting_pct(total.goals, total.shots);
    total
}

fn shooting_pct(goals: u32, shots: u32) -> f32 {
    goals as f32 / shots.max(1) as f32 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shooting_pct_guards_division() {
        assert_eq!(shooting_pct(0, 0), 0.0);
        assert_eq!(shooting_pct(2, 4), 50.0);
        assert_eq!(shooting_pct(1, 0), 100.0);
    }
}
