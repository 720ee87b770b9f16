//! Challenge aggregates from the contest events.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AnalysisContext;
use crate::constants::UU_PER_METER;
use crate::normalize::PlayerIndexEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ChallengeMetrics {
    pub contests: u32,
    pub wins: u32,
    pub losses: u32,
    pub neutral: u32,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub first_to_ball_pct: f32,
    pub challenge_depth_m: f32,
    #[schemars(range(min = 0.0, max = 1.0))]
    pub risk_index_avg: f32,
}

pub fn for_player(ctx: &AnalysisContext, entry: &PlayerIndexEntry) -> ChallengeMetrics {
    let id = entry.info.canonical_id.as_str();
    let team = entry.info.team;
    let mut metrics = ChallengeMetrics::default();
    let mut first_count = 0u32;
    let mut depth_sum = 0.0f32;
    let mut risk_sum = 0.0f32;
    let mut risk_count = 0u32;

    for challenge in ctx
        .events
        .challenges
        .iter()
        .filter(|c| c.players.iter().any(|p| p == id))
    {
        metrics.contests += 1;
        let initiated = challenge.players.first().map(|p| p.as_str()) == Some(id);
        if initiated {
            first_count += 1;
            risk_sum += challenge.risk_index;
            risk_count += 1;
        }
        match challenge.winning_team {
            Some(winner) if winner == team => metrics.wins += 1,
            Some(_) => metrics.losses += 1,
            None => metrics.neutral += 1,
        }
        // Depth is recorded along the initiator's attack axis; flip it for
        // the defending side of the pair.
        let depth = if initiated {
            challenge.depth_uu
        } else {
            -challenge.depth_uu
        };
        depth_sum += depth;
    }

    if metrics.contests > 0 {
        metrics.first_to_ball_pct = first_count as f32 / metrics.contests as f32 * 100.0;
        metrics.challenge_depth_m = depth_sum / metrics.contests as f32 / UU_PER_METER;
    }
    if risk_count > 0 {
        metrics.risk_index_avg = risk_sum / risk_count as f32;
    }
    metrics
}

pub fn for_team(members: &[&super::PerPlayerMetrics]) -> ChallengeMetrics {
    let mut total = ChallengeMetrics::default();
    let mut depth_weighted = 0.0f32;
    let mut risk_weighted = 0.0f32;
    let mut first_weighted = 0.0f32;
    for m in members {
        let c = &m.challenges;
        total.contests += c.contests;
        total.wins += c.wins;
        total.losses += c.losses;
        total.neutral += c.neutral;
        depth_weighted += c.challenge_depth_m * c.contests as f32;
        risk_weighted += c.risk_index_avg * c.contests as f32;
        first_weighted += c.first_to_ball_pct * c.contests as f32;
    }
    if total.contests > 0 {
        total.challenge_depth_m = depth_weighted / total.contests as f32;
        total.risk_index_avg = risk_weighted / total.contests as f32;
        total.first_to_ball_pct = first_weighted / total.contests as f32;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ChallengeEvent, ChallengeResult, Events};
    use crate::frame::Frame;
    use crate::normalize::PlayerIndex;

    #[test]
    fn wins_follow_winning_team() {
        let mut events = Events::default();
        events.challenges.push(ChallengeEvent {
            t: 10.0,
            frame: 300,
            players: vec!["steam:1".into(), "steam:2".into()],
            depth_uu: 500.0,
            risk_index: 0.5,
            result: ChallengeResult::Win,
            winning_team: Some(0),
        });

        let header = crate::Header {
            players: vec![
                crate::header::PlayerInfo::from_name_and_platform(
                    "Alpha".into(),
                    0,
                    Default::default(),
                ),
            ],
            ..Default::default()
        };
        let roster = vec![crate::adapter::SlotMeta {
            display_name: Some("Alpha".into()),
            platform_id: Some("steam:1".into()),
            team: Some(0),
            ..Default::default()
        }];
        let index: PlayerIndex = crate::normalize::normalize_players(&header, &roster);
        let timeline: Vec<Frame> = vec![];
        let ctx = AnalysisContext {
            timeline: &timeline,
            events: &events,
            index: &index,
            duration_s: 300.0,
        };

        let entry = index.players().first().unwrap();
        let metrics = for_player(&ctx, entry);
        assert_eq!(metrics.contests, 1);
        assert_eq!(metrics.wins, 1);
        assert_eq!(metrics.first_to_ball_pct, 100.0);
        assert!((metrics.challenge_depth_m - 5.0).abs() < 1e-5);
    }
}
