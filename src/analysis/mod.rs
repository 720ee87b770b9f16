//! Analyzers: pure functions from the normalized timeline, the detected
//! events, and the identity index to the report's metric blocks. Each block
//! lives in its own module; metrics that cannot be computed from the
//! available data are `null`, never guessed.

pub mod boost;
pub mod challenges;
pub mod fundamentals;
pub mod heatmaps;
pub mod insights;
pub mod kickoffs;
pub mod mechanics;
pub mod movement;
pub mod passing;
pub mod positioning;

pub use boost::BoostMetrics;
pub use challenges::ChallengeMetrics;
pub use fundamentals::Fundamentals;
pub use heatmaps::Heatmaps;
pub use insights::{Insight, InsightEvidence, InsightSeverity};
pub use kickoffs::KickoffMetrics;
pub use mechanics::MechanicsMetrics;
pub use movement::MovementMetrics;
pub use passing::PassingMetrics;
pub use positioning::PositioningMetrics;

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::events::Events;
use crate::frame::Frame;
use crate::normalize::PlayerIndex;

/// Shared read-only input to every analyzer.
pub struct AnalysisContext<'a> {
    pub timeline: &'a [Frame],
    pub events: &'a Events,
    pub index: &'a PlayerIndex,
    pub duration_s: f32,
}

impl<'a> AnalysisContext<'a> {
    /// Time attributed to each frame: the delta to its successor.
    pub fn frame_deltas(&self) -> Vec<f32> {
        let mut deltas: Vec<f32> = self
            .timeline
            .windows(2)
            .map(|w| (w[1].timestamp_s - w[0].timestamp_s).max(0.0))
            .collect();
        if !self.timeline.is_empty() {
            deltas.push(0.0);
        }
        deltas
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerPlayerMetrics {
    pub fundamentals: Fundamentals,
    pub boost: BoostMetrics,
    pub movement: MovementMetrics,
    pub positioning: PositioningMetrics,
    pub passing: PassingMetrics,
    pub challenges: ChallengeMetrics,
    pub kickoffs: KickoffMetrics,
    pub mechanics: MechanicsMetrics,
    pub heatmaps: Heatmaps,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerTeamMetrics {
    pub fundamentals: Fundamentals,
    pub boost: BoostMetrics,
    pub movement: MovementMetrics,
    pub positioning: PositioningMetrics,
    pub passing: PassingMetrics,
    pub challenges: ChallengeMetrics,
    pub kickoffs: KickoffMetrics,
    pub mechanics: MechanicsMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerTeam {
    pub blue: PerTeamMetrics,
    pub orange: PerTeamMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Analysis {
    /// Keyed by canonical player id.
    pub per_player: BTreeMap<String, PerPlayerMetrics>,
    pub per_team: PerTeam,
    pub coaching_insights: Vec<Insight>,
}

/// Run every analyzer and aggregate team blocks.
pub fn analyze(ctx: &AnalysisContext) -> Analysis {
    let mut per_player = BTreeMap::new();

    for entry in ctx.index.players() {
        let id = entry.info.canonical_id.clone();
        let metrics = PerPlayerMetrics {
            fundamentals: fundamentals::for_player(ctx, entry),
            boost: boost::for_player(ctx, entry),
            movement: movement::for_player(ctx, entry),
            positioning: positioning::for_player(ctx, entry),
            passing: passing::for_player(ctx, entry),
            challenges: challenges::for_player(ctx, entry),
            kickoffs: kickoffs::for_player(ctx, entry),
            mechanics: mechanics::for_player(ctx, entry),
            heatmaps: heatmaps::for_player(ctx, entry),
        };
        per_player.insert(id, metrics);
    }

    let per_team = PerTeam {
        blue: team_metrics(ctx, 0, &per_player),
        orange: team_metrics(ctx, 1, &per_player),
    };

    let coaching_insights = insights::derive(ctx, &per_player, &per_team);

    Analysis {
        per_player,
        per_team,
        coaching_insights,
    }
}

fn team_metrics(
    ctx: &AnalysisContext,
    team: u8,
    per_player: &BTreeMap<String, PerPlayerMetrics>,
) -> PerTeamMetrics {
    let members: Vec<&PerPlayerMetrics> = ctx
        .index
        .players()
        .iter()
        .filter(|e| e.info.team == team)
        .filter_map(|e| per_player.get(&e.info.canonical_id))
        .collect();

    PerTeamMetrics {
        fundamentals: fundamentals::for_team(&members),
        boost: boost::for_team(&members),
        movement: movement::for_team(&members),
        positioning: positioning::for_team(&members),
        passing: passing::for_team(ctx, team, &members),
        challenges: challenges::for_team(&members),
        kickoffs: kickoffs::for_team(ctx, team, &members),
        mechanics: mechanics::for_team(&members),
    }
}
