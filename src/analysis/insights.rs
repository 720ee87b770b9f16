//! Coaching insights: thresholded comparisons over the computed metrics.
//! The taxonomy is declared in one place (`RULES`) so consumers can rely on
//! a closed code set.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AnalysisContext, PerPlayerMetrics, PerTeam};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Info,
    Warn,
    Critical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsightEvidence {
    pub players: Vec<String>,
    pub timestamps: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Insight {
    pub severity: InsightSeverity,
    pub code: String,
    pub message: String,
    pub evidence: InsightEvidence,
}

/// One rule of the taxonomy: inspects a player's metrics and may produce an
/// insight.
type PlayerRule = fn(&str, &PerPlayerMetrics) -> Option<Insight>;

/// The closed rule set. Extending the taxonomy means adding a row here.
static RULES: &[PlayerRule] = &[
    rule_low_boost_discipline,
    rule_boost_waste,
    rule_ball_chasing,
    rule_overcommitting,
    rule_double_commits,
    rule_slow_play,
    rule_kickoff_losses,
    rule_turnover_heavy,
    rule_no_small_pads,
];

pub fn derive(
    _ctx: &AnalysisContext,
    per_player: &BTreeMap<String, PerPlayerMetrics>,
    _per_team: &PerTeam,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    for (id, metrics) in per_player {
        for rule in RULES {
            if let Some(insight) = rule(id, metrics) {
                insights.push(insight);
            }
        }
    }
    insights
}

fn insight(
    severity: InsightSeverity,
    code: &str,
    message: String,
    player: &str,
) -> Option<Insight> {
    Some(Insight {
        severity,
        code: code.to_string(),
        message,
        evidence: InsightEvidence {
            players: vec![player.to_string()],
            timestamps: Vec::new(),
        },
    })
}

fn rule_low_boost_discipline(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.boost.time_zero_boost_s > 60.0 {
        insight(
            InsightSeverity::Warn,
            "low_boost_discipline",
            format!(
                "{:.0}s spent at zero boost; pick up small pads on rotation",
                m.boost.time_zero_boost_s
            ),
            id,
        )
    } else {
        None
    }
}

fn rule_boost_waste(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.boost.waste > 150.0 {
        insight(
            InsightSeverity::Info,
            "boost_waste_supersonic",
            format!(
                "{:.0} boost spent while already supersonic",
                m.boost.waste
            ),
            id,
        )
    } else {
        None
    }
}

fn rule_ball_chasing(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.positioning.rotation_flags.iter().any(|f| f == "ball_chase") {
        insight(
            InsightSeverity::Warn,
            "ball_chasing",
            format!(
                "first man {:.0}% of the time with only {:.0}% behind ball",
                m.positioning.first_man_pct, m.positioning.behind_ball_pct
            ),
            id,
        )
    } else {
        None
    }
}

fn rule_overcommitting(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.positioning
        .rotation_flags
        .iter()
        .any(|f| f == "last_man_overcommit")
    {
        insight(
            InsightSeverity::Critical,
            "last_man_overcommit",
            "frequently ahead of the ball as last man back".to_string(),
            id,
        )
    } else {
        None
    }
}

fn rule_double_commits(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.positioning
        .rotation_flags
        .iter()
        .any(|f| f == "double_commit")
    {
        insight(
            InsightSeverity::Warn,
            "double_commit",
            "often challenging the same ball as a teammate".to_string(),
            id,
        )
    } else {
        None
    }
}

fn rule_slow_play(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.movement.avg_speed_kph > 0.0 && m.movement.avg_speed_kph < 40.0 {
        insight(
            InsightSeverity::Info,
            "low_average_speed",
            format!("average speed {:.0} km/h is low", m.movement.avg_speed_kph),
            id,
        )
    } else {
        None
    }
}

fn rule_kickoff_losses(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    let k = &m.kickoffs;
    if k.count >= 4 && (k.first_possession as f32) < k.count as f32 * 0.3 {
        insight(
            InsightSeverity::Warn,
            "kickoff_first_possession_low",
            format!(
                "first possession on only {}/{} kickoffs",
                k.first_possession, k.count
            ),
            id,
        )
    } else {
        None
    }
}

fn rule_turnover_heavy(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.passing.turnovers >= 8 && m.passing.turnovers > m.passing.passes_completed * 2 {
        insight(
            InsightSeverity::Warn,
            "turnover_heavy",
            format!("{} turnovers against {} completed passes", m.passing.turnovers, m.passing.passes_completed),
            id,
        )
    } else {
        None
    }
}

fn rule_no_small_pads(id: &str, m: &PerPlayerMetrics) -> Option<Insight> {
    if m.boost.big_pads >= 5 && m.boost.small_pads == 0 {
        insight(
            InsightSeverity::Info,
            "big_pad_reliance",
            "collected big pads only; small pads keep rotations fueled".to_string(),
            id,
        )
    } else {
        None
    }
}
