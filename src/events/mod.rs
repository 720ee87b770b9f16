//! Event detection: deterministic functions of the normalized timeline that
//! debounce noisy frame signals into canonical events. Every event carries
//! both a timestamp and a frame index.

pub mod challenges;
pub mod demos;
pub mod goals;
pub mod kickoffs;
pub mod pickups;
pub mod touches;

pub use challenges::*;
pub use demos::*;
pub use goals::*;
pub use kickoffs::*;
pub use pickups::*;
pub use touches::*;

use std::collections::BTreeMap;

use float_ord::FloatOrd;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::adapter::BoostPadEvent;
use crate::frame::{Frame, Vec3};
use crate::normalize::PlayerIndex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GoalEvent {
    pub t: f32,
    pub frame: usize,
    pub scorer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist_id: Option<String>,
    pub team: u8,
    pub shot_speed_kph: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DemoEvent {
    pub t: f32,
    pub frame: usize,
    pub attacker: Option<String>,
    pub victim: String,
    pub location: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KickoffPhase {
    Countdown,
    Active,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KickoffRole {
    Go,
    Cheat,
    Wing,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KickoffOutcome {
    FirstPossessionBlue,
    FirstPossessionOrange,
    GoalForBlue,
    GoalForOrange,
    Neutral,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApproachType {
    Speedflip,
    StandardFrontflip,
    StandardDiagonal,
    StandardWavedash,
    StandardBoost,
    Delay,
    FakeStationary,
    FakeHalfflip,
    FakeAggressive,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KickoffEvent {
    pub t_start: f32,
    pub frame: usize,
    pub t_first_touch: Option<f32>,
    pub phase: KickoffPhase,
    /// Canonical player id -> role.
    pub roles: BTreeMap<String, KickoffRole>,
    pub outcome: KickoffOutcome,
    pub approach_types: BTreeMap<String, ApproachType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PickupEvent {
    pub t: f32,
    pub frame: usize,
    pub player_id: Option<String>,
    pub team: Option<u8>,
    pub pad_id: u8,
    pub is_big: bool,
    pub stolen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TouchOutcome {
    Shot,
    Pass,
    Clear,
    Dribble,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TouchEvent {
    pub t: f32,
    pub frame: usize,
    pub player_id: String,
    pub team: u8,
    pub location: Vec3,
    pub ball_speed_kph: f32,
    pub outcome: TouchOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeResult {
    Win,
    Loss,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChallengeEvent {
    pub t: f32,
    pub frame: usize,
    /// Contesting players; the first entry initiated the contest and the
    /// result/risk fields are from their perspective.
    pub players: Vec<String>,
    pub depth_uu: f32,
    pub risk_index: f32,
    pub result: ChallengeResult,
    pub winning_team: Option<u8>,
}

/// One entry of the merged chronological timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum TimelineItem {
    #[serde(rename = "KICKOFF")]
    Kickoff(KickoffEvent),
    #[serde(rename = "GOAL")]
    Goal(GoalEvent),
    #[serde(rename = "DEMO")]
    Demo(DemoEvent),
    #[serde(rename = "TOUCH")]
    Touch(TouchEvent),
    #[serde(rename = "BOOST")]
    Boost(PickupEvent),
    #[serde(rename = "CHALLENGE")]
    Challenge(ChallengeEvent),
}

impl TimelineItem {
    pub fn timestamp(&self) -> f32 {
        match self {
            TimelineItem::Kickoff(e) => e.t_start,
            TimelineItem::Goal(e) => e.t,
            TimelineItem::Demo(e) => e.t,
            TimelineItem::Touch(e) => e.t,
            TimelineItem::Boost(e) => e.t,
            TimelineItem::Challenge(e) => e.t,
        }
    }

    /// Fixed total order used as the sort tie-break.
    pub fn type_rank(&self) -> u8 {
        match self {
            TimelineItem::Kickoff(_) => 0,
            TimelineItem::Goal(_) => 1,
            TimelineItem::Demo(_) => 2,
            TimelineItem::Touch(_) => 3,
            TimelineItem::Boost(_) => 4,
            TimelineItem::Challenge(_) => 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Events {
    pub timeline: Vec<TimelineItem>,
    pub goals: Vec<GoalEvent>,
    pub demos: Vec<DemoEvent>,
    pub kickoffs: Vec<KickoffEvent>,
    pub boost_pickups: Vec<PickupEvent>,
    pub touches: Vec<TouchEvent>,
    pub challenges: Vec<ChallengeEvent>,
}

/// Run every detector over the normalized timeline and merge the results.
pub fn detect_all(
    timeline: &[Frame],
    pad_events: &[BoostPadEvent],
    index: &PlayerIndex,
) -> Events {
    let touches = touches::detect_touches(timeline, index);
    let goals = goals::detect_goals(timeline, &touches);
    let kickoffs = kickoffs::detect_kickoffs(timeline, &touches, &goals, index);
    let demos = demos::detect_demos(timeline, index);
    let boost_pickups = pickups::detect_pickups(timeline, pad_events, index);
    let challenges = challenges::detect_challenges(timeline, &touches, index);

    let timeline_items = merge_timeline(
        &kickoffs,
        &goals,
        &demos,
        &touches,
        &boost_pickups,
        &challenges,
    );

    Events {
        timeline: timeline_items,
        goals,
        demos,
        kickoffs,
        boost_pickups,
        touches,
        challenges,
    }
}

/// Stable merge of the per-type lists, sorted by `(timestamp, type_rank)`.
/// Stability preserves emission order for identical keys.
pub fn merge_timeline(
    kickoffs: &[KickoffEvent],
    goals: &[GoalEvent],
    demos: &[DemoEvent],
    touches: &[TouchEvent],
    pickups: &[PickupEvent],
    challenges: &[ChallengeEvent],
) -> Vec<TimelineItem> {
    let mut items: Vec<TimelineItem> = Vec::with_capacity(
        kickoffs.len() + goals.len() + demos.len() + touches.len() + pickups.len()
            + challenges.len(),
    );
    items.extend(kickoffs.iter().cloned().map(TimelineItem::Kickoff));
    items.extend(goals.iter().cloned().map(TimelineItem::Goal));
    items.extend(demos.iter().cloned().map(TimelineItem::Demo));
    items.extend(touches.iter().cloned().map(TimelineItem::Touch));
    items.extend(pickups.iter().cloned().map(TimelineItem::Boost));
    items.extend(challenges.iter().cloned().map(TimelineItem::Challenge));
    items.sort_by_key(|item| (FloatOrd(item.timestamp()), item.type_rank()));
    items
}
