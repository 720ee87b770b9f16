//! Kickoff detection and per-player approach classification. A kickoff runs
//! countdown -> active -> complete; roles come from spawn geometry and the
//! approach tree orders FAKE, DELAY, SPEEDFLIP, then the standard variants.

use std::collections::BTreeMap;

use float_ord::FloatOrd;

use crate::constants::*;
use crate::frame::{Frame, PlayerSlot, Vec3};
use crate::normalize::PlayerIndex;

use super::{ApproachType, GoalEvent, KickoffEvent, KickoffOutcome, KickoffPhase, KickoffRole, TouchEvent};

pub fn detect_kickoffs(
    timeline: &[Frame],
    touches: &[TouchEvent],
    goals: &[GoalEvent],
    index: &PlayerIndex,
) -> Vec<KickoffEvent> {
    let mut kickoffs = Vec::new();
    let mut state = State::Idle;

    for (frame_index, frame) in timeline.iter().enumerate() {
        state = match state {
            State::Idle => {
                if is_kickoff_pose(frame) {
                    State::Countdown(Tracking::start(frame, frame_index))
                } else {
                    State::Idle
                }
            }
            State::Countdown(mut tracking) => {
                let moved = frame.players.iter().any(|p| {
                    tracking
                        .spawn_of(p.slot)
                        .map_or(false, |spawn| p.position.distance(spawn) >= KICKOFF_SPAWN_MOVE_UU)
                });
                if moved && tracking.t_go.is_none() {
                    tracking.t_go = Some(frame.timestamp_s);
                }
                // The active phase is checked in the same frame the
                // countdown ends so a touch at the transition instant is
                // not missed.
                match tracking.t_go {
                    Some(t_go) => {
                        if let Some(touch) =
                            first_touch_in_window(touches, t_go, frame.timestamp_s)
                        {
                            kickoffs
                                .push(tracking.finish(Some(touch), goals, index, timeline));
                            State::Idle
                        } else if frame.timestamp_s - t_go > KICKOFF_ACTIVE_TIMEOUT_S {
                            kickoffs.push(tracking.finish(None, goals, index, timeline));
                            State::Idle
                        } else {
                            State::Countdown(tracking)
                        }
                    }
                    None => State::Countdown(tracking),
                }
            }
        };
    }

    // A replay ending mid-kickoff still reports the partial event.
    if let State::Countdown(tracking) = state {
        let phase = if tracking.t_go.is_some() {
            KickoffPhase::Active
        } else {
            KickoffPhase::Countdown
        };
        let mut done = tracking.finish(None, goals, index, timeline);
        done.phase = phase;
        kickoffs.push(done);
    }

    kickoffs
}

fn is_kickoff_pose(frame: &Frame) -> bool {
    if frame.players.is_empty() {
        return false;
    }
    let centered = frame.ball.position.distance_2d(Vec3::ZERO) <= KICKOFF_BALL_CENTER_UU
        && frame.ball.velocity.length() <= KICKOFF_STATIONARY_SPEED_UU;
    centered
        && frame
            .players
            .iter()
            .all(|p| p.speed() <= KICKOFF_STATIONARY_SPEED_UU)
}

/// First touch inside the active window up to the frame being processed;
/// the detector never reads into the future.
fn first_touch_in_window(touches: &[TouchEvent], t_go: f32, now: f32) -> Option<&TouchEvent> {
    touches.iter().find(|touch| touch.t >= t_go && touch.t <= now)
}

enum State {
    Idle,
    Countdown(Tracking),
}

/// Accumulated per-kickoff observations between the start pose and the end
/// of the active phase.
struct Tracking {
    t_start: f32,
    start_frame: usize,
    t_go: Option<f32>,
    spawns: Vec<(PlayerSlot, Vec3)>,
}

impl Tracking {
    fn start(frame: &Frame, frame_index: usize) -> Self {
        Self {
            t_start: frame.timestamp_s,
            start_frame: frame_index,
            t_go: None,
            spawns: frame.players.iter().map(|p| (p.slot, p.position)).collect(),
        }
    }

    fn spawn_of(&self, slot: PlayerSlot) -> Option<Vec3> {
        self.spawns
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, p)| *p)
    }

    fn finish(
        &self,
        first_touch: Option<&TouchEvent>,
        goals: &[GoalEvent],
        index: &PlayerIndex,
        timeline: &[Frame],
    ) -> KickoffEvent {
        let t_first_touch = first_touch.map(|t| t.t);
        let t_end = t_first_touch.unwrap_or(
            self.t_go
                .map(|g| g + KICKOFF_ACTIVE_TIMEOUT_S)
                .unwrap_or(self.t_start),
        );

        let roles = assign_roles(&self.spawns, index);
        let outcome = resolve_outcome(first_touch, goals);

        let mut approach_types = BTreeMap::new();
        for (slot, spawn) in self.spawns.iter() {
            let Some(entry) = index.entry(*slot) else {
                continue;
            };
            let track = PlayerTrack::collect(timeline, *slot, *spawn, self.t_start, t_end);
            let own_touch = first_touch.filter(|t| t.player_id == entry.info.canonical_id);
            let approach = classify_approach(&track, own_touch, entry.rotation_gated);
            approach_types.insert(entry.info.canonical_id.clone(), approach);
        }

        KickoffEvent {
            t_start: self.t_start,
            frame: self.start_frame,
            t_first_touch,
            phase: KickoffPhase::Complete,
            roles,
            outcome,
            approach_types,
        }
    }
}

/// Roles per team from spawn geometry: closest to the ball is GO, the next
/// on the same half CHEAT, the rest split WING/BACK by lateral offset.
fn assign_roles(
    spawns: &[(PlayerSlot, Vec3)],
    index: &PlayerIndex,
) -> BTreeMap<String, KickoffRole> {
    let mut roles = BTreeMap::new();
    for team in [0u8, 1u8] {
        let mut team_spawns: Vec<(&PlayerSlot, &Vec3)> = spawns
            .iter()
            .filter(|(slot, _)| index.team_of(*slot) == Some(team))
            .map(|(slot, position)| (slot, position))
            .collect();
        team_spawns.sort_by_key(|(_, position)| FloatOrd(position.distance_2d(Vec3::ZERO)));

        for (rank, (slot, position)) in team_spawns.iter().enumerate() {
            let Some(id) = index.canonical_id(**slot) else {
                continue;
            };
            let role = match rank {
                0 => KickoffRole::Go,
                1 => KickoffRole::Cheat,
                _ => {
                    if position.x.abs() >= 1000.0 {
                        KickoffRole::Wing
                    } else {
                        KickoffRole::Back
                    }
                }
            };
            roles.insert(id.to_string(), role);
        }
    }
    roles
}

fn resolve_outcome(first_touch: Option<&TouchEvent>, goals: &[GoalEvent]) -> KickoffOutcome {
    let Some(touch) = first_touch else {
        return KickoffOutcome::Neutral;
    };
    let quick_goal = goals
        .iter()
        .find(|g| g.t >= touch.t && g.t - touch.t <= KICKOFF_GOAL_WINDOW_S);
    match quick_goal {
        Some(goal) if goal.team == 0 => KickoffOutcome::GoalForBlue,
        Some(_) => KickoffOutcome::GoalForOrange,
        None if touch.team == 0 => KickoffOutcome::FirstPossessionBlue,
        None => KickoffOutcome::FirstPossessionOrange,
    }
}

/// Kinematic summary of one player's kickoff run.
struct PlayerTrack {
    displacement: f32,
    boost_used: f32,
    peak_speed: f32,
    initial_ball_distance: f32,
    final_ball_distance: f32,
    min_ball_distance: f32,
    /// (t, speed) samples, for the deceleration window.
    speeds: Vec<(f32, f32)>,
    /// Dodge-like impulses: (t, lateral ratio of the new velocity).
    impulses: Vec<(f32, f32)>,
    /// Max |pitch| seen within the cancel window after each impulse.
    cancelled_flip: bool,
    wavedash: bool,
}

impl PlayerTrack {
    fn collect(timeline: &[Frame], slot: PlayerSlot, spawn: Vec3, t_start: f32, t_end: f32) -> Self {
        let mut track = PlayerTrack {
            displacement: 0.0,
            boost_used: 0.0,
            peak_speed: 0.0,
            initial_ball_distance: f32::MAX,
            final_ball_distance: 0.0,
            min_ball_distance: f32::MAX,
            speeds: Vec::new(),
            impulses: Vec::new(),
            cancelled_flip: false,
            wavedash: false,
        };

        let mut previous: Option<(f32, f32, f32, bool)> = None; // (t, speed, boost, on_ground)
        let mut airborne_since: Option<f32> = None;

        for frame in timeline
            .iter()
            .filter(|f| f.timestamp_s >= t_start && f.timestamp_s <= t_end)
        {
            let Some(player) = frame.player(slot) else {
                continue;
            };
            let speed = player.speed();
            let ball_distance = player.position.distance(frame.ball.position);

            if track.initial_ball_distance == f32::MAX {
                track.initial_ball_distance = ball_distance;
            }
            track.final_ball_distance = ball_distance;
            track.min_ball_distance = track.min_ball_distance.min(ball_distance);
            track.displacement = track.displacement.max(player.position.distance(spawn));
            track.peak_speed = track.peak_speed.max(speed);
            track.speeds.push((frame.timestamp_s, speed));

            if let Some((prev_t, prev_speed, prev_boost, prev_ground)) = previous {
                let dt = frame.timestamp_s - prev_t;
                if dt > 0.0 {
                    if player.boost_amount < prev_boost {
                        track.boost_used += prev_boost - player.boost_amount;
                    }
                    let gain = speed - prev_speed;
                    if gain >= DODGE_IMPULSE_MIN_GAIN_UU && !player.is_on_ground {
                        let lateral = lateral_ratio(player.velocity);
                        track.impulses.push((frame.timestamp_s, lateral));
                    }
                    // Wavedash: short air time ending in a landing that
                    // gains speed.
                    if prev_ground && !player.is_on_ground {
                        airborne_since = Some(frame.timestamp_s);
                    }
                    if !prev_ground && player.is_on_ground {
                        if let Some(since) = airborne_since.take() {
                            let air_time = frame.timestamp_s - since;
                            if air_time <= WAVEDASH_LANDING_WINDOW_S
                                && gain >= WAVEDASH_MIN_SPEED_GAIN_UU
                            {
                                track.wavedash = true;
                            }
                        }
                    }
                }
            }

            // Flip cancel: pitch returning to level right after an impulse.
            if let Some((impulse_t, _)) = track.impulses.last().copied() {
                let dt = frame.timestamp_s - impulse_t;
                if dt > 0.0 && dt <= KICKOFF_FLIP_CANCEL_WINDOW_S && player.rotation.x.abs() < 0.3 {
                    track.cancelled_flip = true;
                }
            }

            previous = Some((
                frame.timestamp_s,
                speed,
                player.boost_amount,
                player.is_on_ground,
            ));
        }

        if track.initial_ball_distance == f32::MAX {
            track.initial_ball_distance = 0.0;
            track.min_ball_distance = 0.0;
        }
        track
    }

    /// Largest relative deceleration inside the window ending at `t`.
    fn decel_ratio_before(&self, t: f32) -> f32 {
        let window: Vec<f32> = self
            .speeds
            .iter()
            .filter(|(st, _)| *st <= t && t - st <= KICKOFF_DELAY_WINDOW_S)
            .map(|(_, s)| *s)
            .collect();
        let (Some(first), Some(min)) = (
            window.first().copied(),
            window.iter().copied().min_by_key(|s| FloatOrd(*s)),
        ) else {
            return 0.0;
        };
        if first <= 0.0 {
            return 0.0;
        }
        ((first - min) / first).max(0.0)
    }
}

fn lateral_ratio(velocity: Vec3) -> f32 {
    let speed = velocity.length();
    if speed <= f32::EPSILON {
        return 0.0;
    }
    velocity.x.abs() / speed
}

/// Ordered decision tree; first match wins.
fn classify_approach(
    track: &PlayerTrack,
    own_touch: Option<&TouchEvent>,
    rotation_gated: bool,
) -> ApproachType {
    // (1) FAKE: never contested.
    let stationary = track.displacement < KICKOFF_FAKE_CONTEST_UU
        && track.boost_used < KICKOFF_FAKE_MAX_BOOST_USED;
    let moved_away = track.final_ball_distance > track.initial_ball_distance + 200.0;
    let never_reached = track.min_ball_distance > 1000.0;
    if stationary {
        return ApproachType::FakeStationary;
    }
    if own_touch.is_none() && moved_away {
        return ApproachType::FakeHalfflip;
    }
    if own_touch.is_none() && never_reached && track.displacement < 1500.0 {
        return ApproachType::FakeAggressive;
    }

    // (2) DELAY: braking into the touch after a fast run-up.
    if let Some(touch) = own_touch {
        if track.peak_speed > KICKOFF_DELAY_MIN_PEAK_UU
            && track.decel_ratio_before(touch.t) >= KICKOFF_DELAY_DECEL_RATIO
        {
            return ApproachType::Delay;
        }
    }

    // Rotation-sensitive variants are withheld on approximated rotation.
    if rotation_gated {
        return ApproachType::Unknown;
    }

    // (3) SPEEDFLIP: diagonal dodge with a quick cancel.
    let diagonal_impulse = track
        .impulses
        .iter()
        .any(|(_, lateral)| *lateral >= SPEEDFLIP_DIAGONAL_MIN_RATIO && *lateral <= 0.8);
    if diagonal_impulse && track.cancelled_flip {
        return ApproachType::Speedflip;
    }

    // (4) Standard sub-variant by the detected mechanic.
    if let Some((_, lateral)) = track.impulses.first() {
        if *lateral < SPEEDFLIP_DIAGONAL_MIN_RATIO {
            return ApproachType::StandardFrontflip;
        }
        return ApproachType::StandardDiagonal;
    }
    if track.wavedash {
        return ApproachType::StandardWavedash;
    }
    ApproachType::StandardBoost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TouchOutcome;
    use crate::frame::{BallFrame, PlayerFrame};
    use crate::header::PlayerInfo;
    use crate::normalize::normalize_players;
    use crate::Header;

    fn index_for(players: Vec<(&str, u8)>) -> PlayerIndex {
        let header = Header {
            players: players
                .into_iter()
                .map(|(name, team)| {
                    PlayerInfo::from_name_and_platform(name.to_string(), team, Default::default())
                })
                .collect(),
            ..Header::default()
        };
        let roster: Vec<crate::adapter::SlotMeta> = header
            .players
            .iter()
            .map(|p| crate::adapter::SlotMeta {
                display_name: Some(p.display_name.clone()),
                team: Some(p.team),
                ..Default::default()
            })
            .collect();
        normalize_players(&header, &roster)
    }

    fn player(slot: usize, team: u8, position: Vec3, velocity: Vec3) -> PlayerFrame {
        PlayerFrame {
            slot: PlayerSlot(slot),
            team,
            position,
            velocity,
            rotation: Vec3::ZERO,
            rotation_approximated: false,
            boost_amount: 33.0,
            is_supersonic: false,
            is_on_ground: true,
            is_demolished: false,
        }
    }

    fn frame(t: f32, ball_position: Vec3, ball_velocity: Vec3, players: Vec<PlayerFrame>) -> Frame {
        Frame {
            timestamp_s: t,
            ball: BallFrame {
                position: ball_position,
                velocity: ball_velocity,
                angular_velocity: Vec3::ZERO,
            },
            players,
        }
    }

    fn touch(t: f32, team: u8, player: &str) -> TouchEvent {
        TouchEvent {
            t,
            frame: (t * 30.0) as usize,
            player_id: player.to_string(),
            team,
            location: Vec3::new(0.0, 150.0, 93.0),
            ball_speed_kph: 20.0,
            outcome: TouchOutcome::Neutral,
        }
    }

    #[test]
    fn synthetic_kickoff_completes_on_first_touch() {
        let index = index_for(vec![("Alpha", 0), ("Bravo", 1)]);
        let ball0 = Vec3::new(0.0, 0.0, 93.15);
        let timeline = vec![
            frame(
                0.0,
                ball0,
                Vec3::ZERO,
                vec![
                    player(0, 0, Vec3::new(0.0, -500.0, 17.0), Vec3::ZERO),
                    player(1, 1, Vec3::new(0.0, 1000.0, 17.0), Vec3::ZERO),
                ],
            ),
            frame(
                1.0,
                Vec3::new(0.0, 120.0, 93.15),
                Vec3::new(0.0, 120.0, 0.0),
                vec![
                    player(0, 0, Vec3::new(0.0, -500.0, 17.0), Vec3::ZERO),
                    player(1, 1, Vec3::new(0.0, 1000.0, 17.0), Vec3::ZERO),
                ],
            ),
            frame(
                1.1,
                Vec3::new(0.0, 150.0, 93.15),
                Vec3::new(0.0, 300.0, 0.0),
                vec![
                    player(0, 0, Vec3::new(0.0, 160.0, 17.0), Vec3::new(0.0, 660.0, 0.0)),
                    player(1, 1, Vec3::new(0.0, 1000.0, 17.0), Vec3::ZERO),
                ],
            ),
        ];
        let touches = vec![touch(1.1, 0, "slug:alpha")];
        let kickoffs = detect_kickoffs(&timeline, &touches, &[], &index);
        assert_eq!(kickoffs.len(), 1);
        let kickoff = &kickoffs[0];
        assert_eq!(kickoff.phase, KickoffPhase::Complete);
        assert_eq!(kickoff.t_first_touch, Some(1.1));
        assert_eq!(kickoff.outcome, KickoffOutcome::FirstPossessionBlue);
        assert_eq!(kickoff.roles["slug:alpha"], KickoffRole::Go);
        assert_eq!(kickoff.roles["slug:bravo"], KickoffRole::Go);
    }

    #[test]
    fn no_kickoff_without_centered_ball() {
        let index = index_for(vec![("Alpha", 0)]);
        let timeline = vec![frame(
            0.0,
            Vec3::new(800.0, 0.0, 93.0),
            Vec3::ZERO,
            vec![player(0, 0, Vec3::new(0.0, -500.0, 17.0), Vec3::ZERO)],
        )];
        assert!(detect_kickoffs(&timeline, &[], &[], &index).is_empty());
    }

    #[test]
    fn quick_goal_marks_kickoff_outcome() {
        let index = index_for(vec![("Alpha", 0), ("Bravo", 1)]);
        let timeline = vec![
            frame(
                0.0,
                Vec3::new(0.0, 0.0, 93.15),
                Vec3::ZERO,
                vec![
                    player(0, 0, Vec3::new(0.0, -500.0, 17.0), Vec3::ZERO),
                    player(1, 1, Vec3::new(0.0, 500.0, 17.0), Vec3::ZERO),
                ],
            ),
            frame(
                1.0,
                Vec3::new(0.0, 50.0, 93.15),
                Vec3::new(0.0, 50.0, 0.0),
                vec![
                    player(0, 0, Vec3::new(0.0, -200.0, 17.0), Vec3::new(0.0, 800.0, 0.0)),
                    player(1, 1, Vec3::new(0.0, 500.0, 17.0), Vec3::ZERO),
                ],
            ),
        ];
        let touches = vec![touch(1.0, 0, "slug:alpha")];
        let goals = vec![GoalEvent {
            t: 3.0,
            frame: 90,
            scorer_id: Some("slug:alpha".into()),
            assist_id: None,
            team: 0,
            shot_speed_kph: Some(90.0),
        }];
        let kickoffs = detect_kickoffs(&timeline, &touches, &goals, &index);
        assert_eq!(kickoffs.len(), 1);
        assert_eq!(kickoffs[0].outcome, KickoffOutcome::GoalForBlue);
    }

    #[test]
    fn stationary_player_classifies_as_fake() {
        let track = PlayerTrack {
            displacement: 40.0,
            boost_used: 1.0,
            peak_speed: 80.0,
            initial_ball_distance: 3000.0,
            final_ball_distance: 3000.0,
            min_ball_distance: 2900.0,
            speeds: vec![],
            impulses: vec![],
            cancelled_flip: false,
            wavedash: false,
        };
        assert_eq!(
            classify_approach(&track, None, false),
            ApproachType::FakeStationary
        );
    }

    #[test]
    fn diagonal_cancelled_impulse_is_a_speedflip() {
        let track = PlayerTrack {
            displacement: 2500.0,
            boost_used: 30.0,
            peak_speed: 2250.0,
            initial_ball_distance: 3000.0,
            final_ball_distance: 100.0,
            min_ball_distance: 80.0,
            speeds: vec![],
            impulses: vec![(0.6, 0.5)],
            cancelled_flip: true,
            wavedash: false,
        };
        assert_eq!(
            classify_approach(&track, None, false),
            ApproachType::Speedflip
        );
    }

    #[test]
    fn gated_rotation_yields_unknown() {
        let track = PlayerTrack {
            displacement: 2500.0,
            boost_used: 30.0,
            peak_speed: 2250.0,
            initial_ball_distance: 3000.0,
            final_ball_distance: 100.0,
            min_ball_distance: 80.0,
            speeds: vec![],
            impulses: vec![(0.6, 0.5)],
            cancelled_flip: true,
            wavedash: false,
        };
        assert_eq!(
            classify_approach(&track, None, true),
            ApproachType::Unknown
        );
    }
}
