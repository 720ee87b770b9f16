//! Challenge (50/50) detection: two opposing touches paired inside a short
//! window with plausible spatial separation and a live ball. The risk index
//! scores how exposed the initiating player was going into the contest.

use crate::constants::*;
use crate::field;
use crate::frame::{Frame, PlayerSlot, Vec3};
use crate::normalize::PlayerIndex;

use super::{ChallengeEvent, ChallengeResult, TouchEvent};

pub fn detect_challenges(
    timeline: &[Frame],
    touches: &[TouchEvent],
    index: &PlayerIndex,
) -> Vec<ChallengeEvent> {
    let mut challenges = Vec::new();
    let mut consumed: Vec<bool> = vec![false; touches.len()];

    for (i, first) in touches.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let Some(pair) = touches
            .iter()
            .enumerate()
            .skip(i + 1)
            .take_while(|(_, other)| other.t - first.t <= CHALLENGE_PAIR_WINDOW_S)
            .find(|(j, other)| {
                !consumed[*j] && other.team != first.team && {
                    let separation = first.location.distance(other.location);
                    (CHALLENGE_MIN_SEPARATION_UU..=CHALLENGE_MAX_SEPARATION_UU)
                        .contains(&separation)
                        && other.ball_speed_kph > CHALLENGE_MIN_BALL_SPEED_KPH
                }
            })
        else {
            continue;
        };
        let (j, second) = pair;
        consumed[i] = true;
        consumed[j] = true;

        let midpoint = Vec3::new(
            (first.location.x + second.location.x) / 2.0,
            (first.location.y + second.location.y) / 2.0,
            (first.location.z + second.location.z) / 2.0,
        );
        // Depth along the initiating team's attack axis: positive contests
        // happen upfield, negative ones in their own end.
        let depth_uu = field::attack_axis_projection(midpoint, first.team);

        let risk_index = risk_index_for(timeline, first, index);

        let (result, winning_team) = resolve_result(touches, j, first.team, second.team);

        challenges.push(ChallengeEvent {
            t: first.t,
            frame: first.frame,
            players: vec![first.player_id.clone(), second.player_id.clone()],
            depth_uu,
            risk_index,
            result,
            winning_team,
        });
    }
    challenges
}

/// Weighted sum of four binary exposure signals, normalized to [0, 1].
fn risk_index_for(timeline: &[Frame], touch: &TouchEvent, index: &PlayerIndex) -> f32 {
    let Some(entry) = index.by_canonical(&touch.player_id) else {
        return 0.0;
    };
    let slot = entry.slot;
    let team = entry.info.team;

    let Some(frame) = frame_at(timeline, touch.frame) else {
        return 0.0;
    };
    let Some(player) = frame.player(slot) else {
        return 0.0;
    };

    let is_last_man = is_rearmost_of_team(frame, slot, team);
    let low_boost = player.boost_amount < CHALLENGE_LOW_BOOST;
    let ahead_of_ball = !field::is_behind_ball(player.position, frame.ball.position, team);
    let high_speed = player.speed() > CHALLENGE_HIGH_SPEED_UU;

    let raw = [is_last_man, low_boost, ahead_of_ball, high_speed]
        .iter()
        .filter(|flag| **flag)
        .count();
    raw as f32 / 4.0
}

fn is_rearmost_of_team(frame: &Frame, slot: PlayerSlot, team: u8) -> bool {
    let Some(player) = frame.player(slot) else {
        return false;
    };
    let own = field::attack_axis_projection(player.position, team);
    frame
        .players
        .iter()
        .filter(|p| p.team == team && p.slot != slot)
        .all(|p| field::attack_axis_projection(p.position, team) >= own)
}

/// The team whose next touch follows the contest wins; no further touch is
/// neutral.
fn resolve_result(
    touches: &[TouchEvent],
    second_index: usize,
    first_team: u8,
    second_team: u8,
) -> (ChallengeResult, Option<u8>) {
    match touches.get(second_index + 1) {
        Some(next) if next.team == first_team => (ChallengeResult::Win, Some(first_team)),
        Some(next) if next.team == second_team => (ChallengeResult::Loss, Some(second_team)),
        _ => (ChallengeResult::Neutral, None),
    }
}

fn frame_at(timeline: &[Frame], frame_index: usize) -> Option<&Frame> {
    timeline.get(frame_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TouchOutcome;

    fn touch(t: f32, team: u8, player: &str, location: Vec3, speed_kph: f32) -> TouchEvent {
        TouchEvent {
            t,
            frame: (t * 30.0) as usize,
            player_id: player.to_string(),
            team,
            location,
            ball_speed_kph: speed_kph,
            outcome: TouchOutcome::Neutral,
        }
    }

    #[test]
    fn opposing_touches_inside_window_pair_into_a_challenge() {
        let touches = vec![
            touch(10.0, 0, "steam:1", Vec3::new(0.0, 0.0, 93.0), 40.0),
            touch(10.4, 1, "steam:2", Vec3::new(300.0, 200.0, 93.0), 45.0),
            touch(11.0, 0, "steam:1", Vec3::new(0.0, 600.0, 93.0), 30.0),
        ];
        let challenges = detect_challenges(&[], &touches, &PlayerIndex::default());
        assert_eq!(challenges.len(), 1);
        let c = &challenges[0];
        assert_eq!(c.players, vec!["steam:1".to_string(), "steam:2".to_string()]);
        assert_eq!(c.result, ChallengeResult::Win);
        assert_eq!(c.winning_team, Some(0));
        assert!((c.depth_uu - 100.0).abs() < 1.0);
    }

    #[test]
    fn same_team_touches_never_pair() {
        let touches = vec![
            touch(10.0, 0, "steam:1", Vec3::new(0.0, 0.0, 93.0), 40.0),
            touch(10.3, 0, "steam:3", Vec3::new(300.0, 0.0, 93.0), 40.0),
        ];
        assert!(detect_challenges(&[], &touches, &PlayerIndex::default()).is_empty());
    }

    #[test]
    fn touches_too_close_or_too_far_apart_never_pair() {
        let close = vec![
            touch(10.0, 0, "steam:1", Vec3::new(0.0, 0.0, 93.0), 40.0),
            touch(10.2, 1, "steam:2", Vec3::new(50.0, 0.0, 93.0), 40.0),
        ];
        assert!(detect_challenges(&[], &close, &PlayerIndex::default()).is_empty());

        let far = vec![
            touch(10.0, 0, "steam:1", Vec3::new(0.0, 0.0, 93.0), 40.0),
            touch(10.2, 1, "steam:2", Vec3::new(0.0, 2000.0, 93.0), 40.0),
        ];
        assert!(detect_challenges(&[], &far, &PlayerIndex::default()).is_empty());
    }

    #[test]
    fn no_following_touch_is_neutral() {
        let touches = vec![
            touch(10.0, 0, "steam:1", Vec3::new(0.0, 0.0, 93.0), 40.0),
            touch(10.4, 1, "steam:2", Vec3::new(300.0, 200.0, 93.0), 45.0),
        ];
        let challenges = detect_challenges(&[], &touches, &PlayerIndex::default());
        assert_eq!(challenges[0].result, ChallengeResult::Neutral);
        assert_eq!(challenges[0].winning_team, None);
    }
}
