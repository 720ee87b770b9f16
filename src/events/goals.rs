//! Goal detection. Edge-triggered on the goal plane: once the ball is inside
//! a net, no further goals fire until it re-enters the playfield.

use crate::constants::*;
use crate::field::ARENA;
use crate::frame::Frame;

use super::{GoalEvent, TouchEvent};

pub fn detect_goals(timeline: &[Frame], touches: &[TouchEvent]) -> Vec<GoalEvent> {
    let mut goals = Vec::new();
    let mut ball_in_net = false;

    for (frame_index, frame) in timeline.iter().enumerate() {
        let y = frame.ball.position.y;
        let inside = y.abs() >= ARENA.back_wall_y;

        if inside && !ball_in_net {
            // +y is the net orange defends, so blue scores there.
            let team = if y > 0.0 { 0 } else { 1 };
            let scorer = last_touch_before(touches, frame.timestamp_s, GOAL_SCORER_WINDOW_S);
            let assist = scorer.and_then(|s| {
                touches
                    .iter()
                    .rev()
                    .filter(|t| t.t < s.t && s.t - t.t <= GOAL_ASSIST_WINDOW_S)
                    .find(|t| t.team == s.team && t.player_id != s.player_id)
            });
            goals.push(GoalEvent {
                t: frame.timestamp_s,
                frame: frame_index,
                scorer_id: scorer.map(|s| s.player_id.clone()),
                assist_id: assist.map(|a| a.player_id.clone()),
                team,
                shot_speed_kph: Some(frame.ball.velocity.length() * KPH_PER_UU_S),
            });
        }
        ball_in_net = inside;
    }
    goals
}

fn last_touch_before(touches: &[TouchEvent], t: f32, window_s: f32) -> Option<&TouchEvent> {
    touches
        .iter()
        .rev()
        .find(|touch| touch.t <= t && t - touch.t <= window_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{BallFrame, Vec3};

    fn ball_frame_at(t: f32, y: f32) -> Frame {
        Frame {
            timestamp_s: t,
            ball: BallFrame {
                position: Vec3::new(0.0, y, 93.0),
                velocity: Vec3::new(0.0, 1500.0, 0.0),
                angular_velocity: Vec3::ZERO,
            },
            players: vec![],
        }
    }

    #[test]
    fn goal_fires_once_while_ball_sits_in_net() {
        // Sixty frames parked past the goal line must produce exactly one
        // goal.
        let mut timeline = vec![ball_frame_at(0.0, 4000.0)];
        for i in 0..60 {
            timeline.push(ball_frame_at(1.0 + i as f32 / 30.0, ARENA.back_wall_y + 100.0));
        }
        let goals = detect_goals(&timeline, &[]);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].team, 0);
        assert_eq!(goals[0].scorer_id, None);
    }

    #[test]
    fn second_goal_requires_reentry() {
        let timeline = vec![
            ball_frame_at(0.0, 0.0),
            ball_frame_at(1.0, ARENA.back_wall_y + 50.0),
            ball_frame_at(2.0, ARENA.back_wall_y + 60.0),
            ball_frame_at(3.0, 1000.0),
            ball_frame_at(4.0, ARENA.back_wall_y + 50.0),
        ];
        let goals = detect_goals(&timeline, &[]);
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].frame, 1);
        assert_eq!(goals[1].frame, 4);
    }

    #[test]
    fn own_net_crossing_credits_the_other_team() {
        let timeline = vec![
            ball_frame_at(0.0, -1000.0),
            ball_frame_at(1.0, -(ARENA.back_wall_y + 10.0)),
        ];
        let goals = detect_goals(&timeline, &[]);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].team, 1);
    }

    #[test]
    fn scorer_and_assist_resolve_from_touches() {
        use super::super::{TouchEvent, TouchOutcome};
        let touches = vec![
            TouchEvent {
                t: 7.0,
                frame: 210,
                player_id: "steam:2".into(),
                team: 0,
                location: Vec3::ZERO,
                ball_speed_kph: 50.0,
                outcome: TouchOutcome::Pass,
            },
            TouchEvent {
                t: 9.0,
                frame: 270,
                player_id: "steam:1".into(),
                team: 0,
                location: Vec3::ZERO,
                ball_speed_kph: 90.0,
                outcome: TouchOutcome::Shot,
            },
        ];
        let timeline = vec![
            ball_frame_at(9.5, 4000.0),
            ball_frame_at(10.0, ARENA.back_wall_y + 20.0),
        ];
        let goals = detect_goals(&timeline, &touches);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].scorer_id.as_deref(), Some("steam:1"));
        assert_eq!(goals[0].assist_id.as_deref(), Some("steam:2"));
    }
}
