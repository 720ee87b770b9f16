//! Touch detection. A candidate frame pairs player-ball proximity with a
//! measurable change in ball speed; candidates are debounced per player in a
//! rolling time/space window before an outcome tag is assigned from the
//! post-touch trajectory.

use std::collections::HashMap;

use crate::constants::*;
use crate::field::{self, FieldThird};
use crate::frame::{Frame, PlayerSlot, Vec3};
use crate::normalize::PlayerIndex;

use super::{TouchEvent, TouchOutcome};

pub fn detect_touches(timeline: &[Frame], index: &PlayerIndex) -> Vec<TouchEvent> {
    let mut touches: Vec<TouchEvent> = Vec::new();
    // Last emitted touch per slot, for debounce and dribble tagging.
    let mut last_emitted: HashMap<PlayerSlot, (f32, Vec3)> = HashMap::new();
    let mut last_any: Option<(PlayerSlot, f32)> = None;

    for (frame_index, window) in timeline.windows(2).enumerate() {
        let previous = &window[0];
        let current = &window[1];
        let ball_speed_delta =
            (current.ball.velocity.length() - previous.ball.velocity.length()).abs();
        if ball_speed_delta <= TOUCH_BALL_DELTA_EPSILON_UU {
            continue;
        }

        // Scan in ascending slot order: simultaneous contested touches keep
        // that emission order.
        for player in current.players.iter() {
            let distance = player.position.distance(current.ball.position);
            if distance > TOUCH_PROXIMITY_UU {
                continue;
            }

            if let Some((last_t, last_position)) = last_emitted.get(&player.slot) {
                let within_window = current.timestamp_s - last_t <= TOUCH_DEBOUNCE_WINDOW_S;
                let within_radius =
                    current.ball.position.distance(*last_position) < TOUCH_DEBOUNCE_RADIUS_UU;
                if within_window && within_radius {
                    continue;
                }
            }

            let Some(canonical_id) = index.canonical_id(player.slot) else {
                continue;
            };

            let outcome = classify_outcome(
                current,
                player.slot,
                player.team,
                index,
                last_any
                    .filter(|(slot, t)| {
                        *slot == player.slot
                            && current.timestamp_s - t <= DRIBBLE_REPEAT_WINDOW_S
                    })
                    .is_some(),
            );

            let touch = TouchEvent {
                t: current.timestamp_s,
                frame: frame_index + 1,
                player_id: canonical_id.to_string(),
                team: player.team,
                location: current.ball.position,
                ball_speed_kph: current.ball.velocity.length() * KPH_PER_UU_S,
                outcome,
            };
            last_emitted.insert(player.slot, (touch.t, touch.location));
            last_any = Some((player.slot, touch.t));
            touches.push(touch);
        }
    }
    touches
}

/// Ordered outcome tree: SHOT, PASS, CLEAR, DRIBBLE, NEUTRAL; first match
/// wins.
fn classify_outcome(
    frame: &Frame,
    slot: PlayerSlot,
    team: u8,
    index: &PlayerIndex,
    repeated_within_dribble_window: bool,
) -> TouchOutcome {
    let ball_velocity = frame.ball.velocity;
    let ball_speed = ball_velocity.length();

    if ball_speed > f32::EPSILON {
        let toward_goal = direction_to(frame.ball.position, field::opponent_goal_center(team));
        if angle_between(ball_velocity, toward_goal) <= SHOT_CONE_HALF_ANGLE_DEG.to_radians() {
            return TouchOutcome::Shot;
        }

        for teammate in index.teammates_of(slot) {
            if let Some(mate) = frame.player(teammate) {
                let toward_mate = direction_to(frame.ball.position, mate.position);
                if angle_between(ball_velocity, toward_mate)
                    <= PASS_CONE_HALF_ANGLE_DEG.to_radians()
                {
                    return TouchOutcome::Pass;
                }
            }
        }

        let in_own_third = field::third_of(frame.ball.position, team) == FieldThird::Defensive;
        let moving_upfield = field::attack_axis_projection(
            Vec3::new(ball_velocity.x, ball_velocity.y, 0.0),
            team,
        ) > 0.0;
        if in_own_third && moving_upfield {
            return TouchOutcome::Clear;
        }
    }

    if repeated_within_dribble_window {
        return TouchOutcome::Dribble;
    }
    TouchOutcome::Neutral
}

fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, to.y - from.y, to.z - from.z)
}

fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let ga = a.to_glam();
    let gb = b.to_glam();
    if ga.length() <= f32::EPSILON || gb.length() <= f32::EPSILON {
        return std::f32::consts::PI;
    }
    ga.angle_between(gb)
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn player_at(slot: usize, team: u8, position: Vec3) -> PlayerFrame {
        PlayerFrame {
            slot: PlayerSlot(slot),
            team,
            position,
            velocity: Vec3::ZERO,
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

    #[test]
    fn proximity_plus_speed_change_emits_one_touch() {
        let index = index_for(vec![("Alpha", 0), ("Bravo", 1)]);
        let timeline = vec![
            frame(
                0.0,
                Vec3::new(0.0, 0.0, 93.0),
                Vec3::ZERO,
                vec![
                    player_at(0, 0, Vec3::new(0.0, -500.0, 17.0)),
                    player_at(1, 1, Vec3::new(0.0, 1000.0, 17.0)),
                ],
            ),
            frame(
                1.0,
                Vec3::new(0.0, 120.0, 93.0),
                Vec3::new(0.0, 900.0, 0.0),
                vec![
                    player_at(0, 0, Vec3::new(0.0, 40.0, 17.0)),
                    player_at(1, 1, Vec3::new(0.0, 1000.0, 17.0)),
                ],
            ),
        ];
        let touches = detect_touches(&timeline, &index);
        assert_eq!(touches.len(), 1);
        assert_eq!(touches[0].player_id, "slug:alpha");
        assert_eq!(touches[0].team, 0);
        assert!(touches[0].ball_speed_kph > 30.0);
    }

    #[test]
    fn touches_are_debounced_in_the_rolling_window() {
        let index = index_for(vec![("Alpha", 0)]);
        let near = Vec3::new(0.0, 0.0, 93.0);
        let timeline = vec![
            frame(0.00, near, Vec3::ZERO, vec![player_at(0, 0, Vec3::new(0.0, -50.0, 17.0))]),
            frame(
                0.05,
                near,
                Vec3::new(0.0, 500.0, 0.0),
                vec![player_at(0, 0, Vec3::new(0.0, -40.0, 17.0))],
            ),
            frame(
                0.10,
                Vec3::new(0.0, 30.0, 93.0),
                Vec3::new(0.0, 1000.0, 0.0),
                vec![player_at(0, 0, Vec3::new(0.0, -30.0, 17.0))],
            ),
        ];
        let touches = detect_touches(&timeline, &index);
        assert_eq!(touches.len(), 1, "second candidate sits inside the window");
    }

    #[test]
    fn shot_outcome_points_at_opponent_goal() {
        let index = index_for(vec![("Alpha", 0)]);
        // Blue attacks +y; ball fired toward the orange net.
        let timeline = vec![
            frame(0.0, Vec3::new(0.0, 3000.0, 93.0), Vec3::ZERO, vec![player_at(
                0,
                0,
                Vec3::new(0.0, 2900.0, 17.0),
            )]),
            frame(
                0.5,
                Vec3::new(0.0, 3100.0, 93.0),
                Vec3::new(0.0, 2500.0, 100.0),
                vec![player_at(0, 0, Vec3::new(0.0, 2950.0, 17.0))],
            ),
        ];
        let touches = detect_touches(&timeline, &index);
        assert_eq!(touches.len(), 1);
        assert_eq!(touches[0].outcome, TouchOutcome::Shot);
    }

    #[test]
    fn clear_outcome_from_own_third() {
        let index = index_for(vec![("Alpha", 0)]);
        // Ball deep in blue's third, hammered sideways-upfield away from goal.
        let timeline = vec![
            frame(0.0, Vec3::new(2000.0, -4000.0, 93.0), Vec3::ZERO, vec![player_at(
                0,
                0,
                Vec3::new(2000.0, -4100.0, 17.0),
            )]),
            frame(
                0.5,
                Vec3::new(2100.0, -3900.0, 93.0),
                Vec3::new(2300.0, 800.0, 0.0),
                vec![player_at(0, 0, Vec3::new(2010.0, -4050.0, 17.0))],
            ),
        ];
        let touches = detect_touches(&timeline, &index);
        assert_eq!(touches.len(), 1);
        assert_eq!(touches[0].outcome, TouchOutcome::Clear);
    }
}
