//! Arena geometry and the canonical boost pad table. This module is the
//! single source of truth for pad reasoning: the parser adapter snaps pad
//! actors onto it and every analyzer derives pad semantics from it.

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::frame::Vec3;

/// Standard soccar arena extents in UU.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub side_wall_x: f32,
    pub back_wall_y: f32,
    pub ceiling_z: f32,
}

pub static ARENA: Arena = Arena {
    side_wall_x: 4096.0,
    back_wall_y: 5120.0,
    ceiling_z: 2044.0,
};

/// Depth of the goal volume behind the back wall.
pub static GOAL_DEPTH: f32 = 880.0;

/// Snap tolerances for resolving an observed pad position onto the table.
pub static SNAP_TOLERANCE_SMALL_UU: f32 = 160.0;
pub static SNAP_TOLERANCE_BIG_UU: f32 = 200.0;

pub static SMALL_PAD_RADIUS_UU: f32 = 144.0;
pub static BIG_PAD_RADIUS_UU: f32 = 208.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PadSide {
    Blue,
    Orange,
    Mid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoostPad {
    pub pad_id: u8,
    pub is_big: bool,
    pub position: Vec3,
    pub radius_uu: f32,
    pub side: PadSide,
}

/// Canonical soccar pad layout, ids 0..=33 in the standard field-info
/// ordering. Six big pads: 3, 4, 15, 18, 29, 30.
static PAD_COORDS: [(f32, f32, f32, bool); 34] = [
    (0.0, -4240.0, 70.0, false),
    (-1792.0, -4184.0, 70.0, false),
    (1792.0, -4184.0, 70.0, false),
    (-3072.0, -4096.0, 73.0, true),
    (3072.0, -4096.0, 73.0, true),
    (-940.0, -3308.0, 70.0, false),
    (940.0, -3308.0, 70.0, false),
    (0.0, -2816.0, 70.0, false),
    (-3584.0, -2484.0, 70.0, false),
    (3584.0, -2484.0, 70.0, false),
    (-1788.0, -2300.0, 70.0, false),
    (1788.0, -2300.0, 70.0, false),
    (-2048.0, -1036.0, 70.0, false),
    (0.0, -1024.0, 70.0, false),
    (2048.0, -1036.0, 70.0, false),
    (-3584.0, 0.0, 73.0, true),
    (-1024.0, 0.0, 70.0, false),
    (1024.0, 0.0, 70.0, false),
    (3584.0, 0.0, 73.0, true),
    (-2048.0, 1036.0, 70.0, false),
    (0.0, 1024.0, 70.0, false),
    (2048.0, 1036.0, 70.0, false),
    (-1788.0, 2300.0, 70.0, false),
    (1788.0, 2300.0, 70.0, false),
    (-3584.0, 2484.0, 70.0, false),
    (3584.0, 2484.0, 70.0, false),
    (0.0, 2816.0, 70.0, false),
    (-940.0, 3308.0, 70.0, false),
    (940.0, 3308.0, 70.0, false),
    (-3072.0, 4096.0, 73.0, true),
    (3072.0, 4096.0, 73.0, true),
    (-1792.0, 4184.0, 70.0, false),
    (1792.0, 4184.0, 70.0, false),
    (0.0, 4240.0, 70.0, false),
];

pub static PAD_TABLE: Lazy<Vec<BoostPad>> = Lazy::new(|| {
    PAD_COORDS
        .iter()
        .enumerate()
        .map(|(i, &(x, y, z, is_big))| BoostPad {
            pad_id: i as u8,
            is_big,
            position: Vec3::new(x, y, z),
            radius_uu: if is_big {
                BIG_PAD_RADIUS_UU
            } else {
                SMALL_PAD_RADIUS_UU
            },
            side: if y < 0.0 {
                PadSide::Blue
            } else if y > 0.0 {
                PadSide::Orange
            } else {
                PadSide::Mid
            },
        })
        .collect()
});

pub fn pad_by_id(pad_id: u8) -> Option<&'static BoostPad> {
    PAD_TABLE.get(pad_id as usize)
}

/// Resolve an observed position onto the canonical table. Matching is
/// horizontal only (pad actors occasionally replicate odd z values) and the
/// nearest pad within its tolerance wins. Returns the pad id and the
/// horizontal snap error.
pub fn snap_to_pad(position: Vec3) -> Option<(u8, f32)> {
    let mut best: Option<(u8, f32)> = None;
    for pad in PAD_TABLE.iter() {
        let tolerance = if pad.is_big {
            SNAP_TOLERANCE_BIG_UU
        } else {
            SNAP_TOLERANCE_SMALL_UU
        };
        let error = position.distance_2d(pad.position);
        if error <= tolerance && best.map_or(true, |(_, e)| error < e) {
            best = Some((pad.pad_id, error));
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldThird {
    Offensive,
    Middle,
    Defensive,
}

/// Which third of the field a position falls in, relative to the attacking
/// direction of `team` (blue attacks +y, orange attacks -y).
pub fn third_of(position: Vec3, team: u8) -> FieldThird {
    let boundary = ARENA.back_wall_y / 3.0;
    let along = attack_axis_projection(position, team);
    if along > boundary {
        FieldThird::Offensive
    } else if along < -boundary {
        FieldThird::Defensive
    } else {
        FieldThird::Middle
    }
}

/// Projection of a position onto a team's attack axis: positive values are
/// toward the opponent goal.
pub fn attack_axis_projection(position: Vec3, team: u8) -> f32 {
    if team == 0 {
        position.y
    } else {
        -position.y
    }
}

/// y coordinate of the goal line a team defends.
pub fn own_goal_y(team: u8) -> f32 {
    if team == 0 {
        -ARENA.back_wall_y
    } else {
        ARENA.back_wall_y
    }
}

/// Center of the goal mouth a team attacks.
pub fn opponent_goal_center(team: u8) -> Vec3 {
    Vec3::new(0.0, -own_goal_y(team), 321.0)
}

/// True when a position is on `team`'s defensive half of the ball, i.e.
/// between the ball and the goal that team defends.
pub fn is_behind_ball(position: Vec3, ball: Vec3, team: u8) -> bool {
    attack_axis_projection(position, team) < attack_axis_projection(ball, team)
}
