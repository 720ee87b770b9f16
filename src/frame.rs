//! Canonical frame types shared by every stage downstream of the parser
//! adapter. Frames are produced once and never mutated.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// A position or velocity in Unreal Units. Serialized as an `{x, y, z}`
/// object; converted to [`glam::Vec3`] for math.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn to_glam(self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }

    pub fn from_glam(v: glam::Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub fn length(self) -> f32 {
        self.to_glam().length()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        self.to_glam().distance(other.to_glam())
    }

    /// Horizontal (x/y plane) distance.
    pub fn distance_2d(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Vec3::from_glam(v)
    }
}

/// Index of a player within one replay, assigned by the parser adapter in
/// PRI-first-seen order. Aliased to a canonical id by normalization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct PlayerSlot(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BallFrame {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerFrame {
    pub slot: PlayerSlot,
    pub team: u8,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler angles (pitch, yaw, roll) in radians.
    pub rotation: Vec3,
    /// True when `rotation` was approximated from the velocity direction
    /// because the stream carried no orientation for this sample.
    pub rotation_approximated: bool,
    pub boost_amount: f32,
    pub is_supersonic: bool,
    pub is_on_ground: bool,
    pub is_demolished: bool,
}

impl PlayerFrame {
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_s: f32,
    pub ball: BallFrame,
    pub players: Vec<PlayerFrame>,
}

impl Frame {
    pub fn player(&self, slot: PlayerSlot) -> Option<&PlayerFrame> {
        self.players.iter().find(|p| p.slot == slot)
    }

    /// A frame is malformed when its timestamp or any kinematic field is
    /// non-finite. Normalization skips these rather than failing the parse.
    pub fn is_well_formed(&self) -> bool {
        fn finite(v: Vec3) -> bool {
            v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
        }
        self.timestamp_s.is_finite()
            && finite(self.ball.position)
            && finite(self.ball.velocity)
            && self
                .players
                .iter()
                .all(|p| finite(p.position) && finite(p.velocity) && p.boost_amount.is_finite())
    }
}

/// Clamp a player velocity to the physical cap. Returns the clamped vector
/// and whether clamping occurred, which the caller records as a diagnostic.
pub fn clamp_velocity(v: Vec3) -> (Vec3, bool) {
    let speed = v.length();
    if speed > MAX_CAR_SPEED_UU {
        let scaled = v.to_glam() * (MAX_CAR_SPEED_UU / speed);
        (Vec3::from_glam(scaled), true)
    } else {
        (v, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_clamped_to_physical_cap() {
        let (v, clamped) = clamp_velocity(Vec3::new(4000.0, 0.0, 0.0));
        assert!(clamped);
        assert!((v.length() - MAX_CAR_SPEED_UU).abs() < 1.0);

        let (v, clamped) = clamp_velocity(Vec3::new(100.0, 50.0, 0.0));
        assert!(!clamped);
        assert_eq!(v, Vec3::new(100.0, 50.0, 0.0));
    }

    #[test]
    fn malformed_frames_are_detected() {
        let mut frame = Frame {
            timestamp_s: 1.0,
            ball: BallFrame::default(),
            players: vec![],
        };
        assert!(frame.is_well_formed());
        frame.ball.position.x = f32::NAN;
        assert!(!frame.is_well_formed());
    }
}
