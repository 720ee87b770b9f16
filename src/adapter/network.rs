//! The full network decoder. Walks the boxcars frame stream through an
//! [`ActorStateModeler`], maintains the car/PRI/team/component link graph,
//! and emits one canonical [`Frame`] per network tick plus the pad event
//! stream.

use std::collections::HashMap;

use log::debug;

use crate::actor_state::ActorStateModeler;
use crate::adapter::classify::{ActorClass, ClassResolver, ComponentKind};
use crate::adapter::pads::{BoostPadEvent, PadEventStatus, PadRegistry};
use crate::constants::*;
use crate::error::{RlcoachError, RlcoachResult};
use crate::frame::{clamp_velocity, BallFrame, Frame, PlayerFrame, PlayerSlot, Vec3};
use crate::header::{CameraSettings, LoadoutSummary};
use crate::quality::{Diagnostics, ParserStatus};

/// Ball spawn position on the kickoff plate.
static BALL_REST: Vec3 = Vec3 {
    x: 0.0,
    y: 0.0,
    z: 93.15,
};

/// Identity observed for one player slot during the network parse. The
/// header stays authoritative; normalization aliases these onto it.
#[derive(Debug, Clone, Default)]
pub struct SlotMeta {
    pub display_name: Option<String>,
    /// Canonical `<platform>:<id>` derived from the replicated unique id.
    pub platform_id: Option<String>,
    pub team: Option<u8>,
    pub camera: Option<CameraSettings>,
    pub loadout: Option<LoadoutSummary>,
    pub rotation_samples: u64,
    pub rotation_approximated: u64,
}

impl SlotMeta {
    pub fn rotation_approximated_ratio(&self) -> f64 {
        if self.rotation_samples == 0 {
            0.0
        } else {
            self.rotation_approximated as f64 / self.rotation_samples as f64
        }
    }
}

/// Output of the full decoder: the canonical frame sequence, the pad event
/// stream, per-slot identity, and parse diagnostics.
#[derive(Debug)]
pub struct NetworkData {
    pub frames: Vec<Frame>,
    pub pad_events: Vec<BoostPadEvent>,
    pub roster: Vec<SlotMeta>,
    pub measured_hz: Option<f32>,
    pub diagnostics: Diagnostics,
}

/// Owned copy of one rigid-body sample, detached from the actor arena so
/// the decoder can mutate its own state while consuming it.
#[derive(Debug, Clone, Copy)]
struct RbSnapshot {
    sleeping: bool,
    position: Vec3,
    velocity: Vec3,
    angular_velocity: Vec3,
    quat: [f32; 4],
}

#[derive(Debug, Clone, Copy)]
struct BoostComponentState {
    value: f32,
    active: bool,
}

struct AttributeKeys {
    rigid_body: Option<boxcars::ObjectId>,
    boost_amount: Option<boxcars::ObjectId>,
    boost_replicated: Option<boxcars::ObjectId>,
    component_active: Option<boxcars::ObjectId>,
    vehicle: Option<boxcars::ObjectId>,
    team: Option<boxcars::ObjectId>,
    team_paint: Option<boxcars::ObjectId>,
    unique_id: Option<boxcars::ObjectId>,
    player_name: Option<boxcars::ObjectId>,
    player_replication: Option<boxcars::ObjectId>,
    pickup: Option<boxcars::ObjectId>,
    pickup_new: Option<boxcars::ObjectId>,
    demolish: Option<boxcars::ObjectId>,
    cam_settings: Option<boxcars::ObjectId>,
    camera_pri: Option<boxcars::ObjectId>,
    loadout: Option<boxcars::ObjectId>,
}

impl AttributeKeys {
    fn new(resolver: &ClassResolver) -> Self {
        Self {
            rigid_body: resolver.object_id_for(RIGID_BODY_STATE_KEY),
            boost_amount: resolver.object_id_for(BOOST_AMOUNT_KEY),
            boost_replicated: resolver.object_id_for(BOOST_REPLICATED_KEY),
            component_active: resolver.object_id_for(COMPONENT_ACTIVE_KEY),
            vehicle: resolver.object_id_for(VEHICLE_KEY),
            team: resolver.object_id_for(TEAM_KEY),
            team_paint: resolver.object_id_for(TEAM_PAINT_KEY),
            unique_id: resolver.object_id_for(UNIQUE_ID_KEY),
            player_name: resolver.object_id_for(PLAYER_NAME_KEY),
            player_replication: resolver.object_id_for(PLAYER_REPLICATION_KEY),
            pickup: resolver.object_id_for(PICKUP_KEY),
            pickup_new: resolver.object_id_for(PICKUP_NEW_KEY),
            demolish: resolver.object_id_for(DEMOLISH_KEY),
            cam_settings: resolver.object_id_for(CAM_SETTINGS_KEY),
            camera_pri: resolver.object_id_for(CAMERA_PRI_KEY),
            loadout: resolver.object_id_for(LOADOUT_KEY),
        }
    }
}

pub struct NetworkDecoder {
    resolver: ClassResolver,
    keys: AttributeKeys,
    modeler: ActorStateModeler,
    registry: PadRegistry,

    ball_actor: Option<boxcars::ActorId>,
    teams: HashMap<boxcars::ActorId, u8>,
    pri_to_slot: HashMap<boxcars::ActorId, PlayerSlot>,
    slots: Vec<SlotMeta>,
    /// PRI actor per slot, parallel to `slots`.
    slot_pri: Vec<boxcars::ActorId>,
    slot_team_actor: HashMap<PlayerSlot, boxcars::ActorId>,
    car_to_pri: HashMap<boxcars::ActorId, boxcars::ActorId>,
    pri_to_car: HashMap<boxcars::ActorId, boxcars::ActorId>,
    component_to_car: HashMap<boxcars::ActorId, boxcars::ActorId>,
    boost_components: HashMap<boxcars::ActorId, BoostComponentState>,
    demolished: HashMap<PlayerSlot, bool>,

    last_ball: BallFrame,
    last_player: HashMap<PlayerSlot, PlayerFrame>,
    frames: Vec<Frame>,
    diagnostics: Diagnostics,
}

impl NetworkDecoder {
    /// Decode the network stream into canonical frames. Fails only when the
    /// replay carries no network frames at all; per-frame problems degrade
    /// into diagnostics.
    pub fn decode(replay: &boxcars::Replay) -> RlcoachResult<NetworkData> {
        let net = replay
            .network_frames
            .as_ref()
            .ok_or_else(|| RlcoachError::NetworkDataUnavailable {
                details: "replay contains no network frame stream".into(),
            })?;

        let resolver = ClassResolver::new(&replay.objects, &replay.class_indices);
        let keys = AttributeKeys::new(&resolver);
        let mut decoder = NetworkDecoder {
            keys,
            resolver,
            modeler: ActorStateModeler::new(),
            registry: PadRegistry::new(),
            ball_actor: None,
            teams: HashMap::new(),
            pri_to_slot: HashMap::new(),
            slots: Vec::new(),
            slot_pri: Vec::new(),
            slot_team_actor: HashMap::new(),
            car_to_pri: HashMap::new(),
            pri_to_car: HashMap::new(),
            component_to_car: HashMap::new(),
            boost_components: HashMap::new(),
            demolished: HashMap::new(),
            last_ball: BallFrame {
                position: BALL_REST,
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
            },
            last_player: HashMap::new(),
            frames: Vec::with_capacity(net.frames.len()),
            diagnostics: Diagnostics::default(),
        };

        for (index, frame) in net.frames.iter().enumerate() {
            decoder.process_frame(frame, index);
        }
        decoder.finish()
    }

    fn process_frame(&mut self, frame: &boxcars::Frame, index: usize) {
        for actor_id in frame.deleted_actors.iter() {
            self.on_delete(actor_id);
        }
        for new_actor in frame.new_actors.iter() {
            self.on_new_actor(new_actor, index);
        }
        for update in frame.updated_actors.iter() {
            self.modeler.update_attribute(update, index);
            self.on_update(update, frame.time, index);
        }
        self.emit_frame(frame, index);
    }

    fn on_new_actor(&mut self, new_actor: &boxcars::NewActor, index: usize) {
        self.modeler.new_actor(new_actor, index);
        match self.resolver.classify(new_actor.object_id) {
            ActorClass::Ball => self.ball_actor = Some(new_actor.actor_id),
            ActorClass::Team(team) => {
                self.teams.insert(new_actor.actor_id, team);
            }
            ActorClass::PlayerInfo => {
                // Slot indices are PRI spawn order, which is stable for a
                // given replay.
                if !self.pri_to_slot.contains_key(&new_actor.actor_id) {
                    let slot = PlayerSlot(self.slots.len());
                    self.pri_to_slot.insert(new_actor.actor_id, slot);
                    self.slots.push(SlotMeta::default());
                    self.slot_pri.push(new_actor.actor_id);
                }
            }
            ActorClass::BoostPad => {
                let position = self
                    .modeler
                    .state(&new_actor.actor_id)
                    .and_then(|s| s.initial_location);
                self.registry.register(new_actor.actor_id, position);
            }
            _ => {}
        }
    }

    fn on_delete(&mut self, actor_id: &boxcars::ActorId) {
        if self.ball_actor == Some(*actor_id) {
            self.ball_actor = None;
        }
        if let Some(pri) = self.car_to_pri.remove(actor_id) {
            self.pri_to_car.remove(&pri);
        }
        if let Some(slot) = self.pri_to_slot.get(actor_id).copied() {
            // A deleted PRI keeps its slot; identity is sticky for the
            // replay even if the player leaves.
            debug!("PRI actor {:?} for slot {:?} deleted", actor_id, slot);
        }
        self.component_to_car.remove(actor_id);
        self.boost_components.remove(actor_id);
        self.modeler.delete_actor(actor_id);
    }

    fn on_update(&mut self, update: &boxcars::UpdatedAttribute, time: f32, index: usize) {
        let key = Some(update.object_id);
        if key == self.keys.player_name {
            if let boxcars::Attribute::String(name) = &update.attribute {
                if let Some(slot) = self.pri_to_slot.get(&update.actor_id) {
                    self.slots[slot.0].display_name = Some(name.clone());
                }
            }
        } else if key == self.keys.unique_id {
            if let boxcars::Attribute::UniqueId(unique) = &update.attribute {
                if let Some(slot) = self.pri_to_slot.get(&update.actor_id) {
                    self.slots[slot.0].platform_id = canonical_platform_id(&unique.remote_id);
                }
            }
        } else if key == self.keys.team {
            if let boxcars::Attribute::ActiveActor(team) = &update.attribute {
                if let Some(slot) = self.pri_to_slot.get(&update.actor_id).copied() {
                    self.slot_team_actor.insert(slot, team.actor);
                }
            }
        } else if key == self.keys.loadout {
            if let boxcars::Attribute::Loadout(loadout) = &update.attribute {
                if let Some(slot) = self.pri_to_slot.get(&update.actor_id) {
                    self.slots[slot.0].loadout = Some(LoadoutSummary {
                        body: loadout.body,
                        wheels: loadout.wheels,
                        boost: loadout.rocket_trail,
                        antenna: loadout.antenna,
                        topper: loadout.topper,
                    });
                }
            }
        } else if key == self.keys.player_replication {
            // A car binding to its PRI. Fresh car ends any demolished state.
            if let boxcars::Attribute::ActiveActor(pri) = &update.attribute {
                if self.is_car(&update.actor_id) {
                    self.car_to_pri.insert(update.actor_id, pri.actor);
                    self.pri_to_car.insert(pri.actor, update.actor_id);
                    if let Some(slot) = self.pri_to_slot.get(&pri.actor) {
                        self.demolished.insert(*slot, false);
                    }
                }
            }
        } else if key == self.keys.vehicle {
            if let boxcars::Attribute::ActiveActor(car) = &update.attribute {
                self.component_to_car.insert(update.actor_id, car.actor);
            }
        } else if key == self.keys.boost_amount {
            if let boxcars::Attribute::Byte(byte) = update.attribute {
                self.on_boost_byte(update.actor_id, byte);
            }
        } else if key == self.keys.boost_replicated {
            if let boxcars::Attribute::ReplicatedBoost(boost) = &update.attribute {
                self.on_boost_byte(update.actor_id, boost.boost_amount);
            }
        } else if key == self.keys.component_active {
            if let boxcars::Attribute::Byte(active) = update.attribute {
                if let Some(state) = self.boost_components.get_mut(&update.actor_id) {
                    state.active = active % 2 == 1;
                }
            }
        } else if key == self.keys.demolish {
            if let boxcars::Attribute::Demolish(demolish) = &update.attribute {
                self.mark_demolished(demolish.victim);
            }
        } else if key == self.keys.pickup || key == self.keys.pickup_new {
            self.on_pickup_attribute(update, time, index);
        } else if key == self.keys.team_paint {
            if let boxcars::Attribute::TeamPaint(paint) = &update.attribute {
                // Fallback team source when the PRI->team link never
                // resolves (LAN replays).
                if let Some(pri) = self.car_to_pri.get(&update.actor_id) {
                    if let Some(slot) = self.pri_to_slot.get(pri) {
                        self.slots[slot.0].team.get_or_insert(paint.team.min(1));
                    }
                }
            }
        }
    }

    fn on_boost_byte(&mut self, component: boxcars::ActorId, byte: u8) {
        // Replicated values only arrive on change; the active-burn decay in
        // `emit_frame` carries the value between updates.
        let state = self
            .boost_components
            .entry(component)
            .or_insert(BoostComponentState {
                value: 0.0,
                active: false,
            });
        state.value = byte_to_boost(byte);
    }

    fn on_pickup_attribute(&mut self, update: &boxcars::UpdatedAttribute, time: f32, index: usize) {
        let (instigator, picked_up) = match &update.attribute {
            boxcars::Attribute::Pickup(pickup) => (pickup.instigator, pickup.picked_up),
            boxcars::Attribute::PickupNew(pickup) => (pickup.instigator, pickup.picked_up != 0),
            _ => return,
        };
        let status = if picked_up {
            PadEventStatus::Collected
        } else {
            PadEventStatus::Respawned
        };
        // Instigator is the collecting car; resolve through the owner chain.
        let slot = instigator.and_then(|car| self.slot_for_car(&car));
        // Late position: some streams replicate the pad location only
        // through its actor state, never the spawn trajectory.
        if let Some(position) = self
            .modeler
            .state(&update.actor_id)
            .and_then(|s| s.initial_location)
        {
            self.registry.set_position(update.actor_id, position);
        }
        self.registry
            .on_pickup(update.actor_id, status, slot, time, index);
    }

    fn mark_demolished(&mut self, victim_car: boxcars::ActorId) {
        if let Some(slot) = self.slot_for_car(&victim_car) {
            self.demolished.insert(slot, true);
        }
    }

    fn slot_for_car(&self, car: &boxcars::ActorId) -> Option<PlayerSlot> {
        self.car_to_pri
            .get(car)
            .and_then(|pri| self.pri_to_slot.get(pri))
            .copied()
    }

    fn is_car(&self, actor_id: &boxcars::ActorId) -> bool {
        self.modeler
            .state(actor_id)
            .map(|s| self.resolver.classify(s.object_id) == ActorClass::Car)
            .unwrap_or(false)
    }

    fn resolve_team(&self, slot: PlayerSlot) -> Option<u8> {
        if let Some(team_actor) = self.slot_team_actor.get(&slot) {
            if let Some(team) = self.teams.get(team_actor) {
                return Some(*team);
            }
        }
        self.slots[slot.0].team
    }

    fn rigid_body(&self, actor_id: &boxcars::ActorId) -> Option<RbSnapshot> {
        let key = self.keys.rigid_body?;
        match self.modeler.state(actor_id)?.attribute(key)? {
            boxcars::Attribute::RigidBody(rb) => Some(RbSnapshot {
                sleeping: rb.sleeping,
                position: vector_to_vec3(&rb.location),
                velocity: rb
                    .linear_velocity
                    .as_ref()
                    .map(vector_to_vec3)
                    .unwrap_or(Vec3::ZERO),
                angular_velocity: rb
                    .angular_velocity
                    .as_ref()
                    .map(vector_to_vec3)
                    .unwrap_or(Vec3::ZERO),
                quat: [
                    rb.rotation.x,
                    rb.rotation.y,
                    rb.rotation.z,
                    rb.rotation.w,
                ],
            }),
            _ => None,
        }
    }

    fn boost_for_car(&self, car: &boxcars::ActorId) -> Option<f32> {
        self.boost_components
            .iter()
            .find(|(component, _)| self.component_to_car.get(component) == Some(car))
            .map(|(_, state)| state.value)
    }

    fn emit_frame(&mut self, frame: &boxcars::Frame, _index: usize) {
        // Boost burn between replicated values, per component.
        for state in self.boost_components.values_mut() {
            if state.active {
                state.value = (state.value - frame.delta * BOOST_USED_PER_SECOND).max(0.0);
            }
        }

        let ball = match self.ball_actor.as_ref().and_then(|id| self.rigid_body(id)) {
            Some(rb) if !rb.sleeping => BallFrame {
                position: rb.position,
                velocity: rb.velocity,
                angular_velocity: rb.angular_velocity,
            },
            Some(_) => self.last_ball,
            None => {
                self.diagnostics.count_missing(RIGID_BODY_STATE_KEY);
                self.last_ball
            }
        };
        self.last_ball = ball;

        let mut players = Vec::with_capacity(self.slots.len());
        let slot_count = self.slots.len();
        for index in 0..slot_count {
            let slot = PlayerSlot(index);
            let Some(team) = self.resolve_team(slot) else {
                continue;
            };
            let pri = self.slot_pri[index];
            let car = self.pri_to_car.get(&pri).copied();
            let demolished = self.demolished.get(&slot).copied().unwrap_or(false);

            let player = match car.as_ref().and_then(|c| self.rigid_body(c)) {
                Some(rb) => {
                    let (velocity, clamped) = clamp_velocity(rb.velocity);
                    if clamped {
                        self.diagnostics.clamped_velocity_count += 1;
                    }
                    let (rotation, approximated) = rotation_from(rb.quat, velocity);
                    let meta = &mut self.slots[index];
                    meta.rotation_samples += 1;
                    if approximated {
                        meta.rotation_approximated += 1;
                    }
                    let boost_amount = match car.as_ref().and_then(|c| self.boost_for_car(c)) {
                        Some(value) => value,
                        None => {
                            self.diagnostics.count_missing(BOOST_AMOUNT_KEY);
                            self.last_player
                                .get(&slot)
                                .map(|p| p.boost_amount)
                                .unwrap_or(0.0)
                        }
                    };
                    PlayerFrame {
                        slot,
                        team,
                        position: rb.position,
                        velocity,
                        rotation,
                        rotation_approximated: approximated,
                        boost_amount: boost_amount.clamp(0.0, 100.0),
                        is_supersonic: velocity.length() >= SUPERSONIC_SPEED_UU,
                        is_on_ground: rb.position.z <= ON_GROUND_MAX_Z,
                        is_demolished: demolished,
                    }
                }
                None => {
                    // Between demolition and respawn the car actor is gone;
                    // carry the last known state with the demolished flag.
                    let Some(last) = self.last_player.get(&slot) else {
                        continue;
                    };
                    let mut carried = last.clone();
                    carried.velocity = Vec3::ZERO;
                    carried.is_supersonic = false;
                    carried.is_demolished = demolished;
                    carried
                }
            };
            self.last_player.insert(slot, player.clone());
            players.push(player);
        }

        self.frames.push(Frame {
            timestamp_s: frame.time,
            ball,
            players,
        });
    }

    fn finish(mut self) -> RlcoachResult<NetworkData> {
        self.attach_camera_settings();

        let total_samples: u64 = self.slots.iter().map(|s| s.rotation_samples).sum();
        let total_approx: u64 = self.slots.iter().map(|s| s.rotation_approximated).sum();
        self.diagnostics.rotation_approximated_ratio = if total_samples == 0 {
            0.0
        } else {
            total_approx as f64 / total_samples as f64
        };
        self.diagnostics.pad_coverage_ratio = self.registry.coverage_ratio();
        self.diagnostics.instigator_resolution_ratio = self.registry.instigator_resolution_ratio();
        self.diagnostics.missing_instigator_count = self.registry.missing_instigator_count();

        let usable = self.frames.iter().any(|f| !f.players.is_empty());
        self.diagnostics.status = if self.frames.is_empty() || !usable {
            ParserStatus::Unavailable
        } else if self.diagnostics.rotation_approximated_ratio > ROTATION_APPROXIMATED_WARN_RATIO
            || self.diagnostics.pad_coverage_ratio < PAD_COVERAGE_WARN_RATIO
        {
            ParserStatus::Degraded
        } else {
            ParserStatus::Ok
        };

        if self.diagnostics.status == ParserStatus::Unavailable {
            return Err(RlcoachError::NetworkDataUnavailable {
                details: "network stream decoded to no usable player frames".into(),
            });
        }

        Ok(NetworkData {
            frames: self.frames,
            pad_events: self.registry.into_events(),
            roster: self.slots,
            measured_hz: None,
            diagnostics: self.diagnostics,
        })
    }

    /// Camera settings actors link to a PRI; resolve the pairs once at the
    /// end of the parse.
    fn attach_camera_settings(&mut self) {
        let (Some(cam_key), Some(pri_key)) = (self.keys.cam_settings, self.keys.camera_pri) else {
            return;
        };
        let mut found: Vec<(PlayerSlot, CameraSettings)> = Vec::new();
        for state in self.modeler.actor_states.values() {
            let Some(boxcars::Attribute::CamSettings(settings)) = state.attribute(cam_key) else {
                continue;
            };
            let Some(boxcars::Attribute::ActiveActor(pri)) = state.attribute(pri_key) else {
                continue;
            };
            if let Some(slot) = self.pri_to_slot.get(&pri.actor) {
                found.push((
                    *slot,
                    CameraSettings {
                        fov: settings.fov,
                        height: settings.height,
                        angle: settings.angle,
                        distance: settings.distance,
                        stiffness: settings.stiffness,
                        swivel: settings.swivel,
                        transition: settings.transition.unwrap_or_default(),
                    },
                ));
            }
        }
        for (slot, camera) in found {
            self.slots[slot.0].camera = Some(camera);
        }
    }
}

fn vector_to_vec3(v: &boxcars::Vector3f) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Replicated boost bytes are on a 0..=255 scale.
fn byte_to_boost(byte: u8) -> f32 {
    byte as f32 / 255.0 * 100.0
}

/// Euler (pitch, yaw, roll) from the rigid body quaternion. A degenerate
/// quaternion falls back to the velocity direction, flagged as approximated.
fn rotation_from(quat: [f32; 4], velocity: Vec3) -> (Vec3, bool) {
    let q = glam::Quat::from_xyzw(quat[0], quat[1], quat[2], quat[3]);
    if (q.length() - 1.0).abs() <= 0.1 {
        let (yaw, pitch, roll) = q.normalize().to_euler(glam::EulerRot::ZYX);
        (Vec3::new(pitch, yaw, roll), false)
    } else {
        let v = velocity.to_glam();
        let yaw = if v.length() > f32::EPSILON {
            v.y.atan2(v.x)
        } else {
            0.0
        };
        (Vec3::new(0.0, yaw, 0.0), true)
    }
}

/// Canonical `<platform>:<id>` from a replicated remote id, mirroring the
/// header-side platform naming.
pub fn canonical_platform_id(remote_id: &boxcars::RemoteId) -> Option<String> {
    match remote_id {
        boxcars::RemoteId::Steam(id) => Some(format!("steam:{}", id)),
        boxcars::RemoteId::Epic(id) if !id.is_empty() => Some(format!("epic:{}", id)),
        boxcars::RemoteId::Xbox(id) => Some(format!("xbox:{}", id)),
        boxcars::RemoteId::PlayStation(ps4) => Some(format!("psn:{}", ps4.online_id)),
        boxcars::RemoteId::PsyNet(psy) => Some(format!("psn:{}", psy.online_id)),
        boxcars::RemoteId::Switch(switch) => Some(format!("switch:{}", switch.online_id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_bytes_scale_to_percent() {
        assert_eq!(byte_to_boost(0), 0.0);
        assert!((byte_to_boost(255) - 100.0).abs() < f32::EPSILON);
        assert!((byte_to_boost(128) - 50.196).abs() < 0.01);
    }

    #[test]
    fn steam_remote_ids_canonicalize() {
        let id = canonical_platform_id(&boxcars::RemoteId::Steam(76561198000000001));
        assert_eq!(id.as_deref(), Some("steam:76561198000000001"));
    }

    #[test]
    fn degenerate_quaternion_approximates_from_velocity() {
        let (rotation, approximated) =
            rotation_from([0.0, 0.0, 0.0, 0.0], Vec3::new(0.0, 1000.0, 0.0));
        assert!(approximated);
        assert!((rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn identity_quaternion_is_not_approximated() {
        let (rotation, approximated) =
            rotation_from([0.0, 0.0, 0.0, 1.0], Vec3::new(1000.0, 0.0, 0.0));
        assert!(!approximated);
        assert!(rotation.x.abs() < 1e-5 && rotation.y.abs() < 1e-5 && rotation.z.abs() < 1e-5);
    }
}
