//! Pad actor bookkeeping. Pickup notifications can arrive before the pad's
//! position is known; they are buffered per actor and flushed once the pad
//! snaps onto the canonical table.

use std::collections::HashMap;

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::DEBUG_BOOST_EVENTS_ENV;
use crate::field::{self, PadSide};
use crate::frame::{PlayerSlot, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PadEventStatus {
    Collected,
    Respawned,
    Unknown,
}

/// A pad state transition observed in the network stream, already snapped
/// onto the canonical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostPadEvent {
    pub pad_id: u8,
    pub status: PadEventStatus,
    pub actor_id: i32,
    /// Resolved collector, when the instigator chain resolved.
    pub slot: Option<PlayerSlot>,
    pub is_big: bool,
    pub pad_side: PadSide,
    pub snap_error_uu: f32,
    pub timestamp_s: f32,
    pub frame: usize,
}

#[derive(Debug, Clone)]
struct PendingPickup {
    status: PadEventStatus,
    slot: Option<PlayerSlot>,
    timestamp_s: f32,
    frame: usize,
}

#[derive(Debug, Default)]
struct PadActor {
    snapped: Option<(u8, f32)>,
    position_known: bool,
    pending: Vec<PendingPickup>,
}

#[derive(Debug, Default)]
pub struct PadRegistry {
    pads: HashMap<boxcars::ActorId, PadActor>,
    events: Vec<BoostPadEvent>,
    observed_pads: u64,
    snapped_pads: u64,
    collected_events: u64,
    attributed_events: u64,
    missing_instigators: u64,
    debug_events: bool,
}

impl PadRegistry {
    pub fn new() -> Self {
        Self {
            debug_events: std::env::var(DEBUG_BOOST_EVENTS_ENV).map_or(false, |v| v == "1"),
            ..Self::default()
        }
    }

    /// Declare a pad actor. Position may be absent at declaration time.
    pub fn register(&mut self, actor_id: boxcars::ActorId, position: Option<Vec3>) {
        if self.pads.contains_key(&actor_id) {
            return;
        }
        self.observed_pads += 1;
        let mut pad = PadActor::default();
        if let Some(position) = position {
            pad.snapped = field::snap_to_pad(position);
            pad.position_known = true;
            if pad.snapped.is_some() {
                self.snapped_pads += 1;
            }
        }
        self.pads.insert(actor_id, pad);
    }

    /// Late position information for an already-declared pad. Flushes any
    /// buffered pickups.
    pub fn set_position(&mut self, actor_id: boxcars::ActorId, position: Vec3) {
        let Some(pad) = self.pads.get_mut(&actor_id) else {
            return;
        };
        if pad.position_known {
            return;
        }
        pad.position_known = true;
        pad.snapped = field::snap_to_pad(position);
        if pad.snapped.is_some() {
            self.snapped_pads += 1;
        }
        let pending = std::mem::take(&mut pad.pending);
        let snapped = pad.snapped;
        for p in pending {
            self.emit(actor_id, snapped, p);
        }
    }

    /// A pickup-state notification for the pad actor. `slot` is the
    /// instigator resolved through the component-owner chain, when that
    /// chain resolved.
    pub fn on_pickup(
        &mut self,
        actor_id: boxcars::ActorId,
        status: PadEventStatus,
        slot: Option<PlayerSlot>,
        timestamp_s: f32,
        frame: usize,
    ) {
        // A pickup for an undeclared actor still creates a record so the
        // position can attach later.
        if !self.pads.contains_key(&actor_id) {
            self.register(actor_id, None);
        }
        let pending = PendingPickup {
            status,
            slot,
            timestamp_s,
            frame,
        };
        let pad = self.pads.get_mut(&actor_id).expect("registered above");
        if pad.position_known {
            let snapped = pad.snapped;
            self.emit(actor_id, snapped, pending);
        } else {
            debug!(
                "buffering pickup for pad actor {:?} with unknown position",
                actor_id
            );
            pad.pending.push(pending);
        }
    }

    fn emit(
        &mut self,
        actor_id: boxcars::ActorId,
        snapped: Option<(u8, f32)>,
        pickup: PendingPickup,
    ) {
        // A pad that never resolves against the canonical table emits
        // nothing; the coverage ratio records the gap.
        let Some((pad_id, snap_error_uu)) = snapped else {
            return;
        };
        let pad = field::pad_by_id(pad_id).expect("snapped ids are canonical");

        if pickup.status == PadEventStatus::Collected {
            self.collected_events += 1;
            if pickup.slot.is_some() {
                self.attributed_events += 1;
            } else {
                self.missing_instigators += 1;
            }
        }

        let event = BoostPadEvent {
            pad_id,
            status: pickup.status,
            actor_id: actor_id.0,
            slot: pickup.slot,
            is_big: pad.is_big,
            pad_side: pad.side,
            snap_error_uu,
            timestamp_s: pickup.timestamp_s,
            frame: pickup.frame,
        };
        if self.debug_events {
            info!("pad event {:?}", event);
        } else {
            debug!("pad event {:?}", event);
        }
        self.events.push(event);
    }

    pub fn coverage_ratio(&self) -> f64 {
        if self.observed_pads == 0 {
            1.0
        } else {
            self.snapped_pads as f64 / self.observed_pads as f64
        }
    }

    pub fn instigator_resolution_ratio(&self) -> f64 {
        if self.collected_events == 0 {
            1.0
        } else {
            self.attributed_events as f64 / self.collected_events as f64
        }
    }

    pub fn missing_instigator_count(&self) -> u64 {
        self.missing_instigators
    }

    pub fn into_events(mut self) -> Vec<BoostPadEvent> {
        // Buffered pickups whose pad never produced a position are dropped
        // with the registry; their pads already depress the coverage ratio.
        self.events
            .sort_by(|a, b| (a.frame, a.pad_id).cmp(&(b.frame, b.pad_id)));
        self.events
    }
}
