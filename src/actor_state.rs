//! An arena of actor records keyed by the stream's small integer ids. Actors
//! reference each other through lookup tables rather than pointers; the
//! arena lives exactly as long as one parse call.

use std::collections::HashMap;

use crate::frame::Vec3;

#[derive(Debug, Clone)]
pub struct ActorState {
    /// Latest value per attribute object id, with the frame it arrived in.
    pub attributes: HashMap<boxcars::ObjectId, (boxcars::Attribute, usize)>,
    pub object_id: boxcars::ObjectId,
    pub name_id: Option<i32>,
    pub spawned_frame: usize,
    /// Spawn location from the new-actor trajectory, when present. Boost
    /// pads rely on this; cars replicate rigid bodies instead.
    pub initial_location: Option<Vec3>,
}

impl ActorState {
    fn new(new_actor: &boxcars::NewActor, frame_index: usize) -> Self {
        Self {
            attributes: HashMap::new(),
            object_id: new_actor.object_id,
            name_id: new_actor.name_id,
            spawned_frame: frame_index,
            initial_location: new_actor
                .initial_trajectory
                .location
                .map(|l| Vec3::new(l.x as f32, l.y as f32, l.z as f32)),
        }
    }

    fn update_attribute(&mut self, update: &boxcars::UpdatedAttribute, frame_index: usize) {
        self.attributes
            .insert(update.object_id, (update.attribute.clone(), frame_index));
    }

    pub fn attribute(&self, object_id: boxcars::ObjectId) -> Option<&boxcars::Attribute> {
        self.attributes.get(&object_id).map(|(attr, _)| attr)
    }
}

/// Models the live actor set across frames. Degraded streams reference
/// actors that were never declared or delete them twice; those are counted,
/// not fatal.
#[derive(Debug, Default)]
pub struct ActorStateModeler {
    pub actor_states: HashMap<boxcars::ActorId, ActorState>,
    pub actor_ids_by_object: HashMap<boxcars::ObjectId, Vec<boxcars::ActorId>>,
    pub orphan_update_count: u64,
    pub orphan_delete_count: u64,
}

impl ActorStateModeler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_frame(&mut self, frame: &boxcars::Frame, frame_index: usize) {
        for actor_id in frame.deleted_actors.iter() {
            self.delete_actor(actor_id);
        }
        for new_actor in frame.new_actors.iter() {
            self.new_actor(new_actor, frame_index);
        }
        for update in frame.updated_actors.iter() {
            self.update_attribute(update, frame_index);
        }
    }

    pub fn new_actor(&mut self, new_actor: &boxcars::NewActor, frame_index: usize) {
        // Streams reuse actor ids; a redeclaration under a different object
        // replaces the old record outright.
        if let Some(existing) = self.actor_states.get(&new_actor.actor_id) {
            if existing.object_id == new_actor.object_id {
                return;
            }
            let old_object = existing.object_id;
            if let Some(ids) = self.actor_ids_by_object.get_mut(&old_object) {
                ids.retain(|id| id != &new_actor.actor_id);
            }
        }
        self.actor_states
            .insert(new_actor.actor_id, ActorState::new(new_actor, frame_index));
        self.actor_ids_by_object
            .entry(new_actor.object_id)
            .or_default()
            .push(new_actor.actor_id);
    }

    pub fn update_attribute(&mut self, update: &boxcars::UpdatedAttribute, frame_index: usize) {
        match self.actor_states.get_mut(&update.actor_id) {
            Some(state) => state.update_attribute(update, frame_index),
            None => self.orphan_update_count += 1,
        }
    }

    pub fn delete_actor(&mut self, actor_id: &boxcars::ActorId) -> Option<ActorState> {
        match self.actor_states.remove(actor_id) {
            Some(state) => {
                if let Some(ids) = self.actor_ids_by_object.get_mut(&state.object_id) {
                    ids.retain(|id| id != actor_id);
                }
                Some(state)
            }
            None => {
                self.orphan_delete_count += 1;
                None
            }
        }
    }

    pub fn state(&self, actor_id: &boxcars::ActorId) -> Option<&ActorState> {
        self.actor_states.get(actor_id)
    }

    pub fn actor_ids_for_object(&self, object_id: &boxcars::ObjectId) -> &[boxcars::ActorId] {
        self.actor_ids_by_object
            .get(object_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
