//! Actor classification: resolve a stream object id to a canonical class
//! name, then classify through substring allow-lists. Archetype object names
//! are mapped onto their `TAGame` classes first; component actors are
//! explicitly excluded from the car set.

use std::collections::HashMap;

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Boost,
    Jump,
    DoubleJump,
    Dodge,
    FlipCar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorClass {
    Ball,
    Car,
    PlayerInfo,
    Team(u8),
    BoostPad,
    GameEvent,
    CarComponent(ComponentKind),
    Other,
}

/// Per-replay resolver from object ids to classes. Built once from the
/// decoder's object table and class index list.
pub struct ClassResolver {
    classes: Vec<ActorClass>,
    names: Vec<String>,
}

impl ClassResolver {
    pub fn new(objects: &[String], class_indices: &[boxcars::ClassIndex]) -> Self {
        let class_names: HashMap<i32, &str> = class_indices
            .iter()
            .map(|ci| (ci.index, ci.class.as_str()))
            .collect();

        let classes = objects
            .iter()
            .enumerate()
            .map(|(index, name)| {
                // An object listed in class_indices is already a class name;
                // anything else goes through the archetype mapping.
                let class_name = class_names
                    .get(&(index as i32))
                    .copied()
                    .unwrap_or_else(|| canonical_class_name(name));
                classify_class_name(class_name, name)
            })
            .collect();

        Self {
            classes,
            names: objects.to_vec(),
        }
    }

    pub fn classify(&self, object_id: boxcars::ObjectId) -> ActorClass {
        self.classes
            .get(object_id.0 as usize)
            .copied()
            .unwrap_or(ActorClass::Other)
    }

    pub fn object_name(&self, object_id: boxcars::ObjectId) -> Option<&str> {
        self.names.get(object_id.0 as usize).map(|s| s.as_str())
    }

    /// Object id for a named attribute key, if the replay replicates it.
    pub fn object_id_for(&self, name: &str) -> Option<boxcars::ObjectId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| boxcars::ObjectId(i as i32))
    }
}

fn canonical_class_name(object_name: &str) -> &str {
    if BALL_ARCHETYPES.contains(&object_name) {
        return "TAGame.Ball_TA";
    }
    if object_name == CAR_ARCHETYPE {
        return "TAGame.Car_TA";
    }
    if object_name == PLAYER_INFO_ARCHETYPE {
        return "TAGame.PRI_TA";
    }
    if object_name == BOOST_COMPONENT_ARCHETYPE {
        return "TAGame.CarComponent_Boost_TA";
    }
    if object_name == JUMP_COMPONENT_ARCHETYPE {
        return "TAGame.CarComponent_Jump_TA";
    }
    if object_name == DOUBLE_JUMP_COMPONENT_ARCHETYPE {
        return "TAGame.CarComponent_DoubleJump_TA";
    }
    if object_name == DODGE_COMPONENT_ARCHETYPE {
        return "TAGame.CarComponent_Dodge_TA";
    }
    if object_name == FLIP_CAR_COMPONENT_ARCHETYPE {
        return "TAGame.CarComponent_FlipCar_TA";
    }
    if object_name.contains(PAD_ACTOR_SUBSTRING) {
        return "TAGame.VehiclePickup_Boost_TA";
    }
    if object_name.starts_with("Archetypes.GameEvent.") {
        return "TAGame.GameEvent_Soccar_TA";
    }
    object_name
}

fn classify_class_name(class_name: &str, object_name: &str) -> ActorClass {
    // Components first: `CarComponent_*` must never classify as a car even
    // though it matches the car substrings.
    if class_name.contains(CAR_CLASS_EXCLUDE_SUBSTRING) {
        let kind = if class_name.contains("Boost") {
            ComponentKind::Boost
        } else if class_name.contains("DoubleJump") {
            ComponentKind::DoubleJump
        } else if class_name.contains("Dodge") {
            ComponentKind::Dodge
        } else if class_name.contains("FlipCar") {
            ComponentKind::FlipCar
        } else {
            ComponentKind::Jump
        };
        return ActorClass::CarComponent(kind);
    }
    if class_name.contains("VehiclePickup_Boost") {
        return ActorClass::BoostPad;
    }
    if BALL_CLASS_SUBSTRINGS.iter().any(|s| class_name.contains(s)) {
        return ActorClass::Ball;
    }
    if CAR_CLASS_SUBSTRINGS.iter().any(|s| class_name.contains(s)) {
        return ActorClass::Car;
    }
    if class_name.contains("PRI_TA") {
        return ActorClass::PlayerInfo;
    }
    if class_name.contains("Team_TA") || class_name.contains("Team_Soccar_TA") {
        // Which team is only visible on the archetype name.
        return if object_name == TEAM_ONE_ARCHETYPE || object_name.ends_with("Team1") {
            ActorClass::Team(1)
        } else {
            ActorClass::Team(0)
        };
    }
    if object_name == TEAM_ZERO_ARCHETYPE {
        return ActorClass::Team(0);
    }
    if object_name == TEAM_ONE_ARCHETYPE {
        return ActorClass::Team(1);
    }
    if class_name.contains("GameEvent") {
        return ActorClass::GameEvent;
    }
    ActorClass::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(objects: &[&str]) -> ClassResolver {
        let objects: Vec<String> = objects.iter().map(|s| s.to_string()).collect();
        ClassResolver::new(&objects, &[])
    }

    #[test]
    fn ball_archetypes_classify_as_ball() {
        let r = resolver(&BALL_ARCHETYPES);
        for i in 0..BALL_ARCHETYPES.len() {
            assert_eq!(r.classify(boxcars::ObjectId(i as i32)), ActorClass::Ball);
        }
    }

    #[test]
    fn car_components_are_never_cars() {
        let r = resolver(&[
            CAR_ARCHETYPE,
            BOOST_COMPONENT_ARCHETYPE,
            DODGE_COMPONENT_ARCHETYPE,
        ]);
        assert_eq!(r.classify(boxcars::ObjectId(0)), ActorClass::Car);
        assert_eq!(
            r.classify(boxcars::ObjectId(1)),
            ActorClass::CarComponent(ComponentKind::Boost)
        );
        assert_eq!(
            r.classify(boxcars::ObjectId(2)),
            ActorClass::CarComponent(ComponentKind::Dodge)
        );
    }

    #[test]
    fn pad_actors_classify_by_substring() {
        let r = resolver(&["TheWorld:PersistentLevel.VehiclePickup_Boost_TA_31"]);
        assert_eq!(r.classify(boxcars::ObjectId(0)), ActorClass::BoostPad);
    }

    #[test]
    fn teams_resolve_their_index() {
        let r = resolver(&[TEAM_ZERO_ARCHETYPE, TEAM_ONE_ARCHETYPE]);
        assert_eq!(r.classify(boxcars::ObjectId(0)), ActorClass::Team(0));
        assert_eq!(r.classify(boxcars::ObjectId(1)), ActorClass::Team(1));
    }

    #[test]
    fn class_indices_override_archetype_mapping() {
        let objects: Vec<String> = vec!["TAGame.Vehicle_TA".to_string()];
        let class_indices = vec![boxcars::ClassIndex {
            class: "TAGame.Vehicle_TA".to_string(),
            index: 0,
        }];
        let r = ClassResolver::new(&objects, &class_indices);
        assert_eq!(r.classify(boxcars::ObjectId(0)), ActorClass::Car);
    }

    #[test]
    fn unknown_objects_are_other() {
        let r = resolver(&["Engine.GameReplicationInfo"]);
        assert_eq!(r.classify(boxcars::ObjectId(0)), ActorClass::Other);
        assert_eq!(r.classify(boxcars::ObjectId(99)), ActorClass::Other);
    }
}
