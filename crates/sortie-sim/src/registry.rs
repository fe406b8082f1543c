//! Unit registry: id-addressed access to the hecs world.
//!
//! Ids are issued sequentially and never reused. All iteration goes through
//! ordered maps so every pass visits units in the same order on every peer.

use std::collections::{BTreeMap, BTreeSet};

use hecs::{Entity, EntityBuilder, World};

use sortie_core::components::*;
use sortie_core::enums::UnitType;
use sortie_core::types::{Kinematics, UnitId};

use crate::world_setup::Blueprint;

/// Copyable read view of the data every spatial query needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitView {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub allegiance: Allegiance,
    pub status: Status,
    pub kinematics: Kinematics,
    pub heading: Heading,
}

/// Read access the collision engine and target locator depend on.
pub trait UnitLookup {
    /// `None` for stale ids.
    fn unit(&self, id: UnitId) -> Option<UnitView>;

    /// Ids of every registered unit of a type, ascending.
    fn ids_of_type(&self, unit_type: UnitType) -> Vec<UnitId>;
}

/// Owns the ECS world and the id index.
#[derive(Default)]
pub struct Registry {
    world: World,
    entities: BTreeMap<UnitId, Entity>,
    by_type: BTreeMap<UnitType, BTreeSet<UnitId>>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a unit from a blueprint and return its id.
    pub fn spawn(&mut self, blueprint: Blueprint) -> UnitId {
        self.next_id += 1;
        let id = UnitId(self.next_id);

        let mut builder = EntityBuilder::new();
        builder.add(id);
        builder.add(blueprint.unit_type);
        builder.add(blueprint.allegiance);
        builder.add(blueprint.status);
        builder.add(blueprint.kinematics);
        builder.add(blueprint.heading);
        builder.add(blueprint.energy);
        if let Some(resources) = blueprint.resources {
            builder.add(resources);
        }
        if let Some(spec) = blueprint.collision {
            builder.add(spec);
        }
        if let Some(lifetime) = blueprint.lifetime {
            builder.add(lifetime);
        }
        if let Some(owner) = blueprint.owner {
            builder.add(owner);
        }
        if blueprint.ai {
            builder.add(AiControlled);
            builder.add(AiState::default());
            builder.add(Cooldowns::default());
        }

        let entity = self.world.spawn(builder.build());
        self.entities.insert(id, entity);
        self.by_type.entry(blueprint.unit_type).or_default().insert(id);
        id
    }

    /// Remove a unit entirely. Returns false for stale ids.
    pub fn despawn(&mut self, id: UnitId) -> bool {
        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        if let Ok(unit_type) = self.world.get::<&UnitType>(entity).map(|t| *t) {
            if let Some(ids) = self.by_type.get_mut(&unit_type) {
                ids.remove(&id);
            }
        }
        let _ = self.world.despawn(entity);
        true
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.component::<Status>(id).is_some_and(|s| s.alive)
    }

    /// Every registered id, ascending.
    pub fn ids(&self) -> Vec<UnitId> {
        self.entities.keys().copied().collect()
    }

    /// Ids carrying component `C`, ascending.
    pub fn ids_with<C: hecs::Component>(&self) -> Vec<UnitId> {
        self.entities
            .iter()
            .filter(|(_, &entity)| self.world.satisfies::<&C>(entity).unwrap_or(false))
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Copy of a component.
    pub fn component<C: hecs::Component + Copy>(&self, id: UnitId) -> Option<C> {
        let entity = *self.entities.get(&id)?;
        self.world.get::<&C>(entity).ok().map(|c| *c)
    }

    /// Shared borrow of a component.
    pub fn get<C: hecs::Component>(&self, id: UnitId) -> Option<hecs::Ref<'_, C>> {
        let entity = *self.entities.get(&id)?;
        self.world.get::<&C>(entity).ok()
    }

    /// Exclusive borrow of a component.
    pub fn get_mut<C: hecs::Component>(&self, id: UnitId) -> Option<hecs::RefMut<'_, C>> {
        let entity = *self.entities.get(&id)?;
        self.world.get::<&mut C>(entity).ok()
    }

    /// Overwrite a component that the unit already has. Returns false if the
    /// unit is stale or lacks the component.
    pub fn set<C: hecs::Component>(&self, id: UnitId, value: C) -> bool {
        match self.get_mut::<C>(id) {
            Some(mut slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Move a component out, leaving its default in place.
    pub fn take<C: hecs::Component + Default>(&self, id: UnitId) -> Option<C> {
        self.get_mut::<C>(id).map(|mut slot| std::mem::take(&mut *slot))
    }

    /// Attach a component, replacing any existing one.
    pub fn insert<C: hecs::Component>(&mut self, id: UnitId, value: C) -> bool {
        match self.entities.get(&id) {
            Some(&entity) => self.world.insert_one(entity, value).is_ok(),
            None => false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl UnitLookup for Registry {
    fn unit(&self, id: UnitId) -> Option<UnitView> {
        let entity = *self.entities.get(&id)?;
        let mut query = self
            .world
            .query_one::<(&UnitType, &Allegiance, &Status, &Kinematics, &Heading)>(entity)
            .ok()?;
        let (unit_type, allegiance, status, kinematics, heading) = query.get()?;
        Some(UnitView {
            id,
            unit_type: *unit_type,
            allegiance: *allegiance,
            status: *status,
            kinematics: *kinematics,
            heading: *heading,
        })
    }

    fn ids_of_type(&self, unit_type: UnitType) -> Vec<UnitId> {
        self.by_type
            .get(&unit_type)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}
