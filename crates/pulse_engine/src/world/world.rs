//! Actor storage and deterministic tick dispatch

use slotmap::SlotMap;

use crate::character::Character;
use crate::input::InputState;
use crate::render::swap_context::{CameraRenderData, RenderObject, RenderSwapData};
use crate::world::actor::Actor;
use crate::world::component::Component;
use crate::world::components::{AnimationComponent, CameraComponent, TransformComponent};
use crate::world::definition::{ActorDefinition, WorldDefinition};
use crate::world::property::{BindingError, PropertyAccess, PropertyValue};
use crate::world::ActorId;

/// The authoritative simulation state
///
/// Actors live in a slotmap so their ids stay stable and despawned ids
/// resolve to nothing. A separate creation-order list fixes the tick order:
/// actors tick in the order they were spawned, regardless of what has been
/// despawned in between.
#[derive(Default)]
pub struct World {
    actors: SlotMap<ActorId, Actor>,
    tick_order: Vec<ActorId>,
    character: Option<Character>,
    frame_index: u64,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an actor with the given components attached in order
    ///
    /// Resource binding runs once for every component before this returns.
    /// Components that fail to bind are disabled and logged; the actor is
    /// spawned either way.
    pub fn spawn(&mut self, name: impl Into<String>, components: Vec<Box<dyn Component>>) -> ActorId {
        let name = name.into();
        let id = self.actors.insert_with_key(|id| Actor::new(id, name));
        let actor = &mut self.actors[id];
        for component in components {
            actor.attach(component);
        }
        actor.post_load_all();
        self.tick_order.push(id);
        id
    }

    /// Spawn an actor described by a serde definition
    pub fn spawn_from_definition(&mut self, definition: &ActorDefinition) -> ActorId {
        let components = definition
            .components
            .iter()
            .map(|component| component.clone().into_component())
            .collect();
        self.spawn(definition.name.clone(), components)
    }

    /// Spawn every actor of a world definition, in definition order
    pub fn load_definition(&mut self, definition: &WorldDefinition) -> Vec<ActorId> {
        definition
            .actors
            .iter()
            .map(|actor| self.spawn_from_definition(actor))
            .collect()
    }

    /// Remove an actor and drop its components
    ///
    /// Returns `false` when the id was already dead. The remaining actors
    /// keep their relative tick order.
    pub fn despawn(&mut self, id: ActorId) -> bool {
        if self.actors.remove(id).is_some() {
            self.tick_order.retain(|other| *other != id);
            true
        } else {
            false
        }
    }

    /// Resolve an id to its actor, if still alive
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Resolve an id to its actor mutably, if still alive
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// First actor with the given name, in creation order
    pub fn find_actor(&self, name: &str) -> Option<ActorId> {
        self.tick_order
            .iter()
            .copied()
            .find(|id| self.actors.get(*id).is_some_and(|actor| actor.name() == name))
    }

    /// Number of live actors
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Hand the world a character controller to tick after the actors
    ///
    /// The controller adopts its actor's current transform as the starting
    /// pose.
    pub fn bind_character(&mut self, mut character: Character) {
        character.sync_from_object(self);
        self.character = Some(character);
    }

    /// The bound character controller, if any
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    /// The bound character controller mutably, if any
    pub fn character_mut(&mut self) -> Option<&mut Character> {
        self.character.as_mut()
    }

    /// Logical frames ticked so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advance the simulation by one logical tick
    ///
    /// Order: every live actor in creation order, then the character
    /// controller, then the controller's staged rotation commits. Rotation
    /// writes staged during this tick become visible only after the commit,
    /// so nothing ticking in the same pass observes a half-applied facing.
    pub fn tick(&mut self, delta_time: f32, input: &InputState) {
        self.frame_index += 1;
        for id in &self.tick_order {
            if let Some(actor) = self.actors.get_mut(*id) {
                actor.tick(delta_time);
            }
        }
        if let Some(mut character) = self.character.take() {
            character.tick(delta_time, self, input);
            character.commit_staged_rotation(self);
            self.character = Some(character);
        }
    }

    /// Capture the render-visible view of the world into `out`
    ///
    /// Every actor with an enabled transform contributes an object, in tick
    /// order, together with its evaluated pose when it animates. The first
    /// enabled camera in tick order provides the frame's camera data.
    pub fn gather_render_data(&self, out: &mut RenderSwapData) {
        out.clear();
        out.frame_index = self.frame_index;
        for id in &self.tick_order {
            let Some(actor) = self.actors.get(*id) else {
                continue;
            };
            if let Some(transform) = actor.component::<TransformComponent>() {
                out.objects.push(RenderObject {
                    actor: *id,
                    transform: transform.transform().clone(),
                    pose: actor
                        .component::<AnimationComponent>()
                        .map(|animation| animation.result().clone()),
                });
            }
            if out.camera.is_none() {
                if let Some(camera) = actor.component::<CameraComponent>() {
                    let view = camera.view();
                    out.camera = Some(CameraRenderData {
                        position: view.position,
                        rotation: view.rotation,
                        mode: camera.mode(),
                        fov_degrees: camera.fov_degrees(),
                    });
                }
            }
        }
    }

    /// Read a property on a live actor by `component.property` path
    pub fn property(&self, actor: ActorId, path: &str) -> Result<PropertyValue, BindingError> {
        self.actors
            .get(actor)
            .ok_or(BindingError::DeadActor)?
            .get(path)
    }

    /// Write a property on a live actor by `component.property` path
    pub fn set_property(
        &mut self,
        actor: ActorId,
        path: &str,
        value: PropertyValue,
    ) -> Result<(), BindingError> {
        self.actors
            .get_mut(actor)
            .ok_or(BindingError::DeadActor)?
            .set(path, value)
    }

    /// Invoke a method on a live actor by `component.method` path
    pub fn invoke(&mut self, actor: ActorId, path: &str) -> Result<(), BindingError> {
        self.actors
            .get_mut(actor)
            .ok_or(BindingError::DeadActor)?
            .invoke(path)
    }
}
