//! Player character controller
//!
//! Drives one actor from game commands: movement in the facing frame, a
//! free-camera toggle that remembers and restores the camera's exact state,
//! and a staged rotation buffer. Facing changes go through the buffer and
//! commit only at the end of the logical tick, so everything ticking in the
//! same pass reads one consistent rotation.

use crate::foundation::math::{Quat, Vec3};
use crate::input::{GameCommand, InputState};
use crate::world::components::{CameraComponent, CameraMode, CameraState, TransformComponent};
use crate::world::{Actor, ActorId, World};

const DEFAULT_MOVE_SPEED: f32 = 2.5;
const SPRINT_FACTOR: f32 = 2.0;

/// Controller for the player-driven actor
///
/// The character owns the authoritative position of its actor while bound;
/// every movement writes through to the actor's transform. Rotation is
/// double-buffered: [`Character::set_rotation`] stages, the world commits
/// after the full tick pass.
pub struct Character {
    object: ActorId,
    position: Vec3,
    rotation: Quat,
    rotation_buffer: Quat,
    rotation_dirty: bool,
    original_camera: Option<CameraState>,
    is_free_camera: bool,
    move_speed: f32,
}

impl Character {
    /// Create a controller for the given actor
    pub fn new(object: ActorId) -> Self {
        Self {
            object,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            rotation_buffer: Quat::identity(),
            rotation_dirty: false,
            original_camera: None,
            is_free_camera: false,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }

    /// Override the walking speed in units per second
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    /// Actor this controller drives
    pub fn object(&self) -> ActorId {
        self.object
    }

    /// Committed position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the character; the next movement write carries it to the actor
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Committed rotation; staged writes are invisible here until commit
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Stage a new facing, applied at the end of the logical tick
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation_buffer = rotation;
        self.rotation_dirty = true;
    }

    /// Whether the free camera is currently active
    pub fn is_free_camera(&self) -> bool {
        self.is_free_camera
    }

    /// Walking speed in units per second
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Adopt the actor's current transform as the starting pose
    pub(crate) fn sync_from_object(&mut self, world: &World) {
        if let Some(actor) = world.actor(self.object) {
            if let Some(transform) = actor.component::<TransformComponent>() {
                self.position = transform.position();
                self.rotation = transform.rotation();
                self.rotation_buffer = self.rotation;
                self.rotation_dirty = false;
            }
        }
    }

    /// Apply one frame of input to the controlled actor
    ///
    /// A despawned actor id makes this a no-op until the controller is
    /// rebound. While the free camera is active the character stands still.
    pub(crate) fn tick(&mut self, delta_time: f32, world: &mut World, input: &InputState) {
        let Some(actor) = world.actor_mut(self.object) else {
            return;
        };

        if input.was_pressed(GameCommand::FREE_CAMERA) {
            self.toggle_free_camera(actor);
        }
        if self.is_free_camera {
            return;
        }

        let direction = movement_direction(input.command());
        if direction == Vec3::zeros() {
            return;
        }

        let speed = if input.is_down(GameCommand::SPRINT) {
            self.move_speed * SPRINT_FACTOR
        } else {
            self.move_speed
        };
        let world_direction = self.rotation * direction.normalize();
        self.position += world_direction * speed * delta_time;
        if let Some(transform) = actor.component_mut::<TransformComponent>() {
            transform.set_position(self.position);
        }

        let facing = Quat::rotation_between(&-Vec3::z(), &world_direction)
            .unwrap_or_else(|| Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI));
        self.set_rotation(facing);
    }

    /// Publish the staged rotation, if any, and sync the actor's transform
    pub(crate) fn commit_staged_rotation(&mut self, world: &mut World) {
        if !self.rotation_dirty {
            return;
        }
        self.rotation = self.rotation_buffer;
        self.rotation_dirty = false;
        if let Some(actor) = world.actor_mut(self.object) {
            if let Some(transform) = actor.component_mut::<TransformComponent>() {
                transform.set_rotation(self.rotation);
            }
        }
    }

    fn toggle_free_camera(&mut self, actor: &mut Actor) {
        let Some(camera) = actor.component_mut::<CameraComponent>() else {
            return;
        };
        if self.is_free_camera {
            if let Some(state) = self.original_camera.take() {
                camera.restore_state(state);
            }
            self.is_free_camera = false;
        } else {
            self.original_camera = Some(camera.snapshot_state());
            camera.set_mode(CameraMode::Free);
            self.is_free_camera = true;
        }
    }
}

/// Desired movement in the facing frame; forward is -Z
fn movement_direction(command: GameCommand) -> Vec3 {
    let mut direction = Vec3::zeros();
    if command.contains(GameCommand::FORWARD) {
        direction -= Vec3::z();
    }
    if command.contains(GameCommand::BACKWARD) {
        direction += Vec3::z();
    }
    if command.contains(GameCommand::LEFT) {
        direction -= Vec3::x();
    }
    if command.contains(GameCommand::RIGHT) {
        direction += Vec3::x();
    }
    direction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::input::{InputEvent, InputSystem, KeyCode};
    use approx::assert_relative_eq;

    fn world_with_character(components: Vec<Box<dyn crate::world::Component>>) -> (World, ActorId) {
        let mut world = World::new();
        let id = world.spawn("player", components);
        world.bind_character(Character::new(id));
        (world, id)
    }

    fn hold(system: &mut InputSystem, key: KeyCode) {
        system.handle_event(InputEvent::Key { key, pressed: true });
    }

    fn release(system: &mut InputSystem, key: KeyCode) {
        system.handle_event(InputEvent::Key { key, pressed: false });
    }

    #[test]
    fn staged_rotation_commits_at_the_end_of_the_tick() {
        let (mut world, id) = world_with_character(vec![Box::new(TransformComponent::default())]);
        let staged = Quat::from_axis_angle(&Vec3::y_axis(), 1.0);

        let character = world.character_mut().unwrap();
        character.set_rotation(staged);
        assert_relative_eq!(character.rotation().angle(), 0.0);

        // The commit point runs inside the world tick, after every actor.
        world.tick(0.016, &InputState::default());

        let character = world.character().unwrap();
        assert_relative_eq!(character.rotation().angle(), 1.0, epsilon = 1e-6);
        let transform = world.actor(id).unwrap().component::<TransformComponent>().unwrap();
        assert_relative_eq!(transform.rotation().angle(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn forward_command_moves_along_negative_z() {
        let (mut world, id) = world_with_character(vec![Box::new(TransformComponent::default())]);
        let mut input = InputSystem::new();
        hold(&mut input, KeyCode::W);

        world.tick(0.5, input.state());

        let expected = Vec3::new(0.0, 0.0, -DEFAULT_MOVE_SPEED * 0.5);
        assert_relative_eq!(world.character().unwrap().position(), expected, epsilon = 1e-6);
        let transform = world.actor(id).unwrap().component::<TransformComponent>().unwrap();
        assert_relative_eq!(transform.position(), expected, epsilon = 1e-6);
    }

    #[test]
    fn sprint_doubles_the_speed() {
        let (mut world, _) = world_with_character(vec![Box::new(TransformComponent::default())]);
        let mut input = InputSystem::new();
        hold(&mut input, KeyCode::W);
        hold(&mut input, KeyCode::LeftShift);

        world.tick(0.5, input.state());

        let expected = Vec3::new(0.0, 0.0, -DEFAULT_MOVE_SPEED * SPRINT_FACTOR * 0.5);
        assert_relative_eq!(world.character().unwrap().position(), expected, epsilon = 1e-6);
    }

    #[test]
    fn opposing_commands_cancel_out() {
        let (mut world, _) = world_with_character(vec![Box::new(TransformComponent::default())]);
        let mut input = InputSystem::new();
        hold(&mut input, KeyCode::W);
        hold(&mut input, KeyCode::S);

        world.tick(0.5, input.state());

        assert_relative_eq!(world.character().unwrap().position(), Vec3::zeros());
    }

    #[test]
    fn movement_turns_the_character_toward_its_direction() {
        let (mut world, _) = world_with_character(vec![Box::new(TransformComponent::default())]);
        let mut input = InputSystem::new();
        hold(&mut input, KeyCode::D);

        world.tick(0.016, input.state());

        // Facing +X now; committed by the end of the tick.
        let facing = world.character().unwrap().rotation();
        assert_relative_eq!(facing * -Vec3::z(), Vec3::x(), epsilon = 1e-6);
    }

    #[test]
    fn free_camera_toggle_restores_mode_and_blend_exactly() {
        let (mut world, id) = world_with_character(vec![
            Box::new(TransformComponent::default()),
            Box::new(CameraComponent::new(CameraMode::ThirdPerson)),
        ]);
        let mut input = InputSystem::new();

        // Kick off a blend and advance it partway so the saved state is
        // mid-transition, not a settled default.
        world
            .actor_mut(id)
            .unwrap()
            .component_mut::<CameraComponent>()
            .unwrap()
            .set_mode(CameraMode::FirstPerson);
        world.tick(0.1, input.state());

        let saved = world
            .actor(id)
            .unwrap()
            .component::<CameraComponent>()
            .unwrap()
            .snapshot_state();
        assert!(!saved.blend.is_complete());

        // Toggle on a zero-length frame: the camera's own tick then leaves
        // the blend where the snapshot above observed it.
        hold(&mut input, KeyCode::F);
        world.tick(0.0, input.state());
        input.tick();
        release(&mut input, KeyCode::F);

        let camera_mode = world
            .actor(id)
            .unwrap()
            .component::<CameraComponent>()
            .unwrap()
            .mode();
        assert_eq!(camera_mode, CameraMode::Free);
        assert!(world.character().unwrap().is_free_camera());

        // A few free-camera frames advance the blend past the saved point.
        world.tick(0.016, input.state());
        world.tick(0.016, input.state());

        hold(&mut input, KeyCode::F);
        world.tick(0.0, input.state());
        input.tick();

        let camera = world.actor(id).unwrap().component::<CameraComponent>().unwrap();
        assert_eq!(camera.snapshot_state(), saved);
        assert!(!world.character().unwrap().is_free_camera());
    }

    #[test]
    fn character_stands_still_while_the_free_camera_is_active() {
        let (mut world, _) = world_with_character(vec![
            Box::new(TransformComponent::default()),
            Box::new(CameraComponent::new(CameraMode::FirstPerson)),
        ]);
        let mut input = InputSystem::new();
        hold(&mut input, KeyCode::F);
        hold(&mut input, KeyCode::W);

        world.tick(0.5, input.state());

        assert_relative_eq!(world.character().unwrap().position(), Vec3::zeros());
    }

    #[test]
    fn despawned_actor_leaves_the_controller_inert() {
        let (mut world, id) = world_with_character(vec![Box::new(TransformComponent::default())]);
        world.despawn(id);

        let mut input = InputSystem::new();
        hold(&mut input, KeyCode::W);
        world.tick(0.5, input.state());

        assert_relative_eq!(world.character().unwrap().position(), Vec3::zeros());
    }

    #[test]
    fn binding_adopts_the_actors_transform() {
        let mut world = World::new();
        let start = Vec3::new(3.0, 0.0, 7.0);
        let id = world.spawn(
            "player",
            vec![Box::new(TransformComponent::new(Transform::from_position(start)))],
        );
        world.bind_character(Character::new(id));

        assert_relative_eq!(world.character().unwrap().position(), start);
    }
}
