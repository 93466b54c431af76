//! End-to-end coverage of the frame loop through the public API
//!
//! Builds worlds from RON definitions, binds the character controller, and
//! drives the engine with the headless window and renderer the same way the
//! sandbox binary does.

use pulse_engine::input::{InputEvent, KeyCode};
use pulse_engine::prelude::*;
use pulse_engine::world::PropertyValue;

const WORLD_RON: &str = r#"(
    actors: [
        (
            name: "player",
            components: [
                Transform(position: (0.0, 0.0, 5.0)),
                Camera(mode: third_person, fov_degrees: Some(70.0)),
            ],
        ),
        (
            name: "pillar",
            components: [
                Transform(position: (2.0, 0.0, 0.0)),
                Script(source: "add transform.position.y 0.5"),
            ],
        ),
    ],
)"#;

fn definition_world() -> World {
    let definition = WorldDefinition::from_ron(WORLD_RON).unwrap();
    let mut world = World::default();
    world.load_definition(&definition);
    let player = world.find_actor("player").unwrap();
    world.bind_character(Character::new(player));
    world
}

#[test]
fn a_definition_driven_world_runs_to_the_frame_budget() {
    let window = HeadlessWindow::with_frame_budget(3);
    let renderer = HeadlessRenderSystem::default();
    let context = RuntimeContext::builder()
        .with_window(window.clone())
        .with_renderer(renderer.clone())
        .with_world(definition_world())
        .with_title("Loop")
        .build()
        .unwrap();

    let mut engine = Engine::new(context);
    engine.run().unwrap();

    assert_eq!(renderer.frames(), 3);
    assert_eq!(renderer.last_frame_index(), 3);
    // Both actors carry transforms, so both are visible every frame.
    assert_eq!(renderer.last_object_count(), 2);
    assert_eq!(engine.world().frame_index(), 3);

    // The single-statement script ran once and then stayed finished.
    let pillar = engine.world().find_actor("pillar").unwrap();
    assert_eq!(
        engine.world().property(pillar, "script.status").unwrap(),
        PropertyValue::Str("finished".to_string())
    );
    assert_eq!(
        engine.world().property(pillar, "transform.position.y").unwrap(),
        PropertyValue::Float(0.5)
    );

    let title = window.title();
    assert!(title.starts_with("Loop - "), "unexpected title: {title}");
    assert!(title.ends_with(" FPS"), "unexpected title: {title}");
}

#[test]
fn window_input_moves_the_bound_character() {
    let window = HeadlessWindow::with_frame_budget(6);
    window.push_event(InputEvent::Key {
        key: KeyCode::W,
        pressed: true,
    });
    let context = RuntimeContext::builder()
        .with_window(window.clone())
        .with_renderer(HeadlessRenderSystem::default())
        .with_world(definition_world())
        .build()
        .unwrap();

    let mut engine = Engine::new(context);
    engine.run().unwrap();

    let character = engine.world().character().unwrap();
    let position = character.position();
    assert_eq!(position.x, 0.0);
    assert_eq!(position.y, 0.0);
    assert!(position.z < 5.0, "forward is -Z, got z = {}", position.z);

    // Movement writes through to the actor's transform on the same tick.
    let player = engine.world().find_actor("player").unwrap();
    assert_eq!(
        engine.world().property(player, "transform.position.z").unwrap(),
        PropertyValue::Float(position.z)
    );
}

#[test]
fn a_pending_close_request_stops_the_run_before_the_first_frame() {
    let window = HeadlessWindow::with_frame_budget(10);
    window.request_close();
    let renderer = HeadlessRenderSystem::default();
    let context = RuntimeContext::builder()
        .with_window(window.clone())
        .with_renderer(renderer.clone())
        .with_world(definition_world())
        .build()
        .unwrap();

    let mut engine = Engine::new(context);
    engine.run().unwrap();

    assert_eq!(renderer.frames(), 0);
    assert_eq!(engine.world().frame_index(), 0);
    assert_eq!(window.polls(), 0);
}
