//! Sandbox bootstrap
//!
//! Demonstrates the engine's startup contract: resolve a settings file,
//! populate a world (from a RON definition when the settings name one,
//! otherwise a built-in demo scene), assemble the runtime context, and hand
//! it to the frame scheduler. The engine itself never touches configuration.

use pulse_engine::prelude::*;

const DEFAULT_SETTINGS_PATH: &str = "sandbox_app/config/engine.toml";
const DEFAULT_HEADLESS_FRAMES: u64 = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pulse_engine::foundation::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let settings_path = args.get(1).map_or(DEFAULT_SETTINGS_PATH, String::as_str);

    let settings = match EngineSettings::load_from_file(settings_path) {
        Ok(settings) => settings,
        Err(error) => {
            log::warn!(
                "no usable settings at '{}', falling back to defaults: {}",
                settings_path,
                error
            );
            EngineSettings::default()
        }
    };

    let mut world = World::new();
    let spawned = match settings.world.definition_file.as_deref() {
        Some(path) => {
            log::info!("loading world definition '{}'", path);
            let definition = WorldDefinition::load_from_file(path)?;
            world.load_definition(&definition)
        }
        None => build_demo_scene(&mut world),
    };
    log::info!("world ready with {} actors", world.actor_count());

    // The character drives the actor named "player", or the first actor
    // spawned when no such name exists.
    if let Some(player) = world.find_actor("player").or_else(|| spawned.first().copied()) {
        world.bind_character(Character::new(player));
    }

    #[cfg(feature = "glfw-window")]
    let window = pulse_engine::render::GlfwWindow::new(
        &settings.window.title,
        settings.window.width,
        settings.window.height,
    )?;
    #[cfg(not(feature = "glfw-window"))]
    let window = {
        let frames = args
            .get(2)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_HEADLESS_FRAMES);
        log::info!("running headless for {} frames", frames);
        HeadlessWindow::with_frame_budget(frames)
    };

    let context = RuntimeContext::builder()
        .with_window(window)
        .with_renderer(HeadlessRenderSystem::new())
        .with_world(world)
        .with_title(settings.window.title.clone())
        .build()?;

    Engine::new(context).run()?;
    Ok(())
}

/// Scene used when the settings name no world file
fn build_demo_scene(world: &mut World) -> Vec<ActorId> {
    let player = world.spawn(
        "player",
        vec![
            Box::new(TransformComponent::default()),
            Box::new(CameraComponent::new(CameraMode::ThirdPerson)),
        ],
    );
    let pillar = world.spawn(
        "pillar",
        vec![
            Box::new(TransformComponent::new(Transform::from_position(Vec3::new(
                2.0, 0.0, 0.0,
            )))),
            Box::new(ScriptComponent::new(
                "add transform.position.y 0.25\n\
                 wait 0.5\n\
                 add transform.position.y -0.25\n\
                 wait 0.5\n\
                 goto 0",
            )),
        ],
    );
    vec![player, pillar]
}
