//! Headless scene demo
//!
//! Builds a floor, a stack of falling crates, a pickup that disappears when
//! something touches it and a camera, then runs a fixed number of frames
//! and saves the result.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hearth_engine::ecs::components::ModelComponent;
use hearth_engine::prelude::*;
use hearth_engine::scene::save_scene;

const FRAMES: u32 = 240;
const DT: f32 = 1.0 / 60.0;

const CUBE_OBJ: &str = "\
v -0.5 -0.5 0.5\nv 0.5 -0.5 0.5\nv 0.5 0.5 0.5\nv -0.5 0.5 0.5
v -0.5 -0.5 -0.5\nv 0.5 -0.5 -0.5\nv 0.5 0.5 -0.5\nv -0.5 0.5 -0.5
f 1 2 3 4\nf 6 5 8 7\nf 5 1 4 8\nf 2 6 7 3\nf 4 3 7 8\nf 5 6 2 1
";

/// Logs collisions and removes pickups on contact
struct DemoScripts {
    pickups_collected: Rc<Cell<u32>>,
}

impl ScriptHost for DemoScripts {
    fn register(&mut self, entity: Entity, name: &str) {
        log::debug!("script registered for {name} ({entity})");
    }

    fn unregister(&mut self, entity: Entity) {
        log::debug!("script unregistered for {entity}");
    }

    fn update(&mut self, _world: &World, _dt: f32, _commands: &mut CommandQueue) {}

    fn on_collision(&mut self, world: &World, event: &CollisionEvent, commands: &mut CommandQueue) {
        let name = |e| world.name(e).unwrap_or("?");
        log::trace!("{} hit {}", name(event.entity), name(event.other));
        if world.tag(event.entity) == Some("pickup") {
            log::info!("{} collected by {}", name(event.entity), name(event.other));
            self.pickups_collected.set(self.pickups_collected.get() + 1);
            commands.remove(event.entity);
        }
    }
}

fn write_assets(root: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(root)?;
    std::fs::write(root.join("cube.obj"), CUBE_OBJ)?;
    std::fs::write(root.join("lit.glsl"), "#version 450\nvoid main() {}\n")?;
    let material = MaterialFile {
        shader: "lit.glsl".to_string(),
        color: [0.8, 0.6, 0.4, 1.0],
        ..MaterialFile::default()
    };
    let json = serde_json::to_string_pretty(&material).map_err(std::io::Error::other)?;
    std::fs::write(root.join("crate.mat.json"), json)
}

fn build_scene(scene: &mut Scene, settings: &EngineSettings) -> Result<(), SceneError> {
    let floor = scene.create_entity("Floor");
    scene.attach_rigid_body(
        floor,
        RigidBodyDesc::fixed(ShapeDesc::Plane {
            normal: Vec3::y(),
            constant: 0.0,
        }),
    )?;

    for i in 0..3u8 {
        let height = 2.0 + 1.5 * f32::from(i);
        let name = format!("Crate{i}");
        let crate_entity = scene.create_entity_at(
            &name,
            TransformComponent::from_position(Vec3::new(0.1 * f32::from(i), height, 0.0)),
        );
        scene.attach_model(crate_entity, "cube.obj", "crate.mat.json")?;
        scene.attach_rigid_body(crate_entity, RigidBodyDesc::dynamic(ShapeDesc::default_box(), 1.0).with_restitution(0.2))?;
    }

    let pickup = scene.create_entity_at("Coin", TransformComponent::from_position(Vec3::new(0.0, 0.6, 0.0)));
    scene.world_mut().set_tag(pickup, "pickup");
    scene.attach_rigid_body(pickup, RigidBodyDesc::fixed(ShapeDesc::Sphere { radius: 0.3 }))?;

    let sun = scene.create_entity("Sun");
    scene.set_forward(sun, Vec3::new(-0.3, -1.0, -0.2));
    scene.attach_light(sun, LightComponent::directional(Vec3::new(1.0, 0.95, 0.9), 1.0))?;

    let camera = scene.create_entity_at("Camera", TransformComponent::from_position(Vec3::new(6.0, 4.0, 8.0)));
    scene.set_look_at(camera, Vec3::new(0.0, 1.0, 0.0));
    scene.attach_camera(
        camera,
        CameraComponent::perspective(60.0, settings.render_aspect(), 0.1, 200.0),
    )?;
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let work_dir = std::env::temp_dir().join("hearth_demo");
    let settings = EngineSettings::load_or_create(work_dir.join("settings.json"));
    log::info!(
        "render target {}x{}, shadow map {}x{}",
        settings.render_width,
        settings.render_height,
        settings.shadow_map_width,
        settings.shadow_map_height
    );

    let asset_root: PathBuf = work_dir.join("assets");
    write_assets(&asset_root)?;

    let mut scene = Scene::new(SceneConfig::default().with_asset_root(asset_root.to_string_lossy()));
    let collected = Rc::new(Cell::new(0));
    scene.set_script_host(Box::new(DemoScripts {
        pickups_collected: Rc::clone(&collected),
    }));
    build_scene(&mut scene, &settings)?;

    let mut timer = Timer::new();
    let mut contacts = 0;
    for _ in 0..FRAMES {
        timer.tick();
        let report = scene.tick(DT);
        contacts += report.collisions.len();
    }

    for (entity, model) in scene.world().query::<ModelComponent>() {
        if let Some(transform) = scene.transform(entity) {
            let p = transform.position();
            log::info!(
                "{} rests at ({:.2}, {:.2}, {:.2}) visible={}",
                scene.world().name(entity).unwrap_or("?"),
                p.x,
                p.y,
                p.z,
                model.visible()
            );
        }
    }
    let queue = scene.render_queue();
    log::info!(
        "{} frames in {:.3}s ({:.0} fps): {contacts} contact events, {} pickups collected, {} draw items in {} batches",
        timer.frame_count(),
        timer.total_time(),
        timer.average_fps(),
        collected.get(),
        queue.len(),
        queue.batches().len()
    );
    log::info!("{:?}", scene.stats());

    let scene_path = work_dir.join("scene.json");
    save_scene(&scene, &scene_path)?;
    log::info!("scene written to {}", scene_path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    hearth_engine::foundation::logging::init_with_level(log::LevelFilter::Info);

    log::info!("Starting Hearth headless demo");
    let result = run();
    match &result {
        Ok(()) => log::info!("Demo finished successfully"),
        Err(e) => log::error!("Demo failed: {e}"),
    }
    result
}
