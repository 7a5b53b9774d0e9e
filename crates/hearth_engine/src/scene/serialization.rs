//! JSON scene files
//!
//! A scene document is `{ "Entities": [ { "Name", "Tag", "Components": { .. } } ] }`
//! with one object per component kind. Loading is best effort: a malformed
//! entity or component is logged and counted in the [`LoadReport`], and
//! everything around it still loads.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{Scene, SceneError};
use crate::ecs::components::{
    CameraComponent, LightComponent, LightType, ModelComponent, RigidBodyComponent, RigidBodyDesc,
    TransformComponent,
};
use crate::ecs::Entity;
use crate::foundation::math::{utils, Quat, Vec3};
use crate::physics::ShapeDesc;

/// Scene file errors that stop the whole load or save
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading or writing the file failed
    #[error("Failed to access scene file {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not JSON
    #[error("Malformed scene document: {0}")]
    Json(#[from] serde_json::Error),

    /// The root object has no `Entities` array
    #[error("Scene document has no Entities array")]
    MissingEntities,
}

/// Outcome of a best-effort load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entities created
    pub entities: usize,
    /// Components attached, transforms included
    pub components: usize,
    /// One message per entity or component that failed to load
    pub failures: Vec<String>,
}

impl LoadReport {
    /// Whether everything in the document loaded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, message: String) {
        log::error!("scene load: {message}");
        self.failures.push(message);
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TransformDoc {
    position: [f32; 3],
    /// Quaternion as `[x, y, z, w]`
    rotation: [f32; 4],
    scale: [f32; 3],
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CameraDoc {
    /// Vertical field of view in degrees
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ModelDoc {
    geometry: String,
    material: String,
    #[serde(default = "visible_default")]
    visible: bool,
}

fn visible_default() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LightDoc {
    #[serde(rename = "Type")]
    light_type: String,
    inner_angle: f32,
    outer_angle: f32,
    falloff: f32,
    radius: f32,
    intensity: f32,
    cast_shadow: bool,
    pcf_enabled: bool,
    depth_bias: f32,
    color: [f32; 3],
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "Type")]
enum ShapeDoc {
    Box {
        #[serde(rename = "HalfExtents")]
        half_extents: [f32; 3],
    },
    Sphere {
        #[serde(rename = "Radius")]
        radius: f32,
    },
    Capsule {
        #[serde(rename = "Radius")]
        radius: f32,
        #[serde(rename = "Height")]
        height: f32,
    },
    Plane {
        #[serde(rename = "Normal")]
        normal: [f32; 3],
        #[serde(rename = "Constant")]
        constant: f32,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RigidBodyDoc {
    mass: f32,
    friction: f32,
    restitution: f32,
    is_kinematic: bool,
    shape: ShapeDoc,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EntityHeader {
    name: String,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    components: Map<String, Value>,
}

impl From<&TransformComponent> for TransformDoc {
    fn from(transform: &TransformComponent) -> Self {
        let q = transform.rotation().into_inner().coords;
        Self {
            position: transform.position().into(),
            rotation: [q.x, q.y, q.z, q.w],
            scale: transform.scale().into(),
        }
    }
}

impl TransformDoc {
    fn into_component(self) -> Result<TransformComponent, String> {
        let [x, y, z, w] = self.rotation;
        let quaternion = nalgebra::Quaternion::new(w, x, y, z);
        if !(quaternion.norm() > f32::EPSILON) {
            return Err(format!("degenerate rotation {:?}", self.rotation));
        }
        Ok(TransformComponent::from_transform(
            Vec3::from(self.position),
            Quat::from_quaternion(quaternion),
            Vec3::from(self.scale),
        ))
    }
}

impl CameraDoc {
    fn into_component(self) -> Result<CameraComponent, String> {
        if !(self.near > 0.0 && self.far > self.near && self.aspect > 0.0) {
            return Err(format!("invalid camera planes near={} far={}", self.near, self.far));
        }
        Ok(CameraComponent::perspective(self.fov, self.aspect, self.near, self.far))
    }
}

impl From<&LightComponent> for LightDoc {
    fn from(light: &LightComponent) -> Self {
        Self {
            light_type: light.light_type.as_str().to_string(),
            inner_angle: light.inner_angle,
            outer_angle: light.outer_angle,
            falloff: light.falloff,
            radius: light.radius,
            intensity: light.intensity,
            cast_shadow: light.cast_shadow,
            pcf_enabled: light.pcf_enabled,
            depth_bias: light.depth_bias,
            color: light.color.into(),
        }
    }
}

impl LightDoc {
    fn into_component(self) -> Result<LightComponent, String> {
        let light_type =
            LightType::parse(&self.light_type).ok_or_else(|| format!("unknown light type '{}'", self.light_type))?;
        Ok(LightComponent {
            light_type,
            color: Vec3::from(self.color),
            intensity: self.intensity,
            inner_angle: self.inner_angle,
            outer_angle: self.outer_angle,
            falloff: self.falloff,
            radius: self.radius,
            cast_shadow: self.cast_shadow,
            pcf_enabled: self.pcf_enabled,
            depth_bias: self.depth_bias,
        })
    }
}

impl From<&ShapeDesc> for ShapeDoc {
    fn from(shape: &ShapeDesc) -> Self {
        match *shape {
            ShapeDesc::Box { half_extents } => ShapeDoc::Box {
                half_extents: half_extents.into(),
            },
            ShapeDesc::Sphere { radius } => ShapeDoc::Sphere { radius },
            ShapeDesc::Capsule { radius, height } => ShapeDoc::Capsule { radius, height },
            ShapeDesc::Plane { normal, constant } => ShapeDoc::Plane {
                normal: normal.into(),
                constant,
            },
        }
    }
}

impl From<ShapeDoc> for ShapeDesc {
    fn from(doc: ShapeDoc) -> Self {
        match doc {
            ShapeDoc::Box { half_extents } => ShapeDesc::Box {
                half_extents: Vec3::from(half_extents),
            },
            ShapeDoc::Sphere { radius } => ShapeDesc::Sphere { radius },
            ShapeDoc::Capsule { radius, height } => ShapeDesc::Capsule { radius, height },
            ShapeDoc::Plane { normal, constant } => ShapeDesc::Plane {
                normal: Vec3::from(normal),
                constant,
            },
        }
    }
}

impl From<&RigidBodyComponent> for RigidBodyDoc {
    fn from(body: &RigidBodyComponent) -> Self {
        Self {
            mass: body.mass(),
            friction: body.friction(),
            restitution: body.restitution(),
            is_kinematic: body.is_kinematic(),
            shape: ShapeDoc::from(body.shape()),
        }
    }
}

impl From<RigidBodyDoc> for RigidBodyDesc {
    fn from(doc: RigidBodyDoc) -> Self {
        Self {
            shape: Some(doc.shape.into()),
            mass: doc.mass,
            friction: doc.friction,
            restitution: doc.restitution,
            is_kinematic: doc.is_kinematic,
        }
    }
}

fn entity_document(scene: &Scene, entity: Entity) -> Result<Value, serde_json::Error> {
    let world = scene.world();
    let mut components = Map::new();
    if let Some(transform) = world.get::<TransformComponent>(entity) {
        components.insert("Transform".into(), serde_json::to_value(TransformDoc::from(transform))?);
    }
    if let Some(camera) = world.get::<CameraComponent>(entity) {
        let doc = CameraDoc {
            fov: utils::rad_to_deg(camera.fov),
            aspect: camera.aspect,
            near: camera.near,
            far: camera.far,
        };
        components.insert("Camera".into(), serde_json::to_value(doc)?);
    }
    if let Some(model) = world.get::<ModelComponent>(entity) {
        let resources = scene.resources();
        match (
            resources.geometries().name(model.geometry()),
            resources.materials().name(model.material()),
        ) {
            (Some(geometry), Some(material)) => {
                let doc = ModelDoc {
                    geometry: geometry.to_string(),
                    material: material.to_string(),
                    visible: model.visible(),
                };
                components.insert("Model".into(), serde_json::to_value(doc)?);
            }
            _ => log::warn!("scene save: model of entity {entity} refers to released resources"),
        }
    }
    if let Some(light) = world.get::<LightComponent>(entity) {
        components.insert("Light".into(), serde_json::to_value(LightDoc::from(light))?);
    }
    if let Some(body) = world.get::<RigidBodyComponent>(entity) {
        components.insert("RigidBody".into(), serde_json::to_value(RigidBodyDoc::from(body))?);
    }

    let mut document = Map::new();
    document.insert("Name".into(), Value::from(world.name(entity).unwrap_or_default()));
    document.insert("Tag".into(), Value::from(world.tag(entity).unwrap_or_default()));
    document.insert("Components".into(), Value::Object(components));
    Ok(Value::Object(document))
}

/// Serialize every live entity
pub fn scene_to_document(scene: &Scene) -> Result<Value, PersistenceError> {
    let entities = scene
        .world()
        .entities()
        .map(|entity| entity_document(scene, entity))
        .collect::<Result<Vec<_>, _>>()?;
    let mut root = Map::new();
    root.insert("Entities".into(), Value::Array(entities));
    Ok(Value::Object(root))
}

/// Write the scene as pretty-printed JSON
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(&scene_to_document(scene)?)?;
    std::fs::write(path, text).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("saved scene with {} entities to {}", scene.world().entity_count(), path.display());
    Ok(())
}

/// Read a scene file into `scene`, adding to whatever it already holds
pub fn load_scene(scene: &mut Scene, path: impl AsRef<Path>) -> Result<LoadReport, PersistenceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let document: Value = serde_json::from_str(&text)?;
    let report = load_document(scene, &document)?;
    log::info!(
        "loaded {} entities and {} components from {} ({} failures)",
        report.entities,
        report.components,
        path.display(),
        report.failures.len()
    );
    Ok(report)
}

/// Populate `scene` from a parsed document
pub fn load_document(scene: &mut Scene, document: &Value) -> Result<LoadReport, PersistenceError> {
    let entities = document
        .get("Entities")
        .and_then(Value::as_array)
        .ok_or(PersistenceError::MissingEntities)?;

    let mut report = LoadReport::default();
    for (index, value) in entities.iter().enumerate() {
        let header = match EntityHeader::deserialize(value) {
            Ok(header) => header,
            Err(e) => {
                report.fail(format!("entity #{index}: {e}"));
                continue;
            }
        };
        load_entity(scene, header, &mut report);
    }
    Ok(report)
}

fn parse<T: for<'de> Deserialize<'de>>(value: &Value) -> Result<T, String> {
    T::deserialize(value).map_err(|e| e.to_string())
}

fn load_entity(scene: &mut Scene, header: EntityHeader, report: &mut LoadReport) {
    let name = header.name;
    let transform = match header.components.get("Transform") {
        Some(value) => match parse::<TransformDoc>(value).and_then(TransformDoc::into_component) {
            Ok(transform) => transform,
            Err(e) => {
                report.fail(format!("'{name}' Transform: {e}"));
                TransformComponent::identity()
            }
        },
        None => TransformComponent::identity(),
    };
    let entity = scene.create_entity_at(&name, transform);
    if !header.tag.is_empty() {
        scene.world_mut().set_tag(entity, &header.tag);
    }
    report.entities += 1;
    report.components += 1;

    for (key, value) in &header.components {
        let outcome = match key.as_str() {
            "Transform" => continue,
            "Camera" => parse::<CameraDoc>(value)
                .and_then(CameraDoc::into_component)
                .and_then(|camera| scene.attach_camera(entity, camera).map(drop).map_err(display)),
            "Model" => parse::<ModelDoc>(value).and_then(|doc| {
                scene
                    .attach_model(entity, &doc.geometry, &doc.material)
                    .map_err(display)?;
                scene.world_mut().set_model_visible(entity, doc.visible);
                Ok(())
            }),
            "Light" => parse::<LightDoc>(value)
                .and_then(LightDoc::into_component)
                .and_then(|light| scene.attach_light(entity, light).map(drop).map_err(display)),
            "RigidBody" => parse::<RigidBodyDoc>(value).and_then(|doc| {
                scene
                    .attach_rigid_body(entity, doc.into())
                    .map(drop)
                    .map_err(display)
            }),
            other => Err(format!("unknown component '{other}'")),
        };
        match outcome {
            Ok(()) => report.components += 1,
            Err(e) => report.fail(format!("'{name}' {key}: {e}")),
        }
    }
}

fn display(error: SceneError) -> String {
    error.to_string()
}
