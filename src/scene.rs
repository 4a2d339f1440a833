// explicit scene context and the collaborator seams
//
// the scene owns the name-allocation table and the parent/child nesting that
// the composition core writes into; backends behind the traits materialize,
// paint, export and render what the core produced. a fresh dataset item
// resets the scene, so names never collide across buildings.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use crate::error::Result;
use crate::geom::module::Module;
use crate::geom::volume::Volume;

pub const ROOT_COLLECTION: &str = "Building";

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub parent: String,
}

/// Shared mutable scene namespace, one writer at a time (the pipeline is
/// single-threaded throughout).
#[derive(Debug, Default)]
pub struct Scene {
    counters: HashMap<String, u32>,
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // allocates "volume", "volume.001", "volume.002", ...
    pub fn allocate_name(&mut self, base: &str) -> String {
        let n = self.counters.entry(base.to_string()).or_insert(0);
        let name = if *n == 0 {
            base.to_string()
        } else {
            format!("{}.{:03}", base, n)
        };
        *n += 1;
        name
    }

    // nests an object under a parent collection and returns its scene name
    pub fn nest(&mut self, base: &str, parent: &str) -> String {
        let name = self.allocate_name(base);
        self.objects.push(SceneObject {
            name: name.clone(),
            parent: parent.to_string(),
        });
        name
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn members_of(&self, parent: &str) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(move |o| o.parent == parent)
    }

    // demolish: clear everything for the next dataset item
    pub fn reset(&mut self) {
        self.counters.clear();
        self.objects.clear();
    }
}

/// Materializes core geometry into renderable form. The core hands over
/// final dimensions and positions; everything after that is backend-owned.
pub trait GeometryBackend {
    fn add_volume(&mut self, name: &str, volume: &Volume);
    fn add_module(&mut self, name: &str, module: &Module);
}

/// Assigns surface materials to finished volumes.
pub trait MaterialBackend {
    fn produce(&mut self, rng: &mut rand::rngs::StdRng) -> String;
    fn apply(&mut self, object: &str, material: &str);
}

/// Serializes a finished building's geometry to a model file.
pub trait Exporter {
    fn export(&mut self, scene: &Scene, path: &Path) -> Result<()>;
}

/// Produces an image (and optionally a segmentation mask) of the scene.
/// The camera queries are best-effort; callers fall back to defaults.
pub trait Renderer {
    fn render(&mut self, scene: &Scene, image: &Path, mask: Option<&Path>) -> Result<()>;

    fn camera_position(&self) -> Option<Vec3> {
        None
    }

    fn focal_length(&self) -> Option<f32> {
        None
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        None
    }
}

/// Backend bundle that records every call; stands in for the real
/// geometry/material/render stack in tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub volumes: Vec<(String, Volume)>,
    pub modules: Vec<(String, Module)>,
    pub materials_applied: Vec<(String, String)>,
    pub exported: Vec<String>,
    pub rendered: Vec<String>,
    material_counter: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeometryBackend for RecordingBackend {
    fn add_volume(&mut self, name: &str, volume: &Volume) {
        self.volumes.push((name.to_string(), volume.clone()));
    }

    fn add_module(&mut self, name: &str, module: &Module) {
        self.modules.push((name.to_string(), module.clone()));
    }
}

impl MaterialBackend for RecordingBackend {
    fn produce(&mut self, _rng: &mut rand::rngs::StdRng) -> String {
        self.material_counter += 1;
        format!("material.{:03}", self.material_counter)
    }

    fn apply(&mut self, object: &str, material: &str) {
        self.materials_applied
            .push((object.to_string(), material.to_string()));
    }
}

impl Exporter for RecordingBackend {
    fn export(&mut self, _scene: &Scene, path: &Path) -> Result<()> {
        self.exported.push(path.display().to_string());
        Ok(())
    }
}

impl Renderer for RecordingBackend {
    fn render(&mut self, _scene: &Scene, image: &Path, _mask: Option<&Path>) -> Result<()> {
        self.rendered.push(image.display().to_string());
        Ok(())
    }
}
