// dataset pipeline: one building per item, generated start-to-finish before
// the next begins. a failed item is logged and skipped, never retried.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::annotation::Annotation;
use crate::config::{GenParams, WINDOW_GRID};
use crate::error::Result;
use crate::geom::Axis;
use crate::geom::factory::BuildingFactory;
use crate::geom::module::{GridApplier, GridSpec, ModuleFactory};
use crate::geom::volume::Volume;
use crate::scene::{
    Exporter, GeometryBackend, MaterialBackend, ROOT_COLLECTION, Renderer, Scene,
};

/// One dataset generation run: factory, scene context and annotation
/// accumulator, driven over `params.dataset_size` items.
pub struct Dataset {
    pub name: String,
    params: GenParams,
    factory: BuildingFactory,
    annotation: Annotation,
    scene: Scene,
}

impl Dataset {
    pub fn new(params: GenParams) -> Self {
        let today = chrono::Local::now();
        let name = format!(
            "building_dataset_{}_{}_{}",
            today.year(),
            today.month(),
            today.day()
        );
        let annotation = Annotation::new(&params.mask_save);
        let factory = BuildingFactory::new(params.clone());
        Self {
            name,
            params,
            factory,
            annotation,
            scene: Scene::new(),
        }
    }

    /// Generates every dataset item. Each building gets its own seeded RNG so
    /// a specific item can be reproduced from the base seed and its index.
    pub fn populate<B>(&mut self, backend: &mut B)
    where
        B: GeometryBackend + MaterialBackend + Exporter + Renderer,
    {
        for i in 0..self.params.dataset_size {
            let mut rng = StdRng::seed_from_u64(self.params.seed.wrapping_add(i as u64));
            match self.generate_item(i, &mut rng, backend) {
                Ok(typology) => info!(item = i, typology, "generated building"),
                Err(e) => warn!(item = i, error = %e, "building generation failed, skipping"),
            }
            self.scene.reset();
        }
    }

    fn generate_item<B>(
        &mut self,
        index: usize,
        rng: &mut StdRng,
        backend: &mut B,
    ) -> Result<&'static str>
    where
        B: GeometryBackend + MaterialBackend + Exporter + Renderer,
    {
        let mut building = self.factory.produce(rng)?;
        building.compose(rng, &self.params)?;

        // volumes are final now; hand them to the geometry backend
        let mut volume_names = Vec::with_capacity(building.volumes().len());
        for v in building.volumes() {
            let name = self.scene.nest("volume", ROOT_COLLECTION);
            backend.add_volume(&name, v);
            volume_names.push(name);
        }

        if self.params.use_materials {
            // one material covers the whole building with the configured
            // probability, otherwise each volume gets its own
            let mono = rng.random_bool(self.params.material_prob);
            let mut material = backend.produce(rng);
            for name in &volume_names {
                if !mono {
                    material = backend.produce(rng);
                }
                backend.apply(name, &material);
            }
        }

        if self.params.use_modules {
            for module_name in self.params.modules.clone() {
                for v in building.volumes() {
                    self.tile_face(&module_name, v, backend)?;
                }
            }
        }

        let img = format!("{}/{}.png", self.params.img_save, index);
        let mask = format!("{}/{}.png", self.params.mask_save, index);
        let model = format!("{}/{}.obj", self.params.model_save, index);

        self.annotation.set_camera(
            backend.camera_position(),
            backend.focal_length(),
            backend.resolution(),
        );
        let bbox = footprint_bbox(building.volumes());
        self.annotation.add(&img, &model, Some(&bbox))?;

        backend.export(&self.scene, Path::new(&model))?;
        backend.render(&self.scene, Path::new(&img), Some(Path::new(&mask)))?;

        Ok(building.typology().name())
    }

    // tiles one module template across a volume's front face; the clones
    // join the volume's parent collection, the template is consumed
    fn tile_face<B>(&mut self, module_name: &str, host: &Volume, backend: &mut B) -> Result<()>
    where
        B: GeometryBackend,
    {
        let mut template = ModuleFactory::produce(module_name);
        template.connect(host, Axis::Y);
        let spec = GridSpec::grid(WINDOW_GRID.0, WINDOW_GRID.1);
        for clone in GridApplier::apply(template, host, &spec)? {
            let name = self.scene.nest(module_name, ROOT_COLLECTION);
            backend.add_module(&name, &clone);
        }
        Ok(())
    }

    pub fn records(&self) -> &[crate::annotation::AnnotationRecord] {
        self.annotation.records()
    }

    // writes the accumulated annotation as <dir>/<dataset name>.json
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.name));
        self.annotation.write(&path)?;
        Ok(path)
    }
}

// axis-aligned footprint bounds over all volumes, [x0, y0, x1, y1]
fn footprint_bbox(volumes: &[Volume]) -> [f32; 4] {
    let mut bb = [f32::MAX, f32::MAX, f32::MIN, f32::MIN];
    for v in volumes {
        let (x0, x1) = v.extent(Axis::X);
        let (y0, y1) = v.extent(Axis::Y);
        bb[0] = bb[0].min(x0);
        bb[1] = bb[1].min(y0);
        bb[2] = bb[2].max(x1);
        bb[3] = bb[3].max(y1);
    }
    bb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingBackend;

    fn params() -> GenParams {
        GenParams {
            dataset_size: 5,
            ..GenParams::default()
        }
    }

    #[test]
    fn populate_produces_one_record_per_item() {
        let mut dataset = Dataset::new(params());
        let mut backend = RecordingBackend::new();
        dataset.populate(&mut backend);

        assert_eq!(dataset.records().len(), 5);
        assert_eq!(backend.exported.len(), 5);
        assert_eq!(backend.rendered.len(), 5);
        assert!(!backend.volumes.is_empty());

        for (i, record) in dataset.records().iter().enumerate() {
            assert_eq!(record.img, format!("Images/{}.png", i));
            assert_eq!(record.model, format!("Models/{}.obj", i));
            assert_eq!(record.mask, format!("Masks/{}.png", i));
            // footprint bbox is ordered
            assert!(record.bbox[0] <= record.bbox[2]);
            assert!(record.bbox[1] <= record.bbox[3]);
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_buildings() {
        let mut a = RecordingBackend::new();
        Dataset::new(params()).populate(&mut a);
        let mut b = RecordingBackend::new();
        Dataset::new(params()).populate(&mut b);

        assert_eq!(a.volumes.len(), b.volumes.len());
        for (va, vb) in a.volumes.iter().zip(&b.volumes) {
            assert_eq!(va, vb);
        }
    }

    #[test]
    fn every_volume_gets_a_material() {
        let mut dataset = Dataset::new(params());
        let mut backend = RecordingBackend::new();
        dataset.populate(&mut backend);
        assert_eq!(backend.materials_applied.len(), backend.volumes.len());
    }

    #[test]
    fn scene_names_restart_each_item() {
        let mut dataset = Dataset::new(GenParams {
            dataset_size: 3,
            use_modules: false,
            ..GenParams::default()
        });
        let mut backend = RecordingBackend::new();
        dataset.populate(&mut backend);

        // first volume of every item gets the bare base name again
        let bare = backend
            .volumes
            .iter()
            .filter(|(name, _)| name == "volume")
            .count();
        assert_eq!(bare, 3);
    }

    #[test]
    fn writes_annotation_json_to_directory() {
        let mut dataset = Dataset::new(GenParams {
            dataset_size: 2,
            ..GenParams::default()
        });
        let mut backend = RecordingBackend::new();
        dataset.populate(&mut backend);

        let dir = tempfile::tempdir().unwrap();
        let path = dataset.write(dir.path()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(2));
    }
}
