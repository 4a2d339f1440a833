// Configuration file, all measurements in real-world meters (1 unit = 1 meter)
// This controls the default generation parameter settings

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::geom::typology::Typology;
use crate::geom::volume::DimBounds;

// Volume dimension bounds (meters)
pub const MIN_WIDTH: f32 = 6.0;
pub const MIN_LENGTH: f32 = 6.0;
pub const MIN_HEIGHT: f32 = 3.0;

pub const MAX_WIDTH: f32 = 30.0;
pub const MAX_LENGTH: f32 = 30.0;
pub const MAX_HEIGHT: f32 = 30.0;

pub const INITIAL_SEED: u64 = 1512086461918454205;

// Composition parameters
pub const MAX_VOLUMES: usize = 4;       // cap on volumes per building
pub const DATASET_SIZE: usize = 2;      // buildings per dataset run

// Patio typology parameters
pub const PATIO_WIDTH_MIN: f32 = 3.0;
pub const PATIO_WIDTH_MAX: f32 = 12.0;
pub const PATIO_LENGTH_RATIO_MIN: f32 = 1.5;  // length = width * ratio
pub const PATIO_LENGTH_RATIO_MAX: f32 = 2.5;

// Skyscraper typology parameters
pub const TOWER_HEIGHT_MIN: f32 = 100.0;
pub const TOWER_HEIGHT_MAX: f32 = 200.0;
pub const TOWER_FOOTPRINT_MIN: f32 = 30.0;  // floor for tower width and length

// T/E placement parameters
pub const SLOT_CANDIDATES: usize = 10;  // evenly spaced offsets along the host span

// Material parameters
pub const USE_MATERIALS: bool = true;
pub const MATERIAL_PROB: f64 = 0.7;     // chance one material covers the whole building

// Module parameters
pub const USE_MODULES: bool = true;
pub const WINDOW_SCALE: [f32; 3] = [1.5, 0.05, 1.5];
pub const WINDOW_GRID: (u32, u32) = (3, 3);

// Output directories and render engine
pub const MODEL_SAVE: &str = "Models";
pub const IMG_SAVE: &str = "Images";
pub const MASK_SAVE: &str = "Masks";
pub const ENGINE: &str = "CYCLES";

// runtime generation parameters, deserializable from a JSON file
// missing fields fall back to the constants above
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenParams {
    pub min_width: f32,
    pub min_length: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_length: f32,
    pub max_height: f32,
    pub max_volumes: usize,
    pub typologies: Vec<Typology>,
    pub dataset_size: usize,
    pub use_materials: bool,
    pub material_prob: f64,
    pub use_modules: bool,
    pub modules: Vec<String>,
    pub model_save: String,
    pub img_save: String,
    pub mask_save: String,
    pub engine: String,
    pub seed: u64,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_length: MIN_LENGTH,
            min_height: MIN_HEIGHT,
            max_width: MAX_WIDTH,
            max_length: MAX_LENGTH,
            max_height: MAX_HEIGHT,
            max_volumes: MAX_VOLUMES,
            typologies: vec![
                Typology::Patio,
                Typology::L,
                Typology::C,
                Typology::Single,
                Typology::Skyscraper,
                Typology::ClosedPatio,
                Typology::PatioEqual,
            ],
            dataset_size: DATASET_SIZE,
            use_materials: USE_MATERIALS,
            material_prob: MATERIAL_PROB,
            use_modules: USE_MODULES,
            modules: vec!["window".to_string()],
            model_save: MODEL_SAVE.to_string(),
            img_save: IMG_SAVE.to_string(),
            mask_save: MASK_SAVE.to_string(),
            engine: ENGINE.to_string(),
            seed: INITIAL_SEED,
        }
    }
}

impl GenParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    // per-axis dimension bounds in canonical axis order (width, length, height)
    pub fn bounds(&self) -> DimBounds {
        DimBounds {
            min: glam::Vec3::new(self.min_width, self.min_length, self.min_height),
            max: glam::Vec3::new(self.max_width, self.max_length, self.max_height),
        }
    }
}
