// synthetic building-massing dataset generator
//
// box volumes are composed per architectural typology (L, C, patio,
// skyscraper, ...), decorated with grid-tiled modules, and handed to the
// geometry/material/render collaborators behind the scene traits.

pub mod annotation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geom;
pub mod scene;

pub use config::GenParams;
pub use dataset::Dataset;
pub use error::{GenError, Result};
