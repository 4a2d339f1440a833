// volume, collection and building factories

use glam::Vec3;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::config::GenParams;
use crate::error::{GenError, Result};
use crate::geom::collection::Collection;
use crate::geom::typology::{ComposedBuilding, Typology};
use crate::geom::volume::{DimBounds, Volume};

/// Produces single volumes, either with an explicit scale or with
/// dimensions drawn uniformly from the configured integer ranges.
pub struct VolumeFactory {
    bounds: DimBounds,
}

impl VolumeFactory {
    pub fn new(bounds: DimBounds) -> Self {
        Self { bounds }
    }

    pub fn produce(&self, rng: &mut StdRng, scale: Option<Vec3>) -> Result<Volume> {
        match scale {
            Some(scale) => Volume::new(scale, Vec3::ZERO, &self.bounds),
            None => self.produce_random(rng),
        }
    }

    // dimensions are whole meters, matching the survey data the ranges come from
    fn produce_random(&self, rng: &mut StdRng) -> Result<Volume> {
        let scale = Vec3::new(
            rng.random_range(self.bounds.min.x as i32..self.bounds.max.x as i32) as f32,
            rng.random_range(self.bounds.min.y as i32..self.bounds.max.y as i32) as f32,
            rng.random_range(self.bounds.min.z as i32..self.bounds.max.z as i32) as f32,
        );
        Volume::new(scale, Vec3::ZERO, &self.bounds)
    }
}

/// Produces a collection of volumes based on their number.
pub struct CollectionFactory {
    volume_factory: VolumeFactory,
    max_volumes: usize,
}

impl CollectionFactory {
    pub fn new(bounds: DimBounds, max_volumes: usize) -> Self {
        Self {
            volume_factory: VolumeFactory::new(bounds),
            max_volumes,
        }
    }

    // count drawn from [1, max_volumes] when omitted
    pub fn produce(&self, rng: &mut StdRng, count: Option<usize>) -> Result<Collection<Volume>> {
        let count = match count {
            Some(n) => n,
            None => rng.random_range(1..=self.max_volumes),
        };
        let mut c = Collection::new();
        for _ in 0..count {
            c.add(self.volume_factory.produce(rng, None)?);
        }
        Ok(c)
    }
}

/// Top-level factory: picks a typology from the configured whitelist and
/// sizes a volume collection to its required cardinality.
pub struct BuildingFactory {
    params: GenParams,
    collection_factory: CollectionFactory,
}

impl BuildingFactory {
    pub fn new(params: GenParams) -> Self {
        let collection_factory = CollectionFactory::new(params.bounds(), params.max_volumes);
        Self {
            params,
            collection_factory,
        }
    }

    pub fn produce(&self, rng: &mut StdRng) -> Result<ComposedBuilding> {
        let typology = *self
            .params
            .typologies
            .choose(rng)
            .ok_or(GenError::Cardinality {
                typology: "whitelist",
                expected: "at least 1 typology",
                got: 0,
            })?;
        self.produce_typology(rng, typology)
    }

    pub fn produce_typology(
        &self,
        rng: &mut StdRng,
        typology: Typology,
    ) -> Result<ComposedBuilding> {
        let count = typology.volume_count(rng, self.params.max_volumes);
        let volumes = self.collection_factory.produce(rng, Some(count))?;
        ComposedBuilding::new(typology, volumes.into_inner())
    }
}
