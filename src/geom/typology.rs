// typology variants and their composition rules
//
// each variant is a correction rule + connector sequence + optional resort.
// corrections harmonize dimensions, connectors arrange the volumes, and the
// volume list order after composition is part of the contract.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Deserialize;

use crate::config::{
    GenParams, PATIO_LENGTH_RATIO_MAX, PATIO_LENGTH_RATIO_MIN, PATIO_WIDTH_MAX, PATIO_WIDTH_MIN,
    SLOT_CANDIDATES, TOWER_FOOTPRINT_MIN, TOWER_HEIGHT_MAX, TOWER_HEIGHT_MIN,
};
use crate::error::{GenError, Result};
use crate::geom::Axis;
use crate::geom::connect::{Anchor, attach};
use crate::geom::volume::Volume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Typology {
    Single,
    L,
    C,
    T,
    E,
    Patio,
    PatioEqual,
    ClosedPatio,
    Skyscraper,
}

impl Typology {
    pub fn name(self) -> &'static str {
        match self {
            Typology::Single => "Single",
            Typology::L => "L",
            Typology::C => "C",
            Typology::T => "T",
            Typology::E => "E",
            Typology::Patio => "Patio",
            Typology::PatioEqual => "PatioEqual",
            Typology::ClosedPatio => "ClosedPatio",
            Typology::Skyscraper => "Skyscraper",
        }
    }

    // number of input volumes to request for this typology
    pub fn volume_count(self, rng: &mut StdRng, max_volumes: usize) -> usize {
        match self {
            Typology::Single => 1,
            Typology::L | Typology::T | Typology::ClosedPatio => 2,
            Typology::C => 3,
            Typology::E => rng.random_range(2..=max_volumes.max(2)),
            Typology::Patio | Typology::PatioEqual => *[2usize, 4].choose(rng).unwrap_or(&2),
            Typology::Skyscraper => rng.random_range(1..=max_volumes.max(1)),
        }
    }

    fn check_cardinality(self, got: usize) -> Result<()> {
        let ok = match self {
            Typology::Single => got == 1,
            Typology::L | Typology::T | Typology::ClosedPatio => got == 2,
            Typology::C => got == 3,
            Typology::E => got >= 2,
            Typology::Patio | Typology::PatioEqual => got == 2 || got == 4,
            Typology::Skyscraper => got >= 1,
        };
        if ok {
            Ok(())
        } else {
            Err(GenError::Cardinality {
                typology: self.name(),
                expected: match self {
                    Typology::Single => "exactly 1",
                    Typology::L | Typology::T | Typology::ClosedPatio => "exactly 2",
                    Typology::C => "exactly 3",
                    Typology::E => "at least 2",
                    Typology::Patio | Typology::PatioEqual => "2 or 4",
                    Typology::Skyscraper => "at least 1",
                },
                got,
            })
        }
    }
}

/// A building composed of one or several volumes, arranged per its typology.
#[derive(Debug, Clone)]
pub struct ComposedBuilding {
    typology: Typology,
    volumes: Vec<Volume>,
}

impl ComposedBuilding {
    // validates cardinality before any correction runs
    pub fn new(typology: Typology, volumes: Vec<Volume>) -> Result<Self> {
        typology.check_cardinality(volumes.len())?;
        Ok(Self { typology, volumes })
    }

    pub fn typology(&self) -> Typology {
        self.typology
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn into_volumes(self) -> Vec<Volume> {
        self.volumes
    }

    /// Applies the typology's correction and connector pass. Correction always
    /// precedes connector application; volume positions are final afterwards.
    pub fn compose(&mut self, rng: &mut StdRng, params: &GenParams) -> Result<&[Volume]> {
        match self.typology {
            Typology::Single => {}
            Typology::L => {
                correct_l(&mut self.volumes, rng, params);
                let (head, tail) = self.volumes.split_at_mut(1);
                attach(&head[0], &mut tail[0], Axis::X, Anchor::Near, Anchor::Near);
            }
            Typology::C => {
                correct_l(&mut self.volumes, rng, params);
                for v in &mut self.volumes[1..] {
                    if v.width < v.length {
                        v.rotate();
                    }
                }
                let (head, tail) = self.volumes.split_at_mut(1);
                attach(&head[0], &mut tail[0], Axis::X, Anchor::Center, Anchor::Near);
                attach(&head[0], &mut tail[1], Axis::X, Anchor::Near, Anchor::Near);
            }
            Typology::T => {
                let along_x = rng.random_bool(0.5);
                let (head, tail) = self.volumes.split_at_mut(1);
                place_satellite(&head[0], &mut tail[0], along_x, rng);
            }
            Typology::E => {
                // one coin flip picks the side, slots are drawn per volume
                let along_x = rng.random_bool(0.5);
                let (head, tail) = self.volumes.split_at_mut(1);
                for v in tail {
                    place_satellite(&head[0], v, along_x, rng);
                }
            }
            Typology::Patio => {
                correct_patio(&mut self.volumes, rng, params);
                sort_by_length_ascending(&mut self.volumes);
                link_patio(&mut self.volumes, rng);
            }
            Typology::PatioEqual => {
                let height = harmonized_height(&self.volumes[0], params);
                correct_patio(&mut self.volumes, rng, params);
                for v in &mut self.volumes {
                    v.height = height;
                }
                sort_by_length_ascending(&mut self.volumes);
                link_patio(&mut self.volumes, rng);
            }
            Typology::ClosedPatio => {
                correct_patio(&mut self.volumes, rng, params);
                // the two corrected volumes are mirrored by exact twins,
                // closing the ring with four walls
                for i in 0..2 {
                    let mut twin = self.volumes[i].clone();
                    twin.position = glam::Vec3::ZERO;
                    self.volumes.push(twin);
                }
                sort_by_length_ascending(&mut self.volumes);
                link_patio(&mut self.volumes, rng);
            }
            Typology::Skyscraper => {
                // independent towers, no connector pass
                for v in &mut self.volumes {
                    v.height =
                        rng.random_range(TOWER_HEIGHT_MIN as i32..TOWER_HEIGHT_MAX as i32) as f32;
                    v.length = v.length.max(TOWER_FOOTPRINT_MIN);
                    v.width = v.width.max(TOWER_FOOTPRINT_MIN);
                }
            }
        }
        Ok(&self.volumes)
    }
}

// equal height on a coin flip, then sort by length descending
fn correct_l(volumes: &mut [Volume], rng: &mut StdRng, params: &GenParams) {
    if rng.random_bool(0.5) {
        let height = harmonized_height(&volumes[0], params);
        for v in volumes.iter_mut() {
            v.height = height;
        }
    }
    volumes.sort_by(|a, b| b.length.total_cmp(&a.length));
}

// height clamped to [min height, min(3 * width, max height)]
fn harmonized_height(lead: &Volume, params: &GenParams) -> f32 {
    lead.height
        .min(lead.width * 3.0)
        .min(params.max_height)
        .max(params.min_height)
}

// patio wings are narrow and elongated: width drives the length
fn correct_patio(volumes: &mut [Volume], rng: &mut StdRng, params: &GenParams) {
    for v in volumes.iter_mut() {
        v.width = v.width.clamp(PATIO_WIDTH_MIN, PATIO_WIDTH_MAX);
        v.length = v.width * rng.random_range(PATIO_LENGTH_RATIO_MIN..PATIO_LENGTH_RATIO_MAX);
        v.height = v
            .height
            .min(v.width * 3.0)
            .min(params.max_height)
            .max(params.min_height);
    }
}

fn sort_by_length_ascending(volumes: &mut [Volume]) {
    volumes.sort_by(|a, b| a.length.total_cmp(&b.length));
}

// chains volume i -> i+1 with alternating 90 degree rotations, either
// around the courtyard ("circular") or stacked along one side ("cap")
fn link_patio(volumes: &mut [Volume], rng: &mut StdRng) {
    let circular = rng.random_bool(0.5);
    for i in 0..volumes.len() - 1 {
        if i % 2 == 0 {
            volumes[i + 1].rotate();
        }
        let (axis, lateral, vertical) = if circular {
            match i {
                0 => (Axis::X, Anchor::Center, Anchor::Center),
                1 => (Axis::Y, Anchor::Center, Anchor::Near),
                _ => (Axis::X, Anchor::Near, Anchor::Near),
            }
        } else {
            match i {
                0 | 1 => (Axis::Y, Anchor::Center, Anchor::Near),
                _ => (Axis::Y, Anchor::Near, Anchor::Center),
            }
        };
        let (head, tail) = volumes.split_at_mut(i + 1);
        attach(&head[i], &mut tail[0], axis, lateral, vertical);
    }
}

// T/E satellite placement: one of SLOT_CANDIDATES evenly spaced offsets
// inside the host's usable span, flush against the host's near edge
fn place_satellite(host: &Volume, v: &mut Volume, along_x: bool, rng: &mut StdRng) {
    let (x_min, x_max) = host.extent(Axis::X);
    let (y_min, y_max) = host.extent(Axis::Y);

    if along_x {
        let start = x_min + v.width / 2.0;
        let end = x_max - v.width / 2.0;
        v.position.x = choose_slot(start, end, rng);
        v.position.y = y_min - v.length / 2.0;
    } else {
        let start = y_min + v.length / 2.0;
        let end = y_max - v.length / 2.0;
        v.position.y = choose_slot(start, end, rng);
        v.position.x = x_min - v.width / 2.0;
    }
    v.position.z = host.position.z;
}

// a satellite wider than the host collapses to the span midpoint
fn choose_slot(start: f32, end: f32, rng: &mut StdRng) -> f32 {
    if end <= start {
        return (start + end) / 2.0;
    }
    let i = rng.random_range(0..SLOT_CANDIDATES);
    start + (end - start) * i as f32 / (SLOT_CANDIDATES - 1) as f32
}
