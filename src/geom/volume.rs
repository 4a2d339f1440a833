// axis-aligned box primitive, one massing block of a building
// footprint rectangle is centered on position.xy, the base sits at position.z

use glam::Vec3;

use crate::error::{GenError, Result};
use crate::geom::Axis;
use crate::geom::connect::Prism;

// per-axis dimension bounds in canonical order (width, length, height)
#[derive(Debug, Clone, Copy)]
pub struct DimBounds {
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub width: f32,
    pub length: f32,
    pub height: f32,
    pub position: Vec3,
}

impl Volume {
    /// Builds a volume from a requested scale, clamping each dimension up to
    /// the configured minimum. Never fails for too-small input, only for
    /// malformed (non-finite) input.
    pub fn new(scale: Vec3, location: Vec3, bounds: &DimBounds) -> Result<Self> {
        for (what, value) in [
            ("scale", scale.x),
            ("scale", scale.y),
            ("scale", scale.z),
            ("location", location.x),
            ("location", location.y),
            ("location", location.z),
        ] {
            if !value.is_finite() {
                return Err(GenError::MalformedInput { what, value });
            }
        }

        Ok(Self {
            width: scale.x.max(bounds.min.x),
            length: scale.y.max(bounds.min.y),
            height: scale.z.max(bounds.min.z),
            position: location,
        })
    }

    pub fn dim(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.length,
            Axis::Z => self.height,
        }
    }

    // (min, max) span of the bounding box along one axis
    pub fn extent(&self, axis: Axis) -> (f32, f32) {
        match axis {
            Axis::X => (
                self.position.x - self.width / 2.0,
                self.position.x + self.width / 2.0,
            ),
            Axis::Y => (
                self.position.y - self.length / 2.0,
                self.position.y + self.length / 2.0,
            ),
            Axis::Z => (self.position.z, self.position.z + self.height),
        }
    }

    // 90 degree footprint rotation about Z; boxes stay axis-aligned,
    // so this is exactly a width/length swap
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.length);
    }
}

impl Prism for Volume {
    fn size(&self, axis: Axis) -> f32 {
        self.dim(axis)
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, p: Vec3) {
        self.position = p;
    }
}
