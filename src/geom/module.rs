// decorative modules (windows) and the grid applier that tiles them
// across a volume face

use glam::Vec3;

use crate::config::WINDOW_SCALE;
use crate::error::{GenError, Result};
use crate::geom::Axis;
use crate::geom::connect::{Anchor, Prism, attach};
use crate::geom::volume::Volume;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Generic,
    Window,
}

// recorded face binding, written by connect() and read by the grid applier
#[derive(Debug, Clone, Copy)]
pub struct Connection {
    pub axis: Axis,
}

/// A small fixture attached to a volume's face. Shares the volume's position
/// convention: footprint centered on position.xy, base at position.z.
#[derive(Debug, Clone)]
pub struct Module {
    pub kind: ModuleKind,
    pub name: String,
    pub scale: Vec3,
    pub position: Vec3,
    connection: Option<Connection>,
}

impl Module {
    pub fn new(kind: ModuleKind, name: impl Into<String>, scale: Vec3) -> Self {
        Self {
            kind,
            name: name.into(),
            scale,
            position: Vec3::ZERO,
            connection: None,
        }
    }

    pub fn connection(&self) -> Option<Connection> {
        self.connection
    }

    /// Attaches the module flush against the host face on `axis`, aligned to
    /// the near edge laterally and centered vertically.
    pub fn connect(&mut self, host: &Volume, axis: Axis) {
        // windows are thin along Y; rotate the footprint when the face
        // normal runs along X so the thin side meets the wall. the
        // orientation is absolute, so reconnecting is repeat-safe
        let wants_rotation = self.kind == ModuleKind::Window && axis == Axis::X;
        let rotated = self.kind == ModuleKind::Window
            && matches!(self.connection, Some(c) if c.axis == Axis::X);
        if wants_rotation != rotated {
            std::mem::swap(&mut self.scale.x, &mut self.scale.y);
        }
        attach(host, self, axis, Anchor::Near, Anchor::Center);
        self.connection = Some(Connection { axis });
    }
}

impl Prism for Module {
    fn size(&self, axis: Axis) -> f32 {
        self.scale[axis.index()]
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, p: Vec3) {
        self.position = p;
    }
}

/// Produces module templates by whitelist name; unknown names fall back to a
/// generic unit fixture.
pub struct ModuleFactory;

impl ModuleFactory {
    pub fn produce(name: &str) -> Module {
        match name {
            "window" => Module::new(ModuleKind::Window, name, Vec3::from_array(WINDOW_SCALE)),
            _ => Module::new(ModuleKind::Generic, name, Vec3::ONE),
        }
    }
}

// grid parameters: exactly one of grid (cols, rows) or step (explicit
// spacing) must be present; offset is (left, bottom, right, top)
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    grid: Option<(u32, u32)>,
    step: Option<(f32, f32)>,
    offset: [f32; 4],
}

impl GridSpec {
    pub fn grid(cols: u32, rows: u32) -> Self {
        Self {
            grid: Some((cols, rows)),
            step: None,
            offset: [1.0; 4],
        }
    }

    pub fn step(horizontal: f32, vertical: f32) -> Self {
        Self {
            grid: None,
            step: Some((horizontal, vertical)),
            offset: [1.0; 4],
        }
    }

    pub fn with_offset(mut self, offset: [f32; 4]) -> Self {
        self.offset = offset;
        self
    }
}

/// Tiles clones of a connected module template across its host face on a
/// regular lattice. The template is consumed; only clones persist.
pub struct GridApplier;

impl GridApplier {
    pub fn apply(template: Module, host: &Volume, spec: &GridSpec) -> Result<Vec<Module>> {
        let connection = template.connection.ok_or(GenError::UnconnectedModule)?;
        if spec.grid.is_none() && spec.step.is_none() {
            return Err(GenError::MissingGridSpec);
        }
        if let Some((cols, rows)) = spec.grid
            && (cols == 0 || rows == 0)
        {
            return Err(GenError::MalformedInput {
                what: "grid count",
                value: 0.0,
            });
        }
        // a non-positive explicit step would never advance the lattice
        if let Some((sx, sh)) = spec.step
            && (sx <= 0.0 || sh <= 0.0)
        {
            return Err(GenError::MalformedInput {
                what: "grid step",
                value: sx.min(sh),
            });
        }

        let axis = connection.axis;
        let horiz = axis.other_horizontal();
        let half_w = template.size(horiz) / 2.0;
        let half_h = template.scale.z / 2.0;

        // usable face range: full extent minus the edge offsets and half the
        // module footprint, so instances never overflow the face
        let start_x = spec.offset[0] + half_w;
        let end_x = host.dim(horiz) - spec.offset[2] - half_w;
        let start_h = spec.offset[1] + half_h;
        let end_h = host.height - spec.offset[3] - half_h;

        let (step_x, step_h) = match spec.step {
            Some(step) => step,
            None => {
                let (cols, rows) = spec.grid.unwrap_or((1, 1));
                (
                    resolve_step(end_x - start_x, cols),
                    resolve_step(end_h - start_h, rows),
                )
            }
        };

        let face_min = host.extent(horiz).0;
        let mut clones = Vec::new();
        let mut x = start_x;
        while x < end_x {
            let mut h = start_h;
            while h < end_h {
                let mut m = template.clone();
                // lattice point in world space; perpendicular coordinate
                // stays at the template's face offset
                let mut pos = template.position;
                pos[horiz.index()] = face_min + x;
                pos.z = host.position.z + h - half_h;
                m.position = pos;
                clones.push(m);
                h += step_h;
            }
            x += step_x;
        }
        Ok(clones)
    }
}

// grid-count step with a ceiling fallback: a floored step of zero would never
// advance the lattice when the requested count exceeds the usable range
fn resolve_step(usable: f32, count: u32) -> f32 {
    let step = (usable / count as f32).floor();
    if step == 0.0 {
        (usable / count as f32).ceil()
    } else {
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::volume::DimBounds;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn host(w: f32, l: f32, h: f32) -> Volume {
        let bounds = DimBounds {
            min: Vec3::new(1.0, 1.0, 1.0),
            max: Vec3::new(100.0, 100.0, 100.0),
        };
        Volume::new(Vec3::new(w, l, h), Vec3::ZERO, &bounds).unwrap()
    }

    #[test]
    fn step_resolution_floors_then_falls_back_to_ceil() {
        assert_eq!(resolve_step(10.0, 3), 3.0);
        assert_eq!(resolve_step(2.0, 5), 1.0);
    }

    #[test]
    fn window_template_connects_flush_to_the_face() {
        let v = host(20.0, 16.0, 9.0);
        let mut w = ModuleFactory::produce("window");
        w.connect(&v, Axis::Y);

        // thin side meets the wall: module max Y touches host min Y
        assert!((w.extent(Axis::Y).1 - v.extent(Axis::Y).0).abs() < 1e-5);
        assert_eq!(w.extent(Axis::X).0, v.extent(Axis::X).0);
    }

    #[test]
    fn window_rotates_for_an_x_face() {
        let v = host(20.0, 16.0, 9.0);
        let mut w = ModuleFactory::produce("window");
        w.connect(&v, Axis::X);
        assert_eq!(w.scale.x, 0.05);
        assert_eq!(w.scale.y, 1.5);
    }

    #[test]
    fn reconnecting_keeps_the_orientation_absolute() {
        let v = host(20.0, 16.0, 9.0);
        let mut w = ModuleFactory::produce("window");
        w.connect(&v, Axis::X);
        let first = w.position;
        w.connect(&v, Axis::X);

        // same face, same orientation, same placement
        assert_eq!(w.scale.x, 0.05);
        assert_eq!(w.scale.y, 1.5);
        assert_eq!(w.position, first);

        // moving back to a Y face restores the footprint
        w.connect(&v, Axis::Y);
        assert_eq!(w.scale.x, 1.5);
        assert_eq!(w.scale.y, 0.05);
    }

    #[test]
    fn unconnected_template_is_rejected() {
        let v = host(20.0, 16.0, 9.0);
        let w = ModuleFactory::produce("window");
        let err = GridApplier::apply(w, &v, &GridSpec::grid(3, 3));
        assert!(matches!(err, Err(GenError::UnconnectedModule)));
    }

    #[test]
    fn grid_or_step_is_required() {
        let v = host(20.0, 16.0, 9.0);
        let mut w = ModuleFactory::produce("window");
        w.connect(&v, Axis::Y);
        let empty = GridSpec {
            grid: None,
            step: None,
            offset: [1.0; 4],
        };
        let err = GridApplier::apply(w, &v, &empty);
        assert!(matches!(err, Err(GenError::MissingGridSpec)));
    }

    #[test]
    fn clones_never_overflow_the_offset_reduced_face() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let v = host(
                rng.random_range(8.0..40.0),
                rng.random_range(8.0..40.0),
                rng.random_range(5.0..40.0),
            );
            let mut w = ModuleFactory::produce("window");
            let axis = if rng.random_bool(0.5) { Axis::X } else { Axis::Y };
            w.connect(&v, axis);

            let offset = [
                rng.random_range(0.0..2.0),
                rng.random_range(0.0..2.0),
                rng.random_range(0.0..2.0),
                rng.random_range(0.0..2.0),
            ];
            let spec = GridSpec::grid(rng.random_range(1..6), rng.random_range(1..6))
                .with_offset(offset);
            let clones = GridApplier::apply(w, &v, &spec).unwrap();

            let horiz = axis.other_horizontal();
            let eps = 1e-3;
            for m in &clones {
                assert!(m.extent(horiz).0 >= v.extent(horiz).0 + offset[0] - eps);
                assert!(m.extent(horiz).1 <= v.extent(horiz).1 - offset[2] + eps);
                assert!(m.extent(Axis::Z).0 >= v.extent(Axis::Z).0 + offset[1] - eps);
                assert!(m.extent(Axis::Z).1 <= v.extent(Axis::Z).1 - offset[3] + eps);
            }
        }
    }

    #[test]
    fn tiny_face_with_large_grid_still_advances() {
        // usable ranges under 3 against a 5x5 request: floored step is zero
        let v = host(5.0, 5.0, 5.0);
        let mut w = ModuleFactory::produce("window");
        w.connect(&v, Axis::Y);
        let spec = GridSpec::grid(5, 5).with_offset([0.375, 0.625, 0.375, 0.625]);
        let clones = GridApplier::apply(w, &v, &spec).unwrap();
        assert!(!clones.is_empty());
        assert!(clones.len() <= 25);
    }

    #[test]
    fn degenerate_range_yields_no_clones_and_no_error() {
        let v = host(2.0, 2.0, 2.0);
        let mut w = ModuleFactory::produce("window");
        w.connect(&v, Axis::Y);
        let spec = GridSpec::grid(3, 3).with_offset([3.0, 3.0, 3.0, 3.0]);
        let clones = GridApplier::apply(w, &v, &spec).unwrap();
        assert!(clones.is_empty());
    }

    #[test]
    fn non_positive_explicit_step_is_rejected() {
        let v = host(20.0, 16.0, 9.0);
        for step in [(0.0, 3.0), (3.0, 0.0), (-1.0, 3.0)] {
            let mut w = ModuleFactory::produce("window");
            w.connect(&v, Axis::Y);
            let err = GridApplier::apply(w, &v, &GridSpec::step(step.0, step.1));
            assert!(matches!(err, Err(GenError::MalformedInput { .. })));
        }
    }

    #[test]
    fn explicit_step_is_used_verbatim() {
        let v = host(20.0, 16.0, 9.0);
        let mut w = ModuleFactory::produce("window");
        w.connect(&v, Axis::Y);
        let spec = GridSpec::step(3.0, 3.0).with_offset([3.0, 1.0, 3.0, 1.0]);
        let clones = GridApplier::apply(w, &v, &spec).unwrap();

        // horizontal usable range is [3.75, 16.25) stepped by 3 -> 5 columns,
        // vertical [1.75, 7.25) stepped by 3 -> 2 rows
        assert_eq!(clones.len(), 10);
    }
}
