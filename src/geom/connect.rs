// connector / alignment algorithm
//
// positions a moving entity flush against a reference entity along one axis
// and aligns it on the two perpendicular axes with independent anchor choices.
// deterministic, idempotent, never moves the reference.

use glam::Vec3;

use crate::geom::Axis;

// minimal box interface shared by volumes and modules
// X/Y extents are centered on the position, the Z extent starts at it
pub trait Prism {
    fn size(&self, axis: Axis) -> f32;
    fn position(&self) -> Vec3;
    fn set_position(&mut self, p: Vec3);

    fn extent(&self, axis: Axis) -> (f32, f32) {
        let p = self.position()[axis.index()];
        match axis {
            Axis::X | Axis::Y => (p - self.size(axis) / 2.0, p + self.size(axis) / 2.0),
            Axis::Z => (p, p + self.size(axis)),
        }
    }
}

// edge selection on an axis perpendicular to the attachment axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Near,   // min edges coincide
    Center, // centers coincide
    Far,    // max edges coincide
}

/// Places `moving` flush against `reference` on the negative side of `axis`
/// (the moving entity's max face touches the reference's min face), then
/// aligns the two perpendicular axes. For a horizontal `axis`, `lateral`
/// aligns the other horizontal axis and `vertical` aligns Z; for `Axis::Z`,
/// they align X and Y respectively.
pub fn attach(
    reference: &impl Prism,
    moving: &mut (impl Prism + ?Sized),
    axis: Axis,
    lateral: Anchor,
    vertical: Anchor,
) {
    let (lat_axis, vert_axis) = match axis {
        Axis::X => (Axis::Y, Axis::Z),
        Axis::Y => (Axis::X, Axis::Z),
        Axis::Z => (Axis::X, Axis::Y),
    };

    let mut pos = moving.position();

    // flush placement: moving.max(axis) == reference.min(axis)
    // coordinates are computed absolutely from the reference extents and the
    // moving entity's own size, which makes reapplication exact
    let r_min = reference.extent(axis).0;
    pos[axis.index()] = match axis {
        Axis::X | Axis::Y => r_min - moving.size(axis) / 2.0,
        Axis::Z => r_min - moving.size(axis),
    };

    pos[lat_axis.index()] = anchor_coord(reference, moving, lat_axis, lateral);
    pos[vert_axis.index()] = anchor_coord(reference, moving, vert_axis, vertical);

    moving.set_position(pos);
}

// position coordinate that makes the selected edges (or centers) coincide
fn anchor_coord(
    reference: &impl Prism,
    moving: &(impl Prism + ?Sized),
    axis: Axis,
    anchor: Anchor,
) -> f32 {
    let (r_min, r_max) = reference.extent(axis);
    let s = moving.size(axis);
    match axis {
        // the position is the footprint center on horizontal axes
        Axis::X | Axis::Y => match anchor {
            Anchor::Near => r_min + s / 2.0,
            Anchor::Center => (r_min + r_max) / 2.0,
            Anchor::Far => r_max - s / 2.0,
        },
        // and the base on the vertical axis
        Axis::Z => match anchor {
            Anchor::Near => r_min,
            Anchor::Center => (r_min + r_max) / 2.0 - s / 2.0,
            Anchor::Far => r_max - s,
        },
    }
}
