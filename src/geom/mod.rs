// geometric composition core: volumes, alignment, typologies, factories, modules

pub mod collection;
pub mod connect;
pub mod factory;
pub mod module;
pub mod typology;
pub mod volume;

// canonical axis convention: 0 = X = width, 1 = Y = length, 2 = Z = height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    // the other horizontal axis, used when tiling a wall face
    pub fn other_horizontal(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
            Axis::Z => Axis::X,
        }
    }
}
