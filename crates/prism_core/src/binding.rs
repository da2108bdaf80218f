//! Material bindings: which material a surface shows at a given local
//! (2D) surface coordinate.

use prism_math::Vec2;

use crate::MaterialId;

/// Maps local surface coordinates to a material handle.
pub trait MaterialBinding: Send + Sync {
    /// Material at `local`, in the owning shape's local coordinates.
    fn material_at(&self, local: Vec2) -> MaterialId;

    /// Every material this binding can return.
    fn materials(&self) -> Vec<MaterialId>;
}

/// One material everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uniform(pub MaterialId);

impl MaterialBinding for Uniform {
    fn material_at(&self, _local: Vec2) -> MaterialId {
        self.0
    }

    fn materials(&self) -> Vec<MaterialId> {
        vec![self.0]
    }
}

/// Two materials alternating on a square grid of side `size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkerboard {
    inverse_size: f32,
    first: MaterialId,
    second: MaterialId,
}

impl Checkerboard {
    /// `first` covers cells whose two cell indices have different parity.
    ///
    /// A non-positive or non-finite `size` collapses to one cell per unit.
    pub fn new(size: f32, first: MaterialId, second: MaterialId) -> Self {
        let size = if size.is_finite() && size > 0.0 { size } else { 1.0 };
        Self {
            inverse_size: 1.0 / size,
            first,
            second,
        }
    }
}

impl MaterialBinding for Checkerboard {
    fn material_at(&self, local: Vec2) -> MaterialId {
        let cell = (local * self.inverse_size).floor();
        // Two's complement keeps the parity of negative cells.
        let a = cell.x as i64 & 1;
        let b = cell.y as i64 & 1;
        if a ^ b == 1 {
            self.first
        } else {
            self.second
        }
    }

    fn materials(&self) -> Vec<MaterialId> {
        vec![self.first, self.second]
    }
}
