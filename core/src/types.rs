/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for cell totals and scan budgets.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Taxicab distance between two coordinates; adjacency means exactly 1.
pub const fn manhattan(a: Coord2, b: Coord2) -> CellCount {
    let dx = a.0.abs_diff(b.0) as CellCount;
    let dy = a.1.abs_diff(b.1) as CellCount;
    dx + dy
}
