use std::fmt;

/// The coordinates of a single cell on a board, as a (row, column) pair.
///
/// A coordinate has no inherent validity; it is checked against a specific
/// board's [`Dimensions`][crate::board::Dimensions] at the point of use.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Coordinate {
    /// Row of the cell, counting down from the top.
    pub row: usize,
    /// Column of the cell, counting right from the left edge.
    pub col: usize,
}

impl Coordinate {
    /// Construct a [`Coordinate`] from the given row and column.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coordinate {
    /// Construct a [`Coordinate`] from a `(row, col)` pair.
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Axis along which a ship extends from its anchor cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Orientation {
    /// The ship extends rightwards; the anchor is its leftmost cell.
    Horizontal,
    /// The ship extends downwards; the anchor is its topmost cell.
    Vertical,
}

impl Orientation {
    /// Iterate the footprint of a ship of length `len` anchored at `anchor`
    /// along this orientation. Coordinates are produced anchor-first; no
    /// bounds checking is performed.
    pub fn footprint(self, anchor: Coordinate, len: usize) -> impl Iterator<Item = Coordinate> {
        (0..len).map(move |k| match self {
            Orientation::Horizontal => Coordinate::new(anchor.row, anchor.col + k),
            Orientation::Vertical => Coordinate::new(anchor.row + k, anchor.col),
        })
    }
}
