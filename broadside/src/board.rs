//! The board state machine: authoritative cell state for one player's side
//! of the ocean, with placement, attack resolution and destruction queries.

use rand::Rng;

use crate::fleet::{Fleet, ShipId};

pub use self::{
    coordinate::{Coordinate, Orientation},
    dimensions::Dimensions,
    errors::{CannotAttackReason, CannotPlaceReason, CannotUnplaceReason},
};

mod coordinate;
mod dimensions;
mod errors;

/// State of a single board cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cell {
    /// Nothing here, never attacked.
    Empty,
    /// Temporary obstruction used only during placement search. Boards must
    /// be unblocked before real play begins.
    Blocked,
    /// An intact cell of the ship with the given id.
    Ship(ShipId),
    /// A previously attacked cell of the ship with the given id. Permanent.
    Hit(ShipId),
    /// A previously attacked empty cell. Permanent.
    Miss,
}

impl Cell {
    /// Whether this cell carries an intact ship segment.
    pub fn is_ship(self) -> bool {
        matches!(self, Cell::Ship(_))
    }
}

/// Outcome of a successfully resolved attack.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttackOutcome {
    /// The shot landed in open water.
    Miss,
    /// The shot hit the given ship without destroying it.
    Hit(ShipId),
    /// The shot hit the last intact cell of the given ship.
    Sunk(ShipId),
}

impl AttackOutcome {
    /// The ship that was hit, if any.
    pub fn ship(self) -> Option<ShipId> {
        match self {
            AttackOutcome::Miss => None,
            AttackOutcome::Hit(id) | AttackOutcome::Sunk(id) => Some(id),
        }
    }

    /// Whether the shot hit any ship.
    pub fn is_hit(self) -> bool {
        self.ship().is_some()
    }

    /// Whether the shot destroyed a ship.
    pub fn is_sunk(self) -> bool {
        matches!(self, AttackOutcome::Sunk(_))
    }
}

/// A single player's board. Owns its cell state exclusively; the two sides
/// of a match never share a board.
#[derive(Debug)]
pub struct Board {
    /// Dimensions of this board.
    dim: Dimensions,
    /// Cell states in row-major order.
    cells: Box<[Cell]>,
}

impl Board {
    /// Construct an all-empty board with the given [`Dimensions`].
    pub fn new(dim: Dimensions) -> Self {
        Self {
            dim,
            cells: vec![Cell::Empty; dim.total_size()].into_boxed_slice(),
        }
    }

    /// Get the [`Dimensions`] of this board.
    pub fn dimensions(&self) -> Dimensions {
        self.dim
    }

    /// Get the state of the cell at the given coordinate. Returns `None` if
    /// the coordinate is out of bounds.
    pub fn cell(&self, coord: Coordinate) -> Option<Cell> {
        self.dim.try_linearize(coord).map(|i| self.cells[i])
    }

    /// Get an iterator over rows of cell state, for rendering. Callers that
    /// hide fleets render [`Cell::Ship`] the same as [`Cell::Empty`].
    pub fn iter_rows<'a>(&'a self) -> impl 'a + Iterator<Item = impl 'a + Iterator<Item = Cell>> {
        self.dim
            .iter_coordinates()
            .map(move |row| row.map(move |coord| self[coord]))
    }

    /// Reset every cell to [`Cell::Empty`]. Used at board construction or
    /// reset, never mid-match.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::Empty;
        }
    }

    /// Mark random empty cells as [`Cell::Blocked`] until half the board
    /// (rounded down) is blocked, to diversify placement search attempts.
    pub fn block<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let target = self.dim.total_size() / 2;
        let mut empty = self.cells.iter().filter(|c| **c == Cell::Empty).count();
        let mut blocked = self.cells.iter().filter(|c| **c == Cell::Blocked).count();
        while blocked < target && empty > 0 {
            let coord = self.dim.random_coordinate(rng);
            if self[coord] == Cell::Empty {
                self[coord] = Cell::Blocked;
                blocked += 1;
                empty -= 1;
            }
        }
    }

    /// Revert every [`Cell::Blocked`] cell to [`Cell::Empty`]. Must be
    /// called before the board is used for real play.
    pub fn unblock(&mut self) {
        for cell in self.cells.iter_mut() {
            if *cell == Cell::Blocked {
                *cell = Cell::Empty;
            }
        }
    }

    /// Place a ship from `fleet` with its anchor (topmost or leftmost cell)
    /// at `anchor`, extending along `orient`. On failure nothing is mutated.
    pub fn place_ship(
        &mut self,
        fleet: &Fleet,
        anchor: Coordinate,
        ship: ShipId,
        orient: Orientation,
    ) -> Result<(), CannotPlaceReason> {
        if ship >= fleet.ship_count() {
            return Err(CannotPlaceReason::InvalidShipId);
        }
        if !self.dim.contains(anchor) {
            return Err(CannotPlaceReason::OutOfBounds);
        }
        let len = fleet.length(ship);
        let fits = match orient {
            Orientation::Horizontal => anchor.col + len <= self.dim.cols(),
            Orientation::Vertical => anchor.row + len <= self.dim.rows(),
        };
        if !fits {
            return Err(CannotPlaceReason::FootprintExceedsGrid);
        }
        // Re-placement is not allowed, even at the identical anchor.
        if self.cells.iter().any(|c| *c == Cell::Ship(ship)) {
            return Err(CannotPlaceReason::AlreadyPlaced);
        }
        for coord in orient.footprint(anchor, len) {
            if self[coord] != Cell::Empty {
                return Err(CannotPlaceReason::CellOccupied);
            }
        }
        for coord in orient.footprint(anchor, len) {
            self[coord] = Cell::Ship(ship);
        }
        Ok(())
    }

    /// Remove a previously placed ship. Fails without mutation unless every
    /// footprint cell currently carries exactly this ship.
    pub fn unplace_ship(
        &mut self,
        fleet: &Fleet,
        anchor: Coordinate,
        ship: ShipId,
        orient: Orientation,
    ) -> Result<(), CannotUnplaceReason> {
        if ship >= fleet.ship_count() {
            return Err(CannotUnplaceReason::InvalidShipId);
        }
        let len = fleet.length(ship);
        for coord in orient.footprint(anchor, len) {
            if self.cell(coord) != Some(Cell::Ship(ship)) {
                return Err(CannotUnplaceReason::FootprintMismatch);
            }
        }
        for coord in orient.footprint(anchor, len) {
            self[coord] = Cell::Empty;
        }
        Ok(())
    }

    /// Resolve an attack at the given coordinate.
    ///
    /// A shot on the last intact cell of a ship reports
    /// [`AttackOutcome::Sunk`]. Hit and miss markers are permanent; a second
    /// attack at the same cell is rejected, not reported as a repeat.
    pub fn attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, CannotAttackReason> {
        let idx = self
            .dim
            .try_linearize(coord)
            .ok_or(CannotAttackReason::OutOfBounds)?;
        match self.cells[idx] {
            Cell::Hit(_) | Cell::Miss => Err(CannotAttackReason::AlreadyAttacked),
            Cell::Ship(id) => {
                let remaining = self.cells.iter().filter(|c| **c == Cell::Ship(id)).count();
                self.cells[idx] = Cell::Hit(id);
                if remaining == 1 {
                    Ok(AttackOutcome::Sunk(id))
                } else {
                    Ok(AttackOutcome::Hit(id))
                }
            }
            // A blocked cell should never be attacked in real play; treat it
            // like open water.
            Cell::Empty | Cell::Blocked => {
                self.cells[idx] = Cell::Miss;
                Ok(AttackOutcome::Miss)
            }
        }
    }

    /// Returns true if no intact ship cell remains anywhere on the board.
    pub fn all_destroyed(&self) -> bool {
        !self.cells.iter().any(|c| c.is_ship())
    }

    /// Count the intact cells of the given ship still on the board.
    pub fn remaining_cells(&self, ship: ShipId) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Ship(ship)).count()
    }
}

impl std::ops::Index<Coordinate> for Board {
    type Output = Cell;

    fn index(&self, coord: Coordinate) -> &Cell {
        let idx = self.dim.try_linearize(coord).expect("coordinate out of bounds");
        &self.cells[idx]
    }
}

impl std::ops::IndexMut<Coordinate> for Board {
    fn index_mut(&mut self, coord: Coordinate) -> &mut Cell {
        let idx = self.dim.try_linearize(coord).expect("coordinate out of bounds");
        &mut self.cells[idx]
    }
}
