//! The fleet catalog: the immutable per-game list of ships each side must
//! place, indexed by dense ship ids in insertion order.

use thiserror::Error;

use crate::board::Dimensions;

/// Index of a ship in the [`Fleet`] catalog. Ids are dense `0..ship_count()`,
/// assigned in insertion order.
pub type ShipId = usize;

/// Characters that the board rendering reserves for empty, miss, hit and
/// blocked cells. Ship symbols must not collide with these.
pub const RESERVED_SYMBOLS: [char; 4] = ['.', 'o', 'X', '#'];

/// Error returned when a ship cannot be added to the catalog.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum AddShipError {
    /// Ship lengths must be at least 1.
    #[error("bad ship length {length}; it must be >= 1")]
    BadLength { length: usize },
    /// The ship is longer than both board axes, so no straight placement
    /// can ever fit it.
    #[error("bad ship length {length}; it won't fit on the board")]
    DoesNotFit { length: usize },
    /// Symbols must be printable ASCII and must not be one of the reserved
    /// cell markers.
    #[error("character {symbol:?} must not be used as a ship symbol")]
    InvalidSymbol { symbol: char },
    /// Every ship symbol must be unique within the catalog.
    #[error("ship symbol {symbol:?} must not be used for more than one ship")]
    DuplicateSymbol { symbol: char },
    /// The combined length of all ships must fit on the board.
    #[error("board is too small to fit all ships")]
    InsufficientArea,
}

/// A single catalog entry: the shape and presentation of one ship.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShipSpec {
    length: usize,
    symbol: char,
    name: String,
}

impl ShipSpec {
    /// Number of consecutive cells the ship occupies.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Display symbol for the ship's cells.
    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Human-readable name of the ship.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The ordered set of ships one side must place, together with the board
/// dimensions the catalog was validated against.
///
/// A fleet is populated up front and then treated as immutable for the
/// duration of a match; the board and the players only ever consult it
/// through shared references.
#[derive(Debug, Clone)]
pub struct Fleet {
    dim: Dimensions,
    ships: Vec<ShipSpec>,
}

impl Fleet {
    /// Construct an empty catalog for boards of the given [`Dimensions`].
    pub fn new(dim: Dimensions) -> Self {
        Self {
            dim,
            ships: Vec::new(),
        }
    }

    /// The board dimensions this catalog was built for.
    pub fn dimensions(&self) -> Dimensions {
        self.dim
    }

    /// Add a ship to the catalog, returning its id.
    pub fn add_ship(
        &mut self,
        length: usize,
        symbol: char,
        name: impl Into<String>,
    ) -> Result<ShipId, AddShipError> {
        if length < 1 {
            return Err(AddShipError::BadLength { length });
        }
        if length > self.dim.rows() && length > self.dim.cols() {
            return Err(AddShipError::DoesNotFit { length });
        }
        if !symbol.is_ascii_graphic() || RESERVED_SYMBOLS.contains(&symbol) {
            return Err(AddShipError::InvalidSymbol { symbol });
        }
        if self.ships.iter().any(|s| s.symbol == symbol) {
            return Err(AddShipError::DuplicateSymbol { symbol });
        }
        if self.total_length() + length > self.dim.total_size() {
            return Err(AddShipError::InsufficientArea);
        }
        self.ships.push(ShipSpec {
            length,
            symbol,
            name: name.into(),
        });
        Ok(self.ships.len() - 1)
    }

    /// Number of ships in the catalog.
    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// Length of the ship with the given id. Panics if the id is not in
    /// `0..ship_count()`.
    pub fn length(&self, id: ShipId) -> usize {
        self.ships[id].length
    }

    /// Display symbol of the ship with the given id. Panics if the id is not
    /// in `0..ship_count()`.
    pub fn symbol(&self, id: ShipId) -> char {
        self.ships[id].symbol
    }

    /// Name of the ship with the given id. Panics if the id is not in
    /// `0..ship_count()`.
    pub fn name(&self, id: ShipId) -> &str {
        &self.ships[id].name
    }

    /// Iterate the catalog entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ShipSpec> {
        self.ships.iter()
    }

    /// Combined length of every ship in the catalog.
    pub fn total_length(&self) -> usize {
        self.ships.iter().map(|s| s.length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_in_insertion_order() {
        let mut fleet = Fleet::new(Dimensions::new(10, 10));
        assert_eq!(fleet.add_ship(5, 'a', "aircraft carrier"), Ok(0));
        assert_eq!(fleet.add_ship(4, 'b', "battleship"), Ok(1));
        assert_eq!(fleet.ship_count(), 2);
        assert_eq!(fleet.length(0), 5);
        assert_eq!(fleet.symbol(1), 'b');
        assert_eq!(fleet.name(1), "battleship");
    }

    #[test]
    fn rejects_degenerate_lengths() {
        let mut fleet = Fleet::new(Dimensions::new(4, 3));
        assert_eq!(
            fleet.add_ship(0, 'a', "raft"),
            Err(AddShipError::BadLength { length: 0 })
        );
        // Length 4 fits vertically even though it exceeds the column count.
        assert!(fleet.add_ship(4, 'a', "carrier").is_ok());
        assert_eq!(
            fleet.add_ship(5, 'b', "leviathan"),
            Err(AddShipError::DoesNotFit { length: 5 })
        );
    }

    #[test]
    fn rejects_reserved_and_duplicate_symbols() {
        let mut fleet = Fleet::new(Dimensions::new(10, 10));
        for &symbol in &RESERVED_SYMBOLS {
            assert_eq!(
                fleet.add_ship(2, symbol, "sneaky"),
                Err(AddShipError::InvalidSymbol { symbol })
            );
        }
        assert_eq!(
            fleet.add_ship(2, '\u{7}', "bell"),
            Err(AddShipError::InvalidSymbol { symbol: '\u{7}' })
        );
        fleet.add_ship(2, 'p', "patrol boat").unwrap();
        assert_eq!(
            fleet.add_ship(3, 'p', "pretender"),
            Err(AddShipError::DuplicateSymbol { symbol: 'p' })
        );
    }

    #[test]
    fn rejects_fleets_larger_than_the_board() {
        let mut fleet = Fleet::new(Dimensions::new(2, 2));
        fleet.add_ship(2, 'a', "first").unwrap();
        fleet.add_ship(2, 'b', "second").unwrap();
        assert_eq!(
            fleet.add_ship(1, 'c', "one too many"),
            Err(AddShipError::InsufficientArea)
        );
    }
}
