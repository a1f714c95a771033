//! The match orchestrator: two boards, two strategies, strict alternation.

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::{
    board::{AttackOutcome, Board, Coordinate},
    fleet::Fleet,
    placement::PlacementError,
    strategy::Strategy,
};

/// The two sides of a match. Side A always moves first.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// What happened on one turn of the match.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TurnRecord {
    /// The side that fired this turn.
    pub attacker: Side,
    /// Where it fired.
    pub coord: Coordinate,
    /// The resolved outcome, or `None` if the board rejected the shot.
    pub outcome: Option<AttackOutcome>,
    /// The winner, if this turn ended the match.
    pub winner: Option<Side>,
}

/// Error raised when a match cannot be set up.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum MatchSetupError {
    /// One side's strategy failed to place its fleet.
    #[error("side {side:?} could not place its fleet")]
    Placement {
        side: Side,
        source: PlacementError,
    },
}

/// A full two-player match over a shared fleet catalog.
///
/// Construction gives each side an empty board sized to the catalog's
/// dimensions; [`setup`][Match::setup] places both fleets, and turns then
/// alternate strictly starting with [`Side::A`].
#[derive(Debug)]
pub struct Match {
    fleet: Fleet,
    boards: [Board; 2],
    strategies: [Strategy; 2],
    next: Side,
}

impl Match {
    /// Create a match between the two strategies over the given catalog.
    pub fn new(fleet: Fleet, side_a: Strategy, side_b: Strategy) -> Self {
        let dim = fleet.dimensions();
        Self {
            fleet,
            boards: [Board::new(dim), Board::new(dim)],
            strategies: [side_a, side_b],
            next: Side::A,
        }
    }

    /// The shared fleet catalog.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// The given side's own board.
    pub fn board(&self, side: Side) -> &Board {
        &self.boards[side.index()]
    }

    /// The given side's strategy.
    pub fn strategy(&self, side: Side) -> &Strategy {
        &self.strategies[side.index()]
    }

    /// The side that fires on the next call to [`play_turn`][Match::play_turn].
    pub fn next_side(&self) -> Side {
        self.next
    }

    /// Place both fleets. Any placement failure aborts setup.
    pub fn setup<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MatchSetupError> {
        for &side in &[Side::A, Side::B] {
            self.strategies[side.index()]
                .place_fleet(&mut self.boards[side.index()], &self.fleet, rng)
                .map_err(|source| MatchSetupError::Placement { side, source })?;
            debug!("side {:?} placed its fleet", side);
        }
        Ok(())
    }

    /// The winning side, if the match is over.
    ///
    /// If both fleets are somehow destroyed (possible only through external
    /// board manipulation, never through play) there is no winner.
    pub fn winner(&self) -> Option<Side> {
        let a_out = self.boards[Side::A.index()].all_destroyed();
        let b_out = self.boards[Side::B.index()].all_destroyed();
        match (a_out, b_out) {
            (false, true) => Some(Side::A),
            (true, false) => Some(Side::B),
            _ => None,
        }
    }

    /// Play a single turn: the next side picks a cell and fires at its
    /// opponent's board. The turn is consumed even if the board rejects the
    /// shot.
    pub fn play_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TurnRecord {
        let attacker = self.next;
        let defender = attacker.opponent();
        let dim = self.fleet.dimensions();
        let coord = self.strategies[attacker.index()].choose_attack(dim, rng);
        let outcome = self.boards[defender.index()].attack(coord).ok();
        debug!("side {:?} fired at {}: {:?}", attacker, coord, outcome);
        self.strategies[attacker.index()].observe_outcome(coord, outcome);
        self.strategies[defender.index()].observe_opponent_attack(coord);
        self.next = defender;
        TurnRecord {
            attacker,
            coord,
            outcome,
            winner: self.winner(),
        }
    }

    /// Play turns until one fleet is destroyed; returns the winner.
    ///
    /// Returns `None` without playing if both fleets are already destroyed.
    pub fn play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Side> {
        if self.boards.iter().all(Board::all_destroyed) {
            return None;
        }
        loop {
            if let Some(winner) = self.play_turn(rng).winner {
                return Some(winner);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::board::Dimensions;

    use super::*;

    fn standard_fleet() -> Fleet {
        let mut fleet = Fleet::new(Dimensions::new(10, 10));
        fleet.add_ship(5, 'a', "aircraft carrier").unwrap();
        fleet.add_ship(4, 'b', "battleship").unwrap();
        fleet.add_ship(3, 'd', "destroyer").unwrap();
        fleet.add_ship(3, 's', "submarine").unwrap();
        fleet.add_ship(2, 'p', "patrol boat").unwrap();
        fleet
    }

    #[test]
    fn turns_alternate_starting_with_side_a() {
        let mut game = Match::new(standard_fleet(), Strategy::random(), Strategy::random());
        let mut rng = StdRng::seed_from_u64(1);
        game.setup(&mut rng).unwrap();
        assert_eq!(game.next_side(), Side::A);
        let first = game.play_turn(&mut rng);
        assert_eq!(first.attacker, Side::A);
        assert_eq!(game.next_side(), Side::B);
        let second = game.play_turn(&mut rng);
        assert_eq!(second.attacker, Side::B);
        assert_eq!(game.next_side(), Side::A);
    }

    #[test]
    fn a_seeded_match_runs_to_a_decisive_end() {
        let mut game = Match::new(
            standard_fleet(),
            Strategy::hunt_track(),
            Strategy::hunt_parity(),
        );
        let mut rng = StdRng::seed_from_u64(2026);
        game.setup(&mut rng).unwrap();
        let winner = game.play(&mut rng).unwrap();
        let loser = winner.opponent();
        assert!(game.board(loser).all_destroyed());
        assert!(!game.board(winner).all_destroyed());
        assert_eq!(game.winner(), Some(winner));
    }

    #[test]
    fn a_fresh_match_has_no_winner() {
        let game = Match::new(standard_fleet(), Strategy::random(), Strategy::random());
        assert_eq!(game.fleet().ship_count(), 5);
        assert_eq!(game.next_side(), Side::A);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn setup_errors_name_the_failing_side() {
        let err = MatchSetupError::Placement {
            side: Side::B,
            source: PlacementError::Exhausted { attempts: 50 },
        };
        assert_eq!(err.to_string(), "side B could not place its fleet");
    }
}
