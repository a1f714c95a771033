//! The placement planner: finds a legal placement for every ship in a fleet
//! via a column-major sweep with backtracking, diversified across retries by
//! randomly pre-blocking half the board.

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::{
    board::{Board, CannotUnplaceReason, Coordinate, Orientation},
    fleet::{Fleet, ShipId},
};

/// Retry budget used by the baseline planning strategy.
pub const BASELINE_RETRIES: usize = 50;
/// Retry budget used by the more persistent planning strategy.
pub const PERSISTENT_RETRIES: usize = 100;
/// Attempts per ship in the no-backtracking random fallback.
const FALLBACK_ATTEMPTS_PER_SHIP: usize = 100;

/// Error returned when the planner cannot place a fleet. Escalated to the
/// match orchestrator as a hard setup failure.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum PlacementError {
    /// A ship is longer than both board axes and can never be placed.
    #[error("ship {ship} has length {length}, which cannot fit on the board along either axis")]
    UnfittableShip { ship: ShipId, length: usize },
    /// The retry budget ran out without finding a legal arrangement.
    #[error("no legal fleet arrangement found after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// One backtracking frame of the sweep: a placement we made and may need to
/// undo if no arrangement exists for the ships after it.
#[derive(Debug, Copy, Clone)]
struct Frame {
    anchor: Coordinate,
    ship: ShipId,
    orient: Orientation,
}

/// After a failed branch, which move to make from the frame's anchor next.
fn resume_after(orient: Orientation) -> Option<Orientation> {
    match orient {
        Orientation::Horizontal => Some(Orientation::Vertical),
        Orientation::Vertical => None,
    }
}

/// Run one full placement sweep from the board origin, placing ships in
/// catalog order. Anchors are scanned column-first within each row; at each
/// anchor Horizontal is tried before Vertical, and a failed branch undoes
/// its placement and resumes at the same anchor with the next option.
///
/// Returns `true` with every ship placed, or `false` with the board exactly
/// as it was (every tentative placement undone).
fn sweep_place(board: &mut Board, fleet: &Fleet) -> bool {
    let dim = board.dimensions();
    let total = fleet.ship_count();
    if total == 0 {
        return true;
    }
    let mut stack: Vec<Frame> = Vec::with_capacity(total);
    let mut at = Coordinate::new(0, 0);
    let mut ship: ShipId = 0;
    // `Some(orient)` tries a placement at `at`; `None` advances the scan.
    let mut attempt = Some(Orientation::Horizontal);
    loop {
        if at.col == dim.cols() {
            at = Coordinate::new(at.row + 1, 0);
        }
        match attempt {
            Some(orient) => {
                if board.place_ship(fleet, at, ship, orient).is_ok() {
                    stack.push(Frame {
                        anchor: at,
                        ship,
                        orient,
                    });
                    ship += 1;
                    if ship == total {
                        return true;
                    }
                    // The next ship starts scanning from the same anchor.
                    attempt = Some(Orientation::Horizontal);
                } else {
                    attempt = resume_after(orient);
                }
            }
            None if at.row == dim.rows() => {
                // Scanned past the last row: this branch has no arrangement.
                match stack.pop() {
                    None => return false,
                    Some(frame) => {
                        undo(board, fleet, frame);
                        at = frame.anchor;
                        ship = frame.ship;
                        attempt = resume_after(frame.orient);
                    }
                }
            }
            None => {
                at = Coordinate::new(at.row, at.col + 1);
                attempt = Some(Orientation::Horizontal);
            }
        }
    }
}

/// Undo a placement recorded on the sweep stack.
fn undo(board: &mut Board, fleet: &Fleet, frame: Frame) {
    // Placements on the stack are always intact, so this cannot fail.
    let undone: Result<(), CannotUnplaceReason> =
        board.unplace_ship(fleet, frame.anchor, frame.ship, frame.orient);
    debug_assert!(undone.is_ok());
}

/// Check for ships that cannot fit on the board along either axis.
fn check_fittable(board: &Board, fleet: &Fleet) -> Result<(), PlacementError> {
    let dim = board.dimensions();
    for (ship, spec) in fleet.iter().enumerate() {
        if spec.length() > dim.rows() && spec.length() > dim.cols() {
            return Err(PlacementError::UnfittableShip {
                ship,
                length: spec.length(),
            });
        }
    }
    Ok(())
}

/// Place every ship of `fleet` on `board`, retrying the backtracking sweep
/// with a fresh random blocking pattern up to `retries` times.
///
/// On success the board holds exactly the fleet's footprints and nothing
/// else; on failure it is left unblocked and unchanged.
pub fn place_fleet<R: Rng + ?Sized>(
    board: &mut Board,
    fleet: &Fleet,
    rng: &mut R,
    retries: usize,
) -> Result<(), PlacementError> {
    check_fittable(board, fleet)?;
    for attempt in 0..retries {
        board.block(rng);
        let placed = sweep_place(board, fleet);
        board.unblock();
        if placed {
            debug!("fleet placed on sweep attempt {}", attempt + 1);
            return Ok(());
        }
    }
    debug!("sweep budget of {} attempts exhausted", retries);
    Err(PlacementError::Exhausted { attempts: retries })
}

/// Place every ship at uniformly random anchors, trying both orientations
/// per sample, with no backtracking. Used as the persistent strategy's last
/// resort when the sweep budget runs out.
pub fn place_fleet_random<R: Rng + ?Sized>(
    board: &mut Board,
    fleet: &Fleet,
    rng: &mut R,
) -> Result<(), PlacementError> {
    check_fittable(board, fleet)?;
    let dim = board.dimensions();
    for ship in 0..fleet.ship_count() {
        let mut placed = false;
        for _ in 0..FALLBACK_ATTEMPTS_PER_SHIP {
            let anchor = dim.random_coordinate(rng);
            if board
                .place_ship(fleet, anchor, ship, Orientation::Horizontal)
                .is_ok()
                || board
                    .place_ship(fleet, anchor, ship, Orientation::Vertical)
                    .is_ok()
            {
                placed = true;
                break;
            }
        }
        if !placed {
            // Do not leave a partial fleet behind.
            board.clear();
            return Err(PlacementError::Exhausted {
                attempts: FALLBACK_ATTEMPTS_PER_SHIP,
            });
        }
    }
    Ok(())
}

/// Persistent planning: the full sweep budget, then the random fallback.
pub fn place_fleet_with_fallback<R: Rng + ?Sized>(
    board: &mut Board,
    fleet: &Fleet,
    rng: &mut R,
) -> Result<(), PlacementError> {
    match place_fleet(board, fleet, rng, PERSISTENT_RETRIES) {
        Err(PlacementError::Exhausted { .. }) => {
            debug!("falling back to random placement");
            place_fleet_random(board, fleet, rng)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::board::{Cell, Dimensions};

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

    fn ship_cells(board: &Board, ship: ShipId) -> usize {
        board
            .iter_rows()
            .flatten()
            .filter(|c| *c == Cell::Ship(ship))
            .count()
    }

    #[test]
    fn sweep_fills_a_tight_board_deterministically() {
        let dim = Dimensions::new(2, 2);
        let mut fleet = Fleet::new(dim);
        fleet.add_ship(2, 'a', "first").unwrap();
        fleet.add_ship(2, 'b', "second").unwrap();
        let mut board = Board::new(dim);
        assert!(sweep_place(&mut board, &fleet));
        // Column-major scan puts the first ship across the top row and the
        // second across the bottom.
        assert_eq!(board.cell(Coordinate::new(0, 0)), Some(Cell::Ship(0)));
        assert_eq!(board.cell(Coordinate::new(0, 1)), Some(Cell::Ship(0)));
        assert_eq!(board.cell(Coordinate::new(1, 0)), Some(Cell::Ship(1)));
        assert_eq!(board.cell(Coordinate::new(1, 1)), Some(Cell::Ship(1)));
    }

    #[test]
    fn sweep_backtracks_out_of_a_dead_end() {
        // With ships of length 2, 3, 3 on a 3x3 board, the greedy choice of
        // placing the second ship vertically in the last column leaves no
        // room for the third; the sweep must undo it and lay all three out
        // in rows.
        let dim = Dimensions::new(3, 3);
        let mut fleet = Fleet::new(dim);
        fleet.add_ship(2, 'a', "first").unwrap();
        fleet.add_ship(3, 'b', "second").unwrap();
        fleet.add_ship(3, 'c', "third").unwrap();
        let mut board = Board::new(dim);
        assert!(sweep_place(&mut board, &fleet));
        assert_eq!(ship_cells(&board, 0), 2);
        assert_eq!(board.cell(Coordinate::new(1, 0)), Some(Cell::Ship(1)));
        assert_eq!(board.cell(Coordinate::new(1, 2)), Some(Cell::Ship(1)));
        assert_eq!(board.cell(Coordinate::new(2, 0)), Some(Cell::Ship(2)));
        assert_eq!(board.cell(Coordinate::new(2, 2)), Some(Cell::Ship(2)));
    }

    #[test]
    fn sweep_failure_leaves_the_board_unchanged() {
        // Two length-3 ships cannot fit on 1x3 alongside each other; the
        // catalog is built for a taller board and deliberately mismatched.
        let mut fleet = Fleet::new(Dimensions::new(3, 3));
        fleet.add_ship(3, 'a', "first").unwrap();
        fleet.add_ship(3, 'b', "second").unwrap();
        let mut board = Board::new(Dimensions::new(1, 3));
        assert!(!sweep_place(&mut board, &fleet));
        assert!(board.iter_rows().flatten().all(|c| c == Cell::Empty));
    }

    #[test]
    fn place_fleet_succeeds_with_seeded_rng() {
        let fleet = standard_fleet();
        let mut board = Board::new(fleet.dimensions());
        let mut rng = StdRng::seed_from_u64(42);
        place_fleet(&mut board, &fleet, &mut rng, BASELINE_RETRIES).unwrap();
        // Every ship is fully placed and no cells overlap or remain blocked.
        for (ship, spec) in fleet.iter().enumerate() {
            assert_eq!(ship_cells(&board, ship), spec.length());
        }
        let occupied = board
            .iter_rows()
            .flatten()
            .filter(|c| c.is_ship())
            .count();
        assert_eq!(occupied, fleet.total_length());
        assert!(!board.iter_rows().flatten().any(|c| c == Cell::Blocked));
    }

    #[test]
    fn random_fallback_places_the_standard_fleet() {
        let fleet = standard_fleet();
        let mut board = Board::new(fleet.dimensions());
        let mut rng = StdRng::seed_from_u64(7);
        place_fleet_random(&mut board, &fleet, &mut rng).unwrap();
        for (ship, spec) in fleet.iter().enumerate() {
            assert_eq!(ship_cells(&board, ship), spec.length());
        }
    }

    #[test]
    fn unfittable_ship_fails_immediately() {
        // A catalog validated for a 10x10 board, used against a 3x3 board.
        let mut fleet = Fleet::new(Dimensions::new(10, 10));
        fleet.add_ship(5, 'a', "aircraft carrier").unwrap();
        let mut board = Board::new(Dimensions::new(3, 3));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            place_fleet(&mut board, &fleet, &mut rng, BASELINE_RETRIES),
            Err(PlacementError::UnfittableShip { ship: 0, length: 5 })
        );
    }
}
