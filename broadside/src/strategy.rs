//! Attack-selection strategies and the shot bookkeeping they share.
//!
//! Every strategy offers the same four operations: plan a fleet layout,
//! propose an attack, observe the outcome of its own shot, and observe an
//! incoming shot from the opponent. The match orchestrator drives them
//! uniformly and never needs to know which variant it holds.

use log::trace;
use rand::Rng;

use crate::{
    board::{AttackOutcome, Board, Coordinate, Dimensions},
    fleet::Fleet,
    placement::{
        place_fleet, place_fleet_random, place_fleet_with_fallback, PlacementError,
        BASELINE_RETRIES,
    },
};

/// Give up on rejection sampling after this many draws per board cell and
/// fall back to a linear scan.
const SAMPLE_FACTOR: usize = 4;

/// One resolved shot: where it landed and what it did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShotRecord {
    pub coord: Coordinate,
    pub outcome: AttackOutcome,
}

/// History of a single side's resolved shots, in firing order. Rejected
/// shots (out of bounds, repeats) are never recorded.
#[derive(Debug, Clone, Default)]
pub struct ShotLog {
    shots: Vec<ShotRecord>,
}

impl ShotLog {
    /// Record a resolved shot.
    fn push(&mut self, coord: Coordinate, outcome: AttackOutcome) {
        self.shots.push(ShotRecord { coord, outcome });
    }

    /// Whether a shot has already been resolved at this coordinate.
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.shots.iter().any(|s| s.coord == coord)
    }

    /// Number of resolved shots.
    pub fn len(&self) -> usize {
        self.shots.len()
    }

    /// Whether no shots have been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Iterate the resolved shots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ShotRecord> {
        self.shots.iter()
    }

    /// Number of resolved shots on even-parity cells.
    fn parity_count(&self) -> usize {
        self.shots
            .iter()
            .filter(|s| (s.coord.row + s.coord.col) % 2 == 0)
            .count()
    }
}

/// Phase of a hunting strategy.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TargetingMode {
    /// No damaged, unsunk ship is known; probe for a fresh hit.
    Searching,
    /// At least one hit has not yet been resolved into a sinking; walk
    /// outward from the known hits.
    Tracking,
}

/// Shared state of the hunting strategies: the shot log, the current phase,
/// and the stack of hits still awaiting a sinking, newest on top.
#[derive(Debug, Clone)]
pub struct Hunter {
    log: ShotLog,
    mode: TargetingMode,
    anchors: Vec<Coordinate>,
}

impl Hunter {
    fn new() -> Self {
        Self {
            log: ShotLog::default(),
            mode: TargetingMode::Searching,
            anchors: Vec::new(),
        }
    }

    fn observe(&mut self, coord: Coordinate, outcome: AttackOutcome) {
        self.log.push(coord, outcome);
        match outcome {
            AttackOutcome::Miss => {}
            AttackOutcome::Hit(_) => {
                self.anchors.push(coord);
                self.mode = TargetingMode::Tracking;
            }
            AttackOutcome::Sunk(_) => {
                self.anchors.clear();
                self.mode = TargetingMode::Searching;
            }
        }
    }
}

/// A complete attack-selection policy for one side of a match.
///
/// The set of strategies is closed: the orchestrator matches on the variant
/// to dispatch, and every variant implements all four operations.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Uniform random shots at unattacked cells; random fleet layout.
    Random(ShotLog),
    /// Random search, then orthogonal tracking around hits; sweep-planned
    /// fleet layout with the baseline retry budget.
    HuntTrack(Hunter),
    /// Parity-restricted search, then the same tracking; sweep-planned
    /// layout with the persistent budget and a random fallback.
    HuntParity(Hunter),
}

impl Strategy {
    /// A strategy firing uniformly at random.
    pub fn random() -> Self {
        Strategy::Random(ShotLog::default())
    }

    /// A hunting strategy searching at random.
    pub fn hunt_track() -> Self {
        Strategy::HuntTrack(Hunter::new())
    }

    /// A hunting strategy searching only even-parity cells.
    pub fn hunt_parity() -> Self {
        Strategy::HuntParity(Hunter::new())
    }

    /// Place the fleet on `board` according to this strategy's planning
    /// policy.
    pub fn place_fleet<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        fleet: &Fleet,
        rng: &mut R,
    ) -> Result<(), PlacementError> {
        match self {
            Strategy::Random(_) => place_fleet_random(board, fleet, rng),
            Strategy::HuntTrack(_) => place_fleet(board, fleet, rng, BASELINE_RETRIES),
            Strategy::HuntParity(_) => place_fleet_with_fallback(board, fleet, rng),
        }
    }

    /// Choose the next cell to attack on a board of the given dimensions.
    pub fn choose_attack<R: Rng + ?Sized>(&self, dim: Dimensions, rng: &mut R) -> Coordinate {
        match self {
            Strategy::Random(log) => propose_random(log, dim, rng),
            Strategy::HuntTrack(hunter) => match hunter.mode {
                TargetingMode::Searching => propose_random(&hunter.log, dim, rng),
                TargetingMode::Tracking => propose_tracked(hunter, dim, rng),
            },
            Strategy::HuntParity(hunter) => match hunter.mode {
                TargetingMode::Searching => propose_parity(&hunter.log, dim, rng),
                TargetingMode::Tracking => propose_tracked(hunter, dim, rng),
            },
        }
    }

    /// Record the result of this strategy's own shot at `coord`. `None`
    /// means the shot was rejected by the board and nothing is recorded.
    pub fn observe_outcome(&mut self, coord: Coordinate, outcome: Option<AttackOutcome>) {
        let outcome = match outcome {
            Some(outcome) => outcome,
            None => {
                trace!("discarding rejected shot at {}", coord);
                return;
            }
        };
        match self {
            Strategy::Random(log) => log.push(coord, outcome),
            Strategy::HuntTrack(hunter) | Strategy::HuntParity(hunter) => {
                hunter.observe(coord, outcome)
            }
        }
    }

    /// Notification that the opponent attacked `coord` on this side's own
    /// board. None of the current strategies reacts to it, but the
    /// orchestrator reports it to every strategy all the same.
    pub fn observe_opponent_attack(&mut self, _coord: Coordinate) {}

    /// This side's log of resolved shots.
    pub fn shot_log(&self) -> &ShotLog {
        match self {
            Strategy::Random(log) => log,
            Strategy::HuntTrack(hunter) | Strategy::HuntParity(hunter) => &hunter.log,
        }
    }
}

/// Uniformly sample an unattacked coordinate. Falls back to a scan if
/// sampling keeps colliding with the log, and to an arbitrary sample if the
/// whole board has been shot out (the match should already be over).
fn propose_random<R: Rng + ?Sized>(log: &ShotLog, dim: Dimensions, rng: &mut R) -> Coordinate {
    for _ in 0..SAMPLE_FACTOR * dim.total_size() {
        let coord = dim.random_coordinate(rng);
        if !log.contains(coord) {
            return coord;
        }
    }
    match dim
        .iter_coordinates()
        .flatten()
        .find(|&coord| !log.contains(coord))
    {
        Some(coord) => coord,
        None => dim.random_coordinate(rng),
    }
}

/// Sample an unattacked even-parity coordinate. Every ship of length >= 2
/// crosses the even-parity checkerboard, so searching only those cells
/// still finds every ship. Once half the board's worth of parity cells has
/// been shot, reverts to plain random search.
fn propose_parity<R: Rng + ?Sized>(log: &ShotLog, dim: Dimensions, rng: &mut R) -> Coordinate {
    if log.parity_count() >= dim.total_size() / 2 {
        return propose_random(log, dim, rng);
    }
    for _ in 0..SAMPLE_FACTOR * dim.total_size() {
        let coord = dim.random_coordinate(rng);
        if (coord.row + coord.col) % 2 == 0 && !log.contains(coord) {
            return coord;
        }
    }
    match dim
        .iter_coordinates()
        .flatten()
        .find(|&coord| (coord.row + coord.col) % 2 == 0 && !log.contains(coord))
    {
        Some(coord) => coord,
        None => propose_random(log, dim, rng),
    }
}

/// The four orthogonal probe directions, in the order tracking tries them.
const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Walk outward from the most recent unresolved hit, trying each direction
/// in turn and stepping over cells already shot. Anchors with no viable
/// neighbor left are skipped; with no anchors viable the search degrades to
/// a random probe.
fn propose_tracked<R: Rng + ?Sized>(hunter: &Hunter, dim: Dimensions, rng: &mut R) -> Coordinate {
    for &anchor in hunter.anchors.iter().rev() {
        for &(dr, dc) in &DIRECTIONS {
            let mut at = anchor;
            loop {
                at = match step(at, dr, dc, dim) {
                    Some(next) => next,
                    None => break,
                };
                if !hunter.log.contains(at) {
                    return at;
                }
            }
        }
    }
    propose_random(&hunter.log, dim, rng)
}

/// One step from `from` in the given direction, or `None` at the edge.
fn step(from: Coordinate, dr: isize, dc: isize, dim: Dimensions) -> Option<Coordinate> {
    let row = checked_offset(from.row, dr)?;
    let col = checked_offset(from.col, dc)?;
    let coord = Coordinate::new(row, col);
    if dim.contains(coord) {
        Some(coord)
    } else {
        None
    }
}

fn checked_offset(value: usize, delta: isize) -> Option<usize> {
    if delta < 0 {
        value.checked_sub(delta.unsigned_abs())
    } else {
        value.checked_add(delta as usize)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn coord(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn random_strategy_never_repeats_a_cell() {
        let dim = Dimensions::new(10, 10);
        let mut strategy = Strategy::random();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..dim.total_size() {
            let shot = strategy.choose_attack(dim, &mut rng);
            assert!(!strategy.shot_log().contains(shot));
            strategy.observe_outcome(shot, Some(AttackOutcome::Miss));
        }
        assert_eq!(strategy.shot_log().len(), dim.total_size());
    }

    #[test]
    fn parity_search_stays_on_the_checkerboard() {
        let dim = Dimensions::new(10, 10);
        let mut strategy = Strategy::hunt_parity();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let shot = strategy.choose_attack(dim, &mut rng);
            assert_eq!((shot.row + shot.col) % 2, 0);
            strategy.observe_outcome(shot, Some(AttackOutcome::Miss));
        }
    }

    #[test]
    fn a_hit_switches_to_tracking_the_neighbors() {
        let dim = Dimensions::new(10, 10);
        let mut strategy = Strategy::hunt_track();
        let mut rng = StdRng::seed_from_u64(0);
        strategy.observe_outcome(coord(3, 2), Some(AttackOutcome::Hit(1)));
        // Directions are tried in a fixed order, so the first probe is the
        // cell directly above the hit.
        assert_eq!(strategy.choose_attack(dim, &mut rng), coord(2, 2));
        strategy.observe_outcome(coord(2, 2), Some(AttackOutcome::Miss));
        // The same direction steps over the recorded miss.
        assert_eq!(strategy.choose_attack(dim, &mut rng), coord(1, 2));
        strategy.observe_outcome(coord(1, 2), Some(AttackOutcome::Miss));
        assert_eq!(strategy.choose_attack(dim, &mut rng), coord(0, 2));
        strategy.observe_outcome(coord(0, 2), Some(AttackOutcome::Miss));
        // Top edge reached: the probe swings right of the hit.
        assert_eq!(strategy.choose_attack(dim, &mut rng), coord(3, 3));
    }

    #[test]
    fn a_second_hit_becomes_the_new_anchor() {
        let dim = Dimensions::new(10, 10);
        let mut strategy = Strategy::hunt_track();
        let mut rng = StdRng::seed_from_u64(0);
        strategy.observe_outcome(coord(5, 5), Some(AttackOutcome::Hit(0)));
        strategy.observe_outcome(coord(4, 5), Some(AttackOutcome::Hit(0)));
        // Probing continues above the newest hit.
        assert_eq!(strategy.choose_attack(dim, &mut rng), coord(3, 5));
    }

    #[test]
    fn a_sinking_resets_the_search() {
        let dim = Dimensions::new(10, 10);
        let mut strategy = Strategy::hunt_parity();
        let mut rng = StdRng::seed_from_u64(0);
        strategy.observe_outcome(coord(3, 2), Some(AttackOutcome::Hit(2)));
        strategy.observe_outcome(coord(4, 2), Some(AttackOutcome::Sunk(2)));
        match &strategy {
            Strategy::HuntParity(hunter) => {
                assert_eq!(hunter.mode, TargetingMode::Searching);
                assert!(hunter.anchors.is_empty());
            }
            _ => unreachable!(),
        }
        // Back on the checkerboard.
        let shot = strategy.choose_attack(dim, &mut rng);
        assert_eq!((shot.row + shot.col) % 2, 0);
    }

    #[test]
    fn rejected_shots_are_not_recorded() {
        let mut strategy = Strategy::hunt_track();
        strategy.observe_outcome(coord(99, 99), None);
        assert!(strategy.shot_log().is_empty());
        match &strategy {
            Strategy::HuntTrack(hunter) => assert_eq!(hunter.mode, TargetingMode::Searching),
            _ => unreachable!(),
        }
    }
}
