//! Property tests for the placement planner over randomized fleets.

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use broadside::{
    placement::{place_fleet, place_fleet_with_fallback},
    Board, Cell, Dimensions, Fleet, BASELINE_RETRIES,
};

/// Build a catalog for a 10x10 board from the given ship lengths. Symbols
/// are assigned alphabetically, skipping the reserved markers.
fn fleet_of(lengths: &[usize]) -> Fleet {
    let mut fleet = Fleet::new(Dimensions::new(10, 10));
    let mut symbols = ('a'..='z').filter(|c| !broadside::RESERVED_SYMBOLS.contains(c));
    for &length in lengths {
        let symbol = symbols.next().unwrap();
        fleet
            .add_ship(length, symbol, format!("ship {}", symbol))
            .unwrap();
    }
    fleet
}

fn ship_cell_counts(board: &Board, fleet: &Fleet) -> Vec<usize> {
    (0..fleet.ship_count())
        .map(|ship| {
            board
                .iter_rows()
                .flatten()
                .filter(|c| *c == Cell::Ship(ship))
                .count()
        })
        .collect()
}

proptest! {
    #[test]
    fn any_feasible_fleet_places_within_the_baseline_budget(
        lengths in prop::collection::vec(1usize..=5, 1..=6),
        seed in any::<u64>(),
    ) {
        // Keep fleets comfortably placeable even under a half-blocked board.
        prop_assume!(lengths.iter().sum::<usize>() <= 20);
        let fleet = fleet_of(&lengths);
        let mut board = Board::new(fleet.dimensions());
        let mut rng = StdRng::seed_from_u64(seed);
        place_fleet(&mut board, &fleet, &mut rng, BASELINE_RETRIES).unwrap();
        prop_assert_eq!(ship_cell_counts(&board, &fleet), lengths);
    }

    #[test]
    fn the_fallback_planner_places_the_same_fleets(
        lengths in prop::collection::vec(1usize..=5, 1..=6),
        seed in any::<u64>(),
    ) {
        prop_assume!(lengths.iter().sum::<usize>() <= 20);
        let fleet = fleet_of(&lengths);
        let mut board = Board::new(fleet.dimensions());
        let mut rng = StdRng::seed_from_u64(seed);
        place_fleet_with_fallback(&mut board, &fleet, &mut rng).unwrap();
        prop_assert_eq!(ship_cell_counts(&board, &fleet), lengths);
        // Planning never leaves blocking debris behind.
        prop_assert!(!board.iter_rows().flatten().any(|c| c == Cell::Blocked));
    }
}
