//! Core game logic for a two-player, grid-based naval combat simulation.
//!
//! The crate is organized around a small set of building blocks:
//!
//! - [`Fleet`]: the immutable catalog of ships both sides must place.
//! - [`Board`]: one side's grid, tracking placements and resolved shots.
//! - [`placement`]: the planner that finds legal fleet layouts.
//! - [`Strategy`]: the closed set of attack-selection policies.
//! - [`Match`]: the orchestrator that alternates turns until a fleet is
//!   destroyed.
//!
//! All randomness is drawn from caller-provided [`rand::Rng`] sources, so a
//! seeded generator makes entire matches reproducible.

pub mod board;
pub mod fleet;
pub mod game;
pub mod placement;
pub mod strategy;

pub use board::{
    AttackOutcome, Board, CannotAttackReason, CannotPlaceReason, CannotUnplaceReason, Cell,
    Coordinate, Dimensions, Orientation,
};
pub use fleet::{AddShipError, Fleet, ShipId, ShipSpec, RESERVED_SYMBOLS};
pub use game::{Match, MatchSetupError, Side, TurnRecord};
pub use placement::{PlacementError, BASELINE_RETRIES, PERSISTENT_RETRIES};
pub use strategy::{ShotLog, ShotRecord, Strategy, TargetingMode};
