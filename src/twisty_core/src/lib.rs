#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]

//! Finite permutation algebra, twisty puzzle move tables, and breadth-first
//! exploration of the groups those moves generate.

pub mod algorithm;
pub mod cayley;
pub mod definition;
pub mod facelets;
pub mod math;
pub mod permutation;
pub mod puzzles;
pub mod schreier_sims;

pub use algorithm::{Algorithm, AlgorithmError, Turn};
pub use cayley::{CayleyExplorer, Exploration, ExplorerState, MoveSide, Progress};
pub use definition::{DefinitionError, PuzzleDefinition};
pub use math::Order;
pub use permutation::{Permutation, PermutationError, PermutationParseError};
pub use puzzles::{CUBE3, Move, MoveTable, MoveTableError, SKEWB};
pub use schreier_sims::StabilizerChain;

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}
