/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use gambit_types::*;

/// A chessboard: which piece stands on which square.
mod board;
/// The error returned when a move is refused.
mod error;
/// High-level abstraction of the game of chess, including turn order, legality checks, and check/checkmate/stalemate.
mod game;
/// All code related to generating candidate moves for pieces on a board, and detecting attacks on a square.
mod movegen;
/// Structs for modeling the movement of a piece on a chessboard.
mod moves;
/// Utility functions for validating move generation.
mod perft;

pub use board::*;
pub use error::*;
pub use game::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::board::*;
    pub use crate::error::*;
    pub use crate::game::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use gambit_types::*;
}
