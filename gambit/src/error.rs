/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use super::{Color, Move, PieceKind, Square};

/// Why a [`Move`] was refused.
///
/// A refused move never changes the game, so the caller can always try again with a different move.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMove {
    #[error("there is no piece on {0} to move")]
    EmptySquare(Square),

    #[error("the piece on {square} cannot move because it is {turn}'s turn")]
    WrongTurn { square: Square, turn: Color },

    #[error("{0} is not a legal move")]
    Illegal(Move),

    #[error("a pawn cannot be promoted to a {0}")]
    InvalidPromotion(PieceKind),
}
