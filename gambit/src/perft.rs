/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Game, Move};

/// Counts the leaf nodes of the legal move tree of `game`, `depth` plies deep.
///
/// See <https://www.chessprogramming.org/Perft>
///
/// # Example
/// ```
/// # use gambit::{perft, Game};
/// assert_eq!(perft(&Game::default(), 2), 400);
/// ```
pub fn perft(game: &Game, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.legal_moves();

    // Bulk counting: the number of moves at the last ply is the number of leaves
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| perft(&game.with_move_made(mv), depth - 1))
        .sum()
}

/// Like [`perft`], but returns the node count below each root move.
///
/// Useful for finding exactly which move a move generator disagrees on.
pub fn splitperft(game: &Game, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    game.legal_moves()
        .into_iter()
        .map(|mv| (mv, perft(&game.with_move_made(mv), depth - 1)))
        .collect()
}
