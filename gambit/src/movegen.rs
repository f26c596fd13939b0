/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Move, Piece, PieceKind, Square, MAX_NUM_MOVES};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// (row, column) steps along the four files and ranks.
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// (row, column) steps along the four diagonals.
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Generates every candidate [`Move`] for `piece` standing on `from`.
///
/// Candidates follow the piece's movement pattern and the occupancy of `board`, but are *not*
/// filtered for leaving the mover's own King in check. See [`Game::valid_moves`](crate::Game::valid_moves) for legal moves.
///
/// # Example
/// ```
/// # use gambit::{candidate_moves, Board, Color, Piece, PieceKind, Square};
/// let rook = Piece::new(Color::White, PieceKind::Rook);
/// let mut board = Board::new();
/// board.place(rook, Square::D4);
///
/// assert_eq!(candidate_moves(&board, rook, Square::D4).len(), 14);
/// ```
pub fn candidate_moves(board: &Board, piece: Piece, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    let color = piece.color();

    match piece.kind() {
        PieceKind::Pawn => generate_pawn_moves(board, color, from, &mut moves),
        PieceKind::Knight => {
            generate_stepping_moves(board, color, from, &KNIGHT_OFFSETS, &mut moves)
        }
        PieceKind::Bishop => generate_sliding_moves(board, color, from, &DIAGONALS, &mut moves),
        PieceKind::Rook => generate_sliding_moves(board, color, from, &ORTHOGONALS, &mut moves),
        PieceKind::Queen => {
            generate_sliding_moves(board, color, from, &ORTHOGONALS, &mut moves);
            generate_sliding_moves(board, color, from, &DIAGONALS, &mut moves);
        }
        PieceKind::King => generate_stepping_moves(board, color, from, &KING_OFFSETS, &mut moves),
    }

    moves
}

/// Walks each direction until the edge of the board or the first occupied square.
///
/// An enemy on that first occupied square is a capture; a friendly piece just stops the walk.
fn generate_sliding_moves(
    board: &Board,
    color: Color,
    from: Square,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(rows, columns) in directions {
        let mut current = from;

        while let Some(to) = current.offset(rows, columns) {
            match board.color_at(to) {
                None => moves.push(Move::new(from, to)),
                Some(occupant) => {
                    if occupant != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }

            current = to;
        }
    }
}

/// Tries each offset once, keeping destinations that are on the board and not friendly-occupied.
fn generate_stepping_moves(
    board: &Board,
    color: Color,
    from: Square,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(rows, columns) in offsets {
        if let Some(to) = from.offset(rows, columns) {
            if board.color_at(to) != Some(color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn generate_pawn_moves(board: &Board, color: Color, from: Square, moves: &mut MoveList) {
    let forward = pawn_direction(color);

    // Pushes never capture
    if let Some(single) = from.offset(forward, 0) {
        if !board.has(single) {
            push_pawn_move(color, from, single, moves);

            if from.row() == pawn_start_row(color) {
                if let Some(double) = single.offset(forward, 0) {
                    if !board.has(double) {
                        moves.push(Move::new(from, double));
                    }
                }
            }
        }
    }

    // Diagonals are only available as captures
    for columns in [-1, 1] {
        if let Some(to) = from.offset(forward, columns) {
            if board.color_at(to) == Some(color.opponent()) {
                push_pawn_move(color, from, to, moves);
            }
        }
    }
}

/// Adds a Pawn move, expanding it into one move per promotion kind if it reaches the last row.
#[inline(always)]
fn push_pawn_move(color: Color, from: Square, to: Square, moves: &mut MoveList) {
    if to.row() == promotion_row(color) {
        for promotion in PieceKind::PROMOTIONS {
            moves.push(Move::promoting(from, to, promotion));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

/// Row step of a Pawn's forward movement.
#[inline(always)]
const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Row from which a Pawn may advance two squares.
#[inline(always)]
const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::White => 2,
        Color::Black => 7,
    }
}

/// Row on which a Pawn promotes.
#[inline(always)]
const fn promotion_row(color: Color) -> u8 {
    match color {
        Color::White => 8,
        Color::Black => 1,
    }
}

/// Returns `true` if any `by` piece has a candidate move ending on `square`.
///
/// Meant for occupied squares. On an empty square, Pawn pushes also count.
///
/// # Example
/// ```
/// # use gambit::{is_attacked, Board, Color, Square};
/// let board = Board::default();
/// assert!(is_attacked(&board, Square::F3, Color::White));
/// assert!(!is_attacked(&board, Square::F5, Color::White));
/// ```
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board.pieces(by).any(|(from, piece)| {
        candidate_moves(board, piece, from)
            .iter()
            .any(|mv| mv.to() == square)
    })
}

/// Returns `true` if `color`'s King is attacked by any opposing piece.
///
/// A board without a `color` King is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_attacked(board, king, color.opponent()))
}
