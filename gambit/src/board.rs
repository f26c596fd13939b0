/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Index};

use anyhow::{bail, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::{Color, Piece, PieceKind, Placement, Square};

/// Pieces on the back rows of the starting position, from column 1 to column 8.
const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of whose turn it is. If you need that, see [`Game`](crate::Game).
///
/// Internally a mailbox: one optional [`Piece`] per [`Square`], so there is never more than one piece on a square.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use gambit::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
        }
    }

    /// Clears the board and sets up the standard starting position.
    ///
    /// White occupies rows 1 and 2, Black occupies rows 7 and 8.
    ///
    /// # Example
    /// ```
    /// # use gambit::Board;
    /// let mut board = Board::new();
    /// board.reset();
    /// assert_eq!(board, Board::default());
    /// assert_eq!(board.iter().count(), 32);
    /// ```
    pub fn reset(&mut self) {
        self.clear_all();

        for (column, kind) in (1..=8).zip(BACK_ROW) {
            for (color, back, front) in [(Color::White, 1, 2), (Color::Black, 8, 7)] {
                let back = Square::new(back, column);
                let front = Square::new(front, column);

                if let (Some(back), Some(front)) = (back, front) {
                    self.place(Piece::new(color, kind), back);
                    self.place(Piece::new(color, PieceKind::Pawn), front);
                }
            }
        }
    }

    /// Constructs a [`Board`] from the piece-placement field of a FEN string.
    ///
    /// If `fen` contains more than just the placements, the remaining fields are ignored.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, Piece, PieceKind, Square};
    /// let board = Board::from_fen("k7/8/8/8/2N5/8/8/7K").unwrap();
    /// assert_eq!(board.piece_at(Square::C4), Some(Piece::new(Color::White, PieceKind::Knight)));
    /// assert!(Board::from_fen("8/8/8").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();

        let Some(placements) = fen.split_ascii_whitespace().next() else {
            bail!("Invalid FEN string: FEN string must have piece placements.");
        };

        if placements.matches('/').count() != 7 {
            bail!("Missing placements for all 8 rows.");
        }

        // Need to reverse this so that White pieces are at the "bottom" of the board
        for (row, placements) in (1..=8).zip(placements.split('/').rev()) {
            let mut column = 1;

            for piece_char in placements.chars() {
                if let Some(empty) = piece_char.to_digit(10) {
                    column += empty as u8;
                    if column > 9 {
                        bail!("Too many squares in row {row} of FEN placements {placements:?}");
                    }
                    continue;
                }

                let Ok(piece) = Piece::from_uci(piece_char) else {
                    bail!("Found non-piece, non-numeric char {piece_char:?} when parsing FEN.");
                };

                let Some(square) = Square::new(row, column) else {
                    bail!("Too many squares in row {row} of FEN placements {placements:?}");
                };

                board.place(piece, square);
                column += 1;
            }

            if column != 9 {
                bail!("Row {row} of FEN placements {placements:?} does not cover 8 squares");
            }
        }

        Ok(board)
    }

    /// Generates the piece-placement field of a [FEN](https://www.chess.com/terms/fen-chess) string of this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements = Vec::with_capacity(8);

        for row in (1..=8).rev() {
            let mut placement = String::with_capacity(8);
            let mut empty_spaces = 0;

            for square in (1..=8).filter_map(|column| Square::new(row, column)) {
                if let Some(piece) = self.piece_at(square) {
                    if empty_spaces != 0 {
                        placement += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    placement.push(piece.char());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                placement += &empty_spaces.to_string();
            }
            placements.push(placement);
        }

        placements.join("/")
    }

    /// Returns `true` if there is a piece at the given [`Square`], else `false`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Square};
    /// let board = Board::default();
    /// assert_eq!(board.has(Square::B1), true);
    /// assert_eq!(board.has(Square::B3), false);
    /// ```
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_some()
    }

    /// Sets the occupant of `square` to `piece` (or empties it, if `piece` is `None`),
    /// returning whatever was there before.
    #[inline(always)]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.mailbox[square.index()], piece)
    }

    /// Places the provided [`Piece`] on the supplied [`Square`], replacing any piece already there.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Piece, PieceKind, Color, Square};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// let mut board = Board::new();
    /// board.place(white_knight, Square::C4);
    /// assert_eq!(board.to_fen(), "8/8/8/8/2N5/8/8/8");
    /// ```
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.set(square, Some(piece));
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Piece, PieceKind, Color, Square};
    /// let mut board = Board::from_fen("k7/8/8/8/2N5/8/8/7K").unwrap();
    /// let taken = board.take(Square::C4);
    /// assert_eq!(board.to_fen(), "k7/8/8/8/8/8/8/7K");
    /// assert_eq!(taken, Some(Piece::new(Color::White, PieceKind::Knight)));
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.set(square, None)
    }

    /// Clears the supplied [`Square`] of any pieces.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.take(square);
    }

    /// Clears the entire board, removing all pieces.
    #[inline(always)]
    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    /// Writes each [`Placement`] in order and returns the placements that undo them.
    ///
    /// Writing the returned placements in reverse order restores the board exactly,
    /// including any piece that was captured.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Move, Square};
    /// let mut board = Board::default();
    /// let original = board;
    ///
    /// let knight = board.piece_at(Square::G1).unwrap();
    /// let mut undo = board.apply_placements(Move::new(Square::G1, Square::F3).placements(knight));
    /// assert_eq!(board.piece_at(Square::F3), Some(knight));
    ///
    /// undo.reverse();
    /// board.apply_placements(undo);
    /// assert_eq!(board, original);
    /// ```
    #[inline(always)]
    pub fn apply_placements<const N: usize>(
        &mut self,
        placements: [Placement; N],
    ) -> [Placement; N] {
        placements.map(|placement| {
            let previous = self.set(placement.square, placement.piece);
            Placement::new(placement.square, previous)
        })
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, PieceKind, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.piece_at(Square::A2).unwrap().kind(), PieceKind::Pawn);
    /// assert_eq!(board.piece_at(Square::A2).unwrap().color(), Color::White);
    /// assert!(board.piece_at(Square::E4).is_none());
    /// ```
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Fetches the [`PieceKind`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.piece_at(square).map(|piece| piece.kind())
    }

    /// Creates a [`BoardIter`] to iterate over all occupied [`Square`]s in this [`Board`].
    #[inline(always)]
    pub const fn iter(&self) -> BoardIter<'_> {
        BoardIter {
            board: self,
            index: 0,
        }
    }

    /// Iterates over every piece of `color`, along with its square.
    #[inline(always)]
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Finds the square of `color`'s King, scanning from `A1`.
    ///
    /// Returns `None` if `color` has no King on the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.king_square(Color::Black), Some(Square::E8));
    /// assert_eq!(Board::new().king_square(Color::White), None);
    /// ```
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, piece)| piece.is_king())
            .map(|(square, _)| square)
    }
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Self {
        let mut board = Self::new();
        board.reset();
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=8).rev() {
            write!(f, "{row}| ")?;

            for square in (1..=8).filter_map(|column| Square::new(row, column)) {
                let occupant = self.piece_at(square).map(|p| p.char()).unwrap_or('.');
                write!(f, "{occupant} ")?;
            }

            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..8 {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for column in 'a'..='h' {
            write!(f, "{column} ")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}\n\nFEN: {}", self.to_fen())
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index.index()]
    }
}

impl<'a> IntoIterator for &'a Board {
    type IntoIter = BoardIter<'a>;
    type Item = <BoardIter<'a> as Iterator>::Item;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A board is persisted as its FEN piece placements.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_fen())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let placements = String::deserialize(deserializer)?;
        Self::from_fen(&placements).map_err(de::Error::custom)
    }
}

/// An iterator over the occupied squares of a [`Board`], in [`Square::index`] order.
///
/// Calls to [`Iterator::next`] will yield a tuple of a [`Square`] and a [`Piece`].
pub struct BoardIter<'a> {
    /// The board to retrieve pieces from.
    board: &'a Board,

    /// Index of the next square to examine.
    index: usize,
}

impl<'a> Iterator for BoardIter<'a> {
    type Item = (Square, Piece);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(square) = Square::from_index(self.index) {
            self.index += 1;
            if let Some(piece) = self.board.piece_at(square) {
                return Some((square, piece));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_STARTPOS;

    #[test]
    fn test_default_board_matches_startpos_fen() {
        let board = Board::default();
        assert_eq!(board, Board::from_fen(FEN_STARTPOS).unwrap());
        assert_eq!(board.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    }

    #[test]
    fn test_startpos_layout() {
        let board = Board::default();
        for square in Square::iter() {
            match square.row() {
                1 | 2 => assert_eq!(board.color_at(square), Some(Color::White), "{square}"),
                7 | 8 => assert_eq!(board.color_at(square), Some(Color::Black), "{square}"),
                _ => assert!(!board.has(square), "{square}"),
            }
        }
        assert_eq!(board.kind_at(Square::D1), Some(PieceKind::Queen));
        assert_eq!(board.kind_at(Square::E8), Some(PieceKind::King));
    }

    #[test]
    fn test_reset_discards_previous_pieces() {
        let mut board = Board::from_fen("8/8/8/3q4/8/8/8/8").unwrap();
        board.reset();
        assert_eq!(board, Board::default());
        assert!(!board.has(Square::D5));
    }

    #[test]
    fn test_set_returns_previous_occupant() {
        let mut board = Board::default();
        let pawn = board.set(Square::E2, None);
        assert_eq!(pawn, Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(board[Square::E2], None);
        assert_eq!(board.set(Square::E2, pawn), None);
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_from_fen_rejects_bad_rows() {
        assert!(Board::from_fen("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("ppppppppp/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("x7/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn test_iter_visits_pieces_in_square_order() {
        let board = Board::from_fen("k7/8/8/8/8/8/8/7K").unwrap();
        let squares: Vec<Square> = board.iter().map(|(square, _)| square).collect();
        assert_eq!(squares, vec![Square::H1, Square::A8]);
    }

    #[test]
    fn test_display_draws_white_at_the_bottom() {
        let rendered = Board::default().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "8| r n b q k b n r ");
        assert_eq!(lines[7], "1| R N B Q K B N R ");
        assert_eq!(lines[9], "   a b c d e f g h ");
    }
}
