/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{
    candidate_moves, is_in_check, Board, Color, InvalidMove, Move, MoveList, Piece, Placement,
    Square,
};

/// A game of chess: a [`Board`] and the [`Color`] whose turn it is.
///
/// [`Game::apply`] is the only way to advance the game. It refuses moves that are not legal for the side to move.
/// Nothing here stops play after a checkmate or stalemate; enforcing that is up to the caller.
///
/// Serializes as `{"board": "<FEN placements>", "turn": "WHITE" | "BLACK"}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Game {
    /// Current piece layout.
    board: Board,

    /// The [`Color`] of the side to move.
    turn: Color,
}

impl Game {
    /// Creates a new [`Game`] from a [`Board`] and the side to move.
    #[inline(always)]
    pub const fn new(board: Board, turn: Color) -> Self {
        Self { board, turn }
    }

    /// Creates a new [`Game`] from a FEN string.
    ///
    /// Only the piece placements and the side to move are read.
    /// The castling, en passant, and move counter fields are accepted but ignored.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, Game, Square};
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    /// assert_eq!(game.turn(), Color::Black);
    /// assert!(game.board().has(Square::E8));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_ascii_whitespace();

        let placements = split.next().ok_or(anyhow!(
            "Invalid FEN string: FEN string must have piece placements."
        ))?;
        let board = Board::from_fen(placements)?;

        let turn = split.next().map(Color::from_str).transpose()?;

        Ok(Self::new(board, turn.unwrap_or_default()))
    }

    /// Generates a FEN string of the piece placements and side to move, such as `"8/8/8/8/8/8/8/K6k w"`.
    pub fn to_fen(&self) -> String {
        format!("{} {}", self.board.to_fen(), self.turn.char())
    }

    /// Fetches this game's [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces this game's [`Board`]. Used when restoring a stored game.
    #[inline(always)]
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// The [`Color`] whose turn it is.
    #[inline(always)]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    /// Sets whose turn it is. Used when restoring a stored game.
    #[inline(always)]
    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    /// All legal moves for the piece on `square`, regardless of whose turn it is.
    ///
    /// Returns `None` if `square` is empty. An empty list means the piece has no legal moves.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Game, Move, Square};
    /// let game = Game::default();
    /// let moves = game.valid_moves(Square::E2).unwrap();
    /// assert_eq!(moves.as_slice(), &[Move::new(Square::E2, Square::E3), Move::new(Square::E2, Square::E4)]);
    ///
    /// assert!(game.valid_moves(Square::E4).is_none());
    /// ```
    pub fn valid_moves(&self, square: Square) -> Option<MoveList> {
        let piece = self.board.piece_at(square)?;
        let mut scratch = self.board;

        let legal = candidate_moves(&self.board, piece, square)
            .into_iter()
            .filter(|&mv| leaves_king_safe(&mut scratch, piece, mv))
            .collect();

        Some(legal)
    }

    /// Returns `true` if `mv` can be applied to the current game.
    #[inline(always)]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.check_legality_of(mv).is_ok()
    }

    /// Checks whether `mv` can be applied to the current game.
    ///
    /// If `Ok(piece)`, the move is legal and `piece` is what would move.
    /// If `Err(reason)`, `reason` explains why it is not legal.
    pub fn check_legality_of(&self, mv: Move) -> std::result::Result<Piece, InvalidMove> {
        let Some(piece) = self.board.piece_at(mv.from()) else {
            return Err(InvalidMove::EmptySquare(mv.from()));
        };

        if piece.color() != self.turn {
            return Err(InvalidMove::WrongTurn {
                square: mv.from(),
                turn: self.turn,
            });
        }

        let legal = self.valid_moves(mv.from()).unwrap_or_default();
        if !legal.contains(&mv) {
            return Err(InvalidMove::Illegal(mv));
        }

        Ok(piece)
    }

    /// Applies `mv` and passes the turn to the opponent, if `mv` is legal.
    ///
    /// If it is not legal, returns an `Err` explaining why and leaves the game untouched.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, Game, InvalidMove, Move, Square};
    /// let mut game = Game::default();
    ///
    /// game.apply(Move::new(Square::E2, Square::E4)).unwrap();
    /// assert_eq!(game.turn(), Color::Black);
    ///
    /// let err = game.apply(Move::new(Square::D2, Square::D4)).unwrap_err();
    /// assert_eq!(err, InvalidMove::WrongTurn { square: Square::D2, turn: Color::Black });
    /// ```
    pub fn apply(&mut self, mv: Move) -> std::result::Result<(), InvalidMove> {
        let piece = self.check_legality_of(mv).map_err(|err| {
            debug!(%mv, turn = %self.turn, %err, "rejected move");
            err
        })?;

        self.make_move(piece, mv);
        debug!(%mv, %piece, "applied move");

        Ok(())
    }

    /// Applies each move in order, stopping at the first one that is not legal.
    pub fn apply_all(
        &mut self,
        moves: impl IntoIterator<Item = Move>,
    ) -> std::result::Result<(), InvalidMove> {
        for mv in moves {
            self.apply(mv)?;
        }
        Ok(())
    }

    /// Copies `self` and returns a [`Game`] after having applied `mv`, if it is legal.
    pub fn with_move_applied(&self, mv: Move) -> std::result::Result<Self, InvalidMove> {
        let mut copied = *self;
        copied.apply(mv)?;
        Ok(copied)
    }

    /// Copies `self` and applies `mv`, which must already be known to be legal.
    #[inline(always)]
    pub(crate) fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        if let Some(piece) = copied.board.piece_at(mv.from()) {
            copied.make_move(piece, mv);
        }
        copied
    }

    /// Writes the placements of `mv` for `piece` and passes the turn. No enforcement of legality.
    #[inline(always)]
    fn make_move(&mut self, piece: Piece, mv: Move) {
        self.board.apply_placements(mv.placements(piece));
        self.turn = self.turn.opponent();
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board
            .pieces(self.turn)
            .filter_map(|(square, _)| self.valid_moves(square))
            .flatten()
            .collect()
    }

    /// Returns `true` if any `color` piece has at least one legal move.
    pub fn has_legal_moves(&self, color: Color) -> bool {
        let mut scratch = self.board;

        self.board.pieces(color).any(|(from, piece)| {
            candidate_moves(&self.board, piece, from)
                .into_iter()
                .any(|mv| leaves_king_safe(&mut scratch, piece, mv))
        })
    }

    /// Returns `true` if `color`'s King is attacked by any opposing piece.
    ///
    /// A side without a King is never in check.
    #[inline(always)]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(&self.board, color)
    }

    /// Returns `true` if `color` is in check and has no legal moves.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_moves(color)
    }

    /// Returns `true` if `color` is not in check but has no legal moves.
    ///
    /// A side with no King and no legal moves is in stalemate.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_moves(color)
    }
}

/// Plays `mv` on `board`, checks whether `piece`'s King is safe, and takes the move back.
fn leaves_king_safe(board: &mut Board, piece: Piece, mv: Move) -> bool {
    let simulation = Simulation::new(board, piece, mv);
    let safe = !is_in_check(&simulation, piece.color());
    trace!(%mv, safe, "simulated move");
    safe
}

/// A [`Board`] with one hypothetical move played on it.
///
/// Holds the board exclusively while alive. Dropping it restores the origin and destination squares
/// to their previous occupants, including a captured piece, on every exit path.
struct Simulation<'a> {
    board: &'a mut Board,
    undo: [Placement; 2],
}

impl<'a> Simulation<'a> {
    fn new(board: &'a mut Board, piece: Piece, mv: Move) -> Self {
        let undo = board.apply_placements(mv.placements(piece));
        Self { board, undo }
    }
}

impl Deref for Simulation<'_> {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &*self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        let mut undo = self.undo;
        undo.reverse();
        self.board.apply_placements(undo);
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Game {
    /// The standard starting position, with White to move.
    #[inline(always)]
    fn default() -> Self {
        Self::new(Board::default(), Color::White)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{} to move", self.board, self.turn)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;
    use crate::PieceKind;

    fn game(fen: &str) -> Game {
        Game::from_fen(fen).unwrap()
    }

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    #[test]
    fn test_new_game_starts_with_white_on_standard_board() {
        let game = Game::default();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.board(), &Board::default());
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn test_valid_moves_from_start() {
        let game = Game::default();
        let moves = game.valid_moves(Square::E2).unwrap();
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&mv("e2e3")));
        assert!(moves.contains(&mv("e2e4")));

        // Queries ignore whose turn it is
        assert_eq!(game.valid_moves(Square::G8).unwrap().len(), 2);

        // Boxed-in pieces have no moves, and empty squares have no answer at all
        assert!(game.valid_moves(Square::A1).unwrap().is_empty());
        assert!(game.valid_moves(Square::D5).is_none());
    }

    #[test]
    fn test_lone_queen_reaches_every_line() {
        let game = game("8/8/8/8/3Q4/8/8/8 w");
        assert_eq!(game.valid_moves(Square::D4).unwrap().len(), 27);

        let game = self::game("8/8/8/8/8/8/8/3Q4 w");
        assert_eq!(game.valid_moves(Square::D1).unwrap().len(), 21);
    }

    #[test]
    fn test_pinned_piece_cannot_leave_the_pin() {
        // White Bishop on e2 is pinned to its King by the Rook on e8
        let game = game("4r1k1/8/8/8/8/8/4B3/4K3 w");
        assert!(game.valid_moves(Square::E2).unwrap().is_empty());

        // The Bishop shields its King, so White is not in check yet
        assert!(!game.is_in_check(Color::White));

        let mut attempt = game;
        assert_eq!(
            attempt.apply(mv("e2d3")),
            Err(InvalidMove::Illegal(mv("e2d3")))
        );
        assert_eq!(attempt, game);
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let game = game("3r2k1/8/8/8/8/8/8/4K3 w");
        let moves = game.valid_moves(Square::E1).unwrap();
        assert!(!moves.contains(&mv("e1d1")));
        assert!(!moves.contains(&mv("e1d2")));
        assert!(moves.contains(&mv("e1f2")));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_valid_moves_never_leave_own_king_in_check() {
        let positions = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "4r1k1/8/8/8/8/8/4B3/4K3 w",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w",
            "4k3/8/8/8/8/8/3q4/4K3 w",
        ];

        for fen in positions {
            let game = game(fen);
            let color = game.turn();
            for (square, _) in game.board().pieces(color) {
                for mv in game.valid_moves(square).unwrap() {
                    let after = game.with_move_applied(mv).unwrap();
                    assert!(!after.is_in_check(color), "{mv} in {fen}");
                }
            }
        }
    }

    #[test]
    fn test_apply_moves_piece_and_flips_turn() {
        let mut game = Game::default();
        game.apply(mv("g1f3")).unwrap();
        assert_eq!(game.board().piece_at(Square::G1), None);
        assert_eq!(
            game.board().piece_at(Square::F3),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
        assert_eq!(game.turn(), Color::Black);

        game.apply(mv("e7e5")).unwrap();
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_failed_apply_changes_nothing() {
        let original = Game::default();

        let cases = [
            (mv("e4e5"), InvalidMove::EmptySquare(Square::E4)),
            (
                mv("e7e5"),
                InvalidMove::WrongTurn {
                    square: Square::E7,
                    turn: Color::White,
                },
            ),
            (mv("e2e5"), InvalidMove::Illegal(mv("e2e5"))),
            (mv("a1a2"), InvalidMove::Illegal(mv("a1a2"))),
        ];

        for (mv, expected) in cases {
            let mut game = original;
            assert_eq!(game.apply(mv), Err(expected));
            assert_eq!(game, original);
        }
    }

    #[test]
    fn test_promotion_must_name_a_piece() {
        let original = game("8/4P3/8/8/8/8/8/k6K w");

        // A plain push onto the last row is not one of the Pawn's moves
        let mut game = original;
        assert_eq!(game.apply(mv("e7e8")), Err(InvalidMove::Illegal(mv("e7e8"))));
        assert_eq!(game, original);

        game.apply(mv("e7e8n")).unwrap();
        assert_eq!(
            game.board().piece_at(Square::E8),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
        assert_eq!(game.board().piece_at(Square::E7), None);
    }

    #[test]
    fn test_capture_removes_the_captured_piece() {
        let mut game = Game::default();
        game.apply_all([mv("e2e4"), mv("d7d5"), mv("e4d5")]).unwrap();
        assert_eq!(
            game.board().piece_at(Square::D5),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(game.board().iter().count(), 31);
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn test_simulation_restores_captured_piece() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let original = board;
        let pawn = board.piece_at(Square::E4).unwrap();

        {
            let simulation = Simulation::new(&mut board, pawn, mv("e4d5"));
            assert_eq!(simulation.piece_at(Square::D5), Some(pawn));
            assert_eq!(simulation.piece_at(Square::E4), None);
        }

        assert_eq!(board, original);
    }

    #[test]
    fn test_simulation_restores_board_when_unwinding() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let original = board;
        let pawn = board.piece_at(Square::E4).unwrap();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _simulation = Simulation::new(&mut board, pawn, mv("e4d5"));
            panic!("failure while the move is on the board");
        }));

        assert!(result.is_err());
        assert_eq!(board, original);
    }

    #[test]
    fn test_single_capturing_response_is_not_mate() {
        // Black King on h8 behind its h7 Pawn; White Rook swings up to g8 with check
        let mut game = game("7k/7p/8/8/8/8/8/1K4R1 w");
        game.apply(mv("g1g8")).unwrap();

        assert!(game.is_in_check(Color::Black));
        assert!(!game.is_in_checkmate(Color::Black));
        assert!(!game.is_in_stalemate(Color::Black));

        let king_moves = game.valid_moves(Square::H8).unwrap();
        assert!(king_moves.contains(&mv("h8g8")));
        assert_eq!(game.legal_moves(), vec![mv("h8g8")]);

        game.apply(mv("h8g8")).unwrap();
        assert!(!game.is_in_check(Color::Black));
    }

    #[test]
    fn test_cornered_king_mated_by_two_rooks() {
        let game = game("k7/8/8/8/8/8/1R6/R6K b");
        assert!(game.is_in_check(Color::Black));
        assert!(game.is_in_checkmate(Color::Black));
        assert!(!game.is_in_stalemate(Color::Black));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::default();
        game.apply_all([mv("f2f3"), mv("e7e5"), mv("g2g4"), mv("d8h4")])
            .unwrap();

        assert!(game.is_in_checkmate(Color::White));
        assert!(!game.is_in_checkmate(Color::Black));

        // Nothing stops further moves being attempted; they are simply all illegal
        assert_eq!(
            game.apply(mv("a2a3")),
            Err(InvalidMove::Illegal(mv("a2a3")))
        );
    }

    #[test]
    fn test_stalemate() {
        let game = game("k7/8/1Q6/8/8/8/8/7K b");
        assert!(!game.is_in_check(Color::Black));
        assert!(game.is_in_stalemate(Color::Black));
        assert!(!game.is_in_checkmate(Color::Black));

        // White still has moves
        assert!(!game.is_in_stalemate(Color::White));
    }

    #[test]
    fn test_no_king_and_no_moves_is_stalemate() {
        // The lone Black Pawn is blocked and Black has no King
        let game = game("8/8/8/p7/P7/8/8/7K b");
        assert!(!game.is_in_check(Color::Black));
        assert!(game.is_in_stalemate(Color::Black));
        assert!(!game.is_in_checkmate(Color::Black));
    }

    #[test]
    fn test_mate_and_stalemate_are_exclusive() {
        let positions = [
            "k7/8/8/8/8/8/1R6/R6K b",
            "k7/8/1Q6/8/8/8/8/7K b",
            "8/8/8/p7/P7/8/8/7K b",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "7k/6Q1/6K1/8/8/8/8/8 b",
        ];

        for fen in positions {
            let game = game(fen);
            for color in Color::all() {
                let mate = game.is_in_checkmate(color);
                let stalemate = game.is_in_stalemate(color);
                assert!(!(mate && stalemate), "{fen}");
                if mate {
                    assert!(game.is_in_check(color), "{fen}");
                }
                if stalemate {
                    assert!(!game.is_in_check(color), "{fen}");
                }
            }
        }
    }

    #[test]
    fn test_fen_round_trip() {
        let game = game("7k/7p/8/8/8/8/8/1K4R1 b - - 0 1");
        assert_eq!(game.to_fen(), "7k/7p/8/8/8/8/8/1K4R1 b");
        assert_eq!(Game::from_fen(&game.to_fen()).unwrap(), game);

        // Side to move defaults to White
        assert_eq!(self::game("8/8/8/8/8/8/8/8").turn(), Color::White);
        assert!(Game::from_fen("8/8/8/8/8/8/8/8 x").is_err());
        assert!(Game::from_fen("").is_err());
    }

    #[test]
    fn test_serializes_board_and_turn() {
        let mut game = Game::default();
        game.apply(mv("e2e4")).unwrap();

        let json = serde_json::to_value(game).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "board": "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR",
                "turn": "BLACK",
            })
        );

        let restored: Game = serde_json::from_value(json).unwrap();
        assert_eq!(restored, game);

        let corrupt = serde_json::json!({ "board": "rnbqkbnr", "turn": "WHITE" });
        assert!(serde_json::from_value::<Game>(corrupt).is_err());
    }

    #[test]
    fn test_accessors_restore_a_game() {
        let mut played = Game::default();
        played.apply(mv("d2d4")).unwrap();

        let mut restored = Game::default();
        restored.set_board(*played.board());
        restored.set_turn(played.turn());
        assert_eq!(restored, played);
    }
}
