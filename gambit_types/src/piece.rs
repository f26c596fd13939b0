/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Represents one of the two teams in a game of chess.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    /// White moves first and starts on rows 1 and 2.
    #[default]
    White,
    /// Black starts on rows 7 and 8.
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns the opposite color.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Creates a [`Color`] from its FEN character, `w` or `b` (case-insensitive).
    pub fn from_char(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color chars must be `w` or `b`. Got {color:?}"),
        }
    }

    /// The FEN character for this [`Color`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// The human-readable name of this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("Invalid color string {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The kind of a chess piece, independent of its [`Color`].
///
/// This is a closed set: every `match` over it must handle all six kinds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece kinds.
    pub const COUNT: usize = 6;

    /// Every kind a Pawn may promote to, in the order promotions are generated.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// An array of all six piece kinds, in index order.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Pawn,
            Self::Knight,
            Self::Bishop,
            Self::Rook,
            Self::Queen,
            Self::King,
        ]
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns `true` if a Pawn may be promoted to this kind.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::PieceKind;
    /// assert!(PieceKind::Knight.is_promotable());
    /// assert!(!PieceKind::King.is_promotable());
    /// assert!(!PieceKind::Pawn.is_promotable());
    /// ```
    #[inline(always)]
    pub const fn is_promotable(&self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Bishop | Self::Knight)
    }

    /// Returns `true` if this kind moves by sliding along rays (Bishop, Rook, Queen).
    #[inline(always)]
    pub const fn is_slider(&self) -> bool {
        matches!(self, Self::Bishop | Self::Rook | Self::Queen)
    }

    /// Creates a [`PieceKind`] from its (case-insensitive) UCI character.
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind.to_ascii_lowercase() {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("Invalid char for piece kind: {kind:?}"),
        }
    }

    /// The lowercase UCI character for this [`PieceKind`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "Pawn",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Rook => "Rook",
            Self::Queen => "Queen",
            Self::King => "King",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A chess piece: a [`Color`] and a [`PieceKind`].
///
/// Two pieces of the same color and kind compare equal. A piece's identity on a board is its square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Splits this piece into its [`Color`] and [`PieceKind`].
    #[inline(always)]
    pub const fn parts(&self) -> (Color, PieceKind) {
        (self.color, self.kind)
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Returns `true` if `other` is on the opposing team.
    #[inline(always)]
    pub fn is_enemy_of(&self, other: &Self) -> bool {
        self.color != other.color
    }

    /// Returns a piece of the same color, but of kind `promotion`.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::{Color, Piece, PieceKind};
    /// let pawn = Piece::new(Color::Black, PieceKind::Pawn);
    /// assert_eq!(pawn.promoted(PieceKind::Queen), Piece::new(Color::Black, PieceKind::Queen));
    /// ```
    #[inline(always)]
    pub const fn promoted(&self, promotion: PieceKind) -> Self {
        Self::new(self.color, promotion)
    }

    /// Creates a [`Piece`] from its FEN character: uppercase for White, lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::from_uci('R').unwrap(), Piece::new(Color::White, PieceKind::Rook));
    /// assert_eq!(Piece::from_uci('k').unwrap(), Piece::new(Color::Black, PieceKind::King));
    /// assert!(Piece::from_uci('x').is_err());
    /// ```
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece)?;
        let color = if piece.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Self::new(color, kind))
    }

    /// The FEN character of this [`Piece`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_chars_round_trip_through_fen_chars() {
        for c in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_uci(c).unwrap();
            assert_eq!(piece.char(), c);
        }
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("w".parse::<Color>().unwrap(), Color::White);
        assert_eq!("Black".parse::<Color>().unwrap(), Color::Black);
        assert!("red".parse::<Color>().is_err());
        assert!(Color::from_char('x').is_err());
    }

    #[test]
    fn test_same_color_and_kind_are_equal() {
        let a = Piece::new(Color::White, PieceKind::Knight);
        let b = Piece::new(Color::White, PieceKind::Knight);
        assert_eq!(a, b);
        assert_ne!(a, Piece::new(Color::Black, PieceKind::Knight));
    }

    #[test]
    fn test_promotions_exclude_king_and_pawn() {
        assert_eq!(PieceKind::PROMOTIONS.len(), 4);
        for kind in PieceKind::all() {
            assert_eq!(
                PieceKind::PROMOTIONS.contains(&kind),
                kind.is_promotable(),
                "{kind}"
            );
        }
    }
}
