/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::{InvalidMove, Piece, PieceKind, Square};

/// A single square's new occupant.
///
/// Every change to a [`Board`](crate::Board) made by a [`Move`] is expressed as a pair of placements:
/// the origin square is emptied and the destination square receives the moving piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Placement {
    /// The square being written.
    pub square: Square,

    /// What the square holds afterwards. `None` means empty.
    pub piece: Option<Piece>,
}

impl Placement {
    #[inline(always)]
    pub const fn new(square: Square, piece: Option<Piece>) -> Self {
        Self { square, piece }
    }

    /// A placement that empties `square`.
    #[inline(always)]
    pub const fn empty(square: Square) -> Self {
        Self::new(square, None)
    }
}

/// Moves a piece from one [`Square`] to another, optionally promoting it.
///
/// The promotion kind, when present, is always one of Queen, Rook, Bishop, or Knight.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new, non-promoting [`Move`].
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a new [`Move`] that promotes the moving Pawn to `promotion`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, PieceKind, Square};
    /// let mv = Move::with_promotion(Square::E7, Square::E8, PieceKind::Knight).unwrap();
    /// assert_eq!(mv.promotion(), Some(PieceKind::Knight));
    ///
    /// assert!(Move::with_promotion(Square::E7, Square::E8, PieceKind::King).is_err());
    /// ```
    pub fn with_promotion(
        from: Square,
        to: Square,
        promotion: PieceKind,
    ) -> std::result::Result<Self, InvalidMove> {
        if !promotion.is_promotable() {
            return Err(InvalidMove::InvalidPromotion(promotion));
        }

        Ok(Self::promoting(from, to, promotion))
    }

    /// Callers must only pass kinds from [`PieceKind::PROMOTIONS`].
    #[inline(always)]
    pub(crate) const fn promoting(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Splits this move into its origin, destination, and promotion.
    #[inline(always)]
    pub const fn parts(&self) -> (Square, Square, Option<PieceKind>) {
        (self.from, self.to, self.promotion)
    }

    /// The two [`Placement`]s that perform this move with `piece`: empty the origin, then
    /// put `piece` (or its promoted form) on the destination, replacing anything there.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, Move, Piece, PieceKind, Placement, Square};
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn);
    /// let mv = Move::with_promotion(Square::A7, Square::A8, PieceKind::Rook).unwrap();
    /// let [from, to] = mv.placements(pawn);
    /// assert_eq!(from, Placement::empty(Square::A7));
    /// assert_eq!(to.piece, Some(Piece::new(Color::White, PieceKind::Rook)));
    /// ```
    #[inline(always)]
    pub fn placements(&self, piece: Piece) -> [Placement; 2] {
        let placed = match self.promotion {
            Some(promotion) => piece.promoted(promotion),
            None => piece,
        };

        [
            Placement::empty(self.from),
            Placement::new(self.to, Some(placed)),
        ]
    }

    /// Parses a move from UCI notation, such as `e2e4` or `e7e8q`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, PieceKind, Square};
    /// assert_eq!(Move::from_uci("e2e4").unwrap(), Move::new(Square::E2, Square::E4));
    /// assert_eq!(Move::from_uci("b7b8n").unwrap().promotion(), Some(PieceKind::Knight));
    /// assert!(Move::from_uci("e7e8k").is_err());
    /// assert!(Move::from_uci("e2").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let uci = uci.trim();
        let (Some(from), Some(to)) = (uci.get(0..2), uci.get(2..4)) else {
            bail!("Move strings must be at least 4 chars. Got {uci:?}");
        };

        let from = Square::from_uci(from)?;
        let to = Square::from_uci(to)?;

        let mut rest = uci[4..].chars();
        match (rest.next(), rest.next()) {
            (None, _) => Ok(Self::new(from, to)),
            (Some(promotion), None) => {
                let promotion = PieceKind::from_uci(promotion)?;
                Ok(Self::with_promotion(from, to, promotion)?)
            }
            _ => bail!("Trailing characters in move string {uci:?}"),
        }
    }

    /// Formats this move in UCI notation.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.char())?;
        }
        Ok(())
    }
}
