/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

/// A coordinate on the 8x8 board.
///
/// Rows and columns both run from `1` to `8`. Row 1 is White's home row and column 1 is the `a` file.
/// A [`Square`] can only be constructed in-bounds, so every value of this type is on the board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Square {
    row: u8,
    column: u8,
}

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a new [`Square`], returning `None` if either coordinate is outside of `[1, 8]`.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::Square;
    /// assert_eq!(Square::new(4, 5), Some(Square::E4));
    /// assert_eq!(Square::new(0, 5), None);
    /// assert_eq!(Square::new(4, 9), None);
    /// ```
    #[inline(always)]
    pub const fn new(row: u8, column: u8) -> Option<Self> {
        if row >= 1 && row <= 8 && column >= 1 && column <= 8 {
            Some(Self { row, column })
        } else {
            None
        }
    }

    /// Only for in-bounds literals.
    const fn new_unchecked(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    #[inline(always)]
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// Dense index in `0..64`, increasing along each row starting from `A1`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        (self.row as usize - 1) * 8 + (self.column as usize - 1)
    }

    /// Inverse of [`Square::index`]. Returns `None` if `index >= 64`.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::new_unchecked((index / 8) as u8 + 1, (index % 8) as u8 + 1))
        } else {
            None
        }
    }

    /// Iterates over all 64 squares in index order.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::Square;
    /// let squares: Vec<Square> = Square::iter().collect();
    /// assert_eq!(squares.len(), 64);
    /// assert_eq!(squares[0], Square::A1);
    /// assert_eq!(squares[63], Square::H8);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl Iterator<Item = Self> {
        (1..=8).flat_map(|row| (1..=8).map(move |column| Self::new_unchecked(row, column)))
    }

    /// Returns the square `rows` rows and `columns` columns away, or `None` if that leaves the board.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::Square;
    /// assert_eq!(Square::B1.offset(2, 1), Some(Square::C3));
    /// assert_eq!(Square::B1.offset(-1, 0), None);
    /// assert_eq!(Square::H8.offset(0, 1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, rows: i8, columns: i8) -> Option<Self> {
        let row = self.row as i16 + rows as i16;
        let column = self.column as i16 + columns as i16;
        if row < 1 || row > 8 || column < 1 || column > 8 {
            return None;
        }

        Some(Self::new_unchecked(row as u8, column as u8))
    }

    /// The letter of this square's column, `a` through `h`.
    #[inline(always)]
    pub const fn column_char(&self) -> char {
        (b'a' + self.column - 1) as char
    }

    /// Parses a square from algebraic notation, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use gambit_types::Square;
    /// assert_eq!(Square::from_uci("e4").unwrap(), Square::E4);
    /// assert_eq!(Square::from_uci("H8").unwrap(), Square::H8);
    /// assert!(Square::from_uci("i1").is_err());
    /// assert!(Square::from_uci("a9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(column), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square strings must be exactly 2 chars. Got {square:?}");
        };

        let column = match column.to_ascii_lowercase() {
            c @ 'a'..='h' => c as u8 - b'a' + 1,
            _ => bail!("Invalid column in square {square:?}"),
        };

        let row = row
            .to_digit(10)
            .ok_or(anyhow!("Invalid row in square {square:?}"))?;

        Self::new(row as u8, column).ok_or(anyhow!("Square {square:?} is not on the board"))
    }

    /// Formats this square in algebraic notation, such as `e4`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_char(), self.row)
    }
}

macro_rules! named_squares {
    ($($name:ident = ($row:literal, $column:literal),)*) => {
        impl Square {
            $(
                pub const $name: Self = Self::new_unchecked($row, $column);
            )*
        }
    };
}

named_squares! {
    A1 = (1, 1),
    B1 = (1, 2),
    C1 = (1, 3),
    D1 = (1, 4),
    E1 = (1, 5),
    F1 = (1, 6),
    G1 = (1, 7),
    H1 = (1, 8),
    A2 = (2, 1),
    B2 = (2, 2),
    C2 = (2, 3),
    D2 = (2, 4),
    E2 = (2, 5),
    F2 = (2, 6),
    G2 = (2, 7),
    H2 = (2, 8),
    A3 = (3, 1),
    B3 = (3, 2),
    C3 = (3, 3),
    D3 = (3, 4),
    E3 = (3, 5),
    F3 = (3, 6),
    G3 = (3, 7),
    H3 = (3, 8),
    A4 = (4, 1),
    B4 = (4, 2),
    C4 = (4, 3),
    D4 = (4, 4),
    E4 = (4, 5),
    F4 = (4, 6),
    G4 = (4, 7),
    H4 = (4, 8),
    A5 = (5, 1),
    B5 = (5, 2),
    C5 = (5, 3),
    D5 = (5, 4),
    E5 = (5, 5),
    F5 = (5, 6),
    G5 = (5, 7),
    H5 = (5, 8),
    A6 = (6, 1),
    B6 = (6, 2),
    C6 = (6, 3),
    D6 = (6, 4),
    E6 = (6, 5),
    F6 = (6, 6),
    G6 = (6, 7),
    H6 = (6, 8),
    A7 = (7, 1),
    B7 = (7, 2),
    C7 = (7, 3),
    D7 = (7, 4),
    E7 = (7, 5),
    F7 = (7, 6),
    G7 = (7, 7),
    H7 = (7, 8),
    A8 = (8, 1),
    B8 = (8, 2),
    C8 = (8, 3),
    D8 = (8, 4),
    E8 = (8, 5),
    F8 = (8, 6),
    G8 = (8, 7),
    H8 = (8, 8),
}
