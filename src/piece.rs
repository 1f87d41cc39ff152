use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Direction a pawn of this color advances along the rank axis.
    pub fn advance(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Sign of this color's contributions to the evaluation: White scores
    /// positive, Black negative.
    pub fn valence(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Classical piece values in pawns. The king is priced high enough that
    /// capturing it dwarfs any material swing.
    pub fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 1000,
        }
    }

    fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// Board-diagram symbol: uppercase for White, lowercase for Black.
    pub fn symbol(self) -> char {
        match self.color {
            Color::White => self.piece_type.letter().to_ascii_uppercase(),
            Color::Black => self.piece_type.letter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_round_trips() {
        for color in [Color::White, Color::Black] {
            assert_eq!(color.opposite().opposite(), color);
        }
    }

    #[test]
    fn advance_directions() {
        assert_eq!(Color::White.advance(), 1);
        assert_eq!(Color::Black.advance(), -1);
    }

    #[test]
    fn piece_values() {
        assert_eq!(PieceType::Pawn.value(), 1);
        assert_eq!(PieceType::Bishop.value(), PieceType::Knight.value());
        assert_eq!(PieceType::King.value(), 1000);
    }

    #[test]
    fn symbols_use_case_for_color() {
        assert_eq!(Piece::new(PieceType::Queen, Color::White).symbol(), 'Q');
        assert_eq!(Piece::new(PieceType::Queen, Color::Black).symbol(), 'q');
    }
}
