use std::fmt;

use serde::{Deserialize, Serialize};

/// A board coordinate as `(rank, file)`, rank 0 being White's back rank.
pub type Pos = (usize, usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
}

impl Move {
    /// Marker recorded as the head of a principal variation when the search
    /// stood pat on the static evaluation instead of playing a move.
    pub const STAND_PAT: Move = Move {
        from: (0, 0),
        to: (1, 1),
    };

    pub fn new(from: Pos, to: Pos) -> Self {
        Move { from, to }
    }

    /// Parse two whitespace-separated squares, e.g. "e2 e4". Promotion is
    /// implicit (always a queen) and never written.
    pub fn parse(s: &str) -> Option<Move> {
        let mut squares = s.split_whitespace();
        let from = parse_square(squares.next()?)?;
        let to = parse_square(squares.next()?)?;
        if squares.next().is_some() {
            return None;
        }
        Some(Move { from, to })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", square_name(self.from), square_name(self.to))
    }
}

/// Chess-notation name of a square: file letter then rank number, e.g. "e4".
pub fn square_name(pos: Pos) -> String {
    let file = (b'a' + pos.1 as u8) as char;
    let rank = (b'1' + pos.0 as u8) as char;
    format!("{file}{rank}")
}

/// Parse a square name like "e4". File a-h maps to 0-7, rank 1-8 to 0-7.
pub fn parse_square(s: &str) -> Option<Pos> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].wrapping_sub(b'a') as usize;
    let rank = bytes[1].wrapping_sub(b'1') as usize;
    if file > 7 || rank > 7 {
        return None;
    }
    Some((rank, file))
}
