//! Pseudo-legal move generation.
//!
//! Moves obey piece-movement rules and board geometry but are not checked
//! for leaving one's own king attacked; the search resolves self-check by
//! capturing the exposed king one ply later. The single exception is
//! castling, which is only emitted when the king's path is unthreatened.
//!
//! Every enumeration is funnelled through an `emit` closure so that callers
//! that only count moves (the evaluator) and callers that materialize them
//! (the search) share the same machinery.

use std::cmp::Ordering;

use arrayvec::ArrayVec;

use crate::board::{Board, CastleSide};
use crate::moves::{Move, Pos};
use crate::piece::{Color, PieceType};

/// Upper bound on the number of pseudo-legal moves in any legal position.
pub const MAX_MOVES: usize = 256;

pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Per-square count of moves landing there, for one color.
pub type ThreatBoard = [[u32; 8]; 8];

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const QUEEN_DIRS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Emit the pseudo-legal moves of the piece at `from`. Emits nothing unless
/// that piece belongs to the side to move.
pub fn valid_moves_from<F>(board: &Board, from: Pos, emit: &mut F)
where
    F: FnMut(&Board, Pos, Pos),
{
    let Some(piece) = board.get(from) else {
        return;
    };
    if piece.color != board.turn {
        return;
    }
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(board, from, emit),
        PieceType::Knight => leaper_moves(board, from, &KNIGHT_OFFSETS, emit),
        PieceType::Bishop => slider_moves(board, from, &BISHOP_DIRS, emit),
        PieceType::Rook => slider_moves(board, from, &ROOK_DIRS, emit),
        PieceType::Queen => slider_moves(board, from, &QUEEN_DIRS, emit),
        PieceType::King => king_moves(board, from, emit),
    }
}

/// Emit all pseudo-legal moves for the side to move, scanning origins in
/// rank-then-file order. The order is deterministic and observable.
pub fn valid_moves<F>(board: &Board, emit: &mut F)
where
    F: FnMut(&Board, Pos, Pos),
{
    for rank in 0..8 {
        for file in 0..8 {
            valid_moves_from(board, (rank, file), emit);
        }
    }
}

/// Collecting form of [`valid_moves`].
pub fn collect_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();
    valid_moves(board, &mut |_, from, to| moves.push(Move::new(from, to)));
    moves
}

/// Collect all moves and stable-sort them, so ties keep generation order.
pub fn sorted_moves<C>(board: &Board, mut cmp: C) -> MoveList
where
    C: FnMut(&Board, &Move, &Move) -> Ordering,
{
    let mut moves = collect_moves(board);
    moves.sort_by(|a, b| cmp(board, a, b));
    moves
}

/// Visitor form of [`sorted_moves`].
pub fn valid_moves_sorted<C, F>(board: &Board, cmp: C, emit: &mut F)
where
    C: FnMut(&Board, &Move, &Move) -> Ordering,
    F: FnMut(&Board, Pos, Pos),
{
    for mv in sorted_moves(board, cmp) {
        emit(board, mv.from, mv.to);
    }
}

/// Whether `mv` is among the pseudo-legal moves from its origin square.
pub fn move_valid(board: &Board, mv: Move) -> bool {
    if !Board::in_bounds(mv.from.0 as i32, mv.from.1 as i32)
        || !Board::in_bounds(mv.to.0 as i32, mv.to.1 as i32)
    {
        return false;
    }
    let mut found = false;
    valid_moves_from(board, mv.from, &mut |_, from, to| {
        found |= Move::new(from, to) == mv;
    });
    found
}

/// Landing counts of the side to move's pseudo-legal moves.
pub fn threat_map(board: &Board) -> ThreatBoard {
    let mut threats = [[0u32; 8]; 8];
    valid_moves(board, &mut |_, _, to: Pos| threats[to.0][to.1] += 1);
    threats
}

fn try_peaceful<F>(board: &Board, from: Pos, to: (i32, i32), emit: &mut F) -> bool
where
    F: FnMut(&Board, Pos, Pos),
{
    if !Board::in_bounds(to.0, to.1) {
        return false;
    }
    let to = (to.0 as usize, to.1 as usize);
    if board.is_empty(to) {
        emit(board, from, to);
        return true;
    }
    false
}

fn try_capture<F>(board: &Board, from: Pos, to: (i32, i32), emit: &mut F) -> bool
where
    F: FnMut(&Board, Pos, Pos),
{
    if !Board::in_bounds(to.0, to.1) {
        return false;
    }
    let to = (to.0 as usize, to.1 as usize);
    if board.occupies(to, board.turn.opposite()) {
        emit(board, from, to);
        return true;
    }
    false
}

fn try_any<F>(board: &Board, from: Pos, to: (i32, i32), emit: &mut F) -> bool
where
    F: FnMut(&Board, Pos, Pos),
{
    if !Board::in_bounds(to.0, to.1) {
        return false;
    }
    let to = (to.0 as usize, to.1 as usize);
    if !board.occupies(to, board.turn) {
        emit(board, from, to);
        return true;
    }
    false
}

fn try_en_passant<F>(board: &Board, from: Pos, to: (i32, i32), emit: &mut F) -> bool
where
    F: FnMut(&Board, Pos, Pos),
{
    if !Board::in_bounds(to.0, to.1) {
        return false;
    }
    let to = (to.0 as usize, to.1 as usize);
    let capture_rank = match board.turn {
        Color::White => 5,
        Color::Black => 2,
    };
    if to.0 == capture_rank && board.en_passant_file == Some(to.1) {
        emit(board, from, to);
        return true;
    }
    false
}

fn pawn_moves<F>(board: &Board, from: Pos, emit: &mut F)
where
    F: FnMut(&Board, Pos, Pos),
{
    let dir = board.turn.advance();
    let (rank, file) = (from.0 as i32, from.1 as i32);
    let home_rank = match board.turn {
        Color::White => 1,
        Color::Black => 6,
    };

    // The double step needs the single step to have gone through: both
    // squares ahead must be empty.
    if try_peaceful(board, from, (rank + dir, file), emit) && from.0 == home_rank {
        try_peaceful(board, from, (rank + 2 * dir, file), emit);
    }

    try_capture(board, from, (rank + dir, file - 1), emit);
    try_capture(board, from, (rank + dir, file + 1), emit);
    try_en_passant(board, from, (rank + dir, file - 1), emit);
    try_en_passant(board, from, (rank + dir, file + 1), emit);
}

fn leaper_moves<F>(board: &Board, from: Pos, offsets: &[(i32, i32)], emit: &mut F)
where
    F: FnMut(&Board, Pos, Pos),
{
    for &(dr, df) in offsets {
        try_any(board, from, (from.0 as i32 + dr, from.1 as i32 + df), emit);
    }
}

fn slider_moves<F>(board: &Board, from: Pos, dirs: &[(i32, i32)], emit: &mut F)
where
    F: FnMut(&Board, Pos, Pos),
{
    for &(dr, df) in dirs {
        let (mut rank, mut file) = (from.0 as i32 + dr, from.1 as i32 + df);
        while Board::in_bounds(rank, file) {
            try_capture(board, from, (rank, file), emit);
            if !try_peaceful(board, from, (rank, file), emit) {
                // Blocked; sliders cannot jump over pieces.
                break;
            }
            rank += dr;
            file += df;
        }
    }
}

fn king_moves<F>(board: &Board, from: Pos, emit: &mut F)
where
    F: FnMut(&Board, Pos, Pos),
{
    for dr in -1..=1 {
        for df in -1..=1 {
            if dr == 0 && df == 0 {
                continue;
            }
            try_any(board, from, (from.0 as i32 + dr, from.1 as i32 + df), emit);
        }
    }

    let home = (Board::home_rank(board.turn), 4);
    if from != home {
        return;
    }
    for side in [CastleSide::Queenside, CastleSide::Kingside] {
        if castle_allowed(board, side) {
            emit(board, from, (home.0, side.king_target_file()));
        }
    }
}

/// Castling eligibility: the right is intact, the rook is on its corner, the
/// span between king and rook is clear, and the king neither starts from,
/// passes over nor lands on a threatened square. The threat test applies the
/// castle to a copy and inspects the enemy's landing counts.
fn castle_allowed(board: &Board, side: CastleSide) -> bool {
    if !board.castling.allows(board.turn, side) {
        return false;
    }

    let rank = Board::home_rank(board.turn);
    let rook_file = side.rook_file();
    match board.get((rank, rook_file)) {
        Some(piece) if piece.piece_type == PieceType::Rook && piece.color == board.turn => {}
        _ => return false,
    }

    let between = match side {
        CastleSide::Queenside => 1..4,
        CastleSide::Kingside => 5..7,
    };
    for file in between {
        if board.occupied((rank, file)) {
            return false;
        }
    }

    let mut probe = board.clone();
    probe.apply_move((rank, 4), (rank, side.king_target_file()));
    let threats = threat_map(&probe);
    let walked: &[usize] = match side {
        CastleSide::Queenside => &[4, 3, 2, 1],
        CastleSide::Kingside => &[4, 5, 6],
    };
    walked.iter().all(|&file| threats[rank][file] == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    fn contains(moves: &MoveList, from: Pos, to: Pos) -> bool {
        moves.iter().any(|mv| *mv == Move::new(from, to))
    }

    #[test]
    fn initial_position_has_twenty_moves() {
        let moves = collect_moves(&Board::new());
        assert_eq!(moves.len(), 20);
        assert!(contains(&moves, (1, 4), (3, 4)), "e2 e4 should be legal");
        assert!(contains(&moves, (0, 6), (2, 5)), "g1 f3 should be legal");
    }

    #[test]
    fn only_the_side_to_move_generates() {
        let board = Board::new();
        let mut count = 0;
        // Black pawn origin while White is to move.
        valid_moves_from(&board, (6, 4), &mut |_, _, _| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn blocked_pawn_cannot_advance_or_jump() {
        let mut board = Board::new();
        board.set((2, 4), Some(Piece::new(PieceType::Knight, Color::Black)));
        let mut moves = Vec::new();
        valid_moves_from(&board, (1, 4), &mut |_, from, to| {
            moves.push(Move::new(from, to));
        });
        // Forward is blocked, so the double step is gone too; the knight on
        // e3 is not diagonally capturable from e2.
        assert!(moves.is_empty());
    }

    #[test]
    fn pawn_captures_diagonally() {
        let mut board = Board::new();
        board.set((2, 3), Some(Piece::new(PieceType::Knight, Color::Black)));
        let mut moves = Vec::new();
        valid_moves_from(&board, (1, 4), &mut |_, from, to| {
            moves.push(Move::new(from, to));
        });
        assert!(moves.contains(&Move::new((1, 4), (2, 3))));
        assert!(moves.contains(&Move::new((1, 4), (2, 4))));
        assert!(moves.contains(&Move::new((1, 4), (3, 4))));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn en_passant_is_emitted_for_one_ply() {
        let mut board = Board::new();
        board.set((6, 3), None);
        board.set((3, 3), Some(Piece::new(PieceType::Pawn, Color::Black)));
        board.apply_move((1, 4), (3, 4));

        let moves = collect_moves(&board);
        assert!(contains(&moves, (3, 3), (2, 4)), "d4 takes e3 en passant");

        // A quiet reply elsewhere expires the opportunity.
        let mut later = board.clone();
        later.apply_move((6, 0), (5, 0));
        later.apply_move((1, 0), (2, 0));
        let moves = collect_moves(&later);
        assert!(!contains(&moves, (3, 3), (2, 4)));
    }

    #[test]
    fn knight_in_the_open_has_eight_moves() {
        let mut board = Board::empty();
        board.set((3, 3), Some(Piece::new(PieceType::Knight, Color::White)));
        let moves = collect_moves(&board);
        assert_eq!(moves.len(), 8);
    }

    #[test]
    fn sliders_stop_at_blockers_and_capture_through_nothing() {
        let mut board = Board::empty();
        board.set((3, 3), Some(Piece::new(PieceType::Rook, Color::White)));
        board.set((3, 6), Some(Piece::new(PieceType::Pawn, Color::Black)));
        board.set((5, 3), Some(Piece::new(PieceType::Pawn, Color::White)));
        let moves = collect_moves(&board);

        assert!(contains(&moves, (3, 3), (3, 6)), "enemy pawn capturable");
        assert!(!contains(&moves, (3, 3), (3, 7)), "no sliding past a capture");
        assert!(contains(&moves, (3, 3), (4, 3)));
        assert!(!contains(&moves, (3, 3), (5, 3)), "own piece blocks");
    }

    #[test]
    fn threat_map_counts_landings() {
        let mut board = Board::empty();
        board.set((3, 3), Some(Piece::new(PieceType::Rook, Color::White)));
        let threats = threat_map(&board);
        let total: u32 = threats.iter().flatten().sum();
        assert_eq!(total, 14);
        assert_eq!(threats[3][0], 1);
        assert_eq!(threats[0][3], 1);
        assert_eq!(threats[3][3], 0);
    }

    #[test]
    fn castle_allowed_when_path_is_clear_and_safe() {
        let mut board = Board::new();
        board.set((0, 5), None);
        board.set((0, 6), None);
        let mut moves = Vec::new();
        valid_moves_from(&board, (0, 4), &mut |_, from, to| {
            moves.push(Move::new(from, to));
        });
        assert!(moves.contains(&Move::new((0, 4), (0, 6))));
        assert!(!moves.contains(&Move::new((0, 4), (0, 2))), "queenside blocked");
    }

    #[test]
    fn castle_rejected_through_check() {
        let mut board = Board::new();
        board.set((0, 5), None);
        board.set((0, 6), None);
        board.set((1, 5), None);
        board.set((5, 5), Some(Piece::new(PieceType::Rook, Color::Black)));
        let mut moves = Vec::new();
        valid_moves_from(&board, (0, 4), &mut |_, from, to| {
            moves.push(Move::new(from, to));
        });
        assert!(!moves.contains(&Move::new((0, 4), (0, 6))));
    }

    #[test]
    fn castle_rejected_out_of_check() {
        let mut board = Board::new();
        board.set((0, 5), None);
        board.set((0, 6), None);
        board.set((1, 4), None);
        board.set((5, 4), Some(Piece::new(PieceType::Rook, Color::Black)));
        let mut moves = Vec::new();
        valid_moves_from(&board, (0, 4), &mut |_, from, to| {
            moves.push(Move::new(from, to));
        });
        assert!(!moves.contains(&Move::new((0, 4), (0, 6))));
    }

    #[test]
    fn castle_needs_right_and_rook() {
        let mut board = Board::new();
        board.set((0, 5), None);
        board.set((0, 6), None);

        let mut revoked = board.clone();
        revoked.castling.white_kingside = false;
        let moves = collect_moves(&revoked);
        assert!(!contains(&moves, (0, 4), (0, 6)));

        let mut rookless = board.clone();
        rookless.set((0, 7), None);
        let moves = collect_moves(&rookless);
        assert!(!contains(&moves, (0, 4), (0, 6)));
    }

    #[test]
    fn move_valid_matches_generation() {
        let board = Board::new();
        assert!(move_valid(&board, Move::new((1, 4), (3, 4))));
        assert!(move_valid(&board, Move::new((0, 6), (2, 5))));
        assert!(!move_valid(&board, Move::new((1, 4), (4, 4))));
        assert!(!move_valid(&board, Move::new((6, 4), (5, 4))), "not black's turn");
        assert!(!move_valid(&board, Move::new((3, 3), (4, 4))), "empty origin");
    }

    /// Walk a deterministic pseudo-game and check the generator's emission
    /// invariants and the board's structural invariants at every ply.
    #[test]
    fn scripted_play_preserves_invariants() {
        let mut board = Board::new();
        for ply in 0..60 {
            let moves = collect_moves(&board);
            assert!(!moves.is_empty());
            for mv in &moves {
                assert!(Board::in_bounds(mv.from.0 as i32, mv.from.1 as i32));
                assert!(Board::in_bounds(mv.to.0 as i32, mv.to.1 as i32));
                assert!(board.occupies(mv.from, board.turn));
                assert!(!board.occupies(mv.to, board.turn));
            }
            let mv = moves[ply % moves.len()];
            if board.winning_move(mv.to) {
                break;
            }
            let mover = board.turn;
            board.apply_move(mv.from, mv.to);
            assert_eq!(board.turn, mover.opposite());
            assert!(board.is_valid());
        }
    }
}
