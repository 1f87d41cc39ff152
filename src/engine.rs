// =============================================================================
// Chess engine core
//
// A bounded-depth minimax search with alpha-beta pruning over the pseudo-legal
// move generator. Scores are absolute (positive favors White) and the search
// keeps one bound per color: each side only ever raises its own bound, and a
// branch is cut as soon as the White bound meets the Black bound. Moves are
// ordered most-valuable-victim-first so the pruning bites early. Past the
// depth horizon only captures are searched, with the static evaluation as the
// stand-pat fallback; checkmate is resolved by actually capturing the king,
// which swings the material score past the checkmate threshold.
//
// The evaluation is the sum of three independent terms: threat-discounted
// material, mobility, and pawn advancement. It is a pure function of the
// board.
// =============================================================================

use std::cmp::Ordering;

use crate::board::Board;
use crate::movegen::{self, sorted_moves};
use crate::moves::{Move, Pos};
use crate::piece::{Color, Piece, PieceType};
use crate::table::TranspositionTable;

/// Scale factor between piece values and evaluation units.
pub const SCORE_FRAC: i32 = 100;

/// Scores beyond this magnitude mean a king is gone or as good as gone.
pub const CHECKMATE_THRESHOLD: i32 = 500 * SCORE_FRAC;

/// Saturating alpha-beta bounds passed at the top level; no reachable
/// evaluation comes close.
pub const SCORE_LIMIT: i32 = 1_000_000;

/// Search knobs for the driver binaries.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Full search depth in plies.
    pub depth: i32,
    /// log2 of the transposition table's initial slot count.
    pub table_size_pow: u32,
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            depth: 6,
            table_size_pow: 21,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Threat-discounted material count.
///
/// For every occupied square, both colors' "could attack this square" counts
/// are computed by temporarily swapping in a White and then a Black copy of
/// the piece (with the matching side to move) and generating that square's
/// moves; landings accumulate into the owner's threat map. A piece with net
/// enemy threat is counted at 80% of its value if its owner is to move and
/// can still save it, at 20% otherwise; safe pieces count in full.
pub fn score_exchange(board: &Board) -> i32 {
    let mut threats: [[[u32; 8]; 8]; 2] = [[[0; 8]; 8]; 2];
    let mut probe = board.clone();
    for rank in 0..8 {
        for file in 0..8 {
            let Some(piece) = board.squares[rank][file] else {
                continue;
            };
            let owner = piece.color.index();
            for color in [Color::White, Color::Black] {
                probe.turn = color;
                probe.squares[rank][file] = Some(Piece::new(piece.piece_type, color));
                movegen::valid_moves_from(&probe, (rank, file), &mut |_, _, to: Pos| {
                    threats[owner][to.0][to.1] += 1;
                });
            }
            probe.squares[rank][file] = board.squares[rank][file];
        }
    }

    let mut total = 0;
    for rank in 0..8 {
        for file in 0..8 {
            let Some(piece) = board.squares[rank][file] else {
                continue;
            };
            let valence = piece.color.valence();
            let threat = threats[0][rank][file] as i32 - threats[1][rank][file] as i32;
            let value = valence * piece.piece_type.value();
            let multiplier = if threat * valence < 0 {
                if piece.color == board.turn {
                    SCORE_FRAC * 8 / 10
                } else {
                    SCORE_FRAC * 2 / 10
                }
            } else {
                SCORE_FRAC
            };
            total += value * multiplier;
        }
    }
    total
}

/// Mobility: difference in pseudo-legal move counts, one evaluation unit per
/// move.
pub fn score_mobility(board: &Board) -> i32 {
    let mut probe = board.clone();
    let mut counts = [0i32; 2];
    for color in [Color::White, Color::Black] {
        probe.turn = color;
        let mut count = 0;
        movegen::valid_moves(&probe, &mut |_, _, _| count += 1);
        counts[color.index()] = count;
    }
    (counts[0] - counts[1]) * SCORE_FRAC / 100
}

/// Small push toward promotion: a pawn within three ranks of the last rank
/// earns up to a pawn's worth of bonus.
pub fn score_pawn_advancement(board: &Board) -> i32 {
    let mut total = 0;
    for rank in 0..8 {
        for file in 0..8 {
            let Some(piece) = board.squares[rank][file] else {
                continue;
            };
            if piece.piece_type != PieceType::Pawn {
                continue;
            }
            let target_rank: i32 = match piece.color {
                Color::White => 7,
                Color::Black => 0,
            };
            let distance = (rank as i32 - target_rank).abs();
            total += (3 - distance).max(0) * piece.color.valence();
        }
    }
    total * SCORE_FRAC / 3
}

/// Static evaluation: positive favors White.
pub fn evaluate(board: &Board) -> i32 {
    score_exchange(board) + score_mobility(board) + score_pawn_advancement(board)
}

pub fn score_is_checkmate(score: i32) -> bool {
    score.abs() > CHECKMATE_THRESHOLD
}

// =============================================================================
// Move ordering
// =============================================================================

/// Most-valuable-victim ordering: captures of high-value pieces first, quiet
/// moves (victim value 0) last. Stable sorting keeps generation order among
/// ties.
pub fn capture_order(board: &Board, a: &Move, b: &Move) -> Ordering {
    let victim = |mv: &Move| board.get(mv.to).map_or(0, |p| p.piece_type.value());
    victim(b).cmp(&victim(a))
}

// =============================================================================
// Search
// =============================================================================

/// Best achievable score for the side to move, searching `max_depth` plies
/// (plus capture chains beyond that).
///
/// `alpha` and `beta` are the White and Black bounds; callers start from
/// `-SCORE_LIMIT` / `SCORE_LIMIT`. On a new expansion the winning line is
/// written to `pv`; a cached or terminal result leaves `pv` untouched, and a
/// position with no improving move leaves it empty, which is how stalemate
/// surfaces to the driver.
pub fn minimax_score(
    table: &mut TranspositionTable,
    board: &Board,
    max_depth: i32,
    alpha: i32,
    beta: i32,
    pv: &mut Vec<Move>,
) -> i32 {
    if let Some(entry) = table.lookup(board) {
        if entry.depth >= max_depth {
            return entry.score;
        }
    }

    let my_score = evaluate(board);
    if score_is_checkmate(my_score) {
        // A king is already gone; leaf. Not cached.
        return my_score;
    }

    let mover = board.turn;
    let valence = mover.valence();
    let mut bounds = [alpha, beta];

    // Past the horizon the side to move may stand pat on the static score
    // rather than being forced into a losing capture sequence.
    if max_depth <= 0 && (my_score - bounds[mover.index()]) * valence > 0 {
        bounds[mover.index()] = my_score;
        pv.clear();
        pv.push(Move::STAND_PAT);
    }

    let mut child_pv = Vec::new();
    for mv in sorted_moves(board, capture_order) {
        if bounds[0] >= bounds[1] {
            break;
        }
        if max_depth <= 0 && board.is_empty(mv.to) {
            // Quiescence: only captures extend past the horizon.
            continue;
        }

        let mut child = board.clone();
        child.apply_move(mv.from, mv.to);
        child_pv.clear();
        let new_score = minimax_score(
            table,
            &child,
            max_depth - 1,
            bounds[0],
            bounds[1],
            &mut child_pv,
        );

        if (new_score - bounds[mover.index()]) * valence > 0 {
            bounds[mover.index()] = new_score;
            pv.clear();
            pv.push(mv);
            let tail = child_pv
                .strip_prefix(&[Move::STAND_PAT])
                .unwrap_or(child_pv.as_slice());
            pv.extend_from_slice(tail);
        }
    }

    let score = bounds[mover.index()];
    if max_depth > 0 {
        table.insert(board, score, max_depth);
    }
    score
}

/// The score and principal variation of a full search.
pub struct SearchOutcome {
    pub score: i32,
    pub pv: Vec<Move>,
}

/// Run a fresh search: a new transposition table is created for this call
/// and dropped when it returns.
pub fn search(board: &Board, config: &EngineConfig) -> SearchOutcome {
    let mut table = TranspositionTable::with_size_pow(config.table_size_pow);
    let mut pv = Vec::new();
    let score = minimax_score(
        &mut table,
        board,
        config.depth,
        -SCORE_LIMIT,
        SCORE_LIMIT,
        &mut pv,
    );
    SearchOutcome { score, pv }
}

/// The move the engine plays, or `None` when the side to move has no line at
/// all (no pseudo-legal moves).
pub fn choose_move(board: &Board, config: &EngineConfig) -> Option<Move> {
    search(board, config).pv.into_iter().next()
}
