use std::io::{self, BufRead, Write};

use gambit::board::Board;
use gambit::engine::{self, EngineConfig};
use gambit::movegen::move_valid;
use gambit::moves::{square_name, Move};
use gambit::piece::Color;

/// Prompt until the human enters a parsable, pseudo-legal move. Returns
/// `None` on end of input.
fn prompt_human(board: &Board) -> Option<Move> {
    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("Enter move: ");
        io::stdout().flush().ok();
        input.clear();
        if stdin.lock().read_line(&mut input).unwrap_or(0) == 0 {
            return None;
        }
        match Move::parse(&input) {
            Some(mv) if move_valid(board, mv) => return Some(mv),
            _ => println!("Invalid move. Enter two squares, e.g. `e2 e4`."),
        }
    }
}

fn main() {
    println!("gambit (built {})", env!("BUILD_TIMESTAMP"));
    println!("You play White. Capture the king to win.");

    let config = EngineConfig::default();
    let mut board = Board::new();
    let mut plies = 0u32;

    loop {
        println!("{board}");
        println!("{:?} to play ({plies} plies so far).", board.turn);

        let mv = match board.turn {
            Color::White => {
                let Some(mv) = prompt_human(&board) else {
                    println!("Goodbye.");
                    return;
                };
                mv
            }
            Color::Black => {
                let outcome = engine::search(&board, &config);
                let Some(&mv) = outcome.pv.first() else {
                    println!("The engine has no move. Game over.");
                    return;
                };
                let line: Vec<String> = outcome.pv.iter().map(|m| m.to_string()).collect();
                println!(
                    "Engine score {}, line: {}",
                    outcome.score,
                    line.join(", ")
                );
                mv
            }
        };

        let symbol = board.get(mv.from).map_or('?', |piece| piece.symbol());
        println!("{symbol} {} -> {}", square_name(mv.from), square_name(mv.to));

        if board.winning_move(mv.to) {
            println!("{:?} wins by capturing the king!", board.turn);
            return;
        }
        board.apply_move(mv.from, mv.to);
        plies += 1;
    }
}
