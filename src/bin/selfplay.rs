use serde::Serialize;

use gambit::board::Board;
use gambit::engine::{choose_move, EngineConfig};

const MAX_PLIES: u32 = 120;
const DEPTH: i32 = 3;

#[derive(Serialize)]
struct GameRecord {
    moves: Vec<String>,
    winner: Option<String>,
    plies: u32,
}

fn main() {
    let config = EngineConfig {
        depth: DEPTH,
        ..EngineConfig::default()
    };
    let mut board = Board::new();
    let mut record = GameRecord {
        moves: Vec::new(),
        winner: None,
        plies: 0,
    };

    while record.plies < MAX_PLIES {
        let Some(mv) = choose_move(&board, &config) else {
            break;
        };
        record.moves.push(mv.to_string());
        record.plies += 1;
        if board.winning_move(mv.to) {
            record.winner = Some(format!("{:?}", board.turn));
            break;
        }
        board.apply_move(mv.from, mv.to);
    }

    match serde_json::to_string(&record) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize game record: {err}"),
    }
    eprintln!("{board}");
    eprintln!("{} plies played, winner: {:?}", record.plies, record.winner);
}
