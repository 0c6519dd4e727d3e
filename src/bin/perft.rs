use castellan::board::{Position as Board, START_FEN};
use castellan::notation::coordinate;
use castellan::rules::{legal_successors, perft};
use clap::Parser;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 3)]
    depth: u8,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    castellan::init();

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let board = match Board::from_fen(&args.fen) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("invalid FEN: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let reference: Chess = match args
        .fen
        .parse::<Fen>()
        .map_err(|e| e.to_string())
        .and_then(|fen| {
            fen.into_position(CastlingMode::Standard)
                .map_err(|e| e.to_string())
        }) {
        Ok(pos) => pos,
        Err(e) => {
            eprintln!("shakmaty rejected FEN: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.divide && args.depth > 0 {
        for child in legal_successors(&board) {
            let name = child.last_ply().map(coordinate).unwrap_or_default();
            println!("{}: {}", name, perft(&child, args.depth - 1));
        }
    }

    let start = Instant::now();
    let ours = perft(&board, args.depth);
    let ours_time = start.elapsed();

    let start = Instant::now();
    let theirs = perft_shakmaty(&reference, args.depth);
    let theirs_time = start.elapsed();

    println!(
        "castellan perft({}) = {} nodes ({} ms)",
        args.depth,
        ours,
        ours_time.as_millis()
    );
    println!(
        "shakmaty  perft({}) = {} nodes ({} ms)",
        args.depth,
        theirs,
        theirs_time.as_millis()
    );

    if ours == theirs {
        ExitCode::SUCCESS
    } else {
        println!("MISMATCH: {} vs {}", ours, theirs);
        ExitCode::FAILURE
    }
}

fn perft_shakmaty(pos: &Chess, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
