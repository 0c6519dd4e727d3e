//! Castellan command line: analyse one position and print the chosen move.

use castellan::board::{Position, START_FEN};
use castellan::config::EngineConfig;
use castellan::notation::find_successor;
use castellan::rules::{outcome, Outcome};
use castellan::Engine;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Position to analyse
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    /// Coordinate moves played from the position before analysing
    #[arg(short, long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,

    /// Search depth in plies
    #[arg(short, long)]
    depth: Option<u8>,

    /// Worker threads (0 = all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Score cache file, loaded before and written after the search
    #[arg(long)]
    cache: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search on the calling thread only
    #[arg(long)]
    sequential: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    castellan::init();

    let config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let mut params = config.search_params();
    if let Some(depth) = args.depth {
        params = params.depth(depth);
    }
    if let Some(threads) = args.threads {
        params = params.threads(threads);
    }
    let cache_path = args.cache.clone().or(config.cache_path.clone());

    let mut position = match Position::from_fen(&args.fen) {
        Ok(pos) => pos,
        Err(e) => {
            eprintln!("invalid FEN: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut engine = Engine::new(params);
    if let Some(path) = &cache_path {
        if path.exists() {
            engine.load_cache(path);
        }
    }

    for text in &args.moves {
        let Some(next) = find_successor(&position, text) else {
            eprintln!("illegal move: {}", text);
            return ExitCode::FAILURE;
        };
        engine.record_played(&position, &next);
        position = next;
    }

    let decision = if args.sequential {
        engine.think_sequential(&position)
    } else {
        engine.think(&position)
    };

    for failure in &decision.failed_workers {
        eprintln!("worker {} failed: {}", failure.worker, failure.message);
    }

    match &decision.choice {
        Some(choice) => {
            if choice.mate {
                println!("bestmove {} (mate)", choice.descriptor);
            } else {
                println!("bestmove {} score {}", choice.descriptor, choice.score);
            }
            println!(
                "nodes {} time {}ms workers {}",
                decision.stats.nodes,
                decision.stats.search_time.as_millis(),
                decision.workers
            );
        }
        None => match outcome(&position) {
            Outcome::Checkmate => println!("no move: checkmate"),
            Outcome::Stalemate => println!("no move: stalemate"),
            Outcome::Ongoing => println!("no move: every worker failed"),
        },
    }

    if let Some(path) = &cache_path {
        engine.dump_cache(path);
    }

    if decision.is_degraded() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
