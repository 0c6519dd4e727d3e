//! Error types for the recoverable edges of the engine: FEN input, the
//! score-cache file and the configuration file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),
    #[error("FEN board must have 8 ranks, found {0}")]
    RankCount(usize),
    #[error("FEN rank {rank} does not describe 8 files")]
    RankWidth { rank: usize },
    #[error("unknown piece character '{0}'")]
    Piece(char),
    #[error("side to move must be 'w' or 'b', got '{0}'")]
    Side(String),
    #[error("invalid en passant square '{0}'")]
    EnPassant(String),
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("score cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed score cache entry on line {line} ({loaded} entries loaded)")]
    Malformed { line: usize, loaded: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid position key: {0}")]
pub struct KeyError(pub String);
