//! Position-score cache
//!
//! Exact-key map from a position's canonical encoding to the score the root
//! search gave it. Entries are never evicted within a session. The cache
//! can be persisted as text, one `<key> <score>` pair per line.

use crate::board::PositionKey;
use crate::error::CacheError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreCache {
    entries: HashMap<PositionKey, i32>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PositionKey) -> Option<i32> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: PositionKey, score: i32) {
        self.entries.insert(key, score);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &i32)> {
        self.entries.iter()
    }

    /// Fold a worker's fresh entries into the shared map
    pub fn merge(&mut self, fresh: HashMap<PositionKey, i32>) {
        self.entries.extend(fresh);
    }

    /// Read entries until end of input. Returns the number read; a bad line
    /// stops the load and the entries before it stay in the cache.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<usize, CacheError> {
        let mut loaded = 0usize;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(key_text) = fields.next() else {
                continue;
            };
            let parsed = fields
                .next()
                .and_then(|score| score.parse::<i32>().ok())
                .zip(key_text.parse::<PositionKey>().ok());
            match parsed {
                Some((score, key)) if fields.next().is_none() => {
                    self.entries.insert(key, score);
                    loaded += 1;
                }
                _ => return Err(CacheError::Malformed { line: i + 1, loaded }),
            }
        }
        Ok(loaded)
    }

    /// Write every entry; returns the number written
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize, CacheError> {
        let mut written = 0usize;
        for (key, score) in &self.entries {
            writeln!(writer, "{} {}", key, score)?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, CacheError> {
        let path = path.as_ref();
        let count = self.read_from(BufReader::new(File::open(path)?))?;
        tracing::info!(path = %path.display(), entries = count, "score cache loaded");
        Ok(count)
    }

    pub fn dump(&self, path: impl AsRef<Path>) -> Result<usize, CacheError> {
        let path = path.as_ref();
        let count = self.write_to(BufWriter::new(File::create(path)?))?;
        tracing::info!(path = %path.display(), entries = count, "score cache written");
        Ok(count)
    }
}
