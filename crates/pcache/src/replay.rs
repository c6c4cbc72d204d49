//! Operation script replay
//!
//! Script format, one operation per line:
//! ```text
//! # comment
//! put <key> <value>
//! get <key>
//! delete <key>
//! size
//! ```
//!
//! Keys and values are single whitespace-free tokens; `""` stands for the
//! empty string. Each operation prints one line: `true`/`false` for put and
//! delete, the value or `(none)` for get, the entry count for size.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use primecache::{CacheConfig, LruCache};
use tracing::info;

/// Printed by `get` for a missing key
const MISSING: &str = "(none)";

/// One parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Put { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Size,
}

fn token(raw: &str) -> String {
    if raw == "\"\"" {
        String::new()
    } else {
        raw.to_string()
    }
}

/// Parse one line; blank lines and comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<Op>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let op = match tokens.as_slice() {
        ["put", key, value] => Op::Put {
            key: token(key),
            value: token(value),
        },
        ["get", key] => Op::Get { key: token(key) },
        ["delete", key] => Op::Delete { key: token(key) },
        ["size"] => Op::Size,
        _ => bail!("unrecognized operation: {}", line),
    };
    Ok(Some(op))
}

/// Execute every operation in `input` against `cache`
pub fn run<R: BufRead, W: Write>(input: R, cache: &mut LruCache<String>, out: &mut W) -> Result<()> {
    for (n, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", n + 1))?;
        let op = match parse_line(&line).with_context(|| format!("line {}", n + 1))? {
            Some(op) => op,
            None => continue,
        };

        match op {
            Op::Put { key, value } => writeln!(out, "{}", cache.put(key, value))?,
            Op::Get { key } => match cache.get(&key) {
                Some(value) => writeln!(out, "{}", value)?,
                None => writeln!(out, "{}", MISSING)?,
            },
            Op::Delete { key } => writeln!(out, "{}", cache.delete(&key))?,
            Op::Size => writeln!(out, "{}", cache.len())?,
        }
    }
    Ok(())
}

/// Replay the script at `path` against a fresh cache built from `config`
pub fn run_file<W: Write>(path: &Path, config: CacheConfig, out: &mut W) -> Result<()> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut cache = LruCache::with_config(config)?;

    run(BufReader::new(file), &mut cache, out)?;

    let stats = cache.stats();
    info!(
        "Replay finished: {} items, {} hits, {} misses, {} evictions",
        cache.len(),
        stats.hits(),
        stats.misses(),
        stats.evictions()
    );
    Ok(())
}
