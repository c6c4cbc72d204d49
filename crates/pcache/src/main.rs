//! pcache - command-line driver for primecache

mod perf;
mod replay;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use primecache::CacheConfig;
use tracing::info;

use crate::perf::PerfOptions;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time batches of random puts and gets, then delete every key
    Perf {
        /// Number of batches
        #[arg(short, long, default_value_t = 100)]
        iterations: u64,

        /// Random keys per batch
        #[arg(short, long, default_value_t = 10_000)]
        batch: usize,

        /// Drive an LRU cache of this capacity instead of the plain table
        #[arg(short, long)]
        capacity: Option<usize>,
    },

    /// Run a put/get/delete/size script against a cache
    Replay {
        /// Script file, one operation per line
        script: PathBuf,

        /// Cache capacity (number of items)
        #[arg(short, long, default_value_t = 10_000)]
        capacity: usize,

        /// Leave recency untouched on get
        #[arg(long)]
        no_touch_on_read: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("pcache v{}", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Perf {
            iterations,
            batch,
            capacity,
        } => {
            let options = PerfOptions {
                iterations,
                batch,
                capacity,
            };
            perf::run(&options, &mut out)
        }
        Command::Replay {
            script,
            capacity,
            no_touch_on_read,
        } => {
            let config = CacheConfig::new(capacity).with_touch_on_read(!no_touch_on_read);
            info!("Replaying {} with capacity {}", script.display(), capacity);
            replay::run_file(&script, config, &mut out)
        }
    }
}
