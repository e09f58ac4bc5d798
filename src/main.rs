use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use priority_queue_mini::{append_snapshots, PriorityQueue, QueueConfig, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const WORKERS: usize = 8;
const ITEMS_PER_WORKER: usize = 25;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "priority queue demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => QueueConfig::from_path(&path)?,
        None => QueueConfig { priority_count: 5, ..QueueConfig::default() },
    };
    let output = args.next().unwrap_or_else(|| "snapshots.ndjson".to_string());

    let queue = PriorityQueue::<String>::from_config(&config).into_shared();
    let levels = queue.nr_of_priorities();
    info!(levels, workers = WORKERS, items_per_worker = ITEMS_PER_WORKER, "starting producers");

    // Each worker walks the levels in rotation, starting at a different one
    let mut handles = Vec::with_capacity(WORKERS);
    for worker in 0..WORKERS {
        let queue = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for i in 0..ITEMS_PER_WORKER {
                let priority = ((worker + i) % levels + 1) as i32;
                queue.enqueue(format!("W{worker}-Item {i}"), priority);
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            warn!("producer thread panicked");
        }
    }

    let before = queue.snapshot();
    info!(count = before.count, head_priority = before.head_priority, "producers done");

    let mut drained = 0usize;
    let mut last_level = 1;
    while let Some(item) = queue.dequeue() {
        let level = (1..=levels as i32)
            .find(|&p| before.level(p as usize).contains(&item))
            .unwrap_or(last_level);
        if level < last_level {
            warn!(item = %item, level, last_level, "dequeued out of priority order");
        }
        last_level = level;
        drained += 1;
    }

    let after = queue.snapshot();
    info!(drained, expected = WORKERS * ITEMS_PER_WORKER, remaining = after.count, "drained queue");

    append_snapshots(&[before, after], &output)?;
    info!(path = %output, "wrote snapshots");
    Ok(())
}
