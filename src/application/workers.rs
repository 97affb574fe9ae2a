//! Bounded worker pool for independent per-item work
//!
//! Deploy, status and graph building all fan out over items that share no
//! state except through their own synchronization. Results come back in input
//! order.

use rayon::prelude::*;

/// Worker count used when nothing is configured
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Map `f` over `items` on a pool of `workers` threads.
///
/// Falls back to sequential iteration if the pool can't be built or there is
/// only one worker.
pub fn map_bounded<T, R, F>(workers: usize, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if items.is_empty() {
        return Vec::new();
    }
    if workers <= 1 || items.len() == 1 {
        return items.iter().map(f).collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.min(items.len()))
        .thread_name(|i| format!("tether-worker-{}", i))
        .build();

    match pool {
        Ok(pool) => pool.install(|| items.par_iter().map(&f).collect()),
        Err(e) => {
            tracing::debug!(error = %e, "worker pool unavailable; running sequentially");
            items.iter().map(f).collect()
        }
    }
}
