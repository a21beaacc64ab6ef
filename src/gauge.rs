//! Depth threshold for parallel fan-out, and the worker pool behind it.

use std::sync::OnceLock;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace, warn};

use crate::config::{Concurrency, config};
use crate::error::Result;
use crate::hasher::FANOUT_BITS;

/// Bottom trie levels that always run sequentially. Subtrees down there hold
/// roughly `FANOUT^2` elements, too few to pay for a task.
const SEQUENTIAL_LEVELS: usize = 2;

/// Decides at which trie depths structural recursion fans out in parallel.
///
/// Stateless; recomputed for every top-level operation. Parallel and
/// sequential runs produce identical trees because conflict resolution
/// depends only on the two elements involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gauge {
    parallel_depth: usize,
}

impl Gauge {
    /// A gauge that never fans out.
    #[must_use]
    pub const fn sequential() -> Self {
        Self { parallel_depth: 0 }
    }

    /// Derives the gauge for a trie of `count` elements and at most `ceiling`
    /// worker threads.
    ///
    /// Depths shallower than `min(levels - 2, ceil(log16(ceiling)) + 1)` run
    /// in parallel, where `levels = floor(log16(count))`.
    #[must_use]
    pub fn new(count: usize, ceiling: usize) -> Self {
        if ceiling <= 1 || count == 0 {
            return Self::sequential();
        }
        let levels = (count.ilog2() / FANOUT_BITS) as usize;
        let spread = ((ceiling - 1).ilog2() / FANOUT_BITS) as usize + 2;
        let parallel_depth = levels.saturating_sub(SEQUENTIAL_LEVELS).min(spread);
        trace!(count, ceiling, parallel_depth, "gauge");
        Self { parallel_depth }
    }

    /// Derives the gauge from the configured concurrency ceiling.
    #[must_use]
    pub fn for_count(count: usize) -> Self {
        Self::new(count, config().concurrency.ceiling())
    }

    /// Returns `true` if recursion at `depth` should fan out in parallel.
    #[inline]
    #[must_use]
    pub const fn parallel_at(self, depth: usize) -> bool {
        depth < self.parallel_depth
    }

    /// Number of leading depths that fan out in parallel.
    #[must_use]
    pub const fn parallel_depth(self) -> usize {
        self.parallel_depth
    }

    /// Runs `op` on the bounded worker pool when this gauge is parallel,
    /// inline otherwise.
    pub fn install<R, F>(self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match pool() {
            Some(pool) if self.parallel_depth > 0 => pool.install(op),
            _ => op(),
        }
    }
}

/// Returns the process-wide worker pool, or `None` when parallelism is off or
/// the pool could not be built.
fn pool() -> Option<&'static ThreadPool> {
    static POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();
    POOL.get_or_init(|| match config().concurrency {
        Concurrency::Off => None,
        Concurrency::Ceiling(threads) => match build_pool(threads.get()) {
            Ok(pool) => {
                debug!(threads = threads.get(), "built worker pool");
                Some(pool)
            }
            Err(err) => {
                warn!(%err, "worker pool unavailable, running sequentially");
                None
            }
        },
    })
    .as_ref()
}

fn build_pool(threads: usize) -> Result<ThreadPool> {
    Ok(ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("sprig-{i}"))
        .build()?)
}
