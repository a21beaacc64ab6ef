//! Error types.

use thiserror::Error;

/// Result alias for fallible trie operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the crate boundary.
///
/// Internal trie algorithms never produce these on the hot path; they are
/// raised by precondition checks, resolver construction, configuration
/// parsing and the opt-in consistency check.
#[derive(Error, Debug)]
pub enum Error {
    /// A query that needs at least one element was made on an empty tree.
    #[error("empty collection: {0}")]
    Empty(&'static str),

    /// The element type offers no usable hash or equality strategy.
    #[error("unsupported key: {0}")]
    UnsupportedKey(&'static str),

    /// A structural invariant does not hold.
    ///
    /// `detail` carries the rendering of the offending subtree.
    #[error("invariant violated at depth {depth}: {detail}")]
    Invariant {
        /// Trie depth of the offending node.
        depth: usize,
        /// Description and structural rendering of the node.
        detail: String,
    },

    /// A configuration value could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// The worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
