//! Environment-driven configuration.
//!
//! Values are read once, on first use, into a process-wide [`Config`].
//! Only the gauge, the worker pool and the debug harness consult it; the trie
//! algorithms themselves take everything they need as arguments.

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Concurrency ceiling variable. A positive integer, or `off`.
pub const CONCURRENCY_VAR: &str = "SPRIG_CONCURRENCY";

/// Post-operation consistency check toggle.
pub const VET_VAR: &str = "SPRIG_VET";

/// Operation recording toggle for [`Recorder`](crate::Recorder).
pub const REPLAY_VAR: &str = "SPRIG_REPLAY";

/// How much parallelism structural recursion may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Concurrency {
    /// Every operation runs sequentially.
    Off,
    /// At most this many worker threads.
    Ceiling(NonZeroUsize),
}

impl Concurrency {
    /// Returns the thread ceiling, `1` when parallelism is off.
    #[must_use]
    pub const fn ceiling(self) -> usize {
        match self {
            Self::Off => 1,
            Self::Ceiling(n) => n.get(),
        }
    }

    fn detect() -> Self {
        std::thread::available_parallelism().map_or(Self::Off, Self::from_threads)
    }

    const fn from_threads(n: NonZeroUsize) -> Self {
        if n.get() == 1 { Self::Off } else { Self::Ceiling(n) }
    }
}

/// Process-wide settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Concurrency ceiling for parallel fan-out.
    pub concurrency: Concurrency,
    /// Vet every tree produced by a [`Tree`](crate::Tree) operation.
    pub vet: bool,
    /// Record operations in [`Recorder::new`](crate::Recorder::new).
    pub replay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: Concurrency::detect(),
            vet: false,
            replay: false,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set to an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(CONCURRENCY_VAR) {
            config.concurrency = parse_concurrency(&raw)?;
        }
        if let Some(raw) = lookup(VET_VAR) {
            config.vet = parse_toggle(VET_VAR, &raw)?;
        }
        if let Some(raw) = lookup(REPLAY_VAR) {
            config.replay = parse_toggle(REPLAY_VAR, &raw)?;
        }
        Ok(config)
    }
}

/// Returns the process-wide configuration, loading it on first call.
///
/// A malformed environment falls back to [`Config::default`].
pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| match Config::from_env() {
        Ok(config) => {
            debug!(?config, "loaded configuration");
            config
        }
        Err(err) => {
            warn!(%err, "ignoring malformed configuration");
            Config::default()
        }
    })
}

fn parse_concurrency(raw: &str) -> Result<Concurrency> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("off") {
        return Ok(Concurrency::Off);
    }
    let threads: usize = value.parse().map_err(|_| {
        Error::Config(format!("{CONCURRENCY_VAR}: expected a count or `off`, got {raw:?}"))
    })?;
    Ok(NonZeroUsize::new(threads).map_or(Concurrency::Off, Concurrency::from_threads))
}

fn parse_toggle(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" | "" => Ok(false),
        _ => Err(Error::Config(format!("{name}: expected a boolean, got {raw:?}"))),
    }
}
