//! Resettable lazy values
//!
//! A lazy value is a small state machine:
//!
//! ```text
//!              get() / initializer Ok
//!   ┌───────────────┐ ─────────────────▶ ┌──────────────────────────┐
//!   │ Uninitialized │                    │ Initialized(value, time) │
//!   └───────────────┘ ◀───────────────── └──────────────────────────┘
//!                      reset() / TTL expired
//! ```
//!
//! [`LazyHandleCache`] guards initialization with a mutex so that at most one
//! initializer runs per generation. Reads of an already initialized value
//! only take the shared side of the state lock and never touch the init mutex.

use parking_lot::{Mutex, RwLock};
use rotalog_core::{Cancelled, CancellationToken};
use std::fmt;
use std::time::{Duration, Instant};

type Initializer<T, E> = Box<dyn Fn() -> Result<T, E> + Send + Sync>;
type LocalInitializer<T, E> = Box<dyn Fn() -> Result<T, E>>;

enum LazyState<T> {
    Uninitialized,
    Initialized { value: T, at: Instant },
}

impl<T: Clone> LazyState<T> {
    /// Value if initialized and not older than `ttl`
    fn live(&self, ttl: Option<Duration>) -> Option<T> {
        match self {
            LazyState::Initialized { value, at } if !expired(*at, ttl) => Some(value.clone()),
            _ => None,
        }
    }

    fn initialized_at(&self) -> Option<Instant> {
        match self {
            LazyState::Initialized { at, .. } => Some(*at),
            LazyState::Uninitialized => None,
        }
    }
}

fn expired(at: Instant, ttl: Option<Duration>) -> bool {
    match ttl {
        Some(ttl) => at.elapsed() > ttl,
        None => false,
    }
}

/// Thread-safe lazily computed value with reset and optional expiry.
///
/// The initializer runs on the first [`get`](Self::get), after every
/// [`reset`](Self::reset), and after the TTL (if any) has elapsed since the
/// last successful initialization. Concurrent callers that miss block on the
/// init mutex and then observe the value produced by the winner.
///
/// A failed initializer leaves the cache uninitialized and its error is
/// returned to the caller that ran it.
pub struct LazyHandleCache<T, E = std::io::Error> {
    init: Initializer<T, E>,
    ttl: Option<Duration>,
    state: RwLock<LazyState<T>>,
    init_lock: Mutex<()>,
}

impl<T: Clone, E> LazyHandleCache<T, E> {
    /// Create a cache that never expires
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::build(Box::new(init), None)
    }

    /// Create a cache whose value expires `ttl` after initialization
    pub fn with_ttl<F>(init: F, ttl: Duration) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::build(Box::new(init), Some(ttl))
    }

    fn build(init: Initializer<T, E>, ttl: Option<Duration>) -> Self {
        LazyHandleCache {
            init,
            ttl,
            state: RwLock::new(LazyState::Uninitialized),
            init_lock: Mutex::new(()),
        }
    }

    /// Get the cached value, computing it if needed.
    pub fn get(&self) -> Result<T, E> {
        if let Some(value) = self.state.read().live(self.ttl) {
            return Ok(value);
        }

        let _guard = self.init_lock.lock();
        self.initialize_locked()
    }

    /// Like [`get`](Self::get), but gives up waiting for a concurrent
    /// initializer once `token` is cancelled.
    ///
    /// The token is checked every `poll` while waiting. An initializer that
    /// has already started is not interrupted.
    pub fn get_cancellable(&self, token: &CancellationToken, poll: Duration) -> Result<T, E>
    where
        E: From<Cancelled>,
    {
        if let Some(value) = self.state.read().live(self.ttl) {
            return Ok(value);
        }

        let _guard = loop {
            if let Some(guard) = self.init_lock.try_lock_for(poll) {
                break guard;
            }
            token.check()?;
        };
        self.initialize_locked()
    }

    /// Recheck under the init mutex, then run the initializer on a miss.
    fn initialize_locked(&self) -> Result<T, E> {
        if let Some(value) = self.state.read().live(self.ttl) {
            return Ok(value);
        }

        let value = (self.init)()?;
        *self.state.write() = LazyState::Initialized {
            value: value.clone(),
            at: Instant::now(),
        };
        Ok(value)
    }

    /// Force the next `get` to run the initializer again.
    pub fn reset(&self) {
        *self.state.write() = LazyState::Uninitialized;
    }

    /// Whether a live (unexpired) value is cached. Never runs the initializer.
    pub fn is_initialized(&self) -> bool {
        self.state.read().live(self.ttl).is_some()
    }

    /// When the cached value was produced, if any (expired values included)
    pub fn initialized_at(&self) -> Option<Instant> {
        self.state.read().initialized_at()
    }

    /// Configured expiry
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

impl<T, E> fmt::Debug for LazyHandleCache<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let initialized = matches!(&*self.state.read(), LazyState::Initialized { .. });
        f.debug_struct("LazyHandleCache")
            .field("initialized", &initialized)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Single-threaded lazily computed value with reset and optional expiry.
///
/// Same contract as [`LazyHandleCache`] without any locking; mutation
/// requires `&mut self`.
pub struct UnsyncLazyCache<T, E = std::io::Error> {
    init: LocalInitializer<T, E>,
    ttl: Option<Duration>,
    state: LazyState<T>,
}

impl<T: Clone, E> UnsyncLazyCache<T, E> {
    /// Create a cache that never expires
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<T, E> + 'static,
    {
        UnsyncLazyCache {
            init: Box::new(init),
            ttl: None,
            state: LazyState::Uninitialized,
        }
    }

    /// Create a cache whose value expires `ttl` after initialization
    pub fn with_ttl<F>(init: F, ttl: Duration) -> Self
    where
        F: Fn() -> Result<T, E> + 'static,
    {
        UnsyncLazyCache {
            init: Box::new(init),
            ttl: Some(ttl),
            state: LazyState::Uninitialized,
        }
    }

    /// Get the cached value, computing it if needed.
    pub fn get(&mut self) -> Result<T, E> {
        if let Some(value) = self.state.live(self.ttl) {
            return Ok(value);
        }
        let value = (self.init)()?;
        self.state = LazyState::Initialized {
            value: value.clone(),
            at: Instant::now(),
        };
        Ok(value)
    }

    /// Force the next `get` to run the initializer again.
    pub fn reset(&mut self) {
        self.state = LazyState::Uninitialized;
    }

    /// Whether a live (unexpired) value is cached. Never runs the initializer.
    pub fn is_initialized(&self) -> bool {
        self.state.live(self.ttl).is_some()
    }
}

impl<T, E> fmt::Debug for UnsyncLazyCache<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let initialized = matches!(self.state, LazyState::Initialized { .. });
        f.debug_struct("UnsyncLazyCache")
            .field("initialized", &initialized)
            .field("ttl", &self.ttl)
            .finish()
    }
}
