//! Query cache: staleness/eviction lifetimes plus in-flight deduplication.
//!
//! The cache is an explicit, constructible object with an injectable clock —
//! no module-level singleton — so tests can control time and isolate
//! instances. It performs no I/O itself; callers hand it the fetch future and
//! the retry policy to drive it with.

mod clock;
mod entry;
mod key;
mod store;

pub use clock::{Clock, SystemClock};
pub use key::{KeyPart, QueryKey};
pub use store::{CachePolicy, CacheSubscription, QueryCache};
