//! Bounded-concurrency page fetching with an on-disk result cache.
//!
//! The layout service call is supplied by the caller as an async closure;
//! this module decides when to call it, serves cached pages, and records
//! per-page failures without aborting the batch.

mod batch;
mod cache;
mod gate;

pub use batch::{BatchFetcher, BatchOutcome, FetchJob, FetchedPage, JobState, PageFailure};
pub use cache::{
    cache_dir_from_env, default_cache_dir, read_cache_file, CacheEntry, CacheMap, PageCache,
    CACHE_DIR_ENV,
};
pub use gate::{ConcurrencyGate, GatePermit};
