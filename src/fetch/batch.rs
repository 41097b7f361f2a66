//! Batch fetching of page layout results.

use serde::Serialize;
use std::future::Future;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::task::JoinSet;

use super::cache::{CacheMap, PageCache};
use super::gate::ConcurrencyGate;
use crate::error::{FetchError, Result};

/// Lifecycle of one page fetch within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Waiting for a slot
    Pending,
    /// Holding a slot
    Running,
    /// Result available (fetched or cached)
    Done,
    /// The fetch failed
    Failed,
    /// Not fetched because an earlier page failed
    Skipped,
}

/// Progress record for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchJob {
    /// Page index
    pub page_index: u32,

    /// Current state
    pub state: JobState,

    /// Whether the result was served from the cache
    pub from_cache: bool,
}

impl FetchJob {
    fn pending(page_index: u32) -> Self {
        Self {
            page_index,
            state: JobState::Pending,
            from_cache: false,
        }
    }
}

/// A page result returned by a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Page index
    pub page_index: u32,

    /// Raw layout result
    pub result: serde_json::Value,

    /// Whether the result came from the cache
    pub from_cache: bool,
}

/// A page whose fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFailure {
    /// Page index
    pub page_index: u32,

    /// Why the fetch failed
    pub error: FetchError,
}

/// Result of [`BatchFetcher::fetch_range`].
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Successful pages in completion order
    pub pages: Vec<FetchedPage>,

    /// Pages whose fetch failed
    pub failures: Vec<PageFailure>,

    /// Final state of every page in the range, by index
    pub jobs: Vec<FetchJob>,
}

impl BatchOutcome {
    /// Check if every page in the range produced a result.
    pub fn is_complete(&self) -> bool {
        self.jobs.iter().all(|j| j.state == JobState::Done)
    }

    /// Indices of pages that were never fetched.
    pub fn skipped(&self) -> Vec<u32> {
        self.jobs
            .iter()
            .filter(|j| j.state == JobState::Skipped)
            .map(|j| j.page_index)
            .collect()
    }

    /// Successful pages sorted by index.
    pub fn sorted_pages(&self) -> Vec<&FetchedPage> {
        let mut pages: Vec<&FetchedPage> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.page_index);
        pages
    }

    /// Indices of successful pages, ascending.
    pub fn page_indices(&self) -> Vec<u32> {
        self.sorted_pages().iter().map(|p| p.page_index).collect()
    }
}

enum TaskResult {
    Fetched(FetchedPage),
    Failed(FetchError),
    Skipped,
}

/// Progress table for one batch.
#[derive(Debug, Clone)]
struct JobTable {
    jobs: Arc<Mutex<Vec<FetchJob>>>,
}

impl JobTable {
    fn new(range: &Range<u32>) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(range.clone().map(FetchJob::pending).collect())),
        }
    }

    fn update(&self, page_index: u32, state: JobState, from_cache: bool) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(job) = jobs.iter_mut().find(|j| j.page_index == page_index) {
            job.state = state;
            job.from_cache = from_cache;
        }
    }

    fn snapshot(&self) -> Vec<FetchJob> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Fetches ranges of pages with bounded concurrency and an optional cache.
///
/// Once any fetch in a batch fails, pages that have not started yet skip
/// the fetch (cache hits are still served). Fetches already in flight run
/// to completion. A fetch function that panics counts as a failed page.
///
/// Batches on the same fetcher may run concurrently; they share the
/// concurrency limit but each has its own job table.
///
/// # Example
///
/// ```no_run
/// use pageflow::fetch::{BatchFetcher, PageCache};
/// use pageflow::FetchError;
///
/// # async fn run() -> pageflow::Result<()> {
/// let fetcher = BatchFetcher::new(4)?.with_cache(PageCache::for_document("report"));
/// let outcome = fetcher
///     .fetch_range(0..10, |page| async move {
///         // call the layout service here
///         Ok::<_, FetchError>(serde_json::json!({ "page": page }))
///     })
///     .await;
/// println!("{} pages, {} failures", outcome.pages.len(), outcome.failures.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BatchFetcher {
    gate: ConcurrencyGate,
    cache: Option<PageCache>,
}

impl BatchFetcher {
    /// Create a fetcher running at most `concurrency_limit` fetches at once.
    pub fn new(concurrency_limit: usize) -> Result<Self> {
        Ok(Self {
            gate: ConcurrencyGate::new(concurrency_limit)?,
            cache: None,
        })
    }

    /// Serve and store results through a page cache.
    pub fn with_cache(mut self, cache: PageCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The page cache, if any.
    pub fn cache(&self) -> Option<&PageCache> {
        self.cache.as_ref()
    }

    /// Concurrency limit.
    pub fn concurrency_limit(&self) -> usize {
        self.gate.capacity()
    }

    /// Fetch every page in `range`.
    ///
    /// The cache is read once when the batch starts; `fetch_one` is called
    /// only for pages missing from it. Results are returned in completion
    /// order; see [`BatchOutcome::sorted_pages`].
    pub async fn fetch_range<F, Fut>(&self, range: Range<u32>, fetch_one: F) -> BatchOutcome
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<serde_json::Value, FetchError>> + Send + 'static,
    {
        let started = Instant::now();
        let jobs = JobTable::new(&range);
        let cached = Arc::new(match &self.cache {
            Some(cache) => cache.load().await,
            None => CacheMap::new(),
        });

        let fetch_one = Arc::new(fetch_one);
        let failed = Arc::new(AtomicBool::new(false));
        let mut join_set = JoinSet::new();

        for page_index in range.clone() {
            let gate = self.gate.clone();
            let jobs = jobs.clone();
            let failed = Arc::clone(&failed);
            let job = Job {
                page_index,
                cache: self.cache.clone(),
                cached: Arc::clone(&cached),
                failed: Arc::clone(&failed),
            };
            let fetch_one = Arc::clone(&fetch_one);

            join_set.spawn(async move {
                let _permit = match gate.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        log::warn!("Page {}: {}", page_index, e);
                        return (page_index, TaskResult::Skipped);
                    }
                };
                jobs.update(page_index, JobState::Running, false);

                // A panicking fetch function only takes down the inner task.
                // The flag is set before the slot is released.
                let result = match tokio::spawn(async move { job.run(&*fetch_one).await }).await {
                    Ok(result) => result,
                    Err(e) => {
                        failed.store(true, Ordering::SeqCst);
                        log::warn!("Page {} fetch task ended abnormally: {}", page_index, e);
                        TaskResult::Failed(FetchError::Panicked(e.to_string()))
                    }
                };
                (page_index, result)
            });
        }

        let mut outcome = BatchOutcome::default();
        while let Some(joined) = join_set.join_next().await {
            let (page_index, result) = match joined {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Fetch task ended abnormally: {}", e);
                    continue;
                }
            };

            match result {
                TaskResult::Fetched(page) => {
                    jobs.update(page_index, JobState::Done, page.from_cache);
                    outcome.pages.push(page);
                }
                TaskResult::Failed(error) => {
                    jobs.update(page_index, JobState::Failed, false);
                    outcome.failures.push(PageFailure { page_index, error });
                }
                TaskResult::Skipped => {
                    jobs.update(page_index, JobState::Skipped, false);
                }
            }
        }

        outcome.jobs = jobs.snapshot();
        log::info!(
            "Fetched pages {}..{}: {} ok, {} failed, {} skipped in {:.2?}",
            range.start,
            range.end,
            outcome.pages.len(),
            outcome.failures.len(),
            outcome.skipped().len(),
            started.elapsed()
        );
        outcome
    }
}

/// One page's work once it holds a slot.
struct Job {
    page_index: u32,
    cache: Option<PageCache>,
    cached: Arc<CacheMap>,
    failed: Arc<AtomicBool>,
}

impl Job {
    async fn run<F, Fut>(self, fetch_one: &F) -> TaskResult
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = std::result::Result<serde_json::Value, FetchError>>,
    {
        let page_index = self.page_index;

        if let Some(entry) = self.cached.get(&page_index) {
            log::debug!("Page {} served from cache", page_index);
            return TaskResult::Fetched(FetchedPage {
                page_index,
                result: entry.result.clone(),
                from_cache: true,
            });
        }

        if self.failed.load(Ordering::SeqCst) {
            log::debug!("Page {} skipped after an earlier failure", page_index);
            return TaskResult::Skipped;
        }

        match fetch_one(page_index).await {
            Ok(result) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.merge(page_index, result.clone()).await {
                        log::warn!("Page {} fetched but not cached: {}", page_index, e);
                    }
                }
                TaskResult::Fetched(FetchedPage {
                    page_index,
                    result,
                    from_cache: false,
                })
            }
            Err(error) => {
                self.failed.store(true, Ordering::SeqCst);
                log::warn!("Page {} failed: {}", page_index, error);
                TaskResult::Failed(error)
            }
        }
    }
}
