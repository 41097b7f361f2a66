//! Integration tests for batch fetching and the page cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pageflow::fetch::{read_cache_file, BatchFetcher, JobState, PageCache};
use pageflow::FetchError;
use serde_json::{json, Value};
use tempfile::TempDir;

fn page_result(index: u32) -> Value {
    json!({ "paragraphs": [], "page": index })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_page_reported_alongside_others() {
    let fetcher = BatchFetcher::new(2).unwrap();

    let outcome = fetcher
        .fetch_range(0..5, |index| async move {
            if index == 2 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Err(FetchError::Service("HTTP 500".to_string()))
            } else {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(page_result(index))
            }
        })
        .await;

    assert_eq!(outcome.page_indices(), vec![0, 1, 3, 4]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].page_index, 2);
    assert_eq!(
        outcome.failures[0].error,
        FetchError::Service("HTTP 500".to_string())
    );
    assert!(!outcome.is_complete());
    assert!(outcome.skipped().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_never_exceeds_limit() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let fetcher = BatchFetcher::new(3).unwrap();

    let outcome = {
        let in_flight = Arc::clone(&in_flight);
        let peak = Arc::clone(&peak);
        fetcher
            .fetch_range(0..20, move |index| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, FetchError>(page_result(index))
                }
            })
            .await
    };

    assert!(outcome.is_complete());
    assert_eq!(outcome.pages.len(), 20);
    assert_eq!(peak.load(Ordering::SeqCst), 3);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cache_hits_skip_fetch_and_preserve_other_pages() {
    let dir = TempDir::new().unwrap();
    let cache = PageCache::open(dir.path(), "report");

    let outside = json!({ "paragraphs": [], "note": "kept" });
    cache.merge(9, outside.clone()).await.unwrap();
    cache.merge(1, page_result(1)).await.unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = BatchFetcher::new(2).unwrap().with_cache(cache.clone());
    let outcome = {
        let calls = Arc::clone(&calls);
        fetcher
            .fetch_range(0..3, move |index| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, FetchError>(page_result(index))
                }
            })
            .await
    };

    assert!(outcome.is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let cached: Vec<u32> = outcome
        .sorted_pages()
        .iter()
        .filter(|p| p.from_cache)
        .map(|p| p.page_index)
        .collect();
    assert_eq!(cached, vec![1]);

    let stored = read_cache_file(cache.path()).unwrap();
    assert_eq!(stored.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 9]);
    assert_eq!(stored[&9].result, outside);
    assert_eq!(stored[&2].result, page_result(2));
}

#[tokio::test]
async fn test_rerun_resumes_after_failure() {
    let dir = TempDir::new().unwrap();
    let cache = PageCache::open(dir.path(), "resume");
    let fetcher = BatchFetcher::new(1).unwrap().with_cache(cache.clone());

    let first = fetcher
        .fetch_range(0..4, |index| async move {
            if index == 1 {
                Err(FetchError::Timeout)
            } else {
                Ok(page_result(index))
            }
        })
        .await;
    assert_eq!(first.page_indices(), vec![0]);
    assert_eq!(first.skipped(), vec![2, 3]);
    assert_eq!(cache.cached_indices().await, vec![0]);

    let calls = Arc::new(AtomicUsize::new(0));
    let second = {
        let calls = Arc::clone(&calls);
        fetcher
            .fetch_range(0..4, move |index| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, FetchError>(page_result(index))
                }
            })
            .await
    };

    assert!(second.is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.cached_indices().await, vec![0, 1, 2, 3]);
    assert!(second.jobs.iter().all(|job| job.state == JobState::Done));
    let from_cache: Vec<bool> = second.jobs.iter().map(|job| job.from_cache).collect();
    assert_eq!(from_cache, vec![true, false, false, false]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_cache_across_concurrent_batches() {
    let dir = TempDir::new().unwrap();
    let cache = PageCache::open(dir.path(), "shared");
    let left = BatchFetcher::new(2).unwrap().with_cache(cache.clone());
    let right = BatchFetcher::new(2).unwrap().with_cache(cache.clone());

    let fetch = |index: u32| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<_, FetchError>(page_result(index))
    };
    let (a, b) = tokio::join!(left.fetch_range(0..10, fetch), right.fetch_range(10..20, fetch));

    assert!(a.is_complete() && b.is_complete());
    let stored = read_cache_file(cache.path()).unwrap();
    assert_eq!(stored.len(), 20);
}

#[tokio::test]
async fn test_cache_read_once_per_batch() {
    let dir = TempDir::new().unwrap();
    let cache = PageCache::open(dir.path(), "snapshot");
    cache.merge(1, page_result(1)).await.unwrap();

    // Page 0 runs first and removes the file; page 1 is still served from
    // what was loaded when the batch started
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = BatchFetcher::new(1).unwrap().with_cache(cache.clone());
    let outcome = {
        let calls = Arc::clone(&calls);
        let path = cache.path().to_path_buf();
        fetcher
            .fetch_range(0..3, move |index| {
                let calls = Arc::clone(&calls);
                let path = path.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if index == 0 {
                        tokio::fs::remove_file(&path).await.unwrap();
                    }
                    Ok::<_, FetchError>(page_result(index))
                }
            })
            .await
    };

    assert!(outcome.is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(outcome.jobs[1].from_cache);
    assert_eq!(outcome.sorted_pages()[1].result, page_result(1));
}

#[tokio::test]
async fn test_cache_write_failure_still_returns_pages() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let cache = PageCache::open(&blocker, "doc");
    let fetcher = BatchFetcher::new(2).unwrap().with_cache(cache.clone());

    let outcome = fetcher
        .fetch_range(0..3, |index| async move { Ok::<_, FetchError>(page_result(index)) })
        .await;

    assert!(outcome.is_complete());
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.page_indices(), vec![0, 1, 2]);
    assert!(outcome.pages.iter().all(|p| !p.from_cache));
    assert!(outcome.jobs.iter().all(|job| job.state == JobState::Done));
    assert!(!cache.path().exists());
}
