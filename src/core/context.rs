use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::core::criteria::SearchCriteria;
use crate::core::pattern::NameMatcher;

/// A matched file or directory
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub path: PathBuf,
    pub is_directory: bool,
    pub size: u64,
    pub mtime: SystemTime,
}

/// Streaming callback invoked for each result as it is appended, while the
/// sink lock is held; returning false requests cancellation. The callback
/// must not re-enter the sink.
pub type ResultCallback = Box<dyn Fn(&SearchResult) -> bool + Send + Sync>;

/// Progress callback invoked periodically while the coordinator waits, with
/// `(processed_files, queued_dirs, total_results)`; returning false requests
/// cancellation.
pub type ProgressCallback = Box<dyn Fn(usize, usize, usize) -> bool + Send + Sync>;

/// State shared by every worker for the duration of one search: the
/// read-only criteria, the result sink, the bookkeeping counters and the
/// sticky cancellation flag.
pub struct SearchContext {
    pub criteria: SearchCriteria,
    pub matcher: NameMatcher,

    results: Mutex<Vec<SearchResult>>,
    pub total_results: AtomicUsize,
    pub processed_files: AtomicUsize,
    pub queued_dirs: AtomicUsize,
    should_stop: Arc<AtomicBool>,

    result_callback: Option<ResultCallback>,
    pub(crate) progress_callback: Option<ProgressCallback>,
}

impl SearchContext {
    pub fn new(
        criteria: SearchCriteria,
        matcher: NameMatcher,
        result_callback: Option<ResultCallback>,
        progress_callback: Option<ProgressCallback>,
    ) -> Self {
        SearchContext {
            criteria,
            matcher,
            results: Mutex::new(Vec::new()),
            total_results: AtomicUsize::new(0),
            processed_files: AtomicUsize::new(0),
            queued_dirs: AtomicUsize::new(0),
            should_stop: Arc::new(AtomicBool::new(false)),
            result_callback,
            progress_callback,
        }
    }

    /// Sticky cancellation request; calling it more than once is harmless
    pub fn request_stop(&self) {
        self.should_stop.store(true, Ordering::Release);
    }

    pub fn stop_requested(&self) -> bool {
        self.should_stop.load(Ordering::Acquire)
    }

    /// The flag itself, for sharing with the worker pool
    pub(crate) fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.should_stop)
    }

    /// Append a result, driving the streaming callback and the result cap.
    ///
    /// Returns false when the result was dropped because the search is
    /// already stopping or the cap was reached. A callback that returns
    /// false still gets its result appended, so the in-memory list stays
    /// consistent with what the caller observed.
    pub fn submit(&self, result: SearchResult) -> bool {
        if self.stop_requested() {
            return false;
        }

        let cap = self.criteria.max_results;
        if cap > 0 && self.total_results.load(Ordering::Acquire) >= cap {
            self.request_stop();
            return false;
        }

        {
            let mut results = self
                .results
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // the counter only moves under this lock, so the cap is exact here
            if cap > 0 && self.total_results.load(Ordering::Acquire) >= cap {
                self.request_stop();
                return false;
            }
            if let Some(callback) = &self.result_callback {
                if !callback(&result) {
                    self.request_stop();
                }
            }
            results.push(result);
            self.total_results.fetch_add(1, Ordering::Release);
        }

        if cap > 0 && self.total_results.load(Ordering::Acquire) >= cap {
            self.request_stop();
        }

        true
    }

    /// Hand the accumulated results to the caller once the workers are done
    pub fn take_results(self: Arc<Self>) -> Vec<SearchResult> {
        match Arc::try_unwrap(self) {
            Ok(ctx) => ctx
                .results
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
            Err(shared) => {
                let mut results = shared
                    .results
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                std::mem::take(&mut *results)
            }
        }
    }
}
