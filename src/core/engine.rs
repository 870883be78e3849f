use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::core::context::{ProgressCallback, ResultCallback, SearchContext, SearchResult};
use crate::core::criteria::{CriteriaError, SearchCriteria};
use crate::core::pattern::{NameMatcher, PatternError};
use crate::core::pool::{PoolConfig, PoolError, PoolProgress, PoolStats, WorkerPool};
use crate::core::walker::{self, DirectoryJob};

/// How long workers get to drain after a timeout before tear-down
const DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Setup failures; once the search is running, I/O problems are skipped
/// over rather than surfaced
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search criteria: {0}")]
    Criteria(#[from] CriteriaError),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("worker pool: {0}")]
    Pool(#[from] PoolError),
}

/// What a finished search hands back
#[derive(Debug)]
pub struct SearchOutcome {
    /// Matches in completion order
    pub results: Vec<SearchResult>,
    /// Regular files examined, matching or not
    pub processed_files: usize,
    /// True when the wall-clock timeout expired or the progress callback
    /// cancelled; the results gathered up to that point are still valid
    pub timed_out: bool,
    /// Worker pool counters captured just before tear-down
    pub stats: PoolStats,
}

/// Run a search with streaming and progress callbacks.
///
/// Seeds the root directory as the first job, waits for quiescence or
/// timeout, and hands back everything the workers accumulated. On timeout
/// the stop flag is raised and workers get a bounded grace period to
/// drain before the pool is torn down.
pub fn search_advanced(
    criteria: SearchCriteria,
    result_callback: Option<ResultCallback>,
    progress_callback: Option<ProgressCallback>,
) -> Result<SearchOutcome, SearchError> {
    criteria.validate()?;
    let matcher = NameMatcher::compile(
        &criteria.pattern,
        criteria.case_sensitive,
        criteria.use_glob,
        criteria.use_regex,
    )?;

    let timeout = criteria.timeout;
    let threads = criteria.effective_threads();
    let root = criteria.root_path.clone();

    let ctx = Arc::new(SearchContext::new(
        criteria,
        matcher,
        result_callback,
        progress_callback,
    ));

    let pool_progress: PoolProgress = {
        let ctx = Arc::clone(&ctx);
        Box::new(move |completed, active| poll_progress(&ctx, completed, active))
    };

    let pool = WorkerPool::new(PoolConfig {
        threads,
        stop_flag: ctx.stop_flag(),
        progress: Some(pool_progress),
    })?;

    debug!("searching {} with {} threads", root.display(), threads);
    walker::enqueue(&pool.handle(), &ctx, DirectoryJob { path: root, depth: 0 });

    let completed = pool.wait_completion(timeout);
    if !completed {
        ctx.request_stop();
        pool.wait_completion(Some(DRAIN_GRACE));
    }

    let stats = pool.stats();
    pool.shutdown();

    let processed_files = ctx.processed_files.load(Ordering::Acquire);
    let results = ctx.take_results();
    debug!(
        "search finished: {} results, {} files processed",
        results.len(),
        processed_files
    );

    Ok(SearchOutcome {
        results,
        processed_files,
        timed_out: !completed,
        stats,
    })
}

/// Run a search with no callbacks
pub fn search(criteria: SearchCriteria) -> Result<SearchOutcome, SearchError> {
    search_advanced(criteria, None, None)
}

/// Forward pool progress polls to the user's callback with the context
/// counters it actually cares about
fn poll_progress(ctx: &SearchContext, _completed: usize, _active: usize) -> bool {
    match &ctx.progress_callback {
        Some(callback) => {
            let processed = ctx.processed_files.load(Ordering::Acquire);
            let queued = ctx.queued_dirs.load(Ordering::Acquire);
            let found = ctx.total_results.load(Ordering::Acquire);
            callback(processed, queued, found)
        }
        None => true,
    }
}
