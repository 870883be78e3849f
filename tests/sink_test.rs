use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use fsq::core::context::{SearchContext, SearchResult};
use fsq::core::criteria::SearchCriteria;
use fsq::core::pattern::NameMatcher;

fn context(max_results: usize, callback: Option<fsq::ResultCallback>) -> SearchContext {
    let criteria = SearchCriteria {
        max_results,
        ..Default::default()
    };
    let matcher = NameMatcher::compile("", false, false, false).unwrap();
    SearchContext::new(criteria, matcher, callback, None)
}

fn result(name: &str) -> SearchResult {
    SearchResult {
        path: PathBuf::from(name),
        is_directory: false,
        size: 0,
        mtime: SystemTime::now(),
    }
}

#[test]
fn results_append_in_submission_order() {
    let ctx = Arc::new(context(0, None));
    assert!(ctx.submit(result("a")));
    assert!(ctx.submit(result("b")));
    assert!(ctx.submit(result("c")));

    let results = ctx.take_results();
    let paths: Vec<_> = results.iter().map(|r| r.path.clone()).collect();
    assert_eq!(
        paths,
        vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
    );
}

#[test]
fn stopping_callback_still_gets_its_result_appended() {
    let ctx = Arc::new(context(0, Some(Box::new(|_result: &SearchResult| false))));

    assert!(ctx.submit(result("seen")));
    assert!(ctx.stop_requested());

    // anything after the stop is dropped
    assert!(!ctx.submit(result("dropped")));

    let results = ctx.take_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, PathBuf::from("seen"));
}

#[test]
fn result_cap_sets_the_stop_flag() {
    let ctx = Arc::new(context(2, None));
    assert!(ctx.submit(result("a")));
    assert!(ctx.submit(result("b")));
    assert!(ctx.stop_requested());
    assert!(!ctx.submit(result("c")));

    assert_eq!(ctx.take_results().len(), 2);
}

#[test]
fn callback_sees_every_appended_result() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let ctx = Arc::new(context(
        0,
        Some(Box::new(move |_result: &SearchResult| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })),
    ));

    for i in 0..5 {
        ctx.submit(result(&format!("r{i}")));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(ctx.take_results().len(), 5);
}

#[test]
fn cancellation_is_sticky_and_idempotent() {
    let ctx = context(0, None);

    ctx.request_stop();
    ctx.request_stop();
    assert!(ctx.stop_requested());

    assert!(!ctx.submit(result("late")));
    assert!(ctx.stop_requested());
}
