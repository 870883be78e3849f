use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use fsq::core::criteria::SearchCriteria;
use fsq::core::engine::{SearchOutcome, search, search_advanced};

// Helper to create a test file of a given size
fn create_file(path: &Path, size: usize) {
    let mut file = File::create(path).expect("Failed to create test file");
    if size > 0 {
        let data = vec![b'a'; size];
        file.write_all(&data).expect("Failed to write test data");
    }
}

fn criteria_for(root: &Path) -> SearchCriteria {
    SearchCriteria {
        root_path: root.to_path_buf(),
        ..Default::default()
    }
}

fn path_set(outcome: &SearchOutcome) -> HashSet<PathBuf> {
    outcome
        .results
        .iter()
        .map(|result| result.path.clone())
        .collect()
}

#[test]
fn empty_pattern_lists_flat_directory() {
    let temp = TempDir::new().unwrap();
    create_file(&temp.path().join("a.txt"), 10);
    create_file(&temp.path().join("b.log"), 10);
    create_file(&temp.path().join("c.md"), 10);

    let criteria = SearchCriteria {
        max_depth: 0,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");

    let expected: HashSet<PathBuf> = ["a.txt", "b.log", "c.md"]
        .iter()
        .map(|name| temp.path().join(name))
        .collect();
    assert_eq!(path_set(&outcome), expected);
    assert_eq!(outcome.results.len(), 3);
    assert!(!outcome.timed_out);
}

#[test]
fn glob_descends_one_level() {
    let temp = TempDir::new().unwrap();
    create_file(&temp.path().join("a.png"), 1);
    fs::create_dir(temp.path().join("sub")).unwrap();
    create_file(&temp.path().join("sub/b.png"), 1);
    create_file(&temp.path().join("sub/c.jpg"), 1);

    let criteria = SearchCriteria {
        pattern: "*.png".to_string(),
        use_glob: true,
        max_depth: 1,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");

    let expected: HashSet<PathBuf> = [temp.path().join("a.png"), temp.path().join("sub/b.png")]
        .into_iter()
        .collect();
    assert_eq!(path_set(&outcome), expected);
}

#[test]
fn depth_zero_means_root_only() {
    let temp = TempDir::new().unwrap();
    create_file(&temp.path().join("a.png"), 1);
    fs::create_dir(temp.path().join("sub")).unwrap();
    create_file(&temp.path().join("sub/b.png"), 1);

    let criteria = SearchCriteria {
        pattern: "*.png".to_string(),
        use_glob: true,
        max_depth: 0,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");

    assert_eq!(
        path_set(&outcome),
        HashSet::from([temp.path().join("a.png")])
    );
}

#[test]
fn max_results_clamps_the_list() {
    let temp = TempDir::new().unwrap();
    for i in 0..1000 {
        create_file(&temp.path().join(format!("f{i:04}")), 0);
    }

    let criteria = SearchCriteria {
        max_results: 10,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");

    assert_eq!(outcome.results.len(), 10);
    for result in &outcome.results {
        assert!(result.path.starts_with(temp.path()));
    }
    // a capped search still counts as completed, not timed out
    assert!(!outcome.timed_out);
}

#[test]
fn size_and_extension_filters_combine() {
    let temp = TempDir::new().unwrap();
    create_file(&temp.path().join("big.pdf"), 2 * 1024 * 1024);
    create_file(&temp.path().join("small.pdf"), 100);
    create_file(&temp.path().join("big.txt"), 2 * 1024 * 1024);

    let criteria = SearchCriteria {
        extensions: HashSet::from(["pdf".to_string()]),
        min_size: Some(1024 * 1024),
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");

    assert_eq!(
        path_set(&outcome),
        HashSet::from([temp.path().join("big.pdf")])
    );
}

#[test]
fn callback_returning_false_cancels() {
    let temp = TempDir::new().unwrap();
    for i in 0..100 {
        create_file(&temp.path().join(format!("file{i:03}.txt")), 0);
    }

    let calls = std::sync::Arc::new(AtomicUsize::new(0));
    let callback_calls = std::sync::Arc::clone(&calls);
    let outcome = search_advanced(
        criteria_for(temp.path()),
        Some(Box::new(move |_result: &fsq::SearchResult| {
            callback_calls.fetch_add(1, Ordering::SeqCst) + 1 < 5
        })),
        None,
    )
    .expect("search failed");

    // the result observed by the stopping callback is still in the list
    assert!(outcome.results.len() >= 5);
    assert!(outcome.results.len() <= 100);
    assert!(!outcome.timed_out);
}

#[test]
fn skip_policy_prunes_common_directories() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("node_modules")).unwrap();
    create_file(&temp.path().join("node_modules/x.js"), 1);
    fs::create_dir(temp.path().join("src")).unwrap();
    create_file(&temp.path().join("src/y.js"), 1);

    let criteria = SearchCriteria {
        pattern: "*.js".to_string(),
        use_glob: true,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");
    assert_eq!(
        path_set(&outcome),
        HashSet::from([temp.path().join("src/y.js")])
    );

    // --no-skip makes the pruned subtree visible again
    let criteria = SearchCriteria {
        pattern: "*.js".to_string(),
        use_glob: true,
        skip_common_dirs: false,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");
    assert_eq!(outcome.results.len(), 2);
}

#[test]
fn hidden_entries_are_skipped_by_default() {
    let temp = TempDir::new().unwrap();
    create_file(&temp.path().join("visible.txt"), 1);
    create_file(&temp.path().join(".secret.txt"), 1);
    fs::create_dir(temp.path().join(".hidden")).unwrap();
    create_file(&temp.path().join(".hidden/inner.txt"), 1);

    let outcome = search(criteria_for(temp.path())).expect("search failed");
    assert_eq!(
        path_set(&outcome),
        HashSet::from([temp.path().join("visible.txt")])
    );

    let criteria = SearchCriteria {
        include_hidden: true,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");
    assert_eq!(outcome.results.len(), 3);
}

#[test]
fn directories_match_by_name() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("alpha")).unwrap();
    fs::create_dir(temp.path().join("beta")).unwrap();
    create_file(&temp.path().join("alpha.txt"), 1);

    let criteria = SearchCriteria {
        pattern: "alpha".to_string(),
        include_files: false,
        include_directories: true,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");

    let paths = path_set(&outcome);
    assert_eq!(paths, HashSet::from([temp.path().join("alpha")]));
    assert!(outcome.results[0].is_directory);
}

#[test]
fn identical_searches_return_identical_sets() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a/b/c")).unwrap();
    for (dir, count) in [("", 5), ("a", 4), ("a/b", 3), ("a/b/c", 2)] {
        for i in 0..count {
            create_file(&temp.path().join(dir).join(format!("file{i}.txt")), i);
        }
    }

    let first = search(criteria_for(temp.path())).expect("first search failed");
    let second = search(criteria_for(temp.path())).expect("second search failed");

    assert_eq!(path_set(&first), path_set(&second));
    assert_eq!(first.results.len(), 14);

    // no two results may share a path
    assert_eq!(first.results.len(), path_set(&first).len());
}

#[cfg(unix)]
#[test]
fn symlinked_directories_follow_the_flag() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("real")).unwrap();
    create_file(&temp.path().join("real/inside.txt"), 1);
    std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

    let outcome = search(criteria_for(temp.path())).expect("search failed");
    assert_eq!(
        path_set(&outcome),
        HashSet::from([temp.path().join("real/inside.txt")])
    );

    let criteria = SearchCriteria {
        follow_symlinks: true,
        ..criteria_for(temp.path())
    };
    let outcome = search(criteria).expect("search failed");
    assert_eq!(
        path_set(&outcome),
        HashSet::from([
            temp.path().join("real/inside.txt"),
            temp.path().join("link/inside.txt"),
        ])
    );
}

#[test]
fn invalid_criteria_fail_before_any_work() {
    let criteria = SearchCriteria {
        include_files: false,
        include_directories: false,
        ..Default::default()
    };
    assert!(search(criteria).is_err());
}
