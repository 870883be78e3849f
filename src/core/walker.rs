use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::SystemTime;

use log::debug;

use crate::core::context::{SearchContext, SearchResult};
use crate::core::pool::PoolHandle;
use crate::core::skip;
use crate::filters;

/// One unit of traversal work: expand a single directory
#[derive(Debug, Clone)]
pub struct DirectoryJob {
    pub path: PathBuf,
    pub depth: usize,
}

/// Snapshot of one directory entry, alive for a single worker iteration
#[derive(Debug)]
pub struct EntryMeta {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    pub mtime: SystemTime,
    pub is_directory: bool,
    pub is_symlink: bool,
}

/// Queue a directory job, falling back to inline execution when the pool
/// refuses it so no counted job is ever silently dropped.
///
/// `queued_dirs` is incremented before the job becomes visible to any
/// worker and decremented exactly once when it finishes, on every exit
/// path.
pub fn enqueue(pool: &PoolHandle, ctx: &Arc<SearchContext>, job: DirectoryJob) {
    ctx.queued_dirs.fetch_add(1, Ordering::AcqRel);

    let task = {
        let pool = pool.clone();
        let ctx = Arc::clone(ctx);
        Box::new(move || run_job(&pool, &ctx, &job))
    };
    if let Err(task) = pool.submit(task) {
        task();
    }
}

fn run_job(pool: &PoolHandle, ctx: &Arc<SearchContext>, job: &DirectoryJob) {
    expand_directory(pool, ctx, job);
    ctx.queued_dirs.fetch_sub(1, Ordering::AcqRel);
}

fn expand_directory(pool: &PoolHandle, ctx: &Arc<SearchContext>, job: &DirectoryJob) {
    if ctx.stop_requested() {
        return;
    }

    if skip::is_system_path(&job.path) {
        return;
    }

    // an unreadable directory is not an error; skip it and move on
    let entries = match fs::read_dir(&job.path) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("cannot read {}: {err}", job.path.display());
            return;
        }
    };

    let criteria = &ctx.criteria;
    for entry in entries {
        if ctx.stop_requested() {
            break;
        }

        let Ok(entry) = entry else { continue };
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !criteria.include_hidden && file_name.starts_with('.') {
            continue;
        }

        let Some(meta) = resolve_entry(&entry, file_name) else {
            continue;
        };

        if meta.is_directory {
            if meta.is_symlink && !criteria.follow_symlinks {
                continue;
            }
            if skip::should_skip_directory(&meta.file_name, criteria.skip_common_dirs) {
                continue;
            }

            if criteria.include_directories
                && filters::directory_matches(&meta, criteria, &ctx.matcher)
            {
                ctx.submit(SearchResult {
                    path: meta.path.clone(),
                    is_directory: true,
                    size: 0,
                    mtime: meta.mtime,
                });
            }

            if job.depth < criteria.max_depth {
                enqueue(
                    pool,
                    ctx,
                    DirectoryJob {
                        path: meta.path,
                        depth: job.depth + 1,
                    },
                );
            }
        } else {
            if criteria.include_files && filters::file_matches(&meta, criteria, &ctx.matcher) {
                ctx.submit(SearchResult {
                    path: meta.path,
                    is_directory: false,
                    size: meta.size,
                    mtime: meta.mtime,
                });
            }
            ctx.processed_files.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Stat one directory entry. Symlinks are classified by their target so a
/// link to a directory behaves like a directory; broken links and entries
/// whose metadata cannot be read are skipped.
fn resolve_entry(entry: &fs::DirEntry, file_name: String) -> Option<EntryMeta> {
    let file_type = entry.file_type().ok()?;
    let path = entry.path();

    if file_type.is_symlink() {
        let target = fs::metadata(&path).ok()?;
        let mtime = target.modified().ok()?;
        Some(EntryMeta {
            file_name,
            path,
            size: target.len(),
            mtime,
            is_directory: target.is_dir(),
            is_symlink: true,
        })
    } else {
        let meta = entry.metadata().ok()?;
        let mtime = meta.modified().ok()?;
        Some(EntryMeta {
            file_name,
            path,
            size: meta.len(),
            mtime,
            is_directory: file_type.is_dir(),
            is_symlink: false,
        })
    }
}
