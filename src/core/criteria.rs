use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use thiserror::Error;

use crate::filters::FileTypeClass;

/// Errors produced while building or validating search criteria
#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("root path must not be empty")]
    EmptyRoot,

    #[error("at least one of files or directories must be included")]
    NothingIncluded,

    #[error("invalid size '{0}': expected a number with optional K/M/G/T suffix")]
    InvalidSize(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("minimum size {min} exceeds maximum size {max}")]
    SizeRange { min: u64, max: u64 },
}

/// Everything a search needs to know, fixed before the first worker starts.
///
/// Shared read-only between all workers for the duration of one search.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    /// Directory the search starts from
    pub root_path: PathBuf,

    /// Name pattern; empty matches everything
    pub pattern: String,

    pub case_sensitive: bool,
    /// Treat the pattern as a glob (`*`, `?`, `[abc]`, `{a,b}`)
    pub use_glob: bool,
    /// Treat the pattern as a regex; wins over `use_glob` when both are set
    pub use_regex: bool,

    pub include_files: bool,
    pub include_directories: bool,
    /// When false, entries whose name starts with `.` are skipped entirely
    pub include_hidden: bool,
    /// When false, symlinked directories are neither matched nor descended
    pub follow_symlinks: bool,
    /// Apply the builtin list of directories not worth searching
    pub skip_common_dirs: bool,

    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub exact_size: Option<u64>,

    /// Inclusive lower bound on modification time
    pub after_time: Option<SystemTime>,
    /// Inclusive upper bound on modification time
    pub before_time: Option<SystemTime>,

    /// Lowercase extensions without the leading dot; empty accepts any
    pub extensions: HashSet<String>,
    pub file_type: Option<FileTypeClass>,

    /// 0 searches the root directory only; `usize::MAX` is unlimited
    pub max_depth: usize,
    /// 0 is unlimited
    pub max_results: usize,
    /// 0 picks a thread count from the hardware
    pub max_threads: usize,
    /// `None` lets the search run until quiescence
    pub timeout: Option<Duration>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        SearchCriteria {
            root_path: PathBuf::from("."),
            pattern: String::new(),
            case_sensitive: false,
            use_glob: false,
            use_regex: false,
            include_files: true,
            include_directories: false,
            include_hidden: false,
            follow_symlinks: false,
            skip_common_dirs: true,
            min_size: None,
            max_size: None,
            exact_size: None,
            after_time: None,
            before_time: None,
            extensions: HashSet::new(),
            file_type: None,
            max_depth: usize::MAX,
            max_results: 0,
            max_threads: 0,
            timeout: None,
        }
    }
}

impl SearchCriteria {
    /// Check the criteria for contradictions before a search starts
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if self.root_path.as_os_str().is_empty() {
            return Err(CriteriaError::EmptyRoot);
        }

        if !self.include_files && !self.include_directories {
            return Err(CriteriaError::NothingIncluded);
        }

        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(CriteriaError::SizeRange { min, max });
            }
        }

        Ok(())
    }

    /// Number of workers to spawn: the configured count, or one per
    /// hardware thread with a floor of 4
    pub fn effective_threads(&self) -> usize {
        if self.max_threads > 0 {
            self.max_threads
        } else {
            num_cpus::get().max(4)
        }
    }
}

/// Parse a size argument such as `512`, `100K`, `2M`, `1G` or `1T`
/// (powers of 1024)
pub fn parse_size(text: &str) -> Result<u64, CriteriaError> {
    let invalid = || CriteriaError::InvalidSize(text.to_string());

    let trimmed = text.trim();
    let (digits, multiplier) = match trimmed.chars().last() {
        Some(suffix) if suffix.is_ascii_alphabetic() => {
            let multiplier = match suffix.to_ascii_uppercase() {
                'K' => 1u64 << 10,
                'M' => 1u64 << 20,
                'G' => 1u64 << 30,
                'T' => 1u64 << 40,
                _ => return Err(invalid()),
            };
            (&trimmed[..trimmed.len() - 1], multiplier)
        }
        Some(_) => (trimmed, 1),
        None => return Err(invalid()),
    };

    let value: u64 = digits.parse().map_err(|_| invalid())?;
    value.checked_mul(multiplier).ok_or_else(invalid)
}

/// Parse a `YYYY-MM-DD` date as the start of that day (00:00:00 UTC)
pub fn parse_after_date(text: &str) -> Result<SystemTime, CriteriaError> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| CriteriaError::InvalidDate(text.to_string()))?;
    let datetime = date.and_hms_opt(0, 0, 0).unwrap();
    Ok(timestamp_to_system_time(datetime.and_utc().timestamp()))
}

/// Parse a `YYYY-MM-DD` date as the end of that day (23:59:59 UTC)
pub fn parse_before_date(text: &str) -> Result<SystemTime, CriteriaError> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| CriteriaError::InvalidDate(text.to_string()))?;
    let datetime = date.and_hms_opt(23, 59, 59).unwrap();
    Ok(timestamp_to_system_time(datetime.and_utc().timestamp()))
}

/// Split a comma-separated extension list into the normalised set the
/// extension filter expects: trimmed, lowercased, leading dots removed
pub fn parse_extension_list(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn timestamp_to_system_time(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}
