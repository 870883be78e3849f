use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::core::criteria::{
    self, CriteriaError, SearchCriteria, parse_extension_list, parse_size,
};
use crate::filters::FileTypeClass;
use crate::output::{DEFAULT_PREVIEW_LINES, MAX_PREVIEW_LINES};

/// Command line arguments for the fsq binary
#[derive(Parser, Debug)]
#[command(name = "fsq")]
#[command(version)]
#[command(about = "Fast parallel file and folder search")]
#[command(after_help = "Glob patterns support * (any chars), ? (single char), \
[abc] (char set) and {jpg,png} (alternatives).")]
pub struct Args {
    /// Search pattern (default: match all)
    pub pattern: Option<String>,

    /// Directory to search (default: current directory)
    pub path: Option<String>,

    /// Case-sensitive matching
    #[arg(short = 'c', long = "case")]
    pub case_sensitive: bool,

    /// Treat the pattern as a glob (* ? [] {})
    #[arg(short = 'g', long = "glob")]
    pub glob: bool,

    /// Treat the pattern as a regex
    #[arg(short = 'r', long = "regex")]
    pub regex: bool,

    /// Include hidden files and directories
    #[arg(short = 'H', long = "include-hidden")]
    pub include_hidden: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long = "follow-symlinks")]
    pub follow_symlinks: bool,

    /// Include folders in results
    #[arg(long = "folders", alias = "dirs")]
    pub folders: bool,

    /// Return only folders, no files
    #[arg(long = "folders-only", alias = "dirs-only")]
    pub folders_only: bool,

    /// Return only files (the default)
    #[arg(long = "files-only")]
    pub files_only: bool,

    /// Suppress progress output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Don't skip common directories (node_modules, .git, ...)
    #[arg(long = "no-skip")]
    pub no_skip: bool,

    /// Filter by file extensions (comma-separated)
    #[arg(short = 'e', long = "ext", value_name = "LIST")]
    pub extensions: Option<String>,

    /// Filter by file type
    #[arg(short = 't', long = "type", value_name = "TYPE", value_enum)]
    pub file_type: Option<FileTypeArg>,

    /// Minimum file size (supports K, M, G, T suffixes)
    #[arg(long = "min", value_name = "SIZE")]
    pub min_size: Option<String>,

    /// Maximum file size (supports K, M, G, T suffixes)
    #[arg(long = "max", value_name = "SIZE")]
    pub max_size: Option<String>,

    /// Exact file size, or +size (larger) / -size (smaller)
    #[arg(long = "size", value_name = "[+|-]SIZE", allow_hyphen_values = true)]
    pub size: Option<String>,

    /// Only files modified after this date (YYYY-MM-DD)
    #[arg(long = "after", value_name = "DATE")]
    pub after: Option<String>,

    /// Only files modified before this date (YYYY-MM-DD)
    #[arg(long = "before", value_name = "DATE")]
    pub before: Option<String>,

    /// Maximum recursion depth (0 = no recursion, default = unlimited)
    #[arg(short = 'd', long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// Maximum number of results (0 = unlimited)
    #[arg(long = "max-results", value_name = "N")]
    pub max_results: Option<usize>,

    /// Number of worker threads (0 = auto)
    #[arg(short = 'j', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Search timeout in milliseconds (0 = none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Show thread pool statistics after the search
    #[arg(long = "stats")]
    pub stats: bool,

    /// Show a preview of text files (default: 10 lines)
    #[arg(
        long = "preview",
        value_name = "LINES",
        num_args = 0..=1,
        default_missing_value = "10"
    )]
    pub preview: Option<usize>,

    /// Write output to a file
    #[arg(long = "out", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// When to colour output
    #[arg(long = "color", value_name = "WHEN", value_enum, default_value = "auto")]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// CLI-facing names for the file type classes
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FileTypeArg {
    Text,
    Image,
    Video,
    Audio,
    Archive,
}

impl From<FileTypeArg> for FileTypeClass {
    fn from(value: FileTypeArg) -> Self {
        match value {
            FileTypeArg::Text => FileTypeClass::Text,
            FileTypeArg::Image => FileTypeClass::Image,
            FileTypeArg::Video => FileTypeClass::Video,
            FileTypeArg::Audio => FileTypeClass::Audio,
            FileTypeArg::Archive => FileTypeClass::Archive,
        }
    }
}

impl Args {
    /// Translate parsed arguments into search criteria
    pub fn to_criteria(&self) -> Result<SearchCriteria, CriteriaError> {
        let (pattern, root) = self.positionals();

        let mut criteria = SearchCriteria {
            root_path: PathBuf::from(root),
            pattern,
            ..Default::default()
        };

        criteria.case_sensitive = self.case_sensitive;
        criteria.use_glob = self.glob;
        criteria.use_regex = self.regex;
        criteria.include_hidden = self.include_hidden;
        criteria.follow_symlinks = self.follow_symlinks;
        criteria.skip_common_dirs = !self.no_skip;

        if self.folders {
            criteria.include_directories = true;
        }
        if self.folders_only {
            criteria.include_directories = true;
            criteria.include_files = false;
        }
        if self.files_only {
            criteria.include_files = true;
            criteria.include_directories = false;
        }

        if let Some(list) = &self.extensions {
            criteria.extensions = parse_extension_list(list);
        }
        criteria.file_type = self.file_type.map(FileTypeClass::from);

        if let Some(min) = &self.min_size {
            criteria.min_size = Some(parse_size(min)?);
        }
        if let Some(max) = &self.max_size {
            criteria.max_size = Some(parse_size(max)?);
        }
        if let Some(size_arg) = &self.size {
            if let Some(rest) = size_arg.strip_prefix('+') {
                criteria.min_size = Some(parse_size(rest)?.saturating_add(1));
            } else if let Some(rest) = size_arg.strip_prefix('-') {
                criteria.max_size = Some(parse_size(rest)?.saturating_sub(1));
            } else {
                criteria.exact_size = Some(parse_size(size_arg)?);
            }
        }

        if let Some(after) = &self.after {
            criteria.after_time = Some(criteria::parse_after_date(after)?);
        }
        if let Some(before) = &self.before {
            criteria.before_time = Some(criteria::parse_before_date(before)?);
        }

        criteria.max_depth = self.max_depth.unwrap_or(usize::MAX);
        criteria.max_results = self.max_results.unwrap_or(0);
        criteria.max_threads = self.threads.unwrap_or(0);
        criteria.timeout = match self.timeout_ms {
            None | Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
        };

        Ok(criteria)
    }

    /// Preview line count, normalised into its allowed range
    pub fn preview_lines(&self) -> Option<usize> {
        self.preview.map(|lines| {
            if lines == 0 {
                DEFAULT_PREVIEW_LINES
            } else {
                lines.min(MAX_PREVIEW_LINES)
            }
        })
    }

    /// Resolve the positionals the way users expect: `fsq` lists the
    /// current directory, `fsq <arg>` decides whether the argument is a
    /// pattern or a path, `fsq <pattern> <path>` is explicit.
    fn positionals(&self) -> (String, String) {
        match (&self.pattern, &self.path) {
            (None, _) => (String::new(), ".".to_string()),
            (Some(first), None) => {
                if looks_like_path(first) {
                    (String::new(), first.clone())
                } else {
                    (first.clone(), ".".to_string())
                }
            }
            (Some(first), Some(second)) => (first.clone(), second.clone()),
        }
    }
}

fn looks_like_path(arg: &str) -> bool {
    if arg.starts_with('.') || arg.starts_with('/') || arg.starts_with('\\') {
        return true;
    }
    let bytes = arg.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' {
        return true;
    }
    Path::new(arg).is_dir()
}
