use std::fmt;

use globset::{GlobBuilder, GlobMatcher};
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Errors from compiling a name pattern
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// A name pattern compiled once per search and consulted for every
/// candidate entry.
///
/// Dispatch order follows the criteria flags: regex wins over glob when
/// both are requested, and an empty pattern matches everything.
pub enum NameMatcher {
    Any,
    Substring { needle: String, case_sensitive: bool },
    Glob(GlobMatcher),
    Regex(Regex),
}

impl NameMatcher {
    pub fn compile(
        pattern: &str,
        case_sensitive: bool,
        use_glob: bool,
        use_regex: bool,
    ) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Ok(NameMatcher::Any);
        }

        if use_regex {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()?;
            return Ok(NameMatcher::Regex(regex));
        }

        if use_glob {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()?;
            return Ok(NameMatcher::Glob(glob.compile_matcher()));
        }

        let needle = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        Ok(NameMatcher::Substring {
            needle,
            case_sensitive,
        })
    }

    /// Test an entry basename against the compiled pattern
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Any => true,
            NameMatcher::Substring {
                needle,
                case_sensitive: true,
            } => name.contains(needle.as_str()),
            NameMatcher::Substring {
                needle,
                case_sensitive: false,
            } => name.to_lowercase().contains(needle.as_str()),
            NameMatcher::Glob(matcher) => matcher.is_match(name),
            NameMatcher::Regex(regex) => regex.is_match(name),
        }
    }
}

impl fmt::Debug for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameMatcher::Any => f.write_str("NameMatcher::Any"),
            NameMatcher::Substring { needle, .. } => f
                .debug_struct("NameMatcher::Substring")
                .field("needle", needle)
                .finish(),
            NameMatcher::Glob(_) => f.write_str("NameMatcher::Glob"),
            NameMatcher::Regex(regex) => f
                .debug_struct("NameMatcher::Regex")
                .field("pattern", &regex.as_str())
                .finish(),
        }
    }
}
