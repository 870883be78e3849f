use crate::core::criteria::SearchCriteria;
use crate::core::pattern::NameMatcher;
use crate::core::walker::EntryMeta;

mod extension;
pub mod file_type;
mod size;
mod time;

pub use file_type::FileTypeClass;

/// Does a regular file satisfy every configured predicate?
///
/// Predicates run cheapest first so a miss exits early: size, mtime,
/// extension, file-type class, then the name pattern.
pub fn file_matches(entry: &EntryMeta, criteria: &SearchCriteria, matcher: &NameMatcher) -> bool {
    size::matches(entry.size, criteria)
        && time::matches(entry.mtime, criteria)
        && extension::matches(&entry.file_name, criteria)
        && file_type_matches(&entry.file_name, criteria)
        && matcher.matches(&entry.file_name)
}

/// Directories only answer to the mtime window and the name pattern;
/// size, extension and type filters do not apply
pub fn directory_matches(
    entry: &EntryMeta,
    criteria: &SearchCriteria,
    matcher: &NameMatcher,
) -> bool {
    time::matches(entry.mtime, criteria) && matcher.matches(&entry.file_name)
}

fn file_type_matches(file_name: &str, criteria: &SearchCriteria) -> bool {
    match criteria.file_type {
        Some(wanted) => file_type::matches(file_name, wanted),
        None => true,
    }
}

/// The suffix after the last dot of a basename, if any.
/// `archive.tar.gz` yields `gz`; a name without a dot yields nothing.
pub(crate) fn extension_of(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
        _ => None,
    }
}
