use crate::core::criteria::SearchCriteria;

/// Case-insensitive membership of the basename's extension in the
/// configured set. A name without an extension only passes when the set
/// is empty.
pub(crate) fn matches(file_name: &str, criteria: &SearchCriteria) -> bool {
    if criteria.extensions.is_empty() {
        return true;
    }

    match super::extension_of(file_name) {
        Some(ext) => criteria.extensions.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}
