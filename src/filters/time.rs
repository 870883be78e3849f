use std::time::SystemTime;

use crate::core::criteria::SearchCriteria;

/// Inclusive modification-time window
pub(crate) fn matches(mtime: SystemTime, criteria: &SearchCriteria) -> bool {
    if let Some(after) = criteria.after_time {
        if mtime < after {
            return false;
        }
    }

    if let Some(before) = criteria.before_time {
        if mtime > before {
            return false;
        }
    }

    true
}
