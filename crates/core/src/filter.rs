//! Object filter
//!
//! Selects the entries of a listing page that sit in the archival class.

use crate::types::{ARCHIVAL_STORAGE_CLASS, ObjectEntry};

/// Whether an entry is in the archival class under restore
pub fn is_archival(entry: &ObjectEntry) -> bool {
    entry.storage_class.as_ref() == Some(&ARCHIVAL_STORAGE_CLASS)
}
