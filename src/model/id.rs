//! Element id prefixes and id helpers.
//!
//! Every element of a novelibre project is addressed by a string id made of
//! a two-letter kind prefix and a decimal number ("ch3", "sc12", "cr1").
//! yw7 files store bare numbers; the prefix is added while reading.

/// Chapter ids ("ch1").
pub const CHAPTER_PREFIX: &str = "ch";
/// Plot line (story arc) ids ("ac1").
pub const PLOT_LINE_PREFIX: &str = "ac";
/// Section ids ("sc1"); yw7 calls these scenes.
pub const SECTION_PREFIX: &str = "sc";
/// Plot point ids ("ap1").
pub const PLOT_POINT_PREFIX: &str = "ap";
/// Character ids ("cr1").
pub const CHARACTER_PREFIX: &str = "cr";
/// Location ids ("lc1").
pub const LOCATION_PREFIX: &str = "lc";
/// Item ids ("it1").
pub const ITEM_PREFIX: &str = "it";
/// Project note ids ("pn1").
pub const PRJ_NOTE_PREFIX: &str = "pn";

/// Returns the first unused id with the given prefix.
///
/// Counts up from 1 until an id is found that is not in `existing`.
pub fn create_id(existing: &[String], prefix: &str) -> String {
    let mut i = 1u32;
    loop {
        let candidate = format!("{prefix}{i}");
        if !existing.iter().any(|id| id == &candidate) {
            return candidate;
        }
        i += 1;
    }
}

/// Checks that an id carries the expected kind prefix.
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.starts_with(prefix)
}

/// Strips the kind prefix, yielding the bare yw7 number part.
pub fn strip_prefix(id: &str) -> &str {
    &id[2.min(id.len())..]
}
