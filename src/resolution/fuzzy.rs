//! Accent-insensitive artifact name matching.
//!
//! Backend file names drift from what callers ask for: accents get stripped,
//! prefixes or extensions get added. Names are compared after
//! [`normalize`], and the first listing entry in a loose affix relation
//! with the requested name wins. There is no ranking, so two entries sharing
//! an affix resolve to whichever the backend lists first.

use unicode_normalization::UnicodeNormalization;

/// NFKD-decompose, drop every non-ASCII code point, ASCII-lowercase.
///
/// Separators are kept: `_`, `-` and spaces are not interchangeable.
///
/// Idempotent: the output is plain lowercase ASCII, which NFKD leaves alone.
pub fn normalize(name: &str) -> String {
    name.nfkd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether a normalized listing entry matches a normalized requested name.
///
/// Matches on equality, or when either name ends with the other, or when
/// the entry extends the requested name (e.g. an added extension).
/// Empty names never match.
pub fn is_match(entry: &str, requested: &str) -> bool {
    if entry.is_empty() || requested.is_empty() {
        return false;
    }
    entry == requested
        || entry.ends_with(requested)
        || requested.ends_with(entry)
        || entry.starts_with(requested)
}

/// First entry of `listing` whose normalized name matches `requested`.
pub fn best_match<'a, I>(requested: &str, listing: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted = normalize(requested);
    listing
        .into_iter()
        .find(|candidate| is_match(&normalize(candidate), &wanted))
}
