//! Completion dictionary.
//!
//! The tables are sorted, so every prefix selects a contiguous range and
//! [`prefix_matches`] can hand the editor a static subslice without any
//! scratch storage.

/// Top-level commands, sorted.
pub static KEYWORDS: &[&str] = &["clear", "help", "led", "list", "name", "version"];

/// Subcommands of `led`, sorted.
pub static LED_SUBCMDS: &[&str] = &["off", "on"];

/// Subcommands of `version`, sorted.
pub static VERSION_SUBCMDS: &[&str] = &["demo", "lib"];

/// The contiguous range of `table` entries starting with `prefix`.
/// `table` must be sorted.
pub fn prefix_matches(
    table: &'static [&'static str],
    prefix: &[u8],
) -> &'static [&'static str] {
    let Some(lo) = table.iter().position(|w| w.as_bytes().starts_with(prefix)) else {
        return &[];
    };
    let hi = table[lo..]
        .iter()
        .position(|w| !w.as_bytes().starts_with(prefix))
        .map_or(table.len(), |p| lo + p);
    &table[lo..hi]
}

/// Candidate set for the editor's completion callback: complete the first
/// token against the command table, and the second against the matching
/// subcommand table.
pub fn candidates_for(args: &[&[u8]]) -> &'static [&'static str] {
    match args {
        [first] => prefix_matches(KEYWORDS, first),
        [b"version", second] => prefix_matches(VERSION_SUBCMDS, second),
        [b"led", second] => prefix_matches(LED_SUBCMDS, second),
        _ => &[],
    }
}

// ==================================================
// ==================== TESTS =======================
// ==================================================
