//! Match highlighting and snippet extraction for search results.
//!
//! # Invariants
//! - [`highlight`] only inserts markers; it never escapes `snippet`, so its
//!   output is pre-formatted markup that must not come from untrusted input.
//! - Terms are matched literally and case-insensitively.

use log::debug;
use regex::{Regex, RegexBuilder};

/// Opening emphasis marker.
pub const HIGHLIGHT_OPEN: &str = r#"<span class="bg-yellow-200">"#;
/// Closing emphasis marker.
pub const HIGHLIGHT_CLOSE: &str = "</span>";
/// Characters of context kept on each side of a match.
pub const SNIPPET_CONTEXT_CHARS: usize = 40;
const ELLIPSIS: &str = "...";

/// Wraps every case-insensitive occurrence of `term` in emphasis markers.
///
/// Returns `snippet` unchanged when either argument is empty.
pub fn highlight(snippet: &str, term: &str) -> String {
    if snippet.is_empty() || term.is_empty() {
        return snippet.to_string();
    }
    let Some(re) = term_regex(term) else {
        return snippet.to_string();
    };

    let replacement = format!("{HIGHLIGHT_OPEN}${{0}}{HIGHLIGHT_CLOSE}");
    re.replace_all(snippet, replacement.as_str()).into_owned()
}

/// Cuts a context window around the first case-insensitive match of `term`.
///
/// The window spans [`SNIPPET_CONTEXT_CHARS`] characters on each side and is
/// marked with `...` where it truncates `content`. Without a match the
/// window starts at the beginning of `content` and ends one character short
/// of a match-sized window, as if the match sat at position -1.
pub fn snippet_around(content: &str, term: &str) -> String {
    let (start, window_end) = match term_regex(term).and_then(|re| re.find(content)) {
        Some(found) => {
            let match_start = content[..found.start()].chars().count();
            (
                match_start.saturating_sub(SNIPPET_CONTEXT_CHARS),
                match_start + found.as_str().chars().count() + SNIPPET_CONTEXT_CHARS,
            )
        }
        None => (
            0,
            (term.chars().count() + SNIPPET_CONTEXT_CHARS).saturating_sub(1),
        ),
    };

    let total = content.chars().count();
    let end = total.min(window_end);

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&content[byte_offset(content, start)..byte_offset(content, end)]);
    if end < total {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

fn term_regex(term: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            debug!(
                "event=highlight_term module=search status=skipped term_chars={} error={}",
                term.chars().count(),
                err
            );
            None
        }
    }
}

fn byte_offset(content: &str, char_idx: usize) -> usize {
    content
        .char_indices()
        .nth(char_idx)
        .map_or(content.len(), |(offset, _)| offset)
}
