//! Near-homophone rewrites for approximate phonetic search.
//!
//! Each syllable is rewritten into the ambiguity notation so the fuzzy query
//! path can match every merger variant at once. Rewrites compose by literal
//! splicing, never by nesting groups; a composed syllable may therefore
//! carry several sibling groups, which only the regex translation (not the
//! unfolder) needs to accept.

mod jyutping;
mod pinyin;

pub use jyutping::jyutping_sound_changes;
pub use pinyin::pinyin_sound_changes;

/// Split one trailing tone digit off a syllable.
pub(crate) fn split_tone(syllable: &str) -> (&str, &str) {
    match syllable.char_indices().next_back() {
        Some((idx, c)) if c.is_ascii_digit() => syllable.split_at(idx),
        _ => (syllable, ""),
    }
}

/// Wildcards and other non-syllable tokens pass through sound changes.
pub(crate) fn is_exempt(token: &str) -> bool {
    let trimmed = token.trim();
    trimmed.is_empty() || trimmed == "*" || trimmed == "?"
}
