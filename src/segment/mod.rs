//! Longest-match syllable scanner for romanized input.
//!
//! One algorithm serves both languages; the [`Syllabary`] it is handed
//! supplies the inventories and the two behaviors that differ (Jyutping
//! initials that double as standalone syllables, Pinyin erhua). The scanner
//! walks an index pair over an immutable char slice: `start` marks the open
//! span, `end` the look-ahead cursor. Nothing is ever re-scanned; when a
//! longest-match assumption turns out wrong (an initial that was really a
//! standalone syllable, as in "mgoi"), the open span is reclassified against
//! the final table instead of backtracking.

use crate::ambig;
use crate::tables::{self, Syllabary};

/// One unit of segmented input.
///
/// A span the scanner could not resolve still comes back as a `Syllable`
/// (with the whole result marked invalid) so callers never lose input text.
/// Wildcards carry their phonetically significant neighboring whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Syllable(String),
    Special(String),
    Wildcard(String),
}

impl Token {
    pub fn text(&self) -> &str {
        match self {
            Token::Syllable(s) | Token::Special(s) | Token::Wildcard(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Token::Syllable(s) | Token::Special(s) | Token::Wildcard(s) => s,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Token::Wildcard(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Emit punctuation from [`tables::SPECIAL_CHARACTERS`] as tokens
    /// instead of dropping it.
    pub keep_special: bool,
    /// Emit `*`/`?` wildcards (with attached whitespace) instead of
    /// dropping them.
    pub keep_wildcards: bool,
    /// Treat `( ) | !` as ambiguity notation: spans containing them are kept
    /// whole and validated through the unfolder. When false those characters
    /// are stripped before scanning.
    pub keep_dsl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    /// False when any span failed to resolve into known syllables. Tokens
    /// are still populated best-effort.
    pub valid: bool,
    pub tokens: Vec<Token>,
}

impl SegmentationResult {
    /// Token texts in order, for callers that only need the strings.
    pub fn texts(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text().to_string()).collect()
    }
}

pub fn segment_jyutping(input: &str, opts: SegmentOptions) -> SegmentationResult {
    scan(&tables::jyutping::JYUTPING, input, opts)
}

pub fn segment_pinyin(input: &str, opts: SegmentOptions) -> SegmentationResult {
    scan(&tables::pinyin::PINYIN, input, opts)
}

const MAX_INITIAL_LEN: usize = 2;
const MAX_FINAL_LEN: usize = 4;

fn scan(inventory: &Syllabary, input: &str, opts: SegmentOptions) -> SegmentationResult {
    let lowered = input.to_lowercase();
    let chars: Vec<char> = if opts.keep_dsl {
        lowered.chars().collect()
    } else {
        // Strip ambiguity notation; `!` stays because it is ordinary
        // punctuation to the scanner when the notation is disabled.
        lowered
            .chars()
            .filter(|&c| !matches!(c, '(' | ')' | '|'))
            .collect()
    };
    let n = chars.len();

    let mut valid = true;
    let mut tokens: Vec<Token> = Vec::new();
    let mut start = 0usize;
    let mut end = 0usize;
    let mut initial_open = false;
    let mut dsl_span = false;

    while end < n {
        let c = chars[end];

        if opts.keep_dsl && ambig::is_dsl_char(c) {
            dsl_span = true;
            end += 1;
            continue;
        }

        let is_special = tables::is_special(c);
        let is_glob = c == '*' || c == '?';

        if c == ' ' || c == '\'' || is_special || is_glob {
            // A separator forces the open span closed.
            if start < end {
                close_span(inventory, &chars[start..end], dsl_span, &mut tokens, &mut valid);
            }
            if opts.keep_wildcards && is_glob {
                let mut glob_start = end;
                let mut glob_end = end + 1;
                // Absorb the preceding space unless the previous token
                // already carries it; absorb the following space and mark it
                // consumed so the next token cannot claim it too.
                if end >= 1
                    && chars[end - 1] == ' '
                    && tokens.last().is_some_and(|t| !t.text().ends_with(' '))
                {
                    glob_start -= 1;
                }
                if end + 1 < n && chars[end + 1] == ' ' {
                    glob_end += 1;
                    end += 1;
                }
                tokens.push(Token::Wildcard(chars[glob_start..glob_end].iter().collect()));
            } else if opts.keep_special && is_special {
                tokens.push(Token::Special(c.to_string()));
            }
            end += 1;
            start = end;
            initial_open = false;
            dsl_span = false;
            continue;
        }

        if dsl_span {
            // Inside an ambiguity span: consume blindly, validation happens
            // when the span closes.
            end += 1;
            continue;
        }

        if inventory.initials_double_as_finals && c.is_numeric() && initial_open {
            // A digit right after an open initial is that initial's tone if
            // the initial can stand alone as a syllable ("m4", "ng6").
            let span: String = chars[start..end].iter().collect();
            if inventory.is_final(&span) {
                let mut syllable = span;
                syllable.push(c);
                tokens.push(Token::Syllable(syllable));
                end += 1;
                start = end;
                initial_open = false;
                continue;
            }
        }

        if let Some(len) = match_longest(&chars[end..], inventory.initials, MAX_INITIAL_LEN) {
            if initial_open {
                // Two initials in a row. The first one was only a valid
                // parse if it is a complete syllable by itself, i.e. a
                // member of the final table ("m" before "goi").
                let previous: String = chars[start..end].iter().collect();
                if inventory.initials_double_as_finals && inventory.is_final(&previous) {
                    tokens.push(Token::Syllable(previous));
                    start = end;
                } else {
                    valid = false;
                }
            }
            end += len;
            initial_open = true;
            continue;
        }

        if let Some(len) = match_longest(&chars[end..], inventory.finals, MAX_FINAL_LEN) {
            end += len;
            if inventory.erhua && end < n && chars[end] == 'r' {
                end += 1;
            }
            if end < n && chars[end].is_numeric() {
                end += 1;
            }
            tokens.push(Token::Syllable(chars[start..end].iter().collect()));
            start = end;
            initial_open = false;
            continue;
        }

        // Unrecognized character: keep it glued to the span so the original
        // text survives, and remember that the parse failed.
        valid = false;
        end += 1;
    }

    if start < end {
        close_span(inventory, &chars[start..end], dsl_span, &mut tokens, &mut valid);
    }

    SegmentationResult { valid, tokens }
}

/// Longest match from `chars` against a table, lengths `max..=1`.
fn match_longest(chars: &[char], table: &[&str], max: usize) -> Option<usize> {
    for len in (1..=max.min(chars.len())).rev() {
        let candidate: String = chars[..len].iter().collect();
        if table.contains(&candidate.as_str()) {
            return Some(len);
        }
    }
    None
}

/// Emit a span that was forced closed by a separator or end of input: an
/// open initial, unresolved residue, or an ambiguity-notation fragment.
fn close_span(
    inventory: &Syllabary,
    span: &[char],
    dsl_span: bool,
    tokens: &mut Vec<Token>,
    valid: &mut bool,
) {
    let text: String = span.iter().collect();
    if dsl_span {
        // Valid if any concrete unfolding of the span segments cleanly. An
        // unfoldable fragment is unverifiable, which is not the same as
        // invalid.
        if let Ok(variants) = ambig::unfold(&text) {
            let any_valid = variants
                .iter()
                .any(|v| scan(inventory, v, SegmentOptions::default()).valid);
            if !any_valid {
                *valid = false;
            }
        }
    } else if !inventory.is_final(&text) {
        *valid = false;
    }
    tokens.push(Token::Syllable(text));
}
