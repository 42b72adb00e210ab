//! Compilation of raw search input into backend match patterns.
//!
//! The exact path produces a GLOB pattern (`*`/`?` wildcards); the fuzzy
//! path runs autocorrect and the sound-change tables, then translates the
//! ambiguity notation into an anchored regular expression. The storage
//! layer picks the operator from [`Matcher`] and binds the pattern itself.

use tracing::debug_span;

use crate::autocorrect::jyutping_autocorrect;
use crate::segment::{segment_jyutping, segment_pinyin, SegmentOptions};
use crate::soundchange::{jyutping_sound_changes, pinyin_sound_changes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Romanization {
    Jyutping,
    Pinyin,
}

/// Which matching operator the storage layer must evaluate the pattern with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Glob,
    Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub pattern: String,
    pub matcher: Matcher,
}

/// Compile raw user input into a search pattern.
///
/// Wrapping the input in double quotes searches the literal phrase; a
/// trailing `$` anchors the match instead of leaving it right-open.
pub fn compile_query(raw: &str, romanization: Romanization, fuzzy: bool) -> CompiledPattern {
    let _span = debug_span!("compile_query", fuzzy, len = raw.len()).entered();

    let exact_match = raw.len() >= 3 && raw.starts_with('"') && raw.ends_with('"');
    let append_wildcard = !raw.ends_with('$');

    if fuzzy {
        compile_fuzzy(raw, romanization, exact_match, append_wildcard)
    } else {
        compile_glob(raw, romanization, exact_match, append_wildcard)
    }
}

fn compile_glob(
    raw: &str,
    romanization: Romanization,
    exact_match: bool,
    append_wildcard: bool,
) -> CompiledPattern {
    if exact_match {
        let phrase = raw[1..raw.len() - 1]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        return CompiledPattern {
            pattern: phrase,
            matcher: Matcher::Glob,
        };
    }

    let opts = SegmentOptions {
        keep_special: false,
        keep_wildcards: true,
        keep_dsl: false,
    };
    let tokens = match romanization {
        Romanization::Jyutping => segment_jyutping(raw, opts),
        Romanization::Pinyin => segment_pinyin(raw, opts),
    }
    .tokens;
    let texts: Vec<String> = tokens.into_iter().map(|t| t.into_text()).collect();

    let mut pattern = construct_romanization_query(&texts, "?");
    if append_wildcard {
        pattern.push('*');
    }
    CompiledPattern {
        pattern,
        matcher: Matcher::Glob,
    }
}

fn compile_fuzzy(
    raw: &str,
    romanization: Romanization,
    exact_match: bool,
    append_wildcard: bool,
) -> CompiledPattern {
    let lowered = raw.to_lowercase();
    let body = if exact_match {
        &lowered[1..lowered.len() - 1]
    } else {
        &lowered
    };

    let opts = SegmentOptions {
        keep_special: false,
        keep_wildcards: true,
        keep_dsl: true,
    };
    let texts: Vec<String> = match romanization {
        Romanization::Jyutping => segment_jyutping(&jyutping_autocorrect(body), opts),
        Romanization::Pinyin => segment_pinyin(body, opts),
    }
    .tokens
    .into_iter()
    .map(|t| t.into_text())
    .collect();

    let changed = match romanization {
        Romanization::Jyutping => jyutping_sound_changes(&texts),
        Romanization::Pinyin => pinyin_sound_changes(&texts),
    };

    let joined = if exact_match {
        changed.join(" ")
    } else {
        construct_romanization_query(&changed, "?")
    };

    let mut pattern = String::with_capacity(joined.len() + 4);
    pattern.push('^');
    pattern.push_str(&glob_to_regex(&joined));
    if exact_match || !append_wildcard {
        pattern.push('$');
    } else {
        pattern.push_str(".*");
    }

    CompiledPattern {
        pattern,
        matcher: Matcher::Regex,
    }
}

/// Translate GLOB wildcards and ambiguity notation into regex syntax.
/// Groups and alternation bars are already valid regex and pass through.
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '!' => out.push('?'),
            other => out.push(other),
        }
    }
    out
}

/// Join syllables for a wildcard search: every syllable that does not end
/// in a tone digit gets `delimiter` appended so any tone matches. A literal
/// wildcard token is appended as-is (with its attached whitespace), first
/// retracting the delimiter the previous syllable added so the broader
/// wildcard subsumes it instead of stacking.
pub fn construct_romanization_query<S: AsRef<str>>(syllables: &[S], delimiter: &str) -> String {
    let mut out = String::new();
    let mut space_before = "";
    let mut prev_added_delimiter = false;

    for syllable in syllables {
        let raw = syllable.as_ref();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.chars().next_back().is_some_and(|c| c.is_numeric()) {
            out.push_str(space_before);
            out.push_str(trimmed);
            space_before = " ";
            prev_added_delimiter = false;
        } else if trimmed == "*" || trimmed == "?" {
            if prev_added_delimiter {
                out.truncate(out.len() - delimiter.len());
            } else if !raw.starts_with(' ') {
                out.push_str(space_before);
            }
            out.push_str(raw);
            space_before = "";
            prev_added_delimiter = false;
        } else {
            out.push_str(space_before);
            out.push_str(trimmed);
            out.push_str(delimiter);
            space_before = " ";
            prev_added_delimiter = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_construct_appends_delimiter_to_toneless() {
        assert_eq!(construct_romanization_query(&strs(&["se", "gwo"]), "?"), "se? gwo?");
    }

    #[test]
    fn test_construct_skips_toned() {
        assert_eq!(
            construct_romanization_query(&strs(&["se2", "gwo3"]), "?"),
            "se2 gwo3"
        );
        assert_eq!(
            construct_romanization_query(&strs(&["se2", "gwo"]), "?"),
            "se2 gwo?"
        );
    }

    #[test]
    fn test_construct_wildcard_collapsing() {
        let joined = construct_romanization_query(&strs(&["hou2", "*", "m"]), "?");
        assert!(!joined.contains("?*"));
        let joined = construct_romanization_query(&strs(&["hou", "*", "m"]), "?");
        assert!(!joined.contains("?*"));
        assert_eq!(joined, "hou*m?");
    }

    #[test]
    fn test_construct_wildcard_keeps_whitespace() {
        assert_eq!(
            construct_romanization_query(&strs(&["hou2", " * ", "m"]), "?"),
            "hou2 * m?"
        );
        assert_eq!(
            construct_romanization_query(&strs(&["m", "* ", "goi"]), "?"),
            "m* goi?"
        );
    }

    #[test]
    fn test_construct_empty() {
        assert_eq!(construct_romanization_query(&Vec::<String>::new(), "?"), "");
    }

    #[test]
    fn test_exact_match_override() {
        let compiled = compile_query("\"abc\"", Romanization::Jyutping, false);
        assert_eq!(compiled.pattern, "abc");
        assert_eq!(compiled.matcher, Matcher::Glob);
    }

    #[test]
    fn test_glob_query() {
        let compiled = compile_query("se2 gwo3", Romanization::Jyutping, false);
        assert_eq!(compiled.pattern, "se2 gwo3*");
        assert_eq!(compiled.matcher, Matcher::Glob);
    }

    #[test]
    fn test_glob_query_toneless() {
        let compiled = compile_query("hou m", Romanization::Jyutping, false);
        assert_eq!(compiled.pattern, "hou? m?*");
    }

    #[test]
    fn test_dollar_suppresses_wildcard() {
        let compiled = compile_query("se2$", Romanization::Jyutping, false);
        assert_eq!(compiled.pattern, "se2");
    }

    #[test]
    fn test_glob_query_with_user_wildcard() {
        let compiled = compile_query("hou2 * m", Romanization::Jyutping, false);
        assert_eq!(compiled.pattern, "hou2 * m?*");
    }

    #[test]
    fn test_fuzzy_query_is_anchored_regex() {
        let compiled = compile_query("se2", Romanization::Jyutping, true);
        assert_eq!(compiled.matcher, Matcher::Regex);
        assert!(compiled.pattern.starts_with('^'));
        assert!(compiled.pattern.ends_with(".*"));
    }

    #[test]
    fn test_fuzzy_query_translates_notation() {
        // "gui" autocorrects to "g(eo|u)i", sound changes add the velar
        // merger, the delimiter becomes a dot.
        let compiled = compile_query("gui", Romanization::Jyutping, true);
        assert_eq!(compiled.pattern, "^(g|k)(eo|u)i..*");
    }

    #[test]
    fn test_fuzzy_exact_match_is_fully_anchored() {
        let compiled = compile_query("\"se2\"", Romanization::Jyutping, true);
        assert!(compiled.pattern.starts_with('^'));
        assert!(compiled.pattern.ends_with('$'));
        assert!(!compiled.pattern.ends_with(".*$"));
    }

    #[test]
    fn test_fuzzy_dollar_anchors_end() {
        let compiled = compile_query("sin1$", Romanization::Jyutping, true);
        assert!(compiled.pattern.ends_with('$'));
    }

    #[test]
    fn test_fuzzy_pinyin() {
        let compiled = compile_query("zang1", Romanization::Pinyin, true);
        assert_eq!(compiled.pattern, "^zh?ang?1.*");
    }

    #[test]
    fn test_fuzzy_sound_change_tone_preserved() {
        let compiled = compile_query("nei5", Romanization::Jyutping, true);
        assert_eq!(compiled.pattern, "^(n|l)ei5.*");
    }
}
