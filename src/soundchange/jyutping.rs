//! Cantonese merger tables.
//!
//! In fixed order per syllable: whole-syllable mergers, initial mergers,
//! nucleus length, coda neutralizations. The anchors are literal prefixes
//! and suffixes, so syllables that already carry ambiguity notation from
//! autocorrect simply skip the rewrites whose anchors no longer match.

use super::{is_exempt, split_tone};

/// Apply the Cantonese sound-change tables to already-segmented syllables.
pub fn jyutping_sound_changes<S: AsRef<str>>(syllables: &[S]) -> Vec<String> {
    syllables
        .iter()
        .map(|s| change_syllable(s.as_ref()))
        .collect()
}

fn change_syllable(token: &str) -> String {
    if is_exempt(token) {
        return token.to_string();
    }
    let (body, tone) = split_tone(token);

    // Syllabic nasals merge with each other wholesale.
    if body == "ng" || body == "m" {
        return format!("(ng|m){tone}");
    }

    let (initial, rest) = rewrite_initial(body);
    let rest = rewrite_nucleus(&rest);
    let rest = rewrite_coda(&rest);

    format!("{initial}{rest}{tone}")
}

/// Rewrite the onset; at most one rule fires.
fn rewrite_initial(body: &str) -> (String, String) {
    let bytes = body.as_bytes();
    let next_after = |n: usize| bytes.get(n).copied();

    // ŋ-initial/null-initial merger before back vowels.
    if let Some(rest) = body.strip_prefix("ng") {
        if matches!(rest.as_bytes().first(), Some(b'a' | b'o' | b'u')) {
            return ("(ng)!".to_string(), rest.to_string());
        }
        return (String::new(), body.to_string());
    }

    // Labialized velars: aspiration merger, plus the w drops before the
    // back rounded vowel.
    if let Some(rest) = body.strip_prefix("gw").or_else(|| body.strip_prefix("kw")) {
        if rest.as_bytes().first() == Some(&b'o') {
            return ("(g|k)w!".to_string(), rest.to_string());
        }
        return ("(g|k)w".to_string(), rest.to_string());
    }

    // Plain velars merge with their labialized counterparts before o.
    if matches!(bytes.first(), Some(b'g' | b'k')) {
        let rest = &body[1..];
        if next_after(1) == Some(b'o') {
            return ("(g|k)w!".to_string(), rest.to_string());
        }
        return ("(g|k)".to_string(), rest.to_string());
    }

    if bytes.first() == Some(&b'n') {
        return ("(n|l)".to_string(), body[1..].to_string());
    }
    if bytes.first() == Some(&b'l') {
        return ("(n|l)".to_string(), body[1..].to_string());
    }

    for (pair, rewritten) in [(b"bp", "(b|p)"), (b"dt", "(d|t)"), (b"zc", "(z|c)")] {
        if let Some(&first) = bytes.first() {
            if pair.contains(&first) {
                return (rewritten.to_string(), body[1..].to_string());
            }
        }
    }

    (String::new(), body.to_string())
}

/// The long low vowel's length is contrastive but frequently mistyped.
fn rewrite_nucleus(rest: &str) -> String {
    rest.replace("aa", "aa!")
}

/// n/ŋ neutralize after the open nuclei; t/k neutralize except after i/u.
fn rewrite_coda(rest: &str) -> String {
    let nucleus_allows_nasal =
        |nucleus: &str| nucleus.ends_with('a') || nucleus.ends_with('o') || nucleus.ends_with("aa!");

    if let Some(nucleus) = rest.strip_suffix("ng") {
        if nucleus_allows_nasal(nucleus) {
            return format!("{nucleus}(n|ng)");
        }
    } else if let Some(nucleus) = rest.strip_suffix('n') {
        if nucleus_allows_nasal(nucleus) {
            return format!("{nucleus}(n|ng)");
        }
    } else if let Some(nucleus) = rest.strip_suffix(['t', 'k']) {
        if !nucleus.ends_with('i') && !nucleus.ends_with('u') && !nucleus.is_empty() {
            return format!("{nucleus}(t|k)");
        }
    }

    rest.to_string()
}
