//! Mandarin merger tables: the retroflex/alveolar sibilant series, n/l and
//! f/h onsets, and the syllable-final n/ŋ neutralization.

use super::{is_exempt, split_tone};

/// Apply the Mandarin sound-change tables to already-segmented syllables.
pub fn pinyin_sound_changes<S: AsRef<str>>(syllables: &[S]) -> Vec<String> {
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

    let (initial, rest) = rewrite_initial(body);
    let rest = rewrite_coda(&rest);

    format!("{initial}{rest}{tone}")
}

fn rewrite_initial(body: &str) -> (String, String) {
    for (prefixes, rewritten) in [
        (["zh", "z"], "zh!"),
        (["ch", "c"], "ch!"),
        (["sh", "s"], "sh!"),
    ] {
        for prefix in prefixes {
            if let Some(rest) = body.strip_prefix(prefix) {
                return (rewritten.to_string(), rest.to_string());
            }
        }
    }

    if let Some(rest) = body.strip_prefix('n') {
        // "ng"-final bare syllables have no onset to merge.
        if !rest.is_empty() && !rest.starts_with('g') {
            return ("(n|l)".to_string(), rest.to_string());
        }
    }
    if let Some(rest) = body.strip_prefix('l') {
        return ("(n|l)".to_string(), rest.to_string());
    }
    if let Some(rest) = body.strip_prefix('f') {
        return ("(f|h)".to_string(), rest.to_string());
    }
    if let Some(rest) = body.strip_prefix('h') {
        return ("(f|h)".to_string(), rest.to_string());
    }

    (String::new(), body.to_string())
}

/// an/ang, en/eng, in/ing collapse; a final `g` becomes optional and a bare
/// `n` coda gains one.
fn rewrite_coda(rest: &str) -> String {
    if rest.ends_with("ng") {
        return format!("{rest}!");
    }
    if rest.ends_with('n') && rest.len() > 1 {
        return format!("{rest}g!");
    }
    rest.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(syllable: &str) -> String {
        pinyin_sound_changes(&[syllable]).remove(0)
    }

    #[test]
    fn test_retroflex_merger() {
        assert_eq!(change("zhang1"), "zh!ang!1");
        assert_eq!(change("zang1"), "zh!ang!1");
        assert_eq!(change("chi1"), "ch!i1");
        assert_eq!(change("si4"), "sh!i4");
    }

    #[test]
    fn test_n_l_merger() {
        assert_eq!(change("nan2"), "(n|l)ang!2");
        assert_eq!(change("lan2"), "(n|l)ang!2");
    }

    #[test]
    fn test_f_h_merger() {
        assert_eq!(change("fu2"), "(f|h)u2");
        assert_eq!(change("hu2"), "(f|h)u2");
    }

    #[test]
    fn test_coda_neutralization() {
        assert_eq!(change("min2"), "ming!2");
        assert_eq!(change("ming2"), "ming!2");
    }

    #[test]
    fn test_no_merger() {
        assert_eq!(change("ba1"), "ba1");
        assert_eq!(change("wo3"), "wo3");
    }

    #[test]
    fn test_wildcards_pass_through() {
        assert_eq!(change("*"), "*");
    }
}
