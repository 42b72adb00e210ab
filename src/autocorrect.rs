//! Normalization of common non-standard Jyutping spellings.
//!
//! A strictly ordered pipeline: literal replacements first, then one
//! positional pass per ambiguous cluster. Where a correction is phonetically
//! ambiguous the output encodes the alternatives in the ambiguity notation
//! (`(eo|u)`, `y!u`), so downstream consumers must re-segment with
//! [`crate::segment::SegmentOptions::keep_dsl`] enabled.
//!
//! This function never fails: input nothing here recognizes passes through
//! every rule unchanged.

use tracing::debug_span;

use crate::tables::jyutping::INITIALS;

/// How a positional pass resolves one occurrence of its cluster, given the
/// unit immediately before it.
enum Resolution {
    /// Rewrite the cluster to this text.
    Rewrite(&'static str),
    /// Leave the occurrence alone.
    Keep,
    /// Rewrite depends on whether a valid initial follows the cluster:
    /// a following initial means the cluster really was a final.
    Lookahead {
        if_initial: &'static str,
        otherwise: &'static str,
    },
}

/// Correct common misspellings of Jyutping syllables.
///
/// The result may contain ambiguity notation and is not necessarily valid
/// Jyutping on its own; unrecognized input is returned as typed.
pub fn jyutping_autocorrect(jyutping: &str) -> String {
    let _span = debug_span!("jyutping_autocorrect", len = jyutping.len()).entered();

    let mut s = jyutping.to_string();

    // Some romanizations write "hui" for 水-type syllables; this must
    // precede the sh -> s rule.
    s = s.replace("hui", "heoi");

    // "cu-" never occurs in Jyutping; the writer intended [kʰɐ]. The group
    // keeps the k out of reach of the aspiration merger in fuzzy search.
    s = s.replace("cu", "(k)u");

    // "x" is Pinyin habit for the [s] sound.
    s = s.replace('x', "s");

    s = s.replace("ch", "c");
    s = s.replace("sh", "s");
    s = s.replace("zh", "z");

    s = s.replace("eung", "oeng");
    s = s.replace("erng", "oeng");

    s = s.replace("eui", "eoi");
    s = s.replace("euk", "oek");
    s = s.replace("eun", "(eo|yu)n");
    s = s.replace("eut", "(eo|yu)t");
    s = s.replace("eu", "(e|y)u");
    s = s.replace("ern", "eon");

    // "oen" is a typo for "eon" unless it begins "oeng".
    s = rewrite_occurrences(s, "oen", |bytes, idx| {
        if bytes.get(idx + 3) == Some(&b'g') {
            Resolution::Keep
        } else {
            Resolution::Rewrite("eon")
        }
    });

    s = s.replace("oei", "eoi");
    s = s.replace("oet", "eot");

    s = s.replace("eong ", "oeng ");
    s = s.replace("eong'", "oeng'");
    if s.ends_with("eong") {
        s.truncate(s.len() - 4);
        s.push_str("oeng");
    }
    s = s.replace("eok", "oek");

    s = s.replace("ar", "aa");
    s = s.replace("ee", "i");
    s = s.replace("ay", "ei");
    s = s.replace("oy", "oi");
    s = s.replace("oo", "(y!u)");
    s = s.replace("ong", "(o|u)ng");
    s = s.replace("young", "jung");

    s = s.replace("yue", "jyu");
    s = s.replace("ue", "(yu)");
    s = s.replace("tsz", "zi");
    s = s.replace("ck", "k");

    // The cluster passes below are ambiguous mid-syllable (final vs. final +
    // initial), but unambiguous at the end of a syllable; resolve the
    // end-of-syllable cases first, then classify by the preceding initial.

    // [-ɛː j-] or [-ei̯]
    s = resolve_syllable_end(s, "ey", "ei");
    s = rewrite_occurrences(s, "ey", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("ei"),
        Some(b'p' | b'f' | b'd' | b'n' | b'l' | b'h' | b'w') => Resolution::Rewrite("ei"),
        Some(b'c' | b'j' | b'y') => Resolution::Rewrite("e j"),
        Some(b'b' | b'm' | b'g' | b'k' | b'z' | b's') => Resolution::Lookahead {
            if_initial: "ei",
            otherwise: "e j",
        },
        Some(_) => Resolution::Keep,
    });

    // [-ɔː h-] or [-ou̯]
    s = resolve_syllable_end(s, "oh", "ou");
    s = rewrite_occurrences(s, "oh", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("ou"),
        Some(b'n' | b'j') => Resolution::Rewrite("ou"),
        Some(
            b'b' | b'p' | b'm' | b'f' | b'd' | b't' | b'l' | b'g' | b'h' | b'w' | b'z' | b'c'
            | b's',
        ) => Resolution::Lookahead {
            if_initial: "ou",
            otherwise: "o h",
        },
        Some(_) => Resolution::Keep,
    });

    // [-ɔː w-] or [-au̯]
    s = resolve_syllable_end(s, "ow", "au");
    s = rewrite_occurrences(s, "ow", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("au"),
        Some(b'b' | b'm' | b'k') => Resolution::Rewrite("au"),
        Some(
            b'p' | b'f' | b'd' | b't' | b'n' | b'l' | b'g' | b'h' | b'z' | b'c' | b's',
        ) => Resolution::Lookahead {
            if_initial: "au",
            otherwise: "o w",
        },
        Some(_) => Resolution::Keep,
    });

    // [ɐm] or [-uː m-]
    s = resolve_syllable_end(s, "um", "am");
    s = rewrite_occurrences(s, "um", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("am"),
        Some(
            b'b' | b'p' | b'm' | b'd' | b't' | b'n' | b'l' | b'k' | b'h' | b'z' | b'c' | b's',
        ) => Resolution::Rewrite("am"),
        Some(b'f' | b'w' | b'a' | b'e' | b'i' | b'o') => Resolution::Keep,
        Some(b'g') => Resolution::Lookahead {
            if_initial: "am",
            otherwise: "u m",
        },
        Some(_) => Resolution::Keep,
    });

    // [-yː m-] or [jɐm]
    s = rewrite_occurrences(s, "yum", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("jam"),
        Some(b'z' | b'c' | b's' | b'j') => Resolution::Rewrite("yu m"),
        Some(_) => Resolution::Rewrite("jam"),
    });

    // [-yː p-] or [jɐp]
    s = rewrite_occurrences(s, "yup", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("jap"),
        Some(b'z' | b's' | b'j') => Resolution::Rewrite("yu p"),
        Some(_) => Resolution::Rewrite("jap"),
    });

    // [-yː k-] or [jʊk]
    s = rewrite_occurrences(s, "yuk", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("juk"),
        Some(b'z' | b's' | b'c' | b'j') => Resolution::Rewrite("yu k"),
        Some(_) => Resolution::Rewrite("juk"),
    });

    // [-yn g-] or [jʊŋ]
    s = rewrite_occurrences(s, "yung", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("jung"),
        Some(b'z' | b's' | b'c' | b'j') => Resolution::Rewrite("(yu)n g"),
        Some(_) => Resolution::Rewrite("jung"),
    });

    // [-yn], [jɐn], [jyn]
    s = rewrite_occurrences(s, "yun", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("j(a|yu)n"),
        Some(b'z' | b's' | b'c' | b'j') => Resolution::Keep,
        Some(_) => Resolution::Rewrite("j(a|yu)n"),
    });

    // [-yt], [jɐt], [jyt]
    s = rewrite_occurrences(s, "yut", |bytes, idx| match preceding_unit(bytes, idx) {
        None => Resolution::Rewrite("j(a|yu)t"),
        Some(b'z' | b's' | b'c' | b'j') => Resolution::Rewrite("(yu)t"),
        Some(_) => Resolution::Rewrite("(ja|jyu|yu)t"),
    });

    // Syllable-initial "ts" and "kwu" are unambiguous.
    if let Some(rest) = s.strip_prefix("ts") {
        s = format!("c{rest}");
    }
    s = s.replace(" ts", " c");
    if let Some(rest) = s.strip_prefix("kwu") {
        s = format!("(g|k)w!u{rest}");
    }
    s = s.replace("kwu", "(g|k)w!u");

    // Any "y" not starting a "yu" cluster is the [j] glide. This must
    // precede the final replacements below.
    let chars: Vec<char> = s.chars().collect();
    let mut rebuilt = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        let starts_yu = chars.get(i + 1) == Some(&'u')
            || (chars.get(i + 1) == Some(&'!') && chars.get(i + 2) == Some(&'u'))
            || (chars.get(i + 1) == Some(&')') && chars.get(i + 2) == Some(&'u'));
        if c == 'y' && !starts_yu {
            rebuilt.push('j');
        } else {
            rebuilt.push(c);
        }
    }
    s = rebuilt;

    s = s.replace("ui", "(eo|u)i");
    s = s.replace("un", "(y!u|a|eo)n");
    s = s.replace("ut", "(a|u)t");

    s
}

/// Rewrite a cluster unconditionally where it ends a syllable: before a
/// space, before an apostrophe, or at the end of the string.
fn resolve_syllable_end(mut s: String, cluster: &str, replacement: &str) -> String {
    s = s.replace(&format!("{cluster} "), &format!("{replacement} "));
    s = s.replace(&format!("{cluster}'"), &format!("{replacement}'"));
    if s.ends_with(cluster) {
        s.truncate(s.len() - cluster.len());
        s.push_str(replacement);
    }
    s
}

/// Apply a positional pass: scan occurrences of `cluster` left to right,
/// resolving each against the current state of the string. All clusters and
/// replacements are ASCII, so byte offsets are safe to splice at.
fn rewrite_occurrences(
    s: String,
    cluster: &str,
    resolve: impl Fn(&[u8], usize) -> Resolution,
) -> String {
    let mut s = s;
    let mut search_from = 0;
    while let Some(found) = s[search_from..].find(cluster) {
        let idx = search_from + found;
        let resolution = {
            let bytes = s.as_bytes();
            match resolve(bytes, idx) {
                Resolution::Lookahead {
                    if_initial,
                    otherwise,
                } => {
                    if initial_follows(bytes, idx + cluster.len()) {
                        Resolution::Rewrite(if_initial)
                    } else {
                        Resolution::Rewrite(otherwise)
                    }
                }
                other => other,
            }
        };
        match resolution {
            Resolution::Rewrite(replacement) => {
                s.replace_range(idx..idx + cluster.len(), replacement);
            }
            Resolution::Keep | Resolution::Lookahead { .. } => {}
        }
        search_from = idx + 1;
    }
    s
}

/// The concrete character of the unit before `idx`: an already-emitted
/// group counts as one unit, represented by its last alternative's final
/// character (skip the closing parenthesis).
fn preceding_unit(bytes: &[u8], idx: usize) -> Option<u8> {
    if idx == 0 {
        return None;
    }
    let mut unit_idx = idx - 1;
    if bytes[unit_idx] == b')' && idx >= 2 {
        unit_idx = idx - 2;
    }
    Some(bytes[unit_idx])
}

/// Does a valid initial (or "y") start at `idx`?
fn initial_follows(bytes: &[u8], idx: usize) -> bool {
    for len in (1..=2).rev() {
        if idx + len > bytes.len() {
            continue;
        }
        if let Ok(candidate) = std::str::from_utf8(&bytes[idx..idx + len]) {
            if INITIALS.contains(&candidate) || candidate == "y" {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambig::unfold;

    #[test]
    fn test_unambiguous_correction() {
        assert_eq!(jyutping_autocorrect("hui"), "heoi");
    }

    #[test]
    fn test_ambiguous_correction_unfolds() {
        let corrected = jyutping_autocorrect("gui");
        assert_eq!(corrected, "g(eo|u)i");
        assert_eq!(unfold(&corrected).unwrap(), vec!["geoi", "gui"]);
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(jyutping_autocorrect("mgoi"), "mgoi");
        assert_eq!(jyutping_autocorrect(""), "");
    }

    #[test]
    fn test_pinyin_style_initials() {
        assert_eq!(jyutping_autocorrect("xing"), "sing");
    }

    #[test]
    fn test_retroflex_initials() {
        assert_eq!(jyutping_autocorrect("zhaan"), "zaan");
        assert_eq!(jyutping_autocorrect("chaan"), "caan");
        assert_eq!(jyutping_autocorrect("shaan"), "saan");
    }

    #[test]
    fn test_oe_family() {
        assert_eq!(jyutping_autocorrect("eung"), "oeng");
        assert_eq!(jyutping_autocorrect("geung"), "goeng");
        assert_eq!(jyutping_autocorrect("erng"), "oeng");
        assert_eq!(jyutping_autocorrect("eui"), "eoi");
    }

    #[test]
    fn test_oen_typo() {
        assert_eq!(jyutping_autocorrect("zoen"), "zeon");
        assert_eq!(jyutping_autocorrect("zoeng"), "zoeng");
    }

    #[test]
    fn test_long_vowel_spellings() {
        assert_eq!(jyutping_autocorrect("gar"), "gaa");
        assert_eq!(jyutping_autocorrect("see"), "si");
    }

    #[test]
    fn test_oo_is_ambiguous() {
        assert_eq!(jyutping_autocorrect("soo"), "s(y!u)");
        assert_eq!(unfold("(y!u)").unwrap(), vec!["u", "yu"]);
    }

    #[test]
    fn test_ey_syllable_end() {
        assert_eq!(jyutping_autocorrect("fey"), "fei");
        assert_eq!(jyutping_autocorrect("fey gon"), "fei gon");
    }

    #[test]
    fn test_ey_open_mid_cluster() {
        // c + ey mid-word resolves to "e j".
        assert_eq!(jyutping_autocorrect("ceyan"), "ce jan");
    }

    #[test]
    fn test_ey_ambiguous_with_lookahead() {
        // b + ey followed by an initial keeps the [ei] reading.
        assert_eq!(jyutping_autocorrect("beygon"), "beigon");
        // b + ey followed by a vowel splits into [-e j-].
        assert_eq!(jyutping_autocorrect("beyan"), "be jan");
    }

    #[test]
    fn test_um_cluster() {
        assert_eq!(jyutping_autocorrect("gum yiu"), "gam jiu");
        assert_eq!(jyutping_autocorrect("sum"), "sam");
    }

    #[test]
    fn test_yum_cluster() {
        // Trailing "um" resolves first, then the y -> j glide pass.
        assert_eq!(jyutping_autocorrect("yum"), "jam");
        // Mid-string after a sibilant the cluster splits into "yu m".
        assert_eq!(jyutping_autocorrect("syumha"), "syu mha");
    }

    #[test]
    fn test_yut_cluster() {
        assert_eq!(jyutping_autocorrect("yut"), "j(a|yu)t");
        assert_eq!(jyutping_autocorrect("zyut"), "z(yu)t");
    }

    #[test]
    fn test_ts_initial() {
        assert_eq!(jyutping_autocorrect("tsoi"), "coi");
        assert_eq!(jyutping_autocorrect("m tsoi"), "m coi");
    }

    #[test]
    fn test_kwu() {
        assert_eq!(jyutping_autocorrect("kwu"), "(g|k)w!u");
    }

    #[test]
    fn test_y_to_j() {
        assert_eq!(jyutping_autocorrect("yat"), "jat");
        assert_eq!(jyutping_autocorrect("yyu"), "jyu");
    }

    #[test]
    fn test_ui_un_ut_finals() {
        assert_eq!(jyutping_autocorrect("gun"), "g(y!u|a|eo)n");
        assert_eq!(jyutping_autocorrect("gut"), "g(a|u)t");
    }
}
