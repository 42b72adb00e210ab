//! Jyutping → Yale.
//!
//! The rule tables follow the Wiktionary yue-pron conversion convention:
//! special finals are substituted outright, the light tones 4/5/6 insert an
//! "h" before the trailing consonant cluster, and the tone diacritic lands
//! on the first vowel in a/e/i/o/u scan order.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{find_tone, is_passthrough, jyutping_syllables};
use crate::tables::jyutping::{INITIALS, TONES};

static INITIAL_RULES: Lazy<Vec<(Regex, &str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"^jy?").unwrap(), "y"),
        (Regex::new(r"^z").unwrap(), "j"),
        (Regex::new(r"^c").unwrap(), "ch"),
    ]
});

static FINAL_AND_TONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([aeiou][aeiou]?[iumngptk]?g?)([1-6])").unwrap());

/// Trailing consonant cluster plus tone digit; light tones substitute
/// `h$cluster` for it.
static LIGHT_TONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([ptkmn]?g?)[123456]$").unwrap());

static SPECIAL_FINALS: &[(&str, &str)] = &[
    ("aa", "a"),
    ("oe", "eu"),
    ("oeng", "eung"),
    ("oek", "euk"),
    ("eoi", "eui"),
    ("eon", "eun"),
    ("eot", "eut"),
];

/// Syllabic nasals have fully tabulated Yale forms, one per tone.
static SPECIAL_SYLLABLES: &[(&str, [&str; 6])] = &[
    ("m", ["m̄", "ḿ", "m", "m̀h", "ḿh", "mh"]),
    ("ng", ["n̄g", "ńg", "ng", "ǹgh", "ńgh", "ngh"]),
];

static VOWEL_REPLACEMENTS: &[(char, [&str; 6])] = &[
    ('a', ["ā", "á", "a", "à", "á", "a"]),
    ('e', ["ē", "é", "e", "è", "é", "e"]),
    ('i', ["ī", "í", "i", "ì", "í", "i"]),
    ('o', ["ō", "ó", "o", "ò", "ó", "o"]),
    ('u', ["ū", "ú", "u", "ù", "ú", "u"]),
];

/// Convert a string of Jyutping syllables to Yale romanization.
///
/// Syllables without a tone digit, single characters, and punctuation are
/// echoed unchanged.
pub fn jyutping_to_yale(jyutping: &str, use_spaces_to_segment: bool) -> String {
    if jyutping.is_empty() {
        return String::new();
    }

    let syllables = jyutping_syllables(jyutping, use_spaces_to_segment);
    let mut converted = Vec::with_capacity(syllables.len());

    for syllable in &syllables {
        if is_passthrough(syllable) {
            converted.push(syllable.clone());
            continue;
        }
        let tone = match find_tone(syllable, TONES) {
            Some(t) => t,
            None => {
                converted.push(syllable.clone());
                continue;
            }
        };

        let mut trimmed = syllable.chars();
        trimmed.next_back();
        let without_tone = trimmed.as_str();
        if let Some((_, forms)) = SPECIAL_SYLLABLES.iter().find(|(s, _)| *s == without_tone) {
            converted.push(forms[tone as usize - 1].to_string());
            continue;
        }

        let initial = convert_initial(syllable);
        let final_ = convert_final(syllable);
        converted.push(format!("{initial}{final_}"));
    }

    converted.join(" ")
}

fn convert_initial(syllable: &str) -> String {
    for (rule, replacement) in INITIAL_RULES.iter() {
        if rule.is_match(syllable) {
            return (*replacement).to_string();
        }
    }
    for len in (1..=2.min(syllable.len())).rev() {
        if syllable.is_char_boundary(len) && INITIALS.contains(&&syllable[..len]) {
            return syllable[..len].to_string();
        }
    }
    String::new()
}

fn convert_final(syllable: &str) -> String {
    let caps = match FINAL_AND_TONE.captures(syllable) {
        Some(c) => c,
        None => return syllable.to_string(),
    };

    let mut final_ = caps[1].to_string();
    let tone = (caps[2].as_bytes()[0] - b'0') as usize;

    if let Some((_, sub)) = SPECIAL_FINALS.iter().find(|(f, _)| *f == final_) {
        final_ = (*sub).to_string();
    }

    if (4..=6).contains(&tone) {
        let with_tone = format!("{final_}{tone}");
        final_ = LIGHT_TONE.replace(&with_tone, "h$1").into_owned();
    }

    for &(vowel, replacements) in VOWEL_REPLACEMENTS {
        if let Some(idx) = final_.find(vowel) {
            final_.replace_range(idx..idx + vowel.len_utf8(), replacements[tone - 1]);
            break;
        }
    }

    final_
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        assert_eq!(jyutping_to_yale("si1 zi2 saan1", false), "sī jí sāan");
    }

    #[test]
    fn test_reject_no_tone() {
        assert_eq!(jyutping_to_yale("joeng", false), "joeng");
        assert_eq!(jyutping_to_yale("mit", false), "mit");
    }

    #[test]
    fn test_reject_single_letter() {
        assert_eq!(jyutping_to_yale("a", false), "a");
    }

    #[test]
    fn test_reject_special_character() {
        assert_eq!(jyutping_to_yale("-", false), "-");
    }

    #[test]
    fn test_no_spaces() {
        assert_eq!(jyutping_to_yale("si1zi2saan1", false), "sī jí sāan");
    }

    #[test]
    fn test_spaces_to_segment() {
        assert_eq!(jyutping_to_yale("si1 zi2 saan1", true), "sī jí sāan");
    }

    #[test]
    fn test_special_final() {
        assert_eq!(jyutping_to_yale("goek3jyun5", false), "geuk yúhn");
    }

    #[test]
    fn test_light_tone() {
        assert_eq!(jyutping_to_yale("lok6 jyu5", false), "lohk yúh");
    }

    #[test]
    fn test_special_syllable() {
        assert_eq!(jyutping_to_yale("m4 hai6", false), "m̀h haih");
    }

    #[test]
    fn test_tones() {
        assert_eq!(
            jyutping_to_yale("saam1 gau2 sei3 ling4 ng5 ji6 cat1 baat3 luk6", false),
            "sāam gáu sei lìhng ńgh yih chāt baat luhk"
        );
    }
}
