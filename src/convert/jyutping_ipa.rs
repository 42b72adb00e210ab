//! Jyutping → Cantonese Sinological IPA.
//!
//! A syllable is rewritten through a fixed preprocessing ladder (initial
//! disambiguation, syllabic nasals, checked tones, special finals) into an
//! intermediate spelling whose nucleus is a single marker character, then a
//! single regex splits it into initial/nucleus/coda/tone and each part maps
//! through its own table, falling back to the literal substring.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{find_tone, is_passthrough, jyutping_syllables};
use crate::tables::jyutping::TONES;

static SYLLABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([bcdfghjklmnpqrstvwxyz]?[bcdfghjklmnpqrstvwxyz]?)([a@e>i|o~u^y][eo]?)([iuymngptk]?g?)([1-9])",
    )
    .unwrap()
});

/// `zyu/coe/ceo`-type clusters hide an aspirated-series initial; make it
/// explicit before the final substitutions run.
static PREPROCESS_INITIALS: Lazy<Vec<(Regex, &str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"([zcs])yu").unwrap(), "${1}hyu"),
        (Regex::new(r"([zc])oe").unwrap(), "${1}hoe"),
        (Regex::new(r"([zc])eo").unwrap(), "${1}heo"),
    ]
});

static SPECIAL_SYLLABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(h?)([mn]g?)([1-6])$").unwrap());
static TONE_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[1-6]").unwrap());
static CHECKED_TONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([ptk])([136])").unwrap());

/// Ordered: `a` marks short ɐ first, then `@@` restores the long vowel.
static SPECIAL_FINALS: &[(&str, &str)] = &[
    ("a", "@"),
    ("yu", "y"),
    ("@@", "a"),
    ("uk", "^k"),
    ("ik", "|k"),
    ("ou", "~u"),
    ("eoi", "eoy"),
    ("ung", "^ng"),
    ("ing", "|ng"),
    ("ei", ">i"),
];

static INITIALS: &[(&str, &str)] = &[
    ("b", "p"),
    ("p", "pʰ"),
    ("d", "t"),
    ("t", "tʰ"),
    ("g", "k"),
    ("k", "kʰ"),
    ("ng", "ŋ"),
    ("gw", "kʷ"),
    ("kw", "kʷʰ"),
    ("zh", "t͡ʃ"),
    ("ch", "t͡ʃʰ"),
    ("sh", "ʃ"),
    ("z", "t͡s"),
    ("c", "t͡sʰ"),
];

static NUCLEI: &[(&str, &str)] = &[
    ("a", "äː"),
    ("@", "ɐ"),
    ("e", "ɛː"),
    (">", "e"),
    ("i", "iː"),
    ("|", "ɪ"),
    ("o", "ɔː"),
    ("~", "o"),
    ("oe", "œ̽ː"),
    ("eo", "ɵ"),
    ("u", "uː"),
    ("^", "ʊ"),
    ("y", "yː"),
];

static CODAS: &[(&str, &str)] = &[
    ("i", "i̯"),
    ("u", "u̯"),
    ("y", "y̯"),
    ("ng", "ŋ"),
    ("p", "p̚"),
    ("t", "t̚"),
    ("k", "k̚"),
];

/// Indexed by tone value 1-9; 7/8/9 are the checked realizations of 1/3/6.
static TONE_MARKS: &[&str] = &["˥", "˧˥", "˧", "˨˩", "˩˧", "˨", "˥", "˧", "˨"];

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Convert a string of Jyutping syllables to Cantonese Sinological IPA.
pub fn jyutping_to_ipa(jyutping: &str, use_spaces_to_segment: bool) -> String {
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

        let mut s = syllable.clone();
        for (rule, replacement) in PREPROCESS_INITIALS.iter() {
            s = rule.replace_all(&s, *replacement).into_owned();
        }

        if SPECIAL_SYLLABLE.is_match(&s) {
            s = s.replace('m', "m̩").replace("ng", "ŋ̍");
            s = TONE_DIGIT
                .replace_all(&s, TONE_MARKS[tone as usize - 1])
                .into_owned();
        }

        if CHECKED_TONE.is_match(&s) {
            s = s.replace('1', "7").replace('3', "8").replace('6', "9");
        }

        for (from, to) in SPECIAL_FINALS {
            s = s.replace(from, to);
        }

        converted.push(convert_syllable(&s));
    }

    converted.join(" ")
}

fn convert_syllable(syllable: &str) -> String {
    let caps = match SYLLABLE.captures(syllable) {
        Some(c) => c,
        None => return syllable.to_string(),
    };

    let initial = match &caps[1] {
        "" => String::new(),
        raw => lookup(INITIALS, raw).unwrap_or(raw).to_string(),
    };
    let nucleus = match &caps[2] {
        "" => String::new(),
        raw => lookup(NUCLEI, raw).unwrap_or(raw).to_string(),
    };
    let coda = match &caps[3] {
        "" => String::new(),
        raw => lookup(CODAS, raw).unwrap_or(raw).to_string(),
    };
    let tone = match caps[4].as_bytes().first() {
        Some(d) => TONE_MARKS[(d - b'0') as usize - 1],
        None => "",
    };

    format!("{initial}{nucleus}{coda}{tone}")
}
