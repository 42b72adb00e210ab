//! Pinyin → Zhuyin/Bopomofo.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{find_tone, is_passthrough, pinyin_syllables, pinyin_with_v};
use crate::tables::pinyin::TONES;

/// `j/q/x + u` is the close front rounded vowel; apical-vowel initials
/// absorb their `i` entirely.
static PREPROCESS_INITIALS: Lazy<Vec<(Regex, &str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"([jqx])u").unwrap(), "${1}v"),
        (Regex::new(r"([zcs]h?)i").unwrap(), "${1}"),
        (Regex::new(r"(r)i").unwrap(), "${1}"),
    ]
});

/// Whole-syllable specials rewritten before the general tables apply.
static PREPROCESS_FINALS: Lazy<Vec<(Regex, &str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"^ng([012345])$").unwrap(), "ㄫ${1}"),
        (Regex::new(r"^hm([012345])$").unwrap(), "ㄏㄇ${1}"),
        (Regex::new(r"^hng([012345])$").unwrap(), "ㄏㄫ${1}"),
        (Regex::new(r"^er([012345])$").unwrap(), "ㄦ${1}"),
    ]
});

static INITIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([bpmfdtnlgkhjqxzcsr]?h?)").unwrap());
static FINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([aeiouêvyw]?[aeioun]?[aeioung]?[ng]?)(r?)([012345])$").unwrap());

static INITIALS: &[(&str, &str)] = &[
    ("b", "ㄅ"),
    ("p", "ㄆ"),
    ("m", "ㄇ"),
    ("f", "ㄈ"),
    ("d", "ㄉ"),
    ("t", "ㄊ"),
    ("n", "ㄋ"),
    ("l", "ㄌ"),
    ("g", "ㄍ"),
    ("k", "ㄎ"),
    ("h", "ㄏ"),
    ("j", "ㄐ"),
    ("q", "ㄑ"),
    ("x", "ㄒ"),
    ("z", "ㄗ"),
    ("c", "ㄘ"),
    ("s", "ㄙ"),
    ("r", "ㄖ"),
    ("zh", "ㄓ"),
    ("ch", "ㄔ"),
    ("sh", "ㄕ"),
];

static FINALS: &[(&str, &str)] = &[
    ("yuan", "ㄩㄢ"),
    ("iang", "ㄧㄤ"),
    ("yang", "ㄧㄤ"),
    ("uang", "ㄨㄤ"),
    ("wang", "ㄨㄤ"),
    ("ying", "ㄧㄥ"),
    ("weng", "ㄨㄥ"),
    ("iong", "ㄩㄥ"),
    ("yong", "ㄩㄥ"),
    ("uai", "ㄨㄞ"),
    ("wai", "ㄨㄞ"),
    ("yai", "ㄧㄞ"),
    ("iao", "ㄧㄠ"),
    ("yao", "ㄧㄠ"),
    ("ian", "ㄧㄢ"),
    ("yan", "ㄧㄢ"),
    ("uan", "ㄨㄢ"),
    ("wan", "ㄨㄢ"),
    ("van", "ㄩㄢ"),
    ("ang", "ㄤ"),
    ("yue", "ㄩㄝ"),
    ("wei", "ㄨㄟ"),
    ("you", "ㄧㄡ"),
    ("yin", "ㄧㄣ"),
    ("wen", "ㄨㄣ"),
    ("yun", "ㄩㄣ"),
    ("eng", "ㄥ"),
    ("ing", "ㄧㄥ"),
    ("ong", "ㄨㄥ"),
    ("io", "ㄧㄛ"),
    ("yo", "ㄧㄛ"),
    ("ia", "ㄧㄚ"),
    ("ya", "ㄧㄚ"),
    ("ua", "ㄨㄚ"),
    ("wa", "ㄨㄚ"),
    ("ai", "ㄞ"),
    ("ao", "ㄠ"),
    ("an", "ㄢ"),
    ("ie", "ㄧㄝ"),
    ("ye", "ㄧㄝ"),
    ("uo", "ㄨㄛ"),
    ("wo", "ㄨㄛ"),
    ("ue", "ㄩㄝ"),
    ("ve", "ㄩㄝ"),
    ("ei", "ㄟ"),
    ("ui", "ㄨㄟ"),
    ("ou", "ㄡ"),
    ("iu", "ㄧㄡ"),
    ("en", "ㄣ"),
    ("in", "ㄧㄣ"),
    ("un", "ㄨㄣ"),
    ("vn", "ㄩㄣ"),
    ("yi", "ㄧ"),
    ("wu", "ㄨ"),
    ("yu", "ㄩ"),
    ("a", "ㄚ"),
    ("e", "ㄜ"),
    ("o", "ㄛ"),
    ("i", "ㄧ"),
    ("u", "ㄨ"),
    ("v", "ㄩ"),
    ("ê", "ㄝ"),
];

/// Indexed by tone value; the neutral tone mark is prefixed, not appended.
static TONE_MARKS: &[&str] = &["", "", "ˊ", "ˇ", "ˋ", "˙"];

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Convert a string of raw Pinyin syllables to Zhuyin.
pub fn pinyin_to_zhuyin(pinyin: &str, use_spaces_to_segment: bool) -> String {
    let syllables = pinyin_syllables(pinyin, use_spaces_to_segment);
    let mut converted = Vec::with_capacity(syllables.len());

    for syllable in &syllables {
        if is_passthrough(syllable) {
            converted.push(syllable.clone());
            continue;
        }
        let tone = match find_tone(syllable, TONES) {
            Some(t) => t as usize,
            None => {
                converted.push(syllable.clone());
                continue;
            }
        };

        let mut s = pinyin_with_v(syllable);
        for (rule, replacement) in PREPROCESS_INITIALS.iter() {
            s = rule.replace_all(&s, *replacement).into_owned();
        }
        for (rule, replacement) in PREPROCESS_FINALS.iter() {
            s = rule.replace_all(&s, *replacement).into_owned();
        }

        let initial_key = INITIAL.captures(&s).map(|caps| caps[1].to_string());
        if let Some(key) = initial_key.filter(|k| !k.is_empty()) {
            if let Some(zhuyin_initial) = lookup(INITIALS, &key) {
                s = INITIAL.replace(&s, zhuyin_initial).into_owned();
            }
        }

        let final_parts = FINAL
            .captures(&s)
            .map(|caps| (caps[1].to_string(), !caps[2].is_empty()));
        if let Some((key, erhua)) = final_parts {
            let final_ = if key.is_empty() {
                ""
            } else {
                match lookup(FINALS, &key) {
                    Some(f) => f,
                    None => {
                        // Unknown final: give the syllable up as-is.
                        converted.push(s);
                        continue;
                    }
                }
            };
            let er = if erhua { "ㄦ" } else { "" };
            let replacement = format!("{final_}{er}");
            s = FINAL.replace(&s, replacement.as_str()).into_owned();
        }

        if tone == 5 {
            s = format!("{}{s}", TONE_MARKS[5]);
        } else if let Some(er_idx) = s.find('ㄦ').filter(|_| s != "ㄦ") {
            s.insert_str(er_idx, TONE_MARKS[tone]);
        } else {
            s.push_str(TONE_MARKS[tone]);
        }

        converted.push(s);
    }

    converted.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        assert_eq!(pinyin_to_zhuyin("ba1 da2 tong1", false), "ㄅㄚ ㄉㄚˊ ㄊㄨㄥ");
    }

    #[test]
    fn test_reject_no_tone() {
        assert_eq!(pinyin_to_zhuyin("ba", false), "ba");
    }

    #[test]
    fn test_reject_single_letter() {
        assert_eq!(pinyin_to_zhuyin("a", false), "a");
    }

    #[test]
    fn test_reject_special_character() {
        assert_eq!(pinyin_to_zhuyin("-", false), "-");
    }

    #[test]
    fn test_no_spaces() {
        assert_eq!(pinyin_to_zhuyin("ba1da2tong1", false), "ㄅㄚ ㄉㄚˊ ㄊㄨㄥ");
    }

    #[test]
    fn test_use_spaces_to_segment() {
        assert_eq!(pinyin_to_zhuyin("ba1 da2 tong1", true), "ㄅㄚ ㄉㄚˊ ㄊㄨㄥ");
    }

    #[test]
    fn test_special_initials() {
        assert_eq!(pinyin_to_zhuyin("qu4", false), "ㄑㄩˋ");
        assert_eq!(pinyin_to_zhuyin("chi1", false), "ㄔ");
        assert_eq!(pinyin_to_zhuyin("ri4", false), "ㄖˋ");
    }

    #[test]
    fn test_special_finals() {
        assert_eq!(pinyin_to_zhuyin("hm5", false), "˙ㄏㄇ");
        assert_eq!(pinyin_to_zhuyin("hng5", false), "˙ㄏㄫ");
        assert_eq!(pinyin_to_zhuyin("er2", false), "ㄦˊ");
    }

    #[test]
    fn test_erhua() {
        assert_eq!(pinyin_to_zhuyin("quanr1", false), "ㄑㄩㄢㄦ");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(pinyin_to_zhuyin("chzng2 quanr1", false), "ㄔzng2 ㄑㄩㄢㄦ");
    }
}
