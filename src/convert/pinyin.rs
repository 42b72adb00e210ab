//! Raw database Pinyin (`u:` umlaut escape, digit tones) to display forms.

use super::{find_tone, is_passthrough};
use crate::tables::pinyin::TONES;

/// Diacritic lands on the first of these, in left-to-right order...
static PRIORITY_VOWELS: &[char] = &['a', 'e', 'o'];
/// ...otherwise on the last of these.
static SECONDARY_VOWELS: &[char] = &['i', 'u', 'ü'];

static TONE_VOWELS: &[(char, [&str; 5])] = &[
    ('a', ["ā", "á", "ǎ", "à", "a"]),
    ('e', ["ē", "é", "ě", "è", "e"]),
    ('i', ["ī", "í", "ǐ", "ì", "i"]),
    ('o', ["ō", "ó", "ǒ", "ò", "o"]),
    ('u', ["ū", "ú", "ǔ", "ù", "u"]),
    ('ü', ["ǖ", "ǘ", "ǚ", "ǜ", "ü"]),
];

/// Conventional Hanyu Pinyin: `u:` becomes `ü`, the tone digit becomes a
/// diacritic. Syllables without a tone digit or a placeable vowel pass
/// through unchanged.
pub fn pretty_pinyin(pinyin: &str) -> String {
    let mut converted = Vec::new();

    for syllable in pinyin.split_whitespace() {
        if is_passthrough(syllable) {
            converted.push(syllable.to_string());
            continue;
        }
        let tone = match find_tone(syllable, TONES) {
            Some(t) => t as usize,
            None => {
                converted.push(syllable.to_string());
                continue;
            }
        };

        let mut s = syllable.replace("u:", "ü");

        let mut target: Option<(usize, char)> = None;
        for &vowel in PRIORITY_VOWELS {
            if let Some(idx) = s.find(vowel) {
                if target.map_or(true, |(best, _)| idx < best) {
                    target = Some((idx, vowel));
                }
            }
        }
        if target.is_none() {
            for &vowel in SECONDARY_VOWELS {
                if let Some(idx) = s.rfind(vowel) {
                    if target.map_or(true, |(best, _)| idx > best) {
                        target = Some((idx, vowel));
                    }
                }
            }
        }
        let (idx, vowel) = match target {
            Some(t) => t,
            None => {
                converted.push(s);
                continue;
            }
        };

        if let Some((_, forms)) = TONE_VOWELS.iter().find(|(v, _)| *v == vowel) {
            s.replace_range(idx..idx + vowel.len_utf8(), forms[tone - 1]);
        }

        // Drop the tone digit.
        s.pop();
        converted.push(s);
    }

    converted.join(" ")
}

/// `u:` rendered as `ü`, tone digits kept.
pub fn numbered_pinyin(pinyin: &str) -> String {
    pinyin.replace("u:", "ü")
}

/// `u:` rendered as `v`, tone digits kept.
pub fn pinyin_with_v(pinyin: &str) -> String {
    pinyin.replace("u:", "v")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        assert_eq!(pretty_pinyin("shuai4 ge1"), "shuài gē");
    }

    #[test]
    fn test_reject_no_tone() {
        assert_eq!(pretty_pinyin("ba"), "ba");
        assert_eq!(pretty_pinyin("nu"), "nu");
    }

    #[test]
    fn test_reject_single_letter() {
        assert_eq!(pretty_pinyin("a"), "a");
    }

    #[test]
    fn test_reject_special_character() {
        assert_eq!(pretty_pinyin("-"), "-");
    }

    #[test]
    fn test_secondary_vowel() {
        assert_eq!(pretty_pinyin("hui4 tu2"), "huì tú");
    }

    #[test]
    fn test_umlaut() {
        assert_eq!(pretty_pinyin("nu:3 hai2"), "nǚ hái");
    }

    #[test]
    fn test_tones() {
        assert_eq!(pretty_pinyin("ma1 ma2 ma3 ma4"), "mā má mǎ mà");
    }

    #[test]
    fn test_neutral_tone_has_no_diacritic() {
        assert_eq!(pretty_pinyin("ma5"), "ma");
    }

    #[test]
    fn test_no_placeable_vowel() {
        assert_eq!(pretty_pinyin("hm5"), "hm5");
    }

    #[test]
    fn test_numbered() {
        assert_eq!(numbered_pinyin("nu:3 hai2"), "nü3 hai2");
    }

    #[test]
    fn test_with_v() {
        assert_eq!(pinyin_with_v("nu:3 hai2"), "nv3 hai2");
    }
}
