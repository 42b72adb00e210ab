//! Pinyin → Mandarin Sinological IPA.
//!
//! The only converter that needs context beyond one syllable: tone
//! realization depends on the neighbors (third-tone sandhi, 4→4, and the
//! neutral tone borrowing its contour from the previous syllable). Tones are
//! precomputed for the whole sequence first, then each syllable is rewritten
//! with one-syllable lookahead/lookback into the table.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::{is_passthrough, pinyin_syllables};
use crate::tables::pinyin::TONES;

static SYLLABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([bcdfghjklmnpqrstxz]?h?)(.+)$").unwrap());
static CLOSE_FRONT_ROUNDED: Lazy<Regex> = Lazy::new(|| Regex::new(r"([jqx])u").unwrap());

/// Tone-bearing-vowel-initial syllables take a glottal stop onset.
static GLOTTAL: &[&str] = &[
    "a", "o", "e", "ai", "ei", "ao", "ou", "an", "en", "er", "ang", "ong", "eng",
];

static INITIALS: &[(&str, &str)] = &[
    ("b", "p"),
    ("c", "t͡sʰ"),
    ("ch", "ʈ͡ʂʰ"),
    ("d", "t"),
    ("f", "f"),
    ("g", "k"),
    ("h", "x"),
    ("j", "t͡ɕ"),
    ("k", "kʰ"),
    ("l", "l"),
    ("m", "m"),
    ("n", "n"),
    ("ng", "ŋ"),
    ("p", "pʰ"),
    ("q", "t͡ɕʰ"),
    ("r", "ʐ"),
    ("s", "s"),
    ("sh", "ʂ"),
    ("t", "tʰ"),
    ("x", "ɕ"),
    ("z", "t͡s"),
    ("zh", "ʈ͡ʂ"),
];

/// Neutral-tone onsets devoice.
static VOICELESS_INITIALS: &[(&str, &str)] = &[
    ("k", "g̊"),
    ("p", "b̥"),
    ("t", "d̥"),
    ("t͡s", "d͡z̥"),
    ("t͡ɕ", "d͡ʑ̥"),
    ("ʈ͡ʂ", "ɖ͡ʐ̥"),
];

static FINALS: &[(&str, &str)] = &[
    ("a", "ä"),
    ("ai", "aɪ̯"),
    ("air", "ɑɻ"),
    ("an", "än"),
    ("ang", "ɑŋ"),
    ("angr", "ɑ̃ɻ"),
    ("anr", "ɑɻ"),
    ("ao", "ɑʊ̯"),
    ("aor", "aʊ̯ɻʷ"),
    ("ar", "ɑɻ"),
    ("e", "ɤ"),
    ("ei", "eɪ̯"),
    ("eir", "əɻ"),
    ("en", "ən"),
    ("eng", "ɤŋ"),
    ("engr", "ɤ̃ɻ"),
    ("enr", "ʊ̃ɻ"),
    ("er", "ɤɻ"),
    ("i", "i"),
    ("ia", "jä"),
    ("ian", "jɛn"),
    ("iang", "jɑŋ"),
    ("iangr", "jɑ̃ɻ"),
    ("ianr", "jɑɻ"),
    ("iao", "jɑʊ̯"),
    ("iaor", "jaʊ̯ɻʷ"),
    ("iar", "jɑɻ"),
    ("ie", "jɛ"),
    ("ier", "jɛɻ"),
    ("in", "in"),
    ("ing", "iŋ"),
    ("ingr", "iɤ̯̃ɻ"),
    ("inr", "iə̯ɻ"),
    ("io", "jɔ"),
    ("iong", "jʊŋ"),
    ("iongr", "jʊ̃ɻ"),
    ("ir", "iə̯ɻ"),
    ("iu", "joʊ̯"),
    ("iur", "jɤʊ̯ɻʷ"),
    ("m", "m̩"),
    ("n", "n̩"),
    ("ng", "ŋ̍"),
    ("o", "wɔ"),
    ("ong", "ʊŋ"),
    ("ongr", "ʊ̃ɻ"),
    ("or", "wɔɻ"),
    ("ou", "oʊ̯"),
    ("our", "ɤʊ̯ɻʷ"),
    ("u", "u"),
    ("ua", "u̯ä"),
    ("uai", "waɪ̯"),
    ("uair", "wɑɻ"),
    ("uan", "wän"),
    ("uang", "wɑŋ"),
    ("uangr", "wɑ̃ɻ"),
    ("uanr", "wɑɻ"),
    ("uar", "u̯ɑɻ"),
    ("ue", "ɥɛ"),
    ("ui", "weɪ̯"),
    ("uir", "wəɻ"),
    ("un", "wən"),
    ("unr", "wəɻ"),
    ("uo", "wɔ"),
    ("uor", "wɔɻ"),
    ("ur", "uɻʷ"),
    ("v", "y"),
    ("van", "ɥɛn"),
    ("vanr", "ɥɑɻ"),
    ("ve", "ɥɛ"),
    ("ver", "ɥɛɻ"),
    ("vn", "yn"),
    ("vnr", "yə̯ɻ"),
    ("vr", "yə̯ɻ"),
    ("wa", "wä"),
    ("wai", "waɪ̯"),
    ("wair", "wɑɻ"),
    ("wan", "wän"),
    ("wang", "wɑŋ"),
    ("wangr", "wɑ̃ɻ"),
    ("wanr", "wɑɻ"),
    ("war", "wɑɻ"),
    ("wei", "weɪ̯"),
    ("weir", "wəɻ"),
    ("wen", "wən"),
    ("weng", "wəŋ"),
    ("wengr", "ʊ̃ɻ"),
    ("wenr", "wəɻ"),
    ("wo", "wɔ"),
    ("wor", "wɔɻ"),
    ("wu", "u"),
    ("wur", "uɻʷ"),
    ("ya", "jä"),
    ("yai", "jaɪ̯"),
    ("yan", "jɛn"),
    ("yang", "jɑŋ"),
    ("yangr", "jɑ̃ɻ"),
    ("yanr", "jɑɻ"),
    ("yao", "jɑʊ̯"),
    ("yaor", "jaʊ̯ɻʷ"),
    ("yar", "jɑɻ"),
    ("ye", "jɛ"),
    ("yer", "jɛɻ"),
    ("yi", "i"),
    ("yin", "in"),
    ("ying", "iŋ"),
    ("yingr", "iɤ̯̃ɻ"),
    ("yinr", "iə̯ɻ"),
    ("yir", "iə̯ɻ"),
    ("yo", "jɔ"),
    ("yong", "jʊŋ"),
    ("yongr", "jʊ̃ɻ"),
    ("yor", "jɔɻ"),
    ("you", "joʊ̯"),
    ("your", "jɤʊ̯ɻʷ"),
    ("yu", "y"),
    ("yuan", "ɥɛn"),
    ("yuanr", "ɥɑɻ"),
    ("yue", "ɥɛ"),
    ("yuer", "ɥɛɻ"),
    ("yun", "yn"),
    ("yunr", "yə̯ɻ"),
    ("yur", "yə̯ɻ"),
];

/// Neutral-tone contour, selected by the previous syllable's tone.
static NEUTRAL_TONE: &[&str] = &["˨", "˧", "˦", "˩", "˩"];

/// Third-tone contour, selected by the next syllable's tone; the last entry
/// is the no-sandhi variant.
static THIRD_TONE: &[&str] = &["˨˩˦꜕꜖꜖", "˨˩˦꜕꜖꜖", "˨˩˦꜔꜒", "˨˩˦꜕꜖꜖", "˨˩˦"];

static TONE_MARKS: &[&str] = &["˥˥", "˧˥", "˨˩˦", "˥˩", ""];

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// A syllable's place in the tone-sandhi context.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Neighbor {
    /// Start or end of the utterance.
    Boundary,
    /// A neighboring token without a recognized tone.
    Toneless,
    Tone(u8),
}

/// Convert a string of raw Pinyin syllables to Mandarin Sinological IPA.
pub fn pinyin_to_ipa(pinyin: &str, use_spaces_to_segment: bool) -> String {
    let syllables = pinyin_syllables(pinyin, use_spaces_to_segment);

    // Pass 1: tone and tone-digit position per syllable.
    let tone_info: Vec<Option<(u8, usize)>> = syllables
        .iter()
        .map(|syllable| {
            TONES.iter().find_map(|&t| {
                syllable
                    .find(char::from(b'0' + t))
                    .map(|idx| (t, idx))
            })
        })
        .collect();

    let neighbor = |idx: Option<usize>| -> Neighbor {
        match idx {
            None => Neighbor::Boundary,
            Some(i) => match tone_info[i] {
                Some((t, _)) => Neighbor::Tone(t),
                None => Neighbor::Toneless,
            },
        }
    };

    // Pass 2: rewrite each syllable with neighbor lookups.
    let mut converted = Vec::with_capacity(syllables.len());
    for (idx, syllable) in syllables.iter().enumerate() {
        if is_passthrough(syllable) {
            converted.push(syllable.clone());
            continue;
        }
        let (tone, tone_idx) = match tone_info[idx] {
            Some(info) => info,
            None => {
                converted.push(syllable.clone());
                continue;
            }
        };

        let mut without_tone = String::with_capacity(syllable.len());
        for (i, c) in syllable.char_indices() {
            if i != tone_idx {
                without_tone.push(c);
            }
        }

        let glottal = if GLOTTAL.contains(&without_tone.as_str()) {
            "ˀ"
        } else {
            ""
        };

        without_tone = without_tone.replace("u:", "v");
        without_tone = CLOSE_FRONT_ROUNDED
            .replace_all(&without_tone, "${1}v")
            .into_owned();

        let (mut initial, mut final_) = convert_syllable(&without_tone);

        let next = neighbor(if idx + 1 < syllables.len() { Some(idx + 1) } else { None });
        let prev = neighbor(if idx > 0 { Some(idx - 1) } else { None });

        let tone_mark = match tone {
            5 => {
                if let Some(voiceless) = lookup(VOICELESS_INITIALS, &initial) {
                    initial = voiceless.to_string();
                }
                if final_ == "ɤ" {
                    final_ = "ə".to_string();
                }
                match prev {
                    Neighbor::Boundary => "",
                    Neighbor::Tone(t) => NEUTRAL_TONE[t as usize - 1],
                    // A toneless neighbor selects the table's tone-4 row.
                    Neighbor::Toneless => NEUTRAL_TONE[3],
                }
            }
            3 => {
                if idx == syllables.len() - 1 {
                    // Utterance-final tone 3 drops its rising part.
                    if idx == 0 {
                        "˨˩˦"
                    } else {
                        "˨˩˦꜕꜖(꜓)"
                    }
                } else {
                    match next {
                        Neighbor::Tone(t) => THIRD_TONE[t as usize - 1],
                        _ => THIRD_TONE[4],
                    }
                }
            }
            4 => {
                if next == Neighbor::Tone(4) {
                    "˥˩꜒꜔"
                } else {
                    TONE_MARKS[3]
                }
            }
            t => TONE_MARKS[t as usize - 1],
        };

        let composed: String = format!("{glottal}{initial}{final_}{tone_mark}")
            .nfc()
            .collect();
        converted.push(composed);
    }

    converted.join(" ")
}

/// Split a tone-stripped syllable into (initial, final) IPA. When either
/// half is missing from the tables, the raw halves come back unconverted.
fn convert_syllable(syllable: &str) -> (String, String) {
    if syllable == "ng" {
        return (String::new(), lookup(FINALS, "ng").unwrap_or("ng").to_string());
    }

    let caps = match SYLLABLE.captures(syllable) {
        Some(c) => c,
        None => return (String::new(), syllable.to_string()),
    };
    let raw_initial = &caps[1];
    let raw_final = &caps[2];

    let initial = if raw_initial.is_empty() {
        Some("")
    } else {
        lookup(INITIALS, raw_initial)
    };
    let final_ = if raw_final.is_empty() {
        Some("")
    } else {
        lookup(FINALS, raw_final)
    };
    let (mut initial, mut final_) = match (initial, final_) {
        (Some(i), Some(f)) => (i.to_string(), f.to_string()),
        _ => return (raw_initial.to_string(), raw_final.to_string()),
    };

    // Apical vowels: the written `i` is a syllabic fricative after the
    // retroflex and alveolar sibilant series.
    if matches!(initial.as_str(), "ʈ͡ʂʰ" | "ʂ" | "ʈ͡ʂ" | "ʐ") {
        if final_ == "iə̯ɻ" && raw_final == "ir" {
            final_ = "ʐ̩ɻ".to_string();
        } else if final_ == "i" {
            final_ = "ʐ̩".to_string();
        }
    }
    if matches!(initial.as_str(), "t͡sʰ" | "s" | "t͡s") {
        if final_ == "iə̯ɻ" && raw_final == "ir" {
            final_ = "z̩ɻ".to_string();
        } else if final_ == "i" {
            final_ = "z̩̩".to_string();
        }
    }

    if initial == "ʐ" && final_ == "ʐ̩" {
        initial = String::new();
    }

    (initial, final_)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        assert_eq!(pinyin_to_ipa("ba1 da2 tong1", false), "pä˥˥ tä˧˥ tʰʊŋ˥˥");
    }

    #[test]
    fn test_reject_no_tone() {
        assert_eq!(pinyin_to_ipa("ba", false), "ba");
    }

    #[test]
    fn test_reject_single_letter() {
        assert_eq!(pinyin_to_ipa("a", false), "a");
    }

    #[test]
    fn test_reject_special_character() {
        assert_eq!(pinyin_to_ipa("-", false), "-");
    }

    #[test]
    fn test_no_spaces() {
        assert_eq!(pinyin_to_ipa("ba1da2tong1", false), "pä˥˥ tä˧˥ tʰʊŋ˥˥");
    }

    #[test]
    fn test_use_spaces_to_segment() {
        assert_eq!(pinyin_to_ipa("ba1 da2 tong1", true), "pä˥˥ tä˧˥ tʰʊŋ˥˥");
    }

    #[test]
    fn test_special_case_ng() {
        assert_eq!(pinyin_to_ipa("ng5", false), "ŋ̍");
    }

    #[test]
    fn test_special_case_ri() {
        assert_eq!(pinyin_to_ipa("ri4", false), "ʐ̩˥˩");
    }

    #[test]
    fn test_syllable_with_v() {
        assert_eq!(pinyin_to_ipa("nv3", false), "ny˨˩˦");
        assert_eq!(pinyin_to_ipa("qu4", false), "t͡ɕʰy˥˩");
    }

    #[test]
    fn test_voiceless_initial() {
        assert_eq!(pinyin_to_ipa("ge5", false), "g̊ə");
        assert_eq!(pinyin_to_ipa("yi1 ge5", false), "i˥˥ g̊ə˨");
    }

    #[test]
    fn test_tone_three() {
        assert_eq!(pinyin_to_ipa("ke3", false), "kʰɤ˨˩˦");
        assert_eq!(pinyin_to_ipa("ke3 yi3", false), "kʰɤ˨˩˦꜔꜒ i˨˩˦꜕꜖(꜓)");
    }

    #[test]
    fn test_tone_four() {
        assert_eq!(pinyin_to_ipa("xia4 qu4", false), "ɕjä˥˩꜒꜔ t͡ɕʰy˥˩");
        assert_eq!(pinyin_to_ipa("xia4", false), "ɕjä˥˩");
    }

    #[test]
    fn test_other_tone() {
        assert_eq!(pinyin_to_ipa("ma1", false), "mä˥˥");
        assert_eq!(pinyin_to_ipa("ma2", false), "mä˧˥");
        assert_eq!(pinyin_to_ipa("ma5", false), "mä");
    }

    #[test]
    fn test_erhua() {
        assert_eq!(pinyin_to_ipa("huar1", false), "xu̯ɑɻ˥˥");
        assert_eq!(pinyin_to_ipa("quanr1", false), "t͡ɕʰɥɑɻ˥˥");
    }
}
