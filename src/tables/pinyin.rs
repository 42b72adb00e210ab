//! Pinyin inventory.
//!
//! Stored transcriptions escape the umlaut as `u:` (`nu:3` for nǚ), so the
//! final table carries both the bare and the escaped forms.

use super::Syllabary;

pub static INITIALS: &[&str] = &[
    "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "zh", "ch", "sh", "r",
    "z", "c", "s",
];

pub static FINALS: &[&str] = &[
    "a", "e", "ai", "ei", "ao", "ou", "an", "ang", "en", "eng", "ong", "er", "i", "ia", "ie",
    "iao", "iu", "ian", "in", "iang", "ing", "iong", "u", "ua", "uo", "uai", "ui", "uan", "un",
    "uang", "u:", "ue", "u:e", "o",
];

pub static TONES: &[u8] = &[1, 2, 3, 4, 5];

pub static PINYIN: Syllabary = Syllabary {
    initials: INITIALS,
    finals: FINALS,
    tones: TONES,
    initials_double_as_finals: false,
    erhua: true,
};
