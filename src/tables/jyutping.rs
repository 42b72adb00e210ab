//! Jyutping inventory.

use super::Syllabary;

pub static INITIALS: &[&str] = &[
    "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "ng", "h", "gw", "kw", "w", "z", "c", "s",
    "j",
];

pub static FINALS: &[&str] = &[
    "a", "aa", "aai", "aau", "aam", "aan", "aang", "aap", "aat", "aak", "ai", "au", "am", "an",
    "ang", "ap", "at", "ak", "e", "ei", "eu", "em", "en", "eng", "ep", "ek", "i", "iu", "im", "in",
    "ing", "ip", "it", "ik", "o", "oi", "ou", "on", "ong", "ot", "ok", "u", "ui", "un", "ung",
    "ut", "uk", "oe", "oet", "eoi", "eon", "oeng", "eot", "oek", "yu", "yun", "yut", "m", "ng",
];

pub static TONES: &[u8] = &[1, 2, 3, 4, 5, 6];

pub static JYUTPING: Syllabary = Syllabary {
    initials: INITIALS,
    finals: FINALS,
    tones: TONES,
    initials_double_as_finals: true,
    erhua: false,
};
