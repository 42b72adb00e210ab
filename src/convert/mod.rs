//! Per-syllable notation converters.
//!
//! Every converter maps syllables independently (Mandarin IPA alone needs
//! neighbor context, for tone sandhi) and rejoins with single spaces.
//! Anything that is not a convertible syllable (punctuation, single
//! characters, syllables without a tone digit) passes through unchanged,
//! so partial or garbled input survives a conversion round trip.

mod jyutping_ipa;
mod pinyin;
mod pinyin_ipa;
mod yale;
mod zhuyin;

pub use jyutping_ipa::jyutping_to_ipa;
pub use pinyin::{numbered_pinyin, pinyin_with_v, pretty_pinyin};
pub use pinyin_ipa::pinyin_to_ipa;
pub use yale::jyutping_to_yale;
pub use zhuyin::pinyin_to_zhuyin;

use crate::segment::{segment_jyutping, segment_pinyin, SegmentOptions};
use crate::tables;

/// Tones present in a Jyutping string, in order of appearance.
pub fn extract_jyutping_tones(jyutping: &str) -> Vec<u8> {
    extract_tones(jyutping, tables::jyutping::TONES)
}

/// Tones present in a raw Pinyin string, in order of appearance.
pub fn extract_pinyin_tones(pinyin: &str) -> Vec<u8> {
    extract_tones(pinyin, tables::pinyin::TONES)
}

fn extract_tones(input: &str, tones: &[u8]) -> Vec<u8> {
    input
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .filter(|d| tones.contains(d))
        .collect()
}

/// The lowest tone digit present anywhere in the syllable, if any.
pub(crate) fn find_tone(syllable: &str, tones: &[u8]) -> Option<u8> {
    tones
        .iter()
        .copied()
        .find(|&t| syllable.contains(char::from(b'0' + t)))
}

/// Single characters and special-character tokens are never syllables.
/// (Every special character is a single char, so one check covers both.)
pub(crate) fn is_passthrough(text: &str) -> bool {
    text.chars().nth(1).is_none()
}

/// Syllable texts for the Jyutping converters: scanner-segmented by default,
/// whitespace-split (with special characters padded out) when the caller
/// asserts pre-segmented input.
pub(crate) fn jyutping_syllables(input: &str, use_spaces_to_segment: bool) -> Vec<String> {
    if use_spaces_to_segment {
        let mut padded = String::with_capacity(input.len());
        for c in input.chars() {
            if tables::is_special(c) {
                padded.push(' ');
                padded.push(c);
                padded.push(' ');
            } else {
                padded.push(c);
            }
        }
        padded.split_whitespace().map(str::to_string).collect()
    } else {
        let opts = SegmentOptions {
            keep_special: true,
            keep_wildcards: true,
            keep_dsl: false,
        };
        segment_jyutping(input, opts)
            .tokens
            .into_iter()
            .map(|t| t.into_text())
            .collect()
    }
}

/// Syllable texts for the Pinyin converters, which historically drop
/// punctuation and wildcards during segmentation.
pub(crate) fn pinyin_syllables(input: &str, use_spaces_to_segment: bool) -> Vec<String> {
    if use_spaces_to_segment {
        input.split_whitespace().map(str::to_string).collect()
    } else {
        segment_pinyin(input, SegmentOptions::default())
            .tokens
            .into_iter()
            .map(|t| t.into_text())
            .collect()
    }
}
