//! Romanization engine for a Cantonese/Mandarin dictionary.
//!
//! The crate tokenizes raw phonetic input (Jyutping, Pinyin) into syllables,
//! converts syllables between notations (Yale, Sinological IPA,
//! Zhuyin/Bopomofo, display Pinyin), corrects common mis-romanizations, and
//! compiles user queries into patterns a text-search backend can evaluate
//! exactly (GLOB) or approximately (regex).
//!
//! Everything is a pure function over immutable inputs; the only shared
//! state is the compiled-in syllable tables, built once and never mutated.
//! Malformed input degrades to passthrough rather than erroring: the worst
//! outcome is an unhelpful search pattern, never a failure.

pub mod ambig;
pub mod autocorrect;
pub mod convert;
pub mod query;
pub mod segment;
pub mod soundchange;
pub mod tables;

pub use ambig::{unfold, AmbigError};
pub use autocorrect::jyutping_autocorrect;
pub use convert::{
    extract_jyutping_tones, extract_pinyin_tones, jyutping_to_ipa, jyutping_to_yale,
    numbered_pinyin, pinyin_to_ipa, pinyin_to_zhuyin, pinyin_with_v, pretty_pinyin,
};
pub use query::{
    compile_query, construct_romanization_query, CompiledPattern, Matcher, Romanization,
};
pub use segment::{segment_jyutping, segment_pinyin, SegmentOptions, SegmentationResult, Token};
pub use soundchange::{jyutping_sound_changes, pinyin_sound_changes};

#[cfg(test)]
mod tests {
    use super::*;

    // End-to-end checks across the module seams; the per-module suites
    // carry the detailed fixtures.

    #[test]
    fn test_segment_then_convert() {
        let segmented = segment_jyutping("si1zi2saan1", SegmentOptions::default());
        assert!(segmented.valid);
        let joined = segmented.texts().join(" ");
        assert_eq!(jyutping_to_yale(&joined, true), "sī jí sāan");
    }

    #[test]
    fn test_autocorrect_unfolds_through_segmenter() {
        let corrected = jyutping_autocorrect("gui");
        let opts = SegmentOptions {
            keep_dsl: true,
            ..Default::default()
        };
        let segmented = segment_jyutping(&corrected, opts);
        assert!(segmented.valid);
        assert_eq!(
            unfold(segmented.tokens[0].text()).unwrap(),
            vec!["geoi", "gui"]
        );
    }

    #[test]
    fn test_fuzzy_pipeline() {
        let compiled = compile_query("lay5 hou2", Romanization::Jyutping, true);
        assert_eq!(compiled.matcher, Matcher::Regex);
        // "lay" corrects to "lei", the n/l merger widens the onset.
        assert!(compiled.pattern.contains("(n|l)ei5"));
    }
}
