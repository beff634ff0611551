//! Sentence segmentation.
//!
//! Boundaries follow Unicode UAX #29, which knows about full-width
//! terminators (`。！？`) as well as ASCII ones and does not split inside
//! `U.S.`-style abbreviations. Segments are trimmed and blank ones dropped;
//! nothing else is removed, so joining every sentence gives back all of the
//! input's non-whitespace characters.

use unicode_segmentation::{USentenceBounds, UnicodeSegmentation};

/// Lazy iterator over the sentences of a text.
///
/// Cheap to clone: a clone resumes from the same position, so cloning
/// before consuming lets a caller walk the remaining sentences twice.
#[derive(Clone)]
pub struct Sentences<'a> {
    inner: USentenceBounds<'a>,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .map(str::trim)
            .find(|sentence| !sentence.is_empty())
    }
}

/// Segment `text` into sentences, lazily.
pub fn sentences(text: &str) -> Sentences<'_> {
    Sentences {
        inner: text.split_sentence_bounds(),
    }
}

/// Segment `text` into owned sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    sentences(text).map(str::to_string).collect()
}

/// Whether a sentence contains CJK ideographs or kana.
pub fn is_cjk_text(text: &str) -> bool {
    text.chars().any(is_cjk_char)
}

pub(crate) fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'   // hiragana, katakana
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{F900}'..='\u{FAFF}' // compatibility ideographs
        | '\u{FF66}'..='\u{FF9F}' // half-width katakana
        | '\u{AC00}'..='\u{D7AF}' // hangul
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strip_ws(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\n\t")]
    fn test_blank_input_yields_nothing(#[case] input: &str) {
        assert_eq!(sentences(input).count(), 0);
    }

    #[test]
    fn test_ascii_sentences() {
        assert_eq!(split_sentences("A. B. C."), vec!["A.", "B.", "C."]);
    }

    #[test]
    fn test_japanese_sentences() {
        let got = split_sentences("今日は晴れです。明日は雨でしょう！本当ですか？はい。");
        assert_eq!(
            got,
            vec!["今日は晴れです。", "明日は雨でしょう！", "本当ですか？", "はい。"]
        );
    }

    #[test]
    fn test_abbreviation_is_not_a_boundary() {
        let got = split_sentences("The U.S. team won. Fans cheered.");
        assert_eq!(got, vec!["The U.S. team won.", "Fans cheered."]);
    }

    #[test]
    fn test_trailing_fragment_is_kept() {
        let got = split_sentences("First one. and a tail without stop");
        assert!(got.last().unwrap().ends_with("without stop"));
    }

    #[rstest]
    #[case("A. B. C.")]
    #[case("今日は晴れです。明日は雨でしょう！本当ですか？")]
    #[case("Mixed 文章です。 And English too!  \n\n Last line")]
    #[case("no terminal punctuation at all")]
    fn test_no_content_loss(#[case] input: &str) {
        let joined: String = sentences(input).collect();
        assert_eq!(strip_ws(&joined), strip_ws(input));
    }

    #[test]
    fn test_every_sentence_is_trimmed_and_non_empty() {
        for s in sentences("  One.   Two!\n\n  Three?  ") {
            assert!(!s.is_empty());
            assert_eq!(s, s.trim());
        }
    }

    #[test]
    fn test_clone_resumes_from_same_point() {
        let mut iter = sentences("One. Two. Three.");
        assert_eq!(iter.next(), Some("One."));
        let rest: Vec<_> = iter.clone().collect();
        assert_eq!(rest, vec!["Two.", "Three."]);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_cjk_detection() {
        assert!(is_cjk_text("これはテスト"));
        assert!(is_cjk_text("mixed 漢字"));
        assert!(!is_cjk_text("plain ascii."));
    }
}
