//! East-Asian-width-aware grapheme measurement for grid layout.
//!
//! The surface and text-measurement code need to know how many terminal
//! columns a single grapheme cluster occupies (0, 1 or 2) rather than how
//! many Unicode scalar values or UTF-16 code units it spans. We delegate the
//! per-`char` classification to `unicode-width` and segment text into
//! grapheme clusters with `unicode-segmentation` so that e.g. combining
//! marks and ZWJ emoji sequences are measured as a single unit.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The terminal column width of a single grapheme cluster.
///
/// Zero-width graphemes (combining marks with no base, control characters)
/// report width 0; everything else is 1 or 2.
pub fn grapheme_width(grapheme: &str) -> u16 {
    UnicodeWidthStr::width(grapheme) as u16
}

/// The total display width of a string, summing each grapheme cluster's
/// width.
pub fn string_display_width(text: &str) -> u16 {
    text.graphemes(true)
        .map(grapheme_width)
        .fold(0u16, |acc, w| acc.saturating_add(w))
}

/// Split `text` into extended grapheme clusters in display order.
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Wrap `text` into lines no wider than `max_w` columns, breaking only at
/// grapheme boundaries and never splitting a wide grapheme across lines.
///
/// A single grapheme wider than `max_w` (pathological, e.g. `max_w == 1`
/// with a CJK character) is placed alone on its own line rather than
/// dropped.
pub fn wrap(text: &str, max_w: u16) -> Vec<String> {
    if max_w == 0 {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_w: u16 = 0;

    for word in text.split_inclusive(' ') {
        let word_w = string_display_width(word.trim_end_matches(' '));
        let trailing_space = word.ends_with(' ');
        let word_total_w = word_w + u16::from(trailing_space);

        if current_w > 0 && current_w + word_total_w > max_w {
            lines.push(std::mem::take(&mut current).trim_end().to_string());
            current_w = 0;
        }

        if word_w > max_w {
            // A single word too wide for any line: hard-wrap by grapheme.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current).trim_end().to_string());
                current_w = 0;
            }
            let mut seg = String::new();
            let mut seg_w = 0u16;
            for g in graphemes(word.trim_end_matches(' ')) {
                let gw = grapheme_width(g);
                if seg_w + gw > max_w && seg_w > 0 {
                    lines.push(std::mem::take(&mut seg));
                    seg_w = 0;
                }
                seg.push_str(g);
                seg_w += gw;
            }
            if !seg.is_empty() {
                current = seg;
                current_w = seg_w;
            }
            if trailing_space {
                current.push(' ');
                current_w += 1;
            }
        } else {
            current.push_str(word);
            current_w += word_total_w;
        }
    }
    lines.push(current.trim_end().to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_one_per_char() {
        assert_eq!(string_display_width("abc"), 3);
    }

    #[test]
    fn wide_cjk_char_is_width_two() {
        assert_eq!(grapheme_width("日"), 2);
        assert_eq!(string_display_width("ABC日"), 5);
    }

    #[test]
    fn zero_width_combining_mark() {
        // 'e' + combining acute accent is one grapheme cluster.
        let s = "e\u{0301}";
        assert_eq!(graphemes(s).count(), 1);
        assert_eq!(string_display_width(s), 1);
    }

    #[test]
    fn wrap_breaks_at_word_boundaries() {
        let lines = wrap("the quick brown fox", 10);
        assert!(lines.iter().all(|l| string_display_width(l) <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox");
    }

    #[test]
    fn wrap_never_splits_wide_grapheme() {
        let lines = wrap("AB日D", 3);
        for line in &lines {
            // Either the wide char is whole or absent, never width-1 half.
            assert!(!line.ends_with('\u{fffd}'));
        }
        assert_eq!(lines.concat().replace(' ', ""), "AB日D");
    }

    #[test]
    fn wrap_zero_width_returns_single_empty_line() {
        assert_eq!(wrap("anything", 0), vec![String::new()]);
    }
}
