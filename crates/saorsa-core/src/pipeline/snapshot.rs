//! Immutable buffer snapshots and the regex pattern-match API.
//!
//! A snapshot is a frozen copy of [`TerminalBuffer`](super::TerminalBuffer)'s
//! cells, safe to hold and query after the buffer has moved on to later
//! frames. Plain substring/color queries are O(cells); regex queries join
//! lines into a single string (trimming trailing padding per line when
//! `trim_lines` is set, joining with a caller-chosen separator — default
//! `"\n"`, or direct concatenation when `None`) and translate byte offsets
//! back to `(line, col)` pairs in snapshot coordinates.

use regex::Regex;

use crate::color::Color;
use crate::geometry::Rect;
use crate::surface::Surface;

/// One regex match, in snapshot coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    /// Row the match starts on.
    pub start_line: u16,
    /// Column (grapheme index, not byte offset) the match starts on.
    pub start_col: u16,
    /// Row the match ends on (inclusive of the last matched grapheme).
    pub end_line: u16,
    /// Column the match ends on, exclusive.
    pub end_col: u16,
    /// The matched text.
    pub text: String,
}

/// An immutable copy of a terminal buffer's cells, queryable without
/// holding a reference to the live buffer.
#[derive(Clone)]
pub struct Snapshot {
    surface: Surface,
}

struct GraphemePos {
    byte_offset: usize,
    line: u16,
    col: u16,
}

impl Snapshot {
    /// Freeze a copy of `surface`.
    pub fn capture(surface: &Surface) -> Self {
        Self { surface: surface.clone() }
    }

    /// The snapshot's width in columns.
    pub fn width(&self) -> u16 {
        self.surface.width()
    }

    /// The snapshot's height in rows.
    pub fn height(&self) -> u16 {
        self.surface.height()
    }

    /// The text of row `y`, one character per non-continuation cell, or
    /// `None` if `y` is out of range.
    pub fn get_line(&self, y: u16) -> Option<String> {
        let row = self.surface.get_row(y)?;
        Some(row.iter().filter(|c| c.display_width > 0).map(|c| c.grapheme.as_str()).collect())
    }

    /// Every row's text, joined by `"\n"`.
    pub fn get_display_text(&self) -> String {
        (0..self.height()).filter_map(|y| self.get_line(y)).collect::<Vec<_>>().join("\n")
    }

    /// True if `s` appears anywhere in [`Self::get_display_text`].
    pub fn contains_text(&self, s: &str) -> bool {
        self.get_display_text().contains(s)
    }

    /// True if any cell has foreground color `color`.
    pub fn has_foreground(&self, color: Color) -> bool {
        self.surface.as_span().iter().any(|c| c.fg == Some(color))
    }

    /// True if any cell has background color `color`.
    pub fn has_background(&self, color: Color) -> bool {
        self.surface.as_span().iter().any(|c| c.bg == Some(color))
    }

    /// Search each row independently; a match cannot span a line break.
    pub fn find_pattern(&self, re: &Regex) -> Vec<PatternMatch> {
        let mut out = Vec::new();
        for y in 0..self.height() {
            let Some(line) = self.get_line(y) else { continue };
            for m in re.find_iter(&line) {
                let (start_col, end_col) = char_span(&line, m.start(), m.end());
                out.push(PatternMatch {
                    start_line: y,
                    start_col,
                    end_line: y,
                    end_col,
                    text: m.as_str().to_string(),
                });
            }
        }
        out
    }

    /// The first match across all rows in top-to-bottom, left-to-right
    /// order, if any.
    pub fn find_first_pattern(&self, re: &Regex) -> Option<PatternMatch> {
        for y in 0..self.height() {
            let line = self.get_line(y)?;
            if let Some(m) = re.find(&line) {
                let (start_col, end_col) = char_span(&line, m.start(), m.end());
                return Some(PatternMatch {
                    start_line: y,
                    start_col,
                    end_line: y,
                    end_col,
                    text: m.as_str().to_string(),
                });
            }
        }
        None
    }

    /// True if `re` matches anywhere on any single row.
    pub fn contains_pattern(&self, re: &Regex) -> bool {
        (0..self.height()).filter_map(|y| self.get_line(y)).any(|line| re.is_match(&line))
    }

    /// Search across line breaks: rows are joined by `separator`
    /// (`None` means direct concatenation, no characters inserted between
    /// rows) after optionally trimming each row's trailing padding spaces
    /// (`trim_lines`), and matches are translated back to `(line, col)`
    /// pairs.
    pub fn find_multiline_pattern(&self, re: &Regex, separator: Option<&str>, trim_lines: bool) -> Vec<PatternMatch> {
        let (joined, positions) = self.joined_with_positions(separator, trim_lines);
        let mut out = Vec::new();
        for m in re.find_iter(&joined) {
            if let Some(pm) = translate_match(&positions, m.start(), m.end(), m.as_str()) {
                out.push(pm);
            }
        }
        out
    }

    /// True if `re` matches the multi-line-joined text.
    pub fn contains_multiline_pattern(&self, re: &Regex, separator: Option<&str>, trim_lines: bool) -> bool {
        let (joined, _) = self.joined_with_positions(separator, trim_lines);
        re.is_match(&joined)
    }

    /// A snapshot of the sub-region `rect` (clipped to this snapshot's
    /// bounds), with coordinates translated so `rect`'s origin becomes
    /// `(0, 0)`.
    pub fn sub_region(&self, rect: Rect) -> Snapshot {
        let rect = rect.intersect(Rect::from_size(self.surface.size()));
        let mut sub = Surface::new(rect.size());
        sub.composite(&self.surface, -i32::from(rect.x), -i32::from(rect.y), Rect::from_size(rect.size()));
        Snapshot { surface: sub }
    }

    fn joined_with_positions(&self, separator: Option<&str>, trim_lines: bool) -> (String, Vec<GraphemePos>) {
        let mut joined = String::new();
        let mut positions = Vec::new();
        for y in 0..self.height() {
            let Some(mut line) = self.get_line(y) else { continue };
            if trim_lines {
                let trimmed_len = line.trim_end_matches(' ').len();
                line.truncate(trimmed_len);
            }
            let mut col: u16 = 0;
            for g in crate::width::graphemes(&line) {
                positions.push(GraphemePos { byte_offset: joined.len(), line: y, col });
                joined.push_str(g);
                col += 1;
            }
            if y + 1 < self.height() {
                if let Some(sep) = separator {
                    joined.push_str(sep);
                } else {
                    // Direct concatenation: no separator, but the next
                    // row's first grapheme must still get its own entry.
                }
            }
        }
        // Sentinel for end-of-text offsets.
        positions.push(GraphemePos { byte_offset: joined.len(), line: self.height(), col: 0 });
        (joined, positions)
    }
}

fn char_span(s: &str, start_byte: usize, end_byte: usize) -> (u16, u16) {
    let start_col = s[..start_byte].chars().count() as u16;
    let end_col = s[..end_byte].chars().count() as u16;
    (start_col, end_col)
}

fn translate_match(positions: &[GraphemePos], start: usize, end: usize, text: &str) -> Option<PatternMatch> {
    let start_pos = positions.iter().rev().find(|p| p.byte_offset <= start)?;
    let end_pos = positions.iter().rev().find(|p| p.byte_offset <= end)?;
    Some(PatternMatch {
        start_line: start_pos.line,
        start_col: start_pos.col,
        end_line: end_pos.line,
        end_col: end_pos.col,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Attrs;
    use crate::geometry::Size;

    fn surface_with_text(lines: &[&str]) -> Surface {
        let w = lines.iter().map(|l| l.len() as u16).max().unwrap_or(0).max(1);
        let mut s = Surface::new(Size::new(w, lines.len() as u16));
        for (y, line) in lines.iter().enumerate() {
            s.write_text(0, y as u16, line, None, None, Attrs::NONE);
        }
        s
    }

    #[test]
    fn get_line_reads_back_written_text() {
        let s = surface_with_text(&["hello"]);
        let snap = Snapshot::capture(&s);
        assert_eq!(snap.get_line(0).unwrap().trim_end(), "hello");
    }

    #[test]
    fn contains_text_finds_substring_in_display_text() {
        let s = surface_with_text(&["> Second"]);
        let snap = Snapshot::capture(&s);
        assert!(snap.contains_text("> Second"));
    }

    #[test]
    fn find_pattern_reports_column_in_its_own_line() {
        let s = surface_with_text(&["abc123"]);
        let snap = Snapshot::capture(&s);
        let re = Regex::new(r"\d+").unwrap();
        let matches = snap.find_pattern(&re);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start_col, 3);
        assert_eq!(matches[0].text, "123");
    }

    #[test]
    fn multiline_pattern_spans_rows_with_default_separator() {
        let s = surface_with_text(&["foo", "bar"]);
        let snap = Snapshot::capture(&s);
        let re = Regex::new(r"foo\nbar").unwrap();
        assert!(snap.contains_multiline_pattern(&re, Some("\n"), true));
    }

    #[test]
    fn has_foreground_detects_color() {
        let mut s = Surface::new(Size::new(3, 1));
        s.write_text(0, 0, "x", Some(Color::RED), None, Attrs::NONE);
        let snap = Snapshot::capture(&s);
        assert!(snap.has_foreground(Color::RED));
        assert!(!snap.has_foreground(Color::BLUE));
    }

    #[test]
    fn sub_region_translates_coordinates_to_origin() {
        let s = surface_with_text(&["xxxxx", "xxABx", "xxxxx"]);
        let snap = Snapshot::capture(&s);
        let sub = snap.sub_region(Rect::new(2, 1, 2, 1));
        assert_eq!(sub.get_line(0).unwrap(), "AB");
    }
}
