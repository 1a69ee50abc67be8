//! SGR-optimal output token emission.
//!
//! `emit` turns a [`ChangeList`](crate::diff::ChangeList) into a minimal,
//! deterministic sequence of [`Token`]s: a cursor-position token only when
//! the write head jumps, an SGR token only when the running style actually
//! changes, and adjacent same-style cells coalesced into one text run.

use crate::ansi::token::{SgrParams, Token};
use crate::cell::Cell;
use crate::color::{Attrs, Color};
use crate::diff::ChangeList;

/// The running `(fg, bg, attrs)` state the emitter tracks between calls,
/// so consecutive frames continue to emit minimal diffs against whatever
/// was last actually written to the terminal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SgrState {
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: Attrs,
    /// None until the first cell is written; lets us avoid emitting a
    /// reset before the very first style.
    active: bool,
}

impl SgrState {
    /// A state with nothing active (as if the terminal was just reset).
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(&self, cell: &Cell) -> bool {
        self.active && self.fg == cell.fg && self.bg == cell.bg && self.attrs == cell.attrs
    }

    fn turns_off_attribute(&self, cell: &Cell) -> bool {
        self.active && (self.attrs - cell.attrs) != Attrs::NONE
    }
}

/// Emit a token sequence for `changes` against the given running state,
/// mutating `state` to reflect what was emitted so the next frame continues
/// correctly.
///
/// Deterministic: given equal `changes` and starting `state`, always
/// produces byte-identical output.
pub fn emit(changes: &ChangeList, state: &mut SgrState) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor: Option<(u16, u16)> = None;
    let mut text_run = String::new();
    let mut run_style: Option<(Option<Color>, Option<Color>, Attrs)> = None;

    let flush_run = |tokens: &mut Vec<Token>, run: &mut String| {
        if !run.is_empty() {
            tokens.push(Token::Text(std::mem::take(run)));
        }
    };

    for change in changes {
        if change.cell.display_width == 0 {
            // Continuation cells carry no independent output; the
            // preceding wide grapheme already advanced the column.
            continue;
        }

        let at_cursor = matches!(cursor, Some((cx, cy)) if cx == change.x && cy == change.y);
        if !at_cursor {
            flush_run(&mut tokens, &mut text_run);
            tokens.push(Token::CursorPosition {
                row: change.y + 1,
                col: change.x + 1,
            });
        }

        let style_changed = !state.matches(&change.cell);
        if style_changed {
            flush_run(&mut tokens, &mut text_run);
            let reset = state.turns_off_attribute(&change.cell);
            tokens.push(Token::Sgr(SgrParams {
                fg: change.cell.fg,
                bg: change.cell.bg,
                attrs: change.cell.attrs,
                reset,
            }));
            state.fg = change.cell.fg;
            state.bg = change.cell.bg;
            state.attrs = change.cell.attrs;
            state.active = true;
            run_style = Some((change.cell.fg, change.cell.bg, change.cell.attrs));
        } else if run_style.is_none() {
            run_style = Some((change.cell.fg, change.cell.bg, change.cell.attrs));
        }

        text_run.push_str(&change.cell.grapheme);
        let advance = u16::from(change.cell.display_width);
        cursor = Some((change.x + advance, change.y));
    }

    flush_run(&mut tokens, &mut text_run);
    tokens
}

/// Serialize emitted tokens into raw ANSI bytes. Always emits 24-bit color
/// (`38;2;r;g;b` / `48;2;r;g;b`); no terminal-capability downgrading to
/// 256-color or 16-color palettes is implemented (see DESIGN.md).
pub fn serialize(tokens: &[Token]) -> String {
    use std::fmt::Write as _;
    let mut out = String::new();
    for tok in tokens {
        match tok {
            Token::Text(s) => out.push_str(s),
            Token::CursorPosition { row, col } => {
                let _ = write!(out, "\x1b[{row};{col}H");
            }
            Token::Sgr(params) => {
                out.push_str(&sgr_sequence(params));
            }
            Token::Csi { params, finalizer } => {
                let joined = params
                    .iter()
                    .map(u16::to_string)
                    .collect::<Vec<_>>()
                    .join(";");
                let _ = write!(out, "\x1b[{joined}{finalizer}");
            }
            Token::Osc(content) => {
                let _ = write!(out, "\x1b]{content}\x07");
            }
            Token::Resize(_, _)
            | Token::Key(_)
            | Token::Mouse(_)
            | Token::FocusIn
            | Token::FocusOut
            | Token::Malformed => {
                // Input-side tokens never appear on the output path.
            }
        }
    }
    out
}

fn sgr_sequence(params: &SgrParams) -> String {
    use std::fmt::Write as _;
    let mut codes: Vec<String> = Vec::new();
    if params.reset {
        codes.push("0".to_string());
    }
    for bit in params.attrs.iter() {
        codes.push(bit.sgr_code().to_string());
    }
    if let Some((r, g, b)) = params.fg.and_then(Color::sgr_params) {
        codes.push(format!("38;2;{r};{g};{b}"));
    }
    if let Some((r, g, b)) = params.bg.and_then(Color::sgr_params) {
        codes.push(format!("48;2;{r};{g};{b}"));
    }
    if codes.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    let _ = write!(out, "\x1b[{}m", codes.join(";"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff, Change};
    use crate::geometry::Size;
    use crate::surface::Surface;

    fn run(changes: &ChangeList) -> Vec<Token> {
        emit(changes, &mut SgrState::new())
    }

    #[test]
    fn adjacent_same_style_cells_coalesce_into_one_text_token() {
        let changes: ChangeList = vec![
            Change { x: 0, y: 0, cell: Cell::new("A", 1, Some(Color::RED), None, Attrs::NONE) },
            Change { x: 1, y: 0, cell: Cell::new("B", 1, Some(Color::RED), None, Attrs::NONE) },
            Change { x: 2, y: 0, cell: Cell::new("C", 1, Some(Color::RED), None, Attrs::NONE) },
        ];
        let tokens = run(&changes);
        let sgr_count = tokens.iter().filter(|t| matches!(t, Token::Sgr(_))).count();
        let cursor_count = tokens.iter().filter(|t| matches!(t, Token::CursorPosition { .. })).count();
        assert_eq!(sgr_count, 1);
        assert_eq!(cursor_count, 1);
        assert!(tokens.iter().any(|t| matches!(t, Token::Text(s) if s == "ABC")));
    }

    #[test]
    fn cursor_jump_emits_new_position() {
        let changes: ChangeList = vec![
            Change { x: 0, y: 0, cell: Cell::new("A", 1, None, None, Attrs::NONE) },
            Change { x: 5, y: 0, cell: Cell::new("B", 1, None, None, Attrs::NONE) },
        ];
        let tokens = run(&changes);
        let cursor_count = tokens.iter().filter(|t| matches!(t, Token::CursorPosition { .. })).count();
        assert_eq!(cursor_count, 2);
    }

    #[test]
    fn wide_grapheme_skips_continuation_and_advances_two() {
        let changes: ChangeList = vec![
            Change { x: 0, y: 0, cell: Cell::new("日", 2, None, None, Attrs::NONE) },
            Change { x: 1, y: 0, cell: Cell::continuation() },
            Change { x: 2, y: 0, cell: Cell::new("X", 1, None, None, Attrs::NONE) },
        ];
        let tokens = run(&changes);
        let cursor_count = tokens.iter().filter(|t| matches!(t, Token::CursorPosition { .. })).count();
        // No jump needed between col 0 and col 2 because the wide grapheme
        // advances the cursor by 2.
        assert_eq!(cursor_count, 1);
    }

    #[test]
    fn determinism() {
        let mut prev = Surface::new(Size::new(5, 1));
        let mut curr = Surface::new(Size::new(5, 1));
        curr.write_text(0, 0, "abc", Some(Color::GREEN), None, Attrs::ITALIC);
        let changes = diff(&prev, &curr);
        let a = emit(&changes, &mut SgrState::new());
        let b = emit(&changes, &mut SgrState::new());
        assert_eq!(a, b);
        let _ = &mut prev;
    }

    #[test]
    fn turning_off_an_attribute_emits_reset_then_full_state() {
        let changes: ChangeList = vec![
            Change { x: 0, y: 0, cell: Cell::new("A", 1, None, None, Attrs::BOLD) },
            Change { x: 1, y: 0, cell: Cell::new("B", 1, None, None, Attrs::NONE) },
        ];
        let tokens = run(&changes);
        let sgrs: Vec<&SgrParams> = tokens
            .iter()
            .filter_map(|t| if let Token::Sgr(p) = t { Some(p) } else { None })
            .collect();
        assert_eq!(sgrs.len(), 2);
        assert!(!sgrs[0].reset);
        assert!(sgrs[1].reset);
    }

    #[test]
    fn serialize_produces_cup_and_sgr_bytes() {
        let tokens = vec![
            Token::CursorPosition { row: 2, col: 3 },
            Token::Sgr(SgrParams {
                fg: Some(Color::rgb(1, 2, 3)),
                bg: None,
                attrs: Attrs::BOLD,
                reset: false,
            }),
            Token::Text("hi".into()),
        ];
        let bytes = serialize(&tokens);
        assert!(bytes.contains("\x1b[2;3H"));
        assert!(bytes.contains("38;2;1;2;3"));
        assert!(bytes.contains("hi"));
    }

    #[test]
    fn selection_indicator_scenario_sgr_minimization() {
        // Three adjacent red cells over blank background
        // produce exactly one SGR token and one cursor token.
        let mut prev = Surface::new(Size::new(5, 1));
        let mut curr = Surface::new(Size::new(5, 1));
        curr.write_text(0, 0, "ABC", Some(Color::RED), None, Attrs::NONE);
        let changes = diff(&prev, &curr);
        let tokens = emit(&changes, &mut SgrState::new());
        assert_eq!(tokens.iter().filter(|t| matches!(t, Token::Sgr(_))).count(), 1);
        assert_eq!(
            tokens.iter().filter(|t| matches!(t, Token::CursorPosition { .. })).count(),
            1
        );
        assert!(tokens.iter().any(|t| matches!(t, Token::Text(s) if s == "ABC")));
        let _ = &mut prev;
    }
}
