//! Byte stream → typed tokens.
//!
//! The tokenizer owns the full VT input grammar: printable UTF-8 text, C0
//! controls, CSI arrow/function-key sequences, SGR mouse reports
//! (`ESC [ < btn;x;y M/m`), and focus-in/out reports (`ESC [ I` / `ESC [ O`).
//! Malformed sequences recover by emitting a single [`Token::Malformed`]
//! and resynchronizing on the next byte.

use std::time::{Duration, Instant};

use crate::ansi::token::Token;
use crate::input::event::{Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};

/// Configuration for double-click grouping.
#[derive(Clone, Copy, Debug)]
pub struct DoubleClickConfig {
    /// Maximum elapsed time between two left-button-down events at the
    /// same position for the second to count as a double-click.
    ///
    /// Defaults to 500ms; see DESIGN.md for why.
    pub window: Duration,
}

impl Default for DoubleClickConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(500),
        }
    }
}

/// Stateful byte-stream tokenizer.
///
/// Holds just enough state across calls to `feed` to reassemble escape
/// sequences split across reads and to track click-count history.
pub struct Tokenizer {
    pending: Vec<u8>,
    double_click: DoubleClickConfig,
    last_click: Option<(MouseButton, u16, u16, Instant)>,
    click_run: u8,
}

impl Tokenizer {
    /// Create a tokenizer with the default double-click window.
    pub fn new() -> Self {
        Self::with_config(DoubleClickConfig::default())
    }

    /// Create a tokenizer with an explicit double-click configuration.
    pub fn with_config(double_click: DoubleClickConfig) -> Self {
        Self {
            pending: Vec::new(),
            double_click,
            last_click: None,
            click_run: 0,
        }
    }

    /// Feed newly-read bytes, returning every token that could be decoded.
    /// Bytes that look like the start of a truncated escape sequence are
    /// retained in `pending` for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Token> {
        self.pending.extend_from_slice(bytes);
        let mut tokens = Vec::new();
        let mut text_run = String::new();

        let mut i = 0;
        while i < self.pending.len() {
            let b = self.pending[i];
            if b == 0x1b {
                // Possible escape sequence; check whether we have enough
                // bytes buffered to decide.
                match self.try_parse_escape(&self.pending[i..]) {
                    ParseOutcome::Token(tok, len) => {
                        flush_text(&mut text_run, &mut tokens);
                        tokens.push(self.postprocess(tok));
                        i += len;
                    }
                    ParseOutcome::Incomplete => {
                        // Keep everything from here for next feed.
                        break;
                    }
                    ParseOutcome::Malformed(len) => {
                        flush_text(&mut text_run, &mut tokens);
                        tokens.push(Token::Malformed);
                        i += len;
                    }
                }
            } else if b < 0x20 || b == 0x7f {
                flush_text(&mut text_run, &mut tokens);
                tokens.push(self.postprocess(c0_token(b)));
                i += 1;
            } else {
                // Accumulate a run of UTF-8 text; decode greedily.
                let start = i;
                while i < self.pending.len() {
                    let bb = self.pending[i];
                    if bb == 0x1b || bb < 0x20 || bb == 0x7f {
                        break;
                    }
                    i += 1;
                }
                match std::str::from_utf8(&self.pending[start..i]) {
                    Ok(s) => text_run.push_str(s),
                    Err(e) => {
                        // Salvage the valid prefix, mark the rest malformed.
                        let valid = e.valid_up_to();
                        if valid > 0 {
                            // Safety: valid_up_to guarantees this slice is UTF-8.
                            if let Ok(s) = std::str::from_utf8(&self.pending[start..start + valid]) {
                                text_run.push_str(s);
                            }
                        }
                        flush_text(&mut text_run, &mut tokens);
                        tokens.push(Token::Malformed);
                    }
                }
            }
        }
        flush_text(&mut text_run, &mut tokens);
        self.pending.drain(0..i);
        tokens
    }

    fn postprocess(&mut self, tok: Token) -> Token {
        if let Token::Mouse(mut m) = tok {
            if m.action == MouseAction::Down && m.button != MouseButton::None {
                let now = Instant::now();
                let run = match self.last_click {
                    Some((btn, x, y, at))
                        if btn == m.button
                            && x == m.x
                            && y == m.y
                            && now.duration_since(at) <= self.double_click.window =>
                    {
                        self.click_run + 1
                    }
                    _ => 1,
                };
                self.click_run = run;
                self.last_click = Some((m.button, m.x, m.y, now));
                m.click_count = run;
            }
            Token::Mouse(m)
        } else {
            tok
        }
    }

    fn try_parse_escape(&self, buf: &[u8]) -> ParseOutcome {
        debug_assert_eq!(buf[0], 0x1b);
        if buf.len() < 2 {
            return ParseOutcome::Incomplete;
        }
        match buf[1] {
            b'[' => self.try_parse_csi(buf),
            b']' => self.try_parse_osc(buf),
            0x1b => ParseOutcome::Malformed(1), // lone ESC, not a sequence
            _ => {
                // Alt+key: ESC followed by a single printable byte.
                if buf[1].is_ascii_graphic() || buf[1] == b' ' {
                    ParseOutcome::Token(
                        Token::Key(KeyEvent::new(Key::Char(buf[1] as char), Modifiers::ALT)),
                        2,
                    )
                } else {
                    ParseOutcome::Malformed(2)
                }
            }
        }
    }

    fn try_parse_csi(&self, buf: &[u8]) -> ParseOutcome {
        // buf[0] == ESC, buf[1] == '['
        let mut j = 2;
        let mouse_sgr = buf.len() > 2 && buf[2] == b'<';
        if mouse_sgr {
            j = 3;
        }
        let params_start = j;
        while j < buf.len() && (buf[j].is_ascii_digit() || buf[j] == b';') {
            j += 1;
        }
        if j >= buf.len() {
            return ParseOutcome::Incomplete;
        }
        let finalizer = buf[j];
        let params_bytes = &buf[params_start..j];
        let len = j + 1;

        if mouse_sgr {
            return self.parse_sgr_mouse(params_bytes, finalizer, len);
        }

        match finalizer {
            b'A' => ParseOutcome::Token(Token::Key(KeyEvent::plain(Key::Up)), len),
            b'B' => ParseOutcome::Token(Token::Key(KeyEvent::plain(Key::Down)), len),
            b'C' => ParseOutcome::Token(Token::Key(KeyEvent::plain(Key::Right)), len),
            b'D' => ParseOutcome::Token(Token::Key(KeyEvent::plain(Key::Left)), len),
            b'H' => ParseOutcome::Token(Token::Key(KeyEvent::plain(Key::Home)), len),
            b'F' => ParseOutcome::Token(Token::Key(KeyEvent::plain(Key::End)), len),
            b'I' => ParseOutcome::Token(Token::FocusIn, len),
            b'O' => ParseOutcome::Token(Token::FocusOut, len),
            b'~' => {
                let n: u16 = parse_params(params_bytes).first().copied().unwrap_or(1);
                let key = match n {
                    1 | 7 => Some(Key::Home),
                    2 => Some(Key::Insert),
                    3 => Some(Key::Delete),
                    4 | 8 => Some(Key::End),
                    5 => Some(Key::PageUp),
                    6 => Some(Key::PageDown),
                    11..=15 => Some(Key::F((n - 10) as u8)),
                    17..=21 => Some(Key::F((n - 11) as u8)),
                    23 | 24 => Some(Key::F((n - 12) as u8)),
                    _ => None,
                };
                match key {
                    Some(k) => ParseOutcome::Token(Token::Key(KeyEvent::plain(k)), len),
                    None => ParseOutcome::Malformed(len),
                }
            }
            b'm' | b'M' => {
                // Generic SGR text attribute sequence (not mouse: no '<').
                ParseOutcome::Token(
                    Token::Csi {
                        params: parse_params(params_bytes),
                        finalizer: finalizer as char,
                    },
                    len,
                )
            }
            _ if finalizer.is_ascii_alphabetic() || finalizer == b'h' || finalizer == b'l' => {
                ParseOutcome::Token(
                    Token::Csi {
                        params: parse_params(params_bytes),
                        finalizer: finalizer as char,
                    },
                    len,
                )
            }
            _ => ParseOutcome::Malformed(len),
        }
    }

    fn parse_sgr_mouse(&self, params_bytes: &[u8], finalizer: u8, len: usize) -> ParseOutcome {
        if finalizer != b'M' && finalizer != b'm' {
            return ParseOutcome::Malformed(len);
        }
        let s = match std::str::from_utf8(params_bytes) {
            Ok(s) => s,
            Err(_) => return ParseOutcome::Malformed(len),
        };
        let parts: Vec<&str> = s.split(';').collect();
        if parts.len() != 3 {
            return ParseOutcome::Malformed(len);
        }
        let (Ok(code), Ok(x), Ok(y)) = (
            parts[0].parse::<u16>(),
            parts[1].parse::<u16>(),
            parts[2].parse::<u16>(),
        ) else {
            return ParseOutcome::Malformed(len);
        };
        let modifiers = Modifiers {
            shift: code & 0x04 != 0,
            alt: code & 0x08 != 0,
            ctrl: code & 0x10 != 0,
        };
        let motion = code & 0x20 != 0;
        let wheel = code & 0x40 != 0;
        let btn_bits = code & 0x03;
        let button = if wheel {
            if btn_bits == 0 {
                MouseButton::ScrollUp
            } else {
                MouseButton::ScrollDown
            }
        } else if motion {
            MouseButton::None
        } else {
            match btn_bits {
                0 => MouseButton::Left,
                1 => MouseButton::Middle,
                2 => MouseButton::Right,
                _ => MouseButton::None,
            }
        };
        let action = if wheel {
            MouseAction::Down
        } else if motion {
            MouseAction::Move
        } else if finalizer == b'M' {
            MouseAction::Down
        } else {
            MouseAction::Up
        };
        ParseOutcome::Token(
            Token::Mouse(MouseEvent {
                button,
                action,
                x: x.saturating_sub(1),
                y: y.saturating_sub(1),
                modifiers,
                click_count: 1,
            }),
            len,
        )
    }

    fn try_parse_osc(&self, buf: &[u8]) -> ParseOutcome {
        // ESC ] ... terminated by BEL (0x07) or ST (ESC \\).
        let mut j = 2;
        while j < buf.len() {
            if buf[j] == 0x07 {
                let content = String::from_utf8_lossy(&buf[2..j]).into_owned();
                return ParseOutcome::Token(Token::Osc(content), j + 1);
            }
            if buf[j] == 0x1b && j + 1 < buf.len() && buf[j + 1] == b'\\' {
                let content = String::from_utf8_lossy(&buf[2..j]).into_owned();
                return ParseOutcome::Token(Token::Osc(content), j + 2);
            }
            j += 1;
        }
        ParseOutcome::Incomplete
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

enum ParseOutcome {
    Token(Token, usize),
    Incomplete,
    Malformed(usize),
}

fn parse_params(bytes: &[u8]) -> Vec<u16> {
    std::str::from_utf8(bytes)
        .ok()
        .map(|s| s.split(';').filter_map(|p| p.parse::<u16>().ok()).collect())
        .unwrap_or_default()
}

fn c0_token(b: u8) -> Token {
    match b {
        0x09 => Token::Key(KeyEvent::plain(Key::Tab)),
        0x0d | 0x0a => Token::Key(KeyEvent::plain(Key::Enter)),
        0x1b => Token::Key(KeyEvent::plain(Key::Escape)),
        0x7f | 0x08 => Token::Key(KeyEvent::plain(Key::Backspace)),
        0x01..=0x1a => {
            // Ctrl+letter: 0x01 == Ctrl+A, etc.
            let c = (b - 1 + b'a') as char;
            Token::Key(KeyEvent::new(Key::Char(c), Modifiers::CTRL))
        }
        _ => Token::Malformed,
    }
}

fn flush_text(run: &mut String, tokens: &mut Vec<Token>) {
    if !run.is_empty() {
        tokens.push(Token::Text(std::mem::take(run)));
    }
}
