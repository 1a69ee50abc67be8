//! Asciicast v2 session recording (§6 "Recording format").
//!
//! An [`AsciicastRecorder`] is a [`WorkloadFilter`] — it records whatever
//! the application actually produced/received, independent of whether a
//! real presentation adapter is attached, which is what makes headless
//! recording possible. The header line is written lazily on
//! `on_session_start` so the recorder can be constructed before the
//! session's dimensions are known.

use std::io::{self, Write};
use std::time::Duration;

use serde_json::json;

use crate::ansi::{serialize, Token};
use crate::input::MouseAction;
use crate::pipeline::filter::WorkloadFilter;

/// Records a session to asciicast v2 format as it plays out.
pub struct AsciicastRecorder<W: Write> {
    writer: W,
    header_written: bool,
    env: Option<serde_json::Map<String, serde_json::Value>>,
}

impl<W: Write> AsciicastRecorder<W> {
    /// A recorder writing asciicast v2 lines to `writer`. `timestamp` is
    /// the session's Unix epoch start time, recorded in the header.
    pub fn new(writer: W) -> Self {
        Self { writer, header_written: false, env: None }
    }

    /// Attach an `env` map to the header (e.g. `TERM`, `SHELL`).
    #[must_use]
    pub fn with_env(mut self, env: serde_json::Map<String, serde_json::Value>) -> Self {
        self.env = Some(env);
        self
    }

    /// Emit a named marker record at the given elapsed time. Not part of
    /// the [`WorkloadFilter`] event set (no callback corresponds to it);
    /// callers invoke it directly, e.g. from an application action.
    pub fn marker(&mut self, label: &str, elapsed: Duration) -> io::Result<()> {
        self.write_event(elapsed, "m", label)
    }

    fn write_header(&mut self, w: u16, h: u16, timestamp: u64) -> io::Result<()> {
        let mut header = json!({
            "version": 2,
            "width": w,
            "height": h,
            "timestamp": timestamp,
        });
        if let Some(env) = self.env.take() {
            header["env"] = serde_json::Value::Object(env);
        }
        writeln!(self.writer, "{header}")?;
        self.header_written = true;
        Ok(())
    }

    fn write_event(&mut self, elapsed: Duration, kind: &str, payload: &str) -> io::Result<()> {
        let record = json!([elapsed.as_secs_f64(), kind, payload]);
        writeln!(self.writer, "{record}")
    }
}

/// Render input tokens as the text an asciicast reader would expect in an
/// `"i"` record. Typed keys contribute their character; named keys and
/// mouse actions get a bracketed placeholder since there is no raw-byte
/// form left by the time a filter observes them.
fn input_payload(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(s) => out.push_str(s),
            Token::Key(k) => match k.ch {
                Some(c) => out.push(c),
                None => out.push_str(&format!("<{}>", k.key)),
            },
            Token::Mouse(m) => {
                let action = match m.action {
                    MouseAction::Down => "down",
                    MouseAction::Up => "up",
                    MouseAction::Move => "move",
                };
                out.push_str(&format!("<mouse {action} {},{}>", m.x, m.y));
            }
            Token::FocusIn => out.push_str("<focus-in>"),
            Token::FocusOut => out.push_str("<focus-out>"),
            Token::Malformed => out.push_str("<malformed>"),
            _ => {}
        }
    }
    out
}

impl<W: Write + Send> WorkloadFilter for AsciicastRecorder<W> {
    fn on_session_start(&mut self, w: u16, h: u16, _elapsed: Duration) {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = self.write_header(w, h, timestamp);
    }

    fn on_output(&mut self, tokens: &[Token], elapsed: Duration) {
        if !self.header_written {
            return;
        }
        let text = serialize(tokens);
        if !text.is_empty() {
            let _ = self.write_event(elapsed, "o", &text);
        }
    }

    fn on_input(&mut self, tokens: &[Token], elapsed: Duration) {
        if !self.header_written {
            return;
        }
        let text = input_payload(tokens);
        if !text.is_empty() {
            let _ = self.write_event(elapsed, "i", &text);
        }
    }

    fn on_resize(&mut self, w: u16, h: u16, elapsed: Duration) {
        if !self.header_written {
            return;
        }
        let _ = self.write_event(elapsed, "r", &format!("{w}x{h}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::KeyEvent;

    #[test]
    fn header_is_written_on_session_start() {
        let mut buf = Vec::new();
        let mut rec = AsciicastRecorder::new(&mut buf);
        rec.on_session_start(80, 24, Duration::from_secs(1700000000));
        let text = String::from_utf8(buf).unwrap();
        let first_line = text.lines().next().unwrap();
        let header: serde_json::Value = serde_json::from_str(first_line).unwrap();
        assert_eq!(header["version"], 2);
        assert_eq!(header["width"], 80);
        assert_eq!(header["height"], 24);
    }

    #[test]
    fn output_event_serializes_tokens_to_text() {
        let mut buf = Vec::new();
        let mut rec = AsciicastRecorder::new(&mut buf);
        rec.on_session_start(10, 2, Duration::from_secs(0));
        rec.on_output(&[Token::Text("hi".into())], Duration::from_millis(500));
        let text = String::from_utf8(buf).unwrap();
        let second_line = text.lines().nth(1).unwrap();
        let record: serde_json::Value = serde_json::from_str(second_line).unwrap();
        assert_eq!(record[1], "o");
        assert_eq!(record[2], "hi");
    }

    #[test]
    fn input_event_renders_plain_char() {
        let mut buf = Vec::new();
        let mut rec = AsciicastRecorder::new(&mut buf);
        rec.on_session_start(10, 2, Duration::from_secs(0));
        rec.on_input(&[Token::Key(KeyEvent::plain(crate::input::Key::Char('q')))], Duration::from_millis(10));
        let text = String::from_utf8(buf).unwrap();
        let line = text.lines().nth(1).unwrap();
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(record[1], "i");
        assert_eq!(record[2], "q");
    }

    #[test]
    fn resize_event_formats_wxh() {
        let mut buf = Vec::new();
        let mut rec = AsciicastRecorder::new(&mut buf);
        rec.on_session_start(10, 2, Duration::from_secs(0));
        rec.on_resize(100, 40, Duration::from_secs(2));
        let text = String::from_utf8(buf).unwrap();
        let line = text.lines().nth(1).unwrap();
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(record[2], "100x40");
    }
}
