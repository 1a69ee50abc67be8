//! The real-terminal [`PresentationAdapter`]: scoped acquisition of the
//! raw-mode TTY state with guaranteed restore on every exit path.
//!
//! Crossterm is used only for raw-mode toggling, alternate-screen/cursor
//! scope pairs and terminal size queries — never `crossterm::event` or
//! `crossterm::style`. Reading bytes back off stdin and turning them into
//! tokens is [`crate::ansi::Tokenizer`]'s job end to end (see DESIGN.md).

use std::io::{self, Read, Write};
use std::sync::mpsc as std_mpsc;
use std::thread;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

use crate::ansi::{Token, Tokenizer};
use crate::error::Result;

use super::adapter::PresentationAdapter;

/// Drives a real TTY: alternate screen, raw mode and mouse reporting are
/// entered on [`Self::start`] and torn down on [`Self::stop`] (and again,
/// idempotently, on `Drop`, so a panic still restores the terminal).
pub struct TtyPresentationAdapter {
    raw_mode: bool,
    token_rx: Option<std_mpsc::Receiver<Token>>,
    resize_tx: Option<std_mpsc::Sender<Token>>,
}

impl TtyPresentationAdapter {
    /// A fresh adapter; terminal state isn't touched until [`Self::start`].
    pub fn new() -> Self {
        Self { raw_mode: false, token_rx: None, resize_tx: None }
    }

    /// Inject an out-of-band resize token, e.g. from a `SIGWINCH` handler
    /// running alongside the app loop. A no-op before `start` or after
    /// `stop`.
    pub fn notify_resize(&self, w: u16, h: u16) {
        if let Some(tx) = &self.resize_tx {
            let _ = tx.send(Token::Resize(w, h));
        }
    }
}

impl Default for TtyPresentationAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationAdapter for TtyPresentationAdapter {
    fn start(&mut self) -> Result<(u16, u16)> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide, EnableMouseCapture)?;
        self.raw_mode = true;

        let (tx, rx) = std_mpsc::channel();
        self.resize_tx = Some(tx.clone());
        self.token_rx = Some(rx);

        // The reader loop blocks on stdin for the process lifetime; it is
        // intentionally not joined on `stop` (there is no portable way to
        // unblock a pending stdin read), matching how terminal apps
        // typically let this one thread ride out to process exit.
        thread::spawn(move || {
            let mut tokenizer = Tokenizer::new();
            let mut stdin = io::stdin();
            let mut buf = [0u8; 4096];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        for token in tokenizer.feed(&buf[..n]) {
                            if tx.send(token).is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        let (w, h) = terminal::size()?;
        Ok((w, h))
    }

    fn write(&mut self, bytes: &str) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(bytes.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn poll_tokens(&mut self) -> Vec<Token> {
        let Some(rx) = &self.token_rx else { return Vec::new() };
        let mut out = Vec::new();
        while let Ok(token) = rx.try_recv() {
            out.push(token);
        }
        out
    }

    fn stop(&mut self) -> Result<()> {
        if self.raw_mode {
            execute!(io::stdout(), DisableMouseCapture, Show, LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }
}

impl Drop for TtyPresentationAdapter {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = execute!(io::stdout(), DisableMouseCapture, Show, LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
}
