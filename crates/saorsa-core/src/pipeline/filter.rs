//! Workload and presentation filters (§4.8).
//!
//! Workload filters are observe-only on both the output and input paths —
//! they exist to record or inspect a session, never to change what's
//! shown or what the app sees. Presentation filters sit closer to the
//! wire and may rewrite the output token stream before bytes leave the
//! process (e.g. downgrading colors, stripping mouse reports for a dumb
//! terminal). Every method has a no-op default so a filter only overrides
//! the events it cares about.

use std::time::Duration;

use crate::ansi::Token;

/// Observes pipeline events without altering them. See [`super::Pipeline`]
/// for the exact point in the dataflow each callback fires.
pub trait WorkloadFilter: Send {
    /// A session has started with the given initial terminal size.
    fn on_session_start(&mut self, _w: u16, _h: u16, _elapsed: Duration) {}

    /// Output tokens were produced this frame, after the in-memory
    /// terminal buffer applied them.
    fn on_output(&mut self, _tokens: &[Token], _elapsed: Duration) {}

    /// A frame's output has been fully flushed to the presentation
    /// adapter (or, headless, fully applied to the buffer).
    fn on_frame_complete(&mut self, _elapsed: Duration) {}

    /// Input tokens arrived from the presentation adapter (or were
    /// injected directly in headless mode).
    fn on_input(&mut self, _tokens: &[Token], _elapsed: Duration) {}

    /// The terminal was resized.
    fn on_resize(&mut self, _w: u16, _h: u16, _elapsed: Duration) {}

    /// The session ended.
    fn on_session_end(&mut self, _elapsed: Duration) {}
}

/// Sits on the output path closer to the wire than [`WorkloadFilter`] and
/// may rewrite the token stream before it is serialized and sent to the
/// presentation adapter.
pub trait PresentationFilter: Send {
    /// A session has started with the given initial terminal size.
    fn on_session_start(&mut self, _w: u16, _h: u16, _elapsed: Duration) {}

    /// Rewrite (or pass through) the output tokens about to be sent.
    fn on_output(&mut self, tokens: Vec<Token>, _elapsed: Duration) -> Vec<Token> {
        tokens
    }

    /// The terminal was resized.
    fn on_resize(&mut self, _w: u16, _h: u16, _elapsed: Duration) {}

    /// The session ended.
    fn on_session_end(&mut self, _elapsed: Duration) {}
}
