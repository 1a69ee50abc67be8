//! [`Pipeline`]: wires a workload adapter, a presentation adapter (or
//! none, for headless mode) and their filters into one dataflow: the
//! renderer produces tokens, the terminal applies them to its in-memory
//! buffer, workload filters observe, presentation filters optionally
//! rewrite, and the presentation adapter serializes the result to the TTY.

use std::time::{Duration, Instant};

use crate::ansi::{serialize, Token};
use crate::error::Result;
use crate::geometry::Size;
use crate::input::InputEvent;

use super::adapter::{PresentationAdapter, WorkloadAdapter};
use super::buffer::TerminalBuffer;
use super::filter::{PresentationFilter, WorkloadFilter};
use super::snapshot::Snapshot;

/// Ties a [`WorkloadAdapter`] to an optional [`PresentationAdapter`]
/// through their respective filter chains and the shared
/// [`TerminalBuffer`].
pub struct Pipeline<W: WorkloadAdapter> {
    start: Option<Instant>,
    buffer: TerminalBuffer,
    workload: W,
    workload_filters: Vec<Box<dyn WorkloadFilter>>,
    presentation: Option<Box<dyn PresentationAdapter>>,
    presentation_filters: Vec<Box<dyn PresentationFilter>>,
}

impl<W: WorkloadAdapter> Pipeline<W> {
    /// A pipeline over the given workload adapter and initial terminal
    /// size, with no presentation adapter (headless) and no filters
    /// attached yet.
    pub fn new(workload: W, initial_size: Size) -> Self {
        Self {
            start: None,
            buffer: TerminalBuffer::new(initial_size),
            workload,
            workload_filters: Vec::new(),
            presentation: None,
            presentation_filters: Vec::new(),
        }
    }

    /// Attach a real (or fake) presentation adapter; headless sessions
    /// skip this call entirely.
    #[must_use]
    pub fn with_presentation(mut self, presentation: Box<dyn PresentationAdapter>) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Register a workload filter (observe-only, both output and input).
    pub fn add_workload_filter(&mut self, filter: Box<dyn WorkloadFilter>) {
        self.workload_filters.push(filter);
    }

    /// Register a presentation filter (may rewrite the output stream).
    pub fn add_presentation_filter(&mut self, filter: Box<dyn PresentationFilter>) {
        self.presentation_filters.push(filter);
    }

    fn elapsed(&self) -> Duration {
        self.start.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Start the session: enters the presentation adapter's scoped
    /// terminal state (if any) and notifies every filter of the starting
    /// size. Returns the terminal size to lay out the first frame under
    /// (the presentation adapter's real size if attached, else the size
    /// the pipeline was constructed with).
    pub fn start_session(&mut self) -> Result<Size> {
        self.start = Some(Instant::now());
        let size = match &mut self.presentation {
            Some(p) => {
                let (w, h) = p.start()?;
                Size::new(w, h)
            }
            None => self.buffer.size(),
        };
        self.buffer.resize(size);
        let elapsed = self.elapsed();
        for f in &mut self.workload_filters {
            f.on_session_start(size.w, size.h, elapsed);
        }
        for f in &mut self.presentation_filters {
            f.on_session_start(size.w, size.h, elapsed);
        }
        Ok(size)
    }

    /// Push output tokens through the pipeline: apply to the in-memory
    /// buffer, notify workload filters, let presentation filters rewrite,
    /// and (if attached) serialize and write to the presentation adapter.
    pub fn output(&mut self, tokens: Vec<Token>) -> Result<()> {
        self.buffer.apply(&tokens);
        let elapsed = self.elapsed();
        for f in &mut self.workload_filters {
            f.on_output(&tokens, elapsed);
        }
        let mut tokens = tokens;
        for f in &mut self.presentation_filters {
            tokens = f.on_output(tokens, elapsed);
        }
        if let Some(p) = &mut self.presentation {
            let bytes = serialize(&tokens);
            p.write(&bytes)?;
        }
        Ok(())
    }

    /// Notify every workload filter that the current frame's output has
    /// been fully applied/flushed.
    pub fn frame_complete(&mut self) {
        let elapsed = self.elapsed();
        for f in &mut self.workload_filters {
            f.on_frame_complete(elapsed);
        }
    }

    /// Drain pending input: tokens the presentation adapter has
    /// tokenized since the last poll, merged with any events injected
    /// directly on the workload adapter's channel (the headless path).
    /// `Token::Malformed` is dropped here (the router never sees it);
    /// `Token::Resize` is applied to the buffer and surfaced as
    /// [`InputEvent::Resize`] rather than forwarded as a raw token.
    pub fn poll_input(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if let Some(p) = &mut self.presentation {
            let tokens = p.poll_tokens();
            if !tokens.is_empty() {
                let elapsed = self.elapsed();
                for f in &mut self.workload_filters {
                    f.on_input(&tokens, elapsed);
                }
                for token in tokens {
                    match token {
                        Token::Resize(w, h) => {
                            self.buffer.resize(Size::new(w, h));
                            for f in &mut self.workload_filters {
                                f.on_resize(w, h, elapsed);
                            }
                            for f in &mut self.presentation_filters {
                                f.on_resize(w, h, elapsed);
                            }
                            events.push(InputEvent::Resize(crate::input::ResizeEvent { w, h }));
                        }
                        Token::Key(k) => events.push(InputEvent::Key(k)),
                        Token::Mouse(m) => events.push(InputEvent::Mouse(m)),
                        Token::FocusIn => events.push(InputEvent::FocusIn),
                        Token::FocusOut => events.push(InputEvent::FocusOut),
                        Token::Malformed => {}
                        _ => {}
                    }
                }
            }
        }

        while let Some(event) = self.workload.try_recv() {
            events.push(event);
        }

        events
    }

    /// Await the next input event without busy-polling, for callers with
    /// no presentation adapter attached (headless). Callers driving a
    /// real TTY should poll [`Self::poll_input`] on a short interval
    /// instead, since the presentation adapter's reader runs on its own
    /// thread and never blocks this call.
    pub async fn recv(&mut self) -> Option<InputEvent> {
        self.workload.recv().await
    }

    /// An immutable snapshot of the current buffer contents, for
    /// programmatic inspection (headless tests, pattern scraping).
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.buffer.surface())
    }

    /// The buffer's current size.
    pub fn size(&self) -> Size {
        self.buffer.size()
    }

    /// Tear down the session: notifies every filter and, if attached,
    /// restores the presentation adapter's terminal state.
    pub fn end_session(&mut self) -> Result<()> {
        let elapsed = self.elapsed();
        for f in &mut self.workload_filters {
            f.on_session_end(elapsed);
        }
        for f in &mut self.presentation_filters {
            f.on_session_end(elapsed);
        }
        if let Some(p) = &mut self.presentation {
            p.stop()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::token::SgrParams;
    use crate::color::Color;
    use crate::pipeline::adapter::{ChannelWorkloadAdapter, InputInjector};

    fn pipeline() -> (Pipeline<ChannelWorkloadAdapter>, InputInjector) {
        let (workload, injector) = ChannelWorkloadAdapter::new(8);
        (Pipeline::new(workload, Size::new(10, 2)), injector)
    }

    #[test]
    fn headless_output_updates_snapshot() {
        let (mut p, _inj) = pipeline();
        p.start_session().unwrap();
        p.output(vec![
            Token::CursorPosition { row: 1, col: 1 },
            Token::Sgr(SgrParams { fg: Some(Color::RED), bg: None, attrs: Default::default(), reset: false }),
            Token::Text("hi".into()),
        ])
        .unwrap();
        let snap = p.snapshot();
        assert!(snap.contains_text("hi"));
        assert!(snap.has_foreground(Color::RED));
    }

    #[tokio::test]
    async fn headless_injected_event_is_polled() {
        let (mut p, inj) = pipeline();
        p.start_session().unwrap();
        inj.send(InputEvent::FocusIn).await.unwrap();
        let events = p.poll_input();
        assert_eq!(events, vec![InputEvent::FocusIn]);
    }
}
