//! Workload and presentation adapter traits.
//!
//! The workload adapter is the application side: it owns the input-event
//! channel the app loop drains. The presentation adapter is the TTY side:
//! it serializes output bytes to the real terminal and produces tokenized
//! input from whatever it reads back. A [`Pipeline`](super::Pipeline) can
//! run with a presentation adapter absent entirely (headless mode) — the
//! workload adapter and its filters still see every event.

use tokio::sync::mpsc;

use crate::ansi::Token;
use crate::error::Result;
use crate::input::InputEvent;

/// The application-facing side of the pipeline: exposes the channel the
/// app loop drains for input, and is notified of every output token so
/// headless consumers (recording, scraping) never need a real TTY.
pub trait WorkloadAdapter: Send {
    /// Drain the next pending input event, if any, without blocking.
    fn try_recv(&mut self) -> Option<InputEvent>;

    /// Block until the next input event arrives, or the channel closes.
    fn recv(&mut self) -> impl std::future::Future<Output = Option<InputEvent>> + Send;
}

/// A bounded-channel-backed [`WorkloadAdapter`]. The default and only
/// implementation the framework ships: applications that want a headless
/// harness construct one directly and drive its [`InputInjector`]; a real
/// CLI app pairs it with a [`TtyPresentationAdapter`](super::TtyPresentationAdapter)
/// whose reader task feeds the same channel.
pub struct ChannelWorkloadAdapter {
    rx: mpsc::Receiver<InputEvent>,
}

/// The producer half of a [`ChannelWorkloadAdapter`]'s channel. Tests and
/// the TTY reader task both push through this handle.
#[derive(Clone)]
pub struct InputInjector {
    tx: mpsc::Sender<InputEvent>,
}

impl InputInjector {
    /// Push one event onto the channel; fails only if the adapter side has
    /// been dropped.
    pub async fn send(&self, event: InputEvent) -> std::result::Result<(), mpsc::error::SendError<InputEvent>> {
        self.tx.send(event).await
    }

    /// Non-blocking push, for contexts (the TTY reader thread) that can't
    /// await.
    pub fn blocking_send(&self, event: InputEvent) -> std::result::Result<(), mpsc::error::SendError<InputEvent>> {
        self.tx.blocking_send(event)
    }
}

impl ChannelWorkloadAdapter {
    /// A fresh adapter with the given channel capacity, plus the injector
    /// used to feed it.
    pub fn new(capacity: usize) -> (Self, InputInjector) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { rx }, InputInjector { tx })
    }
}

impl WorkloadAdapter for ChannelWorkloadAdapter {
    fn try_recv(&mut self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }

    async fn recv(&mut self) -> Option<InputEvent> {
        self.rx.recv().await
    }
}

/// The TTY-facing side of the pipeline: serializes output and produces
/// tokenized input. Absent entirely in headless mode.
pub trait PresentationAdapter: Send {
    /// Enter whatever scoped terminal state the adapter needs (raw mode,
    /// alternate screen, mouse reporting) and report the initial size.
    fn start(&mut self) -> Result<(u16, u16)>;

    /// Write already-filtered output bytes to the terminal.
    fn write(&mut self, bytes: &str) -> Result<()>;

    /// Drain whatever input tokens have been tokenized from the TTY since
    /// the last poll, without blocking.
    fn poll_tokens(&mut self) -> Vec<Token>;

    /// Tear down scoped terminal state, restoring the prior mode. Called
    /// on every exit path; implementations must be idempotent.
    fn stop(&mut self) -> Result<()>;
}
