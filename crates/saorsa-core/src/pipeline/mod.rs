//! The terminal I/O pipeline (§2 component "Terminal I/O pipeline", §4.8).
//!
//! A [`Pipeline`] sits between the app loop and the real TTY (or nothing,
//! in headless mode). Output tokens produced by [`crate::ansi::emit`] flow
//! through it: the in-memory [`TerminalBuffer`] applies them first (so
//! snapshots always reflect what the app "wrote", even headless), then
//! [`WorkloadFilter`]s observe, then [`PresentationFilter`]s get a chance
//! to rewrite the stream before it reaches the [`PresentationAdapter`].
//! Input flows the other way: the presentation adapter tokenizes raw TTY
//! bytes, filters observe, and the result lands on the
//! [`WorkloadAdapter`]'s input channel for the app loop to drain.
//!
//! This module is the only place that knows a [`PresentationAdapter`]
//! might be absent — every other subsystem just deals in [`crate::ansi`]
//! tokens and [`crate::input::InputEvent`]s.

mod adapter;
mod buffer;
mod filter;
mod pipeline;
mod recording;
mod snapshot;
mod tty;

pub use adapter::{ChannelWorkloadAdapter, InputInjector, PresentationAdapter, WorkloadAdapter};
pub use buffer::TerminalBuffer;
pub use filter::{PresentationFilter, WorkloadFilter};
pub use pipeline::Pipeline;
pub use recording::AsciicastRecorder;
pub use snapshot::{PatternMatch, Snapshot};
pub use tty::TtyPresentationAdapter;
