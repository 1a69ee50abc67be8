//! Crash/error display node.
//!
//! Replaces the root when a handler or build/reconcile/render phase panics
//! or returns an error the app loop can't otherwise absorb. A real node
//! variant rather than a special-cased overlay, so it participates in the
//! focus ring like anything else (its Retry/Abort action buttons are
//! ordinary [`crate::nodes::ButtonNode`] children).

/// The phase that was running when the failure was caught.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Build,
    Reconcile,
    Render,
    Input,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Build => "Build",
            Phase::Reconcile => "Reconcile",
            Phase::Render => "Render",
            Phase::Input => "Input",
        }
    }
}

/// An error panel: a titled, scrollable details pane. Action buttons live
/// as sibling/child [`crate::nodes::ButtonNode`]s in the tree rather than
/// inline here.
pub struct ErrorPanelNode {
    /// Which phase the failure originated in.
    pub phase: Phase,
    /// One-line summary shown under the title.
    pub message: String,
    /// Full details (e.g. a formatted backtrace), one entry per line.
    pub details: Vec<String>,
    /// Current scroll position within `details`.
    pub scroll_offset: u16,
}

impl ErrorPanelNode {
    /// A new error panel at scroll position 0.
    pub fn new(phase: Phase, message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            phase,
            message: message.into(),
            details,
            scroll_offset: 0,
        }
    }

    /// The title line: `"{Phase} error"`.
    pub fn title(&self) -> String {
        format!("{} error", self.phase.label())
    }
}
