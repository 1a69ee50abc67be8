//! Focusable, clickable label node.
//!
//! The framework's own concrete widget catalogue is out of scope beyond
//! measure/arrange/render/input contracts, but a button is kept here
//! because focus navigation and the error panel both need a minimal
//! focusable leaf to exercise the ring and the router against.

/// A single-line label that can take focus and fires `on_click` when
/// activated by Enter or a left click.
pub struct ButtonNode {
    /// The button's rendered label.
    pub label: String,
    /// Invoked on activation; `None` means the button is inert.
    pub on_click: Option<Box<dyn FnMut()>>,
}

impl ButtonNode {
    /// A button with no click handler attached yet.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_click: None,
        }
    }

    /// Attach (or replace) the click handler.
    pub fn on_click(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Fire the click handler, if any.
    pub fn activate(&mut self) {
        if let Some(handler) = &mut self.on_click {
            handler();
        }
    }
}
