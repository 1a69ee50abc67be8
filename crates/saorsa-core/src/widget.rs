//! Immutable widget descriptions, reconciled into persistent nodes each
//! frame.
//!
//! Widgets are thrown away every frame; only the node tree persists. Each
//! widget carries its expected node kind, a reconcile payload, optional
//! layout hints, an optional bindings-configurator, and its children.

use crate::input::binding::BindingSet;
use crate::node::Key;
use crate::nodes::border::BorderGlyphs;
use crate::nodes::responsive::Breakpoint;
use crate::nodes::splitter::Pivot;
use crate::nodes::Axis;
use crate::theme::Theme;

/// The reconcile payload carried by a widget: enough to build or update the
/// matching [`crate::nodes::NodeKind`] variant.
pub enum WidgetKind {
    Text { text: String, wrap: bool },
    VStack { spacing: u16 },
    HStack { spacing: u16 },
    Border { title: Option<String>, glyphs: BorderGlyphs },
    Padding { top: u16, right: u16, bottom: u16, left: u16 },
    List { items: Vec<String>, selected: Option<usize> },
    Scroll { axis: Axis, show_scrollbar: bool },
    Splitter { axis: Axis, pivot: Pivot },
    ThemingPanel { overlay: Theme },
    Responsive { breakpoints: Vec<Breakpoint>, children: Vec<Widget>, otherwise: Box<Widget> },
    Button { label: String, on_click: Option<BoxedClick> },
    ErrorPanel { phase: crate::nodes::error_panel::Phase, message: String, details: Vec<String> },
}

/// A boxed click handler; kept as a type alias since `Box<dyn FnMut()>`
/// appears in several widget constructors.
pub type BoxedClick = Box<dyn FnMut()>;

/// An immutable, throwaway UI description produced every frame.
pub struct Widget {
    /// The node kind and its reconcile payload.
    pub kind: WidgetKind,
    /// The reconciler key, for matching against siblings across frames.
    pub key: Key,
    /// Children, in declaration order. `Responsive` stores its own
    /// candidates inline in `WidgetKind::Responsive` instead.
    pub children: Vec<Widget>,
    /// Optional fixed width hint.
    pub width_hint: Option<u16>,
    /// Optional fixed height hint.
    pub height_hint: Option<u16>,
    /// Flex weight for this widget as a stack child.
    pub fill_weight: Option<u16>,
    /// Applied to the reconciled node's `BindingSet` after reconcile.
    pub bindings_configurator: Option<Box<dyn FnOnce(&mut BindingSet)>>,
}

impl Widget {
    fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            key: Key::Index(0),
            children: Vec::new(),
            width_hint: None,
            height_hint: None,
            fill_weight: None,
            bindings_configurator: None,
        }
    }

    /// Set an explicit reconciler key.
    #[must_use]
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Key::Named(key.into());
        self
    }

    /// Attach children (ignored by widget kinds that don't take children,
    /// e.g. `Text`/`Button`).
    #[must_use]
    pub fn with_children(mut self, children: Vec<Widget>) -> Self {
        self.children = children;
        self
    }

    /// Attach a single child.
    #[must_use]
    pub fn with_child(mut self, child: Widget) -> Self {
        self.children = vec![child];
        self
    }

    /// Fix this widget's width regardless of measured size.
    #[must_use]
    pub fn width(mut self, w: u16) -> Self {
        self.width_hint = Some(w);
        self
    }

    /// Fix this widget's height regardless of measured size.
    #[must_use]
    pub fn height(mut self, h: u16) -> Self {
        self.height_hint = Some(h);
        self
    }

    /// Set this widget's flex weight as a stack child.
    #[must_use]
    pub fn fill(mut self, weight: u16) -> Self {
        self.fill_weight = Some(weight);
        self
    }

    /// Configure key/mouse bindings on the reconciled node.
    #[must_use]
    pub fn with_input_bindings(mut self, configure: impl FnOnce(&mut BindingSet) + 'static) -> Self {
        self.bindings_configurator = Some(Box::new(configure));
        self
    }

    /// A non-wrapping text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Text { text: text.into(), wrap: false })
    }

    /// A wrapping text block.
    pub fn text_wrapped(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Text { text: text.into(), wrap: true })
    }

    /// A vertical stack.
    pub fn vstack() -> Self {
        Self::new(WidgetKind::VStack { spacing: 0 })
    }

    /// A horizontal stack.
    pub fn hstack() -> Self {
        Self::new(WidgetKind::HStack { spacing: 0 })
    }

    /// A plain square border around one child.
    pub fn border() -> Self {
        Self::new(WidgetKind::Border { title: None, glyphs: BorderGlyphs::SQUARE })
    }

    /// A border with a title, around one child.
    pub fn border_titled(title: impl Into<String>) -> Self {
        Self::new(WidgetKind::Border { title: Some(title.into()), glyphs: BorderGlyphs::SQUARE })
    }

    /// Uniform padding around one child.
    pub fn padding(amount: u16) -> Self {
        Self::new(WidgetKind::Padding { top: amount, right: amount, bottom: amount, left: amount })
    }

    /// A selectable list.
    pub fn list(items: Vec<String>, selected: Option<usize>) -> Self {
        Self::new(WidgetKind::List { items, selected })
    }

    /// A vertical scroll viewport around one child.
    pub fn vscroll(show_scrollbar: bool) -> Self {
        Self::new(WidgetKind::Scroll { axis: Axis::Vertical, show_scrollbar })
    }

    /// A horizontal scroll viewport around one child.
    pub fn hscroll(show_scrollbar: bool) -> Self {
        Self::new(WidgetKind::Scroll { axis: Axis::Horizontal, show_scrollbar })
    }

    /// A two-pane splitter; takes exactly two children.
    pub fn splitter(axis: Axis, pivot: Pivot) -> Self {
        Self::new(WidgetKind::Splitter { axis, pivot })
    }

    /// A theme-overlay scope around one child.
    pub fn theming_panel(overlay: Theme) -> Self {
        Self::new(WidgetKind::ThemingPanel { overlay })
    }

    /// A breakpoint-selected single child.
    pub fn responsive(breakpoints: Vec<(Breakpoint, Widget)>, otherwise: Widget) -> Self {
        let (breakpoints, children): (Vec<_>, Vec<_>) = breakpoints.into_iter().unzip();
        Self::new(WidgetKind::Responsive {
            breakpoints,
            children,
            otherwise: Box::new(otherwise),
        })
    }

    /// A focusable, clickable label.
    pub fn button(label: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button { label: label.into(), on_click: None })
    }

    /// Attach a click handler to a button widget (no-op on other kinds).
    #[must_use]
    pub fn on_click(mut self, handler: impl FnMut() + 'static) -> Self {
        if let WidgetKind::Button { on_click, .. } = &mut self.kind {
            *on_click = Some(Box::new(handler));
        }
        self
    }

    /// The crash/error display.
    pub fn error_panel(
        phase: crate::nodes::error_panel::Phase,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self::new(WidgetKind::ErrorPanel { phase, message: message.into(), details })
    }
}
