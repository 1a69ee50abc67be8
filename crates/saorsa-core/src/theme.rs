//! Theme tokens and the render-time theme stack (§3 Data Model, §4.4).
//!
//! A theme is an immutable map from typed token keys to values. A theming
//! panel node pushes an overlay before descending into its child's render
//! and pops it on the way out; token lookups walk the stack top-down and
//! the topmost match wins. This is a plain scoped push/pop threaded through
//! the render context — no thread-local state (§9 Design Notes).

use std::collections::HashMap;

use crate::color::Color;

/// A typed theme token key. Applications extend the catalogue by adding
/// new `Custom` keys; the framework's own widgets only ever look up the
/// named variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TokenKey {
    /// Default text foreground.
    Foreground,
    /// Default surface background.
    Background,
    /// Accent color used for selection/focus highlighting.
    Accent,
    /// Color for chrome such as borders and scrollbars.
    Border,
    /// Color for disabled/inactive elements.
    Muted,
    /// An application-defined token.
    Custom(String),
}

/// A single theme value. Kept small and closed; widgets that need richer
/// styling compose multiple token lookups rather than widening this enum.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    /// A color value.
    Color(Color),
    /// A plain string (e.g. a glyph choice).
    Text(String),
}

/// An immutable set of token → value bindings.
#[derive(Clone, Debug, Default)]
pub struct Theme {
    tokens: HashMap<TokenKey, TokenValue>,
}

impl Theme {
    /// An empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a token's value, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: TokenKey, value: TokenValue) -> Self {
        self.tokens.insert(key, value);
        self
    }

    /// Look up a token directly in this theme (no stack walk).
    pub fn get(&self, key: &TokenKey) -> Option<&TokenValue> {
        self.tokens.get(key)
    }

    /// The framework's built-in default theme.
    pub fn default_theme() -> Self {
        Self::new()
            .with(TokenKey::Foreground, TokenValue::Color(Color::WHITE))
            .with(TokenKey::Background, TokenValue::Color(Color::Default))
            .with(TokenKey::Accent, TokenValue::Color(Color::CYAN))
            .with(TokenKey::Border, TokenValue::Color(Color::GRAY))
            .with(TokenKey::Muted, TokenValue::Color(Color::GRAY))
    }
}

/// A stack of theme overlays, walked top-down on lookup.
///
/// Pushed by theming-panel nodes during render and popped on the way back
/// out; the stack always has at least the base theme at index 0.
#[derive(Clone, Debug)]
pub struct ThemeStack {
    layers: Vec<Theme>,
}

impl ThemeStack {
    /// Create a stack with `base` as its only (bottom) layer.
    pub fn new(base: Theme) -> Self {
        Self { layers: vec![base] }
    }

    /// Push an overlay on top of the stack.
    pub fn push(&mut self, overlay: Theme) {
        self.layers.push(overlay);
    }

    /// Pop the topmost overlay. The base layer (index 0) is never popped.
    pub fn pop(&mut self) {
        if self.layers.len() > 1 {
            self.layers.pop();
        }
    }

    /// Resolve a token by walking the stack top-down; the first (topmost)
    /// layer defining it wins.
    pub fn resolve(&self, key: &TokenKey) -> Option<&TokenValue> {
        self.layers.iter().rev().find_map(|layer| layer.get(key))
    }

    /// Resolve a token to a color, falling back to `default` if unset or
    /// not a color value.
    pub fn color(&self, key: &TokenKey, default: Color) -> Color {
        match self.resolve(key) {
            Some(TokenValue::Color(c)) => *c,
            _ => default,
        }
    }

    /// Current stack depth (always ≥ 1).
    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

/// RAII guard returned by [`ThemeStack::scoped`] that pops the overlay on
/// drop, so a theming panel node can't forget to pop when its render path
/// returns early.
pub struct ThemeScope<'a> {
    stack: &'a mut ThemeStack,
}

impl ThemeStack {
    /// Push `overlay` and return a guard that pops it automatically when
    /// dropped.
    pub fn scoped(&mut self, overlay: Theme) -> ThemeScope<'_> {
        self.push(overlay);
        ThemeScope { stack: self }
    }
}

impl Drop for ThemeScope<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}
