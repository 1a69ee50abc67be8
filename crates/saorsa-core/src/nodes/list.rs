//! Selectable list node, with a selection indicator column.

/// The default number of columns reserved for the selection indicator
/// (`"> "`).
pub const DEFAULT_INDICATOR_WIDTH: u16 = 2;

/// A vertical list of text items with an optional selected index, drawn
/// with a leading indicator column on the selected row.
pub struct ListNode {
    /// The rendered text of each row.
    pub items: Vec<String>,
    /// The currently selected row, if any.
    pub selected: Option<usize>,
    /// Columns reserved before each item's text for the indicator glyph.
    pub indicator_width: u16,
}

impl ListNode {
    /// A list with no selection and the default indicator width.
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            selected: None,
            indicator_width: DEFAULT_INDICATOR_WIDTH,
        }
    }

    /// A list with an initial selection.
    pub fn with_selected(items: Vec<String>, selected: usize) -> Self {
        Self {
            items,
            selected: Some(selected),
            indicator_width: DEFAULT_INDICATOR_WIDTH,
        }
    }

    /// Move the selection down one row, clamping at the last item.
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    /// Move the selection up one row, clamping at the first item.
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i > 0 => i - 1,
            Some(_) => 0,
            None => 0,
        });
    }
}
