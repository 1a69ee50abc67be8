//! 24-bit color model and SGR attribute bitset (§3 Data Model).

/// A terminal color: either 24-bit RGB or "unset" (lets the terminal's
/// default foreground/background show through).
///
/// Equality is structural — two `Rgb` values are equal iff their channels
/// match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// The terminal's default color for this channel.
    Default,
    /// A 24-bit RGB color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Construct an RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r, g, b)
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Red.
    pub const RED: Self = Self::rgb(205, 0, 0);
    /// Green.
    pub const GREEN: Self = Self::rgb(0, 205, 0);
    /// Yellow.
    pub const YELLOW: Self = Self::rgb(205, 205, 0);
    /// Blue.
    pub const BLUE: Self = Self::rgb(0, 0, 238);
    /// Magenta.
    pub const MAGENTA: Self = Self::rgb(205, 0, 205);
    /// Cyan.
    pub const CYAN: Self = Self::rgb(0, 205, 205);
    /// A neutral gray, useful for dimmed chrome.
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// The SGR parameter sequence for this color as a foreground
    /// (`38;2;R;G;B`) — the caller decides whether to prefix with `38;2;`
    /// or the background equivalent; see [`Color::sgr_params`].
    pub fn sgr_params(self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Default => None,
            Color::Rgb(r, g, b) => Some((r, g, b)),
        }
    }
}

/// A bitset of SGR text attributes (§3 Data Model).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attrs(u8);

impl Attrs {
    /// No attributes set.
    pub const NONE: Self = Self(0);
    /// Bold (SGR 1).
    pub const BOLD: Self = Self(1 << 0);
    /// Italic (SGR 3).
    pub const ITALIC: Self = Self(1 << 1);
    /// Underline (SGR 4).
    pub const UNDERLINE: Self = Self(1 << 2);
    /// Strikethrough (SGR 9).
    pub const STRIKETHROUGH: Self = Self(1 << 3);
    /// Reverse video (SGR 7).
    pub const REVERSE: Self = Self(1 << 4);
    /// Dim/faint (SGR 2).
    pub const DIM: Self = Self(1 << 5);
    /// Blink (SGR 5).
    pub const BLINK: Self = Self(1 << 6);

    /// True if no attributes are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if `other`'s bits are all set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Iterate the individual attribute bits that are set, in a stable
    /// order matching the SGR codes the emitter writes them as.
    pub fn iter(self) -> impl Iterator<Item = Self> {
        const ALL: [Attrs; 7] = [
            Attrs::BOLD,
            Attrs::DIM,
            Attrs::ITALIC,
            Attrs::UNDERLINE,
            Attrs::BLINK,
            Attrs::REVERSE,
            Attrs::STRIKETHROUGH,
        ];
        ALL.into_iter().filter(move |bit| self.contains(*bit))
    }

    /// The SGR numeric code for a single-bit attribute value.
    ///
    /// Panics (in debug builds, via `debug_assert`) if called on a value
    /// with more than one bit set; callers should use [`Attrs::iter`] to
    /// decompose a set before calling this.
    pub const fn sgr_code(self) -> u8 {
        match self.0 {
            x if x == Attrs::BOLD.0 => 1,
            x if x == Attrs::DIM.0 => 2,
            x if x == Attrs::ITALIC.0 => 3,
            x if x == Attrs::UNDERLINE.0 => 4,
            x if x == Attrs::BLINK.0 => 5,
            x if x == Attrs::REVERSE.0 => 7,
            x if x == Attrs::STRIKETHROUGH.0 => 9,
            _ => 0,
        }
    }
}

impl std::ops::BitOr for Attrs {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Attrs {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::Sub for Attrs {
    type Output = Self;
    /// Bits of `rhs` cleared from `self`.
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_equality_is_structural() {
        assert_eq!(Color::rgb(1, 2, 3), Color::rgb(1, 2, 3));
        assert_ne!(Color::rgb(1, 2, 3), Color::rgb(1, 2, 4));
        assert_ne!(Color::Default, Color::rgb(0, 0, 0));
    }

    #[test]
    fn attrs_union_and_contains() {
        let a = Attrs::BOLD | Attrs::ITALIC;
        assert!(a.contains(Attrs::BOLD));
        assert!(a.contains(Attrs::ITALIC));
        assert!(!a.contains(Attrs::UNDERLINE));
    }

    #[test]
    fn attrs_subtraction_clears_bits() {
        let a = Attrs::BOLD | Attrs::ITALIC | Attrs::UNDERLINE;
        let b = a - Attrs::ITALIC;
        assert!(b.contains(Attrs::BOLD));
        assert!(!b.contains(Attrs::ITALIC));
        assert!(b.contains(Attrs::UNDERLINE));
    }

    #[test]
    fn attrs_iter_yields_each_set_bit_once() {
        let a = Attrs::BOLD | Attrs::REVERSE;
        let codes: Vec<u8> = a.iter().map(Attrs::sgr_code).collect();
        assert_eq!(codes, vec![1, 7]);
    }

    #[test]
    fn empty_attrs_has_no_bits() {
        assert!(Attrs::NONE.is_empty());
        assert_eq!(Attrs::NONE.iter().count(), 0);
    }
}
