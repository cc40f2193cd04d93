//! ANSI color palette
//!
//! The fixed set of named colors the prompt can be wrapped in. Names are
//! matched case-insensitively; `none` is a valid entry that renders the
//! text undecorated.

/// Escape sequence that resets all attributes
pub const RESET: &str = "\x1b[0m";

/// A named palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    /// Canonical (lowercase) name
    pub name: &'static str,
    /// Escape sequence that starts the color; empty for `none`
    pub start: &'static str,
}

const PALETTE: &[PaletteColor] = &[
    PaletteColor { name: "none", start: "" },
    PaletteColor { name: "black", start: "\x1b[30m" },
    PaletteColor { name: "red", start: "\x1b[31m" },
    PaletteColor { name: "green", start: "\x1b[32m" },
    PaletteColor { name: "yellow", start: "\x1b[33m" },
    PaletteColor { name: "blue", start: "\x1b[34m" },
    PaletteColor { name: "magenta", start: "\x1b[35m" },
    PaletteColor { name: "cyan", start: "\x1b[36m" },
    PaletteColor { name: "white", start: "\x1b[37m" },
    PaletteColor { name: "gray", start: "\x1b[90m" },
    PaletteColor { name: "bold", start: "\x1b[1m" },
];

/// Look up a palette entry by name
pub fn lookup(name: &str) -> Option<PaletteColor> {
    PALETTE
        .iter()
        .find(|color| color.name.eq_ignore_ascii_case(name.trim()))
        .copied()
}

/// All palette names, in display order
pub fn names() -> impl Iterator<Item = &'static str> {
    PALETTE.iter().map(|color| color.name)
}

/// Wrap `text` in the named color. Unknown names leave the text untouched.
pub fn paint(text: &str, color: &str) -> String {
    match lookup(color) {
        Some(entry) if !entry.start.is_empty() => format!("{}{}{}", entry.start, text, RESET),
        _ => text.to_string(),
    }
}
