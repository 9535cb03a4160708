//! Canonical style resolver.
//!
//! # Responsibility
//! - Map a stored palette identifier to border, background, accent and
//!   scroll-region colors.
//! - Apply the `full_bg` gating rule in one place for every card context.
//!
//! # Invariants
//! - Every resolver is total: unknown identifiers yield the `default` entry.
//! - The same identifier yields the same outputs for every caller.

pub mod effect;

use std::fmt::{Display, Formatter};

/// Presentation class token (border/background utility class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleToken(&'static str);

impl StyleToken {
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for StyleToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// CSS hex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue(&'static str);

impl ColorValue {
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for ColorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Scrollbar colors for the message region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollColors {
    pub track: ColorValue,
    pub thumb: ColorValue,
}

/// Background used whenever `full_bg` is off.
pub const NEUTRAL_BACKGROUND: StyleToken = StyleToken("bg-white/90");

struct PaletteEntry {
    id: &'static str,
    label: &'static str,
    border: StyleToken,
    background: StyleToken,
    accent: ColorValue,
    track: ColorValue,
    thumb: ColorValue,
}

const fn entry(
    id: &'static str,
    label: &'static str,
    border: &'static str,
    background: &'static str,
    accent: &'static str,
    track: &'static str,
) -> PaletteEntry {
    PaletteEntry {
        id,
        label,
        border: StyleToken(border),
        background: StyleToken(background),
        accent: ColorValue(accent),
        track: ColorValue(track),
        thumb: ColorValue(accent),
    }
}

// First entry is the fallback.
static PALETTE: &[PaletteEntry] = &[
    entry("default", "Default", "border-gray-400", "bg-gray-100", "#9ca3af", "#f3f4f6"),
    entry("blue", "Blue", "border-blue-400", "bg-blue-100", "#60a5fa", "#dbeafe"),
    entry("gray", "Gray", "border-gray-400", "bg-gray-100", "#6b7280", "#f3f4f6"),
    entry("purple", "Purple", "border-purple-400", "bg-purple-100", "#c084fc", "#f3e8ff"),
    entry("navy", "Navy", "border-blue-900", "bg-blue-100", "#1e3a8a", "#dbeafe"),
    entry("maroon", "Maroon", "border-red-800", "bg-red-100", "#991b1b", "#fee2e2"),
    entry("pink", "Pink", "border-pink-400", "bg-pink-100", "#f472b6", "#fce7f3"),
    entry("teal", "Teal", "border-teal-400", "bg-teal-100", "#2dd4bf", "#ccfbf1"),
    entry("green", "Green", "border-green-400", "bg-green-100", "#4ade80", "#dcfce7"),
    entry("orange", "Orange", "border-orange-400", "bg-orange-100", "#fb923c", "#ffedd5"),
    entry("yellow", "Yellow", "border-yellow-400", "bg-yellow-100", "#facc15", "#fef9c3"),
    entry("black", "Black", "border-gray-900", "bg-gray-300", "#111827", "#d1d5db"),
];

fn lookup(color: &str) -> &'static PaletteEntry {
    let color = color.trim();
    PALETTE
        .iter()
        .find(|entry| entry.id.eq_ignore_ascii_case(color))
        .unwrap_or(&PALETTE[0])
}

/// Whether `color` names a palette entry (case-insensitive).
pub fn is_known_color(color: &str) -> bool {
    let color = color.trim();
    PALETTE
        .iter()
        .any(|entry| entry.id.eq_ignore_ascii_case(color))
}

pub fn border_style_for(color: &str) -> StyleToken {
    lookup(color).border
}

pub fn background_style_for(color: &str) -> StyleToken {
    lookup(color).background
}

/// Accent used by the "open" affordance and the special-effect marker.
pub fn accent_color_for(color: &str) -> ColorValue {
    lookup(color).accent
}

pub fn scroll_region_colors_for(color: &str) -> ScrollColors {
    let entry = lookup(color);
    ScrollColors {
        track: entry.track,
        thumb: entry.thumb,
    }
}

/// Identifier/label pairs for the submission form, fallback first.
pub fn palette_options() -> impl Iterator<Item = (&'static str, &'static str)> {
    PALETTE.iter().map(|entry| (entry.id, entry.label))
}

/// Fully resolved styling for one card face or detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyle {
    pub border: StyleToken,
    pub background: StyleToken,
    pub accent: ColorValue,
    pub scroll: ScrollColors,
}

/// Resolves card styling; background follows `color` only when
/// `full_background` is set, everything else always follows `color`.
pub fn resolve_card_style(color: &str, full_background: bool) -> CardStyle {
    CardStyle {
        border: border_style_for(color),
        background: if full_background {
            background_style_for(color)
        } else {
            NEUTRAL_BACKGROUND
        },
        accent: accent_color_for(color),
        scroll: scroll_region_colors_for(color),
    }
}
