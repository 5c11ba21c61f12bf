//! Fixed type -> display color table used to theme the detail screen.

use ratatui::style::Color;

/// Display colors for the eighteen elemental types. Types missing from the
/// table leave the theme unchanged.
pub const TYPE_COLORS: &[(&str, Color)] = &[
    ("normal", Color::Rgb(0xA8, 0xA8, 0x78)),
    ("fire", Color::Rgb(0xF0, 0x80, 0x30)),
    ("water", Color::Rgb(0x68, 0x90, 0xF0)),
    ("electric", Color::Rgb(0xF8, 0xD0, 0x30)),
    ("grass", Color::Rgb(0x78, 0xC8, 0x50)),
    ("ice", Color::Rgb(0x98, 0xD8, 0xD8)),
    ("fighting", Color::Rgb(0xC0, 0x30, 0x28)),
    ("poison", Color::Rgb(0xA0, 0x40, 0xA0)),
    ("ground", Color::Rgb(0xE0, 0xC0, 0x68)),
    ("flying", Color::Rgb(0xA8, 0x90, 0xF0)),
    ("psychic", Color::Rgb(0xF8, 0x58, 0x88)),
    ("bug", Color::Rgb(0xA8, 0xB8, 0x20)),
    ("rock", Color::Rgb(0xB8, 0xA0, 0x38)),
    ("ghost", Color::Rgb(0x70, 0x58, 0x98)),
    ("dragon", Color::Rgb(0x70, 0x38, 0xF8)),
    ("dark", Color::Rgb(0x70, 0x58, 0x48)),
    ("steel", Color::Rgb(0xB8, 0xB8, 0xD0)),
    ("fairy", Color::Rgb(0xEE, 0x99, 0xAC)),
];

pub fn type_color(name: &str) -> Option<Color> {
    TYPE_COLORS
        .iter()
        .find(|(type_name, _)| *type_name == name)
        .map(|(_, color)| *color)
}
