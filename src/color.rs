//! Hex color parsing and opacity conversion.

use palette::Srgb;

use crate::error::{Error, Result};

/// An opaque 8-bit sRGB color.
pub type Rgb8 = Srgb<u8>;

/// Parses `#rrggbb`, `rrggbb` or the `#rgb` shorthand.
pub fn parse_hex(value: &str) -> Result<Rgb8> {
    value
        .trim()
        .parse::<Rgb8>()
        .map_err(|_| Error::InvalidColor(value.to_string()))
}

/// Formats a color as lowercase `#rrggbb`.
pub fn to_hex(color: Rgb8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Converts a 0-100 opacity percentage to an 8-bit alpha, clamping above 100.
pub fn percent_to_alpha(percent: u8) -> u8 {
    let percent = percent.min(100);
    (f32::from(percent) / 100.0 * 255.0).round() as u8
}

/// Converts a 0-100 opacity percentage to a 0.0-1.0 factor, clamping above 100.
pub fn percent_to_opacity(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}
