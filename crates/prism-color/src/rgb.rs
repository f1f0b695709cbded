//! RGB triples and the packing convention shared with the image decoder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// HSP brightness at or below which light text reads better than dark text.
const TEXT_TONE_THRESHOLD: f64 = 127.5;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a sample value laid out as `0xAARRGGBB`.
    ///
    /// This is the layout produced by Android's `Bitmap#getPixels` and
    /// `Color.argb`, which the upstream decoder uses to build the sample
    /// sequence. Red occupies bits 16..24, green 8..16, blue 0..8. The alpha
    /// byte is ignored. Any other producer must pack samples the same way or
    /// the reported palette will have its channels swapped.
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack into `0xAARRGGBB` with an opaque alpha byte.
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        0xFF00_0000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Format as uppercase `#RRGGBB`.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB` or `RRGGBB` (case-insensitive).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ColorError::InvalidHex`] | Not exactly six hex digits after an optional `#` |
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex {
            input: input.to_string(),
        };
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        Ok(Self::from_packed(value))
    }

    /// HSP perceived brightness in `[0, 255]`.
    ///
    /// `sqrt(0.299 r² + 0.587 g² + 0.114 b²)`
    #[must_use]
    pub fn perceived_brightness(self) -> f64 {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt()
    }

    /// Text tone that stays legible on top of this color.
    #[must_use]
    pub fn text_tone(self) -> TextTone {
        if self.perceived_brightness() <= TEXT_TONE_THRESHOLD {
            TextTone::Light
        } else {
            TextTone::Dark
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Foreground tone to draw over a palette swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTone {
    /// Light text, for dark backgrounds.
    Light,
    /// Dark text, for light backgrounds.
    Dark,
}

impl TextTone {
    /// The concrete text color for this tone.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Light => Rgb::new(0xFD, 0xF6, 0xE3),
            Self::Dark => Rgb::new(0x00, 0x2B, 0x36),
        }
    }
}
