/*!
 * CSS-style hex colors to subtitle `&HAABBGGRR` values.
 *
 * Accepted inputs:
 * - `#RRGGBB`: opacity byte supplied by the caller
 * - `#RRGGBBAA`: CSS alpha (`FF` = opaque), inverted for the renderer
 * - `#80RRGGBB`: legacy alpha-first form, recognized only by its `#80` prefix
 * - `rgba(...)`: not parsed, always semi-transparent black
 *
 * Anything else resolves to opaque white.
 */

use std::fmt;

use log::warn;

/// Prefix marking the legacy alpha-first `#AARRGGBB` form
const LEGACY_ALPHA_FIRST_PREFIX: &str = "#80";

/// Renderer alpha for a fully opaque color
pub const OPAQUE: u8 = 0x00;

/// Renderer alpha for a fully transparent color
pub const TRANSPARENT: u8 = 0xFF;

/// A color in renderer byte order, alpha `00` opaque and `FF` transparent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssColor {
    pub alpha: u8,
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl AssColor {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    /// Transparent-box back color used when no background is drawn
    pub const NONE: Self = Self::BLACK;
    /// Stand-in for `rgba(...)` inputs
    pub const HALF_BLACK: Self = Self {
        alpha: 0x80,
        ..Self::BLACK
    };

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha: OPAQUE,
            blue,
            green,
            red,
        }
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha == TRANSPARENT
    }

    /// Parse a hex color, falling back to opaque white.
    ///
    /// `alpha` applies to 6-digit colors only; 8-digit colors carry their own.
    pub fn parse(color: &str, alpha: u8) -> Self {
        let color = color.trim();
        if color.is_empty() {
            return Self::WHITE;
        }

        if color.starts_with("rgba") {
            return Self::HALF_BLACK;
        }

        match Self::parse_hex(color, alpha) {
            Some(parsed) => parsed,
            None => {
                warn!("Unparseable color '{}', using opaque white", color);
                Self::WHITE
            }
        }
    }

    fn parse_hex(color: &str, alpha: u8) -> Option<Self> {
        let raw = color.trim_start_matches('#');
        if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let byte = |i: usize| u8::from_str_radix(&raw[i..i + 2], 16).ok();

        match raw.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?).with_alpha(alpha)),
            8 if color.starts_with(LEGACY_ALPHA_FIRST_PREFIX) => {
                let css_alpha = byte(0)?;
                Some(Self::rgb(byte(2)?, byte(4)?, byte(6)?).with_alpha(255 - css_alpha))
            }
            8 => {
                let css_alpha = byte(6)?;
                Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?).with_alpha(255 - css_alpha))
            }
            _ => None,
        }
    }
}

impl fmt::Display for AssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "&H{:02X}{:02X}{:02X}{:02X}",
            self.alpha, self.blue, self.green, self.red
        )
    }
}
