/*!
 * Style resolution: `StyleConfig` to concrete renderer fields.
 *
 * Resolution never fails. Unparseable colors, sizes, alignments and unknown
 * fonts are replaced by defaults and logged.
 */

use log::{debug, warn};

use super::color::{AssColor, OPAQUE};
use super::config::StyleConfig;
use super::fonts::FontCatalog;

/// Nominal size used when `fontSize` cannot be read
const DEFAULT_FONT_SIZE: f64 = 28.0;
/// Compensates for the renderer drawing smaller than a browser at equal nominal size
const FONT_METRIC_SCALE: f64 = 1.35;
const MIN_FONT_SIZE: u32 = 8;

/// Outline thickness doubles as box padding in box mode
const MIN_BOX_PADDING: u32 = 8;
const DEFAULT_OUTLINE: i32 = 2;
const DEFAULT_SHADOW: i32 = 1;
const DEFAULT_ALIGNMENT: u8 = 2;

/// Substrings of a weight label that select the bold face
const BOLD_WEIGHT_TOKENS: &[&str] = &["medium", "semi", "semibold", "bold", "extra", "extrabold", "black"];
const ITALIC_WEIGHT_TOKEN: &str = "italic";

const DEFAULT_SECONDARY_COLOR: &str = "#0000ff";
const TRANSPARENT_KEYWORD: &str = "transparent";

/// How outline and background are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    /// Outline plus drop shadow
    OutlineAndShadow,
    /// Opaque box behind the text
    OpaqueBox,
}

impl BorderStyle {
    pub fn code(self) -> u8 {
        match self {
            Self::OutlineAndShadow => 1,
            Self::OpaqueBox => 3,
        }
    }
}

/// Fully specified style record, ready for emission
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub font_name: String,
    pub font_size: u32,
    pub primary_color: AssColor,
    pub secondary_color: AssColor,
    pub outline_color: AssColor,
    pub back_color: AssColor,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub scale_x: i32,
    pub scale_y: i32,
    pub spacing: i32,
    pub angle: f64,
    pub border_style: BorderStyle,
    pub outline: u32,
    pub shadow: u32,
    /// Numpad alignment 1-9
    pub alignment: u8,
    pub margin_l: i32,
    pub margin_r: i32,
    pub margin_v: i32,
}

/// Turns style intent into a `ResolvedStyle` against the installed fonts
#[derive(Debug, Clone)]
pub struct StyleResolver<'a> {
    catalog: &'a FontCatalog,
    fallback_family: &'a str,
}

impl<'a> StyleResolver<'a> {
    pub fn new(catalog: &'a FontCatalog, fallback_family: &'a str) -> Self {
        Self {
            catalog,
            fallback_family,
        }
    }

    pub fn resolve(&self, style: &StyleConfig) -> ResolvedStyle {
        let font_name = self
            .catalog
            .resolve_family(style.font_family.as_deref().unwrap_or_default(), self.fallback_family);

        let primary_color = AssColor::parse(style.color.as_deref().unwrap_or("#ffffff"), OPAQUE);
        let secondary_color = match style.secondary_color.as_deref() {
            Some(color) if !color.trim().is_empty() && !color.eq_ignore_ascii_case(DEFAULT_SECONDARY_COLOR) => {
                AssColor::parse(color, OPAQUE)
            }
            _ => primary_color,
        };
        let outline_color = AssColor::parse(style.outline_color.as_deref().unwrap_or("#000000"), OPAQUE);

        let (border_style, back_color) = match background(style) {
            Some(color) => (BorderStyle::OpaqueBox, color),
            None => {
                if style.border_style == Some(3) {
                    debug!("Border style 3 requested without a background color, drawing outline instead");
                }
                (BorderStyle::OutlineAndShadow, AssColor::NONE)
            }
        };

        let mut outline = style.outline.unwrap_or(DEFAULT_OUTLINE).max(0) as u32;
        let shadow = match border_style {
            BorderStyle::OpaqueBox => {
                outline = outline.max(MIN_BOX_PADDING);
                0
            }
            BorderStyle::OutlineAndShadow => style.shadow.unwrap_or(DEFAULT_SHADOW).max(0) as u32,
        };

        let weight = style.font_weight.as_deref().unwrap_or_default().to_lowercase();
        let bold = style.bold || BOLD_WEIGHT_TOKENS.iter().any(|token| weight.contains(token));
        let italic = style.italic || weight.contains(ITALIC_WEIGHT_TOKEN);

        let alignment = resolve_alignment(style);
        let margin = &style.margin;
        let vertical = match alignment {
            1..=3 => margin.bottom,
            7..=9 => margin.top,
            _ => margin.vertical,
        };

        let resolved = ResolvedStyle {
            font_name,
            font_size: resolve_font_size(style.font_size.as_deref()),
            primary_color,
            secondary_color,
            outline_color,
            back_color,
            bold,
            italic,
            underline: style.underline,
            strike_out: style.strike_out,
            scale_x: style.scale_x.filter(|s| *s != 0).unwrap_or(100),
            scale_y: style.scale_y.filter(|s| *s != 0).unwrap_or(100),
            spacing: style.spacing.unwrap_or(0),
            angle: style.angle.unwrap_or(0.0),
            border_style,
            outline,
            shadow,
            alignment,
            margin_l: margin.left.round() as i32,
            margin_r: margin.right.round() as i32,
            margin_v: vertical.round() as i32,
        };

        debug!(
            "Resolved style: font {} {}, border style {}, outline {}, shadow {}, alignment {}",
            resolved.font_name,
            resolved.font_size,
            resolved.border_style.code(),
            resolved.outline,
            resolved.shadow,
            resolved.alignment
        );
        resolved
    }
}

/// Background color if it asks for a visible box
fn background(style: &StyleConfig) -> Option<AssColor> {
    style
        .background_color
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(TRANSPARENT_KEYWORD))
        .map(|c| AssColor::parse(c, OPAQUE))
        .filter(|color| !color.is_transparent())
}

/// Parse "28", "28px" or "28pt" and apply the renderer metric scale
fn resolve_font_size(font_size: Option<&str>) -> u32 {
    let nominal = match font_size {
        None => DEFAULT_FONT_SIZE,
        Some(raw) => {
            let number = raw.replace("px", "").replace("pt", "");
            match number.trim().parse::<f64>() {
                Ok(size) if size.is_finite() && size > 0.0 => size,
                _ => {
                    warn!("Invalid font size '{}', using {}", raw, DEFAULT_FONT_SIZE);
                    DEFAULT_FONT_SIZE
                }
            }
        }
    };

    ((nominal * FONT_METRIC_SCALE).round() as u32).max(MIN_FONT_SIZE)
}

fn resolve_alignment(style: &StyleConfig) -> u8 {
    match style.alignment {
        Some(code @ 1..=9) => code as u8,
        Some(code) => {
            warn!("Invalid alignment value {}, defaulting to {} (bottom center)", code, DEFAULT_ALIGNMENT);
            DEFAULT_ALIGNMENT
        }
        None => legacy_alignment(style.position.as_deref(), style.text_align.as_deref()),
    }
}

/// Numpad code from the legacy `position` and `textAlign` pair
fn legacy_alignment(position: Option<&str>, text_align: Option<&str>) -> u8 {
    let row_start = match position {
        Some("top-center") => 7,
        Some("center") => 4,
        _ => 1,
    };
    let column = match text_align {
        Some("left") => 0,
        Some("right") => 2,
        _ => 1,
    };
    row_start + column
}
