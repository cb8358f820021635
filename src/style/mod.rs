/*!
 * Subtitle styling.
 *
 * # Architecture
 *
 * - `config`: User-facing `StyleConfig` and its on-disk lookup
 * - `color`: Hex color conversion to renderer byte order
 * - `fonts`: Installed font families and font listing
 * - `resolver`: `StyleConfig` to `ResolvedStyle`
 */

pub mod color;
pub mod config;
pub mod fonts;
pub mod resolver;

pub use color::AssColor;
pub use config::{Margins, StyleConfig};
pub use fonts::{FontCatalog, FontFace, list_fonts};
pub use resolver::{BorderStyle, ResolvedStyle, StyleResolver};
