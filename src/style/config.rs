/*!
 * User-facing subtitle style settings.
 *
 * Stored as camelCase JSON, either next to a project or as a global default
 * under the user config directory. Every field is optional on disk; missing
 * fields take the defaults below.
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};

/// File name of the saved global style
pub const GLOBAL_STYLE_FILE: &str = "subtitle-style.json";

/// Margins in renderer pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default = "default_margin")]
    pub left: f64,

    #[serde(default = "default_margin")]
    pub right: f64,

    /// Used for middle-row alignments
    #[serde(default = "default_margin")]
    pub vertical: f64,

    #[serde(default = "default_margin")]
    pub bottom: f64,

    #[serde(default = "default_margin")]
    pub top: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: default_margin(),
            right: default_margin(),
            vertical: default_margin(),
            bottom: default_margin(),
            top: default_margin(),
        }
    }
}

/// Styling intent for rendered subtitles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    // @field: Size as "28", "28px" or "28pt"
    #[serde(default = "default_font_size", deserialize_with = "string_or_number")]
    pub font_size: Option<String>,

    #[serde(default = "default_font_family")]
    pub font_family: Option<String>,

    // @field: Weight label such as "Bold" or "SemiBoldItalic"
    #[serde(default = "default_font_weight")]
    pub font_weight: Option<String>,

    // @field: Primary text color
    #[serde(default = "default_color")]
    pub color: Option<String>,

    #[serde(default = "default_secondary_color")]
    pub secondary_color: Option<String>,

    #[serde(default = "default_outline_color")]
    pub outline_color: Option<String>,

    // @field: Box color, "transparent" to disable the box
    #[serde(default = "default_background_color")]
    pub background_color: Option<String>,

    #[serde(default)]
    pub bold: bool,

    #[serde(default)]
    pub italic: bool,

    #[serde(default)]
    pub underline: bool,

    #[serde(default)]
    pub strike_out: bool,

    #[serde(default = "default_scale")]
    pub scale_x: Option<i32>,

    #[serde(default = "default_scale")]
    pub scale_y: Option<i32>,

    #[serde(default = "default_spacing")]
    pub spacing: Option<i32>,

    #[serde(default = "default_angle")]
    pub angle: Option<f64>,

    // @field: 1 = outline and shadow, 3 = opaque box
    #[serde(default = "default_border_style")]
    pub border_style: Option<i32>,

    #[serde(default = "default_outline")]
    pub outline: Option<i32>,

    #[serde(default = "default_shadow")]
    pub shadow: Option<i32>,

    // @field: Numpad alignment 1-9
    #[serde(default = "default_alignment")]
    pub alignment: Option<i32>,

    #[serde(default)]
    pub margin: Margins,

    // @field: Legacy placement used when alignment is absent
    #[serde(default = "default_position")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            color: default_color(),
            secondary_color: default_secondary_color(),
            outline_color: default_outline_color(),
            background_color: default_background_color(),
            bold: false,
            italic: false,
            underline: false,
            strike_out: false,
            scale_x: default_scale(),
            scale_y: default_scale(),
            spacing: default_spacing(),
            angle: default_angle(),
            border_style: default_border_style(),
            outline: default_outline(),
            shadow: default_shadow(),
            alignment: default_alignment(),
            margin: Margins::default(),
            position: default_position(),
            text_align: None,
        }
    }
}

impl StyleConfig {
    /// Load a style file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read style file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse style file: {}", path.display()))
    }

    /// Save as pretty JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize style")?;
        fs::write(path, content).with_context(|| format!("Failed to write style file: {}", path.display()))
    }

    /// Location of the saved global style, if the platform has a config directory
    pub fn global_style_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(GLOBAL_STYLE_FILE))
    }

    /// Resolve the style for a render request.
    ///
    /// Lookup order: explicit style file, saved global style, then `fallback`.
    pub fn load_effective(explicit: Option<&Path>, global: Option<&Path>, fallback: &StyleConfig) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Using style file: {}", path.display());
            return Self::from_file(path);
        }

        if let Some(path) = global.filter(|p| p.is_file()) {
            debug!("Using global style: {}", path.display());
            return Self::from_file(path);
        }

        debug!("Using style from application config");
        Ok(fallback.clone())
    }
}

/// Accept both `"28"` and `28` for numeric-ish string fields
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

fn default_margin() -> f64 {
    10.0
}

fn default_font_size() -> Option<String> {
    Some("28".to_string())
}

fn default_font_family() -> Option<String> {
    Some("Cairo".to_string())
}

fn default_font_weight() -> Option<String> {
    Some("Bold".to_string())
}

fn default_color() -> Option<String> {
    Some("#ffffff".to_string())
}

fn default_secondary_color() -> Option<String> {
    Some("#0000ff".to_string())
}

fn default_outline_color() -> Option<String> {
    Some("#000000".to_string())
}

fn default_background_color() -> Option<String> {
    Some("#80000000".to_string())
}

fn default_scale() -> Option<i32> {
    Some(100)
}

fn default_spacing() -> Option<i32> {
    Some(0)
}

fn default_angle() -> Option<f64> {
    Some(0.0)
}

fn default_border_style() -> Option<i32> {
    Some(1)
}

fn default_outline() -> Option<i32> {
    Some(2)
}

fn default_shadow() -> Option<i32> {
    Some(1)
}

fn default_alignment() -> Option<i32> {
    Some(2)
}

fn default_position() -> Option<String> {
    Some("bottom-center".to_string())
}
