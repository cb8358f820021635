/*!
 * Installed font discovery.
 *
 * Families are named after the directories that hold their files, with
 * underscores folded to spaces (`Noto_Sans_Arabic/` is "Noto Sans Arabic").
 * The catalog is scanned once and passed by reference into rendering.
 */

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use walkdir::WalkDir;

/// Family whose name differs from the one the renderer registers
const FAMILY_ALIASES: &[(&str, &str)] = &[("Amiri Quran", "Amiri")];

fn family_from_dir_name(name: &str) -> String {
    name.replace('_', " ")
}

fn folded(name: &str) -> String {
    name.replace(' ', "_")
}

/// Font families available to the subtitle renderer
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    families: BTreeSet<String>,
}

impl FontCatalog {
    /// Build a catalog from known family names
    pub fn from_families<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: families.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect family names from the immediate subdirectories of each font directory.
    ///
    /// Missing or unreadable directories are skipped.
    pub fn scan<P: AsRef<Path>>(font_dirs: &[P]) -> Self {
        let mut families = BTreeSet::new();

        for dir in font_dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                debug!("Font directory {} does not exist, skipping", dir.display());
                continue;
            }

            for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
                match entry {
                    Ok(entry) if entry.file_type().is_dir() => {
                        families.insert(family_from_dir_name(&entry.file_name().to_string_lossy()));
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Error scanning font directory {}: {}", dir.display(), e),
                }
            }
        }

        debug!("Found {} installed font families", families.len());
        Self { families }
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Whether `family` is installed, tolerating spaces packaged as underscores
    pub fn contains(&self, family: &str) -> bool {
        if self.families.contains(family) {
            return true;
        }
        let wanted = folded(family);
        self.families.iter().any(|installed| folded(installed) == wanted)
    }

    /// Pick the family name to emit for a requested family.
    ///
    /// Installed families pass through, missing aliased families map to their
    /// registered name, and anything else becomes `fallback`.
    pub fn resolve_family(&self, requested: &str, fallback: &str) -> String {
        let requested = requested.trim();

        if !requested.is_empty() && self.contains(requested) {
            return requested.to_string();
        }

        if let Some((_, alias)) = FAMILY_ALIASES.iter().find(|(name, _)| *name == requested) {
            return alias.to_string();
        }

        info!(
            "Requested font family '{}' not found. Falling back to {}",
            requested, fallback
        );
        fallback.to_string()
    }
}

/// One installed font face
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFace {
    pub family: String,
    pub weight: String,
}

/// Enumerate `*.ttf` faces below the font directories, deduplicated and sorted
pub fn list_fonts(font_dirs: &[PathBuf]) -> Vec<FontFace> {
    let mut faces: Vec<FontFace> = Vec::new();

    for dir in font_dirs.iter().filter(|d| d.is_dir()) {
        let files = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf"))
            });

        for entry in files {
            let path = entry.path();
            let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
            let weight = match stem.rsplit_once('-') {
                Some((_, weight)) => weight.to_string(),
                None => "Regular".to_string(),
            };
            let family = path
                .parent()
                .and_then(Path::file_name)
                .map(|n| family_from_dir_name(&n.to_string_lossy()))
                .unwrap_or_default();

            let face = FontFace { family, weight };
            if !faces.contains(&face) {
                faces.push(face);
            }
        }
    }

    faces.sort_by_key(|f| (f.family.to_lowercase(), f.weight.to_lowercase()));
    info!("Found {} fonts", faces.len());
    faces
}
