use anyhow::{Context, Result, anyhow};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix of word stream inputs
pub const WORDS_SUFFIX: &str = ".words.json";
/// Suffix of saved caption lists
pub const CAPTIONS_SUFFIX: &str = ".captions.json";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @returns: File name without the pipeline suffix ("talk.words.json" -> "talk")
    pub fn base_name<P: AsRef<Path>>(input_file: P) -> String {
        let input_file = input_file.as_ref();
        let file_name = input_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        for suffix in [WORDS_SUFFIX, CAPTIONS_SUFFIX] {
            if let Some(base) = file_name.strip_suffix(suffix) {
                if !base.is_empty() {
                    return base.to_string();
                }
            }
        }

        input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(file_name)
    }

    // @generates: Output path for a derived artifact
    // @params: input_file, output_dir, extension (e.g. "ass", "captions.json")
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let mut output_filename = Self::base_name(input_file);
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Find files whose name ends with `suffix` (case-insensitive) below a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(anyhow!("Directory does not exist: {}", dir.display()));
        }

        let suffix = suffix.to_lowercase();
        let mut result = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && entry.file_name().to_string_lossy().to_lowercase().ends_with(&suffix) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Replace a file's content atomically.
    ///
    /// The content goes to a temporary file in the same directory which is then
    /// renamed over the target, so readers never observe a partial document.
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
        temp.as_file().sync_all()?;
        temp.persist(path)
            .map_err(|e| anyhow!("Failed to replace {}: {}", path.display(), e.error))?;

        Ok(())
    }

    /// SHA-256 of a file's content, `None` when the file does not exist
    pub fn file_fingerprint<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(None);
        }

        let mut file = fs::File::open(path).with_context(|| format!("Failed to open file for hashing: {:?}", path))?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = file.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Some(format!("{:x}", hasher.finalize())))
    }

    /// Classify an input file by its name
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!("File does not exist: {:?}", path));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(WORDS_SUFFIX) {
            Ok(FileType::WordStream)
        } else if name.ends_with(CAPTIONS_SUFFIX) {
            Ok(FileType::CaptionList)
        } else {
            Ok(FileType::Unknown)
        }
    }
}

/// Enum representing the input files the pipeline understands
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Recognizer word stream (`*.words.json`)
    WordStream,
    /// Saved caption list (`*.captions.json`)
    CaptionList,
    /// Unknown file type
    Unknown,
}
