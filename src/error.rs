use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for honk operations
pub type Result<T> = std::result::Result<T, HonkError>;

/// Unified error type for all honk operations
#[derive(Debug, Error)]
pub enum HonkError {
    // Format errors
    #[error("Invalid magic number in archive header")]
    InvalidMagic,

    #[error("Unsupported archive format version: {0}")]
    UnsupportedVersion(u8),

    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    #[error("Archive is not open")]
    NotOpen,

    // Entry table errors (raised while opening)
    #[error("Archive is corrupted: duplicate entry id {0}")]
    DuplicateEntry(i32),

    #[error("Archive is corrupted: directory {parent} references missing entry {child}")]
    MissingEntry { parent: i32, child: i32 },

    #[error("Archive is corrupted: entry {child} is recursively contained by directory {parent}")]
    RecursiveEntry { parent: i32, child: i32 },

    #[error("Archive is corrupted: entry {child} is claimed by directories {first} and {second}")]
    SharedEntry { child: i32, first: i32, second: i32 },

    // Lookup errors
    #[error("Path not found in archive: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    // Writer errors
    #[error("Source file not found or unreadable: {0}")]
    SourceFileMissing(PathBuf),

    #[error("Source file too large: {path} is {size} bytes (max {max})", max = i32::MAX)]
    SourceFileTooLarge { path: PathBuf, size: u64 },

    #[error("Source file changed since it was added: {path} was {expected} bytes, copied {actual}")]
    SourceFileChanged {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid archive path: {0}")]
    InvalidPath(String),

    #[error("Archive path already in use: {0}")]
    PathConflict(String),

    // Manifest errors
    #[error("Failed to parse pack manifest: {0}")]
    ManifestParseFailed(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<toml::de::Error> for HonkError {
    fn from(err: toml::de::Error) -> Self {
        HonkError::TomlError(err.to_string())
    }
}

impl From<toml::ser::Error> for HonkError {
    fn from(err: toml::ser::Error) -> Self {
        HonkError::TomlError(err.to_string())
    }
}
