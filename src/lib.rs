//! honk-vfs: reader and writer for HONK single-file virtual archives
//!
//! A HONK archive packs a directory/file hierarchy into one binary:
//! - A 9-byte header (magic, format version, caller-defined content version)
//! - An entry table describing every file and directory by id
//! - A contiguous blob of raw file contents
//!
//! Readers rebuild the tree once at open time and then serve lookups from memory;
//! extracting a file costs one seek and one read.
//!
//! Archive paths use `\` as separator. The writer stores every name in lowercase.
//!
//! # Example
//!
//! ```no_run
//! use honk_vfs::{ArchiveReader, ArchiveWriter, EntryFilter};
//!
//! // Create an archive
//! let mut writer = ArchiveWriter::new().with_content_version(3);
//! writer.add_file("assets/logo.png", "Images\\Logo.png")?;
//! writer.add_file("notes.txt", "notes.txt")?;
//! writer.save("example.honk")?;
//!
//! // Read from archive
//! let mut reader = ArchiveReader::open("example.honk")?;
//! let logo = reader.read_file("images\\logo.png")?;
//! println!("logo: {} bytes", logo.len());
//! for entry in reader.entries("", None, EntryFilter::Files)? {
//!     println!("{}", entry.path);
//! }
//! # Ok::<(), honk_vfs::error::HonkError>(())
//! ```

// Core modules
pub mod archive;
pub mod error;
pub mod manifest;

// Re-export commonly used types
pub use archive::{
    ArchiveReader, ArchiveTree, ArchiveWriter, DirEntry, Entries, EntryFilter, EntryKind,
    FileHeader, Node, FORMAT_VERSION, FORMAT_VERSION_LEGACY, HEADER_SIZE, MAGIC_NUMBER,
};
pub use error::{HonkError, Result};
pub use manifest::{PackFile, PackManifest, PackTree};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Ensure core types are accessible
        let _filter = EntryFilter::default();
        let _header = FileHeader::default();
        let _writer = ArchiveWriter::new();
        assert_eq!(&MAGIC_NUMBER, b"HONK");
    }
}
