mod format;
mod lookup;
pub mod path;
mod reader;
mod tree;
mod writer;

pub use format::{
    read_entry_table, write_entry_table, EntryBody, EntryKind, EntryRecord, FileHeader, Metadata,
    FORMAT_VERSION, FORMAT_VERSION_LEGACY, HEADER_SIZE, MAGIC_NUMBER, MAX_NAME_LENGTH,
    METADATA_SIZE,
};
pub use lookup::{DirEntry, Entries, EntryFilter};
pub use reader::ArchiveReader;
pub use tree::{ArchiveTree, Node};
pub use writer::ArchiveWriter;
