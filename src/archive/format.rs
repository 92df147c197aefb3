use crate::error::{HonkError, Result};
use std::io::{BufRead, Read, Write};

/// Magic number: ASCII "HONK"
pub const MAGIC_NUMBER: [u8; 4] = *b"HONK";

/// Original layout: header, entry table, content blob
pub const FORMAT_VERSION_LEGACY: u8 = 0;

/// Current layout: adds the (reserved) metadata section after the entry table
pub const FORMAT_VERSION: u8 = 1;

/// Header size in bytes (magic + format version + content version)
pub const HEADER_SIZE: usize = 9;

/// Metadata section size in bytes (format version 1+)
pub const METADATA_SIZE: usize = 8;

/// Maximum entry name length in bytes (UTF-8, excluding the NUL terminator)
pub const MAX_NAME_LENGTH: usize = 255;

/// Upper bound on speculative allocation driven by counts read from disk
const MAX_PREALLOC: usize = 4096;

/// Entry kinds stored in the kind byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryKind {
    File = 0,
    Directory = 1,
}

impl EntryKind {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::File),
            1 => Ok(Self::Directory),
            _ => Err(HonkError::InvalidFormat(format!(
                "Unknown entry kind: {}",
                value
            ))),
        }
    }

    pub fn is_file(self) -> bool {
        self == Self::File
    }

    pub fn is_directory(self) -> bool {
        self == Self::Directory
    }
}

/// Header at the beginning of the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u8,
    /// Caller-defined version of the packed content, opaque to the format
    pub content_version: i32,
}

impl FileHeader {
    pub fn new(format_version: u8, content_version: i32) -> Self {
        Self {
            format_version,
            content_version,
        }
    }

    /// Whether a metadata section follows the entry table
    pub fn has_metadata(&self) -> bool {
        self.format_version > FORMAT_VERSION_LEGACY
    }

    /// Write header to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&MAGIC_NUMBER)?;
        writer.write_all(&[self.format_version])?;
        writer.write_all(&self.content_version.to_le_bytes())?;
        Ok(())
    }

    /// Read header from a reader
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        if magic != MAGIC_NUMBER {
            return Err(HonkError::InvalidMagic);
        }

        let format_version = read_u8(&mut reader)?;
        let content_version = read_i32(&mut reader)?;

        Ok(Self {
            format_version,
            content_version,
        })
    }

    /// Validate version compatibility
    pub fn validate_version(&self) -> Result<()> {
        if self.format_version > FORMAT_VERSION {
            return Err(HonkError::UnsupportedVersion(self.format_version));
        }
        Ok(())
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new(FORMAT_VERSION_LEGACY, 0)
    }
}

/// Kind-specific part of an entry record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    /// `offset` is relative to the start of the content blob
    File { offset: u64, size: u32 },
    /// Child ids in persisted order
    Directory { children: Vec<i32> },
}

/// One record of the entry table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub id: i32,
    pub name: String,
    pub body: EntryBody,
}

impl EntryRecord {
    pub fn file(id: i32, name: impl Into<String>, offset: u64, size: u32) -> Self {
        Self {
            id,
            name: name.into(),
            body: EntryBody::File { offset, size },
        }
    }

    pub fn directory(id: i32, name: impl Into<String>, children: Vec<i32>) -> Self {
        Self {
            id,
            name: name.into(),
            body: EntryBody::Directory { children },
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self.body {
            EntryBody::File { .. } => EntryKind::File,
            EntryBody::Directory { .. } => EntryKind::Directory,
        }
    }

    /// Write entry to the entry table
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let name_bytes = self.name.as_bytes();
        if name_bytes.len() > MAX_NAME_LENGTH || name_bytes.contains(&0) {
            return Err(HonkError::InvalidPath(format!(
                "Entry name not storable: {:?}",
                self.name
            )));
        }

        writer.write_all(&self.id.to_le_bytes())?;
        writer.write_all(name_bytes)?;
        writer.write_all(&[0])?;
        writer.write_all(&[self.kind() as u8])?;

        match &self.body {
            EntryBody::File { offset, size } => {
                let size = i32::try_from(*size).map_err(|_| {
                    HonkError::InvalidFormat(format!("File size {} exceeds format limit", size))
                })?;
                writer.write_all(&offset.to_le_bytes())?;
                writer.write_all(&size.to_le_bytes())?;
            }
            EntryBody::Directory { children } => {
                write_count(&mut writer, children.len())?;
                for child in children {
                    writer.write_all(&child.to_le_bytes())?;
                }
            }
        }

        Ok(())
    }

    /// Read entry from the entry table
    pub fn read_from<R: BufRead>(mut reader: R) -> Result<Self> {
        let id = read_i32(&mut reader)?;
        let name = read_name(&mut reader)?;
        let kind = EntryKind::from_u8(read_u8(&mut reader)?)?;

        let body = match kind {
            EntryKind::File => {
                let offset = read_u64(&mut reader)?;
                let size = read_i32(&mut reader)?;
                let size = u32::try_from(size).map_err(|_| {
                    HonkError::InvalidFormat(format!("Entry {} has negative size {}", id, size))
                })?;
                EntryBody::File { offset, size }
            }
            EntryKind::Directory => {
                let count = read_count(&mut reader, "child")?;
                let mut children = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    children.push(read_i32(&mut reader)?);
                }
                EntryBody::Directory { children }
            }
        };

        Ok(Self { id, name, body })
    }
}

/// Reserved metadata section (format version 1+); both tables are always empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metadata {
    pub names_table_size: i32,
    pub values_table_size: i32,
}

impl Metadata {
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.names_table_size.to_le_bytes())?;
        writer.write_all(&self.values_table_size.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let names_table_size = read_i32(&mut reader)?;
        let values_table_size = read_i32(&mut reader)?;
        Ok(Self {
            names_table_size,
            values_table_size,
        })
    }
}

/// Write the entry table: count followed by every record
pub fn write_entry_table<'a, W, I>(mut writer: W, count: usize, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a EntryRecord>,
{
    write_count(&mut writer, count)?;
    let mut written = 0usize;
    for record in records {
        record.write_to(&mut writer)?;
        written += 1;
    }
    if written != count {
        return Err(HonkError::InvalidFormat(format!(
            "Entry table declared {} entries but {} were written",
            count, written
        )));
    }
    Ok(())
}

/// Read the entry table in stored order
pub fn read_entry_table<R: BufRead>(mut reader: R) -> Result<Vec<EntryRecord>> {
    let count = read_count(&mut reader, "entry")?;
    let mut records = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        let record = EntryRecord::read_from(&mut reader)?;
        tracing::trace!(id = record.id, name = %record.name, kind = ?record.kind(), "parsed entry");
        records.push(record);
    }
    Ok(records)
}

fn read_name<R: BufRead>(reader: R) -> Result<String> {
    let mut buf = Vec::new();
    reader
        .take(MAX_NAME_LENGTH as u64 + 1)
        .read_until(0, &mut buf)?;

    if buf.pop() != Some(0) {
        return Err(HonkError::InvalidFormat(format!(
            "Entry name is not NUL-terminated within {} bytes",
            MAX_NAME_LENGTH
        )));
    }

    String::from_utf8(buf)
        .map_err(|e| HonkError::InvalidFormat(format!("Invalid UTF-8 in entry name: {}", e)))
}

fn write_count<W: Write>(mut writer: W, count: usize) -> Result<()> {
    let count = i32::try_from(count)
        .map_err(|_| HonkError::InvalidFormat(format!("Count {} exceeds format limit", count)))?;
    writer.write_all(&count.to_le_bytes())?;
    Ok(())
}

fn read_count<R: Read>(reader: R, what: &str) -> Result<usize> {
    let count = read_i32(reader)?;
    usize::try_from(count)
        .map_err(|_| HonkError::InvalidFormat(format!("Negative {} count: {}", what, count)))
}

// Helper functions for reading primitive types
fn read_u8<R: Read>(mut reader: R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_i32<R: Read>(mut reader: R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_u64<R: Read>(mut reader: R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
