use crate::archive::format::{read_entry_table, FileHeader, Metadata};
use crate::archive::lookup::{EntryFilter, Entries};
use crate::archive::tree::{ArchiveTree, Node};
use crate::error::{HonkError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// State that only exists while the archive is open
#[derive(Debug)]
struct OpenArchive<R> {
    stream: R,
    header: FileHeader,
    tree: ArchiveTree,
    /// Absolute stream position of the content blob
    content_start: u64,
}

/// Archive reader: parses the entry table once, then serves lookups from memory and
/// content reads with a single seek each.
#[derive(Debug)]
pub struct ArchiveReader<R = BufReader<File>> {
    state: Option<OpenArchive<R>>,
}

impl ArchiveReader {
    /// Open an archive file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), "opened archive");
        Ok(reader)
    }
}

impl<R: BufRead + Seek> ArchiveReader<R> {
    /// Parse an archive starting at the stream's current position.
    ///
    /// Header, entry table and (for format version 1+) the metadata section are read and
    /// linked eagerly; any structural error aborts and drops the stream.
    pub fn from_reader(mut stream: R) -> Result<Self> {
        let header = FileHeader::read_from(&mut stream)?;
        header.validate_version()?;

        let records = read_entry_table(&mut stream)?;
        let tree = ArchiveTree::build(records)?;

        if header.has_metadata() {
            // Both tables are reserved and always empty
            let metadata = Metadata::read_from(&mut stream)?;
            tracing::trace!(?metadata, "read metadata section");
        }

        let content_start = stream.stream_position()?;

        tracing::debug!(
            format_version = header.format_version,
            content_version = header.content_version,
            entries = tree.len(),
            content_start,
            "parsed archive"
        );

        Ok(Self {
            state: Some(OpenArchive {
                stream,
                header,
                tree,
                content_start,
            }),
        })
    }

    fn state(&self) -> Result<&OpenArchive<R>> {
        self.state.as_ref().ok_or(HonkError::NotOpen)
    }

    fn state_mut(&mut self) -> Result<&mut OpenArchive<R>> {
        self.state.as_mut().ok_or(HonkError::NotOpen)
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Release the stream and the entry tree; later calls fail with [`HonkError::NotOpen`]
    pub fn close(&mut self) {
        if self.state.take().is_some() {
            tracing::debug!("closed archive");
        }
    }

    /// Get archive header information
    pub fn header(&self) -> Result<&FileHeader> {
        Ok(&self.state()?.header)
    }

    /// Caller-defined content version recorded by the writer
    pub fn content_version(&self) -> Result<i32> {
        Ok(self.state()?.header.content_version)
    }

    /// Get number of entries (files and directories) in the archive
    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.state()?.tree.len())
    }

    /// The linked entry tree
    pub fn tree(&self) -> Result<&ArchiveTree> {
        Ok(&self.state()?.tree)
    }

    /// Resolve a path to its entry without reading content
    pub fn entry(&self, path: &str) -> Result<&Node> {
        self.state()?.tree.resolve(path, EntryFilter::All)
    }

    /// Check if a file or directory exists in the archive
    pub fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.state()?.tree.exists(path))
    }

    pub fn is_file(&self, path: &str) -> Result<bool> {
        Ok(self.state()?.tree.is_file(path))
    }

    pub fn is_directory(&self, path: &str) -> Result<bool> {
        Ok(self.state()?.tree.is_directory(path))
    }

    /// Iterate entries below `base` breadth-first, see [`ArchiveTree::entries`]
    pub fn entries(
        &self,
        base: &str,
        max_depth: Option<usize>,
        filter: EntryFilter,
    ) -> Result<Entries<'_>> {
        self.state()?.tree.entries(base, max_depth, filter)
    }

    /// Read a file from the archive
    pub fn read_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.read_file_into(path, &mut data)?;
        Ok(data)
    }

    /// Read a file into `output`, replacing its contents; returns the file size.
    ///
    /// On error `output` is left empty.
    pub fn read_file_into(&mut self, path: &str, output: &mut Vec<u8>) -> Result<usize> {
        output.clear();
        let state = self.state_mut()?;
        let node = state.tree.resolve(path, EntryFilter::Files)?;

        let (offset, size) = match (node.offset(), node.size()) {
            (Some(offset), Some(size)) => (offset, size as usize),
            _ => return Err(HonkError::PathNotFound(path.to_string())),
        };

        let position = state.content_start.checked_add(offset).ok_or_else(|| {
            HonkError::InvalidFormat(format!("Content offset out of range for {}", path))
        })?;

        state.stream.seek(SeekFrom::Start(position))?;
        let read = (&mut state.stream).take(size as u64).read_to_end(output);
        match read {
            Ok(read) if read == size => {}
            Ok(read) => {
                output.clear();
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("{} is truncated: expected {} bytes, found {}", path, size, read),
                )
                .into());
            }
            Err(e) => {
                output.clear();
                return Err(e.into());
            }
        }

        tracing::trace!(path, offset, size, "read file");
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::format::{write_entry_table, EntryRecord, FORMAT_VERSION};
    use std::io::Cursor;

    fn archive_bytes(format_version: u8, records: &[EntryRecord], content: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        FileHeader::new(format_version, 9).write_to(&mut buf).unwrap();
        write_entry_table(&mut buf, records.len(), records).unwrap();
        if format_version > 0 {
            Metadata::default().write_to(&mut buf).unwrap();
        }
        buf.extend_from_slice(content);
        buf
    }

    fn sample_records() -> Vec<EntryRecord> {
        vec![
            EntryRecord::directory(0, "docs", vec![1]),
            EntryRecord::file(1, "a.txt", 0, 5),
            EntryRecord::file(2, "b.bin", 5, 3),
        ]
    }

    #[test]
    fn test_read_from_memory() {
        for version in [0, FORMAT_VERSION] {
            let bytes = archive_bytes(version, &sample_records(), b"helloxyz");
            let mut reader = ArchiveReader::from_reader(Cursor::new(bytes)).unwrap();

            assert_eq!(reader.content_version().unwrap(), 9);
            assert_eq!(reader.header().unwrap().format_version, version);
            assert_eq!(reader.entry_count().unwrap(), 3);
            assert_eq!(reader.read_file("docs\\a.txt").unwrap(), b"hello");
            assert_eq!(reader.read_file("b.bin").unwrap(), b"xyz");
        }
    }

    #[test]
    fn test_read_directory_as_file_fails() {
        let bytes = archive_bytes(0, &sample_records(), b"helloxyz");
        let mut reader = ArchiveReader::from_reader(Cursor::new(bytes)).unwrap();

        assert!(matches!(
            reader.read_file("docs"),
            Err(HonkError::PathNotFound(_))
        ));
        // The failed lookup leaves the handle usable
        assert_eq!(reader.read_file("b.bin").unwrap(), b"xyz");
    }

    #[test]
    fn test_truncated_content() {
        let bytes = archive_bytes(0, &sample_records(), b"hel");
        let mut reader = ArchiveReader::from_reader(Cursor::new(bytes)).unwrap();
        assert!(matches!(reader.read_file("b.bin"), Err(HonkError::Io(_))));
    }

    #[test]
    fn test_truncated_read_leaves_buffer_empty() {
        let bytes = archive_bytes(0, &sample_records(), b"hellox");
        let mut reader = ArchiveReader::from_reader(Cursor::new(bytes)).unwrap();

        let mut buf = b"stale".to_vec();
        assert!(matches!(
            reader.read_file_into("b.bin", &mut buf),
            Err(HonkError::Io(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_read_file_into_reuses_buffer() {
        let bytes = archive_bytes(0, &sample_records(), b"helloxyz");
        let mut reader = ArchiveReader::from_reader(Cursor::new(bytes)).unwrap();

        let mut buf = vec![0xFF; 64];
        assert_eq!(reader.read_file_into("b.bin", &mut buf).unwrap(), 3);
        assert_eq!(buf, b"xyz");
    }

    #[test]
    fn test_closed_reader() {
        let bytes = archive_bytes(0, &sample_records(), b"helloxyz");
        let mut reader = ArchiveReader::from_reader(Cursor::new(bytes)).unwrap();
        assert!(reader.is_open());

        reader.close();
        assert!(!reader.is_open());
        assert!(matches!(reader.content_version(), Err(HonkError::NotOpen)));
        assert!(matches!(reader.exists("b.bin"), Err(HonkError::NotOpen)));
        assert!(matches!(reader.read_file("b.bin"), Err(HonkError::NotOpen)));
        assert!(matches!(
            reader.entries("", None, EntryFilter::All),
            Err(HonkError::NotOpen)
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let bytes = archive_bytes(7, &[], b"");
        assert!(matches!(
            ArchiveReader::from_reader(Cursor::new(bytes)),
            Err(HonkError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_archive_at_nonzero_offset() {
        let mut bytes = b"PREFIX".to_vec();
        bytes.extend(archive_bytes(1, &sample_records(), b"helloxyz"));

        let mut cursor = Cursor::new(bytes);
        cursor.set_position(6);
        let mut reader = ArchiveReader::from_reader(cursor).unwrap();
        assert_eq!(reader.read_file("docs\\a.txt").unwrap(), b"hello");
    }
}
