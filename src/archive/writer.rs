use crate::archive::format::{
    write_entry_table, EntryKind, EntryRecord, FileHeader, Metadata, FORMAT_VERSION,
    FORMAT_VERSION_LEGACY, MAX_NAME_LENGTH,
};
use crate::archive::path::{self, normalize_name, CURRENT_DIR};
use crate::error::{HonkError, Result};
use crate::manifest::PackManifest;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Size of the buffer used to copy source files into the content blob
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Largest file the 4-byte size field can describe
const MAX_FILE_SIZE: u64 = i32::MAX as u64;

#[derive(Debug, Clone)]
enum PackBody {
    File { offset: u64, size: u32 },
    /// Children as indices into the writer's entry arena
    Directory { children: Vec<usize> },
}

#[derive(Debug, Clone)]
struct PackEntry {
    id: i32,
    name: String,
    body: PackBody,
}

impl PackEntry {
    fn kind(&self) -> EntryKind {
        match self.body {
            PackBody::File { .. } => EntryKind::File,
            PackBody::Directory { .. } => EntryKind::Directory,
        }
    }
}

/// Source file queued for the content blob
#[derive(Debug, Clone)]
struct PendingSource {
    path: PathBuf,
    size: u64,
}

/// Archive writer for creating HONK files.
///
/// Files are registered with [`add_file`](Self::add_file), which assigns ids and content
/// offsets immediately; nothing touches the output until [`save`](Self::save).
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    entries: Vec<PackEntry>,
    top_level: Vec<usize>,
    sources: Vec<PendingSource>,
    next_id: i32,
    next_offset: u64,
    format_version: u8,
    content_version: i32,
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter {
    /// Create an empty writer producing format version 0 archives
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            top_level: Vec::new(),
            sources: Vec::new(),
            next_id: 0,
            next_offset: 0,
            format_version: FORMAT_VERSION_LEGACY,
            content_version: 0,
        }
    }

    /// Set the caller-defined content version stored in the header
    pub fn with_content_version(mut self, version: i32) -> Self {
        self.content_version = version;
        self
    }

    /// Select the on-disk format version; version 1 adds the metadata section
    pub fn with_format_version(mut self, version: u8) -> Result<Self> {
        if version > FORMAT_VERSION {
            return Err(HonkError::UnsupportedVersion(version));
        }
        self.format_version = version;
        Ok(self)
    }

    pub fn set_content_version(&mut self, version: i32) {
        self.content_version = version;
    }

    /// Build a writer from a pack manifest; relative sources resolve against `base_dir`
    pub fn from_manifest(manifest: &PackManifest, base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let mut writer = Self::new()
            .with_format_version(manifest.format_version)?
            .with_content_version(manifest.content_version);

        for file in &manifest.files {
            let target = match &file.target {
                Some(target) => target.clone(),
                None => archive_path_from(&file.source)?,
            };
            writer.add_file(base_dir.join(&file.source), &target)?;
        }

        for tree in &manifest.trees {
            let target = tree.target.as_deref().unwrap_or("");
            writer.add_tree(base_dir.join(&tree.source), target)?;
        }

        tracing::debug!(
            entries = writer.entry_count(),
            content_size = writer.content_size(),
            "built writer from manifest"
        );
        Ok(writer)
    }

    /// Number of entries (files and directories) registered so far
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of files registered so far
    pub fn file_count(&self) -> usize {
        self.sources.len()
    }

    /// Total size of the content blob in bytes
    pub fn content_size(&self) -> u64 {
        self.next_offset
    }

    /// Add a file from disk under `archive_path`.
    ///
    /// Every segment of `archive_path` is lowercased. Missing directories are created;
    /// the file's content offset is fixed now and its bytes are copied by `save`.
    pub fn add_file(&mut self, source: impl AsRef<Path>, archive_path: &str) -> Result<()> {
        let source = source.as_ref();
        let size = measure_source(source)?;
        let size32 = u32::try_from(size)
            .ok()
            .filter(|&s| u64::from(s) <= MAX_FILE_SIZE)
            .ok_or_else(|| HonkError::SourceFileTooLarge {
                path: source.to_path_buf(),
                size,
            })?;

        let segments = normalize_archive_path(archive_path)?;
        let (file_name, directories) = segments
            .split_last()
            .ok_or_else(|| HonkError::InvalidPath(archive_path.to_string()))?;

        let parent = self.ensure_directories(directories)?;
        if self.find_child(parent, file_name).is_some() {
            return Err(HonkError::PathConflict(path::join(&segments)));
        }

        let id = self.allocate_id()?;
        let offset = self.next_offset;
        let idx = self.push_entry(
            parent,
            PackEntry {
                id,
                name: file_name.clone(),
                body: PackBody::File {
                    offset,
                    size: size32,
                },
            },
        );

        self.sources.push(PendingSource {
            path: source.to_path_buf(),
            size,
        });
        self.next_offset += size;

        tracing::trace!(
            source = %source.display(),
            archive_path = %path::join(&segments),
            id,
            offset,
            size,
            index = idx,
            "added file"
        );
        Ok(())
    }

    /// Add a file under an archive path mirroring its relative source path
    pub fn add_file_at_source_path(&mut self, source: impl AsRef<Path>) -> Result<()> {
        let source = source.as_ref();
        let target = archive_path_from(source)?;
        self.add_file(source, &target)
    }

    /// Create a (possibly empty) directory and any missing parents
    pub fn add_directory(&mut self, archive_path: &str) -> Result<()> {
        let segments = normalize_archive_path(archive_path)?;
        self.ensure_directories(&segments)?;
        Ok(())
    }

    /// Add every regular file below `source_dir` under `archive_base`, in file-name order.
    ///
    /// Returns the number of files added. On error the writer is left exactly as it was
    /// before the call.
    pub fn add_tree(&mut self, source_dir: impl AsRef<Path>, archive_base: &str) -> Result<usize> {
        let source_dir = source_dir.as_ref();
        if !source_dir.is_dir() {
            return Err(HonkError::SourceFileMissing(source_dir.to_path_buf()));
        }

        let checkpoint = self.clone();
        match self.add_tree_files(source_dir, archive_base) {
            Ok(added) => {
                tracing::debug!(source = %source_dir.display(), added, "added directory tree");
                Ok(added)
            }
            Err(e) => {
                *self = checkpoint;
                Err(e)
            }
        }
    }

    fn add_tree_files(&mut self, source_dir: &Path, archive_base: &str) -> Result<usize> {
        let base = path::lookup_segments(archive_base);
        let mut added = 0;

        for entry in WalkDir::new(source_dir).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .map_err(|_| HonkError::InvalidPath(entry.path().display().to_string()))?;

            let mut segments: Vec<String> = base.iter().map(|s| s.to_string()).collect();
            segments.extend(path_segments(relative)?);

            self.add_file(entry.path(), &path::join(&segments))?;
            added += 1;
        }

        Ok(added)
    }

    /// Write the archive to `path`; a failed save removes the partial file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let written = self
            .save_to(&mut writer)
            .and_then(|()| writer.flush().map_err(HonkError::from));
        if let Err(e) = written {
            drop(writer);
            if let Err(remove_err) = std::fs::remove_file(path) {
                tracing::warn!(
                    path = %path.display(),
                    error = %remove_err,
                    "failed to remove partial archive"
                );
            }
            return Err(e);
        }

        tracing::debug!(
            path = %path.display(),
            entries = self.entries.len(),
            content_size = self.next_offset,
            "saved archive"
        );
        Ok(())
    }

    /// Serialize the archive into any writer: header, entry table, metadata (format
    /// version 1+), then file contents in the order they were added
    pub fn save_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let header = FileHeader::new(self.format_version, self.content_version);
        header.write_to(&mut writer)?;

        let records = self.records_breadth_first();
        write_entry_table(&mut writer, self.entries.len(), &records)?;

        if header.has_metadata() {
            Metadata::default().write_to(&mut writer)?;
        }

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        for source in &self.sources {
            copy_source(source, &mut writer, &mut buffer)?;
        }

        Ok(())
    }

    fn allocate_id(&mut self) -> Result<i32> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| HonkError::InvalidFormat("Too many entries".to_string()))?;
        Ok(id)
    }

    fn children_of(&self, parent: Option<usize>) -> &[usize] {
        match parent {
            None => &self.top_level,
            Some(idx) => match &self.entries[idx].body {
                PackBody::Directory { children } => children,
                PackBody::File { .. } => &[],
            },
        }
    }

    fn find_child(&self, parent: Option<usize>, name: &str) -> Option<usize> {
        self.children_of(parent)
            .iter()
            .copied()
            .find(|&idx| self.entries[idx].name == name)
    }

    fn push_entry(&mut self, parent: Option<usize>, entry: PackEntry) -> usize {
        let idx = self.entries.len();
        self.entries.push(entry);
        match parent {
            None => self.top_level.push(idx),
            Some(parent) => {
                if let PackBody::Directory { children } = &mut self.entries[parent].body {
                    children.push(idx);
                }
            }
        }
        idx
    }

    /// Walk or create one directory per segment; returns the deepest directory, `None`
    /// for the archive root
    fn ensure_directories(&mut self, segments: &[String]) -> Result<Option<usize>> {
        let mut parent = None;

        for (depth, name) in segments.iter().enumerate() {
            parent = Some(match self.find_child(parent, name) {
                Some(idx) if self.entries[idx].kind().is_directory() => idx,
                Some(_) => {
                    return Err(HonkError::PathConflict(path::join(&segments[..=depth])));
                }
                None => {
                    let id = self.allocate_id()?;
                    self.push_entry(
                        parent,
                        PackEntry {
                            id,
                            name: name.clone(),
                            body: PackBody::Directory {
                                children: Vec::new(),
                            },
                        },
                    )
                }
            });
        }

        Ok(parent)
    }

    fn to_record(&self, entry: &PackEntry) -> EntryRecord {
        match &entry.body {
            PackBody::File { offset, size } => {
                EntryRecord::file(entry.id, entry.name.clone(), *offset, *size)
            }
            PackBody::Directory { children } => EntryRecord::directory(
                entry.id,
                entry.name.clone(),
                children.iter().map(|&idx| self.entries[idx].id).collect(),
            ),
        }
    }

    fn records_breadth_first(&self) -> Vec<EntryRecord> {
        let mut records = Vec::with_capacity(self.entries.len());
        let mut queue: VecDeque<usize> = self.top_level.iter().copied().collect();

        while let Some(idx) = queue.pop_front() {
            let entry = &self.entries[idx];
            records.push(self.to_record(entry));
            if let PackBody::Directory { children } = &entry.body {
                queue.extend(children.iter().copied());
            }
        }

        records
    }
}

/// Size of a readable regular file
fn measure_source(path: &Path) -> Result<u64> {
    let missing = || HonkError::SourceFileMissing(path.to_path_buf());
    let file = File::open(path).map_err(|_| missing())?;
    let metadata = file.metadata().map_err(|_| missing())?;
    if !metadata.is_file() {
        return Err(missing());
    }
    Ok(metadata.len())
}

/// Copy exactly `source.size` bytes; a source that grew or shrank since it was added
/// would shift every later offset
fn copy_source<W: Write>(source: &PendingSource, writer: &mut W, buffer: &mut [u8]) -> Result<()> {
    let file = File::open(&source.path)
        .map_err(|_| HonkError::SourceFileMissing(source.path.clone()))?;
    let mut input = file.take(source.size + 1);
    let mut copied = 0u64;

    loop {
        let read = match input.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        copied += read as u64;
        if copied > source.size {
            break;
        }
        writer.write_all(&buffer[..read])?;
    }

    if copied != source.size {
        return Err(HonkError::SourceFileChanged {
            path: source.path.clone(),
            expected: source.size,
            actual: copied,
        });
    }

    tracing::trace!(source = %source.path.display(), size = copied, "copied content");
    Ok(())
}

/// Writer-side path policy: lowercase every segment, drop one leading `.`, and reject
/// empty or oversized segments
fn normalize_archive_path(archive_path: &str) -> Result<Vec<String>> {
    let mut segments = path::split(archive_path);
    if segments.len() > 1 && segments[0] == CURRENT_DIR {
        segments.remove(0);
    }

    segments
        .into_iter()
        .map(|segment| {
            if segment.is_empty()
                || segment == CURRENT_DIR
                || segment == ".."
                || segment.len() > MAX_NAME_LENGTH
                || segment.contains('\0')
            {
                return Err(HonkError::InvalidPath(archive_path.to_string()));
            }
            Ok(normalize_name(segment))
        })
        .collect()
}

/// Segments of a relative filesystem path
fn path_segments(path: &Path) -> Result<Vec<String>> {
    let invalid = || HonkError::InvalidPath(path.display().to_string());
    let mut segments = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str().ok_or_else(invalid)?.to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => return Err(invalid()),
        }
    }

    if segments.is_empty() {
        return Err(invalid());
    }
    Ok(segments)
}

/// Archive path mirroring a filesystem path
fn archive_path_from(path: &Path) -> Result<String> {
    Ok(path::join(&path_segments(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::format::{read_entry_table, HEADER_SIZE};
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_ids_and_offsets_are_sequential() {
        let dir = TempDir::new().unwrap();
        let a = write_source(&dir, "a", b"12345");
        let b = write_source(&dir, "b", b"678");

        let mut writer = ArchiveWriter::new();
        writer.add_file(&a, "x\\a.txt").unwrap();
        writer.add_file(&b, "x\\y\\b.txt").unwrap();
        writer.add_file(&a, "top.txt").unwrap();

        // x(0) a.txt(1) y(2) b.txt(3) top.txt(4)
        assert_eq!(writer.entry_count(), 5);
        assert_eq!(writer.file_count(), 3);
        assert_eq!(writer.content_size(), 13);

        let records = writer.records_breadth_first();
        let by_name = |name: &str| records.iter().find(|r| r.name == name).unwrap().clone();

        assert_eq!(by_name("x"), EntryRecord::directory(0, "x", vec![1, 2]));
        assert_eq!(by_name("a.txt"), EntryRecord::file(1, "a.txt", 0, 5));
        assert_eq!(by_name("y"), EntryRecord::directory(2, "y", vec![3]));
        assert_eq!(by_name("b.txt"), EntryRecord::file(3, "b.txt", 5, 3));
        assert_eq!(by_name("top.txt"), EntryRecord::file(4, "top.txt", 8, 5));
    }

    #[test]
    fn test_breadth_first_table_order() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "s", b"s");

        let mut writer = ArchiveWriter::new();
        writer.add_file(&src, "a\\b\\c").unwrap();
        writer.add_file(&src, "d").unwrap();

        let names: Vec<String> = writer
            .records_breadth_first()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_names_are_lowercased() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "s", b"s");

        let mut writer = ArchiveWriter::new();
        writer.add_file(&src, "Docs\\Readme.TXT").unwrap();
        writer.add_file(&src, "DOCS\\Other.md").unwrap();

        let names: Vec<String> = writer
            .records_breadth_first()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["docs", "readme.txt", "other.md"]);
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let mut writer = ArchiveWriter::new();

        assert!(matches!(
            writer.add_file(dir.path().join("nope"), "nope"),
            Err(HonkError::SourceFileMissing(_))
        ));
        assert!(matches!(
            writer.add_file(dir.path(), "dir"),
            Err(HonkError::SourceFileMissing(_))
        ));
        assert_eq!(writer.entry_count(), 0);
    }

    #[test]
    fn test_invalid_archive_paths() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "s", b"s");
        let mut writer = ArchiveWriter::new();

        for bad in ["", "a\\\\b", "a\\", "..\\x", "a\\.\\b", "."] {
            assert!(
                matches!(writer.add_file(&src, bad), Err(HonkError::InvalidPath(_))),
                "{:?} should be rejected",
                bad
            );
        }

        let long = "n".repeat(MAX_NAME_LENGTH + 1);
        assert!(writer.add_file(&src, &long).is_err());

        writer.add_file(&src, ".\\ok.txt").unwrap();
        assert_eq!(writer.records_breadth_first()[0].name, "ok.txt");
    }

    #[test]
    fn test_path_conflicts() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "s", b"s");
        let mut writer = ArchiveWriter::new();

        writer.add_file(&src, "a\\file").unwrap();
        assert!(matches!(
            writer.add_file(&src, "A\\FILE"),
            Err(HonkError::PathConflict(_))
        ));
        assert!(matches!(
            writer.add_file(&src, "a"),
            Err(HonkError::PathConflict(_))
        ));
        assert!(matches!(
            writer.add_file(&src, "a\\file\\nested"),
            Err(HonkError::PathConflict(_))
        ));
    }

    #[test]
    fn test_add_directory() {
        let mut writer = ArchiveWriter::new();
        writer.add_directory("Empty\\Dir").unwrap();
        writer.add_directory("empty").unwrap();

        assert_eq!(writer.entry_count(), 2);
        assert_eq!(writer.file_count(), 0);
    }

    #[test]
    fn test_format_version_selection() {
        assert!(ArchiveWriter::new().with_format_version(2).is_err());

        let writer = ArchiveWriter::new()
            .with_format_version(FORMAT_VERSION)
            .unwrap()
            .with_content_version(12);

        let mut buf = Vec::new();
        writer.save_to(&mut buf).unwrap();

        let header = FileHeader::read_from(&buf[..]).unwrap();
        assert_eq!(header.format_version, FORMAT_VERSION);
        assert_eq!(header.content_version, 12);

        // Empty table followed by the metadata stub
        assert!(read_entry_table(&buf[HEADER_SIZE..]).unwrap().is_empty());
        assert_eq!(buf.len(), HEADER_SIZE + 4 + 8);
    }

    #[test]
    fn test_source_changed_before_save() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "s", b"abc");

        let mut writer = ArchiveWriter::new();
        writer.add_file(&src, "s").unwrap();
        fs::write(&src, b"abcdef").unwrap();

        let mut buf = Vec::new();
        assert!(matches!(
            writer.save_to(&mut buf),
            Err(HonkError::SourceFileChanged { expected: 3, .. })
        ));

        fs::write(&src, b"a").unwrap();
        let mut buf = Vec::new();
        assert!(matches!(
            writer.save_to(&mut buf),
            Err(HonkError::SourceFileChanged {
                expected: 3,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_add_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("B.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("sub/deeper/c.txt"), b"c").unwrap();

        let mut writer = ArchiveWriter::new();
        let added = writer.add_tree(dir.path(), "Assets").unwrap();

        assert_eq!(added, 3);
        let names: Vec<String> = writer
            .records_breadth_first()
            .into_iter()
            .map(|r| r.name)
            .collect();
        // assets, then its children in walk order
        assert_eq!(names[0], "assets");
        assert!(names.contains(&"b.txt".to_string()));
        assert!(names.contains(&"c.txt".to_string()));
        assert!(!names.contains(&"empty".to_string()));
    }

    #[test]
    fn test_source_size_limit() {
        let dir = TempDir::new().unwrap();

        // Sparse files: no data blocks are allocated
        let too_large = dir.path().join("too_large.bin");
        File::create(&too_large).unwrap().set_len(1 << 31).unwrap();
        let at_limit = dir.path().join("at_limit.bin");
        File::create(&at_limit).unwrap().set_len((1 << 31) - 1).unwrap();

        let mut writer = ArchiveWriter::new();
        assert!(matches!(
            writer.add_file(&too_large, "too_large.bin"),
            Err(HonkError::SourceFileTooLarge { size, .. }) if size == 1 << 31
        ));
        assert_eq!(writer.entry_count(), 0);

        writer.add_file(&at_limit, "at_limit.bin").unwrap();
        assert_eq!(writer.content_size(), (1 << 31) - 1);
    }

    #[test]
    fn test_failed_add_tree_leaves_writer_unchanged() {
        let dir = TempDir::new().unwrap();
        let existing = write_source(&dir, "existing", b"xyz");

        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("sub")).unwrap();
        fs::write(tree.join("a.txt"), b"a").unwrap();
        fs::write(tree.join("b.txt"), b"b").unwrap();
        fs::write(tree.join("sub/c.txt"), b"c").unwrap();

        let mut writer = ArchiveWriter::new();
        writer.add_file(&existing, "base\\b.txt").unwrap();
        let before = writer.records_breadth_first();

        // a.txt and the walk up to b.txt succeed before the conflict
        assert!(matches!(
            writer.add_tree(&tree, "base"),
            Err(HonkError::PathConflict(_))
        ));

        assert_eq!(writer.entry_count(), 2);
        assert_eq!(writer.file_count(), 1);
        assert_eq!(writer.content_size(), 3);
        assert_eq!(writer.records_breadth_first(), before);

        // Ids continue from where they were
        writer.add_file(&existing, "other.txt").unwrap();
        let records = writer.records_breadth_first();
        let other = records.iter().find(|r| r.name == "other.txt").unwrap();
        assert_eq!(other.id, 2);
        assert_eq!(*other, EntryRecord::file(2, "other.txt", 3, 3));
    }

    #[test]
    fn test_failed_save_removes_partial_archive() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "s", b"abc");

        let mut writer = ArchiveWriter::new();
        writer.add_file(&src, "s").unwrap();
        fs::write(&src, b"abcdef").unwrap();

        let archive = dir.path().join("out.honk");
        assert!(matches!(
            writer.save(&archive),
            Err(HonkError::SourceFileChanged { .. })
        ));
        assert!(!archive.exists());

        fs::write(&src, b"xyz").unwrap();
        writer.save(&archive).unwrap();
        assert!(archive.exists());
    }

    #[test]
    fn test_add_file_at_source_path() {
        let dir = TempDir::new().unwrap();
        let src = write_source(&dir, "Data.BIN", b"xyz");

        let mut writer = ArchiveWriter::new();
        writer.add_file_at_source_path(&src).unwrap();

        let records = writer.records_breadth_first();
        let file = records.iter().find(|r| r.kind().is_file()).unwrap();
        assert_eq!(file.name, "data.bin");
        assert_eq!(writer.file_count(), 1);
        assert_eq!(writer.entry_count(), path_segments(&src).unwrap().len());
    }

    #[test]
    fn test_archive_path_from() {
        assert_eq!(archive_path_from(Path::new("data/x.bin")).unwrap(), "data\\x.bin");
        assert_eq!(archive_path_from(Path::new("./x.bin")).unwrap(), "x.bin");
        assert!(archive_path_from(Path::new("../x.bin")).is_err());
        assert!(archive_path_from(Path::new("")).is_err());
    }
}
