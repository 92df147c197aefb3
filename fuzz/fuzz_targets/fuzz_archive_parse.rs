#![no_main]

use honk_vfs::{ArchiveReader, EntryFilter, HEADER_SIZE};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Shorter inputs cannot even hold the header
    if data.len() < HEADER_SIZE {
        return;
    }

    // Try to parse - should never panic
    let mut reader = match ArchiveReader::from_reader(Cursor::new(data)) {
        Ok(r) => r,
        Err(_) => return, // Expected for invalid data
    };

    // Walk everything reachable - should never panic
    let files: Vec<String> = match reader.entries("", None, EntryFilter::Files) {
        Ok(entries) => entries.map(|entry| entry.path).collect(),
        Err(_) => return,
    };

    for file in &files {
        let _ = reader.read_file(file);
    }

    let _ = reader.entry_count();

    // Lookups with odd paths - should never panic
    let _ = reader.exists("test.txt");
    let _ = reader.exists("");
    let _ = reader.exists(".");
    let _ = reader.exists("\\");
    let _ = reader.exists("..\\..\\etc\\passwd");
    let _ = reader.entries("missing", Some(0), EntryFilter::All);
});
