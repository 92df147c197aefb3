//! Archive path handling.
//!
//! Archive paths are backslash-separated segment lists (`docs\readme.txt`). [`split`] and
//! [`join`] are exact inverses and perform no normalization; reader and writer each apply
//! their own policy on top ([`lookup_segments`] and [`normalize_name`]).

/// Separator between archive path segments
pub const SEPARATOR: char = '\\';

/// Leading segment meaning "the archive root"
pub const CURRENT_DIR: &str = ".";

/// Split an archive path into its segments.
///
/// An empty input yields a single empty segment.
pub fn split(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).collect()
}

/// Join segments back into an archive path.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            path.push(SEPARATOR);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Segments a reader query walks through.
///
/// Drops one leading `.` and one trailing empty segment, so `""`, `"."` and `".\"` all name
/// the archive root (no segments).
pub fn lookup_segments(path: &str) -> Vec<&str> {
    let mut segments = split(path);
    if segments.first() == Some(&CURRENT_DIR) {
        segments.remove(0);
    }
    if segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}

/// Case policy applied to every name the writer stores.
pub fn normalize_name(segment: &str) -> String {
    segment.to_ascii_lowercase()
}

/// Number of leading segments `a` and `b` share.
pub(crate) fn common_prefix_len<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> usize {
    a.iter()
        .zip(b.iter())
        .take_while(|(x, y)| x.as_ref() == y.as_ref())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_join() {
        assert_eq!(split("a\\b\\c.txt"), vec!["a", "b", "c.txt"]);
        assert_eq!(split("file.bin"), vec!["file.bin"]);
        assert_eq!(join(&["a", "b", "c.txt"]), "a\\b\\c.txt");
        assert_eq!(join(&split("x\\y")), "x\\y");
    }

    #[test]
    fn test_split_empty_yields_one_segment() {
        assert_eq!(split(""), vec![""]);
        assert_eq!(join::<&str>(&[]), "");
    }

    #[test]
    fn test_forward_slash_is_not_a_separator() {
        assert_eq!(split("docs/readme.txt"), vec!["docs/readme.txt"]);
    }

    #[test]
    fn test_lookup_segments() {
        assert!(lookup_segments("").is_empty());
        assert!(lookup_segments(".").is_empty());
        assert!(lookup_segments(".\\").is_empty());
        assert_eq!(lookup_segments(".\\a\\b"), vec!["a", "b"]);
        assert_eq!(lookup_segments("a\\b\\"), vec!["a", "b"]);
        // Only one leading marker is dropped
        assert_eq!(lookup_segments(".\\.\\a"), vec![".", "a"]);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Readme.TXT"), "readme.txt");
        assert_eq!(normalize_name("Ärger"), "Ärger");
    }

    #[test]
    fn test_common_prefix_len() {
        assert_eq!(common_prefix_len(&["a", "b", "c"], &["a", "b"]), 2);
        assert_eq!(common_prefix_len(&["a"], &["b"]), 0);
        assert_eq!(common_prefix_len::<&str, &str>(&[], &["b"]), 0);
    }
}
