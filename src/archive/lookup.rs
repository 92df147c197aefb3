//! Path resolution and breadth-first traversal over an [`ArchiveTree`].

use crate::archive::format::EntryKind;
use crate::archive::path::{self, common_prefix_len, lookup_segments, normalize_name};
use crate::archive::tree::{ArchiveTree, Node};
use crate::error::{HonkError, Result};
use std::collections::{HashSet, VecDeque};

/// Which entry kinds a lookup or traversal accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    Files,
    Directories,
    #[default]
    All,
}

impl EntryFilter {
    pub fn matches(self, kind: EntryKind) -> bool {
        match self {
            Self::Files => kind.is_file(),
            Self::Directories => kind.is_directory(),
            Self::All => true,
        }
    }
}

/// One entry produced by [`Entries`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Path relative to the traversal base
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }
}

impl ArchiveTree {
    /// Match one segment among `candidates`.
    ///
    /// The stored name wins on an exact match; otherwise the segment is retried in the
    /// lowercase form the writer stores names in.
    fn find_child(&self, candidates: &[usize], segment: &str, filter: EntryFilter) -> Option<usize> {
        let matching = |name: &str| {
            candidates.iter().copied().find(|&idx| {
                let node = &self.nodes[idx];
                node.name() == name && filter.matches(node.kind())
            })
        };

        matching(segment).or_else(|| {
            let lowered = normalize_name(segment);
            if lowered != segment {
                matching(lowered.as_str())
            } else {
                None
            }
        })
    }

    /// Walk the forest one segment per level. Every segment but the last must be a
    /// directory; the last must satisfy `last`.
    fn walk(&self, segments: &[&str], last: EntryFilter) -> Option<usize> {
        let (last_segment, parents) = segments.split_last()?;

        let mut level: &[usize] = &self.roots;
        for segment in parents {
            let idx = self.find_child(level, segment, EntryFilter::Directories)?;
            level = &self.nodes[idx].children;
        }

        self.find_child(level, last_segment, last)
    }

    pub(crate) fn resolve_index(&self, path: &str, filter: EntryFilter) -> Result<usize> {
        self.walk(&lookup_segments(path), filter)
            .ok_or_else(|| HonkError::PathNotFound(path.to_string()))
    }

    /// Resolve `path` to a node whose kind satisfies `filter`
    pub fn resolve(&self, path: &str, filter: EntryFilter) -> Result<&Node> {
        self.resolve_index(path, filter).map(|idx| &self.nodes[idx])
    }

    /// Resolve `path` to a node of any kind, `None` if absent
    pub fn find(&self, path: &str) -> Option<&Node> {
        self.walk(&lookup_segments(path), EntryFilter::All)
            .map(|idx| &self.nodes[idx])
    }

    pub fn exists(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.find(path).is_some_and(Node::is_file)
    }

    pub fn is_directory(&self, path: &str) -> bool {
        self.find(path).is_some_and(Node::is_directory)
    }

    /// Breadth-first traversal below `base`.
    ///
    /// An empty base (or `.`) starts at the forest roots; any other base must resolve to a
    /// directory. Entries directly below the base are at depth 1; with `max_depth` set,
    /// deeper entries are neither yielded nor descended into.
    pub fn entries(
        &self,
        base: &str,
        max_depth: Option<usize>,
        filter: EntryFilter,
    ) -> Result<Entries<'_>> {
        let segments = lookup_segments(base);

        let (start, base_segments): (&[usize], Vec<String>) = if segments.is_empty() {
            (self.roots.as_slice(), Vec::new())
        } else {
            let idx = self
                .walk(&segments, EntryFilter::All)
                .ok_or_else(|| HonkError::PathNotFound(base.to_string()))?;
            if !self.nodes[idx].is_directory() {
                return Err(HonkError::NotADirectory(base.to_string()));
            }
            let resolved = self.segments_of(idx).into_iter().map(String::from).collect();
            (self.nodes[idx].children.as_slice(), resolved)
        };

        let mut queue = VecDeque::new();
        if max_depth.map_or(true, |max| max >= 1) {
            queue.extend(start.iter().map(|&idx| (idx, 1)));
        }

        Ok(Entries {
            tree: self,
            base: base_segments,
            queue,
            visited: HashSet::new(),
            max_depth,
            filter,
        })
    }

    fn relative_path(&self, idx: usize, base: &[String]) -> String {
        let segments = self.segments_of(idx);
        let skip = common_prefix_len(&segments, base);
        path::join(&segments[skip..])
    }
}

/// Lazy breadth-first iterator over archive entries, see [`ArchiveTree::entries`]
#[derive(Debug)]
pub struct Entries<'a> {
    tree: &'a ArchiveTree,
    base: Vec<String>,
    queue: VecDeque<(usize, usize)>,
    visited: HashSet<i32>,
    max_depth: Option<usize>,
    filter: EntryFilter,
}

impl Iterator for Entries<'_> {
    type Item = DirEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth)) = self.queue.pop_front() {
            let node = &self.tree.nodes[idx];
            if !self.visited.insert(node.id()) {
                continue;
            }

            if self.max_depth.map_or(true, |max| depth < max) {
                for &child in &node.children {
                    if !self.visited.contains(&self.tree.nodes[child].id()) {
                        self.queue.push_back((child, depth + 1));
                    }
                }
            }

            if self.filter.matches(node.kind()) {
                return Some(DirEntry {
                    path: self.tree.relative_path(idx, &self.base),
                    kind: node.kind(),
                });
            }
        }
        None
    }
}
