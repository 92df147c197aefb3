use crate::archive::format::{EntryBody, EntryKind, EntryRecord};
use crate::error::{HonkError, Result};
use std::collections::HashMap;

/// One linked archive entry.
///
/// Nodes live in the [`ArchiveTree`] arena; `parent` and `children` are arena indices.
#[derive(Debug, Clone)]
pub struct Node {
    id: i32,
    name: String,
    body: EntryBody,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl Node {
    fn from_record(record: EntryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            body: record.body,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        match self.body {
            EntryBody::File { .. } => EntryKind::File,
            EntryBody::Directory { .. } => EntryKind::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind().is_file()
    }

    pub fn is_directory(&self) -> bool {
        self.kind().is_directory()
    }

    /// Content offset relative to the content blob (files only)
    pub fn offset(&self) -> Option<u64> {
        match self.body {
            EntryBody::File { offset, .. } => Some(offset),
            EntryBody::Directory { .. } => None,
        }
    }

    /// Content size in bytes (files only)
    pub fn size(&self) -> Option<u32> {
        match self.body {
            EntryBody::File { size, .. } => Some(size),
            EntryBody::Directory { .. } => None,
        }
    }

    /// Child ids as persisted (directories only; empty for files)
    pub fn child_ids(&self) -> &[i32] {
        match &self.body {
            EntryBody::Directory { children } => children,
            EntryBody::File { .. } => &[],
        }
    }
}

/// The linked forest of an open archive
#[derive(Debug, Clone, Default)]
pub struct ArchiveTree {
    pub(crate) nodes: Vec<Node>,
    index: HashMap<i32, usize>,
    pub(crate) roots: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl ArchiveTree {
    /// Link a flat entry table into a forest.
    ///
    /// Fails on duplicate ids, dangling child ids, entries claimed by two directories, and
    /// any directory that would contain itself. No partial tree is returned.
    pub fn build(records: Vec<EntryRecord>) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
            roots: Vec::new(),
        };

        for record in records {
            if tree.index.contains_key(&record.id) {
                return Err(HonkError::DuplicateEntry(record.id));
            }
            tree.index.insert(record.id, tree.nodes.len());
            tree.nodes.push(Node::from_record(record));
        }

        // Directories link in ascending id order; roots come out in the same order
        let mut order: Vec<usize> = (0..tree.nodes.len()).collect();
        order.sort_by_key(|&idx| tree.nodes[idx].id);

        for &idx in &order {
            let child_ids = tree.nodes[idx].child_ids().to_vec();
            for child_id in child_ids {
                tree.link(idx, child_id)?;
            }
        }

        tree.verify_acyclic()?;

        tree.roots = order
            .into_iter()
            .filter(|&idx| tree.nodes[idx].parent.is_none())
            .collect();

        tracing::debug!(
            entries = tree.nodes.len(),
            roots = tree.roots.len(),
            "linked archive tree"
        );
        Ok(tree)
    }

    fn link(&mut self, parent: usize, child_id: i32) -> Result<()> {
        let parent_id = self.nodes[parent].id;
        let child = *self.index.get(&child_id).ok_or(HonkError::MissingEntry {
            parent: parent_id,
            child: child_id,
        })?;

        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if self.nodes[ancestor].id == child_id {
                return Err(HonkError::RecursiveEntry {
                    parent: parent_id,
                    child: child_id,
                });
            }
            cursor = self.nodes[ancestor].parent;
        }

        if let Some(first) = self.nodes[child].parent {
            return Err(HonkError::SharedEntry {
                child: child_id,
                first: self.nodes[first].id,
                second: parent_id,
            });
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Depth-first pass over every node with in-progress markers; reaching an in-progress
    /// node again means a directory contains itself.
    fn verify_acyclic(&self) -> Result<()> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];

        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            let mut stack = vec![(start, 0usize)];
            marks[start] = Mark::InProgress;

            while let Some(top) = stack.last_mut() {
                let (idx, next) = *top;
                if let Some(&child) = self.nodes[idx].children.get(next) {
                    top.1 += 1;
                    match marks[child] {
                        Mark::InProgress => {
                            return Err(HonkError::RecursiveEntry {
                                parent: self.nodes[idx].id,
                                child: self.nodes[child].id,
                            });
                        }
                        Mark::Unvisited => {
                            marks[child] = Mark::InProgress;
                            stack.push((child, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[idx] = Mark::Done;
                    stack.pop();
                }
            }
        }

        Ok(())
    }

    /// Number of entries in the archive
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by its id
    pub fn get(&self, id: i32) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// Top-level nodes, ascending by id
    pub fn roots(&self) -> impl Iterator<Item = &Node> + '_ {
        self.roots.iter().map(move |&idx| &self.nodes[idx])
    }

    /// Linked children of a node, in persisted order
    pub fn children(&self, node: &Node) -> impl Iterator<Item = &Node> + '_ {
        let children = self
            .index
            .get(&node.id)
            .map(|&idx| self.nodes[idx].children.as_slice())
            .unwrap_or(&[]);
        children.iter().map(move |&idx| &self.nodes[idx])
    }

    /// Parent of a node, `None` for roots
    pub fn parent(&self, node: &Node) -> Option<&Node> {
        self.index
            .get(&node.id)
            .and_then(|&idx| self.nodes[idx].parent)
            .map(|idx| &self.nodes[idx])
    }

    /// Segments from the forest root down to `idx`, rebuilt from the parent chain
    pub(crate) fn segments_of(&self, idx: usize) -> Vec<&str> {
        let mut segments = Vec::new();
        let mut cursor = Some(idx);
        while let Some(current) = cursor {
            segments.push(self.nodes[current].name.as_str());
            cursor = self.nodes[current].parent;
        }
        segments.reverse();
        segments
    }

    /// Full archive path of a node
    pub fn path_of(&self, node: &Node) -> Option<String> {
        self.index
            .get(&node.id)
            .map(|&idx| crate::archive::path::join(&self.segments_of(idx)))
    }
}
