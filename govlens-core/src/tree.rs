//! Arena-indexed file tree with expand/collapse state.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. All
//! traversals are iterative, so deep trees cannot overflow the stack.

use std::collections::HashMap;

use crate::layers::PathPattern;

/// Repository browsed by the file explorer.
pub const SOURCE_REPO_URL: &str = "https://github.com/dfinity/ic/tree/master";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

#[derive(Debug, Clone)]
pub struct FileNode {
    /// Full path from the repository root
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
}

impl FileNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// How a node relates to a set of highlight patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// The node's own path matches
    Direct,
    /// A direct child matches
    Ancestor,
    None,
}

/// A visible line of the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FileTree {
    nodes: Vec<FileNode>,
    roots: Vec<NodeId>,
    by_path: HashMap<String, NodeId>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the hierarchy implied by a list of slash-separated paths. The
    /// last segment is a file unless the path ends with `/`.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for path in paths {
            tree.insert_path(path.as_ref());
        }
        tree
    }

    /// Insert a path, creating missing parent directories. Returns the id of
    /// the final segment.
    pub fn insert_path(&mut self, path: &str) -> Option<NodeId> {
        let is_dir = path.ends_with('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let last = segments.len().checked_sub(1)?;

        let mut parent: Option<NodeId> = None;
        let mut full = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if !full.is_empty() {
                full.push('/');
            }
            full.push_str(segment);

            let kind = if i == last && !is_dir {
                NodeKind::File
            } else {
                NodeKind::Directory
            };

            let id = match self.by_path.get(&full) {
                Some(&id) => id,
                None => self.push(parent, segment, &full, kind)?,
            };
            parent = Some(id);
        }
        parent
    }

    /// Add a top-level node.
    pub fn add_root(&mut self, name: &str, kind: NodeKind) -> NodeId {
        match self.by_path.get(name) {
            Some(&id) => id,
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(FileNode {
                    path: name.to_string(),
                    name: name.to_string(),
                    kind,
                    parent: None,
                    children: Vec::new(),
                    expanded: false,
                });
                self.roots.push(id);
                self.by_path.insert(name.to_string(), id);
                id
            }
        }
    }

    /// Add a node under a directory. `None` if `parent` is unknown or a file.
    pub fn add_child(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> Option<NodeId> {
        let path = format!("{}/{}", self.node(parent)?.path, name);
        match self.by_path.get(&path) {
            Some(&id) => Some(id),
            None => self.push(Some(parent), name, &path, kind),
        }
    }

    fn push(&mut self, parent: Option<NodeId>, name: &str, path: &str, kind: NodeKind) -> Option<NodeId> {
        let Some(parent) = parent else {
            return Some(self.add_root(name, kind));
        };
        if !self.node(parent)?.is_dir() {
            return None;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(FileNode {
            path: path.to_string(),
            name: name.to_string(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            expanded: false,
        });
        self.nodes[parent.0].children.push(id);
        self.by_path.insert(path.to_string(), id);
        Some(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&FileNode> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path.trim_end_matches('/')).copied()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flip a directory open or closed. Returns the new state; files stay closed.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) if node.kind == NodeKind::Directory => {
                node.expanded = !node.expanded;
                node.expanded
            }
            _ => false,
        }
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            if node.kind == NodeKind::Directory {
                node.expanded = expanded;
            }
        }
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = node.kind == NodeKind::Directory;
        }
    }

    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = false;
        }
    }

    /// Expand every ancestor of `id` so that it becomes visible.
    pub fn reveal(&mut self, id: NodeId) {
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            self.nodes[parent.0].expanded = true;
            current = self.nodes[parent.0].parent;
        }
    }

    /// Reveal every node whose path matches one of `patterns`.
    /// Returns the number of matching nodes.
    pub fn reveal_matching(&mut self, patterns: &[PathPattern]) -> usize {
        let matching: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| matches_any(&self.nodes[id.0].path, patterns))
            .collect();
        for &id in &matching {
            self.reveal(id);
        }
        matching.len()
    }

    /// Rows a renderer would draw: depth-first, descending only into
    /// expanded directories.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<TreeRow> = self
            .roots
            .iter()
            .rev()
            .map(|&id| TreeRow { id, depth: 0 })
            .collect();

        while let Some(row) = stack.pop() {
            rows.push(row);
            let node = &self.nodes[row.id.0];
            if node.expanded {
                stack.extend(node.children.iter().rev().map(|&child| TreeRow {
                    id: child,
                    depth: row.depth + 1,
                }));
            }
        }
        rows
    }

    /// Pre-order walk of `id` and all of its descendants, ignoring expansion.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn highlight(&self, id: NodeId, patterns: &[PathPattern]) -> Highlight {
        let Some(node) = self.node(id) else {
            return Highlight::None;
        };
        if matches_any(&node.path, patterns) {
            return Highlight::Direct;
        }
        if node
            .children
            .iter()
            .any(|c| matches_any(&self.nodes[c.0].path, patterns))
        {
            return Highlight::Ancestor;
        }
        Highlight::None
    }

    /// Link to a file in the source repository. Directories have none.
    pub fn source_url(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::File => Some(format!("{}/{}", SOURCE_REPO_URL, node.path)),
            NodeKind::Directory => None,
        }
    }
}

fn matches_any(path: &str, patterns: &[PathPattern]) -> bool {
    patterns.iter().any(|p| p.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileTree {
        FileTree::from_paths([
            "rs/consensus/src/lib.rs",
            "rs/consensus/Cargo.toml",
            "rs/p2p/src/lib.rs",
            "README.md",
        ])
    }

    fn names(tree: &FileTree, rows: &[TreeRow]) -> Vec<(String, usize)> {
        rows.iter()
            .map(|r| (tree.node(r.id).unwrap().name.clone(), r.depth))
            .collect()
    }

    #[test]
    fn test_from_paths_builds_hierarchy() {
        let tree = sample();
        assert_eq!(tree.roots().len(), 2);
        let consensus = tree.find("rs/consensus").unwrap();
        assert!(tree.node(consensus).unwrap().is_dir());
        assert_eq!(tree.node(consensus).unwrap().children().len(), 2);
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn test_visible_rows_follow_expansion() {
        let mut tree = sample();
        let rows = tree.visible_rows();
        assert_eq!(names(&tree, &rows), vec![("rs".into(), 0), ("README.md".into(), 0)]);

        let rs = tree.find("rs").unwrap();
        assert!(tree.toggle(rs));
        let rows = tree.visible_rows();
        assert_eq!(
            names(&tree, &rows),
            vec![
                ("rs".into(), 0),
                ("consensus".into(), 1),
                ("p2p".into(), 1),
                ("README.md".into(), 0),
            ]
        );

        tree.expand_all();
        assert_eq!(tree.visible_rows().len(), tree.len());
        tree.collapse_all();
        assert_eq!(tree.visible_rows().len(), 2);
    }

    #[test]
    fn test_toggle_file_is_noop() {
        let mut tree = sample();
        let readme = tree.find("README.md").unwrap();
        assert!(!tree.toggle(readme));
        assert_eq!(
            tree.source_url(readme).as_deref(),
            Some("https://github.com/dfinity/ic/tree/master/README.md")
        );
        assert!(tree.source_url(tree.find("rs").unwrap()).is_none());
    }

    #[test]
    fn test_highlight() {
        let tree = sample();
        let patterns = vec![PathPattern::new("rs/consensus/*").unwrap()];

        let lib = tree.find("rs/consensus/src").unwrap();
        assert_eq!(tree.highlight(lib, &patterns), Highlight::Direct);
        let dir = tree.find("rs/consensus").unwrap();
        assert_eq!(tree.highlight(dir, &patterns), Highlight::Ancestor);
        let rs = tree.find("rs").unwrap();
        assert_eq!(tree.highlight(rs, &patterns), Highlight::None);
    }

    #[test]
    fn test_reveal_matching() {
        let mut tree = sample();
        let patterns = vec![PathPattern::new("rs/p2p/*").unwrap()];
        assert_eq!(tree.reveal_matching(&patterns), 2);
        let visible: Vec<_> = tree
            .visible_rows()
            .iter()
            .map(|r| tree.node(r.id).unwrap().path.clone())
            .collect();
        assert!(visible.contains(&"rs/p2p/src/lib.rs".to_string()));
        assert!(!visible.contains(&"rs/consensus/src".to_string()));
    }

    #[test]
    fn test_descendants_preorder() {
        let tree = sample();
        let p2p = tree.find("rs/p2p").unwrap();
        let paths: Vec<_> = tree
            .descendants(p2p)
            .iter()
            .map(|&id| tree.node(id).unwrap().path.clone())
            .collect();
        assert_eq!(paths, vec!["rs/p2p", "rs/p2p/src", "rs/p2p/src/lib.rs"]);
    }

    #[test]
    fn test_file_cannot_have_children() {
        let mut tree = sample();
        let readme = tree.find("README.md").unwrap();
        assert!(tree.add_child(readme, "nested", NodeKind::File).is_none());
    }
}
