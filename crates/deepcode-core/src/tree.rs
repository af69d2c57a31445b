//! Workspace file tree
//!
//! Nodes are plain values. Operations never mutate the tree they are given;
//! they return a new `Vec<FileNode>` that the caller commits. Other
//! structures refer to nodes by [`NodeId`] only.
//!
//! Sibling order is always [`compare_nodes`]: folders before files, then by
//! name.

use feruca::{Collator, Locale, Tailoring};
use serde::{Deserialize, Deserializer, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Opaque, globally unique node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh id with a short prefix, e.g. `n_3f2a…`
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}_{}", prefix, Uuid::new_v4().simple()))
    }

    /// Borrow the id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Folder or file. Folders sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Directory; may have children
    Folder,
    /// Leaf file; never has children
    File,
}

/// Where a root's content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    /// Picked from the local device
    Device,
    /// Imported from a GitHub repository
    Github,
}

impl ImportSource {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            ImportSource::Device => "device",
            ImportSource::Github => "github",
        }
    }
}

impl fmt::Display for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository coordinates carried by a GitHub root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubMeta {
    /// User or organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch; the repository default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Directory inside the repository the tree is relative to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

impl GithubMeta {
    /// Build metadata from user input. Values are trimmed and empty
    /// optionals become `None`.
    pub fn new(
        owner: impl AsRef<str>,
        repo: impl AsRef<str>,
        branch: Option<&str>,
        sub_path: Option<&str>,
    ) -> Self {
        let non_empty = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            owner: owner.as_ref().trim().to_string(),
            repo: repo.as_ref().trim().to_string(),
            branch: non_empty(branch),
            sub_path: non_empty(sub_path),
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Path of `node_path` inside the repository, prefixed with `sub_path`
    pub fn repository_path(&self, node_path: &str) -> String {
        let node = node_path.trim_start_matches('/');
        let sub = self
            .sub_path
            .as_deref()
            .unwrap_or("")
            .trim()
            .trim_start_matches('/')
            .trim_end_matches('/');
        if sub.is_empty() {
            node.to_string()
        } else {
            format!("{}/{}", sub, node)
        }
    }
}

/// One entry of the workspace tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    /// Stable identity
    pub id: NodeId,
    /// Last path segment
    pub name: String,
    /// Folder or file
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Slash-delimited path relative to the root
    pub path: String,
    /// Sorted children; always empty for files
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<FileNode>,
    /// View state
    #[serde(default, deserialize_with = "null_as_default")]
    pub expanded: bool,
    /// Checked as context (files only)
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
    /// Provenance, set on roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ImportSource>,
    /// Repository coordinates, set on GitHub roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_meta: Option<GithubMeta>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FileNode {
    /// New collapsed folder with no children
    pub fn folder(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(NodeKind::Folder, name, path)
    }

    /// New unselected file
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(NodeKind::File, name, path)
    }

    fn new(kind: NodeKind, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate("n"),
            name: name.into(),
            kind,
            path: path.into(),
            children: Vec::new(),
            expanded: false,
            selected: false,
            source: None,
            github_meta: None,
        }
    }

    /// Whether this node is a folder
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Whether this node is a file
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    fn matches(&self, other: &FileNode) -> bool {
        self.kind == other.kind && self.path == other.path && self.name == other.name
    }
}

/// A picked file: logical path plus the label the picker reported.
///
/// Node labels are taken from path segments so they always agree with paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Logical path (may use `\` separators or leading slashes)
    pub path: String,
    /// Picker label
    pub name: String,
}

impl PathEntry {
    /// Create an entry
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Normalize a picked path: backslashes become slashes and leading slashes
/// are stripped. Returns `None` for an empty result.
pub fn normalize_path(path: &str) -> Option<String> {
    let normalized = path.replace('\\', "/");
    let trimmed = normalized.trim_start_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

thread_local! {
    // CLDR root collation, punctuation not ignorable, byte order on full ties
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::Cldr(Locale::Root), false, true));
}

/// Locale-aware name comparison (CLDR root collation).
///
/// Accents and case only break ties between otherwise equal names, with
/// lowercase before uppercase. Punctuation keeps its collation weight, so
/// `_` sorts before `.`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| collator.borrow_mut().collate(a, b))
}

/// Sibling order: folders first, then [`compare_names`]
pub fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Sort siblings in place (stable)
pub fn sort_nodes(nodes: &mut [FileNode]) {
    nodes.sort_by(compare_nodes);
}

/// Build the minimal tree containing exactly the given files and the
/// folders their paths imply.
///
/// Entries whose path normalizes to nothing are dropped. A path seen twice
/// produces one file node.
pub fn build_tree<I>(entries: I) -> Vec<FileNode>
where
    I: IntoIterator<Item = PathEntry>,
{
    let mut roots = Vec::new();
    for entry in entries {
        let Some(path) = normalize_path(&entry.path) else {
            continue;
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        insert_segments(&mut roots, &segments, "");
    }
    roots
}

fn insert_segments(siblings: &mut Vec<FileNode>, segments: &[&str], parent_path: &str) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let path = if parent_path.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", parent_path, segment)
    };

    if rest.is_empty() {
        if !siblings.iter().any(|n| n.is_file() && n.path == path) {
            siblings.push(FileNode::file(*segment, path));
            sort_nodes(siblings);
        }
        return;
    }

    let existing = siblings
        .iter()
        .position(|n| n.is_folder() && n.name == *segment && n.path == path);
    let index = match existing {
        Some(index) => index,
        None => {
            let folder = FileNode::folder(*segment, path.clone());
            let id = folder.id.clone();
            siblings.push(folder);
            sort_nodes(siblings);
            let Some(index) = siblings.iter().position(|n| n.id == id) else {
                return;
            };
            index
        }
    };
    insert_segments(&mut siblings[index].children, rest, &path);
}

/// Merge `incoming` into `existing`.
///
/// Incoming nodes without a match (same kind, path and name) are appended;
/// a matching folder keeps its identity and flags and has its children merged
/// recursively. The result is sorted.
pub fn merge_nodes(existing: &[FileNode], incoming: &[FileNode]) -> Vec<FileNode> {
    let mut merged = existing.to_vec();
    for node in incoming {
        match merged.iter_mut().find(|candidate| candidate.matches(node)) {
            None => merged.push(node.clone()),
            Some(same) if same.is_folder() => {
                same.children = merge_nodes(&same.children, &node.children);
            }
            Some(_) => {}
        }
    }
    sort_nodes(&mut merged);
    merged
}

/// Remove the node with `id` (and its subtree) wherever it occurs.
/// An unknown id yields an equal copy.
pub fn remove_node(nodes: &[FileNode], id: &NodeId) -> Vec<FileNode> {
    nodes
        .iter()
        .filter(|n| &n.id != id)
        .map(|n| {
            if n.children.is_empty() {
                n.clone()
            } else {
                FileNode {
                    children: remove_node(&n.children, id),
                    ..n.clone()
                }
            }
        })
        .collect()
}

/// Flip `selected` on the file with `id`. Folders are left untouched.
pub fn toggle_selection(nodes: &[FileNode], id: &NodeId) -> Vec<FileNode> {
    nodes
        .iter()
        .map(|n| {
            if &n.id == id && n.is_file() {
                FileNode {
                    selected: !n.selected,
                    ..n.clone()
                }
            } else if !n.children.is_empty() {
                FileNode {
                    children: toggle_selection(&n.children, id),
                    ..n.clone()
                }
            } else {
                n.clone()
            }
        })
        .collect()
}

/// Set `selected` on every file whose path is in `paths`
pub fn select_paths(nodes: &[FileNode], paths: &[&str]) -> Vec<FileNode> {
    nodes
        .iter()
        .map(|n| FileNode {
            selected: if n.is_file() {
                n.selected || paths.contains(&n.path.as_str())
            } else {
                n.selected
            },
            children: select_paths(&n.children, paths),
            ..n.clone()
        })
        .collect()
}

/// Find a node anywhere in the forest
pub fn find_node<'a>(nodes: &'a [FileNode], id: &NodeId) -> Option<&'a FileNode> {
    nodes.iter().find_map(|n| {
        if &n.id == id {
            Some(n)
        } else {
            find_node(&n.children, id)
        }
    })
}

/// Whether `root` is, or contains, the node with `id`
pub fn contains_node(root: &FileNode, id: &NodeId) -> bool {
    &root.id == id || root.children.iter().any(|c| contains_node(c, id))
}

/// Number of file nodes in the forest
pub fn count_files(nodes: &[FileNode]) -> usize {
    nodes
        .iter()
        .map(|n| usize::from(n.is_file()) + count_files(&n.children))
        .sum()
}

/// Paths of all files, pre-order
pub fn file_paths(nodes: &[FileNode]) -> Vec<String> {
    let mut paths = Vec::new();
    walk(nodes, &mut |n| {
        if n.is_file() {
            paths.push(n.path.clone());
        }
    });
    paths
}

/// Visit every node pre-order
pub fn walk<'a, F>(nodes: &'a [FileNode], visit: &mut F)
where
    F: FnMut(&'a FileNode),
{
    for node in nodes {
        visit(node);
        walk(&node.children, visit);
    }
}

/// Structural equality: same kinds, names, paths and shape, ignoring ids
/// and flags.
pub fn same_structure(a: &[FileNode], b: &[FileNode]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.matches(y) && same_structure(&x.children, &y.children)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(paths: &[&str]) -> Vec<PathEntry> {
        paths
            .iter()
            .map(|p| PathEntry::new(*p, p.rsplit('/').next().unwrap_or(p)))
            .collect()
    }

    fn names(nodes: &[FileNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_build_nested_paths() {
        let tree = build_tree(entries(&["a.txt", "dir/b.txt", "dir/sub/c.txt"]));

        assert_eq!(names(&tree), vec!["dir", "a.txt"]);
        let dir = &tree[0];
        assert!(dir.is_folder());
        assert_eq!(dir.path, "dir");
        assert_eq!(names(&dir.children), vec!["sub", "b.txt"]);
        assert_eq!(dir.children[1].path, "dir/b.txt");
        let sub = &dir.children[0];
        assert_eq!(sub.path, "dir/sub");
        assert_eq!(sub.children.len(), 1);
        assert_eq!(sub.children[0].path, "dir/sub/c.txt");
        assert!(sub.children[0].is_file());
    }

    #[test]
    fn test_build_normalizes_and_drops_empty_paths() {
        let tree = build_tree(entries(&["", "/", "\\win\\file.rs", "//lead.md"]));

        assert_eq!(names(&tree), vec!["win", "lead.md"]);
        assert_eq!(tree[0].children[0].path, "win/file.rs");
        assert_eq!(tree[1].path, "lead.md");
    }

    #[test]
    fn test_build_duplicate_paths_are_idempotent() {
        let tree = build_tree(entries(&["dir/x.rs", "dir/x.rs", "dir//x.rs"]));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 1);
    }

    #[test]
    fn test_top_level_files_create_no_folders() {
        let tree = build_tree(entries(&["README.md", "main.rs"]));
        assert!(tree.iter().all(FileNode::is_file));
        assert_eq!(names(&tree), vec!["main.rs", "README.md"]);
    }

    #[test]
    fn test_name_ordering_is_case_insensitive() {
        let tree = build_tree(entries(&["b.txt", "B.txt", "a.txt", "C.txt"]));
        assert_eq!(names(&tree), vec!["a.txt", "b.txt", "B.txt", "C.txt"]);
    }

    #[test]
    fn test_name_ordering_follows_collation() {
        let tree = build_tree(entries(&["foo.rs", "foo_bar.rs", "zeta.md", "été.md"]));
        assert_eq!(names(&tree), vec!["été.md", "foo_bar.rs", "foo.rs", "zeta.md"]);

        assert_eq!(compare_names("eta.md", "été.md"), Ordering::Less);
        assert_eq!(compare_names("été.md", "f.md"), Ordering::Less);
        assert_eq!(compare_names("readme", "README"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_merge_appends_into_existing_folder() {
        let existing = build_tree(entries(&["a.txt", "dir/b.txt", "dir/sub/c.txt"]));
        let incoming = build_tree(entries(&["dir/d.txt"]));
        let dir_id = existing[0].id.clone();

        let merged = merge_nodes(&existing, &incoming);

        assert_eq!(names(&merged), vec!["dir", "a.txt"]);
        assert_eq!(merged[0].id, dir_id);
        assert_eq!(names(&merged[0].children), vec!["sub", "b.txt", "d.txt"]);
    }

    #[test]
    fn test_merge_preserves_flags() {
        let existing = build_tree(entries(&["dir/b.txt"]));
        let b_id = existing[0].children[0].id.clone();
        let existing = toggle_selection(&existing, &b_id);
        let mut existing = existing;
        existing[0].expanded = true;

        let merged = merge_nodes(&existing, &build_tree(entries(&["dir/b.txt", "dir/e.txt"])));

        assert!(merged[0].expanded);
        let b = find_node(&merged, &b_id).unwrap();
        assert!(b.selected);
        assert_eq!(merged[0].children.len(), 2);
    }

    #[test]
    fn test_remove_nested_and_root() {
        let tree = build_tree(entries(&["a.txt", "dir/b.txt", "dir/sub/c.txt"]));
        let sub_id = tree[0].children[0].id.clone();

        let without_sub = remove_node(&tree, &sub_id);
        assert_eq!(file_paths(&without_sub), vec!["dir/b.txt", "a.txt"]);

        let dir_id = tree[0].id.clone();
        let without_dir = remove_node(&tree, &dir_id);
        assert_eq!(file_paths(&without_dir), vec!["a.txt"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let tree = build_tree(entries(&["a.txt", "dir/b.txt"]));
        let same = remove_node(&tree, &NodeId::from("missing"));
        assert_eq!(same, tree);
    }

    #[test]
    fn test_toggle_ignores_folders() {
        let tree = build_tree(entries(&["dir/b.txt"]));
        let dir_id = tree[0].id.clone();
        let toggled = toggle_selection(&tree, &dir_id);
        assert!(!toggled[0].selected);

        let file_id = tree[0].children[0].id.clone();
        let toggled = toggle_selection(&tree, &file_id);
        assert!(toggled[0].children[0].selected);
        let toggled = toggle_selection(&toggled, &file_id);
        assert!(!toggled[0].children[0].selected);
    }

    #[test]
    fn test_wire_format_accepts_backend_nodes() {
        let json = r#"[
            {"id": "1", "name": "src", "type": "folder", "path": "src", "expanded": null,
             "children": [{"id": "2", "name": "main.rs", "type": "file", "path": "src/main.rs", "children": null}]}
        ]"#;
        let nodes: Vec<FileNode> = serde_json::from_str(json).unwrap();
        assert!(nodes[0].is_folder());
        assert!(!nodes[0].expanded);
        assert_eq!(nodes[0].children[0].path, "src/main.rs");
        assert!(!nodes[0].children[0].selected);
        assert!(nodes[0].source.is_none());
    }

    #[test]
    fn test_wire_format_uses_camel_case_meta() {
        let mut root = FileNode::folder("From GitHub (widgets)", "from-github/acme/widgets");
        root.github_meta = Some(GithubMeta::new("acme", "widgets", Some("main"), Some("src")));
        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(value["type"], "folder");
        assert_eq!(value["githubMeta"]["subPath"], "src");
        assert!(value.get("children").is_none());
    }

    #[test]
    fn test_repository_path_joins_sub_path() {
        let meta = GithubMeta::new("acme", "widgets", None, Some("/packages/core/"));
        assert_eq!(meta.repository_path("/src/lib.rs"), "packages/core/src/lib.rs");
        let bare = GithubMeta::new(" acme ", "widgets", Some("  "), None);
        assert_eq!(bare.owner, "acme");
        assert!(bare.branch.is_none());
        assert_eq!(bare.repository_path("src/lib.rs"), "src/lib.rs");
    }
}
