//! Local device files
//!
//! Keyed by the logical path the file has in the device root. The value
//! remembers where the file lives on disk so it can be previewed and
//! uploaded later.

use crate::tree::{normalize_path, PathEntry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extensions uploaded to the backend as text
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "json", "xml", "html", "css", "js", "ts", "tsx", "jsx", "java", "py", "rb", "go",
    "rs", "c", "cpp", "h", "hpp", "cs", "php", "swift", "kt", "yml", "yaml", "toml", "ini", "cfg",
    "conf", "sh", "bash", "zsh", "sql", "graphql", "vue", "svelte", "scss", "sass", "less", "log",
    "env", "gitignore", "dockerignore",
];

/// A file picked from the local device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFile {
    /// Logical path inside the device root
    pub path: String,
    /// File name
    pub name: String,
    /// Location on disk
    pub location: PathBuf,
}

impl DeviceFile {
    /// A single picked file: the logical path is its file name
    pub fn picked(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let name = file_name(&location);
        Self {
            path: name.clone(),
            name,
            location,
        }
    }

    /// A file found while picking a folder; `relative` includes the folder
    /// name itself
    pub fn in_folder(relative: &str, location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let path = normalize_path(relative).unwrap_or_else(|| file_name(&location));
        let name = path
            .rsplit('/')
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| file_name(&location));
        Self {
            path,
            name,
            location,
        }
    }

    /// Entry for the tree builder
    pub fn entry(&self) -> PathEntry {
        PathEntry::new(self.path.clone(), self.name.clone())
    }

    /// Whether this file passes the text upload filter
    pub fn is_uploadable(&self) -> bool {
        is_uploadable(&self.path)
    }
}

fn file_name(location: &Path) -> String {
    location
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension of the last path segment, lowercased. Dotfiles such as
/// `.gitignore` report the part after the dot.
pub fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Text files and extensionless files are uploaded
pub fn is_uploadable(path: &str) -> bool {
    match extension(path) {
        None => true,
        Some(ext) => TEXT_EXTENSIONS.contains(&ext.as_str()),
    }
}

/// In-memory map of device files keyed by logical path
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    files: BTreeMap<String, DeviceFile>,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, replacing any previous file at the same path
    pub fn insert(&mut self, file: DeviceFile) -> Option<DeviceFile> {
        self.files.insert(file.path.clone(), file)
    }

    /// Forget the file at `path`
    pub fn remove(&mut self, path: &str) -> Option<DeviceFile> {
        self.files.remove(path)
    }

    /// Look up a file
    pub fn get(&self, path: &str) -> Option<&DeviceFile> {
        self.files.get(path)
    }

    /// Whether `path` is a registered device file
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Number of registered files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are registered
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in path order
    pub fn iter(&self) -> impl Iterator<Item = &DeviceFile> {
        self.files.values()
    }
}
