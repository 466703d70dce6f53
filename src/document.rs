//! Tree documents: a serialized syntax tree plus the source it was parsed from

use crate::column::SourceText;
use crate::syntax::{RawNode, SyntaxTree, TreeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading a tree document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML tree document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON tree document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid syntax tree: {0}")]
    Tree(#[from] TreeError),

    #[error("tree document names neither `source` nor `text`")]
    MissingSource,
}

/// On-disk form of a tree document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeFile {
    /// Source file, relative to the tree document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Inline source text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_width: Option<usize>,

    pub root: RawNode,
}

impl TreeFile {
    /// Parse by extension: `.json` is JSON, anything else YAML
    pub fn parse(content: &str, path: &Path) -> Result<Self, DocumentError> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }
}

/// A loaded, validated tree ready for verification
#[derive(Debug, Clone)]
pub struct Document {
    /// The tree document itself
    pub path: PathBuf,
    /// The source file, when the text is not inline
    pub source_path: Option<PathBuf>,
    pub tree: SyntaxTree,
    pub source: SourceText,
}

impl Document {
    /// Load a tree document and the source it refers to
    pub fn load(path: &Path, default_tab_width: usize) -> Result<Self, DocumentError> {
        let content = read(path)?;
        let file = TreeFile::parse(&content, path)?;
        Self::from_tree_file(file, path, default_tab_width)
    }

    pub fn from_tree_file(
        file: TreeFile,
        path: &Path,
        default_tab_width: usize,
    ) -> Result<Self, DocumentError> {
        let tab_width = file.tab_width.unwrap_or(default_tab_width);
        let (text, source_path) = match (file.text, file.source) {
            (Some(text), _) => (text, None),
            (None, Some(source)) => {
                let resolved = match path.parent() {
                    Some(dir) if source.is_relative() => dir.join(&source),
                    _ => source,
                };
                (read(&resolved)?, Some(resolved))
            }
            (None, None) => return Err(DocumentError::MissingSource),
        };
        let tree = file.root.into_tree()?;
        log::debug!(
            "loaded {} ({} nodes, tab width {})",
            path.display(),
            tree.len(),
            tab_width
        );
        Ok(Self {
            path: path.to_path_buf(),
            source_path,
            tree,
            source: SourceText::new(text, tab_width),
        })
    }

    /// File diagnostics are reported against: the source when there is one
    pub fn display_path(&self) -> &Path {
        self.source_path.as_deref().unwrap_or(&self.path)
    }
}

fn read(path: &Path) -> Result<String, DocumentError> {
    std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}
