//! Page discovery.
//!
//! Stage 1 of the pipeline. Walks the input root in lexical order and keeps
//! every regular, non-empty file with a recognized markdown extension:
//!
//! ```text
//! docs/
//! ├── a.md            → page
//! ├── empty.md        → skipped (zero bytes)
//! ├── notes.txt       → skipped (not markdown)
//! ├── link.md -> a.md → skipped (symlink, not a regular file)
//! └── sub/
//!     ├── b.md        → page
//!     ├── b.mkd       → skipped (same output as b.md)
//!     └── index.md    → page
//! ```
//!
//! The resulting order is the walk order (`a.md`, `sub/b.md`,
//! `sub/index.md`) and everything downstream preserves it: navigation menus,
//! the book table of contents and the book body all follow this list.
//!
//! A walk error anywhere aborts discovery. A skipped file is not an error.

use crate::naming;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A source file as seen during the walk. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSource {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Size in bytes at discovery time.
    pub size: u64,
    /// False for symlinks, sockets, devices and the like.
    pub is_regular: bool,
}

impl PageSource {
    fn from_entry(entry: &DirEntry) -> Result<Self, walkdir::Error> {
        let metadata = entry.metadata()?;
        Ok(Self {
            path: entry.path().to_path_buf(),
            size: metadata.len(),
            is_regular: metadata.file_type().is_file(),
        })
    }

    /// Whether this file should become a page.
    pub fn is_candidate(&self) -> bool {
        self.is_regular && self.size > 0 && naming::is_markdown(&self.path)
    }
}

/// Walk `root` and return the pages it contains, in walk order.
pub fn discover(root: &Path) -> Result<Vec<PageSource>, ScanError> {
    let mut pages = Vec::new();
    let mut seen_stems = HashSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let source = PageSource::from_entry(&entry).map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !source.is_candidate() {
            continue;
        }
        if !seen_stems.insert(naming::stem_key(&source.path)) {
            warn!(
                "skipping {}: another page already renders to the same output",
                source.path.display()
            );
            continue;
        }
        pages.push(source);
    }

    debug!("discovered {} pages under {}", pages.len(), root.display());
    Ok(pages)
}
