//! Shared test utilities for the staticmd test suite.
//!
//! Provides fixture setup, scratch-tree builders, and test doubles for the
//! injected [`Template`] and [`Storage`] seams.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let src = setup_fixtures();
//! let template = RecordingTemplate::new();
//! let generator = Generator::new(config, Box::new(template.clone()))
//!     .with_storage(FailingStorage::new().fail_read("b.md"));
//!
//! generator.run().unwrap();
//! assert_eq!(template.rendered_names(), vec!["a", "c"]);
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::storage::{LocalStorage, Storage};
use crate::template::{Template, TemplateError};
use crate::types::Page;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `(relative path, contents)` pairs under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
    }
}

/// Every `.html` file under `root`, relative, `/`-separated, sorted.
pub fn html_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

// =========================================================================
// Template doubles
// =========================================================================

/// Writes the page content verbatim and remembers every page it saw.
///
/// Clones share the record, so a test can keep one handle and give the other
/// to a generator.
#[derive(Clone, Default)]
pub struct RecordingTemplate {
    pages: Arc<Mutex<Vec<Page>>>,
}

impl RecordingTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> Vec<Page> {
        self.pages.lock().unwrap().clone()
    }

    /// Names of rendered pages, sorted (workers finish in any order).
    pub fn rendered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pages().into_iter().map(|p| p.name).collect();
        names.sort();
        names
    }

    /// The page rendered under `name`. Panics if there is none.
    pub fn page(&self, name: &str) -> Page {
        self.pages()
            .into_iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("page '{name}' was not rendered"))
    }
}

impl Template for RecordingTemplate {
    fn execute(&self, out: &mut dyn Write, page: &Page) -> Result<(), TemplateError> {
        self.pages.lock().unwrap().push(page.clone());
        out.write_all(page.content.as_bytes())?;
        Ok(())
    }
}

/// Fails for the page with the given name, writes content otherwise.
pub struct FailingTemplate {
    fail_on: String,
}

impl FailingTemplate {
    pub fn on(name: &str) -> Self {
        Self {
            fail_on: name.to_string(),
        }
    }
}

impl Template for FailingTemplate {
    fn execute(&self, out: &mut dyn Write, page: &Page) -> Result<(), TemplateError> {
        if page.name == self.fail_on {
            return Err(TemplateError::Io(io::Error::other("template blew up")));
        }
        out.write_all(page.content.as_bytes())?;
        Ok(())
    }
}

// =========================================================================
// Storage doubles
// =========================================================================

/// The local filesystem, except for operations on paths ending in one of the
/// configured suffixes (compared by path components).
#[derive(Default)]
pub struct FailingStorage {
    read: Vec<PathBuf>,
    create: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_read(mut self, suffix: &str) -> Self {
        self.read.push(PathBuf::from(suffix));
        self
    }

    pub fn fail_create(mut self, suffix: &str) -> Self {
        self.create.push(PathBuf::from(suffix));
        self
    }

    pub fn fail_dir(mut self, suffix: &str) -> Self {
        self.dirs.push(PathBuf::from(suffix));
        self
    }

    fn check(suffixes: &[PathBuf], path: &Path) -> io::Result<()> {
        if suffixes.iter().any(|s| path.ends_with(s)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("refusing {}", path.display()),
            ));
        }
        Ok(())
    }
}

impl Storage for FailingStorage {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        Self::check(&self.read, path)?;
        LocalStorage.read(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        Self::check(&self.create, path)?;
        LocalStorage.create(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        Self::check(&self.dirs, path)?;
        LocalStorage.create_dir_all(path)
    }
}
