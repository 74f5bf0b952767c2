//! Navigation menus derived from the page list.
//!
//! Every page contributes one [`NavigationEntry`] to the menu of its
//! *owning* output directory, in discovery order. Usually the owner is the
//! directory the page is written to. The exception is a subdirectory's index
//! page (`index`, any case, any markdown extension): it stands for the
//! directory itself, so it is listed in the **parent's** menu, titled with
//! the directory name and linking to the directory.
//!
//! ```text
//! a.md          → menu /out      : a   → /a.html
//! sub/index.md  → menu /out      : sub → /sub/
//! sub/b.md      → menu /out/sub  : b   → /sub/b.html
//! index.md      → menu /out      : index → /index.html   (root index is a page)
//! ```
//!
//! The index is built once, single-threaded, before any page is rendered and
//! is read-only afterwards. [`build_navigation`] also creates every output
//! directory the render workers will write into.

use crate::generate::PageError;
use crate::naming;
use crate::paths::PathMapper;
use crate::scan::PageSource;
use crate::types::NavigationEntry;
use crate::writer::OutputWriter;
use log::{debug, error};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// The entries listed under one output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub directory: PathBuf,
    pub entries: Vec<NavigationEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationIndex {
    root: PathBuf,
    /// Menus in the order their directory was first seen.
    menus: Vec<Menu>,
    positions: HashMap<PathBuf, usize>,
    /// Output directories pages are written to or listed under, first-seen
    /// order, no duplicates.
    directories: Vec<PathBuf>,
}

impl NavigationIndex {
    /// Derive menus from pages in discovery order. Touches no filesystem.
    pub fn from_pages(pages: &[PageSource], mapper: &PathMapper) -> Self {
        let mut index = Self {
            root: mapper.output_root().to_path_buf(),
            ..Self::default()
        };
        let mut seen = HashSet::new();

        for page in pages {
            let output = mapper.output_path(&page.path);
            let own_dir = output
                .parent()
                .unwrap_or(mapper.output_root())
                .to_path_buf();
            let (owner, entry) = placement(&page.path, &output, mapper);

            for dir in [&owner, &own_dir] {
                if seen.insert(dir.clone()) {
                    index.directories.push(dir.clone());
                }
            }
            index.push(owner, entry);
        }
        index
    }

    fn push(&mut self, directory: PathBuf, entry: NavigationEntry) {
        let position = match self.positions.get(&directory) {
            Some(&position) => position,
            None => {
                self.menus.push(Menu {
                    directory: directory.clone(),
                    entries: Vec::new(),
                });
                self.positions.insert(directory, self.menus.len() - 1);
                self.menus.len() - 1
            }
        };
        self.menus[position].entries.push(entry);
    }

    /// Entries listed under `dir`, empty if it has none.
    pub fn entries(&self, dir: &Path) -> &[NavigationEntry] {
        self.positions
            .get(dir)
            .map(|&i| self.menus[i].entries.as_slice())
            .unwrap_or(&[])
    }

    /// The site menu: entries listed under the output root.
    pub fn root_entries(&self) -> &[NavigationEntry] {
        self.entries(&self.root)
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn output_root(&self) -> &Path {
        &self.root
    }
}

/// Owning directory and menu entry for one page.
pub fn placement(
    source: &Path,
    output: &Path,
    mapper: &PathMapper,
) -> (PathBuf, NavigationEntry) {
    let dir = output.parent().unwrap_or(mapper.output_root());

    if dir != mapper.output_root() && naming::is_index(source) {
        let parent = dir.parent().unwrap_or(mapper.output_root());
        let entry = NavigationEntry::new(
            naming::basename(dir),
            mapper.directory_link(dir, output),
        );
        (parent.to_path_buf(), entry)
    } else {
        let entry = NavigationEntry::new(naming::basename(source), mapper.file_link(output));
        (dir.to_path_buf(), entry)
    }
}

/// Build the navigation index and create every output directory it names.
///
/// A directory that cannot be created is logged and returned alongside the
/// index; the pages inside it will most likely fail to write later.
pub fn build_navigation(
    pages: &[PageSource],
    mapper: &PathMapper,
    writer: &OutputWriter<'_>,
) -> (NavigationIndex, Vec<PageError>) {
    let index = NavigationIndex::from_pages(pages, mapper);
    let mut failures = Vec::new();

    for dir in index.directories() {
        if let Err(err) = writer.ensure_dir(dir) {
            error!("{err}");
            failures.push(err);
        }
    }

    for menu in index.menus() {
        debug!(
            "navigation for {}: {:?}",
            menu.directory.display(),
            menu.entries
        );
    }
    (index, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn sources(names: &[&str]) -> Vec<PageSource> {
        names
            .iter()
            .map(|n| PageSource {
                path: Path::new("/src").join(n),
                size: 1,
                is_regular: true,
            })
            .collect()
    }

    fn titles(entries: &[NavigationEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn subdirectory_index_represents_directory() {
        let mapper = PathMapper::new("/src", "/out", false);
        let nav = NavigationIndex::from_pages(&sources(&["a.md", "sub/index.md", "sub/b.md"]), &mapper);

        assert_eq!(
            nav.root_entries(),
            &[
                NavigationEntry::new("a", "/a.html"),
                NavigationEntry::new("sub", "/sub/"),
            ]
        );
        assert_eq!(
            nav.entries(Path::new("/out/sub")),
            &[NavigationEntry::new("b", "/sub/b.html")]
        );
    }

    #[test]
    fn relative_links_are_local() {
        let mapper = PathMapper::new("/src", "/out", true);
        let nav = NavigationIndex::from_pages(&sources(&["a.md", "sub/index.md", "sub/b.md"]), &mapper);

        assert_eq!(
            nav.root_entries(),
            &[
                NavigationEntry::new("a", "a.html"),
                NavigationEntry::new("sub", "sub/index.html"),
            ]
        );
        assert_eq!(
            nav.entries(Path::new("/out/sub")),
            &[NavigationEntry::new("b", "b.html")]
        );
    }

    #[test]
    fn index_detection_ignores_case_and_extension() {
        let mapper = PathMapper::new("/src", "/out", false);
        let nav = NavigationIndex::from_pages(
            &sources(&["one/INDEX.md", "two/Index.mkd", "three/index.markdown"]),
            &mapper,
        );

        assert_eq!(titles(nav.root_entries()), vec!["one", "two", "three"]);
        assert!(nav.entries(Path::new("/out/one")).is_empty());
    }

    #[test]
    fn root_index_is_an_ordinary_page() {
        let mapper = PathMapper::new("/src", "/out", false);
        let nav = NavigationIndex::from_pages(&sources(&["index.md"]), &mapper);

        assert_eq!(
            nav.root_entries(),
            &[NavigationEntry::new("index", "/index.html")]
        );
    }

    #[test]
    fn nested_index_is_listed_under_its_parent() {
        let mapper = PathMapper::new("/src", "/out", false);
        let nav = NavigationIndex::from_pages(&sources(&["sub/deep/index.md"]), &mapper);

        assert!(nav.root_entries().is_empty());
        assert_eq!(
            nav.entries(Path::new("/out/sub")),
            &[NavigationEntry::new("deep", "/sub/deep/")]
        );
    }

    #[test]
    fn entries_keep_discovery_order() {
        let mapper = PathMapper::new("/src", "/out", false);
        let nav = NavigationIndex::from_pages(&sources(&["z.md", "b.md", "m.md"]), &mapper);

        assert_eq!(titles(nav.root_entries()), vec!["z", "b", "m"]);
    }

    #[test]
    fn directories_include_index_only_folders() {
        let mapper = PathMapper::new("/src", "/out", false);
        let nav = NavigationIndex::from_pages(&sources(&["a.md", "only/index.md", "sub/b.md"]), &mapper);

        assert_eq!(
            nav.directories(),
            &[
                PathBuf::from("/out"),
                PathBuf::from("/out/only"),
                PathBuf::from("/out/sub"),
            ]
        );
    }

    #[test]
    fn unknown_directory_has_no_entries() {
        let mapper = PathMapper::new("/src", "/out", false);
        let nav = NavigationIndex::from_pages(&[], &mapper);
        assert!(nav.entries(Path::new("/out/nope")).is_empty());
        assert!(nav.menus().is_empty());
    }

    #[test]
    fn build_navigation_creates_directories() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let mapper = PathMapper::new(tmp.path(), out.path(), false);
        let pages = crate::scan::discover(tmp.path()).unwrap();
        let template = RecordingTemplate::new();
        let writer = OutputWriter::new(&LocalStorage, &template);

        let (nav, failures) = build_navigation(&pages, &mapper, &writer);

        assert!(failures.is_empty());
        assert!(out.path().join("guide").is_dir());
        assert!(out.path().join("reference").is_dir());
        assert_eq!(titles(nav.root_entries()), vec!["a", "guide", "index"]);
        assert_eq!(
            titles(nav.entries(&out.path().join("reference"))),
            vec!["api"]
        );
    }

    #[test]
    fn build_navigation_reports_directory_failures() {
        let src = TempDir::new().unwrap();
        write_tree(src.path(), &[("a.md", "a"), ("sub/b.md", "b")]);
        let out = TempDir::new().unwrap();
        let mapper = PathMapper::new(src.path(), out.path(), false);
        let pages = crate::scan::discover(src.path()).unwrap();
        let storage = FailingStorage::new().fail_dir("sub");
        let template = RecordingTemplate::new();
        let writer = OutputWriter::new(&storage, &template);

        let (nav, failures) = build_navigation(&pages, &mapper, &writer);

        let sub = out.path().join("sub");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path(), sub.as_path());
        assert!(!sub.exists());
        assert_eq!(titles(nav.entries(&sub)), vec!["b"]);
    }
}
