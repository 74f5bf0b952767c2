//! Mapping source paths to output paths and links.
//!
//! The mapping is one-way: `guide.md`, `guide.mkd` and `guide.markdown` all
//! land on `guide.html`, so there is no reverse function and none should be
//! added. Discovery drops duplicate stems so that no two pages share an
//! output file.
//!
//! Links are URL paths and always use `/`, whatever the host separator.
//!
//! ```text
//! input  /src/docs/sub/b.md
//! output /out/sub/b.html
//! link   /sub/b.html        (absolute mode)
//!        b.html             (relative mode)
//! depth  ../                (relative mode only)
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

/// Translates source paths under the input root to their output counterparts.
#[derive(Debug, Clone)]
pub struct PathMapper {
    input: PathBuf,
    output: PathBuf,
    relative: bool,
}

impl PathMapper {
    /// Both roots are expected to be absolute and already cleaned.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, relative: bool) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            relative,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output
    }

    /// Path of a source file relative to the input root.
    pub fn source_relative<'a>(&self, source: &'a Path) -> Option<&'a Path> {
        source.strip_prefix(&self.input).ok()
    }

    /// Output file for a source file: the input root is swapped for the
    /// output root and the extension becomes `.html`.
    ///
    /// A path outside the input root keeps only its file name, so the result
    /// always lies under the output root.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let rel = match self.source_relative(source) {
            Some(rel) if rel.as_os_str().is_empty() => Path::new(source.file_name().unwrap_or_default()),
            Some(rel) => rel,
            None => Path::new(source.file_name().unwrap_or_default()),
        };
        self.output.join(rel).with_extension("html")
    }

    /// Prefix leading from an output file's directory back to the output
    /// root (`./`, `../`, `../../`), or empty when relative links are off.
    ///
    /// A directory outside the output root degrades to empty.
    pub fn relative_depth(&self, output_path: &Path) -> String {
        if !self.relative {
            return String::new();
        }
        let Some(dir) = output_path.parent() else {
            return String::new();
        };
        let Ok(rel) = dir.strip_prefix(&self.output) else {
            return String::new();
        };
        let levels = rel
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count();
        if levels == 0 {
            "./".to_string()
        } else {
            "../".repeat(levels)
        }
    }

    /// Link to an output file as seen from a menu.
    ///
    /// Absolute mode: the path below the output root with a leading `/`.
    /// Relative mode: the bare file name, valid from the file's own directory.
    pub fn file_link(&self, output_path: &Path) -> String {
        if self.relative {
            return file_name(output_path);
        }
        match output_path.strip_prefix(&self.output) {
            Ok(rel) => format!("/{}", url_path(rel)),
            Err(_) => file_name(output_path),
        }
    }

    /// Link to a directory represented by its index page.
    ///
    /// Absolute mode: `/sub/` (trailing slash, no file name).
    /// Relative mode: `sub/index.html`, valid from the parent directory.
    pub fn directory_link(&self, dir: &Path, index_output: &Path) -> String {
        if self.relative {
            return format!("{}/{}", file_name(dir), file_name(index_output));
        }
        match dir.strip_prefix(&self.output) {
            Ok(rel) if rel.as_os_str().is_empty() => "/".to_string(),
            Ok(rel) => format!("/{}/", url_path(rel)),
            Err(_) => format!("{}/", file_name(dir)),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Join the normal components of a relative path with `/`.
pub fn url_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically normalize a path: drop `.` components and resolve `..`
/// against the preceding component. Does not touch the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    cleaned.components().next_back(),
                    Some(Component::Normal(_))
                ) && cleaned.pop();
                if !popped && !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Make a path absolute against the current directory, then clean it.
pub fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    Ok(clean_path(&std::path::absolute(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(relative: bool) -> PathMapper {
        PathMapper::new("/src/docs", "/out", relative)
    }

    #[test]
    fn output_path_swaps_root_and_extension() {
        let m = mapper(false);
        assert_eq!(
            m.output_path(Path::new("/src/docs/a.md")),
            PathBuf::from("/out/a.html")
        );
        assert_eq!(
            m.output_path(Path::new("/src/docs/sub/b.markdown")),
            PathBuf::from("/out/sub/b.html")
        );
        assert_eq!(
            m.output_path(Path::new("/src/docs/v1.2.md")),
            PathBuf::from("/out/v1.2.html")
        );
    }

    #[test]
    fn output_path_is_one_way() {
        // Feeding an output path back in does not return it unchanged.
        let m = PathMapper::new("/site", "/site/public", false);
        let once = m.output_path(Path::new("/site/a.md"));
        assert_eq!(once, PathBuf::from("/site/public/a.html"));
        let twice = m.output_path(&once);
        assert_ne!(twice, once);
    }

    #[test]
    fn output_path_stays_under_output_root() {
        let m = mapper(false);
        let out = m.output_path(Path::new("/elsewhere/stray.md"));
        assert_eq!(out, PathBuf::from("/out/stray.html"));
    }

    #[test]
    fn depth_is_empty_without_relative_links() {
        assert_eq!(mapper(false).relative_depth(Path::new("/out/sub/b.html")), "");
    }

    #[test]
    fn depth_climbs_back_to_output_root() {
        let m = mapper(true);
        assert_eq!(m.relative_depth(Path::new("/out/a.html")), "./");
        assert_eq!(m.relative_depth(Path::new("/out/sub/b.html")), "../");
        assert_eq!(m.relative_depth(Path::new("/out/sub/deep/c.html")), "../../");
    }

    #[test]
    fn depth_degrades_to_empty_outside_output_root() {
        assert_eq!(mapper(true).relative_depth(Path::new("/other/a.html")), "");
    }

    #[test]
    fn absolute_links_strip_output_root() {
        let m = mapper(false);
        assert_eq!(m.file_link(Path::new("/out/a.html")), "/a.html");
        assert_eq!(m.file_link(Path::new("/out/sub/b.html")), "/sub/b.html");
        assert_eq!(
            m.directory_link(Path::new("/out/sub"), Path::new("/out/sub/index.html")),
            "/sub/"
        );
    }

    #[test]
    fn relative_links_are_local_to_the_directory() {
        let m = mapper(true);
        assert_eq!(m.file_link(Path::new("/out/sub/b.html")), "b.html");
        assert_eq!(
            m.directory_link(Path::new("/out/sub"), Path::new("/out/sub/INDEX.html")),
            "sub/INDEX.html"
        );
    }

    #[test]
    fn clean_path_resolves_dots() {
        assert_eq!(clean_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("/a/b/")), PathBuf::from("/a/b"));
        assert_eq!(clean_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(clean_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
    }
}
