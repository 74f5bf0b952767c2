//! Centralized filename rules shared by discovery, navigation and the TOC.
//!
//! Every stage of the pipeline looks at source files the same way:
//!
//! - **Recognized extensions**: only markdown files are pages. The list is
//!   ordered shortest-first, matching the extensions GitHub renders.
//! - **Basename**: a page's display name is its file stem
//!   (`guide/setup.md` → `"setup"`).
//! - **Index pages**: a page whose stem is `index` (any case) stands for its
//!   containing directory rather than itself.
//! - **Anchors**: book mode links to each page through an id derived from its
//!   root-relative path (`sub/b.md` → `"sub-b"`).

use std::path::{Component, Path};

/// Recognized markdown extensions, shortest first.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mkd", "mkdn", "mdown", "markdown"];

/// True when the path ends in one of [`MARKDOWN_EXTENSIONS`].
///
/// Matching is exact: `README.MD` is not a page.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext))
}

/// File name with directory and extension removed.
///
/// - `"/docs/guide/setup.md"` → `"setup"`
/// - `"/docs/a.b.md"` → `"a.b"`
/// - `"/docs/guide"` → `"guide"`
pub fn basename(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// True when the file stem is `index`, compared case-insensitively.
pub fn is_index(path: &Path) -> bool {
    basename(path).eq_ignore_ascii_case("index")
}

/// Path with its extension removed, used to spot two sources that would
/// render to the same output file (`a.md` and `a.mkd`).
pub fn stem_key(path: &Path) -> std::path::PathBuf {
    path.with_extension("")
}

/// Anchor id for a page, built from its path relative to the input root.
///
/// Directory separators become dashes and the extension is dropped:
/// `sub/b.md` → `sub-b`. Whitespace and any character that is not
/// alphanumeric, `-`, `_` or `.` also become dashes, so the id is usable both
/// as an HTML `id` and as a bare markdown link fragment
/// (`my docs/a b.md` → `my-docs-a-b`). The caller is responsible for
/// uniqueness.
pub fn anchor_id(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let joined = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("-");
    joined
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
