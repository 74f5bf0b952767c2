//! Generated tables of contents.
//!
//! Both flavours are plain markdown, prepended to the source before it is
//! converted, so they pick up whatever styling the converter and template
//! give lists and links.
//!
//! ## Multi mode
//!
//! The index page of a subdirectory gets a bullet list of the entries
//! registered under that directory:
//!
//! ```text
//!
//! ## Table of Contents
//!
//! - [b](</sub/b.html>)
//! - [deep](</sub/deep/>)
//!
//! ```
//!
//! ## Book mode
//!
//! One list for the whole document, nested by directory depth. When a page
//! sits deeper than the page before it, a plain bullet naming its directory
//! opens the new level. Each page bullet links to the anchor placed in front
//! of that page's section:
//!
//! ```text
//! - [a](<#a>)
//! - sub
//!   - [index](<#sub-index>)
//!   - [b](<#sub-b>)
//! ```

use crate::naming;
use crate::navigation::NavigationIndex;
use crate::paths::PathMapper;
use crate::types::NavigationEntry;
use std::collections::HashSet;
use std::path::Path;

pub const TOC_HEADING: &str = "## Table of Contents";

/// Trailer appended to every book section. `top` is the anchor the book
/// template places at the start of the document.
pub const BACK_TO_TOP: &str = "\n[back to top](#top)\n\n";

const TOP_ANCHOR: &str = "top";
const INDENT: &str = "  ";

/// Table of contents for a subdirectory index page, or `None` when the page
/// is not one. A directory that lists nothing still gets the heading.
pub fn directory_toc(
    source: &Path,
    output: &Path,
    mapper: &PathMapper,
    nav: &NavigationIndex,
) -> Option<String> {
    let dir = output.parent()?;
    if dir == mapper.output_root() || !naming::is_index(source) {
        return None;
    }
    let mut toc = format!("\n{TOC_HEADING}\n\n");
    for entry in nav.entries(dir) {
        toc.push_str(&entry.to_markdown_bullet());
        toc.push('\n');
    }
    toc.push('\n');
    Some(toc)
}

/// Raw HTML anchor placed in front of a book section.
pub fn anchor_marker(anchor: &str) -> String {
    format!("\n<a id=\"{anchor}\"></a>\n\n")
}

/// Book-mode table of contents, built one page at a time in discovery order.
#[derive(Debug)]
pub struct BookToc {
    markdown: String,
    previous_depth: usize,
    anchors: HashSet<String>,
}

impl Default for BookToc {
    fn default() -> Self {
        Self::new()
    }
}

impl BookToc {
    pub fn new() -> Self {
        Self {
            markdown: "\n".to_string(),
            previous_depth: 0,
            anchors: HashSet::from([TOP_ANCHOR.to_string()]),
        }
    }

    /// Add a page by its path relative to the input root and return the
    /// anchor its section must carry.
    pub fn add(&mut self, relative: &Path) -> String {
        let depth = relative.components().count().saturating_sub(1);

        if depth > self.previous_depth {
            let dir_name = relative.parent().map(naming::basename).unwrap_or_default();
            self.markdown
                .push_str(&format!("{}- {}\n", INDENT.repeat(depth - 1), dir_name));
        }

        let anchor = self.unique_anchor(naming::anchor_id(relative));
        let entry = NavigationEntry::new(naming::basename(relative), format!("#{anchor}"));
        self.markdown.push_str(&INDENT.repeat(depth));
        self.markdown.push_str(&entry.to_markdown_bullet());
        self.markdown.push('\n');
        self.previous_depth = depth;
        anchor
    }

    /// `a-b` from `a-b.md` and `a/b.md` would clash; later ones get `-2`,
    /// `-3`, ...
    fn unique_anchor(&mut self, base: String) -> String {
        if self.anchors.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.anchors.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn into_markdown(self) -> String {
        self.markdown
    }
}
