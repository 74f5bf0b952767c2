//! Shared types handed from the pipeline to templates.
//!
//! [`Page`] is the whole context a template sees. Field names are the
//! template-facing names (`{{ content | safe }}`, `{% for item in nav %}`).

use serde::{Deserialize, Serialize};

/// One entry in a directory's navigation menu.
///
/// For a regular page the title is the file stem and the link points at the
/// page. For the index page of a subdirectory the title is the directory name
/// and the link points at the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub title: String,
    pub link: String,
}

impl NavigationEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Markdown bullet linking to this entry: `- [title](<link>)`.
    ///
    /// The destination is wrapped in angle brackets so file names with
    /// spaces or parentheses still parse as one link. Brackets in the title
    /// are escaped.
    pub fn to_markdown_bullet(&self) -> String {
        let title = self
            .title
            .replace('\\', "\\\\")
            .replace('[', "\\[")
            .replace(']', "\\]");
        let link = self.link.replace('<', "%3C").replace('>', "%3E");
        format!("- [{title}](<{link}>)")
    }
}

/// Render context passed to the template for one output file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Site or document title.
    pub title: String,
    /// Source file stem; empty for the combined book document.
    pub name: String,
    /// Build version stamped into every page of a run.
    pub version: String,
    /// Navigation entries of the output root.
    pub nav: Vec<NavigationEntry>,
    /// Prefix from this page's directory back to the output root. Empty
    /// unless relative links are enabled.
    pub depth: String,
    /// Rendered HTML body.
    pub content: String,
}
