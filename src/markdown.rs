//! Markdown to HTML conversion.
//!
//! The pipeline treats conversion as a pure function from markdown bytes to
//! HTML bytes, expressed as the [`Convert`] trait. Any
//! `Fn(&[u8]) -> Vec<u8>` closure qualifies, which keeps test doubles to a
//! single line:
//!
//! ```
//! use staticmd::markdown::Convert;
//!
//! let shout = |md: &[u8]| md.to_ascii_uppercase();
//! assert_eq!(shout.convert(b"hi"), b"HI");
//! ```
//!
//! [`CommonMark`] is the default, backed by `pulldown-cmark` with the GitHub
//! flavoured extensions turned on.

use pulldown_cmark::{Options, Parser, html};

pub trait Convert: Send + Sync {
    fn convert(&self, markdown: &[u8]) -> Vec<u8>;
}

impl<F> Convert for F
where
    F: Fn(&[u8]) -> Vec<u8> + Send + Sync,
{
    fn convert(&self, markdown: &[u8]) -> Vec<u8> {
        self(markdown)
    }
}

/// CommonMark plus tables, footnotes, strikethrough and task lists.
///
/// Invalid UTF-8 in the input is replaced rather than rejected.
#[derive(Debug, Clone, Copy)]
pub struct CommonMark {
    options: Options,
}

impl CommonMark {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Default for CommonMark {
    fn default() -> Self {
        Self::new(
            Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        )
    }
}

impl Convert for CommonMark {
    fn convert(&self, markdown: &[u8]) -> Vec<u8> {
        let text = String::from_utf8_lossy(markdown);
        let parser = Parser::new_ext(&text, self.options);
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        html::push_html(&mut out, parser);
        out.into_bytes()
    }
}
