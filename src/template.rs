//! Page templates.
//!
//! A [`Template`] turns one [`Page`] context into bytes on a writer. It is
//! compiled once before rendering starts and then shared, read-only, by every
//! render worker, so implementations must be `Sync`.
//!
//! Two implementations ship with the crate:
//!
//! - [`BuiltinTemplate`]: compiled into the binary with
//!   [maud](https://maud.lambda.xyz/). `Web` renders a page with the root
//!   navigation menu; `Book` renders the combined document with a `top`
//!   anchor for the "back to top" links.
//! - [`TeraTemplate`]: a user-supplied template file. The context exposes
//!   `title`, `name`, `version`, `nav` (list of `title`/`link`), `depth`
//!   and `content`. Templates whose file name ends in `.html` are
//!   auto-escaped, so the body must be inserted as `{{ content | safe }}`.
//!
//! ```text
//! <nav>{% for item in nav %}<a href="{{ depth }}{{ item.link }}">{{ item.title }}</a>{% endfor %}</nav>
//! <main>{{ content | safe }}</main>
//! <footer>{{ version }}</footer>
//! ```

use crate::config::GeneratorConfig;
use crate::types::Page;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse template {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },
    #[error("template execution failed: {0}")]
    Render(#[source] tera::Error),
    #[error("failed to write rendered page: {0}")]
    Io(#[from] io::Error),
}

pub trait Template: Send + Sync {
    fn execute(&self, out: &mut dyn Write, page: &Page) -> Result<(), TemplateError>;
}

/// Compile the template a run needs: the configured file if any, otherwise
/// the built-in variant for the current mode.
pub fn load(config: &GeneratorConfig) -> Result<Box<dyn Template>, TemplateError> {
    match &config.template {
        Some(path) => Ok(Box::new(TeraTemplate::from_file(path)?)),
        None if config.book => Ok(Box::new(BuiltinTemplate::Book)),
        None => Ok(Box::new(BuiltinTemplate::Web)),
    }
}

// ============================================================================
// Tera file templates
// ============================================================================

pub struct TeraTemplate {
    tera: Tera,
    name: String,
}

impl TeraTemplate {
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());
        Self::compile(&name, &source).map_err(|source| TemplateError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compile template text directly. `name` decides auto-escaping the same
    /// way a file name would.
    pub fn from_source(name: &str, source: &str) -> Result<Self, TemplateError> {
        Self::compile(name, source).map_err(|source| TemplateError::Parse {
            path: PathBuf::from(name),
            source,
        })
    }

    fn compile(name: &str, source: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(name, source)?;
        Ok(Self {
            tera,
            name: name.to_string(),
        })
    }
}

impl Template for TeraTemplate {
    fn execute(&self, out: &mut dyn Write, page: &Page) -> Result<(), TemplateError> {
        let context = Context::from_serialize(page).map_err(TemplateError::Render)?;
        self.tera
            .render_to(&self.name, &context, out)
            .map_err(TemplateError::Render)
    }
}

// ============================================================================
// Built-in templates
// ============================================================================

const CSS: &str = include_str!("../static/style.css");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTemplate {
    /// One page per source file, with the root navigation menu.
    Web,
    /// The single combined document.
    Book,
}

impl Template for BuiltinTemplate {
    fn execute(&self, out: &mut dyn Write, page: &Page) -> Result<(), TemplateError> {
        let markup = match self {
            Self::Web => render_web(page),
            Self::Book => render_book(page),
        };
        out.write_all(markup.into_string().as_bytes())?;
        Ok(())
    }
}

fn document_title(page: &Page) -> String {
    match (page.name.is_empty(), page.title.is_empty()) {
        (true, _) => page.title.clone(),
        (false, true) => page.name.clone(),
        (false, false) => format!("{} - {}", page.name, page.title),
    }
}

fn base_document(page: &Page, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content={ "staticmd " (page.version) };
                title { (document_title(page)) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (body)
                footer.site-footer {
                    "version " (page.version)
                }
            }
        }
    }
}

/// Root navigation menu; links are prefixed with the page depth so they
/// resolve from any directory when relative links are on.
fn site_nav(page: &Page) -> Markup {
    html! {
        @if !page.nav.is_empty() {
            nav.site-nav {
                ul {
                    @for entry in &page.nav {
                        li class=[(entry.title == page.name).then_some("current")] {
                            a href={ (page.depth) (entry.link) } { (entry.title) }
                        }
                    }
                }
            }
        }
    }
}

fn render_web(page: &Page) -> Markup {
    let body = html! {
        (site_nav(page))
        main.page {
            article { (PreEscaped(&page.content)) }
        }
    };
    base_document(page, body)
}

fn render_book(page: &Page) -> Markup {
    let body = html! {
        a id="top" {}
        main.book {
            @if !page.title.is_empty() {
                h1.book-title { (page.title) }
            }
            (PreEscaped(&page.content))
        }
    };
    base_document(page, body)
}
