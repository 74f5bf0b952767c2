//! # staticmd
//!
//! Turns a directory tree of markdown files into a static HTML site, or into
//! a single HTML book. The directory layout is the site structure: every
//! directory gets a navigation menu, and an `index` file inside a
//! subdirectory stands for that directory.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Discover  docs/        →  [PageSource]   (walk, filter, order)
//! 2. Render    [PageSource] →  public/        (navigation, TOC, convert, template)
//! ```
//!
//! Rendering runs in one of two modes:
//!
//! - **Multi**: one `.html` per source file, rendered concurrently by a fixed
//!   worker pool after the navigation index has been built.
//! - **Book**: every page concatenated in discovery order behind a nested
//!   table of contents, converted once, written as `index.html`.
//!
//! Markdown conversion, templating, filesystem access and version lookup are
//! injected into the [`Generator`] at construction, each behind a small
//! trait, so tests swap them without touching global state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the input root and returns pages in lexical order |
//! | [`generate`] | Stage 2: the [`Generator`], multi and book modes, [`RenderReport`] |
//! | [`navigation`] | Per-directory menus, with the index-file rule |
//! | [`toc`] | Directory and book tables of contents, book anchors |
//! | [`paths`] | Source → output path mapping, links, relative depth |
//! | [`naming`] | Markdown extensions, basenames, index detection, anchor ids |
//! | [`writer`] | Template into memory, then create and write every output file |
//! | [`markdown`] | The [`Convert`](markdown::Convert) seam and the CommonMark converter |
//! | [`template`] | The [`Template`](template::Template) seam: built-in maud pages and Tera files |
//! | [`storage`] | The [`Storage`](storage::Storage) seam over the filesystem |
//! | [`version`] | Build version from git, a timestamp, or a fixed string |
//! | [`config`] | `staticmd.toml` loading, merging, validation, [`GeneratorConfig`] |
//! | [`types`] | [`Page`](types::Page) render context and navigation entries |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `env_logger` setup for the binary |
//!
//! # Example
//!
//! ```no_run
//! use staticmd::{GeneratorConfig, build};
//! use std::path::Path;
//!
//! let config = GeneratorConfig::new(Path::new("docs"))?
//!     .with_relative(true)
//!     .with_parallelism(4);
//! let report = build(config)?;
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod generate;
pub mod logging;
pub mod markdown;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod paths;
pub mod scan;
pub mod storage;
pub mod template;
pub mod toc;
pub mod types;
pub mod version;
pub mod writer;

pub use config::GeneratorConfig;
pub use generate::{GenerateError, Generator, PageError, RenderReport, build};

#[cfg(test)]
pub(crate) mod test_helpers;
