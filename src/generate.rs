//! Rendering pipeline.
//!
//! Stage 2, after [discovery](crate::scan). A [`Generator`] owns everything a
//! run needs: the resolved [`GeneratorConfig`], the compiled template and the
//! injected converter, storage and version source. Nothing is global, so two
//! generators can run side by side in the same process.
//!
//! ## Multi mode
//!
//! One HTML file per source file:
//!
//! 1. Build the [navigation index](crate::navigation) and create every output
//!    directory, single-threaded.
//! 2. Start `parallelism` workers on a rayon pool. A producer thread feeds
//!    pages through a bounded channel; each worker reads, prepends the
//!    directory table of contents if the page is a subdirectory index,
//!    converts, and writes.
//! 3. Wait for every worker to drain the queue.
//!
//! Workers only share read-only state: the navigation index, the template,
//! the converter and the storage. The output does not depend on how many
//! workers there are.
//!
//! ## Book mode
//!
//! One `index.html` at the output root, built sequentially: each page is
//! wrapped in an anchor and a "back to top" link, everything is concatenated
//! in discovery order, the book table of contents goes in front, and the
//! result is converted and rendered once.
//!
//! ## Failures
//!
//! Discovery and template compilation failures abort the run
//! ([`GenerateError`]). Everything that goes wrong with a single page is a
//! [`PageError`]: logged, collected into the [`RenderReport`], and otherwise
//! ignored. Sibling pages always get rendered.

use crate::config::GeneratorConfig;
use crate::markdown::{CommonMark, Convert};
use crate::naming;
use crate::navigation::{self, NavigationIndex};
use crate::paths::PathMapper;
use crate::scan::{self, PageSource, ScanError};
use crate::storage::{LocalStorage, Storage};
use crate::template::{self, Template, TemplateError};
use crate::toc::{self, BookToc};
use crate::types::Page;
use crate::version::{GitVersion, VersionSource};
use crate::writer::OutputWriter;
use crossbeam_channel::{bounded, unbounded};
use log::{debug, error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single output file in book mode.
pub const BOOK_FILENAME: &str = "index.html";

/// Failures that abort a run.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("page discovery failed: {0}")]
    Scan(#[from] ScanError),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("failed to start render workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failures confined to one page or directory.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
}

impl PageError {
    /// The source file, output file or directory the failure concerns.
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory { path, .. }
            | Self::Read { path, .. }
            | Self::Create { path, .. }
            | Self::Render { path, .. } => path,
        }
    }
}

/// Outcome of a run that was not aborted.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Output files written, sorted.
    pub rendered: Vec<PathBuf>,
    /// Every non-fatal failure, sorted by path.
    pub failures: Vec<PageError>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn sorted(mut self) -> Self {
        self.rendered.sort();
        self.failures.sort_by(|a, b| a.path().cmp(b.path()));
        self
    }

    pub fn log_summary(&self) {
        if self.is_clean() {
            info!("rendered {} file(s)", self.rendered.len());
        } else {
            warn!(
                "rendered {} file(s), {} failure(s)",
                self.rendered.len(),
                self.failures.len()
            );
        }
    }
}

/// Compile the configured template and run a full build with the default
/// converter, storage and version source.
pub fn build(config: GeneratorConfig) -> Result<RenderReport, GenerateError> {
    let template = template::load(&config)?;
    Generator::new(config, template).run()
}

pub struct Generator {
    config: GeneratorConfig,
    mapper: PathMapper,
    template: Box<dyn Template>,
    converter: Box<dyn Convert>,
    storage: Box<dyn Storage>,
    version: Box<dyn VersionSource>,
}

impl Generator {
    /// A generator with CommonMark conversion, the local filesystem, and git
    /// for the version unless the config fixes one.
    pub fn new(config: GeneratorConfig, template: Box<dyn Template>) -> Self {
        let mapper = PathMapper::new(&config.input, &config.output, config.relative);
        let version: Box<dyn VersionSource> = match &config.version {
            Some(fixed) => Box::new(fixed.clone()),
            None => Box::new(GitVersion),
        };
        Self {
            config,
            mapper,
            template,
            converter: Box::new(CommonMark::default()),
            storage: Box::new(LocalStorage),
            version,
        }
    }

    pub fn with_converter(mut self, converter: impl Convert + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    pub fn with_version_source(mut self, version: impl VersionSource + 'static) -> Self {
        self.version = Box::new(version);
        self
    }

    /// Discover pages and render them in the configured mode.
    pub fn run(&self) -> Result<RenderReport, GenerateError> {
        let pages = scan::discover(&self.config.input)?;
        let version = self.version.version(&self.config.input);
        info!(
            "rendering {} page(s) from {} to {} ({} mode, version {})",
            pages.len(),
            self.config.input.display(),
            self.config.output.display(),
            if self.config.book { "book" } else { "multi" },
            version
        );

        let report = if self.config.book {
            self.book(&pages, &version)
        } else {
            self.multi(&pages, &version)?
        };
        for failure in &report.failures {
            debug!("failed: {}", failure.path().display());
        }
        Ok(report)
    }

    // ========================================================================
    // Multi mode
    // ========================================================================

    /// Render one output file per page on `parallelism` workers.
    pub fn multi(
        &self,
        pages: &[PageSource],
        version: &str,
    ) -> Result<RenderReport, GenerateError> {
        let writer = OutputWriter::new(self.storage.as_ref(), self.template.as_ref());
        let (nav, mut failures) = navigation::build_navigation(pages, &self.mapper, &writer);

        let workers = self.config.parallelism.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("staticmd-render-{i}"))
            .build()?;
        debug!("starting {workers} render worker(s)");

        let (task_tx, task_rx) = bounded::<&PageSource>(workers);
        let (outcome_tx, outcome_rx) = unbounded();

        std::thread::scope(|scope| {
            scope.spawn(move || {
                for page in pages {
                    if task_tx.send(page).is_err() {
                        break;
                    }
                }
            });

            // Owned by this closure so that a panicking worker drops it and
            // unblocks the producer.
            let task_rx = task_rx;
            pool.broadcast(|_| {
                for page in task_rx.iter() {
                    let outcome = self.render_page(page, &nav, version, &writer);
                    if let Err(err) = &outcome {
                        error!("{err}");
                    }
                    let _ = outcome_tx.send(outcome);
                }
            });
        });
        drop(outcome_tx);

        let mut rendered = Vec::with_capacity(pages.len());
        for outcome in outcome_rx {
            match outcome {
                Ok(path) => rendered.push(path),
                Err(err) => failures.push(err),
            }
        }

        let report = RenderReport { rendered, failures }.sorted();
        report.log_summary();
        Ok(report)
    }

    /// Render a single page in multi mode. Output directories must exist.
    pub fn render_page(
        &self,
        page: &PageSource,
        nav: &NavigationIndex,
        version: &str,
        writer: &OutputWriter<'_>,
    ) -> Result<PathBuf, PageError> {
        let output = self.mapper.output_path(&page.path);
        let mut markdown = self
            .storage
            .read(&page.path)
            .map_err(|source| PageError::Read {
                path: page.path.clone(),
                source,
            })?;

        if let Some(toc) = toc::directory_toc(&page.path, &output, &self.mapper, nav) {
            debug!("table of contents for {}:{toc}", output.display());
            let mut with_toc = toc.into_bytes();
            with_toc.append(&mut markdown);
            markdown = with_toc;
        }

        let html = self.converter.convert(&markdown);
        let context = Page {
            title: self.config.title.clone(),
            name: naming::basename(&page.path),
            version: version.to_string(),
            nav: nav.root_entries().to_vec(),
            depth: self.mapper.relative_depth(&output),
            content: String::from_utf8_lossy(&html).into_owned(),
        };

        writer.write(&output, &context)?;
        debug!("rendered {}", output.display());
        Ok(output)
    }

    // ========================================================================
    // Book mode
    // ========================================================================

    /// Render every page into one `index.html` at the output root.
    pub fn book(&self, pages: &[PageSource], version: &str) -> RenderReport {
        let writer = OutputWriter::new(self.storage.as_ref(), self.template.as_ref());
        let mut report = RenderReport::default();
        let mut toc = BookToc::new();
        let mut body = Vec::new();

        for page in pages {
            let markdown = match self.storage.read(&page.path) {
                Ok(markdown) => markdown,
                Err(source) => {
                    let err = PageError::Read {
                        path: page.path.clone(),
                        source,
                    };
                    error!("{err}");
                    report.failures.push(err);
                    continue;
                }
            };

            let anchor = toc.add(&self.book_relative(&page.path));
            body.extend_from_slice(toc::anchor_marker(&anchor).as_bytes());
            body.extend_from_slice(&markdown);
            body.extend_from_slice(toc::BACK_TO_TOP.as_bytes());
        }
        debug!("book table of contents:{}", toc.markdown());

        let mut content = toc.into_markdown().into_bytes();
        content.extend_from_slice(&body);

        let root = self.mapper.output_root();
        if let Err(err) = writer.ensure_dir(root) {
            error!("{err}");
            report.failures.push(err);
            let report = report.sorted();
            report.log_summary();
            return report;
        }

        let output = root.join(BOOK_FILENAME);
        let html = self.converter.convert(&content);
        let context = Page {
            title: self.config.title.clone(),
            name: String::new(),
            version: version.to_string(),
            nav: Vec::new(),
            depth: self.mapper.relative_depth(&output),
            content: String::from_utf8_lossy(&html).into_owned(),
        };

        match writer.write(&output, &context) {
            Ok(()) => {
                info!("rendered book {}", output.display());
                report.rendered.push(output);
            }
            Err(err) => {
                error!("{err}");
                report.failures.push(err);
            }
        }
        let report = report.sorted();
        report.log_summary();
        report
    }

    /// Path used for the book anchor and table of contents entry.
    fn book_relative(&self, source: &Path) -> PathBuf {
        match self.mapper.source_relative(source) {
            Some(rel) => rel.to_path_buf(),
            None => PathBuf::from(source.file_name().unwrap_or_default()),
        }
    }
}
