//! Persisting rendered pages.
//!
//! Every output file, in both modes, goes through [`OutputWriter::write`]:
//! run the template into memory, then create the file and write it out. A
//! template failure leaves no file behind.
//!
//! Failures come back as [`PageError`]s for the caller to log and record.
//! Nothing here retries.

use crate::generate::PageError;
use crate::storage::Storage;
use crate::template::{Template, TemplateError};
use crate::types::Page;
use std::io::Write;
use std::path::Path;

pub struct OutputWriter<'a> {
    storage: &'a dyn Storage,
    template: &'a dyn Template,
}

impl<'a> OutputWriter<'a> {
    pub fn new(storage: &'a dyn Storage, template: &'a dyn Template) -> Self {
        Self { storage, template }
    }

    /// Create `dir` and its parents. An existing directory is success.
    pub fn ensure_dir(&self, dir: &Path) -> Result<(), PageError> {
        self.storage
            .create_dir_all(dir)
            .map_err(|source| PageError::Directory {
                path: dir.to_path_buf(),
                source,
            })
    }

    /// Render `page` into `path`. The parent directory must already exist.
    pub fn write(&self, path: &Path, page: &Page) -> Result<(), PageError> {
        let render_err = |source: TemplateError| PageError::Render {
            path: path.to_path_buf(),
            source,
        };

        let mut rendered = Vec::new();
        self.template
            .execute(&mut rendered, page)
            .map_err(render_err)?;

        let mut file = self
            .storage
            .create(path)
            .map_err(|source| PageError::Create {
                path: path.to_path_buf(),
                source,
            })?;
        file.write_all(&rendered)
            .and_then(|()| file.flush())
            .map_err(|e| render_err(TemplateError::Io(e)))?;
        Ok(())
    }
}
