//! Filesystem access used while rendering.
//!
//! The pipeline never calls `std::fs` directly for page I/O; it goes through
//! a [`Storage`] handed to the [`Generator`](crate::generate::Generator) at
//! construction time. Production uses [`LocalStorage`]; tests swap in doubles
//! that fail on chosen paths.
//!
//! Implementations are shared by every render worker, hence `Sync`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub trait Storage: Send + Sync {
    /// Read a whole source file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate an output file.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Create a directory and its parents. An existing directory is success.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(fs::File::create(path)?))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
