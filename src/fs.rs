//! Filesystem handle used by commands that persist local state.

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::io;
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;

/// Raw file I/O, either on disk or in memory.
pub trait FsBackend {
    fn exists(&self, path: &Path) -> io::Result<bool>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Creates or truncates `path`. Parent directories must already exist.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

pub struct OsBackend;

impl FsBackend for OsBackend {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// In-memory backend for tests. `RefCell` is enough since the CLI is single-threaded.
#[cfg(test)]
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<Vec<PathBuf>>,
}

#[cfg(test)]
impl MemBackend {
    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty()
            || path.parent().is_none()
            || self.dirs.borrow().iter().any(|d| d == path)
    }
}

#[cfg(test)]
impl FsBackend for MemBackend {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.files.borrow().contains_key(path) || self.dirs.borrow().iter().any(|d| d == path))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.dirs.borrow().iter().any(|d| d == path) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is a directory", path.display()),
            ));
        }
        match path.parent() {
            Some(parent) if !self.is_dir(parent) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", parent.display()),
            )),
            _ => {
                self.files
                    .borrow_mut()
                    .insert(path.to_path_buf(), contents.to_vec());
                Ok(())
            }
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        for dir in path.ancestors() {
            if self.files.borrow().contains_key(dir) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} is a file", dir.display()),
                ));
            }
        }
        let mut dirs = self.dirs.borrow_mut();
        for dir in path.ancestors() {
            if !dir.as_os_str().is_empty() && !dirs.iter().any(|d| d == dir) {
                dirs.push(dir.to_path_buf());
            }
        }
        Ok(())
    }
}

pub struct Fs {
    backend: Box<dyn FsBackend>,
}

impl Fs {
    pub fn new(backend: impl FsBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn os() -> Self {
        Self::new(OsBackend)
    }

    #[cfg(test)]
    pub fn memory() -> Self {
        Self::new(MemBackend::default())
    }

    pub fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.backend.exists(path)?)
    }

    pub fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(self.backend.read(path)?)
    }

    /// Serialize `content` as YAML into `path`, creating missing parent
    /// directories. An existing file is overwritten.
    pub fn write_yaml_file<T: Serialize>(&self, path: &Path, content: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.backend.create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(content)?;
        self.backend.write(path, yaml.as_bytes())?;
        Ok(())
    }
}
