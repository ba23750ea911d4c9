//! Print hosts: where a rendered page goes.

use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::ExportError;

/// An open print target holding one document.
pub trait PrintSurface: Send {
    /// Replace the surface content with `document`.
    fn write(&mut self, document: &str) -> Result<(), ExportError>;

    /// Start printing the written document.
    fn print(&mut self) -> Result<(), ExportError>;

    /// Release the surface.
    fn close(self: Box<Self>) -> Result<(), ExportError>;
}

/// Opens print surfaces.
pub trait PrintHost: Send + Sync {
    /// Open a surface for the document that will be saved as `filename`.
    ///
    /// Returns [`ExportError::PopupBlocked`] when no surface can be opened.
    fn open_surface(&self, filename: &str) -> Result<Box<dyn PrintSurface>, ExportError>;
}

impl<H: PrintHost + ?Sized> PrintHost for &H {
    fn open_surface(&self, filename: &str) -> Result<Box<dyn PrintSurface>, ExportError> {
        (**self).open_surface(filename)
    }
}

/// Writes each page as an HTML file in a directory.
///
/// A page suggested as `dive-page-2.pdf` is written to `dive-page-2.html`;
/// printing it to PDF is left to a browser. A missing or read-only
/// directory is reported as [`ExportError::PopupBlocked`].
#[derive(Clone, Debug)]
pub struct FilePrintHost {
    dir: PathBuf,
}

impl FilePrintHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a page suggested as `filename` is written to.
    #[must_use]
    pub fn output_path(&self, filename: &str) -> PathBuf {
        let name = Path::new(filename)
            .file_name()
            .map_or_else(|| PathBuf::from("page"), PathBuf::from);
        self.dir.join(name.with_extension("html"))
    }
}

impl PrintHost for FilePrintHost {
    fn open_surface(&self, filename: &str) -> Result<Box<dyn PrintSurface>, ExportError> {
        let path = self.output_path(filename);
        match File::create(&path) {
            Ok(file) => {
                debug!(path = %path.display(), "print surface opened");
                Ok(Box::new(FilePrintSurface { path, file }))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open print surface");
                Err(ExportError::PopupBlocked)
            }
        }
    }
}

/// A page file opened by [`FilePrintHost`].
#[derive(Debug)]
pub struct FilePrintSurface {
    path: PathBuf,
    file: File,
}

impl FilePrintSurface {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrintSurface for FilePrintSurface {
    fn write(&mut self, document: &str) -> Result<(), ExportError> {
        self.file.set_len(0)?;
        self.file.rewind()?;
        self.file.write_all(document.as_bytes())?;
        Ok(())
    }

    fn print(&mut self) -> Result<(), ExportError> {
        self.file.sync_all()?;
        info!(path = %self.path.display(), "page ready to print");
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), ExportError> {
        let Self { path, file } = *self;
        drop(file);
        // an empty file means nothing was ever written
        if fs::metadata(&path)?.len() == 0 {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
