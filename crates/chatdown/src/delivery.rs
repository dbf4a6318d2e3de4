//! Delivery of finished exports.
//!
//! A [`FallbackDelivery`] pairs a preferred sink (the clipboard in a browser)
//! with a fallback (saving a file) and reports which one took the document.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::export::ExportDocument;

/// Errors raised by a delivery sink
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{sink} unavailable: {message}")]
    Unavailable { sink: String, message: String },
}

/// Somewhere a finished document can be sent
pub trait Delivery {
    /// Short name reported back to the user
    fn name(&self) -> &str;

    fn deliver(&mut self, content: &str, filename: &str) -> Result<(), DeliveryError>;
}

/// Which path delivered the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Primary(String),
    Fallback(String),
}

/// Saves each document as `dir/filename`
#[derive(Debug, Clone)]
pub struct FileDelivery {
    dir: PathBuf,
}

impl FileDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Delivery for FileDelivery {
    fn name(&self) -> &str {
        "file"
    }

    fn deliver(&mut self, content: &str, filename: &str) -> Result<(), DeliveryError> {
        let path = self.dir.join(filename);
        fs::write(&path, content).map_err(|source| DeliveryError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Export saved");
        Ok(())
    }
}

/// Writes the content to any writer, ignoring the file name
#[derive(Debug)]
pub struct WriterDelivery<W> {
    name: String,
    writer: W,
}

impl<W: Write> WriterDelivery<W> {
    pub fn new(name: &str, writer: W) -> Self {
        Self {
            name: name.to_string(),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Delivery for WriterDelivery<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&mut self, content: &str, _filename: &str) -> Result<(), DeliveryError> {
        self.writer
            .write_all(content.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| DeliveryError::Unavailable {
                sink: self.name.clone(),
                message: e.to_string(),
            })
    }
}

/// Try `primary`, and on failure hand the document to `fallback`
#[derive(Debug)]
pub struct FallbackDelivery<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Delivery, F: Delivery> FallbackDelivery<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Deliver `content`, reporting which sink accepted it.
    ///
    /// # Errors
    /// Returns the fallback's error when both sinks fail.
    pub fn deliver(&mut self, content: &str, filename: &str) -> Result<Delivered, DeliveryError> {
        match self.primary.deliver(content, filename) {
            Ok(()) => Ok(Delivered::Primary(self.primary.name().to_string())),
            Err(error) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    %error,
                    "Primary delivery failed, falling back"
                );
                self.fallback.deliver(content, filename)?;
                Ok(Delivered::Fallback(self.fallback.name().to_string()))
            }
        }
    }

    pub fn deliver_document(&mut self, document: &ExportDocument) -> Result<Delivered, DeliveryError> {
        self.deliver(&document.content, &document.filename)
    }

    pub fn into_parts(self) -> (P, F) {
        (self.primary, self.fallback)
    }
}
