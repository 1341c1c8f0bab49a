//! Gzip-compressed JSON-lines reader.
//!
//! Every call to [`DatasetResource::open`] starts a fresh stream from the
//! beginning of the file. Nothing seeks or resumes mid-stream.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use super::error::DatasetError;

/// Name of the bundled station boards dataset.
pub const DEFAULT_DATASET: &str = "data/cff-stop-2016-02-29__.jsonl.gz";

/// A read-only, gzip-compressed, line-delimited dataset on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetResource {
    path: PathBuf,
}

impl DatasetResource {
    /// Create a resource for the given path. The file is not touched until opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check the dataset file is present.
    pub fn locate(&self) -> Result<(), DatasetError> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(DatasetError::NotFound(self.path.clone()))
        }
    }

    /// Open a fresh line stream from the start of the file.
    ///
    /// Blocking: call from a worker thread.
    pub fn open(&self) -> Result<GzLines<File>, DatasetError> {
        self.locate()?;
        let file = File::open(&self.path).map_err(|source| DatasetError::Open {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Opened dataset");
        Ok(GzLines::new(file))
    }
}

impl Default for DatasetResource {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET)
    }
}

/// Lazy sequence of UTF-8 lines decompressed from a gzip stream.
///
/// Concatenated gzip members are read through to the end. The first decode
/// error is yielded once and the sequence then ends.
pub struct GzLines<R: Read> {
    lines: std::io::Lines<BufReader<MultiGzDecoder<R>>>,
    failed: bool,
}

impl<R: Read> GzLines<R> {
    /// Wrap a compressed byte source.
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(MultiGzDecoder::new(reader)).lines(),
            failed: false,
        }
    }
}

impl<R: Read> Iterator for GzLines<R> {
    type Item = Result<String, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.lines.next()? {
            Ok(line) => Some(Ok(line)),
            Err(e) => {
                self.failed = true;
                Some(Err(DatasetError::Decode(e)))
            }
        }
    }
}
