/*! Declarative corpus sources.

A [SourceSpec] names a file, its format and the read window; [SourceSpec::open]
builds the matching reader behind a [SourceKind]. Re-opening restarts the read
from the beginning.
!*/
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use super::recordreader::RecordReader;
use super::textreader::{ElementReader, LineReader, TagLineReader};
use crate::error::Error;

/// Raw corpus formats.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceFormat {
    /// Plain text, one sentence per line.
    Plain,
    /// Tag-delimited markup, one tagged segment per line; the payload holds
    /// the element name to keep (`"seg"` for the usual `<seg id="n">` lines).
    TagLines(String),
    /// Markup parsed element by element; the payload lists element names
    /// whose inner text is kept.
    Elements(Vec<String>),
    /// One JSON object per line; the payload names the text field to yield.
    Records(String),
}

/// A corpus file together with its format and read window.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    path: PathBuf,
    format: SourceFormat,
    max_lines: Option<usize>,
    skip_first: usize,
}

impl SourceSpec {
    /// A source reading the whole file.
    pub fn new(path: &Path, format: SourceFormat) -> Self {
        Self::with_limits(path, format, None, 0)
    }

    /// A source with a yield cap and/or leading items to skip.
    pub fn with_limits(
        path: &Path,
        format: SourceFormat,
        max_lines: Option<usize>,
        skip_first: usize,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            format,
            max_lines,
            skip_first,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn format(&self) -> &SourceFormat {
        &self.format
    }

    /// Open the underlying file and build the reader for the format.
    pub fn open(&self) -> Result<SourceKind<File>, Error> {
        let reader = match &self.format {
            SourceFormat::Plain => SourceKind::Plain(LineReader::from_path(
                &self.path,
                self.max_lines,
                self.skip_first,
            )?),
            SourceFormat::TagLines(element) => SourceKind::Tagged(TagLineReader::from_path(
                &self.path,
                element,
                self.max_lines,
                self.skip_first,
            )?),
            SourceFormat::Elements(names) => SourceKind::Elements(ElementReader::from_path(
                &self.path,
                names.clone(),
                self.max_lines,
                self.skip_first,
            )?),
            SourceFormat::Records(field) => SourceKind::Records(RecordReader::from_path(
                &self.path,
                field,
                self.max_lines,
                self.skip_first,
            )?),
        };
        Ok(reader)
    }
}

/// Holds the different kinds of corpus readers.
#[derive(Debug)]
pub enum SourceKind<T>
where
    T: Read,
{
    Plain(LineReader<T>),
    Tagged(TagLineReader<T>),
    Elements(ElementReader<T>),
    Records(RecordReader<T>),
}

impl<T> Iterator for SourceKind<T>
where
    T: Read,
{
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SourceKind::Plain(r) => r.next(),
            SourceKind::Tagged(r) => r.next(),
            SourceKind::Elements(r) => r.next(),
            SourceKind::Records(r) => r.next(),
        }
    }
}
