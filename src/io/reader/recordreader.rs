//! Record-oriented reader.
//!
//! Each input line is an independent JSON object; the reader yields the
//! value of one configured text field per line.
use std::{
    fs::File,
    io::{BufRead, BufReader, Lines, Read},
    path::{Path, PathBuf},
};

use serde_json::Value;

use super::textreader::Quota;
use crate::error::Error;

#[derive(Debug)]
pub struct RecordReader<T> {
    path: PathBuf,
    lines: Lines<BufReader<T>>,
    field: String,
    quota: Quota,
}

impl RecordReader<File> {
    pub fn from_path(
        src: &Path,
        field: &str,
        max_lines: Option<usize>,
        skip_first: usize,
    ) -> Result<Self, Error> {
        let handle = File::open(src).map_err(|e| Error::File(src.to_path_buf(), e))?;
        let mut reader = Self::from_read(handle, field, max_lines, skip_first);
        reader.path = src.to_path_buf();
        Ok(reader)
    }
}

impl<T> RecordReader<T>
where
    T: Read,
{
    pub fn from_read(src: T, field: &str, max_lines: Option<usize>, skip_first: usize) -> Self {
        Self {
            path: PathBuf::new(),
            lines: BufReader::new(src).lines(),
            field: field.to_string(),
            quota: Quota::new(max_lines, skip_first),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl<T> Iterator for RecordReader<T>
where
    T: Read,
{
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.quota.exhausted() {
                return None;
            }
            let line = match self.lines.next()? {
                Err(e) => return Some(Err(Error::Io(e))),
                Ok(line) => line,
            };

            let value: Value = match serde_json::from_str(&line) {
                Err(e) => return Some(Err(Error::Serde(e))),
                Ok(value) => value,
            };
            let text = match value.get(&self.field).and_then(Value::as_str) {
                None => {
                    return Some(Err(Error::MalformedRecord(format!(
                        "missing text field {:?}",
                        self.field
                    ))))
                }
                Some(text) => text.to_string(),
            };

            if self.quota.admit() {
                return Some(Ok(text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn extracts_configured_field() {
        let jsonl = Cursor::new(
            "{\"id\":\"a\",\"en\":\"Hello\",\"ru\":\"Привет\"}
{\"id\":\"b\",\"en\":\"Bye\",\"ru\":\"Пока\"}",
        );
        let read: Vec<String> = RecordReader::from_read(jsonl, "ru", None, 0)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read, vec!["Привет", "Пока"]);
    }

    #[test]
    fn honors_cap_and_skip() {
        let jsonl = Cursor::new(
            "{\"en\":\"one\"}
{\"en\":\"two\"}
{\"en\":\"three\"}",
        );
        let read: Vec<String> = RecordReader::from_read(jsonl, "en", Some(1), 1)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read, vec!["two"]);
    }

    #[test]
    fn missing_field_is_an_error() {
        let jsonl = Cursor::new("{\"en\":\"only english\"}");
        let mut reader = RecordReader::from_read(jsonl, "ru", None, 0);
        assert!(matches!(
            reader.next(),
            Some(Err(Error::MalformedRecord(_)))
        ));
    }

    #[test]
    fn garbage_line_is_an_error() {
        let jsonl = Cursor::new("not json at all");
        let mut reader = RecordReader::from_read(jsonl, "en", None, 0);
        assert!(matches!(reader.next(), Some(Err(Error::Serde(_)))));
    }
}
