/*! Persisted pair corpus reader.

Re-reads corpora produced by the cleaning pipeline: one JSON object per
line carrying `id` plus one text field per side label. Yields restored
[PairRecord]s with their original identifiers.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use serde_json::Value;

use super::textreader::Quota;
use crate::error::Error;
use crate::pipelines::bitext::types::PairRecord;

#[derive(Debug)]
pub struct Reader<T>
where
    T: Read,
{
    lines: Lines<BufReader<T>>,
    source_label: String,
    target_label: String,
    quota: Quota,
}

pub type PairReader = Reader<File>;

impl PairReader {
    pub fn from_path(
        src: &Path,
        source_label: &str,
        target_label: &str,
        max_lines: Option<usize>,
        skip_first: usize,
    ) -> Result<Self, Error> {
        let handle = File::open(src).map_err(|e| Error::File(src.to_path_buf(), e))?;
        Ok(Self::from_read(
            handle,
            source_label,
            target_label,
            max_lines,
            skip_first,
        ))
    }
}

impl<T> Reader<T>
where
    T: Read,
{
    pub fn from_read(
        src: T,
        source_label: &str,
        target_label: &str,
        max_lines: Option<usize>,
        skip_first: usize,
    ) -> Self {
        Self {
            lines: BufReader::new(src).lines(),
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            quota: Quota::new(max_lines, skip_first),
        }
    }

    fn parse_line(&self, line: &str) -> Result<PairRecord, Error> {
        let value: Value = serde_json::from_str(line)?;
        let id = field_str(&value, "id")?;
        let source = field_str(&value, &self.source_label)?;
        let target = field_str(&value, &self.target_label)?;
        Ok(PairRecord::restored(
            id,
            &self.source_label,
            &self.target_label,
            source,
            target,
        ))
    }
}

fn field_str(value: &Value, field: &str) -> Result<String, Error> {
    match value.get(field).and_then(Value::as_str) {
        None => Err(Error::MalformedRecord(format!(
            "missing field {:?} in pair record",
            field
        ))),
        Some(text) => Ok(text.to_string()),
    }
}

impl<T> Iterator for Reader<T>
where
    T: Read,
{
    type Item = Result<PairRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.quota.exhausted() {
                return None;
            }
            let line = match self.lines.next()? {
                Err(e) => return Some(Err(Error::Io(e))),
                Ok(line) => line,
            };
            let record = match self.parse_line(&line) {
                Err(e) => return Some(Err(e)),
                Ok(record) => record,
            };
            if self.quota.admit() {
                return Some(Ok(record));
            }
        }
    }
}
