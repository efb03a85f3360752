/*! Record-oriented writing.

One serialized record per line, in write order. serde_json emits plain
UTF-8, so non-ASCII text lands in the file unescaped.
!*/
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;

pub struct JsonlWriter {
    path: PathBuf,
    handle: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    /// Create (or truncate) the destination file.
    pub fn create(dst: &Path) -> Result<Self, Error> {
        let handle = File::create(dst).map_err(|e| Error::File(dst.to_path_buf(), e))?;
        Ok(Self {
            path: dst.to_path_buf(),
            handle: BufWriter::new(handle),
            written: 0,
        })
    }

    /// Write a batch of records, one line each, in slice order.
    pub fn write<T: Serialize>(&mut self, vals: &[T]) -> Result<(), Error> {
        let mut batch = String::new();
        for val in vals {
            batch += &serde_json::to_string(val)?;
            batch.push('\n');
        }
        self.handle.write_all(batch.as_bytes())?;
        self.written += vals.len();

        Ok(())
    }

    pub fn write_single<T: Serialize>(&mut self, val: &T) -> Result<(), Error> {
        let mut line = serde_json::to_string(val)?;
        line.push('\n');
        self.handle.write_all(line.as_bytes())?;
        self.written += 1;

        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.handle.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: String,
        idx: usize,
    }

    #[test]
    fn one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("out.jsonl");

        let rows = vec![
            Row {
                name: "первый".to_string(),
                idx: 0,
            },
            Row {
                name: "second".to_string(),
                idx: 1,
            },
        ];

        let mut writer = JsonlWriter::create(&dst).unwrap();
        writer.write(&rows).unwrap();
        writer
            .write_single(&Row {
                name: "third".to_string(),
                idx: 2,
            })
            .unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.written(), 3);

        let content = read_to_string(&dst).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "{\"name\":\"первый\",\"idx\":0}");
        // no unicode escaping
        assert!(!content.contains("\\u"));
    }

    #[test]
    fn create_fails_with_path() {
        match JsonlWriter::create(Path::new("no/such/dir/out.jsonl")) {
            Err(Error::File(path, _)) => {
                assert_eq!(path, PathBuf::from("no/such/dir/out.jsonl"))
            }
            _ => panic!("expected a path-carrying error"),
        }
    }
}
