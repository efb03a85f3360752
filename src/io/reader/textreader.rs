/*! Text reading facilities

Readers implement [Iterator] and yield one sentence per item.

Three kinds of text readers cover the raw corpus formats:

- [LineReader] : plain text, one sentence per line.
- [TagLineReader] : tag-delimited markup with one tagged segment per line.
- [ElementReader] : markup parsed element-by-element, elements may span lines.

All of them share the same cap/skip contract through [Quota]: `skip_first`
suppresses the first N eligible items, `max_lines` then caps the yield at
exactly N items. A reader is restarted by re-opening, not by rewinding.
!*/
use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, Lines, Read},
    path::{Path, PathBuf},
};

use log::warn;

use crate::error::Error;

/// Skip/cap accounting shared by the corpus readers.
#[derive(Debug, Clone)]
pub struct Quota {
    skip: usize,
    cap: Option<usize>,
    skipped: usize,
    yielded: usize,
}

impl Quota {
    pub fn new(max_lines: Option<usize>, skip_first: usize) -> Self {
        Self {
            skip: skip_first,
            cap: max_lines,
            skipped: 0,
            yielded: 0,
        }
    }

    /// `true` once the cap is reached. Readers stop iterating then,
    /// so a cap of N yields exactly N items.
    pub fn exhausted(&self) -> bool {
        matches!(self.cap, Some(cap) if self.yielded >= cap)
    }

    /// Account for one eligible item.
    /// Returns `false` while the skip allowance is being consumed.
    pub fn admit(&mut self) -> bool {
        if self.skipped < self.skip {
            self.skipped += 1;
            return false;
        }
        self.yielded += 1;
        true
    }
}

/// Reader for plain text, one sentence per line.
/// Trailing newlines are stripped, nothing else is normalized.
#[derive(Debug)]
pub struct LineReader<T> {
    path: PathBuf,
    lines: Lines<BufReader<T>>,
    quota: Quota,
}

impl LineReader<File> {
    pub fn from_path(src: &Path, max_lines: Option<usize>, skip_first: usize) -> Result<Self, Error> {
        let handle = File::open(src).map_err(|e| Error::File(src.to_path_buf(), e))?;
        let mut reader = Self::from_read(handle, max_lines, skip_first);
        reader.path = src.to_path_buf();
        Ok(reader)
    }
}

impl<T> LineReader<T>
where
    T: Read,
{
    pub fn from_read(src: T, max_lines: Option<usize>, skip_first: usize) -> Self {
        Self {
            path: PathBuf::new(),
            lines: BufReader::new(src).lines(),
            quota: Quota::new(max_lines, skip_first),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl<T> Iterator for LineReader<T>
where
    T: Read,
{
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.quota.exhausted() {
                return None;
            }
            match self.lines.next()? {
                Err(e) => return Some(Err(Error::Io(e))),
                Ok(line) => {
                    if self.quota.admit() {
                        return Some(Ok(line));
                    }
                }
            }
        }
    }
}

/// Reader for tag-delimited markup holding one tagged segment per line,
/// as in translation task references:
///
/// ```text
/// <seg id="1">Hello world</seg>
/// ```
///
/// Lines not opening with the configured element are skipped. Markup is
/// stripped from kept lines and the text is trimmed; a line whose markup
/// never closes is dropped with a warning.
#[derive(Debug)]
pub struct TagLineReader<T> {
    path: PathBuf,
    lines: Lines<BufReader<T>>,
    element: String,
    quota: Quota,
}

impl TagLineReader<File> {
    pub fn from_path(
        src: &Path,
        element: &str,
        max_lines: Option<usize>,
        skip_first: usize,
    ) -> Result<Self, Error> {
        let handle = File::open(src).map_err(|e| Error::File(src.to_path_buf(), e))?;
        let mut reader = Self::from_read(handle, element, max_lines, skip_first);
        reader.path = src.to_path_buf();
        Ok(reader)
    }
}

impl<T> TagLineReader<T>
where
    T: Read,
{
    pub fn from_read(src: T, element: &str, max_lines: Option<usize>, skip_first: usize) -> Self {
        Self {
            path: PathBuf::new(),
            lines: BufReader::new(src).lines(),
            element: element.to_string(),
            quota: Quota::new(max_lines, skip_first),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl<T> Iterator for TagLineReader<T>
where
    T: Read,
{
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.quota.exhausted() {
                return None;
            }
            match self.lines.next()? {
                Err(e) => return Some(Err(Error::Io(e))),
                Ok(line) => {
                    if !opens_element(&line, &self.element) {
                        continue;
                    }
                    match strip_markup(&line) {
                        None => {
                            warn!("dropping line with unclosed markup in {:?}", self.path);
                            continue;
                        }
                        Some(text) => {
                            if self.quota.admit() {
                                return Some(Ok(text.trim().to_string()));
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Reader for markup where elements may span several lines: yields the
/// inner text of every element whose name belongs to the configured set,
/// inner lines joined with a newline and residual markup stripped.
///
/// At most one element is taken per opening line; nested elements of the
/// same name are not supported (the first closing tag wins).
#[derive(Debug)]
pub struct ElementReader<T> {
    path: PathBuf,
    lines: Lines<BufReader<T>>,
    elements: HashSet<String>,
    quota: Quota,
}

impl ElementReader<File> {
    pub fn from_path(
        src: &Path,
        elements: Vec<String>,
        max_lines: Option<usize>,
        skip_first: usize,
    ) -> Result<Self, Error> {
        let handle = File::open(src).map_err(|e| Error::File(src.to_path_buf(), e))?;
        let mut reader = Self::from_read(handle, elements, max_lines, skip_first);
        reader.path = src.to_path_buf();
        Ok(reader)
    }
}

impl<T> ElementReader<T>
where
    T: Read,
{
    pub fn from_read(
        src: T,
        elements: Vec<String>,
        max_lines: Option<usize>,
        skip_first: usize,
    ) -> Self {
        Self {
            path: PathBuf::new(),
            lines: BufReader::new(src).lines(),
            elements: elements.into_iter().collect(),
            quota: Quota::new(max_lines, skip_first),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// First opening tag on the line whose name is in the element set.
    /// Returns the name and the line remainder after the opening tag.
    /// Self-closing tags are passed over, they carry no text.
    fn find_open<'a>(&self, line: &'a str) -> Option<(String, &'a str)> {
        let mut pos = 0;
        while let Some(offset) = line[pos..].find('<') {
            let start = pos + offset + 1;
            let rest = &line[start..];
            let name_end =
                match rest.find(|c: char| c == '>' || c == '/' || c.is_whitespace()) {
                    None => return None,
                    Some(end) => end,
                };
            let name = &rest[..name_end];
            if self.elements.contains(name) {
                match rest.find('>') {
                    None => return None,
                    Some(gt) if rest[..gt].ends_with('/') => {}
                    Some(gt) => return Some((name.to_string(), &rest[gt + 1..])),
                }
            }
            pos = start;
        }
        None
    }
}

impl<T> Iterator for ElementReader<T>
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

            let (name, after_open) = match self.find_open(&line) {
                None => continue,
                Some(open) => open,
            };
            let close = format!("</{}>", name);

            let content = match after_open.find(&close) {
                Some(idx) => after_open[..idx].to_string(),
                None => {
                    // element spans lines, gather until the closing tag
                    let mut parts = vec![after_open.to_string()];
                    loop {
                        match self.lines.next() {
                            None => {
                                warn!(
                                    "unclosed <{}> element at end of input in {:?}",
                                    name, self.path
                                );
                                return None;
                            }
                            Some(Err(e)) => return Some(Err(Error::Io(e))),
                            Some(Ok(next_line)) => match next_line.find(&close) {
                                Some(idx) => {
                                    parts.push(next_line[..idx].to_string());
                                    break;
                                }
                                None => parts.push(next_line),
                            },
                        }
                    }
                    parts.join("\n")
                }
            };

            match strip_markup(&content) {
                None => {
                    warn!("dropping <{}> element with unclosed markup in {:?}", name, self.path);
                    continue;
                }
                Some(text) => {
                    if self.quota.admit() {
                        return Some(Ok(text.trim().to_string()));
                    }
                }
            }
        }
    }
}

/// `true` when the line (leading whitespace aside) opens the given element.
fn opens_element(line: &str, element: &str) -> bool {
    match line
        .trim_start()
        .strip_prefix('<')
        .and_then(|rest| rest.strip_prefix(element))
    {
        Some(rest) => matches!(
            rest.chars().next(),
            Some(c) if c == '>' || c == '/' || c.is_whitespace()
        ),
        None => false,
    }
}

/// Removes `<...>` runs from a line.
/// Returns `None` when a `<` is never closed.
fn strip_markup(line: &str) -> Option<String> {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '<' {
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == '>' {
                    closed = true;
                    break;
                }
            }
            if !closed {
                return None;
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}
