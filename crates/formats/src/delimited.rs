//! Streaming reader for comma-delimited text files
//!
//! Splits lines on commas while respecting double-quoted spans, so a
//! comma strictly inside a matching quote pair never delimits a field.
//! Quotes are retained in the raw field text because downstream type
//! coercion is quote-sensitive.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Split one line into raw fields with an explicit quote-tracking scan.
///
/// A `"` toggles quoted state; commas inside a quoted span are part of
/// the field. Surrounding quotes stay in the output.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Configuration for the delimited reader
#[derive(Debug, Clone)]
pub struct DelimitedConfig {
    /// Whether the first line is a header row
    pub has_headers: bool,
    /// Buffer size for BufReader
    pub buffer_size: usize,
}

impl Default for DelimitedConfig {
    fn default() -> Self {
        Self {
            has_headers: true,
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }
}

/// One raw row: the stripped line text plus its split fields
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Physical line number in the source file (1-based)
    pub line_number: usize,
    /// The stripped line text, used for noise filtering
    pub raw: String,
    /// Quote-aware split fields, quotes retained
    pub fields: Vec<String>,
}

/// Streaming delimited-text reader that processes files line-by-line
pub struct DelimitedReader<R: Read> {
    reader: BufReader<R>,
    headers: Option<Vec<String>>,
    line_number: usize,
    rows_read: usize,
    bytes_read: u64,
    total_bytes: Option<u64>,
}

impl DelimitedReader<File> {
    /// Open a delimited text file with default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, DelimitedConfig::default())
    }

    /// Open a delimited text file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: DelimitedConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let total_bytes = file.metadata()?.len();

        debug!("Opening delimited file: {:?}", path);
        Self::new_with_config(file, config, Some(total_bytes))
    }
}

impl<R: Read> DelimitedReader<R> {
    /// Create a reader from any Read source with default configuration
    pub fn new(reader: R) -> Result<Self> {
        Self::new_with_config(reader, DelimitedConfig::default(), None)
    }

    /// Create a reader from any Read source.
    ///
    /// When `config.has_headers` is set, the header line is consumed
    /// immediately; a file with no lines at all is an error in that
    /// mode.
    pub fn new_with_config(
        reader: R,
        config: DelimitedConfig,
        total_bytes: Option<u64>,
    ) -> Result<Self> {
        let mut buf_reader = BufReader::with_capacity(config.buffer_size, reader);
        let mut headers = None;
        let mut line_number = 0;
        let mut bytes_read = 0u64;

        if config.has_headers {
            let mut line = String::new();
            let n = buf_reader.read_line(&mut line)?;
            if n == 0 {
                return Err(Error::MissingHeader(
                    "file is empty but headers were expected".to_string(),
                ));
            }
            bytes_read += n as u64;
            line_number += 1;
            // Header tokens never contain quoted commas; a plain split
            // is sufficient here.
            headers = Some(
                line.trim()
                    .split(',')
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>(),
            );
        }

        Ok(Self {
            reader: buf_reader,
            headers,
            line_number,
            rows_read: 0,
            bytes_read,
            total_bytes,
        })
    }

    /// Raw header tokens, if the file declared headers
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Number of data rows yielded so far (blank lines excluded)
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Number of bytes read so far
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    /// Total file size if known
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }
}

impl<R: Read> Iterator for DelimitedReader<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(n) => {
                    self.bytes_read += n as u64;
                    self.line_number += 1;

                    let stripped = line.trim();
                    if stripped.is_empty() {
                        continue;
                    }

                    self.rows_read += 1;
                    return Some(Ok(RawRow {
                        line_number: self.line_number,
                        raw: stripped.to_string(),
                        fields: split_fields(stripped),
                    }));
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}
