//! Dataset loader: reader, noise filter, dedup, and coercion composed
//!
//! One load pass walks the file's data rows, drops noise rows and
//! duplicate first-column keys, coerces every surviving field through
//! the rule chain, and keys the result by id. The drop counts are
//! reported through [`LoadStats`] and a log line.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use rowcast_filters::{NoiseFilter, NoiseFilterConfig};
use rowcast_formats::{
    Dataset, DelimitedConfig, DelimitedReader, FieldValue, Record, Schema,
};

use crate::coerce::Coercer;
use crate::dedup::KeyDeduplicator;
use crate::{Error, Result};

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Whether the first line is a header row
    pub has_headers: bool,
    /// Column index holding a byte size, coerced to megabytes
    pub size_column: Option<usize>,
    /// Noise filter settings
    pub noise: NoiseFilterConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            has_headers: true,
            size_column: None,
            noise: NoiseFilterConfig::default(),
        }
    }
}

/// Counts from one load pass
///
/// `loaded + duplicates_dropped + filtered` always equals `data_rows`,
/// the number of non-blank lines after the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadStats {
    /// Non-blank data rows seen (header excluded)
    pub data_rows: usize,
    /// Rows excluded as noise
    pub filtered: usize,
    /// Rows dropped for a repeated first-column key
    pub duplicates_dropped: usize,
    /// Records that made it into the dataset
    pub loaded: usize,
}

impl LoadStats {
    /// The row-conservation invariant of a load pass
    pub fn is_conserved(&self) -> bool {
        self.loaded + self.duplicates_dropped + self.filtered == self.data_rows
    }
}

/// A loaded dataset with its load statistics
#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Dataset,
    pub stats: LoadStats,
}

/// Loads delimited text files into typed datasets
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    config: LoaderConfig,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a dataset from a file on disk.
    ///
    /// A missing file is a fatal I/O error; noise rows and duplicate
    /// keys are dropped and counted, never errors.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Loaded> {
        let path = path.as_ref();
        let reader = DelimitedReader::open_with_config(
            path,
            DelimitedConfig {
                has_headers: self.config.has_headers,
                ..Default::default()
            },
        )?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.run(reader, &source)
    }

    /// Load a dataset from any Read source (used heavily in tests)
    pub fn load_from_reader<R: Read>(&self, reader: R, source: &str) -> Result<Loaded> {
        let reader = DelimitedReader::new_with_config(
            reader,
            DelimitedConfig {
                has_headers: self.config.has_headers,
                ..Default::default()
            },
            None,
        )?;
        self.run(reader, source)
    }

    fn run<R: Read>(&self, reader: DelimitedReader<R>, source: &str) -> Result<Loaded> {
        let filter = NoiseFilter::new(self.config.noise.clone())?;
        let coercer = match self.config.size_column {
            Some(col) => Coercer::with_size_column(col),
            None => Coercer::new(),
        };
        let mut dedup = KeyDeduplicator::new();

        let mut schema: Option<Schema> = reader
            .headers()
            .map(|tokens| Schema::from_headers(tokens));

        let mut dataset: Option<Dataset> = None;
        let mut stats = LoadStats::default();
        // Post-filter row index; feeds synthesized ids. Duplicate rows
        // still consume an index.
        let mut row_index: usize = 0;

        for row in reader {
            let row = row?;
            stats.data_rows += 1;

            if !filter.is_accepted(&row.raw) {
                stats.filtered += 1;
                continue;
            }

            // Headerless files take their schema from the first kept row
            let schema = schema
                .get_or_insert_with(|| Schema::positional(row.fields.len()));
            let dataset = dataset.get_or_insert_with(|| Dataset::new(schema.clone()));

            let index = row_index;
            row_index += 1;

            let first_column = row.fields.first().map(String::as_str).unwrap_or("");
            if dedup.is_duplicate(first_column) {
                continue;
            }

            let width = schema.source_width();
            if row.fields.len() < width {
                return Err(Error::RaggedRow {
                    line: row.line_number,
                    expected: width,
                    got: row.fields.len(),
                });
            }
            if row.fields.len() > width {
                debug!(
                    "line {}: ignoring {} extra trailing fields",
                    row.line_number,
                    row.fields.len() - width
                );
            }

            let mut values = Vec::with_capacity(schema.len());
            for (column, raw) in row.fields.iter().take(width).enumerate() {
                values.push(coercer.coerce(raw, column));
            }
            if schema.has_synthesized_id() {
                values.push(
                    coercer.coerce_value(FieldValue::Int(index as i64), schema.id_index()),
                );
            }

            let id = values[schema.id_index()].clone();
            dataset.insert(id, Record::new(values));
            stats.loaded += 1;
        }

        stats.duplicates_dropped = dedup.stats().duplicates_dropped;
        info!(
            "Removed {} duplicate rows from {}",
            stats.duplicates_dropped, source
        );

        let dataset = match (dataset, schema) {
            (Some(ds), _) => ds,
            (None, Some(schema)) => Dataset::new(schema),
            // Headerless and empty: nothing to infer a schema from
            (None, None) => Dataset::new(Schema::positional(0)),
        };

        Ok(Loaded { dataset, stats })
    }
}
