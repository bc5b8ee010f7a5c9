//! Delimited text formats for dataset loading
//!
//! This crate provides the typed value/record/schema representation and
//! a streaming, quote-aware reader for comma-delimited text files.

pub mod dataset;
pub mod delimited;
pub mod error;
pub mod record;
pub mod value;

pub use dataset::Dataset;
pub use delimited::{split_fields, DelimitedConfig, DelimitedReader, RawRow};
pub use error::{Error, Result};
pub use record::{Record, Schema};
pub use value::FieldValue;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
