//! Core loading logic for delimited datasets
//!
//! This crate provides the ordered type-coercion rule chain, key-based
//! deduplication, the dataset loader composing reader, filter, dedup,
//! and coercion, and summary operations over loaded datasets.

pub mod coerce;
pub mod dedup;
pub mod error;
pub mod loader;
pub mod summary;

pub use coerce::{Coercer, Rule, RULE_ORDER};
pub use dedup::{DedupStats, KeyDeduplicator};
pub use error::{Error, Result};
pub use loader::{DatasetLoader, LoadStats, Loaded, LoaderConfig};

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
