//! Row-level noise filters for dataset cleaning
//!
//! This crate decides which raw rows are unparseable noise and should
//! be silently excluded before any parsing happens.

pub mod error;
pub mod noise;

pub use error::{Error, Result};
pub use noise::{NoiseFilter, NoiseFilterConfig, NoiseStats, RejectReason};

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
