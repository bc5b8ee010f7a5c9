//! Read-through dataset cache
//!
//! A parsed dataset is persisted as a bincode blob next to its source
//! file, with the extension swapped for `.bin`. On the next run the
//! blob is deserialized instead of re-parsing. The cache is never
//! invalidated: a stale blob wins until it is deleted by hand.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use rowcast_core::loader::{DatasetLoader, LoadStats, Loaded};
use rowcast_formats::Dataset;

/// Extension of the serialized blob
pub const CACHE_EXTENSION: &str = "bin";

/// Cache path convention: the input path with its extension swapped
pub fn cache_path(input: &Path) -> PathBuf {
    input.with_extension(CACHE_EXTENSION)
}

/// Deserialize a cached dataset blob
pub fn read_cache(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open cache file: {}", path.display()))?;
    bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Failed to decode cache file: {}", path.display()))
}

/// Serialize a dataset to a cache blob
pub fn write_cache(path: &Path, dataset: &Dataset) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create cache file: {}", path.display()))?;
    bincode::serialize_into(BufWriter::new(file), dataset)
        .with_context(|| format!("Failed to encode cache file: {}", path.display()))
}

/// Load a dataset through the cache.
///
/// On a hit the blob is returned directly (no load statistics exist in
/// that case); on a miss the loader runs and its result is persisted
/// for next time.
pub fn load_or_parse(
    input: &Path,
    loader: &DatasetLoader,
    use_cache: bool,
) -> Result<(Dataset, Option<LoadStats>)> {
    let cache = cache_path(input);

    if use_cache && cache.exists() {
        info!("Fetching {}", cache.display());
        let dataset = read_cache(&cache)?;
        return Ok((dataset, None));
    }

    info!("No cache found, generating from {}", input.display());
    let Loaded { dataset, stats } = loader
        .load(input)
        .with_context(|| format!("Failed to load dataset: {}", input.display()))?;

    if use_cache {
        write_cache(&cache, &dataset)?;
        info!("Serialized dataset to {}", cache.display());
    }

    Ok((dataset, Some(stats)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
App,Rating,Installs
Facebook,4.1,\"1,000,000+\"
Spotify,4.6,\"500,000+\"
";

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("apps.csv");
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_cache_path_extension_substitution() {
        assert_eq!(
            cache_path(Path::new("/data/apps.csv")),
            PathBuf::from("/data/apps.bin")
        );
    }

    #[test]
    fn test_round_trip_equals_original() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let loader = DatasetLoader::new();

        let loaded = loader.load(&input).unwrap();
        let blob = dir.path().join("apps.bin");
        write_cache(&blob, &loaded.dataset).unwrap();
        let restored = read_cache(&blob).unwrap();

        assert_eq!(restored, loaded.dataset);
    }

    #[test]
    fn test_read_through_populates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let loader = DatasetLoader::new();

        // First call misses and persists
        let (first, stats) = load_or_parse(&input, &loader, true).unwrap();
        assert!(stats.is_some());
        assert!(cache_path(&input).exists());

        // Second call hits; no load stats this time
        let (second, stats) = load_or_parse(&input, &loader, true).unwrap();
        assert!(stats.is_none());
        assert_eq!(first, second);
    }

    #[test]
    fn test_stale_cache_is_never_refreshed() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let loader = DatasetLoader::new();

        let (first, _) = load_or_parse(&input, &loader, true).unwrap();

        // Rewrite the source; the cached blob still wins
        let mut file = File::create(&input).unwrap();
        write!(file, "App,Rating\nChanged,1.0\n").unwrap();

        let (second, stats) = load_or_parse(&input, &loader, true).unwrap();
        assert!(stats.is_none());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_cache_bypasses_blob() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let loader = DatasetLoader::new();

        let (_, stats) = load_or_parse(&input, &loader, false).unwrap();
        assert!(stats.is_some());
        assert!(!cache_path(&input).exists());
    }
}
