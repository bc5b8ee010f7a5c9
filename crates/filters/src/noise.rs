//! Noise-row detection for delimited datasets
//!
//! Two classes of row are treated as unparseable noise and excluded
//! from datasets: rows containing CJK-range characters, and rows
//! containing a literal placeholder marker such as "Varies with
//! device". Excluded rows are counted but never surfaced as errors.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default placeholder marker excluded from datasets
pub const DEFAULT_MARKER: &str = "Varies with device";

/// CJK rejection range: U+31C0 through U+9FFF inclusive
const CJK_RANGE: (char, char) = ('\u{31C0}', '\u{9FFF}');

/// Noise filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseFilterConfig {
    /// Reject rows containing any character in the CJK range
    pub reject_cjk: bool,
    /// Literal substrings that mark a row as noise
    pub markers: Vec<String>,
}

impl Default for NoiseFilterConfig {
    fn default() -> Self {
        Self {
            reject_cjk: true,
            markers: vec![DEFAULT_MARKER.to_string()],
        }
    }
}

impl NoiseFilterConfig {
    /// A filter that rejects nothing (CJK check off, no markers)
    pub fn permissive() -> Self {
        Self {
            reject_cjk: false,
            markers: Vec::new(),
        }
    }
}

/// Why a row was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Row contains a character in the CJK range
    CjkCharacter,
    /// Row contains a configured marker substring
    Marker,
}

/// Rejects raw rows that cannot be meaningfully parsed
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    config: NoiseFilterConfig,
}

impl NoiseFilter {
    pub fn new(config: NoiseFilterConfig) -> Result<Self> {
        if config.markers.iter().any(|m| m.is_empty()) {
            return Err(Error::InvalidConfig(
                "noise markers must be non-empty strings".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Build the default filter (CJK range + "Varies with device")
    pub fn standard() -> Self {
        Self {
            config: NoiseFilterConfig::default(),
        }
    }

    /// Check a raw row, returning the rejection reason if it is noise
    pub fn check(&self, raw: &str) -> Option<RejectReason> {
        if self.config.reject_cjk && raw.chars().any(|c| (CJK_RANGE.0..=CJK_RANGE.1).contains(&c))
        {
            return Some(RejectReason::CjkCharacter);
        }
        if self.config.markers.iter().any(|m| raw.contains(m.as_str())) {
            return Some(RejectReason::Marker);
        }
        None
    }

    /// Whether a raw row should be kept
    pub fn is_accepted(&self, raw: &str) -> bool {
        self.check(raw).is_none()
    }

    /// Gather statistics over a batch of raw rows
    pub fn batch_stats<S: AsRef<str>>(&self, rows: &[S]) -> NoiseStats {
        let mut stats = NoiseStats::default();
        for row in rows {
            stats.total += 1;
            match self.check(row.as_ref()) {
                None => stats.accepted += 1,
                Some(RejectReason::CjkCharacter) => stats.cjk_rejected += 1,
                Some(RejectReason::Marker) => stats.marker_rejected += 1,
            }
        }
        stats
    }
}

/// Statistics about noise filtering
#[derive(Debug, Clone, Default)]
pub struct NoiseStats {
    pub total: usize,
    pub accepted: usize,
    pub cjk_rejected: usize,
    pub marker_rejected: usize,
}

impl NoiseStats {
    /// Total rejected rows
    pub fn rejected(&self) -> usize {
        self.cjk_rejected + self.marker_rejected
    }

    /// Rejection rate as a percentage
    pub fn rejection_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.rejected() as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_rows() {
        let filter = NoiseFilter::standard();
        assert!(filter.is_accepted("Facebook,SOCIAL,4.1"));
        assert!(filter.is_accepted(r#""Smith, John",42"#));
    }

    #[test]
    fn test_rejects_cjk_rows() {
        let filter = NoiseFilter::standard();
        assert_eq!(
            filter.check("爱奇艺PPS -《欢乐颂2》电视剧热播,3.5"),
            Some(RejectReason::CjkCharacter)
        );
        // Katakana (U+30A0 block) sits below the range and is kept
        assert!(filter.is_accepted("アプリ,1.0"));
    }

    #[test]
    fn test_range_boundaries() {
        let filter = NoiseFilter::standard();
        assert!(!filter.is_accepted("\u{31C0}"));
        assert!(!filter.is_accepted("\u{9FFF}"));
        assert!(filter.is_accepted("\u{31BF}"));
        assert!(filter.is_accepted("\u{A000}"));
    }

    #[test]
    fn test_rejects_marker_rows() {
        let filter = NoiseFilter::standard();
        assert_eq!(
            filter.check("Some App,TOOLS,Varies with device,100+"),
            Some(RejectReason::Marker)
        );
    }

    #[test]
    fn test_custom_markers() {
        let filter = NoiseFilter::new(NoiseFilterConfig {
            reject_cjk: false,
            markers: vec!["N/A".to_string()],
        })
        .unwrap();
        assert!(!filter.is_accepted("x,N/A,y"));
        assert!(filter.is_accepted("Varies with device"));
    }

    #[test]
    fn test_empty_marker_rejected_in_config() {
        let result = NoiseFilter::new(NoiseFilterConfig {
            reject_cjk: true,
            markers: vec![String::new()],
        });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_permissive_config() {
        let filter = NoiseFilter::new(NoiseFilterConfig::permissive()).unwrap();
        assert!(filter.is_accepted("电视剧,Varies with device"));
    }

    #[test]
    fn test_batch_stats() {
        let filter = NoiseFilter::standard();
        let rows = [
            "Facebook,SOCIAL,4.1",
            "爱奇艺,3.5",
            "Some App,Varies with device",
            "Spotify,MUSIC,4.6",
        ];
        let stats = filter.batch_stats(&rows);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.cjk_rejected, 1);
        assert_eq!(stats.marker_rejected, 1);
        assert_eq!(stats.rejected(), 2);
        assert!((stats.rejection_rate() - 50.0).abs() < f64::EPSILON);
    }
}
