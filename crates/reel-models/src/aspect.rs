//! Aspect-ratio classification for storage partitioning.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::video::StreamDescriptor;

/// Target ratio for the 16:9 family.
const LANDSCAPE_RATIO: f64 = 1.778;

/// Target ratio for the 9:16 family.
const PORTRAIT_RATIO: f64 = 0.563;

/// Classification tolerance band. Rough bucketing is deliberate: the
/// class only partitions storage keys, it never drives transcoding.
const TOLERANCE: f64 = 0.05;

/// Coarse bucketing of a video's width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectClass {
    /// 16:9 family
    Landscape,
    /// 9:16 family
    Portrait,
    /// Everything else
    Other,
}

impl AspectClass {
    /// Classify a stream's geometry.
    ///
    /// Pure function of (width, height). Callers guarantee a positive
    /// height; the prober rejects dimensionless streams before this
    /// ever runs.
    pub fn classify(width: u32, height: u32) -> Self {
        let ratio = f64::from(width) / f64::from(height);

        if (ratio - LANDSCAPE_RATIO).abs() < TOLERANCE {
            AspectClass::Landscape
        } else if (ratio - PORTRAIT_RATIO).abs() < TOLERANCE {
            AspectClass::Portrait
        } else {
            AspectClass::Other
        }
    }

    /// Storage key prefix for this class.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape/",
            AspectClass::Portrait => "portrait/",
            AspectClass::Other => "other/",
        }
    }
}

impl From<StreamDescriptor> for AspectClass {
    fn from(desc: StreamDescriptor) -> Self {
        Self::classify(desc.width, desc.height)
    }
}

impl fmt::Display for AspectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_resolutions() {
        assert_eq!(AspectClass::classify(1920, 1080), AspectClass::Landscape);
        assert_eq!(AspectClass::classify(1280, 720), AspectClass::Landscape);
        assert_eq!(AspectClass::classify(1080, 1920), AspectClass::Portrait);
        assert_eq!(AspectClass::classify(720, 1280), AspectClass::Portrait);
        assert_eq!(AspectClass::classify(1000, 1000), AspectClass::Other);
        assert_eq!(AspectClass::classify(640, 480), AspectClass::Other);
    }

    #[test]
    fn landscape_tolerance_band_boundaries() {
        // ratio = 1.778 exactly: well inside the band
        assert_eq!(AspectClass::classify(1778, 1000), AspectClass::Landscape);
        // ratio = 1.820: inside |1.820 - 1.778| = 0.042 < 0.05
        assert_eq!(AspectClass::classify(1820, 1000), AspectClass::Landscape);
        // ratio = 1.830: outside |1.830 - 1.778| = 0.052 >= 0.05
        assert_eq!(AspectClass::classify(1830, 1000), AspectClass::Other);
        // lower edge: 1.730 inside, 1.720 outside
        assert_eq!(AspectClass::classify(1730, 1000), AspectClass::Landscape);
        assert_eq!(AspectClass::classify(1720, 1000), AspectClass::Other);
    }

    #[test]
    fn portrait_tolerance_band_boundaries() {
        assert_eq!(AspectClass::classify(563, 1000), AspectClass::Portrait);
        assert_eq!(AspectClass::classify(610, 1000), AspectClass::Portrait);
        assert_eq!(AspectClass::classify(620, 1000), AspectClass::Other);
    }

    #[test]
    fn key_prefixes() {
        assert_eq!(AspectClass::Landscape.key_prefix(), "landscape/");
        assert_eq!(AspectClass::Portrait.key_prefix(), "portrait/");
        assert_eq!(AspectClass::Other.key_prefix(), "other/");
    }

    #[test]
    fn classify_from_descriptor() {
        let desc = StreamDescriptor {
            width: 1920,
            height: 1080,
        };
        assert_eq!(AspectClass::from(desc), AspectClass::Landscape);
    }
}
