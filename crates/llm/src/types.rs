//! Search-depth and location types.

use localfind_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// The user's model-speed preference.
///
/// Each variant maps to a Gemini model id via the configuration's model
/// catalog; the other variant serves as the overload fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    /// Quick answers, smaller model
    Fast,
    /// Thorough answers, larger model
    Deep,
}

impl SearchDepth {
    /// Parse a depth preference from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fast" | "flash" => Some(Self::Fast),
            "deep" | "pro" => Some(Self::Deep),
            _ => None,
        }
    }

    /// Get the canonical depth name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Deep => "deep",
        }
    }

    /// Human-readable label for progress messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fast => "Fast Search",
            Self::Deep => "Deep Search",
        }
    }

    /// The variant used as fallback when this one is overloaded.
    pub fn fallback(&self) -> Self {
        match self {
            Self::Fast => Self::Deep,
            Self::Deep => Self::Fast,
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device coordinates forwarded to the maps grounding tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    /// Create coordinates, validating the ranges.
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Config(format!(
                "Latitude out of range: {}",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Config(format!(
                "Longitude out of range: {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a "lat,lng" pair, e.g. "41.0082,28.9784".
    pub fn parse(s: &str) -> AppResult<Self> {
        let (lat, lng) = s.split_once(',').ok_or_else(|| {
            AppError::Config(format!("Invalid location '{}'. Expected \"lat,lng\"", s))
        })?;

        let latitude: f64 = lat.trim().parse().map_err(|_| {
            AppError::Config(format!("Invalid latitude in location '{}'", s))
        })?;
        let longitude: f64 = lng.trim().parse().map_err(|_| {
            AppError::Config(format!("Invalid longitude in location '{}'", s))
        })?;

        Self::new(latitude, longitude)
    }
}
