//! Overlay layer taxonomy.
//!
//! The viewer exposes five toggleable overlays. Noise and flood risk are
//! rendered straight from live third-party layers, so the offline generator
//! only produces output for the other three.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A toggleable map overlay.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverlayLayer {
    /// Road/rail noise tiles (WMS, live only).
    Noise,
    /// Flood risk zones (live agency feed).
    FloodRisk,
    /// Air quality monitoring sites.
    AirQuality,
    /// IMD deprivation choropleth.
    Deprivation,
    /// Derived combined environmental score choropleth.
    Combined,
}

impl OverlayLayer {
    /// Returns all layers in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Noise,
            Self::FloodRisk,
            Self::AirQuality,
            Self::Deprivation,
            Self::Combined,
        ]
    }

    /// Human-readable label for legend headings and toggle controls.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Noise => "Road & rail noise",
            Self::FloodRisk => "Flood risk",
            Self::AirQuality => "Air quality",
            Self::Deprivation => "Deprivation (IMD)",
            Self::Combined => "Combined score",
        }
    }

    /// Whether the offline generator can produce this layer from prepared
    /// local inputs.
    #[must_use]
    pub const fn offline(self) -> bool {
        matches!(self, Self::AirQuality | Self::Deprivation | Self::Combined)
    }
}
