#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Piecewise-linear color gradients for choropleth overlays.
//!
//! A gradient is an ordered list of [`ColorStop`]s spanning `[0, 1]`.
//! [`interpolate`] maps a scalar onto the gradient by blending the two
//! bracketing stops channel by channel. The preset tables at the bottom are
//! the fixed gradients the viewer's legends are built from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// Creates a color from channel values.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Formats this color as a CSS hex string (`#rrggbb`).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// A single anchor point in a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStop {
    /// Position along the gradient, in `[0, 1]`.
    pub position: f64,
    /// Color at this position.
    pub color: Rgb,
}

impl ColorStop {
    /// Creates a stop at `position` with the given color.
    #[must_use]
    pub const fn new(position: f64, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Error for malformed gradient stop lists.
///
/// The stop tables in this crate are fixed constants, so hitting this at
/// runtime indicates a programming error, not bad input data. Callers treat
/// it as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GradientError {
    /// A gradient needs at least two stops to interpolate between.
    #[error("gradient needs at least 2 stops, got {count}")]
    TooFewStops {
        /// Number of stops provided.
        count: usize,
    },

    /// Stops must be sorted ascending by position.
    #[error("gradient stops not sorted ascending at index {index}")]
    Unsorted {
        /// Index of the first out-of-order stop.
        index: usize,
    },
}

/// Maps a scalar onto a gradient by piecewise-linear interpolation.
///
/// `t` is clamped to `[0, 1]` first; values below the first stop or above the
/// last take the endpoint color unchanged. Each channel is interpolated
/// independently and rounded to the nearest integer.
///
/// # Errors
///
/// Returns [`GradientError`] if `stops` has fewer than two entries or is not
/// sorted ascending by position.
pub fn interpolate(stops: &[ColorStop], t: f64) -> Result<Rgb, GradientError> {
    if stops.len() < 2 {
        return Err(GradientError::TooFewStops { count: stops.len() });
    }
    for (index, pair) in stops.windows(2).enumerate() {
        if pair[1].position < pair[0].position {
            return Err(GradientError::Unsorted { index: index + 1 });
        }
    }

    let t = t.clamp(0.0, 1.0);

    let first = stops[0];
    let last = stops[stops.len() - 1];
    if t <= first.position {
        return Ok(first.color);
    }
    if t >= last.position {
        return Ok(last.color);
    }

    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t > hi.position {
            continue;
        }
        let span = hi.position - lo.position;
        if span <= 0.0 {
            // Coincident stops: the later one wins.
            return Ok(hi.color);
        }
        let frac = (t - lo.position) / span;
        return Ok(Rgb::new(
            blend(lo.color.red, hi.color.red, frac),
            blend(lo.color.green, hi.color.green, frac),
            blend(lo.color.blue, hi.color.blue, frac),
        ));
    }

    // Unreachable given the endpoint checks above, but keeps the compiler
    // satisfied without a panic path.
    Ok(last.color)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(lo: u8, hi: u8, frac: f64) -> u8 {
    frac.mul_add(f64::from(hi) - f64::from(lo), f64::from(lo))
        .round() as u8
}

/// Fill color for regions with no usable data.
pub const NO_DATA_COLOR: Rgb = Rgb::new(153, 153, 153);

/// Combined-score gradient: green (best) through yellow to red (worst).
pub const SCORE_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, Rgb::new(46, 204, 113)),
    ColorStop::new(0.5, Rgb::new(241, 196, 15)),
    ColorStop::new(1.0, Rgb::new(231, 76, 60)),
];

/// Deprivation gradient, indexed by `(decile - 1) / 9` so decile 1 (most
/// deprived) maps to dark red and decile 10 to dark green.
pub const DECILE_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, Rgb::new(165, 0, 38)),
    ColorStop::new(0.25, Rgb::new(244, 109, 67)),
    ColorStop::new(0.5, Rgb::new(255, 255, 191)),
    ColorStop::new(0.75, Rgb::new(166, 217, 106)),
    ColorStop::new(1.0, Rgb::new(0, 104, 55)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_below_and_above_range() {
        let below = interpolate(SCORE_STOPS, -5.0).unwrap();
        let above = interpolate(SCORE_STOPS, 5.0).unwrap();
        assert_eq!(below, interpolate(SCORE_STOPS, 0.0).unwrap());
        assert_eq!(above, interpolate(SCORE_STOPS, 1.0).unwrap());
    }

    #[test]
    fn endpoints_return_stop_colors_exactly() {
        assert_eq!(interpolate(SCORE_STOPS, 0.0).unwrap(), SCORE_STOPS[0].color);
        assert_eq!(interpolate(SCORE_STOPS, 1.0).unwrap(), SCORE_STOPS[2].color);
    }

    #[test]
    fn midpoint_blends_channels() {
        let stops = [
            ColorStop::new(0.0, Rgb::new(0, 0, 0)),
            ColorStop::new(1.0, Rgb::new(200, 100, 50)),
        ];
        assert_eq!(interpolate(&stops, 0.5).unwrap(), Rgb::new(100, 50, 25));
    }

    #[test]
    fn no_overshoot_between_bracketing_stops() {
        for i in 0..=100 {
            let t = f64::from(i) / 100.0;
            let c = interpolate(SCORE_STOPS, t).unwrap();
            let (lo, hi) = if t <= 0.5 {
                (SCORE_STOPS[0].color, SCORE_STOPS[1].color)
            } else {
                (SCORE_STOPS[1].color, SCORE_STOPS[2].color)
            };
            for (value, a, b) in [
                (c.red, lo.red, hi.red),
                (c.green, lo.green, hi.green),
                (c.blue, lo.blue, hi.blue),
            ] {
                let (min, max) = if a <= b { (a, b) } else { (b, a) };
                assert!((min..=max).contains(&value), "t={t} channel {value} outside [{min}, {max}]");
            }
        }
    }

    #[test]
    fn rejects_too_few_stops() {
        let one = [ColorStop::new(0.0, Rgb::new(0, 0, 0))];
        assert_eq!(
            interpolate(&one, 0.5),
            Err(GradientError::TooFewStops { count: 1 })
        );
        assert_eq!(
            interpolate(&[], 0.5),
            Err(GradientError::TooFewStops { count: 0 })
        );
    }

    #[test]
    fn rejects_unsorted_stops() {
        let stops = [
            ColorStop::new(0.0, Rgb::new(0, 0, 0)),
            ColorStop::new(0.8, Rgb::new(10, 10, 10)),
            ColorStop::new(0.4, Rgb::new(20, 20, 20)),
        ];
        assert_eq!(
            interpolate(&stops, 0.5),
            Err(GradientError::Unsorted { index: 2 })
        );
    }

    #[test]
    fn preset_tables_are_valid() {
        assert!(interpolate(SCORE_STOPS, 0.3).is_ok());
        assert!(interpolate(DECILE_STOPS, 0.3).is_ok());
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgb::new(231, 76, 60).to_hex(), "#e74c3c");
        assert_eq!(Rgb::new(0, 0, 0).to_hex(), "#000000");
    }
}
