//! Diverging bar colors for the index chart.
//!
//! Negative months shade toward red and non-negative months toward blue.
//! Intensity is the value relative to the series extreme of the same sign,
//! so the scale pivots on zero rather than on the middle of the range.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::SeriesBounds;

const BASE_CHANNEL: f64 = 220.0;
const CHANNEL_SPAN: f64 = 150.0;
const ALPHA: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

impl BarColor {
    /// Zero-intensity color of the non-negative branch.
    pub const BASE: BarColor = BarColor {
        red: BASE_CHANNEL as u8,
        green: BASE_CHANNEL as u8,
        blue: 255,
        alpha: ALPHA,
    };
}

impl fmt::Display for BarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl Serialize for BarColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Share of `extreme` covered by `magnitude`, clamped to [0, 1].
/// A zero extreme or a non-finite ratio yields zero.
fn intensity(magnitude: f64, extreme: f64) -> f64 {
    if extreme <= 0.0 {
        return 0.0;
    }
    let ratio = magnitude / extreme;
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn shade(intensity: f64) -> u8 {
    (BASE_CHANNEL - CHANNEL_SPAN * intensity).floor() as u8
}

pub fn color_for(value: f64, bounds: &SeriesBounds) -> BarColor {
    if value < 0.0 {
        let c = shade(intensity(value.abs(), bounds.min.abs()));
        BarColor {
            red: 255,
            green: c,
            blue: c,
            alpha: ALPHA,
        }
    } else {
        let c = shade(intensity(value, bounds.max));
        BarColor {
            red: c,
            green: c,
            blue: 255,
            alpha: ALPHA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: f64, max: f64) -> SeriesBounds {
        SeriesBounds { min, max }
    }

    #[test]
    fn extremes_get_full_intensity() {
        let b = bounds(-40.0, 20.0);
        assert_eq!(color_for(-40.0, &b).to_string(), "rgba(255, 70, 70, 0.8)");
        assert_eq!(color_for(20.0, &b).to_string(), "rgba(70, 70, 255, 0.8)");
    }

    #[test]
    fn half_intensity_is_floored() {
        let b = bounds(-10.0, 10.0);
        // 220 - 150 * 0.5 = 145
        assert_eq!(color_for(5.0, &b).red, 145);
        assert_eq!(color_for(-5.0, &b).green, 145);
    }

    #[test]
    fn zero_is_the_base_color() {
        for b in [bounds(-5.0, 5.0), bounds(0.0, 0.0), bounds(-100.0, 0.0), bounds(3.0, 9.0)] {
            assert_eq!(color_for(0.0, &b), BarColor::BASE);
        }
    }

    #[test]
    fn degenerate_bounds_do_not_divide_by_zero() {
        let b = bounds(0.0, 0.0);
        assert_eq!(color_for(-3.0, &b).to_string(), "rgba(255, 220, 220, 0.8)");
        assert_eq!(color_for(3.0, &b), BarColor::BASE);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let b = bounds(-10.0, 10.0);
        assert_eq!(color_for(50.0, &b), color_for(10.0, &b));
        assert_eq!(color_for(-50.0, &b), color_for(-10.0, &b));
    }

    #[test]
    fn nan_maps_to_base() {
        assert_eq!(color_for(f64::NAN, &bounds(-1.0, 1.0)), BarColor::BASE);
    }

    #[test]
    fn deterministic() {
        let b = bounds(-12.3, 45.6);
        for v in [-12.3, -1.0, 0.0, 7.7, 45.6] {
            assert_eq!(color_for(v, &b), color_for(v, &b));
        }
    }

    #[test]
    fn serializes_as_css_string() {
        let json = serde_json::to_string(&BarColor::BASE).unwrap();
        assert_eq!(json, "\"rgba(220, 220, 255, 0.8)\"");
    }
}
