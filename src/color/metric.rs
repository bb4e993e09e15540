use palette::{FromColor, Lab, Oklab, color_difference::Ciede2000, white_point::D65};
use serde::{Deserialize, Serialize};

use super::Rgb;

/// Converts RGB into a perceptual space and measures differences there.
///
/// Implementations must be pure: the same input always converts to the same
/// perceptual value, and `distance(a, a) == 0`.
pub trait PerceptualMetric {
    /// Perceptual-space representation of a color.
    type Color: Copy + Send + Sync;

    /// Convert an RGB triple into the perceptual space.
    fn convert(&self, rgb: Rgb) -> Self::Color;

    /// Non-negative, roughly symmetric difference between two perceptual colors.
    fn distance(&self, a: Self::Color, b: Self::Color) -> f64;
}

/// CIE L*a*b* (D65) with the CIEDE2000 color difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct CieDe2000Metric;

impl PerceptualMetric for CieDe2000Metric {
    type Color = Lab<D65, f64>;

    fn convert(&self, rgb: Rgb) -> Self::Color {
        Lab::from_color(rgb)
    }

    fn distance(&self, a: Self::Color, b: Self::Color) -> f64 {
        a.difference(b)
    }
}

/// Euclidean distance in OKLab.
#[derive(Debug, Clone, Copy, Default)]
pub struct OklabMetric;

impl PerceptualMetric for OklabMetric {
    type Color = Oklab<f64>;

    fn convert(&self, rgb: Rgb) -> Self::Color {
        Oklab::from_color(rgb)
    }

    #[inline]
    fn distance(&self, a: Self::Color, b: Self::Color) -> f64 {
        let dl = a.l - b.l;
        let da = a.a - b.a;
        let db = a.b - b.b;
        db.mul_add(db, dl.mul_add(dl, da * da)).sqrt()
    }
}

/// Metric selector as it appears in configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// [`CieDe2000Metric`].
    #[default]
    Ciede2000,
    /// [`OklabMetric`].
    Oklab,
}
