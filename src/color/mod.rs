//! Color types and the perceptual metrics used to compare them.

mod distance;
mod metric;
mod swatch;

pub use distance::DistanceMatrix;
pub use metric::{CieDe2000Metric, MetricKind, OklabMetric, PerceptualMetric};
pub use swatch::Swatch;

use palette::Srgb;

use crate::error::{ColorsError, ColorsResult};

/// Non-linear sRGB triple with components in `[0, 1]`.
pub type Rgb = Srgb<f64>;

/// Build an [`Rgb`] from a `[r, g, b]` array, rejecting components outside `[0, 1]`.
pub fn rgb_from_array(components: [f64; 3]) -> ColorsResult<Rgb> {
    if components
        .iter()
        .any(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
    {
        return Err(ColorsError::config(format!(
            "rgb components must lie in [0, 1], got {components:?}"
        )));
    }
    let [r, g, b] = components;
    Ok(Rgb::new(r, g, b))
}

/// Format a color as `#RRGGBB`.
#[inline]
pub fn rgb_hex(c: Rgb) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (r, g, b) = {
        let r = (c.red * 255.0).round().clamp(0.0, 255.0) as u8;
        let g = (c.green * 255.0).round().clamp(0.0, 255.0) as u8;
        let b = (c.blue * 255.0).round().clamp(0.0, 255.0) as u8;
        (r, g, b)
    };
    format!("#{r:02X}{g:02X}{b:02X}")
}
