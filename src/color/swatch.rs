use super::{PerceptualMetric, Rgb};

/// An RGB color paired with its perceptual-space value under some metric.
#[derive(Clone, Copy, Debug)]
pub struct Swatch<C> {
    /// Display color.
    pub rgb: Rgb,
    /// Value the metric compares.
    pub perceptual: C,
}

impl<C: Copy> Swatch<C> {
    /// Convert `rgb` once through `metric`.
    #[inline]
    pub fn new<M>(metric: &M, rgb: Rgb) -> Self
    where
        M: PerceptualMetric<Color = C>,
    {
        Self {
            rgb,
            perceptual: metric.convert(rgb),
        }
    }

    /// Convert a whole palette, preserving order.
    pub fn convert_all<M>(metric: &M, colors: &[Rgb]) -> Vec<Self>
    where
        M: PerceptualMetric<Color = C>,
    {
        colors.iter().map(|&rgb| Self::new(metric, rgb)).collect()
    }
}
