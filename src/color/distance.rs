use super::{PerceptualMetric, Swatch};

/// Dense, row-major matrix of pairwise perceptual distances.
///
/// Rows are computed independently and each row is filled in column order, so
/// the values (and the row sums) do not depend on whether rows were built in
/// parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Measure every ordered pair of `swatches` with `metric`; the diagonal is 0.
    pub fn build<M>(metric: &M, swatches: &[Swatch<M::Color>]) -> Self
    where
        M: PerceptualMetric + Sync,
    {
        let n = swatches.len();
        let row = |i: usize| -> Vec<f64> {
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        metric.distance(swatches[i].perceptual, swatches[j].perceptual)
                    }
                })
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(row).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..n).map(row).collect();

        Self {
            n,
            values: rows.into_iter().flatten().collect(),
        }
    }

    /// Number of colors measured.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix covers no colors.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between colors `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Distances from color `i` to every color.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Total distance from each color to all others.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.row(i).iter().sum()).collect()
    }

    /// Smallest off-diagonal distance, or `None` for fewer than two colors.
    pub fn min_off_diagonal(&self) -> Option<f64> {
        (0..self.n)
            .flat_map(|i| ((i + 1)..self.n).map(move |j| (i, j)))
            .map(|(i, j)| self.get(i, j))
            .reduce(f64::min)
    }
}
