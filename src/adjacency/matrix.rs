use indexmap::IndexSet;

use crate::error::{ColorsError, ColorsResult};

/// Square, row-major label adjacency relation.
///
/// Entry `(i, j)` is a non-negative weight, usually 1 when labels `i` and `j`
/// touch. The diagonal is never read.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    n: usize,
    values: Vec<f64>,
}

/// Sorted unique labels found in a set of pairs, with their adjacency matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAdjacency {
    /// Label numbers, ascending; row `i` of `matrix` belongs to `labels[i]`.
    pub labels: Vec<i64>,
    /// Adjacency between `labels`.
    pub matrix: AdjacencyMatrix,
}

impl AdjacencyMatrix {
    /// All-zero `n × n` matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    /// Build from explicit rows, rejecting ragged, negative, or non-finite input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ColorsResult<Self> {
        let n = rows.len();
        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(ColorsError::config(format!(
                    "adjacency row {i} has {} columns, expected {n}",
                    row.len()
                )));
            }
            if let Some(bad) = row.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(ColorsError::config(format!(
                    "adjacency row {i} holds invalid weight {bad}"
                )));
            }
            values.extend(row);
        }
        Ok(Self { n, values })
    }

    /// Turn directed label pairs into a matrix over the labels they mention.
    ///
    /// Both labels of every pair are shifted by `add_value` first; repeated
    /// pairs collapse. Labels that never occur in a pair are not represented.
    pub fn from_pairs<I>(pairs: I, add_value: i64) -> LabelAdjacency
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let pairs: IndexSet<(i64, i64)> = pairs
            .into_iter()
            .map(|(a, b)| (a + add_value, b + add_value))
            .collect();

        let mut labels: Vec<i64> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        labels.sort_unstable();
        labels.dedup();

        let mut matrix = Self::zeros(labels.len());
        for &(a, b) in &pairs {
            // Both labels were collected above, so the lookups cannot miss.
            if let (Ok(i), Ok(j)) = (labels.binary_search(&a), labels.binary_search(&b)) {
                matrix.set(i, j, 1.0);
            }
        }
        LabelAdjacency { labels, matrix }
    }

    /// Number of labels covered.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix covers no labels.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Weight between labels `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Overwrite the weight between labels `i` and `j`.
    pub fn set(&mut self, i: usize, j: usize, weight: f64) {
        self.values[i * self.n + j] = weight;
    }

    /// Weights from label `i` to every label.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Largest off-diagonal weight, or 0 for an empty matrix.
    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .enumerate()
            .filter(|&(k, _)| k / self.n != k % self.n)
            .map(|(_, &w)| w)
            .fold(0.0, f64::max)
    }

    /// Copy with every weight divided by the maximum, so weights lie in `[0, 1]`.
    ///
    /// An all-zero matrix is returned unchanged.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max = self.max();
        if max <= 0.0 {
            return self.clone();
        }
        Self {
            n: self.n,
            values: self.values.iter().map(|w| w / max).collect(),
        }
    }

    /// Copy where `(i, j)` and `(j, i)` both hold the larger of the two weights.
    ///
    /// Upper-triangular input becomes the symmetric relation it stands for.
    #[must_use]
    pub fn symmetrized(&self) -> Self {
        let mut out = self.clone();
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                let w = self.get(i, j).max(self.get(j, i));
                out.set(i, j, w);
                out.set(j, i, w);
            }
        }
        out
    }

    /// Sum of each row, ignoring the diagonal.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n)
            .map(|i| {
                self.row(i)
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, w)| w)
                    .sum()
            })
            .collect()
    }

    /// Undirected edges `(i, j, weight)` with `i < j` and a positive weight.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        let sym = self.symmetrized();
        (0..self.n)
            .flat_map(|i| ((i + 1)..self.n).map(move |j| (i, j)))
            .filter_map(|(i, j)| {
                let w = sym.get(i, j);
                (w > 0.0).then_some((i, j, w))
            })
            .collect()
    }
}
