use indexmap::IndexSet;

use super::AdjacencyModel;
use crate::error::{ColorsError, ColorsResult};

/// Labeled voxel grid stored with x varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledVolume {
    dims: [usize; 3],
    labels: Vec<i64>,
}

impl LabeledVolume {
    /// Build a volume; `labels` must hold exactly `dims[0] * dims[1] * dims[2]` voxels.
    pub fn new(dims: [usize; 3], labels: Vec<i64>) -> ColorsResult<Self> {
        let expected = dims.iter().product::<usize>();
        if labels.len() != expected {
            return Err(ColorsError::shape("volume voxels", expected, labels.len()));
        }
        Ok(Self { dims, labels })
    }

    /// Grid size along x, y and z.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dims[0] * (y + self.dims[1] * z)
    }

    /// Face-connected neighbors of a voxel (the unit cross used for dilation).
    fn face_neighbors(&self, x: usize, y: usize, z: usize) -> impl Iterator<Item = usize> + '_ {
        let [nx, ny, nz] = self.dims;
        let candidates = [
            (x > 0).then(|| self.index(x - 1, y, z)),
            (x + 1 < nx).then(|| self.index(x + 1, y, z)),
            (y > 0).then(|| self.index(x, y - 1, z)),
            (y + 1 < ny).then(|| self.index(x, y + 1, z)),
            (z > 0).then(|| self.index(x, y, z - 1)),
            (z + 1 < nz).then(|| self.index(x, y, z + 1)),
        ];
        candidates.into_iter().flatten()
    }
}

impl AdjacencyModel for LabeledVolume {
    /// Collect which positive, non-ignored labels each label's dilation touches.
    fn label_pairs(&self, ignore_values: &[i64]) -> IndexSet<(i64, i64)> {
        let [nx, ny, nz] = self.dims;
        let mut pairs = IndexSet::new();
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let own = self.labels[self.index(x, y, z)];
                    if ignore_values.contains(&own) {
                        continue;
                    }
                    for n in self.face_neighbors(x, y, z) {
                        let other = self.labels[n];
                        if other != own && other > 0 && !ignore_values.contains(&other) {
                            pairs.insert((own, other));
                        }
                    }
                }
            }
        }
        pairs
    }
}
