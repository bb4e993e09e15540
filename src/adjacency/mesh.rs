use std::collections::BTreeSet;

use indexmap::IndexSet;

use super::AdjacencyModel;
use crate::error::{ColorsError, ColorsResult};

/// Polygon mesh with one label per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMesh {
    faces: Vec<Vec<usize>>,
    labels: Vec<i64>,
}

impl LabeledMesh {
    /// Build a mesh, checking that every face index refers to a labeled vertex.
    pub fn new(faces: Vec<Vec<usize>>, labels: Vec<i64>) -> ColorsResult<Self> {
        if let Some(bad) = faces.iter().flatten().find(|&&v| v >= labels.len()) {
            return Err(ColorsError::config(format!(
                "face refers to vertex {bad} but only {} vertices are labeled",
                labels.len()
            )));
        }
        Ok(Self { faces, labels })
    }

    /// Per-vertex labels.
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertices sharing a polygon edge with each vertex.
    fn neighbor_lists(&self) -> Vec<BTreeSet<usize>> {
        let mut neighbors = vec![BTreeSet::new(); self.labels.len()];
        for face in &self.faces {
            let k = face.len();
            if k < 2 {
                continue;
            }
            for (pos, &a) in face.iter().enumerate() {
                let b = face[(pos + 1) % k];
                if a != b {
                    neighbors[a].insert(b);
                    neighbors[b].insert(a);
                }
            }
        }
        neighbors
    }
}

impl AdjacencyModel for LabeledMesh {
    /// Walk the boundary between differently labeled vertices.
    fn label_pairs(&self, ignore_values: &[i64]) -> IndexSet<(i64, i64)> {
        let mut pairs = IndexSet::new();
        for (vertex, neighbors) in self.neighbor_lists().into_iter().enumerate() {
            let own = self.labels[vertex];
            if ignore_values.contains(&own) {
                continue;
            }
            for other in neighbors.into_iter().map(|n| self.labels[n]) {
                if other != own && !ignore_values.contains(&other) {
                    pairs.insert((own, other));
                }
            }
        }
        pairs
    }
}
