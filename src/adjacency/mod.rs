//! Which labeled regions touch which: label pairs from meshes and volumes,
//! and the adjacency matrix built from them.

mod matrix;
mod mesh;
pub mod nifti;
mod volume;
pub mod vtk;

pub use matrix::{AdjacencyMatrix, LabelAdjacency};
pub use mesh::LabeledMesh;
pub use volume::LabeledVolume;

use std::path::Path;

use indexmap::IndexSet;

use crate::error::{ColorsError, ColorsResult};

/// Source of directed `(label, neighbor_label)` pairs.
///
/// Pairs are treated as undirected downstream; sources report both
/// directions when they see a border from both sides.
pub trait AdjacencyModel {
    /// Distinct label pairs in discovery order, skipping `ignore_values`.
    fn label_pairs(&self, ignore_values: &[i64]) -> IndexSet<(i64, i64)>;
}

/// Options applied when turning a label source into an adjacency matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyOptions {
    /// Labels that never take part in a pair.
    pub ignore_values: Vec<i64>,
    /// Offset added to every label of every pair.
    pub add_value: i64,
}

impl Default for AdjacencyOptions {
    fn default() -> Self {
        Self {
            ignore_values: vec![-1, 999],
            add_value: 0,
        }
    }
}

/// Compute the adjacency matrix of any label source.
pub fn label_adjacency<M>(model: &M, options: &AdjacencyOptions) -> LabelAdjacency
where
    M: AdjacencyModel + ?Sized,
{
    AdjacencyMatrix::from_pairs(model.label_pairs(&options.ignore_values), options.add_value)
}

/// A labeled surface or volume loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSource {
    /// Per-vertex labels on a polygon mesh.
    Mesh(LabeledMesh),
    /// Per-voxel labels on a 3-D grid.
    Volume(LabeledVolume),
}

impl LabelSource {
    /// Load `path`, picking the reader from its extension (`.vtk`, `.nii`, `.nii.gz`).
    pub fn open(path: &Path) -> ColorsResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name.ends_with(".vtk") {
            vtk::read_labeled_mesh(path).map(Self::Mesh)
        } else if name.ends_with(".nii.gz") || name.ends_with(".nii") {
            nifti::read_labeled_volume(path).map(Self::Volume)
        } else {
            Err(ColorsError::UnsupportedFormat(format!(
                "{} (expected .vtk, .nii or .nii.gz)",
                path.display()
            )))
        }
    }

    /// Short name of the source kind, used in output file names.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mesh(_) => "surface",
            Self::Volume(_) => "volume",
        }
    }
}

impl AdjacencyModel for LabelSource {
    fn label_pairs(&self, ignore_values: &[i64]) -> IndexSet<(i64, i64)> {
        match self {
            Self::Mesh(mesh) => mesh.label_pairs(ignore_values),
            Self::Volume(volume) => volume.label_pairs(ignore_values),
        }
    }
}
