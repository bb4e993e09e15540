use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use super::{LabelGraph, html::write_colormap_bars};
use crate::color::Rgb;
use crate::error::ColorsResult;
use crate::reorder::LabelRecord;

/// Observational rendering of colormaps and label graphs.
///
/// Renderers never feed back into color selection or reordering; callers
/// invoke them only behind the plotting flags.
pub trait ColormapRenderer {
    /// Render `colors` as a bar chart named `name`.
    fn render_colormap(
        &self,
        name: &str,
        colors: &[Rgb],
        labels: Option<&[LabelRecord]>,
    ) -> ColorsResult<PathBuf>;

    /// Render `graph` named `name`, filling nodes with `colors` by label position.
    fn render_graph(
        &self,
        name: &str,
        graph: &LabelGraph,
        colors: Option<&[Rgb]>,
    ) -> ColorsResult<PathBuf>;
}

/// Writes HTML bar charts and Graphviz DOT files into a directory.
#[derive(Debug, Clone)]
pub struct FileRenderer {
    out_dir: PathBuf,
}

impl FileRenderer {
    /// Renderer writing into `out_dir`, created on first use.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Target directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn target(&self, file: String) -> ColorsResult<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        Ok(self.out_dir.join(file))
    }
}

impl ColormapRenderer for FileRenderer {
    fn render_colormap(
        &self,
        name: &str,
        colors: &[Rgb],
        labels: Option<&[LabelRecord]>,
    ) -> ColorsResult<PathBuf> {
        let path = self.target(format!("{name}.html"))?;
        let path = write_colormap_bars(name, colors, labels, path)?;
        info!(path = %path.display(), "colormap chart saved");
        Ok(path)
    }

    fn render_graph(
        &self,
        name: &str,
        graph: &LabelGraph,
        colors: Option<&[Rgb]>,
    ) -> ColorsResult<PathBuf> {
        let path = self.target(format!("{name}.dot"))?;
        fs::write(&path, graph.to_dot(name, colors))?;
        info!(path = %path.display(), nodes = graph.nodes().len(), "label graph saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::AdjacencyMatrix;

    #[test]
    fn file_renderer_writes_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = FileRenderer::new(dir.path().join("plots"));
        let colors = [Rgb::new(0.2, 0.4, 0.6), Rgb::new(0.9, 0.1, 0.1)];
        let chart = renderer.render_colormap("cmap", &colors, None).unwrap();
        assert_eq!(chart, dir.path().join("plots").join("cmap.html"));

        let labels = LabelRecord::from_parts(2, &[], &[], &[]).unwrap();
        let adjacency = AdjacencyMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let graph = LabelGraph::new(&adjacency, &labels).unwrap();
        let dot = renderer.render_graph("label_graph", &graph, Some(&colors)).unwrap();
        assert!(fs::read_to_string(dot).unwrap().contains("n0 -- n1"));
    }
}
