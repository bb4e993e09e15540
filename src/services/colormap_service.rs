use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    adjacency::{AdjacencyMatrix, LabelAdjacency, LabelSource, label_adjacency},
    color::{CieDe2000Metric, MetricKind, OklabMetric, PerceptualMetric, Rgb},
    config::ColorsConfig,
    error::{ColorsError, ColorsResult},
    output::{
        ColormapRenderer, FileRenderer, LabelGraph, OutputFormat, csv::write_adjacency_table,
        save_colormap,
    },
    reorder::{GroupReorderer, LabelRecord, Reordering},
    select::{CandidateSpace, MaximinSelector},
};

/// Runs the user-facing operations with the configured metric, applying the
/// save and plot flags to their results.
#[derive(Debug, Clone)]
pub struct ColormapService<R = FileRenderer> {
    config: ColorsConfig,
    renderer: R,
}

impl ColormapService<FileRenderer> {
    /// Service rendering into the configured output directory.
    pub fn new(config: ColorsConfig) -> Self {
        let renderer = FileRenderer::new(config.out_dir.clone());
        Self { config, renderer }
    }
}

impl<R> ColormapService<R>
where
    R: ColormapRenderer,
{
    /// Service with a caller-supplied renderer.
    pub fn with_renderer(config: ColorsConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    /// Active configuration.
    pub fn config(&self) -> &ColorsConfig {
        &self.config
    }

    /// Select `ncolors` maximally distinguishable colors.
    ///
    /// Saves `colormap_of_{n}_distinguishable_colors.csv` when `save_csv` is set
    /// and renders the same name when `plot_colormap` is set.
    pub fn distinguishable_colors(&self) -> ColorsResult<Vec<Rgb>> {
        self.config.validate()?;
        let backgrounds = self.config.background_colors()?;
        let space = CandidateSpace::new(self.config.grid_size);
        let ncolors = self.config.ncolors;
        info!(
            ncolors,
            candidates = space.len(),
            metric = ?self.config.metric,
            "selecting distinguishable colors"
        );
        let colors = match self.config.metric {
            MetricKind::Ciede2000 => {
                MaximinSelector::new(CieDe2000Metric, space).select(ncolors, &backgrounds)?
            }
            MetricKind::Oklab => {
                MaximinSelector::new(OklabMetric, space).select(ncolors, &backgrounds)?
            }
        };

        let name = format!("colormap_of_{ncolors}_distinguishable_colors");
        if self.config.save_csv {
            let path = self.output_path(&format!("{name}.csv"))?;
            let labels = LabelRecord::from_parts(colors.len(), &[], &[], &[])?;
            save_colormap(&path, OutputFormat::Csv, &name, &colors, &labels)?;
            info!(path = %path.display(), "colormap saved");
        }
        if self.config.plot_colormap {
            self.renderer.render_colormap(&name, &colors, None)?;
        }
        Ok(colors)
    }

    /// Extract the label adjacency of the surface or volume stored at `path`.
    ///
    /// Saves `adjacent_{surface|volume}_labels.csv` when `save_csv` is set;
    /// adjacency tables are only written as CSV.
    pub fn label_adjacency(&self, path: &Path) -> ColorsResult<LabelAdjacency> {
        let source = LabelSource::open(path)?;
        let adjacency = label_adjacency(&source, &self.config.adjacency_options());
        info!(
            source = %path.display(),
            kind = source.kind(),
            labels = adjacency.labels.len(),
            edges = adjacency.matrix.edges().len(),
            "label adjacency extracted"
        );

        if self.config.save_csv {
            let format = self.config.output_format()?;
            if format != OutputFormat::Csv {
                return Err(ColorsError::config(format!(
                    "adjacency tables are written as csv, not {format}"
                )));
            }
            let file = format!("adjacent_{}_labels.{format}", source.kind());
            let out = self.output_path(&file)?;
            write_adjacency_table(&out, &adjacency.labels, &adjacency.matrix)?;
            info!(path = %out.display(), "adjacency table saved");
        }
        Ok(adjacency)
    }

    /// Reassign `colors` to `labels` so groups share similar colors while
    /// adjacent labels stay distinguishable.
    ///
    /// Saves `{colormap_name}.csv/.json/.xml` when `save_text_files` is set,
    /// renders the result when `plot_colors` is set, and renders the label
    /// graph plus one subgraph per group when `plot_graphs` is set and an
    /// adjacency is available.
    pub fn group_colors(
        &self,
        colors: &[Rgb],
        adjacency: Option<&AdjacencyMatrix>,
        labels: &[LabelRecord],
    ) -> ColorsResult<Reordering> {
        let adjacency = adjacency.filter(|m| !m.is_empty());
        let reordering = match self.config.metric {
            MetricKind::Ciede2000 => reorder_with(CieDe2000Metric, colors, adjacency, labels)?,
            MetricKind::Oklab => reorder_with(OklabMetric, colors, adjacency, labels)?,
        };
        info!(
            labels = labels.len(),
            groups = reordering.groups.len(),
            "colors regrouped"
        );

        let name = self.config.colormap_name.as_str();
        if self.config.save_text_files {
            for format in [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Xml] {
                let path = self.output_path(&format!("{name}.{format}"))?;
                save_colormap(&path, format, name, &reordering.colors, labels)?;
                debug!(path = %path.display(), %format, "grouped colormap saved");
            }
            info!(name, out_dir = %self.config.out_dir.display(), "grouped colormap saved");
        }
        if self.config.plot_colors {
            self.renderer
                .render_colormap(name, &reordering.colors, Some(labels))?;
        }
        if self.config.plot_graphs {
            match adjacency {
                Some(matrix) => self.render_graphs(matrix, labels, &reordering)?,
                None => debug!("no adjacency; skipping graph rendering"),
            }
        }
        Ok(reordering)
    }

    fn render_graphs(
        &self,
        adjacency: &AdjacencyMatrix,
        labels: &[LabelRecord],
        reordering: &Reordering,
    ) -> ColorsResult<()> {
        let graph = LabelGraph::new(adjacency, labels)?;
        let colors = Some(reordering.colors.as_slice());
        self.renderer.render_graph("label_graph", &graph, colors)?;
        for plan in &reordering.groups {
            let name = format!("group_{}_graph", plan.group);
            self.renderer
                .render_graph(&name, &graph.subgraph(&plan.members), colors)?;
        }
        Ok(())
    }

    fn output_path(&self, file: &str) -> ColorsResult<PathBuf> {
        fs::create_dir_all(&self.config.out_dir)?;
        Ok(self.config.out_dir.join(file))
    }
}

fn reorder_with<M>(
    metric: M,
    colors: &[Rgb],
    adjacency: Option<&AdjacencyMatrix>,
    labels: &[LabelRecord],
) -> ColorsResult<Reordering>
where
    M: PerceptualMetric + Sync,
{
    GroupReorderer::new(metric).reorder_detailed(colors, adjacency, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use crate::output::csv::{read_colormap_csv, read_label_table};

    /// Records what would have been rendered.
    #[derive(Default)]
    struct RecordingRenderer {
        rendered: RefCell<Vec<String>>,
    }

    impl ColormapRenderer for RecordingRenderer {
        fn render_colormap(
            &self,
            name: &str,
            _colors: &[Rgb],
            _labels: Option<&[LabelRecord]>,
        ) -> ColorsResult<PathBuf> {
            self.rendered.borrow_mut().push(name.to_string());
            Ok(PathBuf::from(name))
        }

        fn render_graph(
            &self,
            name: &str,
            _graph: &LabelGraph,
            _colors: Option<&[Rgb]>,
        ) -> ColorsResult<PathBuf> {
            self.rendered.borrow_mut().push(name.to_string());
            Ok(PathBuf::from(name))
        }
    }

    fn config(out_dir: &Path) -> ColorsConfig {
        ColorsConfig {
            ncolors: 6,
            grid_size: 5,
            out_dir: out_dir.to_path_buf(),
            ..ColorsConfig::default()
        }
    }

    const SQUARE_VTK: &str = "# vtk DataFile Version 3.0
two triangles
ASCII
DATASET POLYDATA
POINTS 4 float
0 0 0 1 0 0 1 1 0 0 1 0
POLYGONS 2 8
3 0 1 2
3 0 2 3
POINT_DATA 4
SCALARS labels int 1
LOOKUP_TABLE default
1003 1003 1028 1035
";

    #[test]
    fn distinguishable_colors_are_saved_and_plotted() {
        let dir = tempfile::tempdir().unwrap();
        let service = ColormapService::with_renderer(
            ColorsConfig {
                plot_colormap: true,
                ..config(dir.path())
            },
            RecordingRenderer::default(),
        );
        let colors = service.distinguishable_colors().unwrap();
        assert_eq!(colors.len(), 6);
        let saved = read_colormap_csv(dir.path().join("colormap_of_6_distinguishable_colors.csv"))
            .unwrap();
        assert_eq!(saved, colors);
        assert_eq!(
            *service.renderer.rendered.borrow(),
            vec!["colormap_of_6_distinguishable_colors".to_string()]
        );
    }

    #[test]
    fn metric_choice_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let base = ColorsConfig {
            save_csv: false,
            ..config(dir.path())
        };
        let lab = ColormapService::new(base.clone())
            .distinguishable_colors()
            .unwrap();
        let ok = ColormapService::new(ColorsConfig {
            metric: MetricKind::Oklab,
            ..base
        })
        .distinguishable_colors()
        .unwrap();
        assert_eq!(lab.len(), ok.len());
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn capacity_errors_surface() {
        let dir = tempfile::tempdir().unwrap();
        let service = ColormapService::new(ColorsConfig {
            ncolors: 200,
            ..config(dir.path())
        });
        assert!(matches!(
            service.distinguishable_colors(),
            Err(ColorsError::Capacity {
                requested: 200,
                available: 125
            })
        ));
    }

    #[test]
    fn surface_adjacency_is_extracted_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = dir.path().join("lh.labels.vtk");
        fs::write(&mesh, SQUARE_VTK).unwrap();
        let service = ColormapService::new(config(dir.path()));
        let adjacency = service.label_adjacency(&mesh).unwrap();
        assert_eq!(adjacency.labels, vec![1003, 1028, 1035]);
        assert_eq!(adjacency.matrix.row_sums(), vec![2.0, 2.0, 2.0]);

        let (labels, matrix) =
            read_label_table(dir.path().join("adjacent_surface_labels.csv")).unwrap();
        assert_eq!(labels.iter().map(|l| l.id).collect::<Vec<_>>(), adjacency.labels);
        assert_eq!(matrix, adjacency.matrix);
    }

    #[test]
    fn adjacency_tables_are_csv_only() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = dir.path().join("labels.vtk");
        fs::write(&mesh, SQUARE_VTK).unwrap();
        let service = ColormapService::new(ColorsConfig {
            output_format: "json".into(),
            ..config(dir.path())
        });
        assert!(matches!(
            service.label_adjacency(&mesh),
            Err(ColorsError::Config(_))
        ));
    }

    #[test]
    fn grouped_colors_are_saved_in_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let service = ColormapService::with_renderer(
            ColorsConfig {
                plot_colors: true,
                plot_graphs: true,
                ..config(dir.path())
            },
            RecordingRenderer::default(),
        );
        let colors = service.distinguishable_colors().unwrap();
        let labels = LabelRecord::from_parts(6, &[], &[], &[1, 1, 2, 2, 3, 3]).unwrap();
        let mut adjacency = AdjacencyMatrix::zeros(6);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (0, 2)] {
            adjacency.set(a, b, 1.0);
        }

        let reordering = service
            .group_colors(&colors, Some(&adjacency), &labels)
            .unwrap();
        assert_eq!(reordering.groups.len(), 3);
        for ext in ["csv", "json", "xml"] {
            assert!(dir.path().join(format!("label_colormap.{ext}")).exists());
        }
        assert_eq!(
            read_colormap_csv(dir.path().join("label_colormap.csv")).unwrap(),
            reordering.colors
        );

        let rendered = service.renderer.rendered.borrow();
        assert!(rendered.contains(&"label_colormap".to_string()));
        assert!(rendered.contains(&"label_graph".to_string()));
        for group in [1, 2, 3] {
            assert!(rendered.contains(&format!("group_{group}_graph")));
        }
    }

    #[test]
    fn graphs_are_skipped_without_adjacency() {
        let dir = tempfile::tempdir().unwrap();
        let service = ColormapService::with_renderer(
            ColorsConfig {
                save_text_files: false,
                plot_graphs: true,
                ..config(dir.path())
            },
            RecordingRenderer::default(),
        );
        let colors = [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 1.0)];
        let labels = LabelRecord::from_parts(2, &[], &[], &[]).unwrap();
        let reordering = service.group_colors(&colors, None, &labels).unwrap();
        assert_eq!(reordering.groups.len(), 1);
        assert!(service.renderer.rendered.borrow().is_empty());
        assert!(!dir.path().join("label_colormap.csv").exists());
    }
}
