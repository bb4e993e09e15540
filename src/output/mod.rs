//! Persisting and rendering colormaps: CSV/JSON/XML writers, label-table
//! readers, and the optional chart/graph renderer.

pub mod csv;
mod graph;
mod html;
mod json_io;
mod render;
mod xml;

pub use graph::LabelGraph;
pub use json_io::save_colormap_json;
pub use render::{ColormapRenderer, FileRenderer};
pub use xml::save_colormap_xml;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::color::Rgb;
use crate::error::{ColorsError, ColorsResult};
use crate::reorder::LabelRecord;

/// File formats a colormap can be saved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `r,g,b` row per color.
    Csv,
    /// Named document with one entry per label.
    Json,
    /// ParaView color map.
    Xml,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ColorsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(ColorsError::config(format!(
                "unknown output format {other:?} (expected csv, json or xml)"
            ))),
        }
    }
}

/// Save a labeled colormap as `path` in `format`.
///
/// `name` titles the JSON and XML documents; CSV carries colors only.
pub fn save_colormap(
    path: impl AsRef<Path>,
    format: OutputFormat,
    name: &str,
    colors: &[Rgb],
    labels: &[LabelRecord],
) -> ColorsResult<PathBuf> {
    if labels.len() != colors.len() {
        return Err(ColorsError::shape("labels", colors.len(), labels.len()));
    }
    match format {
        OutputFormat::Csv => csv::write_colormap_csv(path, colors),
        OutputFormat::Json => save_colormap_json(path, name, colors, labels),
        OutputFormat::Xml => save_colormap_xml(path, name, colors, labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(" xml ".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
        assert!(matches!(
            "tsv".parse::<OutputFormat>(),
            Err(ColorsError::Config(_))
        ));
    }

    #[test]
    fn save_dispatches_on_format() {
        let dir = tempfile::tempdir().unwrap();
        let colors = [Rgb::new(0.0, 0.5, 1.0)];
        let labels = LabelRecord::from_parts(1, &[], &[], &[]).unwrap();
        for format in [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Xml] {
            let path = dir.path().join(format!("cmap.{format}"));
            save_colormap(&path, format, "cmap", &colors, &labels).unwrap();
            assert!(path.exists(), "{format} not written");
        }
    }

    #[test]
    fn save_requires_one_label_per_color() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_colormap(
            dir.path().join("x.csv"),
            OutputFormat::Csv,
            "x",
            &[Rgb::new(0.0, 0.0, 0.0)],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ColorsError::ShapeMismatch { .. }));
    }
}
