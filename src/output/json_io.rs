use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::color::Rgb;
use crate::error::ColorsResult;
use crate::reorder::LabelRecord;

#[derive(Debug, Serialize)]
struct ColormapDocument<'a> {
    name: &'a str,
    description: String,
    colormap: Vec<ColormapEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ColormapEntry<'a> {
    #[serde(rename = "ID")]
    id: i64,
    name: &'a str,
    red: f64,
    green: f64,
    blue: f64,
}

/// Serialize a labeled colormap to a pretty-printed JSON file.
pub fn save_colormap_json(
    path: impl AsRef<Path>,
    name: &str,
    colors: &[Rgb],
    labels: &[LabelRecord],
) -> ColorsResult<PathBuf> {
    let path = path.as_ref();
    let document = ColormapDocument {
        name,
        description: format!("Colormap for {} labels", labels.len()),
        colormap: labels
            .iter()
            .zip(colors)
            .map(|(label, c)| ColormapEntry {
                id: label.id,
                name: &label.name,
                red: c.red,
                green: c.green,
                blue: c.blue,
            })
            .collect(),
    };
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, &document)?;
    w.flush()?;
    Ok(path.to_path_buf())
}
