//! Comma-separated colormaps and adjacency tables.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::adjacency::AdjacencyMatrix;
use crate::color::{Rgb, rgb_from_array};
use crate::error::{ColorsError, ColorsResult};
use crate::reorder::{DEFAULT_GROUP, LabelRecord};

/// Write one `r,g,b` row per color in 18-digit scientific notation.
pub fn write_colormap_csv(path: impl AsRef<Path>, colors: &[Rgb]) -> ColorsResult<PathBuf> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    for c in colors {
        writeln!(w, "{:.18e},{:.18e},{:.18e}", c.red, c.green, c.blue)?;
    }
    w.flush()?;
    Ok(path.to_path_buf())
}

/// Read a colormap written by [`write_colormap_csv`] (or any `r,g,b` rows).
pub fn read_colormap_csv(path: impl AsRef<Path>) -> ColorsResult<Vec<Rgb>> {
    parse_colormap_csv(&fs::read_to_string(path)?)
}

/// Parse `r,g,b` rows; blank lines are skipped.
pub fn parse_colormap_csv(contents: &str) -> ColorsResult<Vec<Rgb>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(row, line)| {
            let values = parse_floats(line.split(','), row)?;
            let components: [f64; 3] = values.try_into().map_err(|v: Vec<f64>| {
                ColorsError::config(format!(
                    "colormap row {} has {} components, expected 3",
                    row + 1,
                    v.len()
                ))
            })?;
            rgb_from_array(components)
        })
        .collect()
}

fn parse_floats<'a, I>(cells: I, row: usize) -> ColorsResult<Vec<f64>>
where
    I: IntoIterator<Item = &'a str>,
{
    cells
        .into_iter()
        .map(|cell| {
            let cell = cell.trim();
            cell.parse::<f64>().map_err(|_| {
                ColorsError::config(format!("row {}: {cell:?} is not a number", row + 1))
            })
        })
        .collect()
}

/// Write an adjacency table: header `ID,<id...>`, then one row per label.
pub fn write_adjacency_table(
    path: impl AsRef<Path>,
    labels: &[i64],
    matrix: &AdjacencyMatrix,
) -> ColorsResult<PathBuf> {
    if matrix.len() != labels.len() {
        return Err(ColorsError::shape("adjacency matrix", labels.len(), matrix.len()));
    }
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    let header: Vec<String> = std::iter::once("ID".to_string())
        .chain(labels.iter().map(i64::to_string))
        .collect();
    writeln!(w, "{}", header.join(","))?;
    for (i, id) in labels.iter().enumerate() {
        let row: Vec<String> = matrix.row(i).iter().map(f64::to_string).collect();
        writeln!(w, "{id},{}", row.join(","))?;
    }
    w.flush()?;
    Ok(path.to_path_buf())
}

/// Read a label table: `ID`, optional `name` and `group` columns, then the
/// adjacency columns, one per label.
///
/// A table without adjacency columns yields an empty matrix.
pub fn read_label_table(
    path: impl AsRef<Path>,
) -> ColorsResult<(Vec<LabelRecord>, AdjacencyMatrix)> {
    parse_label_table(&fs::read_to_string(path)?)
}

/// Parse the text of a label table; see [`read_label_table`].
pub fn parse_label_table(contents: &str) -> ColorsResult<(Vec<LabelRecord>, AdjacencyMatrix)> {
    let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| ColorsError::config("label table is empty"))?
        .split(',')
        .map(str::trim)
        .collect();
    if header.first().is_none_or(|h| !h.eq_ignore_ascii_case("ID")) {
        return Err(ColorsError::config("label table must start with an ID column"));
    }
    let has_name = header.get(1).is_some_and(|h| h.eq_ignore_ascii_case("name"));
    let group_col = if has_name { 2 } else { 1 };
    let has_group = header
        .get(group_col)
        .is_some_and(|h| h.eq_ignore_ascii_case("group"));
    let first_weight = 1 + usize::from(has_name) + usize::from(has_group);
    let n = header.len() - first_weight;

    let mut labels = Vec::with_capacity(n);
    let mut rows = Vec::with_capacity(n);
    for (row, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() != header.len() {
            return Err(ColorsError::config(format!(
                "label table row {} has {} cells, expected {}",
                row + 1,
                cells.len(),
                header.len()
            )));
        }
        let id = parse_int(cells[0], row)?;
        let name = if has_name {
            cells[1].to_string()
        } else {
            id.to_string()
        };
        let group = if has_group {
            parse_int(cells[group_col], row)?
        } else {
            DEFAULT_GROUP
        };
        labels.push(LabelRecord { id, name, group });
        rows.push(parse_floats(cells[first_weight..].iter().copied(), row)?);
    }
    LabelRecord::ensure_unique_ids(&labels)?;
    if n == 0 {
        return Ok((labels, AdjacencyMatrix::zeros(0)));
    }
    if labels.len() != n {
        return Err(ColorsError::shape("label table rows", n, labels.len()));
    }
    Ok((labels, AdjacencyMatrix::from_rows(rows)?))
}

fn parse_int(cell: &str, row: usize) -> ColorsResult<i64> {
    if let Ok(v) = cell.parse::<i64>() {
        return Ok(v);
    }
    // Tables written by numeric tools often carry "12.0".
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => {
            #[allow(clippy::cast_possible_truncation)]
            let v = v as i64;
            Ok(v)
        }
        _ => Err(ColorsError::config(format!(
            "row {}: {cell:?} is not an integer",
            row + 1
        ))),
    }
}
