//! Reader for legacy ASCII VTK `POLYDATA` files carrying per-point labels.

use std::{fs, path::Path};

use super::LabeledMesh;
use crate::error::{ColorsError, ColorsResult};

/// Read polygons and the first point `SCALARS` array of a legacy VTK file.
pub fn read_labeled_mesh(path: &Path) -> ColorsResult<LabeledMesh> {
    let contents = fs::read_to_string(path)?;
    parse_labeled_mesh(&contents)
}

fn malformed(message: impl std::fmt::Display) -> ColorsError {
    ColorsError::config(format!("malformed VTK file: {message}"))
}

struct Tokens<'a> {
    inner: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, what: &str) -> ColorsResult<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| malformed(format!("unexpected end of file reading {what}")))
    }

    fn peek_is(&mut self, keyword: &str) -> bool {
        self.inner
            .peek()
            .is_some_and(|t| t.eq_ignore_ascii_case(keyword))
    }

    fn keyword(&mut self, keyword: &str) -> ColorsResult<()> {
        let token = self.next(keyword)?;
        if token.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(malformed(format!("expected {keyword}, found {token:?}")))
        }
    }

    fn count(&mut self, what: &str) -> ColorsResult<usize> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| malformed(format!("{what} is not a count: {token:?}")))
    }

    fn number(&mut self, what: &str) -> ColorsResult<f64> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| malformed(format!("{what} is not a number: {token:?}")))
    }

    fn skip(&mut self, n: usize, what: &str) -> ColorsResult<()> {
        for _ in 0..n {
            self.next(what)?;
        }
        Ok(())
    }

    /// Cell list in either layout: `k i0 .. ik` records, or the
    /// `OFFSETS` / `CONNECTIVITY` arrays written by VTK 5.1 and later.
    fn cells(&mut self, what: &str) -> ColorsResult<Vec<Vec<usize>>> {
        let n = self.count(what)?;
        let size = self.count("cell list size")?;
        if self.peek_is("OFFSETS") {
            self.keyword("OFFSETS")?;
            self.next("offset type")?;
            let offsets = (0..n)
                .map(|_| self.count("cell offset"))
                .collect::<ColorsResult<Vec<_>>>()?;
            self.keyword("CONNECTIVITY")?;
            self.next("connectivity type")?;
            let connectivity = (0..size)
                .map(|_| self.count("cell vertex"))
                .collect::<ColorsResult<Vec<_>>>()?;
            return offsets
                .windows(2)
                .map(|w| {
                    connectivity
                        .get(w[0]..w[1])
                        .map(<[usize]>::to_vec)
                        .ok_or_else(|| malformed("cell offsets exceed the connectivity array"))
                })
                .collect();
        }
        let mut cells = Vec::with_capacity(n);
        for _ in 0..n {
            let k = self.count("cell size")?;
            let cell = (0..k)
                .map(|_| self.count("cell vertex"))
                .collect::<ColorsResult<Vec<_>>>()?;
            cells.push(cell);
        }
        Ok(cells)
    }

    /// Skip the arrays of a `FIELD` block.
    fn skip_field(&mut self) -> ColorsResult<()> {
        self.next("field name")?;
        let arrays = self.count("field array count")?;
        for _ in 0..arrays {
            self.next("field array name")?;
            let components = self.count("field array components")?;
            let tuples = self.count("field array tuples")?;
            self.next("field array type")?;
            self.skip(components.saturating_mul(tuples), "field array values")?;
        }
        Ok(())
    }
}

/// Drop `METADATA` blocks; each runs to the next blank line.
fn strip_metadata<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut kept = Vec::new();
    let mut in_metadata = false;
    for line in lines {
        let trimmed = line.trim();
        if in_metadata {
            in_metadata = !trimmed.is_empty();
        } else if trimmed.eq_ignore_ascii_case("METADATA") {
            in_metadata = true;
        } else {
            kept.push(line);
        }
    }
    kept
}

/// Parse the text of a legacy VTK file.
///
/// Attribute arrays other than the first point `SCALARS` (normals, vectors,
/// tensors, texture coordinates, field data, lookup tables) are skipped.
pub fn parse_labeled_mesh(contents: &str) -> ColorsResult<LabeledMesh> {
    let mut lines = contents.lines();
    let version = lines.next().unwrap_or_default();
    if !version.trim_start().starts_with("# vtk DataFile") {
        return Err(malformed("missing '# vtk DataFile' header"));
    }
    let _title = lines.next();
    let encoding = lines.next().unwrap_or_default().trim();
    if !encoding.eq_ignore_ascii_case("ASCII") {
        return Err(ColorsError::UnsupportedFormat(format!(
            "VTK encoding {encoding:?} (only ASCII is read)"
        )));
    }

    let body = strip_metadata(lines).join("\n");
    let mut tokens = Tokens {
        inner: body.split_whitespace().peekable(),
    };

    let mut faces: Option<Vec<Vec<usize>>> = None;
    let mut labels: Option<Vec<i64>> = None;
    let mut point_count = None;
    let mut in_point_data = false;
    let mut attribute_count: Option<usize> = None;
    let attributes = |count: Option<usize>, section: &str| {
        count.ok_or_else(|| malformed(format!("{section} outside POINT_DATA or CELL_DATA")))
    };

    while labels.is_none() {
        let Some(keyword) = tokens.inner.next() else {
            break;
        };
        match keyword.to_ascii_uppercase().as_str() {
            "DATASET" => {
                let kind = tokens.next("dataset type")?;
                if !kind.eq_ignore_ascii_case("POLYDATA") {
                    return Err(ColorsError::UnsupportedFormat(format!(
                        "VTK dataset {kind} (only POLYDATA is read)"
                    )));
                }
            }
            "POINTS" => {
                let n = tokens.count("point count")?;
                tokens.next("point type")?;
                tokens.skip(n.saturating_mul(3), "point coordinates")?;
                point_count = Some(n);
            }
            "POLYGONS" => faces = Some(tokens.cells("polygon count")?),
            "VERTICES" | "LINES" | "TRIANGLE_STRIPS" => {
                tokens.cells("cell count")?;
            }
            "POINT_DATA" => {
                let n = tokens.count("point data count")?;
                if point_count.is_some_and(|p| p != n) {
                    return Err(malformed(format!(
                        "POINT_DATA has {n} values but the mesh has {} points",
                        point_count.unwrap_or_default()
                    )));
                }
                point_count = Some(n);
                attribute_count = Some(n);
                in_point_data = true;
            }
            "CELL_DATA" => {
                attribute_count = Some(tokens.count("cell data count")?);
                in_point_data = false;
            }
            "SCALARS" => {
                tokens.next("scalar name")?;
                tokens.next("scalar type")?;
                let explicit = tokens
                    .inner
                    .peek()
                    .is_some_and(|t| t.parse::<usize>().is_ok());
                let components = if explicit {
                    tokens.count("component count")?
                } else {
                    1
                };
                tokens.keyword("LOOKUP_TABLE")?;
                tokens.next("lookup table name")?;
                let n = attributes(attribute_count, "SCALARS")?;
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    let v = tokens.number("scalar value")?;
                    tokens.skip(components.saturating_sub(1), "scalar components")?;
                    #[allow(clippy::cast_possible_truncation)]
                    let label = v.round() as i64;
                    values.push(label);
                }
                if in_point_data {
                    labels = Some(values);
                }
            }
            section @ ("NORMALS" | "VECTORS" | "TENSORS") => {
                let width = if section == "TENSORS" { 9 } else { 3 };
                let n = attributes(attribute_count, section)?;
                tokens.next("array name")?;
                tokens.next("array type")?;
                tokens.skip(n.saturating_mul(width), "array values")?;
            }
            "TEXTURE_COORDINATES" => {
                let n = attributes(attribute_count, "TEXTURE_COORDINATES")?;
                tokens.next("array name")?;
                let dim = tokens.count("texture dimension")?;
                tokens.next("array type")?;
                tokens.skip(n.saturating_mul(dim), "texture coordinates")?;
            }
            "COLOR_SCALARS" => {
                let n = attributes(attribute_count, "COLOR_SCALARS")?;
                tokens.next("array name")?;
                let width = tokens.count("color component count")?;
                tokens.skip(n.saturating_mul(width), "color scalars")?;
            }
            "LOOKUP_TABLE" => {
                tokens.next("lookup table name")?;
                let size = tokens.count("lookup table size")?;
                tokens.skip(size.saturating_mul(4), "lookup table entries")?;
            }
            "FIELD" => tokens.skip_field()?,
            other => {
                return Err(malformed(format!("unexpected section {other:?}")));
            }
        }
    }

    let faces = faces.ok_or_else(|| malformed("no POLYGONS section"))?;
    let labels = labels.ok_or_else(|| malformed("no point SCALARS section"))?;
    LabeledMesh::new(faces, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::AdjacencyModel;

    const SQUARE: &str = "# vtk DataFile Version 3.0
two triangles
ASCII
DATASET POLYDATA
POINTS 4 float
0 0 0  1 0 0  1 1 0
0 1 0
POLYGONS 2 8
3 0 1 2
3 0 2 3
POINT_DATA 4
SCALARS labels int 1
LOOKUP_TABLE default
1003 1003 1028 1035
";

    #[test]
    fn reads_polygons_and_point_labels() {
        let mesh = parse_labeled_mesh(SQUARE).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.labels(), &[1003, 1003, 1028, 1035]);
        let pairs = mesh.label_pairs(&[]);
        assert!(pairs.contains(&(1003, 1028)));
        assert!(pairs.contains(&(1028, 1035)));
    }

    #[test]
    fn attribute_arrays_before_scalars_are_skipped() {
        let annotated = "# vtk DataFile Version 3.0
triangle with normals
ASCII
DATASET POLYDATA
FIELD FieldData 1
TIME 1 1 double
0.5
POINTS 3 float
0 0 0 1 0 0 0 1 0
METADATA
INFORMATION 0

POLYGONS 1 4
3 0 1 2
CELL_DATA 1
NORMALS cell_normals float
0 0 1
POINT_DATA 3
NORMALS normals float
0 0 1 0 0 1 0 0 1
TEXTURE_COORDINATES uv 2 float
0 0 1 0 0 1
FIELD extra 2
area 1 3 float
1 1 1
id 2 3 int
1 2 3 4 5 6
SCALARS labels int 1
LOOKUP_TABLE default
4 8 15
";
        let mesh = parse_labeled_mesh(annotated).unwrap();
        assert_eq!(mesh.labels(), &[4, 8, 15]);
        assert_eq!(mesh.label_pairs(&[]).len(), 6);
    }

    #[test]
    fn offsets_and_connectivity_layout_is_read() {
        let modern = "# vtk DataFile Version 5.1
two triangles
ASCII
DATASET POLYDATA
POINTS 4 float
0 0 0 1 0 0 1 1 0 0 1 0
POLYGONS 3 6
OFFSETS vtktypeint64
0 3 6
CONNECTIVITY vtktypeint64
0 1 2 0 2 3
POINT_DATA 4
SCALARS labels int 1
LOOKUP_TABLE default
1003 1003 1028 1035
";
        let mesh = parse_labeled_mesh(modern).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.label_pairs(&[]), parse_labeled_mesh(SQUARE).unwrap().label_pairs(&[]));
    }

    #[test]
    fn unknown_sections_are_malformed() {
        let odd = SQUARE.replace("POINT_DATA 4", "SPLINES 4");
        assert!(matches!(parse_labeled_mesh(&odd), Err(ColorsError::Config(_))));
    }

    #[test]
    fn binary_files_are_unsupported() {
        let binary = SQUARE.replacen("ASCII", "BINARY", 1);
        assert!(matches!(
            parse_labeled_mesh(&binary),
            Err(ColorsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn other_datasets_are_unsupported() {
        let grid = SQUARE.replacen("POLYDATA", "STRUCTURED_POINTS", 1);
        assert!(matches!(
            parse_labeled_mesh(&grid),
            Err(ColorsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn truncated_scalars_are_malformed() {
        let truncated = SQUARE.replace("1003 1003 1028 1035", "1003 1003");
        assert!(matches!(
            parse_labeled_mesh(&truncated),
            Err(ColorsError::Config(_))
        ));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.vtk");
        fs::write(&path, SQUARE).unwrap();
        assert_eq!(read_labeled_mesh(&path).unwrap().labels().len(), 4);
    }
}
