use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::color::Rgb;
use crate::error::ColorsResult;
use crate::reorder::LabelRecord;

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Write a ParaView `<ColorMap>` with one `<Point>` per label.
///
/// Each point's position is the label ID divided by the largest ID (0 when
/// the largest ID is not positive).
pub fn save_colormap_xml(
    path: impl AsRef<Path>,
    name: &str,
    colors: &[Rgb],
    labels: &[LabelRecord],
) -> ColorsResult<PathBuf> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    let max_id = labels.iter().map(|l| l.id).max().unwrap_or(0);
    writeln!(
        w,
        r#"<ColorMap name="{}" space="RGB">"#,
        escape_attr(name)
    )?;
    for (label, c) in labels.iter().zip(colors) {
        #[allow(clippy::cast_precision_loss)]
        let x = if max_id > 0 {
            label.id as f64 / max_id as f64
        } else {
            0.0
        };
        writeln!(
            w,
            r#"  <Point x="{x}" o="{x}" r="{}" g="{}" b="{}"/>"#,
            c.red, c.green, c.blue
        )?;
    }
    writeln!(w, "</ColorMap>")?;
    w.flush()?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_scaled_by_largest_id() {
        let dir = tempfile::tempdir().unwrap();
        let labels = vec![
            LabelRecord {
                id: 5,
                name: "a".into(),
                group: 1,
            },
            LabelRecord {
                id: 10,
                name: "b".into(),
                group: 1,
            },
        ];
        let colors = [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 1.0)];
        let path = save_colormap_xml(dir.path().join("c.xml"), "A&B", &colors, &labels).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with(r#"<ColorMap name="A&amp;B" space="RGB">"#));
        assert!(text.contains(r#"<Point x="0.5" o="0.5" r="1" g="0" b="0"/>"#));
        assert!(text.contains(r#"<Point x="1" o="1" r="0" g="0" b="1"/>"#));
        assert!(text.trim_end().ends_with("</ColorMap>"));
    }
}
