use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::color::{Rgb, rgb_hex};
use crate::error::ColorsResult;
use crate::reorder::LabelRecord;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a colormap as a stack of horizontal color bars, one per entry.
///
/// Bars are captioned with the label name when `labels` is given, and with
/// the entry index otherwise.
pub fn write_colormap_bars(
    title: &str,
    colors: &[Rgb],
    labels: Option<&[LabelRecord]>,
    path: impl AsRef<Path>,
) -> ColorsResult<PathBuf> {
    let path = path.as_ref();
    let f = File::create(path)?;
    let mut w = BufWriter::new(f);
    writeln!(
        w,
        r#"<!doctype html><meta charset="utf-8">
<title>{title}</title>
<style>
  body{{margin:0;background:#111;color:#eee;font-family:system-ui}}
  h2{{margin:12px}}
  .g{{display:grid;grid-template-columns:1fr;gap:4px;padding:8px;max-width:480px}}
  .s{{height:28px;border-radius:6px;display:flex;align-items:center;padding:0 10px;
      font-weight:700;text-shadow:0 1px 2px rgba(0,0,0,.55)}}
</style>
<h2>{title}</h2>
<div class="g">"#,
        title = escape(title)
    )?;
    for (idx, &c) in colors.iter().enumerate() {
        let hex = rgb_hex(c);
        let caption = labels
            .and_then(|l| l.get(idx))
            .map_or_else(|| idx.to_string(), |l| format!("{} {}", l.id, escape(&l.name)));
        writeln!(
            w,
            r#"<div class="s" style="background:{hex}">{caption} | {hex}</div>"#
        )?;
    }
    writeln!(w, "</div>")?;
    w.flush()?;
    Ok(path.to_path_buf())
}
