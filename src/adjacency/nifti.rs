//! Reader for single-file NIfTI-1 label volumes (`.nii`, `.nii.gz`).

use std::{fs::File, io::Read, path::Path};

use flate2::read::GzDecoder;

use super::LabeledVolume;
use crate::error::{ColorsError, ColorsResult};

const HEADER_SIZE: usize = 348;

/// Read the first 3-D volume of a NIfTI-1 file, gzip-compressed or not.
pub fn read_labeled_volume(path: &Path) -> ColorsResult<LabeledVolume> {
    let mut bytes = Vec::new();
    let file = File::open(path)?;
    let gzipped = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".gz"));
    if gzipped {
        GzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes)?;
    }
    parse_labeled_volume(&bytes)
}

fn malformed(message: impl std::fmt::Display) -> ColorsError {
    ColorsError::config(format!("malformed NIfTI file: {message}"))
}

#[derive(Clone, Copy)]
enum Endian {
    Little,
    Big,
}

struct Header<'a> {
    bytes: &'a [u8],
    endian: Endian,
}

impl Header<'_> {
    fn array<const N: usize>(&self, offset: usize) -> ColorsResult<[u8; N]> {
        self.bytes
            .get(offset..offset + N)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| malformed(format!("truncated at byte {offset}")))
    }

    fn i16(&self, offset: usize) -> ColorsResult<i16> {
        let raw = self.array::<2>(offset)?;
        Ok(match self.endian {
            Endian::Little => i16::from_le_bytes(raw),
            Endian::Big => i16::from_be_bytes(raw),
        })
    }

    fn f32(&self, offset: usize) -> ColorsResult<f32> {
        let raw = self.array::<4>(offset)?;
        Ok(match self.endian {
            Endian::Little => f32::from_le_bytes(raw),
            Endian::Big => f32::from_be_bytes(raw),
        })
    }
}

/// Decode one voxel of `datatype` starting at `raw`.
fn decode(datatype: i16, raw: &[u8], endian: Endian) -> Option<f64> {
    macro_rules! num {
        ($t:ty) => {{
            let bytes = raw.try_into().ok()?;
            let v = match endian {
                Endian::Little => <$t>::from_le_bytes(bytes),
                Endian::Big => <$t>::from_be_bytes(bytes),
            };
            #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
            Some(v as f64)
        }};
    }
    match datatype {
        2 => num!(u8),
        4 => num!(i16),
        8 => num!(i32),
        16 => num!(f32),
        64 => num!(f64),
        256 => num!(i8),
        512 => num!(u16),
        768 => num!(u32),
        1024 => num!(i64),
        _ => None,
    }
}

fn voxel_size(datatype: i16) -> Option<usize> {
    match datatype {
        2 | 256 => Some(1),
        4 | 512 => Some(2),
        8 | 16 | 768 => Some(4),
        64 | 1024 => Some(8),
        _ => None,
    }
}

/// Parse an in-memory NIfTI-1 image.
pub fn parse_labeled_volume(bytes: &[u8]) -> ColorsResult<LabeledVolume> {
    let size_field: [u8; 4] = bytes
        .get(0..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| malformed("file shorter than its header"))?;
    let endian = if i32::from_le_bytes(size_field) == 348 {
        Endian::Little
    } else if i32::from_be_bytes(size_field) == 348 {
        Endian::Big
    } else {
        return Err(ColorsError::UnsupportedFormat(
            "image header is not NIfTI-1".into(),
        ));
    };
    let header = Header { bytes, endian };
    if bytes.get(344..347) != Some(b"n+1".as_slice()) {
        return Err(ColorsError::UnsupportedFormat(
            "only single-file NIfTI-1 (magic n+1) is read".into(),
        ));
    }

    let rank = header.i16(40)?;
    if !(1..=7).contains(&rank) {
        return Err(malformed(format!("dimension count {rank}")));
    }
    let mut dims = [1usize; 3];
    for (axis, dim) in dims.iter_mut().enumerate().take(usize::from(rank.unsigned_abs()).min(3)) {
        let extent = header.i16(42 + 2 * axis)?;
        *dim = usize::try_from(extent).map_err(|_| malformed(format!("extent {extent}")))?;
    }

    let datatype = header.i16(70)?;
    let width = voxel_size(datatype).ok_or_else(|| {
        ColorsError::UnsupportedFormat(format!("NIfTI data type code {datatype}"))
    })?;
    let offset = header.f32(108)?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let offset = (offset.max(HEADER_SIZE as f32)) as usize;
    let slope = f64::from(header.f32(112)?);
    let intercept = f64::from(header.f32(116)?);
    let scaled = slope != 0.0 && (slope != 1.0 || intercept != 0.0);

    let count = dims.iter().product::<usize>();
    let data = bytes
        .get(offset..offset + count * width)
        .ok_or_else(|| malformed(format!("expected {count} voxels after byte {offset}")))?;

    let mut labels = Vec::with_capacity(count);
    for raw in data.chunks_exact(width) {
        let mut value = decode(datatype, raw, endian)
            .ok_or_else(|| malformed("voxel could not be decoded"))?;
        if scaled {
            value = value.mul_add(slope, intercept);
        }
        #[allow(clippy::cast_possible_truncation)]
        let label = value.round() as i64;
        labels.push(label);
    }
    LabeledVolume::new(dims, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::{Compression, write::GzEncoder};

    use crate::adjacency::AdjacencyModel;

    /// Minimal little-endian NIfTI-1 image holding `voxels` as int16.
    fn image(dims: [i16; 3], voxels: &[i16]) -> Vec<u8> {
        let mut bytes = vec![0u8; 352];
        bytes[0..4].copy_from_slice(&348i32.to_le_bytes());
        bytes[40..42].copy_from_slice(&3i16.to_le_bytes());
        for (axis, d) in dims.iter().enumerate() {
            bytes[42 + 2 * axis..44 + 2 * axis].copy_from_slice(&d.to_le_bytes());
        }
        bytes[70..72].copy_from_slice(&4i16.to_le_bytes());
        bytes[72..74].copy_from_slice(&16i16.to_le_bytes());
        bytes[108..112].copy_from_slice(&352f32.to_le_bytes());
        bytes[344..348].copy_from_slice(b"n+1\0");
        for v in voxels {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn decodes_int16_volume() {
        let volume = parse_labeled_volume(&image([2, 2, 1], &[0, 3, 3, 7])).unwrap();
        assert_eq!(volume.dims(), [2, 2, 1]);
        let pairs = volume.label_pairs(&[0]);
        assert!(pairs.contains(&(3, 7)));
        assert!(pairs.contains(&(7, 3)));
    }

    #[test]
    fn rejects_non_nifti_headers() {
        assert!(matches!(
            parse_labeled_volume(&[0u8; 400]),
            Err(ColorsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_unknown_data_types() {
        let mut bytes = image([1, 1, 1], &[1]);
        bytes[70..72].copy_from_slice(&32i16.to_le_bytes());
        assert!(matches!(
            parse_labeled_volume(&bytes),
            Err(ColorsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn truncated_data_is_malformed() {
        let mut bytes = image([2, 2, 2], &[1, 2, 3]);
        bytes.truncate(356);
        assert!(matches!(parse_labeled_volume(&bytes), Err(ColorsError::Config(_))));
    }

    #[test]
    fn reads_gzipped_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.nii.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(&image([1, 1, 2], &[4, 5])).unwrap();
        encoder.finish().unwrap();
        let volume = read_labeled_volume(&path).unwrap();
        assert_eq!(volume.dims(), [1, 1, 2]);
    }
}
