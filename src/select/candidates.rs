use crate::color::Rgb;

/// Grid divisions per RGB axis used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: usize = 30;
/// Largest accepted grid size; 128³ candidates already need hundreds of MB.
pub const MAX_GRID_SIZE: usize = 128;

/// Uniform lattice of RGB candidates covering the unit cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpace {
    grid_size: usize,
}

impl CandidateSpace {
    /// Lattice with `grid_size` evenly spaced samples per axis, endpoints included.
    #[must_use]
    pub const fn new(grid_size: usize) -> Self {
        Self { grid_size }
    }

    /// Samples per axis.
    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Total number of candidates, `grid_size³`, or `None` on overflow.
    pub const fn checked_len(&self) -> Option<usize> {
        match self.grid_size.checked_mul(self.grid_size) {
            Some(square) => square.checked_mul(self.grid_size),
            None => None,
        }
    }

    /// Total number of candidates, `grid_size³`, saturating at `usize::MAX`.
    pub const fn len(&self) -> usize {
        match self.checked_len() {
            Some(n) => n,
            None => usize::MAX,
        }
    }

    /// Whether the lattice is empty.
    pub const fn is_empty(&self) -> bool {
        self.grid_size == 0
    }

    /// Evenly spaced axis values from 0 to 1 inclusive.
    fn axis(&self) -> Vec<f64> {
        match self.grid_size {
            0 => Vec::new(),
            1 => vec![0.0],
            n => {
                #[allow(clippy::cast_precision_loss)]
                let step = 1.0 / (n - 1) as f64;
                #[allow(clippy::cast_precision_loss)]
                (0..n).map(|i| i as f64 * step).collect()
            }
        }
    }

    /// Enumerate every candidate.
    ///
    /// Green varies slowest, then red, then blue. The maximin argmax breaks
    /// ties by this order, so it must not change.
    pub fn candidates(&self) -> Vec<Rgb> {
        let axis = self.axis();
        let mut out = Vec::with_capacity(self.len());
        for &g in &axis {
            for &r in &axis {
                for &b in &axis {
                    out.push(Rgb::new(r, g, b));
                }
            }
        }
        out
    }
}

impl Default for CandidateSpace {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_covers_unit_cube() {
        let space = CandidateSpace::new(3);
        let candidates = space.candidates();
        assert_eq!(candidates.len(), 27);
        assert_eq!(space.len(), 27);
        assert_eq!(candidates[0], Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(candidates[26], Rgb::new(1.0, 1.0, 1.0));
        assert!(
            candidates
                .iter()
                .all(|c| [c.red, c.green, c.blue].iter().all(|v| (0.0..=1.0).contains(v)))
        );
    }

    #[test]
    fn enumeration_is_green_major_then_red_then_blue() {
        let candidates = CandidateSpace::new(2).candidates();
        assert_eq!(candidates[1], Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(candidates[2], Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(candidates[4], Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn oversized_grids_do_not_overflow() {
        let huge = CandidateSpace::new(usize::MAX / 2);
        assert_eq!(huge.checked_len(), None);
        assert_eq!(huge.len(), usize::MAX);
        assert_eq!(CandidateSpace::new(MAX_GRID_SIZE).checked_len(), Some(128 * 128 * 128));
    }

    #[test]
    fn degenerate_grids() {
        assert_eq!(CandidateSpace::new(1).candidates(), vec![Rgb::new(0.0, 0.0, 0.0)]);
        assert!(CandidateSpace::new(0).candidates().is_empty());
        assert!(CandidateSpace::new(0).is_empty());
    }
}
