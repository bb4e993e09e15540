use tracing::debug;

use super::{CandidateSpace, MAX_GRID_SIZE};
use crate::color::{PerceptualMetric, Rgb, Swatch};
use crate::error::{ColorsError, ColorsResult};

/// Picks colors one at a time, each farthest from everything picked so far.
///
/// The sequence is prefix-consistent: asking for `k + 1` colors returns the
/// same first `k` colors as asking for `k`.
#[derive(Debug, Clone)]
pub struct MaximinSelector<M> {
    metric: M,
    space: CandidateSpace,
}

impl<M> MaximinSelector<M>
where
    M: PerceptualMetric + Sync,
{
    /// Selector drawing from `space` and comparing colors with `metric`.
    pub fn new(metric: M, space: CandidateSpace) -> Self {
        Self { metric, space }
    }

    /// Candidate lattice this selector draws from.
    pub fn space(&self) -> CandidateSpace {
        self.space
    }

    /// Pick `ncolors` colors that avoid each other and every `backgrounds` entry.
    ///
    /// Background colors seed the distance bookkeeping but are never returned.
    pub fn select(&self, ncolors: usize, backgrounds: &[Rgb]) -> ColorsResult<Vec<Rgb>> {
        if ncolors == 0 {
            return Err(ColorsError::config("ncolors must be at least 1"));
        }
        if backgrounds.is_empty() {
            return Err(ColorsError::config(
                "at least one background color is required",
            ));
        }
        let grid_size = self.space.grid_size();
        if grid_size > MAX_GRID_SIZE {
            return Err(ColorsError::config(format!(
                "grid_size {grid_size} exceeds the maximum of {MAX_GRID_SIZE}"
            )));
        }
        let available = self.space.len();
        if ncolors > available {
            return Err(ColorsError::Capacity {
                requested: ncolors,
                available,
            });
        }

        let pool = Swatch::convert_all(&self.metric, &self.space.candidates());
        let bg = Swatch::convert_all(&self.metric, backgrounds);

        let mut dmin = vec![f64::INFINITY; pool.len()];
        for b in &bg {
            self.tighten(&pool, &mut dmin, None, b.perceptual);
        }

        let mut picked = vec![false; pool.len()];
        let mut last = bg[bg.len() - 1].perceptual;
        let mut out = Vec::with_capacity(ncolors);

        for round in 0..ncolors {
            self.tighten(&pool, &mut dmin, Some(&picked), last);
            let chosen = argmax_unpicked(&dmin, &picked).ok_or(ColorsError::Capacity {
                requested: ncolors,
                available,
            })?;
            debug!(round, index = chosen, min_distance = dmin[chosen], "picked color");
            picked[chosen] = true;
            out.push(pool[chosen].rgb);
            last = pool[chosen].perceptual;
        }

        Ok(out)
    }

    /// Lower every unpicked candidate's running minimum by its distance to `to`.
    fn tighten(
        &self,
        pool: &[Swatch<M::Color>],
        dmin: &mut [f64],
        picked: Option<&[bool]>,
        to: M::Color,
    ) {
        let metric = &self.metric;
        let update = |(idx, d): (usize, &mut f64)| {
            if picked.is_some_and(|p| p[idx]) {
                return;
            }
            let dist = metric.distance(pool[idx].perceptual, to);
            if dist < *d {
                *d = dist;
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            dmin.par_iter_mut().enumerate().for_each(update);
        }
        #[cfg(not(feature = "parallel"))]
        dmin.iter_mut().enumerate().for_each(update);
    }
}

/// Index of the largest unpicked value; the first occurrence wins ties.
fn argmax_unpicked(values: &[f64], picked: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if picked[idx] {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
