use std::collections::BTreeMap;

use tracing::debug;

use super::labels::{DEFAULT_GROUP, LabelRecord};
use super::order::{argsort_desc, ranks, sorted_by_key_asc};
use crate::adjacency::AdjacencyMatrix;
use crate::color::{DistanceMatrix, PerceptualMetric, Rgb, Swatch};
use crate::error::{ColorsError, ColorsResult};

/// One group's labels in the order the group was serviced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    /// Group number shared by the members.
    pub group: i64,
    /// Label positions, ascending.
    pub members: Vec<usize>,
}

/// Outcome of a reorder: the new colormap plus how groups were serviced.
#[derive(Debug, Clone, PartialEq)]
pub struct Reordering {
    /// New colormap, index-aligned with the labels.
    pub colors: Vec<Rgb>,
    /// Groups from most to least interconnected.
    pub groups: Vec<GroupPlan>,
}

/// Redistributes a fixed palette over labels so that each group's colors
/// cluster perceptually while adjacent labels stay distinguishable.
///
/// 1. Weight labels by their (normalized, symmetrized) adjacency row sum.
/// 2. Service groups by their best-connected member, strongest first.
/// 3. Rank colors by total perceptual distance to all other colors.
/// 4. Give each group the unassigned colors closest to the currently most
///    distinct unassigned color.
/// 5. Inside a group, hand the most mutually distinct of those colors to the
///    best-connected labels.
///
/// This is a greedy heuristic; it permutes the input colors and never
/// invents or drops one.
#[derive(Debug, Clone)]
pub struct GroupReorderer<M> {
    metric: M,
}

impl<M> GroupReorderer<M>
where
    M: PerceptualMetric + Sync,
{
    /// Reorderer comparing colors with `metric`.
    pub fn new(metric: M) -> Self {
        Self { metric }
    }

    /// Reassign `colors` to `labels`; see [`GroupReorderer::reorder_detailed`].
    pub fn reorder(
        &self,
        colors: &[Rgb],
        adjacency: Option<&AdjacencyMatrix>,
        labels: &[LabelRecord],
    ) -> ColorsResult<Vec<Rgb>> {
        self.reorder_detailed(colors, adjacency, labels)
            .map(|r| r.colors)
    }

    /// Reassign `colors` to `labels` and report the group service order.
    ///
    /// A missing or empty `adjacency` places every label in a single group
    /// and weighs all labels equally.
    pub fn reorder_detailed(
        &self,
        colors: &[Rgb],
        adjacency: Option<&AdjacencyMatrix>,
        labels: &[LabelRecord],
    ) -> ColorsResult<Reordering> {
        let n = colors.len();
        if labels.len() != n {
            return Err(ColorsError::shape("labels", n, labels.len()));
        }
        let adjacency = adjacency.filter(|m| !m.is_empty());
        if let Some(m) = adjacency
            && m.len() != n
        {
            return Err(ColorsError::shape("adjacency matrix", n, m.len()));
        }

        let sums = adjacency.map_or_else(
            || vec![0.0; n],
            |m| m.symmetrized().normalized().row_sums(),
        );
        let label_rank = ranks(&argsort_desc(&sums));
        let groups = match adjacency {
            Some(_) => order_groups(labels, &sums),
            None => vec![GroupPlan {
                group: DEFAULT_GROUP,
                members: (0..n).collect(),
            }],
        };

        let swatches = Swatch::convert_all(&self.metric, colors);
        let distances = DistanceMatrix::build(&self.metric, &swatches);
        let mut unpicked = argsort_desc(&distances.row_sums());

        let mut new_colors = colors.to_vec();
        for plan in &groups {
            let Some(&anchor) = unpicked.first() else {
                break;
            };
            let take = plan.members.len().min(unpicked.len());
            let mut chosen = sorted_by_key_asc(&unpicked, |c| distances.get(anchor, c));
            chosen.truncate(take);
            unpicked.retain(|c| !chosen.contains(c));

            let within: Vec<f64> = chosen
                .iter()
                .map(|&a| chosen.iter().map(|&b| distances.get(a, b)).sum())
                .collect();
            let chosen: Vec<usize> = argsort_desc(&within).into_iter().map(|k| chosen[k]).collect();
            let members = sorted_by_key_asc(&plan.members, |m| {
                #[allow(clippy::cast_precision_loss)]
                let rank = label_rank[m] as f64;
                rank
            });

            debug!(group = plan.group, size = take, anchor, "assigned group colors");
            for (&member, &color) in members.iter().zip(&chosen) {
                new_colors[member] = colors[color];
            }
        }

        Ok(Reordering {
            colors: new_colors,
            groups,
        })
    }
}

/// Distinct groups ordered by their best-connected member, strongest first.
///
/// Ties keep ascending group-number order.
fn order_groups(labels: &[LabelRecord], sums: &[f64]) -> Vec<GroupPlan> {
    let mut by_group: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, label) in labels.iter().enumerate() {
        by_group.entry(label.group).or_default().push(idx);
    }
    let plans: Vec<GroupPlan> = by_group
        .into_iter()
        .map(|(group, members)| GroupPlan { group, members })
        .collect();
    let peaks: Vec<f64> = plans
        .iter()
        .map(|p| p.members.iter().map(|&m| sums[m]).fold(f64::NEG_INFINITY, f64::max))
        .collect();
    let mut out: Vec<Option<GroupPlan>> = plans.into_iter().map(Some).collect();
    argsort_desc(&peaks)
        .into_iter()
        .filter_map(|k| out[k].take())
        .collect()
}
