use crate::adjacency::AdjacencyMatrix;
use crate::color::{Rgb, rgb_hex};
use crate::error::{ColorsError, ColorsResult};
use crate::reorder::LabelRecord;

/// Labels as nodes, adjacency as weighted undirected edges.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGraph {
    nodes: Vec<usize>,
    labels: Vec<LabelRecord>,
    edges: Vec<(usize, usize, f64)>,
}

impl LabelGraph {
    /// Graph over every label with an edge wherever `adjacency` is positive.
    pub fn new(adjacency: &AdjacencyMatrix, labels: &[LabelRecord]) -> ColorsResult<Self> {
        if adjacency.len() != labels.len() {
            return Err(ColorsError::shape(
                "adjacency matrix",
                labels.len(),
                adjacency.len(),
            ));
        }
        Ok(Self {
            nodes: (0..labels.len()).collect(),
            labels: labels.to_vec(),
            edges: adjacency.edges(),
        })
    }

    /// Label positions present in this graph.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Undirected edges between label positions.
    pub fn edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    /// Induced subgraph on `members` (label positions).
    #[must_use]
    pub fn subgraph(&self, members: &[usize]) -> Self {
        Self {
            nodes: self
                .nodes
                .iter()
                .copied()
                .filter(|n| members.contains(n))
                .collect(),
            labels: self.labels.clone(),
            edges: self
                .edges
                .iter()
                .copied()
                .filter(|(a, b, _)| members.contains(a) && members.contains(b))
                .collect(),
        }
    }

    /// Graphviz source; nodes are filled with `colors[position]` when given.
    pub fn to_dot(&self, name: &str, colors: Option<&[Rgb]>) -> String {
        let mut out = format!("graph \"{}\" {{\n", quote(name));
        out.push_str("  layout=neato;\n");
        out.push_str("  node [style=filled, shape=circle];\n");
        for &n in &self.nodes {
            let label = &self.labels[n];
            let fill = colors
                .and_then(|c| c.get(n))
                .map_or_else(|| "#FFFF00".to_string(), |&c| rgb_hex(c));
            out.push_str(&format!(
                "  n{n} [label=\"{}\", tooltip=\"{} (group {})\", fillcolor=\"{fill}\"];\n",
                quote(&label.name),
                label.id,
                label.group
            ));
        }
        for &(a, b, w) in &self.edges {
            out.push_str(&format!("  n{a} -- n{b} [penwidth={:.2}];\n", 1.0 + w));
        }
        out.push_str("}\n");
        out
    }
}

fn quote(text: &str) -> String {
    text.replace('"', "\\\"")
}
