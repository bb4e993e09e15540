//! Adjacency-aware reassignment of a colormap onto labeled groups.

mod labels;
mod order;
mod reorderer;

pub use labels::{DEFAULT_GROUP, LabelRecord};
pub use reorderer::{GroupPlan, GroupReorderer, Reordering};
