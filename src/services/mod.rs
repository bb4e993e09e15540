//! Services behind the command line.

/// Colormap selection, adjacency extraction, and grouping with output flags applied.
pub mod colormap_service;

pub use colormap_service::ColormapService;
