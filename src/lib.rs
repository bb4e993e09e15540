//! Library crate for labelmap-colors: perceptually distinguishable colormaps for
//! labeled anatomy, regrouped so related labels share similar colors while
//! adjacent labels stay apart.

pub mod adjacency;
pub mod color;
pub mod config;
pub mod error;
pub mod output;
pub mod reorder;
pub mod select;
pub mod services;

pub use color::Rgb;
pub use config::ColorsConfig;
pub use error::{ColorsError, ColorsResult};
pub use services::ColormapService;
