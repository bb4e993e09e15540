//! Configuration surface for colormap generation, grouping, and output.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::info;

use crate::adjacency::AdjacencyOptions;
use crate::color::{MetricKind, Rgb, rgb_from_array};
use crate::error::{ColorsError, ColorsResult};
use crate::output::OutputFormat;
use crate::select::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE};

/// Default location on disk where the tool looks for the JSON configuration.
pub const DEFAULT_CONFIG_PATH: &str = "config/colors.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "LABELMAP_COLORS_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Options shared by every operation; unspecified fields take their defaults.
pub struct ColorsConfig {
    /// Number of colors to select.
    pub ncolors: usize,
    /// Lattice samples per RGB axis for the candidate pool.
    pub grid_size: usize,
    /// Colors every selected color must stay clear of.
    pub backgrounds: Vec<[f64; 3]>,
    /// Perceptual metric used everywhere.
    pub metric: MetricKind,
    /// Save the selected colormap (and adjacency tables) as files.
    pub save_csv: bool,
    /// Save the reordered colormap as CSV, JSON, and XML.
    pub save_text_files: bool,
    /// Render the selected colormap.
    pub plot_colormap: bool,
    /// Render the reordered colormap.
    pub plot_colors: bool,
    /// Render the label adjacency graph and per-group subgraphs.
    pub plot_graphs: bool,
    /// Log per-step detail.
    pub verbose: bool,
    /// Labels excluded from adjacency extraction.
    pub ignore_values: Vec<i64>,
    /// Offset added to every extracted label.
    pub add_value: i64,
    /// Adjacency table format; only `csv` is written.
    pub output_format: String,
    /// Directory receiving every saved or rendered file.
    pub out_dir: PathBuf,
    /// Name given to saved colormap documents.
    pub colormap_name: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            ncolors: 31,
            grid_size: DEFAULT_GRID_SIZE,
            backgrounds: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            metric: MetricKind::default(),
            save_csv: true,
            save_text_files: true,
            plot_colormap: false,
            plot_colors: false,
            plot_graphs: false,
            verbose: false,
            ignore_values: vec![-1, 999],
            add_value: 0,
            output_format: "csv".into(),
            out_dir: PathBuf::from("."),
            colormap_name: "label_colormap".into(),
        }
    }
}

impl ColorsConfig {
    /// Load from [`resolve_config_path`], using defaults when no file exists.
    pub fn load() -> ColorsResult<Self> {
        Self::load_from(&resolve_config_path())
    }

    /// Load from `path`, using defaults when it does not exist.
    ///
    /// Unreadable or invalid content is an error rather than a silent fallback.
    pub fn load_from(path: &Path) -> ColorsResult<Self> {
        let config = match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = serde_json::from_str(&contents).map_err(|err| {
                    ColorsError::config(format!("{}: {err}", path.display()))
                })?;
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => return Err(err.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field that has a restricted range.
    pub fn validate(&self) -> ColorsResult<()> {
        if self.ncolors == 0 {
            return Err(ColorsError::config("ncolors must be at least 1"));
        }
        if !(1..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ColorsError::config(format!(
                "grid_size must lie in 1..={MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        self.background_colors()?;
        self.output_format()?;
        Ok(())
    }

    /// Backgrounds as colors; empty or out-of-range entries are errors.
    pub fn background_colors(&self) -> ColorsResult<Vec<Rgb>> {
        if self.backgrounds.is_empty() {
            return Err(ColorsError::config(
                "at least one background color is required",
            ));
        }
        self.backgrounds.iter().copied().map(rgb_from_array).collect()
    }

    /// Parsed [`ColorsConfig::output_format`].
    pub fn output_format(&self) -> ColorsResult<OutputFormat> {
        self.output_format.parse()
    }

    /// Adjacency extraction options.
    pub fn adjacency_options(&self) -> AdjacencyOptions {
        AdjacencyOptions {
            ignore_values: self.ignore_values.clone(),
            add_value: self.add_value,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
pub fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ColorsConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ColorsConfig::default());
    }

    #[test]
    fn partial_file_overrides_selected_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        fs::write(
            &path,
            r#"{"ncolors": 12, "backgrounds": [[1, 1, 1]], "metric": "oklab", "plot_graphs": true}"#,
        )
        .unwrap();
        let config = ColorsConfig::load_from(&path).unwrap();
        assert_eq!(config.ncolors, 12);
        assert_eq!(config.metric, MetricKind::Oklab);
        assert!(config.plot_graphs);
        assert_eq!(config.background_colors().unwrap(), vec![Rgb::new(1.0, 1.0, 1.0)]);
        assert_eq!(config.grid_size, DEFAULT_GRID_SIZE);
    }

    #[test]
    fn unknown_output_format_is_a_config_error() {
        let config = ColorsConfig {
            output_format: "parquet".into(),
            ..ColorsConfig::default()
        };
        assert!(matches!(config.validate(), Err(ColorsError::Config(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for config in [
            ColorsConfig {
                ncolors: 0,
                ..ColorsConfig::default()
            },
            ColorsConfig {
                backgrounds: vec![],
                ..ColorsConfig::default()
            },
            ColorsConfig {
                backgrounds: vec![[0.0, 2.0, 0.0]],
                ..ColorsConfig::default()
            },
            ColorsConfig {
                grid_size: 0,
                ..ColorsConfig::default()
            },
            ColorsConfig {
                grid_size: MAX_GRID_SIZE + 1,
                ..ColorsConfig::default()
            },
            ColorsConfig {
                grid_size: usize::MAX,
                ..ColorsConfig::default()
            },
        ] {
            assert!(config.validate().is_err(), "{config:?} passed validation");
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        fs::write(&path, r#"{"ncolors": "many"}"#).unwrap();
        assert!(matches!(
            ColorsConfig::load_from(&path),
            Err(ColorsError::Config(_))
        ));
        fs::write(&path, r#"{"colours": 3}"#).unwrap();
        assert!(ColorsConfig::load_from(&path).is_err());
    }

    #[test]
    fn adjacency_options_follow_config() {
        let config = ColorsConfig {
            ignore_values: vec![0],
            add_value: 1000,
            ..ColorsConfig::default()
        };
        assert_eq!(
            config.adjacency_options(),
            AdjacencyOptions {
                ignore_values: vec![0],
                add_value: 1000
            }
        );
    }
}
